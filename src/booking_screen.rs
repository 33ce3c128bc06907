use crate::{backend::BookingBackend, resolver::SlotResolver, types::TimeSlot};
use chrono::NaiveDate;
use serde::Serialize;
use tokio::{
    sync::watch::{self, Sender},
    task::JoinHandle,
};
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveState {
    Idle,
    Resolving,
    Resolved,
}

/// What the booking screen shows for the currently selected date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotBoard {
    pub date: Option<NaiveDate>,
    pub state: ResolveState,
    pub slots: Vec<TimeSlot>,
    /// Bumped on every date selection; results of older selections are dropped.
    #[serde(skip)]
    pub generation: u64,
}

impl Default for SlotBoard {
    fn default() -> Self {
        Self {
            date: None,
            state: ResolveState::Idle,
            slots: vec![],
            generation: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BookingScreen<B> {
    resolver: SlotResolver<B>,
    sender: Sender<SlotBoard>,
}

impl<B: BookingBackend> BookingScreen<B> {
    pub fn new(resolver: SlotResolver<B>) -> Self {
        let (sender, _) = watch::channel(SlotBoard::default());
        Self { resolver, sender }
    }

    pub fn resolver(&self) -> &SlotResolver<B> {
        &self.resolver
    }

    pub fn board(&self) -> SlotBoard {
        self.sender.borrow().clone()
    }

    pub fn board_stream(&self) -> WatchStream<SlotBoard> {
        WatchStream::new(self.sender.subscribe())
    }

    /// Switches the screen to `date` and resolves its slots in the background.
    ///
    /// Without a date nothing is resolved and the board goes back to idle.
    pub fn select_date(&self, date: Option<NaiveDate>) -> Option<JoinHandle<()>> {
        let mut generation = 0;
        self.sender.send_modify(|board| {
            board.generation += 1;
            board.date = date;
            board.state = match date {
                Some(_) => ResolveState::Resolving,
                None => ResolveState::Idle,
            };
            board.slots.clear();
            generation = board.generation;
        });

        let date = date?;
        info!(%date, generation, "Date selected");
        let screen = self.clone();
        Some(tokio::spawn(async move {
            screen.refresh(date, generation).await;
        }))
    }

    /// Resolves `date` and publishes the result if `generation` is still current.
    pub async fn refresh(&self, date: NaiveDate, generation: u64) -> bool {
        let slots = self.resolver.resolve(date).await;
        let published = self.sender.send_if_modified(|board| {
            if board.generation != generation {
                return false;
            }
            board.state = ResolveState::Resolved;
            board.slots = slots;
            true
        });
        if !published {
            debug!(%date, generation, "Dropped slots of a superseded date selection");
        }
        published
    }
}
