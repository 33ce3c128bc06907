use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use chrono::NaiveDate;
use tokio::time::sleep;

use crate::{
    backend::{BackendError, BookingBackend},
    types::{Appointment, SlotQuery},
};

pub fn appointment_at(time: &str) -> Appointment {
    Appointment {
        id: None,
        time: time.into(),
        customer_name: None,
        service: None,
    }
}

pub struct MockBookingBackendInner {
    pub fetch_success: AtomicBool,
    pub calls_to_appointments_on: AtomicU64,
    pub calls_to_check_slot: AtomicU64,
    pub appointments: Mutex<HashMap<NaiveDate, Vec<Appointment>>>,
    /// Times (`HH:MM`) the capacity check answers "full" for.
    pub full_slots: Mutex<HashSet<String>>,
    /// Times (`HH:MM`) the capacity check fails for.
    pub failing_slots: Mutex<HashSet<String>>,
    pub fetch_delay: Mutex<HashMap<NaiveDate, Duration>>,
    pub check_delay: Mutex<Option<Duration>>,
}

#[derive(Clone)]
pub struct MockBookingBackend(pub Arc<MockBookingBackendInner>);

impl MockBookingBackendInner {
    fn new() -> Self {
        Self {
            fetch_success: AtomicBool::new(true),
            calls_to_appointments_on: AtomicU64::default(),
            calls_to_check_slot: AtomicU64::default(),
            appointments: Mutex::default(),
            full_slots: Mutex::default(),
            failing_slots: Mutex::default(),
            fetch_delay: Mutex::default(),
            check_delay: Mutex::default(),
        }
    }
}

impl MockBookingBackend {
    pub fn new() -> Self {
        Self(Arc::new(MockBookingBackendInner::new()))
    }

    pub fn with_appointments(self, date: NaiveDate, times: &[&str]) -> Self {
        self.0
            .appointments
            .lock()
            .unwrap()
            .entry(date)
            .or_default()
            .extend(times.iter().map(|time| appointment_at(time)));
        self
    }

    pub fn with_full_slot(self, time: &str) -> Self {
        self.0.full_slots.lock().unwrap().insert(time.into());
        self
    }

    pub fn with_failing_slot(self, time: &str) -> Self {
        self.0.failing_slots.lock().unwrap().insert(time.into());
        self
    }

    pub fn calls_to_appointments_on(&self) -> u64 {
        self.0.calls_to_appointments_on.load(Ordering::SeqCst)
    }

    pub fn calls_to_check_slot(&self) -> u64 {
        self.0.calls_to_check_slot.load(Ordering::SeqCst)
    }
}

impl BookingBackend for MockBookingBackend {
    async fn appointments_on(&self, date: NaiveDate) -> Result<Vec<Appointment>, BackendError> {
        self.0
            .calls_to_appointments_on
            .fetch_add(1, Ordering::SeqCst);
        let delay = self.0.fetch_delay.lock().unwrap().get(&date).copied();
        if let Some(delay) = delay {
            sleep(delay).await;
        }
        if !self.0.fetch_success.load(Ordering::SeqCst) {
            return Err(BackendError::Request("Supposed to fail".into()));
        }
        let appointments = self.0.appointments.lock().unwrap().get(&date).cloned();
        Ok(appointments.unwrap_or_default())
    }

    async fn check_slot(&self, query: SlotQuery) -> Result<bool, BackendError> {
        self.0.calls_to_check_slot.fetch_add(1, Ordering::SeqCst);
        let delay = *self.0.check_delay.lock().unwrap();
        if let Some(delay) = delay {
            sleep(delay).await;
        }
        if self.0.failing_slots.lock().unwrap().contains(&query.time) {
            return Err(BackendError::Status(503));
        }
        Ok(!self.0.full_slots.lock().unwrap().contains(&query.time))
    }
}
