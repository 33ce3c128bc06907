use crate::{
    backend::{BackendError, BookingBackend},
    slots::{estimated_capacity, normalize_date, slot_hours, SlotHour, CAPACITY_FLOOR, SLOT_COUNT},
    types::{Appointment, SlotQuery, TimeSlot},
};
use chrono::NaiveDate;
use futures::future::join_all;
use std::{future::Future, time::Duration};
use tokio::time::timeout;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct SlotResolver<B> {
    backend: B,
    fetch_timeout: Duration,
    check_timeout: Duration,
}

async fn bounded<T>(
    limit: Duration,
    request: impl Future<Output = Result<T, BackendError>>,
) -> Result<T, BackendError> {
    timeout(limit, request)
        .await
        .unwrap_or_else(|_| Err(BackendError::Timeout))
}

fn count_bookings(appointments: &[Appointment], time_24h: &str) -> u32 {
    let count = appointments
        .iter()
        .filter(|appointment| appointment.time == time_24h)
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// All slots available, nothing booked, default capacity.
pub fn fallback_slots() -> Vec<TimeSlot> {
    slot_hours()
        .map(|slot| TimeSlot {
            label: slot.label(),
            is_available: true,
            current_booking_count: 0,
            estimated_capacity: CAPACITY_FLOOR,
        })
        .collect()
}

impl<B: BookingBackend> SlotResolver<B> {
    pub fn new(backend: B, fetch_timeout: Duration, check_timeout: Duration) -> Self {
        Self {
            backend,
            fetch_timeout,
            check_timeout,
        }
    }

    /// Resolves the fixed slots of `date`, always in chronological order.
    pub async fn resolve(&self, date: NaiveDate) -> Vec<TimeSlot> {
        let appointments =
            match bounded(self.fetch_timeout, self.backend.appointments_on(date)).await {
                Ok(appointments) => appointments,
                Err(err) => {
                    warn!(%date, %err, "Failed to fetch appointments, assuming all slots available");
                    return fallback_slots();
                }
            };

        let date = normalize_date(date);
        let checks = slot_hours().map(|slot| {
            let time = slot.time_24h();
            let current_booking_count = count_bookings(&appointments, &time);
            let query = SlotQuery {
                date: date.clone(),
                time,
            };
            self.resolve_slot(slot, current_booking_count, query)
        });
        let slots = join_all(checks).await;
        debug_assert_eq!(slots.len(), SLOT_COUNT);

        info!(
            %date,
            appointments = appointments.len(),
            available = slots.iter().filter(|slot| slot.is_available).count(),
            "Resolved slots"
        );
        slots
    }

    async fn resolve_slot(
        &self,
        slot: SlotHour,
        current_booking_count: u32,
        query: SlotQuery,
    ) -> TimeSlot {
        let date = query.date.clone();
        let is_available = match bounded(self.check_timeout, self.backend.check_slot(query)).await
        {
            Ok(available) => available,
            Err(err) => {
                warn!(%date, slot = %slot.label(), %err, "Capacity check failed, assuming available");
                true
            }
        };
        debug!(
            %date,
            slot = %slot.label(),
            is_available,
            current_booking_count,
            "Resolved slot"
        );

        TimeSlot {
            label: slot.label(),
            is_available,
            current_booking_count,
            estimated_capacity: estimated_capacity(current_booking_count, is_available),
        }
    }
}
