use crate::{
    backend::{BackendError, BookingBackend},
    slots::{normalize_date, slot_hours},
    types::{Appointment, SlotQuery},
};
use chrono::{Local, NaiveDate, NaiveTime};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use tracing::{debug, error, info};
use uuid::Uuid;

#[derive(Debug, Clone)]
struct StoredAppointment {
    date: NaiveDate,
    time: String,
    customer_name: String,
}

/// In-memory salon API, used when no backend URL is configured.
///
/// A slot accepts bookings while it holds fewer appointments than there are
/// staff members working.
#[derive(Debug, Clone)]
pub struct LocalAppointments {
    appointments: Arc<Mutex<HashMap<Uuid, StoredAppointment>>>,
    staff_per_slot: u32,
}

impl LocalAppointments {
    pub fn new(staff_per_slot: u32) -> Self {
        Self {
            appointments: Arc::new(Mutex::default()),
            staff_per_slot,
        }
    }

    fn bookings_at(&self, date: NaiveDate, time: &str) -> usize {
        self.appointments
            .lock()
            .unwrap()
            .values()
            .filter(|appointment| appointment.date == date && appointment.time == time)
            .count()
    }

    fn staff_capacity(&self) -> usize {
        usize::try_from(self.staff_per_slot).unwrap_or(usize::MAX)
    }

    pub fn add_appointment(
        &self,
        date: NaiveDate,
        time: &str,
        customer_name: String,
    ) -> Result<Uuid, BackendError> {
        let time = match NaiveTime::parse_from_str(time, "%H:%M") {
            Ok(parsed) => parsed.format("%H:%M").to_string(),
            Err(_) => {
                let err = format!("Invalid appointment time {time}, expected HH:MM");
                error!("{err}");
                return Err(BackendError::Rejected(err));
            }
        };

        let mut appointments = self.appointments.lock().unwrap();
        let booked = appointments
            .values()
            .filter(|appointment| appointment.date == date && appointment.time == time)
            .count();
        if booked >= self.staff_capacity() {
            let err = format!("Slot {time} on {} is fully booked", normalize_date(date));
            error!("{err}");
            return Err(BackendError::Rejected(err));
        }

        let id = Uuid::new_v4();
        appointments.insert(
            id,
            StoredAppointment {
                date,
                time,
                customer_name,
            },
        );
        Ok(id)
    }

    /// Books a few customers into today's and tomorrow's slots.
    pub fn insert_example_appointments(&self) {
        const CUSTOMERS: [&str; 4] = ["Ana", "Ben", "Chloe", "Dario"];
        let today = Local::now().date_naive();
        for (day_offset, date) in today.iter_days().take(2).enumerate() {
            for (index, slot) in slot_hours().enumerate() {
                let bookings = ((index + day_offset) % CUSTOMERS.len()).min(self.staff_capacity());
                for customer in CUSTOMERS.iter().take(bookings) {
                    if let Err(err) =
                        self.add_appointment(date, &slot.time_24h(), customer.to_string())
                    {
                        debug!(%err, "Skipped example appointment");
                    }
                }
            }
        }
        info!(
            appointments = self.appointments.lock().unwrap().len(),
            "Inserted example appointments"
        );
    }
}

impl BookingBackend for LocalAppointments {
    async fn appointments_on(&self, date: NaiveDate) -> Result<Vec<Appointment>, BackendError> {
        let mut appointments: Vec<Appointment> = self
            .appointments
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, appointment)| appointment.date == date)
            .map(|(id, appointment)| Appointment {
                id: Some(id.to_string()),
                time: appointment.time.clone(),
                customer_name: Some(appointment.customer_name.clone()),
                service: None,
            })
            .collect();
        appointments.sort_unstable_by(|a, b| a.time.cmp(&b.time));
        Ok(appointments)
    }

    async fn check_slot(&self, query: SlotQuery) -> Result<bool, BackendError> {
        let date = NaiveDate::parse_from_str(&query.date, "%Y-%m-%d")
            .map_err(|err| BackendError::Rejected(format!("Invalid date {}: {err}", query.date)))?;
        Ok(self.bookings_at(date, &query.time) < self.staff_capacity())
    }
}
