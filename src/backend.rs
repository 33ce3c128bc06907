use crate::types::{Appointment, SlotQuery};
use chrono::NaiveDate;
use std::future::Future;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("backend answered with status {0}")]
    Status(u16),
    #[error("unexpected response body: {0}")]
    Decode(String),
    #[error("backend did not answer in time")]
    Timeout,
    #[error("{0}")]
    Rejected(String),
}

/// The two read-only salon API operations slot resolution depends on.
pub trait BookingBackend: Clone + Send + Sync + 'static {
    /// All appointments scheduled on `date`, in no particular order.
    fn appointments_on(
        &self,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Vec<Appointment>, BackendError>> + Send;

    /// Whether one more booking fits at `query.date`/`query.time`.
    fn check_slot(
        &self,
        query: SlotQuery,
    ) -> impl Future<Output = Result<bool, BackendError>> + Send;
}
