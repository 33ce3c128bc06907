use crate::{
    backend::{BackendError, BookingBackend},
    slots::normalize_date,
    types::{Appointment, SlotCheckResponse, SlotQuery},
};
use chrono::NaiveDate;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Salon REST/JSON API.
#[derive(Debug, Clone)]
pub struct RestBackend {
    client: Client,
    base_url: String,
}

impl RestBackend {
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|err| BackendError::Request(err.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status(status.as_u16()));
        }
        response
            .json::<T>()
            .await
            .map_err(|err| BackendError::Decode(err.to_string()))
    }
}

fn request_error(err: reqwest::Error) -> BackendError {
    if err.is_timeout() {
        BackendError::Timeout
    } else {
        BackendError::Request(err.to_string())
    }
}

impl BookingBackend for RestBackend {
    async fn appointments_on(&self, date: NaiveDate) -> Result<Vec<Appointment>, BackendError> {
        let url = self.url(&format!("appointments/date/{}", normalize_date(date)));
        debug!(%url, "Fetching appointments");
        let response = self.client.get(url).send().await.map_err(request_error)?;
        Self::read_json(response).await
    }

    async fn check_slot(&self, query: SlotQuery) -> Result<bool, BackendError> {
        let url = self.url("appointments/check-availability");
        let response = self
            .client
            .post(url)
            .json(&query)
            .send()
            .await
            .map_err(request_error)?;
        let answer: SlotCheckResponse = Self::read_json(response).await?;
        Ok(answer.available)
    }
}
