use crate::configuration::Configuration;
use clap::Parser;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(name = "salon_booking", about = "Slot availability service for the salon booking page")]
pub struct ConfigurationHandler {
    /// Port the slot service listens on
    #[arg(long, env = "PORT", default_value = "3000")]
    port: String,

    /// Base URL of the salon API, e.g. http://localhost:5000/api.
    /// Without it an in-memory backend with example appointments is used.
    #[arg(long, env = "BACKEND_URL")]
    backend_url: Option<String>,

    /// Upper bound for fetching the appointments of a date
    #[arg(long, env = "FETCH_TIMEOUT_MS", default_value_t = 5000)]
    fetch_timeout_ms: u64,

    /// Upper bound for a single slot capacity check
    #[arg(long, env = "CHECK_TIMEOUT_MS", default_value_t = 3000)]
    check_timeout_ms: u64,

    /// Staff members per slot (in-memory backend only)
    #[arg(long, env = "STAFF_PER_SLOT", default_value_t = 5)]
    staff_per_slot: u32,
}

impl ConfigurationHandler {
    pub fn parse_arguments() -> Self {
        Self::parse()
    }
}

impl Configuration for ConfigurationHandler {
    fn port(&self) -> String {
        self.port.clone()
    }

    fn backend_url(&self) -> Option<String> {
        self.backend_url
            .clone()
            .filter(|backend_url| !backend_url.trim().is_empty())
    }

    fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    fn check_timeout(&self) -> Duration {
        Duration::from_millis(self.check_timeout_ms)
    }

    fn staff_per_slot(&self) -> u32 {
        self.staff_per_slot
    }
}
