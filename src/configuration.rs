use std::time::Duration;

pub trait Configuration: Clone + Send + Sync + 'static {
    fn port(&self) -> String;
    fn backend_url(&self) -> Option<String>;
    fn fetch_timeout(&self) -> Duration;
    fn check_timeout(&self) -> Duration;
    fn staff_per_slot(&self) -> u32;
}
