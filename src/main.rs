use crate::{
    configuration::Configuration, configuration_handler::ConfigurationHandler, http::create_app,
    local_appointments::LocalAppointments, rest_backend::RestBackend,
};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod backend;
mod booking_screen;
mod configuration;
mod configuration_handler;
mod http;
mod local_appointments;
mod resolver;
mod rest_backend;
mod slots;
#[cfg(test)]
mod testutils;
mod types;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let configuration = ConfigurationHandler::parse_arguments();

    let address = format!("0.0.0.0:{}", configuration.port());
    let listener = match tokio::net::TcpListener::bind(&address).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(?err, "Failed to bind {address}");
            return ExitCode::FAILURE;
        }
    };
    info!("Slot service accessible at {address}");

    let app = if let Some(backend_url) = configuration.backend_url() {
        // Each request is also bounded per call by the resolver.
        let request_timeout = configuration
            .fetch_timeout()
            .max(configuration.check_timeout());
        match RestBackend::new(&backend_url, request_timeout) {
            Ok(backend) => {
                info!(%backend_url, "Using salon API");
                create_app(backend, &configuration)
            }
            Err(err) => {
                error!(%err, "Failed to set up salon API client for {backend_url}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        info!("No backend URL configured, using in-memory appointments");
        let backend = LocalAppointments::new(configuration.staff_per_slot());
        backend.insert_example_appointments();
        create_app(backend, &configuration)
    };

    if let Err(err) = axum::serve(listener, app).await {
        error!(?err, "Server stopped");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
