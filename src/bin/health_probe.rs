//! One-shot backend liveness check.
//!
//! Behaviour:
//!   • Performs a single HTTP GET request to `<base url>/health`.
//!   • Prints the HTTP status code or any error to stdout/stderr.
//!   • Exits with code 0 on any 2xx status, otherwise exits 1.
//!
//! Environment variables (optional):
//!   SOCIALAPP_API_BASE_URL: backend to query (default: http://localhost:8000)

use std::process::exit;

use socialapp_client::api_methods::{ApiMethods, RequestError};
use socialapp_client::config::Config;

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Invalid configuration: {err}");
            exit(1);
        }
    };

    let api = match ApiMethods::new(&config.api_base_url) {
        Ok(api) => api,
        Err(err) => {
            eprintln!("Invalid base url: {err}");
            exit(1);
        }
    };

    match api.get_health().await {
        Ok(status) => {
            println!("Health OK: {}", status);
            exit(0);
        }
        Err(RequestError::Status { status, .. }) => {
            eprintln!("Unhealthy: {}", status);
            exit(1);
        }
        Err(err) => {
            eprintln!("Request error: {err}");
            exit(1);
        }
    }
}
