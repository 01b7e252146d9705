//! REST client for the capture daemon.
//!
//! Thin async wrappers over the daemon's API: snapshot polling, capture
//! start/stop, and port-alert management. Errors split into transport
//! failures (caller logs, keeps the previous snapshot) and backend-reported
//! refusals (caller surfaces the daemon's message to the user).

mod rest;

use ntv_types::{ApiStatus, Snapshot};
use rest::{api_get, api_post};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Transport error talking to the capture daemon: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Capture daemon refused the request: {0}")]
    Backend(String),
}

#[derive(Serialize, Clone, Debug)]
struct SetAlertRequest {
    port: u16,
    threshold: f64,
}

#[derive(Serialize, Clone, Debug)]
struct ClearAlertRequest {
    port: u16,
}

/// Polls the current snapshot. The payload has no success envelope, so the
/// only failure mode is transport.
pub async fn fetch_snapshot(base: &str) -> Result<Snapshot, ClientError> {
    Ok(api_get::<Snapshot>(base, "network_data").await?)
}

pub async fn start_capture(base: &str) -> Result<ApiStatus, ClientError> {
    check(api_get::<ApiStatus>(base, "start_capture").await?)
}

pub async fn stop_capture(base: &str) -> Result<ApiStatus, ClientError> {
    check(api_get::<ApiStatus>(base, "stop_capture").await?)
}

pub async fn set_alert(base: &str, port: u16, threshold: f64) -> Result<ApiStatus, ClientError> {
    check(api_post(base, "set_alert", &SetAlertRequest { port, threshold }).await?)
}

pub async fn clear_alert(base: &str, port: u16) -> Result<ApiStatus, ClientError> {
    check(api_post(base, "clear_alert", &ClearAlertRequest { port }).await?)
}

fn check(status: ApiStatus) -> Result<ApiStatus, ClientError> {
    if status.success {
        Ok(status)
    } else {
        Err(ClientError::Backend(status.message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_passes_success() {
        let status = ApiStatus {
            success: true,
            message: "Capture started".to_string(),
        };
        assert!(check(status).is_ok());
    }

    #[test]
    fn test_check_surfaces_backend_message() {
        let status = ApiStatus {
            success: false,
            message: "Capture already running".to_string(),
        };
        match check(status) {
            Err(ClientError::Backend(msg)) => assert_eq!(msg, "Capture already running"),
            other => panic!("expected backend error, got {other:?}"),
        }
    }
}
