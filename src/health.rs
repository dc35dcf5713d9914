use chrono::{DateTime, Local, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Duration;

use crate::api_methods::ApiMethods;

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Checking,
    Online,
    Offline,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub last_check: Option<DateTime<Utc>>,
}

impl Default for HealthReport {
    fn default() -> Self {
        HealthReport {
            status: HealthStatus::Checking,
            last_check: None,
        }
    }
}

impl HealthReport {
    pub fn banner(&self, base_url: &str) -> String {
        match self.status {
            HealthStatus::Checking => {
                "Checking backend connection...".to_string()
            }
            HealthStatus::Online => match self.last_check {
                Some(at) => format!(
                    "Backend connected (Last check: {})",
                    at.with_timezone(&Local).format("%H:%M:%S")
                ),
                None => "Backend connected".to_string(),
            },
            HealthStatus::Offline => format!(
                "Backend API is unavailable or unreachable. Some features may not work.\nMake sure the server is running at {}",
                base_url
            ),
        }
    }
}

/// Single liveness probe. Any 2xx is online, anything else is offline.
pub async fn check(api: &ApiMethods) -> HealthStatus {
    match api.get_health().await {
        Ok(_) => HealthStatus::Online,
        Err(err) => {
            ::log::debug!("health check failed: {}", err);
            HealthStatus::Offline
        }
    }
}

/// Background probe publishing its latest report on a watch channel. The
/// task is aborted when the monitor is dropped. A zero period falls back to
/// `DEFAULT_INTERVAL`.
pub struct HealthMonitor {
    receiver: watch::Receiver<HealthReport>,
    handle: JoinHandle<()>,
}

impl HealthMonitor {
    pub fn spawn(api: ApiMethods, period: Duration) -> Self {
        let (sender, receiver) = watch::channel(HealthReport::default());
        let period = if period.is_zero() {
            ::log::warn!("zero health check period, using {:?}", DEFAULT_INTERVAL);
            DEFAULT_INTERVAL
        } else {
            period
        };

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;

                let status = check(&api).await;
                let report = HealthReport {
                    status,
                    last_check: Some(Utc::now()),
                };

                if sender.send(report).is_err() {
                    break;
                }
            }
        });

        HealthMonitor { receiver, handle }
    }

    pub fn current(&self) -> HealthReport {
        self.receiver.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<HealthReport> {
        self.receiver.clone()
    }
}

impl Drop for HealthMonitor {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
