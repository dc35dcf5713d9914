/// User-facing alerts and confirmations raised by the controller.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
    async fn confirm(&self, message: &str) -> bool;
}
