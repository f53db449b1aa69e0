use super::{GatewayError, SentMessage, SmsGateway};
use async_trait::async_trait;
use log::info;
use uuid::Uuid;

/// Dry-run provider: logs each message and reports it as `logged`.
pub struct LogOnlyGateway;

#[async_trait]
impl SmsGateway for LogOnlyGateway {
    async fn send(&self, body: &str, to: &str, from: &str) -> Result<SentMessage, GatewayError> {
        info!("[sms dry-run] from={} to={} body={:?}", from, to, body);
        Ok(SentMessage {
            id: format!("log-{}", Uuid::new_v4()),
            status: "logged".to_string(),
        })
    }

    fn provider_name(&self) -> &str {
        "log"
    }
}
