//! Outbound SMS gateway.
//!
//! The gateway is an external service with a single contract:
//! `send(body, destination, source)` returns the provider's message id and
//! status, or an error. Providers implement [`SmsGateway`]; `main` builds one
//! from [`SmsConfig`] and hands it to the application state.

mod log_only;
mod twilio;

pub use log_only::LogOnlyGateway;
pub use twilio::TwilioGateway;

use crate::config::{SmsConfig, SmsProvider};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// What the provider reports for an accepted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub id: String,
    pub status: String,
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("SMS gateway request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{message}")]
    Rejected { status: u16, message: String },
}

#[async_trait]
pub trait SmsGateway: Send + Sync {
    async fn send(&self, body: &str, to: &str, from: &str) -> Result<SentMessage, GatewayError>;

    fn provider_name(&self) -> &str;
}

pub fn from_config(config: &SmsConfig) -> Arc<dyn SmsGateway> {
    match config.provider {
        SmsProvider::Twilio => Arc::new(TwilioGateway::new(
            &config.api_base,
            &config.account_sid,
            &config.auth_token,
        )),
        SmsProvider::Log => Arc::new(LogOnlyGateway),
    }
}
