use super::{GatewayError, SentMessage, SmsGateway};
use async_trait::async_trait;
use serde::Deserialize;

/// Twilio Programmable Messaging client.
///
/// No request timeout is configured: a hung call blocks the batch that issued it.
pub struct TwilioGateway {
    client: reqwest::Client,
    api_base: String,
    account_sid: String,
    auth_token: String,
}

#[derive(Deserialize)]
struct MessageResource {
    sid: String,
    status: String,
}

#[derive(Deserialize)]
struct ErrorResource {
    message: Option<String>,
}

impl TwilioGateway {
    pub fn new(api_base: &str, account_sid: &str, auth_token: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            account_sid: account_sid.to_string(),
            auth_token: auth_token.to_string(),
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_base, self.account_sid
        )
    }
}

#[async_trait]
impl SmsGateway for TwilioGateway {
    async fn send(&self, body: &str, to: &str, from: &str) -> Result<SentMessage, GatewayError> {
        let resp = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[("Body", body), ("To", to), ("From", from)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp
                .json::<ErrorResource>()
                .await
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| format!("SMS gateway returned HTTP {}", status));
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let resource: MessageResource = resp.json().await?;
        Ok(SentMessage {
            id: resource.sid,
            status: resource.status,
        })
    }

    fn provider_name(&self) -> &str {
        "twilio"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_url_uses_account_sid() {
        let gw = TwilioGateway::new("https://api.twilio.com/", "AC123", "token");
        assert_eq!(
            gw.messages_url(),
            "https://api.twilio.com/2010-04-01/Accounts/AC123/Messages.json"
        );
    }
}
