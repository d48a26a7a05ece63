use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use url::Url;
use crate::errors::YouTubeError;
use super::request::{build_url, request_json, QueryParams};

/// The introspection response. Only `error` and `aud` decide validity;
/// the rest is kept loosely typed for logging.
#[derive(Debug, Deserialize)]
pub struct TokenInfo {
    pub error: Option<Value>,
    pub aud: Option<Value>,
    pub scope: Option<Value>,
    pub expires_in: Option<Value>,
}

// null, false, 0 and "" count as no error.
fn is_set(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

impl TokenInfo {
    pub fn has_error(&self) -> bool {
        is_set(self.error.as_ref())
    }

    pub fn audience(&self) -> Option<&str> {
        self.aud.as_ref().and_then(Value::as_str)
    }

    pub fn is_issued_to(&self, client_id: &str) -> bool {
        !self.has_error() && self.audience() == Some(client_id)
    }
}

pub async fn get_token_info(
    client: &Client,
    tokeninfo_base: &Url,
    access_token: &str,
) -> Result<TokenInfo, YouTubeError> {
    let url = build_url(
        tokeninfo_base,
        "tokeninfo",
        &QueryParams::from([("access_token", access_token)]),
    )?;
    request_json(client, url).await
}
