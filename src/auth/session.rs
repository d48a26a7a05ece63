use reqwest::Client;
use tracing::{debug, info, warn};
use url::{form_urlencoded, Url};
use crate::errors::YouTubeError;
use crate::page::Location;
use crate::youtube::tokeninfo::get_token_info;

/// Holds the bearer token. Only `restore_from_location` sets it and only
/// a failed `check_token` clears it.
#[derive(Debug)]
pub struct Session {
    client: Client,
    client_id: String,
    tokeninfo_base: Url,
    token: Option<String>,
}

impl Session {
    pub fn new(client: Client, client_id: impl Into<String>, tokeninfo_base: Url) -> Self {
        Session {
            client,
            client_id: client_id.into(),
            tokeninfo_base,
            token: None,
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Picks `access_token` out of an implicit-grant redirect fragment.
    pub fn restore_from_location(&mut self, location: &Location) {
        let hash = location.hash();
        if hash.is_empty() {
            return;
        }

        let token = form_urlencoded::parse(hash.as_bytes())
            .find(|(key, _)| key == "access_token")
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty());

        if let Some(token) = token {
            debug!("access token restored from location fragment");
            self.token = Some(token);
        }
    }

    /// Confirms the token with the provider. Any failure clears both the
    /// token and the location fragment.
    pub async fn check_token(&mut self, location: &mut Location) -> Result<(), YouTubeError> {
        let Some(token) = self.token.as_deref() else {
            return Err(YouTubeError::Unauthenticated);
        };

        let result = get_token_info(&self.client, &self.tokeninfo_base, token).await;
        match result {
            Ok(info) if info.is_issued_to(&self.client_id) => {
                debug!(scope = ?info.scope, expires_in = ?info.expires_in, "token accepted");
                Ok(())
            }
            Ok(info) => {
                warn!(error = ?info.error, aud = ?info.aud, "token rejected by introspection");
                self.invalidate(location);
                Err(YouTubeError::InvalidToken)
            }
            Err(e) => {
                warn!(error = %e, "token introspection failed");
                self.invalidate(location);
                Err(YouTubeError::InvalidToken)
            }
        }
    }

    fn invalidate(&mut self, location: &mut Location) {
        self.token = None;
        location.set_hash("");
        info!("session cleared");
    }
}
