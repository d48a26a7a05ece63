use std::env;
use std::path::PathBuf;
use url::Url;
use crate::errors::ConfigError;

pub const DEFAULT_CLIENT_ID: &str = "96843715674-8orosbd2p51shogmit03uknq0g51sat1.apps.googleusercontent.com";
pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/youtube/v3/";
pub const DEFAULT_OAUTH_BASE: &str = "https://accounts.google.com/o/oauth2/v2/";
pub const DEFAULT_TOKENINFO_BASE: &str = "https://www.googleapis.com/oauth2/v3/";
pub const DEFAULT_PAGE_URL: &str = "http://localhost:8080/";
pub const READONLY_SCOPE: &str = "https://www.googleapis.com/auth/youtube.readonly";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub api_base: Url,
    pub oauth_base: Url,
    pub tokeninfo_base: Url,
    pub page_url: Url,
    pub output: Option<PathBuf>,
    pub all_pages: bool,
    pub log_format: LogFormat,
}

impl Config {
    /// Reads `DISLIKES_*` variables; `.env` is expected to be loaded already.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = |name: &'static str, default: &str| -> Result<Url, ConfigError> {
            let raw = lookup(name).unwrap_or_else(|| default.to_string());
            Url::parse(&raw).map_err(|source| ConfigError::InvalidUrl { name, source })
        };

        let all_pages = match lookup("DISLIKES_ALL_PAGES").as_deref() {
            None | Some("") | Some("0") | Some("false") => false,
            Some("1") | Some("true") => true,
            Some(other) => {
                return Err(ConfigError::InvalidBool {
                    name: "DISLIKES_ALL_PAGES",
                    value: other.to_string(),
                })
            }
        };

        let log_format = match lookup("DISLIKES_LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Config {
            client_id: lookup("DISLIKES_CLIENT_ID").unwrap_or_else(|| DEFAULT_CLIENT_ID.to_string()),
            api_base: url("DISLIKES_API_BASE", DEFAULT_API_BASE)?,
            oauth_base: url("DISLIKES_OAUTH_BASE", DEFAULT_OAUTH_BASE)?,
            tokeninfo_base: url("DISLIKES_TOKENINFO_BASE", DEFAULT_TOKENINFO_BASE)?,
            page_url: url("DISLIKES_PAGE_URL", DEFAULT_PAGE_URL)?,
            output: lookup("DISLIKES_OUTPUT").filter(|p| !p.is_empty()).map(PathBuf::from),
            all_pages,
            log_format,
        })
    }

    /// Points every provider endpoint at one server, as a local stand-in would.
    #[cfg(test)]
    pub fn for_server(server_url: &str) -> Self {
        let base = |path: &str| Url::parse(&format!("{}{}", server_url, path)).unwrap();
        Config {
            client_id: "test-client-id".to_string(),
            api_base: base("/youtube/v3/"),
            oauth_base: base("/o/oauth2/v2/"),
            tokeninfo_base: base("/oauth2/v3/"),
            page_url: Url::parse(DEFAULT_PAGE_URL).unwrap(),
            output: None,
            all_pages: false,
            log_format: LogFormat::Pretty,
        }
    }
}
