use url::Url;
use crate::config::READONLY_SCOPE;
use crate::errors::YouTubeError;
use crate::page::Location;
use crate::youtube::request::{build_url, QueryParams};

/// Implicit-grant authorization URL that returns to the current page.
pub fn authorize_url(oauth_base: &Url, client_id: &str, location: &Location) -> Result<Url, YouTubeError> {
    let redirect_uri = location.href_without_hash();
    build_url(
        oauth_base,
        "auth",
        &QueryParams::from([
            ("client_id", client_id),
            ("redirect_uri", redirect_uri.as_str()),
            ("response_type", "token"),
            ("scope", READONLY_SCOPE),
        ]),
    )
}

pub fn redirect_to_authorize(oauth_base: &Url, client_id: &str, location: &mut Location) -> Result<(), YouTubeError> {
    let url = authorize_url(oauth_base, client_id, location)?;
    location.assign(url);
    Ok(())
}
