use std::collections::BTreeMap;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};
use url::{form_urlencoded, Url};
use crate::errors::YouTubeError;

/// Query parameters for a single request. Sorted, so the encoding is stable.
pub type QueryParams<'a> = BTreeMap<&'a str, &'a str>;

/// Resolves `path` (plus an encoded query, if any) against `base`.
pub fn build_url(base: &Url, path: &str, params: &QueryParams) -> Result<Url, YouTubeError> {
    let mut relative = path.to_string();
    if !params.is_empty() {
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params.iter())
            .finish();
        relative.push('?');
        relative.push_str(&query);
    }
    Ok(base.join(&relative)?)
}

/// GETs `url` and decodes the body as JSON, whatever the status code.
pub async fn request_json<T: DeserializeOwned>(client: &Client, url: Url) -> Result<T, YouTubeError> {
    let resp = send(client, url).await?;
    resp.json()
        .await
        .map_err(|e| YouTubeError::ParseError(e.to_string()))
}

async fn send(client: &Client, url: Url) -> Result<Response, YouTubeError> {
    debug!(host = url.host_str().unwrap_or_default(), path = url.path(), "GET");
    Ok(client.get(url).send().await?)
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Error,
}

#[derive(Debug, Deserialize)]
struct Error {
    message: String,
}

/// Client for the YouTube Data API rooted at a fixed base endpoint.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base: Url,
}

impl ApiClient {
    pub fn new(client: Client, base: Url) -> Self {
        ApiClient { client, base }
    }

    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &QueryParams<'_>,
    ) -> Result<T, YouTubeError> {
        let url = build_url(&self.base, endpoint, params)?;
        let resp = send(&self.client, url).await?;

        match resp.status() {
            reqwest::StatusCode::TOO_MANY_REQUESTS => return Err(YouTubeError::Ratelimited),
            reqwest::StatusCode::FORBIDDEN => {
                let error_response: ErrorResponse = resp
                    .json()
                    .await
                    .map_err(|e| YouTubeError::ParseError(e.to_string()))?;

                if error_response.error.message.starts_with("The request cannot be completed because you have exceeded your") {
                    return Err(YouTubeError::Ratelimited);
                }
                return Err(YouTubeError::Forbidden);
            },
            reqwest::StatusCode::NOT_FOUND => return Err(YouTubeError::NotFound),
            reqwest::StatusCode::UNAUTHORIZED => return Err(YouTubeError::Unauthorized),
            reqwest::StatusCode::INTERNAL_SERVER_ERROR | reqwest::StatusCode::SERVICE_UNAVAILABLE => {
                return Err(YouTubeError::InternalServerError);
            },
            reqwest::StatusCode::OK => (),
            status => {
                let body = resp
                    .text()
                    .await
                    .map_err(|e| YouTubeError::ParseError(e.to_string()))?;
                warn!(status = status.as_u16(), body = %body, "unexpected status from YouTube API");
                return Err(YouTubeError::UnknownStatusCode(status));
            }
        }

        resp.json()
            .await
            .map_err(|e| YouTubeError::ParseError(e.to_string()))
    }
}
