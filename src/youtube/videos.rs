use crate::errors::YouTubeError;
use crate::models::VideoPage;
use super::request::{ApiClient, QueryParams};

pub const MAX_RESULTS: &str = "50";

/// One page of the authenticated user's disliked videos.
pub async fn get_disliked_videos(
    api: &ApiClient,
    access_token: &str,
    page_token: Option<&str>,
) -> Result<VideoPage, YouTubeError> {
    let mut params = QueryParams::from([
        ("part", "id,snippet"),
        ("myRating", "dislike"),
        ("maxResults", MAX_RESULTS),
        ("access_token", access_token),
    ]);

    if let Some(token) = page_token.filter(|t| !t.is_empty()) {
        params.insert("pageToken", token);
    }

    api.request("videos", &params).await
}
