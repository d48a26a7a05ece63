use std::fmt::Write;
use tracing::{debug, info};
use crate::models::{Video, VideoPage};
use super::document::{Document, NextPageControl};

pub const NOTHING_DISLIKED: &str = "<p><strong>You haven't disliked anything</strong></p>";

// Titles come from the provider and are inserted as-is.
fn video_entry(video: &Video) -> String {
    let mut html = format!("<a href=\"https://youtu.be/{}\" target=\"_blank\">", video.id);
    if let Some(thumbnail) = video.snippet.thumbnails.smallest() {
        let _ = write!(html, "<img src=\"{}\"", thumbnail.url);
        if let Some(width) = thumbnail.width {
            let _ = write!(html, " width=\"{}\"", width);
        }
        if let Some(height) = thumbnail.height {
            let _ = write!(html, " height=\"{}\"", height);
        }
        html.push_str(" />");
    }
    html.push_str(&video.snippet.title);
    html.push_str("</a>");
    html
}

/// Appends one page of results to the list and swaps in a fresh "Next Page" control.
pub fn render_videos(document: &mut Document, page: &VideoPage) {
    let html = if page.items.is_empty() {
        NOTHING_DISLIKED.to_string()
    } else {
        page.items.iter().map(video_entry).collect()
    };

    if let Some(auth) = document.auth.as_mut() {
        auth.hidden = true;
    }

    let Some(list) = document.videos.as_mut() else {
        debug!("no video list on page, dropping rendered results");
        return;
    };
    list.append_html(&html);
    list.hidden = false;
    list.remove_next_page();

    if let Some(token) = page.next_page_token() {
        list.set_next_page(NextPageControl::new(token));
    }

    info!(
        items = page.items.len(),
        total = page.page_info.as_ref().map(|p| p.total_results),
        per_page = page.page_info.as_ref().map(|p| p.results_per_page),
        has_next = page.next_page_token().is_some(),
        "rendered video page"
    );
}
