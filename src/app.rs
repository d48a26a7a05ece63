use reqwest::Client;
use tracing::{debug, info};
use url::Url;
use crate::auth::{redirect_to_authorize, Session};
use crate::config::Config;
use crate::errors::YouTubeError;
use crate::page::{render_videos, Document, Location};
use crate::youtube::request::ApiClient;
use crate::youtube::videos::get_disliked_videos;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    DomReady,
    AuthButtonClicked,
    NextPageClicked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// No token, nothing was requested.
    Skipped,
    Rendered,
}

/// The dislikes page: its location, its DOM and the session behind it.
/// Events are handled one at a time, each running to completion.
pub struct DislikesPage {
    api: ApiClient,
    oauth_base: Url,
    session: Session,
    location: Location,
    document: Document,
    loaded: bool,
}

impl DislikesPage {
    pub fn new(config: &Config, location: Location) -> Self {
        Self::with_document(config, location, Document::default())
    }

    pub fn with_document(config: &Config, location: Location, document: Document) -> Self {
        let client = Client::new();
        DislikesPage {
            api: ApiClient::new(client.clone(), config.api_base.clone()),
            oauth_base: config.oauth_base.clone(),
            session: Session::new(client, config.client_id.clone(), config.tokeninfo_base.clone()),
            location,
            document,
            loaded: false,
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Whether a visible "Next Page" control is on the page.
    pub fn has_next_page(&self) -> bool {
        self.document
            .videos
            .as_ref()
            .and_then(|list| list.next_page())
            .is_some_and(|control| !control.hidden)
    }

    pub async fn dispatch(&mut self, event: PageEvent) -> Result<(), YouTubeError> {
        debug!(?event, "dispatching page event");
        match event {
            PageEvent::DomReady => self.on_dom_ready().await,
            PageEvent::AuthButtonClicked => self.on_auth_button_click(),
            PageEvent::NextPageClicked => self.on_next_page_click().await,
        }
    }

    async fn on_dom_ready(&mut self) -> Result<(), YouTubeError> {
        if self.loaded {
            return Ok(());
        }
        self.loaded = true;

        self.session.restore_from_location(&self.location);
        if self.session.is_authenticated() {
            self.fetch_videos(None).await?;
        }
        Ok(())
    }

    fn on_auth_button_click(&mut self) -> Result<(), YouTubeError> {
        if self.document.auth.is_none() {
            return Ok(());
        }
        redirect_to_authorize(&self.oauth_base, self.session.client_id(), &mut self.location)
    }

    async fn on_next_page_click(&mut self) -> Result<(), YouTubeError> {
        let Some(control) = self
            .document
            .videos
            .as_mut()
            .and_then(|list| list.next_page_mut())
            .filter(|control| !control.hidden)
        else {
            return Ok(());
        };

        control.hidden = true;
        let page_token = control.page_token().to_string();
        self.fetch_videos(Some(&page_token)).await?;
        Ok(())
    }

    /// Validates the token, fetches one page of dislikes and renders it.
    pub async fn fetch_videos(&mut self, page_token: Option<&str>) -> Result<FetchOutcome, YouTubeError> {
        if !self.session.is_authenticated() {
            return Ok(FetchOutcome::Skipped);
        }

        self.session.check_token(&mut self.location).await?;

        let access_token = self.session.token().ok_or(YouTubeError::Unauthenticated)?;
        let page = get_disliked_videos(&self.api, access_token, page_token).await?;
        info!(page_token, items = page.items.len(), "fetched disliked videos");

        render_videos(&mut self.document, &page);
        Ok(FetchOutcome::Rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Mock, Server};
    use crate::page::render::NOTHING_DISLIKED;

    fn first_page_query() -> Matcher {
        Matcher::AllOf(vec![
            Matcher::UrlEncoded("part".into(), "id,snippet".into()),
            Matcher::UrlEncoded("myRating".into(), "dislike".into()),
            Matcher::UrlEncoded("maxResults".into(), "50".into()),
            Matcher::UrlEncoded("access_token".into(), "XYZ".into()),
        ])
    }

    async fn no_page_token(server: &mut Server) -> Mock {
        server
            .mock("GET", "/youtube/v3/videos")
            .match_query(Matcher::Regex("pageToken=".into()))
            .expect(0)
            .create_async()
            .await
    }

    fn page_at(server: &Server, href: &str) -> DislikesPage {
        let config = Config::for_server(&server.url());
        DislikesPage::new(&config, Location::new(Url::parse(href).unwrap()))
    }

    fn items(ids: &[&str]) -> String {
        ids.iter()
            .map(|id| format!(
                r#"{{"id": "{id}", "snippet": {{"title": "Video {id}", "thumbnails": {{"default": {{"url": "https://i.ytimg.com/vi/{id}/default.jpg", "width": 120, "height": 90}}}}}}}}"#
            ))
            .collect::<Vec<_>>()
            .join(",")
    }

    async fn valid_token(server: &mut Server, hits: usize) -> Mock {
        server
            .mock("GET", "/oauth2/v3/tokeninfo")
            .match_query(Matcher::UrlEncoded("access_token".into(), "XYZ".into()))
            .with_header("content-type", "application/json")
            .with_body(r#"{"aud": "test-client-id", "expires_in": "3599"}"#)
            .expect(hits)
            .create_async()
            .await
    }

    async fn listing(server: &mut Server, query: Matcher, body: String) -> Mock {
        server
            .mock("GET", "/youtube/v3/videos")
            .match_query(query)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    fn link_count(page: &DislikesPage) -> usize {
        page.document().videos.as_ref().unwrap().inner_html().matches("<a ").count()
    }

    fn next_page_controls(page: &DislikesPage) -> usize {
        page.document().to_html().matches("Next Page").count()
    }

    #[tokio::test]
    async fn test_fetch_without_token_is_skipped() {
        let mut server = Server::new_async().await;
        let any = server.mock("GET", Matcher::Any).expect(0).create_async().await;

        let mut page = page_at(&server, "http://localhost:8080/");
        assert_eq!(page.fetch_videos(None).await.unwrap(), FetchOutcome::Skipped);
        assert!(page.document().videos.as_ref().unwrap().hidden);
        any.assert_async().await;
    }

    #[tokio::test]
    async fn test_dom_ready_renders_nothing_disliked() {
        let mut server = Server::new_async().await;
        let tokeninfo = valid_token(&mut server, 1).await;
        let paged = no_page_token(&mut server).await;
        let videos = listing(
            &mut server,
            first_page_query(),
            r#"{"items": [], "pageInfo": {"totalResults": 0, "resultsPerPage": 50}}"#.to_string(),
        ).await;

        let mut page = page_at(&server, "http://localhost:8080/#access_token=XYZ&token_type=Bearer");
        page.dispatch(PageEvent::DomReady).await.unwrap();

        let list = page.document().videos.as_ref().unwrap();
        assert_eq!(list.inner_html(), NOTHING_DISLIKED);
        assert!(!list.hidden);
        assert_eq!(link_count(&page), 0);
        assert!(page.document().auth.as_ref().unwrap().hidden);

        tokeninfo.assert_async().await;
        paged.assert_async().await;
        videos.assert_async().await;
    }

    #[tokio::test]
    async fn test_dom_ready_is_handled_once() {
        let mut server = Server::new_async().await;
        let tokeninfo = valid_token(&mut server, 1).await;
        let paged = no_page_token(&mut server).await;
        let videos = listing(
            &mut server,
            first_page_query(),
            format!(r#"{{"items": [{}]}}"#, items(&["a"])),
        ).await;

        let mut page = page_at(&server, "http://localhost:8080/#access_token=XYZ");
        page.dispatch(PageEvent::DomReady).await.unwrap();
        page.dispatch(PageEvent::DomReady).await.unwrap();

        assert_eq!(link_count(&page), 1);
        tokeninfo.assert_async().await;
        paged.assert_async().await;
        videos.assert_async().await;
    }

    #[tokio::test]
    async fn test_dom_ready_without_token_stays_idle() {
        let mut server = Server::new_async().await;
        let any = server.mock("GET", Matcher::Any).expect(0).create_async().await;

        let mut page = page_at(&server, "http://localhost:8080/");
        page.dispatch(PageEvent::DomReady).await.unwrap();

        assert!(!page.session().is_authenticated());
        assert!(!page.document().auth.as_ref().unwrap().hidden);
        any.assert_async().await;
    }

    #[tokio::test]
    async fn test_next_page_follows_continuation_token() {
        let mut server = Server::new_async().await;
        let tokeninfo = valid_token(&mut server, 2).await;
        let first = listing(
            &mut server,
            first_page_query(),
            format!(r#"{{"items": [{}], "nextPageToken": "P2"}}"#, items(&["a", "b"])),
        ).await;
        let second = listing(
            &mut server,
            Matcher::AllOf(vec![
                Matcher::UrlEncoded("pageToken".into(), "P2".into()),
                Matcher::UrlEncoded("myRating".into(), "dislike".into()),
                Matcher::UrlEncoded("access_token".into(), "XYZ".into()),
            ]),
            format!(r#"{{"items": [{}]}}"#, items(&["c", "d", "e"])),
        ).await;

        let mut page = page_at(&server, "http://localhost:8080/#access_token=XYZ");
        page.dispatch(PageEvent::DomReady).await.unwrap();

        assert_eq!(next_page_controls(&page), 1);
        assert!(page.has_next_page());
        assert_eq!(
            page.document().videos.as_ref().unwrap().next_page().unwrap().page_token(),
            "P2"
        );

        page.dispatch(PageEvent::NextPageClicked).await.unwrap();

        assert_eq!(link_count(&page), 5);
        assert_eq!(next_page_controls(&page), 0);
        assert!(!page.has_next_page());

        tokeninfo.assert_async().await;
        first.assert_async().await;
        second.assert_async().await;
    }

    #[tokio::test]
    async fn test_next_page_click_without_control_does_nothing() {
        let mut server = Server::new_async().await;
        let any = server.mock("GET", Matcher::Any).expect(0).create_async().await;

        let mut page = page_at(&server, "http://localhost:8080/#access_token=XYZ");
        page.dispatch(PageEvent::NextPageClicked).await.unwrap();
        any.assert_async().await;
    }

    #[tokio::test]
    async fn test_invalid_token_aborts_fetch() {
        let mut server = Server::new_async().await;
        let _tokeninfo = server
            .mock("GET", "/oauth2/v3/tokeninfo")
            .match_query(Matcher::Any)
            .with_body(r#"{"aud": "other-client-id"}"#)
            .create_async()
            .await;
        let videos = server
            .mock("GET", "/youtube/v3/videos")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let mut page = page_at(&server, "http://localhost:8080/#access_token=XYZ");
        let result = page.dispatch(PageEvent::DomReady).await;

        assert!(matches!(result, Err(YouTubeError::InvalidToken)));
        assert!(!page.session().is_authenticated());
        assert_eq!(page.location().hash(), "");
        assert!(page.document().videos.as_ref().unwrap().hidden);
        assert!(!page.document().auth.as_ref().unwrap().hidden);
        videos.assert_async().await;

        assert_eq!(page.fetch_videos(None).await.unwrap(), FetchOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_failed_next_page_leaves_control_hidden() {
        let mut server = Server::new_async().await;
        let _tokeninfo = valid_token(&mut server, 2).await;
        let _first = listing(
            &mut server,
            first_page_query(),
            format!(r#"{{"items": [{}], "nextPageToken": "P2"}}"#, items(&["a"])),
        ).await;
        let _second = server
            .mock("GET", "/youtube/v3/videos")
            .match_query(Matcher::UrlEncoded("pageToken".into(), "P2".into()))
            .with_status(500)
            .create_async()
            .await;

        let mut page = page_at(&server, "http://localhost:8080/#access_token=XYZ");
        page.dispatch(PageEvent::DomReady).await.unwrap();

        let result = page.dispatch(PageEvent::NextPageClicked).await;
        assert!(matches!(result, Err(YouTubeError::InternalServerError)));
        assert!(!page.has_next_page());
        assert_eq!(link_count(&page), 1);
        assert!(page.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_auth_button_navigates_to_provider() {
        let server = Server::new_async().await;
        let mut page = page_at(&server, "http://localhost:8080/#stale=1");

        page.dispatch(PageEvent::AuthButtonClicked).await.unwrap();

        let target = page.location().href();
        assert!(page.location().navigated());
        assert_eq!(target.path(), "/o/oauth2/v2/auth");
        let redirect = target
            .query_pairs()
            .find(|(k, _)| k == "redirect_uri")
            .map(|(_, v)| v.into_owned());
        assert_eq!(redirect.as_deref(), Some("http://localhost:8080/"));
    }

    #[tokio::test]
    async fn test_auth_button_missing() {
        let server = Server::new_async().await;
        let config = Config::for_server(&server.url());
        let document = Document { auth: None, ..Document::default() };
        let mut page = DislikesPage::with_document(
            &config,
            Location::new(Url::parse("http://localhost:8080/").unwrap()),
            document,
        );

        page.dispatch(PageEvent::AuthButtonClicked).await.unwrap();
        assert!(!page.location().navigated());
    }
}
