use tracing::info;
use url::Url;

/// The address the page was loaded at. Navigating replaces it.
#[derive(Debug, Clone)]
pub struct Location {
    url: Url,
    navigated: bool,
}

impl Location {
    pub fn new(url: Url) -> Self {
        Location { url, navigated: false }
    }

    pub fn href(&self) -> &Url {
        &self.url
    }

    /// Fragment without the leading `#`; empty when there is none.
    pub fn hash(&self) -> &str {
        self.url.fragment().unwrap_or_default()
    }

    pub fn set_hash(&mut self, hash: &str) {
        if hash.is_empty() {
            self.url.set_fragment(None);
        } else {
            self.url.set_fragment(Some(hash));
        }
    }

    pub fn href_without_hash(&self) -> Url {
        let mut url = self.url.clone();
        url.set_fragment(None);
        url
    }

    /// Full navigation away from the page.
    pub fn assign(&mut self, url: Url) {
        info!(target_url = %url, "navigating");
        self.url = url;
        self.navigated = true;
    }

    /// Whether the page has navigated away since it was loaded.
    pub fn navigated(&self) -> bool {
        self.navigated
    }
}
