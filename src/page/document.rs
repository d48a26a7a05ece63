//! Typed view of the page's DOM. Elements the page may lack are `Option`s.

use std::fmt::Write;

#[derive(Debug, Clone, Default)]
pub struct AuthPanel {
    pub hidden: bool,
}

#[derive(Debug, Clone)]
pub struct NextPageControl {
    page_token: String,
    pub hidden: bool,
}

impl NextPageControl {
    pub fn new(page_token: impl Into<String>) -> Self {
        NextPageControl { page_token: page_token.into(), hidden: false }
    }

    pub fn page_token(&self) -> &str {
        &self.page_token
    }
}

#[derive(Debug, Clone)]
pub struct VideoList {
    pub hidden: bool,
    inner_html: String,
    next_page: Option<NextPageControl>,
}

impl Default for VideoList {
    fn default() -> Self {
        VideoList { hidden: true, inner_html: String::new(), next_page: None }
    }
}

impl VideoList {
    pub fn inner_html(&self) -> &str {
        &self.inner_html
    }

    pub fn append_html(&mut self, html: &str) {
        self.inner_html.push_str(html);
    }

    pub fn next_page(&self) -> Option<&NextPageControl> {
        self.next_page.as_ref()
    }

    pub fn next_page_mut(&mut self) -> Option<&mut NextPageControl> {
        self.next_page.as_mut()
    }

    pub fn set_next_page(&mut self, control: NextPageControl) {
        self.next_page = Some(control);
    }

    pub fn remove_next_page(&mut self) -> Option<NextPageControl> {
        self.next_page.take()
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    pub auth: Option<AuthPanel>,
    pub videos: Option<VideoList>,
}

impl Default for Document {
    /// The page as served: auth panel shown, empty result list hidden.
    fn default() -> Self {
        Document {
            auth: Some(AuthPanel::default()),
            videos: Some(VideoList::default()),
        }
    }
}

fn hidden_attr(hidden: bool) -> &'static str {
    if hidden { " hidden" } else { "" }
}

impl Document {
    pub fn to_html(&self) -> String {
        let mut html = String::from(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Disliked videos</title>\n</head>\n<body>\n",
        );

        if let Some(auth) = &self.auth {
            let _ = writeln!(
                html,
                "<div id=\"auth\"{}><button>Authorize</button></div>",
                hidden_attr(auth.hidden)
            );
        }

        if let Some(videos) = &self.videos {
            let _ = write!(html, "<div id=\"videos\"{}>", hidden_attr(videos.hidden));
            html.push_str(videos.inner_html());
            if let Some(next) = &videos.next_page {
                let _ = write!(html, "<p><button{}>Next Page</button></p>", hidden_attr(next.hidden));
            }
            html.push_str("</div>\n");
        }

        html.push_str("</body>\n</html>\n");
        html
    }
}
