mod app;
mod auth;
mod config;
mod errors;
mod models;
mod page;
mod youtube;

use std::env;
use std::path::Path;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use app::{DislikesPage, PageEvent};
use config::{Config, LogFormat};
use errors::YouTubeError;
use page::Location;

fn init_logging(format: LogFormat) -> WorkerGuard {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "youtube_dislikes=info,warn".into());

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(true).with_writer(writer))
            .init(),
    }
    guard
}

async fn write_output(html: &str, output: Option<&Path>) -> std::io::Result<()> {
    match output {
        Some(path) => {
            tokio::fs::write(path, html).await?;
            info!(path = %path.display(), "page written");
            Ok(())
        }
        None => {
            print!("{}", html);
            Ok(())
        }
    }
}

#[derive(Debug)]
enum LoadOutcome {
    /// No session; the page navigated to the provider's consent screen.
    Authorize(Url),
    Rendered(String),
}

/// Loads the page, optionally follows "Next Page" to the end, and reports
/// either the authorization URL or the rendered document.
async fn load_page(page: &mut DislikesPage, all_pages: bool) -> Result<LoadOutcome, YouTubeError> {
    if let Err(e) = page.dispatch(PageEvent::DomReady).await {
        warn!(error = %e, "loading disliked videos failed");
    }

    while all_pages && page.has_next_page() {
        if let Err(e) = page.dispatch(PageEvent::NextPageClicked).await {
            warn!(error = %e, "loading next page failed");
            break;
        }
    }

    if !page.session().is_authenticated() {
        page.dispatch(PageEvent::AuthButtonClicked).await?;
        if page.location().navigated() {
            return Ok(LoadOutcome::Authorize(page.location().href().clone()));
        }
    }

    Ok(LoadOutcome::Rendered(page.document().to_html()))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let _guard = init_logging(config.log_format);

    let page_url = match env::args().nth(1) {
        Some(arg) => match Url::parse(&arg) {
            Ok(url) => url,
            Err(e) => {
                error!(url = %arg, error = %e, "page URL is not a valid URL");
                return ExitCode::FAILURE;
            }
        },
        None => config.page_url.clone(),
    };

    let mut page = DislikesPage::new(&config, Location::new(page_url));

    match load_page(&mut page, config.all_pages).await {
        Ok(LoadOutcome::Authorize(url)) => {
            println!("Open this URL to authorize, then run again with the URL you are sent back to:");
            println!("{}", url);
        }
        Ok(LoadOutcome::Rendered(html)) => {
            if let Err(e) = write_output(&html, config.output.as_deref()).await {
                error!(error = %e, "could not write page");
                return ExitCode::FAILURE;
            }
        }
        Err(e) => {
            error!(error = %e, "could not build authorization URL");
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}
