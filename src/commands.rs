//! Command handlers.
//!
//! Each page command opens the saved page as tab 1, sends one action request
//! through the messenger and prints the response as JSON.

use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use carryover_config::{Config, ConfigLoader, ConfigValidator};
use carryover_dom::Document;
use carryover_gateway::BackendGateway;
use carryover_protocols::{classify_tab, keys, ActionRequest, KeyValueStore, SiteId, TabKind};
use carryover_runtime::{ContentRouter, FileStore, Messenger, SharedPage, TabId};
use parking_lot::Mutex;
use tracing::{info, warn};

use crate::cli::{Commands, PageArgs};

/// Tab the saved page is opened in.
const PAGE_TAB: TabId = 1;

/// Tab the scraped source page notionally lives in.
const SOURCE_TAB: TabId = 2;

type CliResult = Result<(), Box<dyn Error>>;

/// Load and validate the configuration. A missing file means defaults.
pub(crate) fn load_config(path: &Path) -> Result<Config, Box<dyn Error>> {
    let config = ConfigLoader::load_or_default(path)?;
    for warning in ConfigValidator::validate(&config).into_result()? {
        warn!("config {}: {}", warning.path, warning.message);
    }
    Ok(config)
}

pub(crate) async fn run(command: Commands, config: Config) -> CliResult {
    let store_path = ConfigLoader::expand_path(&config.storage.path);
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(store_path));

    match command {
        Commands::Extract { page, summarize } => {
            let site = resolve_site(&page.url)?;
            let request = if summarize {
                ActionRequest::ExtractConversation {
                    hostname: Some(hostname(&page.url)),
                }
            } else {
                ActionRequest::Extract {
                    site: Some(site.as_str().to_string()),
                }
            };
            dispatch(&config, store, &page, request, None).await
        }
        Commands::Inject { page, out } => {
            let site = resolve_site(&page.url)?;
            let request = ActionRequest::Inject {
                site: Some(site.as_str().to_string()),
            };
            dispatch(&config, store, &page, request, out.as_deref()).await
        }
        Commands::InjectContext { page, out } => {
            resolve_site(&page.url)?;
            let request = ActionRequest::InjectContext {
                hostname: Some(hostname(&page.url)),
            };
            dispatch(&config, store, &page, request, out.as_deref()).await
        }
        Commands::AddContext {
            page,
            source,
            summarize,
            word_limit,
            out,
        } => {
            resolve_site(&page.url)?;
            match classify_tab(&source) {
                None => return Err(format!("cannot scrape browser-internal page {}", source).into()),
                Some(TabKind::ChatSite(site)) => {
                    warn!("source {} is itself a {} page", source, site.display_name())
                }
                Some(TabKind::Other) => {}
            }
            let request = ActionRequest::AddContext {
                hostname: Some(hostname(&page.url)),
                url: Some(source),
                source_tab_id: Some(SOURCE_TAB),
                summarize: Some(summarize),
                word_limit,
            };
            dispatch(&config, store, &page, request, out.as_deref()).await
        }
        Commands::SaveContext { text } => {
            let page = Arc::new(Mutex::new(Document::new()));
            let request = ActionRequest::SaveContext { text };
            send(&config, store, page, request).await
        }
        Commands::Show => {
            let mut state = serde_json::Map::new();
            for key in [keys::CONVERSATION, keys::USER_CONTEXT] {
                let value = store.get(key).await?;
                state.insert(key.to_string(), value.map_or(serde_json::Value::Null, Into::into));
            }
            println!("{}", serde_json::to_string_pretty(&state)?);
            Ok(())
        }
    }
}

/// Load the page, run `request` against it and optionally save the result.
async fn dispatch(
    config: &Config,
    store: Arc<dyn KeyValueStore>,
    page: &PageArgs,
    request: ActionRequest,
    out: Option<&Path>,
) -> CliResult {
    let html = tokio::fs::read_to_string(&page.page).await?;
    let document: SharedPage = Arc::new(Mutex::new(Document::parse_html(&html)));
    info!("Loaded {} ({} nodes)", page.page.display(), document.lock().len());

    send(config, store, document.clone(), request).await?;

    if let Some(out) = out {
        let html = document.lock().to_html()?;
        tokio::fs::write(out, html).await?;
        info!("Wrote edited page to {}", out.display());
    }
    Ok(())
}

/// Deliver one request to a fresh tab and print its response.
async fn send(
    config: &Config,
    store: Arc<dyn KeyValueStore>,
    page: SharedPage,
    request: ActionRequest,
) -> CliResult {
    let gateway = Arc::new(BackendGateway::new(&config.gateway)?);
    let router = ContentRouter::from_config(config, page, store, gateway);

    let messenger = Messenger::new(&config.router);
    messenger.open_tab(PAGE_TAB, router);
    let response = messenger.request(PAGE_TAB, &request).await?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    if !response.success {
        return Err(response.message.into());
    }
    Ok(())
}

fn resolve_site(url: &str) -> Result<SiteId, Box<dyn Error>> {
    match classify_tab(url) {
        Some(TabKind::ChatSite(site)) => Ok(site),
        Some(TabKind::Other) => Err(format!("{} is not a supported chat site", url).into()),
        None => Err(format!("{} is a browser-internal page", url).into()),
    }
}

/// Host part of `url`, or the raw string when it is not a URL.
fn hostname(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string))
        .unwrap_or_else(|| url.trim().to_string())
}
