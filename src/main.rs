//! `streamdl` command line: list catalog collections and download media.

use clap::{Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use futures::TryStreamExt;
use reqwest::Url;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use streamdl::catalog::{
    CatalogClient, CatalogConfig, Collection, SessionCredentials, DEFAULT_PAGE_SIZE,
};
use streamdl::downloader::DownloaderConfig;
use streamdl::{DownloadOutcome, DownloadRequest, DownloaderBuilder, MediaKind};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "streamdl", version, about)]
struct Cli {
    /// Directory downloads are saved to.
    #[arg(long, short = 'd', env = "STREAMDL_DIR", default_value = "downloads", global = true)]
    dir: PathBuf,

    /// Give up on a download after this many seconds.
    #[arg(long, env = "STREAMDL_TIMEOUT_SECS", global = true)]
    timeout_secs: Option<u64>,

    /// Retries for transient HTTP failures.
    #[arg(long, default_value_t = DownloaderConfig::DEFAULT_RETRIES, global = true)]
    retries: u32,

    /// Hide progress bars.
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Download a single URL.
    Get {
        url: Url,
        /// Title the file name is derived from. Defaults to the URL's file name.
        #[arg(long)]
        name: Option<String>,
        /// Media kind, which fixes the extension and MIME type.
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
    },
    /// Print one page of a collection.
    List {
        collection: Collection,
        #[command(flatten)]
        api: ApiArgs,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Download every item of a collection.
    Sync {
        collection: Collection,
        #[command(flatten)]
        api: ApiArgs,
        /// Downloads running at once.
        #[arg(long, short = 'j', default_value_t = DownloaderConfig::DEFAULT_CONCURRENT_DOWNLOADS)]
        jobs: usize,
        /// Replace files that already exist instead of numbering new ones.
        #[arg(long)]
        overwrite: bool,
    },
}

#[derive(Debug, Args)]
struct ApiArgs {
    /// Catalog API root.
    #[arg(long = "api", env = "STREAMDL_API_URL")]
    url: Url,
    /// Session token sent as a bearer token.
    #[arg(long, env = "STREAMDL_TOKEN", hide_env_values = true)]
    token: Option<String>,
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: u32,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Art,
    Sticker,
    Video,
}

impl From<KindArg> for MediaKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Art => MediaKind::Art,
            KindArg::Sticker => MediaKind::Sticker,
            KindArg::Video => MediaKind::Video,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("streamdl=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, cancelling downloads");
                cancel.cancel();
            }
        }
    });

    match cli.command {
        Command::Get {
            ref url,
            ref name,
            kind,
        } => get(&cli, url, name.as_deref(), kind, &cancel).await,
        Command::List {
            collection,
            ref api,
            page,
        } => list(&cli, collection, api, page).await,
        Command::Sync {
            collection,
            ref api,
            jobs,
            overwrite,
        } => sync(&cli, collection, api, jobs, overwrite, &cancel).await,
    }
}

fn downloader(cli: &Cli) -> DownloaderBuilder {
    let mut builder = if cli.quiet {
        DownloaderBuilder::hidden()
    } else {
        DownloaderBuilder::new()
    };
    builder = builder.directory(cli.dir.clone()).retries(cli.retries);
    if let Some(secs) = cli.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder
}

fn catalog(cli: &Cli, api: &ApiArgs) -> Result<CatalogClient> {
    let credentials = match &api.token {
        Some(token) => SessionCredentials::new(token.clone()),
        None => SessionCredentials::anonymous(),
    };
    let config = CatalogConfig::new(api.url.clone())
        .page_size(api.page_size)
        .retries(cli.retries);
    Ok(CatalogClient::new(config, Arc::new(credentials))?)
}

async fn get(
    cli: &Cli,
    url: &Url,
    name: Option<&str>,
    kind: Option<KindArg>,
    cancel: &CancellationToken,
) -> Result<()> {
    let request = match (name, kind) {
        (Some(name), Some(kind)) => DownloadRequest::for_media(url, name, kind.into()),
        (name, kind) => {
            let mut request = DownloadRequest::try_from(url)?;
            if let Some(name) = name {
                request.suggested_name = name.to_string();
            }
            if let Some(kind) = kind.map(MediaKind::from) {
                request.extension = Some(kind.extension().to_string());
                request = request.with_mime_type(kind.mime_type());
            }
            request
        }
    };

    let downloader = downloader(cli).build()?;
    let outcomes = downloader
        .download_many_with_cancel(std::slice::from_ref(&request), cancel)
        .await;
    report(&[request], &outcomes)
}

async fn list(cli: &Cli, collection: Collection, api: &ApiArgs, page: u32) -> Result<()> {
    let catalog = catalog(cli, api)?;
    let page = catalog
        .fetch_page(collection, page)
        .await
        .wrap_err_with(|| format!("Could not list {}", collection))?;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["ID", "Title", "File", "URL"]);
    for item in &page.items {
        table.add_row(vec![
            item.id.to_string(),
            item.title.clone(),
            item.to_request().file_name(),
            item.url.to_string(),
        ]);
    }
    println!("{table}");
    println!(
        "Page {}/{} ({} items{})",
        page.page,
        page.page_count,
        page.total.map_or_else(|| page.items.len().to_string(), |t| t.to_string()),
        if page.rejected > 0 {
            format!(", {} rejected", page.rejected)
        } else {
            String::new()
        }
    );
    Ok(())
}

async fn sync(
    cli: &Cli,
    collection: Collection,
    api: &ApiArgs,
    jobs: usize,
    overwrite: bool,
    cancel: &CancellationToken,
) -> Result<()> {
    let catalog = catalog(cli, api)?;
    let pages: Vec<_> = catalog
        .pages(collection)
        .try_collect()
        .await
        .wrap_err_with(|| format!("Could not list {}", collection))?;

    let requests: Vec<DownloadRequest> = pages
        .iter()
        .flat_map(|page| &page.items)
        .map(|item| item.to_request())
        .collect();
    info!("Syncing {} {} into {}", requests.len(), collection, cli.dir.display());

    let downloader = downloader(cli)
        .concurrent_downloads(jobs)
        .overwrite(overwrite)
        .build()?;
    let outcomes = downloader.download_many_with_cancel(&requests, cancel).await;
    report(&requests, &outcomes)
}

fn report(requests: &[DownloadRequest], outcomes: &[DownloadOutcome]) -> Result<()> {
    let mut failed = 0;
    for (request, outcome) in requests.iter().zip(outcomes) {
        match outcome {
            DownloadOutcome::Completed { saved_as, .. } => {
                println!("{} {}", console::style("saved").green(), saved_as.display());
            }
            DownloadOutcome::Failed { reason, .. } => {
                failed += 1;
                println!(
                    "{} {}: {}",
                    console::style("failed").red(),
                    request.file_name(),
                    reason
                );
            }
        }
    }

    if failed > 0 {
        return Err(eyre!("{} of {} downloads failed", failed, outcomes.len()));
    }
    Ok(())
}
