//! Search binary entry point

use std::path::PathBuf;

use clap::Parser;

use search::{
    FetchCoordinator, PaginationMode, RealResultCache, RealSearchApi, SearchParams, SearchSession, SortOrder,
};
use shared::logging::{init_tracing_with_level, log_error, log_startup, log_success, ComponentId};
use shared::{ClientConfig, FileStore};

#[derive(Parser)]
#[command(name = "search")]
#[command(about = "Course search against the marketplace API")]
struct Args {
    /// Raw URL query, e.g. "vertical=study-abroad&q=data&country=uk&intake=fall"
    #[arg(long, default_value = "")]
    query_string: String,

    /// Page to show
    #[arg(long, default_value_t = 1)]
    page: i64,

    /// Marketplace API base URL (overrides COURSE_API_BASE_URL)
    #[arg(long)]
    api_base_url: Option<String>,

    /// Directory of the durable store (overrides CLIENT_CACHE_DIR)
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Log level (overrides LOG_LEVEL)
    #[arg(long)]
    log_level: Option<String>,

    /// Static dataset for client-driven verticals (JSON array of universities)
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Sort order for client-driven verticals
    #[arg(long)]
    sort: Option<SortOrder>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = ClientConfig::from_env()?;
    if let Some(url) = args.api_base_url {
        config.api_base_url = url.trim_end_matches('/').to_string();
    }
    if let Some(dir) = args.cache_dir {
        config.cache_dir = dir;
    }
    if let Some(level) = args.log_level {
        config.log_level = level;
    }

    let component = ComponentId::init_search();
    init_tracing_with_level(Some(&config.log_level));
    log_startup(component, &format!("api={} cache={}", config.api_base_url, config.cache_dir.display()));

    let params = SearchParams::from_query_string(&args.query_string)?;

    // Create service implementations
    let cache = RealResultCache::new(FileStore::new(&config.cache_dir));
    let api = RealSearchApi::new(&config.api_base_url, config.request_timeout())?;
    let coordinator = FetchCoordinator::new(api, cache, config.debounce());

    let mut session = SearchSession::new(&params, coordinator, config.page_size);
    if let Some(sort) = args.sort {
        session.set_sort(sort);
    }
    if let Some(path) = args.dataset {
        let raw = tokio::fs::read_to_string(&path).await?;
        let universities: Vec<serde_json::Value> = serde_json::from_str(&raw)?;
        session.load_static_dataset(&universities);
    }

    if session.mount().await?.is_some() {
        println!("(showing cached results while refreshing)");
    }

    if session.mode() == PaginationMode::ServerDriven {
        if let Err(e) = session.refresh().await {
            log_error(component, "Search request", &e);
        }
    }
    if args.page != 1 {
        session.change_page(args.page).await;
        if session.mode() == PaginationMode::ServerDriven {
            session.refresh().await?;
        }
    }

    let view = session.view().await;
    if let Some(error) = &view.error {
        println!("Search failed: {error}");
    }
    println!("{}", view.summary);
    for listing in &view.items {
        println!(
            "{:<40} {:<36} {:<28} {:>16} {:>6}",
            listing.course_name,
            listing.university_name,
            listing.location,
            listing.fee_display(),
            listing.ranking_display()
        );
    }
    let strip: Vec<String> = view.page_numbers.iter().map(ToString::to_string).collect();
    println!("Pages: {}", strip.join(" "));

    session.shutdown();
    log_success(component, "Search finished");
    Ok(())
}
