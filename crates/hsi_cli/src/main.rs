use clap::Parser;
use hsi_core::{KeyValueStore, SearchClient, SummarizationModel};
use hsi_news::{init_logging, LatestNews, NewsAggregator, NewsConfig, PostingJob, SiteScraper};
use hsi_search::{BingSearch, SearchConfig};
use hsi_storage::BlogRepository;
use hsi_web::{create_app, AppState};
use std::sync::Arc;
use tracing::info;

mod config;

use config::Settings;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[arg(long, env = "HSI_STORAGE", default_value = "memory", help = "Key-value backend: memory (default), sqlite")]
    storage: String,
    #[arg(long, env = "HSI_DATABASE_URL")]
    backend_url: Option<String>,
    #[arg(long, default_value = "openai", help = "Model to use for generation. Available models: openai (default), dummy")]
    model: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API
    Serve {
        #[arg(long, env = "HSI_ADDR", default_value = "0.0.0.0:3000")]
        addr: String,
    },
    /// Print the aggregated news feed as JSON
    News,
    /// Write today's staggered news posts to the journal
    Schedule {
        #[arg(long, default_value_t = hsi_news::config::DEFAULT_POSTS_PER_DAY)]
        posts: u8,
    },
    /// Snapshot a domain's indexed pages
    Scrape {
        /// Full URL of the site, e.g. https://example.com
        domain: String,
    },
    /// Refresh the stored latest-news digest
    Refresh,
}

struct Services {
    store: Arc<dyn KeyValueStore>,
    search: Arc<dyn SearchClient>,
    model: Arc<dyn SummarizationModel>,
}

async fn build_services(cli: &Cli, settings: &Settings) -> anyhow::Result<Services> {
    let store = hsi_storage::create_store(cli.storage.as_str(), cli.backend_url.as_deref()).await?;

    let search: Arc<dyn SearchClient> = Arc::new(BingSearch::new(SearchConfig {
        api_key: settings.bing_api_key.clone(),
        ..Default::default()
    }));

    let model = hsi_inference::models::create_model(Some(hsi_inference::Config {
        provider: cli.model.clone(),
        api_key: settings.openai_api_key.clone(),
        organization: settings.openai_org_id.clone(),
        model_name: settings.openai_model.clone(),
        base_url: None,
    }))?;

    Ok(Services { store, search, model })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let logger = init_logging();
    let cli = Cli::parse();
    let settings = Settings::from_env()?;
    let services = build_services(&cli, &settings).await?;
    let news_config = Arc::new(NewsConfig::default());

    match &cli.command {
        Commands::Serve { addr } => {
            if settings.cron_secret.is_none() {
                logger.warn("CRON_SECRET is not set; /api/news/cron will reject every request");
            }
            let state = AppState::new(
                services.store,
                services.search,
                services.model,
                news_config,
                settings.cron_secret.clone(),
            );
            let app = create_app(state);
            let listener = tokio::net::TcpListener::bind(addr.as_str()).await?;
            info!("🚀 Server listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::News => {
            settings.require_search_key()?;
            let aggregator = NewsAggregator::new(services.search, services.model, services.store, news_config);
            let news = aggregator.fetch_news().await?;
            println!("{}", serde_json::to_string_pretty(&news)?);
        }
        Commands::Schedule { posts } => {
            settings.require_search_key()?;
            let repository = Arc::new(BlogRepository::new(services.store));
            let job = PostingJob::new(services.search, services.model, repository, news_config);
            for post in job.run(*posts).await? {
                println!("{}  {}", post.scheduled_time.to_rfc3339(), post.title);
            }
        }
        Commands::Scrape { domain } => {
            settings.require_search_key()?;
            let scraper = SiteScraper::new(services.search, services.model, services.store, news_config);
            let data = scraper.scrape(domain).await?;
            logger.info(&format!("Successfully processed {} pages", data.page_count));
        }
        Commands::Refresh => {
            settings.require_search_key()?;
            let latest = LatestNews::new(services.search, services.model, services.store, news_config);
            match latest.refresh().await? {
                0 => logger.info("No new articles found"),
                n => logger.info(&format!("Processed {} news articles", n)),
            }
        }
    }

    Ok(())
}
