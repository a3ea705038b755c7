use course_search::config::{EngineKind, Settings, USAGE};
use course_search::engine::SearchEngine;
use course_search::engine::elastic::ElasticEngine;
use course_search::engine::memory::MemoryEngine;
use course_search::ingestion::loader;
use course_search::search::handlers::router;
use course_search::search::service::CourseSearchService;
use course_search::search::suggest::SuggestionService;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let settings = match Settings::load(std::env::args().skip(1)) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{:#}", e);
            eprintln!("{}", USAGE);
            std::process::exit(1);
        }
    };
    tracing::debug!("Settings: {:?}", settings);

    // 1. Search engine:
    let engine: Arc<dyn SearchEngine> = match settings.engine {
        EngineKind::Memory => {
            tracing::info!("Using in-process search engine");
            Arc::new(MemoryEngine::new())
        }
        EngineKind::Elastic => {
            tracing::info!(
                "Using Elasticsearch at {} (index '{}')",
                settings.elastic_url,
                settings.index_name
            );
            Arc::new(ElasticEngine::new(
                &settings.elastic_url,
                &settings.index_name,
                settings.engine_timeout,
            )?)
        }
    };

    // 2. Seed data:
    match &settings.data_path {
        Some(path) => {
            loader::load_file(engine.as_ref(), path).await?;
        }
        None => tracing::info!("No course data configured, starting with an empty index"),
    }

    // 3. Services and HTTP router:
    let service = Arc::new(CourseSearchService::new(engine.clone()));
    let suggestions = Arc::new(SuggestionService::new(engine));
    let app = router(service, suggestions, settings.request_limits());

    // 4. Start HTTP server:
    tracing::info!("HTTP server listening on {}", settings.bind_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(settings.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
        })
        .await?;

    Ok(())
}
