use std::sync::Arc;
use zen_chatbot::{build_router, config::AppConfig, db, rag::AnswerPipeline, AppState};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_logging().expect("Failed to initialize logging");

    let config = AppConfig::from_env();

    let db_pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool.");

    // Index the institute website once, before accepting requests
    let pipeline = AnswerPipeline::initialize(&config).await;

    if !std::path::Path::new(&config.static_dir).is_dir() {
        tracing::warn!("Static directory '{}' not found; /static will return 404", config.static_dir);
    }

    let shared_state = Arc::new(AppState {
        db_pool: db_pool.clone(),
        pipeline: Arc::new(pipeline),
    });

    let app = build_router(shared_state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .expect("Failed to bind listener");
    tracing::info!("listening on {}", listener.local_addr().expect("local address"));

    if let Err(e) = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    {
        tracing::error!("Server error: {}", e);
    }

    db_pool.close().await;
    tracing::info!("Shutdown complete");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections...");
}

fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            "debug,zen_chatbot=trace,sqlx=info,reqwest=info,hyper=info,tower=info,h2=info".to_string()
        } else {
            "info,zen_chatbot=info,sqlx=warn,reqwest=warn,hyper=warn,tower=warn,h2=warn".to_string()
        }
    });

    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&log_level))?;

    let fmt_layer = if std::env::var("LOG_FORMAT").as_deref() == Ok("json") {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_target(true)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };

    tracing_subscriber::registry().with(env_filter).with(fmt_layer).try_init()?;

    tracing::info!("Zen chatbot backend starting up...");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Build mode: {}", if cfg!(debug_assertions) { "development" } else { "production" });
    tracing::info!("Log level: {}", log_level);

    let configured = |key: &str| std::env::var(key).map(|v| !v.is_empty()).unwrap_or(false);
    tracing::info!(
        "Configuration - Database: {}, Gemini: {}, Voyage: {}, Qdrant: {}",
        if configured("DATABASE_URL") { "custom" } else { "default" },
        if configured("GOOGLE_API_KEY") || configured("GEMINI_API_KEY") { "✅" } else { "❌" },
        if configured("VOYAGEAI_API_KEY") { "✅" } else { "❌" },
        if configured("QDRANT_URL") { "✅" } else { "❌" }
    );

    Ok(())
}
