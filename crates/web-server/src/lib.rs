use axum::{
    routing::{get, post},
    Router,
};
use configuration::Config;
use database::{DbRepository, TradeStore};
use ledger::LedgerEngine;
use market_data::{HttpPriceOracle, PriceOracle};
use portfolio::PortfolioProjector;
use rust_decimal::Decimal;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer, ExposeHeaders},
    trace::TraceLayer,
};

pub mod error;
pub mod extract;
pub mod handlers;

/// The shared application state that all handlers can access.
///
/// Handlers hold the core components; none of them touch SQL or the quote
/// provider directly.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<LedgerEngine>,
    pub projector: Arc<PortfolioProjector>,
    pub store: Arc<dyn TradeStore>,
    pub oracle: Arc<dyn PriceOracle>,
    pub starting_cash: Decimal,
}

/// The main function to configure and run the web server.
pub async fn run_server(addr: SocketAddr, config: Config) -> anyhow::Result<()> {
    // Note: Tracing is initialized by the binary entry point, not here.

    dotenvy::dotenv().ok();
    let db_pool = database::connect().await?;
    database::run_migrations(&db_pool).await?;

    let store: Arc<dyn TradeStore> = Arc::new(DbRepository::new(db_pool));
    let oracle: Arc<dyn PriceOracle> = Arc::new(HttpPriceOracle::new(&config.oracle)?);

    let app_state = Arc::new(AppState {
        engine: Arc::new(LedgerEngine::new(store.clone(), oracle.clone())),
        projector: Arc::new(PortfolioProjector::new(store.clone(), oracle.clone())),
        store,
        oracle,
        starting_cash: config.accounts.starting_cash,
    });

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any())
        .expose_headers(ExposeHeaders::any());

    // --- DEFINE THE APPLICATION ROUTES ---
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/accounts", post(handlers::create_account))
        .route("/api/quote/:symbol", get(handlers::quote))
        .route("/api/buy", post(handlers::buy))
        .route("/api/sell", post(handlers::sell))
        .route("/api/holdings", get(handlers::holdings))
        .route("/api/portfolio/value", get(handlers::portfolio_value))
        .route("/api/history", get(handlers::history))
        .with_state(app_state)
        .layer(cors)
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http());

    tracing::info!("Web server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
