pub mod dashboards;
pub mod domain;
pub mod handlers;
pub mod projections;
pub mod shared;
pub mod system;
pub mod usecases;

use std::sync::Arc;

const TASK_WORKER_INTERVAL_SECONDS: u64 = 30;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use axum::middleware::{self, Next};
    use axum::response::Response;
    use axum::{
        routing::{get, post},
        Router,
    };
    use std::net::SocketAddr;
    use tokio::net::TcpListener;
    use tower_http::cors::{Any, CorsLayer};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = std::path::Path::new("target").join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file_path = log_dir.join("backend.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| {
                // Keep application logs, silence SQL statement logs
                "info,sqlx=warn,sea_orm=warn".into()
            }),
        ))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Arc::new(log_file))
                .with_ansi(false),
        )
        .init();

    // Simple request logging middleware
    async fn request_logger(req: Request<Body>, next: Next) -> Response {
        let start = std::time::Instant::now();
        let method = req.method().clone();
        let uri = req.uri().clone();

        let response = next.run(req).await;

        let duration = start.elapsed();
        tracing::info!(
            "{} {} -> {} ({}ms)",
            method,
            uri.path(),
            response.status().as_u16(),
            duration.as_millis()
        );
        response
    }

    let config = shared::config::init()?;
    let db_path = shared::config::get_database_path(config)?;
    shared::data::db::initialize_database(Some(&db_path.to_string_lossy()))
        .await
        .map_err(|e| anyhow::anyhow!("db init failed: {e}"))?;

    // Ensure admin user exists
    system::initialization::ensure_admin_user_exists().await?;

    // Scheduled task worker: the registry shares the executors behind the
    // HTTP use-case endpoints, so task and API sessions are visible together
    let mut registry = system::tasks::registry::TaskManagerRegistry::new();
    registry.register(system::tasks::managers::CollectCatalogManager::new(Arc::clone(
        &handlers::usecases::COLLECT_EXECUTOR,
    )));
    registry.register(system::tasks::managers::RegisterListingsManager::new(Arc::clone(
        &handlers::usecases::REGISTER_EXECUTOR,
    )));
    registry.register(system::tasks::managers::ImportOrdersManager::new(Arc::clone(
        &handlers::usecases::IMPORT_ORDERS_EXECUTOR,
    )));
    registry.register(system::tasks::managers::ProcessOrdersManager::new(Arc::clone(
        &handlers::usecases::PROCESS_ORDERS_EXECUTOR,
    )));
    registry.register(system::tasks::managers::RunSettlementManager::new(Arc::clone(
        &handlers::usecases::SETTLEMENT_EXECUTOR,
    )));

    let worker = system::tasks::worker::ScheduledTaskWorker::new(
        Arc::new(registry),
        Arc::new(system::tasks::logger::TaskLogger::new()),
        TASK_WORKER_INTERVAL_SECONDS,
    );
    tokio::spawn(async move {
        worker.run_loop().await;
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION]);

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // SYSTEM AUTH ROUTES
        // ========================================
        .route(
            "/api/system/auth/login",
            post(system::handlers::auth::login),
        )
        .route(
            "/api/system/auth/refresh",
            post(system::handlers::auth::refresh),
        )
        .route(
            "/api/system/auth/logout",
            post(system::handlers::auth::logout)
                .layer(middleware::from_fn(system::auth::middleware::require_auth)),
        )
        .route(
            "/api/system/auth/me",
            get(system::handlers::auth::current_user)
                .layer(middleware::from_fn(system::auth::middleware::require_auth)),
        )
        // System users management (admin only)
        .route(
            "/api/system/users",
            get(system::handlers::users::list)
                .post(system::handlers::users::create)
                .layer(middleware::from_fn(system::auth::middleware::require_admin)),
        )
        .route(
            "/api/system/users/:id",
            get(system::handlers::users::get_by_id)
                .put(system::handlers::users::update)
                .delete(system::handlers::users::delete)
                .layer(middleware::from_fn(system::auth::middleware::require_admin)),
        )
        .route(
            "/api/system/users/:id/change-password",
            post(system::handlers::users::change_password)
                .layer(middleware::from_fn(system::auth::middleware::require_auth)),
        )
        // ========================================
        // BUSINESS ROUTES
        // ========================================
        .route(
            "/api/supplier",
            get(handlers::a001_supplier::list_all).post(handlers::a001_supplier::upsert),
        )
        .route(
            "/api/supplier/:id",
            get(handlers::a001_supplier::get_by_id).delete(handlers::a001_supplier::delete),
        )
        .route(
            "/api/supplier_product",
            get(handlers::a002_supplier_product::list),
        )
        .route(
            "/api/supplier_product/:id",
            get(handlers::a002_supplier_product::get_by_id)
                .delete(handlers::a002_supplier_product::delete),
        )
        .route(
            "/api/marketplace",
            get(handlers::a003_marketplace::list_all).post(handlers::a003_marketplace::upsert),
        )
        .route(
            "/api/marketplace/:id",
            get(handlers::a003_marketplace::get_by_id).delete(handlers::a003_marketplace::delete),
        )
        .route(
            "/api/connection_mp",
            get(handlers::a004_connection_mp::list_all).post(handlers::a004_connection_mp::upsert),
        )
        .route(
            "/api/connection_mp/:id",
            get(handlers::a004_connection_mp::get_by_id)
                .delete(handlers::a004_connection_mp::delete),
        )
        .route(
            "/api/connection_mp/test",
            post(handlers::a004_connection_mp::test_connection),
        )
        .route(
            "/api/listing",
            get(handlers::a005_listing::list_all).post(handlers::a005_listing::upsert),
        )
        .route(
            "/api/listing/:id",
            get(handlers::a005_listing::get_by_id).delete(handlers::a005_listing::delete),
        )
        .route("/api/listing/:id/queue", post(handlers::a005_listing::queue))
        .route("/api/order", get(handlers::a006_sales_order::list))
        .route("/api/order/:id", get(handlers::a006_sales_order::get_by_id))
        .route(
            "/api/order/:id/release-hold",
            post(handlers::a006_sales_order::release_hold),
        )
        .route(
            "/api/order/:id/cancel",
            post(handlers::a006_sales_order::cancel),
        )
        .route(
            "/api/purchase_order",
            get(handlers::a007_purchase_order::list),
        )
        .route(
            "/api/purchase_order/:id",
            get(handlers::a007_purchase_order::get_by_id),
        )
        .route("/api/settlement", get(handlers::a008_settlement::list_all))
        .route(
            "/api/settlement/:id",
            get(handlers::a008_settlement::get_by_id),
        )
        .route(
            "/api/settlement/:id/confirm",
            post(handlers::a008_settlement::confirm),
        )
        .route(
            "/api/settlement/:id/export",
            get(handlers::a008_settlement::export_csv),
        )
        .route(
            "/api/margin_rule",
            get(handlers::a009_margin_rule::list_all).post(handlers::a009_margin_rule::upsert),
        )
        .route(
            "/api/margin_rule/:id",
            get(handlers::a009_margin_rule::get_by_id).delete(handlers::a009_margin_rule::delete),
        )
        .route(
            "/api/notification",
            get(handlers::a010_notification::list_recent),
        )
        // UseCase u501: collect supplier catalog
        .route(
            "/api/u501/collect/start",
            post(handlers::usecases::u501_start_collect),
        )
        .route(
            "/api/u501/collect/:session_id/progress",
            get(handlers::usecases::u501_get_progress),
        )
        // UseCase u502: register listings
        .route(
            "/api/u502/register/start",
            post(handlers::usecases::u502_start_register),
        )
        .route(
            "/api/u502/register/:session_id/progress",
            get(handlers::usecases::u502_get_progress),
        )
        // UseCase u503: import orders
        .route(
            "/api/u503/orders/start",
            post(handlers::usecases::u503_start_import),
        )
        .route(
            "/api/u503/orders/:session_id/progress",
            get(handlers::usecases::u503_get_progress),
        )
        // UseCase u504: process orders
        .route(
            "/api/u504/process/start",
            post(handlers::usecases::u504_start_process),
        )
        .route(
            "/api/u504/process/:session_id/progress",
            get(handlers::usecases::u504_get_progress),
        )
        // UseCase u505: run settlement
        .route(
            "/api/u505/settlement/start",
            post(handlers::usecases::u505_start_settlement),
        )
        .route(
            "/api/u505/settlement/:session_id/progress",
            get(handlers::usecases::u505_get_progress),
        )
        // Projections and dashboards
        .route(
            "/api/p900/profit-register",
            get(handlers::p900_profit_register::list),
        )
        .route(
            "/api/p900/stats/by-date",
            get(handlers::p900_profit_register::stats_by_date),
        )
        .route(
            "/api/p900/stats/by-marketplace",
            get(handlers::p900_profit_register::stats_by_marketplace),
        )
        .route(
            "/api/d400/monthly_summary",
            get(handlers::d400_monthly_summary::get_monthly_summary),
        )
        // Scheduled tasks
        .route(
            "/api/sys/tasks",
            get(handlers::sys_tasks::list_all).post(handlers::sys_tasks::create),
        )
        .route(
            "/api/sys/tasks/:id",
            get(handlers::sys_tasks::get_by_id)
                .put(handlers::sys_tasks::update)
                .delete(handlers::sys_tasks::delete),
        )
        .route(
            "/api/sys/tasks/:id/toggle",
            post(handlers::sys_tasks::toggle),
        )
        // Logs
        .route(
            "/api/logs",
            get(handlers::logs::list_all)
                .post(handlers::logs::create)
                .delete(handlers::logs::clear_all),
        )
        .layer(middleware::from_fn(request_logger))
        .layer(cors);

    let addr: SocketAddr = ([0, 0, 0, 0], config.server.port).into();
    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Port {} is already in use. Stop the other process or change server.port in config.toml.",
                    config.server.port
                );
            } else {
                tracing::error!("Failed to bind to port {}. Error: {}", config.server.port, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
