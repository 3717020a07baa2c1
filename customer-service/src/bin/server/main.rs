use std::sync::Arc;

use auth::Argon2CredentialStore;
use auth::Authenticator;
use customer_service::config::Config;
use customer_service::config::RegistryBackend;
use customer_service::domain::customer::ports::CustomerServicePort;
use customer_service::domain::customer::service::CustomerService;
use customer_service::inbound::http::router::create_router;
use customer_service::outbound::registries::InMemoryCustomerRegistry;
use customer_service::outbound::registries::PostgresCustomerRegistry;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "customer_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "customer-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        registry_backend = ?config.registry.backend,
        token_ttl_hours = config.jwt.expiration_hours,
        "Configuration loaded"
    );

    let credential_store = Arc::new(Argon2CredentialStore::new());

    let customer_service: Arc<dyn CustomerServicePort> = match config.registry.backend {
        RegistryBackend::Postgres => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .connect(&config.database.url)
                .await?;
            tracing::info!(
                max_connections = config.database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            let registry = Arc::new(PostgresCustomerRegistry::new(pg_pool));
            Arc::new(CustomerService::new(registry, credential_store))
        }
        RegistryBackend::InMemory => {
            tracing::warn!("Using in-memory registry; customers are lost on shutdown");
            let registry = Arc::new(InMemoryCustomerRegistry::new());
            Arc::new(CustomerService::new(registry, credential_store))
        }
    };

    let authenticator = Arc::new(Authenticator::new(
        config.jwt.secret.as_bytes(),
        chrono::Duration::hours(config.jwt.expiration_hours),
    ));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(customer_service, authenticator);
    axum::serve(http_listener, http_application).await?;

    tracing::info!("Server exited successfully");

    Ok(())
}
