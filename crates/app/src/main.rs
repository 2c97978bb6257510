use migration::MigratorTrait;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "cashbook={level},server={level},ledger={level}",
            level = settings.app.level
        ))
        .init();

    let timezone = match settings.app.timezone.as_deref() {
        Some(name) => name
            .parse::<chrono_tz::Tz>()
            .map_err(|_| format!("invalid timezone: {name}"))?,
        None => chrono_tz::Tz::UTC,
    };

    let db = sea_orm::Database::connect(&settings.database.url).await?;
    migration::Migrator::up(&db, None).await?;

    let ledger = ledger::Ledger::builder()
        .database(db)
        .reporting_timezone(timezone)
        .build()?;

    let bind = settings.server.bind.unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", bind, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("cashbook ledger serving on {addr}");

    server::run_with_listener(ledger, listener).await?;

    Ok(())
}
