use techmart_storefront::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    seed::{self, DEMO_USERNAME},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let database_url = AppConfig::database_url_from_env();
    let orm = create_orm_conn(&database_url).await?;
    // Ensure the schema exists before inserting.
    run_migrations(&orm).await?;
    seed::seed(&orm).await?;

    tracing::info!(user = DEMO_USERNAME, "seed completed");
    Ok(())
}
