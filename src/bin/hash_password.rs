use dotenvy::dotenv;
use portfolio_backend::services::auth_service::AuthService;
use std::env;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hash_password=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let Ok(password) = env::var("ADMIN_PASSWORD") else {
        error!("❌ Missing environment variable: ADMIN_PASSWORD is required.");
        info!("Usage: ADMIN_PASSWORD=... cargo run --bin hash_password");
        std::process::exit(1);
    };

    let hash = AuthService::hash_password(&password)
        .map_err(|e| anyhow::anyhow!("failed to hash password: {}", e))?;

    info!("🔐 Set this as ADMIN_PASSWORD_HASH in your .env or deployment config:");
    println!("{}", hash);

    Ok(())
}
