use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use greenlens::config::Args;
use greenlens::server::{self, AppContext};
use greenlens::{AppController, PlantStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("greenlens={},info", args.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    let store = PlantStore::open(&args.database_url)?;
    let controller = AppController::new(store, args.controller_settings()).into_shared();
    let identifier = Arc::new(args.identification_service());

    info!("Database: {}", args.database_url);
    info!(
        "Identification: {}",
        if identifier.has_remote() { "Gemini with catalog fallback" } else { "catalog only" }
    );
    info!("Listening on http://{}", args.listen);

    let api = server::routes(AppContext {
        controller,
        identifier,
        pacing: args.pacing(),
    });

    warp::serve(api).run(args.listen).await;

    Ok(())
}
