use std::sync::Arc;

use log::info;
use rsvp_shared::config::AppConfig;

mod error;
mod handlers;
mod models;
mod routes;
mod state;

#[cfg(test)]
mod tests;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Arc::new(AppConfig::from_env()?);
    let router = routes::create_router(config.clone())?;

    info!("RSVP web service listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
