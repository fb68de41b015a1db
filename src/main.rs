//! Dashboard server
//!
//! Loads configuration from the environment, then serves the Black-Scholes
//! surface dashboard until interrupted.

use bs_surface::config::Config;
use bs_surface::error::Result;
use bs_surface::webapp;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    config.init_logging()?;

    info!("Starting bs-surface dashboard v{}", bs_surface::VERSION);

    webapp::serve(config).await
}
