//! Render a single Black-Scholes surface without starting the dashboard.

use bs_surface::config::Config;
use bs_surface::error::Result;
use bs_surface::models::{GridSpec, MarketParameters, OptionType};
use bs_surface::utils::{plot_price_profile, plot_price_surface, PricingSurfaceCalculator};
use bs_surface::webapp::routes::SurfaceDataResponse;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Heatmap of the whole surface
    Png,
    /// Price against stock price for one tau column
    Profile,
    /// Raw grid and values
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "render_surface", version, about = "Render a Black-Scholes price surface")]
struct Args {
    #[arg(long, default_value_t = 0.3)]
    interest_rate: f64,

    #[arg(long, default_value_t = 0.5)]
    volatility: f64,

    #[arg(long, default_value_t = 10.0)]
    strike: f64,

    #[arg(long, default_value = "Call")]
    option_type: OptionType,

    #[arg(long, env = "GRID_MIN_PRICE", default_value_t = 1.0)]
    min_price: f64,

    #[arg(long, env = "GRID_MAX_PRICE", default_value_t = 20.0)]
    max_price: f64,

    #[arg(long, env = "GRID_PRICE_STEPS", default_value_t = 100)]
    price_steps: usize,

    #[arg(long, env = "GRID_TIME_STEPS", default_value_t = 100)]
    time_steps: usize,

    #[arg(long, value_enum, default_value_t = OutputFormat::Png)]
    format: OutputFormat,

    /// Tau column used by `--format profile`
    #[arg(long, default_value_t = 0)]
    tau_index: usize,

    #[arg(short, long, default_value = "output/surface.png")]
    output: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::from_env()?;
    config.init_logging()?;

    let params = MarketParameters::new(
        args.interest_rate,
        args.volatility,
        args.strike,
        args.option_type,
    );
    let grid = GridSpec::new(args.min_price, args.max_price, args.price_steps, args.time_steps);

    let surface = PricingSurfaceCalculator::new(grid).compute(&params)?;
    info!(
        "Computed {} surface {:?}: values in [{:.4}, {:.4}]",
        params.option_type,
        surface.shape(),
        surface.min_value(),
        surface.max_value()
    );

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    match args.format {
        OutputFormat::Png => plot_price_surface(&surface, &args.output)?,
        OutputFormat::Profile => plot_price_profile(&surface, args.tau_index, &args.output)?,
        OutputFormat::Json => {
            let data = SurfaceDataResponse::from(&surface);
            std::fs::write(&args.output, serde_json::to_vec_pretty(&data)?)?;
        }
    }

    info!("Surface written to {:?}", args.output);

    Ok(())
}
