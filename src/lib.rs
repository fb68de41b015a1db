//! # bs-surface
//!
//! Closed-form Black-Scholes option price surfaces, served through an
//! interactive web dashboard.
//!
//! ## Features
//!
//! - Option value over a (stock price x transformed time-to-expiry) grid
//! - Input validation with descriptive errors
//! - Plotly figures and raw JSON for the dashboard
//! - PNG heatmaps and price profiles via plotters
//! - Environment-based configuration
//!
//! ## Example
//!
//! ```rust,no_run
//! use bs_surface::models::{GridSpec, MarketParameters, OptionType};
//! use bs_surface::utils::{plot_price_surface, PricingSurfaceCalculator};
//!
//! fn main() -> bs_surface::error::Result<()> {
//!     let calculator = PricingSurfaceCalculator::new(GridSpec::default());
//!     let params = MarketParameters::new(0.3, 0.5, 10.0, OptionType::Call);
//!
//!     let surface = calculator.compute(&params)?;
//!     assert_eq!(surface.shape(), (100, 100));
//!
//!     plot_price_surface(&surface, "call_surface.png")?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod utils;
pub mod webapp;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, SurfaceError};
pub use models::{GridSpec, MarketParameters, OptionType, PriceSurface};
pub use utils::{compute_surface, PricingSurfaceCalculator};
