//! Market inputs for a single surface evaluation
//!
//! The dashboard collects these from its controls on every interaction; the
//! slider bounds below are the ranges the page offers.

use crate::error::{Result, SurfaceError};
use crate::models::option::OptionType;
use serde::{Deserialize, Serialize};

/// Scalar financial parameters for one surface computation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketParameters {
    /// Risk-free interest rate
    pub interest_rate: f64,
    /// Annualized volatility, strictly positive
    pub volatility: f64,
    /// Strike price, strictly positive
    pub strike: f64,
    /// Call or put
    pub option_type: OptionType,
}

impl Default for MarketParameters {
    fn default() -> Self {
        Self {
            interest_rate: INTEREST_RATE_SLIDER.default,
            volatility: VOLATILITY_SLIDER.default,
            strike: STRIKE_SLIDER.default,
            option_type: OptionType::Call,
        }
    }
}

impl MarketParameters {
    pub fn new(interest_rate: f64, volatility: f64, strike: f64, option_type: OptionType) -> Self {
        Self {
            interest_rate,
            volatility,
            strike,
            option_type,
        }
    }

    /// Reject inputs that would hit the log or division singularities.
    pub fn validate(&self) -> Result<()> {
        if !self.interest_rate.is_finite() {
            return Err(SurfaceError::InvalidParameter(format!(
                "interest rate must be finite, got {}",
                self.interest_rate
            )));
        }

        if !self.volatility.is_finite() || self.volatility <= 0.0 {
            return Err(SurfaceError::InvalidParameter(format!(
                "volatility must be strictly positive, got {}",
                self.volatility
            )));
        }

        if !self.strike.is_finite() || self.strike <= 0.0 {
            return Err(SurfaceError::InvalidParameter(format!(
                "strike must be strictly positive, got {}",
                self.strike
            )));
        }

        Ok(())
    }

    /// Same parameters with the other option type.
    pub fn with_option_type(self, option_type: OptionType) -> Self {
        Self {
            option_type,
            ..self
        }
    }
}

/// Range control shown on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SliderSpec {
    pub id: &'static str,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default: f64,
    pub marks: &'static [f64],
}

pub const INTEREST_RATE_SLIDER: SliderSpec = SliderSpec {
    id: "interest_rate",
    label: "Interest Rate: r",
    min: 0.0,
    max: 0.5,
    step: 0.1,
    default: 0.3,
    marks: &[0.0, 0.1, 0.2, 0.3, 0.4, 0.5],
};

// Lower bound of 0 is kept; a zero volatility is rejected by `validate`.
pub const VOLATILITY_SLIDER: SliderSpec = SliderSpec {
    id: "volatility",
    label: "Volatility: sigma",
    min: 0.0,
    max: 1.0,
    step: 0.1,
    default: 0.5,
    marks: &[0.0, 0.2, 0.4, 0.6, 0.8, 1.0],
};

pub const STRIKE_SLIDER: SliderSpec = SliderSpec {
    id: "strike",
    label: "Strike Price: k",
    min: 5.0,
    max: 15.0,
    step: 1.0,
    default: 10.0,
    marks: &[5.0, 7.5, 10.0, 12.5, 15.0],
};

pub const SLIDERS: [SliderSpec; 3] = [INTEREST_RATE_SLIDER, VOLATILITY_SLIDER, STRIKE_SLIDER];
