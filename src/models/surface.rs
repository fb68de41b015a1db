//! Option price surface
//!
//! A dense matrix of theoretical option values over the stock price and
//! transformed time-to-expiry axes, together with the inputs it came from.

use crate::error::{Result, SurfaceError};
use crate::models::grid::GridSpec;
use crate::models::market::MarketParameters;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Option price surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSurface {
    /// Parameters the surface was evaluated with
    pub parameters: MarketParameters,
    /// Grid bounds and resolution
    pub grid: GridSpec,
    /// Stock price axis (rows)
    pub stock_prices: Array1<f64>,
    /// Transformed time-to-expiry axis (columns)
    pub taus: Array1<f64>,
    /// Option values (2D array: stock prices x taus)
    pub prices: Array2<f64>,
}

impl PriceSurface {
    pub(crate) fn new(
        parameters: MarketParameters,
        grid: GridSpec,
        stock_prices: Array1<f64>,
        taus: Array1<f64>,
        prices: Array2<f64>,
    ) -> Self {
        Self {
            parameters,
            grid,
            stock_prices,
            taus,
            prices,
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        self.prices.dim()
    }

    pub fn value(&self, price_idx: usize, tau_idx: usize) -> Option<f64> {
        self.prices.get([price_idx, tau_idx]).copied()
    }

    /// Values across tau for one stock price: (taus, prices)
    pub fn slice_by_price(&self, price_idx: usize) -> Result<(Array1<f64>, Array1<f64>)> {
        if price_idx >= self.stock_prices.len() {
            return Err(SurfaceError::InvalidParameter(format!(
                "price index {} out of range (surface has {} prices)",
                price_idx,
                self.stock_prices.len()
            )));
        }

        let values = self.prices.slice(ndarray::s![price_idx, ..]).to_owned();
        Ok((self.taus.clone(), values))
    }

    /// Values across stock price for one tau: (stock prices, prices)
    pub fn slice_by_time(&self, tau_idx: usize) -> Result<(Array1<f64>, Array1<f64>)> {
        if tau_idx >= self.taus.len() {
            return Err(SurfaceError::InvalidParameter(format!(
                "tau index {} out of range (surface has {} time steps)",
                tau_idx,
                self.taus.len()
            )));
        }

        let values = self.prices.slice(ndarray::s![.., tau_idx]).to_owned();
        Ok((self.stock_prices.clone(), values))
    }

    pub fn min_value(&self) -> f64 {
        self.prices
            .iter()
            .filter(|v| v.is_finite())
            .fold(f64::INFINITY, |a, &b| a.min(b))
    }

    pub fn max_value(&self) -> f64 {
        self.prices
            .iter()
            .filter(|v| v.is_finite())
            .fold(f64::NEG_INFINITY, |a, &b| a.max(b))
    }

    pub fn is_finite(&self) -> bool {
        self.prices.iter().all(|v| v.is_finite())
    }

    /// Row-major copy for plotting libraries that want nested vectors.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.prices.outer_iter().map(|row| row.to_vec()).collect()
    }
}
