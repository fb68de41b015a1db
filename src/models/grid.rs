use crate::error::{Result, SurfaceError};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// First sample of the transformed time axis
pub const TAU_MIN: f64 = 0.01;
/// Last sample of the transformed time axis
pub const TAU_MAX: f64 = 1.0;

/// Bounds and resolution of the (stock price x tau) grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub min_price: f64,
    pub max_price: f64,
    pub price_steps: usize,
    pub max_time_steps: usize,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            min_price: 1.0,
            max_price: 20.0,
            price_steps: 100,
            max_time_steps: 100,
        }
    }
}

impl GridSpec {
    pub fn new(min_price: f64, max_price: f64, price_steps: usize, max_time_steps: usize) -> Self {
        Self {
            min_price,
            max_price,
            price_steps,
            max_time_steps,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.min_price.is_finite() || !self.max_price.is_finite() {
            return Err(SurfaceError::InvalidParameter(format!(
                "price bounds must be finite, got [{}, {}]",
                self.min_price, self.max_price
            )));
        }

        // ln(S/K) is undefined for S <= 0
        if self.min_price <= 0.0 {
            return Err(SurfaceError::InvalidParameter(format!(
                "minimum price must be strictly positive, got {}",
                self.min_price
            )));
        }

        if self.min_price >= self.max_price {
            return Err(SurfaceError::InvalidParameter(format!(
                "minimum price {} must be below maximum price {}",
                self.min_price, self.max_price
            )));
        }

        if self.price_steps == 0 {
            return Err(SurfaceError::InvalidParameter(
                "price steps must be positive".to_string(),
            ));
        }

        if self.max_time_steps == 0 {
            return Err(SurfaceError::InvalidParameter(
                "time steps must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// `price_steps` evenly spaced stock prices, both bounds included.
    pub fn price_axis(&self) -> Array1<f64> {
        Array1::linspace(self.min_price, self.max_price, self.price_steps)
    }

    /// `max_time_steps` evenly spaced tau values from 0.01 to 1.0 inclusive.
    pub fn tau_axis(&self) -> Array1<f64> {
        Array1::linspace(TAU_MIN, TAU_MAX, self.max_time_steps)
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.price_steps, self.max_time_steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_grid() {
        let grid = GridSpec::default();
        assert_eq!(grid.shape(), (100, 100));
        assert!(grid.validate().is_ok());
    }

    #[test]
    fn test_axes_include_both_bounds() {
        let grid = GridSpec::default();

        let prices = grid.price_axis();
        assert_eq!(prices.len(), 100);
        assert_relative_eq!(prices[0], 1.0);
        assert_relative_eq!(prices[99], 20.0, epsilon = 1e-12);
        assert_relative_eq!(prices[1] - prices[0], 19.0 / 99.0, epsilon = 1e-12);

        let taus = grid.tau_axis();
        assert_eq!(taus.len(), 100);
        assert_relative_eq!(taus[0], 0.01);
        assert_relative_eq!(taus[99], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_single_step_axes() {
        let grid = GridSpec::new(5.0, 6.0, 1, 1);
        assert!(grid.validate().is_ok());
        assert_eq!(grid.price_axis().len(), 1);
        assert_eq!(grid.tau_axis().len(), 1);
        assert!(grid.tau_axis()[0] > 0.0);
    }

    #[test]
    fn test_invalid_grids() {
        let cases = [
            GridSpec::new(20.0, 1.0, 100, 100),
            GridSpec::new(5.0, 5.0, 100, 100),
            GridSpec::new(0.0, 20.0, 100, 100),
            GridSpec::new(1.0, 20.0, 0, 100),
            GridSpec::new(1.0, 20.0, 100, 0),
            GridSpec::new(1.0, f64::INFINITY, 100, 100),
        ];

        for grid in cases {
            let err = grid.validate().unwrap_err();
            assert!(err.is_invalid_parameter(), "{:?} should be rejected", grid);
        }
    }
}
