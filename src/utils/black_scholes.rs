use crate::error::Result;
use crate::models::{GridSpec, MarketParameters, OptionType, PriceSurface};
use ndarray::{Array2, Axis, Zip};
use statrs::function::erf::erfc;
use std::f64::consts::SQRT_2;
use tracing::debug;

/// Standard normal cumulative distribution function
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/// x, d1 and d2 in the transformed-time formulation
fn calculate_terms(s: f64, k: f64, tau: f64, r: f64, sigma: f64) -> (f64, f64, f64) {
    let sigma_sq = sigma * sigma;
    let x = (s / k).ln() + (r - 0.5 * sigma_sq) * tau;
    let denom = sigma * tau.sqrt();
    let d1 = (x + sigma_sq * tau) / denom;
    let d2 = x / denom;
    (x, d1, d2)
}

/// Closed-form option value at one (stock price, tau) point.
///
/// Inputs are not validated here; a zero `sigma` or `tau` yields NaN/inf.
pub fn price(s: f64, k: f64, tau: f64, r: f64, sigma: f64, option_type: OptionType) -> f64 {
    let (x, d1, d2) = calculate_terms(s, k, tau, r, sigma);
    let growth = k * (x + 0.5 * sigma * sigma * tau).exp();
    let value = match option_type {
        OptionType::Call => growth * norm_cdf(d1) - k * norm_cdf(d2),
        OptionType::Put => -growth * norm_cdf(-d1) + k * norm_cdf(-d2),
    };
    // Cancellation deep out of the money can leave a subnormal negative; NaN passes through
    if value < 0.0 {
        0.0
    } else {
        value
    }
}

/// Option price surface over `price_steps` stock prices and `max_time`
/// tau samples, rows indexed by stock price.
#[allow(clippy::too_many_arguments)]
pub fn compute_surface(
    interest_rate: f64,
    volatility: f64,
    strike: f64,
    option_type: OptionType,
    max_time: usize,
    max_price: f64,
    min_price: f64,
    price_steps: usize,
) -> Result<Array2<f64>> {
    let params = MarketParameters::new(interest_rate, volatility, strike, option_type);
    let grid = GridSpec::new(min_price, max_price, price_steps, max_time);
    let surface = PricingSurfaceCalculator::new(grid).compute(&params)?;
    Ok(surface.prices)
}

/// Evaluates the Black-Scholes surface over a fixed grid
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PricingSurfaceCalculator {
    grid: GridSpec,
}

impl PricingSurfaceCalculator {
    pub fn new(grid: GridSpec) -> Self {
        Self { grid }
    }

    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    pub fn compute(&self, params: &MarketParameters) -> Result<PriceSurface> {
        params.validate()?;
        self.grid.validate()?;

        debug!(
            "Computing {} surface: r={}, sigma={}, k={}, grid={}x{}",
            params.option_type,
            params.interest_rate,
            params.volatility,
            params.strike,
            self.grid.price_steps,
            self.grid.max_time_steps
        );

        let stock_prices = self.grid.price_axis();
        let taus = self.grid.tau_axis();
        let shape = self.grid.shape();

        // Outer product: stock price varies down the rows, tau across the columns
        let price_view = stock_prices.view().insert_axis(Axis(1));
        let spot_grid = price_view.broadcast(shape).ok_or_else(|| {
            crate::error::SurfaceError::Other("failed to broadcast price axis".to_string())
        })?;
        let tau_grid = taus.broadcast(shape).ok_or_else(|| {
            crate::error::SurfaceError::Other("failed to broadcast tau axis".to_string())
        })?;

        let MarketParameters {
            interest_rate,
            volatility,
            strike,
            option_type,
        } = *params;

        let prices = Zip::from(&spot_grid)
            .and(&tau_grid)
            .map_collect(|&s, &tau| price(s, strike, tau, interest_rate, volatility, option_type));

        Ok(PriceSurface::new(*params, self.grid, stock_prices, taus, prices))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_norm_cdf_reference_values() {
        assert_abs_diff_eq!(norm_cdf(0.0), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(norm_cdf(1.96), 0.9750021048517795, epsilon = 1e-10);
        assert_abs_diff_eq!(norm_cdf(-1.0), 0.15865525393145707, epsilon = 1e-10);
        assert_abs_diff_eq!(norm_cdf(3.0), 0.9986501019683699, epsilon = 1e-10);
        assert_abs_diff_eq!(norm_cdf(-40.0), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(norm_cdf(40.0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_norm_cdf_symmetry() {
        for x in [0.1, 0.5, 1.3, 2.7, 5.0] {
            assert_abs_diff_eq!(norm_cdf(x) + norm_cdf(-x), 1.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_price_is_forward_scaled_black_scholes() {
        // The transformed formula equals e^(r tau) times the textbook price
        let (s, k, tau, r, sigma): (f64, f64, f64, f64, f64) = (11.0, 10.0, 0.5, 0.05, 0.2);
        let d1 = ((s / k).ln() + (r + 0.5 * sigma * sigma) * tau) / (sigma * tau.sqrt());
        let d2 = d1 - sigma * tau.sqrt();
        let textbook_call = s * norm_cdf(d1) - k * (-r * tau).exp() * norm_cdf(d2);
        let textbook_put = k * (-r * tau).exp() * norm_cdf(-d2) - s * norm_cdf(-d1);

        let growth = (r * tau).exp();
        assert_abs_diff_eq!(
            price(s, k, tau, r, sigma, OptionType::Call),
            growth * textbook_call,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            price(s, k, tau, r, sigma, OptionType::Put),
            growth * textbook_put,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_zero_volatility_point_is_not_finite() {
        let value = price(10.0, 10.0, 0.5, 0.0, 0.0, OptionType::Call);
        assert!(!value.is_finite());
    }

    #[test]
    fn test_deep_out_of_the_money_put_is_never_negative() {
        let surface = compute_surface(0.4, 0.1, 10.0, OptionType::Put, 100, 20.0, 1.0, 100).unwrap();
        assert!(surface.iter().all(|&v| v >= 0.0));
        assert_eq!(price(20.0, 10.0, 1.0, 0.4, 0.1, OptionType::Put), 0.0);
    }

    #[test]
    fn test_compute_surface_shape() {
        let surface = compute_surface(0.1, 0.3, 10.0, OptionType::Put, 7, 20.0, 1.0, 13).unwrap();
        assert_eq!(surface.dim(), (13, 7));
    }

    #[test]
    fn test_compute_surface_matches_pointwise_price() {
        let grid = GridSpec::new(2.0, 18.0, 9, 5);
        let params = MarketParameters::new(0.2, 0.4, 9.0, OptionType::Call);
        let surface = PricingSurfaceCalculator::new(grid).compute(&params).unwrap();

        for (i, &s) in surface.stock_prices.iter().enumerate() {
            for (j, &tau) in surface.taus.iter().enumerate() {
                let expected = price(s, 9.0, tau, 0.2, 0.4, OptionType::Call);
                assert_eq!(surface.prices[[i, j]], expected);
            }
        }
    }

    #[test]
    fn test_compute_rejects_invalid_inputs() {
        let calculator = PricingSurfaceCalculator::default();

        let zero_vol = MarketParameters::new(0.1, 0.0, 10.0, OptionType::Call);
        assert!(calculator.compute(&zero_vol).unwrap_err().is_invalid_parameter());

        let bad_strike = MarketParameters::new(0.1, 0.3, 0.0, OptionType::Call);
        assert!(calculator.compute(&bad_strike).unwrap_err().is_invalid_parameter());

        let inverted = compute_surface(0.1, 0.3, 10.0, OptionType::Call, 100, 1.0, 20.0, 100);
        assert!(inverted.unwrap_err().is_invalid_parameter());

        let no_steps = compute_surface(0.1, 0.3, 10.0, OptionType::Call, 0, 20.0, 1.0, 100);
        assert!(no_steps.unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn test_compute_is_deterministic() {
        let calculator = PricingSurfaceCalculator::default();
        let params = MarketParameters::default();
        let a = calculator.compute(&params).unwrap();
        let b = calculator.compute(&params).unwrap();
        assert_eq!(a.prices, b.prices);
    }
}
