use crate::error::{Result, SurfaceError};
use crate::models::PriceSurface;
use image::{ImageFormat, RgbImage};
use ndarray::Array1;
use plotters::backend::BitMapBackend;
use plotters::prelude::*;
use std::io::Cursor;
use std::path::Path;

const WIDTH: u32 = 1200;
const HEIGHT: u32 = 900;

/// Heatmap of option value vs. stock price and tau, written as PNG
pub fn plot_price_surface<P: AsRef<Path>>(surface: &PriceSurface, output_path: P) -> Result<()> {
    let img = plot_price_surface_in_memory(surface)?;
    img.save_with_format(output_path.as_ref(), ImageFormat::Png)?;
    Ok(())
}

/// Encode a rendered chart as PNG bytes
pub fn encode_png(img: &RgbImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Position of `value` inside `[min, max]`, clamped to the unit interval.
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    let range = max - min;
    if !range.is_finite() || range <= 0.0 {
        return 0.5;
    }
    ((value - min) / range).clamp(0.0, 1.0)
}

pub fn plot_price_surface_in_memory(surface: &PriceSurface) -> Result<RgbImage> {
    let (n_prices, n_taus) = surface.shape();
    if n_prices == 0 || n_taus == 0 {
        return Err(SurfaceError::PlotError(
            "Cannot plot an empty price surface".to_string(),
        ));
    }

    let min_price = surface.stock_prices.iter().fold(f64::INFINITY, |a, &b| a.min(b));
    let max_price = surface
        .stock_prices
        .iter()
        .fold(f64::NEG_INFINITY, |a, &b| a.max(b));
    let min_tau = surface.taus.iter().fold(f64::INFINITY, |a, &b| a.min(b));
    let max_tau = surface.taus.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));

    let value_min = surface.min_value();
    let value_max = surface.max_value();
    if !value_min.is_finite() || !value_max.is_finite() {
        return Err(SurfaceError::PlotError(
            "No finite values to plot".to_string(),
        ));
    }

    // Cell sizes; a single sample still gets a visible cell
    let cell_w = if n_prices > 1 {
        (max_price - min_price) / (n_prices - 1) as f64
    } else {
        1.0
    };
    let cell_h = if n_taus > 1 {
        (max_tau - min_tau) / (n_taus - 1) as f64
    } else {
        0.01
    };

    let x_min = min_price - 0.5 * cell_w;
    let x_max = max_price + 0.5 * cell_w;
    let y_min = (min_tau - 0.5 * cell_h).max(0.0);
    let y_max = max_tau + 0.5 * cell_h;

    let params = &surface.parameters;
    let mut buffer = vec![0u8; (WIDTH * HEIGHT * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| SurfaceError::PlotError(e.to_string()))?;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                format!(
                    "Black-Scholes {} (r={:.2}, sigma={:.2}, K={:.2})",
                    params.option_type, params.interest_rate, params.volatility, params.strike
                ),
                ("sans-serif", 30).into_font(),
            )
            .margin(10)
            .margin_right(150)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(|e| SurfaceError::PlotError(e.to_string()))?;

        chart
            .configure_mesh()
            .x_desc("Stock Price")
            .y_desc("Time to Expiration")
            .axis_desc_style(("sans-serif", 15))
            .draw()
            .map_err(|e| SurfaceError::PlotError(e.to_string()))?;

        let color_gradient = colorous::VIRIDIS;

        chart
            .draw_series(surface.prices.indexed_iter().filter_map(|((i, j), &value)| {
                if !value.is_finite() {
                    return None;
                }
                let s = surface.stock_prices[i];
                let tau = surface.taus[j];
                let color = color_gradient.eval_continuous(normalize(value, value_min, value_max));
                Some(Rectangle::new(
                    [
                        (s - 0.5 * cell_w, tau - 0.5 * cell_h),
                        (s + 0.5 * cell_w, tau + 0.5 * cell_h),
                    ],
                    RGBColor(color.r, color.g, color.b).filled(),
                ))
            }))
            .map_err(|e| SurfaceError::PlotError(e.to_string()))?;

        let color_bar_width = 20;
        let color_bar_height = 400;
        let color_bar_x = WIDTH as i32 - 120;
        let color_bar_y = 100;

        for i in 0..color_bar_height {
            let normalized_pos = 1.0 - (i as f64 / color_bar_height as f64);
            let color = color_gradient.eval_continuous(normalized_pos);
            let rgb = RGBColor(color.r, color.g, color.b);

            root.draw(&Rectangle::new(
                [
                    (color_bar_x, color_bar_y + i),
                    (color_bar_x + color_bar_width, color_bar_y + i + 1),
                ],
                rgb.filled(),
            ))
            .map_err(|e| SurfaceError::PlotError(e.to_string()))?;
        }

        let label_style = TextStyle::from(("sans-serif", 12)).color(&BLACK);
        root.draw_text(
            &format!("{:.2}", value_max),
            &label_style,
            (color_bar_x + color_bar_width + 5, color_bar_y),
        )
        .map_err(|e| SurfaceError::PlotError(e.to_string()))?;

        root.draw_text(
            &format!("{:.2}", value_min),
            &label_style,
            (
                color_bar_x + color_bar_width + 5,
                color_bar_y + color_bar_height,
            ),
        )
        .map_err(|e| SurfaceError::PlotError(e.to_string()))?;

        root.draw_text(
            "V",
            &label_style,
            (
                color_bar_x + color_bar_width + 5,
                color_bar_y + color_bar_height / 2,
            ),
        )
        .map_err(|e| SurfaceError::PlotError(e.to_string()))?;

        root.draw_text(
            &format!(
                "Generated: {}",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
            ),
            &TextStyle::from(("sans-serif", 15)).color(&BLACK),
            (10, HEIGHT as i32 - 30),
        )
        .map_err(|e| SurfaceError::PlotError(e.to_string()))?;

        root.present()
            .map_err(|e| SurfaceError::PlotError(e.to_string()))?;
    }

    RgbImage::from_raw(WIDTH, HEIGHT, buffer)
        .ok_or_else(|| SurfaceError::PlotError("Bitmap buffer has the wrong size".to_string()))
}

/// Option value against stock price at one tau column, written as PNG
pub fn plot_price_profile<P: AsRef<Path>>(
    surface: &PriceSurface,
    tau_idx: usize,
    output_path: P,
) -> Result<()> {
    let (stock_prices, values) = surface.slice_by_time(tau_idx)?;
    let tau = surface.taus[tau_idx];
    let img = plot_price_profile_in_memory(&stock_prices, &values, surface, tau)?;
    img.save_with_format(output_path.as_ref(), ImageFormat::Png)?;
    Ok(())
}

pub fn plot_price_profile_in_memory(
    stock_prices: &Array1<f64>,
    values: &Array1<f64>,
    surface: &PriceSurface,
    tau: f64,
) -> Result<RgbImage> {
    let valid_points: Vec<(f64, f64)> = stock_prices
        .iter()
        .zip(values.iter())
        .filter(|(_, v)| v.is_finite())
        .map(|(&s, &v)| (s, v))
        .collect();

    if valid_points.is_empty() {
        return Err(SurfaceError::PlotError(
            "No valid data points for price profile plot".to_string(),
        ));
    }

    let min_s = valid_points.iter().map(|(s, _)| *s).fold(f64::INFINITY, f64::min);
    let max_s = valid_points
        .iter()
        .map(|(s, _)| *s)
        .fold(f64::NEG_INFINITY, f64::max);
    let min_v = valid_points.iter().map(|(_, v)| *v).fold(f64::INFINITY, f64::min);
    let max_v = valid_points
        .iter()
        .map(|(_, v)| *v)
        .fold(f64::NEG_INFINITY, f64::max);

    let s_range = (max_s - min_s).max(1e-9);
    let v_range = (max_v - min_v).max(1e-9);
    let s_min = min_s - 0.05 * s_range;
    let s_max = max_s + 0.05 * s_range;
    let v_min = (min_v - 0.1 * v_range).min(0.0);
    let v_max = max_v + 0.1 * v_range;

    let strike = surface.parameters.strike;
    let option_type = surface.parameters.option_type;

    let mut buffer = vec![0u8; (WIDTH * HEIGHT * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| SurfaceError::PlotError(e.to_string()))?;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                format!("{} Price Profile - tau {:.2}", option_type, tau),
                ("sans-serif", 30).into_font(),
            )
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(s_min..s_max, v_min..v_max)
            .map_err(|e| SurfaceError::PlotError(e.to_string()))?;

        chart
            .configure_mesh()
            .x_desc("Stock Price")
            .y_desc("Option Price")
            .axis_desc_style(("sans-serif", 15))
            .draw()
            .map_err(|e| SurfaceError::PlotError(e.to_string()))?;

        chart
            .draw_series(LineSeries::new(
                valid_points
                    .iter()
                    .map(|&(s, _)| (s, option_type.intrinsic(s, strike))),
                &RED.mix(0.5),
            ))
            .map_err(|e| SurfaceError::PlotError(e.to_string()))?;

        chart
            .draw_series(LineSeries::new(valid_points.iter().copied(), &BLUE))
            .map_err(|e| SurfaceError::PlotError(e.to_string()))?;

        chart
            .draw_series(
                valid_points
                    .iter()
                    .map(|&(s, v)| Circle::new((s, v), 2, BLUE.filled())),
            )
            .map_err(|e| SurfaceError::PlotError(e.to_string()))?;

        root.present()
            .map_err(|e| SurfaceError::PlotError(e.to_string()))?;
    }

    RgbImage::from_raw(WIDTH, HEIGHT, buffer)
        .ok_or_else(|| SurfaceError::PlotError("Bitmap buffer has the wrong size".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GridSpec, MarketParameters, OptionType};
    use crate::utils::PricingSurfaceCalculator;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(5.0, 0.0, 10.0), 0.5);
        assert_eq!(normalize(-1.0, 0.0, 10.0), 0.0);
        assert_eq!(normalize(11.0, 0.0, 10.0), 1.0);
        assert_eq!(normalize(3.0, 3.0, 3.0), 0.5);
    }

    #[test]
    fn test_profile_rejects_out_of_range_tau() {
        let surface = PricingSurfaceCalculator::new(GridSpec::new(1.0, 20.0, 10, 10))
            .compute(&MarketParameters::default())
            .unwrap();
        let path = std::env::temp_dir().join("bs_surface_profile_out_of_range.png");
        let err = plot_price_profile(&surface, 10, &path).unwrap_err();
        assert!(err.is_invalid_parameter());
    }

    fn small_surface(option_type: OptionType) -> PriceSurface {
        PricingSurfaceCalculator::new(GridSpec::new(1.0, 20.0, 12, 6))
            .compute(&MarketParameters::default().with_option_type(option_type))
            .unwrap()
    }

    #[test]
    fn test_surface_heatmap_renders() {
        let surface = small_surface(OptionType::Call);
        let img = plot_price_surface_in_memory(&surface).unwrap();
        assert_eq!(img.dimensions(), (WIDTH, HEIGHT));
        // Something other than the background was drawn
        let first = *img.get_pixel(0, 0);
        assert!(img.pixels().any(|p| *p != first));
    }

    #[test]
    fn test_price_profile_renders() {
        let surface = small_surface(OptionType::Put);
        let (stock_prices, values) = surface.slice_by_time(3).unwrap();
        let img =
            plot_price_profile_in_memory(&stock_prices, &values, &surface, surface.taus[3]).unwrap();
        assert_eq!(img.dimensions(), (WIDTH, HEIGHT));
        assert!(img.pixels().any(|p| *p != image::Rgb([255, 255, 255])));
    }

    #[test]
    fn test_profile_without_finite_values_fails() {
        let surface = small_surface(OptionType::Call);
        let stock_prices = surface.stock_prices.clone();
        let values = Array1::from_elem(stock_prices.len(), f64::NAN);
        let err = plot_price_profile_in_memory(&stock_prices, &values, &surface, 0.5).unwrap_err();
        assert!(matches!(err, SurfaceError::PlotError(_)));
    }

    #[test]
    fn test_encode_png_signature() {
        let img = RgbImage::from_pixel(4, 3, image::Rgb([20, 20, 20]));
        let bytes = encode_png(&img).unwrap();
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n']);
    }
}
