use crate::error::Result;
use crate::models::PriceSurface;
use plotly::{Plot, Surface};
use serde_json::{json, Value};

pub const X_AXIS_TITLE: &str = "Time to Expiration";
pub const Y_AXIS_TITLE: &str = "Stock Price";
pub const Z_AXIS_TITLE: &str = "Option Price";

pub fn surface_to_plot(surface: &PriceSurface) -> Plot {
    let trace = Surface::new(surface.to_rows())
        .x(surface.taus.to_vec())
        .y(surface.stock_prices.to_vec());

    let mut plot = Plot::new();
    plot.add_trace(trace);
    plot
}

fn axis(title: &str) -> Value {
    json!({
        "title": { "text": title },
        "showbackground": true,
        "backgroundcolor": "rgb(241, 236, 236)",
        "gridcolor": "rgb(255, 255, 255)",
        "zerolinecolor": "rgb(255, 255, 255)",
    })
}

/// Scene, camera and sizing for the dashboard graph
pub fn figure_layout(surface: &PriceSurface) -> Value {
    let params = &surface.parameters;
    json!({
        "title": {
            "text": format!(
                "{} (r={:.2}, sigma={:.2}, K={:.2})",
                params.option_type, params.interest_rate, params.volatility, params.strike
            )
        },
        "autosize": false,
        "width": 550,
        "height": 500,
        "margin": { "l": 100, "r": 25, "b": 65, "t": 50 },
        "transition": { "duration": 500 },
        "font": { "size": 12, "color": "white" },
        "showlegend": false,
        "plot_bgcolor": "#141414",
        "paper_bgcolor": "#141414",
        "scene": {
            "xaxis": axis(X_AXIS_TITLE),
            "yaxis": axis(Y_AXIS_TITLE),
            "zaxis": axis(Z_AXIS_TITLE),
            "aspectratio": { "x": 1, "y": 1.2, "z": 1 },
            "camera": {
                "up": { "x": 0, "y": 0, "z": 0.8 },
                "center": { "x": 0, "y": 0, "z": 0 },
                "eye": { "x": -1.3, "y": -1.3, "z": 1.3 },
            },
        },
    })
}

/// Plotly figure `{data, layout}` ready for `Plotly.react`
pub fn figure_json(surface: &PriceSurface) -> Result<Value> {
    let plot = surface_to_plot(surface);
    let mut rendered: Value = serde_json::from_str(&plot.to_json())?;

    Ok(json!({
        "data": rendered["data"].take(),
        "layout": figure_layout(surface),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GridSpec, MarketParameters, OptionType};
    use crate::utils::PricingSurfaceCalculator;

    fn surface() -> PriceSurface {
        PricingSurfaceCalculator::new(GridSpec::new(1.0, 20.0, 4, 3))
            .compute(&MarketParameters::new(0.1, 0.3, 10.0, OptionType::Put))
            .unwrap()
    }

    #[test]
    fn test_figure_has_one_surface_trace() {
        let figure = figure_json(&surface()).unwrap();
        let data = figure["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["type"], "surface");

        let z = data[0]["z"].as_array().unwrap();
        assert_eq!(z.len(), 4);
        assert_eq!(z[0].as_array().unwrap().len(), 3);
        assert_eq!(data[0]["x"].as_array().unwrap().len(), 3);
        assert_eq!(data[0]["y"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_layout_carries_camera_and_axis_titles() {
        let figure = figure_json(&surface()).unwrap();
        let layout = &figure["layout"];

        assert_eq!(layout["width"], 550);
        assert_eq!(layout["height"], 500);
        assert_eq!(layout["scene"]["camera"]["eye"]["x"], -1.3);
        assert_eq!(layout["scene"]["camera"]["up"]["z"], 0.8);
        assert_eq!(layout["scene"]["xaxis"]["title"]["text"], X_AXIS_TITLE);
        assert_eq!(layout["scene"]["yaxis"]["title"]["text"], Y_AXIS_TITLE);
        assert!(layout["title"]["text"].as_str().unwrap().starts_with("Put"));
    }
}
