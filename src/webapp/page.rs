//! Dashboard HTML
//!
//! One static page: the controls post their values to the figure endpoint
//! and the returned figure is redrawn with plotly.js.

use crate::models::{MarketParameters, OptionType, SliderSpec, SLIDERS};

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>The Black Scholes Equation</title>
    <link rel="stylesheet" href="https://maxcdn.bootstrapcdn.com/bootstrap/4.0.0/css/bootstrap.min.css">
    <script src="https://cdn.plot.ly/plotly-2.27.0.min.js"></script>
    <script type="text/x-mathjax-config">
        MathJax.Hub.Config({ tex2jax: { inlineMath: [['$', '$']], processEscapes: true } });
    </script>
    <script src="https://cdnjs.cloudflare.com/ajax/libs/mathjax/2.7.7/latest.js?config=TeX-AMS-MML_SVG"></script>
    <style>
        .control { text-align: center; padding-bottom: 20px; }
        .control input[type=range] { width: 80%; }
        .marks { display: flex; justify-content: space-between; width: 80%; margin: auto; font-size: 12px; }
        #error { color: #c0392b; text-align: center; min-height: 1.5em; }
    </style>
</head>
<body>
<div class="container">
    <h1 class="header__title">The Black Scholes Equation</h1>
</div>
<div class="container">
    <div class="row">
        <div class="col-md-6"><div id="graph"></div></div>
        <div class="col-md-6">
            <h6 style="text-align: center">The Black Scholes Partial Differential Equation is:</h6>
            <div>$$ V_{t} + rSV_{x} + 0.5\sigma S^2 V_{xx} - rV = 0 $$</div>
            <h6 style="text-align: center">Change the parameters values to see the changes reflected in the manifold.</h6>
            <div class="control" id="option_type">
__OPTION_TYPES__
            </div>
__SLIDERS__
            <div id="error"></div>
        </div>
    </div>
</div>
<script>
    function currentQuery() {
        const params = new URLSearchParams();
        document.querySelectorAll('input[type=range]').forEach(function (el) {
            params.set(el.name, el.value);
            document.getElementById(el.name + '_value').textContent = el.value;
        });
        params.set('option_type', document.querySelector('input[name=option_type]:checked').value);
        return params.toString();
    }

    function refresh() {
        fetch('/api/v1/surface?' + currentQuery())
            .then(function (resp) { return resp.json().then(function (body) { return [resp.ok, body]; }); })
            .then(function (result) {
                const ok = result[0], body = result[1];
                if (!ok) {
                    document.getElementById('error').textContent = body.message;
                    return;
                }
                document.getElementById('error').textContent = '';
                Plotly.react('graph', body.data, body.layout);
            })
            .catch(function (err) { document.getElementById('error').textContent = err; });
    }

    document.querySelectorAll('input').forEach(function (el) {
        el.addEventListener('change', refresh);
    });
    refresh();
</script>
</body>
</html>
"#;

fn render_slider(slider: &SliderSpec, value: f64) -> String {
    let marks: String = slider
        .marks
        .iter()
        .map(|m| format!("<span>{}</span>", m))
        .collect();

    format!(
        r#"            <div class="control">
                <h6>{label} = <span id="{id}_value">{value}</span></h6>
                <input type="range" name="{id}" min="{min}" max="{max}" step="{step}" value="{value}">
                <div class="marks">{marks}</div>
            </div>
"#,
        label = slider.label,
        id = slider.id,
        min = slider.min,
        max = slider.max,
        step = slider.step,
        value = value,
        marks = marks,
    )
}

fn render_option_types(selected: OptionType) -> String {
    OptionType::ALL
        .iter()
        .map(|option_type| {
            let checked = if *option_type == selected { " checked" } else { "" };
            format!(
                r#"                <label style="margin-left: 30px"><input type="radio" name="option_type" value="{0}" style="margin-right: 5px"{1}>{0}</label>"#,
                option_type, checked
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Full dashboard page with controls set to `initial`.
pub fn render_index(initial: &MarketParameters) -> String {
    let values = [initial.interest_rate, initial.volatility, initial.strike];
    let sliders: String = SLIDERS
        .iter()
        .zip(values)
        .map(|(slider, value)| render_slider(slider, value))
        .collect();

    TEMPLATE
        .replace("__OPTION_TYPES__", &render_option_types(initial.option_type))
        .replace("__SLIDERS__", &sliders)
}
