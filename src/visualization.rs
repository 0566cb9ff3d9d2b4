//! Plotly.js output for the front and slice panels.
//!
//! The panel transforms produce plain coordinate series; this module turns
//! them into [Plotly.js](https://plotly.com/javascript/) figure objects
//! (`{"data": [...], "layout": {...}}`) that a visualization sink can pass
//! straight to `Plotly.react`. [`html_page`] wraps one or more figures into
//! a self-contained HTML document for offline viewing.
//!
//! | Figure | Source | Marker color |
//! |---|---|---|
//! | [`front_plot`] | [`FrontSeries`] | red = Pareto-optimal, blue = dominated |
//! | [`slice_plot`] | [`SliceSeries`] | trial number on a reversed `Blues` scale |

use core::fmt::Write as _;

use serde_json::{Value, json};

use crate::pareto::{FrontSeries, ParetoClass};
use crate::series::{Axis, AxisKind, AxisScale, ScatterSeries};
use crate::slice::SliceSeries;

const OPTIMAL_COLOR: &str = "red";
const DOMINATED_COLOR: &str = "blue";

/// Plotly figure for the Pareto-front panel.
#[must_use]
pub fn front_plot(front: &FrontSeries) -> Value {
    let layout = base_layout(&front.series);
    if front.series.is_empty() {
        return json!({ "data": [], "layout": layout });
    }
    let colors: Vec<&str> = front
        .classes
        .iter()
        .map(|c| match c {
            ParetoClass::Optimal => OPTIMAL_COLOR,
            ParetoClass::Dominated => DOMINATED_COLOR,
        })
        .collect();
    let text: Vec<String> = (0..front.series.len())
        .filter_map(|i| front.series.label(i))
        .collect();
    json!({
        "data": [{
            "type": "scatter",
            "mode": "markers",
            "x": front.series.x,
            "y": front.series.y,
            "marker": { "color": colors },
            "text": text,
            "hovertemplate": "%{text}<extra></extra>",
        }],
        "layout": layout,
    })
}

/// Plotly figure for the slice panel.
#[must_use]
pub fn slice_plot(slice: &SliceSeries) -> Value {
    let mut layout = base_layout(&slice.series);
    layout["showlegend"] = json!(false);
    if slice.is_empty() {
        return json!({ "data": [], "layout": layout });
    }
    json!({
        "data": [{
            "type": "scatter",
            "mode": "markers",
            "x": slice.series.x,
            "y": slice.series.y,
            "marker": {
                "color": slice.series.trial_numbers,
                "colorscale": "Blues",
                "reversescale": true,
                "colorbar": { "title": "Trial" },
                "line": { "color": "Grey", "width": 0.5 },
            },
        }],
        "layout": layout,
    })
}

fn base_layout(series: &ScatterSeries) -> Value {
    json!({
        "margin": { "l": 50, "t": 0, "r": 50, "b": 0 },
        "xaxis": axis_layout(&series.x_axis),
        "yaxis": axis_layout(&series.y_axis),
    })
}

fn axis_layout(axis: &Axis) -> Value {
    let scale = match axis.scale {
        AxisScale::Linear => "linear",
        AxisScale::Log => "log",
    };
    let mut out = json!({
        "title": axis.title,
        "type": scale,
        "gridwidth": 1,
        "automargin": true,
    });
    if let AxisKind::Categorical { values, labels } = &axis.kind {
        out["tickvals"] = json!(values);
        out["ticktext"] = json!(labels);
    }
    out
}

/// Render figures into a standalone HTML page.
///
/// Each entry is `(element id, figure)`. Plotly.js is loaded from its CDN.
#[must_use]
pub fn html_page(title: &str, figures: &[(&str, Value)]) -> String {
    let mut html = String::with_capacity(4096);
    let title = escape_html(title);
    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="https://cdn.plot.ly/plotly-2.35.2.min.js"></script>
</head>
<body>
<h1>{title}</h1>
"#
    );
    for (id, figure) in figures {
        let id = escape_html(id);
        let figure = escape_script(&figure.to_string());
        let _ = write!(
            html,
            r#"<div id="{id}" style="height:450px"></div>
<script>
(function() {{
  const fig = {figure};
  Plotly.react("{id}", fig.data, fig.layout, {{ responsive: true }});
}})();
</script>
"#
        );
    }
    html.push_str("</body>\n</html>\n");
    html
}

/// Keep serialized JSON from closing the surrounding `<script>` element.
///
/// `<` only occurs inside JSON strings, where `\u003c` decodes to the same
/// character.
fn escape_script(json: &str) -> String {
    json.replace('<', "\\u003c")
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn front_colors_follow_classes() {
        let front = FrontSeries {
            series: ScatterSeries {
                x: vec![1.0, 2.0],
                y: vec![2.0, 1.0],
                trial_numbers: vec![4, 5],
                x_axis: Axis::numeric("loss"),
                y_axis: Axis::numeric("latency"),
            },
            classes: vec![ParetoClass::Optimal, ParetoClass::Dominated],
        };
        let fig = front_plot(&front);
        assert_eq!(fig["data"][0]["marker"]["color"], json!(["red", "blue"]));
        assert_eq!(fig["data"][0]["text"][1], json!("Trial (number=5)"));
        assert_eq!(fig["layout"]["xaxis"]["title"], json!("loss"));
    }

    #[test]
    fn empty_front_has_no_traces() {
        let fig = front_plot(&FrontSeries::default());
        assert_eq!(fig["data"], json!([]));
    }

    #[test]
    fn categorical_axis_has_ticks() {
        let axis = Axis {
            title: "opt".to_string(),
            kind: AxisKind::Categorical {
                values: vec![0.0, 1.0],
                labels: vec!["adam".to_string(), "sgd".to_string()],
            },
            scale: AxisScale::Linear,
        };
        let out = axis_layout(&axis);
        assert_eq!(out["ticktext"], json!(["adam", "sgd"]));
        assert_eq!(out["type"], json!("linear"));
    }

    #[test]
    fn html_page_keeps_labels_inside_script() {
        let axis = Axis {
            title: "opt".to_string(),
            kind: AxisKind::Categorical {
                values: vec![0.0],
                labels: vec!["</script><script>alert(1)</script>".to_string()],
            },
            scale: AxisScale::Linear,
        };
        let figure = json!({ "data": [], "layout": { "xaxis": axis_layout(&axis) } });
        let page = html_page("slice", &[("slice", figure)]);
        assert_eq!(page.matches("</script>").count(), 2);
        assert!(page.contains(r"\u003c/script>\u003cscript>alert(1)"));
    }

    #[test]
    fn html_page_escapes_title() {
        let page = html_page("a<b", &[("front", json!({"data": [], "layout": {}}))]);
        assert!(page.contains("a&lt;b"));
        assert!(page.contains(r#"<div id="front""#));
        assert!(page.contains("Plotly.react"));
    }
}
