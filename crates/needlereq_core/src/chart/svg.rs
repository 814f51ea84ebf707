//! Standalone SVG rendering for [`BarChart`].

use super::{BarChart, ChartError, LEGEND_TITLE, X_AXIS_LABEL, Y_AXIS_LABEL};

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 400.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 60.0;
/// Bar width as a fraction of its slot.
const BAR_WIDTH_RATIO: f64 = 0.35;
const Y_TICKS: i64 = 5;

/// Renders `chart` as an SVG document.
///
/// # Errors
/// - `ChartError::LengthMismatch` when labels and values differ in length.
pub fn render_svg(chart: &BarChart) -> Result<String, ChartError> {
    chart.validate()?;

    let plot_width = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_height = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let baseline = MARGIN_TOP + plot_height;

    let max_value = chart.values.iter().copied().max().unwrap_or(0).max(0);
    let step = axis_step(max_value);
    let y_max = step * Y_TICKS;
    let scale = plot_height / y_max as f64;

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{WIDTH}\" height=\"{HEIGHT}\" viewBox=\"0 0 {WIDTH} {HEIGHT}\">\n"
    ));
    svg.push_str("  <rect width=\"100%\" height=\"100%\" fill=\"#ffffff\"/>\n");
    svg.push_str(&format!(
        "  <text class=\"title\" x=\"{}\" y=\"28\" text-anchor=\"middle\" font-size=\"14\">{}</text>\n",
        WIDTH / 2.0,
        escape_xml(&chart.title)
    ));

    for tick in 0..=Y_TICKS {
        let value = step * tick;
        let y = baseline - value as f64 * scale;
        svg.push_str(&format!(
            "  <line x1=\"{MARGIN_LEFT}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"#e0e0e0\"/>\n",
            MARGIN_LEFT + plot_width
        ));
        svg.push_str(&format!(
            "  <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" font-size=\"10\">{value}</text>\n",
            MARGIN_LEFT - 6.0,
            y + 3.0
        ));
    }

    let slot = if chart.labels.is_empty() {
        plot_width
    } else {
        plot_width / chart.labels.len() as f64
    };
    let bar_width = slot * BAR_WIDTH_RATIO;

    for (index, (label, value)) in chart.labels.iter().zip(&chart.values).enumerate() {
        let center = MARGIN_LEFT + slot * (index as f64 + 0.5);
        let bar_height = (*value).max(0) as f64 * scale;
        svg.push_str(&format!(
            "  <rect class=\"bar\" x=\"{:.1}\" y=\"{:.1}\" width=\"{bar_width:.1}\" height=\"{bar_height:.1}\" fill=\"{}\"><title>{}: {value}</title></rect>\n",
            center - bar_width / 2.0,
            baseline - bar_height,
            chart.color,
            escape_xml(label)
        ));
        svg.push_str(&format!(
            "  <text class=\"tick\" x=\"{center:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-size=\"10\">{}</text>\n",
            baseline + 16.0,
            escape_xml(label)
        ));
    }

    svg.push_str(&format!(
        "  <line x1=\"{MARGIN_LEFT}\" y1=\"{baseline}\" x2=\"{:.1}\" y2=\"{baseline}\" stroke=\"#000000\"/>\n",
        MARGIN_LEFT + plot_width
    ));
    svg.push_str(&format!(
        "  <line x1=\"{MARGIN_LEFT}\" y1=\"{MARGIN_TOP}\" x2=\"{MARGIN_LEFT}\" y2=\"{baseline}\" stroke=\"#000000\"/>\n"
    ));
    svg.push_str(&format!(
        "  <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-size=\"12\">{X_AXIS_LABEL}</text>\n",
        MARGIN_LEFT + plot_width / 2.0,
        HEIGHT - 15.0
    ));
    svg.push_str(&format!(
        "  <text x=\"18\" y=\"{:.1}\" text-anchor=\"middle\" font-size=\"12\" transform=\"rotate(-90 18 {:.1})\">{Y_AXIS_LABEL}</text>\n",
        MARGIN_TOP + plot_height / 2.0,
        MARGIN_TOP + plot_height / 2.0
    ));
    svg.push_str(&render_legend(chart));
    svg.push_str("</svg>\n");

    Ok(svg)
}

fn render_legend(chart: &BarChart) -> String {
    let x = WIDTH - MARGIN_RIGHT - 130.0;
    let y = MARGIN_TOP + 6.0;
    let mut legend = String::new();
    legend.push_str(&format!(
        "  <g class=\"legend\">\n    <rect x=\"{x}\" y=\"{y}\" width=\"124\" height=\"40\" fill=\"#d3d3d3\" stroke=\"#000000\"/>\n"
    ));
    legend.push_str(&format!(
        "    <text x=\"{:.1}\" y=\"{:.1}\" font-size=\"10\">{LEGEND_TITLE}</text>\n",
        x + 8.0,
        y + 14.0
    ));
    legend.push_str(&format!(
        "    <rect x=\"{:.1}\" y=\"{:.1}\" width=\"16\" height=\"8\" fill=\"{}\"/>\n",
        x + 8.0,
        y + 22.0,
        chart.color
    ));
    legend.push_str(&format!(
        "    <text x=\"{:.1}\" y=\"{:.1}\" font-size=\"10\">{}</text>\n  </g>\n",
        x + 30.0,
        y + 30.0,
        escape_xml(&chart.series_name)
    ));
    legend
}

/// Rounds the y-axis tick step up to 1, 2 or 5 times a power of ten.
fn axis_step(max_value: i64) -> i64 {
    let raw = (max_value.max(1) as f64 / Y_TICKS as f64).ceil();
    let magnitude = 10f64.powi(raw.log10().floor() as i32);
    let normalized = raw / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    ((nice * magnitude) as i64).max(1)
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
