//! Chart rendering: the per-crop municipality ranking as a horizontal bar
//! chart, to **SVG** or **PNG**.
//!
//! - Bars colored on the same log scale as the map, so a bar and its
//!   municipality share a color
//! - Brazilian number formatting on the value axis (`30.000`)
//! - Optional legend panel with log-spaced swatches and the "no data" swatch

pub mod legend;
pub mod text;
pub mod types;
pub mod util;

pub use types::ChartOptions;

use crate::scale::ColorScale;
use crate::stats::ChartData;
use anyhow::{Result, anyhow};

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;

use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;

use std::path::Path;
use std::sync::Once;

use legend::{draw_scale_legend, legend_height_px, swatch_color};
use text::truncate_to_width;
use types::TITLE_RGB;
use util::{choose_axis_scale, compute_label_area_px, format_hectares};

/// One-time registration for a fallback "sans-serif" font when using the `ab_glyph` text path.
/// Required because `ab_glyph` doesn't discover OS fonts.
static INIT_FONTS: Once = Once::new();

fn ensure_fonts_registered() {
    INIT_FONTS.call_once(|| {
        // src/viz/mod.rs → project root → assets/DejaVuSans.ttf
        let _ = plotters::style::register_font(
            "sans-serif",
            plotters::style::FontStyle::Normal,
            include_bytes!("../../assets/DejaVuSans.ttf"),
        );
    });
}

const MARGIN: u32 = 16;
const LABEL_FONT_PX: u32 = 11;
const LEGEND_PANEL_PCT: u32 = 18;

/// Render the ranking chart to a file; `.svg` selects the SVG backend,
/// anything else is written as a bitmap (PNG by extension).
pub fn plot_chart<P: AsRef<Path>>(
    chart: &ChartData,
    scale: &ColorScale,
    out_path: P,
    opts: &ChartOptions,
) -> Result<()> {
    check_drawable(chart)?;
    ensure_fonts_registered();
    let out_path = out_path.as_ref();
    let size = (opts.width, opts.height);

    if out_path.extension().and_then(|s| s.to_str()) == Some("svg") {
        let root = SVGBackend::new(out_path, size).into_drawing_area();
        draw_chart(root, chart, scale, opts)
    } else {
        let root = BitMapBackend::new(out_path, size).into_drawing_area();
        draw_chart(root, chart, scale, opts)
    }
}

/// Render the ranking chart to an SVG document in memory.
pub fn render_chart_svg(chart: &ChartData, scale: &ColorScale, opts: &ChartOptions) -> Result<String> {
    check_drawable(chart)?;
    ensure_fonts_registered();
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (opts.width, opts.height)).into_drawing_area();
        draw_chart(root, chart, scale, opts)?;
    }
    Ok(svg)
}

fn check_drawable(chart: &ChartData) -> Result<()> {
    if chart.data.is_empty() {
        return Err(anyhow!("no data to plot for {:?}", chart.crop_name));
    }
    if chart.labels.len() != chart.data.len() {
        return Err(anyhow!(
            "labels/data length mismatch: {} vs {}",
            chart.labels.len(),
            chart.data.len()
        ));
    }
    Ok(())
}

fn draw_chart<DB>(
    root: DrawingArea<DB, Shift>,
    chart: &ChartData,
    scale: &ColorScale,
    opts: &ChartOptions,
) -> Result<()>
where
    DB: DrawingBackend,
{
    root.fill(&WHITE).map_err(|e| anyhow::anyhow!("{:?}", e))?;

    let steps = if opts.legend_steps >= 2 {
        Some(scale.legend(opts.legend_steps)?)
    } else {
        None
    };

    let (root_w, root_h) = root.dim_in_pixel();
    let (plot_area, legend_area) = match steps {
        Some(_) => {
            let (plot, legend) = root.split_horizontally((100 - LEGEND_PANEL_PCT).percent_width());
            (plot, Some(legend))
        }
        None => (root, None),
    };

    let n = chart.data.len();
    let max_val = chart.data.iter().cloned().fold(0.0f64, f64::max);
    let (xscale, scale_word) = choose_axis_scale(max_val);
    let x_max = (max_val / xscale) * 1.05;

    // Largest bar on top: rank r sits at segment n - 1 - r.
    let max_label_px = root_w / 3;
    let labels: Vec<String> = chart
        .labels
        .iter()
        .map(|l| truncate_to_width(l, LABEL_FONT_PX, max_label_px))
        .collect();
    let label_area_px = compute_label_area_px(&labels, LABEL_FONT_PX, max_label_px);

    let title = if opts.title.trim().is_empty() {
        format!("Top {} Municípios - {}", n, chart.crop_name)
    } else {
        opts.title.trim().to_string()
    };
    let (tr, tg, tb) = TITLE_RGB;
    let title_color = RGBColor(tr, tg, tb);
    let caption_style = TextStyle::from((FontFamily::SansSerif, 18).into_font()).color(&title_color);

    let mut cc = ChartBuilder::on(&plot_area)
        .margin(MARGIN)
        .caption(title, caption_style)
        .set_label_area_size(LabelAreaPosition::Left, label_area_px)
        .set_label_area_size(LabelAreaPosition::Bottom, 44)
        .build_cartesian_2d(0f64..x_max.max(1e-9), (0..n as i32).into_segmented())
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    let x_desc = if scale_word.is_empty() {
        "Hectares Colhidos".to_string()
    } else {
        format!("Hectares Colhidos ({scale_word})")
    };
    let x_label_fmt = |v: &f64| format_hectares((v * 100.0).round() / 100.0);
    let y_label_fmt = |seg: &SegmentValue<i32>| match seg {
        SegmentValue::CenterOf(i) if (*i as usize) < n => labels[n - 1 - *i as usize].clone(),
        _ => String::new(),
    };

    cc.configure_mesh()
        .disable_y_mesh()
        .x_desc(x_desc)
        .x_labels(8)
        .y_labels(n)
        .x_label_formatter(&x_label_fmt)
        .y_label_formatter(&y_label_fmt)
        .label_style((FontFamily::SansSerif, LABEL_FONT_PX))
        .axis_desc_style((FontFamily::SansSerif, 14))
        .draw()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    let bars = chart.data.iter().enumerate().map(|(rank, v)| {
        let slot = (n - 1 - rank) as i32;
        let color = swatch_color(&scale.color_for_value(Some(*v)));
        let mut bar = Rectangle::new(
            [
                (0.0, SegmentValue::Exact(slot)),
                (v / xscale, SegmentValue::Exact(slot + 1)),
            ],
            color.filled(),
        );
        bar.set_margin(2, 2, 0, 0);
        bar
    });
    cc.draw_series(bars)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    if let (Some(area), Some(steps)) = (legend_area.as_ref(), steps.as_ref()) {
        let needed = legend_height_px(steps.len(), true).min(root_h as i32);
        let (panel, _) = area.split_vertically(needed + MARGIN as i32 * 3);
        let panel = panel.margin(MARGIN * 3, 0, 0, 0);
        draw_scale_legend(&panel, steps, &chart.crop_name)?;
    }

    plot_area
        .present()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    if let Some(ref area) = legend_area {
        area.present().map_err(|e| anyhow::anyhow!("{:?}", e))?;
    }
    Ok(())
}
