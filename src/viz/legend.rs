//! Color-scale legend panel drawn beside the chart.

use anyhow::Result;
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;

use super::util::format_hectares;
use crate::color::{Rgb8, hex_to_rgb};
use crate::scale::{LegendStep, NO_DATA_COLOR};

const PAD: i32 = 12;
const SWATCH: i32 = 14;
const ROW_H: i32 = 22;

/// Label shown next to the "no data" swatch.
pub const NO_DATA_LABEL: &str = "Sem dados";

/// Height in pixels the panel needs for `steps` swatches plus the no-data row.
pub fn legend_height_px(steps: usize, has_title: bool) -> i32 {
    let title = if has_title { ROW_H + 4 } else { 0 };
    PAD * 2 + title + ROW_H * (steps as i32 + 1) + 6
}

/// Draw one swatch per legend step (low to high) and a final no-data row.
pub fn draw_scale_legend<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    steps: &[LegendStep],
    title: &str,
) -> Result<()> {
    area.fill(&WHITE).map_err(|e| anyhow::anyhow!("{:?}", e))?;

    let text_style = TextStyle::from((FontFamily::SansSerif, 12).into_font()).color(&BLACK);
    let mut y = PAD;

    if !title.is_empty() {
        let title_style = TextStyle::from((FontFamily::SansSerif, 14).into_font()).color(&BLACK);
        area.draw_text(title, &title_style, (PAD, y))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        y += ROW_H + 4;
    }

    let rows = steps
        .iter()
        .map(|s| (swatch_color(&s.color), format!("{} ha", format_hectares(s.value.round()))))
        .chain(std::iter::once((
            swatch_color(NO_DATA_COLOR),
            NO_DATA_LABEL.to_string(),
        )));

    for (i, (color, label)) in rows.enumerate() {
        // Gap before the no-data row.
        if i == steps.len() {
            y += 6;
        }
        area.draw(&Rectangle::new(
            [(PAD, y), (PAD + SWATCH, y + SWATCH)],
            color.filled(),
        ))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        area.draw(&Rectangle::new(
            [(PAD, y), (PAD + SWATCH, y + SWATCH)],
            RGBColor(160, 160, 160).stroke_width(1),
        ))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        area.draw_text(&label, &text_style, (PAD + SWATCH + 8, y + 1))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        y += ROW_H;
    }
    Ok(())
}

pub(crate) fn swatch_color(hex: &str) -> RGBColor {
    let Rgb8 { r, g, b } = hex_to_rgb(hex).unwrap_or(Rgb8::new(0xe0, 0xe0, 0xe0));
    RGBColor(r, g, b)
}
