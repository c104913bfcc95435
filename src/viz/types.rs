//! Public types and constants for the chart renderer.

/// Layout knobs for the ranking chart. Colors come from the `ColorScale`
/// passed alongside.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
    /// Caption; empty derives `"Top N Municípios - <crop>"`.
    pub title: String,
    /// Swatches in the right-hand legend. Below 2 disables the legend.
    pub legend_steps: usize,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            title: String::new(),
            legend_steps: 5,
        }
    }
}

pub const DEFAULT_WIDTH: u32 = 1000;
pub const DEFAULT_HEIGHT: u32 = 640;

/// Caption color, the dark green of the dashboard headings.
pub const TITLE_RGB: (u8, u8, u8) = (0x2E, 0x7D, 0x32);
