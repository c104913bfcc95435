//! cropmap
//!
//! Harvested-area data for Brazilian municipalities, colored on a log-scaled
//! sequential palette and served as a JSON API for a map dashboard. Pairs with
//! the `cropmap` CLI.
//!
//! ### Features
//! - Log-scaled sequential color scale derived from one base hex color
//! - Crop tables loaded from JSON (crop-major or municipality-major) or tidy CSV
//! - Per-crop rankings and summary statistics
//! - GeoJSON boundary normalization across common IBGE property names
//! - SVG/PNG ranking charts colored on the same scale as the map
//! - An axum server exposing the whole thing to the browser
//!
//! ### Example
//! ```
//! use cropmap::{ColorScale, ValueRange};
//!
//! let scale = ColorScale::new(ValueRange { min: 100.0, max: 10_000.0 }, "#4CAF50");
//! let legend = scale.legend(5)?;
//! assert_eq!(legend.len(), 5);
//! assert_eq!(legend[0].value, 100.0);
//! assert_eq!(scale.color_for_value(None), cropmap::scale::NO_DATA_COLOR);
//! # Ok::<(), cropmap::scale::ScaleError>(())
//! ```

pub mod color;
pub mod config;
pub mod geo;
pub mod models;
pub mod scale;
pub mod server;
pub mod stats;
pub mod storage;
pub mod view;
pub mod viz;

pub use color::{Hsl, Rgb8};
pub use config::ServerConfig;
pub use models::{CropData, CropRecord, CropTable};
pub use scale::{ColorScale, LegendStep, ValueRange};
pub use view::ViewState;
