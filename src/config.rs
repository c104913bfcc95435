//! Server configuration. Populated from the `serve` subcommand's flags (and
//! the `PORT` environment variable); [`ServerConfig::default`] mirrors the
//! repository layout.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Crop data file, crop-major or municipality-major JSON, or tidy CSV.
    pub data_file: PathBuf,
    /// Served under `/static`.
    pub static_dir: PathBuf,
    /// Served under `/data`.
    pub data_dir: PathBuf,
    /// Dashboard page served at `/`.
    pub index_file: PathBuf,
    /// Boundary GeoJSON files, tried in order.
    pub boundary_candidates: Vec<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            data_file: PathBuf::from("data/crop_data_static.json"),
            static_dir: PathBuf::from("static"),
            data_dir: PathBuf::from("data"),
            index_file: PathBuf::from("templates/index.html"),
            boundary_candidates: default_boundary_candidates(),
        }
    }
}

pub fn default_boundary_candidates() -> Vec<PathBuf> {
    [
        "static/data/brazil_municipalities_all.geojson",
        "static/data/brazil_municipalities.geojson",
        "data/brazil_municipalities.geojson",
    ]
    .into_iter()
    .map(PathBuf::from)
    .collect()
}

impl ServerConfig {
    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.host, self.port))
    }
}
