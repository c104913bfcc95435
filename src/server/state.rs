use crate::config::ServerConfig;
use crate::geo::{self, Municipality};
use crate::models::CropTable;
use crate::storage;
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;

/// Shared, read-only server state. Cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub table: Arc<CropTable>,
    /// Normalized boundaries, when a boundary file could be loaded.
    pub boundaries: Option<Arc<Vec<Municipality>>>,
    pub boundary_file: Option<PathBuf>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(table: CropTable, config: ServerConfig) -> Self {
        Self {
            table: Arc::new(table),
            boundaries: None,
            boundary_file: None,
            config: Arc::new(config),
        }
    }

    pub fn with_boundaries(mut self, file: PathBuf, municipalities: Vec<Municipality>) -> Self {
        self.boundary_file = Some(file);
        self.boundaries = Some(Arc::new(municipalities));
        self
    }

    /// Load the crop table (required) and the first readable boundary file
    /// (optional) named by `config`.
    pub fn load(config: ServerConfig) -> Result<Self> {
        let table = storage::load_table(&config.data_file)?;
        log::info!(
            "loaded {} crops / {} records from {}",
            table.len(),
            table.total_records(),
            config.data_file.display()
        );

        let boundary = geo::resolve_boundary_file(&config.boundary_candidates).map(|p| p.to_path_buf());
        let mut state = Self::new(table, config);
        match boundary {
            Some(path) => match geo::load_municipalities(&path) {
                Ok(municipalities) => {
                    log::info!(
                        "loaded {} municipality boundaries from {}",
                        municipalities.len(),
                        path.display()
                    );
                    state = state.with_boundaries(path, municipalities);
                }
                Err(e) => log::warn!("boundary file unusable: {e:#}"),
            },
            None => log::warn!("no boundary file found; map layers will be unavailable"),
        }
        Ok(state)
    }
}
