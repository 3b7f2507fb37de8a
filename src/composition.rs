// The persisted unit: grid, dimensions, instrument, background, version,
// saved as a single JSON document. Decoding is a pure boundary; nothing
// touches live state until a document has fully validated.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::Instrument;

pub const CURRENT_VERSION: &str = "1.2";

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("not a valid composition document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("composition grid is empty")]
    EmptyGrid,
    #[error("composition grid rows have uneven lengths")]
    RaggedGrid,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    pub rows: usize,
    pub cols: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    pub grid: Vec<Vec<bool>>,

    // Older documents predate this field; decode derives it from the grid.
    #[serde(rename = "gridSize", skip_serializing_if = "Option::is_none")]
    pub grid_size: Option<GridSize>,

    pub instrument: Instrument,

    // Kept as a raw id so unknown values survive decoding; whoever applies
    // the composition decides whether the id means anything.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,

    // Informational only; no parsing is gated on it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl Composition {
    pub fn decode(text: &str) -> Result<Self, FormatError> {
        let mut doc: Composition = serde_json::from_str(text)?;
        let cols = doc.grid.first().map_or(0, Vec::len);
        if doc.grid.is_empty() || cols == 0 {
            return Err(FormatError::EmptyGrid);
        }
        if doc.grid.iter().any(|row| row.len() != cols) {
            return Err(FormatError::RaggedGrid);
        }
        if doc.grid_size.is_none() {
            doc.grid_size = Some(GridSize {
                rows: doc.grid.len(),
                cols,
            });
        }
        Ok(doc)
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

pub fn load(path: &Path) -> anyhow::Result<Composition> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("could not read {}", path.display()))?;
    Ok(Composition::decode(&text)?)
}

pub fn save(path: &Path, composition: &Composition) -> anyhow::Result<()> {
    let json = composition.encode()?;
    std::fs::write(path, json).with_context(|| format!("could not write {}", path.display()))?;
    Ok(())
}

pub fn suggested_filename() -> String {
    format!(
        "calm-composition-{}.json",
        chrono::Local::now().format("%Y-%m-%d")
    )
}
