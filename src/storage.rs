//! Loading and saving crop tables.
//!
//! Three on-disk layouts are understood:
//! - crop-major JSON (`{crop: {code: {harvested_area, ...}}}`), the layout served by the API;
//! - municipality-major JSON (`{code: {municipality_name, state_code, crops: {crop: area}}}`);
//! - tidy CSV with one row per (municipality, crop).

use crate::models::{CropRecord, CropTable, MunicipalityEntry};
use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Load a crop table from `.json` (either layout) or `.csv`, by extension.
pub fn load_table<P: AsRef<Path>>(path: P) -> Result<CropTable> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("json")
        .to_ascii_lowercase();
    match ext.as_str() {
        "csv" => load_csv(path),
        _ => load_json(path),
    }
}

/// Load crop-major or municipality-major JSON, detecting the layout.
pub fn load_json<P: AsRef<Path>>(path: P) -> Result<CropTable> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading crop data from {}", path.display()))?;
    parse_json(&text).with_context(|| format!("parsing crop data in {}", path.display()))
}

pub fn parse_json(text: &str) -> Result<CropTable> {
    let value: Value = serde_json::from_str(text)?;
    if is_municipality_major(&value) {
        let source: BTreeMap<String, MunicipalityEntry> = serde_json::from_value(value)?;
        Ok(CropTable::from_municipality_major(&source))
    } else {
        Ok(serde_json::from_value(value)?)
    }
}

fn is_municipality_major(value: &Value) -> bool {
    value
        .as_object()
        .and_then(|top| top.values().next())
        .and_then(Value::as_object)
        .is_some_and(|first| first.contains_key("crops"))
}

#[derive(Debug, Deserialize)]
struct RawRow {
    municipality_code: String,
    #[serde(default)]
    municipality_name: Option<String>,
    #[serde(default)]
    state_code: Option<String>,
    crop: String,
    #[serde(default)]
    harvested_area: Option<String>,
}

/// Load a tidy CSV. An empty area cell is kept as "no data"; dashed,
/// non-numeric, or non-positive areas skip the row. Decimal commas are
/// accepted. Empty name and state cells read back as absent, so a table
/// written by [`save_csv`] loads unchanged.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<CropTable> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let mut table = CropTable::default();
    let mut skipped = 0usize;
    for (i, row) in rdr.deserialize::<RawRow>().enumerate() {
        let row = row.with_context(|| format!("{}: row {}", path.display(), i + 1))?;
        let harvested_area = match non_empty(row.harvested_area) {
            None => None,
            Some(cell) => match parse_area(&cell) {
                Some(area) => Some(area),
                None => {
                    skipped += 1;
                    continue;
                }
            },
        };
        let name = non_empty(row.municipality_name);
        let (municipality_name, state_code) = match (name, non_empty(row.state_code)) {
            (name, Some(uf)) => (name, Some(uf)),
            (Some(label), None) => {
                let (name, uf) = split_name_and_state(&label);
                (Some(name), uf)
            }
            (None, None) => (None, None),
        };
        table.insert(
            &row.crop,
            &row.municipality_code,
            CropRecord {
                harvested_area,
                municipality_name,
                state_code,
            },
        );
    }
    log::debug!("{}: skipped {} rows with an unusable area", path.display(), skipped);
    Ok(table)
}

/// Parse a harvested-area cell: `"1234"`, `"12.5"`, or Brazilian `"1.234,5"`.
/// Returns `None` for blanks, `-`, non-numbers, and values that are not
/// strictly positive.
pub fn parse_area(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() || cell == "-" {
        return None;
    }
    let normalized = if cell.contains(',') {
        cell.replace('.', "").replace(',', ".")
    } else {
        cell.to_string()
    };
    let v: f64 = normalized.parse().ok()?;
    (v.is_finite() && v > 0.0).then_some(v)
}

fn non_empty(cell: Option<String>) -> Option<String> {
    cell.filter(|s| !s.is_empty())
}

/// Split `"Ariquemes (RO)"` into `("Ariquemes", Some("RO"))`. Without a
/// suffix the whole label is the name.
pub fn split_name_and_state(label: &str) -> (String, Option<String>) {
    if let Some(stripped) = label.strip_suffix(')')
        && let Some((name, uf)) = stripped.rsplit_once(" (")
    {
        return (name.to_string(), Some(uf.to_string()));
    }
    (label.to_string(), None)
}

/// Save as pretty crop-major JSON.
pub fn save_json<P: AsRef<Path>>(table: &CropTable, path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(table)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

/// Save as tidy CSV with header. Text cells that a spreadsheet would read as
/// a formula are prefixed with `'`.
pub fn save_csv<P: AsRef<Path>>(table: &CropTable, path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.write_record([
        "municipality_code",
        "municipality_name",
        "state_code",
        "crop",
        "harvested_area",
    ])?;
    for row in table.to_rows() {
        wtr.serialize((
            sanitize_cell(&row.municipality_code),
            sanitize_cell(&row.municipality_name),
            sanitize_cell(&row.state_code),
            sanitize_cell(&row.crop),
            row.harvested_area,
        ))?;
    }
    wtr.flush()?;
    Ok(())
}

fn sanitize_cell(s: &str) -> String {
    match s.chars().next() {
        Some('=' | '+' | '-' | '@' | '\t' | '\r') => format!("'{s}"),
        _ => s.to_string(),
    }
}
