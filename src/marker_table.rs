use anyhow::{Context, Result};
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Where the surrounding application keeps its marker table by default.
pub const DEFAULT_TABLE_PATH: &str = "data/disease_markers.csv";

const BUILTIN_MARKERS_CSV: &str = include_str!("../assets/disease_markers.csv");

/// One reference entry: a short {A,T,C,G} marker substring, its associated
/// risk score (conventionally in [0,1], not enforced) and a free-text
/// description. Marker uniqueness within a table is not enforced;
/// duplicates are processed independently.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerRecord {
    #[serde(rename = "Marker")]
    pub marker: String,
    #[serde(rename = "Associated Risk")]
    pub risk: f64,
    #[serde(rename = "Description")]
    pub description: String,
}

/// An ordered reference table of disease markers. Iteration order is the
/// order of the source rows.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkerTable {
    records: Vec<MarkerRecord>,
}

impl MarkerTable {
    pub fn new(records: Vec<MarkerRecord>) -> Self {
        Self { records }
    }

    /// Strict parse of CSV text with a `Marker,Associated Risk,Description`
    /// header row. Any malformed row is an error, not a skip.
    pub fn from_csv_text(csv_text: &str) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(csv_text.as_bytes());
        let mut records = vec![];
        for row in reader.deserialize() {
            let record: MarkerRecord = row.context("Bad marker table row")?;
            records.push(record);
        }
        Ok(Self { records })
    }

    pub fn from_csv_path(path: &str) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Cannot read marker table {path}"))?;
        Self::from_csv_text(&text)
    }

    /// Loads a table from `path`, falling back to the built-in table when
    /// the file is missing, unreadable, malformed or empty. The fallback is
    /// a visible branch, not an error.
    pub fn load_or_default(path: &str) -> Self {
        match Self::from_csv_path(path) {
            Ok(table) if !table.is_empty() => {
                log::debug!("Loaded {} markers from {path}", table.len());
                table
            }
            Ok(_) => {
                log::warn!("Marker table {path} is empty, using built-in markers");
                Self::default()
            }
            Err(e) => {
                log::warn!("Cannot load marker table {path}, using built-in markers: {e}");
                Self::default()
            }
        }
    }

    #[inline(always)]
    pub fn records(&self) -> &[MarkerRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &MarkerRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for MarkerTable {
    fn default() -> Self {
        Self::from_csv_text(BUILTIN_MARKERS_CSV).expect("Invalid built-in marker table")
    }
}

/// Writes the built-in marker table to `path` unless a file is already
/// there, creating parent directories as needed. Intended as a one-shot
/// bootstrap call made by the surrounding application at startup; the
/// engine itself never touches the file system implicitly.
pub fn ensure_default_table_exists(path: &str) -> Result<()> {
    let path = Path::new(path);
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create {}", parent.display()))?;
        }
    }
    fs::write(path, BUILTIN_MARKERS_CSV)
        .with_context(|| format!("Cannot write default marker table {}", path.display()))?;
    log::debug!("Wrote default marker table to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table() {
        let table = MarkerTable::default();
        assert_eq!(table.len(), 5);
        let first = &table.records()[0];
        assert_eq!(first.marker, "ATCGT");
        assert_eq!(first.risk, 0.8);
        assert!(table.iter().any(|r| r.marker == "CCTGA" && r.risk == 0.9));
    }

    #[test]
    fn test_from_csv_text_preserves_order() {
        let text = "Marker,Associated Risk,Description\n\
                    GGGG,0.2,first\n\
                    AAAA,0.9,second\n";
        let table = MarkerTable::from_csv_text(text).unwrap();
        let markers: Vec<&str> = table.iter().map(|r| r.marker.as_str()).collect();
        assert_eq!(markers, ["GGGG", "AAAA"]);
        assert_eq!(table.records()[1].description, "second");
    }

    #[test]
    fn test_from_csv_text_trims_padded_header() {
        let text = "Marker, Associated Risk, Description\nATCGT, 0.8, padded row\n";
        let table = MarkerTable::from_csv_text(text).unwrap();
        assert_eq!(table.records()[0].risk, 0.8);
        assert_eq!(table.records()[0].description, "padded row");
    }

    #[test]
    fn test_from_csv_text_rejects_bad_risk() {
        let text = "Marker,Associated Risk,Description\nATCGT,high,oops\n";
        assert!(MarkerTable::from_csv_text(text).is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.csv");
        let table = MarkerTable::load_or_default(path.to_str().unwrap());
        assert_eq!(table, MarkerTable::default());
    }

    #[test]
    fn test_load_or_default_empty_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        fs::write(&path, "Marker,Associated Risk,Description\n").unwrap();
        let table = MarkerTable::load_or_default(path.to_str().unwrap());
        assert_eq!(table, MarkerTable::default());
    }

    #[test]
    fn test_load_or_default_custom_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("markers.csv");
        fs::write(&path, "Marker,Associated Risk,Description\nTTTT,0.3,custom\n").unwrap();
        let table = MarkerTable::load_or_default(path.to_str().unwrap());
        assert_eq!(table.len(), 1);
        assert_eq!(table.records()[0].marker, "TTTT");
    }

    #[test]
    fn test_ensure_default_table_exists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("disease_markers.csv");
        let path = path.to_str().unwrap();
        ensure_default_table_exists(path).unwrap();
        let table = MarkerTable::from_csv_path(path).unwrap();
        assert_eq!(table, MarkerTable::default());

        // A second call must not clobber an existing file.
        fs::write(path, "Marker,Associated Risk,Description\nCCCC,0.1,kept\n").unwrap();
        ensure_default_table_exists(path).unwrap();
        let table = MarkerTable::from_csv_path(path).unwrap();
        assert_eq!(table.records()[0].marker, "CCCC");
    }
}
