use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::{Deserialize, Serialize};

use super::model::{Dataset, Record, Species};
use crate::error::DashboardError;

/// The published Palmer penguins table, compiled into the binary.
const BUNDLED_CSV: &str = include_str!("../../assets/penguins.csv");

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Where the base table comes from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// The copy embedded at compile time.
    #[default]
    Bundled,
    /// A `.csv`, `.json` or `.parquet` file on disk.
    File(PathBuf),
}

impl DataSource {
    fn describe(&self) -> String {
        match self {
            DataSource::Bundled => "bundled penguins.csv".to_string(),
            DataSource::File(path) => path.display().to_string(),
        }
    }
}

/// Load the base dataset. Called once at startup.
pub fn load(source: &DataSource) -> Result<Dataset, DashboardError> {
    let result = match source {
        DataSource::Bundled => load_csv_from(BUNDLED_CSV.as_bytes()),
        DataSource::File(path) => load_file(path),
    };
    result
        .map(|dataset| {
            log::info!("Loaded {} penguin records from {}", dataset.len(), source.describe());
            dataset
        })
        .map_err(|e| DashboardError::DataUnavailable {
            origin: source.describe(),
            reason: format!("{e:#}"),
        })
}

/// Load a penguin table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, `NA` or empty for missing values
/// * `.json`    – `[{ "species": "Adelie", "bill_length_mm": 39.1, ... }, ...]`
/// * `.parquet` – one column per field, as written by `df.to_parquet()`
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV")?;
            load_csv_from(file)
        }
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Column positions resolved from a header row.
struct CsvColumns {
    species: usize,
    island: usize,
    bill_length_mm: usize,
    bill_depth_mm: usize,
    flipper_length_mm: usize,
    body_mass_g: usize,
    sex: Option<usize>,
    year: Option<usize>,
}

impl CsvColumns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require =
            |name: &str| find(name).with_context(|| format!("CSV missing '{name}' column"));

        Ok(CsvColumns {
            species: require("species")?,
            island: require("island")?,
            bill_length_mm: require("bill_length_mm")?,
            bill_depth_mm: require("bill_depth_mm")?,
            flipper_length_mm: require("flipper_length_mm")?,
            body_mass_g: require("body_mass_g")?,
            sex: find("sex"),
            year: find("year"),
        })
    }
}

/// CSV layout: header row naming the columns (any order); `sex` and `year`
/// may be absent.
fn load_csv_from<R: Read>(source: R) -> Result<Dataset> {
    let mut reader = csv::Reader::from_reader(source);
    let headers = reader.headers().context("reading CSV headers")?.clone();
    let cols = CsvColumns::resolve(&headers)?;

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;
        let cell = |idx: usize| row.get(idx).unwrap_or("").trim();

        let species: Species = cell(cols.species)
            .parse()
            .with_context(|| format!("CSV row {row_no}"))?;

        records.push(Record {
            species,
            island: cell(cols.island).to_string(),
            bill_length_mm: parse_optional_f64(cell(cols.bill_length_mm), row_no, "bill_length_mm")?,
            bill_depth_mm: parse_optional_f64(cell(cols.bill_depth_mm), row_no, "bill_depth_mm")?,
            flipper_length_mm: parse_optional_f64(
                cell(cols.flipper_length_mm),
                row_no,
                "flipper_length_mm",
            )?,
            body_mass_g: parse_optional_f64(cell(cols.body_mass_g), row_no, "body_mass_g")?,
            sex: cols.sex.map(cell).filter(|s| !is_missing(s)).map(str::to_string),
            year: match cols.year.map(cell) {
                Some(s) if !is_missing(s) => Some(
                    s.parse::<i64>()
                        .with_context(|| format!("Row {row_no}, year: '{s}' is not an integer"))?,
                ),
                _ => None,
            },
        });
    }

    Ok(Dataset::new(records))
}

fn is_missing(s: &str) -> bool {
    s.is_empty() || s.eq_ignore_ascii_case("na") || s.eq_ignore_ascii_case("nan")
}

fn parse_optional_f64(s: &str, row: usize, col: &str) -> Result<Option<f64>> {
    if is_missing(s) {
        return Ok(None);
    }
    let value = s
        .parse::<f64>()
        .with_context(|| format!("Row {row}, {col}: '{s}' is not a number"))?;
    Ok(Some(value).filter(|v| v.is_finite()))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// One element of the records-oriented JSON layout
/// (`df.to_json(orient='records')`, `NaN` written as `null`).
#[derive(Deserialize)]
struct JsonRecord {
    species: String,
    island: String,
    bill_length_mm: Option<f64>,
    bill_depth_mm: Option<f64>,
    flipper_length_mm: Option<f64>,
    body_mass_g: Option<f64>,
    #[serde(default)]
    sex: Option<String>,
    #[serde(default)]
    year: Option<i64>,
}

fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let rows: Vec<JsonRecord> = serde_json::from_str(&text).context("parsing JSON")?;

    let records = rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            let species = row
                .species
                .parse::<Species>()
                .with_context(|| format!("Row {i}"))?;
            Ok(Record {
                species,
                island: row.island,
                bill_length_mm: row.bill_length_mm,
                bill_depth_mm: row.bill_depth_mm,
                flipper_length_mm: row.flipper_length_mm,
                body_mass_g: row.body_mass_g,
                sex: row.sex,
                year: row.year,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Dataset::new(records))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file containing the penguins table.
///
/// Text columns may be Utf8, LargeUtf8 or dictionary encoded (Pandas
/// `category`); numeric columns any integer or float type. Every column is
/// cast to a canonical type before reading.
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let column = |name: &str, to: &DataType| -> Result<Option<ArrayRef>> {
            match schema.index_of(name) {
                Ok(idx) => cast(batch.column(idx), to)
                    .map(Some)
                    .with_context(|| format!("casting '{name}' to {to:?}")),
                Err(_) => Ok(None),
            }
        };
        let required = |name: &str, to: &DataType| -> Result<ArrayRef> {
            column(name, to)?.with_context(|| format!("Parquet file missing '{name}' column"))
        };

        let species = required("species", &DataType::Utf8)?;
        let island = required("island", &DataType::Utf8)?;
        let bill_length = required("bill_length_mm", &DataType::Float64)?;
        let bill_depth = required("bill_depth_mm", &DataType::Float64)?;
        let flipper_length = required("flipper_length_mm", &DataType::Float64)?;
        let body_mass = required("body_mass_g", &DataType::Float64)?;
        let sex = column("sex", &DataType::Utf8)?;
        let year = column("year", &DataType::Int64)?;

        for row in 0..batch.num_rows() {
            let species_text = text_at(&species, row)
                .with_context(|| format!("Row {row}: null species"))?;
            let species = species_text
                .parse::<Species>()
                .with_context(|| format!("Row {row}"))?;

            records.push(Record {
                species,
                island: text_at(&island, row).unwrap_or_default(),
                bill_length_mm: f64_at(&bill_length, row),
                bill_depth_mm: f64_at(&bill_depth, row),
                flipper_length_mm: f64_at(&flipper_length, row),
                body_mass_g: f64_at(&body_mass, row),
                sex: sex.as_ref().and_then(|col| text_at(col, row)),
                year: year.as_ref().and_then(|col| i64_at(col, row)),
            });
        }
    }

    Ok(Dataset::new(records))
}

// -- Arrow helpers (columns already cast to Utf8 / Float64 / Int64) --

fn text_at(col: &ArrayRef, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    Some(col.as_string::<i32>().value(row).to_string())
}

fn f64_at(col: &ArrayRef, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    Some(col.as_primitive::<Float64Type>().value(row)).filter(|v| v.is_finite())
}

fn i64_at(col: &ArrayRef, row: usize) -> Option<i64> {
    if col.is_null(row) {
        return None;
    }
    Some(col.as_primitive::<Int64Type>().value(row))
}
