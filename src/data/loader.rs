use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::model::{MAX_TRIALS, MeasurementRecord, parse_cell};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load measurement records from a file.  Dispatch by extension.
///
/// Every format carries the long layout `operator, part, trial, value`:
/// * `.csv`     – header row with those four columns
/// * `.json`    – `[{ "operator": "A", "part": "P1", "trial": 1, "value": 10.02 }, ...]`
/// * `.parquet` – string `operator`/`part`, integer `trial`, float `value`
///
/// Rows whose value is empty or not a number are skipped, like blank table
/// cells.
pub fn load_file(path: &Path) -> Result<Vec<MeasurementRecord>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

/// The single part shared by `records`.
///
/// The table holds one part at a time, so mixed files are rejected.
pub fn single_part(records: &[MeasurementRecord]) -> Result<Option<String>> {
    let parts: BTreeSet<&str> = records.iter().map(|r| r.part.as_str()).collect();
    match parts.len() {
        0 => Ok(None),
        1 => Ok(parts.into_iter().next().map(str::to_string)),
        n => bail!(
            "File holds {n} parts ({}); the table takes one part at a time",
            parts.into_iter().collect::<Vec<_>>().join(", ")
        ),
    }
}

/// Write `records` as CSV with an `operator,part,trial,value` header.
pub fn save_csv(path: &Path, records: &[MeasurementRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    for record in records {
        writer.serialize(record).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    operator: String,
    part: String,
    trial: u32,
    /// Kept as text so non-numeric cells can be skipped rather than fail.
    value: String,
}

fn load_csv(path: &Path) -> Result<Vec<MeasurementRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .context("opening CSV")?;

    let mut records = Vec::new();
    for (row_no, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;
        check_trial(row.trial, row_no)?;
        if let Some(value) = parse_cell(&row.value) {
            records.push(MeasurementRecord {
                operator: row.operator,
                part: row.part,
                trial: row.trial,
                value,
            });
        }
    }
    Ok(records)
}

fn check_trial(trial: u32, row: usize) -> Result<()> {
    if trial == 0 {
        bail!("Row {row}: trial numbers start at 1");
    }
    if trial > MAX_TRIALS {
        bail!("Row {row}: trial {trial} exceeds the limit of {MAX_TRIALS}");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, e.g. `df.to_json(orient='records')`.
/// `value` may be a number or a numeric string.
fn load_json(path: &Path) -> Result<Vec<MeasurementRecord>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let operator = json_string(obj.get("operator"), i, "operator")?;
        let part = json_string(obj.get("part"), i, "part")?;
        let trial = obj
            .get("trial")
            .and_then(JsonValue::as_u64)
            .and_then(|t| u32::try_from(t).ok())
            .with_context(|| format!("Row {i}: missing or invalid 'trial'"))?;
        check_trial(trial, i)?;

        let value = match obj.get("value") {
            Some(JsonValue::Number(n)) => n.as_f64(),
            Some(JsonValue::String(s)) => parse_cell(s),
            _ => None,
        };
        if let Some(value) = value {
            records.push(MeasurementRecord {
                operator,
                part,
                trial,
                value,
            });
        }
    }
    Ok(records)
}

fn json_string(val: Option<&JsonValue>, row: usize, col: &str) -> Result<String> {
    match val {
        Some(JsonValue::String(s)) => Ok(s.trim().to_string()),
        Some(JsonValue::Number(n)) => Ok(n.to_string()),
        _ => bail!("Row {row}: missing or invalid '{col}'"),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Vec<MeasurementRecord>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        let operator_col = named_column(&batch, "operator")?;
        let part_col = named_column(&batch, "part")?;
        let trial_col = named_column(&batch, "trial")?;
        let value_col = named_column(&batch, "value")?;

        for row in 0..batch.num_rows() {
            let trial = extract_trial(trial_col, row)
                .with_context(|| format!("Row {row}: failed to read 'trial'"))?;
            check_trial(trial, row)?;
            let Some(value) = extract_value(value_col, row)? else {
                continue;
            };
            records.push(MeasurementRecord {
                operator: extract_string(operator_col, row)
                    .with_context(|| format!("Row {row}: failed to read 'operator'"))?,
                part: extract_string(part_col, row)
                    .with_context(|| format!("Row {row}: failed to read 'part'"))?,
                trial,
                value,
            });
        }
    }

    Ok(records)
}

// -- Parquet / Arrow helpers --

fn named_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Arc<dyn Array>> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| anyhow::anyhow!("Parquet file missing '{name}' column"))?;
    Ok(batch.column(idx))
}

fn extract_string(col: &Arc<dyn Array>, row: usize) -> Result<String> {
    if col.is_null(row) {
        bail!("null value in text column");
    }
    match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            Ok(arr.value(row).to_string())
        }
        DataType::LargeUtf8 => Ok(col.as_string::<i64>().value(row).to_string()),
        other => bail!("Expected Utf8 column, got {other:?}"),
    }
}

fn extract_trial(col: &Arc<dyn Array>, row: usize) -> Result<u32> {
    if col.is_null(row) {
        bail!("null trial number");
    }
    let raw = match col.data_type() {
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .context("expected Int32Array")?
            .value(row) as i64,
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .context("expected Int64Array")?
            .value(row),
        other => bail!("Expected Int32 or Int64 trial column, got {other:?}"),
    };
    u32::try_from(raw).with_context(|| format!("trial {raw} out of range"))
}

/// `None` for nulls and non-finite values, which count as empty cells.
fn extract_value(col: &Arc<dyn Array>, row: usize) -> Result<Option<f64>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let value = match col.data_type() {
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .context("expected Float64Array")?
            .value(row),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .context("expected Float32Array")?
            .value(row) as f64,
        other => bail!("Expected Float64 or Float32 value column, got {other:?}"),
    };
    Ok(Some(value).filter(|v| v.is_finite()))
}
