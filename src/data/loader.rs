use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, Float32Array, Float64Array};
use arrow::record_batch::RecordBatch;
use log::debug;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::PhotometryTable;
use crate::sed::model::MonochromaticFlux;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a photometry table from a file.  Dispatch by extension.
///
/// Supported formats, all with `flux`, `flux_uncertainty`, `wavelength`
/// and `time` columns:
/// * `.parquet` – flat Float64 columns (recommended)
/// * `.json`    – `[{ "flux": ..., "flux_uncertainty": ..., ... }, ...]`
/// * `.csv`     – header row naming the four columns
pub fn load_file(path: &Path) -> Result<PhotometryTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }?;

    debug!("loaded {} flux records from {}", records.len(), path.display());
    Ok(PhotometryTable::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "flux": 1.2e-15, "flux_uncertainty": 3.0e-17,
///     "wavelength": 4770.0, "time": 57261.2 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<MonochromaticFlux>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let records: Vec<MonochromaticFlux> =
        serde_json::from_str(&text).context("parsing JSON photometry records")?;
    Ok(records)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row `flux,flux_uncertainty,wavelength,time`, one
/// measurement per row. Column order is free; extra columns are ignored.
fn load_csv(path: &Path) -> Result<Vec<MonochromaticFlux>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let mut records = Vec::new();
    for (row_no, result) in reader.deserialize().enumerate() {
        let record: MonochromaticFlux = result.with_context(|| format!("CSV row {row_no}"))?;
        records.push(record);
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet photometry table.
///
/// Expected schema: `flux`, `flux_uncertainty`, `wavelength`, `time` as
/// Float64 (or Float32) columns, one measurement per row. Works with
/// files written by both Pandas and Polars.
fn load_parquet(path: &Path) -> Result<Vec<MonochromaticFlux>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        let flux = column_f64(&batch, "flux")?;
        let uncertainty = column_f64(&batch, "flux_uncertainty")?;
        let wavelength = column_f64(&batch, "wavelength")?;
        let time = column_f64(&batch, "time")?;

        for row in 0..batch.num_rows() {
            records.push(MonochromaticFlux::new(
                flux[row],
                uncertainty[row],
                wavelength[row],
                time[row],
            ));
        }
    }

    Ok(records)
}

// -- Parquet / Arrow helpers --

/// Extract a named column as `Vec<f64>`, accepting Float64 or Float32.
fn column_f64(batch: &RecordBatch, name: &str) -> Result<Vec<f64>> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| anyhow::anyhow!("Parquet file missing '{name}' column"))?;
    let col: &Arc<dyn Array> = batch.column(idx);

    if col.null_count() > 0 {
        bail!("null value in '{name}' column");
    }

    if let Some(f64_arr) = col.as_any().downcast_ref::<Float64Array>() {
        Ok(f64_arr.values().to_vec())
    } else if let Some(f32_arr) = col.as_any().downcast_ref::<Float32Array>() {
        Ok(f32_arr.values().iter().map(|&v| v as f64).collect())
    } else {
        bail!(
            "Column '{name}' is {:?}, expected Float64 or Float32",
            col.data_type()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_csv_photometry() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "flux,flux_uncertainty,wavelength,time").unwrap();
        writeln!(file, "2.0,0.2,4770.0,57262.1").unwrap();
        writeln!(file, "1.0,0.1,4770.0,57261.0").unwrap();

        let table = load_file(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        // Normalized to time order.
        assert_eq!(table.records()[0].flux, 1.0);
        assert_eq!(table.records()[1].wavelength, 4770.0);
    }

    #[test]
    fn loads_json_photometry() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"[{{"flux": 1.5, "flux_uncertainty": 0.1, "wavelength": 6231.0, "time": 57261.0}}]"#
        )
        .unwrap();

        let table = load_file(file.path()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.records()[0].flux, 1.5);
        assert_eq!(table.records()[0].time, 57261.0);
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = load_file(Path::new("photometry.hdf5")).unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension"));
    }
}
