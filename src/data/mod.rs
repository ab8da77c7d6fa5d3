/// Data layer: photometry table ingestion and report output.
///
/// Architecture:
/// ```text
///  .parquet / .json / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → PhotometryTable
///   └──────────┘
///        │
///        ▼
///   ┌────────────────┐
///   │ PhotometryTable │  time-sorted Vec<MonochromaticFlux>
///   └────────────────┘
///        │
///        ▼  (sed pipeline)
///   ┌──────────┐
///   │  writer   │  interpolated SEDs → CSV report
///   └──────────┘
/// ```
pub mod loader;
pub mod model;
pub mod writer;
