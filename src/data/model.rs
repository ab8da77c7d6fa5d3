use crate::sed::model::MonochromaticFlux;

// ---------------------------------------------------------------------------
// PhotometryTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// A loaded photometry table, normalized to non-decreasing time order so
/// the combiner's day-bucket grouping sees a sorted stream.
#[derive(Debug, Clone)]
pub struct PhotometryTable {
    records: Vec<MonochromaticFlux>,
}

impl PhotometryTable {
    /// Build a table from raw records, sorting by time.
    pub fn from_records(mut records: Vec<MonochromaticFlux>) -> Self {
        records.sort_by(|a, b| a.time.total_cmp(&b.time));
        PhotometryTable { records }
    }

    pub fn records(&self) -> &[MonochromaticFlux] {
        &self.records
    }

    /// Number of flux measurements.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
