use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::sed::model::Sed;

// ---------------------------------------------------------------------------
// CSV report output
// ---------------------------------------------------------------------------

/// One output row: a flux measurement tagged with its SED's epoch and
/// whether it was interpolated rather than directly observed.
#[derive(Debug, Serialize)]
struct SedRow {
    epoch: f64,
    wavelength: f64,
    flux: f64,
    flux_uncertainty: f64,
    interpolated: bool,
}

/// Write the interpolated SED collection as a flat CSV report.
///
/// `originals` is the pre-interpolation collection, used to mark which
/// rows were synthesized; it must be index-aligned with `seds`.
pub fn write_seds_csv(path: &Path, seds: &[Sed], originals: &[Sed]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating output CSV")?;

    for (sed, original) in seds.iter().zip(originals) {
        for flux in &sed.fluxes {
            let observed = original
                .fluxes
                .iter()
                .any(|f| f.wavelength_key() == flux.wavelength_key());
            writer
                .serialize(SedRow {
                    epoch: sed.epoch,
                    wavelength: flux.wavelength,
                    flux: flux.flux,
                    flux_uncertainty: flux.flux_uncertainty,
                    interpolated: !observed,
                })
                .with_context(|| format!("writing row for epoch {}", sed.epoch))?;
        }
    }
    writer.flush().context("flushing output CSV")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sed::combine::build_sed;
    use crate::sed::interpolate::interpolate_missing_fluxes;
    use crate::sed::model::MonochromaticFlux;

    #[test]
    fn marks_interpolated_rows() {
        let seds = vec![
            build_sed(&[
                MonochromaticFlux::new(10.0, 1.0, 4770.0, 1.0),
                MonochromaticFlux::new(30.0, 1.5, 6231.0, 1.0),
            ])
            .unwrap(),
            build_sed(&[MonochromaticFlux::new(12.0, 1.0, 4770.0, 2.0)]).unwrap(),
            build_sed(&[
                MonochromaticFlux::new(14.0, 1.0, 4770.0, 3.0),
                MonochromaticFlux::new(34.0, 1.5, 6231.0, 3.0),
            ])
            .unwrap(),
        ];
        let filled = interpolate_missing_fluxes(&seds);

        let file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write_seds_csv(file.path(), &filled, &seds).unwrap();

        let text = std::fs::read_to_string(file.path()).unwrap();
        let interpolated_rows: Vec<&str> =
            text.lines().filter(|l| l.ends_with(",true")).collect();
        assert_eq!(interpolated_rows.len(), 1);
        assert!(interpolated_rows[0].starts_with("2.0,6231.0,32.0"));
    }
}
