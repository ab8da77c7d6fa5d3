use std::collections::BTreeMap;

use super::model::{ExactKey, MonochromaticFlux, Sed};
use super::SedError;

// ---------------------------------------------------------------------------
// Day-bucket grouping
// ---------------------------------------------------------------------------

/// Partition time-sorted fluxes into consecutive runs sharing `floor(time)`.
///
/// This is a run partition, not a clustering: the input is expected in
/// non-decreasing time order, and a flux arriving out of order starts a
/// new group even if its integer day matches an earlier one.
pub fn group_by_day(fluxes: &[MonochromaticFlux]) -> Vec<Vec<MonochromaticFlux>> {
    let mut groups: Vec<Vec<MonochromaticFlux>> = Vec::new();
    for &flux in fluxes {
        match groups.last_mut() {
            Some(group) if group[0].time.floor() == flux.time.floor() => group.push(flux),
            _ => groups.push(vec![flux]),
        }
    }
    groups
}

// ---------------------------------------------------------------------------
// Inverse-variance weighting
// ---------------------------------------------------------------------------

/// Inverse-variance weights, `1 / σ²`.
///
/// Precondition: every uncertainty is nonzero. A zero produces an infinite
/// weight; validating that is owed by the caller, not checked here.
pub fn weights(uncertainties: &[f64]) -> Vec<f64> {
    uncertainties.iter().map(|s| 1.0 / (s * s)).collect()
}

/// Inverse-variance weighted mean of `values`.
pub fn weighted_average(values: &[f64], uncertainties: &[f64]) -> Result<f64, SedError> {
    if values.len() != uncertainties.len() {
        return Err(SedError::LengthMismatch {
            values: values.len(),
            uncertainties: uncertainties.len(),
        });
    }
    if values.is_empty() {
        return Err(SedError::EmptyInput);
    }
    let weights = weights(uncertainties);
    let denominator: f64 = weights.iter().sum();
    let numerator: f64 = weights.iter().zip(values).map(|(w, v)| w * v).sum();
    Ok(numerator / denominator)
}

/// Standard error of the weighted mean, `1 / sqrt(Σ wᵢ)`.
pub fn weighted_average_uncertainty(uncertainties: &[f64]) -> Result<f64, SedError> {
    if uncertainties.is_empty() {
        return Err(SedError::EmptyInput);
    }
    let total: f64 = weights(uncertainties).iter().sum();
    Ok(1.0 / total.sqrt())
}

// ---------------------------------------------------------------------------
// Flux combination
// ---------------------------------------------------------------------------

/// Collapse duplicate measurements into one weighted-average flux.
///
/// All inputs must share a wavelength and an equivalent epoch (same
/// `floor(time)` bucket); the result carries the wavelength and time of the
/// first element.
pub fn combine_fluxes(fluxes: &[MonochromaticFlux]) -> Result<MonochromaticFlux, SedError> {
    let first = fluxes.first().ok_or(SedError::EmptyInput)?;
    let values: Vec<f64> = fluxes.iter().map(|f| f.flux).collect();
    let uncertainties: Vec<f64> = fluxes.iter().map(|f| f.flux_uncertainty).collect();
    Ok(MonochromaticFlux::new(
        weighted_average(&values, &uncertainties)?,
        weighted_average_uncertainty(&uncertainties)?,
        first.wavelength,
        first.time,
    ))
}

// ---------------------------------------------------------------------------
// SED builder
// ---------------------------------------------------------------------------

/// Build one SED from the fluxes of a single epoch.
///
/// Fluxes are partitioned by exact wavelength; a lone measurement is kept
/// as-is, duplicates are combined. The SED's epoch is the first input
/// flux's time, and the returned fluxes are in wavelength order.
pub fn build_sed(fluxes: &[MonochromaticFlux]) -> Result<Sed, SedError> {
    let epoch = fluxes.first().ok_or(SedError::EmptyInput)?.time;

    let mut by_wavelength: BTreeMap<ExactKey, Vec<MonochromaticFlux>> = BTreeMap::new();
    for &flux in fluxes {
        by_wavelength.entry(flux.wavelength_key()).or_default().push(flux);
    }

    let mut sed_fluxes = Vec::with_capacity(by_wavelength.len());
    for group in by_wavelength.values() {
        if group.len() == 1 {
            sed_fluxes.push(group[0]);
        } else {
            sed_fluxes.push(combine_fluxes(group)?);
        }
    }
    Ok(Sed::new(epoch, sed_fluxes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn flux(flux: f64, uncertainty: f64, wavelength: f64, time: f64) -> MonochromaticFlux {
        MonochromaticFlux::new(flux, uncertainty, wavelength, time)
    }

    #[test]
    fn weighted_average_worked_example() {
        // weights [1.0, 0.25] → (1.0*10 + 0.25*20) / 1.25
        let avg = weighted_average(&[10.0, 20.0], &[1.0, 2.0]).unwrap();
        assert_relative_eq!(avg, 12.0, epsilon = 1e-12);

        let unc = weighted_average_uncertainty(&[1.0, 2.0]).unwrap();
        assert_relative_eq!(unc, 1.0 / 1.25_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn weighted_average_stays_within_value_range() {
        let values = [3.0, 7.5, 5.2, 4.1];
        let uncertainties = [0.5, 2.0, 1.3, 0.8];
        let avg = weighted_average(&values, &uncertainties).unwrap();
        assert!(avg >= 3.0 && avg <= 7.5);
    }

    #[test]
    fn uncertainty_shrinks_with_more_measurements() {
        let two = weighted_average_uncertainty(&[1.0, 1.0]).unwrap();
        let three = weighted_average_uncertainty(&[1.0, 1.0, 1.0]).unwrap();
        assert!(two > 0.0);
        assert!(three < two);
    }

    #[test]
    fn weighted_average_rejects_bad_shapes() {
        assert!(matches!(
            weighted_average(&[], &[]),
            Err(SedError::EmptyInput)
        ));
        assert!(matches!(
            weighted_average(&[1.0], &[1.0, 2.0]),
            Err(SedError::LengthMismatch { values: 1, uncertainties: 2 })
        ));
    }

    #[test]
    fn group_by_day_buckets_consecutive_runs() {
        let fluxes = [
            flux(1.0, 0.1, 4770.0, 100.1),
            flux(2.0, 0.1, 6231.0, 100.7),
            flux(3.0, 0.1, 4770.0, 101.2),
        ];
        let groups = group_by_day(&fluxes);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[1].len(), 1);
    }

    #[test]
    fn group_by_day_splits_out_of_order_input() {
        // Same integer day, but not consecutive: stays in separate groups.
        let fluxes = [
            flux(1.0, 0.1, 4770.0, 100.1),
            flux(2.0, 0.1, 6231.0, 101.5),
            flux(3.0, 0.1, 4770.0, 100.9),
        ];
        let groups = group_by_day(&fluxes);
        assert_eq!(groups.len(), 3);
    }

    #[test]
    fn combine_fluxes_takes_wavelength_and_time_from_first() {
        let combined = combine_fluxes(&[
            flux(10.0, 1.0, 4770.0, 100.1),
            flux(20.0, 2.0, 4770.0, 100.4),
        ])
        .unwrap();
        assert_relative_eq!(combined.flux, 12.0, epsilon = 1e-12);
        assert_eq!(combined.wavelength, 4770.0);
        assert_eq!(combined.time, 100.1);
    }

    #[test]
    fn build_sed_keeps_distinct_wavelengths_untouched() {
        let inputs = [
            flux(1.0, 0.1, 4770.0, 100.0),
            flux(2.0, 0.2, 6231.0, 100.0),
            flux(3.0, 0.3, 7625.0, 100.0),
        ];
        let sed = build_sed(&inputs).unwrap();
        assert_eq!(sed.len(), 3);
        assert_eq!(sed.epoch, 100.0);
        for input in &inputs {
            assert!(sed.fluxes.contains(input));
        }
    }

    #[test]
    fn build_sed_combines_duplicate_wavelengths() {
        let sed = build_sed(&[
            flux(10.0, 1.0, 4770.0, 100.0),
            flux(20.0, 2.0, 4770.0, 100.2),
        ])
        .unwrap();
        assert_eq!(sed.len(), 1);
        assert_relative_eq!(sed.fluxes[0].flux, 12.0, epsilon = 1e-12);
        assert_relative_eq!(
            sed.fluxes[0].flux_uncertainty,
            1.0 / 1.25_f64.sqrt(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn build_sed_rejects_empty_input() {
        assert!(matches!(build_sed(&[]), Err(SedError::EmptyInput)));
    }
}
