use std::collections::BTreeSet;

use log::debug;

use super::model::{ExactKey, MonochromaticFlux, Sed};

/// Maximum time separation between bracketing measurements, in time units
/// (days for MJD epochs). Interpolating across wider gaps is considered
/// unreliable and is skipped.
pub const MAX_BRACKET_GAP: f64 = 2.0;

// ---------------------------------------------------------------------------
// Observed-set helpers
// ---------------------------------------------------------------------------

/// Sorted distinct wavelengths present anywhere across the SEDs.
pub fn observed_wavelengths(seds: &[Sed]) -> Vec<f64> {
    let keys: BTreeSet<ExactKey> = seds
        .iter()
        .flat_map(|sed| sed.fluxes.iter().map(MonochromaticFlux::wavelength_key))
        .collect();
    keys.into_iter().map(|k| k.0).collect()
}

/// Sorted distinct measurement times present anywhere across the SEDs.
pub fn observed_times(seds: &[Sed]) -> Vec<f64> {
    let keys: BTreeSet<ExactKey> = seds
        .iter()
        .flat_map(|sed| sed.fluxes.iter().map(MonochromaticFlux::time_key))
        .collect();
    keys.into_iter().map(|k| k.0).collect()
}

/// All measurements at the given wavelength across all SEDs, in encounter
/// order. Not necessarily time-sorted; the neighbor searches below scan
/// all candidates rather than assuming sortedness.
pub fn monochromatic_lightcurve(seds: &[Sed], wavelength: f64) -> Vec<MonochromaticFlux> {
    let key = ExactKey(wavelength);
    seds.iter()
        .flat_map(|sed| sed.fluxes.iter())
        .filter(|f| f.wavelength_key() == key)
        .copied()
        .collect()
}

/// Global epochs with no direct measurement in this lightcurve.
pub fn unobserved_times(lightcurve: &[MonochromaticFlux], observed_times: &[f64]) -> Vec<f64> {
    let own_times: BTreeSet<ExactKey> =
        lightcurve.iter().map(MonochromaticFlux::time_key).collect();
    observed_times
        .iter()
        .copied()
        .filter(|&t| !own_times.contains(&ExactKey(t)))
        .collect()
}

// ---------------------------------------------------------------------------
// Neighbor search
// ---------------------------------------------------------------------------

/// The measurement with the largest time strictly before `time`, or `None`
/// at the lightcurve's leading edge.
pub fn previous_flux(lightcurve: &[MonochromaticFlux], time: f64) -> Option<&MonochromaticFlux> {
    lightcurve
        .iter()
        .filter(|f| f.time < time)
        .max_by(|a, b| a.time.total_cmp(&b.time))
}

/// The measurement with the smallest time strictly after `time`, or `None`
/// at the lightcurve's trailing edge.
pub fn next_flux(lightcurve: &[MonochromaticFlux], time: f64) -> Option<&MonochromaticFlux> {
    lightcurve
        .iter()
        .filter(|f| f.time > time)
        .min_by(|a, b| a.time.total_cmp(&b.time))
}

// ---------------------------------------------------------------------------
// Linear interpolation under the gap policy
// ---------------------------------------------------------------------------

/// Linearly interpolate a synthetic measurement between two brackets.
///
/// The uncertainty is the symmetric propagation for a linear combination
/// of two independent measurements, `sqrt(w1²·σ_prev² + w2²·σ_next²)`.
fn interpolate_between(
    prev: &MonochromaticFlux,
    next: &MonochromaticFlux,
    time: f64,
) -> MonochromaticFlux {
    let span = next.time - prev.time;
    let value = prev.flux + (time - prev.time) * (next.flux - prev.flux) / span;

    let weight1 = (next.time - time) / span;
    let weight2 = (time - prev.time) / span;
    let uncertainty = (weight1 * weight1 * prev.flux_uncertainty * prev.flux_uncertainty
        + weight2 * weight2 * next.flux_uncertainty * next.flux_uncertainty)
        .sqrt();

    MonochromaticFlux::new(value, uncertainty, prev.wavelength, time)
}

/// Synthetic fluxes for every global epoch missing from this lightcurve.
///
/// An epoch is skipped when it has no bracket on either side, or when the
/// bracketing measurements are more than [`MAX_BRACKET_GAP`] apart.
pub fn interpolated_fluxes(
    lightcurve: &[MonochromaticFlux],
    observed_times: &[f64],
) -> Vec<MonochromaticFlux> {
    let mut interpolated = Vec::new();
    for time in unobserved_times(lightcurve, observed_times) {
        let (Some(prev), Some(next)) = (
            previous_flux(lightcurve, time),
            next_flux(lightcurve, time),
        ) else {
            // Leading or trailing gap: nothing to bracket with.
            continue;
        };
        if next.time - prev.time > MAX_BRACKET_GAP {
            debug!(
                "skipping interpolation at t={time}: bracket gap {} exceeds {MAX_BRACKET_GAP}",
                next.time - prev.time
            );
            continue;
        }
        interpolated.push(interpolate_between(prev, next, time));
    }
    interpolated
}

// ---------------------------------------------------------------------------
// Cross-epoch orchestration
// ---------------------------------------------------------------------------

/// Fill per-wavelength gaps across all epochs.
///
/// Returns a new collection in input order: each SED keeps its original
/// fluxes, followed by any interpolated fluxes whose time matches its
/// epoch exactly. SEDs sharing an epoch each receive the matching fluxes;
/// epoch uniqueness is owed by the caller.
pub fn interpolate_missing_fluxes(seds: &[Sed]) -> Vec<Sed> {
    let wavelengths = observed_wavelengths(seds);
    let times = observed_times(seds);
    debug!(
        "interpolating across {} wavelengths and {} epochs",
        wavelengths.len(),
        times.len()
    );

    let mut filled: Vec<Sed> = seds.to_vec();
    for wavelength in wavelengths {
        let lightcurve = monochromatic_lightcurve(seds, wavelength);
        for flux in interpolated_fluxes(&lightcurve, &times) {
            for sed in filled.iter_mut() {
                if sed.epoch_key() == flux.time_key() {
                    sed.fluxes.push(flux);
                }
            }
        }
    }
    filled
}
