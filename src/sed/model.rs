use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ExactKey – bit-exact f64 key for wavelength/time matching
// ---------------------------------------------------------------------------

/// An `f64` wrapper usable as a `BTreeMap` / `BTreeSet` key.
///
/// Wavelength and epoch matching throughout this crate is exact: two keys
/// compare equal only under `f64::total_cmp`, with no tolerance or binning.
/// Measurements at 4770.0 Å and 4770.0000001 Å are different wavelengths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExactKey(pub f64);

impl Eq for ExactKey {}

impl PartialOrd for ExactKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ExactKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl std::hash::Hash for ExactKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl From<f64> for ExactKey {
    fn from(v: f64) -> Self {
        ExactKey(v)
    }
}

impl fmt::Display for ExactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// MonochromaticFlux – one measurement at one wavelength and time
// ---------------------------------------------------------------------------

/// A single flux measurement. Immutable after construction; the combiner
/// and interpolator synthesize new instances rather than editing old ones.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonochromaticFlux {
    /// Measured signal, in whatever flux unit the run uses consistently.
    pub flux: f64,
    /// Standard deviation of `flux`. Must be nonzero wherever the value is
    /// fed into an inverse-variance weight; the core does not validate this.
    pub flux_uncertainty: f64,
    /// Effective wavelength of the observation. Compared exactly.
    pub wavelength: f64,
    /// Observation epoch (e.g. MJD). Compared exactly.
    pub time: f64,
}

impl MonochromaticFlux {
    pub fn new(flux: f64, flux_uncertainty: f64, wavelength: f64, time: f64) -> Self {
        MonochromaticFlux {
            flux,
            flux_uncertainty,
            wavelength,
            time,
        }
    }

    pub fn wavelength_key(&self) -> ExactKey {
        ExactKey(self.wavelength)
    }

    pub fn time_key(&self) -> ExactKey {
        ExactKey(self.time)
    }
}

// ---------------------------------------------------------------------------
// Sed – all fluxes of one observation epoch
// ---------------------------------------------------------------------------

/// A spectral energy distribution: the flux measurements of one epoch, at
/// most one per wavelength.
///
/// The epoch is stored explicitly rather than inferred from the first
/// element, so appending interpolated fluxes later cannot change it.
#[derive(Debug, Clone, PartialEq)]
pub struct Sed {
    pub epoch: f64,
    pub fluxes: Vec<MonochromaticFlux>,
}

impl Sed {
    pub fn new(epoch: f64, fluxes: Vec<MonochromaticFlux>) -> Self {
        Sed { epoch, fluxes }
    }

    pub fn epoch_key(&self) -> ExactKey {
        ExactKey(self.epoch)
    }

    /// Number of wavelengths with a measurement in this SED.
    pub fn len(&self) -> usize {
        self.fluxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fluxes.is_empty()
    }

    /// Whether this SED already holds a measurement at the given wavelength.
    pub fn contains_wavelength(&self, wavelength: f64) -> bool {
        let key = ExactKey(wavelength);
        self.fluxes.iter().any(|f| f.wavelength_key() == key)
    }
}
