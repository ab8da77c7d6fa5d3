/// SED layer: duplicate averaging and gap-aware interpolation.
///
/// Architecture:
/// ```text
///   time-sorted fluxes
///         │
///         ▼
///    ┌──────────┐
///    │ combine   │  group by day, weighted-average duplicates → Sed per epoch
///    └──────────┘
///         │
///         ▼
///    ┌─────────────┐
///    │  Vec<Sed>    │  one SED per observation epoch
///    └─────────────┘
///         │
///         ▼
///    ┌──────────────┐
///    │ interpolate   │  fill per-wavelength gaps across epochs → new Vec<Sed>
///    └──────────────┘
/// ```
pub mod combine;
pub mod interpolate;
pub mod model;

use thiserror::Error;

/// Errors raised by the averaging stage on malformed input.
///
/// Leading/trailing gaps and over-threshold gaps during interpolation are
/// not errors; those epochs are skipped silently.
#[derive(Debug, Error)]
pub enum SedError {
    #[error("cannot combine an empty set of flux measurements")]
    EmptyInput,

    #[error("values and uncertainties differ in length ({values} vs {uncertainties})")]
    LengthMismatch { values: usize, uncertainties: usize },
}
