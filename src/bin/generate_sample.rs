use std::sync::Arc;

use arrow::array::Float64Array;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Post-peak supernova-like decline: exponential decay from `peak_flux`
/// with band-dependent timescale.
fn band_flux(t: f64, peak_flux: f64, decay_days: f64) -> f64 {
    peak_flux * (-t / decay_days).exp()
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);

    // UBVRI effective wavelengths (Å) with peak flux and decline timescale.
    let bands: [(f64, f64, f64); 5] = [
        (3640.0, 0.8, 12.0),
        (4450.0, 1.2, 15.0),
        (5510.0, 1.5, 20.0),
        (6580.0, 1.4, 25.0),
        (8060.0, 1.0, 30.0),
    ];

    // Nightly epochs starting at an arbitrary MJD, with small scheduling
    // jitter so times within a night differ between bands.
    let mjd0 = 57260.0;
    let nights = 20;

    let mut flux_col: Vec<f64> = Vec::new();
    let mut uncertainty_col: Vec<f64> = Vec::new();
    let mut wavelength_col: Vec<f64> = Vec::new();
    let mut time_col: Vec<f64> = Vec::new();

    for night in 0..nights {
        for &(wavelength, peak, decay) in &bands {
            // Drop ~20% of band/night combinations to leave gaps for the
            // interpolator to fill.
            if rng.next_f64() < 0.2 {
                continue;
            }

            let time = mjd0 + night as f64 + 0.1 + rng.next_f64() * 0.3;
            let clean = band_flux(night as f64, peak, decay);
            let uncertainty = (0.02 * clean).max(1e-3);
            let flux = rng.gauss(clean, uncertainty);

            flux_col.push(flux);
            uncertainty_col.push(uncertainty);
            wavelength_col.push(wavelength);
            time_col.push(time);

            // Occasionally observe the same band twice in a night so the
            // combiner has duplicates to average.
            if rng.next_f64() < 0.1 {
                let retime = time + 0.2;
                flux_col.push(rng.gauss(clean, uncertainty));
                uncertainty_col.push(uncertainty);
                wavelength_col.push(wavelength);
                time_col.push(retime);
            }
        }
    }

    let schema = Arc::new(Schema::new(vec![
        Field::new("flux", DataType::Float64, false),
        Field::new("flux_uncertainty", DataType::Float64, false),
        Field::new("wavelength", DataType::Float64, false),
        Field::new("time", DataType::Float64, false),
    ]));

    let n_rows = flux_col.len();
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Float64Array::from(flux_col)),
            Arc::new(Float64Array::from(uncertainty_col)),
            Arc::new(Float64Array::from(wavelength_col)),
            Arc::new(Float64Array::from(time_col)),
        ],
    )
    .expect("Failed to create RecordBatch");

    let output_path = "sample_photometry.parquet";
    let file = std::fs::File::create(output_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!("Wrote {n_rows} flux measurements ({nights} nights, {} bands) to {output_path}", bands.len());
}
