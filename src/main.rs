mod data;
mod sed;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use log::info;

use data::{loader, writer};
use sed::combine::{build_sed, group_by_day};
use sed::interpolate::interpolate_missing_fluxes;
use sed::model::Sed;

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(input) = args.next().map(PathBuf::from) else {
        bail!("usage: snsed <photometry-file> [output.csv]");
    };
    let output = args.next().map(PathBuf::from);

    let table = loader::load_file(&input)
        .with_context(|| format!("loading photometry from {}", input.display()))?;
    if table.is_empty() {
        bail!("{} contains no flux measurements", input.display());
    }
    info!("{} measurements loaded", table.len());

    let seds: Vec<Sed> = group_by_day(table.records())
        .iter()
        .map(|group| build_sed(group))
        .collect::<Result<_, _>>()?;
    info!("{} observation epochs", seds.len());

    let filled = interpolate_missing_fluxes(&seds);
    let added: usize = filled
        .iter()
        .zip(&seds)
        .map(|(after, before)| after.len() - before.len())
        .sum();
    info!("{added} fluxes interpolated into gaps");

    match output {
        Some(path) => {
            writer::write_seds_csv(&path, &filled, &seds)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Wrote {} SEDs to {}", filled.len(), path.display());
        }
        None => {
            for sed in &filled {
                println!("epoch {}: {} wavelengths", sed.epoch, sed.len());
            }
        }
    }

    Ok(())
}
