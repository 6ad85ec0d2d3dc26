use crate::runner::Trajectory;
use anyhow::{Context, Result};
use std::io::Write;

/// Writes a `t` column and one column per coordinate label, one row per
/// sample.
pub fn write_csv<W: Write>(trajectory: &Trajectory, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    let [a, b, c] = trajectory.labels;
    wtr.write_record(["t", a, b, c])
        .context("Failed to write CSV header.")?;
    for sample in &trajectory.samples {
        let p = sample.point;
        wtr.write_record([
            sample.time.to_string(),
            p.x().to_string(),
            p.y().to_string(),
            p.z().to_string(),
        ])
        .with_context(|| format!("Failed to write CSV row at t={}.", sample.time))?;
    }
    wtr.flush().context("Failed to flush CSV output.")?;
    Ok(())
}
