use crate::kmlib::{make_blobs, open_output, GenerateArgs, Result};
use itertools::Itertools;
use std::io::Write;

/// Write blobs of observations to `--output` and their true blob to `--labels`
pub fn generate_main(args: &GenerateArgs) -> Result<()> {
    let blobs = make_blobs(args.n, args.k, args.dim, args.spread, args.seed)?;

    let mut points = open_output(&Some(args.output.clone()))?;
    for idx in 0..blobs.points.len() {
        writeln!(points, "{}", blobs.points.point(idx).iter().join(","))?;
    }
    points.flush()?;

    let mut labels = open_output(&Some(args.labels.clone()))?;
    for label in &blobs.labels {
        writeln!(labels, "{}", label)?;
    }
    labels.flush()?;

    info!(
        "wrote {} observations in {} blobs, one seed per blob: --seeds {}",
        args.n,
        args.k,
        blobs.first_of_each().iter().join(",")
    );
    Ok(())
}
