use crate::kmlib::{kmeans, ClusterArgs, PointParser, Result, ResultWriter};

/// Read observations, run the clustering and report in the requested format
pub fn cluster_main(args: &ClusterArgs) -> Result<()> {
    let points = PointParser::new(&args.io.input, args.io.delimiter).parse()?;
    info!(
        "clustering {} observations of dimension {} into {} clusters",
        points.len(),
        points.dim(),
        args.io.seeds.len()
    );

    let result = kmeans(&points, &args.io.seeds, &args.km)?;
    info!(
        "{} iterations, wcss {:.4}",
        result.iterations,
        result.wcss(&points)
    );

    let mut writer = ResultWriter::create(&args.io.output)?;
    writer.write(&result, &points, &args.km, args.io.format)?;
    Ok(())
}
