use crate::kmlib::{metrics, parse_labels, CompareArgs, KmError, Result};

/// Score two labelings of the same observations. Returns the Jaccard measure
pub fn compare_main(args: &CompareArgs) -> Result<f64> {
    let truth = parse_labels(&args.truth)?;
    let predicted = parse_labels(&args.predicted)?;
    if truth.len() != predicted.len() {
        return Err(KmError::LengthMismatch(truth.len(), predicted.len()));
    }
    debug!("comparing {} labels", truth.len());

    let score = metrics::jaccard(&truth, &predicted);
    println!("{:.6}", score);
    Ok(score)
}
