use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Parser, Clone, Debug)]
#[command(name = "lloyd")]
#[command(about = "Seeded Lloyd k-means clustering")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

pub trait LloydParams: std::fmt::Debug {
    fn validate(&self) -> bool;
    fn debug(&self) -> bool;
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    #[command(about = "Cluster observations from given seed indices")]
    Cluster(ClusterArgs),

    #[command(about = "Jaccard measure between two labelings")]
    Compare(CompareArgs),

    #[command(about = "Generate blobs of observations with their true labels")]
    Generate(GenerateArgs),
}

/// What to do with a cluster that ends an assignment step without members
#[derive(ValueEnum, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmptyClusterPolicy {
    /// Leave the centroid where it was for this iteration
    #[default]
    Keep,
    /// Abort the run
    Fail,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Cluster index of each observation, one per line
    Labels,
    /// Final centroid positions, one per line
    Centroids,
    /// Number of clusters, then the member indices of each cluster
    Clusters,
    /// Parameters, iterations, WCSS, labels and centroids
    Json,
}

#[derive(Parser, Debug, Clone)]
pub struct ClusterArgs {
    #[command(flatten)]
    pub io: IOParams,

    #[command(flatten)]
    pub km: KmParams,
}

#[derive(clap::Args, Clone, Debug)]
pub struct IOParams {
    /// Observations, one per line (tab, comma or space delimited)
    #[arg(short, long, help_heading = "I/O")]
    pub input: PathBuf,

    /// Comma separated indices of the observations used as initial centroids
    #[arg(short, long, value_delimiter = ',', required = true, help_heading = "I/O")]
    pub seeds: Vec<usize>,

    /// Column delimiter of --input (default auto-detect)
    #[arg(long, help_heading = "I/O")]
    pub delimiter: Option<char>,

    /// Output (default stdout)
    #[arg(short, long, help_heading = "I/O")]
    pub output: Option<PathBuf>,

    /// What to report
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Labels, help_heading = "I/O")]
    pub format: OutputFormat,

    /// Verbose logging
    #[arg(long, default_value_t = false)]
    pub debug: bool,
}

#[derive(clap::Args, Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct KmParams {
    /// Maximum number of assignment/update iterations (0 returns the seeds)
    #[arg(long, default_value_t = 300, help_heading = "Clustering")]
    pub max_iter: usize,

    /// Squared centroid shift above which a cluster counts as changed
    #[arg(long, default_value_t = 1e-4, help_heading = "Clustering")]
    pub tolerance: f64,

    /// Handling of clusters left without members
    #[arg(long, value_enum, default_value_t = EmptyClusterPolicy::Keep, help_heading = "Clustering")]
    pub empty_policy: EmptyClusterPolicy,
}

impl Default for KmParams {
    fn default() -> Self {
        Self {
            max_iter: 300,
            tolerance: 1e-4,
            empty_policy: EmptyClusterPolicy::Keep,
        }
    }
}

impl LloydParams for ClusterArgs {
    fn debug(&self) -> bool {
        self.io.debug
    }

    /// Validate command line arguments
    fn validate(&self) -> bool {
        let mut is_ok = true;

        is_ok &= validate_file(&self.io.input, "--input");

        if self.io.seeds.is_empty() {
            error!("--seeds must name at least one observation");
            is_ok = false;
        }

        let mut sorted = self.io.seeds.clone();
        sorted.sort_unstable();
        if sorted.windows(2).any(|w| w[0] == w[1]) {
            error!("--seeds must be distinct");
            is_ok = false;
        }

        if !self.km.tolerance.is_finite() || self.km.tolerance < 0.0 {
            error!("--tolerance must be a finite value >= 0");
            is_ok = false;
        }

        if self.km.max_iter == 0 {
            warn!("--max-iter 0 reports the seed state without clustering");
        }

        is_ok
    }
}

#[derive(Parser, Debug, Clone)]
pub struct CompareArgs {
    /// Reference labels, one per line
    #[arg(short, long)]
    pub truth: PathBuf,

    /// Labels to score, one per line
    #[arg(short, long)]
    pub predicted: PathBuf,

    /// Verbose logging
    #[arg(long, default_value_t = false)]
    pub debug: bool,
}

impl LloydParams for CompareArgs {
    fn debug(&self) -> bool {
        self.debug
    }

    fn validate(&self) -> bool {
        let mut is_ok = true;
        is_ok &= validate_file(&self.truth, "--truth");
        is_ok &= validate_file(&self.predicted, "--predicted");
        is_ok
    }
}

#[derive(Parser, Debug, Clone)]
pub struct GenerateArgs {
    /// Number of observations
    #[arg(short, long)]
    pub n: usize,

    /// Number of blobs
    #[arg(short, long)]
    pub k: usize,

    /// Dimension of each observation
    #[arg(short, long, default_value_t = 2)]
    pub dim: usize,

    /// Standard deviation of each blob
    #[arg(long, default_value_t = 1.0)]
    pub spread: f64,

    /// Random seed (default from entropy)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Observations output, comma delimited
    #[arg(short, long)]
    pub output: PathBuf,

    /// True blob of each observation, one per line
    #[arg(short, long)]
    pub labels: PathBuf,

    /// Verbose logging
    #[arg(long, default_value_t = false)]
    pub debug: bool,
}

impl LloydParams for GenerateArgs {
    fn debug(&self) -> bool {
        self.debug
    }

    fn validate(&self) -> bool {
        let mut is_ok = true;

        if self.n == 0 {
            error!("--n must be > 0");
            is_ok = false;
        }

        if self.k == 0 || self.k > self.n {
            error!("--k must be between 1 and --n");
            is_ok = false;
        }

        if self.dim == 0 {
            error!("--dim must be > 0");
            is_ok = false;
        }

        if !self.spread.is_finite() || self.spread <= 0.0 {
            error!("--spread must be a finite value > 0");
            is_ok = false;
        }

        if self.output == self.labels {
            error!("--output and --labels must be different files");
            is_ok = false;
        }

        is_ok
    }
}

/// Helper function to validate a file's existence and type
fn validate_file(path: &Path, label: &str) -> bool {
    if !path.exists() {
        error!("{} does not exist", label);
        return false;
    }
    if !path.is_file() {
        error!("{} is not a file", label);
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cluster_command() {
        let cli = Cli::parse_from([
            "lloyd",
            "cluster",
            "--input",
            "points.tsv",
            "--seeds",
            "0,2",
            "--max-iter",
            "10",
            "--format",
            "centroids",
        ]);
        match cli.command {
            Commands::Cluster(args) => {
                assert_eq!(args.io.seeds, vec![0, 2]);
                assert_eq!(args.km.max_iter, 10);
                assert_eq!(args.km.tolerance, 1e-4);
                assert_eq!(args.km.empty_policy, EmptyClusterPolicy::Keep);
                assert_eq!(args.io.format, OutputFormat::Centroids);
            }
            _ => panic!("expected cluster"),
        }
    }

    #[test]
    fn duplicate_seeds_fail_validation() {
        let cli = Cli::parse_from([
            "lloyd",
            "cluster",
            "--input",
            file!(),
            "--seeds",
            "1,1",
        ]);
        match cli.command {
            Commands::Cluster(args) => assert!(!args.validate()),
            _ => panic!("expected cluster"),
        }
    }

    #[test]
    fn parses_generate_command() {
        let cli = Cli::parse_from([
            "lloyd", "generate", "--n", "100", "--k", "3", "--seed", "7", "-o", "pts.csv", "-l",
            "truth.txt",
        ]);
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!((args.n, args.k, args.dim), (100, 3, 2));
                assert_eq!(args.seed, Some(7));
                assert_eq!(args.spread, 1.0);
                assert!(args.validate());
            }
            _ => panic!("expected generate"),
        }

        let cli = Cli::parse_from([
            "lloyd", "generate", "-n", "2", "-k", "3", "-o", "pts.csv", "-l", "truth.txt",
        ]);
        match cli.command {
            Commands::Generate(args) => assert!(!args.validate()),
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn params_roundtrip_json() {
        let params = KmParams {
            max_iter: 5,
            tolerance: 0.5,
            empty_policy: EmptyClusterPolicy::Fail,
        };
        let text = serde_json::to_string(&params).unwrap();
        assert!(text.contains("\"empty_policy\":\"fail\""));
        let back: KmParams = serde_json::from_str(&text).unwrap();
        assert_eq!(back, params);
    }
}
