mod cli;
pub use crate::kmlib::cli::{
    Cli, ClusterArgs, Commands, CompareArgs, EmptyClusterPolicy, GenerateArgs, IOParams, KmParams,
    LloydParams, OutputFormat,
};

mod blobs;
pub use crate::kmlib::blobs::{make_blobs, Blobs};

mod cluster;
pub use crate::kmlib::cluster::Cluster;

mod cluster_main;
pub use crate::kmlib::cluster_main::cluster_main;

mod compare_main;
pub use crate::kmlib::compare_main::compare_main;

mod generate_main;
pub use crate::kmlib::generate_main::generate_main;

mod errors;
pub use crate::kmlib::errors::{KmError, Result};

mod kmeans;
pub use crate::kmlib::kmeans::{kmeans, KMeansResult, Lloyd, LoopState};

pub mod metrics;

mod pointparser;
pub use crate::kmlib::pointparser::{parse_labels, PointParser};

mod pointstore;
pub use crate::kmlib::pointstore::PointStore;

mod writer;
pub use crate::kmlib::writer::{open_output, ResultWriter};
