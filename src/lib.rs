#[macro_use]
extern crate log;

mod kmlib;
pub use self::{
    kmlib::cluster_main, kmlib::compare_main, kmlib::generate_main, kmlib::kmeans,
    kmlib::make_blobs, kmlib::metrics, kmlib::parse_labels, kmlib::Blobs, kmlib::Cli,
    kmlib::Cluster, kmlib::ClusterArgs, kmlib::Commands, kmlib::CompareArgs,
    kmlib::EmptyClusterPolicy, kmlib::GenerateArgs, kmlib::IOParams, kmlib::KMeansResult, kmlib::KmError,
    kmlib::KmParams, kmlib::LloydParams, kmlib::Lloyd, kmlib::LoopState, kmlib::OutputFormat,
    kmlib::PointParser, kmlib::PointStore, kmlib::Result, kmlib::ResultWriter,
};
