//! Ptcloud
//!
//! Command-line inspector for binary PLY point clouds: decodes a file with an
//! optional vertex budget and prints the layout, decimation and bounds.

mod app;
mod errors;
mod report;

use clap::Parser;
use ptcloud_data::DEFAULT_VERTEX_BUDGET;
use std::path::PathBuf;

/// Ptcloud - Binary PLY point cloud inspector
#[derive(Parser, Debug)]
#[command(name = "ptcloud")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to PLY file to load
    file: PathBuf,

    /// Maximum number of vertices to keep
    #[arg(short, long, default_value_t = DEFAULT_VERTEX_BUDGET)]
    budget: usize,

    /// Only parse the header
    #[arg(long)]
    header_only: bool,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Print the first N decoded vertices
    #[arg(short, long, default_value_t = 0)]
    preview: usize,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = app::run(
        args.file,
        args.budget,
        args.header_only,
        args.json,
        args.preview,
        &args.log_level,
    ) {
        eprintln!("Application error: {}", e);
        std::process::exit(1);
    }
}
