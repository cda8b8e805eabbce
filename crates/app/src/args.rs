use clap::Parser;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "s3fsr")]
#[command(about = "Browse and edit S3 buckets as a filesystem tree")]
pub struct Args {
    /// Path to the s3fsr state directory (defaults to ~/.s3fsr)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    /// Use this bucket as the root instead of listing all buckets
    #[arg(long, global = true)]
    pub bucket: Option<String>,

    #[command(subcommand)]
    pub command: crate::Command,
}
