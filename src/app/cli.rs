use crate::app::models::SizeUnit;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "View the size of folders, subfolders, and files"
)]
pub struct Cli {
    /// Target folder path
    pub path: PathBuf,

    /// Size unit
    #[arg(short, long, value_enum)]
    pub unit: Option<SizeUnit>,

    /// Show all files (not just folders)
    #[arg(short, long)]
    pub details: bool,

    /// Show only the total size
    #[arg(short, long)]
    pub total_only: bool,

    /// Limit the displayed folder depth (the total is always computed in full)
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Minimum file size (in bytes) to count [default: 1]
    #[arg(long)]
    pub min_size: Option<u64>,

    /// Exclude files with these extensions (e.g., .tmp .log)
    #[arg(long, num_args = 0..)]
    pub exclude_ext: Option<Vec<String>>,

    /// Include hidden files/folders
    #[arg(long)]
    pub hidden: bool,

    /// Use a predefined set of options from presets.toml
    #[arg(long)]
    pub preset: Option<String>,

    /// Sort entries by name inside each folder
    #[arg(long)]
    pub sorted: bool,

    /// Show paths relative to the target folder
    #[arg(long)]
    pub relative: bool,
}
