use clap::ValueEnum;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

/// Unit used when rendering byte counts.
#[derive(ValueEnum, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SizeUnit {
    #[default]
    Auto,
    Bytes,
    Kb,
    Mb,
    Gb,
}

/// Options that control what the scanner counts and what it reports.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub show_details: bool,
    /// Inclusive limit on the depth of reported rows; `None` means unlimited.
    pub max_depth: Option<usize>,
    pub min_size: u64,
    /// Lower-cased, dot-prefixed extensions.
    pub exclude_extensions: BTreeSet<String>,
    pub include_hidden: bool,
    pub sort_entries: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            show_details: false,
            max_depth: None,
            min_size: 1,
            exclude_extensions: BTreeSet::new(),
            include_hidden: false,
            sort_entries: false,
        }
    }
}

impl ScanConfig {
    pub fn shows_depth(&self, depth: usize) -> bool {
        self.max_depth.map_or(true, |max| depth <= max)
    }
}

/// Represents the final configuration after merging presets and CLI args.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub root: PathBuf,
    pub scan: ScanConfig,
    pub unit: SizeUnit,
    pub total_only: bool,
    pub relative_paths: bool,
}

/// One line of the scan report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportRow {
    Directory { path: PathBuf, size: u64 },
    /// `path` is the folder containing the file.
    File { path: PathBuf, name: String, size: u64 },
    Error { path: PathBuf, name: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    DirectoryUnreadable,
    EntryUnreadable,
    DepthLimitExceeded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanWarning {
    pub path: PathBuf,
    pub kind: WarningKind,
    pub message: String,
}

impl fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            WarningKind::DirectoryUnreadable => {
                write!(f, "Cannot access: {} - {}", self.path.display(), self.message)
            }
            WarningKind::EntryUnreadable => write!(
                f,
                "Cannot read an entry of: {} - {}",
                self.path.display(),
                self.message
            ),
            WarningKind::DepthLimitExceeded => {
                write!(f, "Not descending into: {} - {}", self.path.display(), self.message)
            }
        }
    }
}

/// Output of one scan invocation.
#[derive(Debug, Default)]
pub struct ScanResult {
    pub rows: Vec<ReportRow>,
    pub total_size: u64,
    /// Reported separately from `rows`.
    pub warnings: Vec<ScanWarning>,
}
