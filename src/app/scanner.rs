use crate::app::models::{ReportRow, ScanConfig, ScanResult, ScanWarning, WarningKind};
use std::fs::{self, DirEntry};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Deepest directory level the scanner descends into. Each level is one
/// stack frame, so this bounds stack usage on pathological trees.
pub const MAX_TRAVERSAL_DEPTH: usize = 1024;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Invalid path: {}", .path.display())]
    RootInvalid { path: PathBuf },
}

/// Accumulator owned by a single directory visit.
#[derive(Default)]
struct DirFrame {
    rows: Vec<ReportRow>,
    size: u64,
    warnings: Vec<ScanWarning>,
}

impl DirFrame {
    fn warn(&mut self, path: &Path, kind: WarningKind, message: String) {
        let warning = ScanWarning {
            path: path.to_path_buf(),
            kind,
            message,
        };
        log::warn!("⚠️ {}", warning);
        self.warnings.push(warning);
    }
}

pub struct Scanner<'a> {
    config: &'a ScanConfig,
    depth_limit: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(config: &'a ScanConfig) -> Self {
        Self {
            config,
            depth_limit: MAX_TRAVERSAL_DEPTH,
        }
    }

    #[cfg(test)]
    pub fn with_depth_limit(mut self, depth_limit: usize) -> Self {
        self.depth_limit = depth_limit;
        self
    }

    /// Walks `root` and returns every reportable row plus the filtered total.
    ///
    /// Only a root that is not a directory fails the scan. Anything that goes
    /// wrong further down is contained to the entry or subtree it happened in.
    pub fn scan(&self, root: &Path) -> Result<ScanResult, ScanError> {
        if !root.is_dir() {
            return Err(ScanError::RootInvalid {
                path: root.to_path_buf(),
            });
        }

        let frame = self.scan_dir(root, 0);
        log::info!(
            "Scanned {}: {} bytes, {} rows, {} warnings",
            root.display(),
            frame.size,
            frame.rows.len(),
            frame.warnings.len()
        );

        Ok(ScanResult {
            rows: frame.rows,
            total_size: frame.size,
            warnings: frame.warnings,
        })
    }

    fn scan_dir(&self, path: &Path, depth: usize) -> DirFrame {
        let mut frame = DirFrame::default();

        if depth > self.depth_limit {
            frame.warn(
                path,
                WarningKind::DepthLimitExceeded,
                format!("nesting exceeds {} levels", self.depth_limit),
            );
            return frame;
        }

        log::debug!("Scanning {} (depth {})", path.display(), depth);

        let entries = match self.list_entries(path, &mut frame) {
            Ok(entries) => entries,
            Err(err) => {
                frame.warn(path, WarningKind::DirectoryUnreadable, err.to_string());
                return frame;
            }
        };

        for entry in entries {
            self.process_entry(path, &entry, depth, &mut frame);
        }

        if !self.config.show_details && self.config.shows_depth(depth) {
            frame.rows.push(ReportRow::Directory {
                path: path.to_path_buf(),
                size: frame.size,
            });
        }

        frame
    }

    fn list_entries(&self, path: &Path, frame: &mut DirFrame) -> io::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for result in fs::read_dir(path)? {
            match result {
                Ok(entry) => entries.push(entry),
                Err(err) => frame.warn(path, WarningKind::EntryUnreadable, err.to_string()),
            }
        }

        if self.config.sort_entries {
            entries.sort_by_key(|entry| entry.file_name());
        }
        Ok(entries)
    }

    fn process_entry(&self, dir: &Path, entry: &DirEntry, depth: usize, frame: &mut DirFrame) {
        let name = entry.file_name().to_string_lossy().into_owned();

        if !self.config.include_hidden && is_hidden(&name) {
            return;
        }

        // DirEntry::file_type and DirEntry::metadata never traverse symlinks.
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(err) => {
                self.push_error_row(dir, name, &err, depth, frame);
                return;
            }
        };

        if file_type.is_file() {
            if self
                .config
                .exclude_extensions
                .contains(&extension_of(&name))
            {
                return;
            }

            match entry.metadata() {
                Ok(metadata) => {
                    let size = metadata.len();
                    if size < self.config.min_size {
                        return;
                    }
                    frame.size = frame.size.saturating_add(size);
                    if self.config.show_details && self.config.shows_depth(depth) {
                        frame.rows.push(ReportRow::File {
                            path: dir.to_path_buf(),
                            name,
                            size,
                        });
                    }
                }
                Err(err) => self.push_error_row(dir, name, &err, depth, frame),
            }
        } else if file_type.is_dir() {
            let child = self.scan_dir(&entry.path(), depth + 1);
            frame.size = frame.size.saturating_add(child.size);
            frame.warnings.extend(child.warnings);
            if self.config.shows_depth(depth + 1) {
                frame.rows.extend(child.rows);
            }
        }
    }

    fn push_error_row(
        &self,
        dir: &Path,
        name: String,
        err: &io::Error,
        depth: usize,
        frame: &mut DirFrame,
    ) {
        if self.config.show_details && self.config.shows_depth(depth) {
            frame.rows.push(ReportRow::Error {
                path: dir.to_path_buf(),
                name,
                message: err.to_string(),
            });
        } else {
            log::debug!("Skipping unreadable entry {}: {}", dir.join(&name).display(), err);
        }
    }
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.') || name.starts_with('~')
}

/// Lower-cased extension including its dot. Leading dots do not start an
/// extension, so `.bashrc` has none.
pub fn extension_of(name: &str) -> String {
    let stem_start = name.len() - name.trim_start_matches('.').len();
    match name[stem_start..].rfind('.') {
        Some(idx) => name[stem_start + idx..].to_lowercase(),
        None => String::new(),
    }
}
