use crate::app::models::{ReportRow, SizeUnit};
use pathdiff::diff_paths;
use std::path::Path;

const KIB: f64 = 1024.0;
const MIB: f64 = 1024.0 * 1024.0;
const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

const HEADERS: [&str; 3] = ["Path", "Name", "Size"];

pub struct OutputGenerator;

impl OutputGenerator {
    pub fn format_size(bytes: u64, unit: SizeUnit) -> String {
        let unit = match unit {
            SizeUnit::Auto if bytes < 1024 => SizeUnit::Bytes,
            SizeUnit::Auto if bytes < 1024 * 1024 => SizeUnit::Kb,
            SizeUnit::Auto if bytes < 1024 * 1024 * 1024 => SizeUnit::Mb,
            SizeUnit::Auto => SizeUnit::Gb,
            explicit => explicit,
        };

        match unit {
            SizeUnit::Kb => format!("{:.2} KB", bytes as f64 / KIB),
            SizeUnit::Mb => format!("{:.2} MB", bytes as f64 / MIB),
            SizeUnit::Gb => format!("{:.2} GB", bytes as f64 / GIB),
            _ => format!("{} B", bytes),
        }
    }

    /// Renders rows as a GitHub-flavoured markdown table. When `relative_to`
    /// is set, paths are shown relative to it.
    pub fn generate_table(rows: &[ReportRow], unit: SizeUnit, relative_to: Option<&Path>) -> String {
        let cells: Vec<[String; 3]> = rows
            .iter()
            .map(|row| match row {
                ReportRow::Directory { path, size } => [
                    display_path(path, relative_to),
                    "<DIR>".to_string(),
                    Self::format_size(*size, unit),
                ],
                ReportRow::File { path, name, size } => [
                    display_path(path, relative_to),
                    name.clone(),
                    Self::format_size(*size, unit),
                ],
                ReportRow::Error {
                    path,
                    name,
                    message,
                } => [
                    display_path(path, relative_to),
                    name.clone(),
                    format!("Error: {}", message),
                ],
            })
            .collect();

        let mut widths = HEADERS.map(|h| h.chars().count());
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut lines = Vec::with_capacity(cells.len() + 2);
        lines.push(table_line(&HEADERS.map(String::from), &widths));
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(w + 2)).collect();
        lines.push(format!("|{}|", rule.join("|")));
        for row in &cells {
            lines.push(table_line(row, &widths));
        }

        lines.join("\n")
    }

    pub fn format_total(total: u64, unit: SizeUnit) -> String {
        format!("📦 Total size of all: {}", Self::format_size(total, unit))
    }

    pub fn format_full_output(table: Option<&str>, total: u64, unit: SizeUnit) -> String {
        let mut out = String::new();
        if let Some(table) = table {
            out.push_str(table);
            out.push('\n');
        }
        out.push('\n');
        out.push_str(&Self::format_total(total, unit));
        out
    }
}

fn display_path(path: &Path, relative_to: Option<&Path>) -> String {
    match relative_to.and_then(|root| diff_paths(path, root)) {
        Some(relative) if relative.as_os_str().is_empty() => ".".to_string(),
        Some(relative) => relative.to_string_lossy().into_owned(),
        None => path.to_string_lossy().into_owned(),
    }
}

fn table_line(cells: &[String; 3], widths: &[usize; 3]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let fill = width - cell.chars().count();
            format!(" {}{} ", cell, " ".repeat(fill))
        })
        .collect();
    format!("|{}|", padded.join("|"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn auto_unit_picks_by_threshold() {
        assert_eq!(OutputGenerator::format_size(0, SizeUnit::Auto), "0 B");
        assert_eq!(OutputGenerator::format_size(1023, SizeUnit::Auto), "1023 B");
        assert_eq!(OutputGenerator::format_size(1024, SizeUnit::Auto), "1.00 KB");
        assert_eq!(OutputGenerator::format_size(1536, SizeUnit::Auto), "1.50 KB");
        assert_eq!(
            OutputGenerator::format_size(5 * 1024 * 1024, SizeUnit::Auto),
            "5.00 MB"
        );
        assert_eq!(
            OutputGenerator::format_size(3 * 1024 * 1024 * 1024, SizeUnit::Auto),
            "3.00 GB"
        );
    }

    #[test]
    fn explicit_units_use_fixed_divisor() {
        assert_eq!(OutputGenerator::format_size(2048, SizeUnit::Bytes), "2048 B");
        assert_eq!(OutputGenerator::format_size(512, SizeUnit::Kb), "0.50 KB");
        assert_eq!(OutputGenerator::format_size(1024, SizeUnit::Mb), "0.00 MB");
        assert_eq!(
            OutputGenerator::format_size(1024 * 1024 * 1024, SizeUnit::Gb),
            "1.00 GB"
        );
    }

    #[test]
    fn table_marks_directories_and_errors() {
        let rows = vec![
            ReportRow::File {
                path: PathBuf::from("/data"),
                name: "a.txt".to_string(),
                size: 500,
            },
            ReportRow::Error {
                path: PathBuf::from("/data"),
                name: "gone".to_string(),
                message: "No such file".to_string(),
            },
            ReportRow::Directory {
                path: PathBuf::from("/data"),
                size: 500,
            },
        ];

        let table = OutputGenerator::generate_table(&rows, SizeUnit::Bytes, None);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "| Path  | Name  | Size                |");
        assert_eq!(lines[1], "|-------|-------|---------------------|");
        assert_eq!(lines[2], "| /data | a.txt | 500 B               |");
        assert_eq!(lines[3], "| /data | gone  | Error: No such file |");
        assert_eq!(lines[4], "| /data | <DIR> | 500 B               |");
    }

    #[test]
    fn relative_paths_are_shown_from_root() {
        let rows = vec![
            ReportRow::Directory {
                path: PathBuf::from("/data/sub"),
                size: 1,
            },
            ReportRow::Directory {
                path: PathBuf::from("/data"),
                size: 1,
            },
        ];

        let table =
            OutputGenerator::generate_table(&rows, SizeUnit::Auto, Some(Path::new("/data")));
        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[2].starts_with("| sub "));
        assert!(lines[3].starts_with("| .    "));
    }

    #[test]
    fn full_output_ends_with_total() {
        let out = OutputGenerator::format_full_output(Some("| t |"), 2048, SizeUnit::Auto);
        assert_eq!(out, "| t |\n\n📦 Total size of all: 2.00 KB");

        let out = OutputGenerator::format_full_output(None, 10, SizeUnit::Auto);
        assert_eq!(out, "\n📦 Total size of all: 10 B");
    }
}
