use crate::app::cli::Cli;
use crate::app::models::{RuntimeConfig, ScanConfig, SizeUnit};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::PathBuf;

#[derive(Deserialize, Debug)]
struct PresetsFile {
    #[serde(flatten)]
    presets: HashMap<String, PresetConfig>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct PresetConfig {
    unit: Option<SizeUnit>,
    details: Option<bool>,
    total_only: Option<bool>,
    max_depth: Option<usize>,
    min_size: Option<u64>,
    exclude_ext: Option<Vec<String>>,
    hidden: Option<bool>,
    sorted: Option<bool>,
    relative: Option<bool>,
}

fn presets_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home
        .join(".config")
        .join("folder_size")
        .join("presets.toml"))
}

fn load_presets_file() -> Result<HashMap<String, PresetConfig>> {
    let config_path = presets_path()?;

    if !config_path.exists() {
        return Ok(HashMap::new());
    }

    let content = fs::read_to_string(&config_path)
        .context(format!("Failed to read config at {:?}", config_path))?;

    parse_presets(&content)
}

pub fn parse_presets(content: &str) -> Result<HashMap<String, PresetConfig>> {
    let parsed: PresetsFile = toml::from_str(content).context("Failed to parse presets.toml")?;
    Ok(parsed.presets)
}

/// Concatenates preset and CLI extensions, normalizing each to a lower-cased
/// `.ext` and dropping duplicates while keeping order.
fn merge_extensions(preset_vec: Option<Vec<String>>, cli_vec: Option<Vec<String>>) -> Vec<String> {
    let mut combined: Vec<String> = preset_vec
        .unwrap_or_default()
        .into_iter()
        .chain(cli_vec.unwrap_or_default())
        .filter(|ext| !ext.is_empty())
        .map(|ext| normalize_extension(&ext))
        .collect();
    let mut seen = HashSet::new();
    combined.retain(|item| seen.insert(item.clone()));
    combined
}

fn normalize_extension(ext: &str) -> String {
    let lower = ext.to_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{}", lower)
    }
}

pub fn resolve_config(cli: Cli) -> Result<RuntimeConfig> {
    let presets = load_presets_file()?;
    resolve_with_presets(cli, &presets)
}

pub fn resolve_with_presets(
    cli: Cli,
    presets: &HashMap<String, PresetConfig>,
) -> Result<RuntimeConfig> {
    // Determine preset to use: CLI flag > folder name > None
    let preset = match cli.preset.as_deref() {
        Some(name) => match presets.get(name) {
            Some(preset) => preset.clone(),
            None => bail!("Unknown preset: {}", name),
        },
        None => cli
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|name| presets.get(name))
            .cloned()
            .unwrap_or_default(),
    };

    let scan = ScanConfig {
        show_details: cli.details || preset.details.unwrap_or(false),
        max_depth: cli.max_depth.or(preset.max_depth),
        min_size: cli.min_size.or(preset.min_size).unwrap_or(1),
        exclude_extensions: merge_extensions(preset.exclude_ext, cli.exclude_ext)
            .into_iter()
            .collect(),
        include_hidden: cli.hidden || preset.hidden.unwrap_or(false),
        sort_entries: cli.sorted || preset.sorted.unwrap_or(false),
    };

    Ok(RuntimeConfig {
        root: cli.path,
        scan,
        unit: cli.unit.or(preset.unit).unwrap_or_default(),
        total_only: cli.total_only || preset.total_only.unwrap_or(false),
        relative_paths: cli.relative || preset.relative.unwrap_or(false),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("folder_size").chain(args.iter().copied()))
    }

    const PRESETS: &str = r#"
[media]
unit = "mb"
details = true
min_size = 4096
exclude_ext = [".TMP", "part"]

[projects]
max_depth = 2
hidden = true
"#;

    #[test]
    fn defaults_without_presets() {
        let config = resolve_with_presets(cli(&["/data"]), &HashMap::new()).unwrap();

        assert_eq!(config.root, PathBuf::from("/data"));
        assert_eq!(config.unit, SizeUnit::Auto);
        assert_eq!(config.scan.min_size, 1);
        assert_eq!(config.scan.max_depth, None);
        assert!(!config.scan.show_details);
        assert!(!config.scan.include_hidden);
        assert!(config.scan.exclude_extensions.is_empty());
        assert!(!config.total_only);
    }

    #[test]
    fn cli_extensions_are_normalized() {
        let config = resolve_with_presets(
            cli(&["/data", "--exclude-ext", ".LOG", "tmp", ".tmp"]),
            &HashMap::new(),
        )
        .unwrap();

        let exts: Vec<&str> = config
            .scan
            .exclude_extensions
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(exts, vec![".log", ".tmp"]);
    }

    #[test]
    fn explicit_preset_merges_with_cli() {
        let presets = parse_presets(PRESETS).unwrap();
        let config = resolve_with_presets(
            cli(&["/data", "--preset", "media", "--min-size", "10", "--exclude-ext", ".bak"]),
            &presets,
        )
        .unwrap();

        assert_eq!(config.unit, SizeUnit::Mb);
        assert!(config.scan.show_details);
        assert_eq!(config.scan.min_size, 10);
        assert_eq!(config.scan.exclude_extensions.len(), 3);
        assert!(config.scan.exclude_extensions.contains(".tmp"));
        assert!(config.scan.exclude_extensions.contains(".part"));
        assert!(config.scan.exclude_extensions.contains(".bak"));
    }

    #[test]
    fn preset_is_detected_from_folder_name() {
        let presets = parse_presets(PRESETS).unwrap();
        let config = resolve_with_presets(cli(&["/home/me/projects"]), &presets).unwrap();

        assert_eq!(config.scan.max_depth, Some(2));
        assert!(config.scan.include_hidden);

        let config =
            resolve_with_presets(cli(&["/home/me/projects", "--max-depth", "0"]), &presets)
                .unwrap();
        assert_eq!(config.scan.max_depth, Some(0));
    }

    #[test]
    fn unknown_explicit_preset_is_an_error() {
        let presets = parse_presets(PRESETS).unwrap();
        let err = resolve_with_presets(cli(&["/data", "--preset", "nope"]), &presets).unwrap_err();
        assert!(err.to_string().contains("Unknown preset: nope"));
    }

    #[test]
    fn malformed_presets_are_rejected() {
        assert!(parse_presets("[media]\nunit = \"tb\"\n").is_err());
        assert!(parse_presets("[media]\ncolour = true\n").is_err());
    }
}
