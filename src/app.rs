// Declare modules
pub mod cli;
pub mod config;
pub mod formatter;
pub mod models;
pub mod scanner;

use anyhow::Result;
use clap::Parser;

use self::cli::Cli;
use self::config::resolve_config;
use self::formatter::OutputGenerator;
use self::scanner::Scanner;

/// Initializes components and orchestrates data flow.
pub fn run() -> Result<()> {
    // 1. Parse Args
    let args = Cli::parse();

    // 2. Resolve Configuration
    let config = resolve_config(args)?;
    log::info!("Resolved configuration: {:?}", config);

    // 3. Scan Directory (rejects a root that is not a folder)
    let scanner = Scanner::new(&config.scan);
    let result = scanner.scan(&config.root)?;

    if !result.warnings.is_empty() {
        log::info!("{} path(s) could not be fully scanned", result.warnings.len());
    }

    // 4. Generate Output
    let table = if config.total_only {
        None
    } else {
        let relative_to = config.relative_paths.then_some(config.root.as_path());
        Some(OutputGenerator::generate_table(
            &result.rows,
            config.unit,
            relative_to,
        ))
    };

    let final_output =
        OutputGenerator::format_full_output(table.as_deref(), result.total_size, config.unit);

    // 5. Print to Stdout
    println!("{}", final_output);

    Ok(())
}
