use chrono::Local;
use clap::Parser;
use pdftext::{logging, Cli, OutputFormatter, OutputMode, PdfText, PdfTextError, UserFriendlyError};
use std::process;
use std::time::Instant;
use tracing::info;

#[tokio::main]
async fn main() {
    let exit_code = run().await;
    process::exit(exit_code);
}

async fn run() -> i32 {
    let cli = Cli::parse();

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let pdftext = match PdfText::from_cli(&cli) {
        Ok(pdftext) => pdftext,
        Err(e) => {
            print_startup_error(&e, cli.output_format);
            return e.exit_code();
        }
    };

    // Held until exit so buffered file lines are flushed.
    let _log_guard = match logging::init(&pdftext.config().logging) {
        Ok(guard) => guard,
        Err(e) => {
            pdftext.handle_error(&e);
            return e.exit_code();
        }
    };

    let start = Instant::now();
    info!("Start time: {}", Local::now().format("%Y-%m-%d %H:%M:%S"));

    let folder = match cli.resolve_folder() {
        Ok(folder) => folder,
        Err(e) => {
            pdftext.handle_error(&e);
            return e.exit_code();
        }
    };

    let outcome = pdftext.run(&folder).await;

    info!("End time: {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    info!("Total time taken: {:.3} seconds", start.elapsed().as_secs_f64());

    match outcome {
        Ok(report) => {
            pdftext.output_formatter().print_extraction_summary(&report);
            0
        }
        Err(e) => {
            pdftext.handle_error(&e);
            e.exit_code()
        }
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "pdftext.toml".to_string());

    match PdfText::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  pdftext <folder> --config {}", config_path);
            println!("\nEdit the file to customize settings for your needs.");
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            e.exit_code()
        }
    }
}

fn print_startup_error(error: &PdfTextError, mode: OutputMode) {
    let formatter = OutputFormatter::new(mode, 0, false);
    formatter.print_user_friendly_error(error);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn cli_with_config(config: Option<std::path::PathBuf>) -> Cli {
        Cli {
            folder: None,
            config,
            layout: None,
            no_archive: false,
            parser: None,
            tika_url: None,
            log_path: None,
            output_format: OutputMode::Plain,
            verbose: 0,
            quiet: true,
            generate_config: true,
        }
    }

    #[test]
    fn test_generate_config_command() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let exit_code = handle_generate_config(&cli_with_config(Some(config_path.clone())));
        assert_eq!(exit_code, 0);

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[scan]"));
    }

    #[test]
    fn test_generate_config_into_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("missing").join("test.toml");

        let exit_code = handle_generate_config(&cli_with_config(Some(config_path)));
        assert_eq!(exit_code, 4);
    }
}
