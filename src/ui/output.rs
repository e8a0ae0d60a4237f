use crate::error::{PdfTextError, UserFriendlyError};
use crate::extractor::FolderReport;
use clap::ValueEnum;
use console::{style, Emoji, Term};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputMode {
    /// Human-readable colored output
    #[default]
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

// Emojis with text fallbacks
static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static ROCKET: Emoji = Emoji("🚀 ", "> ");

pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let use_colors = match mode {
            OutputMode::Human => Term::stdout().features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Error, message),
            OutputMode::Json => self.print_json_message("error", message),
            OutputMode::Plain => eprintln!("ERROR: {}", message),
        }
    }

    pub fn warning(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Warning, message),
                OutputMode::Json => eprintln!("{}", json_message("warning", message)),
                OutputMode::Plain => eprintln!("WARNING: {}", message),
            }
        }
    }

    pub fn info(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Info, message),
                OutputMode::Json => eprintln!("{}", json_message("info", message)),
                OutputMode::Plain => println!("INFO: {}", message),
            }
        }
    }

    pub fn start_operation(&self, operation: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("{}{}", ROCKET, style(operation).bold());
                    } else {
                        println!("> {}", operation);
                    }
                }
                OutputMode::Json => eprintln!("{}", json_message("operation_start", operation)),
                OutputMode::Plain => println!("STARTING: {}", operation),
            }
        }
    }

    pub fn print_user_friendly_error(&self, error: &PdfTextError) {
        let user_message = error.user_message();
        self.error(&user_message);

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Human => {
                    eprintln!();
                    if self.use_colors {
                        eprintln!(
                            "{}{}",
                            INFO,
                            style(&format!("Suggestion: {}", suggestion)).cyan()
                        );
                    } else {
                        eprintln!("Suggestion: {}", suggestion);
                    }
                }
                OutputMode::Json => {
                    self.print_json_object(&serde_json::json!({
                        "type": "suggestion",
                        "message": suggestion
                    }));
                }
                OutputMode::Plain => {
                    eprintln!("SUGGESTION: {}", suggestion);
                }
            }
        }
    }

    /// Prints the end-of-run summary. JSON mode prints it even when quiet.
    pub fn print_extraction_summary(&self, report: &FolderReport) {
        match self.mode {
            OutputMode::Json => {
                let json_output =
                    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string());
                println!("{}", json_output);
            }
            _ if self.quiet => {}
            OutputMode::Human => self.print_human_summary(report),
            OutputMode::Plain => {
                for line in summary_lines(report) {
                    println!("{}", line);
                }
            }
        }
    }

    pub fn print_separator(&self) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                if self.use_colors {
                    println!("{}", style("─".repeat(60)).dim());
                } else {
                    println!("{}", "-".repeat(60));
                }
            }
            OutputMode::Plain => {
                println!("{}", "-".repeat(60));
            }
            OutputMode::Json => {}
        }
    }

    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn print_human_message(&self, msg_type: MessageType, message: &str) {
        #[allow(clippy::type_complexity)]
        let (emoji, color_fn): (&Emoji, Box<dyn Fn(&str) -> console::StyledObject<&str>>) =
            match msg_type {
                MessageType::Error => (&CROSS, Box::new(|msg| style(msg).red().bold())),
                MessageType::Warning => (&WARNING, Box::new(|msg| style(msg).yellow().bold())),
                MessageType::Info => (&INFO, Box::new(|msg| style(msg).cyan())),
            };

        if self.use_colors {
            match msg_type {
                MessageType::Error | MessageType::Warning => {
                    eprintln!("{}{}", emoji, color_fn(message))
                }
                _ => println!("{}{}", emoji, color_fn(message)),
            }
        } else {
            let prefix = match msg_type {
                MessageType::Error => "✗",
                MessageType::Warning => "!",
                MessageType::Info => "i",
            };

            match msg_type {
                MessageType::Error | MessageType::Warning => eprintln!("{} {}", prefix, message),
                _ => println!("{} {}", prefix, message),
            }
        }
    }

    fn print_json_message(&self, level: &str, message: &str) {
        println!("{}", json_message(level, message));
    }

    fn print_json_object(&self, obj: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string(obj).unwrap_or_else(|_| "{}".to_string())
        );
    }

    fn print_human_summary(&self, report: &FolderReport) {
        println!();
        self.print_separator();

        let lines = summary_lines(report);
        if let Some((heading, facts)) = lines.split_first() {
            if self.use_colors {
                println!("{}{}", CHECKMARK, style(heading).green().bold());
            } else {
                println!("{}", heading);
            }
            for fact in facts {
                println!("{}", fact);
            }
        }

        if self.verbose_level > 0 {
            println!();
            println!("  Time taken:   {}", format_duration(report.elapsed));
        }
        if report.failed_count() > 0 {
            let failed = format!("  Failed files: {}", report.failed_count());
            if self.use_colors {
                println!("{}", style(failed).yellow());
            } else {
                println!("{}", failed);
            }
        }

        self.print_separator();
    }
}

#[derive(Debug, Clone, Copy)]
enum MessageType {
    Error,
    Warning,
    Info,
}

/// Progress messages go to stderr in JSON mode; stdout carries only the
/// report and error objects.
fn json_message(level: &str, message: &str) -> String {
    serde_json::json!({
        "type": "message",
        "level": level,
        "message": message,
        "timestamp": chrono::Utc::now().to_rfc3339()
    })
    .to_string()
}

/// The heading plus the facts of a finished run, one line each.
pub fn summary_lines(report: &FolderReport) -> Vec<String> {
    let mut lines = vec![
        "Text extraction complete.".to_string(),
        format!("Processed {} PDF files in total.", report.files_processed()),
    ];

    if let Some(ref output_directory) = report.output_directory {
        lines.push(format!("Text files saved in {}.", output_directory.display()));
    }

    match report.archive_path {
        Some(ref archive_path) => lines.push(format!("Zip file saved in {}.", archive_path.display())),
        None if !report.folder_found => lines.push(format!(
            "Folder {} was not found; nothing was written.",
            report.folder.display()
        )),
        None => lines.push("Archive generation skipped.".to_string()),
    }

    lines
}

pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{}s", secs)
    } else {
        format!("{}ms", duration.as_millis())
    }
}
