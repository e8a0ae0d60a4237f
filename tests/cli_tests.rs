use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn pdftext(work_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pdftext").unwrap();
    cmd.current_dir(work_dir.path()).env_remove("RUST_LOG");
    cmd
}

fn folder_with_notes() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("notes.txt"), "not a pdf").unwrap();
    temp_dir
}

#[test]
fn test_folder_without_pdfs_reports_zero() {
    let folder = folder_with_notes();

    pdftext(&folder)
        .arg(folder.path())
        .args(["--output-format", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Text extraction complete."))
        .stdout(predicate::str::contains("Processed 0 PDF files in total."))
        .stdout(predicate::str::contains("Zip file saved in"));

    assert!(folder.path().join("txt.zip").is_file());
}

#[test]
fn test_no_archive_skips_outputs() {
    let folder = folder_with_notes();

    pdftext(&folder)
        .arg(folder.path())
        .args(["--output-format", "plain", "--no-archive"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Archive generation skipped."));

    assert!(!folder.path().join("txt").exists());
    assert!(!folder.path().join("txt.zip").exists());
}

#[test]
fn test_desktop_layout() {
    let folder = folder_with_notes();

    pdftext(&folder)
        .arg(folder.path())
        .args(["--output-format", "plain", "--layout", "desktop"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Results.zip"));

    assert!(folder.path().join("Results").join("Results.zip").is_file());
}

#[test]
fn test_folder_is_prompted_when_missing() {
    let folder = folder_with_notes();

    pdftext(&folder)
        .args(["--output-format", "plain"])
        .write_stdin(format!("\"{}\"\n", folder.path().display()))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Enter the path to the folder containing the PDF files:",
        ))
        .stdout(predicate::str::contains("Processed 0 PDF files in total."));
}

#[test]
fn test_empty_prompt_answer_is_invalid_path() {
    let folder = folder_with_notes();

    pdftext(&folder)
        .args(["--output-format", "plain"])
        .write_stdin("\n")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid folder path"));
}

#[test]
fn test_broken_config_exits_with_config_code() {
    let work_dir = TempDir::new().unwrap();
    let config_path = work_dir.path().join("broken.toml");
    fs::write(&config_path, "[parser]\ntimeout_secs = \"soon\"\n").unwrap();

    pdftext(&work_dir)
        .arg(work_dir.path())
        .arg("--config")
        .arg(&config_path)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_generate_config() {
    let work_dir = TempDir::new().unwrap();
    let config_path = work_dir.path().join("pdftext.toml");

    pdftext(&work_dir)
        .arg("--generate-config")
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated sample configuration file"));

    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("[DEFAULT]"));
    assert!(content.contains("generate_archive = true"));
}

#[test]
fn test_config_ini_log_path_is_used() {
    let folder = folder_with_notes();
    fs::write(
        folder.path().join("config.ini"),
        "[DEFAULT]\nlog_path = logs/pdftext.log\n",
    )
    .unwrap();

    pdftext(&folder)
        .arg(folder.path())
        .args(["--output-format", "plain"])
        .assert()
        .success();

    let log = fs::read_to_string(folder.path().join("logs").join("pdftext.log")).unwrap();
    assert!(log.contains("Start time:"));
    assert!(log.contains("End time:"));
    assert!(log.contains("Total time taken:"));
}

#[test]
fn test_json_output_is_the_report() {
    let folder = folder_with_notes();

    let output = pdftext(&folder)
        .arg(folder.path())
        .args(["--output-format", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["results"], serde_json::json!({}));
    assert!(report["archive_path"]
        .as_str()
        .unwrap()
        .ends_with("txt.zip"));
}

#[test]
fn test_json_prompt_keeps_stdout_parseable() {
    let folder = folder_with_notes();

    let output = pdftext(&folder)
        .args(["--output-format", "json"])
        .write_stdin(format!("{}\n", folder.path().display()))
        .output()
        .unwrap();

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["folder_found"], serde_json::json!(true));
    assert!(String::from_utf8_lossy(&output.stderr)
        .contains("Enter the path to the folder containing the PDF files:"));
}

#[test]
fn test_missing_folder_is_reported() {
    let work_dir = TempDir::new().unwrap();
    let missing = work_dir.path().join("no-such-folder");

    pdftext(&work_dir)
        .arg(&missing)
        .args(["--output-format", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed 0 PDF files in total."))
        .stdout(predicate::str::contains("was not found; nothing was written."))
        .stdout(predicate::str::contains("Archive generation skipped.").not())
        .stderr(predicate::str::contains("WARNING: Folder"));

    assert!(!missing.exists());
}
