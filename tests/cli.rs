mod common;

use std::fs;
use std::io::Write;
use std::process::{Command, Stdio};

use tempfile::tempdir;

fn pdf2sheet() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_pdf2sheet"));
    command.env("RUST_LOG", "off");
    command
}

#[test]
fn missing_directory_exits_with_code_2() {
    let dir = tempdir().expect("tempdir should be created");
    let output = dir.path().join("out.csv");

    let result = pdf2sheet()
        .arg(dir.path().join("missing"))
        .arg(&output)
        .output()
        .expect("CLI should run");

    assert_eq!(result.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("The directory you entered does not exist"), "{stderr}");
    assert!(!output.exists());
}

#[test]
fn bad_extension_exits_with_code_3() {
    let dir = tempdir().expect("tempdir should be created");

    let result = pdf2sheet()
        .arg(dir.path())
        .arg(dir.path().join("out.txt"))
        .output()
        .expect("CLI should run");

    assert_eq!(result.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("must end with .xlsx or .csv"), "{stderr}");
}

#[test]
fn no_tables_exits_with_code_4() {
    let dir = tempdir().expect("tempdir should be created");
    let output = dir.path().join("out.csv");

    let status = pdf2sheet()
        .arg(dir.path())
        .arg(&output)
        .status()
        .expect("CLI should run");

    assert_eq!(status.code(), Some(4));
    assert!(!output.exists());
}

#[test]
fn prompts_for_paths_when_not_given() {
    let dir = tempdir().expect("tempdir should be created");
    let pdfs = dir.path().join("pdfs");
    fs::create_dir(&pdfs).expect("input dir should be created");
    common::write_table_pdf(&pdfs.join("a.pdf"), &[&["Name", "Age"], &["Ana", "30"]])
        .expect("PDF fixture should be created");
    let output = dir.path().join("out.csv");

    let mut child = pdf2sheet()
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("CLI should start");
    let answers = format!("  {}  \n{}\n", pdfs.display(), output.display());
    child
        .stdin
        .take()
        .expect("stdin should be piped")
        .write_all(answers.as_bytes())
        .expect("answers should be written");
    let result = child.wait_with_output().expect("CLI should finish");

    assert_eq!(result.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("Enter the path to the folder containing your PDF files:"));
    assert!(stdout.contains("All done! Your data is saved in"), "{stdout}");
    let csv = fs::read_to_string(&output).expect("CSV should be readable");
    assert!(csv.starts_with("Name,Age,Source_File\n"), "{csv}");
}
