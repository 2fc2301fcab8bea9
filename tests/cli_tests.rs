//! Process-level behaviour of the two binaries: stdout contents and exit
//! codes.

use image::{GrayImage, Luma, imageops};
use rust_dmtx::encoder;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn decode_data_matrix(args: &[&Path]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_decode_data_matrix"))
        .args(args)
        .output()
        .expect("failed to run decode_data_matrix")
}

fn dmtool(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dmtool"))
        .args(args)
        .output()
        .expect("failed to run dmtool")
}

fn fixture(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    let symbol = encoder::encode(text).unwrap();
    encoder::render(&symbol, 5, 2).save(&path).unwrap();
    path
}

#[test]
fn test_prints_decoded_text() {
    let dir = TempDir::new().unwrap();
    let path = fixture(dir.path(), "label.png", "BM000012345");
    let output = decode_data_matrix(&[&path]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "BM000012345\n");
}

#[test]
fn test_prints_empty_line_when_nothing_decodes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.png");
    std::fs::write(&path, b"").unwrap();

    let output = decode_data_matrix(&[&path]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(output.stdout, b"\n");

    let output = decode_data_matrix(&[&dir.path().join("missing.png")]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(output.stdout, b"\n");
}

#[test]
fn test_usage_errors_exit_one_silently() {
    let output = decode_data_matrix(&[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());

    let dir = TempDir::new().unwrap();
    let path = fixture(dir.path(), "label.png", "two");
    let output = decode_data_matrix(&[&path, &path]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_dmtool_terse_report() {
    let dir = TempDir::new().unwrap();
    let a = fixture(dir.path(), "a.png", "first");
    let b = fixture(dir.path(), "b.png", "second");
    std::fs::write(dir.path().join("c.txt"), "no symbol here").unwrap();

    let output = dmtool(&["--report", "terse", dir.path().to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            format!("{} [first]", a.display()),
            format!("{} [second]", b.display()),
            format!("{}", dir.path().join("c.txt").display()),
        ]
    );
}

#[test]
fn test_dmtool_csv_report() {
    let dir = TempDir::new().unwrap();
    let path = fixture(dir.path(), "IMG_0001.png", "BM001128287");

    let output = dmtool(&["-r", "csv", "--fast", path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut lines = stdout.lines();
    assert_eq!(lines.next(), Some("OS,Directory,File,Elapsed,N.found,Values"));
    let row: Vec<&str> = lines.next().unwrap().split(',').collect();
    assert_eq!(row[0], std::env::consts::OS);
    assert_eq!(row[2], "IMG_0001");
    assert_eq!(row[4], "1");
    assert_eq!(row[5], "[Data Matrix:BM001128287]");
}

#[test]
fn test_dmtool_reports_every_symbol() {
    let dir = TempDir::new().unwrap();
    let first = encoder::render(&encoder::encode("FIRST").unwrap(), 5, 2);
    let second = encoder::render(&encoder::encode("SECOND").unwrap(), 5, 2);
    let mut canvas = GrayImage::from_pixel(260, 140, Luma([255]));
    imageops::overlay(&mut canvas, &first, 20, 20);
    imageops::overlay(&mut canvas, &second, 150, 20);
    let path = dir.path().join("tray.png");
    canvas.save(&path).unwrap();

    let output = dmtool(&[path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], path.display().to_string());
    assert_eq!(lines[1], "Found [2] barcodes:");
    // Indices follow discovery order; values are compared without them
    let mut values: Vec<&str> = lines[2..]
        .iter()
        .map(|line| line.split_once(' ').unwrap().1)
        .collect();
    values.sort();
    assert_eq!(values, vec!["[Data Matrix] [FIRST]", "[Data Matrix] [SECOND]"]);
}
