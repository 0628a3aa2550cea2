//! Integration tests for the pixelmill CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_test_png(path: &Path, width: u32, height: u32) {
    let image = image_rs::RgbImage::from_fn(width, height, |x, y| {
        image_rs::Rgb([(x * 40) as u8, (y * 40) as u8, 128])
    });
    image.save(path).unwrap();
}

/// Test CLI binary exists and responds to --help
#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("pixelmill").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("concurrent image filtering"));
}

/// Test CLI responds to --version
#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("pixelmill").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pixelmill"));
}

/// Test invalid subcommand shows error
#[test]
fn test_invalid_subcommand() {
    let mut cmd = Command::cargo_bin("pixelmill").unwrap();
    cmd.arg("invalid-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

/// Single-image apply writes the processed result
#[test]
fn test_apply_single_image() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("photo.png");
    write_test_png(&input, 4, 4);
    let output = temp_dir.path().join("out/photo_inverted.png");

    let mut cmd = Command::cargo_bin("pixelmill").unwrap();
    cmd.arg("apply")
        .arg(&input)
        .arg("--filter")
        .arg("invert")
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    let decoded = image_rs::open(&output).unwrap().to_rgb8();
    assert_eq!(decoded.dimensions(), (4, 4));
    // (0, 0) was rgb(0, 0, 128); inverted it is rgb(255, 255, 127).
    assert_eq!(decoded.get_pixel(0, 0).0, [255, 255, 127]);
}

/// Batch over a folder processes every image into the output directory
#[test]
fn test_batch_processes_folder() {
    let temp_dir = TempDir::new().unwrap();
    let input_dir = temp_dir.path().join("shots");
    fs::create_dir(&input_dir).unwrap();
    for name in ["a.png", "b.png", "c.png"] {
        write_test_png(&input_dir.join(name), 3, 3);
    }
    // A non-image bystander must be ignored, not failed.
    fs::write(input_dir.join("notes.txt"), b"not an image").unwrap();
    let output_dir = temp_dir.path().join("processed");

    let mut cmd = Command::cargo_bin("pixelmill").unwrap();
    cmd.arg("batch")
        .arg(&input_dir)
        .arg("--filter")
        .arg("grayscale")
        .arg("--output-dir")
        .arg(&output_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("3 images found"));

    let mut produced: Vec<_> = fs::read_dir(&output_dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect();
    produced.sort();
    assert_eq!(
        produced,
        vec![
            "a_processed.png",
            "b_processed.png",
            "c_processed.png"
        ]
    );
}

/// A corrupt image is reported per path; the rest of the batch survives
#[test]
fn test_batch_isolates_corrupt_image() {
    let temp_dir = TempDir::new().unwrap();
    let input_dir = temp_dir.path().join("shots");
    fs::create_dir(&input_dir).unwrap();
    write_test_png(&input_dir.join("good.png"), 3, 3);
    fs::write(input_dir.join("corrupt.png"), b"this is not a png").unwrap();
    let output_dir = temp_dir.path().join("processed");

    let mut cmd = Command::cargo_bin("pixelmill").unwrap();
    cmd.arg("batch")
        .arg(&input_dir)
        .arg("--filter")
        .arg("invert")
        .arg("--output-dir")
        .arg(&output_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 of 2 images failed"))
        .stdout(predicate::str::contains("corrupt.png"));

    assert!(output_dir.join("good_processed.png").exists());
    assert!(!output_dir.join("corrupt_processed.png").exists());
}

/// A folder without images is an error, not an empty success
#[test]
fn test_batch_rejects_empty_folder() {
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("pixelmill").unwrap();
    cmd.arg("batch")
        .arg(temp_dir.path())
        .arg("--filter")
        .arg("grayscale")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no images found"));
}

/// Repeated runs do not overwrite earlier results
#[test]
fn test_batch_derives_unique_names_on_rerun() {
    let temp_dir = TempDir::new().unwrap();
    let input_dir = temp_dir.path().join("shots");
    fs::create_dir(&input_dir).unwrap();
    write_test_png(&input_dir.join("a.png"), 3, 3);
    let output_dir = temp_dir.path().join("processed");

    for _ in 0..2 {
        Command::cargo_bin("pixelmill")
            .unwrap()
            .arg("batch")
            .arg(&input_dir)
            .arg("--filter")
            .arg("invert")
            .arg("--output-dir")
            .arg(&output_dir)
            .assert()
            .success();
    }

    assert!(output_dir.join("a_processed.png").exists());
    assert!(output_dir.join("a_processed_1.png").exists());
}
