//! Cassette replay integration tests. Zero network I/O.
//!
//! Each test writes a cassette to a temp dir and points `GIFTGEN_REPLAY` at it
//! so the binary never contacts the live endpoint.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use base64::Engine;
use predicates::prelude::*;

const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_MAGIC: [u8; 3] = [0xFF, 0xD8, 0xFF];

fn cmd(cassette: &Path) -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("giftgen");
    cmd.env("GIFTGEN_REPLAY", cassette.to_str().unwrap())
        .env_remove("GOOGLE_API_KEY")
        .env_remove("GEMINI_API_KEY")
        .env_remove("GIFTGEN_REC")
        .args(["--config", "/nonexistent/giftgen/config.toml"]);
    cmd
}

/// Fresh scratch directory for one test.
fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("giftgen_replay_{name}"));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn encode(format: image::ImageFormat) -> Vec<u8> {
    let img = image::DynamicImage::new_rgb8(4, 4);
    let mut buf = std::io::Cursor::new(Vec::<u8>::new());
    img.write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

fn product_image(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, encode(image::ImageFormat::Png)).unwrap();
    path
}

/// YAML for one `generate` interaction with the given output body.
fn interaction(seq: usize, output: &str) -> String {
    format!(
        "  - seq: {seq}\n    port: image_generator\n    method: generate\n    input: {{}}\n    output:\n{output}"
    )
}

fn ok_output(bytes: &[u8], mime_type: &str) -> String {
    let b64 = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("      Ok:\n        data: {b64}\n        mime_type: {mime_type}\n")
}

fn write_cassette(dir: &Path, outputs: &[String]) -> PathBuf {
    let mut content = String::from(
        "name: replay-test\nrecorded_at: \"2026-02-01T00:00:00Z\"\ncommit: test\n",
    );
    content.push_str(if outputs.is_empty() { "interactions: []\n" } else { "interactions:\n" });
    for (seq, output) in outputs.iter().enumerate() {
        content.push_str(&interaction(seq, output));
    }
    let path = dir.join("image_generator.cassette.yaml");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn happy_path_creates_png() {
    let dir = scratch("happy");
    let img = product_image(&dir, "mug.png");
    let cassette = write_cassette(&dir, &[ok_output(&encode(image::ImageFormat::Png), "image/png")]);
    let out = dir.join("banner.png");

    cmd(&cassette)
        .args(["-t", "Choose Your Gift", "-o", out.to_str().unwrap(), img.to_str().unwrap()])
        .assert()
        .success()
        .stderr(predicate::str::contains("Saved:"));

    let data = std::fs::read(&out).unwrap();
    assert_eq!(&data[..8], &PNG_MAGIC, "Output should be a valid PNG file");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn format_jpeg_converts_png_output() {
    let dir = scratch("convert");
    let img = product_image(&dir, "scarf.png");
    let cassette = write_cassette(&dir, &[ok_output(&encode(image::ImageFormat::Png), "image/png")]);
    let out = dir.join("banner.jpg");

    cmd(&cassette)
        .args(["--format", "jpeg", "-o", out.to_str().unwrap(), img.to_str().unwrap()])
        .assert()
        .success();

    let data = std::fs::read(&out).unwrap();
    assert_eq!(&data[..3], &JPEG_MAGIC, "Output should be a valid JPEG file");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn auto_filename_uses_main_text() {
    let dir = scratch("autofile");
    let img = product_image(&dir, "candle.png");
    let cassette = write_cassette(&dir, &[ok_output(&encode(image::ImageFormat::Png), "image/png")]);
    let work_dir = dir.join("work");
    std::fs::create_dir_all(&work_dir).unwrap();

    cmd(&cassette)
        .args(["-t", "Winter Gifts", img.to_str().unwrap()])
        .current_dir(&work_dir)
        .assert()
        .success();

    let files: Vec<_> = std::fs::read_dir(&work_dir).unwrap().flatten().collect();
    assert_eq!(files.len(), 1, "Exactly one file should be created");
    let name = files[0].file_name();
    let name = name.to_string_lossy();
    assert!(name.starts_with("winter-gifts-"), "unexpected filename: {name}");
    assert!(name.ends_with(".png"), "unexpected filename: {name}");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn quota_error_is_reported() {
    let dir = scratch("quota");
    let img = product_image(&dir, "mug.png");
    let cassette = write_cassette(&dir, &["      Err: QuotaExceeded\n".to_string()]);
    let out = dir.join("banner.png");

    cmd(&cassette)
        .args(["-o", out.to_str().unwrap(), img.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("429"))
        .stderr(predicate::str::contains("--model"));

    assert!(!out.exists());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn provider_error_includes_status_and_body() {
    let dir = scratch("provider");
    let img = product_image(&dir, "mug.png");
    let provider = "      Err:\n        Provider:\n          status: 400\n          body: \"API key not valid\"\n";
    let cassette = write_cassette(&dir, &[provider.to_string()]);

    cmd(&cassette)
        .args(["-o", dir.join("banner.png").to_str().unwrap(), img.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("API error: 400"))
        .stderr(predicate::str::contains("API key not valid"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn response_shape_error_is_reported() {
    let dir = scratch("shape");
    let img = product_image(&dir, "mug.png");
    let shape = "      Err:\n        ResponseShape: \"no image data in response\"\n";
    let cassette = write_cassette(&dir, &[shape.to_string()]);

    cmd(&cassette)
        .args(["-o", dir.join("banner.png").to_str().unwrap(), img.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no image data in response"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn exhausted_cassette_fails() {
    let dir = scratch("exhausted");
    let img = product_image(&dir, "mug.png");
    let cassette = write_cassette(&dir, &[]);

    cmd(&cassette)
        .args(["-o", dir.join("banner.png").to_str().unwrap(), img.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Replay failed"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn refine_from_saves_new_banner() {
    let dir = scratch("refine");
    let img = product_image(&dir, "mug.png");
    let previous = product_image(&dir, "previous.png");
    let cassette = write_cassette(&dir, &[ok_output(&encode(image::ImageFormat::Png), "image/png")]);
    let out = dir.join("refined.png");

    cmd(&cassette)
        .args([
            "--refine-from",
            previous.to_str().unwrap(),
            "-M",
            "make background brighter",
            "-o",
            out.to_str().unwrap(),
            img.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("Saved:"));

    assert!(out.exists());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn interactive_rounds_write_numbered_files() {
    let dir = scratch("interactive");
    let img = product_image(&dir, "mug.png");
    let png = encode(image::ImageFormat::Png);
    let cassette = write_cassette(
        &dir,
        &[ok_output(&png, "image/png"), ok_output(&png, "image/png")],
    );
    let out = dir.join("banner.png");

    cmd(&cassette)
        .args(["-i", "-o", out.to_str().unwrap(), img.to_str().unwrap()])
        .write_stdin("add gold ribbons\n\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Modification (empty line to finish)"));

    assert!(out.exists());
    assert!(dir.join("banner-r1.png").exists());
    assert!(!dir.join("banner-r2.png").exists());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn interactive_failure_keeps_going() {
    let dir = scratch("interactive_failure");
    let img = product_image(&dir, "mug.png");
    let png = encode(image::ImageFormat::Png);
    let cassette = write_cassette(
        &dir,
        &[
            ok_output(&png, "image/png"),
            "      Err: QuotaExceeded\n".to_string(),
            ok_output(&png, "image/png"),
        ],
    );
    let out = dir.join("banner.png");

    cmd(&cassette)
        .args(["-i", "-o", out.to_str().unwrap(), img.to_str().unwrap()])
        .write_stdin("warmer tones\nbigger headline\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Error: API error: 429"));

    assert!(out.exists());
    assert!(dir.join("banner-r1.png").exists());

    let _ = std::fs::remove_dir_all(&dir);
}
