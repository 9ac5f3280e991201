//! CLI end-to-end tests
//!
//! Tests for the mkvdemux command-line interface.

mod common;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

/// Get a command for the mkvdemux binary
#[allow(deprecated)]
fn mkvdemux_cmd() -> Command {
    Command::cargo_bin("mkvdemux").unwrap()
}

#[test]
fn test_cli_no_args_shows_help() {
    let mut cmd = mkvdemux_cmd();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_help_flag() {
    let mut cmd = mkvdemux_cmd();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("mkvdemux"))
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_version_command() {
    let mut cmd = mkvdemux_cmd();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "mkvdemux {}",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn test_cli_extract_help() {
    let mut cmd = mkvdemux_cmd();
    cmd.args(["extract", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Write each track to its own file"));
}

#[test]
fn test_cli_info_nonexistent_file() {
    let mut cmd = mkvdemux_cmd();
    cmd.args(["info", "/nonexistent/path/movie.mkv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found").or(predicate::str::contains("exist")));
}

#[test]
fn test_cli_info_requires_input() {
    let mut cmd = mkvdemux_cmd();
    cmd.arg("info").assert().failure();
}

#[test]
fn test_cli_info() {
    let temp = tempdir().unwrap();
    let file = common::write_sample(temp.path());

    let mut cmd = mkvdemux_cmd();
    cmd.args(["info", file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Doc type: matroska"))
        .stdout(predicate::str::contains("Duration: 00:00:05.000"))
        .stdout(predicate::str::contains("Tracks: 3"))
        .stdout(predicate::str::contains("V_MPEG4/ISO/AVC (AVC) 1920x1080"))
        .stdout(predicate::str::contains("A_OPUS (Opus) 8000 Hz 1ch"))
        .stdout(predicate::str::contains("subtitle S_TEXT/UTF8"));
}

#[test]
fn test_cli_info_json() {
    let temp = tempdir().unwrap();
    let file = common::write_sample(temp.path());

    let output = mkvdemux_cmd()
        .args(["info", "--json", file.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["header"]["doc_type"], "matroska");
    assert_eq!(json["info"]["timestamp_scale"], 1_000_000);
    assert_eq!(json["tracks"].as_array().unwrap().len(), 3);
    assert_eq!(json["tracks"][0]["codec_id"], "V_MPEG4/ISO/AVC");
    assert_eq!(json["tracks"][0]["video"]["display_width"], 1920);
}

/// Command builder that can feed standard input
#[allow(deprecated)]
fn mkvdemux_stdin_cmd() -> assert_cmd::Command {
    assert_cmd::Command::cargo_bin("mkvdemux").unwrap()
}

#[test]
fn test_cli_info_stdin() {
    mkvdemux_stdin_cmd()
        .args(["info", "--stdin"])
        .write_stdin(common::sample_file())
        .assert()
        .success()
        .stdout(predicate::str::contains("Tracks: 3"));
}

#[test]
fn test_cli_packets_stdin_warns_about_skipped_clusters() {
    mkvdemux_stdin_cmd()
        .args(["packets", "--stdin"])
        .write_stdin(common::sample_file())
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("1 cluster(s) were skipped"));
}

#[test]
fn test_cli_info_rejects_other_doc_types() {
    let temp = tempdir().unwrap();
    let file = temp.path().join("other.ebml");
    fs::write(&file, common::document("foo", &[])).unwrap();

    let mut cmd = mkvdemux_cmd();
    cmd.args(["info", file.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("foo"));
}

#[test]
fn test_cli_packets() {
    let temp = tempdir().unwrap();
    let file = common::write_sample(temp.path());

    let mut cmd = mkvdemux_cmd();
    cmd.args(["packets", file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("track 1 start 1000 end 1000 size 6"))
        .stdout(predicate::str::contains("track 2 start 1005 end 1005 size 7"))
        .stdout(predicate::str::contains("track 3 start 1010 end 2510 size 12"))
        .stdout(predicate::str::contains("track 1 start 1040 end 1040 size 6"));
}

#[test]
fn test_cli_packets_limit() {
    let temp = tempdir().unwrap();
    let file = common::write_sample(temp.path());

    let output = mkvdemux_cmd()
        .args(["packets", "--limit", "2", file.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("flags KU"));
}

#[test]
fn test_cli_extract() {
    let temp = tempdir().unwrap();
    let file = common::write_sample(temp.path());
    let out_dir = temp.path().join("out");

    let mut cmd = mkvdemux_cmd();
    cmd.args([
        "extract",
        "-o",
        out_dir.to_str().unwrap(),
        file.to_str().unwrap(),
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("Total: 4 packets"));

    let video = fs::read(out_dir.join("track_0.h264")).unwrap();
    assert_eq!(
        video,
        vec![
            0, 0, 0, 1, 0x67, 0x64, 0x1F, 0, 0, 0, 1, 0x68, 0xEE, // parameter sets
            0, 0, 0, 1, 0x65, 0x88, 0, 0, 0, 1, 0x41, 0x9A,
        ]
    );

    let audio = fs::read(out_dir.join("track_1.opus")).unwrap();
    assert_eq!(audio, b"audio-0");

    let subs = fs::read(out_dir.join("track_2.srt")).unwrap();
    assert_eq!(&subs[..3], &[0xEF, 0xBB, 0xBF]);
    assert_eq!(
        String::from_utf8(subs[3..].to_vec()).unwrap(),
        "1\n00:00:01,010 --> 00:00:02,510\nHello\nworld\n\n"
    );
}

#[test]
fn test_cli_extract_selected_raw() {
    let temp = tempdir().unwrap();
    let file = common::write_sample(temp.path());
    let out_dir = temp.path().join("out");

    let mut cmd = mkvdemux_cmd();
    cmd.args([
        "extract",
        "--raw",
        "--tracks",
        "0,2",
        "-o",
        out_dir.to_str().unwrap(),
        file.to_str().unwrap(),
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("Total: 3 packets"));

    let video = fs::read(out_dir.join("track_0.avc")).unwrap();
    assert_eq!(video, vec![0, 0, 0, 2, 0x65, 0x88, 0, 0, 0, 2, 0x41, 0x9A]);
    assert_eq!(
        fs::read(out_dir.join("track_2.txt")).unwrap(),
        b"Hello\r\nworld"
    );
    assert!(!out_dir.join("track_1.opus").exists());
}

#[test]
fn test_cli_extract_invalid_track() {
    let temp = tempdir().unwrap();
    let file = common::write_sample(temp.path());

    let mut cmd = mkvdemux_cmd();
    cmd.args([
        "extract",
        "--tracks",
        "7",
        "-o",
        temp.path().join("out").to_str().unwrap(),
        file.to_str().unwrap(),
    ])
    .assert()
    .failure()
    .stderr(predicate::str::contains("out of range"));
}

#[test]
fn test_cli_extract_uses_config() {
    let temp = tempdir().unwrap();
    let file = common::write_sample(temp.path());
    let out_dir = temp.path().join("from-config");
    let config_file = temp.path().join("config.toml");

    fs::write(
        &config_file,
        format!(
            r#"
[extract]
output_dir = {:?}
annexb = false
tracks = [0]
"#,
            out_dir.to_str().unwrap()
        ),
    )
    .unwrap();

    let mut cmd = mkvdemux_cmd();
    cmd.args([
        "--config",
        config_file.to_str().unwrap(),
        "extract",
        file.to_str().unwrap(),
    ])
    .assert()
    .success();

    assert!(out_dir.join("track_0.avc").exists());
    assert!(!out_dir.join("track_1.opus").exists());
}

#[test]
fn test_cli_element_size_ceiling() {
    let temp = tempdir().unwrap();
    let file = common::write_sample(temp.path());
    let config_file = temp.path().join("config.toml");
    fs::write(&config_file, "[demux]\nmax_element_size = 16\n").unwrap();

    let mut cmd = mkvdemux_cmd();
    cmd.args([
        "-c",
        config_file.to_str().unwrap(),
        "info",
        file.to_str().unwrap(),
    ])
    .assert()
    .failure();
}

#[test]
fn test_cli_validate_config() {
    let temp = tempdir().unwrap();
    let config_file = temp.path().join("config.toml");
    fs::write(&config_file, "[demux]\nmax_element_size = 1024\n").unwrap();

    let mut cmd = mkvdemux_cmd();
    cmd.args(["validate", config_file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("Max element size: 1024"));
}

#[test]
fn test_cli_validate_invalid_config() {
    let temp = tempdir().unwrap();
    let config_file = temp.path().join("config.toml");
    fs::write(&config_file, "[demux]\nmax_element_size = 0\n").unwrap();

    let mut cmd = mkvdemux_cmd();
    cmd.args(["validate", config_file.to_str().unwrap()])
        .assert()
        .failure();
}
