//! Integration tests driving the compiled `stool` binary.

use pretty_assertions::assert_eq;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

fn stool(args: &[&str], stdin: Option<&[u8]>) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_stool"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn stool");

    {
        let mut pipe = child.stdin.take().expect("stdin pipe");
        if let Some(input) = stdin {
            pipe.write_all(input).expect("write stdin");
        }
    }

    child.wait_with_output().expect("wait for stool")
}

fn write_file(dir: &Path, name: &str, contents: &[u8]) -> String {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn encode_detects_extension() {
    let temp_dir = TempDir::new().unwrap();
    let file = write_file(temp_dir.path(), "hello.txt", b"Hello, World!");

    let output = stool(&["dataurl", &file], None);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "data:text/plain;base64,SGVsbG8sIFdvcmxkIQ=="
    );
}

#[test]
fn encode_unknown_extension_defaults_to_octet_stream() {
    let temp_dir = TempDir::new().unwrap();
    let file = write_file(temp_dir.path(), "blob.nope", b"abc");

    let output = stool(&["dataurl", &file], None);
    assert!(output.status.success());
    assert_eq!(output.stdout, b"data:application/octet-stream;base64,YWJj");
}

#[test]
fn forced_mimetype_and_ascii() {
    let temp_dir = TempDir::new().unwrap();
    let file = write_file(temp_dir.path(), "picture.png", b"a b");

    let output = stool(&["dataurl", "--ascii", "--mimetype", "text/plain", &file], None);
    assert!(output.status.success());
    assert_eq!(output.stdout, b"data:text/plain,a%20b");
}

#[test]
fn stdin_matches_file_with_same_forced_type() {
    let temp_dir = TempDir::new().unwrap();
    let data = b"\x00\x01binary\xfe\xff";
    let file = write_file(temp_dir.path(), "input.dat", data);

    let from_file = stool(&["dataurl", "--mimetype", "image/png", &file], None);
    let from_stdin = stool(&["dataurl", "--mimetype", "image/png", "-"], Some(data));

    assert!(from_file.status.success());
    assert!(from_stdin.status.success());
    assert_eq!(from_file.stdout, from_stdin.stdout);
}

#[test]
fn decode_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let data: Vec<u8> = (0..=255).collect();
    let file = write_file(temp_dir.path(), "all.bin", &data);

    for extra in [&[][..], &["--ascii"][..]] {
        let mut args = vec!["dataurl"];
        args.extend_from_slice(extra);
        args.push(&file);
        let encoded = stool(&args, None);
        assert!(encoded.status.success());

        let decoded = stool(&["dataurl", "--decode", "-"], Some(&encoded.stdout));
        assert!(decoded.status.success());
        assert_eq!(decoded.stdout, data);
    }
}

#[test]
fn decode_malformed_input_fails_without_output() {
    for input in [&b"not-a-data-url"[..], b"data:text/plain;base64,QQ==extra"] {
        let output = stool(&["dataurl", "--decode", "-"], Some(input));
        assert!(!output.status.success());
        assert!(output.stdout.is_empty());
        assert!(!output.stderr.is_empty());
    }
}

#[test]
fn missing_file_and_directory_fail() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.txt");

    let output = stool(&["dataurl", &missing.to_string_lossy()], None);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());

    let output = stool(&["dataurl", &temp_dir.path().to_string_lossy()], None);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not a regular file"));
}

#[test]
fn version_prints_build_metadata() {
    let output = stool(&["version"], None);
    assert!(output.status.success());

    let text = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 6);
    assert!(lines[0].starts_with("stool v"));
    assert!(lines[1].starts_with("- build/date: "));
    assert!(lines[2].starts_with("- build/commit: "));
    assert_eq!(lines[3], format!("- os/type: {}", std::env::consts::OS));
    assert_eq!(lines[4], format!("- os/arch: {}", std::env::consts::ARCH));
    assert!(lines[5].starts_with("- rust/version: "));
}

#[test]
fn mimetype_with_separator_in_param_is_rejected() {
    let output = stool(
        &["dataurl", "--mimetype", "text/plain;name=\"a,b\"", "-"],
        Some(b"xyz"),
    );
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid media type"));
}
