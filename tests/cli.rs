use std::{
    fs,
    path::PathBuf,
    process::{Command, Output},
};

use tempfile::TempDir;

fn spec_path(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("model_specs")
        .join(file)
}

fn run(args: &[PathBuf]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_model_spec"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn no_arguments_is_a_usage_error() {
    let output = run(&[]);

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("usage"));
}

#[test]
fn valid_specs_print_one_line_each() {
    let output = run(&[
        spec_path("vae_tiny_latent.json"),
        spec_path("wgan_gp_small.json"),
    ]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2, "{stdout}");
    assert!(lines[0].contains("vae_tiny_latent.json"));
    assert!(lines[1].contains("wgan_gp_small.json"));
}

#[test]
fn one_bad_spec_fails_the_run() {
    let dir = TempDir::new().unwrap();
    let source = fs::read_to_string(spec_path("vae_tiny_latent.json")).unwrap();
    let truncated = dir.path().join("truncated.json");
    fs::write(&truncated, &source[..source.len() / 2]).unwrap();

    let output = run(&[spec_path("vae_tiny_latent.json"), truncated]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(String::from_utf8(output.stdout).unwrap().lines().count(), 1);

    let stderr = String::from_utf8(output.stderr).unwrap();
    let reports = stderr.lines().filter(|l| l.contains("truncated.json"));
    assert_eq!(reports.count(), 1, "{stderr}");
    assert!(stderr.contains("1 of 2 spec(s) failed"));
}
