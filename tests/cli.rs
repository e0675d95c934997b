// tests/cli.rs

//! Exit behavior of the binary on configuration mistakes.
//!
//! Every case here fails validation before any device is opened, so the
//! tests run without a framebuffer.

use std::process::Command;

fn fbnoise() -> Command {
    Command::new(env!("CARGO_BIN_EXE_fbnoise"))
}

#[test]
fn help_lists_the_contractual_flags() {
    let output = fbnoise().arg("--help").output().expect("run binary");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for flag in [
        "--fb",
        "--width",
        "--height",
        "--opacity",
        "--colormap",
        "--noise-type",
        "--fps",
        "--seed",
        "--input-path",
        "--min-value",
        "--max-value",
        "--debug",
    ] {
        assert!(stdout.contains(flag), "help is missing {}", flag);
    }
}

#[test]
fn unknown_colormap_exits_with_a_diagnostic() {
    let output = fbnoise()
        .args(["--colormap", "plasma"])
        .output()
        .expect("run binary");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("plasma"), "stderr was: {}", stderr);
}

#[test]
fn unknown_noise_type_exits_with_a_diagnostic() {
    let output = fbnoise()
        .args(["--noise-type", "perlin"])
        .output()
        .expect("run binary");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("perlin"), "stderr was: {}", stderr);
}

#[test]
fn inverted_sensor_bounds_exit_with_a_diagnostic() {
    let output = fbnoise()
        .args(["--min-value", "2", "--max-value", "1"])
        .output()
        .expect("run binary");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("min-value"), "stderr was: {}", stderr);
}

#[test]
fn out_of_range_opacity_exits_with_a_diagnostic() {
    let output = fbnoise()
        .args(["--opacity", "1.5"])
        .output()
        .expect("run binary");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("opacity"), "stderr was: {}", stderr);
}

#[test]
fn missing_config_file_exits_with_a_diagnostic() {
    let output = fbnoise()
        .args(["--config", "/nonexistent/fbnoise.json"])
        .output()
        .expect("run binary");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("/nonexistent/fbnoise.json"),
        "stderr was: {}",
        stderr
    );
}
