use assert_cmd::Command;
use predicates::prelude::*;

mod common;

use common::{file_names, Fixture};

/// A fixture yielding exactly one 32x32 tile: 64 > 32 + 0, but not 32 + 32.
fn small_fixture() -> Fixture {
    let fixture = Fixture::new();
    fixture.add_background("snow.png", 64, 64);
    fixture.add_foreground("bear.png", 10, 6);
    fixture
}

fn generate_cmd(fixture: &Fixture) -> Command {
    let mut cmd = Command::cargo_bin("synthvoc").unwrap();
    cmd.arg("generate")
        .arg("--backgrounds")
        .arg(&fixture.backgrounds)
        .arg("--foregrounds")
        .arg(&fixture.foregrounds)
        .arg("--output")
        .arg(&fixture.output)
        .args(["--tile-size", "32"]);
    cmd
}

#[test]
fn runs() {
    let mut cmd = Command::cargo_bin("synthvoc").unwrap();
    cmd.assert().success();
}

#[test]
fn outputs_tool_name() {
    let mut cmd = Command::cargo_bin("synthvoc").unwrap();
    cmd.arg("-V");
    cmd.assert().success().stdout("synthvoc 0.1.0\n");
}

// Generate subcommand tests

#[test]
fn generate_writes_image_and_annotation_pairs() {
    let fixture = small_fixture();

    generate_cmd(&fixture)
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated 8 composite(s)"));

    let images = file_names(&fixture.output);
    let annotations = file_names(&fixture.annotations());
    assert_eq!(images.len(), 8);
    assert_eq!(annotations.len(), 8);
    assert!(images.contains(&"7.png".to_string()));
    assert!(annotations.contains(&"7.xml".to_string()));
}

#[test]
fn generate_json_report() {
    let fixture = small_fixture();

    generate_cmd(&fixture)
        .args(["--seed", "9", "--report", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"composites\": 8"))
        .stdout(predicate::str::contains("\"seed\": 9"));
}

#[test]
fn generate_reads_yaml_config_and_flags_override_it() {
    let fixture = small_fixture();
    let config_path = fixture.root.path().join("run.yaml");
    std::fs::write(
        &config_path,
        format!(
            "backgrounds: {}\nforegrounds: {}\noutput: {}\ntile_size: 32\nlabel: walrus\n",
            fixture.backgrounds.display(),
            fixture.foregrounds.display(),
            fixture.output.display()
        ),
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("synthvoc").unwrap();
    cmd.arg("generate")
        .arg("--config")
        .arg(&config_path)
        .args(["--label", "seal"])
        .assert()
        .success();

    let xml = std::fs::read_to_string(fixture.annotations().join("0.xml")).unwrap();
    assert!(xml.contains("<name>seal</name>"));
    assert!(!xml.contains("walrus"));
}

#[test]
fn generate_missing_output_flag_fails() {
    let fixture = small_fixture();

    let mut cmd = Command::cargo_bin("synthvoc").unwrap();
    cmd.arg("generate")
        .arg("--backgrounds")
        .arg(&fixture.backgrounds)
        .arg("--foregrounds")
        .arg(&fixture.foregrounds);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--output"));
}

#[test]
fn generate_too_small_background_fails_with_path() {
    let fixture = Fixture::new();
    fixture.add_background("strip.png", 100, 32);
    fixture.add_foreground("bear.png", 10, 6);

    generate_cmd(&fixture)
        .assert()
        .failure()
        .stderr(predicate::str::contains("strip.png"))
        .stderr(predicate::str::contains("too small"));
    assert!(!fixture.output.exists());
}

#[test]
fn generate_rejects_bad_distribution() {
    let fixture = small_fixture();

    generate_cmd(&fixture)
        .args(["--distribution", "0:1"])
        .assert()
        .failure();
}

// Plan subcommand tests

#[test]
fn plan_predicts_without_writing() {
    let fixture = small_fixture();

    let mut cmd = Command::cargo_bin("synthvoc").unwrap();
    cmd.arg("plan")
        .arg("--backgrounds")
        .arg(&fixture.backgrounds)
        .arg("--foregrounds")
        .arg(&fixture.foregrounds)
        .arg("--output")
        .arg(&fixture.output)
        .args(["--tile-size", "32", "--report", "json"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"tiles\": 1"))
        .stdout(predicate::str::contains("\"composites\": 8"))
        .stdout(predicate::str::contains("\"pool_size\": 8"));

    assert!(!fixture.output.exists());
}

// Verify subcommand tests

#[test]
fn verify_generated_corpus_passes() {
    let fixture = small_fixture();
    generate_cmd(&fixture).assert().success();

    let mut cmd = Command::cargo_bin("synthvoc").unwrap();
    cmd.arg("verify").arg("--images").arg(&fixture.output);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Verification passed"));
}

#[test]
fn verify_reports_missing_image() {
    let fixture = small_fixture();
    generate_cmd(&fixture).assert().success();
    std::fs::remove_file(fixture.output.join("3.png")).unwrap();

    let mut cmd = Command::cargo_bin("synthvoc").unwrap();
    cmd.arg("verify")
        .arg("--images")
        .arg(&fixture.output)
        .args(["--output", "json"]);
    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("MissingImage"))
        .stderr(predicate::str::contains("Verification failed"));
}

#[test]
fn verify_strict_fails_on_orphan_image() {
    let fixture = small_fixture();
    generate_cmd(&fixture).assert().success();
    std::fs::copy(fixture.output.join("0.png"), fixture.output.join("extra.png")).unwrap();

    let mut lenient = Command::cargo_bin("synthvoc").unwrap();
    lenient.arg("verify").arg("--images").arg(&fixture.output);
    lenient
        .assert()
        .success()
        .stdout(predicate::str::contains("OrphanImage"));

    let mut strict = Command::cargo_bin("synthvoc").unwrap();
    strict
        .arg("verify")
        .arg("--images")
        .arg(&fixture.output)
        .arg("--strict");
    strict.assert().failure();
}
