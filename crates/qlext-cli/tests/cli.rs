//! Command-line tests for `qlext-gen`.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../qlext-codegen/tests/fixtures")
}

fn config() -> PathBuf {
    fixtures().join("code_gen.json")
}

fn qlext() -> Command {
    let mut cmd = Command::cargo_bin("qlext-gen").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("QLEXT_CONFIG")
        .env_remove("QLEXT_MAPPINGS");
    cmd
}

// =============================================================================
// GENERATE
// =============================================================================

#[test]
fn test_generate_writes_files() {
    let out = tempfile::tempdir().unwrap();
    qlext()
        .arg("generate")
        .arg("--config")
        .arg(config())
        .arg("--output-dir")
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("2 of 2 entries generated"));

    for name in [
        "DepositRateHelperStructs.h",
        "DepositRateHelperStructs.cpp",
        "OISRateHelperStructs.h",
        "OISRateHelperStructs.cpp",
    ] {
        assert!(out.path().join(name).is_file(), "missing {name}");
    }
}

#[test]
fn test_generate_dry_run_writes_nothing() {
    let out = tempfile::tempdir().unwrap();
    let target = out.path().join("gen");
    qlext()
        .args(["--format", "json", "generate", "--dry-run"])
        .arg("--config")
        .arg(config())
        .arg("--output-dir")
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"written\": false"))
        .stdout(predicate::str::contains("\"status\": \"generated\""));

    assert!(!target.exists());
}

#[test]
fn test_generate_reads_config_from_env() {
    let out = tempfile::tempdir().unwrap();
    qlext()
        .env("QLEXT_CONFIG", config())
        .arg("generate")
        .arg("--output-dir")
        .arg(out.path())
        .assert()
        .success();
    assert!(out.path().join("OISRateHelperStructs.h").is_file());
}

#[test]
fn test_missing_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    qlext()
        .arg("generate")
        .arg("--config")
        .arg(dir.path().join("absent.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("absent.json"));
}

// =============================================================================
// INSPECT
// =============================================================================

#[test]
fn test_inspect_lists_fields() {
    qlext()
        .args(["--format", "json", "inspect", "--entry", "OISRateHelper"])
        .arg("--config")
        .arg(config())
        .assert()
        .success()
        .stdout(predicate::str::contains("customPillarDate"))
        .stdout(predicate::str::contains("\"origin\": \"extra\""));
}

#[test]
fn test_inspect_unknown_entry_fails() {
    qlext()
        .args(["inspect", "--entry", "NoSuchHelper"])
        .arg("--config")
        .arg(config())
        .assert()
        .failure()
        .stderr(predicate::str::contains("NoSuchHelper"));
}

// =============================================================================
// CHECK
// =============================================================================

#[test]
fn test_check_decodes_union_document() {
    let dir = tempfile::tempdir().unwrap();
    let document = dir.path().join("deposit.json");
    std::fs::write(
        &document,
        r#"{"_ver_": "V3", "rate": 0.035, "iborIndex": "EUR-6M", "comment": "ignored"}"#,
    )
    .unwrap();

    qlext()
        .args(["check", "--entry", "DepositRateHelper"])
        .arg("--config")
        .arg(config())
        .arg("--document")
        .arg(&document)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"iborIndex\": \"EUR-6M\""))
        .stdout(predicate::str::contains("comment").not());
}

#[test]
fn test_check_rejects_unknown_version() {
    let dir = tempfile::tempdir().unwrap();
    let document = dir.path().join("deposit.json");
    std::fs::write(&document, r#"{"_ver_": "V9", "rate": 0.035}"#).unwrap();

    qlext()
        .args(["check", "--entry", "DepositRateHelper"])
        .arg("--config")
        .arg(config())
        .arg("--document")
        .arg(&document)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown version tag"));
}

#[test]
fn test_check_rejects_wrong_field_kind() {
    let dir = tempfile::tempdir().unwrap();
    let document = dir.path().join("deposit.json");
    std::fs::write(&document, r#"{"_ver_": "V3", "rate": "abc", "iborIndex": "EUR-6M"}"#).unwrap();

    qlext()
        .args(["check", "--entry", "DepositRateHelper"])
        .arg("--config")
        .arg(config())
        .arg("--document")
        .arg(&document)
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected a JSON number, found string"));
}

#[test]
fn test_check_sequence() {
    let dir = tempfile::tempdir().unwrap();
    let document = dir.path().join("deposits.json");
    std::fs::write(
        &document,
        r#"[{"_ver_": "V3", "rate": 0.01, "iborIndex": "A"}, {"_ver_": "V3", "rate": 0.02, "iborIndex": "B"}]"#,
    )
    .unwrap();

    qlext()
        .args(["--format", "json", "check", "--sequence", "--entry", "DepositRateHelper"])
        .arg("--config")
        .arg(config())
        .arg("--document")
        .arg(&document)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"iborIndex\": \"B\""));
}

// =============================================================================
// MAPPINGS
// =============================================================================

#[test]
fn test_mappings_lists_resolvers() {
    qlext()
        .args(["--format", "csv", "mappings", "--table", "resolvers"])
        .assert()
        .success()
        .stdout(predicate::str::contains("context.getIborIndex"))
        .stdout(predicate::str::contains("values,").not());
}

#[test]
fn test_mappings_file_overlays_standard_tables() {
    let dir = tempfile::tempdir().unwrap();
    let mappings = dir.path().join("mappings.toml");
    std::fs::write(
        &mappings,
        "[resolvers]\n\"Handle<ZeroInflationIndex>\" = \"context.getZeroInflationIndex\"\n",
    )
    .unwrap();

    qlext()
        .args(["--format", "json", "mappings", "--table", "resolvers"])
        .arg("--mappings")
        .arg(&mappings)
        .assert()
        .success()
        .stdout(predicate::str::contains("context.getZeroInflationIndex"))
        .stdout(predicate::str::contains("context.getIborIndex"));
}

#[test]
fn test_mappings_lists_profile() {
    qlext()
        .args(["--format", "csv", "mappings", "--table", "profile"])
        .assert()
        .success()
        .stdout(predicate::str::contains("profile,library_namespace,QuantLib"))
        .stdout(predicate::str::contains("profile,handle,QuantLib::Handle"))
        .stdout(predicate::str::contains("resolvers,").not());
}
