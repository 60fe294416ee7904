//! End-to-end generation runs over the fixture definitions.

use std::path::{Path, PathBuf};

use qlext_codegen::prelude::*;
use qlext_codegen::{CodegenError, EntryStatus, FieldOrigin};

// =============================================================================
// HELPERS
// =============================================================================

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn fixture_config() -> GenerationConfig {
    GenerationConfig::from_file(fixtures().join("code_gen.json")).unwrap()
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

// =============================================================================
// RUNS
// =============================================================================

#[test]
fn test_fixture_run_writes_both_entries() {
    let out = tempfile::tempdir().unwrap();
    let report = Generator::default()
        .run(&fixture_config(), &fixtures(), out.path())
        .unwrap();

    assert_eq!(report.generated_count(), 2);
    assert_eq!(report.skipped_count(), 0);
    for stem in ["DepositRateHelperStructs", "OISRateHelperStructs"] {
        assert!(out.path().join(format!("{stem}.h")).is_file());
        assert!(out.path().join(format!("{stem}.cpp")).is_file());
    }

    let deposit = &report.entries[0];
    assert_eq!(deposit.entity.as_deref(), Some("DepositRateHelper"));
    assert_eq!(deposit.overloads, 4);
    assert!(matches!(deposit.status, EntryStatus::Generated { .. }));
}

#[test]
fn test_overloaded_entity_gets_variants_and_union() {
    let out = tempfile::tempdir().unwrap();
    Generator::default()
        .run(&fixture_config(), &fixtures(), out.path())
        .unwrap();
    let header = read(&out.path().join("DepositRateHelperStructs.h"));
    let body = read(&out.path().join("DepositRateHelperStructs.cpp"));

    assert!(header.contains("namespace QlExt::Structs {"));
    for i in 0..4 {
        assert!(header.contains(&format!("struct DepositRateHelperV{i} {{")));
        assert!(header.contains(&format!("= \"V{i}\"")));
        assert!(header.contains(&format!("= \"DepositRateHelperV{i}\"")));
    }
    assert!(header.contains(
        "using DepositRateHelper = std::variant<DepositRateHelperV0,DepositRateHelperV1,DepositRateHelperV2,DepositRateHelperV3>;"
    ));

    // quote handle stored as a value holder, rebuilt in the factory
    assert!(header.contains("QuantLib::SimpleQuote"));
    assert!(body.contains(
        "QuantLib::Handle<QuantLib::Quote>(QuantLib::ext::make_shared<QuantLib::SimpleQuote>(v.rate))"
    ));
    assert!(body.contains("context.getIborIndex(v.iborIndex)"));
    // codecs read and write `_name_`, factories never pass it
    let factories: Vec<&str> = body
        .split("return QuantLib::ext::make_shared<")
        .skip(1)
        .map(|rest| rest.split(");").next().unwrap())
        .collect();
    assert_eq!(factories.len(), 4);
    for args in factories {
        assert!(!args.contains("v._name_"));
        assert!(!args.contains("v._type_"));
        assert!(!args.contains("v._ver_"));
    }
    assert!(body.contains("to_json(v._name_)"));
}

#[test]
fn test_single_overload_entity_has_no_version_tag() {
    let out = tempfile::tempdir().unwrap();
    Generator::default()
        .run(&fixture_config(), &fixtures(), out.path())
        .unwrap();
    let header = read(&out.path().join("OISRateHelperStructs.h"));
    let body = read(&out.path().join("OISRateHelperStructs.cpp"));

    assert!(header.contains("struct OISRateHelper {"));
    assert!(!header.contains("_ver_"));
    assert!(!header.contains("std::variant<"));
    assert!(header.contains("= QuantLib::ext::nullopt"));
    assert!(header.contains("= QuantLib::RateAveraging::Compound"));
    assert!(header.contains(
        "create(const QlExt::Context& context, const QlExt::Structs::OISRateHelper& v);"
    ));
    assert!(body.contains(
        "QuantLib::Handle<QuantLib::YieldTermStructure>(context.getYieldTermStructure(v.discountingCurve))"
    ));
    assert!(body.contains("context.getOvernightIndex(v.overnightIndex)"));

    assert!(body.starts_with("#include \"OISRateHelperStructs.h\""));
    assert!(body.contains("else if (key == \"customPillarDate\")"));
    assert!(!body.contains("j.at(\"_ver_\")"));
}

#[test]
fn test_runs_are_deterministic() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    let generator = Generator::default();
    generator.run(&fixture_config(), &fixtures(), first.path()).unwrap();
    generator.run(&fixture_config(), &fixtures(), second.path()).unwrap();

    for name in ["DepositRateHelperStructs.h", "DepositRateHelperStructs.cpp"] {
        assert_eq!(read(&first.path().join(name)), read(&second.path().join(name)));
    }
}

#[test]
fn test_output_directory_is_created() {
    let out = tempfile::tempdir().unwrap();
    let nested = out.path().join("gen").join("structs");
    Generator::default()
        .run(&fixture_config(), &fixtures(), &nested)
        .unwrap();
    assert!(nested.join("OISRateHelperStructs.h").is_file());
}

// =============================================================================
// SCHEMA CONTRACT
// =============================================================================

#[test]
fn test_field_order_contract() {
    let config = fixture_config();
    let entry = config.entry("DepositRateHelper").unwrap();
    let source = Generator::read_definitions(entry, &fixtures()).unwrap();
    let schema = Generator::default()
        .schema_for(entry, &source)
        .unwrap()
        .unwrap();

    let v3 = schema.struct_named("DepositRateHelperV3").unwrap();
    let names: Vec<_> = v3.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["_name_", "_type_", "_ver_", "rate", "iborIndex"]);
    let origins: Vec<_> = v3.fields.iter().map(|f| f.origin).collect();
    assert_eq!(
        origins,
        vec![
            FieldOrigin::Extra,
            FieldOrigin::TypeTag,
            FieldOrigin::VersionTag,
            FieldOrigin::Parameter,
            FieldOrigin::Parameter,
        ]
    );
}

// =============================================================================
// MAPPINGS
// =============================================================================

#[test]
fn test_unknown_type_aborts_the_run() {
    let defs = tempfile::tempdir().unwrap();
    std::fs::write(
        defs.path().join("Cpi.ctor"),
        "ZeroCouponInflationSwapHelper(const Handle<Quote>& quote, const Handle<ZeroInflationIndex>& index);",
    )
    .unwrap();
    let config = GenerationConfig::new(vec![EntryConfig::new("Zciis", "", "ZciisStructs", "Cpi.ctor")]);

    let err = Generator::default()
        .run(&config, defs.path(), defs.path())
        .unwrap_err();
    match err {
        CodegenError::UnknownType { source_type, parameter, .. } => {
            assert_eq!(source_type, "Handle<ZeroInflationIndex>");
            assert_eq!(parameter, "index");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!defs.path().join("ZciisStructs.h").exists());
}

#[test]
fn test_mappings_file_adds_a_resolver() {
    let defs = tempfile::tempdir().unwrap();
    std::fs::write(
        defs.path().join("Cpi.ctor"),
        "ZeroCouponInflationSwapHelper(const Handle<Quote>& quote, const Handle<ZeroInflationIndex>& index);",
    )
    .unwrap();
    let mappings = defs.path().join("mappings.toml");
    std::fs::write(
        &mappings,
        "[resolvers]\n\"Handle<ZeroInflationIndex>\" = \"context.getZeroInflationIndex\"\n",
    )
    .unwrap();
    let config = GenerationConfig::new(vec![EntryConfig::new("Zciis", "", "ZciisStructs", "Cpi.ctor")]);

    let generator = Generator::new(LookupTables::from_file(&mappings).unwrap());
    generator.run(&config, defs.path(), defs.path()).unwrap();
    let body = read(&defs.path().join("ZciisStructs.cpp"));
    assert!(body.contains(
        "QuantLib::Handle<QuantLib::ZeroInflationIndex>(context.getZeroInflationIndex(v.index))"
    ));
}

#[test]
fn test_invalid_config_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(
        &path,
        r#"[{"struct_name": "A", "output_file": "same", "definitions_file": "a.ctor"},
            {"struct_name": "B", "output_file": "same", "definitions_file": "b.ctor"}]"#,
    )
    .unwrap();
    assert!(matches!(
        GenerationConfig::from_file(&path),
        Err(CodegenError::Validation { .. })
    ));

    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(
        GenerationConfig::from_file(&path),
        Err(CodegenError::Config { .. })
    ));
}
