//! Integration tests for the ruleguard command implementations.

use ruleguard::RuleguardConfig;
use ruleguard::commands::{self, generate};
use ruleguard_codegen::{GenerateOptions, GoOptions, get_backend};
use std::path::Path;
use tempfile::TempDir;

fn fixture(name: &str) -> &'static Path {
    match name {
        "shop" => Path::new("tests/fixtures/shop.json"),
        "mismatch" => Path::new("tests/fixtures/mismatch.json"),
        other => panic!("fixture {} not found", other),
    }
}

#[test]
fn check_reports_kind_and_path() {
    let err = commands::load_checked(fixture("mismatch")).unwrap_err().to_string();
    assert!(err.contains("expected rules for string but got int32"), "{err}");
    assert!(err.ends_with("[type mismatch]"), "{err}");
    assert!(commands::load_checked(fixture("shop")).is_ok());
}

#[test]
fn backends_default_to_config_then_registry() {
    let all = generate::select_backends(&[], &RuleguardConfig::default()).unwrap();
    assert_eq!(all.len(), ruleguard_codegen::backends().len());

    let mut config = RuleguardConfig::default();
    config.generate.backends = Some(vec!["go".into()]);
    let configured = generate::select_backends(&[], &config).unwrap();
    assert_eq!(configured.iter().map(|b| b.name()).collect::<Vec<_>>(), ["go"]);

    let explicit = generate::select_backends(&["python".into()], &config).unwrap();
    assert_eq!(explicit[0].name(), "python");

    let err = generate::select_backends(&["cobol".into()], &config).unwrap_err();
    assert!(err.to_string().starts_with("unknown backend: cobol. Available:"));
}

#[test]
fn generate_writes_one_file_per_backend() {
    let dir = TempDir::new().unwrap();
    let config = RuleguardConfig {
        backends: GenerateOptions {
            go: GoOptions {
                package: Some("shoppb".into()),
            },
            ..Default::default()
        },
        ..Default::default()
    };
    let selected = generate::select_backends(&["python".into(), "go".into()], &config).unwrap();
    let generated = generate::generate(fixture("shop"), &selected, &config).unwrap();
    let written = generate::write_all(dir.path(), "shop", &generated).unwrap();

    assert_eq!(written, [dir.path().join("shop_validate.py"), dir.path().join("shop_validate.go")]);
    let go = std::fs::read_to_string(dir.path().join("shop_validate.go")).unwrap();
    assert!(go.contains("package shoppb"));
}

#[test]
fn failed_check_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("gen");
    let args = generate::GenerateArgs {
        schema: fixture("mismatch").to_path_buf(),
        backends: vec!["python".into()],
        output: Some(out.clone()),
    };
    assert!(generate::run(args, &RuleguardConfig::default()).is_err());
    assert!(!out.exists());
}

#[test]
fn backend_listing() {
    let listing = commands::backends::listing(&[get_backend("python").unwrap(), get_backend("go").unwrap()]);
    insta::assert_snapshot!(listing, @r"
    python   python   .py   exception
    go       go       .go   error value
    ");
}
