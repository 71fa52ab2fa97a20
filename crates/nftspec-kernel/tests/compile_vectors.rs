//! Integration tests: compile the fixture specifications.
//!
//! Each fixture in tests/fixtures/ has:
//! - spec.toml: the specification tree
//! - expect.json: `accepted` with the expected render context and rendered
//!   artifacts, or `rejected` with the expected error code
//!
//! Rejected fixtures must not yield a materialization plan.

use nftspec_kernel::{SpecificationTree, compile};
use serde_json::{Value, json};
use std::path::PathBuf;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn run_fixture(name: &str) {
    let dir = fixtures_dir().join(name);
    let spec_path = dir.join("spec.toml");
    let expect_path = dir.join("expect.json");

    let tree = SpecificationTree::load(&spec_path)
        .unwrap_or_else(|e| panic!("failed to load {}: {e}", spec_path.display()));
    let expect_str = std::fs::read_to_string(&expect_path)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", expect_path.display()));
    let expected: Value = serde_json::from_str(&expect_str)
        .unwrap_or_else(|e| panic!("failed to parse {}: {e}", expect_path.display()));

    let got = match compile(tree) {
        Ok(compilation) => json!({
            "result": "accepted",
            "context": compilation.context,
            "rendered": compilation.plan.rendered,
        }),
        Err(error) => json!({
            "result": "rejected",
            "code": error.code(),
        }),
    };

    assert_eq!(
        got,
        expected,
        "\n\nFixture: {name}\n\nGot:\n{}\n\nExpected:\n{}\n",
        serde_json::to_string_pretty(&got).unwrap(),
        serde_json::to_string_pretty(&expected).unwrap(),
    );
}

#[test]
fn golden_single_field() {
    run_fixture("golden_single_field");
}

#[test]
fn golden_capped_mint_metadata() {
    run_fixture("golden_capped_mint_metadata");
}

#[test]
fn golden_paused_burnable() {
    run_fixture("golden_paused_burnable");
}

#[test]
fn adversarial_mint_zero_cap() {
    run_fixture("adversarial_mint_zero_cap");
}

#[test]
fn adversarial_trait_not_derived() {
    run_fixture("adversarial_trait_not_derived");
}

#[test]
fn adversarial_duplicate_field() {
    run_fixture("adversarial_duplicate_field");
}

#[test]
fn adversarial_bytes_too_wide() {
    run_fixture("adversarial_bytes_too_wide");
}

#[test]
fn adversarial_private_module() {
    run_fixture("adversarial_private_module");
}

#[test]
fn closure_holds_for_every_used_feature() {
    let tree = SpecificationTree::from_toml_str(
        r#"
derive = ["pause", "receiver"]

[[include]]
module = "enumerable"

[[include]]
module = "mint"
params = [10]

[[field]]
name = "x"
type = "int"
"#,
    )
    .expect("tree should parse");
    let compilation = compile(tree).expect("compile");
    for set in [&compilation.registry.traits, &compilation.registry.modules] {
        for node in set.used() {
            for dep in node.dependencies {
                assert!(
                    set.is_used(dep),
                    "{} is used but its dependency {dep} is not",
                    node.id
                );
            }
        }
    }
    assert!(!compilation.registry.modules.is_used("burn"));
    assert!(!compilation.registry.modules.is_used("royalty"));
}
