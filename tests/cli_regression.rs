// Regression tests for the yovec binary: output formats and miette error rendering.
// Requires: assert_cmd, predicates crates in [dev-dependencies]

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};
use yovec::ast::builder::*;
use yovec::ast::Node;

fn write_program(name: &str, program: &Node) -> PathBuf {
    let path = std::env::temp_dir().join(format!("yovec-{}-{}.json", name, std::process::id()));
    fs::write(&path, serde_json::to_string(program).unwrap()).unwrap();
    path
}

fn scenario() -> Node {
    program(vec![
        import("A"),
        let_("v", vector(vec![variable("A"), number("2"), number("3")])),
        let_("s", dot(variable("v"), variable("v"))),
        export("s", "OUT"),
    ])
}

fn yovec_cmd() -> Command {
    let mut cmd = Command::cargo_bin("yovec").unwrap();
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

#[test]
fn compile_prints_mangled_listing() {
    let file = write_program("listing", &scenario());
    yovec_cmd()
        .args(["compile", "--format", "listing"])
        .arg(&file)
        .assert()
        .success()
        .stdout("a=A b=2 c=3\nOUT=((a*a)+(b*b))+(c*c)\n");
    let _ = fs::remove_file(file);
}

#[test]
fn compile_without_mangling_keeps_registers() {
    let file = write_program("nomangle", &scenario());
    yovec_cmd()
        .args(["compile", "--no-mangle", "--format", "listing"])
        .arg(&file)
        .assert()
        .success()
        .stdout(contains("v0e0=A v0e1=2 v0e2=3"));
    let _ = fs::remove_file(file);
}

#[test]
fn compile_reads_yaml_config() {
    let file = write_program("config", &scenario());
    let config = std::env::temp_dir().join(format!("yovec-config-{}.yaml", std::process::id()));
    fs::write(&config, "mangle: false\n").unwrap();
    yovec_cmd()
        .args(["compile", "--format", "listing", "--config"])
        .arg(&config)
        .arg(&file)
        .assert()
        .success()
        .stdout(contains("OUT=((v0e0*v0e0)"));
    let _ = fs::remove_file(file);
    let _ = fs::remove_file(config);
}

#[test]
fn json_output_round_trips_as_node_tree() {
    let file = write_program("json", &scenario());
    let output = yovec_cmd().arg("compile").arg(&file).output().unwrap();
    assert!(output.status.success());
    let tree: Node = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(tree.kind, "program");
    assert_eq!(tree.children().len(), 2);
    let _ = fs::remove_file(file);
}

#[test]
fn cli_reports_miette_diagnostics_on_error() {
    let file = write_program("error", &program(vec![let_("x", variable("y"))]));
    yovec_cmd()
        .arg("check")
        .arg(&file)
        .assert()
        .failure()
        .stderr(contains("yovec::env::undefined_variable").or(contains("help:")));
    let _ = fs::remove_file(file);
}

#[test]
fn check_reports_success() {
    let file = write_program("check", &scenario());
    yovec_cmd()
        .arg("check")
        .arg(&file)
        .assert()
        .success()
        .stderr(contains("ok"));
    let _ = fs::remove_file(file);
}
