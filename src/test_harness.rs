//! yovec Test Harness Library Module
//!
//! Provides reusable test discovery, execution, and reporting for YAML-based
//! lowering suites. Each case carries a syntax tree in the parser's JSON shape
//! (written as YAML), runs it through [`compile`](crate::compile), and compares
//! the listing of the output program or the error kind.
//!
//! # Test Format
//!
//! ```yaml
//! - name: "dot product"
//!   mangle: false                    # optional, defaults to false
//!   program: { kind: program, children: [ ... ] }
//!   expected:                        # for success tests, one entry per line
//!     - "v0e=((1*4)+(2*5))+(3*6)"
//!   expect_error: "empty_reduce"     # for error tests, an ErrorKind code
//!   skip: false                      # optional, defaults to false
//!   only: false                      # optional, defaults to false
//! ```
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use yovec::test_harness::{run_all_tests, TestConfig};
//!
//! let config = TestConfig::default();
//! let (passed, failed, skipped) = run_all_tests(None, &config);
//! if failed > 0 {
//!     std::process::exit(1);
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use difference::{Changeset, Difference};
use serde::Deserialize;
use walkdir::WalkDir;

use crate::ast::output::listing;
use crate::ast::Node;
use crate::config::Options;
use crate::diagnostics::ErrorKind;
use crate::transpile::env::AliasPolicy;

// =============================================================================
// CORE TYPES
// =============================================================================

/// Represents the result of executing a single test case.
#[derive(Debug, Clone, PartialEq)]
pub enum TestResult {
    Pass {
        file: String,
        name: String,
    },
    Fail {
        file: String,
        name: String,
        error: String,
        diff: Option<Diff>,
    },
    Skipped {
        file: String,
        name: String,
        reason: String,
    },
}

/// A single YAML lowering case.
#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct TestCase {
    pub name: String,
    pub program: Node,
    #[serde(default)]
    pub mangle: bool,
    #[serde(default)]
    pub unchecked_aliases: bool,
    pub expected: Option<Vec<String>>,
    pub expect_error: Option<String>,
    #[serde(default)]
    pub skip: bool,
    #[serde(default)]
    pub only: bool,
}

impl TestCase {
    fn options(&self) -> Options {
        Options {
            mangle: self.mangle,
            alias_policy: if self.unchecked_aliases {
                AliasPolicy::Unchecked
            } else {
                AliasPolicy::ExportStyle
            },
        }
    }
}

/// Configuration for test execution and reporting.
pub struct TestConfig {
    pub test_root: String,
    pub use_colors: bool,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            test_root: "tests/suites".to_string(),
            use_colors: atty::is(atty::Stream::Stderr),
        }
    }
}

const RESET: &str = "\x1b[0m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";

impl TestConfig {
    /// Apply color formatting to text if colors are enabled.
    pub fn colorize(&self, text: &str, color: &str) -> String {
        if self.use_colors {
            format!("{}{}{}", color, text, RESET)
        } else {
            text.to_string()
        }
    }
}

// =============================================================================
// TEST DISCOVERY AND LOADING
// =============================================================================

/// Discovers all YAML files recursively under the given root directory, sorted.
pub fn discover_yaml_files<P: AsRef<Path>>(root: P) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_type().is_file()
                && e.path()
                    .extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
        })
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();
    files
}

/// Load and parse test cases from a YAML file.
pub fn load_test_cases(path: &Path) -> Result<Vec<TestCase>, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    serde_yaml::from_str::<Vec<TestCase>>(&content)
        .map_err(|e| format!("Failed to parse YAML in {}: {}", path.display(), e))
}

/// Helper for test skipping logic.
pub fn skip_reason(case: &TestCase, has_only: bool, filter: Option<&str>) -> Option<String> {
    if has_only && !case.only {
        return Some("Not marked 'only' in 'only' mode".to_string());
    }
    if case.skip {
        return Some("Marked 'skip'".to_string());
    }
    if let Some(f) = filter {
        if !case.name.to_lowercase().contains(f) {
            return Some(format!("Filtered out by substring: {}", f));
        }
    }
    None
}

// =============================================================================
// TEST EXECUTION
// =============================================================================

/// Compiles one case and checks its outcome.
pub fn run_test_case(file: String, case: TestCase) -> TestResult {
    match check_case(&case) {
        Ok(()) => TestResult::Pass {
            file,
            name: case.name,
        },
        Err((error, diff)) => TestResult::Fail {
            file,
            name: case.name,
            error,
            diff,
        },
    }
}

/// Expected and actual listings of a failed case.
pub type Diff = (Vec<String>, Vec<String>);

fn check_case(case: &TestCase) -> Result<(), (String, Option<Diff>)> {
    if let Some(code) = case.expect_error.as_deref() {
        if ErrorKind::from_code(code).is_none() {
            return Err((format!("Unknown error kind '{}' in fixture", code), None));
        }
    }

    match (crate::compile(&case.program, &case.options()), case.expect_error.as_deref()) {
        (Ok(compiled), None) => {
            let actual = listing(&compiled.program);
            let expected = case.expected.clone().unwrap_or_default();
            if actual == expected {
                Ok(())
            } else {
                Err((
                    "Output did not match expected".to_string(),
                    Some((expected, actual)),
                ))
            }
        }
        (Ok(compiled), Some(code)) => Err((
            format!(
                "Expected error '{}' but compilation succeeded with {} lines",
                code,
                compiled.program.children().len()
            ),
            None,
        )),
        (Err(e), Some(code)) if e.kind().code_suffix() == code => Ok(()),
        (Err(e), _) => Err((format!("{} [{}]", e, e.code()), None)),
    }
}

// =============================================================================
// REPORTING AND OUTPUT
// =============================================================================

/// Partition test results by outcome type.
pub fn partition_results(results: &[TestResult]) -> (usize, usize, usize) {
    results
        .iter()
        .fold((0, 0, 0), |(p, f, s), r| match r {
            TestResult::Pass { .. } => (p + 1, f, s),
            TestResult::Fail { .. } => (p, f + 1, s),
            TestResult::Skipped { .. } => (p, f, s + 1),
        })
}

/// Print test results with colored output.
pub fn report_results(results: &[TestResult], config: &TestConfig) {
    for r in results {
        match r {
            TestResult::Pass { file, name } => {
                println!("{}: {} [{}]", config.colorize("PASS", GREEN), name, file)
            }
            TestResult::Fail { .. } => print_failure(r, config),
            TestResult::Skipped { file, name, reason } => println!(
                "{}: {} [{}] ({})",
                config.colorize("SKIP", YELLOW),
                name,
                file,
                reason
            ),
        }
    }

    let (passed, failed, skipped) = partition_results(results);
    println!(
        "\nTest summary: total {}, {} {}, {} {}, {} {}",
        results.len(),
        config.colorize("passed", GREEN),
        passed,
        config.colorize("failed", RED),
        failed,
        config.colorize("skipped", YELLOW),
        skipped,
    );
}

/// Print detailed failure information.
pub fn print_failure(r: &TestResult, config: &TestConfig) {
    if let TestResult::Fail {
        file,
        name,
        error,
        diff,
    } = r
    {
        eprintln!("{}: {} [{}]", config.colorize("FAIL", RED), name, file);
        eprintln!("  Error: {}", error);
        if let Some((expected, actual)) = diff {
            eprintln!("  Diff:");
            print_diff(&expected.join("\n"), &actual.join("\n"), config);
        }
    }
}

/// Print line-by-line diff.
pub fn print_diff(expected: &str, actual: &str, config: &TestConfig) {
    let changeset = Changeset::new(expected, actual, "\n");
    for diff in &changeset.diffs {
        match diff {
            Difference::Same(text) => {
                for line in text.lines() {
                    eprintln!("    {}", line);
                }
            }
            Difference::Rem(text) => {
                for line in text.lines() {
                    eprintln!("  - expected: {}", config.colorize(line, GREEN));
                }
            }
            Difference::Add(text) => {
                for line in text.lines() {
                    eprintln!("  + actual:   {}", config.colorize(line, RED));
                }
            }
        }
    }
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Run all tests with optional filtering and return summary counts.
pub fn run_all_tests(filter: Option<&str>, config: &TestConfig) -> (usize, usize, usize) {
    let results = collect_results(filter, config);
    report_results(&results, config);
    partition_results(&results)
}

/// Runs every discovered case without printing.
pub fn collect_results(filter: Option<&str>, config: &TestConfig) -> Vec<TestResult> {
    let mut all_cases = Vec::new();
    let mut results = Vec::new();

    for file_path in discover_yaml_files(&config.test_root) {
        let file_name = file_path.display().to_string();
        match load_test_cases(&file_path) {
            Ok(cases) => all_cases.extend(cases.into_iter().map(|c| (file_name.clone(), c))),
            Err(error) => results.push(TestResult::Fail {
                file: file_name.clone(),
                name: "<load>".to_string(),
                error,
                diff: None,
            }),
        }
    }

    let has_only = all_cases.iter().any(|(_, c)| c.only);
    results.extend(all_cases.into_iter().map(|(file, case)| {
        match skip_reason(&case, has_only, filter) {
            Some(reason) => TestResult::Skipped {
                file,
                name: case.name,
                reason,
            },
            None => run_test_case(file, case),
        }
    }));
    results
}

/// Summary counts.
pub struct TestResults {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Run tests with command line arguments; the first argument filters by name.
pub fn run_tests_with_args(args: &[String]) -> TestResults {
    let filter = args.first().map(|a| a.to_lowercase());
    let config = TestConfig::default();
    let (passed, failed, skipped) = run_all_tests(filter.as_deref(), &config);
    TestResults {
        passed,
        failed,
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builder::*;

    fn case(program: Node) -> TestCase {
        TestCase {
            name: "case".to_string(),
            program,
            mangle: false,
            unchecked_aliases: false,
            expected: None,
            expect_error: None,
            skip: false,
            only: false,
        }
    }

    #[test]
    fn test_expected_listing_passes() {
        let mut c = case(program(vec![let_("x", number("1"))]));
        c.expected = Some(vec!["v0e=1".to_string()]);
        assert!(matches!(
            run_test_case("f".into(), c),
            TestResult::Pass { .. }
        ));
    }

    #[test]
    fn test_expected_error_kind_passes() {
        let mut c = case(program(vec![let_("x", variable("nope"))]));
        c.expect_error = Some("undefined_variable".to_string());
        assert!(matches!(
            run_test_case("f".into(), c),
            TestResult::Pass { .. }
        ));
    }

    #[test]
    fn test_listing_mismatch_carries_diff() {
        let mut c = case(program(vec![let_("x", number("1"))]));
        c.expected = Some(vec!["v0e=2".to_string()]);
        match run_test_case("f".into(), c) {
            TestResult::Fail { diff: Some((e, a)), .. } => {
                assert_eq!(e, vec!["v0e=2"]);
                assert_eq!(a, vec!["v0e=1"]);
            }
            other => panic!("expected failure with diff, got {:?}", other),
        }
    }

    #[test]
    fn test_skip_reason_filters() {
        let c = case(program(vec![]));
        assert!(skip_reason(&c, true, None).is_some());
        assert!(skip_reason(&c, false, Some("other")).is_some());
        assert!(skip_reason(&c, false, Some("cas")).is_none());
    }
}
