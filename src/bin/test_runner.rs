// Runs the YAML lowering suites under tests/suites.
// Usage: cargo run --bin test_runner [name-filter]

use std::env;
use yovec::test_harness;

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let results = test_harness::run_tests_with_args(&args);
    if results.failed > 0 {
        std::process::exit(1);
    }
}
