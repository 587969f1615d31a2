// Runs the bundled demo suite through the testique CLI.
// Usage: cargo run -- [-k PATTERN] [--format text|json] [--no-color] [--list]

mod demo;

use std::process::ExitCode;

fn main() -> miette::Result<ExitCode> {
    testique::cli::run(demo::namespace())
}
