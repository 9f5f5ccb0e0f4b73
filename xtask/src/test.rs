use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;
use std::time::Instant;

pub fn run(unit_only: bool, integration_only: bool) -> Result<()> {
    println!();
    println!("{}", "🧪 Running tests...".cyan().bold());
    println!();

    let total_start = Instant::now();

    if !integration_only {
        suite("unit tests", &["test", "--lib", "--bins", "--workspace"], true)?;
    }

    // crates/clicks/tests: cfg-setup contract, scanner and converter properties
    if !unit_only {
        suite("integration tests", &["test", "--workspace", "--test", "*"], true)?;
    }

    // Doc examples on the scanners; failures are reported, not fatal.
    suite("doc tests", &["test", "--doc", "--workspace"], false)?;

    println!(
        "{}",
        format!("✓ All tests completed in {:.2}s", total_start.elapsed().as_secs_f64())
            .green()
            .bold()
    );
    println!();

    Ok(())
}

fn suite(label: &str, args: &[&str], required: bool) -> Result<()> {
    println!("{}", format!("  Running {label}...").cyan());
    let start = Instant::now();

    let output = Command::new("cargo")
        .args(args)
        .output()
        .with_context(|| format!("Failed to run {label}"))?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    if output.status.success() {
        let summary = Summary::parse(&stdout);
        println!(
            "{}",
            format!(
                "  ✓ {label} passed ({}) in {:.2}s",
                summary,
                start.elapsed().as_secs_f64()
            )
            .green()
        );
    } else if required {
        eprintln!("{}", format!("  ✗ {label} failed").red().bold());
        eprintln!();
        for line in stdout.lines() {
            eprintln!("  {line}");
        }
        eprintln!("{}", String::from_utf8_lossy(&output.stderr));
        anyhow::bail!("{label} failed");
    } else {
        eprintln!("{}", format!("  ⚠ {label} failed").yellow().bold());
    }
    println!();
    Ok(())
}

/// Totals over every `test result:` line of a workspace run.
#[derive(Debug, Default, PartialEq, Eq)]
struct Summary {
    passed: u32,
    failed: u32,
    ignored: u32,
    suites: u32,
}

impl Summary {
    fn parse(output: &str) -> Self {
        let mut summary = Self::default();
        // "test result: ok. 5 passed; 0 failed; 0 ignored; 0 measured; 0 filtered out; ..."
        for line in output.lines() {
            let Some(result) = line.split("test result:").nth(1) else {
                continue;
            };
            summary.suites += 1;
            for field in result.split(';') {
                let mut words = field.split_whitespace().rev();
                let (Some(kind), Some(count)) = (words.next(), words.next()) else {
                    continue;
                };
                let Ok(count) = count.parse::<u32>() else {
                    continue;
                };
                match kind {
                    "passed" => summary.passed += count,
                    "failed" => summary.failed += count,
                    "ignored" => summary.ignored += count,
                    _ => {}
                }
            }
        }
        summary
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.suites == 0 {
            return write!(f, "summary not available");
        }
        write!(
            f,
            "{} passed, {} failed, {} ignored across {} suites",
            self.passed, self.failed, self.ignored, self.suites
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums_every_suite() {
        let output = "\
running 3 tests
test result: ok. 3 passed; 0 failed; 1 ignored; 0 measured; 0 filtered out; finished in 0.01s

running 12 tests
test result: ok. 12 passed; 0 failed; 0 ignored; 0 measured; 0 filtered out; finished in 0.20s
";
        assert_eq!(
            Summary::parse(output),
            Summary {
                passed: 15,
                failed: 0,
                ignored: 1,
                suites: 2
            }
        );
    }

    #[test]
    fn no_result_lines() {
        let summary = Summary::parse("error: could not compile `clicks`");
        assert_eq!(summary, Summary::default());
        assert_eq!(summary.to_string(), "summary not available");
    }
}
