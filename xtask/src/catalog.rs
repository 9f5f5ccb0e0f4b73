//! `xtask catalog`: one row per Click driver found under the driver sources.

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Handle-opening calls and the bus each one implies.
const BUSES: &[(&str, &str)] = &[
    ("open_i2c", "I2C"),
    ("open_spi", "SPI"),
    ("open_uart", "UART"),
    ("open_analog", "ADC"),
    ("open_pwm", "PWM"),
    ("open_output", "GPIO"),
    ("open_input", "GPIO"),
];

#[derive(Debug, PartialEq, Eq)]
struct Entry {
    group: String,
    board: String,
    buses: Vec<&'static str>,
    default_cfg: bool,
    tests: usize,
}

pub fn run(src: &Path) -> Result<()> {
    let entries = scan(src)?;
    if entries.is_empty() {
        anyhow::bail!("No drivers found under {}", src.display());
    }

    println!();
    println!(
        "{}",
        format!("{:<16} {:<14} {:<18} {:<12} {}", "GROUP", "BOARD", "BUSES", "DEFAULT_CFG", "TESTS")
            .bold()
    );
    for entry in &entries {
        let tests = if entry.tests == 0 {
            "0".red().to_string()
        } else {
            entry.tests.to_string()
        };
        println!(
            "{:<16} {:<14} {:<18} {:<12} {}",
            entry.group,
            entry.board.cyan(),
            entry.buses.join("+"),
            if entry.default_cfg { "yes" } else { "-" },
            tests
        );
    }

    let tests: usize = entries.iter().map(|entry| entry.tests).sum();
    println!();
    println!(
        "{}",
        format!("✓ {} drivers, {} unit tests", entries.len(), tests).green().bold()
    );
    println!();
    Ok(())
}

/// Every `.rs` file under `src` that implements `ClickConfig`.
fn scan(src: &Path) -> Result<Vec<Entry>> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(src).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().and_then(|e| e.to_str()) != Some("rs") {
            continue;
        }
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        // config.rs declares the trait itself
        if !source.contains("impl ClickConfig for") {
            continue;
        }
        entries.push(describe(path, &source));
    }
    entries.sort_by(|a, b| (&a.group, &a.board).cmp(&(&b.group, &b.board)));
    Ok(entries)
}

fn describe(path: &Path, source: &str) -> Entry {
    let name = |p: Option<&Path>| {
        p.and_then(|p| p.file_stem())
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    };
    let mut buses: Vec<&'static str> = Vec::new();
    for &(call, bus) in BUSES {
        if source.contains(call) && !buses.contains(&bus) {
            buses.push(bus);
        }
    }
    Entry {
        group: name(path.parent()),
        board: name(Some(path)),
        buses,
        default_cfg: source.contains("pub fn default_cfg"),
        tests: source.matches("#[test]").count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RELAY: &str = r"
impl ClickConfig for RelayConfig {}
impl<O: OutputPin> Relay<O> {
    pub fn init() { board.open_output(a); board.open_output(b); }
}
#[test]
fn one() {}
#[test]
fn two() {}
";

    const GNSS: &str = r"
impl ClickConfig for GnssConfig {}
fn init() { open_uart(); open_i2c(); open_spi(); }
pub fn default_cfg() {}
";

    #[test]
    fn scans_driver_tree() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("actuator")).unwrap();
        fs::create_dir_all(dir.path().join("location")).unwrap();
        fs::write(dir.path().join("actuator/relay.rs"), RELAY).unwrap();
        fs::write(dir.path().join("actuator/mod.rs"), "pub mod relay;").unwrap();
        fs::write(dir.path().join("location/gnss.rs"), GNSS).unwrap();
        fs::write(dir.path().join("config.rs"), "pub trait ClickConfig {}").unwrap();

        let entries = scan(dir.path()).unwrap();
        assert_eq!(
            entries,
            vec![
                Entry {
                    group: "actuator".into(),
                    board: "relay".into(),
                    buses: vec!["GPIO"],
                    default_cfg: false,
                    tests: 2,
                },
                Entry {
                    group: "location".into(),
                    board: "gnss".into(),
                    buses: vec!["I2C", "SPI", "UART"],
                    default_cfg: true,
                    tests: 0,
                },
            ]
        );
    }

    #[test]
    fn empty_tree_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(run(dir.path()).is_err());
    }
}
