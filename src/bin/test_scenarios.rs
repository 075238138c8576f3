//! Scenario test runner CLI
//!
//! Plays every scenario under `tests/scenarios/` through a recorder and prints
//! what each grid ended up holding.
//!
//! Usage:
//!   cargo run --bin test-scenarios                   # Run all scenarios
//!   cargo run --bin test-scenarios -- recording/     # Run category
//!   cargo run --bin test-scenarios -- grid/far_edge  # Run single scenario
//!   cargo run --bin test-scenarios -- --verbose      # Grid summary on failure too

use std::path::Path;

use heatgrid::Channel;
use heatgrid::scenario::{
    SCENARIOS_DIR, ScenarioResult, ScenarioSummary, discover_scenarios, run_scenario_file,
};

#[derive(Default)]
struct Tally {
    passed: u32,
    failed: u32,
    errors: u32,
    samples: u32,
}

/// `12 samples, 4x3 grid | position max 5 (6 tiles) | shooting max 2 (1 tile) | ...`
fn describe(summary: &ScenarioSummary) -> String {
    let mut line = format!(
        "{} samples, {}x{} grid",
        summary.samples, summary.width, summary.height
    );
    for channel in Channel::ALL {
        let visited = summary.visited(channel);
        if visited == 0 {
            continue;
        }
        line.push_str(&format!(
            " | {} max {} ({} tile{})",
            channel.label(),
            summary.max(channel),
            visited,
            if visited == 1 { "" } else { "s" }
        ));
    }
    line
}

fn report(name: &str, result: &ScenarioResult, verbose: bool) {
    let width = 32usize.saturating_sub(name.len()).max(2);
    let pad = ".".repeat(width);
    match result {
        ScenarioResult::Pass { summary } => {
            println!("  {} {} ok   {}", name, pad, describe(summary));
        }
        ScenarioResult::Fail { error, summary } => {
            match error.tile {
                Some((x, y)) => println!("  {} {} FAIL at tile ({}, {})", name, pad, x, y),
                None => println!("  {} {} FAIL", name, pad),
            }
            println!("      {}", error.message);
            println!("      expected {}, got {}", error.expected, error.actual);
            if verbose {
                println!("      grid: {}", describe(summary));
            }
        }
        ScenarioResult::Error { message } => {
            println!("  {} {} ERROR", name, pad);
            println!("      {}", message);
        }
    }
}

fn main() {
    let mut verbose = false;
    let mut filter = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--verbose" | "-v" => verbose = true,
            other if !other.starts_with('-') => filter = Some(other.to_string()),
            _ => {}
        }
    }

    let base = Path::new(SCENARIOS_DIR);
    let scenarios = discover_scenarios(base, filter.as_deref());
    if scenarios.is_empty() {
        match &filter {
            Some(f) => eprintln!("No scenarios under {} match '{}'", SCENARIOS_DIR, f),
            None => eprintln!("No scenarios under {}", SCENARIOS_DIR),
        }
        std::process::exit(1);
    }

    println!("Heatmap scenarios ({})", scenarios.len());
    let mut tally = Tally::default();
    let mut category = None;

    for path in &scenarios {
        let rel = path.strip_prefix(base).unwrap_or(path);
        let dir = rel.parent().map(|p| p.display().to_string());
        if dir != category {
            if let Some(d) = dir.as_deref().filter(|d| !d.is_empty()) {
                println!("\n{}/", d);
            }
            category = dir;
        }

        let name = rel
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let result = run_scenario_file(path);
        match &result {
            ScenarioResult::Pass { summary } => {
                tally.passed += 1;
                tally.samples += summary.samples;
            }
            ScenarioResult::Fail { .. } => tally.failed += 1,
            ScenarioResult::Error { .. } => tally.errors += 1,
        }
        report(&name, &result, verbose);
    }

    println!(
        "\n{} passed ({} samples recorded), {} failed, {} errors",
        tally.passed, tally.samples, tally.failed, tally.errors
    );
    if tally.failed > 0 || tally.errors > 0 {
        std::process::exit(1);
    }
}
