use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::process::Command;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "corelocal workspace automation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the core-local benchmarks with and without tracing enabled
    Bench {
        /// Run quickly (lower sample size/time)
        #[arg(long, default_value_t = false)]
        quick: bool,

        /// Generate report only (skip running benchmarks)
        #[arg(long, default_value_t = false)]
        report_only: bool,
    },
}

const BENCH: &str = "core_local_benchmark";

/// (baseline name, cargo features)
const FEATURE_SETS: &[(&str, &str)] = &[("plain", ""), ("tracing", "tracing")];

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Bench { quick, report_only } => {
            if !report_only {
                run_benchmarks(quick)?;
            }
            generate_report()?;
        }
    }

    Ok(())
}

fn run_benchmarks(quick: bool) -> Result<()> {
    println!("Compiling benchmarks...");
    let status = Command::new("cargo")
        .args(["build", "--bench", BENCH, "--release"])
        .status()?;
    if !status.success() {
        anyhow::bail!("Failed to compile benchmarks");
    }

    for (baseline, features) in FEATURE_SETS {
        println!("\n>>> Benchmarking baseline: {}", baseline);
        let start = Instant::now();

        let mut cmd = Command::new("cargo");
        cmd.arg("bench").arg("--bench").arg(BENCH);
        if !features.is_empty() {
            cmd.arg("--features").arg(features);
        }

        // Args for the test runner (Criterion) go after --
        cmd.arg("--");
        cmd.arg("--save-baseline").arg(baseline);

        if quick {
            cmd.arg("--measurement-time").arg("0.1");
            cmd.arg("--noplot");
            cmd.arg("--sample-size").arg("10");
        }

        let status = cmd
            .status()
            .with_context(|| format!("Failed to run bench for {}", baseline))?;

        if !status.success() {
            eprintln!("Warning: Benchmark failed for {}", baseline);
        } else {
            println!("Finished {} in {:.2?}", baseline, start.elapsed());
        }
    }

    Ok(())
}

fn generate_report() -> Result<()> {
    println!("\n>>> Generating Report...");
    let mut results: HashMap<String, HashMap<String, f64>> = HashMap::new();

    let criterion_dir = Path::new("target/criterion");
    if !criterion_dir.exists() {
        eprintln!("No criterion output found at {}", criterion_dir.display());
        return Ok(());
    }

    collect_results(criterion_dir, &mut results);

    let report_path = Path::new("benchmark_results/report.md");
    if let Some(parent) = report_path.parent() {
        fs::create_dir_all(parent)?;
    }

    use std::io::Write;
    let mut file = fs::File::create(report_path)?;

    writeln!(file, "# Core-Local Benchmark Report")?;
    writeln!(file)?;

    let mut workloads: Vec<_> = results.keys().collect();
    workloads.sort();

    write!(file, "| Workload |")?;
    for (baseline, _) in FEATURE_SETS {
        write!(file, " {} (Ops/s) | vs plain |", baseline)?;
    }
    writeln!(file, " vs shared atomic |")?;

    write!(file, "|---|")?;
    for _ in FEATURE_SETS {
        write!(file, "---|---|")?;
    }
    writeln!(file, "---|")?;

    let shared_ops = results
        .get("contended_increment/shared_atomic")
        .and_then(|m| m.get("plain"))
        .copied()
        .unwrap_or(0.0);

    for workload in workloads {
        write!(file, "| {} |", workload)?;

        let plain_ops = results
            .get(workload)
            .and_then(|m| m.get("plain"))
            .copied()
            .unwrap_or(0.0);

        for (baseline, _) in FEATURE_SETS {
            if let Some(ops) = results.get(workload).and_then(|m| m.get(*baseline)) {
                let rel = if plain_ops > 0.0 { ops / plain_ops } else { 0.0 };
                write!(file, " {} | **{:.2}x** |", format_ops(*ops), rel)?;
            } else {
                write!(file, " N/A | - |")?;
            }
        }

        if workload.starts_with("contended_increment/") && shared_ops > 0.0 {
            writeln!(file, " {:.2}x |", plain_ops / shared_ops)?;
        } else {
            writeln!(file, " - |")?;
        }
    }

    println!("Report written to {}", report_path.display());
    Ok(())
}

fn format_ops(ops: f64) -> String {
    if ops > 1_000_000.0 {
        format!("{:.2}M", ops / 1_000_000.0)
    } else if ops > 1_000.0 {
        format!("{:.2}K", ops / 1_000.0)
    } else {
        format!("{:.0}", ops)
    }
}

fn dir_name(path: &Path) -> Option<String> {
    path.file_name()?.to_str().map(str::to_string)
}

fn read_json(path: &Path) -> Option<serde_json::Value> {
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

fn collect_results(dir: &Path, results: &mut HashMap<String, HashMap<String, f64>>) {
    let entries = match fs::read_dir(dir) {
        Ok(e) => e,
        Err(_) => return,
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_results(&path, results);
            continue;
        }
        if path.file_name().and_then(|s| s.to_str()) != Some("estimates.json") {
            continue;
        }

        // Structure: .../group/function/baseline/estimates.json
        let Some(baseline_dir) = path.parent() else { continue };
        let Some(function_dir) = baseline_dir.parent() else { continue };
        let Some(group_dir) = function_dir.parent() else { continue };
        let (Some(baseline), Some(function), Some(group)) =
            (dir_name(baseline_dir), dir_name(function_dir), dir_name(group_dir))
        else {
            continue;
        };

        if !FEATURE_SETS.iter().any(|(name, _)| *name == baseline) || function == "report" {
            continue;
        }

        // Throughput lives next to the estimates.
        let elements = read_json(&baseline_dir.join("benchmark.json"))
            .and_then(|json| json.get("throughput")?.get("Elements")?.as_f64());

        let Some(time_ns) = read_json(&path)
            .and_then(|json| json.get("mean")?.get("point_estimate")?.as_f64())
        else {
            continue;
        };
        if time_ns <= 0.0 {
            continue;
        }

        let metric = elements.unwrap_or(1.0) * 1e9 / time_ns;
        results
            .entry(format!("{group}/{function}"))
            .or_default()
            .insert(baseline, metric);
    }
}
