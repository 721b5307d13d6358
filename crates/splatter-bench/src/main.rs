use std::path::PathBuf;
use std::process;

use splatter_bench::report;
use splatter_bench::runner::BenchmarkRunner;
use splatter_bench::scenes;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    let mut baseline_path: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;
    let mut regression_threshold = 10.0f64;
    let mut tick_count = 300u32;

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        let value = args.get(i + 1);
        match (flag, value) {
            ("--baseline", Some(v)) => baseline_path = Some(PathBuf::from(v)),
            ("--output", Some(v)) => output_path = Some(PathBuf::from(v)),
            ("--regression-threshold", Some(v)) => {
                regression_threshold = v.parse().unwrap_or_else(|_| {
                    eprintln!("invalid --regression-threshold value: {}", v);
                    process::exit(1);
                });
            }
            ("--ticks", Some(v)) => {
                tick_count = v.parse().unwrap_or_else(|_| {
                    eprintln!("invalid --ticks value: {}", v);
                    process::exit(1);
                });
            }
            ("--help" | "-h", _) => {
                eprintln!("Usage: bench-runner [OPTIONS]");
                eprintln!("  --baseline <path>              Load baseline JSON for comparison");
                eprintln!("  --output <path>                Save current results as JSON baseline");
                eprintln!(
                    "  --regression-threshold <pct>   Regression threshold percentage (default: 10)"
                );
                eprintln!("  --ticks <n>                    Ticks per scene (default: 300)");
                process::exit(0);
            }
            (other, _) => {
                eprintln!("Unknown or incomplete argument: {}", other);
                process::exit(1);
            }
        }
        i += 2;
    }

    let runner = BenchmarkRunner::new(tick_count);
    let results: Vec<_> = scenes::standard_scenes()
        .iter()
        .map(|scene| runner.run_scene(scene))
        .collect();

    println!("\n## Decal Sync Benchmark\n");
    println!("{}", report::format_markdown(&results));

    if let Some(ref path) = output_path {
        let baseline = report::Baseline {
            timestamp: format!("bench-{}", process::id()),
            results: results.clone(),
        };
        match report::save_baseline(path, &baseline) {
            Ok(()) => log::info!("Saved baseline to {}", path.display()),
            Err(e) => log::error!("Failed to save baseline to {}: {e}", path.display()),
        }
    }

    if let Some(ref path) = baseline_path {
        if let Some(baseline) = report::load_baseline(path) {
            let regressions = report::compare(&results, &baseline, regression_threshold);
            println!(
                "{}",
                report::format_comparison(&regressions, regression_threshold)
            );
            if !regressions.is_empty() {
                eprintln!(
                    "ERROR: {} regressions detected, exiting with code 1",
                    regressions.len()
                );
                process::exit(1);
            }
        } else {
            log::warn!("Baseline file not found: {}", path.display());
        }
    }

    log::info!("Benchmark complete.");
}
