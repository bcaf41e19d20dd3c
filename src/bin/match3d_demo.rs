use std::env;
use std::path::{Path, PathBuf};
use track_match3d::config::load_config;
use track_match3d::diagnostics::{SeedRecord, VolumeReport};
use track_match3d::io::{load_volume, write_json_file};
use track_match3d::MatchEngine;

fn usage(program: &str) -> String {
    format!("Usage: {program} <config.json>")
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let mut args = env::args();
    let program = args.next().unwrap_or_else(|| "match3d_demo".to_string());
    let config_path = args.next().map(PathBuf::from).ok_or_else(|| usage(&program))?;
    if args.next().is_some() {
        return Err(usage(&program));
    }

    let config = load_config(&config_path)?;
    let mut ctx = load_volume(&config.input_path)?;

    let engine = MatchEngine::new(config.ops.clone())
        .with_params(config.match_params.clone())
        .with_projection(config.projection.clone());
    let report = engine.process_volume(&mut ctx, &config.geometry);

    print_text_summary(&report);

    if let Some(path) = &config.output.report_json {
        write_json_file(path, &report)?;
        println!("\nReport written to {}", path.display());
    }
    if let Some(path) = &config.output.pfos_json {
        write_json_file(path, &ctx.pfos)?;
        println!("PFOs written to {}", path.display());
    }
    print_pfos(&ctx.pfos, &config.input_path);
    Ok(())
}

fn print_text_summary(report: &VolumeReport) {
    println!("Volume {:?}", report.volume);
    println!("  drift_distance: {:.1}", report.drift_distance);
    if let Some(skip) = report.skipped {
        println!("  skipped: {skip:?}");
    }
    if let Some(stage) = &report.projection {
        println!(
            "Projection: trajectories={} charged_points={} entries={} missing_wire={} flags_reset={} elapsed_ms={:.3}",
            stage.trajectories,
            stage.charged_points,
            stage.entries,
            stage.skipped_missing_wire,
            stage.match_flags_reset,
            stage.elapsed_ms
        );
    }
    match &report.matching {
        Some(m) => {
            println!(
                "Matching: eligible={} processed={} pfos={} cap_reached={} elapsed_ms={:.3}",
                m.eligible, m.seeds_processed, m.pfos_created, m.seed_cap_reached, m.elapsed_ms
            );
            for seed in &m.seeds {
                println!("  {}", describe_seed(seed));
            }
        }
        None => println!("Matching: not run"),
    }
    let stages: Vec<String> = report
        .timings
        .stages
        .iter()
        .map(|s| format!("{}={:.3}", s.label, s.elapsed_ms))
        .collect();
    println!(
        "Timings (ms): {} total={:.3}",
        stages.join(" "),
        report.timings.total_ms
    );
}

fn describe_seed(seed: &SeedRecord) -> String {
    let outcome = match (seed.pfo, seed.skip) {
        (Some(pfo), _) => format!("pfo {}", pfo.0),
        (None, Some(skip)) => format!("skipped {skip:?}"),
        (None, None) => "-".to_string(),
    };
    let merges = seed
        .merges
        .iter()
        .filter(|m| m.merged.is_some())
        .count();
    let endpoints = match (&seed.endpoints, seed.endpoint_failure) {
        (Some(span), _) => format!(
            " ends={}..{}",
            format_opt(span.first),
            format_opt(span.last)
        ),
        (None, Some(failure)) => format!(" ends={failure:?}"),
        (None, None) => String::new(),
    };
    format!(
        "{} span={} merges={} -> {}{}",
        seed.seed, seed.span, merges, outcome, endpoints
    )
}

fn format_opt(val: Option<usize>) -> String {
    val.map(|v| v.to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn print_pfos(pfos: &[track_match3d::store::Pfo], input: &Path) {
    println!("\n{} PFOs from {}", pfos.len(), input.display());
    for pfo in pfos {
        let tjs: Vec<String> = pfo.tj_ids.iter().map(|id| id.to_string()).collect();
        println!(
            "  pfo {}: tjs [{}] start=({:.1}, {:.1}, {:.1}) end=({:.1}, {:.1}, {:.1})",
            pfo.id.0,
            tjs.join(" "),
            pfo.xyz[0].x,
            pfo.xyz[0].y,
            pfo.xyz[0].z,
            pfo.xyz[1].x,
            pfo.xyz[1].y,
            pfo.xyz[1].z
        );
    }
}
