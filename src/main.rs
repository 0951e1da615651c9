use anyhow::{Context, Result, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use contour3d::config::FileConfig;
use contour3d::domain::Point2;
use contour3d::kernel::{JoinMode, MeshKernel};
use contour3d::mesh::{clean_mesh, estimate_stl_size, write_stl};
use contour3d::stack::{
    ConsoleProgress, FailurePolicy, Orchestrator, RunStatus, layer_file_name, load_stack,
};

/// Reconstruct a 3D solid from a stack of 2D contour slices
///
/// Layer files are named by zero-based index (0000.svg, 0001.svg, ...). Each
/// layer is extruded by the layer thickness at offset thickness * index, with
/// nested contours alternating between solid and hole.
///
/// Examples:
///   # Reconstruct a stack of SVG slices with default settings
///   contour3d -i slices/ -o model.stl
///
///   # JSON contours, 0.1 thick layers, with a run report
///   contour3d -i slices/ -e json -t 0.1 --report run.json
///
///   # Stop a long run by creating the stop file from another shell
///   contour3d -i slices/ --stop-file /tmp/contour3d.stop
#[derive(Parser, Debug)]
#[command(name = "contour3d")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches contour3d.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the layer files
    #[arg(short = 'i', long)]
    input: Option<PathBuf>,

    /// Output STL file path (defaults to model.stl)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Extension of the layer files: svg or json (defaults to svg)
    #[arg(short = 'e', long)]
    extension: Option<String>,

    /// Layer thickness in model units (defaults to 0.033)
    #[arg(short = 't', long)]
    thickness: Option<f64>,

    /// Scale from contour file units to model units
    #[arg(short = 's', long)]
    scale: Option<f64>,

    /// X coordinate of the import origin
    #[arg(long, allow_hyphen_values = true)]
    origin_x: Option<f64>,

    /// Y coordinate of the import origin
    #[arg(long, allow_hyphen_values = true)]
    origin_y: Option<f64>,

    /// Name of the operation group wrapping the run
    #[arg(long)]
    group_name: Option<String>,

    /// What to do with committed layers when a layer fails
    #[arg(long, value_enum)]
    on_failure: Option<FailurePolicy>,

    /// Join every layer into one body or create one body per layer
    #[arg(long, value_enum)]
    join_mode: Option<JoinMode>,

    /// Write a JSON run report to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Cancel the run as soon as this file exists
    #[arg(long)]
    stop_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let total_start = Instant::now();

    let file_config = if let Some(ref config_path) = args.config {
        if !config_path.exists() {
            bail!("Config file not found: {}", config_path.display());
        }
        FileConfig::from_path(config_path)?
    } else {
        FileConfig::load().unwrap_or_default()
    };

    let verbose = args.verbose || file_config.verbose;
    init_tracing(verbose);

    let mut settings = file_config.stack_settings();
    if let Some(thickness) = args.thickness {
        settings.thickness = thickness;
    }
    if let Some(scale) = args.scale {
        settings.scale = scale;
    }
    settings.origin = Point2::new(
        args.origin_x.unwrap_or(settings.origin.x),
        args.origin_y.unwrap_or(settings.origin.y),
    );
    if let Some(name) = args.group_name {
        settings.group_name = name;
    }
    if let Some(policy) = args.on_failure {
        settings.failure_policy = policy;
    }
    if let Some(mode) = args.join_mode {
        settings.join_mode = mode;
    }

    if !settings.thickness.is_finite() || settings.thickness <= 0.0 {
        bail!("Layer thickness must be positive, got {}", settings.thickness);
    }
    if !settings.scale.is_finite() || settings.scale <= 0.0 {
        bail!("Import scale must be positive, got {}", settings.scale);
    }

    let input = args.input.or(file_config.input).context(
        "No input directory given. Use --input or set `input` in contour3d.toml",
    )?;
    let output_path = args
        .output
        .or(file_config.output)
        .unwrap_or_else(|| PathBuf::from("model.stl"));
    let extension = args.extension.unwrap_or(file_config.extension);
    let report_path = args.report.or(file_config.report);
    let stop_file = args.stop_file.or(file_config.stop_file);

    println!("contour3d - Contour Stack to STL");
    println!("================================");
    println!();

    if verbose {
        println!("Configuration:");
        println!("  Input: {}", input.display());
        println!("  Layer files: {}", layer_file_name(0, &extension));
        println!("  Thickness: {}", settings.thickness);
        println!("  Scale: {:.6}", settings.scale);
        println!("  Origin: ({}, {})", settings.origin.x, settings.origin.y);
        println!("  Group name: {}", settings.group_name);
        println!("  On failure: {:?}", settings.failure_policy);
        println!("  Join mode: {:?}", settings.join_mode);
        if let Some(ref stop) = stop_file {
            println!("  Stop file: {}", stop.display());
        }
        println!("  Output: {}", output_path.display());
        println!();
    }

    let spinner = create_spinner("Scanning layer files...");
    let start = Instant::now();
    let layers = load_stack(&input, &extension)
        .map_err(|e| anyhow::anyhow!(e.report()))
        .context("Failed to load contour stack")?;
    spinner.finish_with_message(format!(
        "Found {} layers, {:.3} units tall [{:.1}s]",
        layers.len(),
        settings.thickness * layers.len() as f64,
        start.elapsed().as_secs_f32()
    ));

    let mut kernel = MeshKernel::new();
    let mut progress = ConsoleProgress::new(stop_file);
    let mut orchestrator = Orchestrator::new(settings.clone());
    let start = Instant::now();
    let outcome = orchestrator.run(&layers, &mut kernel, &mut progress);
    let mut report = orchestrator.into_report();
    println!(
        "Processed {} of {} layers [{:.1}s]",
        report.layers.len(),
        layers.len(),
        start.elapsed().as_secs_f32()
    );

    // A rolled back model has nothing left worth writing
    let write_model = outcome.is_ok() || settings.failure_policy == FailurePolicy::Keep;
    if write_model && kernel.triangle_count() > 0 {
        let spinner = create_spinner("Validating and writing STL file...");
        let start = Instant::now();

        let (cleaned, mesh_report) = clean_mesh(kernel.into_triangles());
        if mesh_report.has_issues() {
            tracing::warn!("{}", mesh_report.summary());
        }
        let file_size = estimate_stl_size(cleaned.len());
        write_stl(&output_path, &cleaned).context("Failed to write STL file")?;
        report.triangles = Some(cleaned.len());

        spinner.finish_with_message(format!(
            "Wrote {} triangles ({:.1} KB) [{:.1}s]",
            cleaned.len(),
            file_size as f64 / 1024.0,
            start.elapsed().as_secs_f32()
        ));
    } else if write_model {
        println!("Nothing was extruded, no STL written");
    }

    if let Some(ref path) = report_path {
        let json = report.to_json().context("Failed to serialize run report")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write run report: {}", path.display()))?;
        if verbose {
            println!("Report: {}", path.display());
        }
    }

    // The progress sink already printed the failure report
    let Ok(status) = outcome else {
        return Ok(ExitCode::from(exit_code(None)));
    };

    println!();
    match status {
        RunStatus::Cancelled => println!(
            "Cancelled after {} layers. Total time: {:.1}s",
            report.layers.len(),
            total_start.elapsed().as_secs_f32()
        ),
        _ => println!(
            "Done! {} layers extruded. Total time: {:.1}s",
            report.extruded_layers(),
            total_start.elapsed().as_secs_f32()
        ),
    }
    if report.triangles.is_some() {
        println!();
        println!("Output: {}", output_path.display());
    }

    Ok(ExitCode::from(exit_code(Some(status))))
}

/// Process exit code for a finished run; `None` stands for a failed run
fn exit_code(status: Option<RunStatus>) -> u8 {
    match status {
        Some(RunStatus::Completed) => 0,
        Some(RunStatus::Cancelled) => 2,
        _ => 1,
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "contour3d=debug" } else { "contour3d=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(Some(RunStatus::Completed)), 0);
        assert_eq!(exit_code(Some(RunStatus::Cancelled)), 2);
        assert_eq!(exit_code(None), 1);
    }

    #[test]
    fn test_args_parse_policies() {
        let args = Args::try_parse_from([
            "contour3d",
            "-i",
            "slices",
            "--on-failure",
            "roll-back",
            "--join-mode",
            "new-body",
            "--origin-x",
            "-1.5",
        ])
        .unwrap();
        assert_eq!(args.on_failure, Some(FailurePolicy::RollBack));
        assert_eq!(args.join_mode, Some(JoinMode::NewBody));
        assert_eq!(args.origin_x, Some(-1.5));
    }
}
