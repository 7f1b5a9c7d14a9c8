//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and layers them over the config file/environment
//! - installs logging
//! - runs donor selection + growth curve fitting
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;
use tracing::info;

use crate::cli::{Command, GrowthCurveArgs, PlotArgs, SampleArgs, SubjectArgs};
use crate::config::AppConfig;
use crate::domain::DEFAULT_RETURN_PERIODS;
use crate::error::AppError;

pub mod pipeline;

use pipeline::{RunInputs, RunSettings, SubjectSource};

/// Entry point for the `feh` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;
    crate::logging::init(config.log.as_deref());

    match cli.command {
        Command::GrowthCurve(args) => handle_growth_curve(args, config),
        Command::Donors(args) => handle_donors(args, config),
        Command::Plot(args) => handle_plot(args),
        Command::Sample(args) => handle_sample(args),
    }
}

fn handle_growth_curve(args: GrowthCurveArgs, config: AppConfig) -> Result<(), AppError> {
    let config = apply_subject_args(config, &args.subject)?;
    let inputs = load_inputs(&args.subject, &config)?;
    let settings = RunSettings {
        method: args.method,
        distribution: args.distribution.unwrap_or(config.distribution),
        pooling: config.pooling.clone(),
        return_periods: if args.return_periods.is_empty() {
            DEFAULT_RETURN_PERIODS.to_vec()
        } else {
            args.return_periods.clone()
        },
    };
    let run = pipeline::run_growth_curve(&inputs, &settings)?;

    println!(
        "{}",
        crate::report::format_run_summary(&inputs.subject, &run.curve, &settings.pooling, run.donors.len())
    );
    if !run.members.is_empty() {
        println!("{}", crate::report::format_pooling_group(&run.members));
    }
    println!("{}", crate::report::format_growth_factors(&run.table));

    if args.plot {
        let observed = crate::fit::dimensionless_flows(&inputs.subject);
        let plot = crate::plot::render_ascii_plot(&run.curve, &observed, args.width, args.height);
        println!("{plot}");
    }

    if let Some(path) = &args.subject.export_group {
        crate::io::write_pooling_group_csv(path, &run.members)?;
        info!(path = %path.display(), "wrote pooling group CSV");
    }
    if let Some(path) = &args.export_curve {
        let file = crate::io::curve_file(&inputs.subject, &run.curve, &run.donors, &settings.return_periods)?;
        crate::io::write_growth_curve_json(path, &file)?;
        info!(path = %path.display(), "wrote growth curve JSON");
    }

    Ok(())
}

fn handle_donors(args: SubjectArgs, config: AppConfig) -> Result<(), AppError> {
    let config = apply_subject_args(config, &args)?;
    let inputs = load_inputs(&args, &config)?;
    let members = pipeline::run_pooling_group(&inputs, &config.pooling)?;

    println!("Subject: {}", inputs.subject.label());
    println!("{}", crate::report::format_pooling_group(&members));

    if let Some(path) = &args.export_group {
        crate::io::write_pooling_group_csv(path, &members)?;
        info!(path = %path.display(), "wrote pooling group CSV");
    }
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let curve = crate::io::read_growth_curve_json(&args.curve)?;
    println!("Curve: {} ({}, {})", curve.subject, curve.method.display_name(), curve.distribution.display_name());
    let plot = crate::plot::render_ascii_plot_from_curve_file(&curve, args.width, args.height);
    println!("{plot}");
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let config = crate::data::SampleConfig {
        count: args.count,
        seed: args.seed,
        min_record_years: args.min_years,
        max_record_years: args.max_years,
        ..crate::data::SampleConfig::default()
    };
    let catalog = crate::data::generate_catalog(&config)?;
    crate::io::write_catalog(&args.out, &catalog)?;
    println!("Wrote {} catchments to {}", catalog.len(), args.out.display());
    Ok(())
}

/// Layer command-line overrides on top of the loaded configuration.
pub fn apply_subject_args(mut config: AppConfig, args: &SubjectArgs) -> Result<AppConfig, AppError> {
    if let Some(path) = &args.catalog {
        config.catalog = Some(path.clone());
    }
    if let Some(v) = args.record_target {
        config.pooling.record_target = v;
    }
    if let Some(v) = args.urban_cutoff {
        config.pooling.urban_cutoff = v;
    }
    if let Some(v) = args.min_record_length {
        config.pooling.min_record_length = v;
    }
    if let Some(v) = args.include_subject {
        config.pooling.subject_inclusion = v;
    }
    config.validate()?;
    Ok(config)
}

fn load_inputs(args: &SubjectArgs, config: &AppConfig) -> Result<RunInputs, AppError> {
    let source = match (&args.subject, &args.subject_file) {
        (Some(id), _) => SubjectSource::CatalogId(*id),
        (None, Some(path)) => SubjectSource::File(path.clone()),
        (None, None) => return Err(AppError::new(2, "Provide `--subject ID` or `--subject-file PATH`.")),
    };
    pipeline::load_inputs(&source, config.catalog.as_deref(), args.amax.as_deref())
}
