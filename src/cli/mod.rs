//! Command-line parsing for the FEH growth curve tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the statistics code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{Distribution, GrowthCurveMethod, SubjectInclusion};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "feh", version, about = "FEH statistical flood growth curves")]
pub struct Cli {
    /// TOML config file (default: ./feh.toml when present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit a growth curve for a subject catchment and print the factor table.
    GrowthCurve(GrowthCurveArgs),
    /// Print the pooling group (donors, statistics and weights) for a subject.
    Donors(SubjectArgs),
    /// Plot a previously exported growth curve JSON.
    Plot(PlotArgs),
    /// Write a synthetic gauged catalog JSON.
    Sample(SampleArgs),
}

/// Which catchment to analyse and where donors come from.
#[derive(Debug, Args, Clone)]
pub struct SubjectArgs {
    /// Station id of the subject in the catalog.
    #[arg(short = 's', long)]
    pub subject: Option<u32>,

    /// Subject catchment JSON (instead of `--subject`).
    #[arg(long, conflicts_with = "subject")]
    pub subject_file: Option<PathBuf>,

    /// Replace the subject's AMAX series with a CSV (date,flow[,stage,flag]).
    #[arg(long)]
    pub amax: Option<PathBuf>,

    /// Catalog JSON (overrides config / FEH_CATALOG).
    #[arg(short = 'c', long)]
    pub catalog: Option<PathBuf>,

    /// Station-years at which donor accumulation stops.
    #[arg(long)]
    pub record_target: Option<usize>,

    /// URBEXT2000 at or above which catchments are not donors.
    #[arg(long)]
    pub urban_cutoff: Option<f64>,

    /// Minimum valid AMAX records for a donor.
    #[arg(long)]
    pub min_record_length: Option<usize>,

    /// Whether the subject joins its own pooling group.
    #[arg(long, value_enum)]
    pub include_subject: Option<SubjectInclusion>,

    /// Export the pooling group table to CSV.
    #[arg(long = "export-group")]
    pub export_group: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct GrowthCurveArgs {
    #[command(flatten)]
    pub subject: SubjectArgs,

    #[arg(short = 'm', long, value_enum, default_value_t = GrowthCurveMethod::PoolingGroup)]
    pub method: GrowthCurveMethod,

    /// Distribution to fit (overrides config).
    #[arg(short = 'd', long, value_enum)]
    pub distribution: Option<Distribution>,

    /// Return periods (years) to tabulate.
    #[arg(short = 't', long = "return-period", value_delimiter = ',')]
    pub return_periods: Vec<f64>,

    /// Render an ASCII plot in the terminal.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Export the curve (parameters + factor table) to JSON.
    #[arg(long = "export-curve")]
    pub export_curve: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    /// Curve JSON file path (from `feh growth-curve --export-curve ...`).
    #[arg(long)]
    pub curve: PathBuf,

    #[arg(long, default_value_t = 72)]
    pub width: usize,

    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

#[derive(Debug, Args, Clone)]
pub struct SampleArgs {
    /// Output catalog JSON path.
    #[arg(short = 'o', long)]
    pub out: PathBuf,

    /// Number of catchments.
    #[arg(short = 'n', long, default_value_t = 60)]
    pub count: usize,

    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    #[arg(long, default_value_t = 8)]
    pub min_years: usize,

    #[arg(long, default_value_t = 60)]
    pub max_years: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_growth_curve_flags() {
        let cli = Cli::parse_from([
            "feh",
            "growth-curve",
            "--subject",
            "37017",
            "--method",
            "single-site",
            "-d",
            "gev",
            "-t",
            "2,100",
            "--include-subject",
            "force",
        ]);
        let Command::GrowthCurve(args) = cli.command else {
            panic!("wrong subcommand");
        };
        assert_eq!(args.subject.subject, Some(37017));
        assert_eq!(args.method, GrowthCurveMethod::SingleSite);
        assert_eq!(args.distribution, Some(Distribution::Gev));
        assert_eq!(args.return_periods, vec![2.0, 100.0]);
        assert_eq!(args.subject.include_subject, Some(SubjectInclusion::Force));
    }

    #[test]
    fn subject_and_subject_file_conflict() {
        let res = Cli::try_parse_from(["feh", "donors", "--subject", "1", "--subject-file", "x.json"]);
        assert!(res.is_err());
    }
}
