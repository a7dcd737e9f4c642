use clap::Parser;
use log::warn;
use pretty_env_logger;
use schismrs_mld::io::{read_profiles_csv, write_results_csv};
use schismrs_mld::{estimate_batch, LinearEos, Metric, MldOptionsBuilder};
use std::fs::File;
use std::io::{self, BufWriter};
use std::process::ExitCode;
use std::{error::Error, path::PathBuf};

#[derive(Parser, Debug)]
#[command(
    author,
    about = "Estimate ocean mixed layer depth from CTD casts (Holte & Talley 2009)",
    long_about = None,
    version = env!("SCHISMRS_MLD_VERSION")
)]
struct Cli {
    /// Long-format CSV with columns profile, pressure, temperature[, salinity][, density]
    input: PathBuf,

    /// Output CSV path (default: stdout)
    #[clap(short, long)]
    output_filepath: Option<PathBuf>,

    /// Samples shallower than this pressure (dbar) are ignored
    #[clap(long, default_value = "10.0")]
    reference_pressure: f64,

    /// Temperature threshold (deg C)
    #[clap(long, default_value = "0.2")]
    tthresh: f64,

    /// Density threshold (kg/m^3)
    #[clap(long, default_value = "0.03")]
    dthresh: f64,

    /// Temperature gradient threshold (deg C/dbar)
    #[clap(long, default_value = "0.005")]
    tgrad: f64,

    /// Density gradient threshold (kg/m^3/dbar)
    #[clap(long, default_value = "0.0005")]
    dgrad: f64,

    /// Normalized error tolerance of the mixed layer fit
    #[clap(long, default_value = "1e-10")]
    errortol: f64,

    /// Maximum separation (dbar) of candidates belonging to one cluster
    #[clap(long, default_value = "25.0")]
    range: f64,

    /// Maximum separation (dbar) of gradient maximum and extremum
    #[clap(long, default_value = "100.0")]
    deltad: f64,

    /// Lower temperature-change bound of winter-like profiles
    #[clap(long, default_value = "-0.25", allow_hyphen_values = true)]
    tcutoffl: f64,

    /// Upper temperature-change bound of winter-like profiles
    #[clap(long, default_value = "0.5", allow_hyphen_values = true)]
    tcutoffu: f64,

    /// Density-change cutoff of winter-like profiles
    #[clap(long, default_value = "-0.06", allow_hyphen_values = true)]
    dcutoff: f64,

    /// Thickness (dbar) of the surface band used for classification
    #[clap(long, default_value = "100.0")]
    band: f64,

    /// Metrics to run (comma-separated): threshold, gradient, fit, extrema, subsurface
    #[clap(long, value_delimiter = ',', num_args = 1..)]
    metrics: Option<Vec<Metric>>,

    /// Print the candidate table of every profile to stderr
    #[clap(long, action)]
    candidates: bool,
}

fn entrypoint() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let mut builder = MldOptionsBuilder::default();
    builder
        .reference_pressure(cli.reference_pressure)
        .temperature_threshold(cli.tthresh)
        .density_threshold(cli.dthresh)
        .temperature_gradient(cli.tgrad)
        .density_gradient(cli.dgrad)
        .error_tolerance(cli.errortol)
        .range(cli.range)
        .subsurface_separation(cli.deltad)
        .tcutoff_lower(cli.tcutoffl)
        .tcutoff_upper(cli.tcutoffu)
        .dcutoff(cli.dcutoff)
        .classification_band(cli.band);
    if let Some(metrics) = &cli.metrics {
        builder.metrics(metrics.clone());
    }
    let options = builder.build()?;

    let profiles = read_profiles_csv(&cli.input)?;
    let (ids, profiles): (Vec<String>, Vec<_>) = profiles
        .into_iter()
        .map(|named| (named.id, named.profile))
        .unzip();
    let results = estimate_batch(&profiles, &options, &LinearEos::default());

    for (id, result) in ids.iter().zip(&results) {
        match result {
            Ok(mld) => {
                if !mld.is_determined() {
                    warn!("Profile {}: undetermined ({})", id, mld.pathway_summary());
                }
                if cli.candidates {
                    eprintln!("# profile {}\n{}", id, mld.candidates);
                }
            }
            Err(e) => warn!("Profile {}: {}", id, e),
        }
    }

    match &cli.output_filepath {
        Some(output_path) => {
            write_results_csv(BufWriter::new(File::create(output_path)?), &ids, &results)?;
            println!("Wrote {}", output_path.display());
        }
        None => write_results_csv(io::stdout().lock(), &ids, &results)?,
    }
    Ok(())
}

fn main() -> ExitCode {
    match entrypoint() {
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}
