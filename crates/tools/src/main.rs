use std::path::PathBuf;

use clap::{Parser, Subcommand};
use foundation::math::LonLat;
use scoring::DistanceUnit;
use tools::{CliConfig, CliError, ScoreOptions};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect sea datasets and replay Seadle guesses")]
struct Args {
    /// JSON config: { "scoring": {...}, "name_property": "NAME", "object": "seas" }
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List regions with centroid and neighbour count
    Inspect {
        /// GeoJSON FeatureCollection or TopoJSON topology
        dataset: PathBuf,
    },

    /// List the neighbours of one region
    Neighbors { dataset: PathBuf, name: String },

    /// Score guesses against a target, in order
    Score {
        dataset: PathBuf,

        /// Target region name (or id)
        #[arg(long)]
        target: String,

        /// Report distances in miles
        #[arg(long)]
        miles: bool,

        /// Print the recorded guesses as JSON
        #[arg(long)]
        json: bool,

        guesses: Vec<String>,
    },

    /// Great-circle distance and initial bearing between two points
    Distance {
        #[arg(allow_hyphen_values = true)]
        lon1: f64,
        #[arg(allow_hyphen_values = true)]
        lat1: f64,
        #[arg(allow_hyphen_values = true)]
        lon2: f64,
        #[arg(allow_hyphen_values = true)]
        lat2: f64,

        #[arg(long)]
        miles: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let config = match &args.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };
    let load = |path: &PathBuf| formats::load_catalog_path(path, &config.region_options());

    let output = match args.command {
        Command::Inspect { dataset } => tools::inspect(&load(&dataset)?)?,
        Command::Neighbors { dataset, name } => tools::neighbors(&load(&dataset)?, &name)?,
        Command::Score {
            dataset,
            target,
            miles,
            json,
            guesses,
        } => tools::score(
            &load(&dataset)?,
            &config.scoring,
            &target,
            &guesses,
            ScoreOptions {
                unit: unit(miles),
                json,
            },
        )?,
        Command::Distance {
            lon1,
            lat1,
            lon2,
            lat2,
            miles,
        } => tools::distance(LonLat::new(lon1, lat1), LonLat::new(lon2, lat2), unit(miles)),
    };
    print!("{output}");
    if !output.ends_with('\n') {
        println!();
    }
    Ok(())
}

fn unit(miles: bool) -> DistanceUnit {
    if miles {
        DistanceUnit::Miles
    } else {
        DistanceUnit::Kilometers
    }
}
