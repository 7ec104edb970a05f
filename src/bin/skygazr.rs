//! Locate celestial objects in the sky
//!
//! Prints where to look for a planet, star or star system from a place on
//! Earth, and, for targets nearer than a gigaparsec, how fast it moves
//! relative to you and how far away it is.
//!
//! Usage:
//!   cargo run --bin skygazr -- --time "2020-10-03T00:35:20.381" --body "Betelgeuse"

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use flexi_logger::Logger;
use skygazr::encyclopedia::WikipediaClient;
use skygazr::time::{parse_timestamp, Zone};
use skygazr::{observe, Loader, Report, Resolver, Topos, DEFAULT_EPHEMERIS};

/// Type alias for the error type used throughout this module
type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Locate celestial objects in the sky
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Locate celestial objects in the sky",
    long_about = "Locate celestial objects in the sky.\n\
                  Example: skygazr --time \"2020-10-03T00:35:20.381\" --body \"Betelgeuse\""
)]
struct Args {
    /// Latitude and longitude of the observer in degrees
    /// (default: Burton Tower, University of Toronto)
    #[arg(
        short,
        long = "space",
        visible_alias = "latlong",
        num_args = 2,
        value_names = ["LAT", "LON"],
        allow_negative_numbers = true,
        default_values_t = [43.660444, -79.398556]
    )]
    space: Vec<f64>,

    /// Elevation of the observer in meters
    #[arg(short, long, default_value_t = 100.0, allow_negative_numbers = true)]
    elevation: f64,

    /// Observation time: "now" or an ISO 8601 timestamp
    #[arg(short, long, visible_alias = "at", default_value = "now")]
    time: String,

    /// Time zone for timestamps without an offset: "local", "utc" or "+HH:MM"
    #[arg(short = 'z', long, default_value = "local")]
    timezone: Zone,

    /// Target to locate: a planet, "HIP <number>", or a star's name
    #[arg(short = 'b', long = "target", visible_alias = "body", default_value = "mars")]
    target: String,

    /// Directory for downloaded data (default: $SKYGAZR_DATA_DIR or ~/.cache/skygazr)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Ephemeris kernel: a path, or a file name to find or download in the data directory
    #[arg(long, default_value = DEFAULT_EPHEMERIS)]
    ephemeris: PathBuf,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

fn run(args: Args) -> Result<()> {
    let loader = match &args.data_dir {
        Some(dir) => Loader::new().with_data_dir(dir),
        None => Loader::new(),
    };

    let ephemeris = loader.load_ephemeris(&args.ephemeris)?;
    let ts = loader.timescale();
    let time = ts.from_datetime(parse_timestamp(&args.time, args.timezone)?);
    log::info!("Observing at {}", time);

    let stars = loader.hipparcos();
    let encyclopedia = WikipediaClient::new()?;
    let resolver = Resolver::new(&ephemeris, &stars, &encyclopedia);
    let target = resolver.resolve(&args.target)?;
    log::debug!("Resolved {} to {:?}", args.target, target);

    let (latitude, longitude) = match args.space.as_slice() {
        [latitude, longitude] => (*latitude, *longitude),
        other => return Err(format!("expected latitude and longitude, got {:?}", other).into()),
    };
    let topos = Topos::new(latitude, longitude, args.elevation);

    let observation = observe(&ephemeris, &target, topos, time)?;
    println!("{}", Report::new(&args.target, observation));
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let _logger = match Logger::try_with_env_or_str(log_level(args.verbose))
        .and_then(|logger| logger.log_to_stderr().start())
    {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("Logger initialization failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
