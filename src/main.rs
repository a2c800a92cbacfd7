use std::process::ExitCode;

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

use population_simulator::curve::interpolate_anchors;
use population_simulator::simulation::{
    export_report, generate_summary, run_simulation, EducationImpact, Event, Scenario,
};
use population_simulator::{SimError, SimResult};

#[derive(Parser, Debug)]
#[command(name = "population_simulator")]
#[command(about = "Simulate the year-by-year evolution of a synthetic population")]
struct Args {
    /// JSON scenario file with "params" and "events"; flags override its values
    #[arg(short, long)]
    config: Option<String>,

    /// Initial population (even number, split between males and females)
    #[arg(short = 'n', long)]
    initial_population: Option<usize>,

    /// Number of years to simulate
    #[arg(short, long)]
    years: Option<u32>,

    /// Probability that founders and immigrants live in cities
    #[arg(long)]
    urban_ratio: Option<f64>,

    /// Base child-support level
    #[arg(long)]
    child_support: Option<f64>,

    /// Constant education impact for the whole run
    #[arg(long, conflicts_with = "education_curve")]
    education_impact: Option<f64>,

    /// Education impact anchors spread evenly over the run (e.g. "0.5,0.6,0.4")
    #[arg(long, value_delimiter = ',')]
    education_curve: Vec<f64>,

    /// Base healthcare quality
    #[arg(long)]
    healthcare_quality: Option<f64>,

    /// Calendar year of the first simulated year (shifts the economic regimes)
    #[arg(long)]
    start_year: Option<i64>,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Baby boom as START:END:CHILD_SUPPORT
    #[arg(long)]
    baby_boom: Option<String>,

    /// Immigration wave as START:END:INFLOW
    #[arg(long)]
    immigration_wave: Option<String>,

    /// Custom event as NAME:START:END:key=value[,key=value] (repeatable)
    #[arg(long = "event")]
    events: Vec<String>,

    /// Export the full run report to a JSON file
    #[arg(long)]
    export: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> SimResult<()> {
    let scenario = build_scenario(&args)?;

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    println!("Simulating with seed: {}", seed);
    println!(
        "Population: {} | Years: {} | Events: {}",
        scenario.params.initial_population,
        scenario.params.years,
        scenario.events.len()
    );

    let report = run_simulation(&scenario.params, &scenario.events, &mut rng)?;

    println!();
    print!("{}", generate_summary(&report, seed));

    if let Some(path) = &args.export {
        export_report(&report, path)?;
        println!("\nReport exported to {}", path);
    }

    Ok(())
}

/// Merge the optional scenario file with command-line overrides
fn build_scenario(args: &Args) -> SimResult<Scenario> {
    let mut scenario = match &args.config {
        Some(path) => Scenario::from_json_file(path)?,
        None => Scenario::default(),
    };
    let params = &mut scenario.params;

    if let Some(n) = args.initial_population {
        params.initial_population = n;
    }
    if let Some(years) = args.years {
        params.years = years;
    }
    if let Some(ratio) = args.urban_ratio {
        params.urban_ratio = ratio;
    }
    if let Some(support) = args.child_support {
        params.child_support = support;
    }
    if let Some(quality) = args.healthcare_quality {
        params.healthcare_quality = quality;
    }
    if let Some(start) = args.start_year {
        params.regime.start_year = start;
    }
    if let Some(impact) = args.education_impact {
        params.education_impact = EducationImpact::Constant(impact);
    }
    if !args.education_curve.is_empty() {
        let series = interpolate_anchors(&args.education_curve, params.years)?;
        params.education_impact = EducationImpact::PerYear(series);
    }

    if let Some(spec) = &args.baby_boom {
        let (start, end, support) = parse_window(spec)?;
        scenario.events.push(Event::baby_boom(start, end, support));
    }
    if let Some(spec) = &args.immigration_wave {
        let (start, end, inflow) = parse_window(spec)?;
        scenario.events.push(Event::immigration_wave(start, end, inflow));
    }
    for spec in &args.events {
        scenario.events.push(spec.parse()?);
    }

    Ok(scenario)
}

/// Parse `START:END:VALUE`
fn parse_window(spec: &str) -> SimResult<(u32, u32, f64)> {
    let invalid = || SimError::InvalidEventSpec(spec.to_string());
    let parts: Vec<&str> = spec.split(':').map(str::trim).collect();
    match parts.as_slice() {
        [start, end, value] => Ok((
            start.parse().map_err(|_| invalid())?,
            end.parse().map_err(|_| invalid())?,
            value.parse().map_err(|_| invalid())?,
        )),
        _ => Err(invalid()),
    }
}
