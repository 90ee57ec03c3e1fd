use std::ffi::OsString;
use std::path::Path;

use clap::{ArgAction, Args, Command, FromArgMatches as _};
use log::info;

use crate::error::SimError;
use crate::log::{apply_log_level_spec, set_log_level, LevelFilter};
use crate::parameters::Parameters;
use crate::report::write_simulation_reports;
use crate::simulation::Simulation;

/// Command line arguments of the `contact-sim` binary. Values given here override the
/// parameters file.
#[derive(Args, Debug, Default)]
pub struct BaseArgs {
    /// Random seed
    #[arg(short, long)]
    pub random_seed: Option<u64>,

    /// Optional path for a JSON parameters file
    #[arg(short, long, default_value = "")]
    pub config: String,

    /// Optional path for report output
    #[arg(short, long, default_value = "")]
    pub output_dir: String,

    /// Number of steps to run
    #[arg(short, long)]
    pub iterations: Option<usize>,

    /// Number of people
    #[arg(short, long)]
    pub population: Option<usize>,

    /// Log level, either global (`info`) or per module (`contact_sim::stepper=trace`), comma
    /// separated
    #[arg(long)]
    pub log_level: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

fn create_cli() -> Command {
    let cli = Command::new("contact-sim").about("Epidemic spread among people moving on a canvas");
    BaseArgs::augment_args(cli)
}

/// Parses the process arguments and runs a simulation.
///
/// # Errors
/// Returns an error if argument parsing, configuration, the run or report output fails
pub fn run_with_args() -> Result<Simulation, Box<dyn std::error::Error>> {
    let matches = create_cli().get_matches();
    let args = BaseArgs::from_arg_matches(&matches)?;
    Ok(run(args)?)
}

/// Like [`run_with_args`] but takes the arguments explicitly. The first item is the binary name.
///
/// # Errors
/// Returns an error if argument parsing, configuration, the run or report output fails
pub fn run_with_args_from<I, T>(args: I) -> Result<Simulation, Box<dyn std::error::Error>>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = create_cli().try_get_matches_from(args)?;
    let args = BaseArgs::from_arg_matches(&matches)?;
    Ok(run(args)?)
}

/// Loads the parameters file, if any, and applies the command line overrides. The result is not
/// validated.
pub fn build_parameters(args: &BaseArgs) -> Result<Parameters, SimError> {
    let mut parameters = if args.config.is_empty() {
        Parameters::default()
    } else {
        println!("Loading parameters from: {}", args.config);
        Parameters::from_json_file(Path::new(&args.config))?
    };

    if let Some(seed) = args.random_seed {
        parameters.seed = seed;
    }
    if let Some(iterations) = args.iterations {
        parameters.iterations = iterations;
    }
    if let Some(population) = args.population {
        parameters.population = population;
    }
    Ok(parameters)
}

fn configure_logging(args: &BaseArgs) -> Result<(), SimError> {
    if let Some(spec) = &args.log_level {
        let parsed = apply_log_level_spec(spec)?;
        if let Some(level) = parsed.global {
            println!("Logging enabled at level {level}");
        }
        for (module, level) in &parsed.modules {
            println!("Logging enabled for {module} at level {level}");
        }
        return Ok(());
    }

    let level = match args.verbose {
        0 => return Ok(()),
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    set_log_level(level);
    Ok(())
}

/// Sets up logging, runs the simulation to completion and writes reports when an output
/// directory was given.
pub fn run(args: BaseArgs) -> Result<Simulation, SimError> {
    configure_logging(&args)?;
    let parameters = build_parameters(&args)?;

    let mut simulation = Simulation::new(parameters)?;
    simulation.run()?;
    info!("Finished {} steps", simulation.current_step());

    if !args.output_dir.is_empty() {
        write_simulation_reports(&simulation, Path::new(&args.output_dir))?;
    }
    Ok(simulation)
}

/// One line describing the outcome of a run.
#[must_use]
pub fn summary(simulation: &Simulation) -> String {
    let counts = simulation.population().status_counts();
    let (peak_step, peak_infected) = simulation
        .peak()
        .unwrap_or((simulation.current_step(), counts.infected));
    format!(
        "Peak infected: {peak_infected} at step {peak_step}; final S/I/R: {}/{}/{}",
        counts.susceptible, counts.infected, counts.recovered
    )
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::{tempdir, NamedTempFile};

    use super::*;
    use crate::report::{COUNTS_REPORT, POSITIONS_REPORT};

    fn parse(args: &[&str]) -> BaseArgs {
        let matches = create_cli()
            .try_get_matches_from(args.iter().copied())
            .unwrap();
        BaseArgs::from_arg_matches(&matches).unwrap()
    }

    #[test]
    fn test_parse_args() {
        let args = parse(&[
            "contact-sim",
            "-r",
            "42",
            "--iterations",
            "7",
            "-p",
            "15",
            "-vv",
        ]);
        assert_eq!(args.random_seed, Some(42));
        assert_eq!(args.iterations, Some(7));
        assert_eq!(args.population, Some(15));
        assert_eq!(args.verbose, 2);
        assert!(args.config.is_empty());
        assert!(args.log_level.is_none());
    }

    #[test]
    fn test_unknown_argument_is_an_error() {
        assert!(create_cli()
            .try_get_matches_from(["contact-sim", "--debugger"])
            .is_err());
    }

    #[test]
    fn test_build_parameters_without_config() {
        let parameters = build_parameters(&BaseArgs::default()).unwrap();
        assert_eq!(parameters, Parameters::default());
    }

    #[test]
    fn test_cli_overrides_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"population": 40, "seed": 3, "iterations": 12, "recovery_time": 9}}"#
        )
        .unwrap();
        let args = BaseArgs {
            config: file.path().to_string_lossy().into_owned(),
            random_seed: Some(11),
            population: Some(25),
            ..BaseArgs::default()
        };
        let parameters = build_parameters(&args).unwrap();
        assert_eq!(parameters.seed, 11);
        assert_eq!(parameters.population, 25);
        assert_eq!(parameters.iterations, 12);
        assert_eq!(parameters.recovery_time, 9);
    }

    #[test]
    fn test_missing_config_is_an_error() {
        let args = BaseArgs {
            config: "does/not/exist.json".to_string(),
            ..BaseArgs::default()
        };
        assert!(matches!(run(args), Err(SimError::IoError(_))));
    }

    #[test]
    fn test_run_with_output_dir() {
        let dir = tempdir().unwrap();
        let output_dir = dir.path().join("out");
        let simulation = run_with_args_from([
            "contact-sim",
            "-r",
            "8",
            "-i",
            "10",
            "-p",
            "20",
            "-o",
            output_dir.to_str().unwrap(),
        ])
        .unwrap();
        assert_eq!(simulation.current_step(), 10);
        assert_eq!(simulation.parameters().seed, 8);
        assert!(output_dir.join(COUNTS_REPORT).exists());
        assert!(output_dir.join(POSITIONS_REPORT).exists());
    }

    #[test]
    fn test_same_seed_same_summary() {
        let run_once = || {
            let simulation =
                run_with_args_from(["contact-sim", "-r", "99", "-i", "30", "-p", "25"]).unwrap();
            summary(&simulation)
        };
        assert_eq!(run_once(), run_once());
    }

    #[test]
    fn test_summary_without_steps() {
        let simulation = run_with_args_from(["contact-sim", "-i", "0", "-p", "5"]).unwrap();
        assert_eq!(
            summary(&simulation),
            "Peak infected: 1 at step 0; final S/I/R: 4/1/0"
        );
    }
}
