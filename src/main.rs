use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
    process::ExitCode,
};

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use tableau_simplex::{
    command::{self, ProblemInput, Response},
    simplex::{BasisDetection, Problem, SolverOptions},
};

#[derive(Parser)]
#[command(version, about = "Maximize c·x subject to A·x <= b, x >= 0 with the tableau simplex method")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides it.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve a problem read from a JSON file of the form {"c": [..], "A": [[..]], "b": [..]}.
    Solve {
        /// Input file, `-` for stdin.
        input: PathBuf,
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
        #[command(flatten)]
        flags: OptionFlags,
    },
    /// Print an empty problem with `n` variables and `m` constraints.
    Template {
        #[arg(short, long)]
        n: usize,
        #[arg(short, long)]
        m: usize,
    },
}

/// Solver options given on the command line; each one set here wins over the input file.
#[derive(Debug, Args)]
struct OptionFlags {
    #[arg(long)]
    max_iterations: Option<usize>,
    #[arg(long)]
    tolerance: Option<f64>,
    /// Decimal places kept in the output.
    #[arg(long)]
    precision: Option<u32>,
    /// Detect basic columns within this distance of one instead of by exact comparison.
    #[arg(long)]
    basis_tolerance: Option<f64>,
}

impl OptionFlags {
    fn merge(&self, file_options: Option<SolverOptions>) -> SolverOptions {
        let mut options = file_options.unwrap_or_default();
        if let Some(max_iterations) = self.max_iterations {
            options = options.with_max_iterations(max_iterations);
        }
        if let Some(tolerance) = self.tolerance {
            options = options.with_tolerance(tolerance);
        }
        if let Some(precision) = self.precision {
            options = options.with_precision(precision);
        }
        if let Some(eps) = self.basis_tolerance {
            options = options.with_basis_detection(BasisDetection::Tolerance(eps));
        }
        options
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Text,
}

const SOLVED: u8 = 0;
const SOLVER_FAILURE: u8 = 1;
const INPUT_ERROR: u8 = 2;

fn exit_status(response: &Response) -> u8 {
    if response.is_solved() {
        SOLVED
    } else {
        SOLVER_FAILURE
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match cli.cmd {
        Command::Solve {
            input,
            format,
            flags,
        } => {
            let input = match read_input(&input) {
                Ok(input) => input,
                Err(err_msg) => {
                    eprintln!("{err_msg}");
                    return ExitCode::from(INPUT_ERROR);
                }
            };
            let options = flags.merge(input.options.clone());

            let response = command::compute(&input, &options);
            let printed = match format {
                Format::Json => print_json(&response),
                Format::Text => {
                    print_text(&input, &response);
                    Ok(())
                }
            };
            if let Err(err_msg) = printed {
                eprintln!("{err_msg}");
                return ExitCode::from(INPUT_ERROR);
            }

            ExitCode::from(exit_status(&response))
        }
        Command::Template { n, m } => match print_json(&ProblemInput::template(n, m)) {
            Ok(()) => ExitCode::from(SOLVED),
            Err(err_msg) => {
                eprintln!("{err_msg}");
                ExitCode::from(INPUT_ERROR)
            }
        },
    }
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn read_input(path: &PathBuf) -> Result<ProblemInput, String> {
    let raw = if path.as_os_str() == "-" {
        let mut raw = String::new();
        io::stdin()
            .read_to_string(&mut raw)
            .map_err(|err| format!("cannot read stdin: {err}"))?;
        raw
    } else {
        fs::read_to_string(path).map_err(|err| format!("cannot read {}: {err}", path.display()))?
    };
    parse_input(&raw)
}

fn parse_input(raw: &str) -> Result<ProblemInput, String> {
    serde_json::from_str(raw).map_err(|err| {
        format!("input error: check that c, A and b are filled with valid numbers ({err})")
    })
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value).map_err(|err| err.to_string())?;
    println!("{json}");
    Ok(())
}

fn print_text(input: &ProblemInput, response: &Response) {
    println!("{}", Problem::from(input));
    println!();
    match response {
        Response::Solved(report) => println!("{report}"),
        Response::Failed { error } => println!("error: {error}"),
    }
}
