use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use wealthplan::commands::{self, ProjectOptions, SimulateOptions};
use wealthplan::init_logging;

#[derive(Parser, Debug)]
#[command(name = "wealthplan")]
#[command(about = "Long-horizon wealth projections for a household")]
struct Args {
    /// Path to the data directory (default: ~/.wealthplan/)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Project the household year by year
    Project {
        /// Household YAML file
        file: PathBuf,
        /// Show values deflated to year-0 BRL
        #[arg(long)]
        real: bool,
        /// Also print the cash-flow statement
        #[arg(long)]
        cash_flow: bool,
        /// Export the full result as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Replay the risk questionnaire from a file, or ask it interactively
    Risk {
        /// Household YAML file with a risk section
        #[arg(required_unless_present = "interactive")]
        file: Option<PathBuf>,
        #[arg(short, long)]
        interactive: bool,
    },
    /// Year-0 cost of every expense category at scale 1.0
    Baseline {
        file: PathBuf,
    },
    /// Monte Carlo percentile bands for the liquid portfolio
    Simulate {
        file: PathBuf,
        #[arg(long)]
        paths: Option<usize>,
        #[arg(long)]
        years: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
        /// Draw monthly returns instead of annual ones
        #[arg(long)]
        monthly: bool,
        /// Simulate the domestic and international segments separately
        #[arg(long)]
        segments: bool,
    },
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".wealthplan")
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let data_dir = args.data_dir.unwrap_or_else(default_data_dir);

    init_logging(&data_dir, &args.log_level)?;

    let output = match args.command {
        Command::Project {
            file,
            real,
            cash_flow,
            json,
        } => commands::project_command(
            &file,
            &ProjectOptions {
                real,
                cash_flow,
                json,
            },
        )?,
        Command::Risk {
            interactive: true, ..
        } => {
            let outcome = commands::interactive_risk(&mut io::stdin().lock(), &mut io::stdout())?;
            wealthplan::report::risk_summary(&outcome)
        }
        Command::Risk { file, .. } => match file {
            Some(file) => commands::risk_command(&file)?,
            None => color_eyre::eyre::bail!("a household file is required without --interactive"),
        },
        Command::Baseline { file } => commands::baseline_command(&file)?,
        Command::Simulate {
            file,
            paths,
            years,
            seed,
            monthly,
            segments,
        } => commands::simulate_command(
            &file,
            &SimulateOptions {
                paths,
                years,
                seed,
                monthly,
                segments,
            },
        )?,
    };

    print!("{output}");
    tracing::info!("wealthplan finished");
    Ok(())
}
