use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use log::{LevelFilter, info};

mod commands;

use commands::IoParameters;
use commands::{info as info_cmd, perceive, replicate, transform, validate, wrap};

#[derive(Parser, Debug)]
#[command(
    name = "cellforge",
    about = "A command-line tool for lattice geometry, periodic bond perception, and supercell replication of crystal structures.",
    version,
    author,
    arg_required_else_help = true
)]
struct Cli {
    /// Input structure document (JSON). When omitted, stdin is used.
    #[arg(short, long, value_name = "FILE", global = true)]
    input: Option<PathBuf>,
    /// Output file path. When omitted, stdout is used.
    #[arg(short, long, value_name = "FILE", global = true)]
    output: Option<PathBuf>,
    /// Emit single-line JSON instead of pretty-printed output.
    #[arg(long, global = true)]
    compact: bool,
    /// Increase log verbosity (-v for info, -vv for debug, -vvv for trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Inspect the structure without modifying the data stream.
    Info(info_cmd::InfoArgs),
    /// Apply centering, rotation, and translation transforms.
    Transform(transform::TransformArgs),
    /// Wrap atom coordinates into the primary unit cell.
    Wrap(wrap::WrapArgs),
    /// Assign minimum-image offsets to periodic bonds.
    Perceive(perceive::PerceiveArgs),
    /// Tile the unit cell into an NA x NB x NC supercell.
    Replicate(replicate::ReplicateArgs),
    /// Report atom, bond, and connected-component counts.
    Validate(validate::ValidateArgs),
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.as_str()))
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let io_params = IoParameters {
        input: cli.input.clone(),
        output: cli.output.clone(),
        compact: cli.compact,
    };

    match cli.command {
        Command::Info(args) => {
            let structure = commands::load_input(&io_params)?;
            info_cmd::run(&structure, &args)?;
            if !commands::interactive_stdout_requested(&io_params) {
                commands::save_output(&structure, &io_params)?;
            }
        }
        Command::Transform(args) => {
            commands::ensure_noninteractive_stdout("transform", &io_params)?;
            let structure = commands::load_input(&io_params)?;
            let transformed = transform::run(&structure, &args)?;
            commands::save_output(&transformed, &io_params)?;
        }
        Command::Wrap(args) => {
            commands::ensure_noninteractive_stdout("wrap", &io_params)?;
            let structure = commands::load_input(&io_params)?;
            let wrapped = wrap::run(&structure, &args)?;
            commands::save_output(&wrapped, &io_params)?;
        }
        Command::Perceive(args) => {
            commands::ensure_noninteractive_stdout("perceive", &io_params)?;
            let structure = commands::load_input(&io_params)?;
            let perceived = perceive::run(&structure, &args)?;
            commands::save_output(&perceived, &io_params)?;
        }
        Command::Replicate(args) => {
            commands::ensure_noninteractive_stdout("replicate", &io_params)?;
            let structure = commands::load_input(&io_params)?;
            let supercell = replicate::run(&structure, &args)?;
            info!("{supercell}");
            commands::save_output(supercell.structure(), &io_params)?;
        }
        Command::Validate(args) => {
            let structure = commands::load_input(&io_params)?;
            let report = validate::run(&structure, &args)?;
            commands::save_output(&report, &io_params)?;
        }
    }

    Ok(())
}
