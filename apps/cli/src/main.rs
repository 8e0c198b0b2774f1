mod args;
mod config;
mod dirs;

use std::io;

use args::Command;
use playtime_app::{AppPaths, Ledger, open_ledger};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = args::parse_args().map_err(|err| {
        eprintln!("{err}");
        args::print_help();
        io::Error::new(io::ErrorKind::InvalidInput, "invalid arguments")
    })?;
    if args.command == Command::Help {
        args::print_help();
        return Ok(());
    }
    init_tracing(args.verbose);

    let config = config::load_or_create().map_err(io::Error::other)?;
    if config.created {
        eprintln!("Created config at {}.", config.paths.file.display());
    }

    let override_dir = args.data_dir.as_deref().or(config.config.data_dir.as_deref());
    let data_dir = dirs::resolve_data_dir(override_dir).map_err(io::Error::other)?;
    tracing::debug!(
        dir = %data_dir.dir.display(),
        from_override = data_dir.from_override,
        "using data dir"
    );

    let paths = AppPaths::new(data_dir.dir);
    let ledger = open_ledger(&paths)?;
    run(&ledger, args.command)
}

fn run(ledger: &Ledger, command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Add {
            id,
            label,
            duration_ms,
        } => {
            ledger.try_accumulate(id, &label, duration_ms)?;
            println!("{}\t{}", id, ledger.query(id));
        }
        Command::Show { id } => {
            println!("{}", ledger.query(id));
        }
        Command::List => {
            for record in ledger.records() {
                println!("{}\t{}\t{}", record.id, record.formatted(), record.label);
            }
        }
        Command::Delete { id } => {
            ledger.try_delete(id)?;
        }
        Command::Help => args::print_help(),
    }
    Ok(())
}
