use std::env;

use playtime_core::parse_duration_ms;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add {
        id: u64,
        label: String,
        duration_ms: u64,
    },
    Show {
        id: u64,
    },
    List,
    Delete {
        id: u64,
    },
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub data_dir: Option<String>,
    pub verbose: bool,
    pub command: Command,
}

pub fn parse_args() -> Result<CliArgs, String> {
    parse_from(env::args().skip(1))
}

pub fn parse_from(args: impl IntoIterator<Item = String>) -> Result<CliArgs, String> {
    let mut args = args.into_iter();
    let mut data_dir = None;
    let mut verbose = false;
    let mut positional = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--data-dir" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --data-dir".to_string())?;
                data_dir = Some(value);
            }
            "--verbose" | "-v" => {
                verbose = true;
            }
            "--help" | "-h" => {
                return Ok(CliArgs {
                    data_dir,
                    verbose,
                    command: Command::Help,
                });
            }
            value if value.starts_with("--") => {
                return Err(format!("unknown argument: {value}"));
            }
            _ => positional.push(arg),
        }
    }

    let command = parse_command(&positional)?;
    Ok(CliArgs {
        data_dir,
        verbose,
        command,
    })
}

fn parse_command(positional: &[String]) -> Result<Command, String> {
    let Some((name, rest)) = positional.split_first() else {
        return Err("missing command".to_string());
    };
    match (name.as_str(), rest) {
        ("add", [id, label, duration]) => Ok(Command::Add {
            id: parse_title_id(id)?,
            label: label.clone(),
            duration_ms: parse_duration_ms(duration)
                .ok_or_else(|| format!("invalid duration: {duration}"))?,
        }),
        ("show", [id]) => Ok(Command::Show {
            id: parse_title_id(id)?,
        }),
        ("list", []) => Ok(Command::List),
        ("delete", [id]) => Ok(Command::Delete {
            id: parse_title_id(id)?,
        }),
        ("add" | "show" | "list" | "delete", _) => {
            Err(format!("wrong number of arguments for {name}"))
        }
        _ => Err(format!("unknown command: {name}")),
    }
}

/// Title ids are accepted in decimal or as `0x`-prefixed hex.
pub fn parse_title_id(value: &str) -> Result<u64, String> {
    let parsed = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => value.parse::<u64>(),
    };
    parsed.map_err(|_| format!("invalid title id: {value}"))
}

pub fn print_help() {
    println!(
        "Playtime Ledger\n\n\
Usage:\n  playtime [--data-dir <path>] [--verbose] <command>\n\n\
Commands:\n  add <id> <label> <duration>  Record a finished session (ms or 1h2m5s)\n  show <id>                    Print the total play time of a title\n  list                         Print every tracked title\n  delete <id>                  Forget a title\n\n\
Options:\n  --data-dir <path>  Override the configured data dir for this run only\n  -v, --verbose      Log ledger activity to stderr\n  -h, --help         Show this help message\n"
    );
}
