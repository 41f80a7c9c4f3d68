mod app;
mod calendar;
mod config;
mod dates;
mod form;
mod help;
mod logging;
mod popup;
mod storage;
mod store;
mod task;
mod tasklist;
#[cfg(test)]
mod testing;
mod theme;
use crate::app::App;
use crate::config::Config;
use crate::dates::parse_ymd;
use crate::storage::FileStorage;
use anyhow::Context;
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use std::path::PathBuf;
use time::{Date, OffsetDateTime};

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run {
        data_dir: Option<PathBuf>,
        date: Option<Date>,
    },
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut data_dir = None;
        let mut date = None;
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('d') | Arg::Long("data-dir") => {
                    data_dir = Some(PathBuf::from(parser.value()?));
                }
                Arg::Value(value) if date.is_none() => {
                    let value = value.string()?;
                    match parse_ymd(&value) {
                        Ok(d) => date = Some(d),
                        Err(e) => {
                            return Err(lexopt::Error::ParsingFailed {
                                value,
                                error: Box::new(e),
                            })
                        }
                    }
                }
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run { data_dir, date })
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run { data_dir, date } => {
                let today = OffsetDateTime::now_local()
                    .context("failed to determine local date")?
                    .date();
                let config = Config::new(data_dir);
                config.ensure_data_dir().with_context(|| {
                    format!(
                        "failed to create data directory {}",
                        config.data_dir().display()
                    )
                })?;
                if let Err(e) = logging::init(&config.log_path()) {
                    eprintln!("daytasks: logging disabled: {e:#}");
                }
                log::info!("Starting with data directory {}", config.data_dir().display());
                let storage = FileStorage::open(config.storage_path());
                with_terminal(|mut terminal| {
                    terminal.hide_cursor().context("failed to hide cursor")?;
                    App::new(storage, today, date.unwrap_or(today)).run(&mut terminal)?;
                    Ok(())
                })
            }
            Command::Help => {
                println!("Usage: daytasks [-d DIR] [YYYY-MM-DD]");
                println!();
                println!("Terminal calendar for keeping short per-day task lists");
                println!();
                println!("Options:");
                println!("  -d, --data-dir DIR  Keep tasks and settings in DIR");
                println!("  -h, --help          Display this help message and exit");
                println!("  -V, --version       Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = func(terminal);
    ratatui::restore();
    r
}
