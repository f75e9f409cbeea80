//! Command-line argument parsing.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

pub const USAGE: &str = "\
Usage: dailyshelf [COMMAND] [OPTIONS]

Commands:
  today            Show today's quick read, quote and stories (default)
  complete <N>     Mark story N of today's microlearning set as finished
  status           Show which daily picks are stored for today
  reset            Forget today's picks and completion marks
  help             Show this message

Options:
  --catalog <PATH>   Book catalog JSON (default: data/books.json)
  --data-dir <PATH>  Where daily picks are stored";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Today,
    Complete(usize),
    Status,
    Reset,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub command: Command,
    pub catalog: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
}

impl Args {
    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut command = None;
        let mut catalog = None;
        let mut data_dir = None;

        let mut iter = args.into_iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--catalog" => {
                    let path = iter.next().context("--catalog needs a path")?;
                    catalog = Some(PathBuf::from(path));
                }
                "--data-dir" => {
                    let path = iter.next().context("--data-dir needs a path")?;
                    data_dir = Some(PathBuf::from(path));
                }
                "-h" | "--help" | "help" => command = Some(Command::Help),
                "today" => command = Some(Command::Today),
                "status" => command = Some(Command::Status),
                "reset" => command = Some(Command::Reset),
                "complete" => {
                    let number = iter.next().context("complete needs a story number")?;
                    let number: usize = number
                        .parse()
                        .with_context(|| format!("Invalid story number: {}", number))?;
                    if number == 0 {
                        bail!("Story numbers start at 1");
                    }
                    command = Some(Command::Complete(number));
                }
                other => bail!("Unknown argument: {}", other),
            }
        }

        Ok(Self {
            command: command.unwrap_or(Command::Today),
            catalog,
            data_dir,
        })
    }
}
