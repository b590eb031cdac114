mod app;
mod command;
mod config;
mod consts;
mod engine;
mod game;
mod menu;
mod settings;
mod util;
use crate::app::App;
use crate::config::Config;
use crate::util::Globals;
use anyhow::Context;
use lexopt::{Arg, Parser, ValueExt};
use log::LevelFilter;
use rand::{rngs::StdRng, SeedableRng};
use simplelog::WriteLogger;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const USAGE: &str = "\
Usage: gridsnake [<options>]

Play snake on a configurable grid in the terminal

Options:
  -c, --config <PATH>    Read configuration from the given file
      --log-file <PATH>  Write log messages to the given file
      --seed <N>         Seed the random number generator for reproducible
                         food placement
  -h, --help             Display this help message and exit
  -V, --version          Show the program version and exit
";

#[derive(Clone, Debug, Eq, PartialEq)]
enum Cli {
    Run(Arguments),
    Help,
    Version,
}

impl Cli {
    fn from_parser(mut parser: Parser) -> Result<Cli, lexopt::Error> {
        let mut args = Arguments::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('c') | Arg::Long("config") => {
                    args.config = Some(PathBuf::from(parser.value()?));
                }
                Arg::Long("log-file") => args.log_file = Some(PathBuf::from(parser.value()?)),
                Arg::Long("seed") => args.seed = Some(parser.value()?.parse()?),
                Arg::Short('h') | Arg::Long("help") => return Ok(Cli::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Cli::Version),
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Cli::Run(args))
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct Arguments {
    config: Option<PathBuf>,
    log_file: Option<PathBuf>,
    seed: Option<u64>,
}

fn main() -> ExitCode {
    match Cli::from_parser(Parser::from_env()) {
        Ok(Cli::Run(args)) => match run(args) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) if is_broken_pipe(&e) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("gridsnake: {e:?}");
                ExitCode::from(2)
            }
        },
        Ok(Cli::Help) => {
            print!("{USAGE}");
            ExitCode::SUCCESS
        }
        Ok(Cli::Version) => {
            println!("gridsnake {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("gridsnake: {e}");
            eprint!("{USAGE}");
            ExitCode::from(2)
        }
    }
}

fn run(args: Arguments) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    if let Some(path) = args.log_file.or_else(|| config.logging.log_file()) {
        if let Err(e) = init_logging(&path, config.logging.level) {
            eprintln!("gridsnake: warning: logging disabled: {e:#}");
        }
    }
    log::info!("Starting gridsnake {}", env!("CARGO_PKG_VERSION"));
    let rng = match args.seed {
        Some(seed) => {
            log::info!("Using random seed {seed}");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::try_from_os_rng().context("failed to seed random number generator")?,
    };
    let globals = Globals::new(config.settings, rng);
    let terminal = ratatui::init();
    let r = App::new(globals).run(terminal);
    ratatui::restore();
    r.context("terminal I/O failed")
}

/// Load the configuration file given on the command line or, if there is
/// none, the default configuration file if it exists
fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let (path, allow_missing) = match path {
        Some(p) => (p.to_path_buf(), false),
        None => match Config::default_path() {
            Ok(p) => (p, true),
            Err(_) => return Ok(Config::default()),
        },
    };
    Config::load(&path, allow_missing)
        .with_context(|| format!("failed to load configuration from {}", path.display()))
}

fn init_logging(path: &Path, level: LevelFilter) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs_err::create_dir_all(parent)?;
    }
    let file = fs_err::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    WriteLogger::init(level, simplelog::Config::default(), file)
        .context("failed to install logger")?;
    Ok(())
}

fn is_broken_pipe(e: &anyhow::Error) -> bool {
    e.downcast_ref::<io::Error>()
        .is_some_and(|e| e.kind() == ErrorKind::BrokenPipe)
}
