mod play;
mod prompt;
mod render;

use std::fmt;
use std::sync::Arc;

use services::{OpenTdbClient, QuestionSource, TriviaConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;
use trivia_core::model::{CategoryCatalog, Difficulty};

use play::{Preset, Terminal};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidCategory { raw: String },
    InvalidDifficulty { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::InvalidCategory { raw } => write!(f, "invalid --category value: {raw}"),
            ArgsError::InvalidDifficulty { raw } => {
                write!(f, "invalid --difficulty value: {raw} (expected easy, medium or hard)")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  app play [--category <name>] [--difficulty <easy|medium|hard>]");
    eprintln!("  app categories");
    eprintln!();
    eprintln!("Missing selections are asked for interactively. `play` is the default.");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  TRIVIA_API_URL, TRIVIA_HTTP_TIMEOUT_SECS, TRIVIA_MIN_INTERVAL_MS,");
    eprintln!("  QUIZ_QUESTION_COUNT, QUIZ_TIME_LIMIT_SECS, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Play,
    Categories,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "play" => Some(Self::Play),
            "categories" => Some(Self::Categories),
            _ => None,
        }
    }
}

fn parse_play(
    args: &mut impl Iterator<Item = String>,
    catalog: &CategoryCatalog,
) -> Result<Preset, ArgsError> {
    let mut preset = Preset::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--category" => {
                let value = require_value(args, "--category")?;
                let category = catalog
                    .find(&value)
                    .map_err(|_| ArgsError::InvalidCategory { raw: value.clone() })?;
                preset.category = Some(category.clone());
            }
            "--difficulty" => {
                let value = require_value(args, "--difficulty")?;
                let difficulty: Difficulty = value
                    .parse()
                    .map_err(|_| ArgsError::InvalidDifficulty { raw: value.clone() })?;
                preset.difficulty = Some(difficulty);
            }
            _ => return Err(ArgsError::UnknownArg(arg)),
        }
    }

    Ok(preset)
}

fn parse_command(argv: &mut Vec<String>) -> Result<Option<Command>, ArgsError> {
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Play,
        Some("--help" | "-h") => return Ok(None),
        Some(first) if first.starts_with("--") => return Ok(Some(Command::Play)),
        Some(first) => {
            Command::from_arg(first).ok_or_else(|| ArgsError::UnknownCommand(first.to_owned()))?
        }
    };
    if !argv.is_empty() {
        argv.remove(0);
    }
    Ok(Some(cmd))
}

fn usage_error(err: ArgsError) -> ArgsError {
    eprintln!("{err}");
    print_usage();
    err
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // Logs go to stderr so they never interleave with the quiz on stdout.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();
    let catalog = CategoryCatalog::reference();

    let cmd = match parse_command(&mut argv) {
        Ok(Some(cmd)) => cmd,
        Ok(None) => {
            print_usage();
            return Ok(());
        }
        Err(err) => return Err(usage_error(err).into()),
    };

    let mut iter = argv.into_iter();
    let preset = match cmd {
        Command::Play => parse_play(&mut iter, &catalog),
        Command::Categories => iter
            .next()
            .map_or(Ok(Preset::default()), |extra| Err(ArgsError::UnknownArg(extra))),
    }
    .map_err(usage_error)?;

    match cmd {
        Command::Categories => {
            print!("{}", render::categories(&catalog));
            Ok(())
        }
        Command::Play => {
            let config = TriviaConfig::from_env();
            info!(
                api = %config.provider.base_url,
                min_interval = ?config.min_request_interval,
                questions = config.quiz.question_count,
                "starting trivia client"
            );

            let client = OpenTdbClient::new(config.provider.clone())?;
            let source = Arc::new(
                QuestionSource::new(Arc::new(client))
                    .with_min_interval(config.min_request_interval),
            );

            let mut term = Terminal::stdio();
            play::run(source, &catalog, config.quiz, preset, &mut term).await?;
            println!();
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
