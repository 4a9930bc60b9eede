use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};
use memmap2::Mmap;

use rox::ast_printer::AstPrinter;
use rox::error::{LoxError, RunError};
use rox::lox::Lox;
use rox::parser::Parser;
use rox::scanner::Scanner;

#[derive(ClapParser, Debug)]
#[command(version, about = "Lox language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to app.log
    #[arg(long, global = true)]
    log: bool,

    /// Write the log somewhere other than app.log (implies --log)
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize {
        filename: PathBuf,

        /// Print one JSON object per token
        #[arg(long)]
        json: bool,
    },

    /// Parses input from a file and prints each statement's syntax tree
    Parse { filename: PathBuf },

    /// Runs input from a file as a Lox program, or starts a prompt
    Run { filename: Option<PathBuf> },
}

/// Maps the file and checks that it is UTF-8.
fn read_file(filename: &Path) -> Result<String> {
    info!("Reading file: {:?}", filename);
    let file = File::open(filename).context(format!("Failed to open file {:?}", filename))?;

    // SAFETY: the map is read once and copied out before the file is dropped.
    let map = unsafe { Mmap::map(&file) }.context(format!("Failed to map file {:?}", filename))?;

    let source = std::str::from_utf8(&map)
        .context(format!("File {:?} is not valid UTF-8", filename))?
        .to_owned();

    info!("Read {} bytes from {:?}", source.len(), filename);

    Ok(source)
}

fn init_logger(path: &Path) -> Result<()> {
    // Create or open the log file
    let log_file = File::create(path).context(format!("Failed to create {:?}", path))?;

    // Configure env_logger to write to file with module and source line
    Builder::new()
        .format(|buf, record| {
            // Strip 'rox::' from module path
            let module = record.module_path().unwrap_or("<unnamed>");
            writeln!(
                buf,
                "[{}:{}] - {}",
                module.strip_prefix("rox::").unwrap_or(module),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug) // Default to Debug, override with RUST_LOG
        .parse_default_env()
        .init();

    info!("Logger initialized, writing to {:?}", path);
    Ok(())
}

fn tokenize(filename: &Path, json: bool) -> Result<i32> {
    info!("Running Tokenize subcommand");
    let source = read_file(filename)?;
    let mut tokenized = true;

    for token in Scanner::new(&source) {
        match token {
            Ok(token) => {
                if json {
                    println!("{}", serde_json::to_string(&token)?);
                } else {
                    println!("{}", token);
                }
            }

            Err(e) => {
                tokenized = false;
                debug!("Tokenization debug: {}", e);
                eprintln!("{}", e);
            }
        }
    }

    if !tokenized {
        debug!("Tokenization failed, exiting with code 65");
        return Ok(65);
    }

    info!("Tokenization completed successfully");
    Ok(0)
}

fn parse(filename: &Path) -> Result<i32> {
    info!("Running Parse subcommand");
    let source = read_file(filename)?;

    let (tokens, mut diagnostics) = Scanner::new(&source).scan_tokens();
    let (statements, parse_errors) = Parser::new(&tokens).parse();
    diagnostics.extend(parse_errors);

    if !diagnostics.is_empty() {
        debug!("Parse failed with {} error(s)", diagnostics.len());
        eprintln!("{}", diagnostics);
        return Ok(65);
    }

    for stmt in &statements {
        println!("{}", AstPrinter::print_stmt(stmt));
    }

    info!("Parse subcommand completed");
    Ok(0)
}

fn run_file(filename: &Path) -> Result<i32> {
    info!("Running Run subcommand");
    let source = read_file(filename)?;

    match Lox::new().run(&source) {
        Ok(()) => {
            info!("Program executed successfully");
            Ok(0)
        }

        Err(e) => {
            debug!("Run failed: {}", e);
            eprintln!("{}", e);
            Ok(e.exit_code())
        }
    }
}

/// One session for the whole prompt, so definitions carry over between lines.
fn run_prompt() -> Result<i32> {
    info!("Starting interactive prompt");

    let mut lox = Lox::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush().context("Failed to flush prompt")?;

        let Some(line) = lines.next() else {
            println!();
            break;
        };
        let line = line.context("Failed to read from stdin")?;

        if let Err(e) = lox.run(&line) {
            debug!("Prompt line failed: {}", e);
            eprintln!("{}", e);

            if let RunError::Runtime(LoxError::Io(_)) = &e {
                return Ok(e.exit_code());
            }
        }
    }

    info!("Prompt closed");
    Ok(0)
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    // Initialize logger only if --log or --log-file is provided
    match (&args.log_file, args.log) {
        (Some(path), _) => init_logger(path)?,
        (None, true) => init_logger(Path::new("app.log"))?,
        (None, false) => {
            // Initialize a minimal logger to avoid "no logger" errors
            Builder::new().filter_level(log::LevelFilter::Off).init();
        }
    }

    info!("CLI arguments: {:?}", args);

    let code: i32 = match &args.commands {
        Commands::Tokenize { filename, json } => tokenize(filename, *json)?,
        Commands::Parse { filename } => parse(filename)?,
        Commands::Run {
            filename: Some(filename),
        } => run_file(filename)?,
        Commands::Run { filename: None } => run_prompt()?,
    };

    if code != 0 {
        std::process::exit(code);
    }

    Ok(())
}
