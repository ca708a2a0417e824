use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use pascheck::{CheckError, Dictionary, check, tokenize};

mod report;

use report::Presenter;

#[derive(Parser)]
#[command(name = "pascheck")]
#[command(about = "Checker for a small Pascal-like teaching language", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Проверяет программу и печатает найденную ошибку
    Check {
        /// Исходник
        input: PathBuf,

        /// Свой словарь категорий (JSON)
        #[arg(short, long)]
        dictionary: Option<PathBuf>,

        /// Без цветной подсветки
        #[arg(long)]
        no_color: bool,
    },

    /// Показать лексемы без проверки
    Tokens {
        /// Исходник
        input: PathBuf,

        #[arg(short, long)]
        dictionary: Option<PathBuf>,
    },

    /// Список категорий словаря
    Categories {
        #[arg(short, long)]
        dictionary: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}

fn run(command: Commands) -> Result<ExitCode, CheckError> {
    match command {
        Commands::Check { input, dictionary, no_color } => {
            let dictionary = load_dictionary(dictionary.as_deref())?;
            let source = read_source(&input)?;
            info!(file = %input.display(), "checking");

            let diagnostics = check(&source, &dictionary);
            let presenter = Presenter::new(!no_color);
            if diagnostics.is_empty() {
                println!("{}", presenter.success());
                return Ok(ExitCode::SUCCESS);
            }
            for diagnostic in &diagnostics {
                println!("{}", presenter.diagnostic(diagnostic));
            }
            Ok(ExitCode::FAILURE)
        }
        Commands::Tokens { input, dictionary } => {
            let dictionary = load_dictionary(dictionary.as_deref())?;
            let source = read_source(&input)?;
            for lexeme in tokenize(&source, &dictionary) {
                println!(
                    "{:>4}:{:<4} {:<18} {}",
                    lexeme.position.row,
                    lexeme.position.col,
                    lexeme.category.name(),
                    lexeme.text
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Categories { dictionary } => {
            let dictionary = load_dictionary(dictionary.as_deref())?;
            for (category, words) in dictionary.categories() {
                println!("  {:<18} - {}", category.name(), words.join(" "));
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_dictionary(path: Option<&Path>) -> Result<Dictionary, CheckError> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading dictionary");
            Dictionary::load(path)
        }
        None => Ok(Dictionary::builtin().clone()),
    }
}

fn read_source(path: &Path) -> Result<String, CheckError> {
    fs::read_to_string(path).map_err(|source| CheckError::IoError {
        path: path.to_path_buf(),
        source,
    })
}

/// Логи в stderr, фильтр из PASCHECK_LOG или RUST_LOG.
fn init_tracing() {
    let filter = std::env::var("PASCHECK_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .ok()
        .and_then(|expr| EnvFilter::try_new(expr).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}
