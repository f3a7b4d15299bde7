//! sqlgen - decode, prompt and evaluate WikiSQL-style queries
//!
//! ```text
//! sqlgen decode <schema.json> <query>
//! sqlgen prompt <format> <schema.json> <question>
//! sqlgen eval
//! ```

use anyhow::Context;
use sqlgen_decode::decode_with;
use sqlgen_eval::{load_predictions, load_rows, Evaluator, MemoryEngine};
use sqlgen_ir::TableSchema;
use sqlgen_prompt::FormatRegistry;
use thiserror::Error;
use tracing::info;

mod config;
mod logging;

use config::Config;

const USAGE: &str = "usage: sqlgen decode <schema.json> <query> | sqlgen prompt <format> <schema.json> <question> | sqlgen eval";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Decode { schema: String, query: String },
    Prompt { format: String, schema: String, question: String },
    Eval,
}

#[derive(Debug, Error, PartialEq, Eq)]
enum UsageError {
    #[error("missing command")]
    MissingCommand,

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("wrong number of arguments for {0}")]
    Arity(&'static str),
}

fn parse_args(args: &[String]) -> Result<Command, UsageError> {
    let (command, rest) = args.split_first().ok_or(UsageError::MissingCommand)?;
    match (command.as_str(), rest) {
        ("decode", [schema, query]) => Ok(Command::Decode {
            schema: schema.clone(),
            query: query.clone(),
        }),
        ("decode", _) => Err(UsageError::Arity("decode")),
        ("prompt", [format, schema, question]) => Ok(Command::Prompt {
            format: format.clone(),
            schema: schema.clone(),
            question: question.clone(),
        }),
        ("prompt", _) => Err(UsageError::Arity("prompt")),
        ("eval", []) => Ok(Command::Eval),
        ("eval", _) => Err(UsageError::Arity("eval")),
        (other, _) => Err(UsageError::UnknownCommand(other.to_string())),
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match parse_args(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    };

    let config_path = Config::path_from_env();
    let config = Config::load_or_default(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    config.apply_logging_env();
    logging::init();

    match command {
        Command::Decode { schema, query } => run_decode(&config, &schema, &query),
        Command::Prompt { format, schema, question } => run_prompt(&format, &schema, &question),
        Command::Eval => run_eval(&config),
    }
}

fn run_decode(config: &Config, schema_path: &str, query: &str) -> anyhow::Result<()> {
    let schema = TableSchema::load(schema_path).with_context(|| format!("loading schema {}", schema_path))?;
    let decoded = decode_with(query, &schema.column_names(), &config.decode_options()?)?;
    println!("{}", serde_json::to_string_pretty(&decoded)?);
    Ok(())
}

fn run_prompt(format: &str, schema_path: &str, question: &str) -> anyhow::Result<()> {
    let schema = TableSchema::load(schema_path).with_context(|| format!("loading schema {}", schema_path))?;
    let registry = FormatRegistry::new();
    println!("{}", registry.lookup(format)?.format(question, &schema));
    Ok(())
}

fn run_eval(config: &Config) -> anyhow::Result<()> {
    let eval = &config.eval;
    let rows = load_rows(&eval.dataset).with_context(|| format!("loading dataset {}", eval.dataset.display()))?;
    let predictions = load_predictions(&eval.predictions)
        .with_context(|| format!("loading predictions {}", eval.predictions.display()))?;
    let engine = MemoryEngine::load(&eval.tables).with_context(|| format!("loading tables {}", eval.tables.display()))?;

    info!(rows = rows.len(), predictions = predictions.len(), tables = engine.len(), "Inputs loaded");

    let report = Evaluator::new(&engine, config.eval_options()?).evaluate(&rows, &predictions)?;
    println!("{}", report.to_json()?);

    if let Some(path) = &eval.report {
        report.write_json(path)?;
        info!(path = %path.display(), "Report written");
    }
    Ok(())
}
