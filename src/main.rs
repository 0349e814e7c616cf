use std::{
    env, fs,
    io::{self, Read},
};

use extend::{
    config::{self, RuntimeConfig},
    runtime::{builtins::get_builtin, value::Value},
};
use tracing_subscriber::EnvFilter;

const OPERATIONS: &[&str] = &["sorted", "keys", "values", "items", "pairs", "len", "type"];

fn main() {
    let mut args: Vec<String> = env::args().collect();
    let reverse = args.iter().any(|arg| arg == "--reverse");
    if reverse {
        args.retain(|arg| arg != "--reverse");
    }
    let config = match extract_config(&mut args) {
        Some(config) => config,
        None => std::process::exit(1),
    };

    init_tracing(&config.log_filter);

    if args.len() < 2 {
        print_help();
        return;
    }

    let operation = args[1].as_str();
    if matches!(operation, "-h" | "--help" | "help") {
        print_help();
        return;
    }
    if !OPERATIONS.contains(&operation) {
        eprintln!("Error: unknown operation `{}`", operation);
        print_help();
        std::process::exit(1);
    }

    let source = match read_input(args.get(2).map(String::as_str)) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Error: could not read input: {}", err);
            std::process::exit(1);
        }
    };
    let document: serde_json::Value = match serde_json::from_str(&source) {
        Ok(document) => document,
        Err(err) => {
            eprintln!("Error: input is not valid JSON: {}", err);
            std::process::exit(1);
        }
    };

    let result = config::with_config(config, || apply(operation, Value::from(document), reverse));
    match result {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(rendered) => println!("{}", rendered),
            Err(err) => {
                eprintln!("Error: could not render result: {}", err);
                std::process::exit(1);
            }
        },
        Err(message) => {
            eprintln!("{}", message);
            std::process::exit(1);
        }
    }
}

fn apply(operation: &str, value: Value, reverse: bool) -> Result<Value, String> {
    let name = if operation == "type" { "type_of" } else { operation };
    let builtin = get_builtin(name).ok_or_else(|| format!("Error: no builtin `{}`", name))?;
    let call_args = if name == "sorted" {
        vec![value, Value::None, Value::Boolean(reverse)]
    } else {
        vec![value]
    };
    builtin.call(call_args).map_err(|err| err.to_string())
}

fn read_input(path: Option<&str>) -> io::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut source = String::new();
            io::stdin().read_to_string(&mut source)?;
            Ok(source)
        }
    }
}

/// Removes `--config <file>` from `args` and loads it; the environment
/// provides the configuration otherwise.
fn extract_config(args: &mut Vec<String>) -> Option<RuntimeConfig> {
    let Some(position) = args.iter().position(|arg| arg == "--config") else {
        return Some(RuntimeConfig::from_env());
    };
    if position + 1 >= args.len() {
        eprintln!("Error: --config expects a file path.");
        return None;
    }
    let path = args.remove(position + 1);
    args.remove(position);
    let source = match fs::read_to_string(&path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Error: could not read config {}: {}", path, err);
            return None;
        }
    };
    match RuntimeConfig::from_json_str(&source) {
        Ok(config) => Some(config),
        Err(err) => {
            eprintln!("Error: invalid config {}: {}", path, err);
            None
        }
    }
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn print_help() {
    println!(
        "\
Extend CLI

Usage:
  extend <operation> [file.json]

Reads a JSON document from the file (or stdin), applies one operation and
prints the JSON result.

Operations:
  sorted   Sorted copy of a list, or the sorted values of a map
  keys     Indices of a list, or the keys of a map
  values   Values as a list
  items    {{key, value}} maps
  pairs    [key, value] pairs
  len      Number of elements, keys or characters
  type     Coarse type label

Flags:
  --reverse          Sort in descending order (sorted only)
  --config <file>    Load runtime settings from a JSON file

Environment:
  RUST_LOG                 Log filter (default from config, `warn`)
  EXTEND_WARN_REDECLARE    Warn when a class name is registered twice
  EXTEND_REPORT_ERRORS     Report callback errors before they propagate
  EXTEND_LOG               Default log filter
"
    );
}
