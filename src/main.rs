//! Config Templates CLI
//!
//! Usage:
//!   config-templates [OPTIONS] <PATH>
//!
//! Options:
//!   -d, --template-dir <DIR>   Custom template directory (repeatable, priority order)
//!   -s, --set <PATH=VALUE>     Override a sub-path with a YAML value (repeatable)
//!   -f, --overrides <FILE>     YAML mapping of override paths to values
//!   -h, --help                 Print help

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde_yaml::Value;

use config_templates::{Overrides, TemplateResolver};

#[derive(Parser)]
#[command(name = "config-templates")]
#[command(about = "Resolve dotted-path configuration templates")]
struct Cli {
    /// Template path, e.g. `tags/init_config.value.example`
    path: String,

    /// Custom template directory, consulted before the built-in set (repeatable)
    #[arg(short = 'd', long = "template-dir")]
    template_dirs: Vec<PathBuf>,

    /// Override a sub-path of the resolved template, VALUE parsed as YAML
    #[arg(short = 's', long = "set", value_name = "PATH=VALUE")]
    set: Vec<String>,

    /// YAML file containing a mapping of override paths to values
    #[arg(short = 'f', long = "overrides", value_name = "FILE")]
    overrides_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut overrides = Overrides::new();

    if let Some(path) = &cli.overrides_file {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading overrides file '{}': {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        };
        match serde_yaml::from_str::<Overrides>(&content) {
            Ok(parsed) => overrides.extend(parsed),
            Err(e) => {
                eprintln!("Error parsing overrides file '{}': {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        }
    }

    for entry in &cli.set {
        let Some((key, raw_value)) = entry.split_once('=') else {
            eprintln!("Error: override '{}' is not of the form PATH=VALUE", entry);
            return ExitCode::FAILURE;
        };
        match serde_yaml::from_str::<Value>(raw_value) {
            Ok(value) => {
                overrides.insert(key.to_string(), value);
            }
            Err(e) => {
                eprintln!("Error parsing override value '{}': {}", raw_value, e);
                return ExitCode::FAILURE;
            }
        }
    }

    let mut resolver = TemplateResolver::with_paths(cli.template_dirs);
    let node = match resolver.load_with_overrides(&cli.path, &overrides) {
        Ok(node) => node,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match serde_yaml::to_string(&node) {
        Ok(rendered) => {
            print!("{}", rendered);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error rendering result: {}", e);
            ExitCode::FAILURE
        }
    }
}
