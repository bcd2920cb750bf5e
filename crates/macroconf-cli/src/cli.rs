//! macroconf CLI - Command-line interface for configurable macro documents
//!
//! Usage:
//!   macroconf render macro.txt --set speed=7 --set button=B
//!   macroconf render macro.txt --values values.yaml -o out.txt
//!   macroconf describe macro.txt --format json
//!   macroconf check macros/*.txt

use clap::{Parser, Subcommand};
use colored::Colorize;
use indexmap::IndexMap;
use macroconf_core::{ConfigOption, ParsedMacro, RawValues, Scalar};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// macroconf - Render macro documents with user-supplied options
#[derive(Parser)]
#[command(name = "macroconf")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve option values and substitute them into the macro body
    Render {
        /// Macro document to render
        file: PathBuf,

        /// Option value as id=value (repeatable, overrides --values)
        #[arg(short, long = "set", value_name = "ID=VALUE")]
        set: Vec<String>,

        /// YAML or JSON file mapping option ids to values
        #[arg(long)]
        values: Option<PathBuf>,

        /// Write to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the options a macro declares
    Describe {
        /// Macro document
        file: PathBuf,

        /// Output format: text, yaml, json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show the values a macro renders with when none are supplied
    Defaults {
        /// Macro document
        file: PathBuf,

        /// Output format: text, yaml, json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Check that macros parse and only reference declared options
    Check {
        /// Macro document(s) to check
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

/// Run the CLI with the process arguments
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Render {
            file,
            set,
            values,
            output,
        } => cmd_render(&file, &set, values.as_deref(), output.as_deref()),
        Commands::Describe { file, format } => cmd_describe(&file, &format),
        Commands::Defaults { file, format } => cmd_defaults(&file, &format),
        Commands::Check { files } => cmd_check(&files),
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .try_init();
}

fn load_macro(path: &Path) -> Result<ParsedMacro, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    ParsedMacro::parse(&content).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
}

/// Parse one `--set id=value` argument; the value is passed on as text
fn parse_assignment(arg: &str) -> Result<(String, Scalar), String> {
    match arg.split_once('=') {
        Some((id, value)) if !id.is_empty() => Ok((id.to_string(), Scalar::from(value))),
        _ => Err(format!("Invalid --set '{}': expected ID=VALUE", arg)),
    }
}

/// Load a values file; null entries count as not supplied
fn load_values_file(path: &Path) -> Result<RawValues, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let entries: IndexMap<String, Option<Scalar>> = if ext == "json" {
        serde_json::from_str(&content).map_err(|e| format!("Invalid JSON in {}: {}", path.display(), e))?
    } else {
        serde_yaml::from_str(&content).map_err(|e| format!("Invalid YAML in {}: {}", path.display(), e))?
    };

    Ok(entries
        .into_iter()
        .filter_map(|(id, value)| value.map(|v| (id, v)))
        .collect())
}

fn collect_values(set: &[String], values_file: Option<&Path>) -> Result<RawValues, String> {
    let mut raw = match values_file {
        Some(path) => load_values_file(path)?,
        None => RawValues::new(),
    };

    for arg in set {
        let (id, value) = parse_assignment(arg)?;
        raw.insert(id, value);
    }

    Ok(raw)
}

fn cmd_render(
    file: &Path,
    set: &[String],
    values_file: Option<&Path>,
    output: Option<&Path>,
) -> ExitCode {
    let parsed = match load_macro(file) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{}", e.red());
            return ExitCode::from(2);
        }
    };

    let raw = match collect_values(set, values_file) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{}", e.red());
            return ExitCode::from(2);
        }
    };

    log::debug!(
        "Rendering {} with {} supplied value(s)",
        file.display(),
        raw.len()
    );

    match parsed.render(&raw) {
        Ok(content) => {
            if let Some(output_path) = output {
                if let Err(e) = std::fs::write(output_path, &content) {
                    eprintln!("{}: {}", "Error writing file".red(), e);
                    return ExitCode::from(2);
                }
                eprintln!("{} Wrote to {}", "✓".green(), output_path.display());
            } else {
                print!("{}", content);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{} Render failed\n", "✗".red());
            eprintln!("{}", e);
            ExitCode::from(1)
        }
    }
}

/// Human readable listing of the declared options
fn describe_text(parsed: &ParsedMacro) -> String {
    if parsed.schema().is_empty() {
        return "No options declared\n".to_string();
    }

    let mut out = String::new();
    for option in parsed.schema() {
        match option {
            ConfigOption::Number(n) => out.push_str(&format!(
                "{} ({}): number in [{}, {}], default {}\n",
                n.id, n.label, n.min, n.max, n.default
            )),
            ConfigOption::Dropdown(d) => {
                let choices: Vec<String> = d
                    .options
                    .iter()
                    .map(|c| format!("{} ({})", c.value, c.label))
                    .collect();
                out.push_str(&format!(
                    "{} ({}): one of {}, default {}\n",
                    d.id,
                    d.label,
                    choices.join(", "),
                    d.default_choice().value
                ));
            }
        }
    }
    out
}

fn cmd_describe(file: &Path, format: &str) -> ExitCode {
    let parsed = match load_macro(file) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{}", e.red());
            return ExitCode::from(2);
        }
    };

    let output = match format {
        "text" => Ok(describe_text(&parsed)),
        "yaml" | "yml" => serde_yaml::to_string(parsed.schema()).map_err(|e| e.to_string()),
        "json" => serde_json::to_string_pretty(parsed.schema())
            .map(|s| s + "\n")
            .map_err(|e| e.to_string()),
        _ => {
            eprintln!("Unsupported format: {}. Use text, yaml, or json.", format);
            return ExitCode::from(1);
        }
    };

    match output {
        Ok(s) => {
            print!("{}", s);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e.red());
            ExitCode::from(1)
        }
    }
}

fn cmd_defaults(file: &Path, format: &str) -> ExitCode {
    let parsed = match load_macro(file) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{}", e.red());
            return ExitCode::from(2);
        }
    };

    let defaults = match parsed.defaults() {
        Ok(d) => d,
        Err(e) => {
            eprintln!("{} Invalid defaults\n", "✗".red());
            eprintln!("{}", e);
            return ExitCode::from(1);
        }
    };

    let output = match format {
        "text" => Ok(defaults
            .iter()
            .map(|(id, value)| format!("{}={}\n", id, value))
            .collect::<String>()),
        "yaml" | "yml" => serde_yaml::to_string(&defaults).map_err(|e| e.to_string()),
        "json" => serde_json::to_string_pretty(&defaults)
            .map(|s| s + "\n")
            .map_err(|e| e.to_string()),
        _ => {
            eprintln!("Unsupported format: {}. Use text, yaml, or json.", format);
            return ExitCode::from(1);
        }
    };

    match output {
        Ok(s) => {
            print!("{}", s);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e.red());
            ExitCode::from(1)
        }
    }
}

fn cmd_check(files: &[PathBuf]) -> ExitCode {
    let mut all_valid = true;

    for file in files {
        let parsed = match load_macro(file) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("{} {}", "✗".red(), e);
                all_valid = false;
                continue;
            }
        };

        let undeclared = parsed.undeclared_references();
        if undeclared.is_empty() {
            println!(
                "{} {}: {} option(s)",
                "✓".green(),
                file.display(),
                parsed.schema().len()
            );
        } else {
            let names: Vec<String> = undeclared.iter().map(|n| format!("${{{}}}", n)).collect();
            eprintln!(
                "{} {}: undeclared reference(s) {}",
                "✗".red(),
                file.display(),
                names.join(", ")
            );
            all_valid = false;
        }
    }

    if all_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
