//! Command-line interface for apiskel.

use clap::{Parser, Subcommand};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::config::{self, Config};
use crate::provider::{self, Snapshot};
use crate::report::{self, Markup, ReportStats};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Environment variable holding a tracing filter (e.g., "apiskel=debug").
pub const LOG_ENV: &str = "APISKEL_LOG";

/// API skeleton reporter - document business contracts and DTOs.
///
/// Apiskel reads classes deriving from a generic base parameterized by a
/// business contract and a DTO, and reports the contract's operations and
/// the DTO's fields for each of them.
#[derive(Parser)]
#[command(name = "apiskel")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging (overridden by APISKEL_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the contract report for a project
    #[command(visible_alias = "doc")]
    Report(ReportArgs),
    /// Dump resolved class symbols as a snapshot
    Symbols(SymbolsArgs),
    /// Create a new apiskel configuration from a template
    Init(InitArgs),
}

/// Arguments for the report command.
#[derive(Parser)]
pub struct ReportArgs {
    /// C# source root, or a symbol snapshot (.yaml, .yml, .json)
    pub path: PathBuf,

    /// Project name (matches <name>.csproj below the source root)
    #[arg(short, long, default_value = "")]
    pub project: String,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format: html or json
    #[arg(short, long, default_value = "html")]
    pub format: String,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Do not print the summary
    #[arg(short, long)]
    pub quiet: bool,
}

/// Arguments for the symbols command.
#[derive(Parser)]
pub struct SymbolsArgs {
    /// C# source root, or a symbol snapshot (.yaml, .yml, .json)
    pub path: PathBuf,

    /// Project name (matches <name>.csproj below the source root)
    #[arg(short, long, default_value = "")]
    pub project: String,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format: yaml or json
    #[arg(short, long, default_value = "yaml")]
    pub format: String,
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "apiskel.yaml")]
    pub output: PathBuf,

    /// Template to use
    #[arg(short, long, default_value = "default")]
    pub template: String,

    /// List available templates
    #[arg(short, long)]
    pub list: bool,
}

/// Available configuration templates.
struct Template {
    name: &'static str,
    description: &'static str,
    content: &'static str,
}

/// All available templates.
static TEMPLATES: &[Template] = &[
    Template {
        name: "default",
        description: "ASP.NET project - skips App_Start and build output",
        content: include_str!("templates/default.yaml"),
    },
    Template {
        name: "minimal",
        description: "Skips build output only",
        content: include_str!("templates/minimal.yaml"),
    },
];

/// Install the tracing subscriber. Logs go to stderr.
pub fn init_logging(verbose: bool) {
    let fallback = if verbose { "apiskel=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

    // A subscriber may already be installed (tests, embedding)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Load and validate configuration, printing problems the CLI way.
fn load_config(path: Option<&Path>) -> Option<Config> {
    let config = match Config::load(path, Path::new(".")) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return None;
        }
    };

    if let Err(e) = config::validate(&config) {
        eprintln!("Error: invalid config: {}", e);
        return None;
    }

    Some(config)
}

/// Resolve the classes of `project` under `path`.
fn list_classes(
    path: &Path,
    project: &str,
    config: &Config,
) -> Option<Vec<crate::model::ClassSymbol>> {
    let provider = match provider::open(path, config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {}", e);
            return None;
        }
    };

    tracing::debug!("using {} provider for {}", provider.name(), path.display());

    match provider.list_classes(project) {
        Ok(classes) => Some(classes),
        Err(e) => {
            eprintln!("Error: {}", e);
            None
        }
    }
}

fn open_output(output: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| anyhow::anyhow!("creating {}: {}", path.display(), e))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

/// Run the report command.
pub fn run_report(args: &ReportArgs) -> anyhow::Result<i32> {
    if args.format != "html" && args.format != "json" {
        eprintln!(
            "Error: invalid format {:?}, must be 'html' or 'json'",
            args.format
        );
        return Ok(EXIT_ERROR);
    }

    let config = match load_config(args.config.as_deref()) {
        Some(c) => c,
        None => return Ok(EXIT_ERROR),
    };

    let classes = match list_classes(&args.path, &args.project, &config) {
        Some(c) => c,
        None => return Ok(EXIT_ERROR),
    };

    if classes.is_empty() {
        tracing::warn!("no classes found in {}", args.path.display());
    }

    // Build every section before writing so a contract failure leaves no
    // partial report behind
    let sections = match report::build_sections(&classes) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_FAILED);
        }
    };

    let source = args.path.to_string_lossy().to_string();
    let mut out = open_output(args.output.as_deref())?;

    match args.format.as_str() {
        "json" => report::write_json(&mut out, &source, &args.project, &sections)?,
        _ => out.write_all(Markup::html().render(&sections).as_bytes())?,
    }
    out.flush()?;

    if !args.quiet {
        let destination = match &args.output {
            Some(p) => p.to_string_lossy().to_string(),
            None => "stdout".to_string(),
        };
        report::write_summary(
            &source,
            &args.project,
            &destination,
            &ReportStats::from_sections(&sections),
        );
    }

    Ok(EXIT_SUCCESS)
}

/// Run the symbols command.
pub fn run_symbols(args: &SymbolsArgs) -> anyhow::Result<i32> {
    if args.format != "yaml" && args.format != "json" {
        eprintln!(
            "Error: invalid format {:?}, must be 'yaml' or 'json'",
            args.format
        );
        return Ok(EXIT_ERROR);
    }

    let config = match load_config(args.config.as_deref()) {
        Some(c) => c,
        None => return Ok(EXIT_ERROR),
    };

    let classes = match list_classes(&args.path, &args.project, &config) {
        Some(c) => c,
        None => return Ok(EXIT_ERROR),
    };

    let snapshot = Snapshot::single(args.project.clone(), classes);
    let text = match args.format.as_str() {
        "json" => snapshot.to_json()?,
        _ => snapshot.to_yaml()?,
    };
    println!("{}", text.trim_end());

    Ok(EXIT_SUCCESS)
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    if args.list {
        list_templates();
        return Ok(EXIT_SUCCESS);
    }

    let Some(template) = TEMPLATES.iter().find(|t| t.name == args.template) else {
        eprintln!(
            "Error: unknown template {:?} (available: {})",
            args.template,
            template_names()
        );
        return Ok(EXIT_ERROR);
    };

    // create_new refuses to clobber an existing config
    let written = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&args.output)
        .and_then(|mut f| f.write_all(template.content.as_bytes()));
    if let Err(e) = written {
        eprintln!("Error: writing {}: {}", args.output.display(), e);
        return Ok(EXIT_ERROR);
    }

    println!(
        "Created {} from template '{}'; run `apiskel report <solution-dir> -p <project> -c {}`",
        args.output.display(),
        template.name,
        args.output.display()
    );
    Ok(EXIT_SUCCESS)
}

fn template_names() -> String {
    TEMPLATES.iter().map(|t| t.name).collect::<Vec<_>>().join(", ")
}

/// Print each template with the paths it excludes.
fn list_templates() {
    for template in TEMPLATES {
        println!("{}: {}", template.name, template.description);
        match serde_yaml::from_str::<Config>(template.content) {
            Ok(config) => println!("    excludes {}", config.excluded_paths.join(", ")),
            Err(e) => tracing::warn!("template {} does not parse: {}", template.name, e),
        }
    }
}
