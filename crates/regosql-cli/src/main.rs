//! CLI entry point for regosql.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, logging setup and
//! exit codes. All business logic lives in the `regosql-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand, ValueEnum};
use regosql_app::{
    CompileInput, EvaluateBatchInput, EvaluateInput, OutputFormat, batch_exit_code, load_config,
    parse_report_json, render_report, render_reports, report_exit_code, run_compile,
    run_evaluate, run_evaluate_batch,
};
use regosql_domain::engine::EvalContext;
use regosql_opa::OpaClient;
use regosql_settings::Overrides;
use std::io::Read;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "regosql",
    version,
    about = "Compile partial policy evaluation residuals into SQL WHERE predicates"
)]
struct Cli {
    /// Path to regosql config TOML. A missing file means defaults.
    #[arg(long, global = true, default_value = "regosql.toml")]
    config: Utf8PathBuf,

    /// Override profile (strict|compat).
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Log at debug level (RUST_LOG takes precedence).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
    Md,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
            Format::Md => OutputFormat::Markdown,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile a residual document (engine compile response or bare query set).
    Compile {
        /// Residual JSON file, or `-` for stdin.
        #[arg(long)]
        residual: Utf8PathBuf,

        /// Unknown collection, e.g. `data.users`.
        #[arg(long)]
        unknown: Option<String>,

        /// Value literal style (rego|sql).
        #[arg(long)]
        literal_style: Option<String>,

        #[arg(long, value_enum, default_value = "text")]
        format: Format,

        /// Where to write the output (if not specified, prints to stdout).
        #[arg(long, short)]
        out: Option<Utf8PathBuf>,
    },

    /// Partially evaluate a query on a policy engine and compile the residual.
    Eval {
        /// Engine root URL, e.g. `http://localhost:8181`.
        #[arg(long)]
        server: Option<String>,

        /// Query to partially evaluate, e.g. `data.example.allow == true`.
        #[arg(long)]
        query: Option<String>,

        /// JSON file passed to the engine as `input`, or `-` for stdin.
        #[arg(long)]
        input: Option<Utf8PathBuf>,

        /// Treat `--input` as a JSON array and evaluate each element separately.
        #[arg(long, requires = "input")]
        batch: bool,

        /// Unknown collection, e.g. `data.users`.
        #[arg(long)]
        unknown: Option<String>,

        /// Also fully evaluate this query and report the decision.
        #[arg(long)]
        decision: Option<String>,

        /// Per-call engine timeout in milliseconds.
        #[arg(long)]
        timeout_ms: Option<u64>,

        #[arg(long, value_enum, default_value = "text")]
        format: Format,

        /// Where to write the output (if not specified, prints to stdout).
        #[arg(long, short)]
        out: Option<Utf8PathBuf>,
    },

    /// Render markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long)]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match &cli.cmd {
        Commands::Compile {
            residual,
            unknown,
            literal_style,
            format,
            out,
        } => cmd_compile(
            &cli,
            residual,
            Overrides {
                unknown: unknown.clone(),
                literal_style: literal_style.clone(),
                ..base_overrides(&cli)
            },
            *format,
            out.as_deref(),
        ),
        Commands::Eval {
            server,
            query,
            input,
            batch,
            unknown,
            decision,
            timeout_ms,
            format,
            out,
        } => cmd_eval(
            &cli,
            input.as_deref(),
            *batch,
            Overrides {
                unknown: unknown.clone(),
                engine_url: server.clone(),
                query: query.clone(),
                decision: decision.clone(),
                timeout_ms: *timeout_ms,
                ..base_overrides(&cli)
            },
            *format,
            out.as_deref(),
        ),
        Commands::Md { report, output } => cmd_md(report, output.as_deref()).map(|()| 0),
    };

    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("regosql error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: u8) {
    let default = if verbose > 0 { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn base_overrides(cli: &Cli) -> Overrides {
    Overrides {
        profile: cli.profile.clone(),
        ..Overrides::default()
    }
}

fn read_config(path: &Utf8Path) -> String {
    match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            tracing::debug!(%path, error = %err, "config not loaded; using defaults");
            String::new()
        }
    }
}

fn read_input(path: &Utf8Path) -> anyhow::Result<String> {
    if path.as_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("read stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("read {}", path))
}

fn cmd_compile(
    cli: &Cli,
    residual: &Utf8Path,
    overrides: Overrides,
    format: Format,
    out: Option<&Utf8Path>,
) -> anyhow::Result<i32> {
    let config_text = read_config(&cli.config);
    let residual_text = read_input(residual)?;

    let output = run_compile(CompileInput {
        residual_text: &residual_text,
        config_text: &config_text,
        overrides,
    })?;

    let text = render_report(&output.report, format.into())?;
    emit(&text, out)?;
    Ok(report_exit_code(&output.report))
}

fn cmd_eval(
    cli: &Cli,
    input: Option<&Utf8Path>,
    batch: bool,
    overrides: Overrides,
    format: Format,
    out: Option<&Utf8Path>,
) -> anyhow::Result<i32> {
    let config_text = read_config(&cli.config);
    let resolved = load_config(&config_text, overrides)?;

    let input = input
        .map(|path| -> anyhow::Result<serde_json::Value> {
            let text = read_input(path)?;
            serde_json::from_str(&text).with_context(|| format!("parse input: {}", path))
        })
        .transpose()?;

    let client = OpaClient::new(&resolved.engine.url, resolved.engine.timeout)
        .context("create engine client")?;
    let ctx = EvalContext::with_timeout(resolved.engine.timeout);

    if batch {
        let inputs = match input {
            Some(serde_json::Value::Array(docs)) => docs,
            _ => anyhow::bail!("--batch expects --input to hold a JSON array of input documents"),
        };
        let reports = run_evaluate_batch(EvaluateBatchInput {
            engine: &client,
            ctx: &ctx,
            resolved: &resolved,
            inputs,
        })?;
        let text = render_reports(&reports, format.into())?;
        emit(&text, out)?;
        return Ok(batch_exit_code(&reports));
    }

    let report = run_evaluate(EvaluateInput {
        engine: &client,
        ctx: &ctx,
        resolved: &resolved,
        input,
    })?;

    let text = render_report(&report, format.into())?;
    emit(&text, out)?;
    Ok(report_exit_code(&report))
}

fn cmd_md(report_path: &Utf8Path, output: Option<&Utf8Path>) -> anyhow::Result<()> {
    let report_text = std::fs::read_to_string(report_path)
        .with_context(|| format!("read report: {}", report_path))?;
    let report = parse_report_json(&report_text)?;
    let md = render_report(&report, OutputFormat::Markdown)?;
    emit(&md, output)
}

fn emit(text: &str, out: Option<&Utf8Path>) -> anyhow::Result<()> {
    match out {
        Some(path) => write_text_file(path, text),
        None => {
            print!("{text}");
            Ok(())
        }
    }
}

fn write_text_file(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {}", parent))?;
    }
    std::fs::write(path, text).with_context(|| format!("write output: {}", path))?;
    Ok(())
}
