mod reports;
mod runner;
mod scenario;
mod util;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, ValueEnum};
use colored::Colorize;
use mitsutouge_page::SiteConfig;
use std::fs::{self, File};
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};
use std::time::Instant;

use runner::{ScenarioResult, run_scenario, unknown_scenario};
use scenario::{ScenarioCtx, expand_scenarios, get_scenario, list_scenarios};
use util::split_csv;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Console,
    Json,
    Markdown,
}

#[derive(Debug, Parser)]
#[command(name = "mitsutouge-tester", version = "0.1.0")]
#[command(about = "Checks the Mitsutouge page scripts against page fixtures")]
struct Args {
    /// Scenarios to run (comma-separated, or `all`)
    #[arg(long, default_value = "all")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Page fixture (JSON element tree); defaults to the built-in tourism page
    #[arg(long)]
    fixture: Option<PathBuf>,

    /// Site configuration override (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    announce_banner();
    let start_time = Instant::now();
    let ctx = build_context(&args)?;
    let results = run_scenarios(&ctx, &split_csv(&args.scenarios));
    write_reports(&args, &results, start_time)?;

    if results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(output_target.writer(), "  {key:20} - {description}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🗻 Mitsutouge Page Script Tester".bright_cyan().bold());
    println!("{}", "================================".cyan());
}

fn read_file(path: &Path, what: &str) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {what} {}", path.display()))
}

fn build_context(args: &Args) -> Result<ScenarioCtx> {
    let config = match &args.config {
        Some(path) => SiteConfig::from_json(&read_file(path, "config")?)
            .with_context(|| format!("invalid config {}", path.display()))?,
        None => SiteConfig::default(),
    };
    let fixture = args
        .fixture
        .as_ref()
        .map(|path| read_file(path, "fixture"))
        .transpose()?;
    ScenarioCtx::new(fixture.as_deref(), config, args.verbose)
}

fn run_scenarios(ctx: &ScenarioCtx, requested: &[String]) -> Vec<ScenarioResult> {
    expand_scenarios(requested)
        .iter()
        .map(|key| match get_scenario(key) {
            Some(scenario) => run_scenario(&scenario, ctx),
            None => unknown_scenario(key),
        })
        .collect()
}

fn write_reports(args: &Args, results: &[ScenarioResult], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;
    let generated_at = Utc::now();

    match args.report {
        ReportFormat::Json => {
            reports::generate_json_report(&mut output_target, results, generated_at)?;
        }
        ReportFormat::Markdown => {
            reports::generate_markdown_report(&mut output_target, results, generated_at)?;
        }
        ReportFormat::Console => {
            reports::generate_console_report(&mut output_target, results, start_time.elapsed())?;
            writeln!(&mut output_target)?;
            writeln!(&mut output_target, "🏁 Total time: {:?}", start_time.elapsed())?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args {
            scenarios: "all".to_string(),
            list_scenarios: false,
            report: ReportFormat::Json,
            output: None,
            fixture: None,
            config: None,
            verbose: false,
        }
    }

    #[test]
    fn args_parse_report_format_and_paths() {
        let args = Args::parse_from([
            "mitsutouge-tester",
            "--report",
            "markdown",
            "--scenarios",
            "focus-trap,announcer",
            "--fixture",
            "page.json",
        ]);
        assert_eq!(args.report, ReportFormat::Markdown);
        assert_eq!(split_csv(&args.scenarios), vec!["focus-trap", "announcer"]);
        assert_eq!(args.fixture, Some(PathBuf::from("page.json")));
    }

    #[test]
    fn builtin_context_runs_every_scenario_cleanly() {
        let ctx = build_context(&base_args()).unwrap();
        let results = run_scenarios(&ctx, &["all".to_string()]);
        assert!(!results.is_empty());
        assert!(results.iter().all(|r| r.passed), "{results:#?}");
    }

    #[test]
    fn unknown_scenarios_fail() {
        let ctx = build_context(&base_args()).unwrap();
        let results = run_scenarios(&ctx, &["no-such-check".to_string()]);
        assert_eq!(results.len(), 1);
        assert!(!results[0].passed);
    }

    #[test]
    fn missing_config_file_is_reported() {
        let mut args = base_args();
        args.config = Some(PathBuf::from("/nonexistent/mitsutouge-config.json"));
        let err = build_context(&args).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read config"));
    }
}
