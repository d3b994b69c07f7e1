// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use ade_cli::{CliError, collect_input_paths, load_run};
use ade_core::{DelayWindow, ExecutionMode, MetricResult};
use ade_eval::{HarnessConfig, evaluate_runs, validate_percent};
use log::info;
use serde::Serialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

const DEFAULT_CLI_DELAY: i64 = 24;
const DEFAULT_THRES_PERCENT: f64 = 99.9;

struct Cli {
    command: Command,
}

enum Command {
    Eval(EvalArgs),
}

#[derive(Debug, PartialEq)]
struct EvalArgs {
    inputs: Vec<PathBuf>,
    input_dir: Option<PathBuf>,
    delay: i64,
    thres_percent: f64,
    beta: f64,
    strict: bool,
    output: Option<PathBuf>,
}

impl Default for EvalArgs {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            input_dir: None,
            delay: DEFAULT_CLI_DELAY,
            thres_percent: DEFAULT_THRES_PERCENT,
            beta: 1.0,
            strict: false,
            output: None,
        }
    }
}

#[derive(Serialize)]
struct EvalOutput {
    command: &'static str,
    delay: usize,
    beta: f64,
    thres_percent: f64,
    runs: Vec<RunOutput>,
    aggregate: MetricResult,
    aggregate_raw: MetricResult,
}

#[derive(Serialize)]
struct RunOutput {
    name: String,
    threshold: Option<f64>,
    raw: MetricResult,
    adjusted: MetricResult,
}

#[derive(Serialize)]
struct ErrorEnvelope {
    error: ErrorPayload,
}

#[derive(Serialize)]
struct ErrorPayload {
    code: String,
    message: String,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(err) = run() {
        eprintln!("{}", render_error(&err));
        process::exit(1);
    }
}

fn run() -> Result<(), CliError> {
    let args = env::args().skip(1).collect::<Vec<_>>();
    let Some(cli) = parse_cli(&args)? else {
        return Ok(());
    };

    match cli.command {
        Command::Eval(args) => handle_eval(args),
    }
}

fn parse_cli(args: &[String]) -> Result<Option<Cli>, CliError> {
    if args.is_empty() || matches!(args[0].as_str(), "-h" | "--help") {
        print_root_help();
        return Ok(None);
    }
    if matches!(args[0].as_str(), "-V" | "--version") {
        print_version();
        return Ok(None);
    }

    let command_name = args[0].as_str();
    let rest = &args[1..];

    if rest
        .iter()
        .any(|arg| matches!(arg.as_str(), "-h" | "--help"))
    {
        print_command_help(command_name)?;
        return Ok(None);
    }

    let command = match command_name {
        "eval" => Command::Eval(parse_eval_args(rest)?),
        _ => {
            return Err(CliError::invalid_input(format!(
                "unknown command '{command_name}'; expected: eval"
            )));
        }
    };

    Ok(Some(Cli { command }))
}

fn parse_eval_args(tokens: &[String]) -> Result<EvalArgs, CliError> {
    let mut args = EvalArgs::default();
    let mut cursor = FlagCursor::new(tokens);
    while let Some((flag, inline_value)) = cursor.next_flag()? {
        match flag {
            "--input" => {
                let raw = cursor.value(flag, inline_value)?;
                args.inputs.push(PathBuf::from(raw));
            }
            "--input-dir" => {
                let raw = cursor.value(flag, inline_value)?;
                if args.input_dir.is_some() {
                    return Err(CliError::invalid_input(
                        "ade eval --input-dir may only be given once",
                    ));
                }
                args.input_dir = Some(PathBuf::from(raw));
            }
            "--delay" => {
                let raw = cursor.value(flag, inline_value)?;
                args.delay = parse_i64_arg(raw, flag)?;
            }
            "--thres-percent" => {
                let raw = cursor.value(flag, inline_value)?;
                args.thres_percent = parse_f64_arg(raw, flag)?;
            }
            "--beta" => {
                let raw = cursor.value(flag, inline_value)?;
                args.beta = parse_f64_arg(raw, flag)?;
            }
            "--strict" => {
                FlagCursor::switch(flag, inline_value)?;
                args.strict = true;
            }
            "--output" => {
                let raw = cursor.value(flag, inline_value)?;
                args.output = Some(PathBuf::from(raw));
            }
            other => {
                return Err(CliError::invalid_input(format!(
                    "unknown eval option '{other}'"
                )));
            }
        }
    }

    if args.inputs.is_empty() && args.input_dir.is_none() {
        return Err(CliError::invalid_input(
            "eval requires --input <path> or --input-dir <dir>",
        ));
    }

    Ok(args)
}

/// Walks `ade eval` tokens as `--flag value`, `--flag=value`, or `--switch`.
struct FlagCursor<'a> {
    tokens: &'a [String],
    idx: usize,
}

impl<'a> FlagCursor<'a> {
    fn new(tokens: &'a [String]) -> Self {
        Self { tokens, idx: 0 }
    }

    fn next_flag(&mut self) -> Result<Option<(&'a str, Option<&'a str>)>, CliError> {
        let tokens = self.tokens;
        let Some(token) = tokens.get(self.idx) else {
            return Ok(None);
        };
        self.idx += 1;
        if !token.starts_with("--") {
            return Err(CliError::invalid_input(format!(
                "ade eval takes only --flag arguments; got positional '{token}'"
            )));
        }
        Ok(Some(match token.split_once('=') {
            Some((flag, value)) => (flag, Some(value)),
            None => (token.as_str(), None),
        }))
    }

    fn value(&mut self, flag: &str, inline_value: Option<&'a str>) -> Result<&'a str, CliError> {
        if let Some(value) = inline_value {
            return Ok(value);
        }
        let tokens = self.tokens;
        match tokens.get(self.idx) {
            None => Err(CliError::invalid_input(format!(
                "ade eval {flag} needs a value"
            ))),
            Some(value) if value.starts_with("--") => Err(CliError::invalid_input(format!(
                "ade eval {flag} needs a value; found option '{value}' instead"
            ))),
            Some(value) => {
                self.idx += 1;
                Ok(value.as_str())
            }
        }
    }

    fn switch(flag: &str, inline_value: Option<&str>) -> Result<(), CliError> {
        match inline_value {
            Some(value) => Err(CliError::invalid_input(format!(
                "ade eval {flag} is a switch; drop '={value}'"
            ))),
            None => Ok(()),
        }
    }
}

fn parse_i64_arg(raw: &str, flag: &str) -> Result<i64, CliError> {
    raw.parse::<i64>()
        .map_err(|_| CliError::invalid_input(format!("{flag} expects an integer, got '{raw}'")))
}

fn parse_f64_arg(raw: &str, flag: &str) -> Result<f64, CliError> {
    raw.parse::<f64>()
        .map_err(|_| CliError::invalid_input(format!("{flag} expects a number, got '{raw}'")))
}

fn print_version() {
    println!("ade {}", env!("CARGO_PKG_VERSION"));
}

fn print_root_help() {
    println!(
        "ade {}\n\nUSAGE:\n  ade <COMMAND> [OPTIONS]\n\nCOMMANDS:\n  eval     Score predictions against ground truth with delay-tolerant point adjustment\n\nGLOBAL OPTIONS:\n  -h, --help      Show help\n  -V, --version   Show version\n\nRun 'ade <COMMAND> --help' for subcommand options.",
        env!("CARGO_PKG_VERSION")
    );
}

fn print_command_help(command: &str) -> Result<(), CliError> {
    match command {
        "eval" => {
            println!(
                "USAGE:\n  ade eval --input <path> [--input <path> ...] [OPTIONS]\n\nOPTIONS:\n  --input <path>            Run file (.csv or .json) with 'label' and 'pred' or 'score'; repeatable\n  --input-dir <dir>         Add every .csv/.json file in <dir>, lexical order\n  --delay <int>             Detection delay tolerance in samples. Default: {DEFAULT_CLI_DELAY}\n  --thres-percent <float>   Score percentile used as cutoff. Default: {DEFAULT_THRES_PERCENT}\n  --beta <float>            F-score weight. Default: 1.0\n  --strict                  Evaluate runs sequentially\n  --output <path>           Write JSON output to file"
            );
            Ok(())
        }
        _ => Err(CliError::invalid_input(format!(
            "unknown command '{command}'; expected: eval"
        ))),
    }
}

fn handle_eval(args: EvalArgs) -> Result<(), CliError> {
    let config = build_harness_config(&args)?;
    let paths = collect_input_paths(&args.inputs, args.input_dir.as_deref())?;

    let mut runs = Vec::with_capacity(paths.len());
    let mut thresholds = Vec::with_capacity(paths.len());
    for path in &paths {
        let (run, threshold) = load_run(path)?.into_run_input(args.thres_percent)?;
        if let Some(cutoff) = threshold {
            info!("{}: score cutoff {cutoff} at p{}", run.name, args.thres_percent);
        }
        runs.push(run);
        thresholds.push(threshold);
    }

    let report = evaluate_runs(&runs, &config)?;
    let runs = report
        .runs
        .into_iter()
        .zip(thresholds)
        .map(|(run, threshold)| RunOutput {
            name: run.name,
            threshold,
            raw: run.raw,
            adjusted: run.adjusted,
        })
        .collect();

    write_json_output(
        &EvalOutput {
            command: "eval",
            delay: config.delay.get(),
            beta: config.beta,
            thres_percent: args.thres_percent,
            runs,
            aggregate: report.aggregate,
            aggregate_raw: report.aggregate_raw,
        },
        args.output.as_deref(),
    )
}

fn build_harness_config(args: &EvalArgs) -> Result<HarnessConfig, CliError> {
    validate_percent(args.thres_percent)?;
    let mode = if args.strict {
        ExecutionMode::Strict
    } else {
        ExecutionMode::Balanced
    };
    let config = HarnessConfig::default()
        .with_delay(DelayWindow::new(args.delay)?)
        .with_beta(args.beta)
        .with_mode(mode);
    config.validate()?;
    Ok(config)
}

fn write_json_output<T: Serialize>(payload: &T, output_path: Option<&Path>) -> Result<(), CliError> {
    let encoded = serde_json::to_string_pretty(payload)
        .map_err(|source| CliError::json("failed to serialize JSON output", source))?;

    if let Some(path) = output_path {
        fs::write(path, format!("{encoded}\n"))
            .map_err(|source| CliError::io(format!("failed to write '{}'", path.display()), source))
    } else {
        println!("{encoded}");
        Ok(())
    }
}

fn error_envelope(err: &CliError) -> ErrorEnvelope {
    ErrorEnvelope {
        error: ErrorPayload {
            code: err.code().to_string(),
            message: err.to_string(),
        },
    }
}

/// Renders the `{"error":{"code","message"}}` document written to stderr on failure.
fn render_error(err: &CliError) -> String {
    let envelope = error_envelope(err);
    serde_json::to_string_pretty(&envelope).unwrap_or_else(|_| {
        format!("{{\"error\":{{\"code\":\"{}\"}}}}", envelope.error.code)
    })
}
