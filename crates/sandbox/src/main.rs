mod app;

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use targeting::TargetingConfig;
use tracing::{error, info};

use app::scenario::Scenario;
use app::{bootstrap, config_io, runner, SandboxError};

#[derive(Debug, Default, PartialEq, Eq)]
struct CliOptions {
    config: Option<PathBuf>,
    scenario: Option<PathBuf>,
    write_default_config: Option<PathBuf>,
}

#[derive(Debug, PartialEq, Eq)]
enum CliCommand {
    Help,
    Run(CliOptions),
}

fn main() -> ExitCode {
    bootstrap::init_tracing();
    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(SandboxError::Usage(message)) => {
            eprintln!("{message}");
            eprintln!();
            eprintln!("{}", usage_text());
            ExitCode::from(2)
        }
        Err(err) => {
            error!(error = %err, "sandbox_failed");
            ExitCode::from(1)
        }
    }
}

fn run_cli() -> Result<(), SandboxError> {
    let args = env::args().skip(1).collect::<Vec<_>>();
    let options = match parse_args(&args)? {
        CliCommand::Help => {
            println!("{}", usage_text());
            return Ok(());
        }
        CliCommand::Run(options) => options,
    };

    if let Some(path) = options.write_default_config.as_deref() {
        config_io::write_default_config(path)?;
        if options.scenario.is_none() && options.config.is_none() {
            return Ok(());
        }
    }

    let config = match options.config.as_deref() {
        Some(path) => config_io::load_config(path)?,
        None => TargetingConfig::default(),
    };
    let scenario = match options.scenario.as_deref() {
        Some(path) => Scenario::load(path)?,
        None => {
            info!("no scenario given; running built-in demo");
            Scenario::demo()?
        }
    };

    let report = runner::run_scenario(&scenario, &config);
    for line in report.summary_lines() {
        println!("{line}");
    }
    Ok(())
}

fn parse_args(args: &[String]) -> Result<CliCommand, SandboxError> {
    let mut options = CliOptions::default();
    let mut index = 0usize;
    while index < args.len() {
        let flag = args[index].as_str();
        let slot = match flag {
            "-h" | "--help" => return Ok(CliCommand::Help),
            "--config" => &mut options.config,
            "--scenario" => &mut options.scenario,
            "--write-default-config" => &mut options.write_default_config,
            other => return Err(SandboxError::Usage(format!("unknown argument '{other}'"))),
        };
        let value = args
            .get(index + 1)
            .filter(|value| !value.starts_with("--"))
            .ok_or_else(|| SandboxError::Usage(format!("missing value for {flag}")))?;
        if slot.replace(PathBuf::from(value)).is_some() {
            return Err(SandboxError::Usage(format!("{flag} given more than once")));
        }
        index += 2;
    }
    Ok(CliCommand::Run(options))
}

fn usage_text() -> String {
    [
        "sandbox - headless host for the targeting core",
        "",
        "Usage:",
        "  sandbox [--config <file>] [--scenario <file>]",
        "  sandbox --write-default-config <file>",
        "  sandbox -h | --help",
        "",
        "Without --scenario the built-in demo scenario runs.",
        "RUST_LOG controls log output (default: info).",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn no_arguments_runs_demo_with_defaults() {
        assert_eq!(
            parse_args(&[]).expect("parse"),
            CliCommand::Run(CliOptions::default())
        );
    }

    #[test]
    fn paths_are_collected_per_flag() {
        let parsed = parse_args(&args(&[
            "--scenario",
            "arena.json",
            "--config",
            "targeting.json",
        ]))
        .expect("parse");
        assert_eq!(
            parsed,
            CliCommand::Run(CliOptions {
                config: Some(PathBuf::from("targeting.json")),
                scenario: Some(PathBuf::from("arena.json")),
                write_default_config: None,
            })
        );
    }

    #[test]
    fn help_wins_anywhere() {
        assert_eq!(
            parse_args(&args(&["--config", "a.json", "-h"])).expect("parse"),
            CliCommand::Help
        );
    }

    #[test]
    fn usage_errors_are_reported() {
        for bad in [
            vec!["--config"],
            vec!["--config", "--scenario", "b.json"],
            vec!["--frobnicate"],
            vec!["--scenario", "a.json", "--scenario", "b.json"],
        ] {
            let err = parse_args(&args(&bad)).expect_err("usage error");
            assert!(matches!(err, SandboxError::Usage(_)), "{bad:?}");
        }
    }
}
