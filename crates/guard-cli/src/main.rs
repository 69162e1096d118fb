use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgMatches, Command};
use guard_cli::{check_report, key_report, load_config, load_snapshot, normalize_report, reserved_report};
use guard_conflict::{CandidateTarget, ConflictGuard};
use tracing_subscriber::EnvFilter;

fn snapshot_arg() -> Arg {
    Arg::new("snapshot")
        .long("snapshot")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("JSON file with the active-target snapshot")
}

fn url_arg() -> Arg {
    Arg::new("url")
        .long("url")
        .required(true)
        .help("Page URL or path")
}

fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .value_parser(value_parser!(PathBuf))
        .help("TOML guard configuration")
}

fn cli() -> Command {
    Command::new("target-guard")
        .version(guard_conflict::VERSION)
        .about("Conflict guard for concurrently running website experiments")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("normalize")
                .about("Print the canonical URL pattern")
                .arg(Arg::new("url").required(true).help("URL or path to normalize")),
        )
        .subcommand(
            Command::new("key")
                .about("Print canonical selector and identity keys")
                .arg(Arg::new("selector").long("selector").help("CSS selector"))
                .arg(Arg::new("role").long("role").help("Semantic role label")),
        )
        .subcommand(
            Command::new("check")
                .about("Check a candidate target against running experiments")
                .arg(snapshot_arg())
                .arg(url_arg())
                .arg(Arg::new("selector").long("selector").help("Candidate CSS selector"))
                .arg(Arg::new("role").long("role").help("Candidate semantic role"))
                .arg(config_arg()),
        )
        .subcommand(
            Command::new("reserved")
                .about("Print the reserved-target payload for a page")
                .arg(snapshot_arg())
                .arg(url_arg())
                .arg(
                    Arg::new("max")
                        .long("max")
                        .value_parser(value_parser!(usize))
                        .help("Override the configured item bound"),
                )
                .arg(config_arg()),
        )
}

fn required<'a>(args: &'a ArgMatches, name: &str) -> Result<&'a str> {
    args.get_one::<String>(name)
        .map(String::as_str)
        .with_context(|| format!("missing --{name}"))
}

fn guard_from(args: &ArgMatches) -> Result<ConflictGuard> {
    let mut config = load_config(args.get_one::<PathBuf>("config").map(PathBuf::as_path))?;
    if let Some(max) = args.try_get_one::<usize>("max").ok().flatten() {
        config = config.with_max_reserved_items(*max);
    }
    Ok(ConflictGuard::new(config))
}

fn snapshot_from(args: &ArgMatches) -> Result<Vec<guard_conflict::ActiveTarget>> {
    let path = args
        .get_one::<PathBuf>("snapshot")
        .context("missing --snapshot")?;
    load_snapshot(path)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();

    match matches.subcommand() {
        Some(("normalize", args)) => {
            println!("{}", normalize_report(required(args, "url")?));
        }
        Some(("key", args)) => {
            let selector = args.get_one::<String>("selector").map(String::as_str);
            let role = args.get_one::<String>("role").map(String::as_str);
            println!("{}", key_report(selector, role));
        }
        Some(("check", args)) => {
            let guard = guard_from(args)?;
            let active = snapshot_from(args)?;

            let mut candidate = CandidateTarget::new(required(args, "url")?);
            if let Some(selector) = args.get_one::<String>("selector") {
                candidate = candidate.with_selector(selector.as_str());
            }
            if let Some(role) = args.get_one::<String>("role") {
                candidate = candidate.with_role(role.as_str());
            }

            let report = check_report(&guard, &active, &candidate)?;
            println!("{}", report.text);
            std::process::exit(if report.rejected { 1 } else { 0 });
        }
        Some(("reserved", args)) => {
            let guard = guard_from(args)?;
            let active = snapshot_from(args)?;
            println!("{}", reserved_report(&guard, required(args, "url")?, &active)?);
        }
        _ => unreachable!("subcommand_required is set"),
    }

    Ok(())
}
