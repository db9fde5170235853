// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result, anyhow, bail};
use config::Config;
use runtime::{LeaderboardView, Runtime};
use std::env;
use std::io;
use std::path::PathBuf;
use stride_app::{
    AchievementFilter, AppState, CategoryFilter, Clock, DataSource, SystemClock, TestId,
    ThreadTimer,
};
use stride_data::{DemoSource, JsonSource, check_dataset};
use tracing::{info, warn};

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `stride --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;
    logging::init(config.log_level())?;
    info!(config = %options.config_path.display(), "stride starting");

    let dataset_path = options.data_path.clone().or_else(|| config.dataset_path());
    let source: Box<dyn DataSource> = match dataset_path {
        Some(path) => Box::new(JsonSource::open(&path).with_context(|| {
            format!(
                "load dataset {} -- if this path is wrong, pass --data, set [data].dataset_path or STRIDE_DATA_PATH",
                path.display()
            )
        })?),
        None => Box::new(DemoSource::new()),
    };

    let report = check_dataset(source.as_ref())?;
    if options.check_only {
        for issue in report.issues() {
            let severity = if issue.kind.is_warning() { "warning" } else { "error" };
            eprintln!("{severity}: {issue}");
        }
        report.into_result()?;
        println!("ok");
        return Ok(());
    }
    for issue in report.errors() {
        warn!(%issue, "dataset problem; run `stride --check` for the full report");
    }

    let state = AppState::load(
        source.as_ref(),
        ThreadTimer::new(),
        SystemClock,
        config.state_options()?,
    )?;
    let mut runtime = Runtime::new(state);
    let mut out = io::stdout().lock();

    match options.command {
        Command::Home => runtime.render_home(SystemClock.now().date(), &mut out),
        Command::Tests { search, category } => {
            runtime.render_tests(&search, &CategoryFilter::parse(&category), &mut out)
        }
        Command::Categories => runtime.render_categories(&mut out),
        Command::Leaderboard(view) => runtime.render_leaderboard(view, &mut out),
        Command::Achievements { category } => runtime.render_achievements(
            category.as_deref().map_or(AchievementFilter::All, AchievementFilter::parse),
            &mut out,
        ),
        Command::Coach => runtime.run_coach(&mut out),
        Command::Capture(test) => runtime
            .run_capture(test, io::stdin().lock(), &mut out)
            .map(|_| ()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Home,
    Tests { search: String, category: String },
    Categories,
    Leaderboard(LeaderboardView),
    Achievements { category: Option<String> },
    Coach,
    Capture(TestId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    data_path: Option<PathBuf>,
    print_config_path: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
    command: Command,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        data_path: None,
        print_config_path: false,
        print_example: false,
        check_only: false,
        show_help: false,
        command: Command::Home,
    };
    let mut command_seen = false;

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        let next_command = match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
                None
            }
            "--data" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--data requires a dataset file path"))?;
                options.data_path = Some(PathBuf::from(value.as_ref()));
                None
            }
            "--search" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--search requires a query"))?;
                match &mut options.command {
                    Command::Tests { search, .. } => *search = value.as_ref().to_owned(),
                    _ => bail!("--search only applies to the tests command"),
                }
                None
            }
            "--category" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--category requires a category name"))?;
                match &mut options.command {
                    Command::Tests { category, .. } => *category = value.as_ref().to_owned(),
                    Command::Achievements { category } => {
                        *category = Some(value.as_ref().to_owned());
                    }
                    _ => bail!("--category only applies to the tests and achievements commands"),
                }
                None
            }
            "--by-score" => {
                match &mut options.command {
                    Command::Leaderboard(view) => view.by_score = true,
                    _ => bail!("--by-score only applies to the leaderboard command"),
                }
                None
            }
            "--top" => {
                let raw = iter
                    .next()
                    .ok_or_else(|| anyhow!("--top requires a row count"))?;
                let count: usize = raw.as_ref().parse().with_context(|| {
                    format!("invalid row count {:?} for --top", raw.as_ref())
                })?;
                match &mut options.command {
                    Command::Leaderboard(view) => view.top = Some(count),
                    _ => bail!("--top only applies to the leaderboard command"),
                }
                None
            }
            "--print-config-path" => {
                options.print_config_path = true;
                None
            }
            "--print-example-config" => {
                options.print_example = true;
                None
            }
            "--check" => {
                options.check_only = true;
                None
            }
            "--help" | "-h" => {
                options.show_help = true;
                None
            }
            "home" => Some(Command::Home),
            "tests" => Some(Command::Tests {
                search: String::new(),
                category: stride_app::ALL_CATEGORIES.to_owned(),
            }),
            "categories" => Some(Command::Categories),
            "leaderboard" => Some(Command::Leaderboard(LeaderboardView::default())),
            "achievements" => Some(Command::Achievements { category: None }),
            "coach" => Some(Command::Coach),
            "capture" => {
                let raw = iter
                    .next()
                    .ok_or_else(|| anyhow!("capture requires a test id"))?;
                let id: i64 = raw.as_ref().parse().with_context(|| {
                    format!("invalid test id {:?}; run `stride tests` for ids", raw.as_ref())
                })?;
                Some(Command::Capture(TestId::new(id)))
            }
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        };

        if let Some(command) = next_command {
            if command_seen {
                bail!("only one command may be given; run with --help to see commands");
            }
            command_seen = true;
            options.command = command;
        }
    }

    Ok(options)
}

fn print_help() {
    println!("stride");
    println!("commands:");
    println!("  home                       Profile summary, recent activity, open competitions");
    println!("  tests [--search Q] [--category C]");
    println!("                             Filtered test catalog");
    println!("  categories                 Categories with test counts");
    println!("  leaderboard [--by-score] [--top N]");
    println!("                             Ranking by rank or score, first N rows");
    println!("  achievements [--category C]");
    println!("                             Badges and progress");
    println!("  coach                      Chat with the coach on stdin (/quit to leave)");
    println!("  capture <test-id>          Record a test; feed capture page messages on stdin");
    println!("options:");
    println!("  --config <path>            Use a specific config path");
    println!("  --data <path>              Load records from a JSON dataset");
    println!("  --print-config-path        Print resolved config path");
    println!("  --print-example-config     Print a v1 config template");
    println!("  --check                    Validate config + dataset and exit");
    println!("  --help                     Show this help");
}
