use maze_search::common::SearchResult;
use maze_search::config::{Cli, Command, Config, SearchArgs};
use maze_search::script::{run_heap_script, run_index_script};
use maze_search::search::{search, Strategy};
use maze_search::stat::Stats;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use std::fs;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Serialize)]
struct Report {
    solver: Strategy,
    result: SearchResult,
    stats: Stats,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let cli = Cli::parse();

    match cli.command {
        Command::Search(args) => run_search(&args),
        Command::Heap { script, buckets } => {
            let text = fs::read_to_string(&script).with_context(|| format!("reading {script}"))?;
            for line in run_heap_script(&text, buckets)? {
                println!("{line}");
            }
            Ok(())
        }
        Command::Index { script, buckets } => {
            let text = fs::read_to_string(&script).with_context(|| format!("reading {script}"))?;
            for line in run_index_script(&text, buckets)? {
                println!("{line}");
            }
            Ok(())
        }
    }
}

fn run_search(args: &SearchArgs) -> anyhow::Result<()> {
    let config = if let Some(config_file) = args.config.as_ref() {
        let config_str = fs::read_to_string(config_file)?;
        Config::from_yaml_str(&config_str)
            .with_context(|| format!("error with config file: {config_file}"))?
    } else {
        info!("No config file specified, using default config");
        Config::default()
    }
    .override_from_command_line(args)?;

    let base = config.load_map()?;
    let start = config.start;
    let goal = config.goal_for(&base);
    info!("Search {start} -> {goal} on {}x{} map", base.height, base.width);

    let mut reports = Vec::new();
    for &solver in &config.solvers {
        let mut map = base.clone();
        map.mark_endpoints(start, goal)?;

        let mut stats = Stats::default();
        let result = search(&mut map, start, goal, solver, &config.search_options(), &mut stats)?;
        stats.print(&solver.to_string());

        if result.success {
            info!(
                "{solver}: path cost {:.3}, length {}",
                result.path_cost, result.path_length
            );
        } else {
            error!("{solver} solve fails");
        }
        if config.render {
            println!("{solver}:\n{}\n", map.render(result.path.as_deref()));
        }

        reports.push(Report {
            solver,
            result,
            stats,
        });
    }

    if let Some(output_path) = &config.output_path {
        let json = serde_json::to_string_pretty(&reports)?;
        fs::write(output_path, json).with_context(|| format!("writing {output_path}"))?;
        info!("Wrote {} report(s) to {output_path}", reports.len());
    }

    Ok(())
}
