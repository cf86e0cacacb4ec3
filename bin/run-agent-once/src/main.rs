/*
 * Copyright (C) 2023 Asim Ihsan
 * SPDX-License-Identifier: AGPL-3.0-only
 *
 * This program is free software: you can redistribute it and/or modify it under
 * the terms of the GNU Affero General Public License as published by the Free
 * Software Foundation, version 3.
 *
 * This program is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A
 * PARTICULAR PURPOSE. See the GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License along
 * with this program. If not, see <https://www.gnu.org/licenses/>
 */

//! Run one agent for one episode on one maze and report how it did.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use maze_world::{
    parse_layout, record_episode, BuiltinMaze, EpisodeConfig, MazeEnvironment, Simulation,
    DEFAULT_STEP_BUDGET,
};
use tracing::info;
use tracing_subscriber::EnvFilter;
use wall_following_agents::{build_agent, AgentKind};

#[derive(Parser, Debug)]
#[command(name = "run-agent-once")]
#[command(about = "Run a wall-following agent for a single episode")]
struct Args {
    /// naive, production-rules or state-machine
    #[arg(long, short = 'a', default_value = "production-rules")]
    agent: AgentKind,

    /// Built-in maze: simple, medium or hard
    #[arg(long, short = 'm', default_value = "simple", conflicts_with = "maze_file")]
    maze: BuiltinMaze,

    /// ASCII layout file to use instead of a built-in maze
    #[arg(long)]
    maze_file: Option<PathBuf>,

    /// Step budget; overrides the config file and the maze's default
    #[arg(long)]
    max_steps: Option<i32>,

    /// Seed for the naive agent; overrides the config file
    #[arg(long)]
    seed: Option<u64>,

    /// JSON episode config
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Write the episode trace as JSON to this path
    #[arg(long)]
    trace: Option<PathBuf>,

    /// Print the maze before and after the episode
    #[arg(long)]
    show: bool,
}

/// Budget that applies when neither the command line nor the config file sets one.
fn maze_step_budget(args: &Args) -> i32 {
    match &args.maze_file {
        Some(_) => DEFAULT_STEP_BUDGET,
        None => args.maze.default_step_budget(),
    }
}

fn load_environment(args: &Args) -> anyhow::Result<MazeEnvironment> {
    match &args.maze_file {
        Some(path) => {
            let layout = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read maze file {:?}", path))?;
            parse_layout(&layout).with_context(|| format!("failed to parse maze file {:?}", path))
        }
        None => args
            .maze
            .environment()
            .with_context(|| format!("built-in maze {} is broken", args.maze)),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct EpisodeSettings {
    step_budget: i32,
    seed: u64,
    trace_path: Option<PathBuf>,
}

// Command-line flags win over the config file, which wins over the maze's own budget.
fn episode_settings(args: &Args, config: &EpisodeConfig) -> EpisodeSettings {
    EpisodeSettings {
        step_budget: args
            .max_steps
            .unwrap_or_else(|| config.step_budget_or(maze_step_budget(args))),
        seed: args.seed.unwrap_or(config.seed),
        trace_path: args.trace.clone().or_else(|| config.get_trace_path()),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => EpisodeConfig::load(path)?,
        None => EpisodeConfig::default(),
    };

    let environment = load_environment(&args)?;
    let settings = episode_settings(&args, &config);
    info!(
        agent = %args.agent,
        step_budget = settings.step_budget,
        seed = settings.seed,
        rewards = environment.total_rewards(),
        "starting episode"
    );

    if args.show {
        println!("{}\n", environment);
    }

    let agent = build_agent(args.agent, settings.seed);
    let mut simulation = Simulation::new(environment, agent, settings.step_budget);
    let trace = record_episode(&mut simulation);

    if args.show {
        println!("{}\n", simulation.environment());
    }
    println!("agent: {}", args.agent);
    println!(
        "rewards collected: {}/{}",
        trace.rewards_collected, trace.total_rewards
    );
    println!(
        "steps taken: {}/{}",
        trace.steps_taken,
        simulation.step_budget()
    );
    println!("success: {}", trace.success);

    if let Some(path) = settings.trace_path {
        let json = trace.to_json().context("failed to serialize episode trace")?;
        std::fs::write(&path, json)
            .with_context(|| format!("failed to write episode trace to {:?}", path))?;
        info!(path = ?path, "episode trace written");
    }

    Ok(())
}
