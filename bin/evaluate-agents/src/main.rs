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

//! Evaluate every agent on every built-in maze.
//!
//! The random baseline is run once per seed and its results averaged. Each episode owns its own
//! environment and agent, so episodes run in parallel.

use anyhow::Context;
use clap::Parser;
use maze_world::{BuiltinMaze, Simulation};
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;
use wall_following_agents::{build_agent, AgentKind};

#[derive(Parser, Debug)]
#[command(name = "evaluate-agents")]
#[command(about = "Compare the wall-following agents against a random baseline")]
struct Args {
    /// Step budget for every maze, instead of each maze's own default
    #[arg(long)]
    max_steps: Option<i32>,

    /// How many seeds to average the naive agent over
    #[arg(long, default_value = "20")]
    naive_seeds: u64,

    /// Print results as JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Episode {
    rewards_collected: usize,
    total_rewards: usize,
    steps_taken: i32,
    success: bool,
}

fn run_episode(
    kind: AgentKind,
    maze: BuiltinMaze,
    step_budget: i32,
    seed: u64,
) -> anyhow::Result<Episode> {
    let environment = maze
        .environment()
        .with_context(|| format!("built-in maze {} is broken", maze))?;
    let total_rewards = environment.total_rewards();
    let mut simulation = Simulation::new(environment, build_agent(kind, seed), step_budget);
    let outcome = simulation.run();
    Ok(Episode {
        rewards_collected: simulation.environment().rewards_collected(),
        total_rewards,
        steps_taken: outcome.steps_taken,
        success: outcome.terminated,
    })
}

/// Averages over every episode an agent ran on one maze.
#[derive(Debug, Clone, PartialEq, Serialize)]
struct Evaluation {
    agent: AgentKind,
    maze: BuiltinMaze,
    episodes: usize,
    step_budget: i32,
    total_rewards: usize,
    mean_rewards_collected: f64,
    mean_steps_taken: f64,
    success_rate: f64,
}

impl Evaluation {
    fn new(
        agent: AgentKind,
        maze: BuiltinMaze,
        step_budget: i32,
        episodes: &[Episode],
    ) -> Evaluation {
        let n = episodes.len().max(1) as f64;
        Evaluation {
            agent,
            maze,
            episodes: episodes.len(),
            step_budget,
            total_rewards: episodes.first().map_or(0, |e| e.total_rewards),
            mean_rewards_collected: episodes
                .iter()
                .map(|e| e.rewards_collected as f64)
                .sum::<f64>()
                / n,
            mean_steps_taken: episodes.iter().map(|e| e.steps_taken as f64).sum::<f64>() / n,
            success_rate: episodes.iter().filter(|e| e.success).count() as f64 / n,
        }
    }
}

fn evaluate(
    kind: AgentKind,
    maze: BuiltinMaze,
    max_steps: Option<i32>,
    naive_seeds: u64,
) -> anyhow::Result<Evaluation> {
    let step_budget = max_steps.unwrap_or(maze.default_step_budget());
    let seeds = if kind.is_random() {
        0..naive_seeds.max(1)
    } else {
        0..1
    };
    let episodes = seeds
        .into_par_iter()
        .map(|seed| run_episode(kind, maze, step_budget, seed))
        .collect::<anyhow::Result<Vec<Episode>>>()?;
    let evaluation = Evaluation::new(kind, maze, step_budget, &episodes);
    info!(
        agent = %kind,
        maze = %maze,
        success_rate = evaluation.success_rate,
        "evaluated"
    );
    Ok(evaluation)
}

fn render_table(evaluations: &[Evaluation]) -> String {
    let mut s = String::new();
    s.push_str(&format!(
        "{:<18} {:<8} {:>9} {:>9} {:>8} {:>8}\n",
        "agent", "maze", "rewards", "steps", "success", "episodes"
    ));
    for e in evaluations {
        s.push_str(&format!(
            "{:<18} {:<8} {:>9} {:>9} {:>8} {:>8}\n",
            e.agent.name(),
            e.maze.name(),
            format!("{:.1}/{}", e.mean_rewards_collected, e.total_rewards),
            format!("{:.1}/{}", e.mean_steps_taken, e.step_budget),
            format!("{:.0}%", e.success_rate * 100.0),
            e.episodes,
        ));
    }
    s
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let pairs: Vec<(AgentKind, BuiltinMaze)> = AgentKind::ALL
        .into_iter()
        .flat_map(|kind| BuiltinMaze::ALL.into_iter().map(move |maze| (kind, maze)))
        .collect();

    let evaluations = pairs
        .par_iter()
        .map(|&(kind, maze)| evaluate(kind, maze, args.max_steps, args.naive_seeds))
        .collect::<anyhow::Result<Vec<Evaluation>>>()?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&evaluations).context("failed to serialize results")?
        );
    } else {
        print!("{}", render_table(&evaluations));
    }
    Ok(())
}
