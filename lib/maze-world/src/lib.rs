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

// PEAS - Performance, Environment, Action, Sensing
//
// See:
// -  Chapter 2: Intelligent Agents, page 40

use num_traits::Zero;
use tracing::info;

pub mod config;
pub mod layout;
pub mod maze;
pub mod perception;
pub mod trace;

pub use config::{ConfigError, EpisodeConfig, DEFAULT_STEP_BUDGET};
pub use layout::{parse_layout, BuiltinMaze, LayoutError, UnknownMazeError};
pub use maze::{CellState, Maze, MazeAction, MazeEnvironment, Orientation, Pose, Position};
pub use perception::{perceive, LimitedWindow, PerceptionWindow, RelativeCell};
pub use trace::{record_episode, EpisodeTrace, StepRecord};

/// An Agent acts in a Performance, Environment, Action, Sensing (PEAS) cycle.
/// For a given Perception, the Agent will return an Action.
///
/// A reflex agent (e.g. the production-rule wall follower) does not need to store any state.
/// An agent with internal state (e.g. the state-machine wall follower) keeps it between calls
/// to `act` and clears it in `reset`.
///
/// Notice that the Agent is not aware of an Environment, it's only interface
/// is the Perception coming in then the Action going out.
pub trait Agent {
    type Action;
    type Percept;

    fn act(&mut self, percept: &Self::Percept) -> Self::Action;

    /// Forget everything learned during an episode.
    fn reset(&mut self) {}

    /// Short description of the agent's internal decision state, if it has any. Only used for
    /// traces and logging, never for decisions.
    fn annotation(&self) -> Option<String> {
        None
    }
}

impl<_Agent> Agent for Box<_Agent>
where
    _Agent: Agent + ?Sized,
{
    type Action = _Agent::Action;
    type Percept = _Agent::Percept;

    fn act(&mut self, percept: &Self::Percept) -> Self::Action {
        (**self).act(percept)
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn annotation(&self) -> Option<String> {
        (**self).annotation()
    }
}

/// An Environment runs a single Agent in a Performance, Environment, Action, Sensing (PEAS) cycle.
///
/// Notice that the Environment is not aware of an Agent.
pub trait Environment {
    type Action;
    type Percept;
    type Reward: num_traits::NumAssign + Copy;

    fn percept(&self) -> Self::Percept;
    fn execute_action(&mut self, action: &Self::Action);

    /// Returns the reward earned by the most recent action only. The Simulation accumulates it.
    fn reward(&self) -> Self::Reward;

    /// Whether the task is finished and no further actions are needed.
    fn is_terminal(&self) -> bool;

    /// Restore the initial state of the Environment.
    fn reset(&mut self);
}

/// Result of running a Simulation until it stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationOutcome<_Reward> {
    pub steps_taken: i32,
    pub total_reward: _Reward,

    /// True if the Environment reached a terminal state, false if the step budget ran out first.
    pub terminated: bool,
}

/// Result of a single decision cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult<_Action, _Reward> {
    pub action: _Action,
    pub reward: _Reward,
}

/// A Simulation runs a single Agent in multiple Performance, Environment, Action, Sensing (PEAS)
/// cycles, until either the Environment is terminal or the step budget is used up. The Agent's
/// total reward (Performance) is continually kept up to date.
///
/// The Simulation is aware of both the Environment and the single Agent. Notice that the Agent's
/// generic Action and Percept come from the Environment. The Agent still does not need to know that
/// the Environment exists, but the Agent definitely needs the Environment's Action and Percept
/// types.
pub struct Simulation<_Environment, _Agent>
where
    _Environment: Environment,
    _Agent: Agent<Action = _Environment::Action, Percept = _Environment::Percept>,
{
    environment: _Environment,
    agent: _Agent,
    step_budget: i32,
    steps_taken: i32,
    total_reward: _Environment::Reward,
}

impl<_Environment, _Agent> Simulation<_Environment, _Agent>
where
    _Environment: Environment,
    _Agent: Agent<Action = _Environment::Action, Percept = _Environment::Percept>,
{
    pub fn new(environment: _Environment, agent: _Agent, step_budget: i32) -> Self {
        Self {
            environment,
            agent,
            step_budget,
            steps_taken: 0,
            total_reward: _Environment::Reward::zero(),
        }
    }

    /// Whether another decision cycle would run.
    pub fn is_finished(&self) -> bool {
        self.environment.is_terminal() || self.steps_taken >= self.step_budget
    }

    /// Run one decision cycle. Returns None once the Simulation is finished.
    pub fn step(&mut self) -> Option<StepResult<_Environment::Action, _Environment::Reward>>
    where
        _Environment::Action: Copy,
    {
        if self.is_finished() {
            return None;
        }
        let percept = self.environment.percept();
        let action = self.agent.act(&percept);
        self.environment.execute_action(&action);
        let reward = self.environment.reward();
        self.total_reward += reward;
        self.steps_taken += 1;
        Some(StepResult { action, reward })
    }

    pub fn run(&mut self) -> SimulationOutcome<_Environment::Reward>
    where
        _Environment::Action: Copy,
    {
        while self.step().is_some() {}
        let outcome = self.outcome();
        info!(
            steps_taken = outcome.steps_taken,
            terminated = outcome.terminated,
            "simulation finished"
        );
        outcome
    }

    /// Put both the Environment and the Agent back to their initial state.
    pub fn reset(&mut self) {
        self.environment.reset();
        self.agent.reset();
        self.steps_taken = 0;
        self.total_reward = _Environment::Reward::zero();
    }

    pub fn outcome(&self) -> SimulationOutcome<_Environment::Reward> {
        SimulationOutcome {
            steps_taken: self.steps_taken,
            total_reward: self.total_reward,
            terminated: self.environment.is_terminal(),
        }
    }

    pub fn total_reward(&self) -> <_Environment as Environment>::Reward {
        self.total_reward
    }

    pub fn steps_taken(&self) -> i32 {
        self.steps_taken
    }

    pub fn step_budget(&self) -> i32 {
        self.step_budget
    }

    pub fn environment(&self) -> &_Environment {
        &self.environment
    }

    pub fn agent(&self) -> &_Agent {
        &self.agent
    }
}
