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

use serde::{Deserialize, Serialize};

use crate::maze::{MazeAction, MazeEnvironment, Pose};
use crate::perception::PerceptionWindow;
use crate::{Agent, Simulation};

/// One decision cycle: what the agent did and where that left it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    pub step: i32,
    pub action: MazeAction,

    /// Pose after the action was applied.
    pub pose: Pose,
    pub reward: i32,

    /// The agent's own description of its decision state after this step, e.g. the state of a
    /// state machine.
    pub annotation: Option<String>,
}

/// Step-by-step record of a whole episode, for replaying or diffing agent behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeTrace {
    pub start: Pose,
    pub steps: Vec<StepRecord>,
    pub rewards_collected: usize,
    pub total_rewards: usize,
    pub steps_taken: i32,

    /// Every reward was collected within the step budget.
    pub success: bool,
}

impl EpisodeTrace {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Run the simulation to completion, recording every step.
pub fn record_episode<_Agent>(simulation: &mut Simulation<MazeEnvironment, _Agent>) -> EpisodeTrace
where
    _Agent: Agent<Action = MazeAction, Percept = PerceptionWindow>,
{
    let start = simulation.environment().pose();
    let mut steps = Vec::new();
    while let Some(result) = simulation.step() {
        steps.push(StepRecord {
            step: simulation.steps_taken() - 1,
            action: result.action,
            pose: simulation.environment().pose(),
            reward: result.reward,
            annotation: simulation.agent().annotation(),
        });
    }

    let environment = simulation.environment();
    EpisodeTrace {
        start,
        steps,
        rewards_collected: environment.rewards_collected(),
        total_rewards: environment.total_rewards(),
        steps_taken: simulation.steps_taken(),
        success: environment.rewards_remaining() == 0,
    }
}
