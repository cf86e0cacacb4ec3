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

//! Left-hand wall followers for `maze_world`, plus a random baseline.

use std::fmt;
use std::str::FromStr;

use maze_world::{Agent, MazeAction, PerceptionWindow};
use serde::{Deserialize, Serialize};

pub mod naive;
pub mod production_rules;
pub mod state_machine;

pub use naive::NaiveAgent;
pub use production_rules::{ProductionRulesAgent, Rule, LEFT_HAND_RULES};
pub use state_machine::{transition, ControlState, StateMachineAgent};

/// Any agent that can be dropped into a `MazeEnvironment`.
pub type MazeAgent = Box<dyn Agent<Action = MazeAction, Percept = PerceptionWindow>>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown agent {0:?}, expected one of: naive, production-rules, state-machine")]
pub struct UnknownAgentError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgentKind {
    Naive,
    ProductionRules,
    StateMachine,
}

impl AgentKind {
    pub const ALL: [AgentKind; 3] = [
        AgentKind::Naive,
        AgentKind::ProductionRules,
        AgentKind::StateMachine,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AgentKind::Naive => "naive",
            AgentKind::ProductionRules => "production-rules",
            AgentKind::StateMachine => "state-machine",
        }
    }

    /// Whether two runs with different seeds can behave differently.
    pub fn is_random(self) -> bool {
        self == AgentKind::Naive
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for AgentKind {
    type Err = UnknownAgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        AgentKind::ALL
            .into_iter()
            .find(|kind| {
                kind.name().eq_ignore_ascii_case(s) || kind.name().replace('-', "_") == s
            })
            .ok_or_else(|| UnknownAgentError(s.to_string()))
    }
}

/// Build a fresh agent. `seed` is only used by agents that make random choices.
pub fn build_agent(kind: AgentKind, seed: u64) -> MazeAgent {
    match kind {
        AgentKind::Naive => Box::new(NaiveAgent::new(seed)),
        AgentKind::ProductionRules => Box::new(ProductionRulesAgent::new()),
        AgentKind::StateMachine => Box::new(StateMachineAgent::new()),
    }
}
