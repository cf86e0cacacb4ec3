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

//! Boundary following with production rules (left-hand rule).
//!
//! The agent sees the full 3x3 window and keeps no state. Rules are tried in priority order and
//! the first one whose condition holds decides the action:
//!
//! 1. `TF` or `TR` is a wall: turn right.
//! 2. `ML` is open and `BL` is a wall: turn left.
//! 3. Otherwise: move forward.

use std::fmt;

use maze_world::{Agent, MazeAction, PerceptionWindow, RelativeCell};
use tracing::debug;

/// A condition -> action pair.
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub condition: fn(&PerceptionWindow) -> bool,
    pub action: MazeAction,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("action", &self.action)
            .finish()
    }
}

impl Rule {
    pub fn matches(&self, window: &PerceptionWindow) -> bool {
        (self.condition)(window)
    }
}

fn wall_ahead(window: &PerceptionWindow) -> bool {
    window.get(RelativeCell::TopFront).is_blocked()
        || window.get(RelativeCell::TopRight).is_blocked()
}

fn wall_trailing_behind_left(window: &PerceptionWindow) -> bool {
    window.get(RelativeCell::MidLeft).is_open()
        && window.get(RelativeCell::BottomLeft).is_blocked()
}

fn always(_window: &PerceptionWindow) -> bool {
    true
}

pub const LEFT_HAND_RULES: [Rule; 3] = [
    Rule {
        name: "wall-ahead",
        condition: wall_ahead,
        action: MazeAction::TurnRight,
    },
    Rule {
        name: "re-engage-left-wall",
        condition: wall_trailing_behind_left,
        action: MazeAction::TurnLeft,
    },
    Rule {
        name: "cruise",
        condition: always,
        action: MazeAction::MoveForward,
    },
];

/// Action taken when no rule matches. Only reachable with a custom rule list that has no
/// catch-all rule.
const FALLBACK_ACTION: MazeAction = MazeAction::TurnRight;

#[derive(Debug, Clone)]
pub struct ProductionRulesAgent {
    rules: Vec<Rule>,
}

impl Default for ProductionRulesAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductionRulesAgent {
    pub fn new() -> Self {
        Self::with_rules(LEFT_HAND_RULES.to_vec())
    }

    pub fn with_rules(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// The first rule whose condition holds, if any.
    pub fn matching_rule(&self, window: &PerceptionWindow) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.matches(window))
    }

    pub fn decide(&self, window: &PerceptionWindow) -> MazeAction {
        match self.matching_rule(window) {
            Some(rule) => {
                debug!(rule = rule.name, action = %rule.action, "rule fired");
                rule.action
            }
            None => {
                debug!(action = %FALLBACK_ACTION, "no rule matched");
                FALLBACK_ACTION
            }
        }
    }
}

impl Agent for ProductionRulesAgent {
    type Action = MazeAction;
    type Percept = PerceptionWindow;

    fn act(&mut self, percept: &Self::Percept) -> Self::Action {
        self.decide(percept)
    }
}
