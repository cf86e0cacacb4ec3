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

//! Boundary following with a finite state machine and limited perception.
//!
//! The agent only sees the cells to its left, front and right, so it carries a `ControlState`
//! between cycles to remember what it was doing.

use std::fmt;

use maze_world::{Agent, LimitedWindow, MazeAction, PerceptionWindow};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlState {
    /// No wall on the left yet; walk straight until one shows up.
    FindWall,

    /// Wall on the left; keep it there.
    FollowWall,

    /// In the middle of going round a corner.
    TurnCorner,
}

impl fmt::Display for ControlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ControlState::FindWall => "find-wall",
            ControlState::FollowWall => "follow-wall",
            ControlState::TurnCorner => "turn-corner",
        };
        write!(f, "{}", s)
    }
}

/// Action to take and state to move to, given the current state and what the agent can see.
pub fn transition(state: ControlState, window: LimitedWindow) -> (MazeAction, ControlState) {
    if window.is_unreadable() {
        return (MazeAction::TurnRight, state);
    }

    match state {
        ControlState::FindWall => {
            if window.left.is_blocked() {
                transition(ControlState::FollowWall, window)
            } else if window.front.is_blocked() {
                (MazeAction::TurnRight, ControlState::TurnCorner)
            } else if window.right.is_blocked() {
                (MazeAction::TurnLeft, ControlState::FollowWall)
            } else {
                (MazeAction::MoveForward, ControlState::FindWall)
            }
        }
        ControlState::FollowWall => {
            if window.front.is_blocked() {
                (MazeAction::TurnRight, ControlState::TurnCorner)
            } else if window.left.is_open() {
                (MazeAction::TurnLeft, ControlState::TurnCorner)
            } else {
                (MazeAction::MoveForward, ControlState::FollowWall)
            }
        }
        ControlState::TurnCorner => {
            if window.front.is_blocked() {
                (MazeAction::TurnRight, ControlState::TurnCorner)
            } else if window.left.is_blocked() {
                (MazeAction::MoveForward, ControlState::FollowWall)
            } else {
                (MazeAction::MoveForward, ControlState::FindWall)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct StateMachineAgent {
    state: ControlState,
}

impl Default for StateMachineAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl StateMachineAgent {
    pub fn new() -> Self {
        Self::with_state(ControlState::FindWall)
    }

    pub fn with_state(state: ControlState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> ControlState {
        self.state
    }

    pub fn decide(&mut self, window: LimitedWindow) -> MazeAction {
        let (action, next) = transition(self.state, window);
        if next != self.state {
            debug!(from = %self.state, to = %next, action = %action, "state change");
        }
        self.state = next;
        action
    }
}

impl Agent for StateMachineAgent {
    type Action = MazeAction;
    type Percept = PerceptionWindow;

    // Everything outside left, front and right is discarded here.
    fn act(&mut self, percept: &Self::Percept) -> Self::Action {
        self.decide(percept.limited())
    }

    fn reset(&mut self) {
        self.state = ControlState::FindWall;
    }

    fn annotation(&self) -> Option<String> {
        Some(self.state.to_string())
    }
}

#[cfg(test)]
mod tests {
    use maze_world::{
        parse_layout, CellState, Environment, MazeEnvironment, Orientation, Pose, Position,
    };
    use proptest::prelude::*;

    use super::*;

    const E: CellState = CellState::Empty;
    const W: CellState = CellState::Wall;

    fn limited(left: CellState, front: CellState, right: CellState) -> LimitedWindow {
        LimitedWindow::new(left, front, right)
    }

    // Drive one decision cycle by hand and return the action taken.
    fn cycle(agent: &mut StateMachineAgent, env: &mut MazeEnvironment) -> MazeAction {
        let action = agent.act(&env.percept());
        env.execute_action(&action);
        action
    }

    #[test]
    fn test_follow_wall_with_wall_on_left_moves_forward() {
        let mut agent = StateMachineAgent::with_state(ControlState::FollowWall);
        assert_eq!(agent.decide(limited(W, E, E)), MazeAction::MoveForward);
        assert_eq!(agent.state(), ControlState::FollowWall);
    }

    #[test]
    fn test_follow_wall_into_corner_turns_right() {
        let mut agent = StateMachineAgent::with_state(ControlState::FollowWall);
        assert_eq!(agent.decide(limited(W, W, E)), MazeAction::TurnRight);
        assert_eq!(agent.state(), ControlState::TurnCorner);
    }

    #[test]
    fn test_follow_wall_losing_left_wall_turns_left() {
        let mut agent = StateMachineAgent::with_state(ControlState::FollowWall);
        assert_eq!(agent.decide(limited(E, E, E)), MazeAction::TurnLeft);
        assert_eq!(agent.state(), ControlState::TurnCorner);
    }

    #[test]
    fn test_find_wall_transitions() {
        assert_eq!(
            transition(ControlState::FindWall, limited(E, E, E)),
            (MazeAction::MoveForward, ControlState::FindWall)
        );
        assert_eq!(
            transition(ControlState::FindWall, limited(E, W, E)),
            (MazeAction::TurnRight, ControlState::TurnCorner)
        );
        assert_eq!(
            transition(ControlState::FindWall, limited(E, E, W)),
            (MazeAction::TurnLeft, ControlState::FollowWall)
        );
        assert_eq!(
            transition(ControlState::FindWall, limited(W, E, E)),
            (MazeAction::MoveForward, ControlState::FollowWall)
        );
        assert_eq!(
            transition(ControlState::FindWall, limited(W, W, E)),
            (MazeAction::TurnRight, ControlState::TurnCorner)
        );
    }

    #[test]
    fn test_find_wall_prefers_the_left_wall() {
        assert_eq!(
            transition(ControlState::FindWall, limited(W, E, W)),
            (MazeAction::MoveForward, ControlState::FollowWall)
        );
        assert_eq!(
            transition(ControlState::FindWall, limited(W, W, W)),
            (MazeAction::TurnRight, ControlState::TurnCorner)
        );
    }

    #[test]
    fn test_turn_corner_transitions() {
        assert_eq!(
            transition(ControlState::TurnCorner, limited(W, W, W)),
            (MazeAction::TurnRight, ControlState::TurnCorner)
        );
        assert_eq!(
            transition(ControlState::TurnCorner, limited(W, E, W)),
            (MazeAction::MoveForward, ControlState::FollowWall)
        );
        assert_eq!(
            transition(ControlState::TurnCorner, limited(E, E, W)),
            (MazeAction::MoveForward, ControlState::FindWall)
        );
    }

    #[test]
    fn test_out_of_bounds_counts_as_blocked() {
        let oob = CellState::OutOfBounds;
        assert_eq!(
            transition(ControlState::FollowWall, limited(oob, E, E)),
            (MazeAction::MoveForward, ControlState::FollowWall)
        );
        assert_eq!(
            transition(ControlState::FollowWall, limited(W, oob, E)),
            (MazeAction::TurnRight, ControlState::TurnCorner)
        );
    }

    #[test]
    fn test_unreadable_window_turns_right_and_keeps_state() {
        let oob = CellState::OutOfBounds;
        for state in [
            ControlState::FindWall,
            ControlState::FollowWall,
            ControlState::TurnCorner,
        ] {
            assert_eq!(
                transition(state, limited(oob, oob, oob)),
                (MazeAction::TurnRight, state)
            );
        }
    }

    #[test]
    fn test_reset_returns_to_find_wall() {
        let mut agent = StateMachineAgent::with_state(ControlState::TurnCorner);
        assert_eq!(agent.annotation(), Some("turn-corner".to_string()));
        agent.reset();
        assert_eq!(agent.state(), ControlState::FindWall);
    }

    #[test]
    fn test_act_only_uses_left_front_right() {
        let mut agent = StateMachineAgent::with_state(ControlState::FollowWall);
        let window = PerceptionWindow::filled(CellState::Wall)
            .with(maze_world::RelativeCell::TopFront, CellState::Empty)
            .with(maze_world::RelativeCell::MidRight, CellState::Empty);
        assert_eq!(agent.act(&window), MazeAction::MoveForward);
        assert_eq!(agent.state(), ControlState::FollowWall);
    }

    #[test]
    fn test_find_wall_converges_in_open_room() {
        let mut env = parse_layout(
            r#"
##########
#........#
#........#
#........#
#....>...#
#........#
#........#
#........#
##########
"#,
        )
        .unwrap();
        let mut agent = StateMachineAgent::new();
        let mut cycles = 0;
        while agent.state() == ControlState::FindWall {
            assert!(cycles < 10, "still looking for a wall after {} cycles", cycles);
            cycle(&mut agent, &mut env);
            cycles += 1;
        }
        // Three steps east puts the wall in front.
        assert_eq!(cycles, 4);
        assert_eq!(agent.state(), ControlState::TurnCorner);
        assert_eq!(
            env.pose(),
            Pose::new(Position::new(8, 4), Orientation::South)
        );
    }

    #[test]
    fn test_wraps_around_end_of_wall_stub() {
        let mut env = parse_layout(
            r#"
########
#......#
#......#
#..#...#
#..#...#
#..#^..#
########
"#,
        )
        .unwrap();
        let mut agent = StateMachineAgent::with_state(ControlState::FollowWall);

        use ControlState::*;
        use MazeAction::*;
        let expected = [
            (MoveForward, FollowWall),
            (MoveForward, FollowWall),
            (MoveForward, FollowWall),
            (TurnLeft, TurnCorner),
            (MoveForward, FindWall),
            (MoveForward, FollowWall),
            (TurnLeft, TurnCorner),
            (MoveForward, FindWall),
            (MoveForward, FollowWall),
            (MoveForward, FollowWall),
            (TurnRight, TurnCorner),
            (MoveForward, FollowWall),
        ];
        let actual: Vec<(MazeAction, ControlState)> = expected
            .iter()
            .map(|_| {
                let action = cycle(&mut agent, &mut env);
                (action, agent.state())
            })
            .collect();
        assert_eq!(actual, expected.to_vec());
        assert_eq!(env.pose(), Pose::new(Position::new(1, 5), Orientation::West));
    }

    fn cell_state() -> impl Strategy<Value = CellState> {
        prop_oneof![
            Just(CellState::Empty),
            Just(CellState::Wall),
            Just(CellState::Reward),
            Just(CellState::OutOfBounds),
        ]
    }

    fn control_state() -> impl Strategy<Value = ControlState> {
        prop_oneof![
            Just(ControlState::FindWall),
            Just(ControlState::FollowWall),
            Just(ControlState::TurnCorner),
        ]
    }

    fn window() -> impl Strategy<Value = LimitedWindow> {
        (cell_state(), cell_state(), cell_state())
            .prop_map(|(left, front, right)| LimitedWindow::new(left, front, right))
    }

    fn orientation() -> impl Strategy<Value = Orientation> {
        prop_oneof![
            Just(Orientation::North),
            Just(Orientation::East),
            Just(Orientation::South),
            Just(Orientation::West),
        ]
    }

    proptest! {
        #[test]
        fn test_transition_is_deterministic(state in control_state(), window in window()) {
            prop_assert_eq!(transition(state, window), transition(state, window));

            let mut a = StateMachineAgent::with_state(state);
            let mut b = StateMachineAgent::with_state(state);
            prop_assert_eq!(a.decide(window), b.decide(window));
            prop_assert_eq!(a.state(), b.state());
        }

        #[test]
        fn test_never_moves_into_a_blocked_front(state in control_state(), window in window()) {
            let (action, _) = transition(state, window);
            if window.front.is_blocked() {
                prop_assert_ne!(action, MazeAction::MoveForward);
            }
        }

        #[test]
        fn test_follow_wall_is_stable_along_a_straight_wall(steps in 1usize..50) {
            let mut agent = StateMachineAgent::with_state(ControlState::FollowWall);
            for _ in 0..steps {
                prop_assert_eq!(agent.decide(limited(W, E, E)), MazeAction::MoveForward);
                prop_assert_eq!(agent.state(), ControlState::FollowWall);
            }
        }

        #[test]
        fn test_turn_corner_reaches_follow_wall_in_a_room(
            x in 1i32..7,
            y in 1i32..7,
            orientation in orientation(),
        ) {
            let mut env = parse_layout(
                "########\n#^.....#\n#......#\n#......#\n#......#\n#......#\n#......#\n########",
            )
            .unwrap();
            env.teleport(Pose::new(Position::new(x, y), orientation));
            let mut agent = StateMachineAgent::with_state(ControlState::TurnCorner);
            let mut cycles = 0;
            while agent.state() != ControlState::FollowWall {
                prop_assert!(cycles < 16, "no wall after {} cycles from {:?}", cycles, env.pose());
                cycle(&mut agent, &mut env);
                cycles += 1;
            }
        }

        #[test]
        fn test_at_most_three_right_turns_in_a_row(x in 1i32..7, y in 1i32..7, orientation in orientation()) {
            let mut env = parse_layout(
                "########\n#^.....#\n#......#\n#..##..#\n#..##..#\n#......#\n#......#\n########",
            )
            .unwrap();
            if env.maze().is_passable(Position::new(x, y)) {
                env.teleport(Pose::new(Position::new(x, y), orientation));
                let mut agent = StateMachineAgent::new();
                let mut right_turns = 0;
                for _ in 0..100 {
                    if cycle(&mut agent, &mut env) == MazeAction::TurnRight {
                        right_turns += 1;
                        prop_assert!(right_turns <= 3);
                    } else {
                        right_turns = 0;
                    }
                }
            }
        }
    }
}
