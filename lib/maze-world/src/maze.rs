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

use std::fmt;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::perception::{perceive, PerceptionWindow};
use crate::Environment;

/// What an agent can observe in a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    Empty,
    Wall,
    Reward,

    /// Beyond the edge of the map. Treated exactly like a wall by every decision rule.
    OutOfBounds,
}

impl CellState {
    /// Wall-like cells: the agent can never move into them.
    pub fn is_blocked(self) -> bool {
        matches!(self, CellState::Wall | CellState::OutOfBounds)
    }

    pub fn is_open(self) -> bool {
        !self.is_blocked()
    }
}

/// Global grid coordinate. `x` grows to the east, `y` grows to the south, (0, 0) is the
/// top-left corner of the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Saturates at the edges of `i32`; such positions are always outside any map.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Compass direction the agent faces. Rotated only by turn actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    North,
    East,
    South,
    West,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::North,
        Orientation::East,
        Orientation::South,
        Orientation::West,
    ];

    /// Rotate 90 degrees counter-clockwise.
    pub fn turn_left(self) -> Self {
        match self {
            Orientation::North => Orientation::West,
            Orientation::West => Orientation::South,
            Orientation::South => Orientation::East,
            Orientation::East => Orientation::North,
        }
    }

    /// Rotate 90 degrees clockwise.
    pub fn turn_right(self) -> Self {
        match self {
            Orientation::North => Orientation::East,
            Orientation::East => Orientation::South,
            Orientation::South => Orientation::West,
            Orientation::West => Orientation::North,
        }
    }

    /// (dx, dy) of the cell directly ahead.
    pub fn forward(self) -> (i32, i32) {
        match self {
            Orientation::North => (0, -1),
            Orientation::East => (1, 0),
            Orientation::South => (0, 1),
            Orientation::West => (-1, 0),
        }
    }

    /// (dx, dy) of the cell directly to the right. Always `forward` rotated clockwise.
    pub fn right(self) -> (i32, i32) {
        self.turn_right().forward()
    }

    /// Arrow used for the agent in ASCII layouts.
    pub fn arrow(self) -> char {
        match self {
            Orientation::North => '^',
            Orientation::East => '>',
            Orientation::South => 'v',
            Orientation::West => '<',
        }
    }

    pub fn from_arrow(c: char) -> Option<Self> {
        match c {
            '^' => Some(Orientation::North),
            '>' => Some(Orientation::East),
            'v' => Some(Orientation::South),
            '<' => Some(Orientation::West),
            _ => None,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::North => write!(f, "north"),
            Orientation::East => write!(f, "east"),
            Orientation::South => write!(f, "south"),
            Orientation::West => write!(f, "west"),
        }
    }
}

/// Where the agent is and which way it faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pose {
    pub position: Position,
    pub orientation: Orientation,
}

impl Pose {
    pub fn new(position: Position, orientation: Orientation) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// The cell a `MoveForward` would enter.
    pub fn ahead(&self) -> Position {
        let (dx, dy) = self.orientation.forward();
        self.position.offset(dx, dy)
    }
}

/// The closed set of actions an agent may emit each decision cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MazeAction {
    TurnLeft,
    TurnRight,
    MoveForward,
}

impl MazeAction {
    pub const ALL: [MazeAction; 3] = [
        MazeAction::TurnLeft,
        MazeAction::TurnRight,
        MazeAction::MoveForward,
    ];
}

impl fmt::Display for MazeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MazeAction::TurnLeft => write!(f, "turn left"),
            MazeAction::TurnRight => write!(f, "turn right"),
            MazeAction::MoveForward => write!(f, "move forward"),
        }
    }
}

/// Static wall layout of a rectangular maze. Rewards are not part of the layout because they
/// disappear while an episode runs; see `MazeEnvironment`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Maze {
    width: i32,
    height: i32,
    walls: Vec<bool>,
}

impl Maze {
    /// Create a maze with no walls at all.
    pub fn new(width: i32, height: i32) -> Self {
        let cells = (width.max(0) * height.max(0)) as usize;
        Self {
            width,
            height,
            walls: vec![false; cells],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, position: Position) -> bool {
        (0..self.width).contains(&position.x) && (0..self.height).contains(&position.y)
    }

    fn index(&self, position: Position) -> Option<usize> {
        if self.in_bounds(position) {
            Some((position.y * self.width + position.x) as usize)
        } else {
            None
        }
    }

    /// Set or clear a wall. Positions outside the map are ignored.
    pub fn set_wall(&mut self, position: Position, wall: bool) {
        if let Some(i) = self.index(position) {
            self.walls[i] = wall;
        }
    }

    /// False outside the map; use `cell_state` when out-of-bounds must be told apart.
    pub fn is_wall(&self, position: Position) -> bool {
        self.index(position).map_or(false, |i| self.walls[i])
    }

    /// Whether an agent could stand on this cell.
    pub fn is_passable(&self, position: Position) -> bool {
        self.in_bounds(position) && !self.is_wall(position)
    }

    pub fn cell_state(&self, position: Position, rewards: &FxHashSet<Position>) -> CellState {
        if !self.in_bounds(position) {
            CellState::OutOfBounds
        } else if self.is_wall(position) {
            CellState::Wall
        } else if rewards.contains(&position) {
            CellState::Reward
        } else {
            CellState::Empty
        }
    }
}

/// A maze with collectible rewards and a single agent. The episode is over once every reward has
/// been collected.
#[derive(Debug, Clone)]
pub struct MazeEnvironment {
    maze: Maze,
    start: Pose,
    pose: Pose,
    initial_rewards: FxHashSet<Position>,
    rewards: FxHashSet<Position>,
    last_reward: i32,
}

impl MazeEnvironment {
    /// Rewards that sit on walls or outside the map can never be collected and are dropped.
    pub fn new(maze: Maze, start: Pose, rewards: impl IntoIterator<Item = Position>) -> Self {
        let initial_rewards: FxHashSet<Position> = rewards
            .into_iter()
            .filter(|&position| maze.is_passable(position))
            .collect();
        Self {
            maze,
            start,
            pose: start,
            rewards: initial_rewards.clone(),
            initial_rewards,
            last_reward: 0,
        }
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn start(&self) -> Pose {
        self.start
    }

    /// Rewards still waiting to be collected.
    pub fn rewards(&self) -> &FxHashSet<Position> {
        &self.rewards
    }

    pub fn total_rewards(&self) -> usize {
        self.initial_rewards.len()
    }

    pub fn rewards_remaining(&self) -> usize {
        self.rewards.len()
    }

    pub fn rewards_collected(&self) -> usize {
        self.total_rewards() - self.rewards_remaining()
    }

    /// Move the agent without going through an action, e.g. to set up a scenario.
    pub fn teleport(&mut self, pose: Pose) {
        self.pose = pose;
    }

    pub fn cell_state(&self, position: Position) -> CellState {
        self.maze.cell_state(position, &self.rewards)
    }
}

impl Environment for MazeEnvironment {
    type Action = MazeAction;
    type Percept = PerceptionWindow;
    type Reward = i32;

    fn percept(&self) -> Self::Percept {
        perceive(&self.maze, &self.rewards, self.pose)
    }

    fn execute_action(&mut self, action: &Self::Action) {
        self.last_reward = 0;
        match action {
            MazeAction::TurnLeft => {
                self.pose.orientation = self.pose.orientation.turn_left();
            }
            MazeAction::TurnRight => {
                self.pose.orientation = self.pose.orientation.turn_right();
            }
            MazeAction::MoveForward => {
                let ahead = self.pose.ahead();
                if self.maze.is_passable(ahead) {
                    self.pose.position = ahead;
                    if self.rewards.remove(&ahead) {
                        self.last_reward = 1;
                        debug!(
                            position = %ahead,
                            remaining = self.rewards.len(),
                            "reward collected"
                        );
                    }
                }
            }
        }
    }

    fn reward(&self) -> Self::Reward {
        self.last_reward
    }

    fn is_terminal(&self) -> bool {
        self.rewards.is_empty()
    }

    fn reset(&mut self) {
        self.pose = self.start;
        self.rewards = self.initial_rewards.clone();
        self.last_reward = 0;
    }
}

// print the maze in the same ASCII format `parse_layout` reads, with the agent as an arrow.
impl fmt::Display for MazeEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = String::with_capacity(((self.maze.width + 1) * self.maze.height) as usize);
        for y in 0..self.maze.height {
            for x in 0..self.maze.width {
                let position = Position::new(x, y);
                let c = if position == self.pose.position {
                    self.pose.orientation.arrow()
                } else {
                    match self.cell_state(position) {
                        CellState::Wall | CellState::OutOfBounds => '#',
                        CellState::Reward => '*',
                        CellState::Empty => '.',
                    }
                };
                s.push(c);
            }
            if y < self.maze.height - 1 {
                s.push('\n');
            }
        }
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::parse_layout;

    const CORRIDOR: &str = r#"
#####
#>.*#
#####
"#;

    fn corridor() -> MazeEnvironment {
        parse_layout(CORRIDOR).expect("valid layout")
    }

    #[test]
    fn test_four_right_turns_return_to_start() {
        for orientation in Orientation::ALL {
            let mut o = orientation;
            for _ in 0..4 {
                o = o.turn_right();
            }
            assert_eq!(o, orientation);
            assert_eq!(orientation.turn_left().turn_right(), orientation);
        }
    }

    #[test]
    fn test_right_is_forward_rotated_clockwise() {
        assert_eq!(Orientation::North.right(), (1, 0));
        assert_eq!(Orientation::East.right(), (0, 1));
        assert_eq!(Orientation::South.right(), (-1, 0));
        assert_eq!(Orientation::West.right(), (0, -1));
    }

    #[test]
    fn test_move_forward_collects_reward_and_terminates() {
        let mut env = corridor();
        assert_eq!(env.total_rewards(), 1);
        assert!(!env.is_terminal());

        env.execute_action(&MazeAction::MoveForward);
        assert_eq!(env.pose().position, Position::new(2, 1));
        assert_eq!(env.reward(), 0);

        env.execute_action(&MazeAction::MoveForward);
        assert_eq!(env.pose().position, Position::new(3, 1));
        assert_eq!(env.reward(), 1);
        assert_eq!(env.rewards_collected(), 1);
        assert!(env.is_terminal());
    }

    #[test]
    fn test_move_forward_into_wall_does_nothing() {
        let mut env = corridor();
        env.execute_action(&MazeAction::TurnLeft);
        let before = env.pose();
        env.execute_action(&MazeAction::MoveForward);
        assert_eq!(env.pose(), before);
        assert_eq!(env.reward(), 0);
    }

    #[test]
    fn test_turns_only_change_orientation() {
        let mut env = corridor();
        env.execute_action(&MazeAction::TurnRight);
        assert_eq!(
            env.pose(),
            Pose::new(Position::new(1, 1), Orientation::South)
        );
        env.execute_action(&MazeAction::TurnLeft);
        env.execute_action(&MazeAction::TurnLeft);
        assert_eq!(
            env.pose(),
            Pose::new(Position::new(1, 1), Orientation::North)
        );
    }

    #[test]
    fn test_reset_restores_pose_and_rewards() {
        let mut env = corridor();
        env.execute_action(&MazeAction::MoveForward);
        env.execute_action(&MazeAction::MoveForward);
        assert!(env.is_terminal());
        env.reset();
        assert_eq!(env.pose(), env.start());
        assert_eq!(env.rewards_remaining(), 1);
        assert_eq!(env.reward(), 0);
    }

    #[test]
    fn test_cell_state_outside_map_is_out_of_bounds() {
        let env = corridor();
        assert_eq!(env.cell_state(Position::new(-1, 0)), CellState::OutOfBounds);
        assert_eq!(env.cell_state(Position::new(5, 1)), CellState::OutOfBounds);
        assert_eq!(env.cell_state(Position::new(0, 0)), CellState::Wall);
        assert_eq!(env.cell_state(Position::new(3, 1)), CellState::Reward);
        assert_eq!(env.cell_state(Position::new(2, 1)), CellState::Empty);
    }

    #[test]
    fn test_offset_saturates_at_the_edge_of_i32() {
        let corner = Position::new(i32::MAX, i32::MIN);
        assert_eq!(corner.offset(1, -1), corner);
        assert_eq!(corner.offset(-1, 1), Position::new(i32::MAX - 1, i32::MIN + 1));
    }

    #[test]
    fn test_rewards_on_walls_are_dropped() {
        let mut maze = Maze::new(3, 3);
        maze.set_wall(Position::new(0, 0), true);
        let env = MazeEnvironment::new(
            maze,
            Pose::new(Position::new(1, 1), Orientation::North),
            [Position::new(0, 0), Position::new(2, 2), Position::new(9, 9)],
        );
        assert_eq!(env.total_rewards(), 1);
    }

    #[test]
    fn test_display_matches_layout() {
        let env = corridor();
        assert_eq!(env.to_string(), CORRIDOR.trim());
    }
}
