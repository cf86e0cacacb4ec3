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

//! Agent-relative perception.
//!
//! The agent sees the 3x3 block of cells around it, but labelled from its own point of view
//! rather than by compass direction:
//!
//! ```text
//! [TL] [TF] [TR]    TL = top-left,    TF = top-front,    TR = top-right
//! [ML] [AG] [MR]    ML = mid-left,    AG = the agent,    MR = mid-right
//! [BL] [BF] [BR]    BL = bottom-left, BF = bottom-front, BR = bottom-right
//! ```
//!
//! "Top" is always the direction the agent faces, whatever its global orientation. The window is
//! a pure function of the maze and the agent's pose and must be recomputed after every action,
//! because a turn changes which global cell each label refers to.

use std::fmt;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::maze::{CellState, Maze, Pose, Position};

/// A cell of the perception window, relative to the agent's facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelativeCell {
    TopLeft,
    TopFront,
    TopRight,
    MidLeft,
    MidRight,
    BottomLeft,
    BottomFront,
    BottomRight,
}

impl RelativeCell {
    pub const ALL: [RelativeCell; 8] = [
        RelativeCell::TopLeft,
        RelativeCell::TopFront,
        RelativeCell::TopRight,
        RelativeCell::MidLeft,
        RelativeCell::MidRight,
        RelativeCell::BottomLeft,
        RelativeCell::BottomFront,
        RelativeCell::BottomRight,
    ];

    /// (steps forward, steps right) from the agent. Negative values mean behind / to the left.
    pub fn offset(self) -> (i32, i32) {
        match self {
            RelativeCell::TopLeft => (1, -1),
            RelativeCell::TopFront => (1, 0),
            RelativeCell::TopRight => (1, 1),
            RelativeCell::MidLeft => (0, -1),
            RelativeCell::MidRight => (0, 1),
            RelativeCell::BottomLeft => (-1, -1),
            RelativeCell::BottomFront => (-1, 0),
            RelativeCell::BottomRight => (-1, 1),
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// The global cell a relative label refers to for a given pose.
pub fn locate(pose: Pose, cell: RelativeCell) -> Position {
    let (forward, right) = cell.offset();
    let (fx, fy) = pose.orientation.forward();
    let (rx, ry) = pose.orientation.right();
    pose.position.offset(forward * fx + right * rx, forward * fy + right * ry)
}

/// Build the full 8-cell window for an agent standing at `pose`.
pub fn perceive(maze: &Maze, rewards: &FxHashSet<Position>, pose: Pose) -> PerceptionWindow {
    let mut cells = [CellState::OutOfBounds; 8];
    for cell in RelativeCell::ALL {
        cells[cell.index()] = maze.cell_state(locate(pose, cell), rewards);
    }
    PerceptionWindow { cells }
}

/// Full orientation-relative view of the eight cells around the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PerceptionWindow {
    cells: [CellState; 8],
}

impl PerceptionWindow {
    /// Cells are given in `RelativeCell::ALL` order.
    pub fn from_cells(cells: [CellState; 8]) -> Self {
        Self { cells }
    }

    /// A window where every cell has the same state.
    pub fn filled(state: CellState) -> Self {
        Self { cells: [state; 8] }
    }

    /// Builder-style override of a single cell, mostly for setting up scenarios.
    pub fn with(mut self, cell: RelativeCell, state: CellState) -> Self {
        self.cells[cell.index()] = state;
        self
    }

    pub fn get(&self, cell: RelativeCell) -> CellState {
        self.cells[cell.index()]
    }

    pub fn front(&self) -> CellState {
        self.get(RelativeCell::TopFront)
    }

    pub fn left(&self) -> CellState {
        self.get(RelativeCell::MidLeft)
    }

    pub fn right(&self) -> CellState {
        self.get(RelativeCell::MidRight)
    }

    /// Drop everything except left, front and right.
    pub fn limited(&self) -> LimitedWindow {
        LimitedWindow {
            left: self.left(),
            front: self.front(),
            right: self.right(),
        }
    }

    /// Nothing in the window could be read.
    pub fn is_unreadable(&self) -> bool {
        self.cells.iter().all(|&c| c == CellState::OutOfBounds)
    }
}

fn cell_char(state: CellState) -> char {
    match state {
        CellState::Empty => '.',
        CellState::Wall => '#',
        CellState::Reward => '*',
        CellState::OutOfBounds => '?',
    }
}

// 3x3 grid, front row on top, agent in the middle always pointing up.
impl fmt::Display for PerceptionWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use RelativeCell::*;
        let c = |cell| cell_char(self.get(cell));
        writeln!(f, "{}{}{}", c(TopLeft), c(TopFront), c(TopRight))?;
        writeln!(f, "{}^{}", c(MidLeft), c(MidRight))?;
        write!(f, "{}{}{}", c(BottomLeft), c(BottomFront), c(BottomRight))
    }
}

/// The three cells a limited-perception agent can see. Everything else is hidden from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LimitedWindow {
    pub left: CellState,
    pub front: CellState,
    pub right: CellState,
}

impl LimitedWindow {
    pub fn new(left: CellState, front: CellState, right: CellState) -> Self {
        Self { left, front, right }
    }

    pub fn is_unreadable(&self) -> bool {
        [self.left, self.front, self.right]
            .iter()
            .all(|&c| c == CellState::OutOfBounds)
    }
}
