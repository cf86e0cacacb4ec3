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

//! ASCII maze layouts.
//!
//! One character per cell, one line per row, top row first:
//!
//! - `#` wall
//! - `.` empty floor
//! - `*` floor with a reward on it
//! - `^`, `>`, `v`, `<` the agent's starting cell, facing north, east, south or west
//!
//! Blank lines before and after the grid are ignored, so layouts can be written as raw string
//! literals.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::maze::{Maze, MazeEnvironment, Orientation, Pose, Position};

/// Layout parse error. Rows and columns are 0-based and count from the first non-blank line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// Nothing but whitespace.
    #[error("layout is empty")]
    Empty,

    /// Every row must be as wide as the first one.
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown cell {tile:?} at row {row}, column {col}")]
    UnknownTile { row: usize, col: usize, tile: char },

    #[error("layout has no agent start (one of ^ > v <)")]
    MissingAgent,

    #[error("second agent start at row {row}, column {col}")]
    MultipleAgents { row: usize, col: usize },
}

/// Parse an ASCII layout into a ready-to-run environment.
pub fn parse_layout(layout: &str) -> Result<MazeEnvironment, LayoutError> {
    let rows: Vec<&str> = layout
        .lines()
        .map(str::trim_end)
        .skip_while(|line| line.is_empty())
        .collect();
    let rows: Vec<&str> = match rows.iter().rposition(|line| !line.is_empty()) {
        Some(last) => rows[..=last].to_vec(),
        None => return Err(LayoutError::Empty),
    };

    let width = rows[0].chars().count();
    let mut maze = Maze::new(width as i32, rows.len() as i32);
    let mut rewards = Vec::new();
    let mut start: Option<Pose> = None;

    for (row, line) in rows.iter().enumerate() {
        let found = line.chars().count();
        if found != width {
            return Err(LayoutError::RaggedRow {
                row,
                expected: width,
                found,
            });
        }
        for (col, tile) in line.chars().enumerate() {
            let position = Position::new(col as i32, row as i32);
            match tile {
                '#' => maze.set_wall(position, true),
                '.' => {}
                '*' => rewards.push(position),
                _ => match Orientation::from_arrow(tile) {
                    Some(orientation) => {
                        if start.is_some() {
                            return Err(LayoutError::MultipleAgents { row, col });
                        }
                        start = Some(Pose::new(position, orientation));
                    }
                    None => return Err(LayoutError::UnknownTile { row, col, tile }),
                },
            }
        }
    }

    let start = start.ok_or(LayoutError::MissingAgent)?;
    Ok(MazeEnvironment::new(maze, start, rewards))
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown maze {0:?}, expected one of: simple, medium, hard")]
pub struct UnknownMazeError(pub String);

/// The three course mazes. Every passage is at least two cells wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuiltinMaze {
    /// 15x15, rewards along the outer boundary.
    Simple,

    /// 27x27, rewards along the inner walls.
    Medium,

    /// 32x32, rewards along the inner walls.
    Hard,
}

impl BuiltinMaze {
    pub const ALL: [BuiltinMaze; 3] = [BuiltinMaze::Simple, BuiltinMaze::Medium, BuiltinMaze::Hard];

    pub fn name(self) -> &'static str {
        match self {
            BuiltinMaze::Simple => "simple",
            BuiltinMaze::Medium => "medium",
            BuiltinMaze::Hard => "hard",
        }
    }

    pub fn layout(self) -> &'static str {
        match self {
            BuiltinMaze::Simple => SIMPLE,
            BuiltinMaze::Medium => MEDIUM,
            BuiltinMaze::Hard => HARD,
        }
    }

    /// Number of decision cycles an episode gets on this maze.
    pub fn default_step_budget(self) -> i32 {
        match self {
            BuiltinMaze::Simple => 60,
            BuiltinMaze::Medium => 250,
            BuiltinMaze::Hard => 200,
        }
    }

    pub fn environment(self) -> Result<MazeEnvironment, LayoutError> {
        parse_layout(self.layout())
    }
}

impl std::fmt::Display for BuiltinMaze {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for BuiltinMaze {
    type Err = UnknownMazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BuiltinMaze::ALL
            .into_iter()
            .find(|maze| maze.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownMazeError(s.to_string()))
    }
}

const SIMPLE: &str = r#"
###############
#***********###
#*^........*###
#*..#...#..*###
#*..#...#..***#
#*......#....*#
#*......#....*#
#*.###..####.*#
#*......#....*#
#*......#....*#
#*..#...#....*#
#*..#...####.*#
#*...........*#
#*************#
###############
"#;

const MEDIUM: &str = r#"
###########################
###########################
###########################
###########################
#.........................#
#..*****..*****...*....*..#
#.*#####**#####*.*#*..*#*.#
#..****#*.****#*.*#*..*#*.#
#.....*#*....*#*.*#*..*#*.#
#.....*#*....*#*.*#*..*#*.#
#..>..*#*....*#*.*#*..*#*.#
#.....*#*....*#*.*#*..*#*.#
#..****#*.****#*.*#*..*#*.#
#.*#####**#####*.*#*..*#*.#
#..****#**#****..*#*..*#*.#
#.....*#**#*.....*#*..*#*.#
#.....*#**#*.....*#*..*#*.#
#.....*#**#*.....*#*..*#*.#
#.....*#**#*.....*#*..*#*.#
#..****#**#*******#****#*.#
#.*#####################*.#
#..*********************..#
#.........................#
###########################
###########################
###########################
###########################
"#;

const HARD: &str = r#"
################################
################################
################################
################################
################################
################################
#..............................#
#.......***..........*******...#
#......*###*<.......*#######*..#
#......*###*.........**###**...#
#.....*#####*.........*###*....#
#.....*#..###*........*###*....#
#.....*#..###*........*###*....#
#....*##..###*........*###*....#
#....*#....###*.......*###*....#
#....*#.....##*.......*###*....#
#....*#.....###*......*###*....#
#....*#########*......*###*....#
#...*##*****####*.....*###*....#
#...*##*....*###*.....*###*....#
#...*##*....*####*....*###*....#
#...*##*.....*###*....*###*....#
#..*###*......*###*****###**...#
#.*#####*.....*#############*..#
#..*****.......*************...#
#..............................#
################################
################################
################################
################################
################################
################################
"#;
