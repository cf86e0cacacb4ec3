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

use maze_world::{Agent, MazeAction, PerceptionWindow};
use rand::seq::SliceRandom;
use rand::SeedableRng;

pub type Rng = rand_pcg::Pcg64;

/// Ignores what it sees and picks an action uniformly at random. The baseline the wall followers
/// are compared against.
#[derive(Debug, Clone)]
pub struct NaiveAgent {
    seed: u64,
    rng: Rng,
}

impl NaiveAgent {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Rng::seed_from_u64(seed),
        }
    }
}

impl Agent for NaiveAgent {
    type Action = MazeAction;
    type Percept = PerceptionWindow;

    fn act(&mut self, _percept: &Self::Percept) -> Self::Action {
        MazeAction::ALL
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(MazeAction::MoveForward)
    }

    fn reset(&mut self) {
        self.rng = Rng::seed_from_u64(self.seed);
    }
}

#[cfg(test)]
mod tests {
    use maze_world::CellState;

    use super::*;

    fn actions(agent: &mut NaiveAgent, n: usize) -> Vec<MazeAction> {
        let window = PerceptionWindow::filled(CellState::Empty);
        (0..n).map(|_| agent.act(&window)).collect()
    }

    #[test]
    fn test_same_seed_same_actions() {
        let mut a = NaiveAgent::new(7);
        let mut b = NaiveAgent::new(7);
        assert_eq!(actions(&mut a, 100), actions(&mut b, 100));
    }

    #[test]
    fn test_reset_replays_the_same_actions() {
        let mut agent = NaiveAgent::new(42);
        let first = actions(&mut agent, 50);
        agent.reset();
        assert_eq!(actions(&mut agent, 50), first);
    }

    #[test]
    fn test_uses_every_action() {
        let mut agent = NaiveAgent::new(1);
        let taken = actions(&mut agent, 300);
        for action in MazeAction::ALL {
            assert!(taken.contains(&action), "{} never chosen", action);
        }
    }
}
