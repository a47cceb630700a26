use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::core::game::Difficulty;
use crate::games::grid::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueensVariant {
    /// Place `target` queens with no two attacking each other.
    NonAttacking,
    /// Cover every square using at most `target` queens.
    Domination,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueensChallenge {
    pub size: usize,
    pub target: usize,
    pub variant: QueensVariant,
}

impl QueensChallenge {
    pub fn non_attacking(difficulty: Difficulty) -> Self {
        let (size, target) = match difficulty {
            Difficulty::Easy => (4, 4),
            Difficulty::Medium => (5, 5),
            Difficulty::Hard => (8, 8),
        };
        Self { size, target, variant: QueensVariant::NonAttacking }
    }

    /// Targets are the known domination numbers for each board size.
    pub fn domination(difficulty: Difficulty) -> Self {
        let (size, target) = match difficulty {
            Difficulty::Easy => (4, 2),
            Difficulty::Medium => (5, 3),
            Difficulty::Hard => (8, 5),
        };
        Self { size, target, variant: QueensVariant::Domination }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    OutOfBoard,
    UnderAttack,
    TargetReached,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Placed,
    Removed,
    Rejected(Rejection),
}

/// True when a queen on `a` attacks `b` (shared row, column or diagonal).
pub fn attacks(a: Cell, b: Cell) -> bool {
    a.row == b.row || a.col == b.col || a.row.abs_diff(b.row) == a.col.abs_diff(b.col)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueensBoard {
    challenge: QueensChallenge,
    queens: Vec<Cell>,
}

impl QueensBoard {
    pub fn new(challenge: QueensChallenge) -> Self {
        Self { challenge, queens: Vec::new() }
    }

    pub fn challenge(&self) -> QueensChallenge {
        self.challenge
    }

    pub fn queens(&self) -> &[Cell] {
        &self.queens
    }

    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.queens.contains(&cell)
    }

    pub fn is_under_attack(&self, row: usize, col: usize) -> bool {
        let candidate = Cell::new(row, col);
        self.queens.iter().any(|&q| attacks(q, candidate))
    }

    /// Single entry point for clicks: occupied cells lose their queen, free cells gain one.
    pub fn toggle(&mut self, cell: Cell) -> Placement {
        if !cell.in_board(self.challenge.size) {
            return Placement::Rejected(Rejection::OutOfBoard);
        }

        if let Some(idx) = self.queens.iter().position(|&q| q == cell) {
            self.queens.remove(idx);
            return Placement::Removed;
        }

        if self.challenge.variant == QueensVariant::NonAttacking {
            if self.queens.len() >= self.challenge.target {
                return Placement::Rejected(Rejection::TargetReached);
            }
            if self.is_under_attack(cell.row, cell.col) {
                return Placement::Rejected(Rejection::UnderAttack);
            }
        }

        self.queens.push(cell);
        Placement::Placed
    }

    /// Every square that is occupied or attacked, walking each queen's lines to the board edge.
    pub fn coverage(&self) -> HashSet<Cell> {
        let n = self.challenge.size as isize;
        let mut covered = HashSet::new();
        const RAYS: [(isize, isize); 8] = [
            (0, 1), (0, -1), (1, 0), (-1, 0),
            (1, 1), (1, -1), (-1, 1), (-1, -1),
        ];

        for &q in &self.queens {
            covered.insert(q);
            for (dr, dc) in RAYS {
                let (mut r, mut c) = (q.row as isize + dr, q.col as isize + dc);
                while (0..n).contains(&r) && (0..n).contains(&c) {
                    covered.insert(Cell::new(r as usize, c as usize));
                    r += dr;
                    c += dc;
                }
            }
        }
        covered
    }

    pub fn is_won(&self) -> bool {
        let QueensChallenge { size, target, variant } = self.challenge;
        match variant {
            QueensVariant::NonAttacking => {
                self.queens.len() == target
                    && self.queens.iter().enumerate().all(|(i, &a)| {
                        self.queens[i + 1..].iter().all(|&b| !attacks(a, b))
                    })
            }
            // Full coverage with fewer queens than the target also counts.
            QueensVariant::Domination => {
                !self.queens.is_empty()
                    && self.queens.len() <= target
                    && self.coverage().len() == size * size
            }
        }
    }

    pub fn reset(&mut self) {
        self.queens.clear();
    }
}
