use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::game::Difficulty;
use crate::games::grid::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TourState {
    Empty,
    Started,
    Extended,
    Complete,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourRejection {
    #[error("The tour must start on ({}, {}).", .expected.row, .expected.col)]
    WrongStart { expected: Cell },
    #[error("({}, {}) has already been visited.", .0.row, .0.col)]
    AlreadyVisited(Cell),
    #[error("A knight cannot jump from ({}, {}) to ({}, {}).", .from.row, .from.col, .to.row, .to.col)]
    NotKnightMove { from: Cell, to: Cell },
    #[error("({}, {}) is off the board.", .0.row, .0.col)]
    OutOfBoard(Cell),
    #[error("The tour is already complete.")]
    Finished,
}

/// (|Δr|, |Δc|) must be (1, 2) or (2, 1).
pub fn is_knight_move(from: Cell, to: Cell) -> bool {
    matches!(
        (from.row.abs_diff(to.row), from.col.abs_diff(to.col)),
        (1, 2) | (2, 1)
    )
}

/// Validates a player-supplied tour one step at a time; it never searches for one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnightTour {
    size: usize,
    start: Cell,
    path: Vec<Cell>,
}

impl KnightTour {
    pub fn new(size: usize, start: Cell) -> Self {
        Self { size, start, path: Vec::with_capacity(size * size) }
    }

    /// Every built-in board has an open tour from the top-left corner.
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        let size = match difficulty {
            Difficulty::Easy => 5,
            Difficulty::Medium => 6,
            Difficulty::Hard => 8,
        };
        Self::new(size, Cell::new(0, 0))
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn start(&self) -> Cell {
        self.start
    }

    pub fn path(&self) -> &[Cell] {
        &self.path
    }

    pub fn last(&self) -> Option<Cell> {
        self.path.last().copied()
    }

    pub fn state(&self) -> TourState {
        match self.path.len() {
            0 => TourState::Empty,
            n if n == self.size * self.size => TourState::Complete,
            1 => TourState::Started,
            _ => TourState::Extended,
        }
    }

    pub fn visit(&mut self, cell: Cell) -> Result<TourState, TourRejection> {
        if self.state() == TourState::Complete {
            return Err(TourRejection::Finished);
        }
        // Any wrong first click, on the board or off it, points back to the start.
        if self.path.is_empty() && cell != self.start {
            return Err(TourRejection::WrongStart { expected: self.start });
        }
        if !cell.in_board(self.size) {
            return Err(TourRejection::OutOfBoard(cell));
        }

        match self.last() {
            None => {}
            Some(from) => {
                if self.path.contains(&cell) {
                    return Err(TourRejection::AlreadyVisited(cell));
                }
                if !is_knight_move(from, cell) {
                    return Err(TourRejection::NotKnightMove { from, to: cell });
                }
            }
        }

        self.path.push(cell);
        Ok(self.state())
    }

    /// Unvisited squares one knight move away from the last square, for on-screen hints.
    pub fn candidates(&self) -> Vec<Cell> {
        let Some(from) = self.last() else {
            return vec![self.start];
        };
        const JUMPS: [(isize, isize); 8] = [
            (1, 2), (2, 1), (2, -1), (1, -2),
            (-1, -2), (-2, -1), (-2, 1), (-1, 2),
        ];
        let n = self.size as isize;
        JUMPS
            .iter()
            .map(|&(dr, dc)| (from.row as isize + dr, from.col as isize + dc))
            .filter(|&(r, c)| (0..n).contains(&r) && (0..n).contains(&c))
            .map(|(r, c)| Cell::new(r as usize, c as usize))
            .filter(|cell| !self.path.contains(cell))
            .collect()
    }

    pub fn reset(&mut self) {
        self.path.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Warnsdorff tour of the 5×5 board from the corner.
    const TOUR_5X5: [(usize, usize); 25] = [
        (0, 0), (1, 2), (0, 4), (2, 3), (4, 4), (3, 2), (4, 0), (2, 1), (0, 2), (1, 4),
        (3, 3), (4, 1), (2, 0), (0, 1), (1, 3), (3, 4), (4, 2), (3, 0), (1, 1), (0, 3),
        (2, 4), (4, 3), (3, 1), (1, 0), (2, 2),
    ];

    #[test]
    fn knight_offsets() {
        let from = Cell::new(2, 2);
        assert!(is_knight_move(from, Cell::new(0, 1)));
        assert!(is_knight_move(from, Cell::new(3, 4)));
        assert!(!is_knight_move(from, Cell::new(3, 3)));
        assert!(!is_knight_move(from, Cell::new(2, 4)));
        assert!(!is_knight_move(from, from));
    }

    #[test]
    fn first_click_must_be_the_start() {
        let mut tour = KnightTour::new(5, Cell::new(0, 0));
        assert_eq!(
            tour.visit(Cell::new(1, 2)),
            Err(TourRejection::WrongStart { expected: Cell::new(0, 0) })
        );
        // Off-board first clicks get the same hint.
        assert_eq!(
            tour.visit(Cell::new(9, 9)),
            Err(TourRejection::WrongStart { expected: Cell::new(0, 0) })
        );
        assert_eq!(tour.state(), TourState::Empty);
        assert_eq!(tour.visit(Cell::new(0, 0)), Ok(TourState::Started));
    }

    #[test]
    fn rejections_leave_the_path_untouched() {
        let mut tour = KnightTour::new(5, Cell::new(0, 0));
        tour.visit(Cell::new(0, 0)).unwrap();
        tour.visit(Cell::new(1, 2)).unwrap();

        assert_eq!(tour.visit(Cell::new(0, 0)), Err(TourRejection::AlreadyVisited(Cell::new(0, 0))));
        assert!(matches!(tour.visit(Cell::new(1, 3)), Err(TourRejection::NotKnightMove { .. })));
        assert_eq!(tour.visit(Cell::new(7, 7)), Err(TourRejection::OutOfBoard(Cell::new(7, 7))));
        assert_eq!(tour.path().len(), 2);
        assert_eq!(tour.state(), TourState::Extended);
    }

    #[test]
    fn rejection_messages_are_distinct() {
        let messages = [
            TourRejection::WrongStart { expected: Cell::new(0, 0) }.to_string(),
            TourRejection::AlreadyVisited(Cell::new(0, 0)).to_string(),
            TourRejection::NotKnightMove { from: Cell::new(0, 0), to: Cell::new(0, 1) }.to_string(),
        ];
        assert_ne!(messages[0], messages[1]);
        assert_ne!(messages[1], messages[2]);
        assert_ne!(messages[0], messages[2]);
    }

    #[test]
    fn full_tour_completes() {
        let mut tour = KnightTour::for_difficulty(Difficulty::Easy);
        for (i, &(r, c)) in TOUR_5X5.iter().enumerate() {
            let state = tour.visit(Cell::new(r, c)).unwrap();
            if i == TOUR_5X5.len() - 1 {
                assert_eq!(state, TourState::Complete);
            } else {
                assert_ne!(state, TourState::Complete);
            }
        }
        assert_eq!(tour.visit(Cell::new(0, 1)), Err(TourRejection::Finished));

        for pair in tour.path().windows(2) {
            assert!(is_knight_move(pair[0], pair[1]));
        }
    }

    #[test]
    fn candidates_exclude_visited_squares() {
        let mut tour = KnightTour::new(5, Cell::new(0, 0));
        assert_eq!(tour.candidates(), vec![Cell::new(0, 0)]);
        tour.visit(Cell::new(0, 0)).unwrap();
        let mut next = tour.candidates();
        next.sort();
        assert_eq!(next, vec![Cell::new(1, 2), Cell::new(2, 1)]);
        tour.visit(Cell::new(1, 2)).unwrap();
        assert!(!tour.candidates().contains(&Cell::new(0, 0)));
    }
}
