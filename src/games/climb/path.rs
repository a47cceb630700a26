use serde::{Deserialize, Serialize};

use crate::core::game::Difficulty;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClimbChallenge {
    pub grid_size: usize,
    /// 1-based cell numbers, in the order they must be clicked.
    pub correct_path: Vec<usize>,
}

impl ClimbChallenge {
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self { grid_size: 3, correct_path: vec![2, 5, 8] },
            Difficulty::Medium => Self { grid_size: 4, correct_path: vec![4, 7, 10, 13] },
            Difficulty::Hard => Self { grid_size: 5, correct_path: vec![1, 7, 13, 19, 25] },
        }
    }

    pub fn cell_count(&self) -> usize {
        self.grid_size * self.grid_size
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClimbStatus {
    Playing,
    Won,
    Wrong,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossClimb {
    challenge: ClimbChallenge,
    progress: usize,
    status: ClimbStatus,
    wrong_cell: Option<usize>,
}

impl CrossClimb {
    pub fn new(challenge: ClimbChallenge) -> Self {
        Self { challenge, progress: 0, status: ClimbStatus::Playing, wrong_cell: None }
    }

    pub fn challenge(&self) -> &ClimbChallenge {
        &self.challenge
    }

    pub fn status(&self) -> ClimbStatus {
        self.status
    }

    /// Cells of the path climbed so far.
    pub fn climbed(&self) -> &[usize] {
        &self.challenge.correct_path[..self.progress]
    }

    pub fn wrong_cell(&self) -> Option<usize> {
        self.wrong_cell
    }

    /// Once the climb is won or wrong every further click is ignored.
    pub fn click(&mut self, cell: usize) -> ClimbStatus {
        if self.status != ClimbStatus::Playing || cell == 0 || cell > self.challenge.cell_count() {
            return self.status;
        }

        if self.challenge.correct_path.get(self.progress) == Some(&cell) {
            self.progress += 1;
            if self.progress == self.challenge.correct_path.len() {
                self.status = ClimbStatus::Won;
            }
        } else {
            self.status = ClimbStatus::Wrong;
            self.wrong_cell = Some(cell);
        }
        self.status
    }

    pub fn reset(&mut self) {
        self.progress = 0;
        self.status = ClimbStatus::Playing;
        self.wrong_cell = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn easy() -> CrossClimb {
        CrossClimb::new(ClimbChallenge::for_difficulty(Difficulty::Easy))
    }

    #[test]
    fn easy_path_in_order_wins() {
        let mut climb = easy();
        assert_eq!(climb.click(2), ClimbStatus::Playing);
        assert_eq!(climb.click(5), ClimbStatus::Playing);
        assert_eq!(climb.click(8), ClimbStatus::Won);
        assert_eq!(climb.climbed(), &[2, 5, 8]);
    }

    #[test]
    fn a_wrong_step_locks_the_climb() {
        let mut climb = easy();
        climb.click(2);
        assert_eq!(climb.click(3), ClimbStatus::Wrong);
        assert_eq!(climb.click(5), ClimbStatus::Wrong);
        assert_eq!(climb.climbed(), &[2]);
        assert_eq!(climb.wrong_cell(), Some(3));
    }

    #[test]
    fn clicks_off_the_grid_are_ignored() {
        let mut climb = easy();
        assert_eq!(climb.click(0), ClimbStatus::Playing);
        assert_eq!(climb.click(10), ClimbStatus::Playing);
        assert!(climb.climbed().is_empty());
    }

    #[test]
    fn reset_starts_over() {
        let mut climb = easy();
        climb.click(9);
        climb.reset();
        assert_eq!(climb.status(), ClimbStatus::Playing);
        assert_eq!(climb.click(2), ClimbStatus::Playing);
    }

    #[test]
    fn built_in_paths_fit_their_grids() {
        for d in Difficulty::ALL {
            let c = ClimbChallenge::for_difficulty(d);
            assert!(c.correct_path.iter().all(|&n| (1..=c.cell_count()).contains(&n)));
        }
    }
}
