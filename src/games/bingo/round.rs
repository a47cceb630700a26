use std::collections::BTreeSet;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

pub const CARD_SIZE: usize = 5;
pub const CARD_CELLS: u8 = (CARD_SIZE * CARD_SIZE) as u8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Predicate {
    Even,
    DivisibleBy3,
    Prime,
}

impl Predicate {
    pub fn matches(self, n: u8) -> bool {
        match self {
            Predicate::Even => n % 2 == 0,
            Predicate::DivisibleBy3 => n % 3 == 0,
            Predicate::Prime => is_prime(u32::from(n)),
        }
    }

    pub fn prompt(self) -> &'static str {
        match self {
            Predicate::Even => "Select every EVEN number",
            Predicate::DivisibleBy3 => "Select every number DIVISIBLE BY 3",
            Predicate::Prime => "Select every PRIME number",
        }
    }
}

/// Trial division up to √n.
pub fn is_prime(n: u32) -> bool {
    if n < 2 {
        return false;
    }
    let mut d = 2;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 1;
    }
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoundSpec {
    pub label: &'static str,
    pub predicate: Predicate,
    pub base_points: u32,
    pub time_limit: Duration,
}

pub const ROUNDS: [RoundSpec; 3] = [
    RoundSpec { label: "Easy", predicate: Predicate::Even, base_points: 100, time_limit: Duration::from_secs(30) },
    RoundSpec { label: "Medium", predicate: Predicate::DivisibleBy3, base_points: 200, time_limit: Duration::from_secs(45) },
    RoundSpec { label: "Hard", predicate: Predicate::Prime, base_points: 300, time_limit: Duration::from_secs(60) },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundStatus {
    Playing,
    Won,
    Lost { wrong: u8 },
    TimedOut,
}

impl RoundStatus {
    pub fn is_over(self) -> bool {
        self != RoundStatus::Playing
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BingoRound {
    spec: RoundSpec,
    numbers: Vec<u8>,
    selected: BTreeSet<u8>,
    remaining: Duration,
    status: RoundStatus,
}

impl BingoRound {
    pub fn new(spec: RoundSpec, rng: &mut StdRng) -> Self {
        let mut numbers: Vec<u8> = (1..=CARD_CELLS).collect();
        numbers.shuffle(rng);
        Self {
            spec,
            numbers,
            selected: BTreeSet::new(),
            remaining: spec.time_limit,
            status: RoundStatus::Playing,
        }
    }

    pub fn spec(&self) -> RoundSpec {
        self.spec
    }

    /// Card contents in display order.
    pub fn numbers(&self) -> &[u8] {
        &self.numbers
    }

    pub fn selected(&self) -> &BTreeSet<u8> {
        &self.selected
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn status(&self) -> RoundStatus {
        self.status
    }

    pub fn targets(&self) -> BTreeSet<u8> {
        self.numbers.iter().copied().filter(|&n| self.spec.predicate.matches(n)).collect()
    }

    /// A wrong pick ends the round on the spot; there is no undo.
    pub fn select(&mut self, n: u8) -> RoundStatus {
        if self.status.is_over() || !self.numbers.contains(&n) {
            return self.status;
        }
        if !self.spec.predicate.matches(n) {
            self.status = RoundStatus::Lost { wrong: n };
            return self.status;
        }
        self.selected.insert(n);
        if self.selected == self.targets() {
            self.status = RoundStatus::Won;
        }
        self.status
    }

    pub fn tick(&mut self, elapsed: Duration) -> RoundStatus {
        if self.status == RoundStatus::Playing {
            self.remaining = self.remaining.saturating_sub(elapsed);
            if self.remaining.is_zero() {
                self.status = RoundStatus::TimedOut;
            }
        }
        self.status
    }

    /// Base points plus floor(remaining fraction × base) for a win, zero otherwise.
    pub fn score(&self) -> u32 {
        match self.status {
            RoundStatus::Won => {
                let base = u128::from(self.spec.base_points);
                let limit = self.spec.time_limit.as_millis().max(1);
                let bonus = self.remaining.as_millis() * base / limit;
                self.spec.base_points + bonus as u32
            }
            _ => 0,
        }
    }
}

/// Three rounds of increasing difficulty; advancing is always an explicit step.
#[derive(Debug)]
pub struct BingoSession {
    rng: StdRng,
    index: usize,
    round: BingoRound,
    banked: u32,
}

impl BingoSession {
    pub fn new() -> Self {
        Self::with_rng(StdRng::seed_from_u64(rand::random()))
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(mut rng: StdRng) -> Self {
        let round = BingoRound::new(ROUNDS[0], &mut rng);
        Self { rng, index: 0, round, banked: 0 }
    }

    /// Starts at a later round, for difficulty selection from the menu.
    pub fn starting_at(round_index: usize) -> Self {
        let mut session = Self::new();
        let index = round_index.min(ROUNDS.len() - 1);
        session.index = index;
        session.round = BingoRound::new(ROUNDS[index], &mut session.rng);
        session
    }

    pub fn round(&self) -> &BingoRound {
        &self.round
    }

    pub fn round_mut(&mut self) -> &mut BingoRound {
        &mut self.round
    }

    /// 1-based round number.
    pub fn round_number(&self) -> usize {
        self.index + 1
    }

    pub fn total_score(&self) -> u32 {
        self.banked + self.round.score()
    }

    pub fn is_finished(&self) -> bool {
        self.index == ROUNDS.len() - 1 && self.round.status().is_over()
    }

    /// Moves to the next round. Refused while the current round is still running.
    pub fn advance(&mut self) -> bool {
        if !self.round.status().is_over() || self.index + 1 >= ROUNDS.len() {
            return false;
        }
        self.banked += self.round.score();
        self.index += 1;
        self.round = BingoRound::new(ROUNDS[self.index], &mut self.rng);
        true
    }
}

impl Default for BingoSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round(spec: RoundSpec) -> BingoRound {
        BingoRound::new(spec, &mut StdRng::seed_from_u64(7))
    }

    #[test]
    fn primes_by_trial_division() {
        let primes: Vec<u32> = (0..=25).filter(|&n| is_prime(n)).collect();
        assert_eq!(primes, vec![2, 3, 5, 7, 11, 13, 17, 19, 23]);
    }

    #[test]
    fn card_holds_each_number_once() {
        let r = round(ROUNDS[0]);
        let mut sorted = r.numbers().to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, (1..=25).collect::<Vec<u8>>());
    }

    #[test]
    fn predicate_targets() {
        assert_eq!(round(ROUNDS[0]).targets().len(), 12);
        assert_eq!(round(ROUNDS[1]).targets(), BTreeSet::from([3, 6, 9, 12, 15, 18, 21, 24]));
        assert_eq!(round(ROUNDS[2]).targets().len(), 9);
    }

    #[test]
    fn selecting_all_targets_wins() {
        let mut r = round(ROUNDS[1]);
        let targets = r.targets();
        for (i, &n) in targets.iter().enumerate() {
            let status = r.select(n);
            if i + 1 < targets.len() {
                assert_eq!(status, RoundStatus::Playing);
            }
        }
        assert_eq!(r.status(), RoundStatus::Won);
        assert_eq!(r.selected(), &targets);
    }

    #[test]
    fn wrong_pick_loses_immediately() {
        let mut r = round(ROUNDS[2]);
        r.select(2);
        assert_eq!(r.select(4), RoundStatus::Lost { wrong: 4 });
        // No recovery once lost.
        for n in r.targets() {
            r.select(n);
        }
        assert_eq!(r.status(), RoundStatus::Lost { wrong: 4 });
        assert_eq!(r.score(), 0);
    }

    #[test]
    fn reselecting_is_a_noop() {
        let mut r = round(ROUNDS[0]);
        r.select(2);
        r.select(2);
        assert_eq!(r.selected().len(), 1);
        assert_eq!(r.status(), RoundStatus::Playing);
    }

    #[test]
    fn countdown_times_out() {
        let mut r = round(ROUNDS[0]);
        assert_eq!(r.tick(Duration::from_secs(29)), RoundStatus::Playing);
        assert_eq!(r.tick(Duration::from_secs(2)), RoundStatus::TimedOut);
        assert_eq!(r.remaining(), Duration::ZERO);
        assert_eq!(r.select(2), RoundStatus::TimedOut);
        assert_eq!(r.score(), 0);
    }

    #[test]
    fn score_adds_floored_time_bonus() {
        let mut r = round(ROUNDS[0]);
        r.tick(Duration::from_secs(10));
        for n in r.targets() {
            r.select(n);
        }
        // 20s of 30s left: 100 + floor(2/3 × 100).
        assert_eq!(r.score(), 166);
    }

    #[test]
    fn advance_requires_a_finished_round() {
        let mut session = BingoSession::with_seed(1);
        assert!(!session.advance());
        assert_eq!(session.round_number(), 1);

        for n in session.round().targets() {
            session.round_mut().select(n);
        }
        let first = session.total_score();
        assert_eq!(first, 200);
        assert!(session.advance());
        assert_eq!(session.round_number(), 2);
        assert_eq!(session.round().spec().label, "Medium");
        assert_eq!(session.total_score(), first);
    }

    #[test]
    fn session_finishes_after_last_round() {
        let mut session = BingoSession::starting_at(2);
        assert_eq!(session.round().spec().predicate, Predicate::Prime);
        session.round_mut().select(1);
        assert!(session.is_finished());
        assert!(!session.advance());
    }
}
