//! Best-candidate tracking along a disparity sweep.

use std::cmp::Ordering;

/// Direction in which scores improve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Polarity {
    /// Lower scores are better (SSD).
    Minimize,
    /// Higher scores are better (NCC).
    Maximize,
}

impl Polarity {
    /// Returns true when `candidate` strictly beats `incumbent`.
    fn improves(self, candidate: f32, incumbent: f32) -> bool {
        let ord = candidate.total_cmp(&incumbent);
        match self {
            Polarity::Minimize => ord == Ordering::Less,
            Polarity::Maximize => ord == Ordering::Greater,
        }
    }
}

/// Scored candidate offset within a search strip.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    /// Offset from the first candidate position.
    pub offset: usize,
    /// Score at that offset.
    pub score: f32,
}

/// Keeps the best scored offset seen so far.
///
/// Only a strict improvement replaces the incumbent, so among equal scores
/// the earliest offset wins. NaN scores are ignored.
pub struct BestScore {
    polarity: Polarity,
    best: Option<Candidate>,
}

impl BestScore {
    /// Creates an empty tracker.
    pub fn new(polarity: Polarity) -> Self {
        Self {
            polarity,
            best: None,
        }
    }

    /// Offers a scored offset.
    pub fn push(&mut self, offset: usize, score: f32) {
        if score.is_nan() {
            return;
        }
        match self.best {
            Some(best) if !self.polarity.improves(score, best.score) => {}
            _ => self.best = Some(Candidate { offset, score }),
        }
    }

    /// Returns the best candidate, if any was pushed.
    pub fn best(&self) -> Option<Candidate> {
        self.best
    }

    /// Returns the winning offset, or 0 when no candidate was pushed.
    pub fn offset_or_zero(&self) -> usize {
        self.best.map_or(0, |best| best.offset)
    }
}
