//! Streak tracker: run length of the newest pattern kind.

use crate::domain::{PatternHit, PatternKind};

/// Default streak length at which the dashboard flags exhaustion.
pub const DEFAULT_EXHAUSTION_THRESHOLD: usize = 7;

/// The newest run of pattern hits sharing one kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Streak {
    /// Kind of the newest hit, or `None` when there are no hits.
    pub kind: Option<PatternKind>,
    /// The hits of the streak, oldest-first.
    pub hits: Vec<PatternHit>,
}

impl Streak {
    /// Walk the oldest-first hit list from the newest end while the kind matches.
    pub fn from_hits(hits: &[PatternHit]) -> Self {
        let Some(newest) = hits.last() else {
            return Self::default();
        };
        let kind = newest.kind;
        let run = hits
            .iter()
            .rev()
            .take_while(|h| h.kind == kind)
            .count();

        Self {
            kind: Some(kind),
            hits: hits[hits.len() - run..].to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// True once the streak reaches `threshold`. A zero threshold never fires.
    pub fn is_exhausted(&self, threshold: usize) -> bool {
        threshold > 0 && self.len() >= threshold
    }
}
