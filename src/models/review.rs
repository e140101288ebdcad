//! Review record model
//!
//! The review record is stored as a single JSON document nested inside the
//! submission row. It holds one entry per reviewer for the current round and
//! the tallied final decision once every assigned reviewer has responded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Individual reviewer decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Approved,
    NeedsRevision,
    Rejected,
}

impl ReviewDecision {
    /// All decisions, in tally order
    pub const ALL: [ReviewDecision; 3] = [
        ReviewDecision::Approved,
        ReviewDecision::NeedsRevision,
        ReviewDecision::Rejected,
    ];

    /// Get decision as string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::NeedsRevision => "needs_revision",
            Self::Rejected => "rejected",
        }
    }

    /// Parse decision from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "approved" => Some(Self::Approved),
            "needs_revision" => Some(Self::NeedsRevision),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    fn index(&self) -> usize {
        match self {
            Self::Approved => 0,
            Self::NeedsRevision => 1,
            Self::Rejected => 2,
        }
    }
}

impl std::fmt::Display for ReviewDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single reviewer's response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewEntry {
    pub reviewer: Uuid,
    pub decision: ReviewDecision,
    pub comment: String,
    pub submitted_at: DateTime<Utc>,
}

/// Nested review record of a submission
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    #[serde(default)]
    pub reviews: Vec<ReviewEntry>,
    #[serde(default)]
    pub final_decision: Option<ReviewDecision>,
}

impl ReviewRecord {
    /// Whether `reviewer` already responded in this round
    pub fn has_reviewed(&self, reviewer: &Uuid) -> bool {
        self.reviews.iter().any(|r| &r.reviewer == reviewer)
    }

    /// Drop entries from reviewers that are no longer assigned
    pub fn retain_assigned(&mut self, assigned: &[Uuid]) {
        self.reviews.retain(|r| assigned.contains(&r.reviewer));
    }

    /// Whether every assigned reviewer has responded
    pub fn is_complete(&self, assigned: &[Uuid]) -> bool {
        !assigned.is_empty() && assigned.iter().all(|id| self.has_reviewed(id))
    }

    /// Tally the decisions of assigned reviewers
    pub fn tally(&self, assigned: &[Uuid]) -> Option<ReviewDecision> {
        majority(
            self.reviews
                .iter()
                .filter(|r| assigned.contains(&r.reviewer))
                .map(|r| r.decision),
        )
    }

    /// Clear the record for a new round
    pub fn reset(&mut self) {
        self.reviews.clear();
        self.final_decision = None;
    }
}

/// Majority decision over individual reviewer decisions.
///
/// The outcome with strictly more votes than every other outcome wins.
/// A tie at the top count resolves to [`ReviewDecision::NeedsRevision`].
/// Returns `None` when there are no decisions at all.
pub fn majority<I>(decisions: I) -> Option<ReviewDecision>
where
    I: IntoIterator<Item = ReviewDecision>,
{
    let mut counts = [0usize; 3];
    for decision in decisions {
        counts[decision.index()] += 1;
    }

    let top = *counts.iter().max()?;
    if top == 0 {
        return None;
    }

    let mut leaders = ReviewDecision::ALL
        .into_iter()
        .filter(|d| counts[d.index()] == top);

    match (leaders.next(), leaders.next()) {
        (Some(winner), None) => Some(winner),
        _ => Some(ReviewDecision::NeedsRevision),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ReviewDecision::*;

    fn entry(reviewer: Uuid, decision: ReviewDecision) -> ReviewEntry {
        ReviewEntry {
            reviewer,
            decision,
            comment: "ok".to_string(),
            submitted_at: Utc::now(),
        }
    }

    #[test]
    fn test_majority_picks_strict_winner() {
        assert_eq!(majority([Approved, Approved, Rejected]), Some(Approved));
        assert_eq!(majority([Rejected]), Some(Rejected));
        assert_eq!(majority([Rejected, NeedsRevision, Rejected]), Some(Rejected));
    }

    #[test]
    fn test_majority_tie_needs_revision() {
        assert_eq!(majority([Approved, Rejected]), Some(NeedsRevision));
        assert_eq!(majority([Approved, NeedsRevision, Rejected]), Some(NeedsRevision));
        assert_eq!(
            majority([Approved, Approved, Rejected, Rejected, NeedsRevision]),
            Some(NeedsRevision)
        );
    }

    #[test]
    fn test_majority_empty() {
        assert_eq!(majority(std::iter::empty()), None);
    }

    #[test]
    fn test_tally_ignores_unassigned_reviewers() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let record = ReviewRecord {
            reviews: vec![entry(a, Approved), entry(b, Rejected), entry(c, Rejected)],
            final_decision: None,
        };

        assert_eq!(record.tally(&[a, b, c]), Some(Rejected));
        assert_eq!(record.tally(&[a]), Some(Approved));
    }

    #[test]
    fn test_completion_and_retain() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let mut record = ReviewRecord {
            reviews: vec![entry(a, Approved)],
            final_decision: None,
        };

        assert!(!record.is_complete(&[a, b]));
        assert!(record.is_complete(&[a]));
        assert!(!record.is_complete(&[]));

        record.retain_assigned(&[b]);
        assert!(record.reviews.is_empty());
    }

    #[test]
    fn test_record_deserializes_from_empty_object() {
        let record: ReviewRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(record, ReviewRecord::default());
    }
}
