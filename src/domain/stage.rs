//! Stage vocabularies for pipeline items.
//!
//! Every entity tracked on a board draws its `status` from a fixed,
//! entity-specific vocabulary. Transitions are free-form (any stage to any
//! other); the vocabulary order only drives column layout and the
//! advance/retreat-by-one convenience.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a status string is not part of a vocabulary.
#[derive(Debug, Clone, Error)]
#[error("unknown stage '{value}', expected one of: {expected}")]
pub struct UnknownStage {
    /// The rejected input
    pub value: String,

    /// Comma-separated list of valid stage names
    pub expected: String,
}

/// A member of a fixed stage vocabulary.
///
/// `VOCABULARY` is the source of truth for stage ordering: boards render
/// one column per entry, in this order.
pub trait Stage: Copy + Eq + fmt::Debug + Sized + 'static {
    /// The canonical ordering of stages for this entity type.
    const VOCABULARY: &'static [Self];

    /// Wire name of this stage (matches the serde representation).
    fn as_str(&self) -> &'static str;

    /// The default stage for newly created items (first vocabulary entry).
    fn first() -> Self {
        Self::VOCABULARY[0]
    }

    /// 0-based position of this stage in the vocabulary.
    fn position(&self) -> usize {
        Self::VOCABULARY
            .iter()
            .position(|s| s == self)
            .unwrap_or(usize::MAX)
    }

    /// Parse a wire name, rejecting anything outside the vocabulary.
    fn parse(value: &str) -> Result<Self, UnknownStage> {
        Self::VOCABULARY
            .iter()
            .copied()
            .find(|s| s.as_str() == value)
            .ok_or_else(|| UnknownStage {
                value: value.to_string(),
                expected: Self::VOCABULARY
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    /// Next stage in vocabulary order, if any.
    ///
    /// This is a UI convenience only; it is not an enforced transition
    /// restriction.
    fn advance(&self) -> Option<Self> {
        Self::VOCABULARY.get(self.position() + 1).copied()
    }

    /// Previous stage in vocabulary order, if any.
    fn retreat(&self) -> Option<Self> {
        self.position()
            .checked_sub(1)
            .and_then(|i| Self::VOCABULARY.get(i))
            .copied()
    }
}

/// Sales pipeline stages for leads.
///
/// Ordered: a lead conventionally progresses left to right, but any jump
/// is legal (e.g. `new` directly to `closed`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStage {
    /// Freshly captured, not yet qualified
    New,

    /// Qualified as a real opportunity
    Qualified,

    /// Proposal sent
    Proposal,

    /// In negotiation
    Negotiation,

    /// Won
    Closed,

    /// Lost
    Lost,
}

impl Stage for LeadStage {
    const VOCABULARY: &'static [Self] = &[
        Self::New,
        Self::Qualified,
        Self::Proposal,
        Self::Negotiation,
        Self::Closed,
        Self::Lost,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Qualified => "qualified",
            Self::Proposal => "proposal",
            Self::Negotiation => "negotiation",
            Self::Closed => "closed",
            Self::Lost => "lost",
        }
    }
}

impl Default for LeadStage {
    fn default() -> Self {
        Self::first()
    }
}

impl fmt::Display for LeadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Daily task board columns.
///
/// Treated as an unordered set reachable in any order; the listing order
/// below is only the column layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStage {
    /// Not started
    Todo,

    /// Being worked on
    InProgress,

    /// Finished (still movable and deletable)
    Done,
}

impl Stage for TaskStage {
    const VOCABULARY: &'static [Self] = &[Self::Todo, Self::InProgress, Self::Done];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }
}

impl Default for TaskStage {
    fn default() -> Self {
        Self::first()
    }
}

impl fmt::Display for TaskStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Marketing campaign states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStage {
    /// Currently running
    Active,

    /// Temporarily stopped
    Paused,

    /// Finished
    Completed,
}

impl Stage for CampaignStage {
    const VOCABULARY: &'static [Self] = &[Self::Active, Self::Paused, Self::Completed];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Completed => "completed",
        }
    }
}

impl Default for CampaignStage {
    fn default() -> Self {
        Self::first()
    }
}

impl fmt::Display for CampaignStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
