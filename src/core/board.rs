//! Board primitives: stage grouping, drag reconciliation, and the
//! optimistic-move state machine.
//!
//! A board is one column per vocabulary stage. Drag gestures arrive as
//! (from-column, from-position, to-column, to-position) and collapse to at
//! most one stage move; position within a column is never persisted, so
//! visual order resets to the default sort after a reload.

use serde::Serialize;

use crate::domain::stage::Stage;

/// One column of a board: a stage and the items currently in it.
#[derive(Debug, Clone, Serialize)]
pub struct BoardColumn<S, T> {
    pub stage: S,
    pub items: Vec<T>,
}

/// Items grouped into columns, one per stage in vocabulary order.
#[derive(Debug, Clone, Serialize)]
pub struct Board<S, T> {
    pub columns: Vec<BoardColumn<S, T>>,
}

impl<S: Stage, T> Board<S, T> {
    /// Group items into stage buckets. Every vocabulary stage gets a
    /// column, empty or not; the input ordering is preserved within each
    /// bucket.
    pub fn group(items: Vec<T>, stage_of: impl Fn(&T) -> S) -> Self {
        let mut columns: Vec<BoardColumn<S, T>> = S::VOCABULARY
            .iter()
            .map(|&stage| BoardColumn {
                stage,
                items: Vec::new(),
            })
            .collect();

        for item in items {
            let position = stage_of(&item).position();
            columns[position].items.push(item);
        }

        Self { columns }
    }

    /// The column for a given stage.
    pub fn column(&self, stage: S) -> &BoardColumn<S, T> {
        &self.columns[stage.position()]
    }

    /// Total items across all columns.
    pub fn len(&self) -> usize {
        self.columns.iter().map(|c| c.items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A drag gesture as reported by a board UI.
#[derive(Debug, Clone, Copy)]
pub struct DragGesture<S> {
    pub item_id: i64,
    pub source_stage: S,
    pub source_index: usize,
    pub dest_stage: S,
    pub dest_index: usize,
}

/// What a drag gesture resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome<S> {
    /// Dropped exactly where it started: no backend call at all
    NoOp,

    /// Exactly one stage move for the dragged item
    Move { item_id: i64, target: S },
}

/// Collapse a drag gesture to its durable effect.
///
/// Only the column (stage) assignment is durable. A drop at a different
/// position in the same column still resolves to a move to that same
/// stage, which the engine treats as an idempotent success.
pub fn reconcile_drag<S: Stage>(gesture: &DragGesture<S>) -> DragOutcome<S> {
    if gesture.dest_stage == gesture.source_stage && gesture.dest_index == gesture.source_index {
        return DragOutcome::NoOp;
    }

    DragOutcome::Move {
        item_id: gesture.item_id,
        target: gesture.dest_stage,
    }
}

/// Phase of an optimistic board move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovePhase<S> {
    /// Applied locally, awaiting server confirmation
    Pending { previous: S },

    /// Server accepted the move
    Confirmed,

    /// Server rejected the move; the card goes back to `restored`
    RolledBack { restored: S },
}

/// Bookkeeping for a single optimistic move: the board shows the card in
/// its target column immediately, and this tracks what to restore if the
/// backend call fails.
#[derive(Debug, Clone)]
pub struct OptimisticMove<S> {
    pub item_id: i64,
    pub target: S,
    phase: MovePhase<S>,
}

impl<S: Stage> OptimisticMove<S> {
    /// Start a move: the card is already displayed in `target`, with
    /// `previous` remembered for rollback.
    pub fn begin(item_id: i64, previous: S, target: S) -> Self {
        Self {
            item_id,
            target,
            phase: MovePhase::Pending { previous },
        }
    }

    pub fn phase(&self) -> MovePhase<S> {
        self.phase
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.phase, MovePhase::Pending { .. })
    }

    /// The backend accepted the move.
    pub fn confirm(&mut self) {
        if self.is_pending() {
            self.phase = MovePhase::Confirmed;
        }
    }

    /// The backend rejected the move. Returns the stage to restore the
    /// card to, or `None` if the move was already settled.
    pub fn roll_back(&mut self) -> Option<S> {
        if let MovePhase::Pending { previous } = self.phase {
            self.phase = MovePhase::RolledBack { restored: previous };
            return Some(previous);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LeadStage, TaskStage};

    #[test]
    fn test_group_covers_every_stage() {
        let board: Board<TaskStage, TaskStage> =
            Board::group(vec![TaskStage::Done, TaskStage::Done], |t| *t);

        assert_eq!(board.columns.len(), 3);
        assert_eq!(board.columns[0].stage, TaskStage::Todo);
        assert!(board.column(TaskStage::Todo).items.is_empty());
        assert_eq!(board.column(TaskStage::Done).items.len(), 2);
        assert_eq!(board.len(), 2);
    }

    #[test]
    fn test_identical_drop_is_noop() {
        let gesture = DragGesture {
            item_id: 4,
            source_stage: LeadStage::Proposal,
            source_index: 2,
            dest_stage: LeadStage::Proposal,
            dest_index: 2,
        };
        assert_eq!(reconcile_drag(&gesture), DragOutcome::NoOp);
    }

    #[test]
    fn test_cross_column_drop_resolves_to_single_move() {
        let gesture = DragGesture {
            item_id: 4,
            source_stage: LeadStage::New,
            source_index: 0,
            dest_stage: LeadStage::Closed,
            dest_index: 1,
        };
        assert_eq!(
            reconcile_drag(&gesture),
            DragOutcome::Move {
                item_id: 4,
                target: LeadStage::Closed
            }
        );
    }

    #[test]
    fn test_same_column_reorder_still_moves_to_same_stage() {
        // Intra-column position is not persisted; the gesture resolves to
        // an idempotent move to the stage the card is already in.
        let gesture = DragGesture {
            item_id: 9,
            source_stage: TaskStage::InProgress,
            source_index: 0,
            dest_stage: TaskStage::InProgress,
            dest_index: 3,
        };
        assert_eq!(
            reconcile_drag(&gesture),
            DragOutcome::Move {
                item_id: 9,
                target: TaskStage::InProgress
            }
        );
    }

    #[test]
    fn test_optimistic_move_confirm() {
        let mut mv = OptimisticMove::begin(1, LeadStage::New, LeadStage::Qualified);
        assert!(mv.is_pending());

        mv.confirm();
        assert_eq!(mv.phase(), MovePhase::Confirmed);

        // Settled moves cannot roll back.
        assert_eq!(mv.roll_back(), None);
    }

    #[test]
    fn test_optimistic_move_rollback_restores_previous_stage() {
        let mut mv = OptimisticMove::begin(1, LeadStage::Negotiation, LeadStage::Closed);

        let restored = mv.roll_back();
        assert_eq!(restored, Some(LeadStage::Negotiation));
        assert_eq!(
            mv.phase(),
            MovePhase::RolledBack {
                restored: LeadStage::Negotiation
            }
        );

        // Confirming after rollback does nothing.
        mv.confirm();
        assert!(matches!(mv.phase(), MovePhase::RolledBack { .. }));
    }
}
