//! Core pipeline logic.
//!
//! This module contains:
//! - Engine: stage transition validation and application
//! - Board: stage grouping, drag reconciliation, optimistic moves

pub mod board;
pub mod engine;

// Re-export commonly used types
pub use board::{
    reconcile_drag, Board, BoardColumn, DragGesture, DragOutcome, MovePhase, OptimisticMove,
};
pub use engine::{
    Denial, LeadBoardFilter, LeadCard, PipelineEngine, PipelineError, TaskBoardFilter,
};
