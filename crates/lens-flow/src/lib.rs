//! # lens-flow
//!
//! The submission cycle of TruthLens.
//!
//! [`AnalysisHandler`] accepts text, drives the observable [`AnalysisState`]
//! (`idle → analyzing → result | error`) and runs the engine in the
//! background. Each successful result is handed to the
//! [`HistorySynchronizer`], which persists it and republishes the most recent
//! records as a [`HistoryView`]. Both the state and the view are published on
//! `tokio::sync::watch` channels; observers subscribe, they never write.

pub mod handler;
pub mod history;
pub mod state;

#[cfg(test)]
mod test_support;

pub use handler::{AnalysisHandler, PendingAnalysis, RejectReason, Submission};
pub use history::{HistorySynchronizer, HistoryView, SyncOutcome};
pub use state::AnalysisState;
