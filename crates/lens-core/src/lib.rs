//! # lens-core
//!
//! Core types, contracts, and error types for TruthLens.
//!
//! This crate provides the foundational types shared across all TruthLens crates:
//! - Analysis request/result and history record structs
//! - The `Verdict` and `AnalysisPhase` enums (phase carries the state machine transitions)
//! - The [`engine::AnalysisEngine`] and [`store::HistoryStore`] contracts that
//!   the submission flow is written against
//! - Cross-cutting error types
//! - ID prefix constants

pub mod engine;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod store;
