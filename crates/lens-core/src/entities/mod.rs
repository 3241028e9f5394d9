//! Entity structs for the analysis flow and the history log.

mod analysis;
mod history;

pub use analysis::{AnalysisRequest, AnalysisResult, ReasoningTraces};
pub use history::{HistoryRecord, HistoryRecordInput};
