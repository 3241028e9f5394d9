pub mod analyze;
pub mod dispatch;
pub mod history;
pub mod session;
