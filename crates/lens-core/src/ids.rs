//! Store-assigned ID prefixes.
//!
//! IDs are `{prefix}-{8 hex chars}`, generated inside the database.

/// Prefix for `analysis_history` rows.
pub const PREFIX_HISTORY: &str = "his";

/// All prefixes in use.
pub const ALL_PREFIXES: &[&str] = &[PREFIX_HISTORY];

/// Check whether `id` has the shape `{prefix}-{8 hex chars}`.
#[must_use]
pub fn has_prefix(id: &str, prefix: &str) -> bool {
    id.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('-'))
        .is_some_and(|hex| hex.len() == 8 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}
