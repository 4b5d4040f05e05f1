//! Read-only query policy.
//!
//! [`QueryGuard`] is a prefix-keyword denylist, not a SQL parser. A
//! statement is blocked when its trimmed, upper-cased text starts with one
//! of [`WRITE_VERBS`]. Anything else is allowed, including statements that
//! hide a write behind a read-looking prefix such as
//! `WITH t AS (...) INSERT ...`.
//!
//! # Examples
//!
//! ```
//! use ocean_explorer_core::{QueryGuard, Verdict};
//!
//! let guard = QueryGuard::read_only();
//! assert_eq!(guard.classify("select * from memories"), Verdict::Allowed);
//! assert!(guard.classify("  drop table memories").is_blocked());
//! ```

use thiserror::Error;

/// Statement prefixes treated as writes in read-only mode.
pub const WRITE_VERBS: &[&str] = &[
    "INSERT", "UPDATE", "DELETE", "DROP", "CREATE", "ALTER", "TRUNCATE", "REPLACE",
];

/// A write statement submitted while the read-only policy is active.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("read-only mode: {verb} statements are blocked (allowed: SELECT, PRAGMA and other non-write statements)")]
pub struct PolicyViolation {
    /// The denylisted verb the statement started with.
    pub verb: &'static str,
}

/// Classification result for one statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Allowed,
    Blocked(PolicyViolation),
}

impl Verdict {
    pub fn is_blocked(&self) -> bool {
        matches!(self, Verdict::Blocked(_))
    }
}

/// Gate that decides whether a raw statement may reach the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryGuard;

impl QueryGuard {
    /// Guard that blocks denylisted write verbs.
    pub fn read_only() -> Self {
        Self
    }

    /// Classifies `sql` against the write denylist.
    pub fn classify(&self, sql: &str) -> Verdict {
        match write_verb(sql) {
            Some(verb) => Verdict::Blocked(PolicyViolation { verb }),
            None => Verdict::Allowed,
        }
    }
}

/// Returns the denylisted verb `sql` starts with, if any.
fn write_verb(sql: &str) -> Option<&'static str> {
    let normalized = sql.trim().to_uppercase();
    WRITE_VERBS
        .iter()
        .copied()
        .find(|verb| normalized.starts_with(verb))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_every_write_verb_in_any_case() {
        let guard = QueryGuard::read_only();
        for verb in WRITE_VERBS {
            let upper = format!("{verb} something");
            let lower = format!("   {} something  \n", verb.to_lowercase());
            assert!(guard.classify(&upper).is_blocked(), "{upper}");
            assert!(guard.classify(&lower).is_blocked(), "{lower}");
        }
    }

    #[test]
    fn test_allows_select_and_pragma() {
        let guard = QueryGuard::read_only();
        for sql in [
            "SELECT 1",
            "select * from memories",
            "\tSeLeCt count(*) from models",
            "PRAGMA table_info(memories)",
            "pragma journal_mode",
        ] {
            assert_eq!(guard.classify(sql), Verdict::Allowed, "{sql}");
        }
    }

    #[test]
    fn test_blocked_reason_names_verb_and_policy() {
        let guard = QueryGuard::read_only();
        let Verdict::Blocked(violation) = guard.classify("DROP TABLE memories") else {
            panic!("expected DROP to be blocked");
        };
        assert_eq!(violation.verb, "DROP");
        let message = violation.to_string();
        assert!(message.contains("read-only"));
        assert!(message.contains("DROP"));
    }

    #[test]
    fn test_cte_wrapped_write_is_not_caught() {
        let guard = QueryGuard::read_only();
        let sql = "WITH t AS (SELECT 1) INSERT INTO memories(content) SELECT * FROM t";
        assert_eq!(guard.classify(sql), Verdict::Allowed);
    }

    #[test]
    fn test_unknown_statements_are_allowed() {
        let guard = QueryGuard::read_only();
        assert_eq!(guard.classify("EXPLAIN QUERY PLAN SELECT 1"), Verdict::Allowed);
        assert_eq!(guard.classify("VACUUM"), Verdict::Allowed);
        assert_eq!(guard.classify(""), Verdict::Allowed);
    }
}
