//! The SQL classifier (spec §4.3, component C3).
//!
//! This workspace carries a single canonical classifier: a deterministic
//! scanner over the raw SQL text, not a full AST parser. Databend's own
//! `Planner::plan_sql` tokenizes before it ever reaches a grammar (see
//! `planner.rs`'s `Tokenizer`/`Token` pre-pass); this classifier follows
//! the same shape at a coarser grain, scanning for `FROM`/`JOIN`
//! references and the canonical `FOR SYSTEM_TIME AS OF` / `FOR VERSION AS
//! OF` temporal clauses. Constructs it cannot confidently classify (CTEs,
//! non-canonical temporal dialects, anything beyond a single SELECT) are
//! rejected with `Unsupported` rather than silently mis-parsed, resolving
//! the "two divergent classifiers" open question in spec §9 in favor of
//! the simpler, total scanner.

mod classifier;

pub use classifier::{classify, Classification, Operation};
