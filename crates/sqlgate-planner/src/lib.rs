//! Turns a classified query into an [`ExecutionPlan`] by resolving
//! tables, authorizing, checking capability coverage and constraints, and
//! routing to an engine (spec §4.7, component C7).

mod plan;

pub use plan::{plan, ExecutionPlan};
