//! Closed enums and set algebra over table capabilities, constraints, and
//! physical formats (spec §4.1, component C1). Pure, no I/O, total.

mod capability;
mod constraint;
mod format;

pub use capability::{has_all, missing, parse_capability_set, Capability, CapabilitySet};
pub use constraint::{parse_constraint_set, Constraint, ConstraintSet};
pub use format::TableFormat;
