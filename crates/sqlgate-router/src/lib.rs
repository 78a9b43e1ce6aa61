//! The engine registry and deterministic router (spec §4.4, component
//! C4).

mod engine;
mod registry;
mod router;

pub use engine::{default_engines, preferred_engine_for_format, Engine, EngineSnapshot};
pub use registry::EngineRegistry;
pub use router::select;
