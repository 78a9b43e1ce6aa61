//! The virtual-table model and its repository contract (spec §4.2,
//! component C2).

mod memory;
mod model;
mod repository;

pub use memory::InMemoryTableRepository;
pub use model::{validate_qualified_name, PhysicalSource, VirtualTable};
pub use repository::{TableDraft, TableRepository};
