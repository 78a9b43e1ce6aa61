//! The adapter abstraction, adapter registry, and retry utility (spec
//! §4.5, component C5).

mod adapter;
mod registry;
mod result;
mod retry;
mod stub;

pub use adapter::Adapter;
pub use registry::AdapterRegistry;
pub use result::{ExecResult, Row};
pub use retry::{default_is_retryable, execute_with_retry, RetryConfig, RetryResult};
pub use stub::StubAdapter;
