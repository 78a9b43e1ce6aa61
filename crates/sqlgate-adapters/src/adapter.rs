use async_trait::async_trait;
use sqlgate_common::{Deadline, Result};

use crate::result::ExecResult;

/// The uniform contract every backend engine must implement (spec §4.5,
/// component C5). Adapters are stateless at the query level: any
/// connection pooling happens internally and is invisible across calls.
#[async_trait]
pub trait Adapter: Send + Sync {
    /// The engine name this adapter serves, matching an `Engine::name` in
    /// the router's registry.
    fn name(&self) -> &str;

    /// Runs `sql` to completion or fails explicitly. Execute never
    /// swallows an error, retries internally, or silently downgrades —
    /// callers that want retries use [`crate::retry::execute_with_retry`]
    /// explicitly. `deadline` bounds the call; Execute must abort the
    /// underlying driver call on expiry, not merely stop waiting on it.
    async fn execute(&self, sql: &str, deadline: &Deadline) -> Result<ExecResult>;

    /// Transport-reachability only: can a connection to the backend be
    /// established. Distinct from `check_health`, which must run a query.
    async fn ping(&self) -> Result<()>;

    /// A trivial end-to-end probe (e.g. `SELECT 1`) bounded by `deadline`.
    async fn check_health(&self, deadline: &Deadline) -> Result<()>;

    /// Releases any held resources. Idempotent: calling it twice must not
    /// error or panic.
    async fn close(&self);
}
