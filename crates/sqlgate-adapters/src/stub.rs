use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use sqlgate_common::{Deadline, GatewayError, Result};

use crate::adapter::Adapter;
use crate::result::ExecResult;

type ExecuteFn = dyn Fn(&str) -> Result<ExecResult> + Send + Sync;

/// A configurable adapter used in place of a real driver. Real backends
/// (an embedded vectorized engine, a distributed MPP cluster, Spark's
/// Thrift/Connect endpoint, a warehouse's REST API) each need their own
/// transport; this stub gives every one of them the same shape to grow
/// into, and is what the gateway's tests exercise directly.
pub struct StubAdapter {
    name: String,
    execute_fn: Box<ExecuteFn>,
    healthy: AtomicBool,
    reachable: AtomicBool,
    closed: AtomicBool,
}

impl StubAdapter {
    pub fn new(name: impl Into<String>, execute_fn: impl Fn(&str) -> Result<ExecResult> + Send + Sync + 'static) -> Self {
        StubAdapter {
            name: name.into(),
            execute_fn: Box::new(execute_fn),
            healthy: AtomicBool::new(true),
            reachable: AtomicBool::new(true),
            closed: AtomicBool::new(false),
        }
    }

    /// An adapter that always returns an empty result set; useful as a
    /// placeholder for engines with no fixture data wired up yet.
    pub fn always_empty(name: impl Into<String>) -> Self {
        StubAdapter::new(name, |_sql| Ok(ExecResult::empty(Vec::new())))
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Adapter for StubAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, sql: &str, deadline: &Deadline) -> Result<ExecResult> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(GatewayError::AdapterUnavailable { name: self.name.clone() });
        }
        let name = self.name.clone();
        let sql = sql.to_string();
        let result = (self.execute_fn)(&sql);
        deadline.guard(async move { result }).await?
    }

    async fn ping(&self) -> Result<()> {
        if self.closed.load(Ordering::SeqCst) || !self.reachable.load(Ordering::SeqCst) {
            return Err(GatewayError::AdapterUnavailable { name: self.name.clone() });
        }
        Ok(())
    }

    async fn check_health(&self, deadline: &Deadline) -> Result<()> {
        let name = self.name.clone();
        let healthy = self.healthy.load(Ordering::SeqCst) && !self.closed.load(Ordering::SeqCst);
        deadline
            .guard(async move {
                if healthy {
                    Ok(())
                } else {
                    Err(GatewayError::AdapterUnavailable { name })
                }
            })
            .await?
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}
