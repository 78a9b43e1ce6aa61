use async_trait::async_trait;
use parking_lot::Mutex;
use sqlgate_common::Result;

use crate::entry::AuditEntry;

/// Accepts and persists audit entries. A real deployment backs this with
/// durable storage and/or a structured log sink; tests and local runs use
/// [`InMemoryAuditLogger`].
#[async_trait]
pub trait AuditLogger: Send + Sync {
    async fn record(&self, entry: AuditEntry) -> Result<()>;
    async fn entries(&self) -> Vec<AuditEntry>;
}

/// An audit logger backed by a process-local buffer, bounded so a long
/// run cannot grow it without limit. Oldest entries are dropped first.
pub struct InMemoryAuditLogger {
    entries: Mutex<Vec<AuditEntry>>,
    capacity: usize,
}

impl InMemoryAuditLogger {
    pub fn new(capacity: usize) -> Self {
        InMemoryAuditLogger { entries: Mutex::new(Vec::new()), capacity }
    }
}

impl Default for InMemoryAuditLogger {
    fn default() -> Self {
        InMemoryAuditLogger::new(10_000)
    }
}

#[async_trait]
impl AuditLogger for InMemoryAuditLogger {
    async fn record(&self, entry: AuditEntry) -> Result<()> {
        let mut entries = self.entries.lock();
        entries.push(entry);
        let overflow = entries.len().saturating_sub(self.capacity);
        if overflow > 0 {
            entries.drain(0..overflow);
        }
        Ok(())
    }

    async fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sqlgate_common::QueryId;

    #[tokio::test]
    async fn records_and_returns_entries_in_order() {
        let logger = InMemoryAuditLogger::new(10);
        logger.record(AuditEntry::accepted(QueryId::new(), "u1", vec!["a.b".into()], Utc::now())).await.unwrap();
        logger.record(AuditEntry::rejected(QueryId::new(), "u1", vec![], "table_not_found", Utc::now())).await.unwrap();
        let entries = logger.entries().await;
        assert_eq!(entries.len(), 2);
    }

    #[tokio::test]
    async fn drops_oldest_entries_past_capacity() {
        let logger = InMemoryAuditLogger::new(2);
        for _ in 0..5 {
            logger.record(AuditEntry::accepted(QueryId::new(), "u1", vec![], Utc::now())).await.unwrap();
        }
        assert_eq!(logger.entries().await.len(), 2);
    }
}
