/// The three independent signals readiness is built from (spec §4.9). Any
/// `false` makes the gateway not-ready; each carries its own explanation
/// so operators don't have to guess which signal failed.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ReadinessReport {
    pub repository_connected: bool,
    pub adapter_available: bool,
    pub metadata_initialized: bool,
    pub messages: Vec<String>,
}

impl ReadinessReport {
    pub fn is_ready(&self) -> bool {
        self.repository_connected && self.adapter_available && self.metadata_initialized
    }
}

/// Builds a [`ReadinessReport`] from the three signals, attaching an
/// explanatory message for each one that is false.
pub fn assess(repository_connected: bool, adapter_available: bool, metadata_initialized: bool) -> ReadinessReport {
    let mut messages = Vec::new();
    if !repository_connected {
        messages.push("table repository is unreachable".to_string());
    }
    if !adapter_available {
        messages.push("no adapter is registered and available".to_string());
    }
    if !metadata_initialized {
        messages.push("catalog metadata has not finished initializing".to_string());
    }
    ReadinessReport { repository_connected, adapter_available, metadata_initialized, messages }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_true_is_ready_with_no_messages() {
        let report = assess(true, true, true);
        assert!(report.is_ready());
        assert!(report.messages.is_empty());
    }

    #[test]
    fn any_false_signal_is_not_ready_and_explains_why() {
        let report = assess(true, false, true);
        assert!(!report.is_ready());
        assert_eq!(report.messages, vec!["no adapter is registered and available".to_string()]);
    }

    #[test]
    fn multiple_false_signals_all_produce_messages() {
        let report = assess(false, false, false);
        assert_eq!(report.messages.len(), 3);
    }
}
