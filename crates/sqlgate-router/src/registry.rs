use dashmap::DashMap;
use sqlgate_common::{GatewayError, Result};

use crate::engine::{default_engines, Engine, EngineSnapshot};

/// Process-wide store of known engines. Write-rare (populated at
/// startup), read-hot (consulted on every plan); `DashMap` gives us the
/// read/write-lock-per-shard behavior spec §5 asks for (registry is
/// "write-rare (startup); read-hot; a read/write lock suffices").
pub struct EngineRegistry {
    engines: DashMap<String, Engine>,
}

impl EngineRegistry {
    pub fn empty() -> Self {
        EngineRegistry { engines: DashMap::new() }
    }

    /// The default lineup from spec §4.4's format-support matrix.
    pub fn with_defaults() -> Self {
        let registry = Self::empty();
        for engine in default_engines() {
            registry.register(engine);
        }
        registry
    }

    pub fn register(&self, engine: Engine) {
        self.engines.insert(engine.name.clone(), engine);
    }

    pub fn get(&self, name: &str) -> Result<EngineSnapshot> {
        self.engines
            .get(name)
            .map(|e| e.snapshot())
            .ok_or_else(|| GatewayError::AdapterUnavailable { name: name.to_string() })
    }

    pub fn available(&self) -> Vec<EngineSnapshot> {
        self.engines
            .iter()
            .filter(|e| e.is_available())
            .map(|e| e.snapshot())
            .collect()
    }

    pub fn all(&self) -> Vec<EngineSnapshot> {
        self.engines.iter().map(|e| e.snapshot()).collect()
    }

    pub fn set_availability(&self, name: &str, available: bool) -> Result<()> {
        self.engines
            .get(name)
            .map(|e| e.set_available(available))
            .ok_or_else(|| GatewayError::AdapterUnavailable { name: name.to_string() })
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}

impl Default for EngineRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlgate_capability::Capability;

    #[test]
    fn set_availability_on_unknown_engine_fails() {
        let registry = EngineRegistry::empty();
        let err = registry.set_availability("nope", false).unwrap_err();
        assert!(matches!(err, GatewayError::AdapterUnavailable { .. }));
    }

    #[test]
    fn defaults_register_six_engines_all_available() {
        let registry = EngineRegistry::with_defaults();
        assert_eq!(registry.all().len(), 6);
        assert_eq!(registry.available().len(), 6);
    }

    #[test]
    fn set_availability_removes_engine_from_available_list() {
        let registry = EngineRegistry::with_defaults();
        registry.set_availability("spark", false).unwrap();
        assert!(!registry.available().iter().any(|e| e.name == "spark"));
        assert!(registry.all().iter().any(|e| e.name == "spark"));
    }

    #[test]
    fn register_custom_engine_is_retrievable() {
        let registry = EngineRegistry::empty();
        registry.register(Engine::new(
            "custom",
            Capability::Read.into(),
            vec![sqlgate_capability::TableFormat::Csv],
            1,
        ));
        assert_eq!(registry.get("custom").unwrap().name, "custom");
    }
}
