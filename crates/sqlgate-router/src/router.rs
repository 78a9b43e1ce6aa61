use sqlgate_capability::{CapabilitySet, TableFormat};
use sqlgate_common::{GatewayError, Result};

use crate::engine::preferred_engine_for_format;
use crate::registry::EngineRegistry;

/// Selects the engine for a query, given its required capability set, the
/// dominant table format, and an optional explicit engine pin (spec
/// §4.4). Fully deterministic: the same inputs over the same registry
/// snapshot always select the same engine, regardless of the order
/// engines were registered in.
pub fn select(
    registry: &EngineRegistry,
    required: CapabilitySet,
    format: TableFormat,
    explicit_pin: Option<&str>,
) -> Result<String> {
    if let Some(pin) = explicit_pin {
        return match registry.get(pin) {
            Ok(engine) if engine.available => Ok(engine.name),
            _ => Err(GatewayError::ExplicitEngineUnavailable { engine: pin.to_string() }),
        };
    }

    let available = registry.available();

    let by_capability: Vec<_> =
        available.iter().filter(|e| e.capabilities.contains(required)).collect();
    if by_capability.is_empty() {
        return Err(GatewayError::NoEngineForCapabilities {
            required: capability_names(required),
        });
    }

    let mut candidates: Vec<_> =
        by_capability.into_iter().filter(|e| e.supports_format(format)).collect();
    if candidates.is_empty() {
        return Err(GatewayError::NoEngineForFormat {
            format: format.as_str().to_string(),
            required: capability_names(required),
        });
    }

    let preferred_name = preferred_engine_for_format(format);
    if let Some(preferred) = candidates.iter().find(|e| e.name == preferred_name) {
        return Ok(preferred.name.clone());
    }

    // Deterministic tie-break: lowest priority number, then lexicographic
    // name, regardless of registration order (spec §8 "Router
    // determinism").
    candidates.sort_by(|a, b| a.priority.cmp(&b.priority).then_with(|| a.name.cmp(&b.name)));
    Ok(candidates[0].name.clone())
}

fn capability_names(set: CapabilitySet) -> Vec<String> {
    set.iter().map(|c| c.as_str().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlgate_capability::Capability;
    use crate::engine::Engine;

    fn registry() -> EngineRegistry {
        EngineRegistry::with_defaults()
    }

    #[test]
    fn simple_select_prefers_format_engine() {
        let reg = registry();
        let engine =
            select(&reg, Capability::Read.into(), TableFormat::Iceberg, None).unwrap();
        assert_eq!(engine, "mpp");
    }

    #[test]
    fn delta_prefers_spark() {
        let reg = registry();
        let engine = select(&reg, Capability::Read.into(), TableFormat::Delta, None).unwrap();
        assert_eq!(engine, "spark");
    }

    #[test]
    fn explicit_pin_wins_when_available() {
        let reg = registry();
        let engine =
            select(&reg, Capability::Read.into(), TableFormat::Csv, Some("mpp")).unwrap();
        assert_eq!(engine, "mpp");
    }

    #[test]
    fn explicit_pin_unavailable_hard_fails() {
        let reg = registry();
        reg.set_availability("mpp", false).unwrap();
        let err = select(&reg, Capability::Read.into(), TableFormat::Csv, Some("mpp"))
            .unwrap_err();
        assert!(matches!(err, GatewayError::ExplicitEngineUnavailable { .. }));
    }

    #[test]
    fn explicit_pin_unregistered_hard_fails() {
        let reg = registry();
        let err = select(&reg, Capability::Read.into(), TableFormat::Csv, Some("ghost"))
            .unwrap_err();
        assert!(matches!(err, GatewayError::ExplicitEngineUnavailable { .. }));
    }

    #[test]
    fn no_engine_for_capabilities_lists_required_set() {
        let reg = EngineRegistry::empty();
        reg.register(Engine::new("only-read", Capability::Read.into(), vec![TableFormat::Csv], 1));
        let err = select(
            &reg,
            Capability::Read | Capability::IncrementalQuery,
            TableFormat::Csv,
            None,
        )
        .unwrap_err();
        match err {
            GatewayError::NoEngineForCapabilities { required } => {
                assert!(required.contains(&"INCREMENTAL_QUERY".to_string()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn no_engine_for_format_when_capabilities_met_but_format_unsupported() {
        let reg = EngineRegistry::empty();
        reg.register(Engine::new("csv-only", Capability::Read.into(), vec![TableFormat::Csv], 1));
        let err = select(&reg, Capability::Read.into(), TableFormat::Iceberg, None).unwrap_err();
        assert!(matches!(err, GatewayError::NoEngineForFormat { .. }));
    }

    #[test]
    fn selection_is_independent_of_registration_order() {
        let required = Capability::Read.into();
        let format = TableFormat::Orc;

        let reg_a = EngineRegistry::empty();
        reg_a.register(Engine::new("z-engine", required, vec![format], 5));
        reg_a.register(Engine::new("a-engine", required, vec![format], 5));

        let reg_b = EngineRegistry::empty();
        reg_b.register(Engine::new("a-engine", required, vec![format], 5));
        reg_b.register(Engine::new("z-engine", required, vec![format], 5));

        let a = select(&reg_a, required, format, None).unwrap();
        let b = select(&reg_b, required, format, None).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, "a-engine");
    }

    #[test]
    fn selection_matches_across_every_registration_order() {
        use itertools::Itertools;

        let required: CapabilitySet = Capability::Read.into();
        let format = TableFormat::Orc;
        let names = ["alpha", "bravo", "charlie", "delta"];
        // priority is keyed to the name, independent of registration order
        let priority_of = |name: &str| names.iter().position(|n| *n == name).unwrap() as u32;

        let mut results = Vec::new();
        for permutation in names.iter().permutations(names.len()) {
            let reg = EngineRegistry::empty();
            for name in permutation {
                reg.register(Engine::new(*name, required, vec![format], priority_of(name)));
            }
            results.push(select(&reg, required, format, None).unwrap());
        }

        assert!(results.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(results[0], "alpha");
    }
}
