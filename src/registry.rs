//! Static per-vendor model-capability lookups.
//!
//! A registry is an explicit object built from a vendor's table at adapter
//! construction, not module-level state. Lookups are pure and synchronous.
//! An absent id yields the vendor-defined fallback capability rather than
//! an error; rejecting unknown models is the validator's job.

use std::collections::HashMap;

/// Advertised limits for one model. `None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelCapability {
    /// Maximum input size in tokens.
    pub context_window: Option<u32>,
    /// Maximum output size in tokens.
    pub max_output_tokens: Option<u32>,
    /// Preview/experimental models may change or misbehave without notice.
    pub experimental: bool,
}

impl ModelCapability {
    pub const fn new(context_window: u32, max_output_tokens: u32) -> Self {
        Self {
            context_window: Some(context_window),
            max_output_tokens: Some(max_output_tokens),
            experimental: false,
        }
    }
}

/// One row of a vendor's model table.
#[derive(Debug, Clone, Copy)]
pub struct ModelSpec {
    pub id: &'static str,
    pub capability: ModelCapability,
}

impl ModelSpec {
    /// Model with both ceilings known.
    pub const fn new(id: &'static str, context_window: u32, max_output_tokens: u32) -> Self {
        Self {
            id,
            capability: ModelCapability::new(context_window, max_output_tokens),
        }
    }

    /// Model advertising a context window but no output ceiling.
    pub const fn context_only(id: &'static str, context_window: u32) -> Self {
        Self {
            id,
            capability: ModelCapability {
                context_window: Some(context_window),
                max_output_tokens: None,
                experimental: false,
            },
        }
    }

    /// Model with no advertised ceilings at all.
    pub const fn unbounded(id: &'static str) -> Self {
        Self {
            id,
            capability: ModelCapability {
                context_window: None,
                max_output_tokens: None,
                experimental: false,
            },
        }
    }

    /// Flags the model as preview/experimental.
    pub const fn preview(mut self) -> Self {
        self.capability.experimental = true;
        self
    }
}

/// Read-only model table for one vendor.
pub struct ModelRegistry {
    vendor: &'static str,
    models: HashMap<&'static str, ModelCapability>,
    fallback: ModelCapability,
    default_model: &'static str,
}

impl ModelRegistry {
    pub fn new(
        vendor: &'static str,
        specs: &'static [ModelSpec],
        fallback: ModelCapability,
        default_model: &'static str,
    ) -> Self {
        let models = specs
            .iter()
            .map(|spec| (spec.id, spec.capability))
            .collect();
        Self {
            vendor,
            models,
            fallback,
            default_model,
        }
    }

    pub fn vendor(&self) -> &'static str {
        self.vendor
    }

    /// `true` when the id is registered for this vendor.
    pub fn exists(&self, model: &str) -> bool {
        self.models.contains_key(model)
    }

    /// Capability of a registered model, if present.
    pub fn capabilities_of(&self, model: &str) -> Option<&ModelCapability> {
        self.models.get(model)
    }

    /// Capability of a model, falling back to the vendor default for
    /// unregistered ids.
    pub fn capabilities_or_fallback(&self, model: &str) -> &ModelCapability {
        self.models.get(model).unwrap_or(&self.fallback)
    }

    /// The vendor's default model id.
    pub fn default_model(&self) -> &'static str {
        self.default_model
    }

    /// Sorted list of every registered id, for error messages.
    pub fn known_models(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.models.keys().map(|id| id.to_string()).collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPECS: &[ModelSpec] = &[
        ModelSpec::new("alpha-large", 128_000, 8_192),
        ModelSpec::context_only("alpha-small", 8_192),
        ModelSpec::new("alpha-exp", 32_768, 4_096).preview(),
    ];

    fn registry() -> ModelRegistry {
        ModelRegistry::new(
            "alpha",
            SPECS,
            ModelCapability::new(8_192, 4_096),
            "alpha-large",
        )
    }

    #[test]
    fn lookups_are_exact() {
        let registry = registry();
        assert!(registry.exists("alpha-large"));
        assert!(!registry.exists("alpha-medium"));
        let caps = registry.capabilities_of("alpha-large").expect("caps");
        assert_eq!(caps.context_window, Some(128_000));
        assert_eq!(caps.max_output_tokens, Some(8_192));
    }

    #[test]
    fn unknown_ids_fall_back_without_error() {
        let registry = registry();
        let caps = registry.capabilities_or_fallback("alpha-medium");
        assert_eq!(caps.context_window, Some(8_192));
        assert_eq!(caps.max_output_tokens, Some(4_096));
    }

    #[test]
    fn preview_flag_and_partial_ceilings_carry_through() {
        let registry = registry();
        assert!(registry.capabilities_of("alpha-exp").expect("caps").experimental);
        let partial = registry.capabilities_of("alpha-small").expect("caps");
        assert_eq!(partial.max_output_tokens, None);
    }

    #[test]
    fn known_models_are_sorted() {
        let registry = registry();
        assert_eq!(
            registry.known_models(),
            vec![
                "alpha-exp".to_string(),
                "alpha-large".to_string(),
                "alpha-small".to_string()
            ]
        );
        assert_eq!(registry.default_model(), "alpha-large");
    }
}
