//! Pre-flight request validation.
//!
//! Five checks run in order (model existence, message shape, temperature,
//! output-token ceiling, input-size ceiling) and all must pass before any
//! network call is issued. The only side effects are advisory `tracing`
//! logs. Successful validation yields a [`RequestPlan`] of resolved values
//! for request shaping.

use crate::error::LlmError;
use crate::registry::ModelRegistry;
use crate::tokens::{TokenEstimator, format_token_count};
use crate::types::{ChatCompletionRequest, Message, Role};
use crate::vendor::{TemperatureRule, VendorProfile};

/// Resolved values produced by validation and consumed by shaping.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestPlan {
    /// Model id as sent on the wire, hosting prefix applied.
    pub wire_model: String,
    /// Normalized temperature (vendor default or substituted zero).
    pub temperature: f32,
    /// Resolved max output tokens, never absent on the wire.
    pub max_tokens: u32,
}

pub(crate) fn run(
    profile: &VendorProfile,
    registry: &ModelRegistry,
    estimator: &TokenEstimator,
    request: &ChatCompletionRequest,
) -> Result<RequestPlan, LlmError> {
    if !registry.exists(&request.model) {
        return Err(LlmError::UnknownModel {
            vendor: profile.name,
            model: request.model.clone(),
            known: registry.known_models(),
        });
    }
    let caps = registry.capabilities_or_fallback(&request.model);
    if caps.experimental {
        tracing::warn!(
            vendor = profile.name,
            model = %request.model,
            "model is experimental and may be unstable or change without notice"
        );
    }

    check_message_rules(profile, request)?;
    let temperature = resolve_temperature(profile.name, &profile.temperature, request.temperature)?;

    let output_ceiling = caps
        .max_output_tokens
        .map(|ceiling| scale(ceiling, profile.limit_scale));
    let max_tokens = match request.max_tokens {
        Some(requested) => {
            if let Some(allowed) = output_ceiling {
                if u64::from(requested) > allowed {
                    return Err(LlmError::TokenLimitExceeded {
                        model: request.model.clone(),
                        requested,
                        allowed,
                    });
                }
            }
            requested
        }
        None => {
            let default = u64::from(profile.default_max_tokens);
            output_ceiling.map_or(default, |ceiling| default.min(ceiling)) as u32
        }
    };

    let estimated = estimate_input(estimator, profile, request)?;
    if let Some(window) = caps.context_window {
        let allowed = scale(window, profile.limit_scale);
        if estimated > allowed {
            return Err(LlmError::InputTooLarge {
                model: request.model.clone(),
                estimated,
                allowed,
            });
        }
        tracing::debug!(
            vendor = profile.name,
            model = %request.model,
            estimated = %format_token_count(estimated),
            allowed = %format_token_count(allowed),
            "estimated input within model limit"
        );
    }

    Ok(RequestPlan {
        wire_model: format!("{}{}", profile.wire_model_prefix, request.model),
        temperature,
        max_tokens,
    })
}

fn check_message_rules(
    profile: &VendorProfile,
    request: &ChatCompletionRequest,
) -> Result<(), LlmError> {
    let rules = &profile.messages;
    if !rules.system_role_inline
        && request
            .messages
            .iter()
            .any(|message| message.role == Role::System)
    {
        return Err(LlmError::UnsupportedMessageField {
            field: "role",
            message: format!(
                "system messages must be passed via the system parameter for {}",
                profile.name
            ),
        });
    }
    if !rules.allow_name_field && request.messages.iter().any(|m| m.name.is_some()) {
        return Err(LlmError::UnsupportedMessageField {
            field: "name",
            message: format!("message name field is not supported by {}", profile.name),
        });
    }
    if !rules.allow_logit_options
        && (request.logprobs.is_some()
            || request.logit_bias.is_some()
            || request.top_logprobs.is_some())
    {
        return Err(LlmError::UnsupportedMessageField {
            field: "logprobs",
            message: format!(
                "logprobs, logit_bias, and top_logprobs are not supported by {}",
                profile.name
            ),
        });
    }
    Ok(())
}

fn resolve_temperature(
    vendor: &'static str,
    rule: &TemperatureRule,
    requested: Option<f32>,
) -> Result<f32, LlmError> {
    let Some(raw) = requested else {
        return Ok(rule.default);
    };
    let temperature = if raw == 0.0 {
        rule.zero_substitute.unwrap_or(raw)
    } else {
        raw
    };
    let out_of_range = if rule.exclusive {
        temperature <= rule.min || temperature >= rule.max
    } else {
        temperature < rule.min || temperature > rule.max
    };
    if out_of_range {
        let bounds = if rule.exclusive { "exclusive" } else { "inclusive" };
        return Err(LlmError::InvalidTemperature {
            message: format!(
                "temperature must be between {} and {} ({bounds}) for {vendor}, got {raw}",
                rule.min, rule.max
            ),
        });
    }
    Ok(temperature)
}

fn estimate_input(
    estimator: &TokenEstimator,
    profile: &VendorProfile,
    request: &ChatCompletionRequest,
) -> Result<u64, LlmError> {
    let mut estimated = estimator.estimate(&request.messages, &profile.estimate)?;
    if let Some(system) = &request.system {
        estimated +=
            estimator.estimate_message(&Message::system(system.clone()), &profile.estimate)?;
    }
    Ok(estimated)
}

fn scale(limit: u32, factor: f64) -> u64 {
    (f64::from(limit) * factor).floor() as u64
}
