use tracing::{debug, warn};

use crate::{
    normalizer::{
        errors::{NormalizeError, NormalizeResult},
        schema,
        strategies::{BraceExtraction, DirectParse, FenceStrip},
        traits::NormalizeStrategy,
    },
    protocols::classification::ClassificationResult,
};

/// Converts raw model text into a validated [`ClassificationResult`].
///
/// Strategies run in order and the first one that yields a JSON object wins.
/// The default chain is direct parse, then code-fence stripping, then
/// brace extraction over the original text. Normalization is pure: no I/O,
/// no retries, same input always gives the same output.
pub struct ResponseNormalizer {
    strategies: Vec<Box<dyn NormalizeStrategy>>,
}

impl ResponseNormalizer {
    pub fn new() -> Self {
        Self::with_strategies(vec![
            Box::new(DirectParse),
            Box::new(FenceStrip),
            Box::new(BraceExtraction),
        ])
    }

    pub fn with_strategies(strategies: Vec<Box<dyn NormalizeStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn normalize(&self, raw: &str) -> NormalizeResult<ClassificationResult> {
        if raw.trim().is_empty() {
            return Err(NormalizeError::EmptyInput);
        }

        let mut misses = Vec::with_capacity(self.strategies.len());

        for strategy in &self.strategies {
            match strategy.extract(raw) {
                Ok(object) => {
                    debug!(strategy = strategy.name(), "Extracted JSON object from model response");
                    let result = schema::validate(&object).map_err(|e| {
                        NormalizeError::SchemaViolation {
                            field: e.field,
                            reason: e.reason,
                            raw: raw.to_string(),
                        }
                    })?;

                    if !result.honors_non_recyclable_nulls() {
                        warn!(
                            waste_type = ?result.waste_type,
                            quantity = ?result.quantity,
                            "Model marked object as not recyclable but still set type or quantity"
                        );
                    }
                    return Ok(result);
                }
                Err(reason) => {
                    debug!(strategy = strategy.name(), %reason, "Normalize strategy did not apply");
                    misses.push(format!("{}: {}", strategy.name(), reason));
                }
            }
        }

        let reason = if misses.is_empty() {
            "no normalize strategies configured".to_string()
        } else {
            misses.join("; ")
        };
        Err(NormalizeError::ParseFailure {
            reason,
            raw: raw.to_string(),
        })
    }
}

impl Default for ResponseNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ResponseNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseNormalizer")
            .field("strategies", &self.strategy_names())
            .finish()
    }
}
