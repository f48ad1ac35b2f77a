use serde_json::{Map, Value};

/// One step of the normalization chain.
///
/// A strategy either yields the JSON object it found in the raw model text or
/// a short diagnostic explaining why it did not apply. Strategies never validate
/// field shapes; that happens once, after the first success.
pub trait NormalizeStrategy: Send + Sync {
    /// Stable name used in diagnostics and logs
    fn name(&self) -> &'static str;

    /// Try to extract a JSON object from `raw`
    fn extract(&self, raw: &str) -> Result<Map<String, Value>, String>;
}
