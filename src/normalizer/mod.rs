/// Response normalizer for turning raw model text into a classification record
///
/// The model is asked for a bare JSON object but regularly wraps it in code
/// fences or prose. Normalization runs an ordered chain of extraction strategies
/// and validates the first JSON object found.
// Core modules
pub mod chain;
pub mod errors;
pub mod schema;
pub mod strategies;
pub mod traits;

// Re-export types used outside this module
pub use chain::ResponseNormalizer;
pub use errors::{NormalizeError, NormalizeResult};
pub use strategies::{strip_code_fence, BraceExtraction, DirectParse, FenceStrip};
pub use traits::NormalizeStrategy;
