use std::path::Path;

use crate::config::{ConfigError, ConfigResult};

/// Built-in instruction sent alongside every image.
///
/// Treated as a versioned contract with the model: the normalizer relies on
/// the field names requested here, so edits must keep them stable.
pub const DEFAULT_PROMPT: &str = r#"Please analyze the central object in the provided image and determine whether it is a recyclable waste item.

Return your answer strictly in the following JSON format:
{
  "recyclable": true | false,
  "type": "one of plastic, paper/cardboard, metal, glass, or null if not recyclable",
  "explanation": "a short and clear explanation (2-3 sentences) for why the object is or is not recyclable, and how you identified the type",
  "quantity": "one of small, medium, large, or null if not recyclable",
  "kwetche": "an integer between 0 and 100 proportional to the estimated mass of the object, or 0 if not recyclable"
}

Only consider the main object in the center of the image. Do not list multiple objects. Do not provide bounding boxes or any visual metadata.
"#;

/// Resolve the prompt: the file at `path` if given, otherwise [`DEFAULT_PROMPT`].
pub fn load_prompt(path: Option<&Path>) -> ConfigResult<String> {
    let Some(path) = path else {
        return Ok(DEFAULT_PROMPT.to_string());
    };

    let prompt = std::fs::read_to_string(path).map_err(|e| ConfigError::InvalidValue {
        field: "prompt_file".to_string(),
        value: path.display().to_string(),
        reason: e.to_string(),
    })?;

    if prompt.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "prompt_file".to_string(),
            value: path.display().to_string(),
            reason: "Prompt file is empty".to_string(),
        });
    }
    Ok(prompt)
}
