use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::client::InferenceClient;
use crate::error::InferenceError;
use crate::lenient::JsonObject;

/// One inference call whose reply must be a JSON object.
#[derive(Clone)]
pub struct StructuredExtractor {
    client: Arc<dyn InferenceClient>,
}

impl std::fmt::Debug for StructuredExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StructuredExtractor").finish_non_exhaustive()
    }
}

impl StructuredExtractor {
    #[must_use]
    pub fn new(client: Arc<dyn InferenceClient>) -> Self {
        Self { client }
    }

    /// Run `prompt` under `system_role` and parse the reply as a JSON object.
    ///
    /// A reply wrapped in a Markdown code fence is unwrapped first.
    ///
    /// # Errors
    ///
    /// Returns [`InferenceError`] when the call fails or the reply is not a
    /// JSON object.
    pub async fn extract(
        &self,
        prompt: &str,
        system_role: &str,
    ) -> Result<JsonObject, InferenceError> {
        let raw = self.client.complete(system_role, prompt).await?;
        parse_object(&raw)
    }

    /// [`extract`](Self::extract), then deserialize into `T`.
    ///
    /// # Errors
    ///
    /// As [`extract`](Self::extract), plus [`InferenceError::Malformed`] if the
    /// object does not fit `T`.
    pub async fn extract_as<T: DeserializeOwned>(
        &self,
        prompt: &str,
        system_role: &str,
    ) -> Result<T, InferenceError> {
        let object = self.extract(prompt, system_role).await?;
        serde_json::from_value(Value::Object(object)).map_err(|source| InferenceError::Malformed {
            context: std::any::type_name::<T>().to_string(),
            source,
        })
    }
}

fn parse_object(raw: &str) -> Result<JsonObject, InferenceError> {
    let body = strip_code_fence(raw);
    let value: Value = serde_json::from_str(body).map_err(|source| InferenceError::Malformed {
        context: "inference reply".to_string(),
        source,
    })?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(InferenceError::NotAnObject {
            context: "inference reply".to_string(),
        }),
    }
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. "json") on the opening fence line.
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}
