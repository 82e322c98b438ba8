use serde::{Deserialize, Deserializer, Serialize};

/// Treats an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of `GET {base}/functions`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub functions: Vec<String>,
}

/// Body of `POST {base}/transform`. `input` is carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformRequest {
    pub function: String,
    pub input: String,
}

impl TransformRequest {
    pub fn new(function: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            input: input.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub output: String,
}

/// Failure envelope returned alongside a non-2xx status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
        }
    }

    /// Reason reported by the service, verbatim. Blank strings count as absent.
    pub fn reason(&self) -> Option<&str> {
        self.error
            .as_deref()
            .filter(|reason| !reason.trim().is_empty())
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
