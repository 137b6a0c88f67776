use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Failed to read record file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to fetch record from '{url}': {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("JSON parse error ({context}): {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Field record must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// Flat key → value data used to fill one form. Key order follows the
/// source JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRecord {
    fields: Map<String, Value>,
}

impl FieldRecord {
    pub fn from_value(value: Value) -> Result<Self, RecordError> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(RecordError::NotAnObject(json_kind(&other))),
        }
    }

    pub fn from_json_str(json: &str, context: &str) -> Result<Self, RecordError> {
        let value: Value = serde_json::from_str(json).map_err(|e| RecordError::JsonParse {
            context: context.to_string(),
            source: e,
        })?;
        Self::from_value(value)
    }

    /// Build a record from string pairs, keeping their order.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let fields = pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect();
        Self { fields }
    }

    /// Keys in record order; these are the resolver's candidates.
    pub fn keys(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// String form of a value as it is typed into the page.
    pub fn value_text(&self, key: &str) -> Option<String> {
        self.fields.get(key).map(render_value)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// SHA-1 of the record's JSON text, so traces can be correlated with
    /// their input without writing personal data to disk.
    pub fn fingerprint(&self) -> String {
        use sha1::{Digest, Sha1};

        let json = Value::Object(self.fields.clone()).to_string();
        let mut hasher = Sha1::new();
        hasher.update(json.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
