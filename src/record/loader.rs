use crate::record::field_record::{FieldRecord, RecordError};

/// Load a field record from a local JSON file or an `http(s)://` URL.
pub fn load_record(source: &str) -> Result<FieldRecord, RecordError> {
    if is_remote(source) {
        fetch_record(source)
    } else {
        read_record(source)
    }
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

fn read_record(path: &str) -> Result<FieldRecord, RecordError> {
    let content = std::fs::read_to_string(path).map_err(|e| RecordError::Io {
        path: path.to_string(),
        source: e,
    })?;
    let record = FieldRecord::from_json_str(&content, path)?;
    tracing::debug!(path, fields = record.len(), "loaded field record");
    Ok(record)
}

fn fetch_record(url: &str) -> Result<FieldRecord, RecordError> {
    let http_err = |e: reqwest::Error| RecordError::Http {
        url: url.to_string(),
        source: e,
    };

    let client = reqwest::blocking::Client::new();
    let value: serde_json::Value = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(http_err)?
        .json()
        .map_err(http_err)?;

    let record = FieldRecord::from_value(value)?;
    tracing::debug!(url, fields = record.len(), "fetched field record");
    Ok(record)
}
