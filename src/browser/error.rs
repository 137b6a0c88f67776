use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    /// Node.js driver process failed to spawn
    #[error("Failed to spawn {script} (is Node.js installed?): {source}")]
    SubprocessSpawn {
        script: String,
        #[source]
        source: std::io::Error,
    },

    /// Driver output was not valid JSON
    #[error("JSON parse error ({context}): {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Request could not be serialized for the driver
    #[error("JSON serialize error ({context}): {source}")]
    JsonSerialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Reading from or writing to the driver pipes failed
    #[error("Session I/O failed: {0}")]
    SessionIO(String),

    /// Driver answered with ok=false or an incomplete response
    #[error("{command} failed: {error}")]
    SessionProtocol { command: String, error: String },

    /// The page or browser is gone; nothing further can run against it
    #[error("Browser session is closed")]
    SessionClosed,

    /// Handle does not refer to a live element
    #[error("Element '{handle}' not found: {context}")]
    ElementNotFound { handle: String, context: String },

    /// Selector the driver cannot interpret
    #[error("Invalid selector '{0}'")]
    InvalidSelector(String),
}
