use std::io::{BufRead, BufReader, Write};
use std::process::{Child, Command, Stdio};

use serde::{Deserialize, Serialize};

use crate::browser::driver::{ElementHandle, PageDriver};
use crate::browser::error::DriverError;

/// Request sent to form_server.js over stdin (one JSON line).
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BrowserRequest {
    Navigate {
        cmd: &'static str,
        url: String,
    },
    Wait {
        cmd: &'static str,
        ms: u64,
    },
    Query {
        cmd: &'static str,
        selector: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        scope: Option<ElementHandle>,
    },
    Text {
        cmd: &'static str,
        handle: ElementHandle,
    },
    Attr {
        cmd: &'static str,
        handle: ElementHandle,
        name: String,
    },
    Visible {
        cmd: &'static str,
        handle: ElementHandle,
    },
    Click {
        cmd: &'static str,
        handle: ElementHandle,
    },
    Fill {
        cmd: &'static str,
        handle: ElementHandle,
        value: String,
    },
    Press {
        cmd: &'static str,
        key: String,
    },
    Quit {
        cmd: &'static str,
    },
}

impl BrowserRequest {
    pub fn navigate(url: &str) -> Self {
        BrowserRequest::Navigate {
            cmd: "navigate",
            url: url.to_string(),
        }
    }

    pub fn wait(ms: u64) -> Self {
        BrowserRequest::Wait { cmd: "wait", ms }
    }

    pub fn query(selector: &str, scope: Option<&ElementHandle>) -> Self {
        BrowserRequest::Query {
            cmd: "query",
            selector: selector.to_string(),
            scope: scope.cloned(),
        }
    }

    pub fn text(handle: &ElementHandle) -> Self {
        BrowserRequest::Text {
            cmd: "text",
            handle: handle.clone(),
        }
    }

    pub fn attr(handle: &ElementHandle, name: &str) -> Self {
        BrowserRequest::Attr {
            cmd: "attr",
            handle: handle.clone(),
            name: name.to_string(),
        }
    }

    pub fn visible(handle: &ElementHandle) -> Self {
        BrowserRequest::Visible {
            cmd: "visible",
            handle: handle.clone(),
        }
    }

    pub fn click(handle: &ElementHandle) -> Self {
        BrowserRequest::Click {
            cmd: "click",
            handle: handle.clone(),
        }
    }

    pub fn fill(handle: &ElementHandle, value: &str) -> Self {
        BrowserRequest::Fill {
            cmd: "fill",
            handle: handle.clone(),
            value: value.to_string(),
        }
    }

    pub fn press(key: &str) -> Self {
        BrowserRequest::Press {
            cmd: "press",
            key: key.to_string(),
        }
    }

    pub fn quit() -> Self {
        BrowserRequest::Quit { cmd: "quit" }
    }
}

/// Response received from form_server.js over stdout (one JSON line).
#[derive(Debug, Deserialize)]
pub struct BrowserResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub ready: Option<bool>,
    #[serde(default)]
    pub handles: Option<Vec<ElementHandle>>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub visible: Option<bool>,
}

/// How to start the Node.js driver.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub node: String,
    pub script: String,
    pub headless: bool,
    /// Saved browser storage state (cookies, local storage) to restore
    pub storage_state: Option<String>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            node: "node".into(),
            script: "node/form_server.js".into(),
            headless: false,
            storage_state: Some("auth.json".into()),
        }
    }
}

/// A persistent browser page backed by form_server.js.
///
/// Launches a long-lived Node.js process that keeps a Chromium page open.
/// Commands are sent as NDJSON over stdin, responses read from stdout.
/// Once the pipe breaks the session is marked closed and every later call
/// fails immediately.
pub struct BrowserSession {
    child: Child,
    stdin: std::process::ChildStdin,
    reader: BufReader<std::process::ChildStdout>,
    current_url: Option<String>,
    closed: bool,
}

impl BrowserSession {
    /// Launch a new browser session by spawning the driver script.
    pub fn launch(options: &SessionOptions) -> Result<Self, DriverError> {
        let mut command = Command::new(&options.node);
        command.arg(&options.script);
        if options.headless {
            command.arg("--headless");
        }
        if let Some(state) = &options.storage_state {
            command.arg("--storage-state").arg(state);
        }

        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| DriverError::SubprocessSpawn {
                script: options.script.clone(),
                source: e,
            })?;

        let stdin = child.stdin.take().ok_or_else(|| {
            DriverError::SessionIO("Failed to capture stdin of form_server.js".into())
        })?;

        let stdout = child.stdout.take().ok_or_else(|| {
            DriverError::SessionIO("Failed to capture stdout of form_server.js".into())
        })?;

        let mut reader = BufReader::new(stdout);

        // Wait for the ready signal
        let mut line = String::new();
        reader
            .read_line(&mut line)
            .map_err(|e| DriverError::SessionIO(format!("Failed to read ready signal: {}", e)))?;

        let response: BrowserResponse =
            serde_json::from_str(line.trim()).map_err(|e| DriverError::JsonParse {
                context: "form_server.js ready signal".into(),
                source: e,
            })?;

        if !response.ok || response.ready != Some(true) {
            return Err(DriverError::SessionProtocol {
                command: "launch".into(),
                error: "Did not receive ready signal from form_server.js".into(),
            });
        }

        tracing::debug!(script = %options.script, headless = options.headless, "browser session ready");

        Ok(BrowserSession {
            child,
            stdin,
            reader,
            current_url: None,
            closed: false,
        })
    }

    /// Send a request and read the response.
    fn send(&mut self, request: &BrowserRequest) -> Result<BrowserResponse, DriverError> {
        if self.closed {
            return Err(DriverError::SessionClosed);
        }

        let json = serde_json::to_string(request).map_err(|e| DriverError::JsonSerialize {
            context: "BrowserRequest".into(),
            source: e,
        })?;

        let result = self.exchange(&json);
        if matches!(result, Err(DriverError::SessionIO(_))) {
            self.closed = true;
        }
        result
    }

    fn exchange(&mut self, json: &str) -> Result<BrowserResponse, DriverError> {
        writeln!(self.stdin, "{}", json).map_err(|e| {
            DriverError::SessionIO(format!("Failed to write to form_server.js stdin: {}", e))
        })?;

        self.stdin.flush().map_err(|e| {
            DriverError::SessionIO(format!("Failed to flush form_server.js stdin: {}", e))
        })?;

        let mut line = String::new();
        self.reader.read_line(&mut line).map_err(|e| {
            DriverError::SessionIO(format!("Failed to read from form_server.js stdout: {}", e))
        })?;

        if line.trim().is_empty() {
            return Err(DriverError::SessionIO(
                "Empty response from form_server.js (process may have died)".into(),
            ));
        }

        serde_json::from_str(line.trim()).map_err(|e| DriverError::JsonParse {
            context: "form_server.js response".into(),
            source: e,
        })
    }

    /// Send a request and verify it succeeded.
    fn send_ok(
        &mut self,
        request: &BrowserRequest,
        command_name: &str,
    ) -> Result<BrowserResponse, DriverError> {
        let response = self.send(request)?;
        if !response.ok {
            return Err(DriverError::SessionProtocol {
                command: command_name.into(),
                error: response.error.unwrap_or_else(|| "Unknown error".into()),
            });
        }
        Ok(response)
    }

    /// Navigate to a URL.
    pub fn navigate(&mut self, url: &str) -> Result<(), DriverError> {
        let request = BrowserRequest::navigate(url);
        self.send_ok(&request, "navigate")?;
        self.current_url = Some(url.to_string());
        Ok(())
    }

    /// Get the last navigated URL (cached, no browser call).
    pub fn last_url(&self) -> Option<&str> {
        self.current_url.as_deref()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Quit the browser session.
    pub fn quit(&mut self) -> Result<(), DriverError> {
        if self.closed {
            return Ok(());
        }
        let request = BrowserRequest::quit();
        // Best-effort quit; the process may already be gone
        let _ = self.send(&request);
        self.closed = true;
        let _ = self.child.wait();
        Ok(())
    }
}

impl PageDriver for BrowserSession {
    fn wait_idle(&mut self, ms: u64) -> Result<(), DriverError> {
        self.send_ok(&BrowserRequest::wait(ms), "wait")?;
        Ok(())
    }

    fn query_all(
        &mut self,
        selector: &str,
        scope: Option<&ElementHandle>,
    ) -> Result<Vec<ElementHandle>, DriverError> {
        let response = self.send_ok(&BrowserRequest::query(selector, scope), "query")?;
        Ok(response.handles.unwrap_or_default())
    }

    fn text_content(&mut self, element: &ElementHandle) -> Result<Option<String>, DriverError> {
        let response = self.send_ok(&BrowserRequest::text(element), "text")?;
        Ok(response.text)
    }

    fn attribute(
        &mut self,
        element: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, DriverError> {
        let response = self.send_ok(&BrowserRequest::attr(element, name), "attr")?;
        Ok(response.value)
    }

    fn is_visible(&mut self, element: &ElementHandle) -> Result<bool, DriverError> {
        let response = self.send_ok(&BrowserRequest::visible(element), "visible")?;
        Ok(response.visible.unwrap_or(false))
    }

    fn click(&mut self, element: &ElementHandle) -> Result<(), DriverError> {
        self.send_ok(&BrowserRequest::click(element), "click")?;
        Ok(())
    }

    fn fill(&mut self, element: &ElementHandle, value: &str) -> Result<(), DriverError> {
        self.send_ok(&BrowserRequest::fill(element, value), "fill")?;
        Ok(())
    }

    fn press_key(&mut self, key: &str) -> Result<(), DriverError> {
        self.send_ok(&BrowserRequest::press(key), "press")?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), DriverError> {
        self.quit()
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        // Best-effort cleanup
        let _ = self.quit();
    }
}
