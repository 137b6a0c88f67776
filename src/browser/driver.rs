use std::fmt;

use serde::{Deserialize, Serialize};

use crate::browser::error::DriverError;

/// Opaque reference to an element on the live page, issued by the driver.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementHandle(pub String);

impl ElementHandle {
    pub fn new(id: impl Into<String>) -> Self {
        ElementHandle(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the fill engine needs from a browser page.
///
/// Every call blocks until the driver confirms the action, so effects of one
/// call are visible to the next. Selectors are CSS with attribute matches,
/// e.g. `div[role='listitem']`.
pub trait PageDriver {
    /// Let the page settle for `ms` milliseconds.
    fn wait_idle(&mut self, ms: u64) -> Result<(), DriverError>;

    /// Elements matching `selector` in document order, searched inside
    /// `scope` when given, otherwise across the whole page.
    fn query_all(
        &mut self,
        selector: &str,
        scope: Option<&ElementHandle>,
    ) -> Result<Vec<ElementHandle>, DriverError>;

    fn text_content(&mut self, element: &ElementHandle) -> Result<Option<String>, DriverError>;

    fn attribute(
        &mut self,
        element: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, DriverError>;

    /// Whether the element is rendered and not hidden.
    fn is_visible(&mut self, element: &ElementHandle) -> Result<bool, DriverError>;

    fn click(&mut self, element: &ElementHandle) -> Result<(), DriverError>;

    fn fill(&mut self, element: &ElementHandle, value: &str) -> Result<(), DriverError>;

    /// Press a key on the focused page, e.g. `Escape`.
    fn press_key(&mut self, key: &str) -> Result<(), DriverError>;

    /// Tear down the page session. Further calls fail with `SessionClosed`.
    fn close(&mut self) -> Result<(), DriverError>;

    /// First match of `selector`, if any.
    fn query_first(
        &mut self,
        selector: &str,
        scope: Option<&ElementHandle>,
    ) -> Result<Option<ElementHandle>, DriverError> {
        Ok(self.query_all(selector, scope)?.into_iter().next())
    }
}
