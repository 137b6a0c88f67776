use std::collections::{BTreeMap, HashSet};

use crate::browser::driver::{ElementHandle, PageDriver};
use crate::browser::error::DriverError;

// ============================================================================
// In-memory page for running the fill engine without a browser
// ============================================================================

/// Element description used to build a [`MockPage`].
#[derive(Debug, Clone, Default)]
pub struct MockElement {
    pub tag: String,
    pub attrs: BTreeMap<String, String>,
    pub text: Option<String>,
    pub children: Vec<MockElement>,
    /// Elements rendered at page level only while this element is expanded
    /// (the options of a listbox).
    pub popup: Vec<MockElement>,
}

impl MockElement {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Default::default()
        }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn child(mut self, child: MockElement) -> Self {
        self.children.push(child);
        self
    }

    pub fn heading(text: &str) -> Self {
        Self::new("div").attr("role", "heading").text(text)
    }

    pub fn text_input() -> Self {
        Self::new("input").attr("type", "text")
    }

    pub fn date_input() -> Self {
        Self::new("input").attr("type", "date")
    }

    pub fn textarea() -> Self {
        Self::new("textarea")
    }

    pub fn radio(label: &str) -> Self {
        Self::new("div").attr("role", "radio").attr("aria-label", label)
    }

    pub fn listbox(options: &[&str]) -> Self {
        let mut listbox = Self::new("div").attr("role", "listbox");
        listbox.popup = options
            .iter()
            .map(|o| Self::new("div").attr("role", "option").text(o))
            .collect();
        listbox
    }
}

/// Interaction recorded by a [`MockPage`].
#[derive(Debug, Clone, PartialEq)]
pub enum MockAction {
    Fill {
        /// Heading of the enclosing question block, if any
        block: Option<String>,
        value: String,
    },
    Click {
        block: Option<String>,
        /// aria-label, else trimmed text of the clicked element
        name: Option<String>,
    },
    Press {
        key: String,
    },
}

#[derive(Debug)]
struct Node {
    tag: String,
    attrs: BTreeMap<String, String>,
    text: Option<String>,
    parent: Option<usize>,
    attached: bool,
    value: Option<String>,
    popup: Vec<usize>,
    popup_owner: Option<usize>,
}

/// A scripted page implementing [`PageDriver`].
///
/// Question blocks are `div[role='listitem']` elements holding a
/// `div[role='heading']` and their widgets, the same shape the default
/// selectors expect. Listbox options stay detached until the listbox is
/// clicked, then appear at page level; clicking an option or pressing
/// `Escape` collapses them. Elements carrying a `hidden` attribute, or inside
/// one, are attached but not visible.
#[derive(Debug, Default)]
pub struct MockPage {
    nodes: Vec<Node>,
    actions: Vec<MockAction>,
    waited_ms: u64,
    closed: bool,
    failing: HashSet<usize>,
    close_after: Option<usize>,
    calls: usize,
}

impl MockPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a question block with a heading and the given widgets.
    pub fn add_block(&mut self, label: &str, widgets: Vec<MockElement>) -> ElementHandle {
        let mut block = MockElement::new("div")
            .attr("role", "listitem")
            .child(MockElement::heading(label));
        block.children.extend(widgets);
        self.add_element(block)
    }

    /// Append a question block that has no heading.
    pub fn add_unlabeled_block(&mut self, widgets: Vec<MockElement>) -> ElementHandle {
        let mut block = MockElement::new("div").attr("role", "listitem");
        block.children.extend(widgets);
        self.add_element(block)
    }

    /// Append an arbitrary top-level element.
    pub fn add_element(&mut self, element: MockElement) -> ElementHandle {
        let idx = self.insert(element, None, true, None);
        handle_for(idx)
    }

    /// Make every click or fill inside `scope` fail.
    pub fn fail_interactions_in(&mut self, scope: &ElementHandle) {
        if let Some(idx) = parse_handle(scope) {
            self.failing.insert(idx);
        }
    }

    /// Simulate the browser going away after `calls` successful driver calls.
    pub fn close_after_calls(&mut self, calls: usize) {
        self.close_after = Some(calls);
    }

    pub fn actions(&self) -> &[MockAction] {
        &self.actions
    }

    pub fn waited_ms(&self) -> u64 {
        self.waited_ms
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn value_of(&self, handle: &ElementHandle) -> Option<&str> {
        parse_handle(handle)
            .and_then(|idx| self.nodes.get(idx))
            .and_then(|n| n.value.as_deref())
    }

    fn insert(
        &mut self,
        element: MockElement,
        parent: Option<usize>,
        attached: bool,
        popup_owner: Option<usize>,
    ) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(Node {
            tag: element.tag,
            attrs: element.attrs,
            text: element.text,
            parent,
            attached,
            value: None,
            popup: Vec::new(),
            popup_owner,
        });

        for child in element.children {
            self.insert(child, Some(idx), attached, None);
        }

        let popup: Vec<usize> = element
            .popup
            .into_iter()
            .map(|p| self.insert(p, None, false, Some(idx)))
            .collect();
        self.nodes[idx].popup = popup;

        idx
    }

    /// Count the call and fail if the session is gone.
    fn enter(&mut self) -> Result<(), DriverError> {
        if self.closed {
            return Err(DriverError::SessionClosed);
        }
        if let Some(limit) = self.close_after {
            if self.calls >= limit {
                self.closed = true;
                return Err(DriverError::SessionClosed);
            }
        }
        self.calls += 1;
        Ok(())
    }

    fn node(&self, handle: &ElementHandle) -> Result<usize, DriverError> {
        parse_handle(handle)
            .filter(|idx| self.nodes.get(*idx).is_some_and(|n| n.attached))
            .ok_or_else(|| DriverError::ElementNotFound {
                handle: handle.to_string(),
                context: "no attached element with this handle".into(),
            })
    }

    fn is_within(&self, mut idx: usize, ancestor: usize) -> bool {
        loop {
            if idx == ancestor {
                return true;
            }
            match self.nodes[idx].parent {
                Some(parent) => idx = parent,
                None => return false,
            }
        }
    }

    fn text_of(&self, idx: usize) -> String {
        let mut out = self.nodes[idx].text.clone().unwrap_or_default();
        for (child, node) in self.nodes.iter().enumerate() {
            if node.parent == Some(idx) {
                out.push_str(&self.text_of(child));
            }
        }
        out
    }

    fn block_label(&self, idx: usize) -> Option<String> {
        let block = (0..self.nodes.len())
            .filter(|b| self.nodes[*b].attrs.get("role").map(String::as_str) == Some("listitem"))
            .find(|b| self.is_within(idx, *b))?;
        self.nodes
            .iter()
            .enumerate()
            .find(|(i, n)| {
                n.attrs.get("role").map(String::as_str) == Some("heading")
                    && self.is_within(*i, block)
            })
            .map(|(i, _)| self.text_of(i))
    }

    fn is_hidden(&self, mut idx: usize) -> bool {
        loop {
            if self.nodes[idx].attrs.contains_key("hidden") {
                return true;
            }
            match self.nodes[idx].parent {
                Some(parent) => idx = parent,
                None => return false,
            }
        }
    }

    fn check_interactive(&self, idx: usize, command: &str) -> Result<(), DriverError> {
        if self.failing.iter().any(|f| self.is_within(idx, *f)) {
            return Err(DriverError::SessionProtocol {
                command: command.into(),
                error: "element is not attached to the DOM".into(),
            });
        }
        Ok(())
    }
}

impl PageDriver for MockPage {
    fn wait_idle(&mut self, ms: u64) -> Result<(), DriverError> {
        self.enter()?;
        self.waited_ms += ms;
        Ok(())
    }

    fn query_all(
        &mut self,
        selector: &str,
        scope: Option<&ElementHandle>,
    ) -> Result<Vec<ElementHandle>, DriverError> {
        self.enter()?;
        let (tag, attr) = parse_selector(selector)?;
        let scope = scope.map(|s| self.node(s)).transpose()?;

        Ok(self
            .nodes
            .iter()
            .enumerate()
            .filter(|(idx, node)| {
                node.attached
                    && scope.is_none_or(|s| *idx != s && self.is_within(*idx, s))
                    && tag.is_none_or(|t| node.tag == t)
                    && attr.is_none_or(|(name, value)| {
                        node.attrs.get(name).map(String::as_str) == Some(value)
                    })
            })
            .map(|(idx, _)| handle_for(idx))
            .collect())
    }

    fn text_content(&mut self, element: &ElementHandle) -> Result<Option<String>, DriverError> {
        self.enter()?;
        let idx = self.node(element)?;
        Ok(Some(self.text_of(idx)))
    }

    fn attribute(
        &mut self,
        element: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, DriverError> {
        self.enter()?;
        let idx = self.node(element)?;
        Ok(self.nodes[idx].attrs.get(name).cloned())
    }

    fn is_visible(&mut self, element: &ElementHandle) -> Result<bool, DriverError> {
        self.enter()?;
        let idx = self.node(element)?;
        Ok(!self.is_hidden(idx))
    }

    fn click(&mut self, element: &ElementHandle) -> Result<(), DriverError> {
        self.enter()?;
        let idx = self.node(element)?;
        self.check_interactive(idx, "click")?;

        let name = self.nodes[idx]
            .attrs
            .get("aria-label")
            .cloned()
            .or_else(|| Some(self.text_of(idx).trim().to_string()).filter(|t| !t.is_empty()));
        let block = self.block_label(idx);
        self.actions.push(MockAction::Click { block, name });

        for popup in self.nodes[idx].popup.clone() {
            self.nodes[popup].attached = true;
        }
        if let Some(owner) = self.nodes[idx].popup_owner {
            let chosen = self.nodes[idx].text.clone();
            self.nodes[owner].value = chosen;
            for popup in self.nodes[owner].popup.clone() {
                self.nodes[popup].attached = false;
            }
        }
        Ok(())
    }

    fn fill(&mut self, element: &ElementHandle, value: &str) -> Result<(), DriverError> {
        self.enter()?;
        let idx = self.node(element)?;
        self.check_interactive(idx, "fill")?;

        self.nodes[idx].value = Some(value.to_string());
        let block = self.block_label(idx);
        self.actions.push(MockAction::Fill {
            block,
            value: value.to_string(),
        });
        Ok(())
    }

    fn press_key(&mut self, key: &str) -> Result<(), DriverError> {
        self.enter()?;
        self.actions.push(MockAction::Press {
            key: key.to_string(),
        });
        if key == "Escape" {
            for node in self.nodes.iter_mut().filter(|n| n.popup_owner.is_some()) {
                node.attached = false;
            }
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), DriverError> {
        self.closed = true;
        Ok(())
    }
}

fn handle_for(idx: usize) -> ElementHandle {
    ElementHandle(format!("m{}", idx))
}

fn parse_handle(handle: &ElementHandle) -> Option<usize> {
    handle.as_str().strip_prefix('m')?.parse().ok()
}

/// Supports `tag`, `[name='value']` and `tag[name='value']`.
fn parse_selector(selector: &str) -> Result<(Option<&str>, Option<(&str, &str)>), DriverError> {
    let invalid = || DriverError::InvalidSelector(selector.to_string());
    let selector = selector.trim();

    let (tag, rest) = match selector.find('[') {
        Some(pos) => (&selector[..pos], Some(&selector[pos..])),
        None => (selector, None),
    };
    let tag = Some(tag).filter(|t| !t.is_empty());

    let attr = match rest {
        None => None,
        Some(rest) => {
            let inner = rest
                .strip_prefix('[')
                .and_then(|r| r.strip_suffix(']'))
                .ok_or_else(invalid)?;
            let (name, value) = inner.split_once('=').ok_or_else(invalid)?;
            let value = value.trim().trim_matches(|c| c == '\'' || c == '"');
            Some((name.trim(), value))
        }
    };

    if tag.is_none() && attr.is_none() {
        return Err(invalid());
    }
    Ok((tag, attr))
}
