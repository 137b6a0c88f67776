use std::fmt;

use serde::{Deserialize, Serialize};

use crate::browser::driver::ElementHandle;

/// One question on the page, discovered fresh on every run.
#[derive(Debug, Clone, PartialEq)]
pub struct FormBlock {
    /// Position in document order (0-based)
    pub index: usize,
    /// Raw heading text; `None` when the block has no heading
    pub label: Option<String>,
    pub handle: ElementHandle,
}

/// Widget families the filler knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    Date,
    RadioGroup,
    Text,
    Textarea,
    Dropdown,
    Unknown,
}

impl WidgetKind {
    /// Classification order used when none is configured. A block can hold
    /// several probe-able elements, so the order decides which one wins.
    pub const DEFAULT_ORDER: [WidgetKind; 5] = [
        WidgetKind::Date,
        WidgetKind::RadioGroup,
        WidgetKind::Text,
        WidgetKind::Textarea,
        WidgetKind::Dropdown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetKind::Date => "date",
            WidgetKind::RadioGroup => "radio_group",
            WidgetKind::Text => "text",
            WidgetKind::Textarea => "textarea",
            WidgetKind::Dropdown => "dropdown",
            WidgetKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Elements found inside a block, grouped by what they could be.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockProbe {
    pub date_inputs: Vec<ElementHandle>,
    pub radios: Vec<ElementHandle>,
    pub text_inputs: Vec<ElementHandle>,
    pub textareas: Vec<ElementHandle>,
    pub listboxes: Vec<ElementHandle>,
}

/// A classified block, carrying the handles its fill strategy needs.
#[derive(Debug, Clone, PartialEq)]
pub enum Widget {
    /// Date question; the input may be missing from the block
    Date(Option<ElementHandle>),
    RadioGroup(Vec<ElementHandle>),
    Text(ElementHandle),
    Textarea(ElementHandle),
    /// The collapsed listbox; its options render at page level once opened
    Dropdown(ElementHandle),
    Unknown,
}

impl Widget {
    pub fn kind(&self) -> WidgetKind {
        match self {
            Widget::Date(_) => WidgetKind::Date,
            Widget::RadioGroup(_) => WidgetKind::RadioGroup,
            Widget::Text(_) => WidgetKind::Text,
            Widget::Textarea(_) => WidgetKind::Textarea,
            Widget::Dropdown(_) => WidgetKind::Dropdown,
            Widget::Unknown => WidgetKind::Unknown,
        }
    }
}
