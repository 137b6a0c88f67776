use serde::{Deserialize, Serialize};

use crate::browser::driver::{ElementHandle, PageDriver};
use crate::browser::error::DriverError;
use crate::form::block_model::{BlockProbe, Widget, WidgetKind};
use crate::form::date::is_date_label;

/// CSS selectors describing the form markup. Defaults target
/// accessibility-role-tagged question lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormSelectors {
    /// One per question, in document order
    pub block: String,
    /// Question text, inside a block
    pub heading: String,
    pub date_input: String,
    pub radio: String,
    pub text_input: String,
    pub textarea: String,
    pub listbox: String,
    /// Dropdown options, searched across the whole page
    pub option: String,
}

impl Default for FormSelectors {
    fn default() -> Self {
        Self {
            block: "div[role='listitem']".into(),
            heading: "div[role='heading']".into(),
            date_input: "input[type='date']".into(),
            radio: "[role='radio']".into(),
            text_input: "input[type='text']".into(),
            textarea: "textarea".into(),
            listbox: "div[role='listbox']".into(),
            option: "div[role='option']".into(),
        }
    }
}

/// Collect the candidate widget elements inside one block.
pub fn probe_block<P: PageDriver + ?Sized>(
    page: &mut P,
    block: &ElementHandle,
    selectors: &FormSelectors,
) -> Result<BlockProbe, DriverError> {
    Ok(BlockProbe {
        date_inputs: page.query_all(&selectors.date_input, Some(block))?,
        radios: page.query_all(&selectors.radio, Some(block))?,
        text_inputs: page.query_all(&selectors.text_input, Some(block))?,
        textareas: page.query_all(&selectors.textarea, Some(block))?,
        listboxes: page.query_all(&selectors.listbox, Some(block))?,
    })
}

/// Decide how a block is filled. Rules are tried in `order`; the first one
/// that applies wins. `Unknown` entries in `order` are ignored.
pub fn classify(label: &str, probe: &BlockProbe, order: &[WidgetKind]) -> Widget {
    for kind in order {
        let widget = match kind {
            WidgetKind::Date if is_date_label(label) => {
                Some(Widget::Date(probe.date_inputs.first().cloned()))
            }
            WidgetKind::RadioGroup if !probe.radios.is_empty() => {
                Some(Widget::RadioGroup(probe.radios.clone()))
            }
            WidgetKind::Text => probe.text_inputs.first().cloned().map(Widget::Text),
            WidgetKind::Textarea => probe.textareas.first().cloned().map(Widget::Textarea),
            WidgetKind::Dropdown => probe.listboxes.first().cloned().map(Widget::Dropdown),
            _ => None,
        };

        if let Some(widget) = widget {
            return widget;
        }
    }

    Widget::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(id: &str) -> ElementHandle {
        ElementHandle::new(id)
    }

    #[test]
    fn date_label_wins_over_text_input() {
        let probe = BlockProbe {
            date_inputs: vec![h("d")],
            text_inputs: vec![h("t")],
            ..Default::default()
        };
        assert_eq!(
            classify("Date of Birth", &probe, &WidgetKind::DEFAULT_ORDER),
            Widget::Date(Some(h("d")))
        );
    }

    #[test]
    fn date_label_without_input_still_classifies_as_date() {
        let probe = BlockProbe {
            text_inputs: vec![h("t")],
            ..Default::default()
        };
        assert_eq!(
            classify("Birth place", &probe, &WidgetKind::DEFAULT_ORDER),
            Widget::Date(None)
        );
    }

    #[test]
    fn radio_before_text_before_textarea_before_dropdown() {
        let full = BlockProbe {
            radios: vec![h("r1"), h("r2")],
            text_inputs: vec![h("t")],
            textareas: vec![h("a")],
            listboxes: vec![h("l")],
            ..Default::default()
        };
        let order = WidgetKind::DEFAULT_ORDER;
        assert_eq!(classify("Gender", &full, &order).kind(), WidgetKind::RadioGroup);

        let no_radio = BlockProbe { radios: vec![], ..full.clone() };
        assert_eq!(classify("Gender", &no_radio, &order), Widget::Text(h("t")));

        let only_area_and_list = BlockProbe {
            textareas: vec![h("a")],
            listboxes: vec![h("l")],
            ..Default::default()
        };
        assert_eq!(classify("About", &only_area_and_list, &order), Widget::Textarea(h("a")));
    }

    #[test]
    fn custom_order_is_respected() {
        let probe = BlockProbe {
            text_inputs: vec![h("t")],
            listboxes: vec![h("l")],
            ..Default::default()
        };
        let order = [WidgetKind::Dropdown, WidgetKind::Text];
        assert_eq!(classify("Branch", &probe, &order), Widget::Dropdown(h("l")));
    }

    #[test]
    fn nothing_probed_is_unknown() {
        assert_eq!(
            classify("Resume upload", &BlockProbe::default(), &WidgetKind::DEFAULT_ORDER),
            Widget::Unknown
        );
    }
}
