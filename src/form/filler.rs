use crate::browser::driver::{ElementHandle, PageDriver};
use crate::browser::error::DriverError;
use crate::form::block_model::{Widget, WidgetKind};
use crate::form::classifier::FormSelectors;
use crate::form::date::to_iso_date;
use crate::form::outcome::{BlockOutcome, FillError, SkipReason};

/// Apply `value` to a classified widget.
///
/// Driver failures never escape: they come back as
/// `BlockOutcome::Error(FillError::InteractionFailure)`.
pub fn fill_widget<P: PageDriver + ?Sized>(
    page: &mut P,
    widget: &Widget,
    value: &str,
    selectors: &FormSelectors,
) -> BlockOutcome {
    match apply(page, widget, value, selectors) {
        Ok(outcome) => outcome,
        Err(e) => BlockOutcome::Error(FillError::InteractionFailure(e.to_string())),
    }
}

fn apply<P: PageDriver + ?Sized>(
    page: &mut P,
    widget: &Widget,
    value: &str,
    selectors: &FormSelectors,
) -> Result<BlockOutcome, DriverError> {
    match widget {
        Widget::Date(input) => {
            let iso = match to_iso_date(value) {
                Ok(iso) => iso,
                Err(e) => return Ok(BlockOutcome::Error(e)),
            };
            let input = input.as_ref().ok_or_else(|| DriverError::ElementNotFound {
                handle: selectors.date_input.clone(),
                context: "date question has no date input".into(),
            })?;
            page.fill(input, &iso)?;
            tracing::debug!(value = %iso, "filled date");
            Ok(BlockOutcome::filled(WidgetKind::Date, iso))
        }

        Widget::RadioGroup(radios) => select_radio(page, radios, value),

        Widget::Text(input) => {
            page.fill(input, value)?;
            Ok(BlockOutcome::filled(WidgetKind::Text, value))
        }

        Widget::Textarea(input) => {
            page.fill(input, value)?;
            Ok(BlockOutcome::filled(WidgetKind::Textarea, value))
        }

        Widget::Dropdown(listbox) => select_dropdown(page, listbox, value, &selectors.option),

        Widget::Unknown => Ok(BlockOutcome::Skipped(SkipReason::UnhandledType)),
    }
}

/// Click the first radio whose accessible label equals the value.
fn select_radio<P: PageDriver + ?Sized>(
    page: &mut P,
    radios: &[ElementHandle],
    value: &str,
) -> Result<BlockOutcome, DriverError> {
    for radio in radios {
        let label = match page.attribute(radio, "aria-label")? {
            Some(label) => Some(label),
            None => page.text_content(radio)?,
        };

        if let Some(label) = label {
            if option_matches(&label, value) {
                page.click(radio)?;
                tracing::debug!(option = label.trim(), "selected radio option");
                return Ok(BlockOutcome::filled(WidgetKind::RadioGroup, label.trim()));
            }
        }
    }

    Ok(BlockOutcome::Skipped(SkipReason::OptionNotFound))
}

/// Expand the listbox, then pick the matching option among the visible
/// page-level options it renders. On a miss the listbox is collapsed again
/// so its options cannot be picked up by a later dropdown.
fn select_dropdown<P: PageDriver + ?Sized>(
    page: &mut P,
    listbox: &ElementHandle,
    value: &str,
    option_selector: &str,
) -> Result<BlockOutcome, DriverError> {
    page.click(listbox)?;

    for option in page.query_all(option_selector, None)? {
        if !page.is_visible(&option)? {
            continue;
        }
        let Some(text) = page.text_content(&option)? else {
            continue;
        };
        if option_matches(&text, value) {
            page.click(&option)?;
            tracing::debug!(option = text.trim(), "selected dropdown option");
            return Ok(BlockOutcome::filled(WidgetKind::Dropdown, text.trim()));
        }
    }

    page.press_key("Escape")?;
    Ok(BlockOutcome::Skipped(SkipReason::OptionNotFound))
}

/// Trimmed, case-insensitive equality.
pub fn option_matches(option_text: &str, value: &str) -> bool {
    option_text.trim().to_lowercase() == value.trim().to_lowercase()
}
