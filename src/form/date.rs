use crate::form::outcome::FillError;

/// Whether a label announces a date question.
pub fn is_date_label(label: &str) -> bool {
    let lower = label.to_lowercase();
    lower.contains("date") || lower.contains("birth")
}

/// Reformat a `day/month/year` value into the `year-month-day` form date
/// inputs accept. Single-digit days and months are zero-padded; the year
/// must have exactly four digits.
pub fn to_iso_date(value: &str) -> Result<String, FillError> {
    let malformed = || FillError::MalformedDateValue {
        value: value.to_string(),
    };

    let parts: Vec<&str> = value.trim().split('/').map(str::trim).collect();
    let [day, month, year] = parts.as_slice() else {
        return Err(malformed());
    };

    let day = pad_component(day, 2).ok_or_else(malformed)?;
    let month = pad_component(month, 2).ok_or_else(malformed)?;
    if year.len() != 4 || !year.chars().all(|c| c.is_ascii_digit()) {
        return Err(malformed());
    }

    Ok(format!("{}-{}-{}", year, month, day))
}

/// Digits only, at most `width` of them, left-padded with zeros.
fn pad_component(part: &str, width: usize) -> Option<String> {
    if part.is_empty() || part.len() > width || !part.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(format!("{:0>width$}", part, width = width))
}
