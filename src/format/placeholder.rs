pub const NOT_AVAILABLE: &str = "N/A";

/// Get-or-default for optional listing attributes.
///
/// Blank text and empty lists count as absent.
pub trait Placeholder {
    fn or_placeholder(&self, placeholder: &str) -> String;
}

impl Placeholder for Option<String> {
    fn or_placeholder(&self, placeholder: &str) -> String {
        self.as_deref().or_placeholder(placeholder)
    }
}

impl Placeholder for Option<&str> {
    fn or_placeholder(&self, placeholder: &str) -> String {
        match self.map(str::trim) {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => placeholder.to_string(),
        }
    }
}

impl Placeholder for Option<f64> {
    fn or_placeholder(&self, placeholder: &str) -> String {
        match self {
            Some(value) if value.is_finite() => format_number(*value),
            _ => placeholder.to_string(),
        }
    }
}

impl Placeholder for [String] {
    fn or_placeholder(&self, placeholder: &str) -> String {
        let items: Vec<&str> = self
            .iter()
            .map(|item| item.trim())
            .filter(|item| !item.is_empty())
            .collect();

        if items.is_empty() {
            placeholder.to_string()
        } else {
            items.join(", ")
        }
    }
}

/// Whole numbers without a decimal point, fractions as written
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
