// Page-level observations forwarded by a content collector

use serde::{Deserialize, Serialize};

/// Facts about the rendered page that cannot be derived from the URL alone.
/// Absent signals are treated as "nothing observed", never as an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSignals {
    /// Forms whose action posts to a different registrable host.
    #[serde(default)]
    pub external_form_count: u32,
    /// True when any password input is present on the page.
    #[serde(default)]
    pub has_password_field: bool,
}

impl PageSignals {
    pub fn new(external_form_count: u32, has_password_field: bool) -> Self {
        Self {
            external_form_count,
            has_password_field,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.external_form_count == 0 && !self.has_password_field
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        assert!(PageSignals::default().is_empty());
        assert!(!PageSignals::new(1, false).is_empty());
        assert!(!PageSignals::new(0, true).is_empty());
    }

    #[test]
    fn test_missing_fields_deserialize_to_defaults() {
        let signals: PageSignals = serde_json::from_str("{}").unwrap();
        assert_eq!(signals, PageSignals::default());
    }
}
