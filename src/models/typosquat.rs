// Typosquatting match types shared by the detector and the analyzer

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a hostname was matched against a brand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    SingleCharDifference,
    TwoCharDifference,
    ContainsBrand,
    ShortenedBrand,
    Homoglyph,
}

impl MatchMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMethod::SingleCharDifference => "single character difference",
            MatchMethod::TwoCharDifference => "two character difference",
            MatchMethod::ContainsBrand => "brand name with additions",
            MatchMethod::ShortenedBrand => "shortened brand name",
            MatchMethod::Homoglyph => "look-alike characters",
        }
    }
}

impl fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A suspected impersonation of a known brand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TyposquatMatch {
    pub target_brand: String,
    pub method: MatchMethod,
    /// 0-100, higher is more certain.
    pub confidence: u8,
    pub detail: String,
}

impl TyposquatMatch {
    pub fn new(
        target_brand: impl Into<String>,
        method: MatchMethod,
        confidence: u8,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            target_brand: target_brand.into(),
            method,
            confidence,
            detail: detail.into(),
        }
    }

    /// Headline text for a risk signal built from this match.
    pub fn impersonation_reason(&self) -> String {
        format!("Impersonates \"{}\" - {}", self.target_brand, self.method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_names_brand_and_method() {
        let m = TyposquatMatch::new(
            "paypal",
            MatchMethod::SingleCharDifference,
            95,
            "\"paypa1\" vs \"paypal\" (1 character off)",
        );
        assert_eq!(
            m.impersonation_reason(),
            "Impersonates \"paypal\" - single character difference"
        );
        assert_eq!(m.confidence, 95);
    }

    #[test]
    fn test_method_display_strings() {
        let cases = vec![
            (MatchMethod::SingleCharDifference, "single character difference"),
            (MatchMethod::TwoCharDifference, "two character difference"),
            (MatchMethod::ContainsBrand, "brand name with additions"),
            (MatchMethod::ShortenedBrand, "shortened brand name"),
            (MatchMethod::Homoglyph, "look-alike characters"),
        ];
        for (method, expected) in cases {
            assert_eq!(method.to_string(), expected);
        }
    }
}
