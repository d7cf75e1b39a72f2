// Utility modules for PhishGuard Core

pub mod hostname;
pub mod string_metrics;

pub use hostname::{extract_base_label, is_idn_host, is_ip_literal};
pub use string_metrics::{
    edit_distance, entropy, homoglyph_canonical, homoglyph_substitution_match, jaro_winkler,
};
