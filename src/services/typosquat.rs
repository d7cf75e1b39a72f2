// Brand impersonation detector
// Compares a hostname's base label against a curated brand catalog using
// edit distance, substring containment, and homoglyph normalization

use std::collections::HashSet;

use once_cell::sync::Lazy;
use tracing::debug;

use crate::models::{MatchMethod, TyposquatMatch};
use crate::utils::hostname::extract_base_label;
use crate::utils::string_metrics::{edit_distance, homoglyph_substitution_match};

// ============================================
// BRAND CATALOG
// ============================================

/// Top 100 brand root names, deduplicated, lowercase.
const BRAND_CATALOG: &[&str] = &[
    // Tech & Social (30)
    "google",
    "facebook",
    "youtube",
    "instagram",
    "twitter",
    "linkedin",
    "microsoft",
    "apple",
    "amazon",
    "netflix",
    "tiktok",
    "snapchat",
    "reddit",
    "discord",
    "telegram",
    "whatsapp",
    "zoom",
    "dropbox",
    "github",
    "stackoverflow",
    "yahoo",
    "bing",
    "adobe",
    "spotify",
    "twitch",
    "pinterest",
    "tumblr",
    "medium",
    "wordpress",
    "slack",
    // Finance (20)
    "paypal",
    "stripe",
    "square",
    "venmo",
    "chase",
    "wellsfargo",
    "bankofamerica",
    "citibank",
    "capitalone",
    "amex",
    "discover",
    "coinbase",
    "binance",
    "kraken",
    "robinhood",
    "etrade",
    "fidelity",
    "schwab",
    "vanguard",
    "wise",
    // E-commerce (15)
    "ebay",
    "walmart",
    "target",
    "bestbuy",
    "aliexpress",
    "etsy",
    "shopify",
    "wayfair",
    "ikea",
    "macys",
    "nordstrom",
    "sephora",
    "gamestop",
    "newegg",
    "overstock",
    // Streaming (10)
    "hulu",
    "disneyplus",
    "hbomax",
    "paramount",
    "peacock",
    "espn",
    "crunchyroll",
    "imdb",
    "audible",
    "kindle",
    // Gaming (10)
    "steam",
    "epicgames",
    "playstation",
    "xbox",
    "nintendo",
    "roblox",
    "minecraft",
    "fortnite",
    "valorant",
    "leagueoflegends",
    // Other (15)
    "booking",
    "expedia",
    "airbnb",
    "uber",
    "lyft",
    "doordash",
    "ubereats",
    "grubhub",
    "instacart",
    "fedex",
    "ups",
    "usps",
    "dhl",
    "cnn",
    "bbc",
];

/// Read-only brand lookup: ordered scan list plus a set for exact matches.
#[derive(Debug, Clone)]
pub struct BrandCatalog {
    names: Vec<String>,
    index: HashSet<String>,
}

static TOP_BRANDS: Lazy<BrandCatalog> =
    Lazy::new(|| BrandCatalog::from_names(BRAND_CATALOG.iter().copied()));

impl BrandCatalog {
    pub fn top_brands() -> Self {
        TOP_BRANDS.clone()
    }

    /// Custom catalog, mainly for tests. Names are lowercased; duplicates
    /// keep their first position in scan order.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ordered = Vec::new();
        let mut index = HashSet::new();
        for name in names {
            let name = name.into().to_lowercase();
            if index.insert(name.clone()) {
                ordered.push(name);
            }
        }
        Self {
            names: ordered,
            index,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

// ============================================
// DETECTOR
// ============================================

#[derive(Debug, Clone)]
pub struct TyposquatDetector {
    catalog: BrandCatalog,
}

impl Default for TyposquatDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl TyposquatDetector {
    pub fn new() -> Self {
        Self {
            catalog: BrandCatalog::top_brands(),
        }
    }

    pub fn with_catalog(catalog: BrandCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &BrandCatalog {
        &self.catalog
    }

    /// Best impersonation match for a hostname, or None.
    ///
    /// A base label that exactly equals a catalog entry is legitimate and
    /// never reported. Otherwise every brand is scored and the highest
    /// confidence wins; ties keep the earliest brand in catalog order.
    pub fn detect(&self, hostname: &str) -> Option<TyposquatMatch> {
        let base = extract_base_label(hostname);
        if self.catalog.contains(&base) {
            return None;
        }

        let base_len = base.chars().count();
        // Edit distance is at least the length difference, so brands outside
        // this window can never fire the distance rules. Containment and
        // homoglyph rules are exempt from the window.
        let max_len = base_len + 3;
        let min_len = std::cmp::max(3, base_len.saturating_sub(3));

        let mut best: Option<TyposquatMatch> = None;
        let mut best_score = 0u8;

        for brand in &self.catalog.names {
            let brand_len = brand.chars().count();
            let distance_plausible = brand_len >= min_len && brand_len <= max_len;

            if let Some(candidate) = classify(&base, brand, distance_plausible) {
                if candidate.confidence > best_score {
                    best_score = candidate.confidence;
                    best = Some(candidate);
                }
                // 95 is the maximum attainable confidence
                if best_score >= 95 {
                    break;
                }
            }
        }

        if let Some(ref found) = best {
            debug!(
                hostname = hostname,
                brand = %found.target_brand,
                confidence = found.confidence,
                "typosquat candidate"
            );
        }
        best
    }
}

/// Score one brand against a base label. Rules are checked in priority
/// order and the first hit wins.
fn classify(base: &str, brand: &str, distance_plausible: bool) -> Option<TyposquatMatch> {
    if base == brand {
        return None;
    }

    if distance_plausible {
        match edit_distance(base, brand) {
            1 => {
                return Some(TyposquatMatch::new(
                    brand,
                    MatchMethod::SingleCharDifference,
                    95,
                    format!("\"{}\" vs \"{}\" (1 character off)", base, brand),
                ));
            }
            2 => {
                return Some(TyposquatMatch::new(
                    brand,
                    MatchMethod::TwoCharDifference,
                    85,
                    format!("\"{}\" vs \"{}\" (2 characters off)", base, brand),
                ));
            }
            _ => {}
        }
    }

    if base.contains(brand) {
        return Some(TyposquatMatch::new(
            brand,
            MatchMethod::ContainsBrand,
            80,
            format!("Contains \"{}\" with extra text", brand),
        ));
    }

    if brand.contains(base) && base.chars().count() >= 4 {
        return Some(TyposquatMatch::new(
            brand,
            MatchMethod::ShortenedBrand,
            70,
            format!("Looks like shortened \"{}\"", brand),
        ));
    }

    if homoglyph_substitution_match(base, brand) {
        return Some(TyposquatMatch::new(
            brand,
            MatchMethod::Homoglyph,
            90,
            format!("Uses confusing characters to mimic \"{}\"", brand),
        ));
    }

    None
}
