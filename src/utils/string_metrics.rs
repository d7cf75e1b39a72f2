// String distance and distribution metrics for hostname analysis
// Pure functions; short-circuit paths allocate nothing

use std::collections::HashMap;

/// Levenshtein edit distance over Unicode scalar values.
///
/// Single-row dynamic programming (two rolling rows instead of the full
/// matrix). Symmetric; `edit_distance(a, a) == 0`.
pub fn edit_distance(a: &str, b: &str) -> usize {
    // Early exits before any allocation
    if a == b {
        return 0;
    }
    if a.is_empty() {
        return b.chars().count();
    }
    if b.is_empty() {
        return a.chars().count();
    }

    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    // Keep the shorter string on the row axis to minimize row width
    let (short, long) = if a_chars.len() <= b_chars.len() {
        (&a_chars, &b_chars)
    } else {
        (&b_chars, &a_chars)
    };

    let mut prev: Vec<usize> = (0..=short.len()).collect();
    let mut curr: Vec<usize> = vec![0; short.len() + 1];

    for (j, &long_ch) in long.iter().enumerate() {
        curr[0] = j + 1;

        for (i, &short_ch) in short.iter().enumerate() {
            let cost = if short_ch == long_ch { 0 } else { 1 };
            curr[i + 1] = (prev[i + 1] + 1) // deletion
                .min(curr[i] + 1) // insertion
                .min(prev[i] + cost); // substitution
        }

        std::mem::swap(&mut prev, &mut curr);
    }

    prev[short.len()]
}

/// Shannon entropy (base 2) over the character frequency distribution.
///
/// `entropy("") == 0.0`. Zero-probability terms are skipped so the result
/// is never NaN or negative infinity.
pub fn entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut frequencies: HashMap<char, usize> = HashMap::new();
    let mut len = 0usize;
    for ch in s.chars() {
        *frequencies.entry(ch).or_insert(0) += 1;
        len += 1;
    }

    let len = len as f64;
    frequencies.values().fold(0.0, |sum, &count| {
        let probability = count as f64 / len;
        if probability > 0.0 {
            sum - probability * probability.log2()
        } else {
            sum
        }
    })
}

/// Jaro similarity in [0, 1].
fn jaro(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }

    let s1: Vec<char> = a.chars().collect();
    let s2: Vec<char> = b.chars().collect();
    let len1 = s1.len();
    let len2 = s2.len();

    if len1 == 0 || len2 == 0 {
        return 0.0;
    }

    let match_distance = (len1.max(len2) / 2).saturating_sub(1);
    let mut s1_matches = vec![false; len1];
    let mut s2_matches = vec![false; len2];
    let mut matches = 0usize;

    for i in 0..len1 {
        let start = i.saturating_sub(match_distance);
        let end = (i + match_distance + 1).min(len2);

        for j in start..end {
            if s2_matches[j] || s1[i] != s2[j] {
                continue;
            }
            s1_matches[i] = true;
            s2_matches[j] = true;
            matches += 1;
            break;
        }
    }

    if matches == 0 {
        return 0.0;
    }

    let mut transpositions = 0usize;
    let mut k = 0usize;
    for i in 0..len1 {
        if !s1_matches[i] {
            continue;
        }
        while !s2_matches[k] {
            k += 1;
        }
        if s1[i] != s2[k] {
            transpositions += 1;
        }
        k += 1;
    }

    let m = matches as f64;
    (m / len1 as f64 + m / len2 as f64 + (m - transpositions as f64 / 2.0) / m) / 3.0
}

/// Jaro-Winkler similarity: Jaro plus the standard prefix bonus
/// (scaling factor 0.1, common prefix capped at 4 characters).
pub fn jaro_winkler(a: &str, b: &str) -> f64 {
    let jaro_score = jaro(a, b);
    if jaro_score <= 0.0 {
        return 0.0;
    }

    let prefix = a
        .chars()
        .zip(b.chars())
        .take_while(|(x, y)| x == y)
        .take(4)
        .count();

    jaro_score + prefix as f64 * 0.1 * (1.0 - jaro_score)
}

// =============================================================================
// HOMOGLYPH NORMALIZATION
// =============================================================================

// Confusable pairs: o/0, i/1/l, a/@, s/5, e/3, g/9, b/6.
// Each group collapses to a single canonical character so normalization is
// idempotent and order-independent (per-character mapping, never iterative
// find-replace over the whole string).
fn canonical_char(ch: char) -> char {
    match ch {
        'o' | '0' => '0',
        'i' | '1' | 'l' => '1',
        'a' | '@' => '@',
        's' | '5' => '5',
        'e' | '3' => '3',
        'g' | '9' => '9',
        'b' | '6' => '6',
        other => other,
    }
}

/// Map every character through the confusable table, producing the
/// canonical form used for look-alike comparison.
pub fn homoglyph_canonical(s: &str) -> String {
    s.chars().map(canonical_char).collect()
}

/// True when two strings differ as written but collapse to the same
/// canonical form under the confusable-character table.
pub fn homoglyph_substitution_match(a: &str, b: &str) -> bool {
    a != b && homoglyph_canonical(a) == homoglyph_canonical(b)
}

// =============================================================================
// TESTS
// =============================================================================
