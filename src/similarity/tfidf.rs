use std::collections::HashMap;

/// TF-IDF cosine similarity between exactly two texts.
///
/// The vocabulary is built from the pair alone: raw term counts weighted by
/// smoothed inverse document frequency (`ln((1 + n) / (1 + df)) + 1` with
/// `n = 2`), l2-normalized, then dotted. A text with no tokens scores 0.
pub fn pair_similarity(a: &str, b: &str) -> f32 {
    let counts_a = term_counts(a);
    let counts_b = term_counts(b);

    if counts_a.is_empty() || counts_b.is_empty() {
        return 0.0;
    }

    let idf = |df: f64| ((1.0 + 2.0) / (1.0 + df)).ln() + 1.0;

    let mut dot = 0.0f64;
    let mut norm_a_sq = 0.0f64;
    let mut norm_b_sq = 0.0f64;

    for (term, &tf_a) in &counts_a {
        let tf_b = counts_b.get(term).copied().unwrap_or(0);
        let weight = idf(if tf_b > 0 { 2.0 } else { 1.0 });

        let wa = tf_a as f64 * weight;
        norm_a_sq += wa * wa;

        if tf_b > 0 {
            let wb = tf_b as f64 * weight;
            dot += wa * wb;
            norm_b_sq += wb * wb;
        }
    }

    for (term, &tf_b) in &counts_b {
        if !counts_a.contains_key(term) {
            let wb = tf_b as f64 * idf(1.0);
            norm_b_sq += wb * wb;
        }
    }

    let norm_a = norm_a_sq.sqrt();
    let norm_b = norm_b_sq.sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let score = (dot / (norm_a * norm_b)) as f32;
    if !score.is_finite() {
        return 0.0;
    }

    score.clamp(0.0, 1.0)
}

/// Lowercased term counts; tokens are runs of two or more word characters.
fn term_counts(text: &str) -> HashMap<String, usize> {
    let mut counts = HashMap::new();

    for token in tokenize(text) {
        *counts.entry(token).or_insert(0usize) += 1;
    }

    counts
}

fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        if ch.is_alphanumeric() || ch == '_' {
            current.extend(ch.to_lowercase());
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    // Single-character tokens carry no signal and are dropped.
    tokens.retain(|t| t.chars().count() >= 2);
    tokens
}
