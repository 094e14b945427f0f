//! Deterministic structure fallback for when segmentation is unavailable.
//!
//! Splits text on paragraph breaks first, then sentence boundaries, merging
//! fragments shorter than the configured minimum. Output labels are positional
//! (`component_1`, `component_2`, ...), so fallback decompositions and
//! fallback mappings line up by position rather than meaning.

use crate::document::StructureMapping;

/// Splits `text` into at most `max_components` labeled components.
///
/// Always yields at least one component; empty input maps to a single empty
/// `component_1`. Overflow pieces beyond the cap are folded into the last
/// component.
pub fn fallback_components(
    text: &str,
    max_components: usize,
    min_content_len: usize,
) -> StructureMapping {
    let cap = max_components.max(1);
    let mut pieces = split_pieces(text, min_content_len);

    if pieces.is_empty() {
        pieces.push(String::new());
    }

    if pieces.len() > cap {
        let overflow = pieces.split_off(cap);
        if let Some(last) = pieces.last_mut() {
            for piece in overflow {
                last.push(' ');
                last.push_str(&piece);
            }
        }
    }

    pieces
        .into_iter()
        .enumerate()
        .map(|(i, content)| (format!("component_{}", i + 1), content))
        .collect()
}

/// Distributes `text` across the key's labels by position.
///
/// The text is split into `labels.len()` pieces and assigned to labels in
/// order; labels beyond the available pieces map to empty strings.
pub fn fallback_mapping(
    text: &str,
    labels: &[String],
    min_content_len: usize,
) -> StructureMapping {
    if labels.is_empty() {
        return StructureMapping::new();
    }

    let components = fallback_components(text, labels.len(), min_content_len);
    let mut pieces = components.into_iter().map(|(_, content)| content);

    labels
        .iter()
        .map(|label| (label.clone(), pieces.next().unwrap_or_default()))
        .collect()
}

fn split_pieces(text: &str, min_content_len: usize) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let paragraphs: Vec<String> = trimmed
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();

    let pieces = if paragraphs.len() > 1 {
        paragraphs
    } else {
        split_sentences(trimmed)
    };

    merge_short(pieces, min_content_len)
}

fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        current.push(ch);
        if matches!(ch, '.' | '!' | '?') && chars.peek().is_none_or(|next| next.is_whitespace()) {
            let sentence = current.trim().to_string();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            current.clear();
        }
    }

    let tail = current.trim().to_string();
    if !tail.is_empty() {
        sentences.push(tail);
    }

    // One long unpunctuated clause chain still splits on semicolons.
    if sentences.len() == 1 && sentences[0].contains("; ") {
        return sentences[0]
            .split("; ")
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
    }

    sentences
}

fn merge_short(pieces: Vec<String>, min_content_len: usize) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(pieces.len());

    for piece in pieces {
        let short = piece.chars().count() < min_content_len;
        match merged.last_mut() {
            Some(last) if short => {
                last.push(' ');
                last.push_str(&piece);
            }
            _ => merged.push(piece),
        }
    }

    // A short leading piece has no predecessor, so it folds forward instead.
    if merged.len() > 1 && merged[0].chars().count() < min_content_len {
        let head = merged.remove(0);
        merged[0] = format!("{} {}", head, merged[0]);
    }

    merged
}
