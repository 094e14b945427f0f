//! Segmentation reply parsing and best-effort JSON repair.
//!
//! Provider replies wander: code fences, leading prose, single quotes, bare
//! keys, trailing commas. Parsing first tries the reply as-is, then a
//! repaired rendition, before giving up with [`StructureError::ParseFailed`].

use serde::Deserialize;

use crate::document::StructureMapping;

use super::error::StructureError;

/// Parsed reference decomposition plus the labels flagged for LLM judgement.
#[derive(Debug, Clone, Default)]
pub struct Breakdown {
    pub components: StructureMapping,
    pub llm_evaluated: Vec<String>,
}

#[derive(Deserialize)]
struct BreakdownEnvelope {
    breakdown: StructureMapping,
    #[serde(default)]
    requires_llm_evaluation: Vec<String>,
}

/// Parses a decomposition reply into components plus flagged labels.
///
/// Accepts the documented envelope or a bare label-to-content object. Flags
/// are filtered down to labels present in the breakdown.
pub fn parse_breakdown(raw: &str, max_components: usize) -> Result<Breakdown, StructureError> {
    let cleaned = clean_response(raw);

    let envelope = serde_json::from_str::<BreakdownEnvelope>(cleaned)
        .or_else(|_| serde_json::from_str::<BreakdownEnvelope>(&repair_json(cleaned)))
        .or_else(|_| parse_flat_breakdown(cleaned))
        .map_err(|e| StructureError::ParseFailed {
            reason: e.to_string(),
        })?;

    let BreakdownEnvelope {
        breakdown,
        requires_llm_evaluation,
    } = envelope;

    if breakdown.is_empty() {
        return Err(StructureError::ParseFailed {
            reason: "response contained no components".to_string(),
        });
    }

    if breakdown.len() > max_components {
        return Err(StructureError::TooManyComponents {
            count: breakdown.len(),
            max: max_components,
        });
    }

    let llm_evaluated = requires_llm_evaluation
        .into_iter()
        .filter(|label| breakdown.contains_key(label))
        .collect();

    Ok(Breakdown {
        components: breakdown,
        llm_evaluated,
    })
}

fn parse_flat_breakdown(cleaned: &str) -> Result<BreakdownEnvelope, serde_json::Error> {
    let breakdown = serde_json::from_str::<StructureMapping>(cleaned)
        .or_else(|_| serde_json::from_str::<StructureMapping>(&repair_json(cleaned)))?;

    Ok(BreakdownEnvelope {
        breakdown,
        requires_llm_evaluation: Vec::new(),
    })
}

/// Parses a student mapping reply and normalizes it to the key's label set.
///
/// Labels the key does not know are dropped and missing labels map to empty
/// strings, so the result always carries the key's labels in key order. A
/// reply sharing no labels with a non-empty key is rejected.
pub fn parse_mapping(raw: &str, labels: &[String]) -> Result<StructureMapping, StructureError> {
    let cleaned = clean_response(raw);

    let parsed = serde_json::from_str::<StructureMapping>(cleaned)
        .or_else(|_| serde_json::from_str::<StructureMapping>(&repair_json(cleaned)))
        .map_err(|e| StructureError::ParseFailed {
            reason: e.to_string(),
        })?;

    if !labels.is_empty()
        && labels
            .iter()
            .all(|label| !parsed.contains_key(label.as_str()))
    {
        return Err(StructureError::ParseFailed {
            reason: "response shared no labels with the answer key".to_string(),
        });
    }

    let mapping = labels
        .iter()
        .map(|label| {
            let text = parsed.get(label.as_str()).cloned().unwrap_or_default();
            (label.clone(), text)
        })
        .collect();

    Ok(mapping)
}

/// Parses a 0-10 rating reply into a `[0, 1]` score.
///
/// The first numeric token in the reply is used, so prose like
/// "Score: 7.5 / 10" still parses.
pub fn parse_rating(raw: &str) -> Result<f32, StructureError> {
    let text = raw.trim();

    let mut token = String::new();
    for ch in text.chars() {
        if ch.is_ascii_digit() || (ch == '.' && !token.is_empty() && !token.contains('.')) {
            token.push(ch);
        } else if !token.is_empty() {
            break;
        }
    }

    let value: f32 = token.parse().map_err(|_| StructureError::ParseFailed {
        reason: format!(
            "no numeric rating in reply: {:?}",
            text.chars().take(40).collect::<String>()
        ),
    })?;

    Ok((value / 10.0).clamp(0.0, 1.0))
}

/// Strips code fences and surrounding prose, keeping the outermost JSON object.
pub fn clean_response(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(stripped) = text.strip_prefix("```json") {
        text = stripped;
    } else if let Some(stripped) = text.strip_prefix("```") {
        text = stripped;
    }
    if let Some(stripped) = text.strip_suffix("```") {
        text = stripped;
    }
    text = text.trim();

    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}

/// Best-effort repair of near-JSON: quote styles, bare keys, trailing commas.
pub fn repair_json(text: &str) -> String {
    let quoted = normalize_quotes(text);
    let keyed = quote_bare_keys(&quoted);
    strip_trailing_commas(&keyed)
}

fn normalize_quotes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_double = false;
    let mut in_single = false;
    let mut escaped = false;

    for ch in text.chars() {
        if escaped {
            out.push(ch);
            escaped = false;
            continue;
        }

        match ch {
            '\\' if in_double || in_single => {
                out.push(ch);
                escaped = true;
            }
            '"' if in_single => {
                // A literal double quote inside a single-quoted string must
                // survive the quote swap escaped.
                out.push('\\');
                out.push('"');
            }
            '"' => {
                in_double = !in_double;
                out.push('"');
            }
            '\'' if !in_double => {
                in_single = !in_single;
                out.push('"');
            }
            _ => out.push(ch),
        }
    }

    out
}

fn quote_bare_keys(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];

        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            out.push(ch);
            i += 1;
            continue;
        }

        match ch {
            '"' => {
                in_string = true;
                out.push(ch);
                i += 1;
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();

                let mut j = i;
                while j < chars.len() && chars[j].is_whitespace() {
                    j += 1;
                }

                let is_key = j < chars.len() && chars[j] == ':';
                let is_literal = matches!(word.as_str(), "true" | "false" | "null");

                if is_key && !is_literal {
                    out.push('"');
                    out.push_str(&word);
                    out.push('"');
                } else {
                    out.push_str(&word);
                }
            }
            _ => {
                out.push(ch);
                i += 1;
            }
        }
    }

    out
}

fn strip_trailing_commas(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;

    for ch in text.chars() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            out.push(ch);
            continue;
        }

        match ch {
            '"' => {
                in_string = true;
                out.push(ch);
            }
            '}' | ']' => {
                while out.chars().next_back().is_some_and(char::is_whitespace) {
                    out.pop();
                }
                if out.ends_with(',') {
                    out.pop();
                }
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }

    out
}
