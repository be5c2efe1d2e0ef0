//! Structured payload decoding strategies.
//!
//! Agents wrap their verdict in many ways: a ` ```json ` block, an unlabelled
//! fence, a bare object in prose, or a ` ```python ` snippet that builds a
//! dict and dumps it. Each convention is a separate [`PayloadStrategy`]; the
//! extractor walks [`default_strategies`] in order, and every candidate each
//! strategy yields, keeping the first payload that carries a full stage triple.
//!
//! | Strategy | Accepts |
//! |----------|---------|
//! | [`PythonBlockStrategy`] | ` ```python ` blocks, `json.dumps({...})`, single-quoted dicts |
//! | [`FencedBlockStrategy`] | ` ```json `, ` ```JSON `, ` ``` ` and other fence markers |
//! | [`BareObjectStrategy`] | brace-balanced `{...}` objects in prose |
//! | [`WholeTextStrategy`] | the whole message, fences stripped |

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static PY_TRUE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bTrue\b").unwrap());
static PY_FALSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bFalse\b").unwrap());
static PY_NONE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bNone\b").unwrap());
static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([}\]])").unwrap());

const FENCE: &str = "```";

/// A single way of locating and decoding a JSON object in message text.
pub trait PayloadStrategy: Send + Sync {
    /// Short identifier, recorded on the proposals this strategy produces.
    fn name(&self) -> &'static str;

    /// Every JSON object this strategy can decode from `text`, in text order.
    ///
    /// Empty when the strategy does not apply or nothing parses. Never
    /// panics on malformed input.
    fn candidates(&self, text: &str) -> Vec<Value>;

    /// The first candidate, if any.
    fn decode(&self, text: &str) -> Option<Value> {
        self.candidates(text).into_iter().next()
    }
}

/// The built-in strategies, in priority order.
pub fn default_strategies() -> Vec<Box<dyn PayloadStrategy>> {
    vec![
        Box::new(PythonBlockStrategy),
        Box::new(FencedBlockStrategy),
        Box::new(BareObjectStrategy),
        Box::new(WholeTextStrategy),
    ]
}

/// Decode the object built inside a ` ```python ` block.
///
/// Per block, the `json.dumps({...})` argument comes first, then every dict
/// literal in the block. Single quotes and Python literals are normalized
/// before parsing; anything after a literal (e.g. `print(result)`) is ignored.
pub struct PythonBlockStrategy;

impl PayloadStrategy for PythonBlockStrategy {
    fn name(&self) -> &'static str {
        "python_block"
    }

    fn candidates(&self, text: &str) -> Vec<Value> {
        fenced_blocks(text)
            .into_iter()
            .filter(|block| block.language.eq_ignore_ascii_case("python"))
            .flat_map(|block| {
                let dumped = block
                    .body
                    .find("json.dumps(")
                    .and_then(|pos| balanced_object(&block.body[pos..]));
                dumped.into_iter().chain(balanced_objects(block.body))
            })
            .filter_map(|literal| {
                parse_object(literal).or_else(|| parse_object(&normalize_python_literal(literal)))
            })
            .collect()
    }
}

/// Decode every fenced block whose body is a JSON object.
///
/// The fence language marker (`json`, `JSON`, `jsonc`, none, ...) is ignored.
pub struct FencedBlockStrategy;

impl PayloadStrategy for FencedBlockStrategy {
    fn name(&self) -> &'static str {
        "fenced_block"
    }

    fn candidates(&self, text: &str) -> Vec<Value> {
        fenced_blocks(text)
            .into_iter()
            .filter(|block| !block.language.eq_ignore_ascii_case("python"))
            .filter_map(|block| parse_object(block.body.trim()))
            .collect()
    }
}

/// Decode every brace-balanced object literal anywhere in the text.
pub struct BareObjectStrategy;

impl PayloadStrategy for BareObjectStrategy {
    fn name(&self) -> &'static str {
        "bare_object"
    }

    fn candidates(&self, text: &str) -> Vec<Value> {
        balanced_objects(text)
            .into_iter()
            .filter_map(parse_object)
            .collect()
    }
}

/// Treat the whole message as the payload, with surrounding fences stripped.
pub struct WholeTextStrategy;

impl PayloadStrategy for WholeTextStrategy {
    fn name(&self) -> &'static str {
        "whole_text"
    }

    fn candidates(&self, text: &str) -> Vec<Value> {
        let mut body = text.trim();
        if let Some(stripped) = body.strip_prefix(FENCE) {
            body = stripped.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
        }
        body = body.strip_suffix(FENCE).unwrap_or(body);
        parse_object(body.trim()).into_iter().collect()
    }
}

/// A fenced code block: language marker plus body.
#[derive(Debug, PartialEq)]
struct FencedBlock<'a> {
    language: &'a str,
    body: &'a str,
}

/// Split text into fenced blocks. An unterminated fence runs to the end.
fn fenced_blocks(text: &str) -> Vec<FencedBlock<'_>> {
    let mut blocks = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find(FENCE) {
        let after_open = &rest[open + FENCE.len()..];
        let first_line_end = after_open.find('\n').unwrap_or(after_open.len());
        let marker = after_open[..first_line_end].trim();

        // A bare word on the fence line is a language marker; anything else
        // is already content (e.g. ```{"T": 1}```).
        let (language, body_start) =
            if marker.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
                (marker, first_line_end)
            } else {
                ("", 0)
            };

        let after_marker = &after_open[body_start..];
        match after_marker.find(FENCE) {
            Some(close) => {
                blocks.push(FencedBlock {
                    language,
                    body: &after_marker[..close],
                });
                rest = &after_marker[close + FENCE.len()..];
            }
            None => {
                blocks.push(FencedBlock {
                    language,
                    body: after_marker,
                });
                break;
            }
        }
    }

    blocks
}

/// Return the slice from the first `{` to its matching `}`.
///
/// Braces inside single- or double-quoted strings are skipped.
fn balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '"' | '\'' => quote = Some(c),
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Every top-level balanced object in `text`, left to right.
///
/// An object that parses is skipped as a whole; an unparsable `{` only
/// advances by one character so objects nested in it are still found.
fn balanced_objects(text: &str) -> Vec<&str> {
    let mut found = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find('{') {
        let candidate = &rest[start..];
        match balanced_object(candidate) {
            Some(literal) if parse_object(literal).is_some() => {
                found.push(literal);
                rest = &candidate[literal.len()..];
            }
            Some(literal) => {
                found.push(literal);
                rest = &candidate[1..];
            }
            None => rest = &candidate[1..],
        }
    }
    found
}

/// Convert a Python dict literal into JSON text.
fn normalize_python_literal(literal: &str) -> String {
    let swapped: String = literal
        .chars()
        .map(|c| match c {
            '\'' => '"',
            other => other,
        })
        .collect();
    let swapped = PY_TRUE.replace_all(&swapped, "true");
    let swapped = PY_FALSE.replace_all(&swapped, "false");
    let swapped = PY_NONE.replace_all(&swapped, "null");
    TRAILING_COMMA.replace_all(&swapped, "$1").into_owned()
}

/// Strictly parse `text`, accepting only JSON objects.
fn parse_object(text: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(text) {
        Ok(value @ Value::Object(_)) => Some(value),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_json_block() {
        let text = "My assessment:\n```json\n{\"T\": 2, \"N\": 1, \"M\": 0}\n```\nThanks.";
        let value = FencedBlockStrategy.decode(text).unwrap();
        assert_eq!(value["T"], 2);
    }

    #[test]
    fn test_fenced_uppercase_and_unlabelled() {
        let upper = "```JSON\n{\"T\": 1}\n```";
        assert_eq!(FencedBlockStrategy.decode(upper).unwrap()["T"], 1);

        let plain = "```\n{\"N\": 3}\n```";
        assert_eq!(FencedBlockStrategy.decode(plain).unwrap()["N"], 3);

        let inline = "```{\"M\": 1}```";
        assert_eq!(FencedBlockStrategy.decode(inline).unwrap()["M"], 1);
    }

    #[test]
    fn test_fenced_skips_non_json_block() {
        let text = "```text\nnot json\n```\n```json\n{\"T\": 4}\n```";
        assert_eq!(FencedBlockStrategy.decode(text).unwrap()["T"], 4);
    }

    #[test]
    fn test_fenced_yields_every_object_block() {
        let text = "```json\n{\"top_k_specialists\": []}\n```\n```json\n{\"T\": 2}\n```";
        let candidates = FencedBlockStrategy.candidates(text);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[1]["T"], 2);
    }

    #[test]
    fn test_bare_objects_in_order_without_nested_duplicates() {
        let text = r#"{"a": {"b": 1}} and {"T": 3}"#;
        let candidates = BareObjectStrategy.candidates(text);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0]["a"]["b"], 1);
        assert_eq!(candidates[1]["T"], 3);
    }

    #[test]
    fn test_python_json_dumps() {
        let text = "```python\nimport json\nprint(json.dumps({\"T\": 3, \"N\": 2, \"M\": 1}))\n```";
        let value = PythonBlockStrategy.decode(text).unwrap();
        assert_eq!(value["N"], 2);
    }

    #[test]
    fn test_python_single_quoted_dict_with_trailing_expression() {
        let text = "```python\nresult = {'T': 2, 'N': 0, 'M': 0, 'final': True,}\nresult\n```";
        let value = PythonBlockStrategy.decode(text).unwrap();
        assert_eq!(value["T"], 2);
        assert_eq!(value["final"], true);
    }

    #[test]
    fn test_python_strategy_ignores_other_fences() {
        assert!(PythonBlockStrategy.decode("```json\n{\"T\": 1}\n```").is_none());
    }

    #[test]
    fn test_bare_object_in_prose() {
        let text = "I agree with {the team}. Final: {\"T\": 1, \"N\": 0, \"M\": 0} end";
        let value = BareObjectStrategy.decode(text).unwrap();
        assert_eq!(value["T"], 1);
    }

    #[test]
    fn test_bare_object_nested() {
        let text = r#"{"T": 2, "N": 1, "M": 0, "Confidence": {"T": "high"}}"#;
        let value = BareObjectStrategy.decode(text).unwrap();
        assert_eq!(value["Confidence"]["T"], "high");
    }

    #[test]
    fn test_whole_text_strips_fences() {
        let text = "```json\n{\"T\": 0}\n```";
        assert_eq!(WholeTextStrategy.decode(text).unwrap()["T"], 0);
        assert!(WholeTextStrategy.decode("just words").is_none());
    }

    #[test]
    fn test_malformed_payload_is_none_everywhere() {
        let text = "```json\n{\"T\": 2, \"N\": \n```";
        for strategy in default_strategies() {
            assert!(strategy.decode(text).is_none(), "{} decoded", strategy.name());
        }
    }

    #[test]
    fn test_balanced_object_ignores_braces_in_strings() {
        let text = r#"{"Rationale": "see {note}", "T": 1} trailing }"#;
        assert_eq!(
            balanced_object(text),
            Some(r#"{"Rationale": "see {note}", "T": 1}"#)
        );
    }
}
