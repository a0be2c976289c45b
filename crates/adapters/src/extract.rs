//! Structured extraction of JSON from free-form completion text
//!
//! Text-completion services usually wrap the requested JSON in prose and
//! code fences. The contract here: strip fence markers, locate the outermost
//! matching bracket pair, attempt a parse, on failure attempt exactly one
//! pass of escape-sequence repair, then fail explicitly. No further guessing.

use roam_types::{AdapterError, AdapterResult};
use serde_json::Value;

/// Extract the first complete JSON object or array embedded in `text`
pub fn extract_json(text: &str) -> AdapterResult<Value> {
	let stripped = strip_code_fences(text);

	let candidate = outermost_json_slice(&stripped)
		.ok_or_else(|| AdapterError::malformed("no JSON object or array found in completion"))?;

	match serde_json::from_str(candidate) {
		Ok(value) => Ok(value),
		Err(first_err) => {
			// One repair pass for the invalid escapes completion models produce
			let repaired = repair_escapes(candidate);
			serde_json::from_str(&repaired).map_err(|_| {
				AdapterError::malformed(format!("completion JSON unparseable: {}", first_err))
			})
		},
	}
}

/// Remove markdown fence markers while keeping their contents
fn strip_code_fences(text: &str) -> String {
	text.replace("```json", "").replace("```", "")
}

/// Slice from the first `{` or `[` through its matching close bracket,
/// tracking string literals so brackets inside strings are ignored
fn outermost_json_slice(text: &str) -> Option<&str> {
	let bytes = text.as_bytes();
	let start = text.find(['{', '['])?;
	let open = bytes[start];
	let close = if open == b'{' { b'}' } else { b']' };

	let mut depth = 0usize;
	let mut in_string = false;
	let mut escaped = false;

	for (i, &b) in bytes.iter().enumerate().skip(start) {
		if in_string {
			if escaped {
				escaped = false;
			} else if b == b'\\' {
				escaped = true;
			} else if b == b'"' {
				in_string = false;
			}
			continue;
		}
		match b {
			b'"' => in_string = true,
			_ if b == open => depth += 1,
			_ if b == close => {
				depth -= 1;
				if depth == 0 {
					return Some(&text[start..=i]);
				}
			},
			_ => {},
		}
	}

	None
}

/// Double any backslash that does not begin a valid JSON escape sequence
fn repair_escapes(s: &str) -> String {
	let chars: Vec<char> = s.chars().collect();
	let mut result = String::with_capacity(s.len());
	let mut i = 0;

	while i < chars.len() {
		if chars[i] == '\\' && i + 1 < chars.len() {
			let next = chars[i + 1];
			match next {
				'"' | '\\' | '/' | 'b' | 'f' | 'n' | 'r' | 't' => {
					result.push(chars[i]);
					result.push(next);
					i += 2;
				},
				'u' if i + 5 < chars.len() => {
					result.extend(&chars[i..i + 6]);
					i += 6;
				},
				_ => {
					result.push_str("\\\\");
					i += 1;
				},
			}
		} else {
			result.push(chars[i]);
			i += 1;
		}
	}

	result
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_extracts_fenced_array_from_commentary() {
		let text = "Sure! Here are some options you might like:\n\
			```json\n[{\"name\": \"Option A\", \"price\": 5000}]\n```\n\
			Let me know if you need more.";
		let value = extract_json(text).unwrap();
		assert!(value.is_array());
		assert_eq!(value[0]["name"], "Option A");
	}

	#[test]
	fn test_extracts_bare_object() {
		let value = extract_json("prefix {\"a\": [1, 2, {\"b\": 3}]} suffix").unwrap();
		assert_eq!(value["a"][2]["b"], 3);
	}

	#[test]
	fn test_ignores_brackets_inside_strings() {
		let value = extract_json("{\"note\": \"closes at 5} sharp\"}").unwrap();
		assert_eq!(value["note"], "closes at 5} sharp");
	}

	#[test]
	fn test_repairs_invalid_escapes_once() {
		let value = extract_json(r#"{"path": "Tokyo\Station"}"#).unwrap();
		assert_eq!(value["path"], "Tokyo\\Station");
	}

	#[test]
	fn test_fails_explicitly_without_json() {
		let err = extract_json("I could not find any flights, sorry.").unwrap_err();
		assert!(err.to_string().contains("no JSON"));
	}

	#[test]
	fn test_fails_explicitly_on_unclosed_bracket() {
		assert!(extract_json("[{\"name\": \"truncated\"").is_err());
	}
}
