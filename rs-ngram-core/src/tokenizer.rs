//! Turning code fragments into token sequences.

use crate::model::{END_TOKEN, START_TOKEN, Token};

/// Produces an ordered token sequence from a code fragment.
pub trait Tokenizer {
	fn tokenize(&self, fragment: &str) -> Vec<Token>;
}

/// Operators lexed as a single token, longest first.
const OPERATORS: &[&str] = &[
	">>>=", "<<=", ">>=", ">>>", "...", "==", "!=", "<=", ">=", "&&", "||", "++", "--", "+=", "-=",
	"*=", "/=", "%=", "&=", "|=", "^=", "->", "::", "<<", ">>",
];

/// Lexer for C-family source code (Java, C, C#, JavaScript, ...).
///
/// Emits identifiers, numeric literals, whole string and char literals,
/// multi-character operators, and single punctuation characters.
/// Whitespace and comments are dropped.
#[derive(Debug, Clone, Copy)]
pub struct CodeTokenizer {
	/// Wrap output in `<s>` ... `</s>`.
	with_sentinels: bool,
	/// Append `</s>`; off when tokenizing a prefix to complete.
	close: bool,
}

impl Default for CodeTokenizer {
	fn default() -> Self {
		Self::new()
	}
}

impl CodeTokenizer {
	pub fn new() -> Self {
		Self { with_sentinels: true, close: true }
	}

	/// Tokenizer for an unfinished fragment: `<s>` is kept, `</s>` is not.
	pub fn for_prefix() -> Self {
		Self { with_sentinels: true, close: false }
	}

	/// Tokenizer emitting the raw tokens only.
	pub fn bare() -> Self {
		Self { with_sentinels: false, close: false }
	}

	fn lex(fragment: &str, out: &mut Vec<Token>) {
		let chars: Vec<char> = fragment.chars().collect();
		let mut i = 0;
		while i < chars.len() {
			let c = chars[i];
			if c.is_whitespace() {
				i += 1;
				continue;
			}

			// Comments
			if c == '/' && chars.get(i + 1) == Some(&'/') {
				while i < chars.len() && chars[i] != '\n' {
					i += 1;
				}
				continue;
			}
			if c == '/' && chars.get(i + 1) == Some(&'*') {
				i += 2;
				while i < chars.len() && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
					i += 1;
				}
				i = (i + 2).min(chars.len());
				continue;
			}

			let start = i;
			if c.is_alphabetic() || c == '_' || c == '$' {
				while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_' || chars[i] == '$') {
					i += 1;
				}
			} else if c.is_ascii_digit() {
				// Covers 0x1F, 1_000L, 3.14f, 1e10
				while i < chars.len()
					&& (chars[i].is_ascii_alphanumeric()
						|| chars[i] == '_'
						|| (chars[i] == '.' && chars.get(i + 1).is_some_and(char::is_ascii_digit)))
				{
					i += 1;
				}
			} else if c == '"' || c == '\'' {
				i += 1;
				while i < chars.len() && chars[i] != c {
					if chars[i] == '\\' {
						i += 1;
					}
					i += 1;
				}
				i = (i + 1).min(chars.len());
			} else {
				let rest: String = chars[i..chars.len().min(i + 4)].iter().collect();
				let len = OPERATORS
					.iter()
					.find(|op| rest.starts_with(**op))
					.map_or(1, |op| op.chars().count());
				i += len;
			}
			out.push(chars[start..i].iter().collect());
		}
	}
}

impl Tokenizer for CodeTokenizer {
	fn tokenize(&self, fragment: &str) -> Vec<Token> {
		let mut tokens = Vec::new();
		if self.with_sentinels {
			tokens.push(START_TOKEN.to_owned());
		}
		Self::lex(fragment, &mut tokens);
		if self.with_sentinels && self.close {
			tokens.push(END_TOKEN.to_owned());
		}
		tokens
	}
}
