//! Reality.eth question text encoding.
//!
//! Reality.eth stores a question as a single string: the JSON-escaped title, optionally the
//! JSON outcome list, the category and the language, joined by `U+241F` (SYMBOL FOR UNIT
//! SEPARATOR). The templates referenced by the factory expect exactly this layout.

use strum_macros::Display;

/// Delimiter between the fields of an encoded question.
pub const DELIMITER: char = '\u{241f}';

/// Language tag appended to every question.
pub const DEFAULT_LANGUAGE: &str = "en_US";

/// Reality.eth question templates.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
#[strum(serialize_all = "kebab-case")]
pub enum QuestionType {
    Bool,
    Uint,
    SingleSelect,
    MultipleSelect,
    Datetime,
}

impl QuestionType {
    const fn has_outcomes(self) -> bool {
        matches!(self, Self::SingleSelect | Self::MultipleSelect)
    }
}

/// Encodes a question for Reality.eth.
///
/// `outcomes` is only written for select questions; it is ignored otherwise.
///
/// # Example
///
/// ```
/// use seer_client_sdk::markets::reality::{QuestionType, encode_question_text};
///
/// let text = encode_question_text(
///     QuestionType::SingleSelect,
///     "Who wins?",
///     &["Yes".to_owned(), "No".to_owned()],
///     "misc",
///     "en_US",
/// );
/// assert_eq!(text, "Who wins?\u{241f}\"Yes\",\"No\"\u{241f}misc\u{241f}en_US");
/// ```
#[must_use]
pub fn encode_question_text(
    question_type: QuestionType,
    title: &str,
    outcomes: &[String],
    category: &str,
    language: &str,
) -> String {
    let mut text = json_inner(&serde_json::Value::from(title), '"', '"');

    if question_type.has_outcomes() {
        let outcomes = serde_json::Value::from(outcomes.to_vec());
        text.push(DELIMITER);
        text.push_str(&json_inner(&outcomes, '[', ']'));
    }

    let language = if language.is_empty() {
        DEFAULT_LANGUAGE
    } else {
        language
    };

    text.push(DELIMITER);
    text.push_str(category);
    text.push(DELIMITER);
    text.push_str(language);

    text
}

/// Serializes `value` as compact JSON and drops the enclosing `open`/`close` characters.
fn json_inner(value: &serde_json::Value, open: char, close: char) -> String {
    let json = value.to_string();
    let inner = json.strip_prefix(open).unwrap_or(json.as_str());
    inner.strip_suffix(close).unwrap_or(inner).to_owned()
}
