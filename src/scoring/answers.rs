use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A raw questionnaire answer as entered by the user.
///
/// Untagged so that `true`, `4` and `"fixed"` in JSON or YAML map directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAnswer {
    Flag(bool),
    Number(f64),
    Text(String),
}

/// Question id -> raw answer.
pub type RawAnswerMap = BTreeMap<String, RawAnswer>;

/// Question id -> score in [0, 1].
pub type NormalizedAnswerMap = BTreeMap<String, f64>;

impl RawAnswer {
    /// Read a command-line value: `true`/`false`, a number, or free text.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        match value {
            "true" => RawAnswer::Flag(true),
            "false" => RawAnswer::Flag(false),
            _ => match value.parse::<f64>() {
                Ok(n) if n.is_finite() => RawAnswer::Number(n),
                _ => RawAnswer::Text(value.to_string()),
            },
        }
    }

    /// Numeric reading used by rating questions. Text is parsed after
    /// trimming and empty text reads as 0. Flags are never ratings.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RawAnswer::Number(n) => Some(*n),
            RawAnswer::Text(text) => {
                let text = text.trim();
                if text.is_empty() {
                    Some(0.0)
                } else {
                    text.parse::<f64>().ok()
                }
            }
            RawAnswer::Flag(_) => None,
        }
    }

    pub fn is_flag(&self, expected: bool) -> bool {
        matches!(self, RawAnswer::Flag(b) if *b == expected)
    }

    pub fn is_text(&self, expected: &str) -> bool {
        matches!(self, RawAnswer::Text(t) if t == expected)
    }
}

/// Parse an `ID=VALUE` pair from the command line.
pub fn parse_answer_arg(arg: &str) -> Result<(String, RawAnswer)> {
    let Some((id, value)) = arg.split_once('=') else {
        bail!("Expected ID=VALUE, got '{}'", arg);
    };
    let id = id.trim().to_uppercase();
    if id.is_empty() {
        bail!("Missing question id in '{}'", arg);
    }
    Ok((id, RawAnswer::parse(value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_values() {
        assert_eq!(RawAnswer::parse("true"), RawAnswer::Flag(true));
        assert_eq!(RawAnswer::parse(" false "), RawAnswer::Flag(false));
        assert_eq!(RawAnswer::parse("4"), RawAnswer::Number(4.0));
        assert_eq!(RawAnswer::parse("fixed"), RawAnswer::Text("fixed".to_string()));
        assert_eq!(RawAnswer::parse("NaN"), RawAnswer::Text("NaN".to_string()));
    }

    #[test]
    fn test_as_number() {
        assert_eq!(RawAnswer::Number(3.0).as_number(), Some(3.0));
        assert_eq!(RawAnswer::Text(" 2 ".to_string()).as_number(), Some(2.0));
        assert_eq!(RawAnswer::Text(String::new()).as_number(), Some(0.0));
        assert_eq!(RawAnswer::Text("abc".to_string()).as_number(), None);
        assert_eq!(RawAnswer::Flag(true).as_number(), None);
    }

    #[test]
    fn test_parse_answer_arg() {
        let (id, answer) = parse_answer_arg("e2=5").unwrap();
        assert_eq!(id, "E2");
        assert_eq!(answer, RawAnswer::Number(5.0));

        assert!(parse_answer_arg("E2").is_err());
        assert!(parse_answer_arg("=5").is_err());
    }

    #[test]
    fn test_untagged_json() {
        let map: RawAnswerMap =
            serde_json::from_str(r#"{"A1": true, "A2": 4, "D3": "fixed"}"#).unwrap();
        assert_eq!(map["A1"], RawAnswer::Flag(true));
        assert_eq!(map["A2"], RawAnswer::Number(4.0));
        assert_eq!(map["D3"], RawAnswer::Text("fixed".to_string()));
    }

    #[test]
    fn test_untagged_yaml() {
        let yaml = "A1: false\nE2: 3\nC2: short\n";
        let map: RawAnswerMap = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(map["A1"], RawAnswer::Flag(false));
        assert_eq!(map["E2"], RawAnswer::Number(3.0));
        assert_eq!(map["C2"], RawAnswer::Text("short".to_string()));
    }
}
