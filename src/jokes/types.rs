use crate::error::JokeError;
use serde_json::Value;

/// A single joke. Immutable once constructed; list updates build new
/// records rather than mutating existing ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Joke {
  pub setup: String,
  pub punchline: String,
}

impl Joke {
  /// Parse a joke from its interchange shape: a JSON object with string
  /// `setup` and `punchline` fields. Extra fields are ignored. The shape is
  /// checked explicitly; the API and the cache both get validated here.
  pub fn from_interchange(value: &Value) -> Result<Self, JokeError> {
    let setup = string_field(value, "setup")?;
    let punchline = string_field(value, "punchline")?;
    Ok(Self { setup, punchline })
  }

  /// The interchange shape `{"setup", "punchline"}`. Never fails.
  pub fn to_interchange(&self) -> Value {
    serde_json::json!({
      "setup": self.setup,
      "punchline": self.punchline,
    })
  }

  /// Parse one cache entry: a JSON object serialized into a string.
  pub fn from_cache_entry(entry: &str) -> Result<Self, JokeError> {
    let value: Value =
      serde_json::from_str(entry).map_err(|e| JokeError::MalformedRecord(e.to_string()))?;
    Self::from_interchange(&value)
  }

  /// Serialize into one cache entry string.
  pub fn to_cache_entry(&self) -> String {
    self.to_interchange().to_string()
  }
}

fn string_field(value: &Value, key: &str) -> Result<String, JokeError> {
  match value.get(key) {
    Some(Value::String(s)) => Ok(s.clone()),
    Some(_) => Err(JokeError::MalformedRecord(format!(
      "field '{}' is not a string",
      key
    ))),
    None => Err(JokeError::MalformedRecord(format!(
      "missing field '{}'",
      key
    ))),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_interchange_round_trip() {
    let joke = Joke {
      setup: "Why?".to_string(),
      punchline: "Because.".to_string(),
    };
    let parsed = Joke::from_interchange(&joke.to_interchange()).unwrap();
    assert_eq!(parsed, joke);
  }

  #[test]
  fn test_extra_fields_ignored() {
    let value = json!({
      "id": 42,
      "type": "general",
      "setup": "What do you call a fish with no eyes?",
      "punchline": "A fsh.",
    });
    let joke = Joke::from_interchange(&value).unwrap();
    assert_eq!(joke.setup, "What do you call a fish with no eyes?");
    assert_eq!(joke.punchline, "A fsh.");
  }

  #[test]
  fn test_missing_field_rejected() {
    let value = json!({ "setup": "Why?" });
    let err = Joke::from_interchange(&value).unwrap_err();
    assert!(matches!(err, JokeError::MalformedRecord(_)));
  }

  #[test]
  fn test_non_string_field_rejected() {
    let value = json!({ "setup": "Why?", "punchline": 7 });
    let err = Joke::from_interchange(&value).unwrap_err();
    assert!(matches!(err, JokeError::MalformedRecord(_)));
  }

  #[test]
  fn test_cache_entry_round_trip() {
    let joke = Joke {
      setup: "Knock knock.".to_string(),
      punchline: "Who's there?".to_string(),
    };
    let parsed = Joke::from_cache_entry(&joke.to_cache_entry()).unwrap();
    assert_eq!(parsed, joke);
  }

  #[test]
  fn test_garbage_cache_entry_rejected() {
    let err = Joke::from_cache_entry("not json at all").unwrap_err();
    assert!(matches!(err, JokeError::MalformedRecord(_)));
  }
}
