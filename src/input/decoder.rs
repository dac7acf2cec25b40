//! Decoding of record files into typed records

use crate::error::{MatcherError, Result};
use serde::de::DeserializeOwned;

pub trait RecordDecoder {
    fn decode<T: DeserializeOwned>(&self, content: &str) -> Result<T>;

    /// A list of records: either the whole document or the array stored under `key`.
    fn decode_list<T: DeserializeOwned>(&self, content: &str, key: &str) -> Result<Vec<T>>;
}

pub struct JsonDecoder;

impl RecordDecoder for JsonDecoder {
    fn decode<T: DeserializeOwned>(&self, content: &str) -> Result<T> {
        Ok(serde_json::from_str(content)?)
    }

    fn decode_list<T: DeserializeOwned>(&self, content: &str, key: &str) -> Result<Vec<T>> {
        let value: serde_json::Value = serde_json::from_str(content)?;
        let list = match value {
            serde_json::Value::Array(_) => value,
            serde_json::Value::Object(mut map) => map.remove(key).ok_or_else(|| {
                MatcherError::InvalidInput(format!("Expected an array or a '{}' field", key))
            })?,
            _ => {
                return Err(MatcherError::InvalidInput(format!(
                    "Expected an array or a '{}' field",
                    key
                )))
            }
        };
        Ok(serde_json::from_value(list)?)
    }
}

pub struct TomlDecoder;

impl RecordDecoder for TomlDecoder {
    fn decode<T: DeserializeOwned>(&self, content: &str) -> Result<T> {
        toml::from_str(content).map_err(|e| MatcherError::InvalidInput(format!("Invalid TOML: {}", e)))
    }

    fn decode_list<T: DeserializeOwned>(&self, content: &str, key: &str) -> Result<Vec<T>> {
        let mut table: toml::Table = self.decode(content)?;
        let list = table
            .remove(key)
            .ok_or_else(|| MatcherError::InvalidInput(format!("Missing '{}' array", key)))?;
        list.try_into()
            .map_err(|e| MatcherError::InvalidInput(format!("Invalid '{}' entries: {}", key, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        name: String,
    }

    #[test]
    fn test_json_list_forms() {
        let bare: Vec<Item> = JsonDecoder.decode_list(r#"[{"name":"a"}]"#, "items").unwrap();
        let keyed: Vec<Item> = JsonDecoder
            .decode_list(r#"{"items":[{"name":"a"}]}"#, "items")
            .unwrap();
        assert_eq!(bare, keyed);

        let missing = JsonDecoder.decode_list::<Item>(r#"{"other":[]}"#, "items");
        assert!(matches!(missing, Err(MatcherError::InvalidInput(_))));
    }

    #[test]
    fn test_toml_list() {
        let content = "[[items]]\nname = \"a\"\n\n[[items]]\nname = \"b\"\n";
        let items: Vec<Item> = TomlDecoder.decode_list(content, "items").unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].name, "b");
    }
}
