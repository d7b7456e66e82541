use serde::{Deserialize, Serialize};

/// Text format of a config source.
pub trait ConfigSerializer<TConfig> {
    fn format_name(&self) -> &'static str;
    fn serialize(&self, config: &TConfig) -> Result<String, String>;
    fn deserialize(&self, content: &str) -> Result<TConfig, String>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct YamlConfigSerializer;

impl<TConfig> ConfigSerializer<TConfig> for YamlConfigSerializer
where
    TConfig: for<'de> Deserialize<'de> + Serialize,
{
    fn format_name(&self) -> &'static str {
        "yaml"
    }

    fn serialize(&self, config: &TConfig) -> Result<String, String> {
        serde_yaml_ng::to_string(config).map_err(|e| e.to_string())
    }

    fn deserialize(&self, content: &str) -> Result<TConfig, String> {
        // An empty file means "all defaults", serde_yaml_ng would call it null.
        let content = if content.trim().is_empty() { "{}" } else { content };
        serde_yaml_ng::from_str(content).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_empty_document_is_an_empty_map() {
        let parsed: BTreeMap<String, u32> = YamlConfigSerializer.deserialize("  \n").unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_errors_carry_the_parser_message() {
        let result: Result<BTreeMap<String, u32>, String> = YamlConfigSerializer.deserialize("a: [1");
        assert!(result.is_err());
    }
}
