/*
[INPUT]:  JSON values produced by task operations
[OUTPUT]: Text rendered for the terminal
[POS]:    Presentation layer - stdout formatting
[UPDATE]: When adding output formats
*/

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

pub fn render(value: &Value, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(value).context("render json"),
        OutputFormat::Yaml => serde_yaml::to_string(value)
            .map(|text| text.trim_end().to_string())
            .context("render yaml"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_formats() {
        let value = json!({"flight_id": "F1"});
        assert_eq!(
            render(&value, OutputFormat::Json).expect("json"),
            "{\n  \"flight_id\": \"F1\"\n}"
        );
        assert_eq!(render(&value, OutputFormat::Yaml).expect("yaml"), "flight_id: F1");
    }
}
