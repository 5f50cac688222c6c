//! Indicator definition documents, JSON or YAML.
//!
//! Accepts either a bare list of records or a wrapper object whose
//! `indicators` (or `indikatorler`) key holds the list.

use crate::domain::align::FillPolicy;
use crate::domain::error::IndigridError;
use crate::domain::indicator::{IndicatorDefinition, OutputSpec};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionFormat {
    Json,
    Yaml,
}

impl DefinitionFormat {
    /// `.yaml` and `.yml` files are YAML, anything else is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                DefinitionFormat::Yaml
            }
            _ => DefinitionFormat::Json,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawDocument {
    List(Vec<RawDefinition>),
    Wrapped {
        #[serde(alias = "indikatorler")]
        indicators: Vec<RawDefinition>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDefinition {
    kind: String,
    #[serde(default)]
    params: BTreeMap<String, f64>,
    output: RawOutput,
    #[serde(default)]
    fill: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawOutput {
    Name(String),
    Mapping(BTreeMap<String, String>),
}

impl From<RawOutput> for OutputSpec {
    fn from(raw: RawOutput) -> Self {
        match raw {
            RawOutput::Name(name) => OutputSpec::Name(name),
            RawOutput::Mapping(mapping) => OutputSpec::Mapping(mapping),
        }
    }
}

fn unreadable(e: impl std::fmt::Display) -> IndigridError {
    IndigridError::Definition {
        index: 0,
        reason: format!("unreadable definition document: {e}"),
    }
}

/// Parse a JSON definition document.
pub fn parse_definitions(content: &str) -> Result<Vec<IndicatorDefinition>, IndigridError> {
    parse_definitions_as(content, DefinitionFormat::Json)
}

pub fn parse_definitions_as(
    content: &str,
    format: DefinitionFormat,
) -> Result<Vec<IndicatorDefinition>, IndigridError> {
    let document: RawDocument = match format {
        DefinitionFormat::Json => serde_json::from_str(content).map_err(unreadable)?,
        DefinitionFormat::Yaml => serde_yaml::from_str(content).map_err(unreadable)?,
    };
    into_definitions(document)
}

fn into_definitions(document: RawDocument) -> Result<Vec<IndicatorDefinition>, IndigridError> {
    let records = match document {
        RawDocument::List(records) | RawDocument::Wrapped { indicators: records } => records,
    };

    records
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            let fill = raw
                .fill
                .as_deref()
                .map(|s| {
                    s.parse::<FillPolicy>()
                        .map_err(|reason| IndigridError::Definition { index, reason })
                })
                .transpose()?;
            IndicatorDefinition::from_parts(
                index,
                raw.kind.trim(),
                &raw.params,
                raw.output.into(),
                fill,
            )
        })
        .collect()
}

/// Read a definition document, picking the format from the file extension.
pub fn load_definitions<P: AsRef<Path>>(path: P) -> Result<Vec<IndicatorDefinition>, IndigridError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        IndigridError::Io(std::io::Error::new(
            e.kind(),
            format!("failed to read {}: {}", path.display(), e),
        ))
    })?;
    parse_definitions_as(&content, DefinitionFormat::from_path(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::{
        BbpParams, EmaParams, IndicatorSpec, MacdComponent, MacdParams, OutputNames, RsiParams,
    };

    #[test]
    fn parses_wrapped_document() {
        let json = r#"{
            "indicators": [
                {"kind": "ema", "params": {"length": 20}, "output": "EMA20"},
                {"kind": "rsi", "params": {"period": 14}, "output": "RSI14", "fill": "forward"},
                {"kind": "macd", "output": {"MACD": "MACD_L", "HIST": "MACD_H"}}
            ]
        }"#;
        let defs = parse_definitions(json).unwrap();
        assert_eq!(defs.len(), 3);
        assert_eq!(defs[0].spec, IndicatorSpec::Ema(EmaParams { length: 20 }));
        assert_eq!(defs[0].fill, None);
        assert_eq!(defs[1].spec, IndicatorSpec::Rsi(RsiParams { period: 14 }));
        assert_eq!(defs[1].fill, Some(FillPolicy::ForwardFill));
        assert_eq!(defs[2].spec, IndicatorSpec::Macd(MacdParams::default()));
        assert_eq!(
            defs[2].output,
            OutputNames::Macd(vec![
                (MacdComponent::Line, "MACD_L".into()),
                (MacdComponent::Histogram, "MACD_H".into()),
            ])
        );
    }

    #[test]
    fn parses_bare_array() {
        let json = r#"[{"kind": "bbp_manual", "params": {"length": 20, "mult": 2}, "output": "BBP"}]"#;
        let defs = parse_definitions(json).unwrap();
        assert_eq!(
            defs[0].spec,
            IndicatorSpec::BollingerPercentB(BbpParams {
                length: 20,
                mult: 2.0
            })
        );
    }

    #[test]
    fn unknown_kind_reports_index() {
        let json = r#"[
            {"kind": "ema", "output": "E"},
            {"kind": "stoch", "output": "S"}
        ]"#;
        let err = parse_definitions(json).unwrap_err();
        assert!(matches!(err, IndigridError::Definition { index: 1, .. }));
    }

    #[test]
    fn bad_fill_is_rejected() {
        let json = r#"[{"kind": "ema", "output": "E", "fill": "sideways"}]"#;
        assert!(matches!(
            parse_definitions(json),
            Err(IndigridError::Definition { index: 0, .. })
        ));
    }

    #[test]
    fn malformed_json_is_a_definition_error() {
        assert!(matches!(
            parse_definitions("{not json"),
            Err(IndigridError::Definition { .. })
        ));
        assert!(matches!(
            parse_definitions(r#"[{"kind": "ema"}]"#),
            Err(IndigridError::Definition { .. })
        ));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        assert!(matches!(
            load_definitions("/nonexistent/indicators.json"),
            Err(IndigridError::Io(_))
        ));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("defs.json");
        std::fs::write(&path, r#"[{"kind": "williamsr", "output": "WR"}]"#).unwrap();
        let defs = load_definitions(&path).unwrap();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].output, OutputNames::Single("WR".into()));
    }

    const YAML_DOCUMENT: &str = "\
indikatorler:
  - kind: ema
    params: {length: 20}
    output: EMA20
  - kind: rsi
    params:
      length: 14
    output: RSI14
  - kind: macd
    params: {fast: 12, slow: 26, signal: 9}
    output:
      MACD: MACD
      SIGNAL: MACD_SIGNAL
      HIST: MACD_HIST
  - kind: bbp_manual
    params: {length: 20, mult: 2.5}
    output: BBP
    fill: forward
";

    #[test]
    fn parses_yaml_with_indikatorler_key() {
        let defs = parse_definitions_as(YAML_DOCUMENT, DefinitionFormat::Yaml).unwrap();
        assert_eq!(defs.len(), 4);
        assert_eq!(defs[0].spec, IndicatorSpec::Ema(EmaParams { length: 20 }));
        assert_eq!(defs[1].spec, IndicatorSpec::Rsi(RsiParams { period: 14 }));
        assert_eq!(defs[2].output.names(), vec!["MACD", "MACD_SIGNAL", "MACD_HIST"]);
        assert_eq!(
            defs[3].spec,
            IndicatorSpec::BollingerPercentB(BbpParams {
                length: 20,
                mult: 2.5
            })
        );
        assert_eq!(defs[3].fill, Some(FillPolicy::ForwardFill));
    }

    #[test]
    fn json_accepts_indikatorler_key() {
        let json = r#"{"indikatorler": [{"kind": "diosc", "output": "DI"}]}"#;
        assert_eq!(parse_definitions(json).unwrap().len(), 1);
    }

    #[test]
    fn yaml_bare_list_and_errors() {
        let defs =
            parse_definitions_as("- {kind: ema, output: E}\n", DefinitionFormat::Yaml).unwrap();
        assert_eq!(defs[0].output, OutputNames::Single("E".into()));

        assert!(matches!(
            parse_definitions_as("indikatorler: [", DefinitionFormat::Yaml),
            Err(IndigridError::Definition { .. })
        ));
        assert!(matches!(
            parse_definitions_as("- {kind: ema, output: E, colour: red}\n", DefinitionFormat::Yaml),
            Err(IndigridError::Definition { .. })
        ));
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(DefinitionFormat::from_path(Path::new("a/indicators.yaml")), DefinitionFormat::Yaml);
        assert_eq!(DefinitionFormat::from_path(Path::new("indicators.YML")), DefinitionFormat::Yaml);
        assert_eq!(DefinitionFormat::from_path(Path::new("indicators.json")), DefinitionFormat::Json);
        assert_eq!(DefinitionFormat::from_path(Path::new("indicators")), DefinitionFormat::Json);
    }

    #[test]
    fn load_reads_yaml_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("indicators.yaml");
        std::fs::write(&path, YAML_DOCUMENT).unwrap();
        let defs = load_definitions(&path).unwrap();
        assert_eq!(defs.len(), 4);
        assert_eq!(defs[1].output, OutputNames::Single("RSI14".into()));
    }
}
