//! Symbol universe of a run.
//!
//! Parses symbol lists from configuration or the command line, and falls
//! back to every symbol the price tables know.

use crate::domain::table::PriceTables;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in symbol list")]
    EmptyToken,

    #[error("duplicate symbol: {0}")]
    DuplicateSymbol(String),
}

pub fn parse_symbols(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut symbols = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        if !seen.insert(trimmed) {
            return Err(UniverseError::DuplicateSymbol(trimmed.to_string()));
        }
        symbols.push(trimmed.to_string());
    }

    Ok(symbols)
}

/// The configured symbols, or every symbol present in the price tables.
pub fn resolve_symbols(configured: Option<&[String]>, prices: &PriceTables) -> Vec<String> {
    match configured {
        Some(list) if !list.is_empty() => list.to_vec(),
        _ => prices.symbols(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::PriceTable;

    #[test]
    fn parse_symbols_trims_and_keeps_case() {
        assert_eq!(
            parse_symbols(" akbnk, GARAN ,Thyao").unwrap(),
            vec!["akbnk", "GARAN", "Thyao"]
        );
    }

    #[test]
    fn parse_symbols_single() {
        assert_eq!(parse_symbols("XU100").unwrap(), vec!["XU100"]);
    }

    #[test]
    fn parse_symbols_empty_token() {
        assert_eq!(parse_symbols("AKBNK,,GARAN"), Err(UniverseError::EmptyToken));
        assert_eq!(parse_symbols(""), Err(UniverseError::EmptyToken));
    }

    #[test]
    fn parse_symbols_duplicate() {
        assert_eq!(
            parse_symbols("AKBNK, AKBNK "),
            Err(UniverseError::DuplicateSymbol("AKBNK".into()))
        );
        // codes are case-sensitive
        assert_eq!(parse_symbols("AKBNK,akbnk").unwrap(), vec!["AKBNK", "akbnk"]);
    }

    #[test]
    fn resolve_falls_back_to_tables() {
        let prices = PriceTables {
            close: PriceTable {
                name: "close".into(),
                dates: Vec::new(),
                columns: vec![("AAA".into(), Vec::new()), ("BBB".into(), Vec::new())],
            },
            ..Default::default()
        };
        assert_eq!(resolve_symbols(None, &prices), vec!["AAA", "BBB"]);
        let empty: Vec<String> = Vec::new();
        assert_eq!(resolve_symbols(Some(empty.as_slice()), &prices), vec!["AAA", "BBB"]);

        let configured = vec!["BBB".to_string()];
        assert_eq!(resolve_symbols(Some(configured.as_slice()), &prices), vec!["BBB"]);
    }
}
