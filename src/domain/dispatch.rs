//! Indicator dispatch: runs every definition against one symbol's prices.
//!
//! A failing definition never aborts the others: its outputs are replaced by
//! all-absent series and the failure is logged.

use crate::domain::align::FillPolicy;
use crate::domain::error::IndigridError;
use crate::domain::indicator::bollinger::calculate_bbp;
use crate::domain::indicator::diosc::calculate_diosc;
use crate::domain::indicator::ema::calculate_ema;
use crate::domain::indicator::macd::calculate_macd;
use crate::domain::indicator::rsi::calculate_rsi;
use crate::domain::indicator::williams_r::calculate_williams_r;
use crate::domain::indicator::{IndicatorDefinition, IndicatorSpec, OutputNames};
use crate::domain::series::{IndicatorSeries, SymbolPrices};
use tracing::{debug, warn};

/// One output of a definition for one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedSeries {
    pub name: String,
    pub series: IndicatorSeries,
    pub fill: Option<FillPolicy>,
}

/// Compute every definition for `prices`, in definition order. When two
/// definitions share an output name, the later one wins.
pub fn compute_indicators(
    prices: &SymbolPrices,
    definitions: &[IndicatorDefinition],
) -> Vec<NamedSeries> {
    let mut outputs: Vec<NamedSeries> = Vec::new();

    for definition in definitions {
        let produced = match run_definition(prices, definition) {
            Ok(produced) => produced,
            Err(e) => {
                warn!(
                    indicator = definition.spec.kind(),
                    spec = %definition.spec,
                    symbol = %prices.symbol,
                    error = %e,
                    "indicator failed, emitting absent series"
                );
                definition
                    .output
                    .names()
                    .into_iter()
                    .map(|name| (name.to_string(), IndicatorSeries::absent(&prices.dates)))
                    .collect()
            }
        };

        for (name, series) in produced {
            let named = NamedSeries {
                name,
                series,
                fill: definition.fill,
            };
            match outputs.iter_mut().find(|o| o.name == named.name) {
                Some(existing) => {
                    debug!(output = %named.name, symbol = %prices.symbol, "output redefined");
                    *existing = named;
                }
                None => outputs.push(named),
            }
        }
    }

    outputs
}

fn run_definition(
    prices: &SymbolPrices,
    definition: &IndicatorDefinition,
) -> Result<Vec<(String, IndicatorSeries)>, IndigridError> {
    let single = |raw: Vec<Option<f64>>| -> Result<Vec<(String, IndicatorSeries)>, IndigridError> {
        match &definition.output {
            OutputNames::Single(name) => Ok(vec![(
                name.clone(),
                IndicatorSeries::from_raw(&prices.dates, &raw),
            )]),
            OutputNames::Macd(_) => Err(IndigridError::InvalidParameter {
                indicator: definition.spec.kind().to_string(),
                param: "output".into(),
                reason: "expected a single output name".into(),
            }),
        }
    };

    match &definition.spec {
        IndicatorSpec::Ema(p) => single(calculate_ema(&prices.close, p.length)?),
        IndicatorSpec::Rsi(p) => single(calculate_rsi(&prices.close, p.period)?),
        IndicatorSpec::BollingerPercentB(p) => single(calculate_bbp(&prices.close, p)?),
        IndicatorSpec::WilliamsR(p) => single(calculate_williams_r(
            &prices.high,
            &prices.low,
            &prices.close,
            p.length,
        )?),
        IndicatorSpec::DiOscillator(p) => single(calculate_diosc(
            &prices.high,
            &prices.low,
            &prices.close,
            p.length,
        )?),
        IndicatorSpec::Macd(p) => {
            let OutputNames::Macd(mapping) = &definition.output else {
                return Err(IndigridError::InvalidParameter {
                    indicator: "macd".into(),
                    param: "output".into(),
                    reason: "expected a MACD/SIGNAL/HIST mapping".into(),
                });
            };
            let result = calculate_macd(&prices.close, p)?;
            Ok(mapping
                .iter()
                .map(|(component, name)| {
                    (
                        name.clone(),
                        IndicatorSeries::from_raw(&prices.dates, result.component(*component)),
                    )
                })
                .collect())
        }
    }
}
