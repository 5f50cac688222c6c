//! Indicator definitions and calculators.
//!
//! - `IndicatorSpec`: closed set of calculator kinds, each with its own
//!   parameter record
//! - `OutputNames`: where a definition's results land (one name, or a
//!   component mapping for MACD)
//! - `IndicatorDefinition`: spec + output naming + optional fill policy
//!
//! Calculators take bare `Option<f64>` slices sharing one date index and
//! return output of the same length, absent before warm-up.

pub mod bollinger;
pub mod diosc;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod williams_r;

use crate::domain::align::FillPolicy;
use crate::domain::error::IndigridError;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmaParams {
    pub length: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RsiParams {
    pub period: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacdParams {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BbpParams {
    pub length: usize,
    pub mult: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WilliamsRParams {
    pub length: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DioscParams {
    pub length: usize,
}

impl Default for EmaParams {
    fn default() -> Self {
        Self {
            length: ema::DEFAULT_LENGTH,
        }
    }
}

impl Default for RsiParams {
    fn default() -> Self {
        Self {
            period: rsi::DEFAULT_PERIOD,
        }
    }
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast: macd::DEFAULT_FAST,
            slow: macd::DEFAULT_SLOW,
            signal: macd::DEFAULT_SIGNAL,
        }
    }
}

impl Default for BbpParams {
    fn default() -> Self {
        Self {
            length: bollinger::DEFAULT_LENGTH,
            mult: bollinger::DEFAULT_MULT,
        }
    }
}

impl Default for WilliamsRParams {
    fn default() -> Self {
        Self {
            length: williams_r::DEFAULT_LENGTH,
        }
    }
}

impl Default for DioscParams {
    fn default() -> Self {
        Self {
            length: diosc::DEFAULT_LENGTH,
        }
    }
}

/// One calculator kind with its parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndicatorSpec {
    Ema(EmaParams),
    Rsi(RsiParams),
    Macd(MacdParams),
    BollingerPercentB(BbpParams),
    WilliamsR(WilliamsRParams),
    DiOscillator(DioscParams),
}

impl IndicatorSpec {
    /// The kind name used in definition documents.
    pub fn kind(&self) -> &'static str {
        match self {
            IndicatorSpec::Ema(_) => "ema",
            IndicatorSpec::Rsi(_) => "rsi",
            IndicatorSpec::Macd(_) => "macd",
            IndicatorSpec::BollingerPercentB(_) => "bbp_manual",
            IndicatorSpec::WilliamsR(_) => "williamsr",
            IndicatorSpec::DiOscillator(_) => "diosc",
        }
    }
}

impl fmt::Display for IndicatorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorSpec::Ema(p) => write!(f, "EMA({})", p.length),
            IndicatorSpec::Rsi(p) => write!(f, "RSI({})", p.period),
            IndicatorSpec::Macd(p) => write!(f, "MACD({},{},{})", p.fast, p.slow, p.signal),
            IndicatorSpec::BollingerPercentB(p) => write!(f, "BBP({},{})", p.length, p.mult),
            IndicatorSpec::WilliamsR(p) => write!(f, "WILLIAMSR({})", p.length),
            IndicatorSpec::DiOscillator(p) => write!(f, "DIOSC({})", p.length),
        }
    }
}

/// Named sub-outputs of the MACD calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MacdComponent {
    Line,
    Signal,
    Histogram,
}

impl MacdComponent {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "MACD" => Some(MacdComponent::Line),
            "SIGNAL" => Some(MacdComponent::Signal),
            "HIST" => Some(MacdComponent::Histogram),
            _ => None,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            MacdComponent::Line => "MACD",
            MacdComponent::Signal => "SIGNAL",
            MacdComponent::Histogram => "HIST",
        }
    }
}

/// Output naming as written in a definition document, before validation.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputSpec {
    Name(String),
    Mapping(BTreeMap<String, String>),
}

/// Validated output naming of a definition.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputNames {
    Single(String),
    Macd(Vec<(MacdComponent, String)>),
}

impl OutputNames {
    /// Every external name this definition produces, in emission order.
    pub fn names(&self) -> Vec<&str> {
        match self {
            OutputNames::Single(name) => vec![name.as_str()],
            OutputNames::Macd(mapping) => mapping.iter().map(|(_, n)| n.as_str()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorDefinition {
    pub spec: IndicatorSpec,
    pub output: OutputNames,
    /// Aligner policy for this definition's tables; `None` uses the run default.
    pub fill: Option<FillPolicy>,
}

impl IndicatorDefinition {
    /// Build a definition from the loosely typed fields of a definition
    /// document. `index` is the record's position, used in error messages.
    pub fn from_parts(
        index: usize,
        kind: &str,
        params: &BTreeMap<String, f64>,
        output: OutputSpec,
        fill: Option<FillPolicy>,
    ) -> Result<Self, IndigridError> {
        let mut reader = ParamReader::new(index, params);
        let spec = match kind {
            "ema" => IndicatorSpec::Ema(EmaParams {
                length: reader.length(&["length"], ema::DEFAULT_LENGTH)?,
            }),
            "rsi" => IndicatorSpec::Rsi(RsiParams {
                period: reader.length(&["period", "length"], rsi::DEFAULT_PERIOD)?,
            }),
            "macd" => IndicatorSpec::Macd(MacdParams {
                fast: reader.length(&["fast"], macd::DEFAULT_FAST)?,
                slow: reader.length(&["slow"], macd::DEFAULT_SLOW)?,
                signal: reader.length(&["signal"], macd::DEFAULT_SIGNAL)?,
            }),
            "bbp_manual" => IndicatorSpec::BollingerPercentB(BbpParams {
                length: reader.length(&["length"], bollinger::DEFAULT_LENGTH)?,
                mult: reader.real("mult", bollinger::DEFAULT_MULT),
            }),
            "williamsr" => IndicatorSpec::WilliamsR(WilliamsRParams {
                length: reader.length(&["length"], williams_r::DEFAULT_LENGTH)?,
            }),
            "diosc" => IndicatorSpec::DiOscillator(DioscParams {
                length: reader.length(&["length"], diosc::DEFAULT_LENGTH)?,
            }),
            other => {
                return Err(IndigridError::Definition {
                    index,
                    reason: format!("unknown kind {other:?}"),
                });
            }
        };
        reader.finish()?;

        let output = match (&spec, output) {
            (IndicatorSpec::Macd(_), OutputSpec::Mapping(mapping)) => {
                let mut components = Vec::with_capacity(mapping.len());
                for (key, name) in mapping {
                    let component =
                        MacdComponent::from_key(&key).ok_or_else(|| IndigridError::Definition {
                            index,
                            reason: format!(
                                "unknown macd output {key:?} (expected MACD, SIGNAL or HIST)"
                            ),
                        })?;
                    components.push((component, checked_name(index, name)?));
                }
                components.sort_by_key(|(c, _)| *c);
                if components.is_empty() {
                    return Err(IndigridError::Definition {
                        index,
                        reason: "macd output mapping is empty".into(),
                    });
                }
                OutputNames::Macd(components)
            }
            (IndicatorSpec::Macd(_), OutputSpec::Name(_)) => {
                return Err(IndigridError::Definition {
                    index,
                    reason: "macd output must map MACD/SIGNAL/HIST to names".into(),
                });
            }
            (_, OutputSpec::Name(name)) => OutputNames::Single(checked_name(index, name)?),
            (spec, OutputSpec::Mapping(_)) => {
                return Err(IndigridError::Definition {
                    index,
                    reason: format!("{} produces a single output; expected a name", spec.kind()),
                });
            }
        };

        Ok(Self { spec, output, fill })
    }
}

fn checked_name(index: usize, name: String) -> Result<String, IndigridError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(IndigridError::Definition {
            index,
            reason: "output name is empty".into(),
        });
    }
    // Names become file stems under the output directory.
    if trimmed.contains(['/', '\\']) || trimmed.contains("..") || trimmed == "." {
        return Err(IndigridError::Definition {
            index,
            reason: format!("output name {trimmed:?} is not a plain file name"),
        });
    }
    Ok(trimmed.to_string())
}

/// Pulls typed parameters out of a name → number map and reports any
/// names left unread.
struct ParamReader<'a> {
    index: usize,
    params: &'a BTreeMap<String, f64>,
    consumed: Vec<&'a str>,
}

impl<'a> ParamReader<'a> {
    fn new(index: usize, params: &'a BTreeMap<String, f64>) -> Self {
        Self {
            index,
            params,
            consumed: Vec::new(),
        }
    }

    fn lookup(&mut self, names: &[&str]) -> Option<f64> {
        let params = self.params;
        let (key, value) = names.iter().find_map(|n| params.get_key_value(*n))?;
        self.consumed.push(key.as_str());
        Some(*value)
    }

    /// A window length: a non-negative whole number. Zero passes here and is
    /// rejected by the calculator.
    fn length(&mut self, names: &[&str], default: usize) -> Result<usize, IndigridError> {
        match self.lookup(names) {
            None => Ok(default),
            Some(v) if v.is_finite() && v >= 0.0 && v.fract() == 0.0 => Ok(v as usize),
            Some(v) => Err(IndigridError::Definition {
                index: self.index,
                reason: format!("parameter {} must be a whole number, got {v}", names[0]),
            }),
        }
    }

    fn real(&mut self, name: &str, default: f64) -> f64 {
        self.lookup(&[name]).unwrap_or(default)
    }

    fn finish(self) -> Result<(), IndigridError> {
        match self
            .params
            .keys()
            .find(|k| !self.consumed.contains(&k.as_str()))
        {
            Some(unknown) => Err(IndigridError::Definition {
                index: self.index,
                reason: format!("unknown parameter {unknown:?}"),
            }),
            None => Ok(()),
        }
    }
}
