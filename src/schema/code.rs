//! Data model for encoded values, their scoring units and results.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::EncodingMode;

/// Sentinel meaning "no parent". Never produced by the generator.
pub const EPOCH: &str = "EPOCH";

/// An encoded genetic value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Value(String);

impl Value {
    /// Wrap a symbol string. Alphabet checks happen when the value is scored.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The "no parent" sentinel.
    pub fn sentinel() -> Self {
        Self(EPOCH.to_string())
    }

    pub fn is_sentinel(&self) -> bool {
        self.0 == EPOCH
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in symbols.
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn chars(&self) -> std::str::Chars<'_> {
        self.0.chars()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A 2-symbol unit (pair mode).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairUnit {
    pub first: char,
    pub second: char,
    /// Both symbols identical.
    pub double: bool,
    /// The same pair occurs elsewhere in the value.
    pub repeat: bool,
    pub notable: bool,
}

impl PairUnit {
    /// Build a pair with its `double` flag set. `repeat` starts cleared.
    pub fn new(first: char, second: char) -> Self {
        let double = first == second;
        Self {
            first,
            second,
            double,
            repeat: false,
            notable: double,
        }
    }

    /// Flag as a repeat, which also makes it notable.
    pub fn mark_repeat(&mut self) {
        self.repeat = true;
        self.notable = true;
    }

    #[inline]
    pub fn key(&self) -> (char, char) {
        (self.first, self.second)
    }

    pub fn value(&self) -> String {
        [self.first, self.second].iter().collect()
    }
}

/// A maximal run of one symbol (run mode).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunUnit {
    pub symbol: char,
    pub length: usize,
    /// The symbol is prominent across the whole value.
    pub prominent: bool,
    pub notable: bool,
}

/// Indivisible scoring element of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Unit {
    Pair(PairUnit),
    Run(RunUnit),
}

impl Unit {
    pub fn notable(&self) -> bool {
        match self {
            Self::Pair(p) => p.notable,
            Self::Run(r) => r.notable,
        }
    }

    /// Number of symbols this unit covers.
    pub fn width(&self) -> usize {
        match self {
            Self::Pair(_) => 2,
            Self::Run(r) => r.length,
        }
    }
}

/// One run-mode rarity factor and the symbols that contributed to it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Factor {
    /// Roughly 0-1.
    pub factor: f64,
    pub symbols: Vec<char>,
}

/// Run-mode rarity factors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RarityFactors {
    /// Share of symbols sitting in runs of two or more.
    pub repeats: Factor,
    /// Symbols of the alphabet missing from the value.
    pub absence: Factor,
    /// Symbols occurring unusually often.
    pub prominence: Factor,
    /// Composite: mean after dropping the smallest and largest factor.
    pub factor: f64,
}

/// Aggregate rarity summary of a value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    /// Pair mode: double units. Run mode: runs of exactly two.
    pub doubles: u32,
    /// Pair mode: repeated units. Run mode: runs of three or more.
    pub repeats: u32,
    /// Alphabet slots not used by the value.
    pub uniques: u32,
    pub score: u32,
    /// Every unit is notable.
    pub complete: bool,
    /// Present in run mode only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factors: Option<RarityFactors>,
}

/// Parent values of a bred result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lineage {
    pub parent_a: Value,
    pub parent_b: Value,
}

/// A generated or bred value with its score card.
///
/// Immutable once built; produce a new one through the engine instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedResult {
    pub(crate) value: Value,
    pub(crate) mode: EncodingMode,
    pub(crate) units: Vec<Unit>,
    pub(crate) card: ScoreCard,
    pub(crate) advantage: u32,
    pub(crate) lineage: Option<Lineage>,
}

impl GeneratedResult {
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn mode(&self) -> EncodingMode {
        self.mode
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn card(&self) -> &ScoreCard {
        &self.card
    }

    /// Shorthand for `card().score`.
    pub fn score(&self) -> u32 {
        self.card.score
    }

    /// Advantage budget used to produce this value.
    pub fn advantage(&self) -> u32 {
        self.advantage
    }

    pub fn lineage(&self) -> Option<&Lineage> {
        self.lineage.as_ref()
    }
}

/// Errors reported by scoring, generation and breeding.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CodeError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Invalid advantage {advantage}: must be within 0..={max}")]
    InvalidAdvantage { advantage: i64, max: u32 },
    #[error("Mismatched parents: {0}")]
    MismatchedParents(String),
    #[error("Config validation failed: {0}")]
    Config(#[from] super::ConfigError),
}

pub type Result<T> = std::result::Result<T, CodeError>;
