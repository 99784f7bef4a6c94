//! Configuration types for code generation, scoring and breeding.

use serde::{Deserialize, Serialize};

/// Default code length in symbols.
fn default_length() -> usize {
    16
}

fn default_sentinel_slot() -> bool {
    true
}

/// Top-level code configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeConfig {
    /// How a value decomposes into scoring units.
    #[serde(default)]
    pub mode: EncodingMode,
    /// Symbol alphabet.
    #[serde(default)]
    pub alphabet: Alphabet,
    /// Number of symbols in a generated value.
    #[serde(default = "default_length")]
    pub length: usize,
    /// Count the sentinel as an extra alphabet slot when computing uniqueness.
    #[serde(default = "default_sentinel_slot")]
    pub sentinel_slot: bool,
    /// Balance constants.
    #[serde(default)]
    pub tuning: TuningConfig,
}

impl Default for CodeConfig {
    fn default() -> Self {
        Self {
            mode: EncodingMode::default(),
            alphabet: Alphabet::default(),
            length: default_length(),
            sentinel_slot: default_sentinel_slot(),
            tuning: TuningConfig::default(),
        }
    }
}

impl CodeConfig {
    /// Decimal run-mode configuration. The sentinel slot is off, so the
    /// uniqueness base is the plain alphabet size of 10.
    pub fn run_mode(length: usize) -> Self {
        Self {
            mode: EncodingMode::Run,
            alphabet: Alphabet::Decimal,
            length,
            sentinel_slot: false,
            ..Default::default()
        }
    }

    /// Base that the distinct-symbol count is subtracted from.
    #[inline]
    pub fn uniqueness_base(&self) -> u32 {
        let size = self.alphabet.size() as u32;
        if self.sentinel_slot { size + 1 } else { size }
    }

    /// Number of units a generated value holds in pair mode.
    #[inline]
    pub fn pair_count(&self) -> usize {
        self.length / 2
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.length == 0 {
            return Err(ConfigError::InvalidLength);
        }
        if self.mode == EncodingMode::Pair && self.length % 2 != 0 {
            return Err(ConfigError::OddPairLength(self.length));
        }
        // Run-mode factors are defined over decimal digits
        if self.mode == EncodingMode::Run && self.alphabet != Alphabet::Decimal {
            return Err(ConfigError::RunModeAlphabet(self.alphabet));
        }
        self.tuning.validate()
    }
}

/// Unit decomposition strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingMode {
    /// Fixed-width 2-symbol groups.
    #[default]
    Pair,
    /// Maximal runs of one repeated symbol.
    Run,
}

/// Symbol alphabet of a value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alphabet {
    /// `0-9A-F`.
    #[default]
    Hex,
    /// `0-9`.
    Decimal,
}

static HEX_SYMBOLS: [char; 16] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F',
];

impl Alphabet {
    /// Number of symbols.
    #[inline]
    pub fn size(&self) -> usize {
        self.symbols().len()
    }

    /// Symbols in ascending order.
    pub fn symbols(&self) -> &'static [char] {
        match self {
            Self::Hex => &HEX_SYMBOLS,
            Self::Decimal => &HEX_SYMBOLS[..10],
        }
    }

    /// Symbol at `index`, wrapping past the end.
    #[inline]
    pub fn symbol(&self, index: usize) -> char {
        let symbols = self.symbols();
        symbols[index % symbols.len()]
    }

    /// Whether `c` belongs to this alphabet. Hex letters must be upper case.
    pub fn contains(&self, c: char) -> bool {
        self.symbols().contains(&c)
    }
}

/// Game-balance constants. None of these are correctness invariants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TuningConfig {
    /// Parent score sum is divided by this before the curve is applied.
    #[serde(default = "default_curve_divisor")]
    pub curve_divisor: f64,
    /// Exponent of the child advantage curve.
    #[serde(default = "default_curve_exponent")]
    pub curve_exponent: f64,
    /// Multiplier of the child advantage curve.
    #[serde(default = "default_curve_scale")]
    pub curve_scale: f64,
    /// Inheritance probability when either parent unit is notable.
    #[serde(default = "default_inherit_notable")]
    pub inherit_notable: f64,
    /// Inheritance probability when neither parent unit is notable.
    #[serde(default = "default_inherit_plain")]
    pub inherit_plain: f64,
    /// A symbol is prominent when its count exceeds `length / prominence_divisor`.
    #[serde(default = "default_prominence_divisor")]
    pub prominence_divisor: f64,
    /// Prominence contribution is `(count / (length / prominence_scale))^2`.
    #[serde(default = "default_prominence_scale")]
    pub prominence_scale: f64,
    /// Absence factor is `(absences / absence_divisor)^2`.
    #[serde(default = "default_absence_divisor")]
    pub absence_divisor: f64,
    /// Largest advantage the generator accepts.
    #[serde(default = "default_max_advantage")]
    pub max_advantage: u32,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            curve_divisor: default_curve_divisor(),
            curve_exponent: default_curve_exponent(),
            curve_scale: default_curve_scale(),
            inherit_notable: default_inherit_notable(),
            inherit_plain: default_inherit_plain(),
            prominence_divisor: default_prominence_divisor(),
            prominence_scale: default_prominence_scale(),
            absence_divisor: default_absence_divisor(),
            max_advantage: default_max_advantage(),
        }
    }
}

fn default_curve_divisor() -> f64 {
    64.0
}
fn default_curve_exponent() -> f64 {
    2.0
}
fn default_curve_scale() -> f64 {
    250.0
}
fn default_inherit_notable() -> f64 {
    0.6
}
fn default_inherit_plain() -> f64 {
    0.4
}
fn default_prominence_divisor() -> f64 {
    5.0
}
fn default_prominence_scale() -> f64 {
    1.5
}
fn default_absence_divisor() -> f64 {
    8.0
}
fn default_max_advantage() -> u32 {
    10_000
}

impl TuningConfig {
    /// Validate tuning constants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("curve_divisor", self.curve_divisor),
            ("curve_exponent", self.curve_exponent),
            ("curve_scale", self.curve_scale),
            ("prominence_divisor", self.prominence_divisor),
            ("prominence_scale", self.prominence_scale),
            ("absence_divisor", self.absence_divisor),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive(name));
            }
        }

        for (name, p) in [
            ("inherit_notable", self.inherit_notable),
            ("inherit_plain", self.inherit_plain),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::InvalidProbability(name, p));
            }
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Code length must be non-zero")]
    InvalidLength,
    #[error("Pair mode requires an even code length, got {0}")]
    OddPairLength(usize),
    #[error("Run mode requires the decimal alphabet, got {0:?}")]
    RunModeAlphabet(Alphabet),
    #[error("Tuning constant {0} must be positive and finite")]
    NonPositive(&'static str),
    #[error("Tuning probability {0} must be within [0, 1], got {1}")]
    InvalidProbability(&'static str, f64),
}
