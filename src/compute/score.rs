//! Rarity scoring.
//!
//! A score card is a pure function of a value and its encoding config. It never
//! depends on how the value was generated.

use std::collections::{BTreeMap, BTreeSet};

use crate::schema::{
    CodeConfig, EncodingMode, Factor, GeneratedResult, Lineage, RarityFactors, Result, RunUnit,
    ScoreCard, Unit, Value,
};

use super::units::{checked_symbols, is_prominent, pair_units, run_units, symbol_counts};

/// Compute the score card of a value.
///
/// The sentinel and the empty value score to an all-zero card.
///
/// # Errors
/// `InvalidConfiguration` for symbols outside the alphabet or an odd-length
/// pair-mode value; `Config` when `config` itself is invalid.
pub fn score(value: &Value, config: &CodeConfig) -> Result<ScoreCard> {
    config.validate()?;
    if value.is_sentinel() || value.is_empty() {
        return Ok(ScoreCard::default());
    }

    let symbols = checked_symbols(value, config)?;
    let card = match config.mode {
        EncodingMode::Pair => {
            let units: Vec<Unit> = pair_units(&symbols).into_iter().map(Unit::Pair).collect();
            score_units(&symbols, &units, config)
        }
        EncodingMode::Run => {
            let runs = run_units(&symbols, &config.tuning);
            let units: Vec<Unit> = runs.iter().copied().map(Unit::Run).collect();
            let mut card = score_units(&symbols, &units, config);
            card.factors = Some(rarity_factors(&symbols, &runs, config));
            card
        }
    };
    Ok(card)
}

/// Integer counters shared by both modes.
fn score_units(symbols: &[char], units: &[Unit], config: &CodeConfig) -> ScoreCard {
    let mut doubles = 0;
    let mut repeats = 0;

    for unit in units {
        match unit {
            Unit::Pair(pair) => {
                if pair.double {
                    doubles += 1;
                }
                if pair.repeat {
                    repeats += 1;
                }
            }
            Unit::Run(run) => match run.length {
                2 => doubles += 1,
                n if n > 2 => repeats += 1,
                _ => {}
            },
        }
    }

    let distinct = symbols.iter().collect::<BTreeSet<_>>().len() as u32;
    let uniques = config.uniqueness_base().saturating_sub(distinct);

    ScoreCard {
        doubles,
        repeats,
        uniques,
        score: doubles + repeats + uniques,
        complete: !units.is_empty() && units.iter().all(Unit::notable),
        factors: None,
    }
}

/// Run-mode repeats, absence and prominence factors.
fn rarity_factors(symbols: &[char], runs: &[RunUnit], config: &CodeConfig) -> RarityFactors {
    let tuning = &config.tuning;
    let total = symbols.len();
    let length = total as f64;

    // Run length -> number of runs with that length
    let mut buckets: BTreeMap<usize, usize> = BTreeMap::new();
    let mut repeated: BTreeSet<char> = BTreeSet::new();
    for run in runs.iter().filter(|r| r.length >= 2) {
        *buckets.entry(run.length).or_insert(0) += 1;
        repeated.insert(run.symbol);
    }
    let repeats = Factor {
        factor: buckets
            .iter()
            .map(|(&len, &count)| (len * count) as f64 / length)
            .sum(),
        symbols: repeated.into_iter().collect(),
    };

    let counts = symbol_counts(symbols);
    let mut prominence = Factor::default();
    let mut absent = Vec::new();
    for &symbol in config.alphabet.symbols() {
        let count = counts.get(&symbol).copied().unwrap_or(0);
        if is_prominent(count, total, tuning) {
            prominence.factor += (count as f64 / (length / tuning.prominence_scale)).powi(2);
            prominence.symbols.push(symbol);
        } else if count == 0 {
            absent.push(symbol);
        }
    }
    let absence = Factor {
        factor: (absent.len() as f64 / tuning.absence_divisor).powi(2),
        symbols: absent,
    };

    let factor = trimmed_mean(&[repeats.factor, absence.factor, prominence.factor]);
    RarityFactors {
        repeats,
        absence,
        prominence,
        factor,
    }
}

/// Mean after dropping the smallest and largest value.
fn trimmed_mean(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let middle = if sorted.len() > 2 {
        &sorted[1..sorted.len() - 1]
    } else {
        &sorted[..]
    };
    if middle.is_empty() {
        0.0
    } else {
        middle.iter().sum::<f64>() / middle.len() as f64
    }
}

impl GeneratedResult {
    /// Rebuild a result from a stored value, scoring it afresh.
    ///
    /// Used for values held by the host layer (including parents shown
    /// alongside a child). The sentinel is accepted and scores to zero.
    pub fn from_value(value: Value, advantage: u32, config: &CodeConfig) -> Result<Self> {
        let card = score(&value, config)?;
        let units = super::units::units_of(&value, config)?;
        Ok(Self {
            value,
            mode: config.mode,
            units,
            card,
            advantage,
            lineage: None,
        })
    }

    pub(crate) fn with_lineage(mut self, lineage: Lineage) -> Self {
        self.lineage = Some(lineage);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair_card(value: &str) -> ScoreCard {
        score(&Value::from(value), &CodeConfig::default()).unwrap()
    }

    fn run_card(value: &str) -> ScoreCard {
        score(&Value::from(value), &CodeConfig::run_mode(value.len())).unwrap()
    }

    #[test]
    fn test_all_nines() {
        let card = pair_card("9999999999999999");
        assert_eq!(card.doubles, 8);
        assert_eq!(card.repeats, 8);
        assert_eq!(card.uniques, 16);
        assert_eq!(card.score, 32);
        assert!(card.complete);

        let units = super::super::units::units_of(
            &Value::from("9999999999999999"),
            &CodeConfig::default(),
        )
        .unwrap();
        assert!(units.iter().all(Unit::notable));
    }

    #[test]
    fn test_plain_value() {
        let card = pair_card("0123456789ABCDEF");
        assert_eq!(card.doubles, 0);
        assert_eq!(card.repeats, 0);
        assert_eq!(card.uniques, 1);
        assert_eq!(card.score, 1);
        assert!(!card.complete);
        assert!(card.factors.is_none());
    }

    #[test]
    fn test_mixed_value() {
        // 11 is a double, 2A occurs twice
        let card = pair_card("112A2A3B");
        assert_eq!(card.doubles, 1);
        assert_eq!(card.repeats, 2);
        // symbols 1, 2, A, 3, B
        assert_eq!(card.uniques, 12);
        assert_eq!(card.score, 15);
        assert!(!card.complete);
    }

    #[test]
    fn test_uniqueness_without_sentinel_slot() {
        let config = CodeConfig {
            sentinel_slot: false,
            ..Default::default()
        };
        let card = score(&Value::from("0123456789ABCDEF"), &config).unwrap();
        assert_eq!(card.uniques, 0);
    }

    #[test]
    fn test_sentinel_and_empty_score_zero() {
        assert_eq!(pair_card(crate::schema::EPOCH), ScoreCard::default());
        assert_eq!(pair_card(""), ScoreCard::default());
        assert_eq!(
            score(&Value::sentinel(), &CodeConfig::run_mode(10)).unwrap(),
            ScoreCard::default()
        );
    }

    #[test]
    fn test_score_is_deterministic() {
        let a = pair_card("A1B2C3A1D4D4E5F6");
        let b = pair_card("A1B2C3A1D4D4E5F6");
        assert_eq!(a, b);
    }

    #[test]
    fn test_run_mode_distinct_digits() {
        let card = run_card("1234567890");
        let factors = card.factors.unwrap();
        assert_eq!(factors.repeats.factor, 0.0);
        assert_eq!(factors.absence.factor, 0.0);
        assert_eq!(factors.prominence.factor, 0.0);
        assert_eq!(factors.factor, 0.0);
        // every digit present
        assert_eq!(card.uniques, 0);
    }

    #[test]
    fn test_run_mode_rejects_hex_alphabet() {
        let config = CodeConfig {
            alphabet: crate::schema::Alphabet::Hex,
            ..CodeConfig::run_mode(4)
        };
        let result = score(&Value::from("0000"), &config);
        assert!(matches!(
            result,
            Err(crate::schema::CodeError::Config(
                crate::schema::ConfigError::RunModeAlphabet(_)
            ))
        ));

        // Decimal run mode: nine digits absent
        let factors = run_card("0000").factors.unwrap();
        assert!((factors.absence.factor - (9.0f64 / 8.0).powi(2)).abs() < 1e-12);
    }

    #[test]
    fn test_run_mode_one_missing_digit() {
        let card = run_card("1234567891");
        let factors = card.factors.unwrap();
        assert_eq!(factors.repeats.factor, 0.0);
        assert_eq!(factors.prominence.factor, 0.0);
        // '0' never occurs
        assert_eq!(factors.absence.symbols, vec!['0']);
        assert!((factors.absence.factor - 1.0 / 64.0).abs() < 1e-12);
        // median of (0, 0, 1/64)
        assert_eq!(factors.factor, 0.0);
        assert_eq!(card.doubles + card.repeats, 0);
    }

    #[test]
    fn test_run_mode_factors() {
        // runs: 77, 1, 333, 2; 7 and 3 prominent; 0,4,5,6,8,9 absent
        let card = run_card("7713332");
        let factors = card.factors.unwrap();

        assert!((factors.repeats.factor - 5.0 / 7.0).abs() < 1e-12);
        assert_eq!(factors.repeats.symbols, vec!['3', '7']);

        let expected_prominence =
            (2.0f64 / (7.0 / 1.5)).powi(2) + (3.0f64 / (7.0 / 1.5)).powi(2);
        assert!((factors.prominence.factor - expected_prominence).abs() < 1e-12);
        assert_eq!(factors.prominence.symbols, vec!['3', '7']);

        assert_eq!(factors.absence.symbols.len(), 6);
        assert!((factors.absence.factor - (6.0f64 / 8.0).powi(2)).abs() < 1e-12);

        // repeats ~0.714, absence 0.5625, prominence ~0.597: median is prominence
        assert!((factors.factor - expected_prominence).abs() < 1e-12);

        assert_eq!(card.doubles, 1);
        assert_eq!(card.repeats, 1);
        assert!(!card.complete);
    }

    #[test]
    fn test_trimmed_mean() {
        assert_eq!(trimmed_mean(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(trimmed_mean(&[4.0, 1.0, 2.0, 3.0]), 2.5);
        assert_eq!(trimmed_mean(&[1.0, 3.0]), 2.0);
        assert_eq!(trimmed_mean(&[]), 0.0);
    }

    #[test]
    fn test_from_value_keeps_advantage() {
        let result =
            GeneratedResult::from_value(Value::from("AABB"), 7, &CodeConfig::default()).unwrap();
        assert_eq!(result.advantage(), 7);
        assert_eq!(result.units().len(), 2);
        assert_eq!(result.score(), 2 + 15);
        assert!(result.lineage().is_none());
    }
}
