//! Encoding model: decomposition of a value into scoring units.
//!
//! Pair mode splits a value into consecutive 2-symbol groups. Run mode splits
//! it into maximal runs of one repeated symbol.

use std::collections::HashMap;

use crate::schema::{
    CodeConfig, CodeError, EncodingMode, PairUnit, Result, RunUnit, TuningConfig, Unit, Value,
};

/// Decompose a value into its ordered scoring units.
///
/// The sentinel yields no units.
///
/// # Errors
/// `InvalidConfiguration` when a symbol is outside the configured alphabet or
/// when a pair-mode value has odd length.
pub fn units_of(value: &Value, config: &CodeConfig) -> Result<Vec<Unit>> {
    if value.is_sentinel() {
        return Ok(Vec::new());
    }
    let symbols = checked_symbols(value, config)?;

    let units = match config.mode {
        EncodingMode::Pair => pair_units(&symbols).into_iter().map(Unit::Pair).collect(),
        EncodingMode::Run => run_units(&symbols, &config.tuning)
            .into_iter()
            .map(Unit::Run)
            .collect(),
    };
    Ok(units)
}

/// Collect the symbols of a value, validating them against the config.
pub(crate) fn checked_symbols(value: &Value, config: &CodeConfig) -> Result<Vec<char>> {
    let symbols: Vec<char> = value.chars().collect();

    if let Some((i, c)) = symbols
        .iter()
        .enumerate()
        .find(|(_, c)| !config.alphabet.contains(**c))
    {
        return Err(CodeError::InvalidConfiguration(format!(
            "symbol {c:?} at position {i} is not in the {:?} alphabet",
            config.alphabet
        )));
    }

    if config.mode == EncodingMode::Pair && symbols.len() % 2 != 0 {
        return Err(CodeError::InvalidConfiguration(format!(
            "pair mode requires an even length, got {}",
            symbols.len()
        )));
    }

    Ok(symbols)
}

/// Split into pairs and flag every pair that occurs more than once.
pub(crate) fn pair_units(symbols: &[char]) -> Vec<PairUnit> {
    let mut pairs: Vec<PairUnit> = symbols
        .chunks_exact(2)
        .map(|chunk| PairUnit::new(chunk[0], chunk[1]))
        .collect();

    let mut occurrences: HashMap<(char, char), usize> = HashMap::new();
    for pair in &pairs {
        *occurrences.entry(pair.key()).or_insert(0) += 1;
    }
    for pair in &mut pairs {
        if occurrences[&pair.key()] > 1 {
            pair.mark_repeat();
        }
    }
    pairs
}

/// Segment into maximal runs.
pub(crate) fn run_units(symbols: &[char], tuning: &TuningConfig) -> Vec<RunUnit> {
    let counts = symbol_counts(symbols);
    let total = symbols.len();

    let mut runs: Vec<RunUnit> = Vec::new();
    for &symbol in symbols {
        match runs.last_mut() {
            Some(run) if run.symbol == symbol => run.length += 1,
            _ => runs.push(RunUnit {
                symbol,
                length: 1,
                prominent: false,
                notable: false,
            }),
        }
    }

    debug_assert!(
        runs.windows(2).all(|w| w[0].symbol != w[1].symbol),
        "adjacent runs share a symbol"
    );

    for run in &mut runs {
        run.prominent = is_prominent(counts[&run.symbol], total, tuning);
        run.notable = run.prominent || run.length >= 2;
    }
    runs
}

/// Occurrence count of every symbol present.
pub(crate) fn symbol_counts(symbols: &[char]) -> HashMap<char, usize> {
    let mut counts = HashMap::new();
    for &symbol in symbols {
        *counts.entry(symbol).or_insert(0) += 1;
    }
    counts
}

/// A symbol is prominent when it occurs more than `total / prominence_divisor` times.
#[inline]
pub(crate) fn is_prominent(count: usize, total: usize, tuning: &TuningConfig) -> bool {
    total > 0 && count as f64 > total as f64 / tuning.prominence_divisor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(value: &str) -> Vec<PairUnit> {
        units_of(&Value::from(value), &CodeConfig::default())
            .unwrap()
            .into_iter()
            .map(|u| match u {
                Unit::Pair(p) => p,
                Unit::Run(_) => panic!("expected pair unit"),
            })
            .collect()
    }

    fn runs(value: &str) -> Vec<RunUnit> {
        units_of(&Value::from(value), &CodeConfig::run_mode(value.len()))
            .unwrap()
            .into_iter()
            .map(|u| match u {
                Unit::Run(r) => r,
                Unit::Pair(_) => panic!("expected run unit"),
            })
            .collect()
    }

    #[test]
    fn test_pairs_preserve_order() {
        let units = pairs("0123456789ABCDEF");
        let joined: String = units.iter().map(PairUnit::value).collect();
        assert_eq!(joined, "0123456789ABCDEF");
        assert_eq!(units.len(), 8);
        assert!(units.iter().all(|p| !p.notable));
    }

    #[test]
    fn test_repeat_marks_every_occurrence() {
        let units = pairs("1A2B1A3C");
        assert!(units[0].repeat && units[2].repeat);
        assert!(!units[1].repeat && !units[3].repeat);
        assert!(units[0].notable && !units[0].double);
    }

    #[test]
    fn test_double_pair() {
        let units = pairs("AA01");
        assert!(units[0].double && units[0].notable && !units[0].repeat);
        assert!(!units[1].notable);
    }

    #[test]
    fn test_odd_length_rejected() {
        let result = units_of(&Value::from("ABC"), &CodeConfig::default());
        assert!(matches!(result, Err(CodeError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_foreign_symbol_rejected() {
        let result = units_of(&Value::from("0g"), &CodeConfig::default());
        assert!(matches!(result, Err(CodeError::InvalidConfiguration(_))));

        let decimal = CodeConfig::run_mode(2);
        assert!(units_of(&Value::from("1A"), &decimal).is_err());
    }

    #[test]
    fn test_sentinel_has_no_units() {
        let units = units_of(&Value::sentinel(), &CodeConfig::default()).unwrap();
        assert!(units.is_empty());
    }

    #[test]
    fn test_runs_are_maximal() {
        let units = runs("1122234");
        let shape: Vec<(char, usize)> = units.iter().map(|r| (r.symbol, r.length)).collect();
        assert_eq!(shape, vec![('1', 2), ('2', 3), ('3', 1), ('4', 1)]);
        assert!(units[0].notable && units[1].notable);
        assert!(!units[2].notable && !units[3].notable);
    }

    #[test]
    fn test_prominent_symbol_is_notable_without_run() {
        // '5' occurs 4 times in 10 symbols, above the 10 / 5 threshold
        let units = runs("5152535678");
        let first = units[0];
        assert_eq!(first.length, 1);
        assert!(first.prominent && first.notable);
        assert!(!units[1].notable);
    }
}
