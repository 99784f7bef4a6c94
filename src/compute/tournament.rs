//! Advantage tournament generator.
//!
//! Each unit of a new value is the winner of a small tournament: up to
//! `advantage` random candidates are drawn and the most notable one is kept.
//! A candidate that literally repeats something already drawn during the same
//! call wins outright and ends the tournament for that unit.
//!
//! A candidate's per-unit score is its `notable` flag; there is no finer score.

use std::collections::HashMap;
use std::hash::Hash;

use rand::Rng;

use crate::schema::{
    Alphabet, CodeConfig, CodeError, EncodingMode, GeneratedResult, PairUnit, Result, Value,
};

/// Occurrence counts of drawn units, local to one generation call.
pub(crate) type History<K> = HashMap<K, usize>;

/// Draws made for a single unit. Zero still draws once.
#[inline]
fn draw_budget(advantage: u32) -> u32 {
    advantage.max(1)
}

#[inline]
fn seen<K: Eq + Hash>(history: &History<K>, key: &K) -> bool {
    history.get(key).is_some_and(|&n| n > 0)
}

fn record<K: Eq + Hash>(history: &mut History<K>, key: K) {
    *history.entry(key).or_insert(0) += 1;
}

fn random_symbol<R: Rng + ?Sized>(alphabet: Alphabet, rng: &mut R) -> char {
    alphabet.symbol(rng.gen_range(0..alphabet.size()))
}

fn random_pair<R: Rng + ?Sized>(alphabet: Alphabet, rng: &mut R) -> PairUnit {
    let first = random_symbol(alphabet, rng);
    let second = random_symbol(alphabet, rng);
    PairUnit::new(first, second)
}

/// Draw one pair under an advantage budget and record it in `history`.
pub(crate) fn draw_pair<R: Rng + ?Sized>(
    alphabet: Alphabet,
    history: &mut History<(char, char)>,
    advantage: u32,
    rng: &mut R,
) -> PairUnit {
    let mut best = random_pair(alphabet, rng);

    if seen(history, &best.key()) {
        best.mark_repeat();
    } else {
        for attempt in 1..draw_budget(advantage) {
            let mut pair = random_pair(alphabet, rng);
            if seen(history, &pair.key()) {
                log::trace!("pair {} repeats on attempt {attempt}", pair.value());
                pair.mark_repeat();
                best = pair;
                break;
            }
            if !best.notable && pair.notable {
                best = pair;
            }
        }
    }

    record(history, best.key());
    best
}

/// Draw one symbol under an advantage budget and record it in `history`.
///
/// Extending the previous symbol's run wins outright. Otherwise the symbol
/// seen most often so far in this value is preferred.
pub(crate) fn draw_symbol<R: Rng + ?Sized>(
    alphabet: Alphabet,
    history: &mut History<char>,
    previous: Option<char>,
    advantage: u32,
    rng: &mut R,
) -> char {
    let count = |history: &History<char>, symbol: char| history.get(&symbol).copied().unwrap_or(0);
    let mut best = random_symbol(alphabet, rng);

    if previous != Some(best) {
        for attempt in 1..draw_budget(advantage) {
            let symbol = random_symbol(alphabet, rng);
            if previous == Some(symbol) {
                log::trace!("symbol {symbol} extends a run on attempt {attempt}");
                best = symbol;
                break;
            }
            if count(history, symbol) > count(history, best) {
                best = symbol;
            }
        }
    }

    record(history, best);
    best
}

/// Validate a caller-supplied advantage against the configured ceiling.
pub(crate) fn check_advantage(advantage: i64, config: &CodeConfig) -> Result<u32> {
    let max = config.tuning.max_advantage;
    u32::try_from(advantage)
        .ok()
        .filter(|&a| a <= max)
        .ok_or(CodeError::InvalidAdvantage { advantage, max })
}

/// Generate a fresh value under an advantage budget.
///
/// `advantage` 0 and 1 both make a single draw per unit.
///
/// # Errors
/// `InvalidAdvantage` when `advantage` is negative or above
/// `tuning.max_advantage`; `Config` when `config` is invalid.
pub fn generate<R: Rng + ?Sized>(
    config: &CodeConfig,
    advantage: i64,
    rng: &mut R,
) -> Result<GeneratedResult> {
    config.validate()?;
    let advantage = check_advantage(advantage, config)?;

    let value: String = match config.mode {
        EncodingMode::Pair => {
            let mut history = History::new();
            let mut value = String::with_capacity(config.length);
            for _ in 0..config.pair_count() {
                let pair = draw_pair(config.alphabet, &mut history, advantage, rng);
                value.push(pair.first);
                value.push(pair.second);
            }
            value
        }
        EncodingMode::Run => {
            let mut history = History::new();
            let mut previous = None;
            let mut value = String::with_capacity(config.length);
            for _ in 0..config.length {
                let symbol = draw_symbol(config.alphabet, &mut history, previous, advantage, rng);
                value.push(symbol);
                previous = Some(symbol);
            }
            value
        }
    };

    let result = GeneratedResult::from_value(Value::from(value), advantage, config)?;
    log::debug!(
        "generated {} (score {}, advantage {advantage})",
        result.value(),
        result.score()
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::CodeRng;

    #[test]
    fn test_generate_length_and_alphabet() {
        let config = CodeConfig::default();
        let mut rng = CodeRng::new(42);
        for advantage in [0, 1, 2, 10, 100] {
            let result = generate(&config, advantage, &mut rng).unwrap();
            assert_eq!(result.value().len(), 16);
            assert!(result.value().chars().all(|c| config.alphabet.contains(c)));
            assert_eq!(result.advantage(), advantage as u32);
            assert!(result.lineage().is_none());
        }
    }

    #[test]
    fn test_generate_run_mode() {
        let config = CodeConfig::run_mode(10);
        let mut rng = CodeRng::new(3);
        let result = generate(&config, 5, &mut rng).unwrap();
        assert_eq!(result.value().len(), 10);
        assert!(result.value().chars().all(|c| c.is_ascii_digit()));
        assert!(result.card().factors.is_some());
    }

    #[test]
    fn test_negative_advantage_rejected() {
        let mut rng = CodeRng::new(1);
        let err = generate(&CodeConfig::default(), -1, &mut rng).unwrap_err();
        assert_eq!(
            err,
            CodeError::InvalidAdvantage {
                advantage: -1,
                max: 10_000
            }
        );
    }

    #[test]
    fn test_advantage_above_ceiling_rejected() {
        let mut config = CodeConfig::default();
        config.tuning.max_advantage = 50;
        let mut rng = CodeRng::new(1);
        assert!(generate(&config, 51, &mut rng).is_err());
        assert!(generate(&config, 50, &mut rng).is_ok());
    }

    #[test]
    fn test_seen_pair_is_repeat() {
        let mut history = History::new();
        let mut rng = CodeRng::new(9);
        // Every possible decimal pair is already present
        for a in Alphabet::Decimal.symbols() {
            for b in Alphabet::Decimal.symbols() {
                record(&mut history, (*a, *b));
            }
        }
        let pair = draw_pair(Alphabet::Decimal, &mut history, 0, &mut rng);
        assert!(pair.repeat && pair.notable);
        assert_eq!(history[&pair.key()], 2);
    }

    #[test]
    fn test_high_advantage_favours_notable_pairs() {
        let config = CodeConfig::default();
        let mut rng = CodeRng::new(11);

        let mean_score = |advantage: i64, rng: &mut CodeRng| {
            (0..50)
                .map(|_| generate(&config, advantage, rng).unwrap().score())
                .sum::<u32>() as f64
                / 50.0
        };

        let low = mean_score(1, &mut rng);
        let high = mean_score(200, &mut rng);
        assert!(high > low, "high {high} <= low {low}");
    }

    #[test]
    fn test_draw_symbol_extends_run_with_budget() {
        let mut rng = CodeRng::new(5);
        let mut history = History::new();
        record(&mut history, '4');
        // With a large budget the previous symbol is found almost surely
        let symbol = draw_symbol(Alphabet::Decimal, &mut history, Some('4'), 1_000, &mut rng);
        assert_eq!(symbol, '4');
        assert_eq!(history[&'4'], 2);
    }

    #[test]
    fn test_check_advantage() {
        let config = CodeConfig::default();
        assert_eq!(check_advantage(0, &config), Ok(0));
        assert_eq!(check_advantage(10_000, &config), Ok(10_000));
        assert!(check_advantage(10_001, &config).is_err());
        assert!(check_advantage(i64::MIN, &config).is_err());
    }
}
