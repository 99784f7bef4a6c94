//! Crossover (breeding) of two parent codes.

use rand::Rng;

use crate::schema::{
    CodeConfig, CodeError, EncodingMode, GeneratedResult, Lineage, PairUnit, Result, TuningConfig,
    Unit, Value,
};

use super::tournament::{History, draw_pair, draw_symbol};

/// Child advantage derived from both parent scores.
///
/// `ceil(((a + b) / curve_divisor) ^ curve_exponent * curve_scale)`, capped at
/// `max_advantage`. Monotonic in both scores and deterministic.
pub fn child_advantage(score_a: u32, score_b: u32, tuning: &TuningConfig) -> u32 {
    let sum = f64::from(score_a) + f64::from(score_b);
    let raw = ((sum / tuning.curve_divisor).powf(tuning.curve_exponent) * tuning.curve_scale).ceil();

    if raw >= f64::from(tuning.max_advantage) {
        log::debug!("child advantage {raw} capped at {}", tuning.max_advantage);
        tuning.max_advantage
    } else {
        raw.max(0.0) as u32
    }
}

/// Breed two parents into a child code.
///
/// Each unit position independently either inherits from a parent or is drawn
/// fresh at the child advantage. Only fresh draws enter the draw history.
/// The child's score card is computed from its final value. Crossing a code
/// with itself is the caller's responsibility to prevent.
///
/// # Errors
/// `MismatchedParents` when the parents differ in length or encoding mode,
/// disagree with `config`, or either one is the sentinel.
pub fn breed<R: Rng + ?Sized>(
    config: &CodeConfig,
    parent_a: &GeneratedResult,
    parent_b: &GeneratedResult,
    rng: &mut R,
) -> Result<GeneratedResult> {
    config.validate()?;
    check_parents(config, parent_a, parent_b)?;

    let advantage = child_advantage(parent_a.score(), parent_b.score(), &config.tuning);
    log::debug!(
        "breeding {} x {} (scores {} + {}) at advantage {advantage}",
        parent_a.value(),
        parent_b.value(),
        parent_a.score(),
        parent_b.score()
    );

    let value = match config.mode {
        EncodingMode::Pair => cross_pairs(config, parent_a, parent_b, advantage, rng)
            .into_iter()
            .flat_map(|pair| [pair.first, pair.second])
            .collect(),
        EncodingMode::Run => cross_runs(config, parent_a, parent_b, advantage, rng),
    };

    let child = GeneratedResult::from_value(Value::from(value), advantage, config)?;
    Ok(child.with_lineage(Lineage {
        parent_a: parent_a.value().clone(),
        parent_b: parent_b.value().clone(),
    }))
}

fn check_parents(config: &CodeConfig, a: &GeneratedResult, b: &GeneratedResult) -> Result<()> {
    if a.value().is_sentinel() || b.value().is_sentinel() {
        return Err(CodeError::MismatchedParents(
            "the sentinel value cannot be bred".to_string(),
        ));
    }
    if a.mode() != b.mode() || a.mode() != config.mode {
        return Err(CodeError::MismatchedParents(format!(
            "encoding modes differ: {:?} x {:?} with engine {:?}",
            a.mode(),
            b.mode(),
            config.mode
        )));
    }
    let (len_a, len_b) = (a.value().len(), b.value().len());
    if len_a != len_b || len_a != config.length {
        return Err(CodeError::MismatchedParents(format!(
            "lengths differ: {len_a} x {len_b} with engine {}",
            config.length
        )));
    }
    Ok(())
}

fn inherit_probability(notable: bool, tuning: &TuningConfig) -> f64 {
    if notable {
        tuning.inherit_notable
    } else {
        tuning.inherit_plain
    }
}

/// Parent A wins when its unit is a repeat, or notable while B's is no repeat.
#[inline]
fn prefer_a(a_repeat: bool, a_notable: bool, b_repeat: bool) -> bool {
    a_repeat || (a_notable && !b_repeat)
}

fn pairs_of(result: &GeneratedResult) -> Vec<PairUnit> {
    result
        .units()
        .iter()
        .filter_map(|unit| match unit {
            Unit::Pair(pair) => Some(*pair),
            Unit::Run(_) => None,
        })
        .collect()
}

fn cross_pairs<R: Rng + ?Sized>(
    config: &CodeConfig,
    parent_a: &GeneratedResult,
    parent_b: &GeneratedResult,
    advantage: u32,
    rng: &mut R,
) -> Vec<PairUnit> {
    let mut history = History::new();

    pairs_of(parent_a)
        .into_iter()
        .zip(pairs_of(parent_b))
        .map(|(a, b)| {
            let p = inherit_probability(a.notable || b.notable, &config.tuning);
            if rng.gen_bool(p) {
                if prefer_a(a.repeat, a.notable, b.repeat) { a } else { b }
            } else {
                draw_pair(config.alphabet, &mut history, advantage, &mut *rng)
            }
        })
        .collect()
}

/// Per-position view of a run-mode parent.
#[derive(Debug, Clone, Copy)]
struct Locus {
    symbol: char,
    /// Sits in a run of two or more.
    in_run: bool,
    notable: bool,
}

fn loci_of(result: &GeneratedResult) -> Vec<Locus> {
    result
        .units()
        .iter()
        .filter_map(|unit| match unit {
            Unit::Run(run) => Some(run),
            Unit::Pair(_) => None,
        })
        .flat_map(|run| {
            std::iter::repeat_n(
                Locus {
                    symbol: run.symbol,
                    in_run: run.length >= 2,
                    notable: run.notable,
                },
                run.length,
            )
        })
        .collect()
}

fn cross_runs<R: Rng + ?Sized>(
    config: &CodeConfig,
    parent_a: &GeneratedResult,
    parent_b: &GeneratedResult,
    advantage: u32,
    rng: &mut R,
) -> String {
    let mut history = History::new();
    let mut previous = None;
    let mut value = String::with_capacity(config.length);

    for (a, b) in loci_of(parent_a).iter().zip(loci_of(parent_b).iter()) {
        let p = inherit_probability(a.notable || b.notable, &config.tuning);
        let symbol = if rng.gen_bool(p) {
            if prefer_a(a.in_run, a.notable, b.in_run) {
                a.symbol
            } else {
                b.symbol
            }
        } else {
            draw_symbol(config.alphabet, &mut history, previous, advantage, rng)
        };
        value.push(symbol);
        previous = Some(symbol);
    }
    value
}
