//! Configured breeding engine.

use rand::Rng;

use crate::schema::{CodeConfig, GeneratedResult, Result, ScoreCard, Unit, Value};

use super::{breed, generate, score, units_of};

/// Breeding engine bound to one validated configuration.
///
/// Holds no mutable state; randomness is supplied per call.
#[derive(Debug, Clone)]
pub struct Breeder {
    config: CodeConfig,
}

impl Breeder {
    /// Create a new engine.
    ///
    /// # Errors
    /// `Config` when the configuration does not validate.
    pub fn new(config: CodeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CodeConfig {
        &self.config
    }

    /// Score a value.
    pub fn score(&self, value: &Value) -> Result<ScoreCard> {
        score(value, &self.config)
    }

    /// Scoring units of a value.
    pub fn units_of(&self, value: &Value) -> Result<Vec<Unit>> {
        units_of(value, &self.config)
    }

    /// Generate a fresh code under an advantage budget.
    pub fn generate<R: Rng + ?Sized>(&self, advantage: i64, rng: &mut R) -> Result<GeneratedResult> {
        generate(&self.config, advantage, rng)
    }

    /// Breed a child from two parents.
    pub fn breed<R: Rng + ?Sized>(
        &self,
        parent_a: &GeneratedResult,
        parent_b: &GeneratedResult,
        rng: &mut R,
    ) -> Result<GeneratedResult> {
        breed(&self.config, parent_a, parent_b, rng)
    }

    /// Initial code of a freshly placed entity, drawn without advantage.
    pub fn seed_code<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<GeneratedResult> {
        self.generate(0, rng)
    }

    /// Rebuild a result from a stored value.
    pub fn restore(&self, value: Value, advantage: u32) -> Result<GeneratedResult> {
        GeneratedResult::from_value(value, advantage, &self.config)
    }
}
