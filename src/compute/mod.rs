//! Compute module - Encoding, scoring, generation and breeding.
//!
//! # Overview
//!
//! - **Encoding** (`units`): decomposition of a value into scoring units
//! - **Scoring** (`score`): rarity score cards
//! - **Generation** (`tournament`): advantage-budgeted random codes
//! - **Breeding** (`crossover`): child codes from two parents

mod breeder;
mod crossover;
mod rng;
mod score;
mod tournament;
mod units;

pub use breeder::Breeder;
pub use crossover::{breed, child_advantage};
pub use rng::CodeRng;
pub use score::score;
pub use tournament::generate;
pub use units::units_of;
