//! Genecode - Procedural genetic codes with rarity scoring and breeding.
//!
//! Every entity carries an encoded value (a hex or decimal string). Values are
//! scored for rarity, generated under an "advantage" budget that biases towards
//! rarer outcomes, and bred: two parents produce a child whose value blends
//! inherited units with fresh draws.
//!
//! # Architecture
//!
//! - `schema`: Configuration and data types (values, units, score cards)
//! - `compute`: Encoding, scoring, generation and breeding
//!
//! All operations are pure apart from the random source passed in.
//!
//! # Example
//!
//! ```rust
//! use genecode::{Breeder, CodeConfig, CodeRng};
//!
//! let breeder = Breeder::new(CodeConfig::default()).unwrap();
//! let mut rng = CodeRng::new(42);
//!
//! let a = breeder.generate(10, &mut rng).unwrap();
//! let b = breeder.generate(10, &mut rng).unwrap();
//! let child = breeder.breed(&a, &b, &mut rng).unwrap();
//!
//! println!("{} x {} -> {} (score {})", a.value(), b.value(), child.value(), child.score());
//! ```

pub mod compute;
pub mod schema;

// WebAssembly bindings (only for wasm32 target)
#[cfg(target_arch = "wasm32")]
pub mod wasm;

// Re-export commonly used types
pub use compute::{Breeder, CodeRng, breed, child_advantage, generate, score, units_of};
pub use schema::{CodeConfig, CodeError, EncodingMode, GeneratedResult, ScoreCard, Unit, Value};
