//! WebAssembly bindings for Genecode.
//!
//! Provides a thin wrapper around `Breeder` for browser and widget hosts. Codes
//! cross the boundary as plain value strings; results come back as JS objects.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::{
    compute::{Breeder, CodeRng},
    schema::{CodeConfig, CodeError, Value},
};

/// Initialize WASM module with panic hook and logging.
#[wasm_bindgen(start)]
pub fn init() {
    // Set panic hook for better error messages in browser
    console_error_panic_hook::set_once();

    // Initialize WASM logger
    wasm_logger::init(wasm_logger::Config::default());
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

fn code_error(e: CodeError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// WebAssembly wrapper for the breeding engine.
#[wasm_bindgen]
pub struct WasmBreeder {
    breeder: Breeder,
    rng: CodeRng,
}

#[wasm_bindgen]
impl WasmBreeder {
    /// Create a new engine from JSON configuration.
    ///
    /// # Arguments
    /// * `config_json` - JSON string containing CodeConfig (`"{}"` for defaults)
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<WasmBreeder, JsValue> {
        let config: CodeConfig = serde_json::from_str(config_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid config JSON: {e}")))?;
        let breeder = Breeder::new(config).map_err(code_error)?;

        Ok(WasmBreeder {
            breeder,
            rng: CodeRng::random(),
        })
    }

    /// Reseed the random source for reproducible sessions.
    #[wasm_bindgen]
    pub fn reseed(&mut self, seed: u64) {
        self.rng = CodeRng::new(seed);
    }

    /// Score card of a value.
    #[wasm_bindgen]
    pub fn score(&self, value: &str) -> Result<JsValue, JsValue> {
        let card = self.breeder.score(&Value::from(value)).map_err(code_error)?;
        to_js(&card)
    }

    /// Scoring units of a value, for colouring and segmenting.
    #[wasm_bindgen(js_name = unitsOf)]
    pub fn units_of(&self, value: &str) -> Result<JsValue, JsValue> {
        let units = self.breeder.units_of(&Value::from(value)).map_err(code_error)?;
        to_js(&units)
    }

    /// Generate a fresh code.
    #[wasm_bindgen]
    pub fn generate(&mut self, advantage: i32) -> Result<JsValue, JsValue> {
        let result = self
            .breeder
            .generate(i64::from(advantage), &mut self.rng)
            .map_err(code_error)?;
        to_js(&result)
    }

    /// Breed a child from two stored parent values.
    #[wasm_bindgen]
    pub fn breed(&mut self, parent_a: &str, parent_b: &str) -> Result<JsValue, JsValue> {
        let a = self
            .breeder
            .restore(Value::from(parent_a), 0)
            .map_err(code_error)?;
        let b = self
            .breeder
            .restore(Value::from(parent_b), 0)
            .map_err(code_error)?;
        let child = self.breeder.breed(&a, &b, &mut self.rng).map_err(code_error)?;
        to_js(&child)
    }
}
