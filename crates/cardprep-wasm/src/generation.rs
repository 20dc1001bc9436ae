//! Generation token bindings.
//!
//! ```typescript
//! const tracker = new JsGenerationTracker();
//!
//! async function onSettingsChanged() {
//!   const generation = tracker.begin();
//!   const preview = await worker.render(...);
//!   if (!tracker.is_current(generation)) return; // superseded
//!   show(preview);
//! }
//! ```
//!
//! Generations are exposed as JS numbers; they stay exact far past any
//! realistic session length.

use cardprep_core::pipeline::{Generation, GenerationTracker};
use wasm_bindgen::prelude::*;

use crate::to_js_error;

/// Hands out generation tokens and decides which results are still wanted.
#[wasm_bindgen]
#[derive(Default)]
pub struct JsGenerationTracker {
    inner: GenerationTracker,
}

#[wasm_bindgen]
impl JsGenerationTracker {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation, superseding all earlier ones.
    pub fn begin(&self) -> f64 {
        self.inner.begin().value() as f64
    }

    /// The most recently started generation.
    #[wasm_bindgen(getter)]
    pub fn latest(&self) -> f64 {
        self.inner.latest().value() as f64
    }

    /// True if no newer generation has started.
    pub fn is_current(&self, generation: f64) -> bool {
        self.inner.is_current(to_generation(generation))
    }

    /// Throw if the generation has been superseded.
    pub fn commit(&self, generation: f64) -> Result<(), JsValue> {
        self.inner
            .commit(to_generation(generation), ())
            .map_err(to_js_error)
    }
}

fn to_generation(value: f64) -> Generation {
    Generation::from_value(value as u64)
}
