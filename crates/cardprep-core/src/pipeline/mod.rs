//! Orchestration: end-to-end card rendering, time budgets and generation
//! tokens for superseding stale work.

mod card;
mod deadline;
mod generation;

pub use card::{
    decode_card_image, decode_card_image_within, render_card_for_print,
    render_card_for_print_within, render_card_preview, render_card_preview_within, CardPreview,
    PlacedCard,
};
pub use deadline::{Deadline, CARD_BUDGET, DECODE_BUDGET};
pub use generation::{Generation, GenerationTracker};
