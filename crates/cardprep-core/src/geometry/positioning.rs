//! Placement of a card on the output page.

use serde::{Deserialize, Serialize};

use super::render::RenderDimensions;
use super::settings::{CardType, OutputSettings, SizeIn};
use super::{normalize_degrees, swaps_dimensions};

/// Final page-space placement of a card, in inches from the page's top-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPositioning {
    pub x: f64,
    pub y: f64,
    /// Width of the post-rotation bounding box.
    pub width: f64,
    /// Height of the post-rotation bounding box.
    pub height: f64,
    /// Rotation in degrees, normalized to [0, 360).
    pub rotation_degrees: f64,
}

impl CardPositioning {
    pub fn size(&self) -> SizeIn {
        SizeIn::new(self.width, self.height)
    }
}

/// Center the card container on the page, then apply the user offset.
///
/// Quarter-turn rotations (90°, 270°) swap the container's width and height
/// before centering. Offsets are not range checked; a card pushed partially
/// off the page is the user's call.
pub fn resolve_card_positioning(
    dims: &RenderDimensions,
    settings: &OutputSettings,
    card_type: CardType,
) -> CardPositioning {
    let rotation = normalize_degrees(settings.rotation.for_card(card_type));
    let size = if swaps_dimensions(rotation) {
        dims.card.transposed()
    } else {
        dims.card
    };

    CardPositioning {
        x: (settings.page_size.width - size.width) / 2.0 + settings.offset.horizontal,
        y: (settings.page_size.height - size.height) / 2.0 + settings.offset.vertical,
        width: size.width,
        height: size.height,
        rotation_degrees: rotation,
    }
}
