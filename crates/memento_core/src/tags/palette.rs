//! Deterministic tag color assignment.
//!
//! # Responsibility
//! - Bucket arbitrary tag strings into a stable palette slot.
//! - Expose the slot as index, CSS class name and CSS variable.
//!
//! # Invariants
//! - Tags equal after lowercase normalization map to the same slot.
//! - The palette table is constant for the lifetime of a build.
//! - Distinct tags may collide; no collision avoidance is attempted.

use serde::{Deserialize, Serialize};

const HASH_MULTIPLIER: u32 = 169;

/// Fixed tag palette, in slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagColor {
    Blue,
    Periwinkle,
    Lavender,
    Pink,
    Rose,
    Peach,
    Yellow,
    Mint,
    Coral,
    Sky,
    Lilac,
    Lime,
}

/// Palette slots in index order.
pub const PALETTE: [TagColor; 12] = [
    TagColor::Blue,
    TagColor::Periwinkle,
    TagColor::Lavender,
    TagColor::Pink,
    TagColor::Rose,
    TagColor::Peach,
    TagColor::Yellow,
    TagColor::Mint,
    TagColor::Coral,
    TagColor::Sky,
    TagColor::Lilac,
    TagColor::Lime,
];

impl TagColor {
    /// Slot position inside [`PALETTE`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Class-name suffix used by tag chips (`tag-<name>`).
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Periwinkle => "periwinkle",
            Self::Lavender => "lavender",
            Self::Pink => "pink",
            Self::Rose => "rose",
            Self::Peach => "peach",
            Self::Yellow => "yellow",
            Self::Mint => "mint",
            Self::Coral => "coral",
            Self::Sky => "sky",
            Self::Lilac => "lilac",
            Self::Lime => "lime",
        }
    }

    /// CSS custom property holding the chip background.
    pub fn css_var(self) -> String {
        format!("var(--tag-{})", self.class_name())
    }
}

/// Returns the palette slot index for one tag.
pub fn color_index(tag: &str) -> usize {
    let normalized = tag.to_lowercase();
    // wraps at u32; long tags map to different slots than an unbounded hash
    let hash = normalized.encode_utf16().fold(0u32, |acc, unit| {
        acc.wrapping_mul(HASH_MULTIPLIER)
            .wrapping_add(u32::from(unit))
    });
    hash as usize % PALETTE.len()
}

/// Returns the palette color for one tag.
///
/// Always agrees with [`color_index`].
pub fn color_class(tag: &str) -> TagColor {
    PALETTE[color_index(tag)]
}

#[cfg(test)]
mod tests {
    use super::{color_class, color_index, TagColor, PALETTE};

    #[test]
    fn palette_order_matches_enum_discriminants() {
        for (idx, color) in PALETTE.iter().enumerate() {
            assert_eq!(color.index(), idx);
        }
    }

    #[test]
    fn color_index_ignores_case() {
        let lower = color_index("work");
        assert_eq!(color_index("Work"), lower);
        assert_eq!(color_index("WORK"), lower);
        assert_eq!(color_index("wOrK"), lower);
    }

    #[test]
    fn color_index_is_stable_across_calls() {
        let first = color_index("reading-list");
        for _ in 0..10 {
            assert_eq!(color_index("reading-list"), first);
        }
    }

    #[test]
    fn empty_tag_maps_to_first_slot() {
        assert_eq!(color_index(""), 0);
        assert_eq!(color_class(""), TagColor::Blue);
    }

    #[test]
    fn single_char_tag_uses_code_unit_modulo() {
        // 'a' = 97, 97 % 12 = 1
        assert_eq!(color_index("a"), 1);
        assert_eq!(color_class("A"), TagColor::Periwinkle);
    }

    #[test]
    fn hash_wraps_at_u32() {
        // 85_326_605_644 wraps to 3_722_227_020, which is 0 mod 12
        assert_eq!(color_index("hello"), 0);
    }

    #[test]
    fn class_and_index_agree() {
        for tag in ["travel", "Health", "日記", "x", "long tag with spaces"] {
            assert_eq!(color_class(tag).index(), color_index(tag));
        }
    }

    #[test]
    fn css_var_uses_class_name() {
        assert_eq!(TagColor::Mint.css_var(), "var(--tag-mint)");
    }
}
