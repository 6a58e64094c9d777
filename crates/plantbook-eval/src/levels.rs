//! Qualitative tags for light and soil moisture ranges.
//!
//! Each ladder is an ordered table of `(inclusive upper bound, label)` rows
//! evaluated top-down against the integer-truncated midpoint of a range; a
//! value above every row gets the ladder's `top` label.

use plantbook_core::types::Bounds;

#[derive(Debug, Clone, Copy)]
pub struct Ladder {
    pub tiers: &'static [(i64, &'static str)],
    pub top: &'static str,
}

impl Ladder {
    pub fn classify(&self, value: i64) -> &'static str {
        self.tiers
            .iter()
            .find(|(upto, _)| value <= *upto)
            .map(|(_, label)| *label)
            .unwrap_or(self.top)
    }
}

pub const LIGHT_LADDER: Ladder = Ladder {
    tiers: &[
        (1_999, "Low light - suitable for shade-tolerant plants"),
        (9_999, "Medium indirect light - typical indoor lighting"),
        (24_999, "Bright indirect light - near windows"),
    ],
    top: "Full sun or very bright light - direct sunlight",
};

pub const MOISTURE_LADDER: Ladder = Ladder {
    tiers: &[
        (19, "Dry soil - water sparingly"),
        (39, "Slightly moist - let soil dry between waterings"),
        (59, "Evenly moist - keep soil consistently moist"),
    ],
    top: "Very moist - likes wet conditions",
};

/// Light tag for a lux range
pub fn light_level(range: Bounds<i64>) -> &'static str {
    LIGHT_LADDER.classify(range.midpoint())
}

/// Watering tag for a soil moisture range
pub fn moisture_level(range: Bounds<i64>) -> &'static str {
    MOISTURE_LADDER.classify(range.midpoint())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_boundaries() {
        let cases = [
            (1_999, "Low light"),
            (2_000, "Medium indirect light"),
            (9_999, "Medium indirect light"),
            (10_000, "Bright indirect light"),
            (24_999, "Bright indirect light"),
            (25_000, "Full sun"),
        ];
        for (midpoint, prefix) in cases {
            let label = LIGHT_LADDER.classify(midpoint);
            assert!(label.starts_with(prefix), "{midpoint}: got {label:?}");
        }
    }

    #[test]
    fn moisture_boundaries() {
        let cases = [
            (19, "water sparingly"),
            (20, "let soil dry between waterings"),
            (39, "let soil dry between waterings"),
            (40, "keep soil consistently moist"),
            (59, "keep soil consistently moist"),
            (60, "likes wet conditions"),
        ];
        for (midpoint, suffix) in cases {
            let label = MOISTURE_LADDER.classify(midpoint);
            assert!(label.ends_with(suffix), "{midpoint}: got {label:?}");
        }
    }

    #[test]
    fn light_level_uses_midpoint() {
        let cases = [
            (100, 500, "Low light - suitable for shade-tolerant plants"),
            (600, 900, "Low light - suitable for shade-tolerant plants"),
            (1_500, 3_000, "Medium indirect light - typical indoor lighting"),
            (3_500, 5_000, "Medium indirect light - typical indoor lighting"),
            (8_000, 12_000, "Bright indirect light - near windows"),
            (20_000, 80_000, "Full sun or very bright light - direct sunlight"),
        ];
        for (min, max, expected) in cases {
            assert_eq!(light_level(Bounds { min, max }), expected, "{min}-{max}");
        }
    }

    #[test]
    fn moisture_level_uses_truncated_midpoint() {
        // (19 + 20) / 2 truncates to 19
        assert_eq!(
            moisture_level(Bounds { min: 19, max: 20 }),
            "Dry soil - water sparingly"
        );
        assert_eq!(
            moisture_level(Bounds { min: 85, max: 95 }),
            "Very moist - likes wet conditions"
        );
    }
}
