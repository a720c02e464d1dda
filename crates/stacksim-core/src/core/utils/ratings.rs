use phf::{Map, phf_map};

/// Display metadata attached to a synergy rating. `weight` is the ordinal
/// heat value used by comparison grids (positive = favorable).
#[derive(Debug, PartialEq, Eq)]
pub struct RatingDisplay {
    pub symbol: &'static str,
    pub label: &'static str,
    pub weight: i8,
}

static RATING_DISPLAY: Map<&'static str, RatingDisplay> = phf_map! {
    "excellent" => RatingDisplay { symbol: "✓✓", label: "Excellent Synergy", weight: 2 },
    "good" => RatingDisplay { symbol: "✓", label: "Good Compatibility", weight: 1 },
    "compatible" => RatingDisplay { symbol: "~", label: "Compatible", weight: 0 },
    "caution" => RatingDisplay { symbol: "⚠", label: "Use with Caution", weight: -1 },
    "dangerous" => RatingDisplay { symbol: "✗", label: "Dangerous Combination", weight: -2 },
    "forbidden" => RatingDisplay { symbol: "✗✗", label: "Not Recommended", weight: -3 },
};

static NEUTRAL: RatingDisplay = RatingDisplay {
    symbol: "~",
    label: "Compatible",
    weight: 0,
};

pub fn display_for(rating: &str) -> &'static RatingDisplay {
    RATING_DISPLAY.get(rating).unwrap_or(&NEUTRAL)
}
