//! Disaster severity lookup for receipts.
//!
//! Scale is 0–100, higher means the destination needs the delivery more
//! urgently.

/// Score for no disaster, or one we do not recognize.
pub const BASELINE_HARM_SCORE: u8 = 10;

/// Known disaster types and their scores.
pub const DISASTER_SCORES: &[(&str, u8)] = &[
    ("earthquake", 95),
    ("flood", 90),
    ("cyclone", 85),
    ("landslide", 80),
    ("storm", 70),
];

/// Harm score for a disaster type. Case-insensitive, surrounding whitespace
/// ignored; anything unknown gets [`BASELINE_HARM_SCORE`].
pub fn severity(disaster_type: Option<&str>) -> u8 {
    let Some(raw) = disaster_type else {
        return BASELINE_HARM_SCORE;
    };
    let normalized = raw.trim().to_lowercase();
    DISASTER_SCORES
        .iter()
        .find(|(name, _)| *name == normalized)
        .map(|(_, score)| *score)
        .unwrap_or(BASELINE_HARM_SCORE)
}
