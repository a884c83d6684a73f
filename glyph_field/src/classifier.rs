//! Finger counting and fist detection.
//!
//! The two results are computed independently and can disagree: four curled
//! fingers with the thumb out gives `count == 1` *and* `is_fist == true`.
//! Callers resolve that by letting the fist win.

use crate::landmarks::{HandLandmarkSet, FINGER_TIP_PIP, INDEX_MCP, THUMB_IP, THUMB_TIP};

/// Thumb tip must be this much farther from the index MCP than the thumb IP.
pub const THUMB_EXTENSION_RATIO: f32 = 1.1;

/// Curled non-thumb fingers needed for a fist.
pub const FIST_MIN_CURLED: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Classification {
    /// Extended fingers, thumb included (0–5).
    pub count:   u8,
    pub is_fist: bool,
}

/// Classify one hand.
pub fn classify(hand: &HandLandmarkSet) -> Classification {
    let extended = FINGER_TIP_PIP.iter()
        .filter(|&&(tip, pip)| hand[tip].y < hand[pip].y)
        .count() as u8;

    let thumb = thumb_extended(hand) as u8;

    Classification {
        count:   extended + thumb,
        is_fist: curled_fingers(hand) >= FIST_MIN_CURLED,
    }
}

/// Thumb test, independent of hand side: an extended thumb tip sits well
/// away from the index knuckle compared to its own IP joint.
pub fn thumb_extended(hand: &HandLandmarkSet) -> bool {
    let anchor = &hand[INDEX_MCP];
    let tip = hand[THUMB_TIP].planar_distance(anchor);
    let ip  = hand[THUMB_IP].planar_distance(anchor);
    tip > ip * THUMB_EXTENSION_RATIO
}

/// Non-thumb fingers whose tip is below the PIP joint.
pub fn curled_fingers(hand: &HandLandmarkSet) -> usize {
    FINGER_TIP_PIP.iter()
        .filter(|&&(tip, pip)| hand[tip].y > hand[pip].y)
        .count()
}
