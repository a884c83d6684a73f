//! Synthetic hand poses.
//!
//! Builds plausible upright right-hand landmark sets with chosen fingers
//! extended. Used by the keyboard tracker and by tests.

use crate::landmarks::*;

/// Which digits of an upright hand are extended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HandPose {
    /// Index, middle, ring, pinky.
    pub fingers: [bool; 4],
    pub thumb:   bool,
}

// Knuckle row and per-finger x offsets, in normalized image space.
const WRIST_POS:   (f32, f32) = (0.50, 0.80);
const MCP_Y:       f32 = 0.60;
const MCP_X:       [f32; 4] = [0.42, 0.48, 0.54, 0.60];

// Joint heights above (extended) or below (curled) the knuckle row.
const EXTENDED_Y:  [f32; 3] = [0.50, 0.45, 0.40];
const CURLED_Y:    [f32; 3] = [0.52, 0.56, 0.58];

const THUMB_BASE:  [(f32, f32); 3] = [(0.44, 0.75), (0.40, 0.70), (0.37, 0.66)];
const THUMB_OUT:   (f32, f32) = (0.32, 0.60);
const THUMB_IN:    (f32, f32) = (0.44, 0.64);

impl HandPose {
    pub fn open() -> Self {
        HandPose { fingers: [true; 4], thumb: true }
    }

    pub fn fist() -> Self {
        HandPose { fingers: [false; 4], thumb: false }
    }

    /// The first `n` non-thumb fingers extended (index first). `n >= 5`
    /// also extends the thumb.
    pub fn fingers(n: u8) -> Self {
        let mut fingers = [false; 4];
        for (i, f) in fingers.iter_mut().enumerate() {
            *f = (i as u8) < n;
        }
        HandPose { fingers, thumb: n >= 5 }
    }

    pub fn with_thumb(mut self, thumb: bool) -> Self {
        self.thumb = thumb;
        self
    }

    pub fn landmarks(&self) -> HandLandmarkSet {
        let mut hand = [Landmark::default(); LANDMARK_COUNT];
        hand[WRIST] = Landmark::new(WRIST_POS.0, WRIST_POS.1, 0.0);

        for (&(cx, cy), idx) in THUMB_BASE.iter().zip([THUMB_CMC, THUMB_MCP, THUMB_IP]) {
            hand[idx] = Landmark::new(cx, cy, -0.01);
        }
        let (tx, ty) = if self.thumb { THUMB_OUT } else { THUMB_IN };
        hand[THUMB_TIP] = Landmark::new(tx, ty, -0.02);

        let mcps = [INDEX_MCP, MIDDLE_MCP, RING_MCP, PINKY_MCP];
        for (f, &mcp) in mcps.iter().enumerate() {
            let x = MCP_X[f];
            hand[mcp] = Landmark::new(x, MCP_Y, 0.0);
            let ys = if self.fingers[f] { EXTENDED_Y } else { CURLED_Y };
            for (j, &y) in ys.iter().enumerate() {
                // pip, dip, tip follow the mcp in index order
                hand[mcp + 1 + j] = Landmark::new(x, y, -0.01 * (j + 1) as f32);
            }
        }
        hand
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingers_prefix() {
        assert_eq!(HandPose::fingers(2).fingers, [true, true, false, false]);
        assert!(!HandPose::fingers(4).thumb);
        assert_eq!(HandPose::fingers(5), HandPose::open());
        assert_eq!(HandPose::fingers(0), HandPose::fist());
    }

    #[test]
    fn extended_tip_is_above_pip() {
        let hand = HandPose::open().landmarks();
        for &(tip, pip) in FINGER_TIP_PIP.iter() {
            assert!(hand[tip].y < hand[pip].y);
        }
    }
}
