//! Hand tracking from LeapMotion hardware or keyboard simulation.
//!
//! The public interface is [`TrackerEvent`] delivered over a `mpsc` channel.
//! Consumers don't need to know whether landmarks came from real hardware or
//! the keyboard simulator: both produce the same 21-point layout in
//! normalized image space (x right, y down, both roughly 0..1).

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use glyph_field::{HandLandmarkSet, HandPose, Landmark, LANDMARK_COUNT};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ════════════════════════════════════════════════════════════════════════════
// TrackerEvent
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub enum TrackerEvent {
    /// One camera frame. `None` when no hand is in view.
    Landmarks(Option<HandLandmarkSet>),

    /// The tracker cannot continue; the message says why.
    Failed(String),

    /// Quit the application.
    Quit,
}

// ════════════════════════════════════════════════════════════════════════════
// LandmarkSource trait: unified interface for hw and sim
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`TrackerEvent`]s over a channel.
pub trait LandmarkSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<TrackerEvent>);
}

/// Spawn a landmark source on its own thread and return the receiving end.
pub fn spawn_landmark_source<S: LandmarkSource>(source: S) -> Receiver<TrackerEvent> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// SimLandmarkSource: keyboard simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Pose keys sent by the visualizer's window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimKey {
    /// Hold a hand with this many fingers out (`0` = fist).
    Fingers(u8),  // 0–5
    /// Fist with the thumb sticking out.
    FistThumb,    // T
    /// Take the hand out of view.
    NoHand,       // N
    Quit,         // Q / Esc
}

/// Simulated camera: re-emits the held pose at a fixed frame rate, with a
/// little positional noise so downstream code sees jittery input.
pub struct SimLandmarkSource {
    rx:       Receiver<SimKey>,
    held:     Option<HandPose>,
    interval: Duration,
    noise:    f32,
    rng:      StdRng,
}

/// Per-coordinate noise amplitude, in normalized image units.
pub const SIM_NOISE:    f32 = 0.002;
/// Emit interval of the simulated camera.
pub const SIM_FRAME_MS: u64 = 33;

impl SimLandmarkSource {
    pub fn new(rx: Receiver<SimKey>, seed: Option<u64>) -> Self {
        SimLandmarkSource {
            rx,
            held:     None,
            interval: Duration::from_millis(SIM_FRAME_MS),
            noise:    SIM_NOISE,
            rng:      seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64),
        }
    }

    /// Apply one key. Returns false on quit.
    pub fn apply(&mut self, key: SimKey) -> bool {
        self.held = match key {
            SimKey::Fingers(n) => Some(HandPose::fingers(n)),
            SimKey::FistThumb  => Some(HandPose::fist().with_thumb(true)),
            SimKey::NoHand     => None,
            SimKey::Quit       => return false,
        };
        log::debug!("sim hand: {:?}", self.held);
        true
    }

    /// The next camera frame.
    pub fn frame(&mut self) -> Option<HandLandmarkSet> {
        let mut hand = self.held?.landmarks();
        if self.noise > 0.0 {
            let n = self.noise;
            for lm in hand.iter_mut() {
                lm.x += self.rng.gen_range(-n..n);
                lm.y += self.rng.gen_range(-n..n);
                lm.z += self.rng.gen_range(-n..n);
            }
        }
        Some(hand)
    }
}

impl LandmarkSource for SimLandmarkSource {
    fn run(mut self: Box<Self>, tx: Sender<TrackerEvent>) {
        loop {
            // ── drain pending keys ────────────────────────────────────────
            loop {
                match self.rx.try_recv() {
                    Ok(key) => {
                        if !self.apply(key) {
                            let _ = tx.send(TrackerEvent::Quit);
                            return;
                        }
                    }
                    Err(TryRecvError::Empty)        => break,
                    Err(TryRecvError::Disconnected) => return,
                }
            }

            let frame = self.frame();
            if tx.send(TrackerEvent::Landmarks(frame)).is_err() { return; }
            thread::sleep(self.interval);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Millimetre joints → normalized landmarks
// ════════════════════════════════════════════════════════════════════════════

/// Width and height of the interaction box mapped onto 0..1, in mm.
pub const LEAP_SPAN_MM: f32 = 400.0;

/// Map a LeapMotion position (mm, origin on the device, y up) into image
/// space. Height is flipped so a raised fingertip gets a smaller y.
pub fn normalize_mm(p: [f32; 3]) -> Landmark {
    Landmark::new(
        0.5 + p[0] / LEAP_SPAN_MM,
        1.0 - p[1] / LEAP_SPAN_MM,
        p[2] / LEAP_SPAN_MM,
    )
}

/// Convert 21 joints already in landmark order.
pub fn landmarks_from_joints(joints: &[[f32; 3]; LANDMARK_COUNT]) -> HandLandmarkSet {
    std::array::from_fn(|i| normalize_mm(joints[i]))
}

// ════════════════════════════════════════════════════════════════════════════
// LeapLandmarkSource: real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Landmark source backed by a real LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
///
/// Only the first tracked hand is used. Leap bones map onto the 21-point
/// layout as:
///
/// * wrist → base of the middle metacarpal
/// * thumb CMC/MCP/IP/TIP → start of proximal, intermediate, distal; distal tip
/// * finger MCP/PIP/DIP/TIP → start of proximal, intermediate, distal; distal tip
#[cfg(feature = "leap")]
pub struct LeapLandmarkSource;

#[cfg(feature = "leap")]
impl LandmarkSource for LeapLandmarkSource {
    fn run(self: Box<Self>, tx: Sender<TrackerEvent>) {
        use leaprs::*;

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c)  => c,
            Err(e) => {
                let _ = tx.send(TrackerEvent::Failed(format!("LeapC connection: {:?}", e)));
                return;
            }
        };
        if let Err(e) = connection.open() {
            let _ = tx.send(TrackerEvent::Failed(format!("LeapMotion device: {:?}", e)));
            return;
        }
        log::info!("LeapMotion connection open");

        loop {
            let msg = match connection.poll(100) {
                Ok(m)  => m,
                Err(e) => {
                    log::debug!("leap poll: {:?}", e);
                    continue;
                }
            };

            if let Event::Tracking(frame) = msg.event() {
                let hand = frame.hands().next().map(|h| {
                    let joints = hand_joints(&h);
                    landmarks_from_joints(&joints)
                });
                if tx.send(TrackerEvent::Landmarks(hand)).is_err() { return; }
            }
        }
    }
}

#[cfg(feature = "leap")]
fn hand_joints(hand: &leaprs::Hand) -> [[f32; 3]; LANDMARK_COUNT] {
    macro_rules! xyz {
        ($p:expr) => {{ let p = $p; [p.x, p.y, p.z] }};
    }
    let mut joints = [[0.0; 3]; LANDMARK_COUNT];

    // digits come thumb first
    for (d, digit) in hand.digits().enumerate().take(5) {
        let base = 1 + d * 4;
        joints[base]     = xyz!(digit.proximal().prev_joint());
        joints[base + 1] = xyz!(digit.intermediate().prev_joint());
        joints[base + 2] = xyz!(digit.distal().prev_joint());
        joints[base + 3] = xyz!(digit.distal().next_joint());
        if d == 2 {
            joints[glyph_field::landmarks::WRIST] = xyz!(digit.metacarpal().prev_joint());
        }
    }
    joints
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use glyph_field::{classify, GestureSymbol};

    fn sim() -> (Sender<SimKey>, SimLandmarkSource) {
        let (tx, rx) = mpsc::channel();
        (tx, SimLandmarkSource::new(rx, Some(5)))
    }

    fn symbol(hand: &HandLandmarkSet) -> GestureSymbol {
        let c = classify(hand);
        GestureSymbol::resolve(c.count, c.is_fist)
    }

    #[test]
    fn starts_with_no_hand() {
        let (_tx, mut s) = sim();
        assert_eq!(s.frame(), None);
    }

    #[test]
    fn keys_select_poses() {
        let (_tx, mut s) = sim();
        s.apply(SimKey::Fingers(2));
        assert_eq!(symbol(&s.frame().unwrap()), GestureSymbol::Digit(2));
        s.apply(SimKey::Fingers(5));
        assert_eq!(symbol(&s.frame().unwrap()), GestureSymbol::Love);
        s.apply(SimKey::FistThumb);
        assert_eq!(symbol(&s.frame().unwrap()), GestureSymbol::Reset);
        s.apply(SimKey::NoHand);
        assert_eq!(s.frame(), None);
        assert!(!s.apply(SimKey::Quit));
    }

    #[test]
    fn noise_never_changes_the_gesture() {
        let (_tx, mut s) = sim();
        let cases = [
            (SimKey::Fingers(0), GestureSymbol::Reset),
            (SimKey::Fingers(1), GestureSymbol::Digit(1)),
            (SimKey::Fingers(2), GestureSymbol::Digit(2)),
            (SimKey::Fingers(3), GestureSymbol::Digit(3)),
            (SimKey::Fingers(4), GestureSymbol::Ignored),
            (SimKey::Fingers(5), GestureSymbol::Love),
            (SimKey::FistThumb,  GestureSymbol::Reset),
        ];
        for (key, expected) in cases {
            s.apply(key);
            for _ in 0..200 {
                assert_eq!(symbol(&s.frame().unwrap()), expected, "{:?}", key);
            }
        }
    }

    #[test]
    fn frames_are_jittered() {
        let (_tx, mut s) = sim();
        s.apply(SimKey::Fingers(3));
        assert_ne!(s.frame(), s.frame());
    }

    #[test]
    fn run_emits_frames_until_quit() {
        let (key_tx, s) = sim();
        let rx = spawn_landmark_source(s);
        key_tx.send(SimKey::Fingers(1)).unwrap();

        let mut saw_hand = false;
        for _ in 0..20 {
            if let TrackerEvent::Landmarks(Some(_)) = rx.recv().unwrap() {
                saw_hand = true;
                break;
            }
        }
        assert!(saw_hand);

        key_tx.send(SimKey::Quit).unwrap();
        let quit = rx.iter().find(|e| *e == TrackerEvent::Quit);
        assert_eq!(quit, Some(TrackerEvent::Quit));
    }

    #[test]
    fn leap_height_is_flipped() {
        let low  = normalize_mm([0.0, 100.0, 0.0]);
        let high = normalize_mm([0.0, 300.0, 0.0]);
        assert!(high.y < low.y);
        assert_eq!(normalize_mm([0.0, 200.0, 0.0]), Landmark::new(0.5, 0.5, 0.0));
    }

    #[test]
    fn leap_joints_classify_like_camera_landmarks() {
        // an open hand built in millimetres: fingertips high above the knuckles
        let hand = HandPose::open().landmarks();
        let mut joints = [[0.0f32; 3]; LANDMARK_COUNT];
        for (j, lm) in joints.iter_mut().zip(hand.iter()) {
            *j = [
                (lm.x - 0.5) * LEAP_SPAN_MM,
                (1.0 - lm.y) * LEAP_SPAN_MM,
                lm.z * LEAP_SPAN_MM,
            ];
        }
        let back = landmarks_from_joints(&joints);
        assert_eq!(symbol(&back), GestureSymbol::Love);
    }
}
