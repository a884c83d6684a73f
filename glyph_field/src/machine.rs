//! Gesture state machine.
//!
//! | Classifier output            | Symbol      |
//! |---|---|
//! | fist, or zero fingers        | `Reset`     |
//! | five fingers                 | `Love`      |
//! | one to three fingers         | `Digit(n)`  |
//! | anything else (four fingers) | `Ignored`   |
//!
//! `Ignored` never becomes the current state; it leaves whatever is on
//! screen in place. A symbol equal to the current one is dropped, so a held
//! gesture only triggers one transition.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GestureSymbol {
    Reset,
    Digit(u8),
    Love,
    Ignored,
}

impl GestureSymbol {
    /// Map a finger count and fist flag to a symbol. The fist wins over
    /// any count.
    pub fn resolve(count: u8, is_fist: bool) -> Self {
        match (is_fist, count) {
            (true, _) | (_, 0) => GestureSymbol::Reset,
            (_, 5)             => GestureSymbol::Love,
            (_, n @ 1..=3)     => GestureSymbol::Digit(n),
            _                  => GestureSymbol::Ignored,
        }
    }
}

impl fmt::Display for GestureSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GestureSymbol::Reset    => write!(f, "RESET"),
            GestureSymbol::Digit(n) => write!(f, "{}", n),
            GestureSymbol::Love     => write!(f, "LOVE"),
            GestureSymbol::Ignored  => write!(f, "IGNORED"),
        }
    }
}

/// Remembers the last accepted symbol.
#[derive(Clone, Debug, Default)]
pub struct GestureMachine {
    last: Option<GestureSymbol>,
}

impl GestureMachine {
    pub fn new() -> Self {
        GestureMachine::default()
    }

    /// Feed one classification. Returns the symbol to transition to, or
    /// `None` when it is ignored or already current.
    pub fn ingest(&mut self, count: u8, is_fist: bool) -> Option<GestureSymbol> {
        let candidate = GestureSymbol::resolve(count, is_fist);
        if candidate == GestureSymbol::Ignored || self.last == Some(candidate) {
            return None;
        }
        self.last = Some(candidate);
        Some(candidate)
    }

    pub fn last(&self) -> Option<GestureSymbol> { self.last }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_table() {
        assert_eq!(GestureSymbol::resolve(0, false), GestureSymbol::Reset);
        assert_eq!(GestureSymbol::resolve(1, false), GestureSymbol::Digit(1));
        assert_eq!(GestureSymbol::resolve(2, false), GestureSymbol::Digit(2));
        assert_eq!(GestureSymbol::resolve(3, false), GestureSymbol::Digit(3));
        assert_eq!(GestureSymbol::resolve(4, false), GestureSymbol::Ignored);
        assert_eq!(GestureSymbol::resolve(5, false), GestureSymbol::Love);
        assert_eq!(GestureSymbol::resolve(9, false), GestureSymbol::Ignored);
    }

    #[test]
    fn fist_overrides_count() {
        for n in 0..=5 {
            assert_eq!(GestureSymbol::resolve(n, true), GestureSymbol::Reset);
        }
    }

    #[test]
    fn first_reset_is_accepted() {
        let mut m = GestureMachine::new();
        assert_eq!(m.last(), None);
        assert_eq!(m.ingest(0, true), Some(GestureSymbol::Reset));
    }

    #[test]
    fn repeat_is_deduped() {
        let mut m = GestureMachine::new();
        assert_eq!(m.ingest(2, false), Some(GestureSymbol::Digit(2)));
        assert_eq!(m.ingest(2, false), None);
        assert_eq!(m.ingest(3, false), Some(GestureSymbol::Digit(3)));
    }

    #[test]
    fn ignored_keeps_state() {
        let mut m = GestureMachine::new();
        m.ingest(5, false);
        assert_eq!(m.ingest(4, false), None);
        assert_eq!(m.last(), Some(GestureSymbol::Love));
        // returning to the held symbol after an ignored frame is still a repeat
        assert_eq!(m.ingest(5, false), None);
    }

    #[test]
    fn display_names() {
        assert_eq!(GestureSymbol::Reset.to_string(), "RESET");
        assert_eq!(GestureSymbol::Digit(3).to_string(), "3");
        assert_eq!(GestureSymbol::Love.to_string(), "LOVE");
    }
}
