//! Movement and rotation intents.
//!
//! The input side flips bits in an [`InputState`] on press and release. The
//! render thread takes one [`Intents`] snapshot at the top of every tick, so a
//! tick never sees a half-applied set of keys.

use std::sync::atomic::{AtomicU16, Ordering};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Intent {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
    TiltUp,
    TiltDown,
    RotateLeft,
    RotateRight,
}

impl Intent {
    pub const ALL: [Intent; 10] = [
        Intent::Forward,
        Intent::Backward,
        Intent::Left,
        Intent::Right,
        Intent::Up,
        Intent::Down,
        Intent::TiltUp,
        Intent::TiltDown,
        Intent::RotateLeft,
        Intent::RotateRight,
    ];

    const fn bit(self) -> u16 {
        1 << self as u16
    }
}

/// A set of intents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Intents(u16);

impl Intents {
    pub const NONE: Intents = Intents(0);

    pub fn contains(self, intent: Intent) -> bool {
        self.0 & intent.bit() != 0
    }

    pub fn set(&mut self, intent: Intent, active: bool) {
        if active {
            self.0 |= intent.bit();
        } else {
            self.0 &= !intent.bit();
        }
    }

    pub fn with(mut self, intent: Intent) -> Self {
        self.set(intent, true);
        self
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl FromIterator<Intent> for Intents {
    fn from_iter<I: IntoIterator<Item = Intent>>(iter: I) -> Self {
        iter.into_iter().fold(Intents::NONE, Intents::with)
    }
}

/// Intent flags shared between an input thread and the render thread.
#[derive(Debug, Default)]
pub struct InputState {
    bits: AtomicU16,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&self, intent: Intent) {
        self.bits.fetch_or(intent.bit(), Ordering::Release);
    }

    pub fn release(&self, intent: Intent) {
        self.bits.fetch_and(!intent.bit(), Ordering::Release);
    }

    pub fn set(&self, intent: Intent, active: bool) {
        if active {
            self.press(intent);
        } else {
            self.release(intent);
        }
    }

    pub fn clear(&self) {
        self.bits.store(0, Ordering::Release);
    }

    pub fn snapshot(&self) -> Intents {
        Intents(self.bits.load(Ordering::Acquire))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn every_intent_has_its_own_bit() {
        let all: Intents = Intent::ALL.into_iter().collect();
        for intent in Intent::ALL {
            assert!(all.contains(intent));
            let mut one = Intents::NONE;
            one.set(intent, true);
            for other in Intent::ALL {
                assert_eq!(one.contains(other), other == intent);
            }
        }
    }

    #[test]
    fn press_and_release() {
        let state = InputState::new();
        state.press(Intent::Forward);
        state.press(Intent::RotateLeft);
        state.release(Intent::Forward);
        let snap = state.snapshot();
        assert!(!snap.contains(Intent::Forward));
        assert!(snap.contains(Intent::RotateLeft));
        state.clear();
        assert!(state.snapshot().is_empty());
    }

    #[test]
    fn snapshot_sees_presses_from_another_thread() {
        let state = Arc::new(InputState::new());
        let writer = Arc::clone(&state);
        thread::spawn(move || writer.set(Intent::TiltDown, true))
            .join()
            .unwrap();
        assert_eq!(state.snapshot(), Intents::NONE.with(Intent::TiltDown));
    }
}
