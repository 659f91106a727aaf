use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::note::{self, ActiveNote, NoteEvent};

pub const DEFAULT_HISTORY_LEN: usize = 5;

#[derive(Debug, Default)]
struct Inner {
    active: Option<ActiveNote>,
    history: VecDeque<String>,
}

/// Point-in-time copy of the note state, history most-recent-first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub history: Vec<String>,
    pub active: Option<ActiveNote>,
}

/// The sounding note and recent history, shared between the MIDI side and
/// the display. Both fields sit behind one lock so readers never see one
/// updated without the other.
#[derive(Debug)]
pub struct NoteState {
    inner: Mutex<Inner>,
    history_len: usize,
}

impl Default for NoteState {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LEN)
    }
}

impl NoteState {
    pub fn new(history_len: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                active: None,
                history: VecDeque::new(),
            }),
            history_len,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Inner is plain data; a panicked writer can't leave it half-built.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Zero velocity is ignored rather than treated as a note-off.
    pub fn note_on(&self, midi: u8, velocity: u8) {
        if velocity == 0 {
            return;
        }
        let name = note::display_name(midi);

        let mut inner = self.lock();
        inner.history.push_front(name);
        inner.history.truncate(self.history_len);
        inner.active = Some(ActiveNote { midi, velocity });
    }

    pub fn note_off(&self, midi: u8) {
        let mut inner = self.lock();
        if inner.active.is_some_and(|n| n.midi == midi) {
            inner.active = None;
        }
    }

    pub fn apply(&self, event: NoteEvent) {
        match event {
            NoteEvent::NoteOn { key, velocity, .. } => self.note_on(key, velocity),
            NoteEvent::NoteOff { key, .. } => self.note_off(key),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let inner = self.lock();
        Snapshot {
            history: inner.history.iter().cloned().collect(),
            active: inner.active,
        }
    }
}
