//! Per-track playback state.

use org_ir::Note;

use crate::state::DEFAULT_VOLUME;

/// Playback state for one track.
#[derive(Clone, Debug)]
pub struct TrackState {
    /// Notes in stored order
    notes: Box<[Note]>,
    /// Index of the next note to fire, `None` once exhausted
    cursor: Option<usize>,
    /// Current volume (0-254)
    pub(crate) volume: u8,
    /// Ticks left before a melodic key-off
    pub(crate) sustain: u32,
    pub(crate) muted: bool,
    /// Key currently sounding on a melodic track
    pub(crate) last_key: Option<u8>,
}

impl Default for TrackState {
    fn default() -> Self {
        Self::new(Box::default())
    }
}

impl TrackState {
    pub fn new(notes: Box<[Note]>) -> Self {
        Self {
            notes,
            cursor: None,
            volume: DEFAULT_VOLUME,
            sustain: 0,
            muted: false,
            last_key: None,
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// The next note to fire.
    pub fn cursor(&self) -> Option<&Note> {
        self.cursor.and_then(|i| self.notes.get(i))
    }

    pub fn cursor_index(&self) -> Option<usize> {
        self.cursor
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn sustain(&self) -> u32 {
        self.sustain
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Whether a melodic note is sounding.
    pub fn is_sounding(&self) -> bool {
        self.last_key.is_some()
    }

    /// Point the cursor at the first stored note at or after `pos`.
    ///
    /// A plain linear scan in stored order: unsorted tracks get the first
    /// match, not the earliest position.
    pub fn seek(&mut self, pos: i32) {
        self.cursor = self.notes.iter().position(|n| n.pos >= pos);
    }

    /// Pop the cursor note if it fires at `pos`.
    pub(crate) fn take_due(&mut self, pos: i32) -> Option<Note> {
        let note = *self.cursor()?;
        if note.pos != pos {
            return None;
        }
        self.cursor = self.cursor.map(|i| i + 1).filter(|&i| i < self.notes.len());
        Some(note)
    }
}
