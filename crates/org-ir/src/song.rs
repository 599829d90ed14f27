//! Song header and track containers.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::note::Note;

/// Total tracks in every song.
pub const NUM_TRACKS: usize = 16;
/// Tracks `0..MELODIC_TRACKS` are melodic.
pub const MELODIC_TRACKS: usize = 8;
/// Octaves per melodic instrument in an instrument bank.
pub const NUM_OCTAVES: usize = 8;
/// Neutral frequency modifier.
pub const DEFAULT_FREQ: u16 = 1000;

/// How a track's notes are voiced. Depends only on the track index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackKind {
    Melodic,
    Percussion,
}

impl TrackKind {
    pub const fn of(track: usize) -> Self {
        if track < MELODIC_TRACKS {
            TrackKind::Melodic
        } else {
            TrackKind::Percussion
        }
    }
}

/// Per-track header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrackHeader {
    /// Frequency modifier, 1000 = no change
    pub freq: u16,
    /// Waveform index (informational; the bank is indexed by track)
    pub wave_no: u8,
    /// Loop flag ("pipi"), always false for version 1 songs
    pub looping: bool,
    /// Number of notes on the track
    pub note_count: u16,
}

impl Default for TrackHeader {
    fn default() -> Self {
        Self {
            freq: DEFAULT_FREQ,
            wave_no: 0,
            looping: false,
            note_count: 0,
        }
    }
}

/// Song-wide header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SongHeader {
    /// Milliseconds per tick
    pub wait: u16,
    /// Ticks per beat (display only)
    pub line: u8,
    /// Beats per bar (display only)
    pub dot: u8,
    /// Loop target position
    pub repeat_x: i32,
    /// Song end; reaching it jumps to `repeat_x`
    pub end_x: i32,
    pub tracks: [TrackHeader; NUM_TRACKS],
}

impl Default for SongHeader {
    fn default() -> Self {
        let line = 4;
        Self {
            wait: 128,
            line,
            dot: 4,
            repeat_x: 0,
            end_x: line as i32 * 255,
            tracks: [TrackHeader::default(); NUM_TRACKS],
        }
    }
}

/// A decoded song: header plus one note array per track.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrgSong {
    pub header: SongHeader,
    pub tracks: [Box<[Note]>; NUM_TRACKS],
}

impl OrgSong {
    /// Create an empty song with the given header. Note counts are reset.
    pub fn new(mut header: SongHeader) -> Self {
        for track in &mut header.tracks {
            track.note_count = 0;
        }
        Self {
            header,
            tracks: Default::default(),
        }
    }

    /// Replace a track's notes, keeping the header's note count in sync.
    ///
    /// Tracks hold at most `u16::MAX` notes; any excess is dropped.
    pub fn set_track(&mut self, track: usize, mut notes: Vec<Note>) {
        notes.truncate(u16::MAX as usize);
        self.header.tracks[track].note_count = notes.len() as u16;
        self.tracks[track] = notes.into_boxed_slice();
    }

    /// Total number of notes across all tracks.
    pub fn note_count(&self) -> usize {
        self.tracks.iter().map(|t| t.len()).sum()
    }
}
