//! Song lifecycle: load, unload, restart.

use org_formats::{AssetError, LoadError};
use org_ir::{OrgSong, SampleBank, SongHeader, MELODIC_TRACKS, NUM_OCTAVES, NUM_TRACKS};

use crate::track::TrackState;

/// Master volume after a load.
pub const MASTER_VOLUME: i32 = 100;
/// Master volume lost per tick while fading out.
pub const FADE_STEP: i32 = 2;
/// Track volume before the first volume note.
pub const DEFAULT_VOLUME: u8 = 200;
/// Center pan position.
pub const DEFAULT_PAN: u8 = 6;
/// Samples an instrument bank must hold: one per octave per melodic track.
pub const INSTRUMENT_BANK_SIZE: usize = MELODIC_TRACKS * NUM_OCTAVES;

/// The sequencer's complete state for one song.
///
/// Owned by whoever drives the timer; `tick` and the control surface take
/// it by reference.
#[derive(Debug)]
pub struct PlaybackState {
    pub(crate) header: SongHeader,
    pub(crate) tracks: [TrackState; NUM_TRACKS],
    /// Transport position in ticks
    pub(crate) position: i32,
    /// 0-100
    pub(crate) master_volume: i32,
    pub(crate) fadeout: bool,
    /// Added to every melodic frequency
    pub(crate) freq_shift: i32,
    pub(crate) default_pan: u8,
    pub(crate) default_volume: u8,
    pub(crate) inst_bank: Option<SampleBank>,
    pub(crate) drum_bank: SampleBank,
}

impl PlaybackState {
    /// Create an empty state. `drum_bank` stays attached for the lifetime
    /// of the state.
    pub fn new(drum_bank: SampleBank) -> Self {
        Self {
            header: SongHeader::default(),
            tracks: Default::default(),
            position: 0,
            master_volume: MASTER_VOLUME,
            fadeout: false,
            freq_shift: 0,
            default_pan: DEFAULT_PAN,
            default_volume: DEFAULT_VOLUME,
            inst_bank: None,
            drum_bank,
        }
    }

    /// Replace the current song.
    ///
    /// The bank must hold exactly [`INSTRUMENT_BANK_SIZE`] samples. On error
    /// the previous song stays loaded.
    pub fn load(&mut self, song: OrgSong, inst_bank: SampleBank) -> Result<(), LoadError> {
        if inst_bank.len() != INSTRUMENT_BANK_SIZE {
            return Err(AssetError::SampleCountMismatch {
                expected: INSTRUMENT_BANK_SIZE,
                found: inst_bank.len(),
            }
            .into());
        }

        self.unload();

        let OrgSong { header, tracks } = song;
        self.header = header;
        for (state, notes) in self.tracks.iter_mut().zip(tracks) {
            let muted = state.muted;
            *state = TrackState::new(notes);
            state.muted = muted;
            state.volume = self.default_volume;
        }
        self.inst_bank = Some(inst_bank);
        self.master_volume = MASTER_VOLUME;
        self.fadeout = false;

        self.restart_from(0);

        tracing::info!(
            wait = self.header.wait,
            end_x = self.header.end_x,
            "song loaded"
        );
        Ok(())
    }

    /// Release the song's notes and instrument bank. No-op when empty.
    pub fn unload(&mut self) {
        if !self.is_loaded() {
            return;
        }
        self.inst_bank = None;
        for state in &mut self.tracks {
            let muted = state.muted;
            *state = TrackState::default();
            state.muted = muted;
        }
        self.header = SongHeader::default();
        self.position = 0;
        tracing::info!("song unloaded");
    }

    /// Move the transport to `pos` and re-derive every cursor.
    ///
    /// Positions outside the song are clamped to `0..end_x`.
    pub fn restart_from(&mut self, pos: i32) {
        let pos = pos.clamp(0, (self.header.end_x - 1).max(0));
        self.position = pos;
        for track in &mut self.tracks {
            track.seek(pos);
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.inst_bank.is_some()
    }

    pub fn header(&self) -> &SongHeader {
        &self.header
    }

    pub fn drum_bank(&self) -> &SampleBank {
        &self.drum_bank
    }

    pub fn instrument_bank(&self) -> Option<&SampleBank> {
        self.inst_bank.as_ref()
    }
}
