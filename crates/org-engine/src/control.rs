//! Accessors for the UI and the scheduler.

use core::time::Duration;

use org_ir::{Note, NUM_TRACKS};

use crate::driver::{VoiceDriver, VoiceMask};
use crate::state::PlaybackState;
use crate::track::TrackState;

impl PlaybackState {
    /// Milliseconds per tick from the song header.
    pub fn wait(&self) -> u16 {
        self.header.wait
    }

    /// Timer period the song expects.
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.header.wait.max(1) as u64)
    }

    /// Current transport position.
    pub fn position(&self) -> i32 {
        self.position
    }

    /// Bit `i` set = track `i` muted.
    pub fn mute_mask(&self) -> u16 {
        self.tracks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.muted)
            .fold(0, |mask, (i, _)| mask | (1 << i))
    }

    /// Replace the mute mask and key off every channel in it.
    /// Returns the previous mask.
    pub fn set_mute_mask<D: VoiceDriver + ?Sized>(&mut self, mask: u16, voices: &mut D) -> u16 {
        let old = self.mute_mask();
        for (i, track) in self.tracks.iter_mut().enumerate() {
            track.muted = mask & (1 << i) != 0;
        }
        voices.key_off(VoiceMask::from_tracks(mask));
        old
    }

    /// Flip one track's mute flag. Returns whether it is now muted, or
    /// `None` for a track index past the last track.
    pub fn toggle_mute<D: VoiceDriver + ?Sized>(
        &mut self,
        track: usize,
        voices: &mut D,
    ) -> Option<bool> {
        if track >= NUM_TRACKS {
            return None;
        }
        let mask = self.mute_mask() ^ (1 << track);
        self.set_mute_mask(mask, voices);
        Some(self.tracks[track].muted)
    }

    pub fn track(&self, track: usize) -> Option<&TrackState> {
        self.tracks.get(track)
    }

    pub fn tracks(&self) -> &[TrackState; NUM_TRACKS] {
        &self.tracks
    }

    /// All notes of a track. Empty for unknown tracks.
    pub fn track_notes(&self, track: usize) -> &[Note] {
        self.tracks.get(track).map(|t| t.notes()).unwrap_or_default()
    }

    /// The next note a track will fire.
    pub fn track_cursor(&self, track: usize) -> Option<&Note> {
        self.tracks.get(track)?.cursor()
    }

    pub fn freq_shift(&self) -> i32 {
        self.freq_shift
    }

    pub fn set_freq_shift(&mut self, shift: i32) {
        self.freq_shift = shift;
    }

    /// Start lowering the master volume every tick.
    pub fn start_fadeout(&mut self) {
        self.fadeout = true;
    }

    pub fn is_fading(&self) -> bool {
        self.fadeout
    }

    pub fn master_volume(&self) -> i32 {
        self.master_volume
    }

    pub fn default_pan(&self) -> u8 {
        self.default_pan
    }

    pub fn default_volume(&self) -> u8 {
        self.default_volume
    }
}
