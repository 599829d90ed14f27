//! The per-tick state machine.

use org_ir::{Note, TrackKind, NUM_TRACKS};

use crate::driver::{track_channel, VoiceDriver, VoiceMask};
use crate::instrument::{hw_volume, pan_to_hw, resolve_drum, resolve_melodic};
use crate::state::{PlaybackState, FADE_STEP};
use crate::track::TrackState;

impl PlaybackState {
    /// Advance playback by one tick.
    ///
    /// Fires due notes, runs melodic sustain, pushes volumes, applies the
    /// tick's key-offs then key-ons, and moves the transport, wrapping to the
    /// repeat position at the song end. Never allocates and never fails.
    pub fn tick<D: VoiceDriver + ?Sized>(&mut self, voices: &mut D) {
        if self.fadeout && self.master_volume > 0 {
            self.master_volume = (self.master_volume - FADE_STEP).max(0);
        }

        let mut key_on = VoiceMask::empty();
        let mut key_off = VoiceMask::empty();

        for track in 0..NUM_TRACKS {
            let channel = track_channel(track);
            let kind = TrackKind::of(track);
            let state = &mut self.tracks[track];

            if let Some(note) = state.take_due(self.position) {
                if let (false, Some(key)) = (state.muted, note.key()) {
                    let voice = match kind {
                        TrackKind::Melodic => {
                            let freq_mod = self.header.tracks[track].freq;
                            self.inst_bank.as_ref().and_then(|bank| {
                                resolve_melodic(track, key, freq_mod, self.freq_shift, bank)
                            })
                        }
                        TrackKind::Percussion => resolve_drum(track, key, &self.drum_bank),
                    };
                    if let Some(voice) = voice {
                        voices.set_addr(channel, voice.addr);
                        voices.set_freq(channel, voice.freq);
                        key_on.insert(channel);
                    }
                    // Drums play their sample out and never sustain
                    if kind == TrackKind::Melodic {
                        state.last_key = Some(key);
                        state.sustain = note.len as u32;
                    }
                }
                apply_columns(state, &note, channel, voices);
            }

            if kind == TrackKind::Melodic {
                if state.sustain == 0 {
                    if state.last_key.take().is_some() {
                        key_off.insert(channel);
                    }
                } else {
                    state.sustain -= 1;
                }
            }

            if state.cursor_index().is_some() {
                voices.set_volume(channel, hw_volume(state.volume, self.master_volume));
            }
        }

        voices.flush();
        if !key_off.is_empty() {
            voices.key_off(key_off);
        }
        if !key_on.is_empty() {
            voices.key_on(key_on);
        }

        self.position += 1;
        if self.position >= self.header.end_x {
            self.restart_from(self.header.repeat_x);
        }
    }
}

/// Apply a fired note's pan and volume columns.
fn apply_columns<D: VoiceDriver + ?Sized>(
    state: &mut TrackState,
    note: &Note,
    channel: u8,
    voices: &mut D,
) {
    if let Some(pan) = note.pan() {
        voices.set_pan(channel, pan_to_hw(pan));
    }
    if let Some(vol) = note.vol() {
        state.volume = vol;
    }
}
