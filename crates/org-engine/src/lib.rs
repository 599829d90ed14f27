//! Playback engine for the Org sequencer.
//!
//! [`PlaybackState`] holds one loaded song. Calling [`PlaybackState::tick`]
//! once per timer period advances the transport and emits channel commands
//! through a [`VoiceDriver`].

mod control;
mod driver;
pub mod instrument;
mod state;
mod tick;
mod track;

pub use driver::{
    track_channel, CommandLog, VoiceCommand, VoiceDriver, VoiceMask, FIRST_CHANNEL, NUM_VOICES,
};
pub use instrument::{Voice, DRUM_BANK_BASE};
pub use state::{
    PlaybackState, DEFAULT_PAN, DEFAULT_VOLUME, FADE_STEP, INSTRUMENT_BANK_SIZE, MASTER_VOLUME,
};
pub use track::TrackState;
