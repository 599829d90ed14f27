//! Sound channel driver backends for the Org sequencer.

mod ring_backend;
mod voice_table;

pub use ring_backend::{RingVoices, VoiceReceiver, BATCH_CAPACITY};
pub use voice_table::{VoiceRegs, VoiceTable, SOUND_RAM_SIZE};
