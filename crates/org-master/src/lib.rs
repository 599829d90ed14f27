//! Headless controller for the Org sequencer.
//!
//! Owns the playback state, resolves songs and banks by name, and runs the
//! tick thread. Both the CLI and any front end share this API.

mod assets;
mod ticker;

use std::sync::Arc;

use org_engine::{PlaybackState, VoiceDriver, VoiceMask, INSTRUMENT_BANK_SIZE};
use org_formats::{read_bank, read_org};
use org_voices::{RingVoices, VoiceReceiver};
use parking_lot::Mutex;

use ticker::Ticker;

// Re-export common types so callers don't need the lower crates directly.
pub use assets::{AssetSource, DirAssets, MemoryAssets, PERCUSSION_BANK};
pub use org_engine::{CommandLog, VoiceCommand};
pub use org_formats::{AssetError, FormatError, LoadError};
pub use org_ir::{Note, SampleBank, SongHeader};
pub use org_voices::VoiceTable;

/// Voice commands the ring can hold between drains.
const RING_CAPACITY: usize = 4096;

/// State shared with the tick thread.
pub(crate) struct Playback {
    state: PlaybackState,
    voices: RingVoices,
    /// Overrun count as of the last warning
    reported_overruns: u64,
}

impl Playback {
    pub(crate) fn tick(&mut self) {
        self.state.tick(&mut self.voices);
    }

    /// Warn once per burst of commands lost to a full ring.
    pub(crate) fn report_overruns(&mut self) {
        let total = self.voices.overruns();
        if total > self.reported_overruns {
            tracing::warn!(
                dropped = total - self.reported_overruns,
                total,
                "voice ring full, commands dropped"
            );
            self.reported_overruns = total;
        }
    }
}

/// Headless sequencer controller.
///
/// Every access to the playback state from here takes the same lock the
/// tick thread takes, so multi-field updates are never observed half done.
pub struct Controller<A: AssetSource> {
    assets: A,
    shared: Arc<Mutex<Playback>>,
    receiver: VoiceReceiver,
    ticker: Option<Ticker>,
}

impl<A: AssetSource> Controller<A> {
    /// Create a controller, loading the shared percussion bank.
    pub fn new(assets: A) -> Result<Self, LoadError> {
        let drum_bank = read_bank(&mut assets.open_bank(PERCUSSION_BANK)?)?;
        Ok(Self::with_drum_bank(assets, drum_bank))
    }

    /// Create a controller with an already loaded percussion bank.
    pub fn with_drum_bank(assets: A, drum_bank: SampleBank) -> Self {
        let (voices, receiver) = RingVoices::new(RING_CAPACITY);
        let playback = Playback {
            state: PlaybackState::new(drum_bank),
            voices,
            reported_overruns: 0,
        };
        Self {
            assets,
            shared: Arc::new(Mutex::new(playback)),
            receiver,
            ticker: None,
        }
    }

    pub fn assets(&self) -> &A {
        &self.assets
    }

    pub fn list_songs(&self) -> Result<Vec<String>, LoadError> {
        self.assets.list_songs()
    }

    // --- Song management ---

    /// Load the song and instrument bank called `name`.
    ///
    /// Playback is stopped first and stays stopped. On error the previously
    /// loaded song, if any, is left as it was.
    pub fn load(&mut self, name: &str) -> Result<(), LoadError> {
        self.stop();
        self.load_inner(name).inspect_err(|e| {
            tracing::warn!(name, error = %e, "load failed");
        })
    }

    fn load_inner(&mut self, name: &str) -> Result<(), LoadError> {
        let bank = read_bank(&mut self.assets.open_bank(name)?)?;
        if bank.len() != INSTRUMENT_BANK_SIZE {
            return Err(AssetError::SampleCountMismatch {
                expected: INSTRUMENT_BANK_SIZE,
                found: bank.len(),
            }
            .into());
        }
        let song = read_org(&mut self.assets.open_song(name)?)?;

        self.shared.lock().state.load(song, bank)?;
        tracing::debug!(name, "song assets resolved");
        Ok(())
    }

    /// Write the percussion bank and the loaded instrument bank, if any,
    /// into `driver`'s sound memory. Call after each successful load.
    pub fn upload_banks<D: VoiceDriver + ?Sized>(&self, driver: &mut D) {
        let pb = self.shared.lock();
        driver.upload_bank(pb.state.drum_bank());
        if let Some(bank) = pb.state.instrument_bank() {
            driver.upload_bank(bank);
        }
    }

    /// Stop playback and release the current song.
    pub fn unload(&mut self) {
        self.stop();
        self.shared.lock().state.unload();
    }

    pub fn is_loaded(&self) -> bool {
        self.shared.lock().state.is_loaded()
    }

    // --- Real-time playback ---

    /// Start the tick thread at the song's rate. Does nothing when no song
    /// is loaded or already playing.
    pub fn play(&mut self) {
        if self.ticker.is_some() {
            return;
        }
        let period = {
            let pb = self.shared.lock();
            if !pb.state.is_loaded() {
                return;
            }
            pb.state.tick_period()
        };
        self.ticker = Some(Ticker::spawn(self.shared.clone(), period));
    }

    /// Stop the tick thread and silence every channel.
    pub fn stop(&mut self) {
        if let Some(mut ticker) = self.ticker.take() {
            ticker.stop();
            self.shared.lock().voices.key_off(VoiceMask::ALL);
        }
    }

    pub fn is_playing(&self) -> bool {
        self.ticker.is_some()
    }

    /// Run `ticks` ticks synchronously. Ignored while the tick thread runs.
    pub fn step(&mut self, ticks: u32) {
        if self.ticker.is_some() {
            return;
        }
        let mut pb = self.shared.lock();
        for _ in 0..ticks {
            pb.tick();
        }
        pb.report_overruns();
    }

    /// Voice commands lost because the ring filled up between drains.
    pub fn overruns(&self) -> u64 {
        self.shared.lock().voices.overruns()
    }

    /// Replay the voice commands issued since the last drain on `driver`.
    pub fn drain_voices<D: VoiceDriver + ?Sized>(&mut self, driver: &mut D) -> usize {
        self.receiver.drain_into(driver)
    }

    // --- Control surface ---

    /// Run `f` on a consistent view of the playback state.
    pub fn with_state<R>(&self, f: impl FnOnce(&PlaybackState) -> R) -> R {
        f(&self.shared.lock().state)
    }

    pub fn position(&self) -> i32 {
        self.shared.lock().state.position()
    }

    pub fn wait(&self) -> u16 {
        self.shared.lock().state.wait()
    }

    pub fn mute_mask(&self) -> u16 {
        self.shared.lock().state.mute_mask()
    }

    /// Replace the mute mask, keying off muted channels. Returns the old mask.
    pub fn set_mute_mask(&self, mask: u16) -> u16 {
        let mut pb = self.shared.lock();
        let Playback { state, voices, .. } = &mut *pb;
        state.set_mute_mask(mask, voices)
    }

    /// Flip one track's mute flag. `None` for an unknown track.
    pub fn toggle_mute(&self, track: usize) -> Option<bool> {
        let mut pb = self.shared.lock();
        let Playback { state, voices, .. } = &mut *pb;
        state.toggle_mute(track, voices)
    }

    pub fn freq_shift(&self) -> i32 {
        self.shared.lock().state.freq_shift()
    }

    pub fn set_freq_shift(&self, shift: i32) {
        self.shared.lock().state.set_freq_shift(shift);
    }

    pub fn start_fadeout(&self) {
        self.shared.lock().state.start_fadeout();
    }

    pub fn master_volume(&self) -> i32 {
        self.shared.lock().state.master_volume()
    }

    /// A track's next note and its note count.
    pub fn track_cursor(&self, track: usize) -> (Option<Note>, usize) {
        let pb = self.shared.lock();
        (
            pb.state.track_cursor(track).copied(),
            pb.state.track_notes(track).len(),
        )
    }
}

impl<A: AssetSource> Drop for Controller<A> {
    fn drop(&mut self) {
        self.stop();
    }
}
