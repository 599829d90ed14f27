//! Sound channel driver seam.
//!
//! The engine never touches hardware directly. Every register write goes
//! through [`VoiceDriver`], and key-on/key-off are batched into one
//! [`VoiceMask`] each per tick.

use org_ir::SampleBank;

/// Hardware channel driven by track 0. Lower channels belong to the host.
pub const FIRST_CHANNEL: u8 = 8;
/// Number of hardware channels.
pub const NUM_VOICES: u8 = 24;

/// Hardware channel for a track.
pub const fn track_channel(track: usize) -> u8 {
    FIRST_CHANNEL + track as u8
}

/// A set of hardware channels, bit `n` = channel `n`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct VoiceMask(pub u32);

impl VoiceMask {
    /// Every hardware channel.
    pub const ALL: Self = Self((1 << NUM_VOICES) - 1);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn channel(channel: u8) -> Self {
        Self(1 << channel)
    }

    /// Channels for a track bitmask (bit `i` = track `i`).
    pub const fn from_tracks(tracks: u16) -> Self {
        Self((tracks as u32) << FIRST_CHANNEL)
    }

    pub fn insert(&mut self, channel: u8) {
        self.0 |= 1 << channel;
    }

    pub const fn contains(self, channel: u8) -> bool {
        self.0 & (1 << channel) != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Iterate the channel numbers in the mask, lowest first.
    pub fn channels(self) -> impl Iterator<Item = u8> {
        (0..32u8).filter(move |&ch| self.contains(ch))
    }
}

/// Hardware operations the engine issues.
///
/// Register writes may be buffered by the implementation until
/// [`VoiceDriver::flush`]. Key-off and key-on take effect in call order.
pub trait VoiceDriver {
    /// Set a channel's sample start address.
    fn set_addr(&mut self, channel: u8, addr: u32);

    /// Set a channel's playback frequency.
    fn set_freq(&mut self, channel: u8, freq: u32);

    /// Set a channel's volume.
    fn set_volume(&mut self, channel: u8, volume: u16);

    /// Set a channel's stereo pan (-256 = left, 256 = right).
    fn set_pan(&mut self, channel: u8, pan: i16);

    /// Commit buffered register writes.
    fn flush(&mut self) {}

    /// Stop every channel in the mask.
    fn key_off(&mut self, mask: VoiceMask);

    /// Start every channel in the mask.
    fn key_on(&mut self, mask: VoiceMask);

    /// Make a bank's sample data available at its addresses.
    fn upload_bank(&mut self, _bank: &SampleBank) {}
}

/// One driver call, as data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoiceCommand {
    SetAddr { channel: u8, addr: u32 },
    SetFreq { channel: u8, freq: u32 },
    SetVolume { channel: u8, volume: u16 },
    SetPan { channel: u8, pan: i16 },
    Flush,
    KeyOff(VoiceMask),
    KeyOn(VoiceMask),
}

impl VoiceCommand {
    /// Replay this command on a driver.
    pub fn apply<D: VoiceDriver + ?Sized>(self, driver: &mut D) {
        match self {
            VoiceCommand::SetAddr { channel, addr } => driver.set_addr(channel, addr),
            VoiceCommand::SetFreq { channel, freq } => driver.set_freq(channel, freq),
            VoiceCommand::SetVolume { channel, volume } => driver.set_volume(channel, volume),
            VoiceCommand::SetPan { channel, pan } => driver.set_pan(channel, pan),
            VoiceCommand::Flush => driver.flush(),
            VoiceCommand::KeyOff(mask) => driver.key_off(mask),
            VoiceCommand::KeyOn(mask) => driver.key_on(mask),
        }
    }
}

/// A driver that records every call. Useful for tests and dumps.
#[derive(Clone, Debug, Default)]
pub struct CommandLog {
    pub commands: Vec<VoiceCommand>,
}

impl CommandLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the recorded commands, leaving the log empty.
    pub fn take(&mut self) -> Vec<VoiceCommand> {
        core::mem::take(&mut self.commands)
    }

    /// Union of every key-on mask recorded.
    pub fn keyed_on(&self) -> VoiceMask {
        VoiceMask(
            self.commands
                .iter()
                .filter_map(|c| match c {
                    VoiceCommand::KeyOn(mask) => Some(mask.bits()),
                    _ => None,
                })
                .fold(0, |acc, bits| acc | bits),
        )
    }

    /// Union of every key-off mask recorded.
    pub fn keyed_off(&self) -> VoiceMask {
        VoiceMask(
            self.commands
                .iter()
                .filter_map(|c| match c {
                    VoiceCommand::KeyOff(mask) => Some(mask.bits()),
                    _ => None,
                })
                .fold(0, |acc, bits| acc | bits),
        )
    }
}

impl VoiceDriver for CommandLog {
    fn set_addr(&mut self, channel: u8, addr: u32) {
        self.commands.push(VoiceCommand::SetAddr { channel, addr });
    }

    fn set_freq(&mut self, channel: u8, freq: u32) {
        self.commands.push(VoiceCommand::SetFreq { channel, freq });
    }

    fn set_volume(&mut self, channel: u8, volume: u16) {
        self.commands.push(VoiceCommand::SetVolume { channel, volume });
    }

    fn set_pan(&mut self, channel: u8, pan: i16) {
        self.commands.push(VoiceCommand::SetPan { channel, pan });
    }

    fn flush(&mut self) {
        self.commands.push(VoiceCommand::Flush);
    }

    fn key_off(&mut self, mask: VoiceMask) {
        self.commands.push(VoiceCommand::KeyOff(mask));
    }

    fn key_on(&mut self, mask: VoiceMask) {
        self.commands.push(VoiceCommand::KeyOn(mask));
    }
}
