//! Software register file for the sound channels.
//!
//! Mirrors what the hardware would hold: staged register writes become
//! visible on flush, key masks toggle the channels immediately, and
//! uploaded banks land in sound memory at their base address.

use org_engine::{VoiceDriver, VoiceMask, NUM_VOICES};
use org_ir::SampleBank;

/// Bytes of sound memory.
pub const SOUND_RAM_SIZE: usize = 512 * 1024;

/// Committed registers of one channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VoiceRegs {
    pub addr: u32,
    pub freq: u32,
    pub volume: u16,
    pub pan: i16,
    pub keyed: bool,
}

/// All channels, with a staging copy for unflushed writes.
#[derive(Clone, Debug)]
pub struct VoiceTable {
    live: [VoiceRegs; NUM_VOICES as usize],
    staged: [VoiceRegs; NUM_VOICES as usize],
    key_ons: u64,
    sound_ram: Box<[u8]>,
    uploads: u32,
}

impl Default for VoiceTable {
    fn default() -> Self {
        Self {
            live: Default::default(),
            staged: Default::default(),
            key_ons: 0,
            sound_ram: vec![0; SOUND_RAM_SIZE].into_boxed_slice(),
            uploads: 0,
        }
    }
}

impl VoiceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sound_ram(&self) -> &[u8] {
        &self.sound_ram
    }

    /// `len` bytes of sound memory starting at `addr`.
    pub fn sample(&self, addr: u32, len: usize) -> Option<&[u8]> {
        let start = addr as usize;
        self.sound_ram.get(start..start.checked_add(len)?)
    }

    /// Banks written to sound memory so far.
    pub fn uploads(&self) -> u32 {
        self.uploads
    }

    pub fn voice(&self, channel: u8) -> Option<&VoiceRegs> {
        self.live.get(channel as usize)
    }

    /// Channels currently keyed on.
    pub fn keyed(&self) -> VoiceMask {
        let mut mask = VoiceMask::empty();
        for (ch, regs) in self.live.iter().enumerate() {
            if regs.keyed {
                mask.insert(ch as u8);
            }
        }
        mask
    }

    /// Total key-on events seen.
    pub fn key_on_count(&self) -> u64 {
        self.key_ons
    }

    fn staged_mut(&mut self, channel: u8) -> Option<&mut VoiceRegs> {
        self.staged.get_mut(channel as usize)
    }
}

impl VoiceDriver for VoiceTable {
    fn set_addr(&mut self, channel: u8, addr: u32) {
        if let Some(regs) = self.staged_mut(channel) {
            regs.addr = addr;
        }
    }

    fn set_freq(&mut self, channel: u8, freq: u32) {
        if let Some(regs) = self.staged_mut(channel) {
            regs.freq = freq;
        }
    }

    fn set_volume(&mut self, channel: u8, volume: u16) {
        if let Some(regs) = self.staged_mut(channel) {
            regs.volume = volume;
        }
    }

    fn set_pan(&mut self, channel: u8, pan: i16) {
        if let Some(regs) = self.staged_mut(channel) {
            regs.pan = pan;
        }
    }

    fn flush(&mut self) {
        for (live, staged) in self.live.iter_mut().zip(&self.staged) {
            let keyed = live.keyed;
            *live = *staged;
            live.keyed = keyed;
        }
    }

    fn key_off(&mut self, mask: VoiceMask) {
        for ch in mask.channels() {
            if let Some(regs) = self.live.get_mut(ch as usize) {
                regs.keyed = false;
            }
        }
    }

    fn key_on(&mut self, mask: VoiceMask) {
        for ch in mask.channels() {
            if let Some(regs) = self.live.get_mut(ch as usize) {
                regs.keyed = true;
                self.key_ons += 1;
            }
        }
    }

    /// Copy the bank's data block to its base address, clipped to the end
    /// of sound memory. Banks without a base address are ignored.
    fn upload_bank(&mut self, bank: &SampleBank) {
        let Some(base) = bank.base_address() else {
            return;
        };
        let Some(dst) = self.sound_ram.get_mut(base as usize..) else {
            return;
        };
        let n = bank.data().len().min(dst.len());
        dst[..n].copy_from_slice(&bank.data()[..n]);
        self.uploads += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_land_on_flush() {
        let mut table = VoiceTable::new();
        table.set_freq(8, 4400);
        assert_eq!(table.voice(8).unwrap().freq, 0);
        table.flush();
        assert_eq!(table.voice(8).unwrap().freq, 4400);
    }

    #[test]
    fn off_then_on_leaves_channel_keyed() {
        let mut table = VoiceTable::new();
        table.key_off(VoiceMask::channel(8));
        table.key_on(VoiceMask::channel(8));
        assert!(table.keyed().contains(8));
        table.key_off(VoiceMask::ALL);
        assert!(table.keyed().is_empty());
        assert_eq!(table.key_on_count(), 1);
    }

    #[test]
    fn upload_writes_data_at_base_address() {
        let mut table = VoiceTable::new();
        let bank = SampleBank::new(vec![0, 0x1010, 0x1014].into_boxed_slice(), vec![1, 2, 3, 4, 5, 6].into_boxed_slice());
        table.upload_bank(&bank);

        assert_eq!(table.uploads(), 1);
        assert_eq!(table.sample(0x1010, 6), Some(&[1, 2, 3, 4, 5, 6][..]));
        assert_eq!(table.sample(0x1014, 2), Some(&[5, 6][..]));
        assert_eq!(table.sample(0x100f, 1), Some(&[0][..]));
    }

    #[test]
    fn upload_clips_to_sound_ram() {
        let mut table = VoiceTable::new();
        let tail = (SOUND_RAM_SIZE - 2) as u32;
        table.upload_bank(&SampleBank::new(vec![tail].into_boxed_slice(), vec![9, 9, 9, 9].into_boxed_slice()));
        assert_eq!(table.sample(tail, 2), Some(&[9, 9][..]));
        assert!(table.sample(tail, 3).is_none());

        // Past the end, or no base address: nothing written
        table.upload_bank(&SampleBank::new(vec![u32::MAX].into_boxed_slice(), vec![1].into_boxed_slice()));
        table.upload_bank(&SampleBank::new(vec![0, 0].into_boxed_slice(), vec![1].into_boxed_slice()));
        assert_eq!(table.uploads(), 1);
    }

    #[test]
    fn out_of_range_channels_are_ignored() {
        let mut table = VoiceTable::new();
        table.set_pan(200, 10);
        table.key_on(VoiceMask::channel(30));
        table.flush();
        assert!(table.keyed().is_empty());
        assert!(table.voice(200).is_none());
    }
}
