//! Instrument resolution: (track, key) to sample address and frequency.
//!
//! Melodic tracks pick one of eight octave samples per track from the
//! instrument bank and derive the pitch from a chromatic table. Drum tracks
//! pick a fixed slot in the percussion bank and map the key linearly.

use org_ir::{SampleBank, DEFAULT_FREQ, MELODIC_TRACKS, NUM_OCTAVES};

/// First drum sample in the percussion bank.
pub const DRUM_BANK_BASE: usize = 150;

/// Divisor applied after the octave scaling.
const FREQ_DIVISOR: i32 = 8;

/// Offset subtracted from pan table entries to center them on zero.
pub const PAN_CENTER: i16 = 256;

/// Master volume value corresponding to full scale.
const VOLUME_SCALE: i32 = 127;

/// Shift applied to 0-254 volumes to reach the hardware range.
const VOLUME_SHIFT: u32 = 5;

/// Per-octave (waveform size, period ratio).
const OCTAVE_WAVES: [(i32, i32); NUM_OCTAVES] = [
    (256, 1),
    (256, 2),
    (128, 4),
    (128, 8),
    (64, 16),
    (32, 32),
    (16, 64),
    (8, 128),
];

/// Base frequencies for C through B.
const FREQ_TABLE: [i32; 12] = [262, 277, 294, 311, 330, 349, 370, 392, 415, 440, 466, 494];

/// Pan positions 0 (left) through 12 (right). Not evenly spaced.
const PAN_TABLE: [i16; 13] = [0, 43, 86, 129, 172, 215, 256, 297, 340, 383, 426, 469, 512];

/// A resolved sample start and playback frequency.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Voice {
    pub addr: u32,
    pub freq: u32,
}

/// Octave of a key. Keys past the last octave use the last octave.
pub const fn octave(key: u8) -> usize {
    let oct = key as usize / 12;
    if oct < NUM_OCTAVES {
        oct
    } else {
        NUM_OCTAVES - 1
    }
}

/// Instrument bank index for a melodic key.
pub const fn melodic_instrument(track: usize, key: u8) -> usize {
    track * NUM_OCTAVES + octave(key)
}

/// Frequency for a melodic key, before the global shift.
///
/// `freq_mod` is the track's frequency modifier (1000 = neutral).
pub fn melodic_freq(key: u8, freq_mod: u16) -> i32 {
    let (wave_size, oct_par) = OCTAVE_WAVES[octave(key)];
    let base = FREQ_TABLE[key as usize % 12];
    (wave_size * base * oct_par) / FREQ_DIVISOR + (freq_mod as i32 - DEFAULT_FREQ as i32)
}

/// Resolve a melodic note. `None` if the bank has no sample for it.
pub fn resolve_melodic(
    track: usize,
    key: u8,
    freq_mod: u16,
    freq_shift: i32,
    bank: &SampleBank,
) -> Option<Voice> {
    let addr = bank.address(melodic_instrument(track, key))?;
    let freq = melodic_freq(key, freq_mod).saturating_add(freq_shift).max(0) as u32;
    Some(Voice { addr, freq })
}

/// Percussion bank index for a drum track.
pub const fn drum_instrument(track: usize) -> usize {
    track - MELODIC_TRACKS + DRUM_BANK_BASE
}

/// Frequency for a drum key.
pub const fn drum_freq(key: u8) -> u32 {
    key as u32 * 800 + 100
}

/// Resolve a drum hit. `None` if the bank has no sample for the track.
pub fn resolve_drum(track: usize, key: u8, bank: &SampleBank) -> Option<Voice> {
    let addr = bank.address(drum_instrument(track))?;
    Some(Voice {
        addr,
        freq: drum_freq(key),
    })
}

/// Hardware pan for a 0-12 pan value. Out-of-range values pin right.
pub fn pan_to_hw(pan: u8) -> i16 {
    let idx = (pan as usize).min(PAN_TABLE.len() - 1);
    PAN_TABLE[idx] - PAN_CENTER
}

/// Hardware volume for a track volume under the master volume.
pub fn hw_volume(track_volume: u8, master_volume: i32) -> u16 {
    let scaled = track_volume as i32 * master_volume / VOLUME_SCALE;
    (scaled.max(0) as u16) << VOLUME_SHIFT
}
