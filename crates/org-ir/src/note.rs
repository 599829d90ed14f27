//! Note records.

/// Key value meaning "no note": the record only changes pan/volume.
pub const KEY_NONE: u8 = 0xFF;
/// Volume value meaning "keep the track's current volume".
pub const VOL_NONE: u8 = 0xFF;
/// Pan value meaning "keep the track's current pan".
pub const PAN_NONE: u8 = 0xFF;

/// A single note event on a track.
///
/// Fields hold the raw stored bytes; the accessors translate the
/// sentinel values into `None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Note {
    /// Tick position the note fires at
    pub pos: i32,
    /// Sustain length in ticks
    pub len: u8,
    /// Pitch index (0-95 in practice), or [`KEY_NONE`]
    pub key: u8,
    /// Volume (0-254), or [`VOL_NONE`]
    pub vol: u8,
    /// Pan position (0-12), or [`PAN_NONE`]
    pub pan: u8,
}

impl Default for Note {
    fn default() -> Self {
        Self {
            pos: 0,
            len: 0,
            key: KEY_NONE,
            vol: VOL_NONE,
            pan: PAN_NONE,
        }
    }
}

impl Note {
    /// Create a sounding note.
    pub const fn new(pos: i32, key: u8, len: u8) -> Self {
        Self {
            pos,
            len,
            key,
            vol: VOL_NONE,
            pan: PAN_NONE,
        }
    }

    /// Set the volume column.
    pub const fn with_vol(mut self, vol: u8) -> Self {
        self.vol = vol;
        self
    }

    /// Set the pan column.
    pub const fn with_pan(mut self, pan: u8) -> Self {
        self.pan = pan;
        self
    }

    pub const fn key(&self) -> Option<u8> {
        if self.key == KEY_NONE {
            None
        } else {
            Some(self.key)
        }
    }

    pub const fn vol(&self) -> Option<u8> {
        if self.vol == VOL_NONE {
            None
        } else {
            Some(self.vol)
        }
    }

    pub const fn pan(&self) -> Option<u8> {
        if self.pan == PAN_NONE {
            None
        } else {
            Some(self.pan)
        }
    }
}
