//! Core song types for the Org sequencer.
//!
//! The format decoder emits these types and the playback engine consumes
//! them. Nothing here performs I/O.
//!
//! Designed to be `no_std` compatible with the `alloc` crate.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod bank;
mod note;
pub mod song;

pub use bank::SampleBank;
pub use note::{Note, KEY_NONE, PAN_NONE, VOL_NONE};
pub use song::{
    OrgSong, SongHeader, TrackHeader, TrackKind, DEFAULT_FREQ, MELODIC_TRACKS, NUM_OCTAVES,
    NUM_TRACKS,
};
