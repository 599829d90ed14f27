//! Integration tests for the Org decoder against hand-assembled byte streams.

use std::io::Cursor;

use org_formats::{read_bank, read_org, FormatError, LoadError};
use org_ir::{OrgSong, KEY_NONE, NUM_TRACKS};

/// Builds an Org file byte by byte, independent of the writer.
struct OrgBytes {
    version: u8,
    wait: u16,
    repeat_x: i32,
    end_x: i32,
    /// (freq, wave, pipi) per track
    track_info: [(u16, u8, u8); NUM_TRACKS],
    /// (pos, key, len, vol, pan) per note
    notes: [Vec<(i32, u8, u8, u8, u8)>; NUM_TRACKS],
}

impl OrgBytes {
    fn new(version: u8) -> Self {
        Self {
            version,
            wait: 100,
            repeat_x: 0,
            end_x: 64,
            track_info: [(1000, 0, 0); NUM_TRACKS],
            notes: Default::default(),
        }
    }

    fn build(&self) -> Vec<u8> {
        let mut b = Vec::new();
        b.extend_from_slice(b"Org-0");
        b.push(self.version);
        b.extend_from_slice(&self.wait.to_le_bytes());
        b.push(4);
        b.push(4);
        b.extend_from_slice(&self.repeat_x.to_le_bytes());
        b.extend_from_slice(&self.end_x.to_le_bytes());
        for (info, notes) in self.track_info.iter().zip(&self.notes) {
            b.extend_from_slice(&info.0.to_le_bytes());
            b.push(info.1);
            b.push(info.2);
            b.extend_from_slice(&(notes.len() as u16).to_le_bytes());
        }
        for notes in &self.notes {
            for n in notes {
                b.extend_from_slice(&n.0.to_le_bytes());
            }
            b.extend(notes.iter().map(|n| n.1));
            b.extend(notes.iter().map(|n| n.2));
            b.extend(notes.iter().map(|n| n.3));
            b.extend(notes.iter().map(|n| n.4));
        }
        b
    }

    fn decode(&self) -> Result<OrgSong, LoadError> {
        read_org(&mut Cursor::new(self.build()))
    }
}

#[test]
fn decodes_columns_into_records() {
    let mut org = OrgBytes::new(b'2');
    org.notes[3] = vec![(0, 12, 4, 200, 6), (16, KEY_NONE, 0, 50, 0), (40, 95, 255, 255, 255)];
    org.notes[12] = vec![(8, 3, 1, 100, 12)];

    let song = org.decode().unwrap();
    assert_eq!(song.header.wait, 100);
    assert_eq!(song.header.end_x, 64);
    assert_eq!(song.note_count(), 4);

    let t3 = &song.tracks[3];
    assert_eq!(t3.len(), 3);
    assert_eq!((t3[0].pos, t3[0].key, t3[0].len, t3[0].vol, t3[0].pan), (0, 12, 4, 200, 6));
    assert_eq!(t3[1].key(), None);
    assert_eq!(t3[1].vol(), Some(50));
    assert_eq!(t3[2].vol(), None);
    assert_eq!(t3[2].pan(), None);

    assert_eq!(song.tracks[12][0].pos, 8);
    assert_eq!(song.header.tracks[12].note_count, 1);
    assert!(song.tracks[0].is_empty());
}

#[test]
fn version_one_clears_loop_flags() {
    let mut org = OrgBytes::new(b'1');
    org.track_info[5] = (1100, 7, 1);
    let song = org.decode().unwrap();
    assert!(!song.header.tracks[5].looping);
    assert_eq!(song.header.tracks[5].freq, 1100);
    assert_eq!(song.header.tracks[5].wave_no, 7);

    org.version = b'2';
    assert!(org.decode().unwrap().header.tracks[5].looping);
}

#[test]
fn rejects_bad_magic_and_version() {
    let mut bytes = OrgBytes::new(b'2').build();
    bytes[3] = b'+';
    assert!(matches!(
        read_org(&mut Cursor::new(bytes)),
        Err(LoadError::Format(FormatError::InvalidMagic(_)))
    ));

    assert!(matches!(
        OrgBytes::new(b'0').decode(),
        Err(LoadError::Format(FormatError::UnsupportedVersion('0')))
    ));
}

#[test]
fn rejects_loop_outside_song() {
    let mut org = OrgBytes::new(b'2');
    org.repeat_x = 64;
    assert!(matches!(
        org.decode(),
        Err(LoadError::Format(FormatError::MalformedHeader(_)))
    ));

    org.repeat_x = 0;
    org.end_x = 0;
    assert!(matches!(
        org.decode(),
        Err(LoadError::Format(FormatError::MalformedHeader(_)))
    ));
}

#[test]
fn truncated_note_columns_fail_with_io() {
    let mut org = OrgBytes::new(b'2');
    org.notes[0] = vec![(0, 1, 1, 1, 1), (4, 2, 2, 2, 2)];
    let mut bytes = org.build();
    bytes.truncate(bytes.len() - 3);
    assert!(matches!(read_org(&mut Cursor::new(bytes)), Err(LoadError::Io(_))));
}

#[test]
fn truncated_header_fails_with_io() {
    let mut bytes = OrgBytes::new(b'2').build();
    bytes.truncate(20);
    assert!(matches!(read_org(&mut Cursor::new(bytes)), Err(LoadError::Io(_))));
}

#[test]
fn bank_with_no_samples() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    let bank = read_bank(&mut Cursor::new(bytes)).unwrap();
    assert!(bank.is_empty());
    assert!(bank.data().is_empty());
}
