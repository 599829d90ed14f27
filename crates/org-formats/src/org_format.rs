//! Org song format parser.
//!
//! Layout (little-endian): 5-byte magic, one ASCII version digit, a fixed
//! header with 16 track headers, then for every track with notes five
//! column vectors: positions (i32), keys, lengths, volumes, pans (u8 each).

use std::io::{Read, Seek, Write};

use binrw::{BinRead, BinReaderExt};
use org_ir::{Note, OrgSong, SongHeader, TrackHeader, NUM_TRACKS};

use crate::error::{FormatError, Result};

/// Magic tag at the start of every Org file.
pub const ORG_MAGIC: &[u8; 5] = b"Org-0";

#[derive(BinRead, Debug, Clone, Copy)]
#[br(little)]
struct RawTrackHeader {
    freq: u16,
    wave_no: u8,
    pipi: u8,
    note_num: u16,
}

#[derive(BinRead, Debug, Clone, Copy)]
#[br(little)]
struct RawSongHeader {
    wait: u16,
    line: u8,
    dot: u8,
    repeat_x: i32,
    end_x: i32,
    tracks: [RawTrackHeader; NUM_TRACKS],
}

impl RawSongHeader {
    fn into_header(self, version: u8) -> Result<SongHeader> {
        if self.end_x <= 0 || self.repeat_x < 0 || self.repeat_x >= self.end_x {
            return Err(FormatError::MalformedHeader(format!(
                "loop range {}..{} is empty or negative",
                self.repeat_x, self.end_x
            ))
            .into());
        }

        let mut tracks = [TrackHeader::default(); NUM_TRACKS];
        for (dst, src) in tracks.iter_mut().zip(self.tracks) {
            *dst = TrackHeader {
                freq: src.freq,
                wave_no: src.wave_no,
                // Version 1 files store garbage here
                looping: version >= 2 && src.pipi != 0,
                note_count: src.note_num,
            };
        }

        Ok(SongHeader {
            wait: self.wait,
            line: self.line,
            dot: self.dot,
            repeat_x: self.repeat_x,
            end_x: self.end_x,
            tracks,
        })
    }
}

/// Read an Org song from a stream positioned at the magic tag.
///
/// On error every note array allocated so far is dropped.
pub fn read_org<R: Read + Seek>(reader: &mut R) -> Result<OrgSong> {
    let mut magic = [0u8; 6];
    reader.read_exact(&mut magic)?;

    let mut tag = [0u8; 5];
    tag.copy_from_slice(&magic[..5]);
    if &tag != ORG_MAGIC {
        return Err(FormatError::InvalidMagic(tag).into());
    }

    let version = match magic[5] {
        b'1' => 1,
        b'2' => 2,
        other => return Err(FormatError::UnsupportedVersion(other as char).into()),
    };

    let raw: RawSongHeader = reader.read_le()?;
    let header = raw.into_header(version)?;

    let mut song = OrgSong {
        header,
        tracks: Default::default(),
    };
    for (track, hdr) in header.tracks.iter().enumerate() {
        if hdr.note_count > 0 {
            song.tracks[track] = read_track(reader, hdr.note_count as usize)?;
        }
    }

    tracing::debug!(
        version,
        wait = header.wait,
        repeat_x = header.repeat_x,
        end_x = header.end_x,
        notes = song.note_count(),
        "decoded Org song"
    );

    Ok(song)
}

/// Read one track's five note columns.
fn read_track<R: Read + Seek>(reader: &mut R, count: usize) -> Result<Box<[Note]>> {
    let mut notes = Vec::new();
    notes.try_reserve_exact(count)?;
    notes.resize(count, Note::default());

    for note in notes.iter_mut() {
        note.pos = reader.read_le::<i32>()?;
    }

    let mut column = Vec::new();
    column.try_reserve_exact(count)?;
    column.resize(count, 0u8);

    let setters: [fn(&mut Note, u8); 4] = [
        |n, b| n.key = b,
        |n, b| n.len = b,
        |n, b| n.vol = b,
        |n, b| n.pan = b,
    ];
    for set in setters {
        reader.read_exact(&mut column)?;
        for (note, &byte) in notes.iter_mut().zip(&column) {
            set(note, byte);
        }
    }

    Ok(notes.into_boxed_slice())
}

/// Serialize a song in Org format with the given version digit (1 or 2).
pub fn write_org<W: Write>(song: &OrgSong, version: u8, out: &mut W) -> std::io::Result<()> {
    let header = &song.header;
    out.write_all(ORG_MAGIC)?;
    out.write_all(&[b'0' + version])?;
    out.write_all(&header.wait.to_le_bytes())?;
    out.write_all(&[header.line, header.dot])?;
    out.write_all(&header.repeat_x.to_le_bytes())?;
    out.write_all(&header.end_x.to_le_bytes())?;

    for (hdr, notes) in header.tracks.iter().zip(&song.tracks) {
        out.write_all(&hdr.freq.to_le_bytes())?;
        out.write_all(&[hdr.wave_no, hdr.looping as u8])?;
        out.write_all(&(notes.len() as u16).to_le_bytes())?;
    }

    for notes in &song.tracks {
        for note in notes.iter() {
            out.write_all(&note.pos.to_le_bytes())?;
        }
        let columns: [fn(&Note) -> u8; 4] = [|n| n.key, |n| n.len, |n| n.vol, |n| n.pan];
        for column in columns {
            let bytes: Vec<u8> = notes.iter().map(column).collect();
            out.write_all(&bytes)?;
        }
    }

    Ok(())
}
