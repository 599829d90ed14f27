//! Song and bank lookup by name.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, BufReader, Cursor, Read, Seek};
use std::path::{Path, PathBuf};

use org_formats::{AssetError, LoadError};

/// Name of the percussion bank every song shares.
pub const PERCUSSION_BANK: &str = "SFX";

/// Where songs and banks come from.
pub trait AssetSource {
    type Stream: Read + Seek;

    /// Open the song called `name`.
    fn open_song(&self, name: &str) -> Result<Self::Stream, LoadError>;

    /// Open the sample bank called `name`.
    fn open_bank(&self, name: &str) -> Result<Self::Stream, LoadError>;

    /// Names of every available song, sorted.
    fn list_songs(&self) -> Result<Vec<String>, LoadError>;
}

/// Assets on disk: `<root>/ORG/<NAME>.ORG` and `<root>/BNK/<NAME>.BNK`.
#[derive(Clone, Debug)]
pub struct DirAssets {
    root: PathBuf,
}

impl DirAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn song_dir(&self) -> PathBuf {
        self.root.join("ORG")
    }

    fn song_path(&self, name: &str) -> PathBuf {
        self.song_dir()
            .join(format!("{}.ORG", name.to_ascii_uppercase()))
    }

    fn bank_path(&self, name: &str) -> PathBuf {
        self.root
            .join("BNK")
            .join(format!("{}.BNK", name.to_ascii_uppercase()))
    }
}

/// Open a file, reporting a missing file as the given asset error.
fn open(path: &Path, missing: AssetError) -> Result<BufReader<File>, LoadError> {
    match File::open(path) {
        Ok(f) => Ok(BufReader::new(f)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(missing.into()),
        Err(e) => Err(e.into()),
    }
}

impl AssetSource for DirAssets {
    type Stream = BufReader<File>;

    fn open_song(&self, name: &str) -> Result<Self::Stream, LoadError> {
        open(&self.song_path(name), AssetError::MissingSong(name.to_string()))
    }

    fn open_bank(&self, name: &str) -> Result<Self::Stream, LoadError> {
        open(&self.bank_path(name), AssetError::MissingBank(name.to_string()))
    }

    fn list_songs(&self) -> Result<Vec<String>, LoadError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(self.song_dir())? {
            let path = entry?.path();
            let is_org = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("org"));
            if !is_org {
                continue;
            }
            if let Some(stem) = path.file_stem() {
                names.push(stem.to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }
}

/// In-memory assets, keyed by upper-cased name.
#[derive(Clone, Debug, Default)]
pub struct MemoryAssets {
    songs: HashMap<String, Vec<u8>>,
    banks: HashMap<String, Vec<u8>>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_song(&mut self, name: &str, bytes: Vec<u8>) {
        self.songs.insert(name.to_ascii_uppercase(), bytes);
    }

    pub fn insert_bank(&mut self, name: &str, bytes: Vec<u8>) {
        self.banks.insert(name.to_ascii_uppercase(), bytes);
    }
}

impl AssetSource for MemoryAssets {
    type Stream = Cursor<Vec<u8>>;

    fn open_song(&self, name: &str) -> Result<Self::Stream, LoadError> {
        self.songs
            .get(&name.to_ascii_uppercase())
            .map(|b| Cursor::new(b.clone()))
            .ok_or_else(|| AssetError::MissingSong(name.to_string()).into())
    }

    fn open_bank(&self, name: &str) -> Result<Self::Stream, LoadError> {
        self.banks
            .get(&name.to_ascii_uppercase())
            .map(|b| Cursor::new(b.clone()))
            .ok_or_else(|| AssetError::MissingBank(name.to_string()).into())
    }

    fn list_songs(&self) -> Result<Vec<String>, LoadError> {
        let mut names: Vec<String> = self.songs.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}
