//! Integration test: write song and bank files → load by name → tick → verify voice commands.

use std::fs;
use std::path::{Path, PathBuf};

use org_engine::{VoiceCommand, VoiceMask, INSTRUMENT_BANK_SIZE};
use org_formats::{write_bank, write_org};
use org_ir::{Note, OrgSong, SampleBank, SongHeader, KEY_NONE};
use org_master::{CommandLog, Controller, DirAssets, LoadError, VoiceTable};

const CH0: u8 = 8;

/// A fresh asset root under the system temp dir.
fn asset_root(name: &str) -> PathBuf {
    let root = std::env::temp_dir().join(format!("orgplayer-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&root);
    fs::create_dir_all(root.join("ORG")).unwrap();
    fs::create_dir_all(root.join("BNK")).unwrap();
    root
}

fn write_bank_file(root: &Path, name: &str, samples: u32) {
    let bank = SampleBank::from_addresses((0..samples).map(|i| 0x4000 + i * 0x40).collect());
    let mut bytes = Vec::new();
    write_bank(&bank, &mut bytes).unwrap();
    fs::write(root.join("BNK").join(format!("{name}.BNK")), bytes).unwrap();
}

fn write_song_file(root: &Path, name: &str, song: &OrgSong) {
    let mut bytes = Vec::new();
    write_org(song, 2, &mut bytes).unwrap();
    fs::write(root.join("ORG").join(format!("{name}.ORG")), bytes).unwrap();
}

/// end_x=8, repeat_x=2. Track 0 plays key 10 for 3 ticks at 0 and a
/// pan/volume-only record at 4. Track 8 hits a drum at 2.
fn looping_song() -> OrgSong {
    let mut song = OrgSong::new(SongHeader {
        end_x: 8,
        repeat_x: 2,
        ..SongHeader::default()
    });
    song.set_track(
        0,
        vec![Note::new(0, 10, 3), Note::new(4, KEY_NONE, 0).with_vol(100).with_pan(0)],
    );
    song.set_track(8, vec![Note::new(2, 5, 1)]);
    song
}

fn controller(name: &str) -> (Controller<DirAssets>, PathBuf) {
    let root = asset_root(name);
    write_bank_file(&root, "SFX", 160);
    write_bank_file(&root, "LOOP", INSTRUMENT_BANK_SIZE as u32);
    write_song_file(&root, "LOOP", &looping_song());
    (Controller::new(DirAssets::new(&root)).unwrap(), root)
}

/// Tick once and return what the engine sent.
fn tick(ctrl: &mut Controller<DirAssets>) -> Vec<VoiceCommand> {
    ctrl.step(1);
    let mut log = CommandLog::new();
    ctrl.drain_voices(&mut log);
    log.commands
}

fn key_ons(cmds: &[VoiceCommand]) -> VoiceMask {
    cmds.iter().fold(VoiceMask::empty(), |acc, c| match c {
        VoiceCommand::KeyOn(m) => VoiceMask(acc.bits() | m.bits()),
        _ => acc,
    })
}

#[test]
fn lists_songs_from_disk() {
    let (ctrl, root) = controller("list");
    write_song_file(&root, "ALPHA", &looping_song());
    assert_eq!(ctrl.list_songs().unwrap(), vec!["ALPHA", "LOOP"]);
    fs::remove_dir_all(root).unwrap();
}

#[test]
fn load_by_lower_case_name() {
    let (mut ctrl, root) = controller("case");
    ctrl.load("loop").unwrap();
    assert!(ctrl.is_loaded());
    assert_eq!(ctrl.track_cursor(0).1, 2);
    assert_eq!(ctrl.track_cursor(8).1, 1);
    fs::remove_dir_all(root).unwrap();
}

#[test]
fn loop_wraps_to_repeat_position() {
    let (mut ctrl, root) = controller("wrap");
    ctrl.load("LOOP").unwrap();

    let mut melodic_ons = Vec::new();
    let mut drum_ons = Vec::new();
    for t in 0..20 {
        let pos = ctrl.position();
        let cmds = tick(&mut ctrl);
        let ons = key_ons(&cmds);
        if ons.contains(CH0) {
            melodic_ons.push(t);
        }
        if ons.contains(CH0 + 8) {
            drum_ons.push(pos);
        }
        assert!((0..8).contains(&ctrl.position()), "tick {t}");
    }

    // Positions 2..8 repeat; the melodic note at 0 fires only on the first pass.
    assert_eq!(melodic_ons, vec![0]);
    // The drum at 2 fires on the first pass and on every loop.
    assert_eq!(drum_ons, vec![2, 2, 2]);
    fs::remove_dir_all(root).unwrap();
}

#[test]
fn sustain_keys_off_after_length() {
    let (mut ctrl, root) = controller("sustain");
    ctrl.load("LOOP").unwrap();

    let off_at: Vec<i32> = (0..8)
        .filter_map(|_| {
            let pos = ctrl.position();
            let cmds = tick(&mut ctrl);
            cmds.iter()
                .any(|c| matches!(c, VoiceCommand::KeyOff(m) if m.contains(CH0)))
                .then_some(pos)
        })
        .collect();
    assert_eq!(off_at, vec![3]);
    fs::remove_dir_all(root).unwrap();
}

#[test]
fn voice_table_follows_the_commands() {
    let (mut ctrl, root) = controller("table");
    ctrl.load("LOOP").unwrap();
    let mut table = VoiceTable::new();

    ctrl.step(1);
    ctrl.drain_voices(&mut table);
    let voice = table.voice(CH0).unwrap();
    assert!(voice.keyed);
    assert_eq!(voice.volume, (200u32 * 100 / 127 << 5) as u16);

    // Pan/volume-only record at 4 changes the registers without a key-on.
    ctrl.step(4);
    ctrl.drain_voices(&mut table);
    let voice = table.voice(CH0).unwrap();
    assert!(!voice.keyed);
    assert_eq!(voice.pan, -256);
    assert_eq!(table.key_on_count(), 2);
    fs::remove_dir_all(root).unwrap();
}

#[test]
fn failed_load_keeps_previous_song() {
    let (mut ctrl, root) = controller("badmagic");
    ctrl.load("LOOP").unwrap();
    ctrl.step(5);

    write_bank_file(&root, "BAD", INSTRUMENT_BANK_SIZE as u32);
    fs::write(root.join("ORG/BAD.ORG"), b"Xrg-2\0\0\0\0").unwrap();
    let err = ctrl.load("bad").unwrap_err();
    assert!(matches!(err, LoadError::Format(_)));

    assert!(ctrl.is_loaded());
    assert_eq!(ctrl.position(), 5);
    assert_eq!(ctrl.with_state(|s| s.header().end_x), 8);
    fs::remove_dir_all(root).unwrap();
}

#[test]
fn missing_song_is_reported() {
    let (mut ctrl, root) = controller("missing");
    write_bank_file(&root, "GHOST", INSTRUMENT_BANK_SIZE as u32);
    let err = ctrl.load("ghost").unwrap_err();
    assert!(matches!(
        err,
        LoadError::Asset(org_master::AssetError::MissingSong(_))
    ));
    assert!(!ctrl.is_loaded());
    fs::remove_dir_all(root).unwrap();
}

#[test]
fn muted_track_stays_silent() {
    let (mut ctrl, root) = controller("mute");
    ctrl.load("LOOP").unwrap();
    ctrl.toggle_mute(8);

    let mut ons = VoiceMask::empty();
    for _ in 0..16 {
        ons = VoiceMask(ons.bits() | key_ons(&tick(&mut ctrl)).bits());
    }
    assert!(ons.contains(CH0));
    assert!(!ons.contains(CH0 + 8));
    fs::remove_dir_all(root).unwrap();
}

#[test]
fn fadeout_reaches_silence() {
    let (mut ctrl, root) = controller("fade");
    ctrl.load("LOOP").unwrap();
    ctrl.start_fadeout();
    ctrl.step(60);
    assert_eq!(ctrl.master_volume(), 0);
    fs::remove_dir_all(root).unwrap();
}
