use criterion::{black_box, criterion_group, criterion_main, Criterion};
use org_engine::{PlaybackState, VoiceDriver, VoiceMask, INSTRUMENT_BANK_SIZE};
use org_ir::{Note, OrgSong, SampleBank, SongHeader, NUM_TRACKS};

/// Driver that discards everything.
struct Sink;

impl VoiceDriver for Sink {
    fn set_addr(&mut self, channel: u8, addr: u32) {
        black_box((channel, addr));
    }
    fn set_freq(&mut self, channel: u8, freq: u32) {
        black_box((channel, freq));
    }
    fn set_volume(&mut self, channel: u8, volume: u16) {
        black_box((channel, volume));
    }
    fn set_pan(&mut self, channel: u8, pan: i16) {
        black_box((channel, pan));
    }
    fn key_off(&mut self, mask: VoiceMask) {
        black_box(mask);
    }
    fn key_on(&mut self, mask: VoiceMask) {
        black_box(mask);
    }
}

/// Every track plays a note every other tick.
fn dense_song() -> OrgSong {
    let mut header = SongHeader::default();
    header.end_x = 1024;
    let mut song = OrgSong::new(header);
    for track in 0..NUM_TRACKS {
        let notes = (0..512)
            .map(|i| {
                Note::new(i * 2, (i % 96) as u8, 1)
                    .with_vol((i % 255) as u8)
                    .with_pan((i % 13) as u8)
            })
            .collect();
        song.set_track(track, notes);
    }
    song
}

fn bench_tick(c: &mut Criterion) {
    let drums = SampleBank::from_addresses((0..160).collect());
    let inst = SampleBank::from_addresses((0..INSTRUMENT_BANK_SIZE as u32).collect());
    let mut state = PlaybackState::new(drums);
    state.load(dense_song(), inst).unwrap();

    c.bench_function("tick_dense_16_tracks", |b| {
        b.iter(|| state.tick(&mut Sink));
    });
}

criterion_group!(benches, bench_tick);
criterion_main!(benches);
