//! orgplayer: headless Org sequencer.
//!
//! Usage:
//!   orgplayer <root> --list
//!   orgplayer <root> <song> --seconds 10
//!   orgplayer <root> <song> --ticks 256 --dump

use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use org_ir::NUM_TRACKS;
use org_master::{AssetSource, CommandLog, Controller, DirAssets, VoiceTable};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "orgplayer", version, about = "Play Org songs without audio hardware")]
struct Args {
    /// Asset root holding the ORG/ and BNK/ directories
    root: PathBuf,

    /// Song to load, without extension
    song: Option<String>,

    /// List available songs and exit
    #[arg(long)]
    list: bool,

    /// Step this many ticks offline instead of playing in real time
    #[arg(long, value_name = "N")]
    ticks: Option<u32>,

    /// Real-time playback length in seconds
    #[arg(long, value_name = "S", default_value_t = 10.0)]
    seconds: f64,

    /// Muted tracks, bit i = track i (decimal or 0x hex)
    #[arg(long, value_name = "MASK", value_parser = parse_mask)]
    mute: Option<u16>,

    /// Added to every melodic frequency
    #[arg(long, value_name = "N", allow_hyphen_values = true)]
    freq_shift: Option<i32>,

    /// Start fading out once the transport reaches this tick
    #[arg(long, value_name = "N")]
    fadeout_at: Option<i32>,

    /// Print every voice command issued
    #[arg(long)]
    dump: bool,
}

fn parse_mask(s: &str) -> Result<u16, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid mask {s:?}: {e}"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let assets = DirAssets::new(&args.root);

    if args.list {
        let songs = assets
            .list_songs()
            .with_context(|| format!("listing songs under {}", args.root.display()))?;
        for name in songs {
            println!("{name}");
        }
        return Ok(());
    }

    let Some(song) = args.song.as_deref() else {
        bail!("no song given (use --list to see what is available)");
    };

    let mut ctrl = Controller::new(assets).context("loading percussion bank")?;
    ctrl.load(song).with_context(|| format!("loading song {song}"))?;

    if let Some(mask) = args.mute {
        ctrl.set_mute_mask(mask);
    }
    if let Some(shift) = args.freq_shift {
        ctrl.set_freq_shift(shift);
    }

    println!("Song:     {}", song.to_ascii_uppercase());
    ctrl.with_state(|state| {
        let h = state.header();
        println!("Wait:     {} ms/tick", h.wait);
        println!("Meter:    {} x {}", h.line, h.dot);
        println!("Loop:     {} -> {}", h.end_x, h.repeat_x);
    });
    println!();

    let mut table = VoiceTable::new();
    ctrl.upload_banks(&mut table);
    let mut log = CommandLog::new();
    tracing::debug!(ticks = ?args.ticks, seconds = args.seconds, "starting playback");

    match args.ticks {
        Some(ticks) => step_offline(&mut ctrl, ticks, args.fadeout_at, &mut table, &mut log),
        None => play_realtime(&mut ctrl, args.seconds, args.fadeout_at, &mut table, &mut log),
    }

    if args.dump {
        for cmd in &log.commands {
            println!("{cmd:?}");
        }
        println!();
    }

    print_cursors(&ctrl);
    println!();
    println!("Key-ons:  {}", table.key_on_count());
    if ctrl.overruns() > 0 {
        println!("Dropped:  {} voice commands", ctrl.overruns());
    }
    Ok(())
}

/// Forward drained commands to the register table, keeping a copy for `--dump`.
fn drain(ctrl: &mut Controller<DirAssets>, table: &mut VoiceTable, log: &mut CommandLog) {
    let start = log.commands.len();
    ctrl.drain_voices(log);
    for cmd in &log.commands[start..] {
        cmd.apply(table);
    }
}

fn step_offline(
    ctrl: &mut Controller<DirAssets>,
    ticks: u32,
    fadeout_at: Option<i32>,
    table: &mut VoiceTable,
    log: &mut CommandLog,
) {
    for _ in 0..ticks {
        if fadeout_at.is_some_and(|at| ctrl.position() >= at) {
            ctrl.start_fadeout();
        }
        ctrl.step(1);
        drain(ctrl, table, log);
    }
    println!("Stepped {ticks} ticks, position {}", ctrl.position());
}

fn play_realtime(
    ctrl: &mut Controller<DirAssets>,
    seconds: f64,
    fadeout_at: Option<i32>,
    table: &mut VoiceTable,
    log: &mut CommandLog,
) {
    let until = Instant::now() + Duration::from_secs_f64(seconds.max(0.0));
    let mut fading = false;

    ctrl.play();
    println!("Playing...");
    while Instant::now() < until {
        if !fading && fadeout_at.is_some_and(|at| ctrl.position() >= at) {
            ctrl.start_fadeout();
            fading = true;
        }
        drain(ctrl, table, log);
        print!(
            "\rPos: {:06} | Vol: {:3} | Keyed: {:08X}",
            ctrl.position(),
            ctrl.master_volume(),
            table.keyed().bits()
        );
        let _ = std::io::stdout().flush();
        std::thread::sleep(Duration::from_millis(10));
    }
    ctrl.stop();
    drain(ctrl, table, log);
    println!("\rDone.                                    ");
}

fn print_cursors(ctrl: &Controller<DirAssets>) {
    println!("Trk  Notes   Pos     Key Len Vol Pan");
    for track in 0..NUM_TRACKS {
        let (next, count) = ctrl.track_cursor(track);
        match next {
            Some(n) => println!(
                "{track:>3}  {count:>5}   {:06}  {:02X}  {:02X}  {:02X}  {:02X}",
                n.pos, n.key, n.len, n.vol, n.pan
            ),
            None => println!("{track:>3}  {count:>5}   ------  --  --  --  --"),
        }
    }
}
