//! Ring-buffer driver: hands voice commands from the tick thread to a
//! consumer thread without locking or allocating.

use org_engine::{VoiceCommand, VoiceDriver, VoiceMask};
use ringbuf::traits::{Consumer, Observer, Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};

/// Register writes buffered per flush. 16 tracks x 4 registers.
pub const BATCH_CAPACITY: usize = 64;

/// Producer side, owned by whoever calls `tick`.
pub struct RingVoices {
    batch: heapless::Vec<VoiceCommand, BATCH_CAPACITY>,
    producer: HeapProd<VoiceCommand>,
    /// Commands dropped because the ring was full
    overruns: u64,
}

/// Consumer side.
pub struct VoiceReceiver {
    consumer: HeapCons<VoiceCommand>,
}

impl RingVoices {
    /// Create a driver whose ring holds `capacity` commands.
    pub fn new(capacity: usize) -> (Self, VoiceReceiver) {
        let rb = HeapRb::<VoiceCommand>::new(capacity);
        let (producer, consumer) = rb.split();
        let voices = Self {
            batch: heapless::Vec::new(),
            producer,
            overruns: 0,
        };
        (voices, VoiceReceiver { consumer })
    }

    pub fn overruns(&self) -> u64 {
        self.overruns
    }

    fn send(&mut self, cmd: VoiceCommand) {
        if self.producer.try_push(cmd).is_err() {
            self.overruns += 1;
        }
    }

    fn stage(&mut self, cmd: VoiceCommand) {
        if let Err(cmd) = self.batch.push(cmd) {
            self.commit();
            // Batch was just emptied
            let _ = self.batch.push(cmd);
        }
    }

    fn commit(&mut self) {
        for i in 0..self.batch.len() {
            let cmd = self.batch[i];
            self.send(cmd);
        }
        self.batch.clear();
    }
}

impl VoiceDriver for RingVoices {
    fn set_addr(&mut self, channel: u8, addr: u32) {
        self.stage(VoiceCommand::SetAddr { channel, addr });
    }

    fn set_freq(&mut self, channel: u8, freq: u32) {
        self.stage(VoiceCommand::SetFreq { channel, freq });
    }

    fn set_volume(&mut self, channel: u8, volume: u16) {
        self.stage(VoiceCommand::SetVolume { channel, volume });
    }

    fn set_pan(&mut self, channel: u8, pan: i16) {
        self.stage(VoiceCommand::SetPan { channel, pan });
    }

    fn flush(&mut self) {
        self.commit();
        self.send(VoiceCommand::Flush);
    }

    fn key_off(&mut self, mask: VoiceMask) {
        self.send(VoiceCommand::KeyOff(mask));
    }

    fn key_on(&mut self, mask: VoiceMask) {
        self.send(VoiceCommand::KeyOn(mask));
    }
}

impl VoiceReceiver {
    pub fn try_recv(&mut self) -> Option<VoiceCommand> {
        self.consumer.try_pop()
    }

    /// Commands waiting in the ring.
    pub fn pending(&self) -> usize {
        self.consumer.occupied_len()
    }

    /// Replay every waiting command on `driver`. Returns how many ran.
    pub fn drain_into<D: VoiceDriver + ?Sized>(&mut self, driver: &mut D) -> usize {
        let mut n = 0;
        while let Some(cmd) = self.consumer.try_pop() {
            cmd.apply(driver);
            n += 1;
        }
        n
    }
}
