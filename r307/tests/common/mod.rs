//! Scripted in-memory sensor double
//!
//! Implements `Transport` and behaves like an R307 on the other end of the
//! wire: parses command frames, tracks its two char buffers, streams
//! template transfers and answers the match instruction by comparing
//! buffer contents. Tests configure its behavior up front and inspect it
//! afterwards through a probe handle.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use r307::{BufferSlot, Frame, PacketType, StatusCode, Transport};
use r307_core::constants::DEFAULT_ADDRESS;

/// Behavior knobs for one fake sensor
#[derive(Debug, Clone)]
pub struct FakeConfig {
    /// Template bytes a live capture produces
    pub finger: Vec<u8>,

    /// Respond NO_FINGER to this many GenImg commands before succeeding
    pub capture_failures: u32,

    /// If set, every GenImg gets this status instead
    pub capture_status: Option<StatusCode>,

    /// Score reported on a positive match
    pub confidence: u16,

    /// Answer to TempleteNum
    pub template_count: u16,
}

impl Default for FakeConfig {
    fn default() -> Self {
        Self {
            finger: vec![0x5F; 512],
            capture_failures: 0,
            capture_status: None,
            confidence: 180,
            template_count: 0,
        }
    }
}

struct SensorState {
    config: FakeConfig,
    capture_attempts: u32,
    slots: [Option<Vec<u8>>; 2],
    downloading: Option<usize>,
    download_buf: Vec<u8>,
    inbox: VecDeque<u8>,
    pending: Vec<u8>,
}

/// Inspection handle that outlives the boxed transport
#[derive(Clone)]
pub struct SensorProbe {
    state: Arc<Mutex<SensorState>>,
}

impl SensorProbe {
    /// GenImg commands seen so far
    pub fn capture_attempts(&self) -> u32 {
        self.state.lock().unwrap().capture_attempts
    }

    /// Current contents of a char buffer
    pub fn slot(&self, slot: BufferSlot) -> Option<Vec<u8>> {
        self.state.lock().unwrap().slots[slot.id() as usize - 1].clone()
    }
}

pub struct FakeSensor {
    state: Arc<Mutex<SensorState>>,
}

impl FakeSensor {
    pub fn new(config: FakeConfig) -> (Self, SensorProbe) {
        let state = Arc::new(Mutex::new(SensorState {
            config,
            capture_attempts: 0,
            slots: [None, None],
            downloading: None,
            download_buf: Vec::new(),
            inbox: VecDeque::new(),
            pending: Vec::new(),
        }));

        let probe = SensorProbe {
            state: state.clone(),
        };
        (Self { state }, probe)
    }
}

impl SensorState {
    fn reply(&mut self, frame: Frame) {
        self.inbox.extend(frame.encode(DEFAULT_ADDRESS));
    }

    fn ack(&mut self, status: StatusCode) {
        self.reply(Frame::new(PacketType::Ack, vec![status.code()]));
    }

    fn ack_with(&mut self, status: StatusCode, body: &[u8]) {
        let mut payload = vec![status.code()];
        payload.extend_from_slice(body);
        self.reply(Frame::new(PacketType::Ack, payload));
    }

    fn handle(&mut self, frame: Frame) {
        match frame.packet_type {
            PacketType::Command => self.handle_command(&frame.payload),
            PacketType::Data => {
                if self.downloading.is_some() {
                    self.download_buf.extend_from_slice(&frame.payload);
                }
            }
            PacketType::EndOfData => {
                if let Some(index) = self.downloading.take() {
                    self.download_buf.extend_from_slice(&frame.payload);
                    self.slots[index] = Some(std::mem::take(&mut self.download_buf));
                }
            }
            PacketType::Ack => {}
        }
    }

    fn handle_command(&mut self, payload: &[u8]) {
        let slot_index = payload.get(1).map(|&b| (b as usize).saturating_sub(1));

        match payload.first().copied() {
            // GenImg
            Some(0x01) => {
                self.capture_attempts += 1;
                match self.config.capture_status {
                    Some(status) => self.ack(status),
                    None if self.capture_attempts <= self.config.capture_failures => {
                        self.ack(StatusCode::NoFingerPresent)
                    }
                    None => self.ack(StatusCode::Ok),
                }
            }

            // Img2Tz
            Some(0x02) => {
                let index = slot_index.unwrap_or(0).min(1);
                self.slots[index] = Some(self.config.finger.clone());
                self.ack(StatusCode::Ok);
            }

            // Match: compare the two char buffers byte for byte
            Some(0x03) => match (&self.slots[0], &self.slots[1]) {
                (Some(a), Some(b)) if a == b => {
                    let confidence = self.config.confidence.to_be_bytes();
                    self.ack_with(StatusCode::Ok, &confidence);
                }
                _ => self.ack_with(StatusCode::NoMatch, &[0, 0]),
            },

            // UpChar: ack, then stream the slot
            Some(0x08) => {
                let index = slot_index.unwrap_or(0).min(1);
                match self.slots[index].clone() {
                    Some(bytes) => {
                        self.ack(StatusCode::Ok);
                        let mut chunks = bytes.chunks_exact(128);
                        for chunk in chunks.by_ref() {
                            self.reply(Frame::new(PacketType::Data, chunk.to_vec()));
                        }
                        self.reply(Frame::new(
                            PacketType::EndOfData,
                            chunks.remainder().to_vec(),
                        ));
                    }
                    None => self.ack(StatusCode::Unknown(0x0C)),
                }
            }

            // DownChar: ack and start consuming the stream
            Some(0x09) => {
                self.downloading = Some(slot_index.unwrap_or(0).min(1));
                self.download_buf.clear();
                self.ack(StatusCode::Ok);
            }

            // TempleteNum
            Some(0x1D) => {
                let count = self.config.template_count.to_be_bytes();
                self.ack_with(StatusCode::Ok, &count);
            }

            _ => self.ack(StatusCode::PacketReceiveError),
        }
    }
}

impl Transport for FakeSensor {
    fn send(&mut self, data: &[u8]) -> r307_transport::Result<()> {
        let mut state = self.state.lock().unwrap();
        state.pending.extend_from_slice(data);

        // Process every complete frame the host has written so far
        loop {
            if state.pending.len() < Frame::HEADER_SIZE {
                break;
            }
            let declared =
                u16::from_be_bytes([state.pending[7], state.pending[8]]) as usize;
            let total = Frame::HEADER_SIZE + declared;
            if state.pending.len() < total {
                break;
            }

            let frame = Frame::decode(&state.pending[..total], DEFAULT_ADDRESS)
                .expect("host sent a malformed frame");
            state.pending.drain(..total);
            state.handle(frame);
        }

        Ok(())
    }

    fn recv_exact(&mut self, buf: &mut [u8]) -> r307_transport::Result<()> {
        let mut state = self.state.lock().unwrap();
        for (i, slot) in buf.iter_mut().enumerate() {
            match state.inbox.pop_front() {
                Some(byte) => *slot = byte,
                None => {
                    return Err(r307_transport::Error::ReadTimeout {
                        wanted: buf.len(),
                        got: i,
                    })
                }
            }
        }
        Ok(())
    }

    fn read_timeout(&self) -> Duration {
        Duration::from_secs(2)
    }

    fn describe(&self) -> String {
        "fake-sensor".into()
    }
}
