// Shared helpers for session-core integration tests
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use callmedia_session_core::prelude::*;
use callmedia_session_core::StreamErrorKind;
use tracing_subscriber::EnvFilter;

/// Route negotiation and session traces to the test output; `RUST_LOG` selects the level
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Everything the mock endpoint and its streams were asked to do, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Created(usize),
    Started(usize),
    Destroyed(usize),
    Paused(usize, MediaDirection),
    Resumed(usize, MediaDirection),
    Dialed(usize, String),
}

pub type EventLog = Arc<Mutex<Vec<Event>>>;

/// Stream factory that records every call and fails on request
#[derive(Default)]
pub struct MockEndpoint {
    registry: StaticCodecRegistry,
    log: EventLog,
    fail_create_at: Option<usize>,
    fail_start_at: Option<usize>,
    fail_pause_at: Option<usize>,
    fail_destroy_at: Option<usize>,
    incoming_dtmf: String,
}

impl MockEndpoint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_create_at(mut self, index: usize) -> Self {
        self.fail_create_at = Some(index);
        self
    }

    pub fn fail_start_at(mut self, index: usize) -> Self {
        self.fail_start_at = Some(index);
        self
    }

    pub fn fail_pause_at(mut self, index: usize) -> Self {
        self.fail_pause_at = Some(index);
        self
    }

    pub fn fail_destroy_at(mut self, index: usize) -> Self {
        self.fail_destroy_at = Some(index);
        self
    }

    /// Digits every stream reports as received
    pub fn with_incoming_dtmf(mut self, digits: &str) -> Self {
        self.incoming_dtmf = digits.to_string();
        self
    }

    pub fn events(&self) -> Vec<Event> {
        self.log.lock().unwrap().clone()
    }

    fn record(&self, event: Event) {
        self.log.lock().unwrap().push(event);
    }
}

#[async_trait]
impl MediaEndpoint for MockEndpoint {
    type Stream = MockStream;

    fn codec_registry(&self) -> &dyn CodecRegistry {
        &self.registry
    }

    async fn create_stream(
        &self,
        info: &StreamInfo,
        ctx: &StreamContext,
    ) -> std::result::Result<MockStream, StreamError> {
        if self.fail_create_at == Some(ctx.index) {
            return Err(StreamError::new(StreamErrorKind::Transport, "no route to host"));
        }
        self.record(Event::Created(ctx.index));
        Ok(MockStream {
            index: ctx.index,
            info: info.clone(),
            log: self.log.clone(),
            fail_start: self.fail_start_at == Some(ctx.index),
            fail_pause: self.fail_pause_at == Some(ctx.index),
            fail_destroy: self.fail_destroy_at == Some(ctx.index),
            incoming_dtmf: self.incoming_dtmf.clone(),
        })
    }
}

pub struct MockStream {
    index: usize,
    info: StreamInfo,
    log: EventLog,
    fail_start: bool,
    fail_pause: bool,
    fail_destroy: bool,
    incoming_dtmf: String,
}

impl MockStream {
    fn record(&self, event: Event) {
        self.log.lock().unwrap().push(event);
    }
}

#[async_trait]
impl MediaStream for MockStream {
    type Port = usize;

    async fn start(&mut self) -> std::result::Result<(), StreamError> {
        if self.fail_start {
            return Err(StreamError::new(StreamErrorKind::Codec, "codec open failed"));
        }
        self.record(Event::Started(self.index));
        Ok(())
    }

    async fn destroy(&mut self) -> std::result::Result<(), StreamError> {
        self.record(Event::Destroyed(self.index));
        if self.fail_destroy {
            return Err(StreamError::other("socket close failed"));
        }
        Ok(())
    }

    async fn pause(&mut self, direction: MediaDirection) -> std::result::Result<(), StreamError> {
        if self.fail_pause {
            return Err(StreamError::new(StreamErrorKind::InvalidState, "not running"));
        }
        self.record(Event::Paused(self.index, direction));
        Ok(())
    }

    async fn resume(&mut self, direction: MediaDirection) -> std::result::Result<(), StreamError> {
        self.record(Event::Resumed(self.index, direction));
        Ok(())
    }

    fn port(&self) -> std::result::Result<usize, StreamError> {
        Ok(self.index)
    }

    fn stat(&self) -> std::result::Result<StreamStat, StreamError> {
        Ok(StreamStat {
            tx_packets: self.index as u64 + 100,
            ..StreamStat::default()
        })
    }

    async fn dial_dtmf(&mut self, digits: &str) -> std::result::Result<(), StreamError> {
        if !self.info.can_send_dtmf() {
            return Err(StreamError::new(
                StreamErrorKind::Unsupported,
                "remote does not accept telephone-event",
            ));
        }
        self.record(Event::Dialed(self.index, digits.to_string()));
        Ok(())
    }

    fn has_dtmf(&self) -> bool {
        !self.incoming_dtmf.is_empty()
    }

    async fn get_dtmf(&mut self, max_digits: usize) -> std::result::Result<String, StreamError> {
        let take = max_digits.min(self.incoming_dtmf.len());
        Ok(self.incoming_dtmf.drain(..take).collect())
    }
}

pub fn audio(port: u16, formats: &[&str]) -> MediaDescription {
    MediaDescription::new(
        "audio",
        port,
        "RTP/AVP",
        formats.iter().map(|f| f.to_string()).collect(),
    )
}

pub fn description(addr: &str, media: Vec<MediaDescription>) -> SdpSession {
    media.into_iter().fold(
        SdpSession::new("-").with_connection_data(ConnectionData::new(addr)),
        SdpSession::with_media,
    )
}

/// `lines` PCMU audio lines on each side, telephone-event 101 on the local side
pub fn pcmu_pair(lines: usize) -> (SdpSession, SdpSession) {
    let local = (0..lines)
        .map(|i| {
            audio(4000 + 2 * i as u16, &["0", "101"])
                .with_rtpmap(RtpMapAttribute::new(101, "telephone-event", 8000))
        })
        .collect();
    let remote = (0..lines)
        .map(|i| audio(5000 + 2 * i as u16, &["0"]))
        .collect();
    (
        description("192.0.2.1", local),
        description("192.0.2.2", remote),
    )
}

pub fn sockets(n: usize) -> Vec<SocketInfo> {
    (0..n)
        .map(|i| SocketInfo::with_rtp(format!("127.0.0.1:{}", 20000 + 2 * i).parse().unwrap()).unwrap())
        .collect()
}
