//! Media session management
//!
//! A [`MediaSession`] is the set of media streams negotiated from one
//! local/remote description pair. Creation is transactional: either every
//! stream is created and started, or every stream created so far is destroyed
//! again and the session never comes into existence.

use std::sync::Arc;

use callmedia_sdp_core::SdpSession;
use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::error::{Error, Result};
use crate::negotiator::negotiate;
use crate::stream::{MediaEndpoint, MediaStream, StreamContext, StreamError, StreamStat};
use crate::types::{MediaDirection, SessionId, SessionInfo, SocketInfo, StreamInfo};

/// Port type of the streams produced by endpoint `E`
pub type StreamPort<E> = <<E as MediaEndpoint>::Stream as MediaStream>::Port;

struct SessionStream<S> {
    info: StreamInfo,
    stream: S,
}

/// A set of negotiated, running media streams
///
/// Stream indices follow the media lines of the local description and stay
/// stable for the lifetime of the session. All mutation goes through
/// `&mut self`; share a session between tasks behind a mutex.
pub struct MediaSession<E: MediaEndpoint, U = ()> {
    id: SessionId,
    endpoint: Arc<E>,
    user_data: U,
    streams: Vec<SessionStream<E::Stream>>,
    config: SessionConfig,
}

impl<E: MediaEndpoint, U> MediaSession<E, U> {
    /// Negotiate and start every stream of the description pair with the
    /// default [`SessionConfig`].
    ///
    /// `stream_count` is a lower bound; the session holds
    /// `max(stream_count, local media count)` streams and `sockets` must
    /// provide one endpoint for each of them.
    pub async fn create(
        endpoint: Arc<E>,
        stream_count: usize,
        sockets: &[SocketInfo],
        local: &SdpSession,
        remote: &SdpSession,
        user_data: U,
    ) -> Result<Self> {
        Self::create_with_config(
            endpoint,
            stream_count,
            sockets,
            local,
            remote,
            user_data,
            SessionConfig::default(),
        )
        .await
    }

    /// Like [`MediaSession::create`] with an explicit configuration.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] for a zero `stream_count` or too few sockets
    /// - [`Error::TooManyStreams`] if the stream count exceeds `config.max_streams`
    /// - [`Error::Negotiation`] naming the first media line that failed to negotiate
    /// - [`Error::StreamCreation`] naming the stream that failed to be created or
    ///   started, after every stream created before it was destroyed
    pub async fn create_with_config(
        endpoint: Arc<E>,
        stream_count: usize,
        sockets: &[SocketInfo],
        local: &SdpSession,
        remote: &SdpSession,
        user_data: U,
        config: SessionConfig,
    ) -> Result<Self> {
        config.validate()?;

        if stream_count == 0 {
            return Err(Error::InvalidArgument("stream count must be at least 1".into()));
        }

        let count = stream_count.max(local.media_count());
        if count > config.max_streams {
            return Err(Error::TooManyStreams {
                requested: count,
                max: config.max_streams,
            });
        }
        if sockets.len() < count {
            return Err(Error::InvalidArgument(format!(
                "{} socket endpoints supplied for {} streams",
                sockets.len(),
                count
            )));
        }

        let id = SessionId::new();
        debug!("Creating media session {} with {} streams", id, count);

        let mut infos = Vec::with_capacity(count);
        for (index, socket) in sockets.iter().take(count).enumerate() {
            let mut info = negotiate(
                local,
                remote,
                index,
                endpoint.codec_registry(),
                &config.negotiation,
            )
            .map_err(|source| Error::Negotiation { index, source })?;
            info.transport = Some(*socket);
            infos.push(info);
        }

        let mut created: Vec<SessionStream<E::Stream>> = Vec::with_capacity(count);
        for (index, info) in infos.into_iter().enumerate() {
            let ctx = StreamContext {
                session_id: id,
                index,
            };

            let mut stream = match endpoint.create_stream(&info, &ctx).await {
                Ok(stream) => stream,
                Err(source) => {
                    warn!("Session {}: failed to create stream {}: {}", id, index, source);
                    Self::rollback(id, &mut created).await;
                    return Err(Error::StreamCreation { index, source });
                }
            };

            let started = stream.start().await;
            created.push(SessionStream { info, stream });
            if let Err(source) = started {
                warn!("Session {}: failed to start stream {}: {}", id, index, source);
                Self::rollback(id, &mut created).await;
                return Err(Error::StreamCreation { index, source });
            }
        }

        info!("Media session {} created with {} streams", id, created.len());

        Ok(Self {
            id,
            endpoint,
            user_data,
            streams: created,
            config,
        })
    }

    /// Destroy streams in reverse creation order
    async fn rollback(id: SessionId, created: &mut Vec<SessionStream<E::Stream>>) {
        while let Some(mut entry) = created.pop() {
            if let Err(e) = entry.stream.destroy().await {
                warn!("Session {}: rollback of stream failed: {}", id, e);
            }
        }
    }

    /// Destroy every stream in index order and release the session.
    ///
    /// Every stream is destroyed even if an earlier one fails; the first
    /// failure is returned.
    pub async fn destroy(mut self) -> Result<()> {
        let streams = std::mem::take(&mut self.streams);
        let mut first_error = None;

        for (index, mut entry) in streams.into_iter().enumerate() {
            if let Err(e) = entry.stream.destroy().await {
                warn!("Session {}: failed to destroy stream {}: {}", self.id, index, e);
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }

        info!("Media session {} destroyed", self.id);

        match first_error {
            Some(e) => Err(Error::Stream(e)),
            None => Ok(()),
        }
    }

    /// Session identifier
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Caller-supplied context
    pub fn user_data(&self) -> &U {
        &self.user_data
    }

    /// Mutable access to the caller-supplied context
    pub fn user_data_mut(&mut self) -> &mut U {
        &mut self.user_data
    }

    /// Endpoint the streams were created from
    pub fn endpoint(&self) -> &Arc<E> {
        &self.endpoint
    }

    /// Configuration the session was created with
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Number of streams
    pub fn stream_count(&self) -> usize {
        self.streams.len()
    }

    /// Snapshot of every negotiated stream
    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            stream_count: self.streams.len(),
            streams: self.streams.iter().map(|s| s.info.clone()).collect(),
        }
    }

    /// Up to `max_count` stream infos in index order
    pub fn enum_streams(&self, max_count: usize) -> Result<Vec<StreamInfo>> {
        if max_count == 0 {
            return Err(Error::InvalidArgument("max_count must be at least 1".into()));
        }
        Ok(self
            .streams
            .iter()
            .take(max_count)
            .map(|s| s.info.clone())
            .collect())
    }

    /// Negotiated info of the stream at `index`
    pub fn stream_info(&self, index: usize) -> Result<&StreamInfo> {
        self.entry(index).map(|s| &s.info)
    }

    fn entry(&self, index: usize) -> Result<&SessionStream<E::Stream>> {
        let count = self.streams.len();
        self.streams.get(index).ok_or_else(|| index_error(index, count))
    }

    fn entry_mut(&mut self, index: usize) -> Result<&mut SessionStream<E::Stream>> {
        let count = self.streams.len();
        self.streams.get_mut(index).ok_or_else(|| index_error(index, count))
    }

    /// Pause every stream in `direction`
    ///
    /// A failing stream does not stop the others; the result for each stream
    /// is returned in index order.
    pub async fn pause(&mut self, direction: MediaDirection) -> Vec<std::result::Result<(), StreamError>> {
        let mut results = Vec::with_capacity(self.streams.len());
        for (index, entry) in self.streams.iter_mut().enumerate() {
            let result = entry.stream.pause(direction).await;
            if let Err(e) = &result {
                warn!("Session {}: failed to pause stream {}: {}", self.id, index, e);
            }
            results.push(result);
        }
        results
    }

    /// Resume every stream in `direction`
    ///
    /// A failing stream does not stop the others; the result for each stream
    /// is returned in index order.
    pub async fn resume(&mut self, direction: MediaDirection) -> Vec<std::result::Result<(), StreamError>> {
        let mut results = Vec::with_capacity(self.streams.len());
        for (index, entry) in self.streams.iter_mut().enumerate() {
            let result = entry.stream.resume(direction).await;
            if let Err(e) = &result {
                warn!("Session {}: failed to resume stream {}: {}", self.id, index, e);
            }
            results.push(result);
        }
        results
    }

    /// Pause one stream
    pub async fn pause_stream(&mut self, index: usize, direction: MediaDirection) -> Result<()> {
        self.entry_mut(index)?.stream.pause(direction).await?;
        Ok(())
    }

    /// Resume one stream
    pub async fn resume_stream(&mut self, index: usize, direction: MediaDirection) -> Result<()> {
        self.entry_mut(index)?.stream.resume(direction).await?;
        Ok(())
    }

    /// Media port of one stream
    pub fn port(&self, index: usize) -> Result<StreamPort<E>> {
        Ok(self.entry(index)?.stream.port()?)
    }

    /// Counters of one stream
    pub fn stream_stat(&self, index: usize) -> Result<StreamStat> {
        Ok(self.entry(index)?.stream.stat()?)
    }

    /// Send DTMF digits on one stream
    pub async fn dial_dtmf(&mut self, index: usize, digits: &str) -> Result<()> {
        if digits.is_empty() {
            return Err(Error::InvalidArgument("empty DTMF digit string".into()));
        }
        self.entry_mut(index)?.stream.dial_dtmf(digits).await?;
        Ok(())
    }

    /// True if one stream has received DTMF digits waiting
    pub fn has_dtmf(&self, index: usize) -> Result<bool> {
        Ok(self.entry(index)?.stream.has_dtmf())
    }

    /// Take up to `max_digits` received DTMF digits from one stream
    pub async fn get_dtmf(&mut self, index: usize, max_digits: usize) -> Result<String> {
        if max_digits == 0 {
            return Err(Error::InvalidArgument("max_digits must be at least 1".into()));
        }
        Ok(self.entry_mut(index)?.stream.get_dtmf(max_digits).await?)
    }
}

fn index_error(index: usize, count: usize) -> Error {
    Error::InvalidArgument(format!("stream index {} out of range ({} streams)", index, count))
}

impl<E: MediaEndpoint, U> Drop for MediaSession<E, U> {
    fn drop(&mut self) {
        if !self.streams.is_empty() {
            warn!(
                "Media session {} dropped with {} streams still active; call destroy()",
                self.id,
                self.streams.len()
            );
        }
    }
}

impl<E: MediaEndpoint, U> std::fmt::Debug for MediaSession<E, U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaSession")
            .field("id", &self.id)
            .field("stream_count", &self.streams.len())
            .field("config", &self.config)
            .finish()
    }
}
