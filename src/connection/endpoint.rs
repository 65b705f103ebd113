//! TCP endpoint serving one peer at a time
//!
//! The endpoint never blocks: [`BridgeEndpoint::poll`] is called once per
//! tick and uses non-blocking accepts and reads, so command handling and the
//! maneuver loop stay on a single task. A new connection supersedes the
//! current peer; at most one client holds the helm.

use std::io;
use std::net::SocketAddr;

use anyhow::{Context, Result};
use bytes::{Buf, BytesMut};
use futures::FutureExt;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

use bridgelink_shared::codec::{encode_ack, CodecError, LineDecoder};
use bridgelink_shared::Ack;

/// Events surfaced by a poll
#[derive(Debug, Clone)]
pub enum ConnectionEvent {
    /// A client took the helm
    Connected { addr: SocketAddr },
    /// The active client was dropped
    Disconnected { reason: String },
}

/// One poll's worth of activity
#[derive(Debug, Default)]
pub struct Polled {
    pub events: Vec<ConnectionEvent>,
    /// Complete message lines, in arrival order
    pub lines: Vec<String>,
}

struct Peer {
    stream: TcpStream,
    addr: SocketAddr,
    decoder: LineDecoder,
    outbound: BytesMut,
}

impl Peer {
    fn new(stream: TcpStream, addr: SocketAddr) -> Self {
        Self {
            stream,
            addr,
            decoder: LineDecoder::new(),
            outbound: BytesMut::new(),
        }
    }
}

/// Listening socket plus the single active peer
pub struct BridgeEndpoint {
    listener: TcpListener,
    peer: Option<Peer>,
}

impl BridgeEndpoint {
    pub async fn bind(addr: &str) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        info!("listening on {}", listener.local_addr()?);
        Ok(Self {
            listener,
            peer: None,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn has_peer(&self) -> bool {
        self.peer.is_some()
    }

    /// Run one non-blocking service pass: accept, flush, read
    pub fn poll(&mut self) -> Polled {
        let mut polled = Polled::default();

        self.accept_pending(&mut polled);
        self.flush_outbound(&mut polled);
        self.read_incoming(&mut polled);

        polled
    }

    /// Queue an acknowledgment for the active peer
    ///
    /// With no peer connected the ack is dropped; command effects have
    /// already been applied and are not rolled back.
    pub fn send(&mut self, ack: &Ack) {
        let Some(peer) = self.peer.as_mut() else {
            debug!("no peer connected, dropping ack: {}", ack.message);
            return;
        };
        match encode_ack(ack) {
            Ok(bytes) => peer.outbound.extend_from_slice(&bytes),
            Err(e) => warn!("failed to encode ack: {e}"),
        }
    }

    /// Drain pending accepts; the last arrival wins the helm
    fn accept_pending(&mut self, polled: &mut Polled) {
        loop {
            match self.listener.accept().now_or_never() {
                Some(Ok((stream, addr))) => {
                    if let Some(old) = self.peer.take() {
                        info!("peer {} superseded by {}", old.addr, addr);
                        polled.events.push(ConnectionEvent::Disconnected {
                            reason: format!("superseded by connection from {addr}"),
                        });
                    }
                    info!("peer connected: {addr}");
                    self.peer = Some(Peer::new(stream, addr));
                    polled.events.push(ConnectionEvent::Connected { addr });
                }
                Some(Err(e)) => {
                    warn!("accept failed: {e}");
                    break;
                }
                None => break,
            }
        }
    }

    fn flush_outbound(&mut self, polled: &mut Polled) {
        let mut failure = None;
        if let Some(peer) = self.peer.as_mut() {
            while !peer.outbound.is_empty() {
                match peer.stream.try_write(&peer.outbound) {
                    Ok(0) => {
                        failure = Some("peer closed connection".to_string());
                        break;
                    }
                    Ok(n) => peer.outbound.advance(n),
                    Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => break,
                    Err(e) => {
                        failure = Some(format!("write error: {e}"));
                        break;
                    }
                }
            }
        }
        if let Some(reason) = failure {
            self.drop_peer(&reason, polled);
        }
    }

    fn read_incoming(&mut self, polled: &mut Polled) {
        let mut failure = None;
        if let Some(peer) = self.peer.as_mut() {
            let mut buf = [0u8; 4096];
            loop {
                match peer.stream.try_read(&mut buf) {
                    Ok(0) => {
                        failure = Some("peer closed connection".to_string());
                        break;
                    }
                    Ok(n) => peer.decoder.extend(&buf[..n]),
                    Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => break,
                    Err(e) => {
                        failure = Some(format!("read error: {e}"));
                        break;
                    }
                }
            }

            // Drain complete lines even when the read ended the connection,
            // so commands that fully arrived are still acknowledged.
            loop {
                match peer.decoder.next_line() {
                    Ok(Some(line)) => polled.lines.push(line),
                    Ok(None) => break,
                    Err(e @ CodecError::LineTooLong) => {
                        failure = Some(e.to_string());
                        break;
                    }
                    Err(e) => {
                        failure = Some(format!("decode error: {e}"));
                        break;
                    }
                }
            }
        }
        if let Some(reason) = failure {
            self.drop_peer(&reason, polled);
        }
    }

    fn drop_peer(&mut self, reason: &str, polled: &mut Polled) {
        if let Some(peer) = self.peer.take() {
            warn!("dropping peer {}: {reason}", peer.addr);
            polled.events.push(ConnectionEvent::Disconnected {
                reason: reason.to_string(),
            });
        }
    }
}
