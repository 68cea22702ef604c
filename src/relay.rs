// src/relay.rs
//! Peer link for two-machine games.
//!
//! Each side writes one line per accepted local move and runs a reader thread
//! that forwards whatever the peer sends over an `mpsc` channel. The thread
//! owning the [`crate::game::GameState`] drains that channel and applies moves
//! one at a time, in arrival order.

use crate::error::{ProtocolError, RelayError};
use crate::protocol::{self, WireMove};
use std::io::{BufRead, BufReader, Write};
use std::net::{Ipv4Addr, Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

#[derive(Debug)]
pub enum PeerEvent {
    /// A hosted game accepted its peer.
    Connected(PeerLink),
    Move(WireMove),
    Malformed(ProtocolError),
    Closed,
    Failed(RelayError),
}

/// Write half of a connection; the read half lives on the reader thread.
#[derive(Debug)]
pub struct PeerLink {
    stream: TcpStream,
    peer: SocketAddr,
}

impl PeerLink {
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    /// Sends one move line and flushes it.
    pub fn send(&mut self, mv: &WireMove) -> Result<(), RelayError> {
        writeln!(self.stream, "{}", protocol::encode(mv)).map_err(RelayError::Send)?;
        self.stream.flush().map_err(RelayError::Send)
    }

    /// Closes both directions; the reader thread then reports `Closed`.
    pub fn close(&self) {
        let _ = self.stream.shutdown(Shutdown::Both);
    }
}

/// A hosted game still waiting for its peer.
///
/// The listener lives on the accept thread. [`HostHandle::cancel`] (or
/// dropping the handle) stops that thread and releases the port before
/// returning.
#[derive(Debug)]
pub struct HostHandle {
    local: SocketAddr,
    cancelled: Arc<AtomicBool>,
    accept_thread: Option<JoinHandle<()>>,
}

impl HostHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local
    }

    /// Stops listening. A peer that was already accepted is unaffected.
    pub fn cancel(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let accept_thread = match self.accept_thread.take() {
            Some(t) => t,
            None => return,
        };
        self.cancelled.store(true, Ordering::SeqCst);
        // Wake the blocking accept; refused when the thread already finished.
        let _ = TcpStream::connect((Ipv4Addr::LOCALHOST, self.local.port()));
        let _ = accept_thread.join();
    }
}

impl Drop for HostHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Listens on `port` (0 picks a free one) and accepts a single peer in the
/// background. The link arrives as [`PeerEvent::Connected`]; the listener is
/// closed as soon as that peer is accepted.
pub fn host<T>(port: u16, events: Sender<T>) -> Result<HostHandle, RelayError>
where
    T: From<PeerEvent> + Send + 'static,
{
    let listener = TcpListener::bind(("0.0.0.0", port)).map_err(|e| RelayError::Bind(port, e))?;
    let local = listener.local_addr().map_err(|e| RelayError::Bind(port, e))?;
    let cancelled = Arc::new(AtomicBool::new(false));

    let flag = Arc::clone(&cancelled);
    let accept_thread = thread::spawn(move || {
        let accepted = listener.accept();
        drop(listener);
        if flag.load(Ordering::SeqCst) {
            return; // Woken by cancel; drop whatever connected
        }
        match accepted {
            Ok((stream, peer)) => match attach(stream, peer, events.clone()) {
                Ok(link) => { let _ = events.send(PeerEvent::Connected(link).into()); }
                Err(e) => { let _ = events.send(PeerEvent::Failed(e).into()); }
            },
            Err(e) => { let _ = events.send(PeerEvent::Failed(RelayError::Accept(e)).into()); }
        }
    });

    Ok(HostHandle { local, cancelled, accept_thread: Some(accept_thread) })
}

/// Connects to a hosting peer and starts the reader thread.
pub fn join<T>(host: &str, port: u16, events: Sender<T>) -> Result<PeerLink, RelayError>
where
    T: From<PeerEvent> + Send + 'static,
{
    let addr = format!("{}:{}", host, port);
    let stream = TcpStream::connect(addr.as_str()).map_err(|e| RelayError::Connect(addr.clone(), e))?;
    let peer = stream.peer_addr().map_err(|e| RelayError::Connect(addr, e))?;
    attach(stream, peer, events)
}

fn attach<T>(stream: TcpStream, peer: SocketAddr, events: Sender<T>) -> Result<PeerLink, RelayError>
where
    T: From<PeerEvent> + Send + 'static,
{
    let reader = stream.try_clone().map_err(|e| RelayError::Connect(peer.to_string(), e))?;
    thread::spawn(move || read_moves(BufReader::new(reader), events));
    Ok(PeerLink { stream, peer })
}

fn read_moves<R: BufRead, T: From<PeerEvent>>(reader: R, events: Sender<T>) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(_) => break,
        };
        if line.trim().is_empty() { continue; }
        let event = match protocol::decode(&line) {
            Ok(mv) => PeerEvent::Move(mv),
            Err(e) => PeerEvent::Malformed(e),
        };
        if events.send(event.into()).is_err() {
            return; // Owner is gone
        }
    }
    let _ = events.send(PeerEvent::Closed.into());
}
