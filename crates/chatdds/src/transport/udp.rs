// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! UDP multicast transport.
//!
//! One transport per domain and process. Every process binds the same
//! port (`239.255.0.1:user_multicast_port(domain)`) with address reuse
//! and multicast loopback, so any number of chat processes on one host
//! see each other. Datagrams sent by this process come back through the
//! loopback and are dropped by the listener.

use crate::config::{self, MAX_DATAGRAM_SIZE, MULTICAST_GROUP};
use crate::dds::{Error, Guid, Result};
use crate::transport::frame::Frame;
use crate::transport::multicast;
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, UdpSocket};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Receiver of decoded frames from other processes.
pub trait FrameHandler: Send + Sync {
    fn on_frame(&self, frame: Frame, from: SocketAddr);
}

/// UDP Transport for bidirectional multicast communication.
pub struct UdpTransport {
    domain_id: u32,
    socket: Arc<UdpSocket>,
    group_addr: SocketAddr,
    running: Arc<AtomicBool>,
    listener: parking_lot::Mutex<Option<JoinHandle<()>>>,
    sent: AtomicU64,
    send_errors: AtomicU64,
}

impl UdpTransport {
    /// Bind the domain's multicast port, join the group and start the
    /// listener thread delivering frames to `handler`.
    pub fn start(domain_id: u32, handler: Weak<dyn FrameHandler>) -> Result<Arc<Self>> {
        let port = config::user_multicast_port(domain_id);
        let socket = open_socket(port)?;
        let iface = multicast::select_interface();

        socket
            .join_multicast_v4(&MULTICAST_GROUP, &iface)
            .or_else(|e| {
                if iface.is_unspecified() {
                    Err(e)
                } else {
                    log::debug!(
                        "[UDP] join_multicast_v4({}) on {} failed ({}), retrying on UNSPECIFIED",
                        MULTICAST_GROUP,
                        iface,
                        e
                    );
                    socket.join_multicast_v4(&MULTICAST_GROUP, &Ipv4Addr::UNSPECIFIED)
                }
            })
            .map_err(|e| Error::MulticastJoinFailed(format!("{} on {}: {}", MULTICAST_GROUP, iface, e)))?;
        socket.set_multicast_loop_v4(true)?;
        socket.set_multicast_ttl_v4(config::multicast_ttl())?;
        socket.set_read_timeout(Some(Duration::from_millis(config::LISTENER_POLL_MS)))?;

        let socket = Arc::new(socket);
        let running = Arc::new(AtomicBool::new(true));
        let listener = spawn_listener(Arc::clone(&socket), Arc::clone(&running), handler, domain_id)?;

        log::info!(
            "[UDP] domain {} joined {}:{} iface={}",
            domain_id,
            MULTICAST_GROUP,
            port,
            iface
        );

        Ok(Arc::new(Self {
            domain_id,
            socket,
            group_addr: SocketAddr::V4(SocketAddrV4::new(MULTICAST_GROUP, port)),
            running,
            listener: parking_lot::Mutex::new(Some(listener)),
            sent: AtomicU64::new(0),
            send_errors: AtomicU64::new(0),
        }))
    }

    /// Encode and multicast one frame.
    pub fn send(&self, frame: &Frame) -> Result<()> {
        let bytes = frame.encode()?;
        match self.socket.send_to(&bytes, self.group_addr) {
            Ok(_) => {
                self.sent.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(e) => {
                self.send_errors.fetch_add(1, Ordering::Relaxed);
                Err(Error::SendFailed(format!("{} -> {}", e, self.group_addr)))
            }
        }
    }

    pub fn domain_id(&self) -> u32 {
        self.domain_id
    }

    pub fn group_addr(&self) -> SocketAddr {
        self.group_addr
    }

    /// Stop the listener thread and wait for it (bounded by the read timeout).
    pub fn shutdown(&self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.listener.lock().take() {
            // The listener may drop the last domain reference itself.
            if handle.thread().id() != thread::current().id() && handle.join().is_err() {
                log::warn!("[UDP] listener thread for domain {} panicked", self.domain_id);
            }
            log::debug!(
                "[UDP] domain {} closed: {} datagram(s) sent, {} send failure(s)",
                self.domain_id,
                self.sent.load(Ordering::Relaxed),
                self.send_errors.load(Ordering::Relaxed)
            );
        }
    }
}

impl Drop for UdpTransport {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn open_socket(port: u16) -> Result<UdpSocket> {
    let socket2 = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
    socket2.set_reuse_address(true)?;
    #[cfg(unix)]
    if config::reuseport_enabled() {
        set_reuseport(&socket2)?;
    }
    let bind_addr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, port));
    socket2
        .bind(&bind_addr.into())
        .map_err(|e| Error::BindFailed(format!("{}: {}", bind_addr, e)))?;
    log::debug!("[UDP] transport bind addr={}", bind_addr);
    Ok(socket2.into())
}

fn spawn_listener(
    socket: Arc<UdpSocket>,
    running: Arc<AtomicBool>,
    handler: Weak<dyn FrameHandler>,
    domain_id: u32,
) -> Result<JoinHandle<()>> {
    let handle = thread::Builder::new()
        .name(format!("chatdds-udp-{}", domain_id))
        .spawn(move || {
            let mut buf = vec![0u8; MAX_DATAGRAM_SIZE];
            while running.load(Ordering::Acquire) {
                let (len, from) = match socket.recv_from(&mut buf) {
                    Ok(received) => received,
                    Err(e)
                        if matches!(
                            e.kind(),
                            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
                        ) =>
                    {
                        continue;
                    }
                    Err(e) => {
                        log::debug!("[UDP] recv_from failed: {}", e);
                        thread::sleep(Duration::from_millis(config::LISTENER_POLL_MS));
                        continue;
                    }
                };

                let frame = match Frame::decode(&buf[..len]) {
                    Ok(frame) => frame,
                    Err(e) => {
                        log::trace!("[UDP] dropping {} byte datagram from {}: {}", len, from, e);
                        continue;
                    }
                };
                if Guid(frame.guid).is_local_process() {
                    continue;
                }

                match handler.upgrade() {
                    Some(handler) => handler.on_frame(frame, from),
                    None => break,
                }
            }
            log::debug!("[UDP] listener for domain {} stopped", domain_id);
        })?;
    Ok(handle)
}

#[cfg(unix)]
fn set_reuseport(socket: &Socket) -> io::Result<()> {
    use std::os::unix::io::AsRawFd;
    let fd = socket.as_raw_fd();
    let optval: libc::c_int = 1;
    // SAFETY: setsockopt FFI with valid fd, standard socket option, and correctly sized optval pointer
    let ret = unsafe {
        libc::setsockopt(
            fd,
            libc::SOL_SOCKET,
            libc::SO_REUSEPORT,
            &optval as *const _ as *const libc::c_void,
            std::mem::size_of::<libc::c_int>() as libc::socklen_t,
        )
    };
    if ret != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_socket_allows_shared_port() {
        // Two binds on the same port must both succeed (address reuse).
        let port = config::user_multicast_port(231);
        let a = open_socket(port).expect("first bind should succeed");
        let b = open_socket(port).expect("second bind should succeed");
        assert_eq!(a.local_addr().expect("addr").port(), port);
        assert_eq!(b.local_addr().expect("addr").port(), port);
    }
}
