//! Client side of the g15daemon socket protocol.
//!
//! After connecting, the daemon sends a 16 byte greeting and expects the
//! screen type of the client. Commands are single bytes, some with a small
//! value or-ed into the low bits. Once the key handler is enabled the daemon
//! pushes the full extra-key state as a little-endian `u32` on every change.

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};

use byteorder::{LittleEndian, ReadBytesExt};
use g15keys_core::{LedController, LedMask, SinkError};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 15550;

pub const GREETING: &[u8; 16] = b"G15 daemon HELLO";
/// Text buffer screen; the client never draws
pub const SCREEN_RBUF: &[u8; 4] = b"RBUF";

pub const CMD_KEY_HANDLER: u8 = 0x10;
pub const CMD_MKEYLEDS: u8 = 0x20;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("failed to connect to g15daemon at {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("unexpected greeting from g15daemon: {0:?}")]
    BadGreeting(String),

    #[error("g15daemon closed the connection")]
    Closed,

    #[error("g15daemon connection: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, ProtocolError>;

/// An established g15daemon session
#[derive(Debug)]
pub struct DaemonConnection {
    stream: TcpStream,
}

impl DaemonConnection {
    pub fn connect(host: &str, port: u16) -> Result<Self> {
        let stream = TcpStream::connect((host, port)).map_err(|source| ProtocolError::Connect {
            addr: format!("{host}:{port}"),
            source,
        })?;
        Self::handshake(stream)
    }

    /// Run the greeting exchange on an already connected stream
    pub fn handshake(mut stream: TcpStream) -> Result<Self> {
        let mut greeting = [0u8; 16];
        read_exact(&mut stream, &mut greeting)?;
        if &greeting != GREETING {
            return Err(ProtocolError::BadGreeting(
                String::from_utf8_lossy(&greeting).into_owned(),
            ));
        }
        stream.write_all(SCREEN_RBUF)?;
        debug!(peer = ?stream.peer_addr().ok(), "g15daemon handshake done");
        Ok(Self { stream })
    }

    /// Ask the daemon to forward extra-key state to this client
    pub fn enable_key_handler(&mut self) -> Result<()> {
        send_command(&mut self.stream, CMD_KEY_HANDLER)
    }

    pub fn set_leds(&mut self, leds: LedMask) -> Result<()> {
        send_command(&mut self.stream, CMD_MKEYLEDS | leds.bits())
    }

    /// Block until the next key state arrives
    pub fn read_key_state(&mut self) -> Result<u32> {
        match self.stream.read_u32::<LittleEndian>() {
            Ok(state) => Ok(state),
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => Err(ProtocolError::Closed),
            Err(err) => Err(err.into()),
        }
    }

    /// A second handle on the socket for sending LED commands
    pub fn led_controller(&self) -> Result<DaemonLeds> {
        Ok(DaemonLeds {
            stream: self.stream.try_clone()?,
        })
    }

    /// A handle that can close the socket from another thread
    pub fn closer(&self) -> Result<Closer> {
        Ok(Closer {
            stream: self.stream.try_clone()?,
        })
    }
}

/// Sends `MKEYLEDS` commands over a cloned socket handle
#[derive(Debug)]
pub struct DaemonLeds {
    stream: TcpStream,
}

impl LedController for DaemonLeds {
    fn set_leds(&mut self, leds: LedMask) -> std::result::Result<(), SinkError> {
        debug!(%leds, "setting M-key LEDs");
        send_command(&mut self.stream, CMD_MKEYLEDS | leds.bits())
            .map_err(|err| SinkError::new("g15daemon", err))
    }
}

/// Shuts the connection down, waking a reader blocked on it
#[derive(Debug)]
pub struct Closer {
    stream: TcpStream,
}

impl Closer {
    pub fn close(&self) {
        if let Err(err) = self.stream.shutdown(Shutdown::Both) {
            debug!("g15daemon socket shutdown: {}", err);
        }
    }
}

fn send_command(stream: &mut TcpStream, packet: u8) -> Result<()> {
    debug!("sending command {:#04x}", packet);
    stream.write_all(&[packet])?;
    Ok(())
}

fn read_exact(stream: &mut TcpStream, buf: &mut [u8]) -> Result<()> {
    stream.read_exact(buf).map_err(|err| match err.kind() {
        io::ErrorKind::UnexpectedEof => ProtocolError::Closed,
        _ => ProtocolError::Io(err),
    })
}
