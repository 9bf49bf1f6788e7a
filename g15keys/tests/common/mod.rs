#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::thread::{self, JoinHandle};

use byteorder::{LittleEndian, WriteBytesExt};

/// Plays g15daemon on a loopback port for a single client
pub struct FakeDaemon {
    pub port: u16,
    handle: JoinHandle<Vec<u8>>,
}

impl FakeDaemon {
    /// Greet with `greeting`, send each key state once the client has sent
    /// `expect_before_states` bytes, then close the sending side. Joining
    /// waits for the client to hang up and returns every byte it wrote.
    pub fn start(greeting: &'static [u8], expect_before_states: usize, states: Vec<u32>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
        let port = listener.local_addr().unwrap().port();

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("Failed to accept");
            stream.write_all(greeting).unwrap();

            let mut received = vec![0u8; expect_before_states];
            if stream.read_exact(&mut received).is_err() {
                return received;
            }
            for state in states {
                stream.write_u32::<LittleEndian>(state).unwrap();
            }
            stream.flush().unwrap();
            let _ = stream.shutdown(Shutdown::Write);

            // Whatever the client sends until it hangs up
            let mut rest = Vec::new();
            let _ = read_until_closed(&mut stream, &mut rest);
            received.extend(rest);
            received
        });

        Self { port, handle }
    }

    pub fn join(self) -> Vec<u8> {
        self.handle.join().expect("Fake daemon panicked")
    }
}

fn read_until_closed(stream: &mut TcpStream, out: &mut Vec<u8>) -> std::io::Result<()> {
    stream.read_to_end(out).map(|_| ())
}
