//! Loopback tests for the TCP backend and the Gopher transport.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::JoinHandle;
use std::time::Duration;

use burrow_types::address::Address;
use burrow_types::error::BurrowError;

use super::*;

/// Spawn a one-shot Gopher server: accept one connection, read the request
/// line, answer with `response` in small pieces, then close.
///
/// The join handle yields the request line the server received.
fn spawn_gopher_server(response: Vec<u8>) -> (JoinHandle<String>, u16) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 256];
        while !request.ends_with(b"\r\n") {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        for piece in response.chunks(1000) {
            stream.write_all(piece).unwrap();
        }
        String::from_utf8(request).unwrap()
    });

    (handle, port)
}

fn connected(port: u16) -> GopherConnection {
    let mut backend = TcpBackend::default();
    let mut conn = GopherConnection::new();
    conn.connect(&mut backend, "127.0.0.1", port).unwrap();
    conn
}

#[test]
fn request_sends_selector_line_and_reads_to_eof() {
    let menu = "1Dir A\t/a\thost\t70\r\n1Dir B\t/b\thost\t70\r\n";
    let (handle, port) = spawn_gopher_server(menu.as_bytes().to_vec());

    let mut conn = connected(port);
    assert!(conn.is_connected());
    assert!(conn.is_connected_to(&Address::root("127.0.0.1", port)));

    let text = conn.request("/docs").unwrap();
    assert_eq!(text, menu);
    assert_eq!(handle.join().unwrap(), "/docs\r\n");
}

#[test]
fn empty_selector_is_sent_as_bare_crlf() {
    let (handle, port) = spawn_gopher_server(b"hello world\n".to_vec());
    let mut conn = connected(port);
    assert_eq!(conn.request("").unwrap(), "hello world\n");
    assert_eq!(handle.join().unwrap(), "\r\n");
}

#[test]
fn response_larger_than_one_chunk_is_concatenated() {
    let body: String = (0..READ_CHUNK_SIZE * 3)
        .map(|i| char::from(b'a' + (i % 26) as u8))
        .collect();
    let (handle, port) = spawn_gopher_server(body.clone().into_bytes());

    let mut conn = connected(port);
    let text = conn.request("/big").unwrap();
    assert_eq!(text.len(), body.len());
    assert_eq!(text, body);
    handle.join().unwrap();
}

#[test]
fn invalid_bytes_are_replaced_not_rejected() {
    let (handle, port) = spawn_gopher_server(b"ok \xff\xfe done".to_vec());
    let mut conn = connected(port);
    let text = conn.request("/bin").unwrap();
    assert_eq!(text, "ok \u{fffd}\u{fffd} done");
    handle.join().unwrap();
}

#[test]
fn connection_is_closed_after_one_response() {
    let (handle, port) = spawn_gopher_server(b"done".to_vec());
    let mut conn = connected(port);
    conn.request("/").unwrap();
    handle.join().unwrap();

    assert!(!conn.is_connected());
    assert_eq!(conn.state(), ConnectionState::Disconnected);
    assert!(matches!(conn.request("/again"), Err(BurrowError::NotConnected)));
}

#[test]
fn reset_mid_response_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let handle = std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        // Wait for the request but leave it unread: closing a socket with
        // unread input makes the kernel send RST instead of FIN.
        let mut buf = [0u8; 64];
        stream.peek(&mut buf).unwrap();
        stream.write_all(b"1Partial\t/p\th").unwrap();
    });

    let mut conn = connected(port);
    let err = conn.request("/docs").unwrap_err();
    handle.join().unwrap();

    assert!(
        matches!(err, BurrowError::Transport { context: "read response", .. }),
        "expected transport error, got {err:?}"
    );
    assert!(!conn.is_connected());
    assert_eq!(conn.state(), ConnectionState::Failed);
    assert!(matches!(conn.request("/docs"), Err(BurrowError::NotConnected)));
}

#[test]
fn refused_connection_is_a_connection_error() {
    // Bind then drop to get a port nobody listens on.
    let port = {
        let tmp = TcpListener::bind("127.0.0.1:0").unwrap();
        tmp.local_addr().unwrap().port()
    };

    let mut backend = TcpBackend::new(Duration::from_secs(2));
    let mut conn = GopherConnection::new();
    let err = conn.connect(&mut backend, "127.0.0.1", port).unwrap_err();

    match err {
        BurrowError::Connection { host, port: p, .. } => {
            assert_eq!(host, "127.0.0.1");
            assert_eq!(p, port);
        },
        other => panic!("expected Connection error, got {other:?}"),
    }
    assert_eq!(conn.state(), ConnectionState::Failed);
    assert!(!conn.is_connected());
    assert_eq!(conn.peer(), Some(("127.0.0.1", port)));
}

#[test]
fn connect_replaces_previous_connection() {
    let first = TcpListener::bind("127.0.0.1:0").unwrap();
    let first_port = first.local_addr().unwrap().port();
    let (handle, second_port) = spawn_gopher_server(b"second".to_vec());

    let mut backend = TcpBackend::default();
    let mut conn = GopherConnection::new();
    conn.connect(&mut backend, "127.0.0.1", first_port).unwrap();
    conn.connect(&mut backend, "127.0.0.1", second_port).unwrap();

    assert!(conn.is_connected_to(&Address::root("127.0.0.1", second_port)));
    assert!(!conn.is_connected_to(&Address::root("127.0.0.1", first_port)));
    assert_eq!(conn.request("").unwrap(), "second");
    handle.join().unwrap();
}

#[test]
fn tcp_backend_default_timeout() {
    let backend = TcpBackend::default();
    assert_eq!(backend.connect_timeout(), Duration::from_secs(10));
}
