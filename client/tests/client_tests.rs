//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! End-to-end client tests against a loopback server

use async_trait::async_trait;
use rloginix_client::{
    ClientConfig, ClientError, ConnectionHandler, RloginClient, RloginConnection,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::time::{timeout, Duration};

/// The preamble the test configuration produces, used by every fake server.
const PREAMBLE: &[u8] = b"\x00user1\x00user2\x00vt100/9600\x00";

#[derive(Debug, PartialEq, Eq)]
enum Event {
    Connect,
    Data(Vec<u8>),
    Close,
    Error(String),
}

struct RecordingHandler {
    tx: mpsc::UnboundedSender<Event>,
}

#[async_trait]
impl ConnectionHandler for RecordingHandler {
    async fn on_connect(&self, _conn: &RloginConnection) {
        let _ = self.tx.send(Event::Connect);
    }

    async fn on_data(&self, _conn: &RloginConnection, data: &[u8]) {
        let _ = self.tx.send(Event::Data(data.to_vec()));
    }

    async fn on_close(&self, _conn: &RloginConnection) {
        let _ = self.tx.send(Event::Close);
    }

    async fn on_error(&self, _conn: &RloginConnection, error: ClientError) {
        let _ = self.tx.send(Event::Error(error.to_string()));
    }
}

fn recording_handler() -> (Arc<RecordingHandler>, mpsc::UnboundedReceiver<Event>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Arc::new(RecordingHandler { tx }), rx)
}

fn test_config(port: u16) -> ClientConfig {
    ClientConfig::new("127.0.0.1", port)
        .with_client_username("user1")
        .with_server_username("user2")
        .with_terminal("vt100", 9600)
}

async fn bind() -> (TcpListener, u16) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    (listener, port)
}

/// Accepts one connection, consumes the preamble, and acknowledges it.
async fn accept_and_ack(listener: &TcpListener) -> TcpStream {
    let (mut socket, _) = listener.accept().await.unwrap();
    let mut preamble = vec![0u8; PREAMBLE.len()];
    socket.read_exact(&mut preamble).await.unwrap();
    assert_eq!(preamble, PREAMBLE);
    socket.write_all(&[0x00]).await.unwrap();
    socket
}

async fn next_event(rx: &mut mpsc::UnboundedReceiver<Event>) -> Event {
    timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for an event")
        .expect("event channel closed")
}

/// Collects `Data` events until `expected` bytes have accumulated.
async fn collect_data(rx: &mut mpsc::UnboundedReceiver<Event>, expected: usize) -> Vec<u8> {
    let mut data = Vec::new();
    while data.len() < expected {
        match next_event(rx).await {
            Event::Data(bytes) => data.extend_from_slice(&bytes),
            other => panic!("expected data, got {:?}", other),
        }
    }
    data
}

// ============================================================================
// Handshake
// ============================================================================

#[tokio::test]
async fn preamble_bytes_on_the_wire() {
    let (listener, port) = bind().await;
    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut preamble = vec![0u8; 24];
        socket.read_exact(&mut preamble).await.unwrap();
        socket.write_all(&[0x00]).await.unwrap();
        (preamble, socket)
    });

    let (handler, mut rx) = recording_handler();
    let client = RloginClient::new(test_config(port)).unwrap();
    let connection = client.connect(handler).await.unwrap();
    assert_eq!(next_event(&mut rx).await, Event::Connect);
    assert!(connection.is_connected().await);
    assert!(connection.is_cooked().await);

    let (preamble, _socket) = server.await.unwrap();
    assert_eq!(
        preamble,
        [
            0x00, 0x75, 0x73, 0x65, 0x72, 0x31, 0x00, 0x75, 0x73, 0x65, 0x72, 0x32, 0x00, 0x76,
            0x74, 0x31, 0x30, 0x30, 0x2F, 0x39, 0x36, 0x30, 0x30, 0x00,
        ],
    );
}

#[tokio::test]
async fn ack_and_greeting_in_one_chunk() {
    let (listener, port) = bind().await;
    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut preamble = vec![0u8; PREAMBLE.len()];
        socket.read_exact(&mut preamble).await.unwrap();
        // Acknowledgement and greeting ride in the same segment.
        socket.write_all(b"\x00Welcome").await.unwrap();
        socket
    });

    let (handler, mut rx) = recording_handler();
    let client = RloginClient::new(test_config(port)).unwrap();
    let _connection = client.connect(handler).await.unwrap();

    assert_eq!(next_event(&mut rx).await, Event::Connect);
    assert_eq!(collect_data(&mut rx, 7).await, b"Welcome");

    let _socket = server.await.unwrap();
}

#[tokio::test]
async fn rejected_handshake_fails_the_connect() {
    let (listener, port) = bind().await;
    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut preamble = vec![0u8; PREAMBLE.len()];
        socket.read_exact(&mut preamble).await.unwrap();
        socket.write_all(&[0x01]).await.unwrap();
        socket
    });

    let (handler, mut rx) = recording_handler();
    let client = RloginClient::new(test_config(port)).unwrap();
    let error = client.connect(handler).await.err().unwrap();
    assert!(matches!(error, ClientError::HandshakeRejected));
    // The connection never came up, so no close event is delivered.
    assert!(rx.try_recv().is_err());

    let _socket = server.await.unwrap();
}

#[tokio::test]
async fn silent_server_times_out() {
    let (listener, port) = bind().await;
    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
        socket
    });

    let (handler, _rx) = recording_handler();
    let config = test_config(port).with_connect_timeout(Duration::from_millis(100));
    let client = RloginClient::new(config).unwrap();
    let error = client.connect(handler).await.err().unwrap();
    assert!(matches!(error, ClientError::ConnectionTimeout));

    server.abort();
}

#[tokio::test]
async fn server_hangup_before_ack_fails_the_connect() {
    let (listener, port) = bind().await;
    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        drop(socket);
    });

    let (handler, _rx) = recording_handler();
    let client = RloginClient::new(test_config(port)).unwrap();
    let error = client.connect(handler).await.err().unwrap();
    assert!(matches!(
        error,
        ClientError::ConnectionClosed | ClientError::Io(_),
    ));

    server.await.unwrap();
}

// ============================================================================
// Steady State
// ============================================================================

#[tokio::test]
async fn window_size_reported_on_request() {
    let (listener, port) = bind().await;
    let server = tokio::spawn(async move {
        let mut socket = accept_and_ack(&listener).await;
        socket.write_all(&[0x80]).await.unwrap();
        let mut frame = vec![0u8; 12];
        socket.read_exact(&mut frame).await.unwrap();
        (frame, socket)
    });

    let (handler, mut rx) = recording_handler();
    let client = RloginClient::new(test_config(port)).unwrap();
    let _connection = client.connect(handler).await.unwrap();
    assert_eq!(next_event(&mut rx).await, Event::Connect);

    let (frame, _socket) = server.await.unwrap();
    assert_eq!(
        frame,
        [0xFF, 0xFF, 0x73, 0x73, 0x18, 0x00, 0x50, 0x00, 0x80, 0x02, 0xE0, 0x01],
    );
}

#[tokio::test]
async fn resized_window_is_reported() {
    let (listener, port) = bind().await;
    let server = tokio::spawn(async move {
        let mut socket = accept_and_ack(&listener).await;
        let mut frame = vec![0u8; 12];
        socket.read_exact(&mut frame).await.unwrap();
        (frame, socket)
    });

    let (handler, mut rx) = recording_handler();
    let client = RloginClient::new(test_config(port)).unwrap();
    let connection = client.connect(handler).await.unwrap();
    assert_eq!(next_event(&mut rx).await, Event::Connect);

    connection.set_rows(50).await.unwrap();
    connection.set_columns(132).await.unwrap();
    connection.send_window_size().await.unwrap();

    let (frame, _socket) = server.await.unwrap();
    assert_eq!(&frame[..4], &[0xFF, 0xFF, 0x73, 0x73]);
    assert_eq!(u16::from_le_bytes([frame[4], frame[5]]), 50);
    assert_eq!(u16::from_le_bytes([frame[6], frame[7]]), 132);
}

#[tokio::test]
async fn raw_mode_is_visible_to_the_caller() {
    let (listener, port) = bind().await;
    let server = tokio::spawn(async move {
        let mut socket = accept_and_ack(&listener).await;
        socket
            .write_all(b"Begin\x10Start\x11Stop\x13End")
            .await
            .unwrap();
        socket
    });

    let (handler, mut rx) = recording_handler();
    let client = RloginClient::new(test_config(port)).unwrap();
    let connection = client.connect(handler).await.unwrap();
    assert_eq!(next_event(&mut rx).await, Event::Connect);

    let expected = b"BeginStart\x11Stop\x13End";
    let data = collect_data(&mut rx, expected.len()).await;
    assert_eq!(data, expected);
    assert!(!connection.is_cooked().await);

    let _socket = server.await.unwrap();
}

// ============================================================================
// Client Escapes
// ============================================================================

#[tokio::test]
async fn escape_disconnect_flushes_and_closes() {
    let (listener, port) = bind().await;
    let server = tokio::spawn(async move {
        let mut socket = accept_and_ack(&listener).await;
        let mut received = Vec::new();
        socket.read_to_end(&mut received).await.unwrap();
        received
    });

    let (handler, mut rx) = recording_handler();
    let client = RloginClient::new(test_config(port)).unwrap();
    let connection = client.connect(handler).await.unwrap();
    assert_eq!(next_event(&mut rx).await, Event::Connect);

    connection.write(b"Hello").await.unwrap();
    connection.write(b"World~.").await.unwrap();

    assert_eq!(next_event(&mut rx).await, Event::Close);
    assert_eq!(server.await.unwrap(), b"HelloWorld");

    // The connection is gone; further writes are refused.
    let error = connection.write(b"more").await.err().unwrap();
    assert_eq!(error.to_string(), "RLogin client not connected");
    let error = connection.send_window_size().await.err().unwrap();
    assert!(matches!(error, ClientError::NotConnected));
}

#[tokio::test]
async fn suspend_escape_blocks_input() {
    let (listener, port) = bind().await;
    let server = tokio::spawn(async move {
        let socket = accept_and_ack(&listener).await;
        socket
    });

    let (handler, mut rx) = recording_handler();
    let client = RloginClient::new(test_config(port)).unwrap();
    let connection = client.connect(handler).await.unwrap();
    assert_eq!(next_event(&mut rx).await, Event::Connect);

    // The suspend escape consumes itself and flips the gate.
    connection.write(b"~\x19").await.unwrap();
    let error = connection.write(b"blocked").await.err().unwrap();
    assert_eq!(error.to_string(), "input has been suspended");

    let _socket = server.await.unwrap();
}

#[tokio::test]
async fn custom_escape_handler_fires() {
    let (listener, port) = bind().await;
    let server = tokio::spawn(async move {
        let socket = accept_and_ack(&listener).await;
        socket
    });

    let (handler, mut rx) = recording_handler();
    let client = RloginClient::new(test_config(port)).unwrap();
    let connection = client.connect(handler).await.unwrap();
    assert_eq!(next_event(&mut rx).await, Event::Connect);

    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    connection
        .add_client_escape('!', move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .await
        .unwrap();
    connection.write(b"~!").await.unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    let error = connection
        .add_client_escape("....", || {})
        .await
        .err()
        .unwrap();
    assert_eq!(
        error.to_string(),
        "add_client_escape: invalid string argument"
    );

    let _socket = server.await.unwrap();
}

// ============================================================================
// Teardown
// ============================================================================

#[tokio::test]
async fn disconnect_is_idempotent() {
    let (listener, port) = bind().await;
    let server = tokio::spawn(async move {
        let socket = accept_and_ack(&listener).await;
        socket
    });

    let (handler, mut rx) = recording_handler();
    let client = RloginClient::new(test_config(port)).unwrap();
    let connection = client.connect(handler).await.unwrap();
    assert_eq!(next_event(&mut rx).await, Event::Connect);

    connection.disconnect().await.unwrap();
    connection.disconnect().await.unwrap();
    connection.disconnect().await.unwrap();

    assert_eq!(next_event(&mut rx).await, Event::Close);
    // Exactly one close event, no stragglers.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(rx.try_recv().is_err());

    let _socket = server.await.unwrap();
}

#[tokio::test]
async fn server_hangup_closes_the_connection() {
    let (listener, port) = bind().await;
    let server = tokio::spawn(async move {
        let socket = accept_and_ack(&listener).await;
        drop(socket);
    });

    let (handler, mut rx) = recording_handler();
    let client = RloginClient::new(test_config(port)).unwrap();
    let connection = client.connect(handler).await.unwrap();
    assert_eq!(next_event(&mut rx).await, Event::Connect);

    assert_eq!(next_event(&mut rx).await, Event::Close);
    assert!(!connection.is_connected().await);

    server.await.unwrap();
}
