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

//! Simple RLOGIN Client Example
//!
//! Connects to an rlogin server, prints whatever the remote shell sends,
//! and forwards lines typed on stdin. Type `~.` at the start of a line to
//! disconnect.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --example simple_client -- <host> <port> <local-user> <remote-user>
//! ```

use async_trait::async_trait;
use rloginix_client::{ClientConfig, ConnectionHandler, RloginClient, RloginConnection};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

/// Prints server output and signals when the connection goes away.
struct SimpleHandler {
    closed_tx: mpsc::UnboundedSender<()>,
}

#[async_trait]
impl ConnectionHandler for SimpleHandler {
    async fn on_connect(&self, conn: &RloginConnection) {
        println!("=== Connected to {} ===", conn.config().address());
    }

    async fn on_data(&self, _conn: &RloginConnection, data: &[u8]) {
        print!("{}", String::from_utf8_lossy(data));
        let _ = std::io::stdout().flush();
    }

    async fn on_close(&self, _conn: &RloginConnection) {
        println!("\n=== Connection closed ===");
        let _ = self.closed_tx.send(());
    }

    async fn on_error(&self, _conn: &RloginConnection, error: rloginix_client::ClientError) {
        eprintln!("connection error: {}", error);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 5 {
        eprintln!(
            "Usage: {} <host> <port> <local-user> <remote-user>",
            args[0]
        );
        std::process::exit(1);
    }
    let host = &args[1];
    let port: u16 = args[2].parse()?;

    let term = std::env::var("TERM").unwrap_or_else(|_| "vt100".to_string());
    let config = ClientConfig::new(host.as_str(), port)
        .with_client_username(args[3].as_str())
        .with_server_username(args[4].as_str())
        .with_terminal(term, 9600);

    let (closed_tx, mut closed_rx) = mpsc::unbounded_channel();
    let client = RloginClient::new(config)?;
    let connection = client.connect(Arc::new(SimpleHandler { closed_tx })).await?;

    let stdin_conn = connection.clone();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let mut bytes = line.into_bytes();
            bytes.push(b'\r');
            if let Err(error) = stdin_conn.write(&bytes).await {
                eprintln!("send failed: {}", error);
                break;
            }
        }
    });

    closed_rx.recv().await;
    Ok(())
}
