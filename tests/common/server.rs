//! Fake IRC server.

use std::sync::Arc;
use std::time::Duration;

use snekbot::Config;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpListener;
use tokio::time::timeout;

/// Listens on an ephemeral local port.
pub struct FakeServer {
    listener: TcpListener,
}

impl FakeServer {
    pub async fn bind() -> anyhow::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        Ok(Self { listener })
    }

    pub fn port(&self) -> u16 {
        self.listener
            .local_addr()
            .map(|a| a.port())
            .unwrap_or_default()
    }

    /// Wait for the bot to connect.
    pub async fn accept(&self) -> anyhow::Result<FakePeer> {
        let (stream, _) = timeout(Duration::from_secs(5), self.listener.accept()).await??;
        let (read_half, write_half) = stream.into_split();
        Ok(FakePeer {
            reader: BufReader::new(read_half),
            writer: BufWriter::new(write_half),
        })
    }

    /// Whether the bot connects again within `dur`.
    #[allow(dead_code)]
    pub async fn accepts_within(&self, dur: Duration) -> bool {
        timeout(dur, self.listener.accept()).await.is_ok()
    }
}

/// The server side of one bot connection.
pub struct FakePeer {
    reader: BufReader<OwnedReadHalf>,
    writer: BufWriter<OwnedWriteHalf>,
}

impl FakePeer {
    /// Send a raw line; CRLF is appended.
    pub async fn send_raw(&mut self, line: &str) -> anyhow::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\r\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Send bytes exactly as given.
    #[allow(dead_code)]
    pub async fn send_bytes(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
        self.writer.write_all(bytes).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Next line from the bot, without terminator. `None` at EOF.
    pub async fn recv(&mut self) -> anyhow::Result<Option<String>> {
        let mut line = String::new();
        let n = timeout(Duration::from_secs(5), self.reader.read_line(&mut line)).await??;
        if n == 0 {
            return Ok(None);
        }
        anyhow::ensure!(line.ends_with("\r\n"), "line not CRLF terminated: {line:?}");
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Next line, which must exist.
    pub async fn expect(&mut self) -> anyhow::Result<String> {
        self.recv()
            .await?
            .ok_or_else(|| anyhow::anyhow!("bot closed the connection"))
    }

    /// Read the registration handshake and return it.
    pub async fn handshake(&mut self) -> anyhow::Result<(String, String)> {
        let nick = self.expect().await?;
        let user = self.expect().await?;
        Ok((nick, user))
    }
}

/// Bot configuration pointed at a fake server, with no delays.
pub fn bot_config(port: u16) -> Arc<Config> {
    bot_config_with_reconnect_delay(port, 0)
}

/// Same as [`bot_config`], waiting `reconnect_delay_secs` before reconnecting.
pub fn bot_config_with_reconnect_delay(port: u16, reconnect_delay_secs: u64) -> Arc<Config> {
    let toml = format!(
        r##"
channels = ["#snek"]

[server]
host = "127.0.0.1"
port = {port}
settle_delay_ms = 0
reconnect_delay_secs = {reconnect_delay_secs}

[identity]
nickname = "snekbot"
alt_nickname = "snekbot_"
ident = "snek"
realname = "Snek Bot"

[database]
path = ":memory:"
"##
    );
    match Config::from_toml(&toml) {
        Ok(config) => Arc::new(config),
        Err(e) => panic!("test config does not parse: {e}"),
    }
}
