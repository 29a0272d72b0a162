//! Stdio Transport
//!
//! Newline-delimited JSON-RPC over stdin/stdout. Each request is handled on
//! its own task, so a slow broker call does not hold up `ping` or
//! `tools/list`. Responses go through a single writer task and are written
//! one line at a time, in completion order.

use std::sync::Arc;

use anyhow::Context;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use super::protocol::{JsonRpcError, McpResponse, parse_message};
use super::server::McpServer;

/// Capacity of the response queue between handlers and the writer.
const RESPONSE_QUEUE: usize = 64;

/// Line-oriented transport over an async reader and writer.
#[derive(Debug)]
pub struct StdioTransport<R, W> {
    reader: R,
    writer: W,
}

impl StdioTransport<tokio::io::Stdin, tokio::io::Stdout> {
    /// Transport over the process's stdin and stdout.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(tokio::io::stdin(), tokio::io::stdout())
    }
}

impl<R, W> StdioTransport<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send + 'static,
{
    /// Create a transport.
    pub const fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Serve until the reader hits EOF or `shutdown` fires.
    ///
    /// Requests already accepted are answered before returning.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or writing fails.
    pub async fn serve(self, server: Arc<McpServer>, shutdown: CancellationToken) -> anyhow::Result<()> {
        tracing::info!("Starting MCP stdio transport");

        let (tx, rx) = mpsc::channel::<McpResponse>(RESPONSE_QUEUE);
        let writer = tokio::spawn(write_responses(self.writer, rx));

        let mut reader = BufReader::new(self.reader);
        let mut buf = Vec::new();
        let mut in_flight = JoinSet::new();

        let outcome = loop {
            buf.clear();
            let read = tokio::select! {
                () = shutdown.cancelled() => {
                    tracing::info!("Shutdown requested, closing stdio transport");
                    break Ok(());
                }
                read = reader.read_until(b'\n', &mut buf) => read,
            };

            match read {
                Ok(0) => {
                    tracing::info!("Stdin closed");
                    break Ok(());
                }
                Ok(_) => {}
                Err(e) => break Err(anyhow::Error::new(e).context("failed to read from stdin")),
            }

            let parsed = match std::str::from_utf8(&buf) {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => parse_message(line.trim()),
                Err(e) => Err(McpResponse::error(
                    Value::Null,
                    JsonRpcError::parse_error(format!("Parse error: input is not valid UTF-8: {e}")),
                )),
            };

            match parsed {
                Ok(request) => {
                    let server = Arc::clone(&server);
                    let tx = tx.clone();
                    in_flight.spawn(async move {
                        let Some(response) = server.handle_request(request).await else {
                            return;
                        };
                        if tx.send(response).await.is_err() {
                            tracing::warn!("Response writer closed, dropping response");
                        }
                    });
                }
                Err(response) => {
                    tracing::warn!(
                        error = ?response.error.as_ref().map(|e| &e.message),
                        "Rejected malformed message"
                    );
                    if tx.send(response).await.is_err() {
                        break Ok(());
                    }
                }
            }

            while let Some(finished) = in_flight.try_join_next() {
                if let Err(e) = finished {
                    tracing::error!(error = %e, "Request handler failed");
                }
            }
        };

        // Accepted requests are answered even when the reader failed.
        while let Some(finished) = in_flight.join_next().await {
            if let Err(e) = finished {
                tracing::error!(error = %e, "Request handler failed");
            }
        }
        drop(tx);

        let written = writer.await.context("response writer task failed")?;
        outcome?;
        written.context("failed to write to stdout")?;

        tracing::info!("Stdio transport shut down");
        Ok(())
    }
}

async fn write_responses<W>(mut writer: W, mut rx: mpsc::Receiver<McpResponse>) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(response) = rx.recv().await {
        let mut line = serde_json::to_vec(&response).map_err(std::io::Error::other)?;
        line.push(b'\n');
        writer.write_all(&line).await?;
        writer.flush().await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockBrokerConnector;
    use crate::application::services::{BrokerCallExecutor, CommandDispatcher, ResourceCatalog, Session};
    use crate::domain::toolset::Toolset;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, duplex};

    fn server() -> Arc<McpServer> {
        let session = Arc::new(Session::new());
        let executor = BrokerCallExecutor::default();
        Arc::new(McpServer::new(
            Arc::new(CommandDispatcher::new(
                Toolset::Full,
                Arc::clone(&session),
                Arc::new(MockBrokerConnector::new()),
                executor.clone(),
            )),
            Arc::new(ResourceCatalog::new(Toolset::Full, session, executor)),
        ))
    }

    async fn exchange(input: &str) -> Vec<Value> {
        let (mut client_out, server_in) = duplex(64 * 1024);
        let (server_out, mut client_in) = duplex(64 * 1024);

        client_out.write_all(input.as_bytes()).await.unwrap();
        drop(client_out);

        StdioTransport::new(server_in, server_out)
            .serve(server(), CancellationToken::new())
            .await
            .unwrap();

        let mut output = String::new();
        client_in.read_to_string(&mut output).await.unwrap();
        output
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn answers_each_request_on_its_own_line() {
        let responses = exchange(concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"resources/list"}"#,
            "\n"
        ))
        .await;

        assert_eq!(responses.len(), 2);
        let mut ids: Vec<i64> = responses.iter().map(|r| r["id"].as_i64().unwrap()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn malformed_line_gets_parse_error() {
        let responses = exchange("this is not json\n").await;

        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0]["id"], Value::Null);
        assert_eq!(responses[0]["error"]["code"], json!(-32700));
    }

    #[tokio::test]
    async fn invalid_utf8_line_does_not_stop_the_loop() {
        let mut input = Vec::new();
        input.extend_from_slice(br#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#);
        input.extend_from_slice(b"\n\xff\xfe garbage\n");
        input.extend_from_slice(br#"{"jsonrpc":"2.0","id":2,"method":"ping"}"#);
        input.push(b'\n');

        let (mut client_out, server_in) = duplex(64 * 1024);
        let (server_out, mut client_in) = duplex(64 * 1024);
        client_out.write_all(&input).await.unwrap();
        drop(client_out);

        StdioTransport::new(server_in, server_out)
            .serve(server(), CancellationToken::new())
            .await
            .unwrap();

        let mut output = String::new();
        client_in.read_to_string(&mut output).await.unwrap();
        let responses: Vec<Value> = output
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(responses.len(), 3);
        let parse_errors: Vec<&Value> = responses
            .iter()
            .filter(|r| r["error"]["code"] == json!(-32700))
            .collect();
        assert_eq!(parse_errors.len(), 1);
        assert_eq!(parse_errors[0]["id"], Value::Null);

        let mut answered: Vec<i64> = responses.iter().filter_map(|r| r["id"].as_i64()).collect();
        answered.sort_unstable();
        assert_eq!(answered, vec![1, 2]);
    }

    /// Yields `data` once, then fails every read.
    struct BrokenPipe {
        data: Vec<u8>,
        sent: bool,
    }

    impl AsyncRead for BrokenPipe {
        fn poll_read(
            mut self: std::pin::Pin<&mut Self>,
            _: &mut std::task::Context<'_>,
            buf: &mut tokio::io::ReadBuf<'_>,
        ) -> std::task::Poll<std::io::Result<()>> {
            if self.sent {
                return std::task::Poll::Ready(Err(std::io::Error::other("stdin broke")));
            }
            self.sent = true;
            buf.put_slice(&self.data);
            std::task::Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn read_failure_still_answers_accepted_requests() {
        let reader = BrokenPipe {
            data: b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n".to_vec(),
            sent: false,
        };
        let (server_out, mut client_in) = duplex(64 * 1024);

        let result = StdioTransport::new(reader, server_out)
            .serve(server(), CancellationToken::new())
            .await;
        assert!(result.unwrap_err().to_string().contains("failed to read from stdin"));

        let mut output = String::new();
        client_in.read_to_string(&mut output).await.unwrap();
        let responses: Vec<Value> = output
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0]["id"], json!(1));
        assert_eq!(responses[0]["result"], json!({}));
    }

    #[tokio::test]
    async fn null_id_gets_a_reply_with_null_id() {
        let responses = exchange(concat!(r#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#, "\n")).await;
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0]["id"], Value::Null);
        assert_eq!(responses[0]["result"], json!({}));
    }

    #[tokio::test]
    async fn final_line_without_newline_is_answered() {
        let responses = exchange(r#"{"jsonrpc":"2.0","id":5,"method":"ping"}"#).await;
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0]["id"], json!(5));
    }

    #[tokio::test]
    async fn stops_on_cancellation() {
        let (_client_out, server_in) = duplex(1024);
        let (server_out, _client_in) = duplex(1024);
        let shutdown = CancellationToken::new();
        shutdown.cancel();

        StdioTransport::new(server_in, server_out)
            .serve(server(), shutdown)
            .await
            .unwrap();
    }
}
