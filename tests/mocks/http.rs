//! One-shot local HTTP server for exercising the breach checker.

use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// A server that accepts one connection and answers with a canned response
pub struct CannedServer {
    pub base_url: String,
    request: Arc<Mutex<String>>,
}

/// How the server answers once the request has been read
enum Reply {
    /// Complete response, then close
    Full(String),
    /// Headers announcing more body than is sent, then silence
    StalledBody(String),
    /// Nothing at all
    Silent,
}

impl CannedServer {
    /// Start a server answering `status_line` (e.g. "200 OK") with `body`.
    /// With `respond = false` the connection is held open without an answer.
    pub async fn start(status_line: &str, body: &str, respond: bool) -> Self {
        let reply = if respond {
            Reply::Full(format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            ))
        } else {
            Reply::Silent
        };
        Self::serve(reply).await
    }

    /// Start a server that sends a 200 status and the first byte of a
    /// longer body, then stops writing.
    pub async fn start_stalled_body() -> Self {
        Self::serve(Reply::StalledBody(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 64\r\n\r\n[".to_string(),
        ))
        .await
    }

    async fn serve(reply: Reply) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let request = Arc::new(Mutex::new(String::new()));

        let captured = Arc::clone(&request);
        tokio::spawn(async move {
            let (mut stream, _) = match listener.accept().await {
                Ok(conn) => conn,
                Err(_) => return,
            };

            let mut raw = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                match stream.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        raw.extend_from_slice(&buf[..n]);
                        if raw.windows(4).any(|w| w == b"\r\n\r\n") {
                            break;
                        }
                    }
                }
            }
            *captured.lock().unwrap() = String::from_utf8_lossy(&raw).into_owned();

            match reply {
                Reply::Full(response) => {
                    let _ = stream.write_all(response.as_bytes()).await;
                    let _ = stream.shutdown().await;
                }
                Reply::StalledBody(head) => {
                    let _ = stream.write_all(head.as_bytes()).await;
                    let _ = stream.flush().await;
                    tokio::time::sleep(std::time::Duration::from_secs(30)).await;
                }
                Reply::Silent => {
                    tokio::time::sleep(std::time::Duration::from_secs(30)).await;
                }
            }
        });

        CannedServer {
            base_url: format!("http://{}", addr),
            request,
        }
    }

    /// Raw request text received so far
    pub fn request(&self) -> String {
        self.request.lock().unwrap().clone()
    }
}

/// Base URL of a local port with nothing listening on it
pub async fn refused_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
