use std::path::Path;
use std::time::Duration;

use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader, DuplexStream};
use tokio::sync::mpsc::UnboundedReceiver;
use tower_lsp::LspService;
use tower_lsp::lsp_types::Url;

use lintbridge_lsp::Backend;

pub async fn send_msg<W: AsyncWriteExt + Unpin>(writer: &mut W, msg: &str) {
    let content = format!("Content-Length: {}\r\n\r\n{}", msg.len(), msg);
    writer.write_all(content.as_bytes()).await.unwrap();
    writer.flush().await.unwrap();
}

pub async fn recv_msg<R: AsyncReadExt + Unpin>(reader: &mut R) -> Option<String> {
    let mut buffer = Vec::new();
    let mut content_length = 0;

    loop {
        let byte = reader.read_u8().await.ok()?;
        buffer.push(byte);
        if buffer.ends_with(b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buffer);
            for line in headers.lines() {
                if line.to_lowercase().starts_with("content-length:") {
                    let parts: Vec<&str> = line.split(':').collect();
                    if parts.len() == 2 {
                        content_length = parts[1].trim().parse().unwrap_or_else(|e| {
                            panic!("Failed to parse Content-Length: {e}, header: {line}")
                        });
                    }
                }
            }
            break;
        }
    }

    if content_length == 0 {
        return None;
    }

    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body).await.ok()?;

    Some(String::from_utf8(body).unwrap())
}

/// Waits for the first server message matching `predicate`.
pub async fn wait_for<F>(rx: &mut UnboundedReceiver<Value>, predicate: F) -> Value
where
    F: Fn(&Value) -> bool,
{
    tokio::time::timeout(Duration::from_secs(10), async {
        while let Some(msg) = rx.recv().await {
            if predicate(&msg) {
                return msg;
            }
        }
        panic!("server closed the connection");
    })
    .await
    .expect("timed out waiting for server message")
}

/// Waits for the response to request `id`.
pub async fn response(rx: &mut UnboundedReceiver<Value>, id: u64) -> Value {
    wait_for(rx, |msg| msg["id"] == id && msg.get("method").is_none()).await
}

pub fn is_diagnostics_for(msg: &Value, uri: &Url) -> bool {
    msg["method"] == "textDocument/publishDiagnostics" && msg["params"]["uri"] == uri.as_str()
}

/// A client talking to an in-process server over duplex pipes.
pub struct Session {
    writer: DuplexStream,
    pub rx: UnboundedReceiver<Value>,
    next_id: u64,
}

impl Session {
    pub fn start() -> Self {
        let (client_read, server_write) = tokio::io::duplex(64 * 1024);
        let (server_read, client_write) = tokio::io::duplex(64 * 1024);

        let (service, socket) = LspService::new(Backend::new);
        tokio::spawn(async move {
            tower_lsp::Server::new(server_read, server_write, socket)
                .serve(service)
                .await;
        });

        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        tokio::spawn(async move {
            let mut reader = BufReader::new(client_read);
            while let Some(msg) = recv_msg(&mut reader).await {
                let value: Value = serde_json::from_str(&msg).unwrap();
                if tx.send(value).is_err() {
                    break;
                }
            }
        });

        Self {
            writer: client_write,
            rx,
            next_id: 1,
        }
    }

    pub async fn request(&mut self, method: &str, params: Value) -> Value {
        let id = self.next_id;
        self.next_id += 1;
        let msg = json!({ "jsonrpc": "2.0", "id": id, "method": method, "params": params });
        send_msg(&mut self.writer, &msg.to_string()).await;
        response(&mut self.rx, id).await
    }

    pub async fn notify(&mut self, method: &str, params: Value) {
        let msg = json!({ "jsonrpc": "2.0", "method": method, "params": params });
        send_msg(&mut self.writer, &msg.to_string()).await;
    }

    pub async fn initialize(&mut self, root: &Path, tools: &Path) {
        let options = json!({
            "lintCommand": ["sh", tools.join("lint.sh")],
            "fixCommand": ["sh", tools.join("fix.sh")],
        });
        self.request(
            "initialize",
            json!({
                "rootUri": Url::from_file_path(root).unwrap(),
                "capabilities": {},
                "initializationOptions": options,
            }),
        )
        .await;
        self.notify("initialized", json!({})).await;
    }

    pub async fn open(&mut self, uri: &Url, language_id: &str, text: &str) {
        self.notify(
            "textDocument/didOpen",
            json!({
                "textDocument": { "uri": uri, "languageId": language_id, "version": 1, "text": text }
            }),
        )
        .await;
    }
}
