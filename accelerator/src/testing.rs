//! Test helpers: an in-process HTTP stub and a thread-local log capture

use log::{Level, LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;
use std::{cell::RefCell, sync::Arc, sync::Once};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    task::JoinHandle,
};

#[derive(Clone, Debug)]
pub(crate) enum StubResponse {
    Reply { status: u16, body: String },
    /// Accepts the connection and never answers
    Hang,
}

impl StubResponse {
    pub fn json(body: impl Into<String>) -> Self {
        StubResponse::Reply { status: 200, body: body.into() }
    }
}

pub(crate) struct StubServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
    handle: JoinHandle<()>,
}

impl StubServer {
    pub async fn start(response: StubResponse) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}/api/v1/services", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let task_requests = requests.clone();
        let handle = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((mut socket, _)) = listener.accept().await {
                let request_line = read_request_line(&mut socket).await;
                task_requests.lock().push(request_line);
                match &response {
                    StubResponse::Reply { status, body } => {
                        let reason = if *status == 200 { "OK" } else { "Error" };
                        let reply = format!(
                            "HTTP/1.1 {status} {reason}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                            body.len()
                        );
                        let _ = socket.write_all(reply.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    }
                    StubResponse::Hang => held.push(socket),
                }
            }
        });
        Self { base_url, requests, handle }
    }

    /// Request lines received so far, e.g. `GET /api/v1/services/accelerator/accelerations HTTP/1.1`
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    /// Request targets (path and query) received so far
    pub fn targets(&self) -> Vec<String> {
        self.requests().iter().filter_map(|line| line.split(' ').nth(1).map(|x| x.to_string())).collect()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn read_request_line(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }
    String::from_utf8_lossy(&buf).lines().next().unwrap_or_default().to_string()
}

/// Returns a base URL nobody listens on
pub(crate) async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api/v1/services")
}

thread_local! {
    static CAPTURED: RefCell<Vec<(Level, String)>> = const { RefCell::new(Vec::new()) };
}

struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        CAPTURED.with(|captured| captured.borrow_mut().push((record.level(), record.args().to_string())));
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;
static INIT: Once = Once::new();

/// Starts capturing log records emitted on the current thread, dropping previous ones
pub(crate) fn capture_logs() {
    INIT.call_once(|| {
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(LevelFilter::Trace);
    });
    CAPTURED.with(|captured| captured.borrow_mut().clear());
}

pub(crate) fn captured_warnings() -> Vec<String> {
    CAPTURED.with(|captured| captured.borrow().iter().filter(|(level, _)| *level == Level::Warn).map(|(_, line)| line.clone()).collect())
}
