//! WebSocket transport to the map server (native only).
//!
//! The socket lives on a background thread. Each request is queued to that
//! thread, which writes one frame and reads until the reply frame arrives;
//! the returned future resolves once the reply is handed back, so awaiting it
//! never blocks the caller's thread on socket I/O.

use crate::client::{BoxFuture, Transport, TransportError, TransportResult};
use crate::element::SceneSnapshot;
use crate::protocol::{Action, ActionResult, ClientFrame, ServerFrame};
use futures_util::task::AtomicWaker;
use std::net::TcpStream;
use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};
use std::sync::{Arc, Mutex};
use std::task::Poll;
use std::thread::{self, JoinHandle};
use tungstenite::stream::MaybeTlsStream;
use tungstenite::{Message, WebSocket, connect};
use url::Url;

type Socket = WebSocket<MaybeTlsStream<TcpStream>>;

/// One queued request and where its reply goes.
struct Request {
    text: String,
    reply: Sender<TransportResult<ServerFrame>>,
    waker: Arc<AtomicWaker>,
}

/// WebSocket transport speaking [`ClientFrame`] / [`ServerFrame`].
pub struct WsTransport {
    url: String,
    requests: Mutex<Option<Sender<Request>>>,
    _thread: JoinHandle<()>,
}

impl WsTransport {
    /// Connect to `ws://` or `wss://` `url`.
    pub fn connect(url: &str) -> TransportResult<Self> {
        let parsed = Url::parse(url).map_err(|e| TransportError::Connection(format!("Invalid URL: {e}")))?;
        if parsed.scheme() != "ws" && parsed.scheme() != "wss" {
            return Err(TransportError::Connection(format!(
                "Invalid WebSocket URL scheme: {}",
                parsed.scheme()
            )));
        }

        log::info!("Connecting to {url}");
        let (socket, response) = connect(url).map_err(|e| TransportError::Connection(e.to_string()))?;
        log::info!("WebSocket connected, status: {}", response.status());

        let (tx, rx) = channel::<Request>();
        let handle = thread::Builder::new()
            .name("mapink-ws".to_string())
            .spawn(move || serve_requests(socket, rx))
            .map_err(|e| TransportError::Connection(format!("Failed to start socket thread: {e}")))?;

        Ok(Self {
            url: url.to_string(),
            requests: Mutex::new(Some(tx)),
            _thread: handle,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Close the connection once queued requests are answered. Later
    /// requests fail with [`TransportError::Closed`].
    pub fn close(&self) {
        if let Ok(mut requests) = self.requests.lock() {
            requests.take();
        }
    }

    async fn request(&self, frame: &ClientFrame) -> TransportResult<ServerFrame> {
        let text = serde_json::to_string(frame)?;
        let (reply, replies) = channel();
        let waker = Arc::new(AtomicWaker::new());
        {
            let requests = self
                .requests
                .lock()
                .map_err(|e| TransportError::Connection(format!("Request queue lock poisoned: {e}")))?;
            let queue = requests.as_ref().ok_or(TransportError::Closed)?;
            queue
                .send(Request {
                    text,
                    reply,
                    waker: Arc::clone(&waker),
                })
                .map_err(|_| TransportError::Closed)?;
        }

        std::future::poll_fn(|cx| {
            waker.register(cx.waker());
            match replies.try_recv() {
                Ok(reply) => Poll::Ready(reply),
                Err(TryRecvError::Empty) => Poll::Pending,
                Err(TryRecvError::Disconnected) => Poll::Ready(Err(TransportError::Closed)),
            }
        })
        .await
    }
}

impl Drop for WsTransport {
    fn drop(&mut self) {
        self.close();
    }
}

impl Transport for WsTransport {
    fn send_action(&self, action: &Action) -> BoxFuture<'_, TransportResult<ActionResult>> {
        let frame = ClientFrame::Action { action: action.clone() };
        Box::pin(async move {
            match self.request(&frame).await? {
                ServerFrame::Result { result } => Ok(result),
                ServerFrame::Error { message } => Err(TransportError::Protocol(message)),
                other => Err(unexpected(&other)),
            }
        })
    }

    fn fetch_state(&self) -> BoxFuture<'_, TransportResult<SceneSnapshot>> {
        Box::pin(async move {
            match self.request(&ClientFrame::GetState).await? {
                ServerFrame::State { snapshot } => Ok(snapshot),
                ServerFrame::Error { message } => Err(TransportError::Protocol(message)),
                other => Err(unexpected(&other)),
            }
        })
    }
}

/// Socket thread: answer queued requests in order until the queue closes or
/// the connection fails.
fn serve_requests(mut socket: Socket, requests: Receiver<Request>) {
    while let Ok(request) = requests.recv() {
        let reply = exchange(&mut socket, &request.text);
        let failed = matches!(reply, Err(TransportError::Connection(_) | TransportError::Closed));
        // The caller may have given up on the reply.
        let _ = request.reply.send(reply);
        request.waker.wake();
        if failed {
            break;
        }
    }

    log::info!("WebSocket thread exiting");
    let _ = socket.close(None);
    let _ = socket.flush();
}

/// Write one frame and read until the reply frame arrives.
fn exchange(socket: &mut Socket, text: &str) -> TransportResult<ServerFrame> {
    log::debug!("WebSocket sending: {}", preview(text));
    socket
        .send(Message::Text(text.to_string()))
        .map_err(|e| TransportError::Connection(format!("Send failed: {e}")))?;

    loop {
        match socket.read() {
            Ok(Message::Text(txt)) => {
                log::debug!("WebSocket received: {}", preview(&txt));
                return Ok(serde_json::from_str(&txt)?);
            }
            Ok(Message::Ping(data)) => {
                let _ = socket.send(Message::Pong(data));
            }
            Ok(Message::Close(_)) => {
                log::info!("WebSocket received close frame");
                return Err(TransportError::Closed);
            }
            Ok(_) => {}
            Err(e) => {
                log::error!("WebSocket read error: {e}");
                return Err(TransportError::Connection(e.to_string()));
            }
        }
    }
}

/// First 100 characters of a frame, for logging.
fn preview(s: &str) -> &str {
    s.char_indices().nth(100).map_or(s, |(i, _)| &s[..i])
}

fn unexpected(frame: &ServerFrame) -> TransportError {
    let kind = match frame {
        ServerFrame::Result { .. } => "result",
        ServerFrame::State { .. } => "state",
        ServerFrame::Error { .. } => "error",
    };
    TransportError::Protocol(format!("Unexpected '{kind}' frame"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::net::TcpListener;
    use std::task::{Context, Waker};

    #[test]
    fn test_rejects_non_websocket_url() {
        let err = WsTransport::connect("http://localhost:3030/ws").err().unwrap();
        assert!(matches!(err, TransportError::Connection(msg) if msg.contains("scheme")));
    }

    #[test]
    fn test_rejects_malformed_url() {
        assert!(matches!(
            WsTransport::connect("not a url"),
            Err(TransportError::Connection(_))
        ));
    }

    #[test]
    fn test_outstanding_request_does_not_block_caller() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (release, released) = channel::<()>();
        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut ws = tungstenite::accept(stream).unwrap();
            assert!(ws.read().unwrap().is_text());
            released.recv().unwrap();
            let reply = ServerFrame::State {
                snapshot: SceneSnapshot::default(),
            };
            ws.send(Message::Text(serde_json::to_string(&reply).unwrap())).unwrap();
            let _ = ws.read();
        });

        let transport = WsTransport::connect(&format!("ws://{addr}")).unwrap();
        let mut fetch = transport.fetch_state();
        let mut cx = Context::from_waker(Waker::noop());
        assert!(fetch.as_mut().poll(&mut cx).is_pending());

        release.send(()).unwrap();
        assert!(pollster::block_on(fetch).unwrap().is_empty());

        drop(transport);
        server.join().unwrap();
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        let long = "é".repeat(150);
        assert_eq!(preview(&long).chars().count(), 100);
        assert_eq!(preview("short"), "short");
    }

    #[test]
    fn test_unexpected_frame_is_protocol_error() {
        let err = unexpected(&ServerFrame::State {
            snapshot: SceneSnapshot::default(),
        });
        assert_eq!(err.to_string(), "Protocol error: Unexpected 'state' frame");
    }
}
