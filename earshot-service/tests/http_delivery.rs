//! HTTP delivery against a loopback listener.
//!
//! Each test starts a one-shot server on its own thread and runtime, then
//! drives the blocking client from the test thread the way the host would.

use std::sync::mpsc;
use std::thread;

use earshot_core::{ConversationService, RelayError};
use earshot_service::{Endpoint, HttpConversationService, ServiceError};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

fn endpoint(port: u16) -> Endpoint {
    Endpoint {
        base_url: "http://127.0.0.1".into(),
        port,
        route: "add_message".into(),
    }
}

/// Accept one request, hand its raw text back, answer with `status_line`.
fn one_shot_server(status_line: &'static str) -> (u16, mpsc::Receiver<String>) {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("addr").port();
    listener.set_nonblocking(true).expect("nonblocking");
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime");
        runtime.block_on(async move {
            let listener = TcpListener::from_std(listener).expect("listener");
            let (mut socket, _) = listener.accept().await.expect("accept");
            let request = read_request(&mut socket).await;
            tx.send(request).expect("send");
            let reply = format!("{status_line}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n");
            socket.write_all(reply.as_bytes()).await.expect("write");
            socket.shutdown().await.ok();
        });
    });

    (port, rx)
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.expect("read");
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let Some(head_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let head = String::from_utf8_lossy(&buf[..head_end]).to_lowercase();
        let body_len = head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        if buf.len() >= head_end + 4 + body_len {
            break;
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

#[test]
fn posts_json_message_to_route() {
    let (port, requests) = one_shot_server("HTTP/1.1 200 OK");
    let service = HttpConversationService::new(endpoint(port), 3000).expect("client");

    service
        .send_text("Player: Any rumors?; Hulda: Only that the Jarl is worried")
        .expect("delivered");

    let request = requests.recv().expect("request");
    assert!(request.starts_with("POST /add_message HTTP/1.1\r\n"), "{request}");
    let lower = request.to_lowercase();
    assert!(lower.contains("content-type: application/json"));
    assert!(lower.contains("accept: application/json"));
    assert!(request.ends_with(r#"{"message":"Player: Any rumors?; Hulda: Only that the Jarl is worried"}"#));
}

#[test]
fn non_success_status_is_a_delivery_error() {
    let (port, requests) = one_shot_server("HTTP/1.1 500 Internal Server Error");
    let service = HttpConversationService::new(endpoint(port), 3000).expect("client");

    let err = service.post("Player: Hi; Lydia: Hello there, my Thane").expect_err("rejected");
    assert!(matches!(err, ServiceError::Status { status: 500, .. }));
    requests.recv().expect("request");

    let (port, _requests) = one_shot_server("HTTP/1.1 503 Service Unavailable");
    let service = HttpConversationService::new(endpoint(port), 3000).expect("client");
    assert!(matches!(
        service.send_text("anything"),
        Err(RelayError::Delivery(msg)) if msg.contains("503")
    ));
}

#[test]
fn nothing_listening_fails_without_panicking() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr").port()
    };
    let service = HttpConversationService::new(endpoint(port), 500).expect("client");

    assert!(service.post("Player: Hi; Lydia: Hello").is_err());
    assert!(service.send_text("Player: Hi; Lydia: Hello").is_err());
}
