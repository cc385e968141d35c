use super::sample_events;
use error_relay::transport::{CONNECTION, CONTENT_TYPE, FORM_FIELD};
use error_relay::types::into_tree;
use error_relay::{HttpTransport, Payload, RelayError, Transport};
use serde_json::{json, Value};
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

const RESPONSE: &[u8] = b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";

struct Captured {
    request_line: String,
    headers: Vec<(String, String)>,
    body: String,
}

impl Captured {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Accepts one connection, answers `200 OK` and returns what was sent.
fn serve_once(listener: TcpListener) -> thread::JoinHandle<Captured> {
    thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream);

        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();

        let mut headers = Vec::new();
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            let (name, value) = line.split_once(':').unwrap();
            let header = (name.trim().to_string(), value.trim().to_string());
            headers.push(header);
        }

        let length: usize = headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("Content-Length"))
            .map(|(_, value)| value.parse().unwrap())
            .unwrap_or(0);
        let mut body = vec![0; length];
        reader.read_exact(&mut body).unwrap();

        let mut stream = reader.into_inner();
        stream.write_all(RESPONSE).unwrap();

        Captured {
            request_line: request_line.trim_end().to_string(),
            headers,
            body: String::from_utf8(body).unwrap(),
        }
    })
}

#[test]
fn posts_form_encoded_batch() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let endpoint = format!("http://{}/notify", listener.local_addr().unwrap());
    let server = serve_once(listener);

    let events = sample_events();
    let meta = into_tree(json!({ "job": { "queue": "mail" } })).unwrap();
    let payload = Payload::new("abc123", &events, &meta);

    let mut transport = HttpTransport::with_timeout(Duration::from_secs(5));
    transport.deliver(&endpoint, &payload).unwrap();

    let captured = server.join().unwrap();
    assert_eq!(captured.request_line, "POST /notify HTTP/1.1");
    assert_eq!(captured.header("Content-Type"), Some(CONTENT_TYPE));
    assert_eq!(captured.header("Connection"), Some(CONNECTION));

    let (field, json) = url::form_urlencoded::parse(captured.body.as_bytes())
        .next()
        .unwrap();
    assert_eq!(field, FORM_FIELD);
    let document: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(document["apiKey"], "abc123");
    assert_eq!(document["metaData"]["job"]["queue"], "mail");
    assert_eq!(
        document["events"][0]["exceptions"][0]["message"],
        "a&b=c 100%"
    );
}

#[test]
fn unreachable_collector_is_a_delivery_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let endpoint = format!("http://{}/notify", listener.local_addr().unwrap());
    drop(listener);

    let events = sample_events();
    let meta = into_tree(json!({})).unwrap();
    let payload = Payload::new("abc123", &events, &meta);

    let mut transport = HttpTransport::with_timeout(Duration::from_secs(5));
    let err = transport.deliver(&endpoint, &payload).unwrap_err();

    assert!(matches!(
        &err,
        RelayError::Delivery { endpoint: failed, .. } if *failed == endpoint
    ));
    assert!(!err.is_configuration());
}
