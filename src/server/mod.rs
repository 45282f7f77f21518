use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};

use tracing::{debug, info, warn};

use crate::data::catalogue::Catalogue;

pub mod api;
pub mod routes;

const MAX_REQUEST_BYTES: usize = 1 << 20;

pub fn run_server(bind_addr: &str, catalogue: &Catalogue) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind_addr)?;
    info!(%bind_addr, memoria = catalogue.len(), "memoria server listening");

    for stream in listener.incoming() {
        match stream {
            Ok(mut stream) => {
                if let Err(err) = handle_connection(&mut stream, catalogue) {
                    warn!(error = %err, "request error");
                }
            }
            Err(err) => warn!(error = %err, "connection failed"),
        }
    }

    Ok(())
}

/// Bytes of the head plus as much body as `Content-Length` announces.
fn read_request(stream: &mut TcpStream) -> std::io::Result<Vec<u8>> {
    let mut raw = Vec::new();
    let mut buffer = [0_u8; 16_384];
    loop {
        let bytes_read = stream.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        raw.extend_from_slice(&buffer[..bytes_read]);
        if let Some(head_end) = find_head_end(&raw) {
            let head = String::from_utf8_lossy(&raw[..head_end]);
            let body_len = content_length(&head).unwrap_or(0);
            if raw.len() >= head_end + 4 + body_len {
                break;
            }
        }
        if raw.len() > MAX_REQUEST_BYTES {
            break;
        }
    }
    Ok(raw)
}

fn find_head_end(raw: &[u8]) -> Option<usize> {
    raw.windows(4).position(|window| window == b"\r\n\r\n")
}

fn content_length(head: &str) -> Option<usize> {
    head.lines().find_map(|line| {
        let (name, value) = line.split_once(':')?;
        if name.trim().eq_ignore_ascii_case("content-length") {
            value.trim().parse().ok()
        } else {
            None
        }
    })
}

fn handle_connection(stream: &mut TcpStream, catalogue: &Catalogue) -> std::io::Result<()> {
    let raw = read_request(stream)?;
    if raw.is_empty() {
        return Ok(());
    }

    let request = String::from_utf8_lossy(&raw);
    let mut lines = request.lines();
    let request_line = lines.next().unwrap_or_default();
    let mut request_parts = request_line.split_whitespace();
    let method = request_parts.next().unwrap_or("GET");
    let path = request_parts.next().unwrap_or("/");

    let body = request
        .split("\r\n\r\n")
        .nth(1)
        .or_else(|| request.split("\n\n").nth(1))
        .unwrap_or("");

    let response = routes::route_request(method, path, body, catalogue);
    debug!(%method, %path, status = response.status_code, "handled request");
    stream.write_all(response.to_http_string().as_bytes())?;
    stream.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_length_is_case_insensitive() {
        let head = "POST /api/skill HTTP/1.1\r\nHost: x\r\ncontent-length: 42";
        assert_eq!(content_length(head), Some(42));
        assert_eq!(content_length("GET / HTTP/1.1\r\nHost: x"), None);
    }

    #[test]
    fn head_end_is_located() {
        assert_eq!(find_head_end(b"GET / HTTP/1.1\r\n\r\nbody"), Some(14));
        assert_eq!(find_head_end(b"partial\r\n"), None);
    }
}
