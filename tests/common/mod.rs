#![allow(dead_code)]

use assert_cmd::Command;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::Path;
use std::thread::{self, JoinHandle};

/// Instant every CLI test evaluates at: Tuesday 2025-06-10 14:30 in São Paulo
pub const NOW: &str = "2025-06-10T14:30:00-03:00";
pub const ZONE: &str = "America/Sao_Paulo";

pub fn estreia_cmd() -> Command {
    let mut cmd = Command::cargo_bin("estreia").unwrap();
    cmd.env_remove("ESTREIA_CONFIG");
    cmd.env_remove("ESTREIA_API_BASE_URL");
    cmd.env_remove("ESTREIA_API_TIMEOUT");
    cmd.env_remove("ESTREIA_API_TOKEN");
    cmd.env_remove("ESTREIA_TZ");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Plain process handle for tests that must signal the running binary
pub fn estreia_process() -> std::process::Command {
    let mut cmd = std::process::Command::new(assert_cmd::cargo::cargo_bin("estreia"));
    for var in [
        "ESTREIA_CONFIG",
        "ESTREIA_API_BASE_URL",
        "ESTREIA_API_TIMEOUT",
        "ESTREIA_API_TOKEN",
        "ESTREIA_TZ",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

/// Command pinned to [`NOW`] in [`ZONE`], reading config from `dir`
pub fn estreia_at(dir: &Path) -> Command {
    let mut cmd = estreia_cmd();
    cmd.arg("--config")
        .arg(dir.join("estreia.toml"))
        .arg("--now")
        .arg(NOW)
        .arg("--tz")
        .arg(ZONE);
    cmd
}

/// Answer one HTTP request with `status` and a JSON `body`.
///
/// Returns the base URL to point the CLI at and a handle yielding the raw request.
pub fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let request = read_request(&mut stream);
        let reply = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        stream.write_all(reply.as_bytes()).unwrap();
        request
    });

    (base_url, handle)
}

/// Base URL of a port nobody listens on
pub fn unreachable_api() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn read_request(stream: &mut impl Read) -> String {
    let mut raw = Vec::new();
    let mut chunk = [0u8; 1024];

    loop {
        let n = stream.read(&mut chunk).unwrap();
        if n == 0 {
            break;
        }
        raw.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&raw);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if raw.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }

    String::from_utf8_lossy(&raw).into_owned()
}
