//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use edge_redirect::config::{parse_config, ServiceConfig};

/// The route table used across integration tests.
pub const SAMPLE_CONFIG: &str = r#"
[timeouts]
request_secs = 5

[[routes."app.domain.com"]]
path = "/"
destination = "https://different-domain.com/app/"

[[routes."app.domain.com"]]
path = "/old/path/posts/(\\d+)"
destination = "https://different-domain.com/article/$1"
use_regex = true

[[routes."app.domain.com"]]
path = "/test302"
destination = "https://different-domain.com/test"
is_temporary = true

[[routes."app.domain.com"]]
path = "/testmergedparams"
destination = "https://different-domain.com/test?anotherparam=390"
retain_params = true

[[routes."app.domain.com"]]
path = "/testretainparams"
destination = "https://different-domain.com/test"
retain_params = true

[[routes."app.domain.com"]]
path = "/testcheckedparams?param=123"
destination = "https://different-domain.com/test?anotherparam=390"
consider_params = true

[[routes."app.domain.com"]]
path = "*"
destination = "https://different-domain.com/app/default-app-route"

[[routes."*"]]
path = "*"
destination = "https://different-domain.com/default-route"
"#;

pub fn sample_config() -> ServiceConfig {
    parse_config(SAMPLE_CONFIG).expect("sample config is valid")
}

/// Start a mock origin that answers 200 with the request line it received.
pub async fn start_echo_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = vec![0u8; 4096];
                        let n = socket.read(&mut buf).await.unwrap_or(0);
                        let head = String::from_utf8_lossy(&buf[..n]);
                        let request_line = head.lines().next().unwrap_or("").to_string();

                        let response_str = format!(
                            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            request_line.len(),
                            request_line
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}
