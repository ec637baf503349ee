//! Mock server under test for integration testing
//!
//! Implements a minimal HTTP/1.1 responder with a fixed greeting endpoint
//! and a variable data endpoint, so the harness can be exercised without a
//! real service. Prints `listening at: ADDR` on startup so callers can
//! discover the bound port.

use clap::Parser;
use rand::Rng;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

#[derive(Parser)]
#[command(name = "mock-server", about = "Mock server under test for tiercheck")]
struct Cli {
    /// Port to bind; 0 picks a free port
    #[arg(long, default_value = "0")]
    port: u16,
}

const FACTS: &[&str] = &[
    "Cats sleep for around two thirds of the day.",
    "A group of flamingos is called a flamboyance.",
    "Octopuses have three hearts.",
    "Honey never spoils.",
    "Bananas are berries, strawberries are not.",
];

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    let listener = TcpListener::bind(("127.0.0.1", cli.port)).await?;
    let addr = listener.local_addr()?;
    println!("listening at: {addr}");

    loop {
        let (stream, _) = listener.accept().await?;
        tokio::spawn(async move {
            let _ = handle(stream).await;
        });
    }
}

async fn handle(stream: TcpStream) -> std::io::Result<()> {
    let mut reader = BufReader::new(stream);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).await?;

    // Drain headers until the blank line
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).await? == 0 || line == "\r\n" || line == "\n" {
            break;
        }
    }

    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or("");
    let path = parts.next().unwrap_or("");

    let (status, body) = route(method, path);
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len(),
    );

    let mut stream = reader.into_inner();
    stream.write_all(response.as_bytes()).await?;
    stream.flush().await
}

fn route(method: &str, path: &str) -> (&'static str, String) {
    match (method, path) {
        ("GET", "/hello") => ("200 OK", "Hello World".to_string()),
        ("GET", "/data") => {
            let mut rng = rand::rng();
            let fact = FACTS[rng.random_range(0..FACTS.len())];
            let nonce: u64 = rng.random();
            ("200 OK", format!("{fact} (#{nonce:016x})"))
        }
        ("GET", "/health") => ("200 OK", "ok".to_string()),
        _ => ("404 Not Found", "not found".to_string()),
    }
}
