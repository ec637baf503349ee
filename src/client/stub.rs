//! In-process stub backend
//!
//! Substitutes the server under test for the unit and integration tiers.
//! Routes answer with a fixed body, or rotate through a list so variable
//! endpoints can be modeled without a network.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use async_trait::async_trait;

use super::{Backend, Exchange, Method};

struct StubRoute {
    status: u16,
    bodies: Vec<String>,
    cursor: AtomicUsize,
}

#[derive(Default)]
pub struct StubBackend {
    routes: HashMap<(Method, String), StubRoute>,
}

impl StubBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route. A single body answers every call; multiple bodies
    /// rotate in order, wrapping around.
    pub fn route(&mut self, method: Method, path: &str, status: u16, bodies: Vec<String>) {
        let bodies = if bodies.is_empty() {
            vec![String::new()]
        } else {
            bodies
        };
        self.routes.insert(
            (method, path.to_string()),
            StubRoute {
                status,
                bodies,
                cursor: AtomicUsize::new(0),
            },
        );
    }
}

#[async_trait]
impl Backend for StubBackend {
    async fn execute(&self, method: Method, path: &str) -> Exchange {
        let start = Instant::now();
        match self.routes.get(&(method, path.to_string())) {
            Some(route) => {
                let index = route.cursor.fetch_add(1, Ordering::Relaxed);
                let body = route.bodies[index % route.bodies.len()].clone();
                let mut headers = HashMap::new();
                headers.insert("content-type".to_string(), "text/plain".to_string());
                Exchange {
                    status: route.status,
                    body,
                    headers,
                    elapsed_ms: start.elapsed().as_millis() as u64,
                    error: None,
                }
            }
            None => Exchange {
                status: 404,
                body: format!("no stub route for {method} {path}"),
                headers: HashMap::new(),
                elapsed_ms: start.elapsed().as_millis() as u64,
                error: None,
            },
        }
    }
}
