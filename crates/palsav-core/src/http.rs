// Blocking HTTP listener around `ProjectionService`.
//
// A fixed pool of worker threads shares one listening socket; each worker
// takes a request, handles it to completion, then takes the next one.
use std::io::{self, Read as _};
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tiny_http::{Header, Method, Request, Response, Server};

use crate::service::ProjectionService;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 0 picks one worker per available CPU
    pub workers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8009,
            workers: 0,
        }
    }
}

impl ServerConfig {
    pub fn worker_count(&self) -> usize {
        if self.workers > 0 {
            return self.workers;
        }
        thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }
}

pub struct HttpServer {
    server: Arc<Server>,
    stopping: Arc<AtomicBool>,
    workers: Vec<JoinHandle<()>>,
}

impl HttpServer {
    /// Binds the socket and starts the workers.
    pub fn start(config: &ServerConfig, service: Arc<ProjectionService>) -> io::Result<Self> {
        let addr = format!("{}:{}", config.host, config.port);
        let server = Arc::new(Server::http(&addr).map_err(io::Error::other)?);
        let stopping = Arc::new(AtomicBool::new(false));
        let count = config.worker_count();
        log::info!("listening on http://{} with {} workers", addr, count);
        let workers = (0..count)
            .map(|i| {
                let server = Arc::clone(&server);
                let service = Arc::clone(&service);
                let stopping = Arc::clone(&stopping);
                thread::Builder::new()
                    .name(format!("palsav-http-{}", i))
                    .spawn(move || worker_loop(&server, &service, &stopping))
            })
            .collect::<io::Result<Vec<_>>>()?;
        Ok(Self {
            server,
            stopping,
            workers,
        })
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.server_addr().to_ip()
    }

    /// Blocks until every worker has exited.
    pub fn join(self) {
        for w in self.workers {
            if w.join().is_err() {
                log::error!("http worker panicked");
            }
        }
    }

    /// Wakes every worker and waits for them to finish their current request.
    pub fn shutdown(self) {
        self.stopping.store(true, Ordering::SeqCst);
        for _ in 0..self.workers.len() {
            self.server.unblock();
        }
        self.join();
    }
}

fn worker_loop(server: &Server, service: &ProjectionService, stopping: &AtomicBool) {
    let mut backoff = Backoff::default();
    loop {
        match server.recv() {
            Ok(rq) => {
                backoff.reset();
                serve_one(service, rq);
            }
            Err(_) if stopping.load(Ordering::SeqCst) => break,
            Err(e) => {
                let delay = backoff.next_delay();
                log::warn!("accept failed, retrying in {:?}: {}", delay, e);
                thread::sleep(delay);
            }
        }
    }
}

/// Doubling delay between consecutive accept failures.
#[derive(Debug)]
struct Backoff {
    current: Duration,
}

impl Backoff {
    const MIN: Duration = Duration::from_millis(10);
    const MAX: Duration = Duration::from_secs(1);

    fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = (self.current * 2).min(Self::MAX);
        delay
    }

    fn reset(&mut self) {
        self.current = Self::MIN;
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self { current: Self::MIN }
    }
}

fn serve_one(service: &ProjectionService, mut rq: Request) {
    let method = match rq.method() {
        Method::Get => "GET",
        Method::Post => "POST",
        Method::Put => "PUT",
        Method::Delete => "DELETE",
        Method::Head => "HEAD",
        _ => "OTHER",
    };
    let url = rq.url().to_string();
    let accepts_gzip = rq.headers().iter().any(|h| {
        h.field.equiv("Accept-Encoding") && h.value.as_str().contains("gzip")
    });
    let mut body = Vec::new();
    let resp = match rq.as_reader().read_to_end(&mut body) {
        Ok(_) => service.handle(method, &url, &body, accepts_gzip),
        Err(e) => {
            log::warn!("failed reading request body: {}", e);
            return;
        }
    };
    log::debug!("{} {} -> {}", method, url, resp.status);

    let mut out = Response::from_data(resp.body).with_status_code(resp.status);
    if let Some(h) = header("Content-Type", "application/json") {
        out.add_header(h);
    }
    if let Some(enc) = resp.content_encoding
        && let Some(h) = header("Content-Encoding", enc)
    {
        out.add_header(h);
    }
    if let Err(e) = rq.respond(out) {
        log::warn!("failed writing response: {}", e);
    }
}

fn header(name: &str, value: &str) -> Option<Header> {
    Header::from_bytes(name.as_bytes(), value.as_bytes()).ok()
}
