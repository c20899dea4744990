use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::Duration;

/// What the stub answers for a given request number.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub enum Reply {
    Json(String),
    Html(&'static str),
    Status(u16, &'static str),
}

pub struct RedditStub {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
    paths: Arc<Mutex<Vec<String>>>,
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

#[allow(dead_code)]
impl RedditStub {
    /// Serves `replies[n]` to the n-th request; the last reply repeats.
    pub fn spawn(replies: Vec<Reply>) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start reddit stub server");
        let base_url = format!("http://{}", server.server_addr());

        let hits = Arc::new(AtomicUsize::new(0));
        let paths = Arc::new(Mutex::new(Vec::new()));
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let handle = {
            let hits = Arc::clone(&hits);
            let paths = Arc::clone(&paths);
            thread::spawn(move || {
                loop {
                    if shutdown_rx.try_recv().is_ok() {
                        break;
                    }
                    let request = match server.recv_timeout(Duration::from_millis(50)) {
                        Ok(Some(req)) => req,
                        Ok(None) => continue,
                        Err(_) => break,
                    };

                    paths
                        .lock()
                        .expect("stub paths lock")
                        .push(request.url().to_string());
                    let n = hits.fetch_add(1, Ordering::SeqCst);
                    let reply = replies[n.min(replies.len() - 1)].clone();

                    let (status, body, content_type) = match reply {
                        Reply::Json(body) => (200, body, "application/json"),
                        Reply::Html(body) => (200, body.to_owned(), "text/html"),
                        Reply::Status(status, body) => (status, body.to_owned(), "text/plain"),
                    };
                    let mut resp = tiny_http::Response::from_string(body).with_status_code(status);
                    let header =
                        tiny_http::Header::from_bytes(&b"Content-Type"[..], content_type.as_bytes())
                            .expect("content-type header");
                    resp.add_header(header);
                    let _ = request.respond(resp);
                }
            })
        };

        Self {
            base_url,
            hits,
            paths,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    pub fn thread_url(&self) -> String {
        format!("{}/r/rust/comments/abc123/hello_world/?utm_source=share", self.base_url)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().expect("stub paths lock").clone()
    }
}

impl Drop for RedditStub {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Post "Hello" by alice; bob's comment with carol's reply; a deleted
/// comment whose reply by dave survives.
#[allow(dead_code)]
pub fn sample_thread_json() -> String {
    serde_json::json!([
        {
            "kind": "Listing",
            "data": {
                "children": [{
                    "kind": "t3",
                    "data": {
                        "title": "Hello",
                        "author": "alice",
                        "selftext": "first post",
                        "subreddit": "rust",
                        "score": 5,
                        "num_comments": 3,
                        "url": "https://www.reddit.com/r/rust/comments/abc123/hello_world/",
                        "created_utc": 1_700_000_000.0,
                        "permalink": "/r/rust/comments/abc123/hello_world/"
                    }
                }]
            }
        },
        {
            "kind": "Listing",
            "data": {
                "children": [
                    {
                        "kind": "t1",
                        "data": {
                            "author": "bob",
                            "body": "hi",
                            "score": 2,
                            "replies": {
                                "kind": "Listing",
                                "data": {
                                    "children": [{
                                        "kind": "t1",
                                        "data": { "author": "carol", "body": "yo", "score": 1, "replies": "" }
                                    }]
                                }
                            }
                        }
                    },
                    {
                        "kind": "t1",
                        "data": {
                            "author": "[deleted]",
                            "body": "[deleted]",
                            "score": 0,
                            "replies": {
                                "kind": "Listing",
                                "data": {
                                    "children": [{
                                        "kind": "t1",
                                        "data": { "author": "dave", "body": "still here", "score": 4, "replies": "" }
                                    }]
                                }
                            }
                        }
                    },
                    { "kind": "more", "data": { "count": 10, "children": ["x"] } }
                ]
            }
        }
    ])
    .to_string()
}
