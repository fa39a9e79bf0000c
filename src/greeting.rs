use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

/// Shown whenever the endpoint is unreachable, slow, or returns junk.
pub(crate) const FALLBACK: &str = "Welcome back, space traveler!";

const DEFAULT_URL: &str = "https://planetage-motd.onrender.com/message";

pub(crate) fn greeting_url() -> String {
    std::env::var("PLANETAGE_GREETING_URL").unwrap_or_else(|_| DEFAULT_URL.to_string())
}

/// Fire-and-forget fetch of the footer message. The endpoint is an opaque
/// collaborator that echoes a short display string; nothing downstream
/// depends on it. The receiver yields exactly one string.
pub(crate) fn spawn_fetch(url: String) -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let msg = fetch_message(&url).unwrap_or_else(|| FALLBACK.to_string());
        let _ = tx.send(msg);
    });
    rx
}

fn fetch_message(url: &str) -> Option<String> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(3))
        .build()
        .ok()?;
    let body = client.get(url).send().ok()?.error_for_status().ok()?.text().ok()?;
    let msg = body.trim();
    if msg.is_empty() || msg.len() > 120 {
        return None;
    }
    Some(msg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreachable_endpoint_falls_back() {
        // nothing listens on this port
        let rx = spawn_fetch("http://127.0.0.1:9/none".to_string());
        let msg = rx.recv_timeout(Duration::from_secs(10)).unwrap();
        assert_eq!(msg, FALLBACK);
    }
}
