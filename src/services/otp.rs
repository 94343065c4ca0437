use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use rand::Rng;

struct OtpEntry {
    code: String,
    expires_at: Instant,
}

/// Expiring one-time-password store, owned by `AppState` and injected where
/// needed. Codes are single-use and a periodic sweep keeps the map bounded.
pub struct OtpStore {
    ttl: Duration,
    codes: Mutex<HashMap<String, OtpEntry>>,
}

impl OtpStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            codes: Mutex::new(HashMap::new()),
        }
    }

    /// Issues a fresh 6-digit code for the key, replacing any outstanding one.
    pub fn issue(&self, key: &str) -> String {
        let code = format!("{:06}", rand::thread_rng().gen_range(0..1_000_000));
        let mut codes = self.codes.lock().unwrap();
        codes.insert(
            key.to_string(),
            OtpEntry {
                code: code.clone(),
                expires_at: Instant::now() + self.ttl,
            },
        );
        code
    }

    /// Verifies and consumes a code. Expired or already-used codes fail.
    pub fn verify(&self, key: &str, code: &str) -> bool {
        let mut codes = self.codes.lock().unwrap();
        match codes.get(key) {
            Some(entry) if entry.expires_at > Instant::now() && entry.code == code => {
                codes.remove(key);
                true
            }
            _ => false,
        }
    }

    /// Drops expired entries; returns how many were removed.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut codes = self.codes.lock().unwrap();
        let before = codes.len();
        codes.retain(|_, entry| entry.expires_at > now);
        before - codes.len()
    }
}

/// Background task keeping the store from growing unbounded.
pub fn spawn_sweeper(state: Arc<crate::state::AppState>, every: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            let removed = state.otp.sweep();
            if removed > 0 {
                tracing::debug!(removed, "swept expired OTP codes");
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_verify() {
        let store = OtpStore::new(Duration::from_secs(60));
        let code = store.issue("919876543210");
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit()));

        let wrong = if code == "000000" { "000001" } else { "000000" };
        assert!(!store.verify("919876543210", wrong));
        assert!(store.verify("919876543210", &code));
    }

    #[test]
    fn test_code_is_single_use() {
        let store = OtpStore::new(Duration::from_secs(60));
        let code = store.issue("919876543210");
        assert!(store.verify("919876543210", &code));
        assert!(!store.verify("919876543210", &code));
    }

    #[test]
    fn test_reissue_replaces_previous_code() {
        let store = OtpStore::new(Duration::from_secs(60));
        let first = store.issue("919876543210");
        let second = store.issue("919876543210");
        if first != second {
            assert!(!store.verify("919876543210", &first));
        }
        assert!(store.verify("919876543210", &second));
    }

    #[test]
    fn test_expired_code_fails_and_sweeps() {
        let store = OtpStore::new(Duration::from_millis(20));
        let code = store.issue("919876543210");
        std::thread::sleep(Duration::from_millis(40));

        assert!(!store.verify("919876543210", &code));
        assert_eq!(store.sweep(), 1);
        assert_eq!(store.sweep(), 0);
    }
}
