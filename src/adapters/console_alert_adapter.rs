//! Console alert adapter: prints notifications to stderr.

use crate::ports::alert_port::AlertPort;

pub struct ConsoleAlertAdapter;

impl ConsoleAlertAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleAlertAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertPort for ConsoleAlertAdapter {
    fn notify(&self, symbol: &str, message: &str) {
        eprintln!("ALERT [{}] {}", symbol, message);
    }
}
