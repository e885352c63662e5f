use crossterm::terminal;
use std::io;

/// Keeps the controlling terminal in raw mode for as long as it is alive.
///
/// Raw mode is left when the guard is dropped, including during unwinding, so
/// every way out of a line read restores the cooked terminal.
#[must_use = "raw mode is disabled as soon as the guard is dropped"]
pub struct RawMode {
    _private: (),
}

impl RawMode {
    pub fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self { _private: () })
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            tracing::warn!("failed to restore terminal mode: {}", e);
        }
    }
}
