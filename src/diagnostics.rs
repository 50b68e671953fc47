use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

static BUFFER: Mutex<Option<Vec<String>>> = Mutex::new(None);
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Start collecting warnings instead of printing them. Used by the CLI so
/// warnings raised while computing a report are shown after the report.
pub fn activate() {
    *BUFFER.lock().unwrap_or_else(|e| e.into_inner()) = Some(Vec::new());
}

/// Stop collecting and return everything gathered since `activate`.
pub fn drain() -> Vec<String> {
    BUFFER
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .take()
        .unwrap_or_default()
}

/// Print every buffered warning to stderr and stop buffering.
pub fn flush() {
    for msg in drain() {
        eprintln!("warning: {}", msg);
    }
}

/// Record a warning. Buffered while active, otherwise printed immediately.
pub fn warn(msg: String) {
    let mut guard = BUFFER.lock().unwrap_or_else(|e| e.into_inner());
    if let Some(buf) = guard.as_mut() {
        buf.push(msg);
    } else {
        drop(guard);
        eprintln!("warning: {}", msg);
    }
}

pub fn set_verbose(enabled: bool) {
    VERBOSE.store(enabled, Ordering::Relaxed);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

/// Progress line on stderr, only shown with `--verbose`.
pub fn verbose(msg: String) {
    if is_verbose() {
        eprintln!("{}", msg);
    }
}

/// Like `eprintln!`, routed through the warning buffer.
#[macro_export]
macro_rules! diag_warn {
    ($($arg:tt)*) => {
        $crate::diagnostics::warn(format!($($arg)*))
    };
}

/// Like `eprintln!`, but silent unless verbose output is enabled.
#[macro_export]
macro_rules! diag_verbose {
    ($($arg:tt)*) => {
        $crate::diagnostics::verbose(format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffered_warnings_are_drained_in_order() {
        activate();
        warn("first".to_string());
        crate::diag_warn!("second {}", 2);
        let drained = drain();
        assert!(drained.contains(&"first".to_string()));
        assert!(drained.contains(&"second 2".to_string()));
        let first = drained.iter().position(|m| m == "first").unwrap();
        let second = drained.iter().position(|m| m == "second 2").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_verbose_toggle() {
        set_verbose(true);
        assert!(is_verbose());
        set_verbose(false);
        assert!(!is_verbose());
    }
}
