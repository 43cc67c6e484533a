//! Process-wide panic reporting

use std::panic;

use tracing::error;

/// Route panics from any thread through `tracing` before the default hook runs
pub fn install_panic_hook() {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let message = info
            .payload()
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "<non-string panic payload>".to_string());
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "<unknown>".to_string());
        let thread = std::thread::current();

        error!(
            "Uncaught panic in thread '{}' at {}: {}",
            thread.name().unwrap_or("<unnamed>"),
            location,
            message
        );
        default_hook(info);
    }));
}
