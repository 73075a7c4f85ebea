//! Logging setup

use std::fmt;
use std::fs::File;
use std::sync::Mutex;
use std::time::SystemTime as StdSystemTime;
use tracing::info;
use tracing_subscriber::{
    filter::LevelFilter, fmt::format::Writer, fmt::layer, fmt::time::FormatTime,
    layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry,
};

/// Custom time formatter that shows only seconds
struct SecondPrecisionTimer;

impl FormatTime for SecondPrecisionTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        let now = StdSystemTime::now();
        let duration = now
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default();

        let total_seconds = duration.as_secs();
        let hours = (total_seconds / 3600) % 24;
        let minutes = (total_seconds / 60) % 60;
        let seconds = total_seconds % 60;

        write!(w, "{:02}:{:02}:{:02}", hours, minutes, seconds)
    }
}

/// Setup log output to a file or stdout
///
/// Safe to call more than once; only the first subscriber is installed.
pub fn setup_output(output_path: Option<&String>, verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    match output_path {
        Some(path) => match File::create(path) {
            Ok(log) => {
                let file_layer = layer()
                    .with_writer(Mutex::new(log))
                    .with_timer(SecondPrecisionTimer)
                    .with_ansi(false)
                    .with_filter(level);
                if Registry::default().with(file_layer).try_init().is_ok() {
                    info!("Output will be written to: {}", path);
                }
            }
            Err(err) => eprintln!("Could not create output file {}: {}", path, err),
        },
        None => {
            let stdout_layer = layer()
                .with_writer(std::io::stdout)
                .with_timer(SecondPrecisionTimer)
                .with_ansi(true)
                .with_filter(level);
            let _ = Registry::default().with(stdout_layer).try_init();
        }
    }
}

/// Run `f` with a thread-local subscriber and return everything it logged.
#[cfg(test)]
pub(crate) fn capture_logs<F: FnOnce()>(f: F) -> String {
    use std::io::Write;
    use std::sync::Arc;

    #[derive(Clone)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    let buffer = SharedBuffer(Arc::new(Mutex::new(Vec::new())));
    let writer = buffer.clone();
    let capture_layer = layer()
        .with_writer(move || writer.clone())
        .with_timer(SecondPrecisionTimer)
        .with_ansi(false)
        .with_filter(LevelFilter::INFO);
    tracing::subscriber::with_default(Registry::default().with(capture_layer), f);

    let bytes = buffer.0.lock().unwrap().clone();
    String::from_utf8_lossy(&bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_event_per_line() {
        let logs = capture_logs(|| {
            info!("first");
            tracing::debug!("hidden");
            info!("second");
        });
        let lines: Vec<&str> = logs.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("first"));
        assert!(lines[1].ends_with("second"));
        // HH:MM:SS prefix
        assert_eq!(lines[0].as_bytes()[2], b':');
        assert_eq!(lines[0].as_bytes()[5], b':');
    }
}
