//! Output sinks for trace lines and standard-output stream writes.
//!
//! Program output and trace announcements go through one sink so their
//! relative order is preserved:
//! - `Stdout`: the process's standard output (default)
//! - `Buffer`: captured in memory, for tests and embedding
//! - `Silent`: discarded
//!
//! Enum dispatch keeps the hot path free of vtable calls.

use std::io::Write;
use std::sync::Arc;

use parking_lot::Mutex;

/// Destination for user-visible executor output.
pub enum OutputSink {
    Stdout,
    Buffer(Mutex<String>),
    Silent,
}

impl OutputSink {
    /// Write `msg` followed by a newline.
    pub fn println(&self, msg: &str) {
        match self {
            Self::Stdout => println!("{msg}"),
            Self::Buffer(buf) => {
                let mut buf = buf.lock();
                buf.push_str(msg);
                buf.push('\n');
            }
            Self::Silent => {}
        }
    }

    /// Write `msg` as is.
    pub fn print(&self, msg: &str) {
        match self {
            Self::Stdout => print!("{msg}"),
            Self::Buffer(buf) => buf.lock().push_str(msg),
            Self::Silent => {}
        }
    }

    /// Write raw bytes; non-UTF-8 input is captured lossily.
    pub fn write_bytes(&self, bytes: &[u8]) -> std::io::Result<()> {
        match self {
            Self::Stdout => std::io::stdout().lock().write_all(bytes),
            Self::Buffer(buf) => {
                buf.lock().push_str(&String::from_utf8_lossy(bytes));
                Ok(())
            }
            Self::Silent => Ok(()),
        }
    }

    pub fn flush(&self) -> std::io::Result<()> {
        match self {
            Self::Stdout => std::io::stdout().lock().flush(),
            Self::Buffer(_) | Self::Silent => Ok(()),
        }
    }

    /// Captured output; empty for sinks that do not capture.
    pub fn output(&self) -> String {
        match self {
            Self::Buffer(buf) => buf.lock().clone(),
            Self::Stdout | Self::Silent => String::new(),
        }
    }

    pub fn clear(&self) {
        if let Self::Buffer(buf) = self {
            buf.lock().clear();
        }
    }
}

/// Sink shared between an executor and whoever reads its output.
pub type SharedOutput = Arc<OutputSink>;

pub fn stdout_sink() -> SharedOutput {
    Arc::new(OutputSink::Stdout)
}

/// A sink that captures everything written to it.
pub fn buffer_sink() -> SharedOutput {
    Arc::new(OutputSink::Buffer(Mutex::new(String::new())))
}

pub fn silent_sink() -> SharedOutput {
    Arc::new(OutputSink::Silent)
}
