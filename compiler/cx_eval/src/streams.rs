//! Stream slots behind `file` values.
//!
//! A `file` value on the stack is a `StreamId` naming a slot here. Slots
//! 0, 1 and 2 start bound to stdin, stdout and stderr; `open` and
//! `reopen` rebind a slot to a file. Failures follow C stdio: they show up
//! as `false` or short counts, never as executor errors.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;

use crate::output::OutputSink;
use crate::StreamId;

enum Handle {
    Closed,
    Stdin,
    Stdout,
    Stderr,
    File(File),
}

struct Slot {
    handle: Handle,
    /// `fwide` orientation: >0 wide, <0 byte, 0 undecided.
    orientation: i32,
}

impl Slot {
    fn new(handle: Handle) -> Self {
        Slot {
            handle,
            orientation: 0,
        }
    }
}

/// Every stream slot of one executor.
pub struct StreamTable {
    slots: Vec<Slot>,
}

impl StreamTable {
    pub fn new() -> Self {
        StreamTable {
            slots: vec![
                Slot::new(Handle::Stdin),
                Slot::new(Handle::Stdout),
                Slot::new(Handle::Stderr),
            ],
        }
    }

    /// Allocate a closed slot for a new `file` variable.
    pub fn allocate(&mut self) -> StreamId {
        let raw = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
        self.slots.push(Slot::new(Handle::Closed));
        StreamId::new(raw)
    }

    pub fn contains(&self, id: StreamId) -> bool {
        id.index() < self.slots.len()
    }

    pub fn is_open(&self, id: StreamId) -> bool {
        self.slots
            .get(id.index())
            .is_some_and(|slot| !matches!(slot.handle, Handle::Closed))
    }

    /// Bind `id` to `path` opened with a C mode string.
    pub fn open(&mut self, id: StreamId, path: &Path, mode: &str) -> bool {
        let Some(slot) = self.slots.get_mut(id.index()) else {
            return false;
        };
        let Some(options) = open_options(mode) else {
            tracing::debug!(mode, "invalid stream mode");
            return false;
        };
        match options.open(path) {
            Ok(file) => {
                slot.handle = Handle::File(file);
                slot.orientation = 0;
                true
            }
            Err(err) => {
                tracing::debug!(path = %path.display(), %err, "stream open failed");
                false
            }
        }
    }

    /// Close whatever `id` holds, then open `path` in its place.
    pub fn reopen(&mut self, id: StreamId, path: &Path, mode: &str) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.close(id);
        self.open(id, path, mode)
    }

    /// Close `id`; `false` if it was not open.
    pub fn close(&mut self, id: StreamId) -> bool {
        match self.slots.get_mut(id.index()) {
            Some(slot) if !matches!(slot.handle, Handle::Closed) => {
                slot.handle = Handle::Closed;
                slot.orientation = 0;
                true
            }
            _ => false,
        }
    }

    pub fn flush(&mut self, id: StreamId, out: &OutputSink) -> bool {
        let Some(slot) = self.slots.get_mut(id.index()) else {
            return false;
        };
        let result = match &mut slot.handle {
            Handle::Closed => return false,
            Handle::Stdin => Ok(()),
            Handle::Stdout => out.flush(),
            Handle::Stderr => io::stderr().flush(),
            Handle::File(file) => file.flush(),
        };
        result.is_ok()
    }

    /// Query or set the orientation, as `fwide` does: a nonzero `mode` only
    /// takes effect while the stream is undecided.
    pub fn wide(&mut self, id: StreamId, mode: i32) -> i32 {
        let Some(slot) = self.slots.get_mut(id.index()) else {
            return 0;
        };
        if slot.orientation == 0 {
            slot.orientation = mode.signum();
        }
        slot.orientation
    }

    /// Write all of `bytes`; returns how many were written.
    pub fn write(&mut self, id: StreamId, bytes: &[u8], out: &OutputSink) -> usize {
        let Some(slot) = self.slots.get_mut(id.index()) else {
            return 0;
        };
        let result = match &mut slot.handle {
            Handle::Closed | Handle::Stdin => return 0,
            Handle::Stdout => out.write_bytes(bytes),
            Handle::Stderr => io::stderr().lock().write_all(bytes),
            Handle::File(file) => file.write_all(bytes),
        };
        match result {
            Ok(()) => bytes.len(),
            Err(err) => {
                tracing::debug!(stream = %id, %err, "stream write failed");
                0
            }
        }
    }

    /// Read up to `limit` bytes, stopping early only at end of input.
    pub fn read(&mut self, id: StreamId, limit: usize) -> Vec<u8> {
        let mut buf = Vec::new();
        let Some(slot) = self.slots.get_mut(id.index()) else {
            return buf;
        };
        let limit = u64::try_from(limit).unwrap_or(u64::MAX);
        let result = match &mut slot.handle {
            Handle::Stdin => io::stdin().lock().take(limit).read_to_end(&mut buf),
            Handle::File(file) => file.take(limit).read_to_end(&mut buf),
            Handle::Closed | Handle::Stdout | Handle::Stderr => Ok(0),
        };
        if let Err(err) = result {
            tracing::debug!(stream = %id, %err, "stream read failed");
        }
        buf
    }
}

impl Default for StreamTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Translate a C `fopen` mode (`r`, `w`, `a`, each optionally with `+`
/// and `b`) into open options.
fn open_options(mode: &str) -> Option<OpenOptions> {
    let plain: String = mode.chars().filter(|&c| c != 'b').collect();
    let mut options = OpenOptions::new();
    match plain.as_str() {
        "r" => options.read(true),
        "w" => options.write(true).create(true).truncate(true),
        "a" => options.append(true).create(true),
        "r+" => options.read(true).write(true),
        "w+" => options.read(true).write(true).create(true).truncate(true),
        "a+" => options.read(true).append(true).create(true),
        _ => return None,
    };
    Some(options)
}

#[cfg(test)]
mod tests;
