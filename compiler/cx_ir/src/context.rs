//! Session context.
//!
//! The state every analysis and execution step may consult: the current
//! source line, which trace hooks are on, whether cross-references are
//! recorded, and the listing print width. It is passed explicitly to the
//! operations that need it; nothing here is process-global.

use bitflags::bitflags;

bitflags! {
    /// Independently toggled trace hooks.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct TraceFlags: u8 {
        /// Announce routine entry and exit.
        const ROUTINE = 1 << 0;
        /// Announce each statement's line number.
        const STATEMENT = 1 << 1;
        /// Announce variable fetches.
        const FETCH = 1 << 2;
        /// Announce variable stores.
        const STORE = 1 << 3;

        /// Data tracing: fetches and stores.
        const DATA = Self::FETCH.bits() | Self::STORE.bits();
    }
}

impl Default for TraceFlags {
    fn default() -> Self {
        TraceFlags::empty()
    }
}

/// A trace flag name that `TraceFlags::parse` does not recognize.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown trace flag `{0}` (expected routine, statement, fetch, store, data, all)")]
pub struct UnknownTraceFlag(pub String);

impl TraceFlags {
    /// Parse a comma-separated list such as `"routine,data"`.
    ///
    /// Whitespace around names is ignored; an empty string yields no flags.
    pub fn parse(spec: &str) -> Result<Self, UnknownTraceFlag> {
        let mut flags = TraceFlags::empty();
        for part in spec.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            flags |= match part {
                "routine" => TraceFlags::ROUTINE,
                "statement" => TraceFlags::STATEMENT,
                "fetch" => TraceFlags::FETCH,
                "store" => TraceFlags::STORE,
                "data" => TraceFlags::DATA,
                "all" => TraceFlags::all(),
                other => return Err(UnknownTraceFlag(other.to_string())),
            };
        }
        Ok(flags)
    }
}

/// Maximum length of a printed listing line.
pub const DEFAULT_PRINT_WIDTH: usize = 80;

/// Default bound on nested interpreted calls.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 1024;

/// Explicit context threaded through symbol-table and executor operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionContext {
    current_line: u32,
    trace: TraceFlags,
    xref: bool,
    print_width: usize,
    max_call_depth: usize,
}

impl SessionContext {
    pub fn new() -> Self {
        SessionContext {
            current_line: 0,
            trace: TraceFlags::empty(),
            xref: false,
            print_width: DEFAULT_PRINT_WIDTH,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }

    pub fn builder() -> SessionContextBuilder {
        SessionContextBuilder::default()
    }

    /// Build a context from `CX_TRACE` (comma list) and `CX_XREF`.
    ///
    /// Unset variables leave the defaults in place.
    pub fn from_env() -> Result<Self, UnknownTraceFlag> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`SessionContext::from_env`], reading variables through `var`.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, UnknownTraceFlag> {
        let mut builder = Self::builder();
        if let Some(spec) = var("CX_TRACE") {
            builder = builder.trace(TraceFlags::parse(&spec)?);
        }
        if let Some(xref) = var("CX_XREF") {
            builder = builder.xref(matches!(xref.as_str(), "1" | "true" | "yes"));
        }
        Ok(builder.build())
    }

    #[inline]
    pub fn current_line(&self) -> u32 {
        self.current_line
    }

    #[inline]
    pub fn set_current_line(&mut self, line: u32) {
        self.current_line = line;
    }

    /// Advance to the next source line and return its number.
    pub fn next_line(&mut self) -> u32 {
        self.current_line = self.current_line.saturating_add(1);
        self.current_line
    }

    #[inline]
    pub fn trace_flags(&self) -> TraceFlags {
        self.trace
    }

    #[inline]
    pub fn set_trace_flags(&mut self, flags: TraceFlags) {
        self.trace = flags;
    }

    /// Whether every hook in `flags` is enabled.
    #[inline]
    pub fn traces(&self, flags: TraceFlags) -> bool {
        self.trace.contains(flags)
    }

    #[inline]
    pub fn xref_enabled(&self) -> bool {
        self.xref
    }

    #[inline]
    pub fn set_xref(&mut self, enabled: bool) {
        self.xref = enabled;
    }

    #[inline]
    pub fn print_width(&self) -> usize {
        self.print_width
    }

    #[inline]
    pub fn max_call_depth(&self) -> usize {
        self.max_call_depth
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`SessionContext`].
#[derive(Clone, Debug, Default)]
pub struct SessionContextBuilder {
    trace: TraceFlags,
    xref: bool,
    print_width: Option<usize>,
    max_call_depth: Option<usize>,
    first_line: u32,
}

impl SessionContextBuilder {
    #[must_use]
    pub fn trace(mut self, flags: TraceFlags) -> Self {
        self.trace = flags;
        self
    }

    #[must_use]
    pub fn xref(mut self, enabled: bool) -> Self {
        self.xref = enabled;
        self
    }

    /// Listing width; values below 8 are raised to 8 so a line number
    /// always fits after a wrap.
    #[must_use]
    pub fn print_width(mut self, width: usize) -> Self {
        self.print_width = Some(width.max(8));
        self
    }

    #[must_use]
    pub fn max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = Some(depth);
        self
    }

    #[must_use]
    pub fn starting_line(mut self, line: u32) -> Self {
        self.first_line = line;
        self
    }

    pub fn build(self) -> SessionContext {
        SessionContext {
            current_line: self.first_line,
            trace: self.trace,
            xref: self.xref,
            print_width: self.print_width.unwrap_or(DEFAULT_PRINT_WIDTH),
            max_call_depth: self.max_call_depth.unwrap_or(DEFAULT_MAX_CALL_DEPTH),
        }
    }
}
