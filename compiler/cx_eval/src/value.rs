//! Evaluation stack items.

use std::fmt;

use cx_ir::SymbolRef;

/// Handle of a stream slot owned by the executor.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct StreamId(u32);

impl StreamId {
    pub const STDIN: StreamId = StreamId(0);
    pub const STDOUT: StreamId = StreamId(1);
    pub const STDERR: StreamId = StreamId(2);

    #[inline]
    pub const fn new(raw: u32) -> Self {
        StreamId(raw)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Uniquely owned character or byte array.
///
/// Produced by string literals, `to_str`, and stream reads. Whoever holds
/// the buffer owns it; pushing it onto the stack moves it there, and the
/// next pop moves it on to the consumer.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct CharBuffer {
    bytes: Vec<u8>,
}

impl CharBuffer {
    pub fn new(bytes: Vec<u8>) -> Self {
        CharBuffer { bytes }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Contents up to the first NUL, as C string functions would see them.
    pub fn c_str(&self) -> String {
        let end = self
            .bytes
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(self.bytes.len());
        self.bytes[..end].iter().map(|&b| char::from(b)).collect()
    }
}

impl From<&str> for CharBuffer {
    fn from(text: &str) -> Self {
        CharBuffer::new(text.as_bytes().to_vec())
    }
}

impl From<String> for CharBuffer {
    fn from(text: String) -> Self {
        CharBuffer::new(text.into_bytes())
    }
}

impl fmt::Debug for CharBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CharBuffer({:?})", String::from_utf8_lossy(&self.bytes))
    }
}

/// Where a variable's value lives: the globals, or the frame of one
/// activation counted from the outermost call.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Place {
    Global,
    Frame(usize),
}

/// A variable in the activation that owns it.
///
/// Taken when an argument is bound to a var parameter, so the parameter
/// keeps naming the same storage however far it is passed on. A frame
/// place stays valid while the callee runs, since frames below it are
/// never popped first.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct VarAddr {
    pub sym: SymbolRef,
    pub place: Place,
}

impl fmt::Display for VarAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.place {
            Place::Global => write!(f, "{}:{}", self.sym.table, self.sym.node.raw()),
            Place::Frame(depth) => {
                write!(f, "{}:{}@{depth}", self.sym.table, self.sym.node.raw())
            }
        }
    }
}

/// One evaluation stack slot.
#[derive(Clone, Debug, PartialEq)]
pub enum StackItem {
    Int(i32),
    Float(f32),
    Char(u8),
    WChar(char),
    Bool(bool),
    Byte(u8),
    /// Owned array contents.
    Buffer(CharBuffer),
    Stream(StreamId),
    /// Address of a variable, passed to var parameters.
    Addr(VarAddr),
}

impl StackItem {
    /// Name of the variant, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            StackItem::Int(_) => "int",
            StackItem::Float(_) => "float",
            StackItem::Char(_) => "char",
            StackItem::WChar(_) => "wchar",
            StackItem::Bool(_) => "bool",
            StackItem::Byte(_) => "byte",
            StackItem::Buffer(_) => "array",
            StackItem::Stream(_) => "file",
            StackItem::Addr(_) => "address",
        }
    }

    /// Integer view of any ordinal item.
    pub fn as_int(&self) -> Option<i32> {
        match *self {
            StackItem::Int(v) => Some(v),
            StackItem::Char(c) | StackItem::Byte(c) => Some(i32::from(c)),
            StackItem::Bool(b) => Some(i32::from(b)),
            StackItem::WChar(c) => i32::try_from(u32::from(c)).ok(),
            _ => None,
        }
    }
}

impl From<CharBuffer> for StackItem {
    fn from(buffer: CharBuffer) -> Self {
        StackItem::Buffer(buffer)
    }
}
