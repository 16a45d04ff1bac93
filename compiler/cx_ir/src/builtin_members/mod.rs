//! Built-in member metadata.
//!
//! Single source of truth for the native members exposed on scalar types
//! and on the stream type. The registry that installs them into symbol
//! tables and the executor that runs them both read this table, so a
//! member's arity is declared exactly once.
//!
//! # Usage
//!
//! ```ignore
//! use cx_ir::builtin_members::{members_in, MemberScope};
//!
//! for def in members_in(MemberScope::Stream) {
//!     println!("{}: {} parameter(s)", def.name, def.params.len());
//! }
//! ```

use std::fmt;

/// Which shared member table a member lives in.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum MemberScope {
    /// Members of `int`, `byte`, `float`, `bool`, `char`, and `wchar`.
    Scalar,
    /// Members of `file`.
    Stream,
}

/// Type of a synthesized parameter.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ParamSpec {
    /// Integer value parameter.
    Int,
    /// Open array of `char`.
    CharArray,
    /// Open array of `byte`.
    ByteArray,
}

/// Statically declared result type of a member.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ReturnSpec {
    Int,
    Float,
    Bool,
    Char,
    WChar,
    Byte,
    /// Array of `char`; the element count is fixed per call.
    CharArray,
    /// Array of `wchar`; the element count is fixed per call.
    WCharArray,
}

/// A named parameter in a member's synthesized parameter chain.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ParamDef {
    pub name: &'static str,
    pub spec: ParamSpec,
}

impl ParamDef {
    const fn new(name: &'static str, spec: ParamSpec) -> Self {
        ParamDef { name, spec }
    }
}

/// Every native member, in registration order.
///
/// The discriminant doubles as the index into [`BUILTIN_MEMBERS`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum BuiltinMember {
    // scalar members
    Size,
    Length,
    ToStr,
    ToWstr,
    ToInt,
    ToChr,
    ToFlt,
    ToBool,
    ToWchr,
    ToByte,
    // stream members
    Puts,
    Open,
    Reopen,
    Close,
    Flush,
    Wide,
    Read,
    Write,
}

impl BuiltinMember {
    /// All members in registration order.
    pub const ALL: [BuiltinMember; 18] = [
        BuiltinMember::Size,
        BuiltinMember::Length,
        BuiltinMember::ToStr,
        BuiltinMember::ToWstr,
        BuiltinMember::ToInt,
        BuiltinMember::ToChr,
        BuiltinMember::ToFlt,
        BuiltinMember::ToBool,
        BuiltinMember::ToWchr,
        BuiltinMember::ToByte,
        BuiltinMember::Puts,
        BuiltinMember::Open,
        BuiltinMember::Reopen,
        BuiltinMember::Close,
        BuiltinMember::Flush,
        BuiltinMember::Wide,
        BuiltinMember::Read,
        BuiltinMember::Write,
    ];

    /// Metadata for this member.
    #[inline]
    pub fn def(self) -> &'static MemberDef {
        &BUILTIN_MEMBERS[self as usize]
    }

    #[inline]
    pub fn name(self) -> &'static str {
        self.def().name
    }

    /// Number of arguments the native handler pops, excluding the receiver.
    #[inline]
    pub fn arity(self) -> usize {
        self.def().params.len()
    }

}

impl fmt::Display for BuiltinMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Definition of a native member.
#[derive(Clone, Debug)]
pub struct MemberDef {
    pub member: BuiltinMember,
    pub scope: MemberScope,
    pub name: &'static str,
    /// Parameters, excluding the receiver, in declaration order.
    pub params: &'static [ParamDef],
    pub returns: ReturnSpec,
}

impl MemberDef {
    const fn new(
        member: BuiltinMember,
        scope: MemberScope,
        name: &'static str,
        params: &'static [ParamDef],
        returns: ReturnSpec,
    ) -> Self {
        MemberDef {
            member,
            scope,
            name,
            params,
            returns,
        }
    }

    /// A scalar member: no parameters beyond the receiver.
    const fn scalar(member: BuiltinMember, name: &'static str, returns: ReturnSpec) -> Self {
        Self::new(member, MemberScope::Scalar, name, &[], returns)
    }

    const fn stream(
        member: BuiltinMember,
        name: &'static str,
        params: &'static [ParamDef],
        returns: ReturnSpec,
    ) -> Self {
        Self::new(member, MemberScope::Stream, name, params, returns)
    }
}

const FILENAME_MODE: &[ParamDef] = &[
    ParamDef::new("filename", ParamSpec::CharArray),
    ParamDef::new("mode", ParamSpec::CharArray),
];

/// All native members, indexed by `BuiltinMember as usize`.
pub static BUILTIN_MEMBERS: &[MemberDef] = &[
    MemberDef::scalar(BuiltinMember::Size, "size", ReturnSpec::Int),
    MemberDef::scalar(BuiltinMember::Length, "length", ReturnSpec::Int),
    MemberDef::scalar(BuiltinMember::ToStr, "to_str", ReturnSpec::CharArray),
    MemberDef::scalar(BuiltinMember::ToWstr, "to_wstr", ReturnSpec::WCharArray),
    MemberDef::scalar(BuiltinMember::ToInt, "to_int", ReturnSpec::Int),
    MemberDef::scalar(BuiltinMember::ToChr, "to_chr", ReturnSpec::Char),
    MemberDef::scalar(BuiltinMember::ToFlt, "to_flt", ReturnSpec::Float),
    MemberDef::scalar(BuiltinMember::ToBool, "to_bool", ReturnSpec::Bool),
    MemberDef::scalar(BuiltinMember::ToWchr, "to_wchr", ReturnSpec::WChar),
    MemberDef::scalar(BuiltinMember::ToByte, "to_byte", ReturnSpec::Byte),
    MemberDef::stream(
        BuiltinMember::Puts,
        "puts",
        &[ParamDef::new("str", ParamSpec::CharArray)],
        ReturnSpec::Bool,
    ),
    MemberDef::stream(BuiltinMember::Open, "open", FILENAME_MODE, ReturnSpec::Bool),
    MemberDef::stream(BuiltinMember::Reopen, "reopen", FILENAME_MODE, ReturnSpec::Bool),
    MemberDef::stream(BuiltinMember::Close, "close", &[], ReturnSpec::Bool),
    MemberDef::stream(BuiltinMember::Flush, "flush", &[], ReturnSpec::Bool),
    MemberDef::stream(
        BuiltinMember::Wide,
        "wide",
        &[ParamDef::new("mode", ParamSpec::Int)],
        ReturnSpec::Int,
    ),
    MemberDef::stream(
        BuiltinMember::Read,
        "read",
        &[
            ParamDef::new("size", ParamSpec::Int),
            ParamDef::new("count", ParamSpec::Int),
        ],
        ReturnSpec::CharArray,
    ),
    MemberDef::stream(
        BuiltinMember::Write,
        "write",
        &[
            ParamDef::new("buffer", ParamSpec::ByteArray),
            ParamDef::new("size", ParamSpec::Int),
            ParamDef::new("count", ParamSpec::Int),
        ],
        ReturnSpec::Int,
    ),
];

/// All members of one table, in registration order.
///
/// Scalar members are registered before stream members, so walking the
/// scalar table and then the stream table visits every member in
/// discriminant order.
pub fn members_in(scope: MemberScope) -> impl Iterator<Item = &'static MemberDef> {
    BUILTIN_MEMBERS.iter().filter(move |def| def.scope == scope)
}
