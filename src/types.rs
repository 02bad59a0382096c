//! Strongly-typed identifiers for VM entities.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the five named state buffers comprising the live VM state.
///
/// Each register maps to a fixed ordinal used as its positional key inside
/// a debug-session region. The mapping is a protocol constant: it is never
/// derived from register size or content, and it never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Register {
    /// Saved machine states (outer continuations).
    Dump,
    /// Pending records awaiting execution.
    Input,
    /// Name bindings.
    Env,
    /// The instruction queue currently being executed.
    Control,
    /// The working value stack.
    Stack,
}

impl Register {
    /// All five registers, in ordinal order.
    pub const ALL: [Register; 5] = [
        Register::Dump,
        Register::Input,
        Register::Env,
        Register::Control,
        Register::Stack,
    ];

    /// The register's fixed ordinal inside a debug-session region.
    #[must_use]
    pub const fn ordinal(self) -> usize {
        match self {
            Register::Dump => 0,
            Register::Input => 1,
            Register::Env => 2,
            Register::Control => 3,
            Register::Stack => 4,
        }
    }

    /// Look a register up by its ordinal.
    #[must_use]
    pub const fn from_ordinal(ordinal: usize) -> Option<Register> {
        match ordinal {
            0 => Some(Register::Dump),
            1 => Some(Register::Input),
            2 => Some(Register::Env),
            3 => Some(Register::Control),
            4 => Some(Register::Stack),
            _ => None,
        }
    }

    /// The region name used for this register in the enclosing arena.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Register::Dump => "dump",
            Register::Input => "input",
            Register::Env => "env",
            Register::Control => "control",
            Register::Stack => "stack",
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Handle to a carved region of the enclosing arena.
///
/// This is an index into the arena's region table, not a pointer; the
/// region's lifetime is tracked by the arena, never by the handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionId(u32);

impl RegionId {
    /// Create a region handle from a raw table index.
    #[must_use]
    pub(crate) const fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// Get the raw table index.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "region_{}", self.0)
    }
}
