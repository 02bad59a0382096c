//! Prelude for convenient imports.
//!
//! # Example
//!
//! ```
//! use regvm::prelude::*;
//! ```

// Core types
pub use crate::types::{Register, RegionId};

// Error handling
pub use crate::error::{Result, VmError};

// Arena and records
pub use crate::arena::VmArena;
pub use crate::record::{Record, RecordKind};

// VM state
pub use crate::vm::{Vm, VmConfig};

// Dispatch
pub use crate::dispatch::{OpFn, Registry};

// Debug subsystem
pub use crate::debug::{HOOK_END, HOOK_START, SESSION_PATH};
