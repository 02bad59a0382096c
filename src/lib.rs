//! regvm — arena-backed stack VM core with relocatable debug sessions.
//!
//! The entire VM state lives in one fixed-size arena: five registers
//! (Dump, Input, Env, Control, Stack), each a buffer of length-prefixed
//! self-describing records. The debug subsystem carves a bounded session
//! region out of the arena's free space, relocates the registers into it
//! by value, and exposes ordinal-addressed access to them while the host
//! keeps running.
//!
//! # Key Components
//!
//! - **Arena**: the enclosing fixed region; registers and the session
//!   region are bump-carved sub-regions identified by handles
//! - **Record**: the length-prefixed unit of storage, atomic or nested
//! - **Debug**: admission control, session lifecycle, ordinal accessors
//! - **Dispatch**: the address-to-operation registry consumed by the host
//!
//! # Example
//!
//! ```
//! use regvm::prelude::*;
//!
//! # fn main() -> regvm::Result<()> {
//! let mut vm = Vm::new(&VmConfig::default())?;
//! vm.push(Register::Stack, &Record::int(42))?;
//!
//! regvm::dispatch::dispatch("/db/debug", &mut vm)?;
//! assert!(vm.session().is_some());
//!
//! regvm::dispatch::dispatch("/db/exit", &mut vm)?;
//! assert!(vm.session().is_none());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod arena;
pub mod debug;
pub mod dispatch;
pub mod error;
pub mod prelude;
pub mod record;
pub mod types;
pub mod vm;

// Re-export key types at crate root for convenience
pub use arena::VmArena;
pub use error::{Result, VmError};
pub use record::{Record, RecordKind};
pub use types::{Register, RegionId};
pub use vm::{Vm, VmConfig};
