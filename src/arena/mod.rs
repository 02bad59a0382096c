//! The enclosing fixed-size arena and its carved regions.
//!
//! All VM state lives inside one fixed byte region. Registers and the
//! debug-session region are sub-regions of it, never independently
//! heap-allocated: "allocation" is bump-style carving, identified by
//! [`RegionId`](crate::types::RegionId) handles, and must be explicitly
//! released to be reclaimed.
//!
//! # Layout
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ dump │ input │ env │ control │ stack │ [/db] │   free space  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each region holds a sequence of length-prefixed records
//! (see [`crate::record`]) up to its fixed capacity. Only the most
//! recently carved region can be released; in practice that is always
//! the `/db` session region, carved at session entry and released at
//! exit or abort.

mod records;
mod region;

pub use region::VmArena;
