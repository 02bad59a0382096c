//! Error types for regvm.
//!
//! This module provides strongly-typed errors with actionable context.
//! All errors include the identifiers needed to locate the failure (region
//! name, byte offset, requested/available sizes) without a debugger.

use thiserror::Error;

/// The main error type for VM operations.
#[derive(Error, Debug)]
pub enum VmError {
    // =========================================================================
    // Arena Errors (E001-E099)
    // =========================================================================
    /// The enclosing arena has no room to carve a new region.
    #[error("E001: Arena exhausted carving '{name}': requested {requested} bytes, {available} bytes free")]
    ArenaExhausted {
        /// The name of the region being carved.
        name: String,
        /// Number of bytes requested.
        requested: usize,
        /// Number of bytes still free.
        available: usize,
    },

    /// A region's fixed capacity cannot hold the write.
    #[error("E002: Region '{name}' capacity exceeded: requested {requested} bytes, available {available} bytes")]
    RegionCapacity {
        /// The name of the region being written.
        name: String,
        /// Number of bytes requested.
        requested: usize,
        /// Number of bytes available in the region.
        available: usize,
    },

    /// A byte offset does not lie inside a region's occupied span.
    #[error("E003: Invalid offset {offset} in region '{name}': {cause}")]
    InvalidOffset {
        /// The name of the region.
        name: String,
        /// The offending byte offset.
        offset: usize,
        /// Reason why the offset is invalid.
        cause: String,
    },

    /// A record header or payload failed validation.
    #[error("E004: Corrupt record at offset {offset}: {cause}")]
    CorruptRecord {
        /// The byte offset of the record.
        offset: usize,
        /// Description of the corruption.
        cause: String,
    },

    /// A region other than the most recently carved one was released.
    #[error("E005: Region '{name}' is not the tail region and cannot be released")]
    ReleaseOrder {
        /// The name of the region that was released out of order.
        name: String,
    },

    // =========================================================================
    // Configuration Errors (E100-E199)
    // =========================================================================
    /// Invalid configuration value.
    #[error("E101: Invalid configuration '{field}': {cause}")]
    ConfigValue {
        /// The configuration field with the invalid value.
        field: String,
        /// Description of why the value is invalid.
        cause: String,
    },

    // =========================================================================
    // Dispatch Errors (E200-E299)
    // =========================================================================
    /// No operation is registered for an address.
    #[error("E201: No operation registered for address '{address}'")]
    UnknownAddress {
        /// The address that did not match any registration.
        address: String,
    },
}

impl VmError {
    /// Get the error code (e.g., "E001").
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ArenaExhausted { .. } => "E001",
            Self::RegionCapacity { .. } => "E002",
            Self::InvalidOffset { .. } => "E003",
            Self::CorruptRecord { .. } => "E004",
            Self::ReleaseOrder { .. } => "E005",
            Self::ConfigValue { .. } => "E101",
            Self::UnknownAddress { .. } => "E201",
        }
    }

    /// Check if this error is a capacity exhaustion at the primitive layer.
    #[must_use]
    pub fn is_capacity(&self) -> bool {
        matches!(
            self,
            Self::ArenaExhausted { .. } | Self::RegionCapacity { .. }
        )
    }
}

/// Result type alias using `VmError`.
pub type Result<T> = std::result::Result<T, VmError>;
