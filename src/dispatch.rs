//! Address-to-operation registry consumed by the host instruction loop.
//!
//! The host dispatcher matches an incoming instruction's address against
//! the registered addresses and invokes the bound operation with the
//! shared VM state handle. Operations are plain function values; the
//! table is built once at startup and read-mostly afterwards.

use crate::error::{Result, VmError};
use crate::vm::Vm;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;

/// An addressable operation over the shared VM state.
pub type OpFn = fn(&mut Vm) -> Result<()>;

/// A mapping from instruction address to operation.
#[derive(Default)]
pub struct Registry {
    ops: HashMap<String, OpFn>,
}

impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind an address to an operation, replacing any previous binding.
    pub fn register(&mut self, address: impl Into<String>, op: OpFn) {
        let address = address.into();
        if self.ops.insert(address.clone(), op).is_some() {
            tracing::warn!(%address, "replaced existing operation binding");
        }
    }

    /// Invoke the operation bound to `address`.
    ///
    /// # Errors
    /// `E201` if no operation is bound; otherwise whatever the operation
    /// itself propagates.
    pub fn dispatch(&self, address: &str, vm: &mut Vm) -> Result<()> {
        let op = self.ops.get(address).ok_or_else(|| VmError::UnknownAddress {
            address: address.to_string(),
        })?;
        op(vm)
    }

    /// Whether an operation is bound to `address`.
    #[must_use]
    pub fn contains(&self, address: &str) -> bool {
        self.ops.contains_key(address)
    }

    /// Number of registered operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// The process-wide registry, pre-loaded with the debug-session table.
static GLOBAL: Lazy<RwLock<Registry>> = Lazy::new(|| {
    let mut registry = Registry::new();
    crate::debug::register_ops(&mut registry);
    RwLock::new(registry)
});

/// The process-wide read-mostly registry.
#[must_use]
pub fn global() -> &'static RwLock<Registry> {
    &GLOBAL
}

/// Dispatch through the process-wide registry.
///
/// # Errors
/// See [`Registry::dispatch`].
pub fn dispatch(address: &str, vm: &mut Vm) -> Result<()> {
    GLOBAL.read().dispatch(address, vm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vm::VmConfig;

    fn noop(_vm: &mut Vm) -> Result<()> {
        Ok(())
    }

    #[test]
    fn register_and_dispatch() {
        let mut registry = Registry::new();
        registry.register("/x/noop", noop);
        assert!(registry.contains("/x/noop"));

        let mut vm = Vm::new(&VmConfig::default()).unwrap();
        registry.dispatch("/x/noop", &mut vm).unwrap();
    }

    #[test]
    fn unknown_address_is_an_error() {
        let registry = Registry::new();
        let mut vm = Vm::new(&VmConfig::default()).unwrap();
        let err = registry.dispatch("/x/missing", &mut vm).unwrap_err();
        assert_eq!(err.code(), "E201");
    }

    #[test]
    fn global_registry_has_debug_table() {
        let registry = global().read();
        for address in [
            "/db/enter",
            "/db/debug",
            "/db/exit",
            "/db/abort",
            "/db/get/_i",
            "/db/set/_s",
        ] {
            assert!(registry.contains(address), "missing {address}");
        }
    }
}
