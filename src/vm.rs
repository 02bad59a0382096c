//! The VM state handle and its configuration.

use crate::arena::VmArena;
use crate::error::{Result, VmError};
use crate::record::Record;
use crate::types::{Register, RegionId};
use serde::{Deserialize, Serialize};

/// Default enclosing arena size: 64 KB.
pub const DEFAULT_CAPACITY: usize = 64 * 1024;

/// Default per-register capacity: 4 KB.
pub const DEFAULT_REGISTER_CAPACITY: usize = 4 * 1024;

/// Configuration for VM construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VmConfig {
    /// Total capacity of the enclosing arena in bytes.
    pub capacity: usize,
    /// Fixed capacity of each of the five registers in bytes.
    pub register_capacity: usize,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            register_capacity: DEFAULT_REGISTER_CAPACITY,
        }
    }
}

impl VmConfig {
    /// Config with custom total capacity.
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Config with custom per-register capacity.
    #[must_use]
    pub fn with_register_capacity(mut self, register_capacity: usize) -> Self {
        self.register_capacity = register_capacity;
        self
    }

    /// Load a configuration from JSON.
    ///
    /// # Errors
    /// `E101` if the JSON does not parse or validation fails.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| VmError::ConfigValue {
            field: "config".to_string(),
            cause: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate that the five registers fit inside the arena.
    ///
    /// # Errors
    /// `E101` if the configuration is unusable.
    pub fn validate(&self) -> Result<()> {
        if self.register_capacity == 0 {
            return Err(VmError::ConfigValue {
                field: "register_capacity".to_string(),
                cause: "must be non-zero".to_string(),
            });
        }
        let registers = Register::ALL.len() * self.register_capacity;
        if registers > self.capacity {
            return Err(VmError::ConfigValue {
                field: "capacity".to_string(),
                cause: format!(
                    "{} bytes cannot hold {} register bytes",
                    self.capacity, registers
                ),
            });
        }
        Ok(())
    }
}

/// The single shared VM state handle.
///
/// Owns the enclosing arena with the five registers carved at
/// construction, plus the handle to the debug-session region while a
/// session is active. Every operation takes this handle explicitly;
/// there is no ambient global state.
#[derive(Debug)]
pub struct Vm {
    arena: VmArena,
    registers: [RegionId; 5],
    session: Option<RegionId>,
}

impl Vm {
    /// Construct a VM, carving the five registers in ordinal order.
    ///
    /// # Errors
    /// `E101` on invalid configuration.
    pub fn new(config: &VmConfig) -> Result<Self> {
        config.validate()?;
        let mut arena = VmArena::new(config.capacity);
        let mut registers = [RegionId::new(0); 5];
        for register in Register::ALL {
            registers[register.ordinal()] =
                arena.carve(register.name(), config.register_capacity)?;
        }
        Ok(Self {
            arena,
            registers,
            session: None,
        })
    }

    /// The region handle of a register.
    #[must_use]
    pub fn region(&self, register: Register) -> RegionId {
        self.registers[register.ordinal()]
    }

    /// The debug-session region, if a session is active.
    #[must_use]
    pub fn session(&self) -> Option<RegionId> {
        self.session
    }

    pub(crate) fn set_session(&mut self, session: Option<RegionId>) {
        self.session = session;
    }

    /// Shared access to the enclosing arena.
    #[must_use]
    pub fn arena(&self) -> &VmArena {
        &self.arena
    }

    /// Exclusive access to the enclosing arena.
    pub fn arena_mut(&mut self) -> &mut VmArena {
        &mut self.arena
    }

    /// Append a record to a register.
    ///
    /// # Errors
    /// `E002` on register capacity exhaustion.
    pub fn push(&mut self, register: Register, record: &Record) -> Result<()> {
        let id = self.region(register);
        self.arena.push_record(id, record)
    }

    /// Decode all records of a register.
    ///
    /// # Errors
    /// `E004` if the register's contents do not scan.
    pub fn records(&self, register: Register) -> Result<Vec<Record>> {
        self.arena.records(self.region(register))
    }

    /// A register's occupied size in bytes.
    #[must_use]
    pub fn used(&self, register: Register) -> usize {
        self.arena.used(self.region(register))
    }

    /// A register's occupied bytes.
    #[must_use]
    pub fn bytes(&self, register: Register) -> &[u8] {
        self.arena.bytes(self.region(register))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_carves_five_registers() {
        let vm = Vm::new(&VmConfig::default()).unwrap();
        for register in Register::ALL {
            assert_eq!(vm.used(register), 0);
            assert_eq!(
                vm.arena().region_capacity(vm.region(register)),
                DEFAULT_REGISTER_CAPACITY
            );
        }
        assert!(vm.session().is_none());
        assert_eq!(
            vm.arena().free_space(),
            DEFAULT_CAPACITY - 5 * DEFAULT_REGISTER_CAPACITY
        );
    }

    #[test]
    fn registers_are_disjoint() {
        let mut vm = Vm::new(&VmConfig::default()).unwrap();
        vm.push(Register::Stack, &Record::int(1)).unwrap();
        assert_eq!(vm.used(Register::Stack), Record::int(1).encoded_len());
        for register in [Register::Dump, Register::Input, Register::Env, Register::Control] {
            assert_eq!(vm.used(register), 0);
        }
    }

    #[test]
    fn config_validation() {
        let config = VmConfig::default()
            .with_capacity(100)
            .with_register_capacity(64);
        assert_eq!(Vm::new(&config).unwrap_err().code(), "E101");

        let config = VmConfig::default().with_register_capacity(0);
        assert_eq!(config.validate().unwrap_err().code(), "E101");
    }

    #[test]
    fn config_from_json() {
        let config =
            VmConfig::from_json(r#"{"capacity": 32768, "register_capacity": 2048}"#).unwrap();
        assert_eq!(config.capacity, 32768);
        assert_eq!(config.register_capacity, 2048);

        assert_eq!(VmConfig::from_json("not json").unwrap_err().code(), "E101");
        let too_small = r#"{"capacity": 100, "register_capacity": 64}"#;
        assert_eq!(VmConfig::from_json(too_small).unwrap_err().code(), "E101");
    }
}
