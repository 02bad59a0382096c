//! The debug-session subsystem.
//!
//! A debug session relocates the five registers, by value, into a
//! bounded session region carved from the enclosing arena under the
//! reserved `/db` path. While the session is active, ordinal-addressed
//! accessors read and overwrite the relocated registers; exit restores
//! them and abort discards them.
//!
//! # Addresses
//!
//! | Address | Operation |
//! |---|---|
//! | `/db/enter` | fault-triggered entry |
//! | `/db/debug` | explicit entry |
//! | `/db/exit` | exit (restore) |
//! | `/db/abort` | abort (discard) |
//! | `/db/get/_d` `_i` `_e` `_c` `_s` | get ordinal 0, 1, 2, 3, 4 |
//! | `/db/set/_s` `_c` `_e` `_i` `_d` | set ordinal 0, 1, 2, 3, 4 |
//!
//! On entry the `/!/db/start` hook address is pushed into Control; on
//! exit, `/!/db/end`. Client layers react to these; this subsystem does
//! not interpret them.

pub mod accessors;
pub mod admission;
pub mod session;

use crate::dispatch::Registry;
use crate::error::Result;
use crate::types::Register;
use crate::vm::Vm;

/// Reserved path of the session region.
pub const SESSION_PATH: &str = "/db";

/// Hook address pushed into Control on session entry.
pub const HOOK_START: &str = "/!/db/start";

/// Hook address pushed into Control on session exit.
pub const HOOK_END: &str = "/!/db/end";

fn op_enter(vm: &mut Vm) -> Result<()> {
    session::enter(vm)
}

fn op_debug(vm: &mut Vm) -> Result<()> {
    session::debug(vm)
}

fn op_exit(vm: &mut Vm) -> Result<()> {
    session::exit(vm)
}

fn op_abort(vm: &mut Vm) -> Result<()> {
    session::abort(vm)
}

fn op_get_dump(vm: &mut Vm) -> Result<()> {
    accessors::get(vm, Register::Dump.ordinal())
}

fn op_get_input(vm: &mut Vm) -> Result<()> {
    accessors::get(vm, Register::Input.ordinal())
}

fn op_get_env(vm: &mut Vm) -> Result<()> {
    accessors::get(vm, Register::Env.ordinal())
}

fn op_get_control(vm: &mut Vm) -> Result<()> {
    accessors::get(vm, Register::Control.ordinal())
}

fn op_get_stack(vm: &mut Vm) -> Result<()> {
    accessors::get(vm, Register::Stack.ordinal())
}

// The set-side ordinals are not the mirror of the get side. Deployed
// clients depend on this table as-is; changing it needs product
// sign-off.
fn op_set_input(vm: &mut Vm) -> Result<()> {
    accessors::set(vm, 3)
}

fn op_set_stack(vm: &mut Vm) -> Result<()> {
    accessors::set(vm, 0)
}

fn op_set_env(vm: &mut Vm) -> Result<()> {
    accessors::set(vm, 2)
}

fn op_set_control(vm: &mut Vm) -> Result<()> {
    accessors::set(vm, 1)
}

fn op_set_dump(vm: &mut Vm) -> Result<()> {
    accessors::set(vm, 4)
}

/// Install the debug-session operation table into a registry.
pub fn register_ops(registry: &mut Registry) {
    registry.register("/db/enter", op_enter);
    registry.register("/db/debug", op_debug);
    registry.register("/db/exit", op_exit);
    registry.register("/db/abort", op_abort);

    registry.register("/db/get/_i", op_get_input);
    registry.register("/db/get/_s", op_get_stack);
    registry.register("/db/get/_e", op_get_env);
    registry.register("/db/get/_c", op_get_control);
    registry.register("/db/get/_d", op_get_dump);

    registry.register("/db/set/_i", op_set_input);
    registry.register("/db/set/_s", op_set_stack);
    registry.register("/db/set/_e", op_set_env);
    registry.register("/db/set/_c", op_set_control);
    registry.register("/db/set/_d", op_set_dump);
}
