//! Session lifecycle: enter / debug / exit / abort.
//!
//! Entry relocates the five registers by value into a freshly carved
//! session region, in ordinal order; exit restores them and releases the
//! region; abort releases the region without restoring anything.

use super::{admission, HOOK_END, HOOK_START, SESSION_PATH};
use crate::error::Result;
use crate::record::{Record, HEADER_LEN};
use crate::types::Register;
use crate::vm::Vm;

/// Fault-triggered session entry.
///
/// The top of Control (the instruction that triggered entry) is
/// discarded before relocation, so the instruction that invoked it is
/// what exit resumes. The Stack is pruned: the fault value on top is
/// relocated alone as ordinal 4 and the collapsed remainder stays on the
/// live Stack.
///
/// Refusal by the admission controller is a silent no-op.
///
/// # Errors
/// Capacity exhaustion from the primitive layer is propagated.
pub fn enter(vm: &mut Vm) -> Result<()> {
    relocate(vm, true)
}

/// Explicit user-invoked session entry.
///
/// Identical to [`enter`] except the Stack is relocated wholesale as
/// ordinal 4, preserving its full content for inspection.
///
/// # Errors
/// Capacity exhaustion from the primitive layer is propagated.
pub fn debug(vm: &mut Vm) -> Result<()> {
    relocate(vm, false)
}

fn relocate(vm: &mut Vm, prune_stack: bool) -> Result<()> {
    if vm.session().is_some() {
        // Nesting a session inside an active one is unsupported.
        tracing::warn!("session entry refused: session already active");
        return Ok(());
    }

    // Each register relocates as one bundle record, so its share of the
    // session region is its occupancy plus one record header.
    let occupied: usize = Register::ALL
        .iter()
        .map(|register| HEADER_LEN + vm.used(*register))
        .sum();
    let freespace = vm.arena().free_space();
    let Some(capacity) = admission::session_capacity(occupied, freespace) else {
        tracing::debug!(occupied, freespace, "session entry refused by admission control");
        return Ok(());
    };

    let session = vm.arena_mut().carve(SESSION_PATH, capacity)?;
    vm.set_session(Some(session));
    tracing::debug!(capacity, prune_stack, "debug session entered");

    // Ordinals 0..2: dump, input, env.
    for register in [Register::Dump, Register::Input, Register::Env] {
        let src = vm.region(register);
        vm.arena_mut().copy_as_bundle(src, session)?;
        vm.arena_mut().clear(src);
    }

    // Ordinal 3: control. Its top record is the instruction that brought
    // us here; discard it so that what remains on top is the instruction
    // that invoked it.
    let control = vm.region(Register::Control);
    vm.arena_mut().drop_top(control);
    vm.arena_mut().copy_as_bundle(control, session)?;
    vm.arena_mut().clear(control);
    push_hooks(vm, HOOK_START)?;

    // Ordinal 4: stack.
    let stack = vm.region(Register::Stack);
    if prune_stack {
        // Collapse to one bundle, split the fault value back out on top,
        // and relocate it alone; the collapsed remainder stays live.
        vm.arena_mut().collapse_all(stack)?;
        vm.arena_mut().split_top_bundle(stack)?;
        vm.arena_mut().move_top_as_bundle(stack, session)?;
    } else {
        vm.arena_mut().copy_as_bundle(stack, session)?;
        vm.arena_mut().clear(stack);
    }
    Ok(())
}

/// Session exit: restore the five registers and destroy the session
/// region.
///
/// Control receives the session-end hook before Env/Input/Dump are
/// restored, so the hook is the next instruction once the session fully
/// unwinds. A no-op when no session is active.
///
/// # Errors
/// Capacity exhaustion or a corrupt session region is propagated.
pub fn exit(vm: &mut Vm) -> Result<()> {
    let Some(session) = vm.session() else {
        tracing::warn!("session exit with no active session");
        return Ok(());
    };

    // Restoration pops the session region top-down, which is descending
    // ordinal order: stack (4), control (3), then env, input, dump.
    let stack = vm.region(Register::Stack);
    vm.arena_mut().restore_from_top(session, stack)?;

    let control = vm.region(Register::Control);
    vm.arena_mut().restore_from_top(session, control)?;
    push_hooks(vm, HOOK_END)?;

    for register in [Register::Env, Register::Input, Register::Dump] {
        let dst = vm.region(register);
        vm.arena_mut().restore_from_top(session, dst)?;
    }

    vm.arena_mut().release(session)?;
    vm.set_session(None);
    tracing::debug!("debug session exited");
    Ok(())
}

/// Session abort: destroy the session region without restoring any
/// register.
///
/// The registers remain exactly as entry left them. A no-op when no
/// session is active.
///
/// # Errors
/// `E005` if the session region is not the arena's tail region.
pub fn abort(vm: &mut Vm) -> Result<()> {
    let Some(session) = vm.session() else {
        tracing::warn!("session abort with no active session");
        return Ok(());
    };
    vm.arena_mut().release(session)?;
    vm.set_session(None);
    tracing::debug!("debug session aborted");
    Ok(())
}

/// Push a hook address onto Control followed by the placeholder record
/// the host dispatcher expects to discard after an operation.
fn push_hooks(vm: &mut Vm, hook: &str) -> Result<()> {
    vm.push(Register::Control, &Record::string(hook))?;
    vm.push(Register::Control, &Record::string(""))
}
