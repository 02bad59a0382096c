//! Ordinal-addressed access into the session region.
//!
//! The session region holds five records, one per register, ordered by
//! ascending ordinal. Both accessors locate the target by linear offset
//! accumulation from the region's start; an out-of-range ordinal or a
//! corrupt offset is a bounds violation treated as a no-op, never as an
//! unchecked read.

use crate::error::{Result, VmError};
use crate::types::Register;
use crate::vm::Vm;

/// Copy the `ordinal`-th session record onto the top of the live Stack.
///
/// The session record is not removed. A no-op when no session is active
/// or the ordinal does not resolve to a record.
///
/// # Errors
/// `E002` if the Stack cannot hold the copy.
pub fn get(vm: &mut Vm, ordinal: usize) -> Result<()> {
    let Some(session) = vm.session() else {
        tracing::warn!(ordinal, "get outside a debug session");
        return Ok(());
    };
    let Some(range) = vm.arena().record_range(session, ordinal) else {
        tracing::warn!(ordinal, "get refused: ordinal out of bounds");
        return Ok(());
    };
    let bytes = vm.arena().bytes(session)[range].to_vec();
    let stack = vm.region(Register::Stack);
    vm.arena_mut().push_encoded(stack, &bytes)
}

/// Overwrite the `ordinal`-th session record with the record on top of
/// the live Stack.
///
/// The Stack's top record is consumed; the previous session record at
/// that ordinal is discarded. A pure overwrite, never a merge. A no-op
/// when no session is active, the ordinal does not resolve, the Stack is
/// empty, or the replacement would overflow the session region's fixed
/// capacity.
///
/// # Errors
/// Corruption detected by the primitive layer is propagated.
pub fn set(vm: &mut Vm, ordinal: usize) -> Result<()> {
    let Some(session) = vm.session() else {
        tracing::warn!(ordinal, "set outside a debug session");
        return Ok(());
    };
    let Some(range) = vm.arena().record_range(session, ordinal) else {
        tracing::warn!(ordinal, "set refused: ordinal out of bounds");
        return Ok(());
    };
    let stack = vm.region(Register::Stack);
    let Some(top) = vm.arena().top_range(stack) else {
        tracing::warn!(ordinal, "set refused: stack is empty");
        return Ok(());
    };
    let replacement = vm.arena().bytes(stack)[top.clone()].to_vec();
    match vm.arena_mut().replace_record(session, range, &replacement) {
        Ok(()) => {
            vm.arena_mut().truncate(stack, top.start);
            Ok(())
        }
        // The session region's capacity is fixed at entry; an overwrite
        // that does not fit is refused, leaving both sides untouched.
        Err(VmError::RegionCapacity { requested, available, .. }) => {
            tracing::warn!(ordinal, requested, available, "set refused: session region full");
            Ok(())
        }
        Err(err) => Err(err),
    }
}
