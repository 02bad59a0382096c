//! Admission control for debug-session entry.
//!
//! The enclosing arena is fixed and non-growable, so a session may only
//! be admitted when the free space can host a region large enough to
//! hold relocated copies of all five registers without starving the
//! rest of the VM.

/// Compute the capacity of the session region, or refuse.
///
/// `occupied` is the total relocated size of the five registers: each
/// register becomes one bundle record in the session region, so its
/// contribution is its occupied bytes plus one record header. `freespace`
/// is the enclosing arena's uncarved byte count.
///
/// Returns `None` when `occupied >= freespace`; the caller treats that
/// as a silent no-op, not an error. Otherwise the capacity is doubled
/// occupancy when the free space affords it, and whatever remains after
/// the registers' occupancy when it does not.
#[must_use]
pub fn session_capacity(occupied: usize, freespace: usize) -> Option<usize> {
    if occupied >= freespace {
        // Not enough memory for the debugger.
        return None;
    }
    if occupied * 2 <= freespace {
        Some(occupied * 2)
    } else {
        Some(freespace - occupied)
    }
}
