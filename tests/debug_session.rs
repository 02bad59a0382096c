//! Integration tests for the debug-session subsystem.
//!
//! These exercise the full enter/debug/exit/abort lifecycle and the
//! ordinal accessors through the public API and the dispatch table.

use regvm::debug::{session, HOOK_END, HOOK_START};
use regvm::dispatch;
use regvm::prelude::*;

/// A VM with distinct content in every register.
///
/// Control's top record plays the role of the instruction that triggered
/// session entry.
fn populated_vm() -> Vm {
    let mut vm = Vm::new(&VmConfig::default()).unwrap();
    vm.push(Register::Dump, &Record::int(10)).unwrap();
    vm.push(Register::Dump, &Record::string("outer state")).unwrap();
    vm.push(Register::Input, &Record::string("/pending")).unwrap();
    vm.push(Register::Env, &Record::string("binding")).unwrap();
    vm.push(Register::Env, &Record::int(1)).unwrap();
    vm.push(Register::Control, &Record::string("/caller")).unwrap();
    vm.push(Register::Control, &Record::string("/faulting-op")).unwrap();
    vm.push(Register::Stack, &Record::int(1)).unwrap();
    vm.push(Register::Stack, &Record::int(2)).unwrap();
    vm.push(Register::Stack, &Record::int(3)).unwrap();
    vm
}

fn strings(records: &[Record]) -> Vec<Option<&str>> {
    records.iter().map(Record::as_str).collect()
}

#[test]
fn debug_exit_round_trip_restores_registers() {
    let mut vm = populated_vm();
    let dump = vm.bytes(Register::Dump).to_vec();
    let input = vm.bytes(Register::Input).to_vec();
    let env = vm.bytes(Register::Env).to_vec();
    let stack = vm.bytes(Register::Stack).to_vec();

    session::debug(&mut vm).unwrap();
    assert!(vm.session().is_some());

    // During the session the live registers are cleared, except Control
    // which holds the start hook and the discard placeholder.
    assert_eq!(vm.used(Register::Dump), 0);
    assert_eq!(vm.used(Register::Input), 0);
    assert_eq!(vm.used(Register::Env), 0);
    assert_eq!(vm.used(Register::Stack), 0);
    let control = vm.records(Register::Control).unwrap();
    assert_eq!(strings(&control), vec![Some(HOOK_START), Some("")]);

    session::exit(&mut vm).unwrap();
    assert!(vm.session().is_none());

    assert_eq!(vm.bytes(Register::Dump), &dump[..]);
    assert_eq!(vm.bytes(Register::Input), &input[..]);
    assert_eq!(vm.bytes(Register::Env), &env[..]);
    assert_eq!(vm.bytes(Register::Stack), &stack[..]);

    // Control comes back minus the record that triggered entry, with the
    // end hook and placeholder on top.
    let control = vm.records(Register::Control).unwrap();
    assert_eq!(
        strings(&control),
        vec![Some("/caller"), Some(HOOK_END), Some("")]
    );
}

#[test]
fn session_region_holds_five_ordinal_ordered_records() {
    let mut vm = populated_vm();
    session::debug(&mut vm).unwrap();
    let session_region = vm.session().unwrap();

    assert_eq!(vm.arena().record_count(session_region), 5);
    let records = vm.arena().records(session_region).unwrap();

    // Ordinal 0: dump.
    let dump = records[0].children().unwrap();
    assert_eq!(dump[0].as_int(), Some(10));
    assert_eq!(dump[1].as_str(), Some("outer state"));
    // Ordinal 1: input.
    let input = records[1].children().unwrap();
    assert_eq!(input[0].as_str(), Some("/pending"));
    // Ordinal 2: env.
    let env = records[2].children().unwrap();
    assert_eq!(env[0].as_str(), Some("binding"));
    assert_eq!(env[1].as_int(), Some(1));
    // Ordinal 3: control, minus the instruction that triggered entry.
    let control = records[3].children().unwrap();
    assert_eq!(strings(&control), vec![Some("/caller")]);
    // Ordinal 4: the whole stack, for explicit entry.
    let stack = records[4].children().unwrap();
    let values: Vec<_> = stack.iter().map(Record::as_int).collect();
    assert_eq!(values, vec![Some(1), Some(2), Some(3)]);
}

#[test]
fn get_returns_the_register_mapped_to_each_ordinal() {
    let mut vm = populated_vm();
    session::debug(&mut vm).unwrap();
    let session_region = vm.session().unwrap();
    let expected = vm.arena().records(session_region).unwrap();

    for (ordinal, address) in [
        (0, "/db/get/_d"),
        (1, "/db/get/_i"),
        (2, "/db/get/_e"),
        (3, "/db/get/_c"),
        (4, "/db/get/_s"),
    ] {
        dispatch::dispatch(address, &mut vm).unwrap();
        let stack = vm.records(Register::Stack).unwrap();
        assert_eq!(stack.last().unwrap(), &expected[ordinal], "{address}");
    }
}

#[test]
fn enter_prunes_the_stack_to_the_fault_value() {
    let mut vm = populated_vm();
    session::enter(&mut vm).unwrap();
    let session_region = vm.session().unwrap();

    // The live stack holds one collapsed record with everything below
    // the fault value.
    let live = vm.records(Register::Stack).unwrap();
    assert_eq!(live.len(), 1);
    let rest = live[0].children().unwrap();
    let values: Vec<_> = rest.iter().map(Record::as_int).collect();
    assert_eq!(values, vec![Some(1), Some(2)]);

    // Ordinal 4 holds the fault value alone.
    let records = vm.arena().records(session_region).unwrap();
    let relocated = records[4].children().unwrap();
    assert_eq!(relocated.len(), 1);
    assert_eq!(relocated[0].as_int(), Some(3));
}

#[test]
fn enter_exit_restores_the_fault_value_to_the_stack() {
    let mut vm = populated_vm();
    session::enter(&mut vm).unwrap();
    // Clear the collapsed remainder, as a client inspecting the fault
    // typically would before resuming.
    let stack = vm.region(Register::Stack);
    vm.arena_mut().clear(stack);

    session::exit(&mut vm).unwrap();
    let records = vm.records(Register::Stack).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].as_int(), Some(3));
}

#[test]
fn set_overwrites_and_get_reads_it_back() {
    let mut vm = populated_vm();
    session::debug(&mut vm).unwrap();

    let replacement = Record::string("patched");
    vm.push(Register::Stack, &replacement).unwrap();
    // The set-side table binds `_i` to ordinal 3, which `_c` reads back.
    dispatch::dispatch("/db/set/_i", &mut vm).unwrap();
    assert_eq!(vm.used(Register::Stack), 0);

    dispatch::dispatch("/db/get/_c", &mut vm).unwrap();
    let stack = vm.records(Register::Stack).unwrap();
    assert_eq!(stack.last().unwrap(), &replacement);
}

#[test]
fn set_table_is_not_the_mirror_of_get() {
    let mut vm = populated_vm();
    session::debug(&mut vm).unwrap();
    let session_region = vm.session().unwrap();
    let before = vm.arena().records(session_region).unwrap();

    // `/db/set/_s` writes ordinal 0, the slot `/db/get/_d` reads.
    let replacement = Record::int(-1);
    vm.push(Register::Stack, &replacement).unwrap();
    dispatch::dispatch("/db/set/_s", &mut vm).unwrap();

    let after = vm.arena().records(session_region).unwrap();
    assert_eq!(after[0], replacement);
    // All other ordinals are untouched.
    assert_eq!(&after[1..], &before[1..]);
}

#[test]
fn abort_discards_without_restoring() {
    let mut vm = populated_vm();
    let free_before = vm.arena().free_space();
    session::enter(&mut vm).unwrap();

    let control_in_session = vm.bytes(Register::Control).to_vec();
    let stack_in_session = vm.bytes(Register::Stack).to_vec();

    session::abort(&mut vm).unwrap();
    assert!(vm.session().is_none());
    assert_eq!(vm.arena().free_space(), free_before);

    // The registers stay exactly as entry left them.
    assert_eq!(vm.used(Register::Dump), 0);
    assert_eq!(vm.used(Register::Input), 0);
    assert_eq!(vm.used(Register::Env), 0);
    assert_eq!(vm.bytes(Register::Control), &control_in_session[..]);
    assert_eq!(vm.bytes(Register::Stack), &stack_in_session[..]);
}

#[test]
fn admission_refusal_is_a_complete_noop() {
    // Carve registers so large that the remaining free space cannot host
    // a session for the occupied registers.
    let config = VmConfig::default()
        .with_capacity(5 * 128 + 32)
        .with_register_capacity(128);
    let mut vm = Vm::new(&config).unwrap();
    vm.push(Register::Stack, &Record::blob(vec![7u8; 16])).unwrap();
    vm.push(Register::Control, &Record::string("/faulting-op")).unwrap();

    let snapshots: Vec<Vec<u8>> = Register::ALL
        .iter()
        .map(|r| vm.bytes(*r).to_vec())
        .collect();
    let free_before = vm.arena().free_space();

    dispatch::dispatch("/db/enter", &mut vm).unwrap();

    assert!(vm.session().is_none());
    assert_eq!(vm.arena().free_space(), free_before);
    for (register, snapshot) in Register::ALL.iter().zip(&snapshots) {
        assert_eq!(vm.bytes(*register), &snapshot[..], "{register}");
    }
}

#[test]
fn sessions_do_not_persist_across_entries() {
    let mut vm = populated_vm();
    session::debug(&mut vm).unwrap();
    session::exit(&mut vm).unwrap();

    // A fresh session sees the restored registers, not stale relocations.
    session::debug(&mut vm).unwrap();
    let session_region = vm.session().unwrap();
    let records = vm.arena().records(session_region).unwrap();
    assert_eq!(records.len(), 5);
    let stack = records[4].children().unwrap();
    let values: Vec<_> = stack.iter().map(Record::as_int).collect();
    assert_eq!(values, vec![Some(1), Some(2), Some(3)]);
    session::exit(&mut vm).unwrap();
}
