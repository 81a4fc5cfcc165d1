use super::*;

#[test]
fn restores_the_saved_stack_pointer() {
    // The callee pushes garbage that `ret` must discard.
    let vm = test_halts(vec![
        instr_i64(Opcode::PUSH, 0),
        instr_u64(Opcode::CALL, 3),
        instr(Opcode::HALT),
        // callee:
        instr_i64(Opcode::PUSH, 1),
        instr_i64(Opcode::PUSH, 2),
        instr(Opcode::RET),
    ]);

    // Marker 0 leaves the marker cell itself on the caller's stack.
    assert_eq!(1, vm.sp());
}

#[test]
fn corrupted_save_slot_overflows() {
    // `store 5` into the save slot is legal but a foot-gun; `ret` must
    // still keep sp within bounds.
    test_faults(
        vec![
            instr_i64(Opcode::PUSH, 2000),
            instr_u64(Opcode::STORE, 5),
            instr(Opcode::RET),
        ],
        Fault::StackOverflow,
    );
}

#[test]
fn bad_return_address_faults_at_fetch() {
    test_faults(
        vec![
            instr_i64(Opcode::PUSH, 99),
            instr_u64(Opcode::STORE, 6),
            instr(Opcode::RET),
        ],
        Fault::InvalidOperand,
    );
}
