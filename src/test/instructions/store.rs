use super::*;

#[test]
fn works() {
    let vm = test_halts(vec![
        instr_i64(Opcode::PUSH, 13),
        instr_u64(Opcode::STORE, 2),
        instr(Opcode::HALT),
    ]);

    assert_eq!(0, vm.sp());
    assert_eq!(13, vm.register(2).as_i64());
}

#[test]
fn overwriting_the_return_slot_is_legal() {
    let vm = test_halts(vec![
        instr_i64(Opcode::PUSH, 13),
        instr_u64(Opcode::STORE, 6),
        instr(Opcode::HALT),
    ]);

    assert_eq!(13, vm.register(6).as_i64());
}

#[test]
fn register_out_of_range() {
    test_faults(
        vec![instr_i64(Opcode::PUSH, 13), instr_u64(Opcode::STORE, 7)],
        Fault::InvalidOperand,
    );
}

#[test]
fn underflows_on_an_empty_stack() {
    test_faults(vec![instr_u64(Opcode::STORE, 0)], Fault::StackUnderflow);
}
