use super::*;

#[test]
fn registers_start_zeroed() {
    let vm = test_halts(vec![instr_u64(Opcode::LOAD, 3), instr(Opcode::HALT)]);

    assert_eq!(0, vm.stack()[0].as_u64());
}

#[test]
fn pushes_a_stored_value() {
    let vm = test_halts(vec![
        instr_i64(Opcode::PUSH, -9),
        instr_u64(Opcode::STORE, 4),
        instr_u64(Opcode::LOAD, 4),
        instr(Opcode::HALT),
    ]);

    assert_eq!(-9, vm.stack()[0].as_i64());
}

#[test]
fn register_out_of_range() {
    test_faults(vec![instr_u64(Opcode::LOAD, 7)], Fault::InvalidOperand);
}
