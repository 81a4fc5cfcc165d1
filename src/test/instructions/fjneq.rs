use super::*;

fn branch_program(a: f64, b: f64) -> Vec<Instruction> {
    vec![
        instr_f64(Opcode::PUSH, a),
        instr_f64(Opcode::PUSH, b),
        instr_u64(Opcode::FJNEQ, 5),
        instr_i64(Opcode::PUSH, -1),
        instr(Opcode::HALT),
        instr_i64(Opcode::PUSH, 1),
        instr(Opcode::HALT),
    ]
}

#[test]
fn taken() {
    let vm = test_halts(branch_program(0.5, 0.25));

    assert_eq!(1, vm.stack()[0].as_i64());
}

#[test]
fn nan_is_always_unequal() {
    let vm = test_halts(branch_program(std::f64::NAN, std::f64::NAN));

    assert_eq!(1, vm.stack()[0].as_i64());
}
