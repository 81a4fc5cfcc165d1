use super::*;

fn branch_program(a: f64, b: f64) -> Vec<Instruction> {
    vec![
        instr_f64(Opcode::PUSH, a),
        instr_f64(Opcode::PUSH, b),
        instr_u64(Opcode::FJLT, 5),
        instr_i64(Opcode::PUSH, -1),
        instr(Opcode::HALT),
        instr_i64(Opcode::PUSH, 1),
        instr(Opcode::HALT),
    ]
}

#[test]
fn taken_when_first_operand_is_less() {
    let vm = test_halts(branch_program(-2.0, 1.5));

    assert_eq!(1, vm.stack()[0].as_i64());
}

#[test]
fn nan_comparison_is_not_taken() {
    let vm = test_halts(branch_program(std::f64::NAN, 1.5));

    assert_eq!(-1, vm.stack()[0].as_i64());
}
