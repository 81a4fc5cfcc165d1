use super::*;

#[test]
fn works() {
    let vm = test_halts(vec![
        instr_f64(Opcode::PUSH, 1.5),
        instr_f64(Opcode::PUSH, 2.25),
        instr(Opcode::FADD),
        instr(Opcode::HALT),
    ]);

    assert_eq!(1, vm.sp());
    assert_eq!(3.75, vm.stack()[0].as_f64());
}
