use spill_vm::prelude::*;

fn engine_with(insns: &[Instruction]) -> Engine {
    let mut engine = Engine::new(Config::default());
    engine.load_code(insns).expect("load");
    engine.start(0).expect("start");
    engine
}

#[test]
fn conditional_branches_route_around_dead_code() {
    // t0 = 0
    // if t0 == 0 jump 4
    // t1 = 999
    // jump 5
    // t1 = 42
    // t2 = 100
    let mut engine = engine_with(&[
        op::assign(Operand::temp(0), Operand::int(0)),
        op::jump_if_zero(Operand::temp(0), 4),
        op::assign(Operand::temp(1), Operand::int(999)),
        op::jump(5),
        op::assign(Operand::temp(1), Operand::int(42)),
        op::assign(Operand::temp(2), Operand::int(100)),
    ]);
    engine.run(0).expect("run");

    assert_eq!(engine.state(), ExecState::Halted);
    assert_eq!(engine.temporary(1).expect("t1"), Value::Int(42));
    assert_eq!(engine.temporary(2).expect("t2"), Value::Int(100));
}

#[test]
fn jump_if_nonzero_takes_the_branch() {
    let mut engine = engine_with(&[
        op::assign(Operand::temp(0), Operand::int(7)),
        op::jump_if_nonzero(Operand::temp(0), 3),
        op::assign(Operand::temp(1), Operand::int(1)),
        op::assign(Operand::temp(2), Operand::int(2)),
    ]);
    engine.run(0).expect("run");

    assert_eq!(engine.temporary(1).expect("t1"), Value::None);
    assert_eq!(engine.temporary(2).expect("t2"), Value::Int(2));
}

#[test]
fn call_and_return_resume_after_the_call_site() {
    // 0: call 3
    // 1: t1 = 1
    // 2: halt
    // 3: t0 = 7
    // 4: return
    let mut engine = engine_with(&[
        op::call(3),
        op::assign(Operand::temp(1), Operand::int(1)),
        op::halt(),
        op::assign(Operand::temp(0), Operand::int(7)),
        op::ret(),
    ]);
    engine.run(0).expect("run");

    assert_eq!(engine.state(), ExecState::Halted);
    assert_eq!(engine.temporary(0).expect("t0"), Value::Int(7));
    assert_eq!(engine.temporary(1).expect("t1"), Value::Int(1));
    assert_eq!(engine.call_depth(), 0);
}

#[test]
fn return_on_an_empty_stack_underflows() {
    let mut engine = engine_with(&[op::ret()]);
    assert_eq!(
        engine.step(),
        Err(EngineError::Trap(TrapReason::StackUnderflow))
    );
    assert_eq!(engine.state(), ExecState::Error);
}

#[test]
fn recursion_past_the_depth_limit_overflows() {
    let config = Config {
        max_call_depth: 4,
        ..Config::default()
    };
    let mut engine = Engine::new(config);
    engine.load_code(&[op::call(0)]).expect("load");
    engine.start(0).expect("start");

    assert_eq!(
        engine.run(0),
        Err(EngineError::Trap(TrapReason::StackOverflow))
    );
    assert_eq!(engine.state(), ExecState::Error);
    assert_eq!(engine.call_depth(), 4);
}

#[test]
fn jump_targets_are_range_checked() {
    let mut engine = engine_with(&[op::jump(9)]);
    assert_eq!(
        engine.run(0),
        Err(EngineError::Trap(TrapReason::InvalidAddress))
    );
    assert_eq!(engine.state(), ExecState::Error);
}

#[test]
fn branch_on_a_non_integer_condition_is_a_type_mismatch() {
    let mut engine = engine_with(&[op::jump_if_zero(Operand::float(0.0), 0)]);
    assert_eq!(
        engine.run(0),
        Err(EngineError::Trap(TrapReason::TypeMismatch))
    );
}

#[test]
fn running_off_the_end_is_a_normal_halt() {
    let mut engine = engine_with(&[
        op::assign(Operand::temp(0), Operand::int(1)),
        op::assign(Operand::temp(1), Operand::int(2)),
    ]);
    engine.run(0).expect("run");

    assert_eq!(engine.state(), ExecState::Halted);
    assert_eq!(engine.step_count(), 2);
}

#[test]
fn return_to_one_past_the_end_halts_normally() {
    // The call is the last instruction, so its frame saves pc 3, one past
    // the end; the return lands there and execution halts normally.
    let mut engine = engine_with(&[op::jump(2), op::ret(), op::call(1)]);
    engine.run(0).expect("run");
    assert_eq!(engine.state(), ExecState::Halted);
    assert_eq!(engine.step_count(), 3);
}
