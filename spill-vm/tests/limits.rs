use spill_vm::prelude::*;

fn four_assigns() -> Vec<Instruction> {
    (0..4)
        .map(|i| op::assign(Operand::temp(i), Operand::int(i as i32)))
        .collect()
}

#[test]
fn the_step_limit_pauses_execution() {
    let config = Config {
        max_steps: 3,
        ..Config::default()
    };
    let mut engine = Engine::new(config);
    engine.load_code(&four_assigns()).expect("load");
    engine.start(0).expect("start");

    assert_eq!(
        engine.run(0),
        Err(EngineError::StepLimitExceeded { steps: 3 })
    );
    assert_eq!(engine.step_count(), 3);
    assert_eq!(engine.state(), ExecState::Paused);
}

#[test]
fn a_paused_engine_resumes_where_it_left_off() {
    let config = Config {
        max_steps: 3,
        ..Config::default()
    };
    let mut engine = Engine::new(config);
    engine.load_code(&four_assigns()).expect("load");
    engine.start(0).expect("start");

    assert!(engine.run(0).is_err());
    engine.run(0).expect("resume to completion");
    assert_eq!(engine.state(), ExecState::Halted);
    assert_eq!(engine.step_count(), 4);
    assert_eq!(engine.temporary(3).expect("t3"), Value::Int(3));
}

#[test]
fn an_explicit_budget_overrides_max_steps() {
    let mut engine = Engine::new(Config::default());
    engine.load_code(&four_assigns()).expect("load");
    engine.start(0).expect("start");

    assert_eq!(
        engine.run(2),
        Err(EngineError::StepLimitExceeded { steps: 2 })
    );
    assert_eq!(engine.state(), ExecState::Paused);
    engine.run(2).expect("second budget finishes the program");
    assert_eq!(engine.state(), ExecState::Halted);
}

#[test]
fn single_stepping_honors_max_steps() {
    let config = Config {
        max_steps: 2,
        ..Config::default()
    };
    let mut engine = Engine::new(config);
    engine.load_code(&four_assigns()).expect("load");
    engine.start(0).expect("start");

    engine.step().expect("first step");
    // The instruction that reaches the limit still executes, then pauses.
    assert_eq!(
        engine.step(),
        Err(EngineError::StepLimitExceeded { steps: 2 })
    );
    assert_eq!(engine.state(), ExecState::Paused);
    assert_eq!(engine.temporary(1).expect("t1"), Value::Int(1));

    // Resuming opens another max_steps window.
    engine.step().expect("resume");
    assert_eq!(engine.step_count(), 3);
    assert_eq!(engine.state(), ExecState::Running);
}

#[test]
fn a_limit_spent_on_the_last_instruction_still_halts() {
    let config = Config {
        max_steps: 4,
        ..Config::default()
    };
    let mut engine = Engine::new(config);
    engine.load_code(&four_assigns()).expect("load");
    engine.start(0).expect("start");

    // The limit lands exactly on the final instruction; with nothing left
    // to fetch the engine halts instead of pausing one fetch short.
    engine.run(0).expect("run");
    assert_eq!(engine.state(), ExecState::Halted);
    assert_eq!(engine.step_count(), 4);
}

#[test]
fn load_code_refuses_a_mid_execution_engine() {
    let mut engine = Engine::new(Config::default());
    engine.load_code(&four_assigns()).expect("load");
    engine.start(0).expect("start");
    assert!(engine.run(1).is_err());

    assert_eq!(engine.load_code(&four_assigns()), Err(EngineError::Busy));

    engine.stop().expect("stop");
    engine.load_code(&four_assigns()).expect("reload after stop");
}

#[test]
fn the_state_machine_rejects_out_of_order_operations() {
    let mut engine = Engine::new(Config::default());

    assert_eq!(
        engine.start(0),
        Err(EngineError::NotReady(ExecState::Created))
    );
    assert_eq!(engine.step(), Err(EngineError::NotReady(ExecState::Created)));
    assert_eq!(engine.reset(), Err(EngineError::NotReady(ExecState::Created)));
    assert_eq!(engine.load_code(&[]), Err(EngineError::InvalidParam));

    engine.load_code(&four_assigns()).expect("load");
    assert_eq!(engine.run(0), Err(EngineError::NotReady(ExecState::Loaded)));
    assert_eq!(
        engine.start(99),
        Err(EngineError::Trap(TrapReason::InvalidAddress))
    );
    // A rejected start leaves the engine startable.
    engine.start(0).expect("start");
    engine.run(0).expect("run");

    assert_eq!(engine.state(), ExecState::Halted);
    assert_eq!(engine.step(), Err(EngineError::NotReady(ExecState::Halted)));
    assert_eq!(engine.stop(), Err(EngineError::NotReady(ExecState::Halted)));
}

#[test]
fn an_errored_engine_refuses_to_execute_until_reset() {
    let mut engine = Engine::new(Config::default());
    engine.load_code(&[op::ret()]).expect("load");
    engine.start(0).expect("start");
    assert!(engine.step().is_err());
    assert_eq!(engine.state(), ExecState::Error);

    assert_eq!(engine.step(), Err(EngineError::NotReady(ExecState::Error)));
    assert_eq!(engine.run(0), Err(EngineError::NotReady(ExecState::Error)));
    // Observers and loading stay available.
    assert_eq!(engine.step_count(), 0);
    engine.load_code(&four_assigns()).expect("load over error");

    engine.reset().expect("reset");
    assert_eq!(engine.state(), ExecState::Loaded);
    engine.start(0).expect("start");
    engine.run(0).expect("run");
    assert_eq!(engine.state(), ExecState::Halted);
}

#[test]
fn reset_clears_the_storage_files() {
    let mut engine = Engine::new(Config::default());
    engine.load_code(&four_assigns()).expect("load");
    engine.set_variable(0, Value::Int(9)).expect("set var");
    engine.start(0).expect("start");
    engine.run(0).expect("run");
    assert_eq!(engine.temporary(0).expect("t0"), Value::Int(0));

    engine.reset().expect("reset");
    assert_eq!(engine.step_count(), 0);
    assert_eq!(engine.temporary(0).expect("t0"), Value::None);
    assert_eq!(engine.variable(0).expect("v0"), Value::None);
}

#[test]
fn storage_access_is_bounds_checked_in_any_state() {
    let mut engine = Engine::new(Config {
        max_temporaries: 4,
        max_variables: 2,
        ..Config::default()
    });
    assert_eq!(
        engine.temporary(4),
        Err(EngineError::Trap(TrapReason::InvalidOperand))
    );
    assert_eq!(
        engine.set_variable(2, Value::Int(1)),
        Err(EngineError::Trap(TrapReason::InvalidOperand))
    );
    // Misuse of the accessors never poisons the state machine.
    assert_eq!(engine.state(), ExecState::Created);

    engine.set_temporary(3, Value::Uint(5)).expect("set");
    assert_eq!(engine.temporary(3).expect("get"), Value::Uint(5));
}

#[test]
fn out_of_range_operands_trap_during_execution() {
    let mut engine = Engine::new(Config {
        max_temporaries: 2,
        ..Config::default()
    });
    engine
        .load_code(&[op::assign(Operand::temp(2), Operand::int(1))])
        .expect("load");
    engine.start(0).expect("start");
    assert_eq!(
        engine.run(0),
        Err(EngineError::Trap(TrapReason::InvalidOperand))
    );
    assert_eq!(engine.state(), ExecState::Error);
}

#[test]
fn identical_programs_produce_identical_runs_and_traces() {
    let program = [
        op::assign(Operand::temp(0), Operand::int(6)),
        op::mul(Operand::temp(1), Operand::temp(0), Operand::int(7)),
        op::eq(Operand::temp(2), Operand::temp(1), Operand::int(42)),
        op::halt(),
    ];
    let config = Config {
        tracing: true,
        ..Config::default()
    };

    let mut traces = Vec::new();
    let mut finals = Vec::new();
    for _ in 0..2 {
        let sink = VecSink::new();
        let mut engine = Engine::new(config.clone());
        engine.set_trace_sink(Box::new(sink.clone()));
        engine.load_code(&program).expect("load");
        engine.start(0).expect("start");
        engine.run(0).expect("run");

        traces.push(sink.records());
        finals.push((
            engine.temporary(0).expect("t0"),
            engine.temporary(1).expect("t1"),
            engine.temporary(2).expect("t2"),
        ));
    }

    assert_eq!(traces[0], traces[1]);
    assert_eq!(finals[0], finals[1]);
    assert_eq!(traces[0].len(), 4);
    assert_eq!(traces[0][1].result, Some(Value::Int(42)));
    assert_eq!(traces[0][3].opcode, Opcode::Halt);
}

#[test]
fn trace_points_fire_even_with_tracing_disabled() {
    let sink = VecSink::new();
    let mut engine = Engine::new(Config::default());
    engine.set_trace_sink(Box::new(sink.clone()));
    engine
        .load_code(&[
            op::assign(Operand::temp(0), Operand::int(1)),
            op::assign(Operand::temp(1), Operand::int(2)).with_flags(InsnFlags::TRACE_POINT),
        ])
        .expect("load");
    engine.start(0).expect("start");
    engine.run(0).expect("run");

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].pc, 1);
}
