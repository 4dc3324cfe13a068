use crate::common::{session_with, LineFeed, MockDebugInfo, SharedWire, TestHook};
use retrace::debugger::error::Error;
use retrace::debugger::symbol::{CollectExpression, StorageClass, Symbol};
use retrace::ui::command::{control, Command};
use retrace::FrameSelector;
use std::rc::Rc;

#[test]
fn test_full_start_flow_with_noisy_replies() {
    let mut di = MockDebugInfo::with_function("main", 0x4000);
    di.add_function("worker", 0x5000);
    di.expressions.insert(
        "counter".to_string(),
        CollectExpression::Variable(Symbol {
            name: "counter".to_string(),
            class: StorageClass::Local { offset: -8 },
            byte_len: 4,
        }),
    );
    di.expressions
        .insert("$rdi".to_string(), CollectExpression::Register(5));

    // the stub chats while acknowledging: console noise before each OK
    let wire = SharedWire::with_replies(&[
        "O737461727465640a",
        "OK",
        "OK",
        "OK",
        "OK",
    ]);
    let hook = Rc::new(TestHook::default());
    let mut session = session_with(&wire, di, &hook);

    session.trace("main").unwrap();
    session.trace("worker").unwrap();
    let mut feed = LineFeed::new(&[
        "collect counter, $rdi",
        "while-stepping 2",
        "collect $($rbp, -16, 8)",
        "end",
        "end",
    ]);
    session.read_actions("1", &mut feed).unwrap();

    session.tstart().unwrap();

    // frame-relative collect of `counter` pulls in the frame pointer, the
    // register operand adds rdi; stepping part rides behind the S marker
    assert_eq!(
        wire.sent(),
        vec![
            "QTinit".to_string(),
            "QTDP:1:4000:E:2:0R60M6,fffffffffffffff8,4SR40M6,fffffffffffffff0,8".to_string(),
            "QTDP:2:5000:E:0:0".to_string(),
            "QTStart".to_string(),
        ]
    );
    assert_eq!(
        hook.remote_out.borrow().as_slice(),
        &["started\n".to_string()]
    );
    assert_eq!(hook.int_vars.borrow()["trace_frame"], -1);
    assert_eq!(hook.int_vars.borrow()["tracepoint"], -1);
}

#[test]
fn test_remote_error_aborts_start() {
    let wire = SharedWire::with_replies(&["OK", "E15"]);
    let hook = Rc::new(TestHook::default());
    let mut session = session_with(&wire, MockDebugInfo::with_function("main", 0x4000), &hook);
    session.trace("main").unwrap();

    assert!(matches!(
        session.tstart(),
        Err(Error::RemoteOutgoingField(5))
    ));
    // QTStart was never issued
    assert_eq!(wire.sent().last().map(String::as_str), Some("QTDP:1:4000:E:0:0"));
}

#[test]
fn test_replay_walk_updates_convenience_values() {
    let wire = SharedWire::with_replies(&[
        "R06:0000000000001000;",
        "OK",
        "F0T1OK",
        "F-1",
    ]);
    let hook = Rc::new(TestHook::default());
    hook.pc.set(Some(0x4000));
    let mut session = session_with(&wire, MockDebugInfo::with_function("main", 0x4000), &hook);
    session.trace("main").unwrap();

    // a register dump may precede the terminal reply of any exchange
    session.tstatus().unwrap();
    assert_eq!(
        hook.registers.borrow().as_slice(),
        &[(6u16, vec![0, 0, 0, 0, 0, 0, 0x10, 0])]
    );

    session.tfind(FrameSelector::Start).unwrap();
    assert_eq!(session.replay_frame(), 0);
    assert_eq!(session.replay_tracepoint(), 1);
    assert_eq!(hook.int_vars.borrow()["trace_frame"], 0);
    assert_eq!(hook.int_vars.borrow()["tracepoint"], 1);
    assert_eq!(hook.int_vars.borrow()["trace_line"], 10);
    assert_eq!(hook.str_vars.borrow()["trace_func"], "main");
    assert_eq!(hook.str_vars.borrow()["trace_file"], "main.c");

    session.tfind(FrameSelector::End).unwrap();
    assert_eq!(session.replay_frame(), -1);
    assert_eq!(hook.int_vars.borrow()["trace_line"], -1);
    assert_eq!(hook.str_vars.borrow()["trace_func"], "");
    assert_eq!(hook.str_vars.borrow()["trace_file"], "");

    assert_eq!(
        wire.sent(),
        vec![
            "qTStatus".to_string(),
            "QTFrame:0".to_string(),
            "QTFrame:ffffffff".to_string(),
        ]
    );
}

#[test]
fn test_command_parser_drives_session() {
    let wire = SharedWire::with_replies(&["OK", "OK", "OK"]);
    let hook = Rc::new(TestHook::default());
    let mut session = session_with(&wire, MockDebugInfo::with_function("main", 0x4000), &hook);

    match Command::parse("trace main").unwrap() {
        Command::Trace(location) => {
            retrace::ui::command::trace::Handler::new(&mut session)
                .handle(&location)
                .unwrap();
        }
        other => panic!("unexpected command: {other:?}"),
    }
    assert_eq!(session.tracepoints().len(), 1);

    match Command::parse("tstart").unwrap() {
        Command::Control(cmd) => {
            retrace::ui::command::control::Handler::new(&mut session)
                .handle(cmd)
                .unwrap();
        }
        other => panic!("unexpected command: {other:?}"),
    }
    assert_eq!(wire.sent().first().map(String::as_str), Some("QTinit"));

    assert!(matches!(
        Command::parse("tstart").unwrap(),
        Command::Control(control::Command::Start)
    ));
}
