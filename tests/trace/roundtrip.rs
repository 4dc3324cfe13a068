use crate::common::{session_with, source_script, LineFeed, MockDebugInfo, SharedWire, TestHook};
use retrace::debugger::symbol::{CollectExpression, StorageClass, Symbol};
use retrace::debugger::tracepoint::PassTarget;
use std::rc::Rc;

fn debug_info() -> MockDebugInfo {
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
    di
}

#[test]
fn test_save_then_source_reconstructs_the_store() {
    let wire = SharedWire::default();
    let hook = Rc::new(TestHook::default());
    let mut session = session_with(&wire, debug_info(), &hook);

    session.trace("main").unwrap();
    session.trace("worker").unwrap();
    session
        .set_pass_count(PassTarget::Spec("1".to_string()), 100)
        .unwrap();
    let mut feed = LineFeed::new(&[
        "collect $regs, counter",
        "while-stepping 4",
        "collect $($rbp, -32, 16)",
        "end",
        "end",
    ]);
    session.read_actions("1", &mut feed).unwrap();
    let mut feed = LineFeed::new(&["collect $locals", "end"]);
    session.read_actions("2", &mut feed).unwrap();

    let path = std::env::temp_dir().join(format!(
        "retrace-roundtrip-{}.txt",
        std::process::id()
    ));
    session.save_tracepoints(&path).unwrap();
    let script = std::fs::read_to_string(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    // replay the script into a brand new session
    let replayed_hook = Rc::new(TestHook::default());
    let mut replayed = session_with(&SharedWire::default(), debug_info(), &replayed_hook);
    source_script(&mut replayed, &script);

    let original: Vec<_> = session.tracepoints().iter().collect();
    let rebuilt: Vec<_> = replayed.tracepoints().iter().collect();
    assert_eq!(original.len(), rebuilt.len());
    for (a, b) in original.iter().zip(&rebuilt) {
        assert_eq!(a.number, b.number);
        assert_eq!(a.address, b.address);
        assert_eq!(a.enabled, b.enabled);
        assert_eq!(a.pass_count, b.pass_count);
        assert_eq!(a.step_count, b.step_count);
        assert_eq!(a.addr_string, b.addr_string);
        assert_eq!(a.actions, b.actions);
    }

    // and saving the rebuilt store produces the same script again
    let path2 = std::env::temp_dir().join(format!(
        "retrace-roundtrip2-{}.txt",
        std::process::id()
    ));
    replayed.save_tracepoints(&path2).unwrap();
    let script2 = std::fs::read_to_string(&path2).unwrap();
    let _ = std::fs::remove_file(&path2);
    assert_eq!(script, script2);
}
