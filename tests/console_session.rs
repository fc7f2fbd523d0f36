// tests/console_session.rs

//! End-to-end sessions through the public API only.

use debug_console::{transport_fn, Console, ConsoleConfig, ConsoleError, MockTransport, State};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

fn pump_until_idle(console: &mut Console<MockTransport>) {
    for _ in 0..64 {
        console.pump();
    }
}

#[test_log::test]
fn registry_lookup_and_order_survive_many_commands() {
    let console = Console::new(MockTransport::new(), 80, 10);
    let names: Vec<String> = (0..20).map(|i| format!("cmd_{i}")).collect();
    let commands: Vec<_> = names
        .iter()
        .map(|name| console.register(name, |_, _| {}).unwrap())
        .collect();

    for (name, command) in names.iter().zip(&commands) {
        assert_eq!(console.find(name), Some(command.id()));
        assert_eq!(command.name(), name.as_str());
    }
    assert_eq!(console.command_names(), names);

    let err = console.register("cmd_7", |_, _| {}).unwrap_err();
    assert!(matches!(err, ConsoleError::DuplicateCommand(_)));
    assert_eq!(console.command_names(), names);
    assert_eq!(console.find("cmd_7"), Some(commands[7].id()));
}

#[test_log::test]
fn commands_dropped_after_console_are_harmless() {
    let console = Console::new(MockTransport::new(), 80, 6);
    let cmd_1 = console.register("cmd_1", |_, _| {}).unwrap();
    let cmd_2 = console.register("cmd_2", |_, _| {}).unwrap();
    drop(console);
    drop(cmd_1);
    drop(cmd_2);
}

#[test_log::test]
fn session_over_closure_transport() {
    let input: Rc<RefCell<VecDeque<u8>>> = Rc::default();
    let output: Rc<RefCell<Vec<u8>>> = Rc::default();
    let reader = Rc::clone(&input);
    let writer = Rc::clone(&output);
    let transport = transport_fn(
        move || reader.borrow_mut().pop_front(),
        move |byte| writer.borrow_mut().push(byte),
    );

    let mut console = Console::new(transport, 32, 4);
    let total = Rc::new(RefCell::new(0i64));
    let sum = Rc::clone(&total);
    let _add = console
        .register("add", move |ctx, args| {
            let parsed: Result<Vec<i64>, _> = args.iter().skip(1).map(str::parse).collect();
            match parsed {
                Ok(values) => *sum.borrow_mut() += values.iter().sum::<i64>(),
                Err(_) => ctx.puts("usage: add <n>...\n"),
            }
        })
        .unwrap();

    input.borrow_mut().extend(b"add 1 2 3\radd x\r".iter().copied());
    for _ in 0..64 {
        console.pump();
    }

    assert_eq!(*total.borrow(), 6);
    let text = String::from_utf8(output.borrow().clone()).unwrap();
    assert!(text.contains("usage: add <n>...\r\n"));
    assert!(text.ends_with(" # "));
}

#[test_log::test]
fn configured_console_runs_list_command() {
    let config = ConsoleConfig::from_json(r#"{ "prompt": "> ", "list_command": "help" }"#).unwrap();
    let mut console = Console::with_config(MockTransport::new(), &config);
    let _help = console
        .register_list_command(config.list_command.as_deref().unwrap())
        .unwrap();
    let _reboot = console.register("reboot", |_, _| {}).unwrap();

    console.transport_mut().push_input(b"help\r");
    pump_until_idle(&mut console);

    assert_eq!(
        console.transport_mut().take_output(),
        b"> help\r\nhelp\r\nreboot\r\n> "
    );
    assert_eq!(console.state(), State::ReadInput);
}

#[test_log::test]
fn typing_while_callbacks_run_is_not_lost() {
    let mut console = Console::new(MockTransport::new(), 80, 6);
    let seen: Rc<RefCell<Vec<String>>> = Rc::default();
    let sink = Rc::clone(&seen);
    let _cmd = console
        .register("note", move |_, args| {
            sink.borrow_mut().push(args.get(1).unwrap_or_default().to_owned());
        })
        .unwrap();

    console.transport_mut().push_input(b"note one\rnote two\rnote three\r");
    pump_until_idle(&mut console);

    assert_eq!(&*seen.borrow(), &["one", "two", "three"]);
}
