//! End-to-end launch-path tests

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::str;

use rstest::rstest;

use argbind::{signature, usage, Cli, Invocable, Slot, Value};

/// `cp`-style binding: (src, { verbose = false, out }, [dest])
fn copy_cli(seen: Rc<RefCell<Vec<Slot>>>) -> Cli {
    Cli::single(
        signature!(src, { verbose = false, out }, [dest]).unwrap(),
        move |args: &[Slot]| seen.borrow_mut().extend_from_slice(args),
    )
}

#[rstest]
#[case::missing_required(vec![], "Missing required argument")]
#[case::too_many(vec!["a", "b", "c"], "Too many arguments")]
#[case::option_missing_value(vec!["a", "--out"], "Option missing value")]
#[case::flag_given_value(vec!["a", "--verbose=x"], "Didn't expect value for flag argument")]
#[case::unknown_option(vec!["a", "--wat", "b"], "Unknown option")]
fn decode_errors_reach_the_diagnostic_stream(
    #[case] tokens: Vec<&str>,
    #[case] message: &str,
) {
    let seen: Rc<RefCell<Vec<Slot>>> = Rc::default();
    let cli = copy_cli(seen.clone());

    let mut diag = Vec::new();
    cli.launch_custom(tokens, &mut diag).unwrap();

    assert!(seen.borrow().is_empty(), "target must not be invoked");
    let text = str::from_utf8(&diag).unwrap();
    assert_eq!(
        text,
        format!("error: {}\n\n{}", message, usage(cli.schema()))
    );
}

#[test]
fn clean_input_invokes_with_bag_and_placeholder() {
    let seen: Rc<RefCell<Vec<Slot>>> = Rc::default();
    let cli = copy_cli(seen.clone());

    let mut diag = Vec::new();
    cli.launch_custom(["a", "--verbose", "--out=x"], &mut diag)
        .unwrap();

    assert!(diag.is_empty());
    let bag = BTreeMap::from([
        ("verbose".to_string(), Value::Switch(true)),
        ("out".to_string(), Value::Text("x".to_string())),
    ]);
    assert_eq!(
        *seen.borrow(),
        vec![
            Slot::Text("a".to_string()),
            Slot::Options(bag),
            Slot::Omitted,
        ]
    );
}

#[test]
fn command_table_routes_to_the_named_target() {
    let calls: Rc<RefCell<Vec<(&'static str, Vec<Slot>)>>> = Rc::default();
    let build_calls = calls.clone();
    let test_calls = calls.clone();
    let cli = Cli::commands([
        (
            "build",
            signature!(target, { release = false }).unwrap(),
            Box::new(move |args: &[Slot]| {
                build_calls.borrow_mut().push(("build", args.to_vec()))
            }) as Box<dyn Invocable>,
        ),
        (
            "test",
            signature!([filter]).unwrap(),
            Box::new(move |args: &[Slot]| {
                test_calls.borrow_mut().push(("test", args.to_vec()))
            }) as Box<dyn Invocable>,
        ),
    ]);

    let mut diag = Vec::new();
    cli.launch_custom(["build", "web", "--release"], &mut diag)
        .unwrap();
    cli.launch_custom::<_, &str>([], &mut diag).unwrap();

    let text = str::from_utf8(&diag).unwrap();
    assert_eq!(
        text,
        "error: Missing required argument\n\nusage: command\n\ncommands:\n  build\n  test\n"
    );

    let bag = BTreeMap::from([("release".to_string(), Value::Switch(true))]);
    assert_eq!(
        *calls.borrow(),
        vec![(
            "build",
            vec![Slot::Text("web".to_string()), Slot::Options(bag)]
        )]
    );
}

#[test]
fn schemas_are_reusable_across_launches() {
    let count: Rc<RefCell<usize>> = Rc::default();
    let hits = count.clone();
    let cli = Cli::single(signature!(name).unwrap(), move |_: &[Slot]| {
        *hits.borrow_mut() += 1
    });

    let mut diag = Vec::new();
    cli.launch_custom(["once"], &mut diag).unwrap();
    cli.launch_custom(["twice"], &mut diag).unwrap();

    assert!(diag.is_empty());
    assert_eq!(*count.borrow(), 2);
}
