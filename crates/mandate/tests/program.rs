//! End-to-end behaviour of a program assembled from hand-built functions.

use mandate::{
    ArgOptions, CommandContext, Error, Function, Program, Signature, Value, ValueType,
};

fn text(s: &str) -> Value {
    Value::Text(s.to_string())
}

fn echo(identity: &str) -> Function {
    Function::new(identity, |args: Vec<Value>| Ok::<_, anyhow::Error>(args))
}

fn int_arg(args: &[Value], i: usize) -> anyhow::Result<i64> {
    let value = args
        .get(i)
        .ok_or_else(|| anyhow::anyhow!("missing argument {}", i))?;
    match value {
        Value::Int(n) => Ok(*n),
        other => Ok(other.to_string().parse()?),
    }
}

fn example() -> Program {
    let mut program = Program::new("example.py").version("1.0.10");

    program
        .option(
            ["-f", "--foo"],
            ArgOptions::new()
                .dest("foo")
                .default("bar")
                .help("Real programmers don't comment their code."),
        )
        .unwrap();
    program
        .group("sub", "")
        .unwrap()
        .option(
            ["-i", "--inc"],
            ArgOptions::new()
                .dest("inc")
                .value_type(ValueType::Integer)
                .default(0)
                .help("Some help text."),
        )
        .unwrap();

    program
        .command(
            Function::with_context("getopt", |args: Vec<Value>, ctx: &CommandContext| {
                let name = args[0].to_string();
                ctx.option(&name)
                    .cloned()
                    .ok_or_else(|| anyhow::anyhow!("no option `{}`", name))
            })
            .doc(":param name: Name of option to return.")
            .signature(Signature::new().positional("name")),
        )
        .unwrap();

    let sub = program.group_mut("sub").unwrap();
    sub.command(
        Function::with_context("powOfSub", |args: Vec<Value>, ctx: &CommandContext| {
            let inc = ctx.option("inc").and_then(Value::as_int).unwrap_or(0);
            Ok::<_, anyhow::Error>(int_arg(&args, 0)?.pow(int_arg(&args, 1)? as u32) + inc)
        })
        .doc(":param b: Base.\n:param e: Exponent.")
        .signature(Signature::new().positional("b").positional("e")),
    )
    .unwrap();
    sub.command(
        Function::with_context("powOfSub2_impl", |args: Vec<Value>, ctx: &CommandContext| {
            let inc = ctx.option("inc").and_then(Value::as_int).unwrap_or(0);
            Ok::<_, anyhow::Error>(int_arg(&args, 0)?.pow(int_arg(&args, 1)? as u32) - inc)
        })
        .named("powOfSub2")
        .doc(":param b: Base.\n:param e: Exponent.")
        .signature(Signature::new().positional("b").positional("e")),
    )
    .unwrap();

    program
        .command(echo("goo").signature(
            Signature::new()
                .positional("pos")
                .optional("verbose", false)
                .optional("bar", Value::None),
        ))
        .unwrap();

    program
        .command(
            echo("vara")
                .doc(":param vars: Yeah, you got it right, the variable arguments.")
                .signature(
                    Signature::new()
                        .positional("pos")
                        .positional("foo")
                        .optional("spam", 24)
                        .variadic("vars"),
                ),
        )
        .unwrap();

    program
        .command(
            echo("another")
                .doc(
                    "This yet another example showcasing the power of mandate!

:param baw: That's the positional argument, obviously.
:param -o, --owl: Yeah, I know, this is too much.
:param -j, --json: In case you want to pipe it through something.
:param -t, --tomawk: Well, in this case -t isn't for time.",
                )
                .signature(
                    Signature::new()
                        .positional("baw")
                        .optional("owl", 42)
                        .optional("json", false)
                        .optional("tomawk", Value::None),
                ),
        )
        .unwrap();

    program
        .command(
            echo("analiased")
                .named("alias")
                .signature(Signature::new().positional("a").optional("b", 4)),
        )
        .unwrap();

    program
        .command(
            Function::new("power", |args: Vec<Value>| {
                Ok::<_, anyhow::Error>(int_arg(&args, 0)?.pow(int_arg(&args, 1)? as u32))
            })
            .signature(Signature::new().positional("x").optional("y", 2)),
        )
        .unwrap();

    program
        .command(
            echo("more_power")
                .named("more-power")
                .doc(
                    "This one really shows off complete power.

:param x <int>: Well, the base.
:param -y <int>: You got it, the exponent.",
                )
                .signature(Signature::new().positional("x").optional("y", 2)),
        )
        .unwrap();

    program
        .command(
            Function::new("repeat", |args: Vec<Value>| {
                let what = args[0].to_string();
                Ok::<_, anyhow::Error>(what.repeat(int_arg(&args, 1)? as usize))
            })
            .doc(
                "Getting types from annotations.

:param what: what to repeat.
:param -t, --times: how many times to repeat.",
            )
            .signature(
                Signature::new()
                    .positional("what")
                    .optional("times", 10)
                    .annotate("what", ValueType::Text)
                    .annotate("times", ValueType::Integer),
            ),
        )
        .unwrap();

    program
        .command(
            echo("more_power_2")
                .named("more-powerful")
                .signature(Signature::new().positional("x").optional("y", 2))
                .arg("x", Vec::<String>::new(), ArgOptions::new().value_type(ValueType::Integer))
                .arg(
                    "y",
                    ["-y", "--epsilon"],
                    ArgOptions::new().value_type(ValueType::Integer),
                ),
        )
        .unwrap();

    program
        .command(
            Function::new("overriding", |args: Vec<Value>| {
                Ok::<_, anyhow::Error>(int_arg(&args, 0)? - int_arg(&args, 1)?)
            })
            .doc(
                "Yoo an override test.

:param x <str>: This is so wroong!!! Let's hope it gets overridden.
:param -y <metavar>: This too!!",
            )
            .signature(Signature::new().positional("x").optional("y", 4))
            .arg("x", Vec::<String>::new(), ArgOptions::new().value_type(ValueType::Integer))
            .arg("y", Vec::<String>::new(), ArgOptions::new().value_type(ValueType::Integer)),
        )
        .unwrap();

    program
        .command(
            Function::new("dashes", |args: Vec<Value>| {
                Ok::<_, anyhow::Error>(int_arg(&args, 0)?.pow(int_arg(&args, 1)? as u32))
            })
            .doc(
                "Usual command help.

:param a <int>: A help obviously.
:param b <int>: Yooo.",
            )
            .signature(Signature::new().positional("a").optional("b", 5)),
        )
        .unwrap();

    program
        .command(echo("append").signature(Signature::new().optional("acc", Vec::<Value>::new())))
        .unwrap();

    program
}

fn parsed(program: &Program, line: &str) -> (String, Vec<Value>) {
    let inv = program.try_parse(line.split_whitespace()).unwrap();
    (inv.command, inv.args)
}

#[test]
fn test_generic_commands() {
    let program = example();
    let cases: Vec<(&str, Vec<Value>, &str)> = vec![
        ("goo 2", vec![text("2"), false.into(), Value::None], "goo"),
        ("goo 2 --verbose", vec![text("2"), true.into(), Value::None], "goo"),
        ("goo 2 --bar 9", vec![text("2"), false.into(), text("9")], "goo"),
        ("goo 2 --verbose --bar 8", vec![text("2"), true.into(), text("8")], "goo"),
        ("goo -5", vec![text("-5"), false.into(), Value::None], "goo"),
        (
            "vara 1 2 -3",
            vec![text("1"), text("2"), Value::Int(24), text("-3")],
            "vara",
        ),
        ("vara 2 3", vec![text("2"), text("3"), Value::Int(24)], "vara"),
        ("vara 2 3 --spam 8", vec![text("2"), text("3"), Value::Int(8)], "vara"),
        (
            "vara 1 2 4 5 --spam 8",
            vec![text("1"), text("2"), Value::Int(8), text("4"), text("5")],
            "vara",
        ),
        (
            "vara --spam 8 1 2 4 5",
            vec![text("1"), text("2"), Value::Int(8), text("4"), text("5")],
            "vara",
        ),
        (
            "vara 9 8 1 2 3 4",
            vec![
                text("9"),
                text("8"),
                Value::Int(24),
                text("1"),
                text("2"),
                text("3"),
                text("4"),
            ],
            "vara",
        ),
        ("another 2", vec![text("2"), Value::Int(42), false.into(), Value::None], "another"),
        ("another 2 -j", vec![text("2"), Value::Int(42), true.into(), Value::None], "another"),
        ("another 2 -t 1 -o 3", vec![text("2"), Value::Int(3), false.into(), text("1")], "another"),
        (
            "another 2 --owl 89 --tomawk 98",
            vec![text("2"), Value::Int(89), false.into(), text("98")],
            "another",
        ),
        ("another 2 --json -o 1", vec![text("2"), Value::Int(1), true.into(), Value::None], "another"),
        (
            "another 3 --owl 8 --json --tomawk 8",
            vec![text("3"), Value::Int(8), true.into(), text("8")],
            "another",
        ),
        ("alias 5 -b 9", vec![text("5"), Value::Int(9)], "analiased"),
        ("more-power 9 -y 2", vec![Value::Int(9), Value::Int(2)], "more_power"),
        ("more-powerful 9 -y 3", vec![Value::Int(9), Value::Int(3)], "more_power_2"),
        ("more-powerful 9 --epsilon 3", vec![Value::Int(9), Value::Int(3)], "more_power_2"),
        ("overriding 2", vec![Value::Int(2), Value::Int(4)], "overriding"),
        ("overriding 2 -y 7", vec![Value::Int(2), Value::Int(7)], "overriding"),
        ("dashes 2", vec![Value::Int(2), Value::Int(5)], "dashes"),
        ("dashes 8 -b 7", vec![Value::Int(8), Value::Int(7)], "dashes"),
        ("append", vec![Value::List(vec![])], "append"),
        ("append --acc 2", vec![Value::List(vec![text("2")])], "append"),
        (
            "append --acc 2 --acc 3",
            vec![Value::List(vec![text("2"), text("3")])],
            "append",
        ),
    ];

    for (line, expected_args, expected_name) in cases {
        let (name, args) = parsed(&program, line);
        assert_eq!(name, expected_name, "command for `{}`", line);
        assert_eq!(args, expected_args, "arguments for `{}`", line);
    }
}

#[test]
fn test_program_execute() {
    let program = example();
    let cases: Vec<(&str, Value)> = vec![
        ("power 2", Value::Int(4)),
        ("power 2 -y 4", Value::Int(16)),
        ("more-powerful 4 -y 2", Value::List(vec![Value::Int(4), Value::Int(2)])),
        ("overriding 2", Value::Int(-2)),
        ("overriding 2 -y 7", Value::Int(-5)),
        ("dashes 2", Value::Int(32)),
        ("dashes 7 -b 3", Value::Int(343)),
        ("repeat a", text("aaaaaaaaaa")),
        ("repeat a -t 5", text("aaaaa")),
    ];

    for (line, expected) in cases {
        let done = program.try_execute(line.split_whitespace()).unwrap();
        assert_eq!(done.output, expected, "output of `{}`", line);
        let (name, _) = parsed(&program, line);
        assert_eq!(program.current_command(), Some(name));
    }
}

#[test]
fn test_failed_coercion_is_a_usage_error() {
    let program = example();
    assert!(program.try_execute(["repeat", "a"]).is_ok());

    let err = program.try_execute(["repeat", "a", "-t", "blah"]).unwrap_err();
    let usage = err.downcast_ref::<Error>().expect("usage error");
    assert_eq!(usage.exit_code(), 2);
}

#[test]
fn test_program_options() {
    let program = example();
    assert_eq!(program.name(), "example.py");

    let cases: Vec<(&str, Value)> = vec![
        ("getopt foo", text("bar")),
        ("-f xyz getopt foo", text("xyz")),
        ("--foo xyz getopt foo", text("xyz")),
        ("sub powOfSub 2 3", Value::Int(8)),
        ("-f xyz sub -i 1 powOfSub 2 3", Value::Int(9)),
        ("--foo xyz sub --inc 2 powOfSub 2 3", Value::Int(10)),
        ("sub powOfSub2 2 3", Value::Int(8)),
        ("-f xyz sub -i 1 powOfSub2 2 3", Value::Int(7)),
        ("--foo xyz sub --inc 2 powOfSub2 2 3", Value::Int(6)),
    ];

    for (line, expected) in cases {
        let done = program.try_execute(line.split_whitespace()).unwrap();
        assert_eq!(done.output, expected, "output of `{}`", line);
    }
}

#[test]
fn test_group_path_and_identity() {
    let program = example();
    let done = program
        .try_execute(["-f", "xyz", "sub", "-i", "1", "powOfSub2", "2", "3"])
        .unwrap();
    assert_eq!(done.command, "powOfSub2_impl");
    assert_eq!(done.path, vec!["sub", "powOfSub2"]);
    assert_eq!(program.current_command().as_deref(), Some("powOfSub2_impl"));

    let inv = program.try_parse(["sub", "powOfSub", "2", "3"]).unwrap();
    assert_eq!(inv.options.get("foo"), Some(&text("bar")));
    assert_eq!(inv.options.get("inc"), Some(&Value::Int(0)));
}

#[test]
fn test_group_without_command_is_usage_error() {
    let program = example();
    assert!(program.try_parse(["sub"]).is_err());
    assert!(program.try_parse(Vec::<String>::new()).is_err());
}

#[test]
fn test_help_text_comes_from_docs() {
    let program = example();
    let mut cmd = program.to_command();
    let another = cmd.find_subcommand_mut("another").unwrap();
    let help = another.render_help().to_string();

    assert!(help.contains("This yet another example showcasing the power of mandate!"));
    assert!(help.contains("-o, --owl <OWL>"));
    assert!(help.contains("Yeah, I know, this is too much."));
    assert!(help.contains("-j, --json"));
    assert!(help.contains("That's the positional argument, obviously."));
}

#[test]
fn test_registered_tree() {
    let program = example();
    let root = program.registry();
    assert!(root.find(&["getopt"]).is_some());
    assert!(root.find(&["sub", "powOfSub2"]).is_some());
    assert!(root.find(&["powOfSub2"]).is_none());
    assert_eq!(root.groups().count(), 1);
    assert_eq!(root.options().len(), 1);
}
