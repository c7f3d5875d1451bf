//! Commands described with `#[command]`.

use mandate::{command, CommandContext, Error, ParamKind, Program, Value, ValueType};

/// Compute base ^ exp and print the result.
///
/// :param int base: The base number.
/// :param int exp: The exponent.
#[command]
fn pow(base: i64, exp: u32) -> anyhow::Result<i64> {
    Ok(base.pow(exp))
}

/// Echo the given text.
///
/// :param text: The text to echo.
/// :param -c, --capitalize: Capitalize it.
#[command]
fn echo(text: String, capitalize: bool) -> String {
    if capitalize {
        text.to_uppercase()
    } else {
        text
    }
}

/// This one really shows off complete power.
///
/// :param x: Well, the base.
/// :param -y: You got it, the exponent.
#[command(name = "more-powerful")]
fn more_power_2(x: i64, #[arg("-y", "--epsilon")] #[default(2)] y: u32) -> i64 {
    x.pow(y)
}

#[command]
fn vara(pos: String, foo: String, #[default(24)] spam: i64, #[rest] vars: Vec<String>) -> Value {
    let mut out: Vec<Value> = vec![pos.into(), foo.into(), spam.into()];
    out.extend(vars.into_iter().map(Value::from));
    Value::List(out)
}

/// Search for files.
///
/// :param path: Where to start.
/// :param -d, --maxdepth <levels>: Descend at most <levels> levels.
#[command]
fn find(path: String, maxdepth: Option<u32>, #[arg(action = "append")] name: Vec<String>) -> String {
    let depth = maxdepth.map(|d| d.to_string()).unwrap_or_else(|| "inf".into());
    format!("{}:{}:{}", path, depth, name.join(","))
}

#[command]
fn getopt(key: String, #[ctx] ctx: &CommandContext) -> anyhow::Result<Value> {
    ctx.option(&key)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("no option `{}`", key))
}

/// One line summary.
///
/// Args:
///     arg1 (int): Description of `arg1`
///     arg2 (str): Description of `arg2`
#[command(doc_style = "google")]
fn simple_google_docstring(arg1: Value, #[default("string")] arg2: String) -> String {
    arg2.repeat(arg1.as_int().unwrap_or(0) as usize)
}

#[command]
fn nothing() {}

#[command]
fn wide(big: i128, #[default(0)] offset: isize, #[default(1)] scale: u128) -> String {
    (big * scale as i128 + offset as i128).to_string()
}

fn program() -> Program {
    let mut program = Program::new("example").version("0.1.0");
    program
        .option(
            ["-f", "--foo"],
            mandate::ArgOptions::new().default("bar"),
        )
        .unwrap();
    program
        .command(pow__function())
        .unwrap()
        .command(echo__function())
        .unwrap()
        .command(more_power_2__function())
        .unwrap()
        .command(vara__function())
        .unwrap()
        .command(find__function())
        .unwrap()
        .command(getopt__function())
        .unwrap()
        .command(simple_google_docstring__function())
        .unwrap()
        .command(nothing__function())
        .unwrap()
        .command(wide__function())
        .unwrap();
    program
}

fn run(program: &Program, line: &str) -> Value {
    program.try_execute(line.split_whitespace()).unwrap().output
}

#[test]
fn test_original_functions_still_callable() {
    assert_eq!(pow(2, 3).unwrap(), 8);
    assert_eq!(echo("hi".into(), true), "HI");
    assert_eq!(more_power_2(3, 2), 9);
}

#[test]
fn test_signature_from_rust_types() {
    let function = find__function();
    let params = function.params().params();
    assert_eq!(params.len(), 3);
    assert_eq!(params[0].kind, ParamKind::Positional);
    assert_eq!(params[0].annotation, Some(ValueType::Text));
    assert_eq!(params[1].kind, ParamKind::Optional);
    assert_eq!(params[1].default, Some(Value::None));
    assert_eq!(params[1].annotation, Some(ValueType::Integer));
    assert_eq!(params[2].default, Some(Value::List(vec![])));
    assert_eq!(function.identity(), "find");
    assert!(function.doc_text().starts_with("Search for files.\n\n:param path:"));
}

#[test]
fn test_named_command() {
    let function = more_power_2__function();
    assert_eq!(function.identity(), "more_power_2");
    assert_eq!(function.command_name(), "more-powerful");
}

#[test]
fn test_execute_macro_commands() {
    let program = program();
    assert_eq!(run(&program, "pow 2 10"), Value::Int(1024));
    assert_eq!(run(&program, "echo hello"), Value::Text("hello".into()));
    assert_eq!(run(&program, "echo hello -c"), Value::Text("HELLO".into()));
    assert_eq!(run(&program, "echo hello --capitalize"), Value::Text("HELLO".into()));
    assert_eq!(run(&program, "more-powerful 4 --epsilon 3"), Value::Int(64));
    assert_eq!(run(&program, "more-powerful 4"), Value::Int(16));
    assert_eq!(run(&program, "nothing"), Value::None);
    assert_eq!(program.current_command().as_deref(), Some("nothing"));
}

#[test]
fn test_wide_integer_parameters() {
    let program = program();
    assert_eq!(run(&program, "wide 7"), Value::from("7"));
    assert_eq!(run(&program, "wide -7 --offset -1 --scale 3"), Value::from("-22"));
    let params = wide__function().params().params().to_vec();
    assert_eq!(params[0].annotation, Some(ValueType::Integer));
    assert_eq!(params[2].annotation, Some(ValueType::Integer));
}

#[test]
fn test_variadic_tail() {
    let program = program();
    assert_eq!(
        run(&program, "vara 1 2 4 5 --spam 8"),
        Value::from(vec![
            Value::from("1"),
            Value::from("2"),
            Value::Int(8),
            Value::from("4"),
            Value::from("5"),
        ])
    );
    assert_eq!(
        run(&program, "vara a b"),
        Value::from(vec![Value::from("a"), Value::from("b"), Value::Int(24)])
    );
}

#[test]
fn test_optional_and_repeated() {
    let program = program();
    assert_eq!(run(&program, "find ."), Value::from(".:inf:"));
    assert_eq!(run(&program, "find . -d 2"), Value::from(".:2:"));
    assert_eq!(
        run(&program, "find . --maxdepth 3 --name a --name b"),
        Value::from(".:3:a,b")
    );
}

#[test]
fn test_typed_positional_rejects_text() {
    let program = program();
    let err = program.try_execute(["pow", "two", "3"]).unwrap_err();
    assert!(err.downcast_ref::<Error>().is_some());
}

#[test]
fn test_context_sees_program_options() {
    let program = program();
    assert_eq!(run(&program, "getopt foo"), Value::from("bar"));
    assert_eq!(run(&program, "-f xyz getopt foo"), Value::from("xyz"));
}

#[test]
fn test_google_docstring() {
    let program = program();
    assert_eq!(
        run(&program, "simple_google_docstring 2 --arg2=test"),
        Value::from("testtest")
    );

    let spec = program
        .registry()
        .find(&["simple_google_docstring"])
        .unwrap();
    assert_eq!(spec.help, "One line summary.");
    assert_eq!(spec.parameters[0].value_type, Some(ValueType::Integer));
    assert_eq!(spec.parameters[1].help, "Description of `arg2`");
}

#[test]
fn test_metavar_from_docs() {
    let program = program();
    let spec = program.registry().find(&["find"]).unwrap();
    let maxdepth = &spec.parameters[1];
    assert_eq!(maxdepth.aliases, vec!["-d", "--maxdepth"]);
    assert_eq!(maxdepth.metavar.as_deref(), Some("levels"));
    assert_eq!(maxdepth.value_type, Some(ValueType::Integer));
}
