use std::{
    cell::RefCell,
    fs,
    io::{self, Cursor, Write},
    path::Path,
    rc::Rc,
};

use pretty_assertions::assert_eq;
use soul::{
    ast::Position,
    config::Config,
    error::{Error, RuntimeError},
    interpreter::{
        evaluator::{
            core::{Context, EvalResult, Mode, Output},
            function::builtin::{Arity, Builtin, Registry},
        },
        value::core::Value,
    },
    process_source, transpile_file,
};
use temp_dir::TempDir;
use test_case::test_case;
use walkdir::WalkDir;

/// An output stream the test keeps a handle to.
#[derive(Clone, Default)]
struct SharedOutput(Rc<RefCell<Vec<u8>>>);

impl SharedOutput {
    fn text(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).unwrap()
    }
}

impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn context(config: Config) -> Context {
    Context::with_io(config, Box::new(io::empty()), Box::new(io::sink()))
}

fn run_with(config: Config, src: &str) -> Result<Value, Error> {
    match process_source(&mut context(config), src, Mode::Interpret)? {
        Output::Value(value) => Ok(value),
        Output::Text(text) => panic!("interpreting produced text: {text}"),
    }
}

fn run(src: &str) -> Result<Value, Error> {
    run_with(Config::default(), src)
}

fn eval(src: &str) -> Value {
    run(src).unwrap_or_else(|e| panic!("Script failed: {e}\n{src}"))
}

fn output_of(src: &str, input: &str) -> String {
    let output = SharedOutput::default();
    let mut context = Context::with_io(Config::default(),
                                       Box::new(Cursor::new(input.to_string())),
                                       Box::new(output.clone()));
    if let Err(e) = process_source(&mut context, src, Mode::Interpret) {
        panic!("Script failed: {e}\n{src}");
    }
    output.text()
}

fn assert_success(src: &str) {
    if let Err(e) = run(src) {
        panic!("Script failed: {e}\n{src}");
    }
}

fn assert_failure(src: &str) -> Error {
    match run(src) {
        Ok(value) => panic!("Script succeeded with {value} but was expected to fail:\n{src}"),
        Err(e) => e,
    }
}

fn runtime_failure(src: &str) -> RuntimeError {
    match assert_failure(src) {
        Error::Runtime(e) => e,
        other => panic!("expected a runtime error, got: {other}"),
    }
}

#[test]
fn precedence_and_basic_arithmetic() {
    assert_eq!(eval("1 + 2 * 3"), Value::Integer(7));
    assert_eq!(eval("(1 + 2) * 3"), Value::Integer(9));
    assert_eq!(eval("10 - 4 - 3"), Value::Integer(3));
    assert_success("var x = 7 * 9; assert x == 63");
    assert_success("assert (1 + 2 * 3) == 7");
}

#[test_case("7 / 2", Value::Integer(3) ; "division truncates")]
#[test_case("-7 / 2", Value::Integer(-3) ; "division truncates toward zero")]
#[test_case("'ab' + 'cd'", Value::from("abcd") ; "string concatenation")]
#[test_case("'ab' * 3", Value::from("ababab") ; "string repetition")]
#[test_case("'ab' * -1", Value::from("") ; "negative repetition is empty")]
#[test_case("3 in [1, 2, 3]", Value::Bool(true) ; "array membership")]
#[test_case("'ou' in 'soul'", Value::Bool(true) ; "substring membership")]
#[test_case("'b' > 'a'", Value::Bool(true) ; "string ordering")]
#[test_case("1 == 'a'", Value::Bool(false) ; "mixed equality")]
#[test_case("0 or 'x'", Value::from("x") ; "or returns an operand")]
#[test_case("1 and 0", Value::Integer(0) ; "and returns an operand")]
#[test_case("[1, 2].1", Value::Integer(2) ; "array index")]
#[test_case("'soul'.-1", Value::from("l") ; "negative string index")]
fn expressions(src: &str, expected: Value) {
    assert_eq!(eval(src), expected);
}

#[test]
fn array_concatenation_copies_elements() {
    assert_eq!(eval("[1] + [2, 3]"),
               Value::from(vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)]));
}

#[test]
fn statements_run_in_source_order() {
    assert_eq!(output_of("print 1; print 2; print 3", ""), "1\n2\n3\n");
    assert_eq!(eval("var a = 1; a = 2; a"), Value::Integer(2));
}

#[test]
fn print_skips_none_and_echo_yields_its_value() {
    assert_eq!(output_of("print None; print 'x'; print [1, 'a']", ""), "x\n[1, 'a']\n");
    assert_eq!(eval("echo 5"), Value::Integer(5));
    assert_eq!(eval("print 5"), Value::None);
}

#[test]
fn input_reads_a_line_after_the_prompt() {
    let output = output_of("var name = input 'Name: '; print 'Hi ' + name", "Ada\n");
    assert_eq!(output, "Name: Hi Ada\n");
}

#[test]
fn functions_capture_a_snapshot() {
    assert_eq!(eval("var x = 1; func get() { x }; x = 2; get()"), Value::Integer(1));
    assert_eq!(eval("var x = 1; func get() { x }; x = 2; x"), Value::Integer(2));
    assert_failure("func first() { second() }; func second() { 1 }; first()");
}

#[test]
fn functions_recurse_through_their_own_name() {
    let src = "func fact(n) { if n < 2 { return 1 }; return n * fact(n - 1) }; fact(5)";
    assert_eq!(eval(src), Value::Integer(120));
}

#[test]
fn return_exits_early() {
    let src = "func first() { return 1; print 'unreachable'; 2 }; first()";
    assert_eq!(eval(src), Value::Integer(1));
    assert_eq!(output_of(src, ""), "");
    assert_eq!(eval("func last() { 1; 2 }; last()"), Value::Integer(2));
}

#[test]
fn arity_is_checked() {
    assert!(matches!(runtime_failure("func f(a) { a }; f(1, 2)"),
                     RuntimeError::ArgumentCountMismatch { found: 2, .. }));
    assert!(matches!(runtime_failure("len(1, 2)"), RuntimeError::ArgumentCountMismatch { .. }));
    assert!(matches!(runtime_failure("var x = 1; x()"), RuntimeError::NotCallable { .. }));
}

#[test]
fn declared_return_types_are_checked() {
    assert_eq!(eval("func name() str { return 'soul' }; name()"), Value::from("soul"));
    assert!(matches!(runtime_failure("func f() int { return 'x' }; f()"),
                     RuntimeError::TypeReturn { .. }));
    assert_success("func f() int { 'x' }; f()");
}

#[test]
fn typed_arrays_check_their_elements() {
    assert_success("var xs = int -> [1, 2, 3]");
    assert_success("var xs = any -> [1, 'a', None]");
    assert!(matches!(runtime_failure("int -> [1, 'a']"), RuntimeError::ArrayType { .. }));
}

#[test]
fn while_loops() {
    assert_eq!(eval("var i = 0; while i < 3 { i = (i + 1) }; i"), Value::Integer(3));
    assert_eq!(eval("var i = 0; while i < 3 { i = (i + 1) }"), Value::None);
    assert_eq!(eval("var i = 0; while ret i < 3 { i = (i + 1); i * 10 }"),
               Value::from(vec![Value::Integer(10), Value::Integer(20), Value::Integer(30)]));
    assert_eq!(eval("var i = 0; while True { i = (i + 1); if i == 5 { break i * 2 } }"),
               Value::Integer(10));
}

#[test]
fn jumps_outside_their_construct_fail() {
    assert!(matches!(runtime_failure("break"), RuntimeError::BreakOutsideLoop { .. }));
    assert!(matches!(runtime_failure("return 1"), RuntimeError::ReturnOutsideFunction { .. }));
    assert!(matches!(runtime_failure("func f() { break }; while True { f() }"),
                     RuntimeError::BreakOutsideLoop { .. }));
}

#[test]
fn match_and_switch_pick_the_first_equal_key() {
    assert_eq!(eval("var x = 2; match x with { 1: 'one', 2: 'two', 2: 'again' }"), Value::from("two"));
    assert_eq!(eval("match 9 with { 1: 'one' }"), Value::None);
    assert_eq!(eval("switch 'b' { case 'a' { 1 } case 'b' { 2 } }"), Value::Integer(2));
    assert_eq!(eval("switch 3 { case 1 { 1 } }"), Value::None);
}

#[test]
fn try_except_filters_errors() {
    assert_eq!(eval("try { 1 / 0 } except { 'caught' }"), Value::from("caught"));
    assert_eq!(eval("try { 1 / 0 } except ZeroDivisionError { 'zero' }"), Value::from("zero"));
    assert_eq!(eval("try { raise 'Boom' } except Boom { 'raised' }"), Value::from("raised"));
    assert_eq!(eval("try { missing } except NameError { 'name' }"), Value::from("name"));
    assert!(matches!(runtime_failure("try { 1 / 0 } except KeyError { 'key' }"),
                     RuntimeError::DivisionByZero { .. }));
}

#[test]
fn exit_is_never_caught() {
    let error = assert_failure("try { exit(3) } except { 0 }");
    assert_eq!(error.exit_code(), Some(3));
}

#[test]
fn raise_and_assert_report_errors() {
    assert!(matches!(runtime_failure("raise 'bad input'"),
                     RuntimeError::Raised { message, .. } if message == "bad input"));
    assert!(matches!(runtime_failure("assert 1 == 2"), RuntimeError::AssertionFailed { .. }));
}

#[test]
fn categories_build_objects() {
    let src = "var p = cat Point { var x = 1; var y = 2 }; p.x = 5; var q = Point(); [p.x, q.x, q.y]";
    assert_eq!(eval(src),
               Value::from(vec![Value::Integer(5), Value::Integer(1), Value::Integer(2)]));
    assert!(matches!(runtime_failure("var p = cat Point { var x = 1 }; p.z"),
                     RuntimeError::UnknownKey { .. }));
}

#[test]
fn method_calls() {
    assert_eq!(eval("var c = cat Calc { func double(v) { v * 2 } }; c.double(21)"),
               Value::Integer(42));
    assert_eq!(eval("var xs = [1, 2]; xs.append(3); xs.len()"), Value::Integer(3));
    assert_eq!(eval("'a b c'.split().len()"), Value::Integer(3));
}

#[test]
fn dicts_and_enums() {
    assert_eq!(eval("var color = enum('red', 'green'); color.green"), Value::Integer(1));
    assert_eq!(eval("var color = enum(['red', 'green']); color.'red'"), Value::Integer(0));
    assert_eq!(eval("var d = dict(); d.a = 1; d.a"), Value::Integer(1));
    assert_eq!(eval("var d = dict([['k', 2]]); 'k' in d"), Value::Bool(true));
    assert_eq!(eval("var a = 1; 'a' in env()"), Value::Bool(true));
}

#[test]
fn element_assignment_is_shared_between_aliases() {
    assert_eq!(eval("var xs = [1, 2]; var ys = xs; ys.0 = 9; xs.0"), Value::Integer(9));
    assert!(matches!(runtime_failure("var xs = [1]; xs.3 = 1"), RuntimeError::IndexOutOfBounds { .. }));
    assert!(matches!(runtime_failure("y = 1"), RuntimeError::UnknownVariable { .. }));
}

#[test]
fn init_binds_self() {
    assert_eq!(eval("init: 5; self"), Value::Integer(5));
    assert_eq!(eval("func make() { 7 }; init: make"), Value::Integer(7));
}

#[test]
fn algebraic_placeholders() {
    assert_eq!(eval("alg x; @x"), Value::None);
}

#[test_case("len('soul')", Value::Integer(4) ; "len of string")]
#[test_case("len([1, 2])", Value::Integer(2) ; "len of array")]
#[test_case("is_digit('123')", Value::Bool(true) ; "digits")]
#[test_case("is_alpha('ab1')", Value::Bool(false) ; "not alphabetic")]
#[test_case("is_ident('_x1')", Value::Bool(true) ; "identifier")]
#[test_case("int('42')", Value::Integer(42) ; "parse int")]
#[test_case("str(42)", Value::from("42") ; "int to string")]
#[test_case("type([])", Value::from("array") ; "type name")]
#[test_case("index([5, 6, 7], 6)", Value::Integer(1) ; "index of element")]
#[test_case("var xs = [1, 2, 3]; pop(xs)", Value::Integer(3) ; "pop last")]
fn builtins(src: &str, expected: Value) {
    assert_eq!(eval(src), expected);
}

#[test]
fn arrays_containing_themselves_print_and_compare() {
    assert_eq!(eval("var xs = [1]; append(xs, xs); str(xs)"), Value::from("[1, [...]]"));
    assert_eq!(eval("var xs = [1]; append(xs, xs); var ys = [1]; append(ys, ys); xs == ys"),
               Value::Bool(true));
    assert_eq!(output_of("var d = dict(); d.self = d; print d", ""), "{'self': {...}}\n");
}

fn double(_: &mut Context, args: &[Value], position: Position) -> EvalResult<Value> {
    Ok(Value::Integer(args[0].as_integer("argument", position)? * 2))
}

#[test]
fn custom_builtins_replace_the_registry() {
    let builtin = Builtin::new("double", Arity::Exact(1), double);
    assert_eq!(builtin.arity(), Arity::Exact(1));

    let mut builtins = Registry::empty();
    builtins.register(builtin);
    let mut context = context(Config::default()).with_builtins(builtins);

    assert_eq!(process_source(&mut context, "double(21)", Mode::Interpret).unwrap(),
               Output::Value(Value::Integer(42)));
    assert!(matches!(process_source(&mut context, "double(1, 2)", Mode::Interpret),
                     Err(Error::Runtime(RuntimeError::ArgumentCountMismatch { .. }))));
    assert!(matches!(process_source(&mut context, "len('a')", Mode::Interpret),
                     Err(Error::Runtime(RuntimeError::UnknownVariable { .. }))));
}

#[test]
fn deep_recursion_is_reported() {
    let config = Config { max_call_depth: 50,
                          ..Config::default() };
    let error = run_with(config, "func f(n) { f(n + 1) }; f(0)").unwrap_err();
    assert!(matches!(error, Error::Runtime(RuntimeError::StackExhausted { .. })));
}

#[test]
fn long_programs_run_and_drop() {
    let mut src = "var a = 1;\n".repeat(100_000);
    src.push_str("a = (a + 1); a");
    assert_eq!(eval(&src), Value::Integer(2));

    let mut context = context(Config::default());
    let Output::Text(text) = process_source(&mut context, &"var b = 2;\n".repeat(20_000), Mode::Transpile).unwrap()
    else {
        panic!("expected text");
    };
    assert_eq!(text.lines().count(), 20_000);
}

#[test]
fn runtime_errors_carry_positions() {
    let error = assert_failure("var x = 1;\nx / 0");
    assert_eq!(error.to_string(), "Error at row 2, column 3: Division by zero.");
}

#[test]
fn parse_errors_are_reported() {
    assert!(matches!(assert_failure("var = 1"), Error::Parse(_)));
    assert!(matches!(assert_failure("1 2"), Error::Parse(_)));
    assert!(matches!(assert_failure("print 'open"), Error::Parse(_)));
}

#[test]
fn files_round_trip() {
    let dir = TempDir::new().unwrap();
    let config = Config::default().with_search_dir(dir.path());

    let src = "var f = open('out.txt', 'w'); f.write('hello'); close(f); var g = open('out.txt'); read(g)";
    assert_eq!(run_with(config, src).unwrap(), Value::from("hello"));
    assert_eq!(fs::read_to_string(dir.path().join("out.txt")).unwrap(), "hello");
}

#[test]
fn files_respect_their_open_mode() {
    let dir = TempDir::new().unwrap();
    let config = Config::default().with_search_dir(dir.path());

    let error = run_with(config.clone(), "var f = open('log.txt', 'a'); write(f, 'x'); read(f)").unwrap_err();
    assert!(matches!(error, Error::Runtime(RuntimeError::InvalidArgument { .. })), "{error}");

    let error = run_with(config, "var f = open('log.txt'); write(f, 'y')").unwrap_err();
    assert!(matches!(error, Error::Runtime(RuntimeError::InvalidArgument { .. })), "{error}");
    assert_eq!(fs::read_to_string(dir.path().join("log.txt")).unwrap(), "x");
}

#[test]
fn imports_share_the_environment() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("lib.soul"), "func triple(x) { x * 3 }; var loaded = True").unwrap();
    let config = Config::default().with_search_dir(dir.path());

    assert_eq!(run_with(config.clone(), "import lib; triple(4)").unwrap(), Value::Integer(12));
    assert_eq!(run_with(config.clone(), "soul lib; loaded").unwrap(), Value::Bool(true));
    assert!(matches!(run_with(config, "import missing"),
                     Err(Error::Runtime(RuntimeError::Io { .. }))));
}

#[test]
fn broken_imports_are_import_errors() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("broken.soul"), "var = 1").unwrap();
    let config = Config::default().with_search_dir(dir.path());

    assert!(matches!(run_with(config, "import broken"),
                     Err(Error::Runtime(RuntimeError::Import { .. }))));
}

#[test]
fn cyclic_imports_exhaust_the_stack() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("again.soul"), "import again").unwrap();
    fs::write(dir.path().join("ping.soul"), "import pong").unwrap();
    fs::write(dir.path().join("pong.soul"), "import ping").unwrap();
    let config = Config { max_call_depth: 20,
                          ..Config::default().with_search_dir(dir.path()) };

    for src in ["import again", "import ping", "import -c again"] {
        let error = run_with(config.clone(), src).unwrap_err();
        assert!(matches!(error, Error::Runtime(RuntimeError::StackExhausted { .. })),
                "{src}: {error}");
    }

    let error = process_source(&mut context(config), "import ping", Mode::Transpile).unwrap_err();
    assert!(matches!(error, Error::Runtime(RuntimeError::StackExhausted { .. })));
}

#[test]
fn compiled_imports_write_nim() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("lib.soul"), "func triple(x: int) int { return x * 3 }").unwrap();
    let config = Config::default().with_search_dir(dir.path());

    let report = run_with(config, "import -c lib").unwrap();
    assert!(report.to_string().starts_with("Compiled in: "));

    let generated = fs::read_to_string(dir.path().join("lib.nim")).unwrap();
    assert_eq!(generated, "proc triple(x: int): int =\n    return x * 3\n");
}

#[test]
fn transpiling_a_file() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("main.soul");
    fs::write(&source,
              "|greeting|;\n$ var n = 2 * 21;\nvar answer = $ n;\nif answer > 40 {\n  print 'big'\n} else {\n  print 'small'\n}")
        .unwrap();

    let report = transpile_file(&source, Config::default().with_search_dir(dir.path())).unwrap();
    assert_eq!(report.target, dir.path().join("main.nim"));

    let expected = "# greeting\nvar answer = 42\nif answer > 40:\n    echo \"big\"\nelse:\n    echo \"small\"\n";
    assert_eq!(fs::read_to_string(&report.target).unwrap(), expected);
}

#[test]
fn transpile_mode_shares_bindings_with_interpretation() {
    let mut context = context(Config::default());
    process_source(&mut context, "var width = 8", Mode::Interpret).unwrap();

    let Output::Text(text) = process_source(&mut context, "var area = $ width * width", Mode::Transpile).unwrap()
    else {
        panic!("expected text");
    };
    assert_eq!(text, "var area = 64");
}

#[test]
fn demo_scripts_run() {
    let mut count = 0;

    for entry in WalkDir::new("demos").into_iter()
                                      .filter_map(Result::ok)
                                      .filter(|e| e.path().extension().is_some_and(|ext| ext == "soul"))
    {
        let path = entry.path();
        let src = fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));
        let dir = path.parent().unwrap_or_else(|| Path::new("."));

        count += 1;
        if let Err(e) = run_with(Config::default().with_search_dir(dir), &src) {
            panic!("Demo {path:?} failed:\n{src}\nError: {e}");
        }
    }

    assert!(count > 0, "No demo scripts found in demos/");
}
