use cinder::{
    Bindings, Error, Interpreter,
    config::Config,
    error::{ParseError, RuntimeError},
    interpret_and_execute,
    interpreter::value::core::Value,
};
use indoc::indoc;
use pretty_assertions::assert_eq;

fn eval(src: &str) -> Value {
    interpret_and_execute(Some(src), &mut Bindings::new()).unwrap_or_else(|e| {
                                                               panic!("Script failed: {e}\n{src}")
                                                           })
}

fn assert_value(src: &str, expected: impl Into<Value>) {
    assert_eq!(eval(src), expected.into(), "{src}");
}

fn assert_success(src: &str) {
    if let Err(e) = interpret_and_execute(Some(src), &mut Bindings::new()) {
        panic!("Script failed: {e}\n{src}");
    }
}

fn assert_failure(src: &str) -> Error {
    match interpret_and_execute(Some(src), &mut Bindings::new()) {
        Ok(value) => panic!("Script succeeded with {value} but was expected to fail\n{src}"),
        Err(e) => e,
    }
}

fn runtime_failure(src: &str) -> RuntimeError {
    match assert_failure(src) {
        Error::Runtime(e) => e.root_cause().clone(),
        other => panic!("expected a runtime error, got {other}"),
    }
}

fn logged(src: &str) -> Vec<String> {
    let mut interpreter = Interpreter::new().capture_output();
    interpreter.run(Some(src), &mut Bindings::new())
               .unwrap_or_else(|e| panic!("Script failed: {e}\n{src}"));
    interpreter.take_output()
}

#[test]
fn precedence_and_associativity() {
    assert_value("1 + 2 * 3 + 4", Value::Int(11));
    assert_value("(1 + 2) * (3 + 4)", Value::Int(21));
    assert_value("8 - 4 - 2", Value::Int(2));
    assert_value("1 + 2 + 3", Value::Int(6));
    assert_value("2 * -3", Value::Int(-6));
    assert_value("1 << 2 + 1", Value::Int(8));
    assert_value("6 & 3 | 8", Value::Int(10));
    assert_value("!true || true", true);
    assert_value("-2 - -2", Value::Int(0));
}

#[test]
fn logical_operators_need_booleans() {
    assert_value("true && false", false);
    assert_value("false || true", true);
    assert!(matches!(runtime_failure("1 && true"), RuntimeError::ExpectedBoolean { .. }));
    assert!(matches!(runtime_failure("if (0) 1;"), RuntimeError::ExpectedBoolean { .. }));
}

#[test]
fn increment_and_compound_assignment() {
    let mut bindings = Bindings::from([("a".to_string(), Value::Int(3))]);
    let result = interpret_and_execute(Some("a++ + 3"), &mut bindings).unwrap();
    assert_eq!(result, Value::Int(6));
    assert_eq!(bindings["a"], Value::Int(4));

    let mut bindings = Bindings::from([("a".to_string(), Value::Int(3))]);
    let result = interpret_and_execute(Some("++a + 3"), &mut bindings).unwrap();
    assert_eq!(result, Value::Int(7));
    assert_eq!(bindings["a"], Value::Int(4));

    assert_value("x = 10; x -= 3; x *= 2; x", Value::Int(14));
    assert_value("x = 7; x %= 4; x <<= 3; x", Value::Int(24));
    assert_value("s = 'a'; s += 'b'; s", "ab");
    assert_value("f = 2; f *= 2.5; f", 5.0);
    assert_value("x = 1; y = (x += 4); y", Value::Int(5));
    assert!(matches!(runtime_failure("f = 1.5; f++;"), RuntimeError::TypeMismatch { .. }));
}

#[test]
fn strings() {
    assert_value("'hello' + ' there'", "hello there");
    assert_value("'-' * 3", "---");
    assert_value("3 * 'ab'", "ababab");
    assert_value("\"it's\"", "it's");
    assert_value("'abc'[1]", "b");
    assert_value("'b' < 'c'", true);
    assert!(matches!(runtime_failure("'-' * -1"), RuntimeError::InvalidArgument { .. }));
    assert!(matches!(runtime_failure("'a' + 1"), RuntimeError::TypeMismatch { .. }));
}

#[test]
fn arithmetic_rules() {
    assert_value("7 / 2", Value::Int(3));
    assert_value("-7 / 2", Value::Int(-3));
    assert_value("-7 % 2", Value::Int(-1));
    assert_value("1 + 0.5", 1.5);
    assert_value("4 == 4.0", false);
    assert_value("4 != '4'", true);
    assert_value("1 < 2 ? 'yes' : 'no'", "yes");
    assert_value("x = 5; x < 3 ? 0 : x < 4 ? 1 : 2", Value::Int(2));

    assert!(matches!(runtime_failure("1 / 0"), RuntimeError::DivisionByZero { .. }));
    assert!(matches!(runtime_failure("1 % 0"), RuntimeError::DivisionByZero { .. }));
    assert!(matches!(runtime_failure("1.0 / 0.0"), RuntimeError::DivisionByZero { .. }));
    assert!(matches!(runtime_failure("9223372036854775807 + 1"),
                     RuntimeError::Overflow { .. }));
    assert!(matches!(runtime_failure("1 < 'a'"), RuntimeError::TypeMismatch { .. }));
    assert!(matches!(runtime_failure("1 << 64"), RuntimeError::InvalidArgument { .. }));
}

#[test]
fn for_loop_logs_in_order() {
    assert_eq!(logged("for (i = 0; i < 3; i++) log(i);"), ["0", "1", "2"]);
}

#[test]
fn break_and_continue_affect_the_innermost_loop() {
    let lines = logged(indoc! {"
        for (i = 0; i < 3; i++) {
            for (j = 0; j < 3; j++) {
                if (j == 1) continue;
                if (j == 2) break;
                log(i, j);
            }
            if (i == 1) break;
        }
    "});

    assert_eq!(lines, ["0 0", "1 0"]);
}

#[test]
fn while_loops() {
    assert_value(indoc! {"
        n = 0;
        total = 0;
        while (n < 5) {
            n++;
            if (n == 2) continue;
            total += n;
        }
        total
    "},
                 Value::Int(13));
    assert_value("n = 0; while (true) { if (++n == 4) break; } n", Value::Int(4));
}

#[test]
fn break_outside_a_loop_fails() {
    assert!(matches!(runtime_failure("break;"), RuntimeError::BreakOutsideLoop { .. }));
    assert!(matches!(runtime_failure("continue;"), RuntimeError::ContinueOutsideLoop { .. }));
    assert!(matches!(runtime_failure("function f() { break; } while (true) f();"),
                     RuntimeError::BreakOutsideLoop { .. }));
}

#[test]
fn invalid_assignment_targets_are_rejected() {
    for src in ["1 = 2;", "f() = 1;", "'s'[0] = 'x';", "3++;", "d = {k: 1}; d['k'] = 2;"] {
        assert_failure(src);
    }
    assert!(matches!(runtime_failure("a = 1; b = 2; (a + b) = 3;"),
                     RuntimeError::InvalidAssignmentTarget { .. }));
    assert!(matches!(runtime_failure("a = 1; a++ = 2;"),
                     RuntimeError::InvalidAssignmentTarget { .. }));
}

#[test]
fn lists_and_dicts() {
    assert_value("l = [1, 2, 3,]; l[1] = 20; l[1] + l[2]", Value::Int(23));
    assert_value("d = {name: 'x', 'two words': 2}; d.name = 'y'; d.name + string(d['two words'])",
                 "y2");
    assert_value("d = {}; d.count = 1; d.count += 1; d.count", Value::Int(2));
    assert_value("m = [[1, 2], [3, 4]]; m[1][0] = 30; m[1][0] + m[0][1]", Value::Int(32));
    assert_value("[1, 2] + [3]", Value::from(vec![Value::Int(1), Value::Int(2), Value::Int(3)]));
    assert_value("string({b: 1, a: [true, 2.0, 'x']})", "{a: [true, 2.0, 'x'], b: 1}");
    assert_value("{a: 1} == {a: 1}", true);

    assert!(matches!(runtime_failure("l = [1]; l[1] = 2;"),
                     RuntimeError::IndexOutOfBounds { index: 1, len: 1, .. }));
    assert!(matches!(runtime_failure("l = [1]; l[-1]"), RuntimeError::IndexOutOfBounds { .. }));
    assert!(matches!(runtime_failure("d = {}; d.missing"), RuntimeError::KeyNotFound { .. }));
}

#[test]
fn containers_have_value_semantics() {
    let mut bindings = Bindings::new();
    let src = "a = [1, 2]; b = a; b[0] = 9; d = {x: a}; d.x[1] = 7;";
    interpret_and_execute(Some(src), &mut bindings).unwrap();

    assert_eq!(bindings["a"], Value::from(vec![Value::Int(1), Value::Int(2)]));
    assert_eq!(bindings["b"], Value::from(vec![Value::Int(9), Value::Int(2)]));
    assert_eq!(eval("a = [1]; function f(l) { l[0] = 5; return l; } f(a)[0] + a[0]"),
               Value::Int(6));
}

#[test]
fn functions_and_closures() {
    assert_value("function add(a, b) { return a + b; } add(2, 3)", Value::Int(5));
    assert_value("function nothing() { } nothing()", Value::Null);
    assert_value("function fact(n) { return n < 2 ? 1 : n * fact(n - 1); } fact(10)",
                 Value::Int(3_628_800));
    assert_value("sq = function (x) { return x * x; }; sq(7)", Value::Int(49));
    assert_value("(function (x) { return x + 1; })(1)", Value::Int(2));

    assert_value(indoc! {"
        function counter() {
            count = 0;
            return function () { return ++count; };
        }
        next = counter();
        next();
        next();
        next()
    "},
                 Value::Int(3));

    assert_value(indoc! {"
        function adder(n) { return function (x) { return x + n; }; }
        add2 = adder(2);
        add10 = adder(10);
        add2(1) + add10(1)
    "},
                 Value::Int(14));

    // a named literal sees itself
    assert_value("f = function fib(n) { return n < 2 ? n : fib(n - 1) + fib(n - 2); }; f(10)",
                 Value::Int(55));
}

#[test]
fn functions_assign_to_the_scope_that_owns_the_name() {
    let mut bindings = Bindings::new();
    let src = "total = 0; function bump(n) { total += n; local = n; } bump(2); bump(3);";
    interpret_and_execute(Some(src), &mut bindings).unwrap();

    assert_eq!(bindings["total"], Value::Int(5));
    assert!(!bindings.contains_key("local"));
    assert!(!bindings.contains_key("n"));
}

#[test]
fn named_arguments() {
    assert_value("function sub(a, b) { return a - b; } sub(b: 1, a: 10)", Value::Int(9));
    assert_value("function sub(a, b) { return a - b; } sub(10, b: 4)", Value::Int(6));

    assert!(matches!(runtime_failure("function f(a) { } f(b: 1)"),
                     RuntimeError::InvalidArgument { .. }));
    assert!(matches!(runtime_failure("function f(a) { } f(1, a: 1)"),
                     RuntimeError::InvalidArgument { .. }));
    assert!(matches!(runtime_failure("function f(a, b) { } f(1)"),
                     RuntimeError::ArgumentCountMismatch { .. }));
    assert!(matches!(runtime_failure("function f(a) { } f(1, 2)"),
                     RuntimeError::ArgumentCountMismatch { .. }));
    assert!(matches!(runtime_failure("log(x: 1)"), RuntimeError::InvalidArgument { .. }));
}

#[test]
fn builtins() {
    assert_value("length('héllo') + length([1, 2]) + length({a: 1})", Value::Int(8));
    assert_value("substr('hello world', 6, 100)", "world");
    assert_value("string(1.5) + string(length)", "1.5<builtin length>");
    assert_value("f = length; f('abc')", Value::Int(3));
    assert_value("log == log", true);

    assert!(matches!(runtime_failure("length()"), RuntimeError::ArgumentCountMismatch { .. }));
    assert!(matches!(runtime_failure("substr(1, 0, 1)"), RuntimeError::TypeMismatch { .. }));
    assert!(matches!(runtime_failure("3(1)"), RuntimeError::NotCallable { .. }));
    assert!(matches!(runtime_failure("nope"), RuntimeError::UnknownVariable { .. }));
}

#[test]
fn program_result() {
    assert_value("", Value::Null);
    assert_value("x = 1;", Value::Int(1));
    assert_value("1; 2; if (true) { 3; }", Value::Int(2));
    assert_value("return 4; 5", Value::Int(4));
    assert_value("function f() { } ", Value::Null);
    assert_eq!(interpret_and_execute(None, &mut Bindings::new()).unwrap(), Value::Null);
}

#[test]
fn bindings_are_written_back_even_on_failure() {
    let mut bindings = Bindings::from([("seed".to_string(), Value::Int(1))]);

    let result = interpret_and_execute(Some("a = seed + 1; b = a / 0;"), &mut bindings);

    assert!(result.is_err());
    assert_eq!(bindings["seed"], Value::Int(1));
    assert_eq!(bindings["a"], Value::Int(2));
    assert!(!bindings.contains_key("b"));
}

#[test]
fn syntax_errors_leave_bindings_untouched() {
    let mut bindings = Bindings::from([("seed".to_string(), Value::Int(1))]);

    let result = interpret_and_execute(Some("seed = 2; (1 + ;"), &mut bindings);

    assert!(matches!(result, Err(Error::Parse(_))));
    assert_eq!(bindings["seed"], Value::Int(1));
    assert!(matches!(assert_failure("x = 1 @ 2"), Error::Lex(_)));
}

#[test]
fn errors_inside_functions_are_chained() {
    let src = indoc! {"
        function inner() { return 1 / 0; }
        function outer() { return inner(); }
        outer();
    "};

    let Error::Runtime(error) = assert_failure(src) else {
        panic!("expected a runtime error");
    };

    let RuntimeError::InFunction { name, source, .. } = &error else {
        panic!("expected a wrapped error, got {error}");
    };
    assert_eq!(name, "outer");
    assert!(matches!(source.as_ref(), RuntimeError::InFunction { name, .. } if name == "inner"));
    assert!(matches!(error.root_cause(), RuntimeError::DivisionByZero { .. }));
    assert_eq!(error.root_cause().location().line, 1);
}

#[test]
fn limits() {
    let mut interpreter = Interpreter::with_config(Config { step_limit: Some(1_000),
                                                            ..Config::default() });
    let result = interpreter.run(Some("while (true) { }"), &mut Bindings::new());
    assert!(matches!(result,
                     Err(Error::Runtime(RuntimeError::StepLimitExceeded { limit: 1_000, .. }))));

    let mut interpreter = Interpreter::with_config(Config { max_call_depth: 50,
                                                            ..Config::default() });
    let result = interpreter.run(Some("function f(n) { return f(n + 1); } f(0)"),
                                 &mut Bindings::new());
    let Err(Error::Runtime(error)) = result else {
        panic!("expected a runtime error");
    };
    assert!(matches!(error.root_cause(), RuntimeError::CallDepthExceeded { limit: 50, .. }));

    let deep = format!("{}1{}", "(".repeat(5_000), ")".repeat(5_000));
    assert!(matches!(assert_failure(&deep), Error::Parse(_)));

    let limit = Interpreter::new().config().max_nesting_depth;
    let long_sum = vec!["1"; 300_000].join(" + ");
    assert!(matches!(assert_failure(&long_sum),
                     Error::Parse(ParseError::NestingTooDeep { limit: l, .. }) if l == limit));
    let negations = format!("x = {}1;", "- ".repeat(300_000));
    assert!(matches!(assert_failure(&negations),
                     Error::Parse(ParseError::NestingTooDeep { .. })));
    let calls = format!("f{}", "()".repeat(300_000));
    assert!(matches!(assert_failure(&calls), Error::Parse(ParseError::NestingTooDeep { .. })));

    let within = vec!["1"; limit - 1].join(" + ");
    assert_value(&within, Value::Int(i64::try_from(limit - 1).unwrap()));
}

#[test]
fn captured_output() {
    assert_eq!(logged("log('a', 1, 2.5, [1, 'b'], {k: false}); log();"),
               ["a 1 2.5 [1, 'b'] {k: false}", ""]);
}
