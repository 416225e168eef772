use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult, lexer::Location, output::Output, value::core::Value,
    },
    util::num::{non_negative, usize_to_i64_checked},
};

/// Rejects an argument list that does not fit a builtin's own pattern.
///
/// Registered builtins have their signature checked before they run, so this
/// only fires when one is called directly with the wrong arguments.
fn bad_arguments(name: &str, args: &[Value], location: &Location) -> RuntimeError {
    let found = args.iter().map(Value::type_name).collect::<Vec<_>>().join(", ");
    RuntimeError::type_mismatch(format!("invalid arguments to '{name}': ({found})"), location)
}

/// `string(x)`: the display form of any value.
///
/// # Example
/// ```
/// use cinder::interpreter::{
///     evaluator::function::builtin::string, lexer::Location, output::Output, value::core::Value,
/// };
///
/// let list = Value::from(vec![Value::Int(1), "a".into()]);
/// let result = string(&[list], &mut Output::Silent, &Location::default()).unwrap();
///
/// assert_eq!(result, Value::from("[1, 'a']"));
/// ```
pub fn string(args: &[Value], _output: &mut Output, location: &Location) -> EvalResult<Value> {
    match args {
        [value] => Ok(Value::String(value.to_string())),
        _ => Err(bad_arguments("string", args, location)),
    }
}

/// `length(x)`: characters in a string, elements in a list or dict.
pub fn length(args: &[Value], _output: &mut Output, location: &Location) -> EvalResult<Value> {
    let len = match args {
        [Value::String(s)] => s.chars().count(),
        [Value::List(items)] => items.len(),
        [Value::Dict(entries)] => entries.len(),
        [other] => {
            return Err(RuntimeError::type_mismatch(format!("length of {} is undefined",
                                                           other.type_name()),
                                                   location));
        },
        _ => return Err(bad_arguments("length", args, location)),
    };
    Ok(Value::Int(usize_to_i64_checked(len, location)?))
}

/// `substr(s, start, count)`: up to `count` characters of `s` starting at
/// character `start`.
///
/// A `start` equal to the length yields the empty string; past it is out of
/// bounds. `count` is clamped to what remains.
pub fn substr(args: &[Value], _output: &mut Output, location: &Location) -> EvalResult<Value> {
    let [Value::String(s), Value::Int(start), Value::Int(count)] = args else {
        return Err(bad_arguments("substr", args, location));
    };

    let len = s.chars().count();
    let from = non_negative(*start, "substring start", location)?;
    let count = non_negative(*count, "substring length", location)?;
    if from > len {
        return Err(RuntimeError::IndexOutOfBounds { index: *start,
                                                    len,
                                                    location: location.clone() });
    }

    Ok(Value::String(s.chars().skip(from).take(count).collect()))
}

/// `getenv(name)`: the environment variable `name`, or null when it is unset
/// or not valid unicode.
pub fn getenv(args: &[Value], _output: &mut Output, location: &Location) -> EvalResult<Value> {
    match args {
        [Value::String(name)] => Ok(std::env::var(name).map_or(Value::Null, Value::String)),
        _ => Err(bad_arguments("getenv", args, location)),
    }
}
