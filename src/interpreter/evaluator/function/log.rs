use crate::interpreter::{
    evaluator::core::EvalResult, lexer::Location, output::Output, value::core::Value,
};

/// `log(...)`: writes the display forms of its arguments, separated by single
/// spaces, as one line of output. Returns null.
///
/// # Example
/// ```
/// use cinder::interpreter::{
///     evaluator::function::log::log, lexer::Location, output::Output, value::core::Value,
/// };
///
/// let mut output = Output::buffer();
/// let args = [Value::from("x ="), Value::Int(3), Value::Float(0.5)];
///
/// assert_eq!(log(&args, &mut output, &Location::default()).unwrap(), Value::Null);
/// assert_eq!(output.lines(), ["x = 3 0.5"]);
/// ```
pub fn log(args: &[Value], output: &mut Output, _location: &Location) -> EvalResult<Value> {
    let line = args.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ");
    output.println(line);
    Ok(Value::Null)
}
