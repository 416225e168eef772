use std::{fs, path::Path};

use cinder::{Bindings, Error, Interpreter};
use pretty_assertions::assert_eq;
use walkdir::WalkDir;

/// Renders an error and, for runtime errors, the error that started it.
fn describe(error: &Error) -> String {
    match error {
        Error::Runtime(runtime) => format!("{error}\n{}", runtime.root_cause()),
        other => other.to_string(),
    }
}

fn run_fixture(path: &Path) {
    let source =
        fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));
    let file = path.file_name().unwrap().to_string_lossy();

    let mut interpreter = Interpreter::new().capture_output();
    let result = interpreter.run_named(&source, &file, &mut Bindings::new());
    let output = interpreter.take_output();

    let expected_error = fs::read_to_string(path.with_extension("err")).ok();
    match (result, expected_error) {
        (Ok(_), Some(expected)) => {
            panic!("{path:?} succeeded but was expected to fail with {:?}", expected.trim())
        },
        (Err(e), None) => panic!("{path:?} failed: {}", describe(&e)),
        (Err(e), Some(expected)) => {
            let message = describe(&e);
            for line in expected.lines().filter(|line| !line.trim().is_empty()) {
                assert!(message.contains(line.trim()),
                        "{path:?}: expected {line:?} in error:\n{message}");
            }
        },
        (Ok(_), None) => {},
    }

    if let Ok(expected) = fs::read_to_string(path.with_extension("out")) {
        assert_eq!(output, expected.lines().collect::<Vec<_>>(), "output of {path:?}");
    }
}

#[test]
fn fixture_programs() {
    let mut count = 0;

    let is_program = |path: &Path| path.extension().is_some_and(|ext| ext == "cin");

    for entry in WalkDir::new("tests/programs").sort_by_file_name()
                                               .into_iter()
                                               .filter_map(Result::ok)
                                               .filter(|e| is_program(e.path()))
    {
        count += 1;
        run_fixture(entry.path());
    }

    assert!(count > 0, "No programs found in tests/programs");
}
