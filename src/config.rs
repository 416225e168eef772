/// Limits applied to one interpreter run.
///
/// The defaults are generous enough for ordinary scripts while still turning
/// adversarial input into a located error instead of a crash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Deepest allowed nesting of expressions and statement bodies.
    pub max_nesting_depth: usize,
    /// Deepest allowed chain of active user function calls.
    pub max_call_depth:    usize,
    /// Total statements and loop iterations a run may execute; unlimited when
    /// `None`.
    pub step_limit:        Option<u64>,
}

/// Default for [`Config::max_nesting_depth`].
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 256;
/// Default for [`Config::max_call_depth`].
pub const DEFAULT_MAX_CALL_DEPTH: usize = 512;

impl Default for Config {
    fn default() -> Self {
        Self { max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
               max_call_depth:    DEFAULT_MAX_CALL_DEPTH,
               step_limit:        None, }
    }
}
