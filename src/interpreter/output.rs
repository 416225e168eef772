/// Destination for lines written by the `log` builtin.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Output {
    /// Print each line to standard output.
    #[default]
    Stdout,
    /// Keep lines in memory, for hosts and tests that inspect them.
    Buffer(Vec<String>),
    /// Discard everything.
    Silent,
}

impl Output {
    /// Creates an empty in-memory buffer.
    #[must_use]
    pub const fn buffer() -> Self {
        Self::Buffer(Vec::new())
    }

    /// Writes one line.
    pub fn println(&mut self, line: String) {
        match self {
            Self::Stdout => println!("{line}"),
            Self::Buffer(lines) => lines.push(line),
            Self::Silent => {},
        }
    }

    /// Lines captured so far; always empty unless buffering.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        match self {
            Self::Buffer(lines) => lines,
            Self::Stdout | Self::Silent => &[],
        }
    }

    /// Removes and returns the captured lines.
    pub fn take(&mut self) -> Vec<String> {
        match self {
            Self::Buffer(lines) => std::mem::take(lines),
            Self::Stdout | Self::Silent => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_collects_lines() {
        let mut output = Output::buffer();
        output.println("a".to_string());
        output.println("b".to_string());

        assert_eq!(output.lines(), ["a", "b"]);
        assert_eq!(output.take(), vec!["a", "b"]);
        assert!(output.lines().is_empty());
    }

    #[test]
    fn silent_discards() {
        let mut output = Output::Silent;
        output.println("gone".to_string());

        assert!(output.lines().is_empty());
    }
}
