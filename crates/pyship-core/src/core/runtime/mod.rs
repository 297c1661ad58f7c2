pub mod effects;
pub mod process;

/// A typed external command: program plus argv, never a shell string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub description: String,
    pub program: String,
    pub args: Vec<String>,
    /// Inherit stdin so the tool can prompt (upload credentials).
    pub interactive: bool,
}

impl ToolInvocation {
    pub fn new<I, S>(description: impl Into<String>, program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            description: description.into(),
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            interactive: false,
        }
    }

    /// `python -m <module> <args...>`
    pub fn python_module<I, S>(
        description: impl Into<String>,
        python: &str,
        module: &str,
        args: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv = ["-m".to_string(), module.to_string()]
            .into_iter()
            .chain(args.into_iter().map(Into::into));
        Self::new(description, python, argv)
    }

    #[must_use]
    pub fn interactive(mut self) -> Self {
        self.interactive = true;
        self
    }

    /// Renders the invocation for humans. Quoting here is cosmetic only.
    #[must_use]
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(display_quote)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn display_quote(word: &str) -> String {
    let plain = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:@+,%".contains(c));
    if plain {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}
