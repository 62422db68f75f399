use crate::error::Result;
use std::io::{self, BufRead, Write};

/// Asks the user a yes/no question.
pub trait Prompt {
    fn confirm(&mut self, message: &str, default_yes: bool) -> Result<bool>;
}

/// Line-based prompt over any reader/writer pair.
///
/// Accepts `y`, `Y`, `n`, `N` or an empty line (the default answer) and asks
/// again on anything else. End of input is treated as the default answer.
pub struct LinePrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl LinePrompt<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompt for LinePrompt<R, W> {
    fn confirm(&mut self, message: &str, default_yes: bool) -> Result<bool> {
        let hint = if default_yes { "(Y/n)" } else { "(y/N)" };

        loop {
            write!(self.output, "{message} {hint}: ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                return Ok(default_yes);
            }

            match line.trim_end_matches(['\r', '\n']) {
                "" => return Ok(default_yes),
                "y" | "Y" => return Ok(true),
                "n" | "N" => return Ok(false),
                _ => continue,
            }
        }
    }
}
