//! Line-based terminal prompts.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use t4b_core::confirm::Confirm;

/// Reads answers from `input` and writes questions to `output`.
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl Prompt<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Asks `question` and returns the trimmed answer, or `None` at end of input.
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be read or written.
    pub fn line(&mut self, question: &str) -> Result<Option<String>> {
        write!(self.output, "{question}").context("write prompt")?;
        self.output.flush().context("flush prompt")?;

        let mut answer = String::new();
        let read = self.input.read_line(&mut answer).context("read answer")?;
        if read == 0 {
            writeln!(self.output).ok();
            return Ok(None);
        }
        Ok(Some(answer.trim().to_string()))
    }

    /// Asks until a non-empty answer is given.
    ///
    /// # Errors
    /// Fails at end of input.
    pub fn required(&mut self, question: &str) -> Result<String> {
        loop {
            match self.line(question)? {
                Some(answer) if !answer.is_empty() => return Ok(answer),
                Some(_) => {}
                None => anyhow::bail!("Cancelled"),
            }
        }
    }

    /// Asks once; an empty answer or end of input yields `None`.
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be read or written.
    pub fn optional(&mut self, question: &str) -> Result<Option<String>> {
        Ok(self.line(question)?.filter(|a| !a.is_empty()))
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    /// Writes a line of output between questions.
    pub fn say(&mut self, message: &str) {
        writeln!(self.output, "{message}").ok();
    }
}

impl<R: BufRead, W: Write> Confirm for Prompt<R, W> {
    fn confirm(&mut self, message: &str) -> Result<bool> {
        let answer = self.line(&format!("{message} [y/N] "))?.unwrap_or_default();
        Ok(matches!(
            answer.to_lowercase().as_str(),
            "y" | "yes" | "s" | "sim"
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn prompt(input: &str) -> Prompt<Cursor<Vec<u8>>, Vec<u8>> {
        Prompt::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_confirm_answers() {
        for (input, expected) in [
            ("y\n", true),
            ("SIM\n", true),
            ("s\n", true),
            ("n\n", false),
            ("\n", false),
            ("", false),
        ] {
            assert_eq!(prompt(input).confirm("Excluir?").unwrap(), expected, "{input:?}");
        }
    }

    #[test]
    fn test_confirm_writes_message_once() {
        let mut p = prompt("y\n");
        p.confirm("Excluir?").unwrap();
        let shown = String::from_utf8(p.output).unwrap();
        assert_eq!(shown.matches("Excluir?").count(), 1);
    }

    #[test]
    fn test_required_skips_blank_and_fails_at_eof() {
        let mut p = prompt("\n  \nCaloi\n");
        assert_eq!(p.required("Marca: ").unwrap(), "Caloi");
        assert!(p.required("Modelo: ").is_err());
    }

    #[test]
    fn test_optional() {
        let mut p = prompt("\nazul\n");
        assert_eq!(p.optional("Cor: ").unwrap(), None);
        assert_eq!(p.optional("Cor: ").unwrap().as_deref(), Some("azul"));
        assert_eq!(p.optional("Ano: ").unwrap(), None);
    }
}
