use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

pub struct FxHelper {
    commands: Vec<String>,
    functions: Vec<String>,
}

impl FxHelper {
    pub fn new() -> Self {
        Self {
            commands: [
                "help", "vars", "clear", "let", "solve", "steps on", "steps off", "mode", "const",
                "unconst", "save", "show", "list", "del", "quit", "exit",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            functions: [
                "sin", "cos", "tan", "log", "asin", "acos", "atan", "sqrt", "root", "frac",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

fn extract_word(line: &str, pos: usize) -> (usize, &str) {
    let head = &line[..pos];
    let start = head
        .rfind(|c: char| !c.is_ascii_alphanumeric() && c != '_')
        .map(|i| i + 1)
        .unwrap_or(0);
    (start, &head[start..])
}

impl Completer for FxHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> Result<(usize, Vec<Pair>), ReadlineError> {
        let (start, word) = extract_word(line, pos);
        if word.is_empty() {
            return Ok((start, Vec::new()));
        }

        let mut matches = Vec::new();
        for candidate in self.commands.iter().chain(self.functions.iter()) {
            if candidate.starts_with(word) {
                matches.push(Pair {
                    display: candidate.clone(),
                    replacement: candidate.clone(),
                });
            }
        }

        Ok((start, matches))
    }
}

impl Hinter for FxHelper {
    type Hint = String;

    fn hint(&self, _line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<String> {
        None
    }
}

impl Highlighter for FxHelper {}
impl Validator for FxHelper {}
impl Helper for FxHelper {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_extraction_stops_at_boundaries() {
        assert_eq!(extract_word("solve x", 5), (0, "solve"));
        assert_eq!(extract_word("1+sq", 4), (2, "sq"));
        assert_eq!(extract_word("", 0), (0, ""));
    }
}
