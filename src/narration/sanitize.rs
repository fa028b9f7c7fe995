use regex::Regex;

use crate::foundation::error::{VizError, VizResult};

/// Big-O spellings and how they are read out. Longer forms come first so `O(N log N)` is not
/// split by the `O(N)` rule.
const BIG_O: &[(&str, &str)] = &[
    (r"O\(\s*N\s*\^\s*2\s*\)", "O of N squared"),
    (r"O\(\s*N\s+log\s*N\s*\)", "O of N log N"),
    (r"O\(\s*log\s*N\s*\)", "O of log N"),
    (r"O\(\s*N\s*\)", "O of N"),
    (r"O\(\s*1\s*\)", "O of 1"),
];

/// Cleans narration text before it is handed to a local speech synthesizer.
///
/// Markdown artifacts that synthesizers read literally are removed: backticks, and quotes
/// wrapped around a single word. Big-O notation is verbalized and whitespace collapsed.
#[derive(Clone, Debug)]
pub struct SpeechSanitizer {
    single_quoted: Regex,
    double_quoted: Regex,
    big_o: Vec<(Regex, &'static str)>,
    whitespace: Regex,
}

fn compile(pattern: &str) -> VizResult<Regex> {
    Regex::new(pattern).map_err(|e| VizError::narration(format!("sanitizer pattern: {e}")))
}

impl SpeechSanitizer {
    pub fn new() -> VizResult<Self> {
        Ok(Self {
            single_quoted: compile(r"'(\w+)'")?,
            double_quoted: compile(r#""(\w+)""#)?,
            big_o: BIG_O
                .iter()
                .map(|(pattern, spoken)| Ok((compile(pattern)?, *spoken)))
                .collect::<VizResult<_>>()?,
            whitespace: compile(r"\s+")?,
        })
    }

    /// Text as it should be spoken.
    pub fn clean(&self, text: &str) -> String {
        let mut out = text.replace('`', "");
        out = self.single_quoted.replace_all(&out, "$1").into_owned();
        out = self.double_quoted.replace_all(&out, "$1").into_owned();
        for (re, spoken) in &self.big_o {
            out = re.replace_all(&out, *spoken).into_owned();
        }
        self.whitespace.replace_all(&out, " ").trim().to_owned()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/narration/sanitize.rs"]
mod tests;
