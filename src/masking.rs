//! Collapses recognised entity phrases into a neutral token before counting.

use crate::config::MASK_TOKEN;
use crate::error::DataError;
use regex::{Regex, RegexBuilder};

// The place-name alternation is large; raise the compile limit accordingly.
const MASK_REGEX_SIZE_LIMIT: usize = 64 * (1 << 20);

pub struct TermMasker {
    pattern: Option<Regex>,
    possessive: Regex,
}

impl TermMasker {
    /// Each group becomes its own `\b(?:...)\b` alternation; groups are tried
    /// in the order given and, within a group, terms in list order.
    pub fn new(groups: &[Vec<String>]) -> Result<Self, DataError> {
        let alternations: Vec<String> = groups
            .iter()
            .map(|terms| {
                terms
                    .iter()
                    .filter(|t| !t.is_empty())
                    .map(|t| regex::escape(t))
                    .collect::<Vec<_>>()
            })
            .filter(|escaped| !escaped.is_empty())
            .map(|escaped| format!(r"\b(?:{})\b", escaped.join("|")))
            .collect();

        let pattern = if alternations.is_empty() {
            None
        } else {
            Some(
                RegexBuilder::new(&alternations.join("|"))
                    .case_insensitive(true)
                    .size_limit(MASK_REGEX_SIZE_LIMIT)
                    .dfa_size_limit(MASK_REGEX_SIZE_LIMIT)
                    .build()?,
            )
        };
        let possessive = Regex::new(&format!(r"\b{}'s\b", MASK_TOKEN))?;

        Ok(Self {
            pattern,
            possessive,
        })
    }

    /// Lower-cases the text, then replaces every matched phrase with `na`.
    pub fn mask(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let masked = match &self.pattern {
            Some(pattern) => pattern.replace_all(&lowered, MASK_TOKEN).into_owned(),
            None => lowered,
        };
        self.possessive.replace_all(&masked, MASK_TOKEN).into_owned()
    }
}
