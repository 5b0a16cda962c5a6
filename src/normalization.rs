use indexmap::IndexSet;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// Removes the leading `#`, lower-cases, and drops any token that contains a
/// stop word anywhere inside it. Survivors keep their order.
pub fn filter_hashtags<S: AsRef<str>>(tokens: &[S], stop_words: &IndexSet<String>) -> Vec<String> {
    tokens
        .iter()
        .map(|token| token.as_ref().trim_start_matches('#').to_lowercase())
        .filter(|word| !stop_words.iter().any(|stop| word.contains(stop.as_str())))
        .collect()
}

/// A single string transform in the cleaning pipeline.
pub trait TextStage: Send + Sync {
    fn name(&self) -> &str;
    fn apply(&self, input: &str) -> String;
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RewriteRule {
    pub name: String,
    pub pattern: String,
    pub replace: String,
}

impl RewriteRule {
    pub fn new(name: &str, pattern: &str, replace: &str) -> Self {
        Self {
            name: name.to_string(),
            pattern: pattern.to_string(),
            replace: replace.to_string(),
        }
    }

    pub fn compile(&self) -> Result<CompiledRule, DataError> {
        Ok(CompiledRule {
            name: self.name.clone(),
            regex: Regex::new(&self.pattern)?,
            replace: self.replace.clone(),
        })
    }
}

#[derive(Clone, Debug)]
pub struct CompiledRule {
    name: String,
    regex: Regex,
    replace: String,
}

impl TextStage for CompiledRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, input: &str) -> String {
        self.regex.replace_all(input, self.replace.as_str()).into_owned()
    }
}

/// Rewrites whitelisted contractions to their apostrophe-free spelling so the
/// possessive pass does not clip them ("it's" -> "its").
#[derive(Clone, Debug)]
pub struct ContractionStage {
    words: Vec<String>,
}

impl ContractionStage {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }
}

impl TextStage for ContractionStage {
    fn name(&self) -> &str {
        "uncontract"
    }

    fn apply(&self, input: &str) -> String {
        self.words.iter().fold(input.to_string(), |text, word| {
            text.replace(word.as_str(), &word.replace('\'', ""))
        })
    }
}

#[derive(Debug, Serialize)]
pub struct NormalizeTrace {
    pub raw: String,
    pub normalized: String,
    pub applied_rules: Vec<String>,
}

/// Ordered list of text stages. Later stages assume the earlier ones ran.
#[derive(Default)]
pub struct CleaningPipeline {
    stages: Vec<Box<dyn TextStage>>,
}

impl CleaningPipeline {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    pub fn with_stage(mut self, stage: impl TextStage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn push(&mut self, stage: Box<dyn TextStage>) {
        self.stages.push(stage);
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Display-text cleaning for tweets: links, retweet prefix, mentions,
    /// hyphens, trailing blanks, smart apostrophes, contractions, possessives.
    pub fn tweet_text<I, S>(contractions: I) -> Result<Self, DataError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut pipeline = Self::new();
        for rule in [
            RewriteRule::new("strip_urls", r"https?://\S+", ""),
            RewriteRule::new("strip_retweet_prefix", r"^RT @[^ ]* ", ""),
            RewriteRule::new("strip_mentions", r"@[^ ]* ", ""),
            RewriteRule::new("hyphens_to_spaces", r"-", " "),
            RewriteRule::new("trim_trailing", r"[ \t]+$", ""),
            RewriteRule::new("straighten_apostrophes", "\u{2019}", "'"),
        ] {
            pipeline.push(Box::new(rule.compile()?));
        }
        pipeline.push(Box::new(ContractionStage::new(contractions)));
        pipeline.push(Box::new(
            RewriteRule::new("strip_possessive", r"('s)([^a-zA-Z0-9])", "${2}").compile()?,
        ));
        Ok(pipeline)
    }

    pub fn run(&self, raw: &str) -> String {
        self.stages
            .iter()
            .fold(raw.to_string(), |current, stage| stage.apply(&current))
    }

    pub fn run_traced(&self, raw: &str) -> (String, NormalizeTrace) {
        let mut current = raw.to_string();
        let mut applied_rules = Vec::new();

        for stage in &self.stages {
            let next = stage.apply(&current);
            if next != current {
                applied_rules.push(stage.name().to_string());
                current = next;
            }
        }

        (
            current.clone(),
            NormalizeTrace {
                raw: raw.to_string(),
                normalized: current,
                applied_rules,
            },
        )
    }
}
