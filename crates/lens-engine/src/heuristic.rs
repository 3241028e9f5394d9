//! Keyword-heuristic credibility engine.
//!
//! Scores text from surface signals only: sentiment word lists, emotional
//! and sensational vocabulary, clickbait patterns, fear words, and the
//! reputation of a news domain the text cites. A credibility score starts at
//! 70, loses points for bias and manipulation, and moves with the cited
//! source. This is a heuristic, not a trained model.

use std::fmt;
use std::sync::LazyLock;
use std::time::Instant;

use async_trait::async_trait;
use regex::{Regex, RegexSet};

use lens_core::engine::AnalysisEngine;
use lens_core::entities::{AnalysisResult, ReasoningTraces};
use lens_core::errors::EngineError;

const EMOTIONAL_WORDS: &[&str] = &[
    "shocking",
    "unbelievable",
    "incredible",
    "amazing",
    "terrifying",
    "horrifying",
    "devastating",
    "explosive",
    "breaking",
    "urgent",
    "scandal",
    "exposed",
    "revealed",
    "secret",
    "hidden",
    "banned",
    "miracle",
    "stunning",
    "outrageous",
    "disgusting",
    "horrific",
];

const CLICKBAIT_PATTERNS: &[&str] = &[
    r"you won't believe",
    r"what happens next",
    r"\d+ reasons why",
    r"this is why",
    r"here's what",
    r"the truth about",
    r"\?!+$",
    r"!!!+",
    r"doctors hate",
    r"one weird trick",
];

const FEAR_WORDS: &[&str] = &["danger", "threat", "risk", "warning", "alert", "emergency"];

const POSITIVE_WORDS: &[&str] = &[
    "good",
    "great",
    "excellent",
    "positive",
    "success",
    "achievement",
    "progress",
    "improve",
    "benefit",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad", "terrible", "fail", "crisis", "disaster", "problem", "danger", "threat", "fear", "death",
];

/// Domain reputations in `[0, 1]`.
const RELIABLE_SOURCES: &[(&str, f64)] = &[
    ("reuters.com", 0.95),
    ("apnews.com", 0.95),
    ("bbc.com", 0.90),
    ("bbc.co.uk", 0.90),
    ("nytimes.com", 0.85),
    ("theguardian.com", 0.85),
    ("washingtonpost.com", 0.85),
    ("nature.com", 0.95),
    ("science.org", 0.95),
    ("who.int", 0.95),
    ("cdc.gov", 0.95),
    ("un.org", 0.90),
];

const UNRELIABLE_SOURCES: &[(&str, f64)] = &[
    ("infowars.com", 0.1),
    ("naturalnews.com", 0.15),
    ("beforeitsnews.com", 0.1),
];

/// Reputation given to a linked domain that is in neither table.
const UNKNOWN_SOURCE: f64 = 0.5;

const BASE_CREDIBILITY: i32 = 70;

static CLICKBAIT: LazyLock<Option<RegexSet>> =
    LazyLock::new(|| RegexSet::new(CLICKBAIT_PATTERNS).ok());

static URL_HOST: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"https?://([a-z0-9.-]+)").ok());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    Mixed,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
            Self::Mixed => "mixed",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BiasLevel {
    None,
    Low,
    Medium,
    High,
}

impl BiasLevel {
    fn from_score(score: f64) -> Self {
        if score < 0.2 {
            Self::None
        } else if score < 0.4 {
            Self::Low
        } else if score < 0.7 {
            Self::Medium
        } else {
            Self::High
        }
    }
}

impl fmt::Display for BiasLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiasType {
    Emotional,
    Sensationalist,
}

impl fmt::Display for BiasType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Emotional => "emotional",
            Self::Sensationalist => "sensationalist",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Technique {
    Clickbait,
    EmotionalAppeal,
    AppealToFear,
}

impl fmt::Display for Technique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Clickbait => "clickbait",
            Self::EmotionalAppeal => "emotional appeal",
            Self::AppealToFear => "appeal to fear",
        })
    }
}

/// A news domain cited by the text and its reputation.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    pub domain: String,
    /// In `[0, 1]`.
    pub credibility: f64,
}

impl Source {
    fn describe(&self) -> &'static str {
        if self.credibility > 0.8 {
            "a known reliable source"
        } else if self.credibility < 0.3 {
            "a known unreliable source"
        } else {
            "not a recognized news source"
        }
    }
}

/// Every signal the heuristics extracted from one text.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub sentiment: Sentiment,
    /// In `[-1, 1]`.
    pub sentiment_score: f64,
    pub bias_level: BiasLevel,
    /// In `[0, 1]`.
    pub bias_score: f64,
    pub bias_types: Vec<BiasType>,
    pub techniques: Vec<Technique>,
    /// In `[0, 1]`.
    pub manipulation_score: f64,
    /// First linked URL host, or a known domain mentioned in passing.
    pub source: Option<Source>,
    /// In `[0, 100]`.
    pub credibility: u8,
}

impl Assessment {
    /// Credibility mapped onto the `[0, 1]` result score.
    #[must_use]
    pub fn score(&self) -> f64 {
        f64::from(self.credibility) / 100.0
    }

    #[must_use]
    pub fn finding(&self) -> &'static str {
        if self.credibility >= 70 {
            "Content appears to be credible"
        } else if self.credibility >= 50 {
            "Content has mixed credibility indicators"
        } else {
            "Content shows signs of misinformation"
        }
    }

    /// Advice for the reader, most important first. Never empty.
    #[must_use]
    pub fn recommendations(&self) -> Vec<&'static str> {
        let mut recs = Vec::new();
        if self.credibility < 60 {
            recs.push("Verify information from multiple reliable sources");
            recs.push("Check official sources for confirmation");
        }
        if self.bias_level >= BiasLevel::Medium {
            recs.push("Be aware of potential bias in the content");
            recs.push("Seek alternative perspectives on this topic");
        }
        if !self.techniques.is_empty() {
            recs.push("Be cautious of emotional manipulation in the text");
        }
        if recs.is_empty() {
            recs.push("Information appears reliable");
            recs.push("Continue to verify important claims");
        }
        recs
    }

    #[must_use]
    pub fn traces(&self) -> ReasoningTraces {
        let bias_types = if self.bias_types.is_empty() {
            String::new()
        } else {
            format!(" ({})", join(&self.bias_types))
        };
        let mut tone = format!(
            "Tone is {} (sentiment {:.2}); bias level {}{bias_types}.",
            self.sentiment, self.sentiment_score, self.bias_level
        );
        if self.bias_level >= BiasLevel::Medium {
            tone.push_str(&format!(" Detected {} level of bias.", self.bias_level));
        }
        if self.sentiment == Sentiment::Negative {
            tone.push_str(" Content has predominantly negative tone.");
        }

        let mut consistency = format!("{} (credibility {}/100).", self.finding(), self.credibility);
        if let Some(source) = &self.source {
            consistency.push_str(&format!(" Source {} is {}.", source.domain, source.describe()));
        }
        consistency.push_str(" Recommendations:");
        for rec in self.recommendations() {
            consistency.push(' ');
            consistency.push_str(rec);
            consistency.push('.');
        }

        let manipulation = if self.techniques.is_empty() {
            "No manipulative techniques detected.".to_string()
        } else {
            format!("Manipulative techniques detected: {}.", join(&self.techniques))
        };

        ReasoningTraces {
            tone,
            consistency,
            manipulation,
        }
    }
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Collapse whitespace runs into single spaces and trim.
#[must_use]
pub fn preprocess(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_clickbait(lower: &str) -> bool {
    CLICKBAIT.as_ref().is_some_and(|set| set.is_match(lower))
}

/// Number of vocabulary entries occurring anywhere in `lower` (substring match).
fn count_occurring(vocabulary: &[&str], lower: &str) -> usize {
    vocabulary.iter().filter(|w| lower.contains(*w)).count()
}

#[allow(clippy::cast_precision_loss)]
fn sentiment(lower: &str) -> (Sentiment, f64) {
    let words: std::collections::HashSet<&str> = lower.split_whitespace().collect();
    let positive = POSITIVE_WORDS.iter().filter(|w| words.contains(*w)).count();
    let negative = NEGATIVE_WORDS.iter().filter(|w| words.contains(*w)).count();

    let total = (positive + negative).max(1);
    let score = (positive as f64 - negative as f64) / total as f64;

    let label = if score > 0.2 {
        Sentiment::Positive
    } else if score < -0.2 {
        Sentiment::Negative
    } else if positive > 0 && negative > 0 {
        Sentiment::Mixed
    } else {
        Sentiment::Neutral
    };
    (label, score)
}

fn bias(lower: &str, clickbait: bool) -> (BiasLevel, f64, Vec<BiasType>) {
    let mut types = Vec::new();
    let mut score: f64 = 0.0;

    if count_occurring(EMOTIONAL_WORDS, lower) > 3 {
        types.push(BiasType::Emotional);
        score += 0.3;
    }
    if clickbait {
        types.push(BiasType::Sensationalist);
        score += 0.3;
    }

    let score = score.min(1.0);
    (BiasLevel::from_score(score), score, types)
}

#[allow(clippy::cast_precision_loss)]
fn manipulation(lower: &str, clickbait: bool) -> (Vec<Technique>, f64) {
    let mut techniques = Vec::new();
    if clickbait {
        techniques.push(Technique::Clickbait);
    }
    if count_occurring(EMOTIONAL_WORDS, lower) >= 2 {
        techniques.push(Technique::EmotionalAppeal);
    }
    if count_occurring(FEAR_WORDS, lower) >= 2 {
        techniques.push(Technique::AppealToFear);
    }
    let score = (techniques.len() as f64 * 0.2).min(1.0);
    (techniques, score)
}

fn reputation(domain: &str) -> Option<f64> {
    RELIABLE_SOURCES
        .iter()
        .chain(UNRELIABLE_SOURCES)
        .find(|(known, _)| *known == domain)
        .map(|(_, credibility)| *credibility)
}

/// The host of the first `http(s)` link, else the first known domain
/// mentioned as a bare word.
fn source(lower: &str) -> Option<Source> {
    if let Some(host) = URL_HOST
        .as_ref()
        .and_then(|re| re.captures(lower))
        .and_then(|caps| caps.get(1))
    {
        let domain = host.as_str().trim_end_matches('.');
        let domain = domain.strip_prefix("www.").unwrap_or(domain).to_string();
        let credibility = reputation(&domain).unwrap_or(UNKNOWN_SOURCE);
        return Some(Source {
            domain,
            credibility,
        });
    }

    lower.split_whitespace().find_map(|word| {
        let word = word.trim_matches(|c: char| !c.is_ascii_alphanumeric());
        let domain = word.strip_prefix("www.").unwrap_or(word);
        reputation(domain).map(|credibility| Source {
            domain: domain.to_string(),
            credibility,
        })
    })
}

#[allow(clippy::cast_possible_truncation)]
fn credibility(bias_score: f64, manipulation_score: f64, source: Option<&Source>) -> u8 {
    let mut score = BASE_CREDIBILITY
        - (bias_score * 20.0) as i32
        - (manipulation_score * 25.0) as i32;
    if let Some(source) = source {
        if source.credibility > 0.8 {
            score += 15;
        } else if source.credibility > 0.5 {
            score += 5;
        } else if source.credibility < 0.3 {
            score -= 20;
        }
    }
    u8::try_from(score.clamp(0, 100)).unwrap_or(0)
}

/// Run every heuristic over `text`.
#[must_use]
pub fn assess(text: &str) -> Assessment {
    let lower = preprocess(text).to_lowercase();
    let clickbait = is_clickbait(&lower);

    let (sentiment, sentiment_score) = sentiment(&lower);
    let (bias_level, bias_score, bias_types) = bias(&lower, clickbait);
    let (techniques, manipulation_score) = manipulation(&lower, clickbait);
    let source = source(&lower);
    let credibility = credibility(bias_score, manipulation_score, source.as_ref());

    Assessment {
        sentiment,
        sentiment_score,
        bias_level,
        bias_score,
        bias_types,
        techniques,
        manipulation_score,
        source,
        credibility,
    }
}

/// Engine backed by [`assess`]; the verdict comes from the credibility score
/// (as a fraction) against the threshold.
#[derive(Debug, Clone)]
pub struct HeuristicEngine {
    threshold: f64,
}

impl HeuristicEngine {
    #[must_use]
    pub const fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

#[async_trait]
impl AnalysisEngine for HeuristicEngine {
    fn name(&self) -> &str {
        "heuristic"
    }

    async fn analyze(&self, text: &str) -> Result<AnalysisResult, EngineError> {
        let start = Instant::now();
        let assessment = assess(text);
        tracing::debug!(
            credibility = assessment.credibility,
            bias = %assessment.bias_level,
            techniques = assessment.techniques.len(),
            "heuristic assessment"
        );
        let elapsed = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        Ok(AnalysisResult::from_score(
            text,
            assessment.score(),
            self.threshold,
            assessment.traces(),
            self.name(),
        )
        .with_processing_time(elapsed))
    }
}
