//! Per-sentence annotation bundles produced by an external analysis engine.
//!
//! The merge engine never looks inside these; it only moves them into the
//! document as [`Tokenization`](crate::Tokenization)s. The shape mirrors what
//! a full tokenize/tag/parse/dependency pipeline emits for one sentence.

use serde::{Deserialize, Serialize};

use crate::TextSpan;

/// Everything an analysis engine produced for one sentence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceAnnotations {
    pub tokens: Vec<Token>,
    /// Bracketed constituency parse, e.g. `(ROOT (S (NP (NNP John)) ...))`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<DependencyParse>,
}

impl SentenceAnnotations {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            parse: None,
            dependencies: Vec::new(),
        }
    }

    /// Tokens only, from plain words. Indices are assigned in order.
    pub fn from_words<'a>(words: impl IntoIterator<Item = &'a str>) -> Self {
        Self::new(
            words
                .into_iter()
                .enumerate()
                .map(|(index, word)| Token::new(index, word))
                .collect(),
        )
    }

    pub fn with_parse(mut self, parse: impl Into<String>) -> Self {
        self.parse = Some(parse.into());
        self
    }

    pub fn with_dependencies(mut self, parse: DependencyParse) -> Self {
        self.dependencies.push(parse);
        self
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Surface text of tokens `start..end`, joined by single spaces.
    ///
    /// Returns `None` when the range does not fit the token list.
    pub fn token_text(&self, start: usize, end: usize) -> Option<String> {
        let tokens = self.tokens.get(start..end)?;
        Some(
            tokens
                .iter()
                .map(|t| t.text.as_str())
                .collect::<Vec<_>>()
                .join(" "),
        )
    }

    pub fn dependencies_of(&self, kind: DependencyKind) -> Option<&DependencyParse> {
        self.dependencies.iter().find(|d| d.kind == kind)
    }
}

/// One token with its tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Position within the sentence (0-based)
    pub index: usize,
    pub text: String,
    /// Character span in the document text, when the engine reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<TextSpan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lemma: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ner: Option<String>,
}

impl Token {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
            span: None,
            pos: None,
            lemma: None,
            ner: None,
        }
    }

    pub fn with_span(mut self, span: TextSpan) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_pos(mut self, pos: impl Into<String>) -> Self {
        self.pos = Some(pos.into());
        self
    }

    pub fn with_lemma(mut self, lemma: impl Into<String>) -> Self {
        self.lemma = Some(lemma.into());
        self
    }

    pub fn with_ner(mut self, ner: impl Into<String>) -> Self {
        self.ner = Some(ner.into());
        self
    }
}

/// Which dependency representation a [`DependencyParse`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DependencyKind {
    Basic,
    Collapsed,
    CollapsedCcProcessed,
}

/// A dependency graph over one sentence's tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyParse {
    pub kind: DependencyKind,
    pub arcs: Vec<Dependency>,
}

impl DependencyParse {
    pub fn new(kind: DependencyKind, arcs: Vec<Dependency>) -> Self {
        Self { kind, arcs }
    }

    /// The dependent of the synthetic root arc, if any.
    pub fn root(&self) -> Option<usize> {
        self.arcs
            .iter()
            .find(|arc| arc.governor.is_none())
            .map(|arc| arc.dependent)
    }
}

/// A single labelled arc. Token positions are 1-based; 0 is reserved for root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// `None` for the synthetic root arc
    pub governor: Option<usize>,
    pub dependent: usize,
    pub relation: String,
}

impl Dependency {
    /// Relation labels are stored with all whitespace removed.
    pub fn new(governor: usize, dependent: usize, relation: &str) -> Self {
        Self {
            governor: Some(governor),
            dependent,
            relation: relation.split_whitespace().collect(),
        }
    }

    pub fn root(dependent: usize) -> Self {
        Self {
            governor: None,
            dependent,
            relation: "root".to_string(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.governor.is_none()
    }
}
