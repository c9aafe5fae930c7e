//! The contract an external annotation engine implements.

use layered_annotation::{CorefChain, SentenceAnnotations};
use serde::{Deserialize, Serialize};

/// What an engine returns for one batch of sentences.
///
/// `sentences[i]` annotates the `i`-th submitted sentence. Chain mentions
/// index into the same batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineOutput {
    pub sentences: Vec<SentenceAnnotations>,
    #[serde(default)]
    pub chains: Vec<CorefChain>,
}

impl EngineOutput {
    pub fn new(sentences: Vec<SentenceAnnotations>, chains: Vec<CorefChain>) -> Self {
        Self { sentences, chains }
    }

    /// Chains with every sentence index shifted by `base`.
    pub fn offset_chains(&self, base: usize) -> Vec<CorefChain> {
        self.chains.iter().map(|c| c.offset(base)).collect()
    }
}

/// A tokenizer/tagger/parser/coreference engine.
pub trait AnnotationEngine {
    type Error;

    /// Annotate one batch of sentence texts, in order.
    fn annotate(&self, sentences: &[&str]) -> Result<EngineOutput, Self::Error>;
}

impl<E: AnnotationEngine + ?Sized> AnnotationEngine for &E {
    type Error = E::Error;

    fn annotate(&self, sentences: &[&str]) -> Result<EngineOutput, Self::Error> {
        (**self).annotate(sentences)
    }
}
