//! Annotation provenance: which tool produced a value, and when.

use serde::{Deserialize, Serialize};

/// Tool name stamped on annotations when none is configured.
pub const DEFAULT_TOOL: &str = "layered-annotation";

/// Provenance attached to segmentations, tokenizations and entity collections.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnnotationMetadata {
    /// Name of the tool that produced the annotation
    pub tool: String,
    /// Unix timestamp, second precision
    pub timestamp: i64,
}

impl AnnotationMetadata {
    pub fn new(tool: impl Into<String>, timestamp: i64) -> Self {
        Self {
            tool: tool.into(),
            timestamp,
        }
    }
}

/// Wall-clock source, in unix seconds.
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

/// Reads the system clock through `chrono`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now(&self) -> i64 {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn now(&self) -> i64 {
        (**self).now()
    }
}

/// A tool name bound to a clock.
///
/// [`Provenance::stamp`] reads the clock once; callers reuse the returned
/// metadata for everything they build in one pass so all stamps agree.
pub struct Provenance<C = SystemClock> {
    tool: String,
    clock: C,
}

impl Provenance<SystemClock> {
    pub fn new(tool: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            clock: SystemClock,
        }
    }
}

impl<C: Clock> Provenance<C> {
    pub fn with_clock(tool: impl Into<String>, clock: C) -> Self {
        Self {
            tool: tool.into(),
            clock,
        }
    }

    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.tool = tool.into();
        self
    }

    /// Same tool, different clock.
    pub fn replace_clock<D: Clock>(self, clock: D) -> Provenance<D> {
        Provenance {
            tool: self.tool,
            clock,
        }
    }

    pub fn tool(&self) -> &str {
        &self.tool
    }

    pub fn stamp(&self) -> AnnotationMetadata {
        AnnotationMetadata::new(self.tool.clone(), self.clock.now())
    }
}

impl Default for Provenance<SystemClock> {
    fn default() -> Self {
        Self::new(DEFAULT_TOOL)
    }
}

impl<C: std::fmt::Debug> std::fmt::Debug for Provenance<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provenance")
            .field("tool", &self.tool)
            .field("clock", &self.clock)
            .finish()
    }
}
