//! Diagnostic queue for collecting, deduplicating, and sorting diagnostics.
//!
//! Features:
//! - Error limits to prevent overwhelming output, closed by a single
//!   "too many errors" notice
//! - Deduplication of an error repeated verbatim at the same offset
//!
//! Diagnostics are ordered by the byte offset of their primary span.

use std::hash::{Hash, Hasher};

use keel_ir::Span;

use crate::{Diagnostic, ErrorCode};

#[inline]
fn error_hash(diag: &Diagnostic) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    diag.code.hash(&mut hasher);
    diag.message.hash(&mut hasher);
    hasher.finish()
}

/// Configuration for diagnostic processing.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Maximum number of errors before stopping (0 = unlimited).
    pub error_limit: usize,
    /// Drop an error identical to the previous one at the same offset.
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: 100,
            deduplicate: true,
        }
    }
}

impl DiagnosticConfig {
    /// Create a config with no limits (for testing).
    pub fn unlimited() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            deduplicate: false,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
struct QueuedDiagnostic {
    diagnostic: Diagnostic,
    offset: u32,
}

/// Queue for collecting, deduplicating, and sorting diagnostics.
///
/// ```text
/// let mut queue = DiagnosticQueue::new();
/// queue.add(diagnostic);
/// let sorted = queue.flush();
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticQueue {
    diagnostics: Vec<QueuedDiagnostic>,
    /// Count of errors (not warnings/notes).
    error_count: usize,
    /// Last (offset, `error_hash`) for dedup.
    last_error: Option<(u32, u64)>,
    /// Set once the limit notice has been queued.
    truncated: bool,
    config: DiagnosticConfig,
}

impl Default for DiagnosticQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticQueue {
    /// Create a new diagnostic queue with default configuration.
    pub fn new() -> Self {
        Self::with_config(DiagnosticConfig::default())
    }

    /// Create a diagnostic queue with custom configuration.
    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            diagnostics: Vec::new(),
            error_count: 0,
            last_error: None,
            truncated: false,
            config,
        }
    }

    /// Add a diagnostic.
    ///
    /// Returns `true` if the diagnostic was added, `false` if it was filtered.
    /// The first error past the limit is replaced by a "too many errors"
    /// notice at its location; later errors are dropped.
    pub fn add(&mut self, diag: Diagnostic) -> bool {
        let offset = diag.primary_span().map_or(0, |span| span.start);
        let is_error = diag.is_error();

        if is_error && self.limit_reached() {
            if !self.truncated {
                self.truncated = true;
                let span = diag.primary_span().unwrap_or(Span::new(offset, offset));
                self.diagnostics.push(QueuedDiagnostic {
                    diagnostic: too_many_errors(self.config.error_limit, span),
                    offset,
                });
            }
            return false;
        }

        if self.config.deduplicate && self.is_duplicate(&diag, offset) {
            return false;
        }

        if is_error {
            self.last_error = Some((offset, error_hash(&diag)));
            self.error_count += 1;
        }

        self.diagnostics.push(QueuedDiagnostic {
            diagnostic: diag,
            offset,
        });

        true
    }

    /// Check if the error limit has been reached.
    pub fn limit_reached(&self) -> bool {
        self.config.error_limit > 0 && self.error_count >= self.config.error_limit
    }

    /// Get the number of errors collected.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Sort diagnostics by offset and return them, clearing the queue.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        let already_sorted = self
            .diagnostics
            .windows(2)
            .all(|w| w[0].offset <= w[1].offset);

        if !already_sorted {
            self.diagnostics.sort_by_key(|d| d.offset);
        }

        let result: Vec<Diagnostic> = self.diagnostics.drain(..).map(|d| d.diagnostic).collect();

        self.error_count = 0;
        self.last_error = None;
        self.truncated = false;

        result
    }

    fn is_duplicate(&self, diag: &Diagnostic, offset: u32) -> bool {
        if !diag.is_error() {
            return false;
        }
        self.last_error.is_some_and(|(last_offset, last_hash)| {
            last_offset == offset && error_hash(diag) == last_hash
        })
    }
}

/// Create a "too many errors" diagnostic.
#[cold]
pub fn too_many_errors(limit: usize, span: Span) -> Diagnostic {
    Diagnostic::error(ErrorCode::E9002)
        .with_message(format!("aborting due to {limit} previous errors"))
        .with_label(span, "error limit reached here")
}

#[cfg(test)]
mod tests;
