// src/tokens.rs
//! Crude token accounting for original vs. processed class text.
//!
//! The estimate is `length / 4`, rounded down. It is a ranking signal for
//! how much context a slice will consume, not a billing-accurate count,
//! and is kept deliberately simple.

/// Estimates the token cost of a piece of text.
#[must_use]
pub fn estimate(text: &str) -> usize {
    text.len() / 4
}

/// Per-run token statistics, aggregated over all retained classes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenStats {
    pub original: usize,
    pub processed: usize,
}

impl TokenStats {
    /// Stats for one class's original and processed text.
    #[must_use]
    pub fn of_class(original: &str, processed: &str) -> Self {
        Self {
            original: estimate(original),
            processed: estimate(processed),
        }
    }

    /// Accumulates one class's original and processed text.
    pub fn add_class(&mut self, original: &str, processed: &str) {
        self.original += estimate(original);
        self.processed += estimate(processed);
    }

    /// Folds another class's stats into the aggregate.
    pub fn absorb(&mut self, other: TokenStats) {
        self.original += other.original;
        self.processed += other.processed;
    }

    #[must_use]
    pub fn saved(&self) -> usize {
        self.original.saturating_sub(self.processed)
    }

    /// Percentage of tokens saved, 0 when nothing was counted.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percentage(&self) -> f64 {
        if self.original == 0 {
            return 0.0;
        }
        self.saved() as f64 / self.original as f64 * 100.0
    }
}
