use std::{fmt::Display, future::Future, time::Duration};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

/// How a failed attempt affects the rest of the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Outcome {
    /// Try the next strategy
    Recoverable,
    /// The input itself is unusable, stop the chain
    Fatal,
}

pub trait Classify {
    fn outcome(&self) -> Outcome;
}

pub trait Named {
    fn name(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptError {
    pub strategy: String,
    pub kind: Outcome,
    pub reason: String,
}

#[derive(Debug, Clone, Error)]
#[error("{}", self.reason())]
pub struct ChainError {
    pub tried: Vec<String>,
    pub last: Option<AttemptError>,
    pub fatal: bool,
}
impl ChainError {
    /// The failure reason of the last attempted strategy.
    #[must_use]
    pub fn reason(&self) -> String {
        self.last.as_ref().map_or_else(
            || "no strategies to try".to_string(),
            |x| x.reason.clone(),
        )
    }
}

#[derive(Debug)]
pub struct Success<'a, S, T> {
    pub value: T,
    pub strategy: &'a S,
    pub tried: Vec<String>,
}

/// Runs attempts against an ordered list of strategies until one succeeds.
#[derive(Debug, Clone)]
pub struct FallbackChain<'a, S> {
    label: &'static str,
    strategies: &'a [S],
    delay: Duration,
}
impl<'a, S: Named> FallbackChain<'a, S> {
    #[must_use]
    pub const fn new(label: &'static str, strategies: &'a [S]) -> Self {
        Self {
            label,
            strategies,
            delay: Duration::from_secs(1),
        }
    }

    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub async fn run<T, E, F, Fut>(&self, mut attempt: F) -> Result<Success<'a, S, T>, ChainError>
    where
        F: FnMut(&'a S) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Classify + Display,
    {
        let mut tried = Vec::with_capacity(self.strategies.len());
        let mut last = None;

        for (i, strategy) in self.strategies.iter().enumerate() {
            if i > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            let name = strategy.name();
            debug!(chain = self.label, strategy = name, "Trying strategy");
            tried.push(name.to_string());

            match attempt(strategy).await {
                Ok(value) => {
                    info!(chain = self.label, strategy = name, "Strategy succeeded");

                    return Ok(Success {
                        value,
                        strategy,
                        tried,
                    });
                }
                Err(e) => {
                    let kind = e.outcome();
                    warn!(chain = self.label, strategy = name, ?kind, err = %e, "Strategy failed");

                    let err = AttemptError {
                        strategy: name.to_string(),
                        kind,
                        reason: e.to_string(),
                    };

                    if kind == Outcome::Fatal {
                        return Err(ChainError {
                            tried,
                            last: Some(err),
                            fatal: true,
                        });
                    }

                    last = Some(err);
                }
            }
        }

        warn!(chain = self.label, ?tried, "All strategies failed");

        Err(ChainError {
            tried,
            last,
            fatal: false,
        })
    }
}

/// Stderr fragments that mean no strategy can ever succeed for the input.
const FATAL_STDERR_PATTERNS: &[&str] = &[
    "Video unavailable",
    "Private video",
    "This video is private",
    "Unsupported URL",
    "is not a valid URL",
    "Incomplete YouTube ID",
];

#[must_use]
pub fn classify_stderr(stderr: &str) -> Outcome {
    if FATAL_STDERR_PATTERNS.iter().any(|x| stderr.contains(x)) {
        Outcome::Fatal
    } else {
        Outcome::Recoverable
    }
}
