// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Error types of the report engine.
//!
//! The engine is an append-only sink, so almost everything that can go wrong
//! is either a failed write into the output or a contract violation by the
//! host feeding it events.

use std::{fmt, io};

use derive_more::with_trait::{Display, Error};

/// Top-level error type of all the report operations.
#[derive(Debug, Display, Error)]
pub enum ReportError {
    /// Writing into the output sink failed.
    #[display("I/O operation failed: {_0}")]
    Io(io::Error),

    /// Host reported an outcome outside of the five known kinds.
    ///
    /// This is a contract violation of the host binding and must never be
    /// silently dropped.
    #[display("Unknown test outcome: {raw}")]
    UnknownOutcome {
        /// Raw outcome value as received from the host.
        #[error(not(source))]
        raw: String,
    },

    /// The failure replay queue has already been drained for this run.
    #[display("Failure replay queue has already been drained")]
    AlreadyDrained,
}

/// Result type alias using [`ReportError`].
pub type Result<T> = std::result::Result<T, ReportError>;

impl ReportError {
    /// Creates an [`ReportError::UnknownOutcome`] out of any displayable raw
    /// value.
    #[must_use]
    pub fn unknown_outcome(raw: impl fmt::Display) -> Self {
        Self::UnknownOutcome {
            raw: raw.to_string(),
        }
    }
}

impl From<io::Error> for ReportError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}
