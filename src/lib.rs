// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Console reporter for live test-execution events.
//!
//! A host test runner pushes [`event::Run`]s into a [`RunReportWriter`]:
//! one [`Run::Started`], a [`Run::Result`] per completed test (possibly from
//! many threads at once), and a final [`Run::Finished`]. Slow, failed and
//! skipped tests are rendered as they arrive, fast passes as progress dots,
//! and the run ends with a replay of failures and a summary table.
//!
//! ```rust
//! use std::time::Duration;
//!
//! use pretty_report::{
//!     event::{OutcomeKind, RunFinished, RunStarted, TestRecord},
//!     writer::{out::WritableString, Config, TermWidth},
//!     RunReportWriter, Writer as _,
//! };
//!
//! # fn main() -> pretty_report::Result<()> {
//! let writer = RunReportWriter::new(
//!     WritableString::default(),
//!     Config::default().with_width(TermWidth::Fixed(80)),
//! );
//!
//! writer.on_run_start(RunStarted {
//!     sources: vec!["Calc.Tests.dll".into()],
//!     ..RunStarted::default()
//! })?;
//! writer.on_result(
//!     TestRecord::new("Calc.Adds", OutcomeKind::Failed)
//!         .with_duration(Duration::from_millis(3))
//!         .with_error_message("expected 4, got 5"),
//! )?;
//! writer.on_run_complete(RunFinished {
//!     total_executed: 1,
//!     elapsed: Duration::from_millis(42),
//!     ..RunFinished::default()
//! })?;
//!
//! let output = writer.into_inner();
//! assert!(output.contains("REPLAY 1 FAILED TEST"));
//! # Ok(())
//! # }
//! ```
//!
//! [`Run::Finished`]: event::Run::Finished
//! [`Run::Result`]: event::Run::Result
//! [`Run::Started`]: event::Run::Started

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(nonstandard_style, trivial_casts, trivial_numeric_casts)]
#![forbid(non_ascii_idents, unsafe_code)]
#![warn(
    clippy::as_conversions,
    clippy::clone_on_ref_ptr,
    clippy::dbg_macro,
    clippy::expect_used,
    clippy::pedantic,
    clippy::print_stderr,
    clippy::print_stdout,
    clippy::redundant_clone,
    clippy::unwrap_used,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unused_results
)]

pub mod cli;
pub mod error;
pub mod event;
pub mod settings;
pub mod writer;

#[doc(inline)]
pub use self::{
    error::{ReportError, Result},
    event::{OutcomeKind, TestRecord},
    writer::{Config, RunReportWriter, Writer},
};
