// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Tools for reporting [`Run`] events to a console.
//!
//! [`Run`]: crate::event::Run

pub mod banner;
pub mod duration;
pub mod out;
pub mod path;
pub mod reflow;
pub mod renderer;
pub mod report;
pub mod summarize;
pub mod traits;
pub mod types;

#[doc(inline)]
pub use self::{
    banner::Banner,
    out::{Styles, TermWidth, Tone},
    renderer::OutcomeRenderer,
    report::{Config, RunReportWriter},
    summarize::{FailureReplayQueue, Replay, RunSummary, StatsAccumulator},
    traits::Writer,
    types::Verbosity,
};
