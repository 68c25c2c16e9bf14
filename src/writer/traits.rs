// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Core trait of test run event writers.

use std::sync::Arc;

use crate::{
    error::Result,
    event::{self, RunFinished, RunStarted, TestRecord},
};

/// Writer of [`Run`] events to some output.
///
/// The host test-execution system may deliver [`Run::Result`]s from many
/// threads at once, so all the methods take `&self`, and implementors are
/// required to be [`Send`] and [`Sync`].
///
/// [`Run`]: event::Run
/// [`Run::Result`]: event::Run::Result
pub trait Writer: Send + Sync {
    /// Handles the given [`Run`] event.
    ///
    /// # Errors
    ///
    /// If the event cannot be written to the output.
    ///
    /// [`Run`]: event::Run
    fn handle_event(&self, event: event::Run) -> Result<()>;

    /// Handles the start of a test run.
    ///
    /// # Errors
    ///
    /// See [`Writer::handle_event()`].
    fn on_run_start(&self, started: RunStarted) -> Result<()> {
        self.handle_event(event::Run::Started(started))
    }

    /// Handles a single completed test.
    ///
    /// # Errors
    ///
    /// See [`Writer::handle_event()`].
    fn on_result(&self, record: TestRecord) -> Result<()> {
        self.handle_event(event::Run::Result(record))
    }

    /// Handles the end of a test run.
    ///
    /// # Errors
    ///
    /// See [`Writer::handle_event()`].
    fn on_run_complete(&self, finished: RunFinished) -> Result<()> {
        self.handle_event(event::Run::Finished(finished))
    }
}

impl<W: Writer + ?Sized> Writer for &W {
    fn handle_event(&self, event: event::Run) -> Result<()> {
        (**self).handle_event(event)
    }
}

impl<W: Writer + ?Sized> Writer for Arc<W> {
    fn handle_event(&self, event: event::Run) -> Result<()> {
        (**self).handle_event(event)
    }
}
