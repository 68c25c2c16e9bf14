// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Common types of the report writers.

/// Standard verbosity levels of a [`Writer`].
///
/// [`Writer`]: super::Writer
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[repr(u8)]
pub enum Verbosity {
    /// Failures are rendered in their short form as they happen, and in full
    /// only when replayed at the end of a run.
    #[default]
    Default = 0,

    /// Failures are rendered in full as soon as they happen, including their
    /// location, stack trace and captured messages.
    Full = 1,
}

impl Verbosity {
    /// Indicates whether failures should be rendered in their long form.
    #[must_use]
    pub const fn is_full(self) -> bool {
        matches!(self, Self::Full)
    }
}

/// Maps the number of `-v` flags beyond the first one, as `-v` is the
/// default verbosity.
impl From<u8> for Verbosity {
    fn from(v: u8) -> Self {
        match v {
            0 => Self::Default,
            _ => Self::Full,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_u8() {
        assert_eq!(Verbosity::from(0), Verbosity::Default);
        assert_eq!(Verbosity::from(1), Verbosity::Full);
        assert_eq!(Verbosity::from(7), Verbosity::Full);
        assert!(!Verbosity::default().is_full());
    }
}
