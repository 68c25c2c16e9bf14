// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Human-readable, locale-invariant rendering of elapsed time.

use std::time::Duration;

use itertools::Itertools as _;

/// Milliseconds in a second.
const SECOND: f64 = 1_000.0;

/// Milliseconds in a minute.
const MINUTE: f64 = 60_000.0;

/// Milliseconds in an hour.
const HOUR: f64 = 3_600_000.0;

/// Formats the given [`Duration`] with three significant digits.
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    format_millis(duration.as_secs_f64() * SECOND, false)
}

/// Formats the given number of `ms` in a magnitude-appropriate unit.
///
/// Below a minute the value is rendered with three significant digits, or,
/// if `fixed` is set, with a fixed number of decimals (`0` for milliseconds,
/// `2` for seconds) to keep the output width stable.
#[must_use]
pub fn format_millis(ms: f64, fixed: bool) -> String {
    if ms.is_nan() || ms < 1.0 {
        return "<1 ms".to_owned();
    }

    // Rounding may carry a value into the next unit, so the range is checked
    // on the rounded value.
    if ms < SECOND {
        let (value, rounded) = round(ms, 0, fixed);
        if rounded < SECOND {
            return format!("{value} ms");
        }
    }

    if ms < MINUTE {
        let (value, rounded) = round(ms / SECOND, 2, fixed);
        if rounded < 60.0 {
            return format!("{value} s");
        }
    }

    if ms < HOUR {
        #[expect( // intentional
            clippy::as_conversions,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "bounded by the hour range above"
        )]
        let (mut minutes, mut seconds) = (
            (ms / MINUTE).floor() as u64,
            ((ms % MINUTE) / SECOND).round() as u64,
        );
        if seconds == 60 {
            minutes += 1;
            seconds = 0;
        }
        return if seconds == 0 {
            format!("{minutes} m")
        } else {
            format!("{minutes} m {seconds} s")
        };
    }

    #[expect( // intentional
        clippy::as_conversions,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "non-negative, and saturates on absurd values"
    )]
    let minutes = (ms / MINUTE).round() as u64;
    format!("{} m", group_thousands(minutes))
}

/// Renders `value` with three significant digits, or with the given number
/// of `decimals` if `fixed`, returning the rendering along with the value it
/// reads as.
fn round(value: f64, decimals: usize, fixed: bool) -> (String, f64) {
    let rendered = if fixed {
        format!("{value:.decimals$}")
    } else {
        significant(value)
    };
    let rounded = rendered.parse().unwrap_or(value);
    (rendered, rounded)
}

/// Renders `value` with three significant digits, without trailing
/// zeros and without an exponent.
fn significant(value: f64) -> String {
    #[expect( // intentional
        clippy::as_conversions,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "only called for non-negative values below `60_000`"
    )]
    let int_digits = (value.trunc() as u64).to_string().len();
    let decimals = 3_usize.saturating_sub(int_digits);
    let formatted = format!("{value:.decimals$}");
    if formatted.contains('.') {
        formatted.trim_end_matches('0').trim_end_matches('.').to_owned()
    } else {
        formatted
    }
}

/// Renders `n` with `,` separating groups of thousands.
#[must_use]
pub fn group_thousands(n: u64) -> String {
    n.to_string()
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(String::from_utf8_lossy)
        .join(",")
}
