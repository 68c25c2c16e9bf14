// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! CLI options of the report engine.
//!
//! [`Cli`] is a [`clap::Args`] group, so a host binary may flatten it into
//! its own CLI and feed the parsed result into [`Config::from_cli()`].
//!
//! [`Config::from_cli()`]: crate::writer::report::Config::from_cli

use std::{str::FromStr, time::Duration};

use smart_default::SmartDefault;

pub use clap::{Args, Parser};

/// CLI options of a [`RunReportWriter`].
///
/// [`RunReportWriter`]: crate::RunReportWriter
#[derive(Clone, Copy, Debug, SmartDefault, clap::Args)]
#[group(skip)]
pub struct Cli {
    /// Verbosity of an output.
    ///
    /// `-v` is default verbosity, `-vv` renders failures in their long form
    /// as soon as they happen.
    #[arg(short, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Coloring policy for a console output.
    #[arg(
        long,
        value_name = "auto|always|never",
        default_value = "auto",
        global = true
    )]
    #[default(Coloring::Auto)]
    pub color: Coloring,

    /// Number of failed tests replayed in full at the end of a run.
    #[arg(long, value_name = "int", default_value_t = 20, global = true)]
    #[default(20)]
    pub replay_limit: usize,

    /// Duration above which a test is reported as slow.
    #[arg(
        long,
        value_name = "duration",
        default_value = "2s",
        value_parser = humantime::parse_duration,
        global = true
    )]
    #[default(Duration::from_secs(2))]
    pub slow_threshold: Duration,

    /// Number of stack traces prettified before falling back to verbatim
    /// output.
    #[arg(long, value_name = "int", default_value_t = 100, global = true)]
    #[default(100)]
    pub trace_budget: usize,

    /// Disables progress dots for passed tests.
    #[arg(long, global = true)]
    pub no_progress: bool,
}

/// Possible policies of a [`console`] output coloring.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Coloring {
    /// Letting [`console::colors_enabled()`] to decide, whether output should
    /// be colored.
    Auto,

    /// Forcing of a colored output.
    Always,

    /// Forcing of a non-colored output.
    Never,
}

impl FromStr for Coloring {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            _ => Err("possible options: auto, always, never"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, clap::Parser)]
    struct Host {
        #[command(flatten)]
        report: Cli,
    }

    #[test]
    fn defaults_match_parsed_defaults() {
        let parsed = Host::parse_from(["host"]).report;
        let default = Cli::default();

        assert_eq!(parsed.verbose, default.verbose);
        assert_eq!(parsed.color, default.color);
        assert_eq!(parsed.replay_limit, 20);
        assert_eq!(parsed.slow_threshold, Duration::from_secs(2));
        assert_eq!(parsed.trace_budget, default.trace_budget);
        assert!(!parsed.no_progress);
    }

    #[test]
    fn parses_all_options() {
        let cli = Host::parse_from([
            "host",
            "-vv",
            "--color",
            "never",
            "--replay-limit",
            "5",
            "--slow-threshold",
            "500ms",
            "--trace-budget",
            "3",
            "--no-progress",
        ])
        .report;

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.color, Coloring::Never);
        assert_eq!(cli.replay_limit, 5);
        assert_eq!(cli.slow_threshold, Duration::from_millis(500));
        assert_eq!(cli.trace_budget, 3);
        assert!(cli.no_progress);
    }

    #[test]
    fn coloring_from_str() {
        assert_eq!("ALWAYS".parse(), Ok(Coloring::Always));
        assert_eq!("auto".parse(), Ok(Coloring::Auto));
        assert_eq!("never".parse(), Ok(Coloring::Never));
        assert!("sometimes".parse::<Coloring>().is_err());
    }
}
