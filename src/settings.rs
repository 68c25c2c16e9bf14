// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Run settings received from the host as a flat key/value map.

use std::collections::HashMap;

/// Key of the setting listing qualified-name prefixes whose skipped tests
/// shouldn't have their messages rendered.
pub const DISABLE_FULL_SKIP_MESSAGES: &str = "DisableFullSkipMessages";

/// Engine settings extracted from the host's run settings.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RunSettings {
    /// Qualified-name prefixes of tests, whose skip messages are suppressed.
    pub skip_message_prefixes: Vec<String>,
}

impl RunSettings {
    /// Builds [`RunSettings`] out of key/value pairs, ignoring unknown keys.
    #[must_use]
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut settings = Self::default();
        for (key, value) in pairs {
            if key == DISABLE_FULL_SKIP_MESSAGES {
                settings.skip_message_prefixes.extend(
                    value
                        .split(';')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(ToOwned::to_owned),
                );
            }
        }
        settings
    }

    /// Builds [`RunSettings`] out of the given `map`.
    #[must_use]
    pub fn from_map(map: &HashMap<String, String>) -> Self {
        Self::from_pairs(map.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    /// Indicates whether messages of the skipped test `name` are suppressed.
    #[must_use]
    pub fn suppresses_skip_messages(&self, name: &str) -> bool {
        self.skip_message_prefixes
            .iter()
            .any(|prefix| name.starts_with(prefix.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_and_trims_prefixes() {
        let settings = RunSettings::from_pairs([(
            DISABLE_FULL_SKIP_MESSAGES,
            " Tests.Integration ; ;Tests.Nightly;",
        )]);

        assert_eq!(
            settings.skip_message_prefixes,
            ["Tests.Integration", "Tests.Nightly"],
        );
    }

    #[test]
    fn ignores_unknown_keys() {
        let settings = RunSettings::from_pairs([("Parallelism", "4")]);

        assert_eq!(settings, RunSettings::default());
    }

    #[test]
    fn matches_by_prefix() {
        let mut map = HashMap::new();
        drop(map.insert(
            DISABLE_FULL_SKIP_MESSAGES.to_owned(),
            "Tests.Integration".to_owned(),
        ));
        let settings = RunSettings::from_map(&map);

        assert!(
            settings.suppresses_skip_messages("Tests.Integration.Db.Connects"),
        );
        assert!(!settings.suppresses_skip_messages("Tests.Unit.Parses"));
    }

    #[test]
    fn blank_value_suppresses_nothing() {
        let settings =
            RunSettings::from_pairs([(DISABLE_FULL_SKIP_MESSAGES, "  ")]);

        assert!(!settings.suppresses_skip_messages("Anything"));
    }
}
