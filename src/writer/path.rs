// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Rendering of source file references relative to the run's root.

use std::path::Path;

use itertools::Itertools as _;
use pathdiff::diff_paths;
use percent_encoding::percent_decode_str;

/// Returns the given `path` (plain path or `file://` URI) relative to the
/// `root`, with escaped characters decoded and `/` as a separator.
///
/// Empty or whitespace-only `path` results in an empty [`String`]. Paths that
/// can't be expressed relatively to the `root` are returned decoded.
#[must_use]
pub fn relativize(path: &str, root: &Path) -> String {
    let path = path.trim();
    if path.is_empty() {
        return String::new();
    }

    let decoded = percent_decode_str(strip_file_scheme(path))
        .decode_utf8_lossy()
        .into_owned();

    match diff_paths(&decoded, root) {
        Some(relative) if relative.as_os_str().is_empty() => ".".to_owned(),
        Some(relative) => relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .join("/"),
        None => decoded,
    }
}

/// Strips the `file://` scheme off the given `uri`, if any.
fn strip_file_scheme(uri: &str) -> &str {
    let Some(path) = uri.strip_prefix("file://") else {
        return uri;
    };
    // `file:///C:/dir` carries a Windows drive after the leading slash.
    match path.as_bytes() {
        [b'/', drive, b':', ..] if drive.is_ascii_alphabetic() => &path[1..],
        _ => path,
    }
}
