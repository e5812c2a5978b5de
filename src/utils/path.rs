//! Output file names for keys that come from content, such as tags.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use std::borrow::Cow;

/// Bytes a key may not carry into a file name. `%` is escaped too so two
/// different keys never share a file.
const FILE_NAME: &AsciiSet = &CONTROLS.add(b'/').add(b'\\').add(b'%');

/// File stem for a free-form key: `ci/cd` becomes `ci%2Fcd`.
///
/// Pages link to the percent-encoded stem, so a static host that decodes
/// the request path once finds the file as written.
pub fn file_stem(key: &str) -> Cow<'_, str> {
    utf8_percent_encode(key, FILE_NAME).into()
}
