//! Row identity → file name encoding.
//!
//! Identities that are already safe path segments are used verbatim, so a
//! `users` row with `id=1` lands in `id=1.json`. Anything that has to be
//! rewritten (reserved characters, device names, trailing dots, overlong
//! keys) gets a short SHA-256 suffix of the original identity so distinct
//! rows stay distinct. Identities that already contain `~` or `!` are
//! hashed too, so a key value can never spell out another row's hashed name.

use sha2::{Digest, Sha256};

use crate::snapshot::key::RowIdentity;

/// Extension of every snapshot file.
pub const SNAPSHOT_EXTENSION: &str = ".json";

/// Longest stem we produce, in bytes. Leaves room for the extension and a
/// temp-file suffix under the common 255-byte file-name limit.
pub const MAX_STEM_LEN: usize = 200;

const REPLACEMENT: char = '!';
const HASH_SEPARATOR: char = '~';
const HASH_HEX_LEN: usize = 16;

const RESERVED_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

const RESERVED_NAMES: &[&str] = &[
    "con", "prn", "aux", "nul", "com1", "com2", "com3", "com4", "com5", "com6", "com7", "com8",
    "com9", "lpt1", "lpt2", "lpt3", "lpt4", "lpt5", "lpt6", "lpt7", "lpt8", "lpt9",
];

/// File name (with extension) for a row identity.
#[must_use]
pub fn encode(identity: &RowIdentity) -> String {
    let raw = identity.as_str();
    let sanitized = sanitize(raw);

    // A verbatim stem never contains `~` or `!`, a hashed one always does.
    let verbatim = sanitized == raw
        && sanitized.len() <= MAX_STEM_LEN
        && !raw.contains([HASH_SEPARATOR, REPLACEMENT]);

    let stem = if verbatim {
        sanitized
    } else {
        let budget = MAX_STEM_LEN - HASH_SEPARATOR.len_utf8() - HASH_HEX_LEN;
        let mut stem = truncate(&sanitized, budget).to_string();
        stem.push(HASH_SEPARATOR);
        stem.push_str(&short_hash(raw));
        stem
    };

    format!("{stem}{SNAPSHOT_EXTENSION}")
}

/// Whether `name` looks like a file this tool writes.
#[must_use]
pub fn is_snapshot_file(name: &str) -> bool {
    name.ends_with(SNAPSHOT_EXTENSION)
}

/// Replace everything that is not safe in a single path segment.
fn sanitize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        let c = if c.is_control() || RESERVED_CHARS.contains(&c) {
            REPLACEMENT
        } else {
            c
        };
        // collapse runs
        if c == REPLACEMENT && out.ends_with(REPLACEMENT) {
            continue;
        }
        out.push(c);
    }

    let trimmed = out
        .trim_matches(REPLACEMENT)
        .trim_end_matches(['.', ' ']);
    if trimmed.is_empty() {
        return REPLACEMENT.to_string();
    }
    let mut out = trimmed.to_string();

    let base = out.split('.').next().unwrap_or_default().to_ascii_lowercase();
    if RESERVED_NAMES.contains(&base.as_str()) {
        out.push(REPLACEMENT);
    }

    out
}

/// Longest prefix of `s` that fits in `max` bytes.
fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

fn short_hash(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    let hex = format!("{digest:x}");
    hex[..HASH_HEX_LEN].to_string()
}
