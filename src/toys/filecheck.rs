//! Report or clean up tabs, non-ASCII bytes and long lines in source files.
//!
//! Input is handled as raw bytes so both UTF-8 and Latin-1 files work.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::Result;

pub const MAX_LINE_LENGTH: usize = 80;

/// German special characters in UTF-8 and Latin-1, with their ASCII spelling.
const TRANSLITERATIONS: [(&[u8], &str); 14] = [
    (b"\xc3\xa4", "ae"),
    (b"\xc3\x84", "Ae"),
    (b"\xc3\xb6", "oe"),
    (b"\xc3\x96", "Oe"),
    (b"\xc3\xbc", "ue"),
    (b"\xc3\x9c", "Ue"),
    (b"\xc3\x9f", "ss"),
    (b"\xe4", "ae"),
    (b"\xc4", "Ae"),
    (b"\xf6", "oe"),
    (b"\xd6", "Oe"),
    (b"\xfc", "ue"),
    (b"\xdc", "Ue"),
    (b"\xdf", "ss"),
];

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileReport {
    /// 1-based numbers of lines containing a tab.
    pub tabs: Vec<usize>,
    /// `(line, count)` of non-ASCII bytes; a UTF-8 character counts once per byte.
    pub non_ascii: Vec<(usize, usize)>,
    pub long_lines: Vec<usize>,
}

impl FileReport {
    pub fn is_clean(&self) -> bool {
        self.tabs.is_empty() && self.non_ascii.is_empty() && self.long_lines.is_empty()
    }
}

fn lines(bytes: &[u8]) -> impl Iterator<Item = &[u8]> {
    bytes.split(|&b| b == b'\n').map(|line| line.strip_suffix(b"\r").unwrap_or(line))
}

pub fn report(bytes: &[u8]) -> FileReport {
    let mut out = FileReport::default();
    for (i, line) in lines(bytes).enumerate() {
        let number = i + 1;
        if line.contains(&b'\t') {
            out.tabs.push(number);
        }
        let count = line.iter().filter(|&&b| b > 127).count();
        if count > 0 {
            out.non_ascii.push((number, count));
        }
        if line.len() > MAX_LINE_LENGTH {
            out.long_lines.push(number);
        }
    }
    out
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Replaced {
    pub text: String,
    /// Characters with no known transliteration, each written as `@`.
    pub unknown: usize,
    pub long_lines: Vec<usize>,
}

/// Length of the UTF-8 character starting at `bytes[0]`, if it is one.
fn utf8_sequence(bytes: &[u8]) -> Option<usize> {
    let width = match bytes.first()? {
        0xc2..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf4 => 4,
        _ => return None,
    };
    let candidate = bytes.get(..width)?;
    std::str::from_utf8(candidate).ok().map(|_| width)
}

fn to_ascii(bytes: &[u8]) -> (String, usize) {
    let mut text = String::with_capacity(bytes.len());
    let mut unknown = 0;
    let mut i = 0;
    'outer: while i < bytes.len() {
        let b = bytes[i];
        if b == b'\t' {
            text.push_str("    ");
            i += 1;
            continue;
        }
        if b.is_ascii() {
            text.push(b as char);
            i += 1;
            continue;
        }
        for (pattern, replacement) in TRANSLITERATIONS {
            if bytes[i..].starts_with(pattern) {
                text.push_str(replacement);
                i += pattern.len();
                continue 'outer;
            }
        }
        unknown += 1;
        text.push('@');
        i += utf8_sequence(&bytes[i..]).unwrap_or(1);
    }
    (text, unknown)
}

/// Transliterate umlauts, expand tabs, mask other non-ASCII characters and
/// strip trailing whitespace.
pub fn replace(bytes: &[u8]) -> Replaced {
    let (ascii, unknown) = to_ascii(bytes);
    if unknown > 0 {
        warn!(unknown, "unknown characters replaced with '@'");
    }
    let mut long_lines = Vec::new();
    let cleaned: Vec<&str> = ascii
        .lines()
        .enumerate()
        .map(|(i, line)| {
            let line = line.trim_end();
            if line.len() > MAX_LINE_LENGTH {
                long_lines.push(i + 1);
            }
            line
        })
        .collect();
    let mut text = cleaned.join("\n");
    if ascii.ends_with('\n') {
        text.push('\n');
    }
    Replaced { text, unknown, long_lines }
}

pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push("~");
    PathBuf::from(name)
}

/// Write `contents` to `path`, moving an existing file to `path~` first.
pub fn write_with_backup<P: AsRef<Path>>(path: P, contents: &str) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        let backup = backup_path(path);
        if backup.exists() {
            fs::remove_file(&backup)?;
        }
        fs::rename(path, &backup)?;
        info!(backup = %backup.display(), "kept previous output");
    }
    fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_finds_everything() {
        let long = "x".repeat(81);
        let text = format!("ok\n\tindented\nGr\u{00fc}\u{00df}e\n{}\n", long);
        let r = report(text.as_bytes());
        assert_eq!(r.tabs, vec![2]);
        assert_eq!(r.non_ascii, vec![(3, 4)]);
        assert_eq!(r.long_lines, vec![4]);
        assert!(!r.is_clean());
        assert!(report(b"clean\n").is_clean());
    }

    #[test]
    fn test_replace_utf8_umlauts() {
        let r = replace("\u{00c4}rger \u{00fc}ber Stra\u{00df}e".as_bytes());
        assert_eq!(r.text, "Aerger ueber Strasse");
        assert_eq!(r.unknown, 0);
    }

    #[test]
    fn test_replace_latin1_umlauts() {
        let r = replace(b"sch\xf6n \xdc\tx  \n");
        assert_eq!(r.text, "schoen Ue    x\n");
    }

    #[test]
    fn test_unknown_characters_masked() {
        let r = replace("caf\u{00e9} \u{20ac}5".as_bytes());
        assert_eq!(r.text, "caf@ @5");
        assert_eq!(r.unknown, 2);
    }

    #[test]
    fn test_replace_reports_long_lines() {
        let text = format!("short\n{}   \n", "y".repeat(90));
        let r = replace(text.as_bytes());
        assert_eq!(r.long_lines, vec![2]);
        assert!(!r.text.contains(' '));
    }

    #[test]
    fn test_write_with_backup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.py");
        write_with_backup(&path, "first").unwrap();
        write_with_backup(&path, "second").unwrap();
        write_with_backup(&path, "third").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "third");
        assert_eq!(fs::read_to_string(backup_path(&path)).unwrap(), "second");
    }
}
