use std::path::PathBuf;

use crate::cli::InputArgs;
use crate::cli::output;
use crate::core::errors::{CertCryptError, Result};

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Resolve the text to process from `--text` or `--file`.
///
/// Exactly one must be given; blank values count as absent.
/// File contents are returned verbatim apart from a leading UTF-8 BOM.
pub fn resolve(input: &InputArgs) -> Result<String> {
    let text = input.text.as_deref().filter(|t| !t.trim().is_empty());
    let file = input.file.as_deref().filter(|f| !f.trim().is_empty());

    match (file, text) {
        (Some(_), Some(_)) => Err(CertCryptError::ArgumentError {
            detail: "You cannot specify both --file and --text.".into(),
        }),
        (None, None) => Err(CertCryptError::ArgumentError {
            detail: "You must specify either --file or --text.".into(),
        }),
        (None, Some(text)) => {
            output::detail("Input: --text argument");
            Ok(text.to_string())
        }
        (Some(file), None) => {
            let path = PathBuf::from(file);
            if !path.exists() {
                return Err(CertCryptError::FileNotFound { path });
            }
            output::detail(&format!("Input: {}", path.display()));
            let content = std::fs::read_to_string(&path)?;
            Ok(match content.strip_prefix(BYTE_ORDER_MARK) {
                Some(rest) => rest.to_string(),
                None => content,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(text: Option<&str>, file: Option<&str>) -> InputArgs {
        InputArgs {
            text: text.map(String::from),
            file: file.map(String::from),
        }
    }

    #[test]
    fn text_is_returned_as_given() {
        assert_eq!(resolve(&args(Some(" a b "), None)).unwrap(), " a b ");
    }

    #[test]
    fn file_is_read_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secret.txt");
        std::fs::write(&path, "line\n").unwrap();

        let text = resolve(&args(None, path.to_str())).unwrap();
        assert_eq!(text, "line\n");
    }

    #[test]
    fn leading_byte_order_mark_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bom.txt");
        std::fs::write(&path, "\u{feff}Q0NSVA==\r\n").unwrap();

        let text = resolve(&args(None, path.to_str())).unwrap();
        assert_eq!(text, "Q0NSVA==\r\n");
    }

    #[test]
    fn inner_byte_order_mark_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inner.txt");
        std::fs::write(&path, "a\u{feff}b").unwrap();

        let text = resolve(&args(None, path.to_str())).unwrap();
        assert_eq!(text, "a\u{feff}b");
    }

    #[test]
    fn both_is_an_argument_error() {
        let err = resolve(&args(Some("x"), Some("y"))).unwrap_err();
        assert_eq!(err.to_string(), "You cannot specify both --file and --text.");
    }

    #[test]
    fn neither_or_blank_is_an_argument_error() {
        for input in [args(None, None), args(Some("   "), None), args(None, Some(""))] {
            let err = resolve(&input).unwrap_err();
            assert_eq!(err.to_string(), "You must specify either --file or --text.");
        }
    }

    #[test]
    fn missing_file_is_reported() {
        let err = resolve(&args(None, Some("/no/such/file.txt"))).unwrap_err();
        assert!(matches!(err, CertCryptError::FileNotFound { .. }));
    }
}
