//! Document loading.
//!
//! Files are parsed by extension (`.json` as JSON, anything else as YAML).
//! A trailing `.gz` is decompressed first and ignored when picking the
//! format, so `spec.yaml.gz` loads as YAML.

use crate::document::node::YamlValue;
use crate::document::parser::{parse_json, parse_yaml};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Serialization format of a document on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    /// Picks the format from the file name, looking past a `.gz` suffix.
    ///
    /// Returns `None` for anything that is not `.json`, `.yaml` or `.yml`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let name = path.as_ref().to_string_lossy().to_ascii_lowercase();
        let base = name.strip_suffix(".gz").unwrap_or(&name);

        if base.ends_with(".json") {
            Some(DocumentFormat::Json)
        } else if base.ends_with(".yaml") || base.ends_with(".yml") {
            Some(DocumentFormat::Yaml)
        } else {
            None
        }
    }
}

/// Loads and parses a YAML or JSON document.
///
/// # Errors
///
/// Returns an error if the file cannot be read or decompressed, or if its
/// contents do not parse in the format implied by the extension.
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<YamlValue> {
    let path = path.as_ref();
    let content = read_text(path)?;

    let parsed = match DocumentFormat::from_path(path) {
        Some(DocumentFormat::Json) => parse_json(&content),
        _ => parse_yaml(&content),
    };
    parsed.with_context(|| format!("Failed to load {}", path.display()))
}

/// Reads a whole document from stdin.
///
/// Gzip input is detected by its magic bytes. The text is parsed as YAML,
/// which also accepts JSON.
pub fn load_from_stdin() -> Result<YamlValue> {
    use std::io::{self, Read};

    let mut buffer = Vec::new();
    io::stdin()
        .read_to_end(&mut buffer)
        .context("Failed to read from stdin")?;

    let content = bytes_to_text(buffer)?;
    parse_yaml(&content).context("Failed to parse document from stdin")
}

/// Reads a file as UTF-8, transparently decompressing `.gz` files.
pub fn read_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let is_gzipped = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));

    if is_gzipped {
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        decompress_gzip_bytes(&bytes)
            .with_context(|| format!("Failed to decompress {}", path.display()))
    } else {
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
    }
}

fn bytes_to_text(buffer: Vec<u8>) -> Result<String> {
    // gzip magic bytes
    if buffer.starts_with(&[0x1f, 0x8b]) {
        decompress_gzip_bytes(&buffer)
    } else {
        String::from_utf8(buffer).context("Invalid UTF-8 in input")
    }
}

fn decompress_gzip_bytes(bytes: &[u8]) -> Result<String> {
    use flate2::read::GzDecoder;
    use std::io::Read;

    let mut decoder = GzDecoder::new(bytes);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzip data - input may be corrupted")?;
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_format_from_path() {
        assert_eq!(DocumentFormat::from_path("a.json"), Some(DocumentFormat::Json));
        assert_eq!(DocumentFormat::from_path("a.JSON.gz"), Some(DocumentFormat::Json));
        assert_eq!(DocumentFormat::from_path("a.yml"), Some(DocumentFormat::Yaml));
        assert_eq!(DocumentFormat::from_path("dir/a.yaml.gz"), Some(DocumentFormat::Yaml));
        assert_eq!(DocumentFormat::from_path("a.properties"), None);
        assert_eq!(DocumentFormat::from_path("a.gz"), None);
    }

    #[test]
    fn test_load_yaml_and_json_files() {
        let mut yaml = Builder::new().suffix(".yaml").tempfile().unwrap();
        write!(yaml, "a:\n  b: 1\n").unwrap();
        let doc = load_document(yaml.path()).unwrap();
        assert_eq!(doc, parse_yaml("a: {b: 1}").unwrap());

        let mut json = Builder::new().suffix(".json").tempfile().unwrap();
        write!(json, r#"{{"a": {{"b": 1}}}}"#).unwrap();
        assert_eq!(load_document(json.path()).unwrap(), doc);
    }

    #[test]
    fn test_load_gzipped_yaml() {
        use flate2::write::GzEncoder;
        use flate2::Compression;

        let file = Builder::new().suffix(".yaml.gz").tempfile().unwrap();
        let mut encoder = GzEncoder::new(file.reopen().unwrap(), Compression::default());
        encoder.write_all(b"items:\n  - x\n  - y\n").unwrap();
        encoder.finish().unwrap();

        let doc = load_document(file.path()).unwrap();
        assert_eq!(doc, parse_yaml("items: [x, y]").unwrap());
    }

    #[test]
    fn test_load_corrupted_gzip_fails() {
        let mut file = Builder::new().suffix(".yaml.gz").tempfile().unwrap();
        file.write_all(b"definitely not gzip").unwrap();
        assert!(load_document(file.path()).is_err());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let err = load_document("/nonexistent/dir/doc.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn test_bytes_to_text_detects_gzip() {
        use flate2::write::GzEncoder;
        use flate2::Compression;

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"k: v\n").unwrap();
        let bytes = encoder.finish().unwrap();
        assert_eq!(bytes_to_text(bytes).unwrap(), "k: v\n");
        assert_eq!(bytes_to_text(b"plain".to_vec()).unwrap(), "plain");
    }
}
