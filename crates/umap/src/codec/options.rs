use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::error::FormatError;

/// Character encoding used for text on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Encoding {
    #[default]
    #[serde(rename = "utf-8")]
    Utf8,
    #[serde(rename = "utf-16be")]
    Utf16Be,
    #[serde(rename = "utf-16le")]
    Utf16Le,
}

impl Encoding {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Utf16Be => "utf-16be",
            Self::Utf16Le => "utf-16le",
        }
    }

    pub fn encode(self, s: &str) -> Cow<'_, [u8]> {
        match self {
            Self::Utf8 => Cow::Borrowed(s.as_bytes()),
            Self::Utf16Be => Cow::Owned(s.encode_utf16().flat_map(u16::to_be_bytes).collect()),
            Self::Utf16Le => Cow::Owned(s.encode_utf16().flat_map(u16::to_le_bytes).collect()),
        }
    }

    pub fn decode(self, bytes: &[u8]) -> Result<String, FormatError> {
        match self {
            Self::Utf8 => String::from_utf8(bytes.to_vec())
                .map_err(|e| FormatError::at("invalid utf-8", e.utf8_error().valid_up_to())),
            Self::Utf16Be | Self::Utf16Le => {
                if bytes.len() % 2 != 0 {
                    return Err(FormatError::new("odd byte count in utf-16 text"));
                }
                let units = bytes.chunks_exact(2).map(|pair| {
                    let pair = [pair[0], pair[1]];
                    if self == Self::Utf16Be {
                        u16::from_be_bytes(pair)
                    } else {
                        u16::from_le_bytes(pair)
                    }
                });
                char::decode_utf16(units)
                    .collect::<Result<String, _>>()
                    .map_err(|_| FormatError::new("unpaired surrogate in utf-16 text"))
            }
        }
    }
}

/// Options of a decode pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderOptions {
    pub encoding: Encoding,
    /// Skip keys the template does not declare instead of failing.
    pub ignore_unknown_keys: bool,
}

/// Options of an encode pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterOptions {
    pub encoding: Encoding,
    pub pretty: bool,
    /// Spaces per nesting level in pretty output.
    pub indent_factor: usize,
    /// Pad pretty map values into one column.
    pub align_values: bool,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            encoding: Encoding::Utf8,
            pretty: false,
            indent_factor: 4,
            align_values: false,
        }
    }
}

impl WriterOptions {
    pub fn pretty() -> Self {
        Self {
            pretty: true,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf16_text() {
        for encoding in [Encoding::Utf16Be, Encoding::Utf16Le, Encoding::Utf8] {
            let bytes = encoding.encode("a\u{e9}\u{1F600}");
            assert_eq!(encoding.decode(&bytes).unwrap(), "a\u{e9}\u{1F600}");
        }
        assert_eq!(Encoding::Utf16Be.encode("A").as_ref(), &[0, 0x41]);
        assert!(Encoding::Utf16Le.decode(&[0x41]).is_err());
        assert!(Encoding::Utf16Be.decode(&[0xD8, 0x00]).is_err());
        assert!(Encoding::Utf8.decode(&[0xFF]).is_err());
    }

    #[test]
    fn options_from_config() {
        let reader: ReaderOptions = toml::from_str("ignore_unknown_keys = true").unwrap();
        assert!(reader.ignore_unknown_keys);
        assert_eq!(reader.encoding, Encoding::Utf8);

        let writer: WriterOptions =
            toml::from_str("pretty = true\nencoding = \"utf-16le\"").unwrap();
        assert!(writer.pretty);
        assert_eq!(writer.indent_factor, 4);
        assert_eq!(writer.encoding, Encoding::Utf16Le);

        let writer: WriterOptions = serde_json::from_str(r#"{"indent_factor":2}"#).unwrap();
        assert_eq!(writer.indent_factor, 2);
        assert!(!writer.pretty);
        assert!(serde_json::from_str::<ReaderOptions>(r#"{"encoding":"latin-1"}"#).is_err());
    }
}
