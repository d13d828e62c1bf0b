//! The opaque payload carried inside a wrapper record's extension field.

use std::io;

use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// How the bytes of an [`ExtensionPayload`] were produced.
///
/// Decoding always goes through the permissive parser, so the tag never
/// changes how a payload is read. It records provenance: `Json` payloads
/// came from the strict encoder, `Yaml` payloads were supplied from
/// elsewhere and may use any syntax of the YAML family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PayloadFormat {
    #[default]
    Json,
    Yaml,
}

/// Structured text bytes plus their [`PayloadFormat`].
///
/// Payloads are immutable once built. A blank (empty or whitespace-only) payload
/// means "no extension data".
///
/// When embedded in a serde record the payload appears inline as a nested
/// value, and an empty (blank) payload appears as `null`:
///
/// ```
/// # use extension::ExtensionPayload;
/// #[derive(serde::Serialize)]
/// struct Machine {
///     name: String,
///     provider_spec: ExtensionPayload,
/// }
///
/// let machine = Machine {
///     name: "m0".into(),
///     provider_spec: ExtensionPayload::from_raw("hostname: m0"),
/// };
/// assert_eq!(
///     serde_json::to_string(&machine).unwrap(),
///     r#"{"name":"m0","provider_spec":{"hostname":"m0"}}"#
/// );
/// ```
///
/// Embedding goes through the JSON data model, so mapping keys must be
/// strings. A `Yaml` payload such as `1: a` is a valid document but fails to
/// serialize into the wrapper record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionPayload {
    raw: Vec<u8>,
    format: PayloadFormat,
}

impl ExtensionPayload {
    /// A payload carrying no extension data.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wraps bytes from an outside producer (hand-written, stored, or
    /// received). They are tagged [`PayloadFormat::Yaml`].
    pub fn from_raw(raw: impl Into<Vec<u8>>) -> Self {
        Self {
            raw: raw.into(),
            format: PayloadFormat::Yaml,
        }
    }

    /// Writes `value` as compact JSON that the YAML parser reads back to the
    /// same value.
    pub(crate) fn to_json<T>(value: &T) -> Result<Self, serde_json::Error>
    where
        T: Serialize + ?Sized,
    {
        let mut raw = Vec::new();
        value.serialize(&mut serde_json::Serializer::with_formatter(
            &mut raw,
            YamlSafeFormatter,
        ))?;
        Ok(Self {
            raw,
            format: PayloadFormat::Json,
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.raw
    }

    pub fn format(&self) -> PayloadFormat {
        self.format
    }

    /// Returns `true` if the payload holds nothing but whitespace. A blank
    /// payload carries no extension data.
    pub fn is_blank(&self) -> bool {
        self.raw.iter().all(u8::is_ascii_whitespace)
    }

    /// Returns `true` if the payload has no bytes at all.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Length of the raw bytes, whitespace included.
    pub fn len(&self) -> usize {
        self.raw.len()
    }
}

/// Compact JSON whose strings read back unchanged through a YAML parser.
///
/// `serde_json` leaves DEL, the C1 controls, the byte-order mark and the
/// non-characters U+FFFE/U+FFFF unescaped; YAML readers reject them. NEL and
/// the Unicode line and paragraph separators are line breaks to YAML and
/// would be folded inside a quoted scalar. All of these are written as
/// `\uXXXX`, which JSON and YAML decode to the same character.
struct YamlSafeFormatter;

impl serde_json::ser::Formatter for YamlSafeFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (at, c) in fragment.char_indices() {
            if !needs_yaml_escape(c) {
                continue;
            }
            writer.write_all(fragment[start..at].as_bytes())?;
            write!(writer, "\\u{:04x}", u32::from(c))?;
            start = at + c.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

/// Characters `serde_json` passes through that YAML cannot carry verbatim.
/// Controls below U+0020 never reach here; `serde_json` escapes them itself.
fn needs_yaml_escape(c: char) -> bool {
    matches!(
        c,
        '\u{7f}'..='\u{9f}' | '\u{2028}' | '\u{2029}' | '\u{feff}' | '\u{fffe}' | '\u{ffff}'
    )
}

impl Serialize for ExtensionPayload {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if self.is_blank() {
            return serializer.serialize_none();
        }

        let value: serde_json::Value = match self.format {
            PayloadFormat::Json => serde_json::from_slice(&self.raw).map_err(S::Error::custom)?,
            PayloadFormat::Yaml => serde_yaml::from_slice(&self.raw).map_err(S::Error::custom)?,
        };
        value.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ExtensionPayload {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<serde_json::Value>::deserialize(deserializer)? {
            None => Ok(Self::empty()),
            Some(value) => Self::to_json(&value).map_err(D::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Wrapper {
        kind: String,
        #[serde(default)]
        value: ExtensionPayload,
    }

    #[test]
    fn whitespace_only_payload_is_blank() {
        assert!(ExtensionPayload::empty().is_blank());
        assert!(ExtensionPayload::empty().is_empty());
        assert!(!ExtensionPayload::from_raw("{}").is_blank());

        let spaces = ExtensionPayload::from_raw(" \n");
        assert!(spaces.is_blank());
        assert!(!spaces.is_empty());
        assert_eq!(spaces.len(), 2);
    }

    #[test]
    fn blank_payload_embeds_as_null() {
        let wrapper = Wrapper {
            kind: "Machine".into(),
            value: ExtensionPayload::from_raw("\n\t "),
        };
        assert_eq!(
            serde_json::to_string(&wrapper).unwrap(),
            r#"{"kind":"Machine","value":null}"#
        );
    }

    #[test]
    fn from_raw_is_tagged_yaml() {
        let payload = ExtensionPayload::from_raw("a: 1");
        assert_eq!(payload.format(), PayloadFormat::Yaml);
        assert_eq!(payload.as_bytes(), b"a: 1");
        assert_eq!(payload.len(), 4);
    }

    #[test]
    fn empty_payload_embeds_as_null() {
        let wrapper = Wrapper {
            kind: "Machine".into(),
            value: ExtensionPayload::empty(),
        };
        let json = serde_json::to_string(&wrapper).unwrap();
        assert_eq!(json, r#"{"kind":"Machine","value":null}"#);

        let back: Wrapper = serde_json::from_str(&json).unwrap();
        assert!(back.value.is_empty());
    }

    #[test]
    fn missing_field_deserializes_as_empty() {
        let back: Wrapper = serde_json::from_str(r#"{"kind":"Machine"}"#).unwrap();
        assert!(back.value.is_empty());
    }

    #[test]
    fn embedded_payload_is_inline_json() {
        let json = r#"{"kind":"Machine","value":{"hostname":"vm0"}}"#;
        let wrapper: Wrapper = serde_json::from_str(json).unwrap();
        assert_eq!(wrapper.value.format(), PayloadFormat::Json);
        assert_eq!(wrapper.value.as_bytes(), br#"{"hostname":"vm0"}"#);
        assert_eq!(serde_json::to_string(&wrapper).unwrap(), json);
    }

    #[test]
    fn unparseable_payload_fails_to_embed() {
        let wrapper = Wrapper {
            kind: "Machine".into(),
            value: ExtensionPayload::from_raw("{unbalanced"),
        };
        assert!(serde_json::to_string(&wrapper).is_err());
    }

    #[test]
    fn integer_keyed_mapping_fails_to_embed() {
        let payload = ExtensionPayload::from_raw("1: a\n2: b\n");
        let parsed: std::collections::BTreeMap<u32, String> =
            serde_yaml::from_slice(payload.as_bytes()).unwrap();
        assert_eq!(parsed.len(), 2);

        let wrapper = Wrapper {
            kind: "Machine".into(),
            value: payload,
        };
        assert!(serde_json::to_string(&wrapper).is_err());
    }

    #[test]
    fn embedded_control_characters_stay_yaml_readable() {
        let json = "{\"kind\":\"Machine\",\"value\":{\"hostname\":\"a\u{7f}\u{85}b\"}}";
        let wrapper: Wrapper = serde_json::from_str(json).unwrap();
        assert_eq!(
            wrapper.value.as_bytes(),
            br#"{"hostname":"a\u007f\u0085b"}"#
        );

        let value: serde_yaml::Value = serde_yaml::from_slice(wrapper.value.as_bytes()).unwrap();
        assert_eq!(value["hostname"].as_str(), Some("a\u{7f}\u{85}b"));
    }
}
