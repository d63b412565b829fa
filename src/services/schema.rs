//! Attestation payload decoding
//!
//! Attestation data is ABI-encoded against a self-describing schema
//! declaration such as `"string verifiedCountry"`. Only `string` fields are
//! supported; that is the only field type any registered schema declares.

use thiserror::Error;

/// Schema declaration for Coinbase country-of-residence attestations.
pub const VERIFIED_COUNTRY_SCHEMA: &str = "string verifiedCountry";

const WORD: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaDecodeError {
    #[error("empty schema declaration")]
    EmptyDeclaration,
    #[error("unsupported field type: {0}")]
    UnsupportedType(String),
    #[error("payload is not hex: {0}")]
    NotHex(String),
    #[error("payload truncated at offset {0}")]
    Truncated(usize),
    #[error("string field is not valid utf-8")]
    InvalidUtf8,
}

/// One decoded field of an attestation payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedField {
    pub name: String,
    pub value: String,
}

/// Decode an ABI-encoded attestation payload against a declared field list.
///
/// The declaration is a comma-separated list of `type name` pairs. Fields
/// decode in declaration order; a payload shorter than the declaration is a
/// [`SchemaDecodeError::Truncated`] error rather than a partial result.
pub fn decode_payload(declaration: &str, data: &str) -> Result<Vec<DecodedField>, SchemaDecodeError> {
    let fields: Vec<(&str, &str)> = declaration
        .split(',')
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .map(|field| {
            let mut parts = field.splitn(2, ' ');
            let kind = parts.next().unwrap_or_default();
            let name = parts.next().unwrap_or_default().trim();
            (kind, name)
        })
        .collect();

    if fields.is_empty() {
        return Err(SchemaDecodeError::EmptyDeclaration);
    }

    let raw = hex::decode(data.trim_start_matches("0x"))
        .map_err(|err| SchemaDecodeError::NotHex(err.to_string()))?;

    let mut decoded = Vec::with_capacity(fields.len());
    for (index, (kind, name)) in fields.iter().enumerate() {
        if *kind != "string" {
            return Err(SchemaDecodeError::UnsupportedType(kind.to_string()));
        }

        let head = index * WORD;
        let offset = read_word(&raw, head)?;
        let length = read_word(&raw, offset)?;
        let start = offset + WORD;
        let end = start
            .checked_add(length)
            .ok_or(SchemaDecodeError::Truncated(start))?;
        let bytes = raw
            .get(start..end)
            .ok_or(SchemaDecodeError::Truncated(start))?;

        let value =
            String::from_utf8(bytes.to_vec()).map_err(|_| SchemaDecodeError::InvalidUtf8)?;

        decoded.push(DecodedField {
            name: name.to_string(),
            value,
        });
    }

    Ok(decoded)
}

fn read_word(raw: &[u8], at: usize) -> Result<usize, SchemaDecodeError> {
    let end = at
        .checked_add(WORD)
        .ok_or(SchemaDecodeError::Truncated(at))?;
    let word = raw.get(at..end).ok_or(SchemaDecodeError::Truncated(at))?;

    // Offsets and lengths fit in the low eight bytes for any real payload.
    let mut value: usize = 0;
    for byte in &word[WORD - 8..] {
        value = (value << 8) | *byte as usize;
    }
    Ok(value)
}
