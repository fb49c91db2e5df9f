//! Binary data that encodes to unpadded Base64 UrlSafe, the form WebAuthn
//! uses to carry `ArrayBuffer` values through JSON. Compatible with serde.
//!
//! Decoding forgives padding and the standard alphabet: `-` and `_` are
//! mapped back onto `+` and `/`, the canonical amount of `=` padding is
//! re-derived from the input length, and the result is decoded with the
//! standard engine. Anything that still fails is [DecodeError::Malformed].

#![deny(warnings)]
#![warn(unused_extern_crates)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::unreachable)]
#![deny(clippy::await_holding_lock)]
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::trivially_copy_pass_by_ref)]

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use serde::de::{SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Deref, DerefMut};


/// Leading text of every [DecodeError] message, including when it surfaces
/// through a deserializer.
pub const MALFORMED_PREFIX: &str = "malformed base64url input";

/// Failure to turn text back into bytes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The input is not valid Base64URL once the alphabet has been mapped
    /// back and padding restored.
    #[error("{}: {}", MALFORMED_PREFIX, .0)]
    Malformed(String),
}

/// Encode `input` as URL-safe Base64 with all trailing padding removed.
pub fn encode<T: AsRef<[u8]>>(input: T) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Decode URL-safe (or standard) Base64, with or without padding.
pub fn decode<T: AsRef<str>>(input: T) -> Result<Vec<u8>, DecodeError> {
    let input = input.as_ref();
    let mut standard: String = input
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            c => c,
        })
        .collect();

    let pad_len = (4 - standard.len() % 4) % 4;
    standard.extend(std::iter::repeat('=').take(pad_len));

    STANDARD
        .decode(standard.as_bytes())
        .map_err(|e| DecodeError::Malformed(e.to_string()))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Ord, PartialOrd, Hash)]
/// A container for binary that should be base64 encoded in serialisation. In
/// reverse, deserialising accepts the encodings [decode] accepts, as well as
/// a sequence of byte values.
pub struct Base64UrlSafeData(pub Vec<u8>);

impl Base64UrlSafeData {
    /// The encoded form, as it appears in JSON.
    pub fn encoded(&self) -> String {
        encode(&self.0)
    }

    /// Returns `None` for an empty container, so "present but empty" can be
    /// normalised to "absent".
    pub fn non_empty(self) -> Option<Self> {
        if self.0.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

impl fmt::Display for Base64UrlSafeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", encode(&self.0))
    }
}

impl Deref for Base64UrlSafeData {
    type Target = Vec<u8>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Base64UrlSafeData {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Vec<u8>> for Base64UrlSafeData {
    fn from(v: Vec<u8>) -> Base64UrlSafeData {
        Base64UrlSafeData(v)
    }
}

impl<const N: usize> From<[u8; N]> for Base64UrlSafeData {
    fn from(v: [u8; N]) -> Base64UrlSafeData {
        Base64UrlSafeData(v.to_vec())
    }
}

impl From<&[u8]> for Base64UrlSafeData {
    fn from(v: &[u8]) -> Base64UrlSafeData {
        Base64UrlSafeData(v.to_vec())
    }
}

impl From<Base64UrlSafeData> for Vec<u8> {
    fn from(v: Base64UrlSafeData) -> Vec<u8> {
        v.0
    }
}

impl AsRef<[u8]> for Base64UrlSafeData {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl PartialEq<[u8]> for Base64UrlSafeData {
    fn eq(&self, other: &[u8]) -> bool {
        self.0.as_slice().eq(other)
    }
}

impl PartialEq<Vec<u8>> for Base64UrlSafeData {
    fn eq(&self, other: &Vec<u8>) -> bool {
        self.0.eq(other)
    }
}

impl<const N: usize> PartialEq<[u8; N]> for Base64UrlSafeData {
    fn eq(&self, other: &[u8; N]) -> bool {
        self.0.as_slice().eq(other.as_slice())
    }
}

impl TryFrom<&str> for Base64UrlSafeData {
    type Error = DecodeError;

    fn try_from(v: &str) -> Result<Self, Self::Error> {
        decode(v).map(Base64UrlSafeData)
    }
}

struct Base64UrlSafeDataVisitor;

impl<'de> Visitor<'de> for Base64UrlSafeDataVisitor {
    type Value = Base64UrlSafeData;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(
            formatter,
            "a url-safe base64-encoded string or sequence of integers"
        )
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        decode(v)
            .map(Base64UrlSafeData)
            .map_err(serde::de::Error::custom)
    }

    fn visit_seq<A>(self, mut v: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut data = if let Some(sz) = v.size_hint() {
            Vec::with_capacity(sz)
        } else {
            Vec::new()
        };

        while let Some(i) = v.next_element()? {
            data.push(i)
        }
        Ok(Base64UrlSafeData(data))
    }
}

impl<'de> Deserialize<'de> for Base64UrlSafeData {
    fn deserialize<D>(deserializer: D) -> Result<Self, <D as Deserializer<'de>>::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(Base64UrlSafeDataVisitor)
    }
}

impl Serialize for Base64UrlSafeData {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&encode(&self.0))
    }
}
