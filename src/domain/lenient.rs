// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serde helpers accepting either a native value or its string spelling.
//!
//! Property files and environment variables only produce strings, so a
//! bootstrap `enabled=true` must deserialize the same as YAML `enabled: true`.

use serde::de::{self, Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Native(T),
    Text(String),
}

impl<T> Lenient<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    fn resolve<E: de::Error>(self) -> Result<T, E> {
        match self {
            Lenient::Native(value) => Ok(value),
            Lenient::Text(text) => text.trim().parse().map_err(|e| {
                E::custom(format!("invalid value '{}': {}", text, e))
            }),
        }
    }
}

/// Deserializes an optional value given natively or as a string.
pub(crate) fn option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: fmt::Display,
{
    Option::<Lenient<T>>::deserialize(deserializer)?
        .map(Lenient::resolve)
        .transpose()
}

/// Deserializes a boolean given natively or as a string.
pub(crate) fn bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Lenient::<bool>::deserialize(deserializer)?.resolve()
}
