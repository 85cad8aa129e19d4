//! Verified identity claims from the external token verifier.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Immutable claim set of an already-verified identity token.
///
/// Values keep their raw JSON form; [`IdentityClaims::get`] reads only
/// string values, so absent keys, JSON nulls, and non-string values all
/// count as missing. This crate trusts the claims as authentic - signature
/// verification happened upstream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdentityClaims {
    values: BTreeMap<String, Value>,
}

impl IdentityClaims {
    /// Creates an empty claim set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a claim set from a decoded token payload.
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self {
            values: map.into_iter().collect(),
        }
    }

    /// Builds a claim set from string pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), Value::String(v.into())))
                .collect(),
        }
    }

    /// Returns the string value of a claim, or `None` when the claim is
    /// absent, null, or not a string.
    pub fn get(&self, claim: &str) -> Option<&str> {
        self.values.get(claim).and_then(Value::as_str)
    }

    /// Returns true when the claim is present with a string value.
    pub fn contains(&self, claim: &str) -> bool {
        self.get(claim).is_some()
    }

    /// Returns every claim name present, in sorted order, for diagnostics.
    pub fn claim_names(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }

    /// Returns the number of claims present.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true when no claims are present.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Map<String, Value>> for IdentityClaims {
    fn from(map: Map<String, Value>) -> Self {
        Self::from_map(map)
    }
}
