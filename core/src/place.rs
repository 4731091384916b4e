//! The `Place` document and the rules that turn client payloads into it.
//!
//! # Design
//! Client payloads arrive as loose JSON or form fields. `PlaceInput` removes
//! the identity keys (`id`, `owner`) and the form method override before
//! anything else sees them, then normalizes the three status flags to strict
//! booleans. What remains becomes the free-form `details` of the document.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::InputError;

/// Keys a client may never set on a document.
const RESERVED_KEYS: [&str; 4] = ["id", "_id", "owner", "_method"];

/// System-assigned document identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceId(Uuid);

impl PlaceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlaceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for PlaceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Canonical user identifier. Two owners are the same only if their trimmed
/// strings are byte-equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    /// Returns `None` for blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A user's saved country entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: PlaceId,
    pub owner: OwnerId,
    pub name: String,
    pub visited: bool,
    pub wishlist: bool,
    pub favorite: bool,
    /// Descriptive fields copied from the catalog entry.
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl Place {
    /// Builds a new document. The owner always comes from the caller, never
    /// from the draft.
    pub fn new(owner: OwnerId, draft: PlaceDraft) -> Self {
        Self {
            id: PlaceId::new(),
            owner,
            name: draft.name,
            visited: draft.flags.visited,
            wishlist: draft.flags.wishlist,
            favorite: draft.flags.favorite,
            details: draft.details,
        }
    }

    pub fn is_owned_by(&self, owner: &OwnerId) -> bool {
        &self.owner == owner
    }

    /// Applies a patch in place. `id` and `owner` are never touched.
    pub fn apply(&mut self, patch: PlacePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        self.visited = patch.flags.visited;
        self.wishlist = patch.flags.wishlist;
        self.favorite = patch.flags.favorite;
        for (key, value) in patch.details {
            self.details.insert(key, value);
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceFlags {
    pub visited: bool,
    pub wishlist: bool,
    pub favorite: bool,
}

/// A validated payload for creating a place.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceDraft {
    pub name: String,
    pub flags: PlaceFlags,
    pub details: Map<String, Value>,
}

/// A validated payload for updating a place.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacePatch {
    pub name: Option<String>,
    pub flags: PlaceFlags,
    pub details: Map<String, Value>,
}

/// A raw client payload, before identity stripping and normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceInput(Map<String, Value>);

impl PlaceInput {
    pub fn from_json(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Form fields arrive as strings. Repeated keys keep the last value.
    pub fn from_form<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self(pairs.into_iter().map(|(k, v)| (k, Value::String(v))).collect())
    }

    /// The `_method` override carried by HTML forms, if any.
    pub fn method_override(&self) -> Option<&str> {
        self.0.get("_method").and_then(Value::as_str)
    }

    pub fn into_draft(self) -> Result<PlaceDraft, InputError> {
        let (name, flags, details) = self.split()?;
        Ok(PlaceDraft {
            name: name.ok_or(InputError::MissingName)?,
            flags,
            details,
        })
    }

    pub fn into_patch(self) -> Result<PlacePatch, InputError> {
        let (name, flags, details) = self.split()?;
        Ok(PlacePatch { name, flags, details })
    }

    fn split(mut self) -> Result<(Option<String>, PlaceFlags, Map<String, Value>), InputError> {
        for key in RESERVED_KEYS {
            self.0.remove(key);
        }

        let flags = PlaceFlags {
            visited: truthy(self.0.remove("visited").as_ref()),
            wishlist: truthy(self.0.remove("wishlist").as_ref()),
            favorite: truthy(self.0.remove("favorite").as_ref()),
        };

        let name = match self.0.remove("name") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
            Some(_) => {
                return Err(InputError::InvalidField {
                    field: "name".to_string(),
                    reason: "expected a string".to_string(),
                })
            }
        };

        Ok((name, flags, self.0))
    }
}

/// Normalizes a loosely typed flag to a strict boolean.
///
/// Absent and `null` are false. Strings are false when empty or one of
/// `false`, `off`, `0`, `no` (any case); any other string, including the
/// checkbox value `on`, is true. Numbers are true when non-zero.
pub fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => {
            let s = s.trim();
            !(s.is_empty()
                || s.eq_ignore_ascii_case("false")
                || s.eq_ignore_ascii_case("off")
                || s.eq_ignore_ascii_case("no")
                || s == "0")
        }
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}
