// SPDX-License-Identifier: BSD-3-Clause
use std::fmt::Display;

use crate::symbolic::SymbolicExpression;

/// Program location of an allocation. Opaque to the heap model.
#[derive(
    Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
#[serde(transparent)]
pub struct LocationId(String);

impl LocationId {
    pub fn new(s: impl Into<String>) -> Self {
        LocationId(s.into())
    }
}

impl From<&str> for LocationId {
    fn from(s: &str) -> Self {
        LocationId(s.to_string())
    }
}

impl Display for LocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordered so that promotion is `max`: `Strong < Weak`.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    serde::Deserialize,
    serde::Serialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Strength {
    Strong,
    Weak,
}

impl Strength {
    #[inline]
    pub fn is_weak(self) -> bool {
        self == Strength::Weak
    }
}

/// Identity of an abstract heap object.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct SiteKey {
    location: LocationId,
    field: Option<Box<SymbolicExpression>>,
}

impl SiteKey {
    pub fn new(location: LocationId) -> Self {
        SiteKey {
            location,
            field: None,
        }
    }

    pub fn with_field(location: LocationId, field: SymbolicExpression) -> Self {
        SiteKey {
            location,
            field: Some(Box::new(field)),
        }
    }

    #[inline]
    pub fn location(&self) -> &LocationId {
        &self.location
    }

    #[inline]
    pub fn field(&self) -> Option<&SymbolicExpression> {
        self.field.as_deref()
    }
}

impl Display for SiteKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.field {
            None => write!(f, "pp@{}", self.location),
            Some(field) => write!(f, "pp@{}[{}]", self.location, field),
        }
    }
}

/// A [`SiteKey`] together with the strength it had when it was resolved.
#[derive(Clone, Debug)]
pub struct AllocationSite {
    key: SiteKey,
    weak: bool,
}

fn _assert_allocation_site_send_sync()
where
    AllocationSite: Send + Sync,
{
}

impl AllocationSite {
    #[inline]
    pub(crate) fn new(key: SiteKey, strength: Strength) -> Self {
        AllocationSite {
            key,
            weak: strength.is_weak(),
        }
    }

    #[inline]
    pub fn key(&self) -> &SiteKey {
        &self.key
    }

    #[inline]
    pub fn is_weak(&self) -> bool {
        self.weak
    }

    #[inline]
    pub fn strength(&self) -> Strength {
        if self.weak {
            Strength::Weak
        } else {
            Strength::Strong
        }
    }

    /// A write may overwrite the previous contents only if the site stands
    /// for a single concrete object.
    #[inline]
    pub fn strong_update_allowed(&self) -> bool {
        !self.weak
    }

    pub fn into_key(self) -> SiteKey {
        self.key
    }
}

/// Only hashes the key, since weakness is a property the [`SiteTable`]
/// tracks for the key.
///
/// [`SiteTable`]: super::SiteTable
impl std::hash::Hash for AllocationSite {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

/// Only compares the key. See comment on [`Hash`](std::hash::Hash).
impl PartialEq for AllocationSite {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

/// See comment on [`PartialEq`].
impl Eq for AllocationSite {}

/// See comment on [`PartialEq`].
impl PartialOrd for AllocationSite {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// See comment on [`PartialEq`].
impl Ord for AllocationSite {
    #[inline]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.key.cmp(&other.key)
    }
}

impl Display for AllocationSite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]", self.key, if self.weak { "w" } else { "s" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let key = SiteKey::new(LocationId::from("main:3"));
        assert_eq!("pp@main:3", key.to_string());
        let site = AllocationSite::new(key, Strength::Weak);
        assert_eq!("pp@main:3[w]", site.to_string());
        let field = SiteKey::with_field(LocationId::from("main:3"), SymbolicExpression::str("f"));
        assert_eq!(
            "pp@main:3[\"f\"][s]",
            AllocationSite::new(field, Strength::Strong).to_string()
        );
    }

    #[test]
    fn identity_ignores_strength() {
        let key = SiteKey::new(LocationId::from("l"));
        let strong = AllocationSite::new(key.clone(), Strength::Strong);
        let weak = AllocationSite::new(key, Strength::Weak);
        assert_eq!(strong, weak);
        assert_eq!(std::cmp::Ordering::Equal, strong.cmp(&weak));
        assert!(strong.strong_update_allowed());
        assert!(!weak.strong_update_allowed());
        assert!(Strength::Strong < Strength::Weak);
    }
}
