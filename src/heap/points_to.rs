// SPDX-License-Identifier: BSD-3-Clause
use std::collections::BTreeMap;

use crate::{error::Result, lattice::Lattice};

use super::{
    site::{AllocationSite, SiteKey, Strength},
    table::SiteTable,
};

/// The allocation sites a pointer may refer to.
///
/// The empty set is bottom (the pointer has no value on any execution).
/// Sites are ordered by strength as well as by key: a set mentioning a site
/// weakly is above the same set mentioning it strongly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PointsToSet {
    Top,
    Sites(BTreeMap<SiteKey, Strength>),
}

impl Default for PointsToSet {
    fn default() -> Self {
        PointsToSet::Sites(BTreeMap::new())
    }
}

// ------------------------------------------------------------------
// Constructors

impl PointsToSet {
    pub fn singleton(site: AllocationSite) -> Self {
        Self::from_sites(std::iter::once(site))
    }

    /// Repeated keys keep the weakest strength.
    pub fn from_sites(sites: impl IntoIterator<Item = AllocationSite>) -> Self {
        let mut map = BTreeMap::new();
        for site in sites {
            let strength = site.strength();
            map.entry(site.into_key())
                .and_modify(|s: &mut Strength| *s = (*s).max(strength))
                .or_insert(strength);
        }
        PointsToSet::Sites(map)
    }
}

// ------------------------------------------------------------------
// Operations

impl PointsToSet {
    /// Sites in key order; empty for [`PointsToSet::Top`].
    pub fn iter(&self) -> impl Iterator<Item = AllocationSite> + '_ {
        let sites = match self {
            PointsToSet::Top => None,
            PointsToSet::Sites(m) => Some(m.iter()),
        };
        sites
            .into_iter()
            .flatten()
            .map(|(k, s)| AllocationSite::new(k.clone(), *s))
    }

    pub fn len(&self) -> Option<usize> {
        match self {
            PointsToSet::Top => None,
            PointsToSet::Sites(m) => Some(m.len()),
        }
    }

    pub fn contains(&self, key: &SiteKey) -> bool {
        match self {
            PointsToSet::Top => true,
            PointsToSet::Sites(m) => m.contains_key(key),
        }
    }

    /// The only target, if there is exactly one and it may be strongly
    /// updated.
    pub fn strong_target(&self) -> Option<&SiteKey> {
        match self {
            PointsToSet::Sites(m) if m.len() == 1 => m
                .iter()
                .next()
                .filter(|(_, s)| !s.is_weak())
                .map(|(k, _)| k),
            _ => None,
        }
    }

    pub fn may_alias(&self, other: &Self) -> bool {
        match (self, other) {
            (PointsToSet::Sites(a), _) if a.is_empty() => false,
            (_, PointsToSet::Sites(b)) if b.is_empty() => false,
            (PointsToSet::Top, _) | (_, PointsToSet::Top) => true,
            (PointsToSet::Sites(a), PointsToSet::Sites(b)) => a.keys().any(|k| b.contains_key(k)),
        }
    }

    /// Both sides denote the same single concrete object.
    pub fn must_alias(&self, other: &Self) -> bool {
        match (self.strong_target(), other.strong_target()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Pick up promotions recorded in `table` since the sites were resolved.
    /// Keys unknown to `table` keep their strength.
    pub fn refresh(&self, table: &SiteTable) -> Self {
        match self {
            PointsToSet::Top => PointsToSet::Top,
            PointsToSet::Sites(m) => PointsToSet::Sites(
                m.iter()
                    .map(|(k, s)| {
                        let current = table.strength(k.location()).unwrap_or(*s);
                        (k.clone(), current.max(*s))
                    })
                    .collect(),
            ),
        }
    }
}

// ------------------------------------------------------------------
// Traits

impl std::fmt::Display for PointsToSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PointsToSet::Top => write!(f, "⊤"),
            PointsToSet::Sites(_) => {
                write!(f, "{{")?;
                for (i, site) in self.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", site)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl Lattice for PointsToSet {
    fn top() -> Self {
        PointsToSet::Top
    }

    fn bottom() -> Self {
        PointsToSet::default()
    }

    fn lub_aux(&self, other: &Self) -> Result<Self> {
        let (PointsToSet::Sites(a), PointsToSet::Sites(b)) = (self, other) else {
            return Ok(PointsToSet::Top);
        };
        let mut union = a.clone();
        for (k, s) in b {
            union
                .entry(k.clone())
                .and_modify(|t| *t = (*t).max(*s))
                .or_insert(*s);
        }
        Ok(PointsToSet::Sites(union))
    }

    fn glb_aux(&self, other: &Self) -> Result<Self> {
        match (self, other) {
            (PointsToSet::Sites(a), PointsToSet::Sites(b)) => Ok(PointsToSet::Sites(
                a.iter()
                    .filter_map(|(k, s)| b.get(k).map(|t| (k.clone(), (*s).min(*t))))
                    .collect(),
            )),
            (PointsToSet::Top, x) | (x, PointsToSet::Top) => Ok(x.clone()),
        }
    }

    fn less_or_equal_aux(&self, other: &Self) -> Result<bool> {
        match (self, other) {
            (PointsToSet::Sites(a), PointsToSet::Sites(b)) => Ok(a
                .iter()
                .all(|(k, s)| b.get(k).is_some_and(|t| s <= t))),
            (_, PointsToSet::Top) => Ok(true),
            (PointsToSet::Top, _) => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::site::LocationId;

    fn site(table: &SiteTable, loc: &str) -> AllocationSite {
        table.resolve_site(LocationId::from(loc), None)
    }

    #[test]
    fn union_keeps_weakest() {
        let table = SiteTable::new();
        let a = site(&table, "a");
        let strong = PointsToSet::singleton(a.clone());
        let weak = PointsToSet::singleton(AllocationSite::new(a.into_key(), Strength::Weak));
        let lub = strong.lub(&weak).unwrap();
        assert_eq!(weak, lub);
        assert!(strong.less_or_equal(&weak).unwrap());
        assert!(!weak.less_or_equal(&strong).unwrap());
        assert_eq!(strong, strong.glb(&weak).unwrap());
    }

    #[test]
    fn aliasing() {
        let table = SiteTable::new();
        let a = PointsToSet::singleton(site(&table, "a"));
        let b = PointsToSet::singleton(site(&table, "b"));
        let ab = a.lub(&b).unwrap();
        assert!(!a.may_alias(&b));
        assert!(a.may_alias(&ab));
        assert!(a.must_alias(&a.clone()));
        assert!(!a.must_alias(&ab));
        assert!(PointsToSet::Top.may_alias(&a));
        assert!(!PointsToSet::Top.may_alias(&PointsToSet::bottom()));
        assert_eq!(Some(2), ab.len());
        assert_eq!("{pp@a[s], pp@b[s]}", ab.to_string());
    }

    #[test]
    fn refresh_sees_promotion() {
        let table = SiteTable::new();
        let a = site(&table, "a");
        let pts = PointsToSet::singleton(a.clone());
        table.promote_if_revisited(a.key()).unwrap();
        let refreshed = pts.refresh(&table);
        assert!(!refreshed.must_alias(&refreshed));
        assert!(refreshed.iter().all(|s| s.is_weak()));
    }
}
