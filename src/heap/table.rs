// SPDX-License-Identifier: BSD-3-Clause
use std::hash::BuildHasherDefault;

use dashmap::DashMap;
use rustc_hash::FxHasher;
use tracing::debug;

use crate::{
    error::{Result, SemanticError},
    symbolic::SymbolicExpression,
};

use super::site::{AllocationSite, LocationId, SiteKey, Strength};

/// Strength of every location resolved by one heap abstraction.
///
/// Shared between threads by reference. Strength only ever moves from
/// [`Strength::Strong`] to [`Strength::Weak`], so concurrent promotions of
/// the same location agree regardless of their order.
#[derive(Debug, Default)]
pub struct SiteTable {
    strengths: DashMap<LocationId, Strength, BuildHasherDefault<FxHasher>>,
}

impl SiteTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn register(&self, location: &LocationId) -> Strength {
        *self
            .strengths
            .entry(location.clone())
            .or_insert_with(|| {
                debug!(%location, "new allocation site");
                Strength::Strong
            })
    }

    /// Name the object allocated at `location`, or its `field`.
    ///
    /// Resolving the same location twice yields equal keys. A location seen
    /// for the first time is strong; field-qualified sites share the
    /// strength of their location.
    pub fn resolve_site(
        &self,
        location: LocationId,
        field: Option<SymbolicExpression>,
    ) -> AllocationSite {
        let strength = self.register(&location);
        let key = match field {
            None => SiteKey::new(location),
            Some(field) => SiteKey::with_field(location, field),
        };
        AllocationSite::new(key, strength)
    }

    /// Record that the allocation of `key` was reached again, e.g. along a
    /// loop back-edge, so the site now summarizes several objects.
    pub fn promote_if_revisited(&self, key: &SiteKey) -> Result<()> {
        match self.strengths.get_mut(key.location()) {
            Some(mut strength) => {
                if !strength.is_weak() {
                    debug!(site = %key, "promoted to weak");
                }
                *strength = (*strength).max(Strength::Weak);
                Ok(())
            }
            None => Err(SemanticError::UnknownSite(key.clone())),
        }
    }

    /// [`SiteTable::resolve_site`] followed by
    /// [`SiteTable::promote_if_revisited`].
    pub fn resolve_revisited(
        &self,
        location: LocationId,
        field: Option<SymbolicExpression>,
    ) -> Result<AllocationSite> {
        let site = self.resolve_site(location, field);
        self.promote_if_revisited(site.key())?;
        Ok(AllocationSite::new(site.into_key(), Strength::Weak))
    }

    pub fn strength(&self, location: &LocationId) -> Option<Strength> {
        self.strengths.get(location).map(|s| *s)
    }

    /// Current view of an already-resolved key.
    pub fn site(&self, key: &SiteKey) -> Option<AllocationSite> {
        self.strength(key.location())
            .map(|s| AllocationSite::new(key.clone(), s))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.strengths.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strengths.is_empty()
    }
}
