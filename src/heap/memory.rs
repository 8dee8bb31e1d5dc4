// SPDX-License-Identifier: BSD-3-Clause
use std::collections::BTreeMap;

use tracing::trace;

use crate::{error::Result, lattice::Lattice};

use super::{
    points_to::PointsToSet,
    site::{AllocationSite, SiteKey},
};

/// Contents of the abstract heap, one value per allocation site.
///
/// Cells that were never written are unconstrained and read as top; the
/// map only stores cells whose value is below top.
#[derive(Clone, Debug, PartialEq)]
pub enum HeapMemory<D> {
    Bottom,
    Cells(BTreeMap<SiteKey, D>),
}

impl<D> Default for HeapMemory<D> {
    fn default() -> Self {
        HeapMemory::Cells(BTreeMap::new())
    }
}

// ------------------------------------------------------------------
// Operations

impl<D: Lattice> HeapMemory<D> {
    fn store(mut cells: BTreeMap<SiteKey, D>, key: SiteKey, v: D) -> Self {
        if v.is_bottom() {
            return HeapMemory::Bottom;
        }
        if v.is_top() {
            cells.remove(&key);
        } else {
            cells.insert(key, v);
        }
        HeapMemory::Cells(cells)
    }

    /// Weak update. A missing cell holds top, which absorbs `v`.
    fn accumulate(cells: &mut BTreeMap<SiteKey, D>, key: &SiteKey, v: &D) -> Result<()> {
        let Some(old) = cells.get(key) else {
            return Ok(());
        };
        let next = old.lub(v)?;
        if next.is_top() {
            cells.remove(key);
        } else {
            cells.insert(key.clone(), next);
        }
        Ok(())
    }

    /// Strong sites are overwritten; weak sites accumulate every value
    /// written to them.
    pub fn write(&self, site: &AllocationSite, v: D) -> Result<Self> {
        let HeapMemory::Cells(cells) = self else {
            return Ok(HeapMemory::Bottom);
        };
        trace!(%site, "heap write");
        if site.strong_update_allowed() {
            return Ok(Self::store(cells.clone(), site.key().clone(), v));
        }
        if v.is_bottom() {
            return Ok(HeapMemory::Bottom);
        }
        let mut cells = cells.clone();
        Self::accumulate(&mut cells, site.key(), &v)?;
        Ok(HeapMemory::Cells(cells))
    }

    /// Write `v` to every site `targets` may denote. Writing through a
    /// pointer with no targets cannot happen, so the result is bottom.
    pub fn write_through(&self, targets: &PointsToSet, v: D) -> Result<Self> {
        let HeapMemory::Cells(cells) = self else {
            return Ok(HeapMemory::Bottom);
        };
        if targets.is_bottom() || v.is_bottom() {
            return Ok(HeapMemory::Bottom);
        }
        if let Some(key) = targets.strong_target() {
            return Ok(Self::store(cells.clone(), key.clone(), v));
        }
        let mut cells = cells.clone();
        let keys: Vec<SiteKey> = match targets {
            PointsToSet::Top => cells.keys().cloned().collect(),
            PointsToSet::Sites(m) => m.keys().cloned().collect(),
        };
        for key in &keys {
            Self::accumulate(&mut cells, key, &v)?;
        }
        Ok(HeapMemory::Cells(cells))
    }

    pub fn read(&self, key: &SiteKey) -> D {
        match self {
            HeapMemory::Bottom => D::bottom(),
            HeapMemory::Cells(cells) => cells.get(key).cloned().unwrap_or_else(D::top),
        }
    }

    /// Join of the cells `targets` may denote.
    pub fn read_through(&self, targets: &PointsToSet) -> Result<D> {
        match (self, targets) {
            (HeapMemory::Bottom, _) => Ok(D::bottom()),
            (_, PointsToSet::Top) => Ok(D::top()),
            (_, PointsToSet::Sites(m)) => m
                .keys()
                .try_fold(D::bottom(), |acc, key| acc.lub(&self.read(key))),
        }
    }
}

// ------------------------------------------------------------------
// Traits

impl<D: std::fmt::Display> std::fmt::Display for HeapMemory<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeapMemory::Bottom => write!(f, "⊥"),
            HeapMemory::Cells(cells) => {
                write!(f, "[")?;
                for (i, (k, v)) in cells.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} -> {}", k, v)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl<D: Lattice> Lattice for HeapMemory<D> {
    fn top() -> Self {
        HeapMemory::default()
    }

    fn bottom() -> Self {
        HeapMemory::Bottom
    }

    fn is_top(&self) -> bool {
        matches!(self, HeapMemory::Cells(cells) if cells.values().all(Lattice::is_top))
    }

    fn lub_aux(&self, other: &Self) -> Result<Self> {
        let (HeapMemory::Cells(a), HeapMemory::Cells(b)) = (self, other) else {
            return Ok(HeapMemory::Bottom);
        };
        let mut cells = BTreeMap::new();
        for (k, v) in a {
            if let Some(w) = b.get(k) {
                let j = v.lub(w)?;
                if !j.is_top() {
                    cells.insert(k.clone(), j);
                }
            }
        }
        Ok(HeapMemory::Cells(cells))
    }

    fn widening_aux(&self, other: &Self) -> Result<Self> {
        let (HeapMemory::Cells(a), HeapMemory::Cells(b)) = (self, other) else {
            return Ok(HeapMemory::Bottom);
        };
        let mut cells = BTreeMap::new();
        for (k, v) in a {
            if let Some(w) = b.get(k) {
                let j = v.widening(w)?;
                if !j.is_top() {
                    cells.insert(k.clone(), j);
                }
            }
        }
        Ok(HeapMemory::Cells(cells))
    }

    fn glb_aux(&self, other: &Self) -> Result<Self> {
        let (HeapMemory::Cells(a), HeapMemory::Cells(b)) = (self, other) else {
            return Ok(HeapMemory::Bottom);
        };
        let mut cells = a.clone();
        for (k, w) in b {
            let m = match a.get(k) {
                Some(v) => v.glb(w)?,
                None => w.clone(),
            };
            if m.is_bottom() {
                return Ok(HeapMemory::Bottom);
            }
            cells.insert(k.clone(), m);
        }
        Ok(HeapMemory::Cells(cells))
    }

    fn less_or_equal_aux(&self, other: &Self) -> Result<bool> {
        let (HeapMemory::Cells(a), HeapMemory::Cells(b)) = (self, other) else {
            return Ok(matches!(self, HeapMemory::Bottom));
        };
        for (k, w) in b {
            let below = match a.get(k) {
                Some(v) => v.less_or_equal(w)?,
                None => w.is_top(),
            };
            if !below {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domains::Sign,
        heap::{site::LocationId, table::SiteTable},
    };

    #[test]
    fn strong_and_weak_updates() {
        let table = SiteTable::new();
        let site = table.resolve_site(LocationId::from("new:1"), None);
        let mem = HeapMemory::<Sign>::top();
        assert_eq!(Sign::Top, mem.read(site.key()));

        let mem = mem.write(&site, Sign::Plus).unwrap();
        let mem = mem.write(&site, Sign::Minus).unwrap();
        assert_eq!(Sign::Minus, mem.read(site.key()));

        let weak = table.resolve_revisited(LocationId::from("new:1"), None).unwrap();
        let mem = mem.write(&weak, Sign::Zero).unwrap();
        assert_eq!(Sign::ZeroMinus, mem.read(weak.key()));
    }

    #[test]
    fn weak_write_to_fresh_cell() {
        let table = SiteTable::new();
        let written = table.resolve_site(LocationId::from("loop"), None);
        let fresh = table.resolve_revisited(LocationId::from("fresh"), None).unwrap();
        let mem = HeapMemory::<Sign>::top().write(&written, Sign::Minus).unwrap();
        let mem = mem.write(&fresh, Sign::Plus).unwrap();
        assert_eq!(Sign::Top, mem.read(fresh.key()));
        assert_eq!(Sign::Minus, mem.read(written.key()));

        // the summarized objects this write missed are still unknown
        table.promote_if_revisited(written.key()).unwrap();
        let weak = table.resolve_site(LocationId::from("loop"), None);
        let mem = HeapMemory::<Sign>::top().write(&weak, Sign::Plus).unwrap();
        assert_eq!(Sign::Top, mem.read(weak.key()));
        assert!(mem.is_top());
    }

    #[test]
    fn write_through_points_to() {
        let table = SiteTable::new();
        let a = table.resolve_site(LocationId::from("a"), None);
        let b = table.resolve_site(LocationId::from("b"), None);
        let mem = HeapMemory::<Sign>::top()
            .write(&a, Sign::Plus)
            .unwrap()
            .write(&b, Sign::Minus)
            .unwrap();

        let only_a = PointsToSet::singleton(a.clone());
        let strong = mem.write_through(&only_a, Sign::Zero).unwrap();
        assert_eq!(Sign::Zero, strong.read(a.key()));

        let both = PointsToSet::from_sites([a.clone(), b.clone()]);
        let weak = mem.write_through(&both, Sign::Zero).unwrap();
        assert_eq!(Sign::ZeroPlus, weak.read(a.key()));
        assert_eq!(Sign::ZeroMinus, weak.read(b.key()));
        assert_eq!(Sign::Top, weak.read_through(&both).unwrap());

        assert!(mem
            .write_through(&PointsToSet::bottom(), Sign::Zero)
            .unwrap()
            .is_bottom());
    }

    #[test]
    fn pointwise_order() {
        let table = SiteTable::new();
        let a = table.resolve_site(LocationId::from("a"), None);
        let plus = HeapMemory::top().write(&a, Sign::Plus).unwrap();
        let zero = HeapMemory::top().write(&a, Sign::Zero).unwrap();
        let lub = plus.lub(&zero).unwrap();
        assert_eq!(Sign::ZeroPlus, lub.read(a.key()));
        assert!(plus.less_or_equal(&lub).unwrap());
        assert!(lub.less_or_equal(&HeapMemory::top()).unwrap());
        assert!(!HeapMemory::top().less_or_equal(&plus).unwrap());
        assert!(plus.glb(&zero).unwrap().is_bottom());
    }
}
