//! Left-to-right order of the children of a branch node.

use crate::consanguinity::ConsanguinityOracle;
use crate::date::SortKey;
use crate::error::{Error, Result};
use crate::model::NodeRef;
use crate::pedigree::Pedigree;

/// Orders siblings by birth date.
///
/// A family node stands for a couple, so it sorts by the date of the parent that descends from
/// the node above it. When that cannot be decided the key falls back to `0`.
pub struct SiblingOrder<'a> {
    pedigree: &'a Pedigree,
    oracle: &'a ConsanguinityOracle,
}

impl<'a> SiblingOrder<'a> {
    pub fn new(pedigree: &'a Pedigree, oracle: &'a ConsanguinityOracle) -> Self {
        Self { pedigree, oracle }
    }

    /// Sort key of `child` as seen from its branch parent `parent`.
    pub fn key(&self, parent: NodeRef, child: NodeRef) -> Result<SortKey> {
        let pedigree = self.pedigree;
        let fid = match child {
            NodeRef::Individual(id) => {
                return Ok(pedigree.individual(id).map(|p| p.birth_key()).unwrap_or(0));
            }
            NodeRef::Family(fid) => fid,
        };
        let Some(family) = pedigree.family(fid) else {
            return Ok(0);
        };

        let (father, mother) = match (pedigree.father(family), pedigree.mother(family)) {
            (None, None) => {
                tracing::error!(family = fid, "cannot order a family without parents");
                return Err(Error::FamilyWithoutParents { family: fid });
            }
            (Some(only), None) | (None, Some(only)) => return Ok(only.birth_key()),
            (Some(father), Some(mother)) => (father, mother),
        };

        match parent {
            NodeRef::Family(src) => {
                let Some(source) = pedigree.family(src) else {
                    return Ok(0);
                };
                for s in [source.father, source.mother].into_iter().flatten() {
                    for t in [father, mother] {
                        if self.oracle.are_related(s, t.id) {
                            return Ok(t.birth_key());
                        }
                    }
                }
                Ok(0)
            }
            NodeRef::Individual(pid) => {
                if self.oracle.are_related(pid, father.id) {
                    Ok(father.birth_key())
                } else {
                    Ok(mother.birth_key())
                }
            }
        }
    }

    /// Stable sort of `children` by [`SiblingOrder::key`].
    pub fn sort(&self, parent: NodeRef, children: &mut [NodeRef]) -> Result<()> {
        let mut keyed = children
            .iter()
            .map(|&c| Ok((self.key(parent, c)?, c)))
            .collect::<Result<Vec<_>>>()?;
        keyed.sort_by_key(|(key, _)| *key);
        for (slot, (_, child)) in children.iter_mut().zip(keyed) {
            *slot = child;
        }
        Ok(())
    }
}
