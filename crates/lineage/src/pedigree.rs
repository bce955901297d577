//! Registry of individuals and families.

use crate::error::{Error, Result};
use crate::model::{
    Family, FamilyRecord, Individual, IndividualRecord, NodeRef, Point, Sex, Size,
};
use std::collections::{BTreeMap, BTreeSet};

/// Which side of a family an individual is looked up on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Parent,
    Child,
    Any,
}

/// Hands out individual ids above every id already in use.
///
/// Owned by a single branching run so repeated runs never share state. Once `u32::MAX` has been
/// handed out the allocator is exhausted and every further call returns `None`.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: Option<u32>,
}

impl IdAllocator {
    pub fn after(max_id: u32) -> Self {
        Self {
            next: max_id.checked_add(1),
        }
    }

    pub fn allocate(&mut self) -> Option<u32> {
        let id = self.next?;
        self.next = id.checked_add(1);
        Some(id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Pedigree {
    individuals: BTreeMap<u32, Individual>,
    families: BTreeMap<u32, Family>,
    parent_ids: BTreeSet<u32>,
    child_ids: BTreeSet<u32>,
}

impl Pedigree {
    pub fn new(
        individuals: impl IntoIterator<Item = IndividualRecord>,
        families: impl IntoIterator<Item = FamilyRecord>,
    ) -> Self {
        let mut pedigree = Pedigree::default();

        for record in individuals {
            if pedigree.individuals.contains_key(&record.id) {
                tracing::warn!(individual = record.id, "duplicate individual id; keeping the first");
                continue;
            }
            pedigree.individuals.insert(record.id, Individual::from(record));
        }

        for record in families {
            if pedigree.families.contains_key(&record.id) {
                tracing::warn!(family = record.id, "duplicate family id; keeping the first");
                continue;
            }
            let family = pedigree.family_from_record(record);
            pedigree.parent_ids.extend(family.parents.iter().copied());
            pedigree.child_ids.extend(family.children.iter().copied());
            pedigree.families.insert(family.id, family);
        }

        tracing::info!(
            individuals = pedigree.individuals.len(),
            families = pedigree.families.len(),
            "pedigree loaded"
        );
        pedigree
    }

    fn family_from_record(&self, record: FamilyRecord) -> Family {
        let mut parents = record.parent_ids;
        if parents.len() > 2 {
            tracing::warn!(
                family = record.id,
                parents = parents.len(),
                "family lists more than two parents; ignoring the rest"
            );
            parents.truncate(2);
        }

        let mut father: Option<u32> = None;
        let mut mother: Option<u32> = None;
        let mut undetermined: Vec<u32> = Vec::new();
        for &pid in &parents {
            let Some(parent) = self.individual(pid) else {
                continue;
            };
            match parent.sex {
                Sex::Male if father.is_none() => father = Some(pid),
                Sex::Female if mother.is_none() => mother = Some(pid),
                _ => undetermined.push(pid),
            }
        }
        for pid in undetermined {
            if father.is_none() {
                father = Some(pid);
            } else if mother.is_none() {
                mother = Some(pid);
            }
        }

        let mut family = Family {
            id: record.id,
            parents,
            father,
            mother,
            children: record.child_ids,
            label_size: record.label_size,
            position: Point::default(),
        };
        self.sort_children(&mut family);
        family
    }

    fn sort_children(&self, family: &mut Family) {
        let keys: BTreeMap<u32, i64> = family
            .children
            .iter()
            .map(|&cid| {
                let key = match self.individuals.get(&cid) {
                    Some(child) => child.birth_key(),
                    None => {
                        tracing::warn!(
                            family = family.id,
                            child = cid,
                            "child not found while sorting; treating its birth date as missing"
                        );
                        0
                    }
                };
                (cid, key)
            })
            .collect();
        family
            .children
            .sort_by_key(|cid| keys.get(cid).copied().unwrap_or(0));
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    pub fn individuals(&self) -> impl Iterator<Item = &Individual> {
        self.individuals.values()
    }

    pub fn families(&self) -> impl Iterator<Item = &Family> {
        self.families.values()
    }

    pub fn individual(&self, id: u32) -> Option<&Individual> {
        let found = self.individuals.get(&id);
        if found.is_none() {
            tracing::warn!(individual = id, "individual not found in pedigree");
        }
        found
    }

    pub fn individual_mut(&mut self, id: u32) -> Option<&mut Individual> {
        let found = self.individuals.get_mut(&id);
        if found.is_none() {
            tracing::warn!(individual = id, "individual not found in pedigree");
        }
        found
    }

    pub fn family(&self, id: u32) -> Option<&Family> {
        let found = self.families.get(&id);
        if found.is_none() {
            tracing::warn!(family = id, "family not found in pedigree");
        }
        found
    }

    pub fn father(&self, family: &Family) -> Option<&Individual> {
        family.father.and_then(|id| self.individual(id))
    }

    pub fn mother(&self, family: &Family) -> Option<&Individual> {
        family.mother.and_then(|id| self.individual(id))
    }

    pub fn is_parent(&self, id: u32) -> bool {
        self.parent_ids.contains(&id)
    }

    pub fn is_child(&self, id: u32) -> bool {
        self.child_ids.contains(&id)
    }

    pub fn max_individual_id(&self) -> u32 {
        self.individuals.keys().next_back().copied().unwrap_or(0)
    }

    pub fn individual_families(&self, id: u32, role: Role) -> Vec<&Family> {
        self.families
            .values()
            .filter(|f| match role {
                Role::Parent => f.contains_parent(id),
                Role::Child => f.contains_child(id),
                Role::Any => f.contains(id),
            })
            .collect()
    }

    /// Families in which every listed individual is a parent.
    pub fn families_with_parent(&self, parents: &[u32]) -> Vec<&Family> {
        if parents.is_empty() {
            return Vec::new();
        }
        self.families
            .values()
            .filter(|f| parents.iter().all(|p| f.contains_parent(*p)))
            .collect()
    }

    /// Relationship-graph vertices: every family, then every individual that is not a parent.
    pub fn vertices(&self) -> Vec<NodeRef> {
        let families = self.families.keys().map(|&id| NodeRef::Family(id));
        let leaves = self
            .individuals
            .keys()
            .filter(|id| !self.is_parent(**id))
            .map(|&id| NodeRef::Individual(id));
        families.chain(leaves).collect()
    }

    /// Label size of a graph node. Unknown ids measure as zero.
    pub fn node_size(&self, node: NodeRef, hmargin: f64) -> Size {
        match node {
            NodeRef::Individual(id) => self.individual(id).map(|i| i.size).unwrap_or_default(),
            NodeRef::Family(id) => self
                .family(id)
                .map(|f| self.family_size(f, hmargin))
                .unwrap_or_default(),
        }
    }

    /// Width of the father's slot; a lone mother keeps an `hmargin` placeholder to her left.
    fn father_slot(&self, family: &Family, hmargin: f64) -> f64 {
        match (self.father(family), self.mother(family)) {
            (Some(father), _) => father.size.width,
            (None, Some(_)) => hmargin,
            (None, None) => 0.0,
        }
    }

    /// Parents sit side by side, separated by two margins.
    pub fn family_size(&self, family: &Family, hmargin: f64) -> Size {
        if let Some(size) = family.label_size {
            return size;
        }
        let father = self.father(family).map(|p| p.size).unwrap_or_default();
        let mother = self.mother(family).map(|p| p.size).unwrap_or_default();
        let labels = self.father_slot(family, hmargin) + mother.width;
        let width = if labels > 0.0 {
            labels + hmargin * 2.0
        } else {
            0.0
        };
        Size::new(width, father.height.max(mother.height))
    }

    /// Moves a family and its parents; the father takes the family's position.
    pub fn set_family_coordinates(
        &mut self,
        id: u32,
        at: Point,
        hmargin: f64,
        add_to_history: bool,
    ) {
        let Some(family) = self.families.get(&id) else {
            tracing::warn!(family = id, "family not found in pedigree");
            return;
        };
        let (father, mother) = (family.father, family.mother);
        let mother_x = at.x + self.father_slot(family, hmargin) + hmargin * 2.0;

        if let Some(family) = self.families.get_mut(&id) {
            family.position = at;
        }
        if let Some(p) = father.and_then(|pid| self.individual_mut(pid)) {
            p.set_coordinates(at, add_to_history);
        }
        if let Some(p) = mother.and_then(|pid| self.individual_mut(pid)) {
            p.set_coordinates(Point::new(mother_x, at.y), add_to_history);
        }
    }

    pub fn set_individual_coordinates(&mut self, id: u32, at: Point, add_to_history: bool) {
        if let Some(p) = self.individual_mut(id) {
            p.set_coordinates(at, add_to_history);
        }
    }

    /// Copies an individual under a freshly allocated id and lists the copy as a child wherever
    /// the original is one. Returns the new id, or `None` when `id` is unknown.
    ///
    /// Fails with [`Error::IdsExhausted`] when no id is left, leaving the pedigree untouched.
    pub fn duplicate_individual(
        &mut self,
        id: u32,
        ids: &mut IdAllocator,
    ) -> Result<Option<u32>> {
        let Some(original) = self.individual(id) else {
            return Ok(None);
        };
        let Some(new_id) = ids.allocate() else {
            tracing::error!(original = id, "individual ids exhausted");
            return Err(Error::IdsExhausted { original: id });
        };
        let duplicate = original.duplicate(new_id);
        self.individuals.insert(new_id, duplicate);

        let family_ids: Vec<u32> = self
            .individual_families(id, Role::Child)
            .into_iter()
            .map(|f| f.id)
            .collect();
        for fid in family_ids {
            let Some(mut family) = self.families.remove(&fid) else {
                continue;
            };
            family.children.push(new_id);
            self.sort_children(&mut family);
            self.families.insert(fid, family);
        }
        self.child_ids.insert(new_id);

        tracing::debug!(original = id, duplicate = new_id, "created duplicate individual");
        Ok(Some(new_id))
    }
}
