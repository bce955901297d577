//! Pedigree entities and geometry primitives.
//!
//! Records arrive from an upstream parser with ids, relationships, birth dates and pre-measured
//! label sizes. Positions are written back onto the entities once layout is done.

use crate::date;
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Sex {
    #[serde(alias = "M")]
    Male,
    #[serde(alias = "F")]
    Female,
    #[default]
    #[serde(alias = "U")]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned extremes of a set of labels, in layout coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::empty()
    }
}

impl Bounds {
    pub const fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            min_y: f64::INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    /// Grows the bounds to cover a label whose top-left corner is `at`.
    pub fn include(&mut self, at: Point, size: Size) {
        self.min_x = self.min_x.min(at.x);
        self.max_x = self.max_x.max(at.x + size.width);
        self.min_y = self.min_y.min(at.y);
        self.max_y = self.max_y.max(at.y + size.height);
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            max_x: self.max_x.max(other.max_x),
            min_y: self.min_y.min(other.min_y),
            max_y: self.max_y.max(other.max_y),
        }
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        if self.is_empty() {
            return;
        }
        self.min_x += dx;
        self.max_x += dx;
        self.min_y += dy;
        self.max_y += dy;
    }

    pub fn width(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max_x - self.min_x
        }
    }

    pub fn height(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max_y - self.min_y
        }
    }
}

/// A relationship-graph node: a family or an individual that is not a parent anywhere.
///
/// The graph keys nodes by their string form, `F<id>` or `P<id>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeRef {
    Family(u32),
    Individual(u32),
}

impl NodeRef {
    pub fn key(&self) -> String {
        self.to_string()
    }

    pub fn is_family(&self) -> bool {
        matches!(self, NodeRef::Family(_))
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeRef::Family(id) => write!(f, "F{id}"),
            NodeRef::Individual(id) => write!(f, "P{id}"),
        }
    }
}

impl FromStr for NodeRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || Error::UnknownNode {
            node: s.to_string(),
        };
        let (kind, digits) = s.split_at_checked(1).ok_or_else(unknown)?;
        let id: u32 = digits.parse().map_err(|_| unknown())?;
        match kind {
            "F" => Ok(NodeRef::Family(id)),
            "P" => Ok(NodeRef::Individual(id)),
            _ => Err(unknown()),
        }
    }
}

impl Serialize for NodeRef {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NodeRef {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Individual record as produced by the upstream parser.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IndividualRecord {
    pub id: u32,
    pub sex: Sex,
    pub mother_id: Option<u32>,
    pub father_id: Option<u32>,
    pub birth_date: Option<String>,
    pub label_size: Size,
}

/// Family record as produced by the upstream parser.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FamilyRecord {
    pub id: u32,
    pub parent_ids: Vec<u32>,
    pub child_ids: Vec<u32>,
    /// Overrides the size derived from the parents' labels.
    pub label_size: Option<Size>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    pub id: u32,
    pub sex: Sex,
    pub mother: Option<u32>,
    pub father: Option<u32>,
    pub birth: Option<String>,
    pub size: Size,
    pub position: Point,
    /// Set on individuals created to stand in for `duplicate_of` inside another branch.
    pub duplicate_of: Option<u32>,
    history: Vec<Point>,
}

impl Individual {
    pub fn birth_key(&self) -> date::SortKey {
        date::sort_key(self.birth.as_deref())
    }

    /// Moves the individual, optionally remembering the position. Each distinct position is kept
    /// once, in the order it was first assigned.
    pub fn set_coordinates(&mut self, at: Point, add_to_history: bool) {
        self.position = at;
        if add_to_history && !self.history.contains(&at) {
            self.history.push(at);
        }
    }

    pub fn coordinate_history(&self) -> &[Point] {
        &self.history
    }

    /// A copy with a fresh id, no recorded positions, that remembers where it came from.
    pub(crate) fn duplicate(&self, id: u32) -> Individual {
        Individual {
            id,
            duplicate_of: Some(self.duplicate_of.unwrap_or(self.id)),
            history: Vec::new(),
            ..self.clone()
        }
    }
}

impl From<IndividualRecord> for Individual {
    fn from(r: IndividualRecord) -> Self {
        Individual {
            id: r.id,
            sex: r.sex,
            mother: r.mother_id,
            father: r.father_id,
            birth: r.birth_date,
            size: r.label_size,
            position: Point::default(),
            duplicate_of: None,
            history: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Family {
    pub id: u32,
    /// Parent ids in record order (at most two are used).
    pub parents: Vec<u32>,
    pub father: Option<u32>,
    pub mother: Option<u32>,
    /// Child ids, kept sorted by birth date (missing dates first).
    pub children: Vec<u32>,
    pub label_size: Option<Size>,
    pub position: Point,
}

impl Family {
    pub fn contains_parent(&self, id: u32) -> bool {
        self.parents.contains(&id)
    }

    pub fn contains_child(&self, id: u32) -> bool {
        self.children.contains(&id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.contains_parent(id) || self.contains_child(id)
    }
}
