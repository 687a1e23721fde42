//! Traversal over the group forest.
//!
//! Groups are visited depth-first in pre-order (a group before its
//! subgroups), keeping sibling order; targets are visited in stored order
//! within each group. Visitors are plain values implementing
//! [`GroupVisitor`] or [`TargetVisitor`]; closures returning
//! `Result<Visit<R>>` implement both.
//!
//! ```rust,ignore
//! use testbed::inventory::{Group, Inventory, Visit};
//!
//! let depths = inventory.walk_groups(&mut |group: &Group| -> testbed::Result<Visit<usize>> {
//!     Ok(Visit::One(group.targets.len()))
//! })?;
//! ```

use super::group::{Group, GroupPath};
use super::target::Target;
use super::Inventory;
use crate::error::Result;

/// What a visitor produced for one node.
#[derive(Debug, Clone, PartialEq)]
pub enum Visit<R> {
    /// Nothing to collect
    Skip,
    /// A single value
    One(R),
    /// Several values, flattened one level into the result
    Many(Vec<R>),
}

impl<R> Visit<R> {
    fn flatten_into(self, out: &mut Vec<R>) {
        match self {
            Visit::Skip => {}
            Visit::One(value) => out.push(value),
            Visit::Many(values) => out.extend(values),
        }
    }
}

impl<R> From<Option<R>> for Visit<R> {
    fn from(value: Option<R>) -> Self {
        value.map_or(Visit::Skip, Visit::One)
    }
}

impl<R> From<Vec<R>> for Visit<R> {
    fn from(values: Vec<R>) -> Self {
        Visit::Many(values)
    }
}

/// Called once per group during [`Inventory::walk_groups`].
pub trait GroupVisitor<R> {
    /// Visit one group. An error aborts the walk and is returned as is.
    fn visit_group(&mut self, group: &Group) -> Result<Visit<R>>;
}

/// Called once per target during [`Inventory::walk_targets`].
pub trait TargetVisitor<R> {
    /// Visit one target. An error aborts the walk and is returned as is.
    fn visit_target(&mut self, target: &Target) -> Result<Visit<R>>;
}

impl<R, F> GroupVisitor<R> for F
where
    F: FnMut(&Group) -> Result<Visit<R>>,
{
    fn visit_group(&mut self, group: &Group) -> Result<Visit<R>> {
        self(group)
    }
}

impl<R, F> TargetVisitor<R> for F
where
    F: FnMut(&Target) -> Result<Visit<R>>,
{
    fn visit_target(&mut self, target: &Target) -> Result<Visit<R>> {
        self(target)
    }
}

/// Default group visitor: the group name, lower-cased.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowercaseName;

impl GroupVisitor<String> for LowercaseName {
    fn visit_group(&mut self, group: &Group) -> Result<Visit<String>> {
        Ok(Visit::One(group.name.to_lowercase()))
    }
}

/// Default target visitor: the target uri, lower-cased.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowercaseUri;

impl TargetVisitor<String> for LowercaseUri {
    fn visit_target(&mut self, target: &Target) -> Result<Visit<String>> {
        Ok(Visit::One(target.uri.to_lowercase()))
    }
}

/// Pre-order iterator over every group in the forest, with its position.
#[derive(Debug, Clone)]
pub struct Groups<'a> {
    stack: Vec<(GroupPath, &'a Group)>,
}

impl<'a> Groups<'a> {
    pub(crate) fn new(roots: &'a [Group]) -> Self {
        let stack = roots
            .iter()
            .enumerate()
            .rev()
            .map(|(index, group)| (GroupPath::root(index), group))
            .collect();
        Self { stack }
    }
}

impl<'a> Iterator for Groups<'a> {
    type Item = (GroupPath, &'a Group);

    fn next(&mut self) -> Option<Self::Item> {
        let (path, group) = self.stack.pop()?;
        for (index, child) in group.groups.iter().enumerate().rev() {
            self.stack.push((path.child(index), child));
        }
        Some((path, group))
    }
}

impl Inventory {
    /// Iterate over every group with its [`GroupPath`], pre-order.
    pub fn group_paths(&self) -> Groups<'_> {
        Groups::new(&self.groups)
    }

    /// Iterate over every group, pre-order.
    pub fn iter_groups(&self) -> impl Iterator<Item = &Group> + '_ {
        self.group_paths().map(|(_, group)| group)
    }

    /// Iterate over every target in traversal order.
    pub fn iter_targets(&self) -> impl Iterator<Item = &Target> + '_ {
        self.iter_groups().flat_map(|group| group.targets.iter())
    }

    /// Visit every group in pre-order and collect what the visitor returns.
    ///
    /// `Visit::Many` results are flattened one level and `Visit::Skip` is
    /// dropped. The first visitor error stops the walk.
    pub fn walk_groups<R, V>(&self, visitor: &mut V) -> Result<Vec<R>>
    where
        V: GroupVisitor<R> + ?Sized,
    {
        let mut collected = Vec::new();
        for group in self.iter_groups() {
            visitor.visit_group(group)?.flatten_into(&mut collected);
        }
        Ok(collected)
    }

    /// Visit every target, group by group in pre-order, and collect what the
    /// visitor returns.
    pub fn walk_targets<R, V>(&self, visitor: &mut V) -> Result<Vec<R>>
    where
        V: TargetVisitor<R> + ?Sized,
    {
        self.walk_groups(&mut |group: &Group| -> Result<Visit<R>> {
            let mut collected = Vec::new();
            for target in &group.targets {
                visitor.visit_target(target)?.flatten_into(&mut collected);
            }
            Ok(Visit::Many(collected))
        })
    }
}
