//! Related-entity projection.
//!
//! `includeOptionalProperties` paths such as `/quotes/policy/tenant` name related
//! entities by their external property names. Paths are validated against the
//! entity catalog before any lookup, merged into a [`RelationTree`] that tells the
//! repository what to eager-load, and finally used to prune and verify the loaded
//! graph. A collection continues into its first element only: the paths declare
//! the shape expected by downstream type checks, not an enumeration of records.

use std::collections::BTreeMap;

use super::catalog::EntityType;
use super::error::ResolutionError;
use super::repository::{EntityAggregate, Related};

pub const INCLUDE_OPTIONAL_PROPERTIES: &str = "includeOptionalProperties";

/// Requested relations, keyed by canonical property name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationTree {
    children: BTreeMap<&'static str, RelationTree>,
}

impl RelationTree {
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn children(&self) -> impl Iterator<Item = (&'static str, &RelationTree)> {
        self.children.iter().map(|(property, tree)| (*property, tree))
    }

    pub fn child(&self, property: &str) -> Option<&RelationTree> {
        self.children.get(property)
    }

    /// Top-level property names, in the order the repository should load them.
    pub fn property_names(&self) -> Vec<&'static str> {
        self.children.keys().copied().collect()
    }

    fn insert(&mut self, segments: &[&'static str]) {
        if let Some((first, rest)) = segments.split_first() {
            self.children.entry(*first).or_default().insert(rest);
        }
    }
}

/// Parsed and validated `includeOptionalProperties` for one root entity type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedEntityRequest {
    root: EntityType,
    paths: Vec<Vec<&'static str>>,
    tree: RelationTree,
}

impl RelatedEntityRequest {
    pub fn none(root: EntityType) -> Self {
        Self {
            root,
            paths: Vec::new(),
            tree: RelationTree::default(),
        }
    }

    pub fn parse<S: AsRef<str>>(root: EntityType, paths: &[S]) -> Result<Self, ResolutionError> {
        let mut request = Self::none(root);
        for raw in paths {
            let segments = parse_path(root, raw.as_ref())?;
            if !request.paths.contains(&segments) {
                request.tree.insert(&segments);
                request.paths.push(segments);
            }
        }
        Ok(request)
    }

    pub fn tree(&self) -> &RelationTree {
        &self.tree
    }

    /// Canonical form of each requested path, e.g. `/quoteVersions/customer`.
    pub fn paths(&self) -> Vec<String> {
        self.paths
            .iter()
            .map(|segments| format!("/{}", segments.join("/")))
            .collect()
    }

    /// Keep only the requested relations and check that every requested segment
    /// resolved to a value.
    pub fn project(&self, aggregate: EntityAggregate) -> Result<EntityAggregate, ResolutionError> {
        let mut trail = Vec::new();
        project_node(self.root, aggregate, &self.tree, &mut trail)
    }
}

fn parse_path(root: EntityType, raw: &str) -> Result<Vec<&'static str>, ResolutionError> {
    let trimmed = raw.trim();
    let body = trimmed.strip_prefix('/').unwrap_or(trimmed);
    if body.is_empty() {
        return Err(ResolutionError::invalid(
            INCLUDE_OPTIONAL_PROPERTIES,
            format!("'{raw}' does not name a property"),
        ));
    }

    let mut current = root;
    let mut segments = Vec::new();
    for segment in body.split('/') {
        if segment.is_empty() {
            return Err(ResolutionError::invalid(
                INCLUDE_OPTIONAL_PROPERTIES,
                format!("'{raw}' contains an empty segment"),
            ));
        }

        let relation = current.relation(segment).ok_or_else(|| {
            ResolutionError::invalid(
                INCLUDE_OPTIONAL_PROPERTIES,
                format!(
                    "'{raw}': {} has no optional property named '{segment}'",
                    current.name()
                ),
            )
        })?;
        segments.push(relation.property);
        current = relation.target;
    }

    Ok(segments)
}

fn project_node(
    root: EntityType,
    aggregate: EntityAggregate,
    tree: &RelationTree,
    trail: &mut Vec<&'static str>,
) -> Result<EntityAggregate, ResolutionError> {
    let EntityAggregate {
        record,
        mut related,
    } = aggregate;
    let mut kept = BTreeMap::new();

    for (property, subtree) in tree.children() {
        trail.push(property);
        let projected = match related.remove(property) {
            Some(Related::One(child)) => {
                Related::One(Box::new(project_node(root, *child, subtree, trail)?))
            }
            Some(Related::Many(children)) if subtree.is_empty() || !children.is_empty() => {
                let mut projected = Vec::with_capacity(children.len());
                for (index, child) in children.into_iter().enumerate() {
                    if index == 0 {
                        projected.push(project_node(root, child, subtree, trail)?);
                    } else {
                        projected.push(prune_node(child, subtree));
                    }
                }
                Related::Many(projected)
            }
            _ => {
                return Err(ResolutionError::RelatedEntityMissing {
                    entity_type: root,
                    path: format!("/{}", trail.join("/")),
                })
            }
        };
        trail.pop();
        kept.insert(property.to_string(), projected);
    }

    Ok(EntityAggregate {
        record,
        related: kept,
    })
}

fn prune_node(aggregate: EntityAggregate, tree: &RelationTree) -> EntityAggregate {
    let EntityAggregate {
        record,
        mut related,
    } = aggregate;
    let mut kept = BTreeMap::new();

    for (property, subtree) in tree.children() {
        let pruned = match related.remove(property) {
            Some(Related::One(child)) => Related::One(Box::new(prune_node(*child, subtree))),
            Some(Related::Many(children)) => Related::Many(
                children
                    .into_iter()
                    .map(|child| prune_node(child, subtree))
                    .collect(),
            ),
            None => continue,
        };
        kept.insert(property.to_string(), pruned);
    }

    EntityAggregate {
        record,
        related: kept,
    }
}
