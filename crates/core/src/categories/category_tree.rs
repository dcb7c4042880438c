//! In-memory view of the category forest.
//!
//! Categories are held in an arena and linked by index. Every walk is bounded
//! by the number of categories, so a parent cycle that slipped into storage
//! surfaces as [`CategoryError::InternalConsistency`] instead of a hang.

use std::collections::HashMap;

use log::warn;

use crate::errors::CategoryError;

use super::{Category, CategoryTreeNode};

type TreeResult<T> = std::result::Result<T, CategoryError>;

/// Snapshot of all categories, indexed for hierarchy queries.
#[derive(Debug, Clone, Default)]
pub struct CategoryForest {
    nodes: Vec<Category>,
    index: HashMap<String, usize>,
    children: Vec<Vec<usize>>,
    roots: Vec<usize>,
}

impl CategoryForest {
    /// Builds the forest. Siblings are ordered by `(sort_order, name)`.
    pub fn new(mut categories: Vec<Category>) -> Self {
        categories.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then_with(|| a.name.cmp(&b.name))
        });

        let index: HashMap<String, usize> = categories
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id.clone(), i))
            .collect();

        let mut children = vec![Vec::new(); categories.len()];
        let mut roots = Vec::new();
        for (i, category) in categories.iter().enumerate() {
            match category.parent_id.as_deref() {
                None => roots.push(i),
                Some(parent_id) => match index.get(parent_id) {
                    Some(&p) => children[p].push(i),
                    None => warn!(
                        "Category {} references missing parent {}",
                        category.id, parent_id
                    ),
                },
            }
        }

        Self {
            nodes: categories,
            index,
            children,
            roots,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Category> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn roots(&self) -> impl Iterator<Item = &Category> {
        self.roots.iter().map(|&i| &self.nodes[i])
    }

    /// Direct children of `id`, empty for unknown ids.
    pub fn children_of(&self, id: &str) -> impl Iterator<Item = &Category> {
        self.index
            .get(id)
            .map(|&i| self.children[i].as_slice())
            .unwrap_or_default()
            .iter()
            .map(|&c| &self.nodes[c])
    }

    pub fn has_children(&self, id: &str) -> bool {
        self.index
            .get(id)
            .is_some_and(|&i| !self.children[i].is_empty())
    }

    fn index_of(&self, id: &str) -> TreeResult<usize> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| CategoryError::NotFound(id.to_string()))
    }

    /// Index of the parent of node `i`, or `None` for a root.
    fn parent_index(&self, i: usize) -> TreeResult<Option<usize>> {
        match self.nodes[i].parent_id.as_deref() {
            None => Ok(None),
            Some(parent_id) => self.index.get(parent_id).copied().map(Some).ok_or_else(|| {
                CategoryError::InternalConsistency(format!(
                    "category {} references missing parent {}",
                    self.nodes[i].id, parent_id
                ))
            }),
        }
    }

    /// Walks from `id` up to its root, starting with `id` itself.
    fn ancestor_chain(&self, id: &str) -> TreeResult<Vec<usize>> {
        let mut chain = vec![self.index_of(id)?];
        let mut current = chain[0];
        while let Some(parent) = self.parent_index(current)? {
            if chain.len() >= self.nodes.len() {
                return Err(CategoryError::InternalConsistency(format!(
                    "parent chain of category {} does not reach a root",
                    id
                )));
            }
            chain.push(parent);
            current = parent;
        }
        Ok(chain)
    }

    /// Path from the root down to `id`, inclusive.
    pub fn breadcrumbs(&self, id: &str) -> TreeResult<Vec<&Category>> {
        let chain = self.ancestor_chain(id)?;
        Ok(chain.into_iter().rev().map(|i| &self.nodes[i]).collect())
    }

    /// Depth of `id`; roots are level 0.
    pub fn level_of(&self, id: &str) -> TreeResult<usize> {
        Ok(self.ancestor_chain(id)?.len() - 1)
    }

    /// All categories exactly `level` steps below a root.
    pub fn at_level(&self, level: i32) -> TreeResult<Vec<&Category>> {
        let level = usize::try_from(level).map_err(|_| {
            CategoryError::InvalidArgument(format!("level must be non-negative, got {}", level))
        })?;

        let mut current = self.roots.clone();
        for _ in 0..level {
            if current.is_empty() {
                break;
            }
            current = current
                .iter()
                .flat_map(|&i| self.children[i].iter().copied())
                .collect();
        }
        Ok(current.into_iter().map(|i| &self.nodes[i]).collect())
    }

    /// Checks that `category_id` may hang under `new_parent_id`.
    ///
    /// `category_id` does not have to exist yet, which covers new categories.
    pub fn validate_parent(
        &self,
        category_id: &str,
        new_parent_id: Option<&str>,
    ) -> TreeResult<()> {
        let Some(parent_id) = new_parent_id else {
            return Ok(());
        };
        if parent_id == category_id {
            return Err(CategoryError::InvalidHierarchy(category_id.to_string()));
        }

        let start = self.index_of(parent_id)?;
        let mut current = Some(start);
        let mut steps = 0usize;
        while let Some(i) = current {
            if self.nodes[i].id == category_id {
                return Err(CategoryError::CyclicHierarchy {
                    category_id: category_id.to_string(),
                    parent_id: parent_id.to_string(),
                });
            }
            steps += 1;
            if steps > self.nodes.len() {
                return Err(CategoryError::InternalConsistency(format!(
                    "parent chain of category {} does not reach a root",
                    parent_id
                )));
            }
            current = self.parent_index(i)?;
        }
        Ok(())
    }

    /// Materializes the whole forest as nested nodes.
    pub fn materialize(&self) -> TreeResult<Vec<CategoryTreeNode>> {
        let mut visited = 0usize;
        let tree = self
            .roots
            .iter()
            .map(|&r| self.build_node(r, 0, &mut visited))
            .collect::<TreeResult<Vec<_>>>()?;

        if visited != self.nodes.len() {
            return Err(CategoryError::InternalConsistency(format!(
                "{} categories are not reachable from any root",
                self.nodes.len() - visited
            )));
        }
        Ok(tree)
    }

    fn build_node(
        &self,
        i: usize,
        depth: usize,
        visited: &mut usize,
    ) -> TreeResult<CategoryTreeNode> {
        if depth >= self.nodes.len() {
            return Err(CategoryError::InternalConsistency(
                "category tree is deeper than the number of categories".to_string(),
            ));
        }
        *visited += 1;

        let category = &self.nodes[i];
        let children = self.children[i]
            .iter()
            .map(|&c| self.build_node(c, depth + 1, visited))
            .collect::<TreeResult<Vec<_>>>()?;

        Ok(CategoryTreeNode {
            id: category.id.clone(),
            name: category.name.clone(),
            slug: category.slug.clone(),
            children,
        })
    }
}
