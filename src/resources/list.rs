//! Local list state for a resource view: latest items plus a search query.
//!
//! Writes are applied optimistically by id; the next poll replaces the whole
//! list. A poll that started before a write can overwrite it. That ordering
//! is accepted, not guarded.

use super::Resource;

/// Case-insensitive substring match of `query` against the item's search
/// fields. A blank query matches everything.
#[must_use]
pub fn matches_query<T: Resource>(item: &T, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    item.search_fields()
        .into_iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

#[derive(Clone, Debug)]
pub struct ResourceList<T> {
    items: Vec<T>,
    query: String,
}

impl<T> Default for ResourceList<T> {
    fn default() -> Self {
        Self { items: Vec::new(), query: String::new() }
    }
}

impl<T: Resource> ResourceList<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Items matching the current query, in list order.
    pub fn filtered(&self) -> Vec<&T> {
        self.items
            .iter()
            .filter(|item| matches_query(*item, &self.query))
            .collect()
    }

    /// Replace everything with a fresh fetch.
    pub fn replace(&mut self, items: Vec<T>) {
        self.items = items;
    }

    /// Insert a created item or overwrite the one with the same id.
    pub fn upsert(&mut self, item: T) {
        match self.items.iter_mut().find(|existing| existing.id() == item.id()) {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
    }

    /// Drop the item with `id`, returning it if present.
    pub fn remove(&mut self, id: i64) -> Option<T> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(index))
    }
}

#[cfg(test)]
#[path = "list_test.rs"]
mod tests;
