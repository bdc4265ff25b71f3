//! Multi-alias lookup table.
//!
//! A [`Resolver`] maps several alias keys onto one canonical value. A group of
//! aliases is bound in a single call; lookups of unbound keys fail with a
//! not-found error rather than falling back to a default.

use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;

use crate::error::{EntityKind, QuizError, Result};

#[derive(Debug, Clone)]
pub struct Resolver<K, V> {
    kind: EntityKind,
    table: HashMap<K, V>,
}

impl<K, V> Resolver<K, V>
where
    K: Eq + Hash + Display,
    V: Copy + PartialEq,
{
    #[must_use]
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            table: HashMap::new(),
        }
    }

    /// Bind every alias in `aliases` to `value`.
    ///
    /// Rebinding an alias to the value it already has is a no-op. Binding an
    /// alias that points at a different value fails with a duplicate error and
    /// leaves the table untouched.
    pub fn bind<I>(&mut self, aliases: I, value: V) -> Result<()>
    where
        I: IntoIterator<Item = K>,
    {
        let aliases: Vec<K> = aliases.into_iter().collect();
        if let Some(conflict) = aliases
            .iter()
            .find(|alias| self.table.get(*alias).is_some_and(|bound| *bound != value))
        {
            return Err(QuizError::duplicate(self.kind, conflict));
        }
        for alias in aliases {
            self.table.insert(alias, value);
        }
        Ok(())
    }

    /// Resolve an alias to its canonical value.
    pub fn resolve(&self, key: &K) -> Result<V> {
        self.table
            .get(key)
            .copied()
            .ok_or_else(|| QuizError::not_found(self.kind, key))
    }

    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.table.contains_key(key)
    }

    /// Number of bound aliases (not distinct values).
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
