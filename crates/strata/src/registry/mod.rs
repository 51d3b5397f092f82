// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 strata contributors

//! Name-to-handle directory over heterogeneous typed entities.
//!
//! The registry keeps two coupled structures: a directory mapping each name
//! to its `(Kind, Handle)` pair, and one [`EntityStore`] per catalog kind
//! holding the concrete values. Handles stay valid across directory rehashes
//! because the stores are slot arenas, not hash-map storage.
//!
//! # Dispatch
//!
//! [`EntityRegistry::visit`] recovers the concrete type from the stored kind
//! tag with an exhaustive match over [`Kind`], generated from the catalog's
//! single kind list. Arms are probed in `Kind` declaration order and there is
//! no wildcard arm: an unmatched kind cannot compile, and a directory entry
//! pointing at a vacated slot panics as an internal invariant violation.
//!
//! Not thread-safe; callers serialize access (one registry per engine
//! instance or writer rank).

mod entity;
mod store;

pub use entity::{Dims, Entity, EntityData};
pub use store::{EntityStore, Handle};

use crate::config::RuntimeConfig;
use crate::types::{for_each_kind, Kind, Payload};
use std::collections::HashMap;
use thiserror::Error;

/// Usage errors surfaced by registry operations. Local-only, never retried.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A live entity with this name already exists (of any kind).
    #[error("entity '{0}' is already defined")]
    DuplicateName(String),

    /// No entity with this name.
    #[error("no entity named '{0}'")]
    UnknownName(String),

    /// Rejected by strict checks: names must be non-empty.
    #[error("entity name must not be empty")]
    InvalidName,
}

/// Generic operation applied to an entity through kind dispatch.
///
/// Written once per operation instead of once per type: `visit` is invoked
/// with the concrete `Entity<T>` for whichever kind the name resolves to.
pub trait EntityVisitor {
    /// Value produced by the visit.
    type Output;

    /// Called exactly once with the concrete typed entity.
    fn visit<T: Payload>(&mut self, entity: &Entity<T>) -> Self::Output;
}

/// Mutating variant of [`EntityVisitor`].
pub trait EntityVisitorMut {
    /// Value produced by the visit.
    type Output;

    /// Called exactly once with the concrete typed entity.
    fn visit<T: Payload>(&mut self, entity: &mut Entity<T>) -> Self::Output;
}

macro_rules! declare_kind_stores {
    ($(($kind:ident, $field:ident, $ty:ty)),* $(,)?) => {
        /// One [`EntityStore`] per catalog kind. Fields are generated from
        /// the catalog's kind list in declaration order.
        #[derive(Default)]
        pub struct KindStores {
            $( pub(crate) $field: EntityStore<$ty>, )*
        }

        impl KindStores {
            fn clear_all(&mut self) {
                $( self.$field.clear(); )*
            }

            fn total_len(&self) -> usize {
                0 $( + self.$field.len() )*
            }
        }

        $(
            impl crate::types::sealed::Sealed for $ty {}

            impl Payload for $ty {
                const KIND: Kind = Kind::$kind;

                fn store(stores: &KindStores) -> &EntityStore<Self> {
                    &stores.$field
                }

                fn store_mut(stores: &mut KindStores) -> &mut EntityStore<Self> {
                    &mut stores.$field
                }
            }
        )*
    };
}
for_each_kind!(declare_kind_stores);

const COHERENCE: &str = "registry directory points at a vacated store slot";

/// Directory of named typed entities spanning every catalog kind.
pub struct EntityRegistry {
    directory: HashMap<String, (Kind, Handle)>,
    stores: KindStores,
    config: RuntimeConfig,
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new(RuntimeConfig::default())
    }
}

impl EntityRegistry {
    /// Empty registry with the given configuration.
    #[must_use]
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            directory: HashMap::new(),
            stores: KindStores::default(),
            config,
        }
    }

    /// Define a new entity under `name`.
    ///
    /// Fails with [`RegistryError::DuplicateName`] if the name is taken, in
    /// which case neither the directory nor any store is touched.
    pub fn define<T: Payload>(
        &mut self,
        name: &str,
        data: EntityData<T>,
        dims: Option<Dims>,
    ) -> Result<Handle, RegistryError> {
        if self.config.strict_checks && name.is_empty() {
            return Err(RegistryError::InvalidName);
        }
        if self.directory.contains_key(name) {
            return Err(RegistryError::DuplicateName(name.to_string()));
        }
        let entity = Entity::new(name.to_string(), data, dims);
        let handle = T::store_mut(&mut self.stores).insert(entity);
        self.directory.insert(name.to_string(), (T::KIND, handle));
        log::debug!("[REGISTRY] define '{name}' kind={}", T::KIND);
        Ok(handle)
    }

    /// Define an attribute-style entity holding one scalar.
    pub fn define_scalar<T: Payload>(
        &mut self,
        name: &str,
        value: T,
    ) -> Result<Handle, RegistryError> {
        self.define(name, EntityData::Scalar(value), None)
    }

    /// Define an attribute-style entity holding a fixed array.
    pub fn define_array<T: Payload>(
        &mut self,
        name: &str,
        values: Vec<T>,
    ) -> Result<Handle, RegistryError> {
        self.define(name, EntityData::Array(values), None)
    }

    /// Define a variable: dimension metadata now, values filled in later
    /// through [`visit_mut`](Self::visit_mut) or [`find_typed_mut`](Self::find_typed_mut).
    pub fn define_variable<T: Payload>(
        &mut self,
        name: &str,
        dims: Dims,
    ) -> Result<Handle, RegistryError> {
        self.define(name, EntityData::Scalar(T::default()), Some(dims))
    }

    /// Resolve a name to its kind tag and handle. `None` (not an error) when
    /// absent.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<(Kind, Handle)> {
        self.directory.get(name).copied()
    }

    /// As [`find`](Self::find), but additionally requires the stored kind to
    /// match `T`. A kind mismatch yields `None`, never a panic.
    #[must_use]
    pub fn find_typed<T: Payload>(&self, name: &str) -> Option<&Entity<T>> {
        let (kind, handle) = self.find(name)?;
        if kind != T::KIND {
            return None;
        }
        T::store(&self.stores).get(handle)
    }

    /// Mutable variant of [`find_typed`](Self::find_typed).
    pub fn find_typed_mut<T: Payload>(&mut self, name: &str) -> Option<&mut Entity<T>> {
        let (kind, handle) = self.find(name)?;
        if kind != T::KIND {
            return None;
        }
        T::store_mut(&mut self.stores).get_mut(handle)
    }

    /// Remove the entity under `name` from both the typed store and the
    /// directory. Returns `false` (a no-op) for unknown names.
    ///
    /// The typed store is updated first; the directory entry only goes away
    /// once the store removal succeeded, so a failure cannot leave a
    /// dangling `(Kind, Handle)` pair behind.
    pub fn remove(&mut self, name: &str) -> bool {
        let Some((kind, handle)) = self.find(name) else {
            return false;
        };
        macro_rules! erase {
            ($(($variant:ident, $field:ident, $ty:ty)),* $(,)?) => {
                match kind {
                    $( Kind::$variant => self.stores.$field.remove(handle).is_some(), )*
                }
            };
        }
        let removed = for_each_kind!(erase);
        assert!(removed, "{COHERENCE}");
        self.directory.remove(name);
        log::debug!("[REGISTRY] remove '{name}' kind={kind}");
        true
    }

    /// Clear the directory and every typed store. One pass per store.
    pub fn remove_all(&mut self) {
        log::debug!("[REGISTRY] remove_all ({} entities)", self.directory.len());
        self.directory.clear();
        self.stores.clear_all();
    }

    /// Dispatch on the stored kind and invoke `visitor` exactly once with
    /// the concrete typed entity.
    ///
    /// Kinds are probed in [`Kind`] declaration order; fails with
    /// [`RegistryError::UnknownName`] when the name is absent.
    pub fn visit<V: EntityVisitor>(
        &self,
        name: &str,
        visitor: &mut V,
    ) -> Result<V::Output, RegistryError> {
        let (kind, handle) = self
            .find(name)
            .ok_or_else(|| RegistryError::UnknownName(name.to_string()))?;
        macro_rules! dispatch {
            ($(($variant:ident, $field:ident, $ty:ty)),* $(,)?) => {
                match kind {
                    $( Kind::$variant => {
                        let entity = self.stores.$field.get(handle).expect(COHERENCE);
                        visitor.visit(entity)
                    } )*
                }
            };
        }
        Ok(for_each_kind!(dispatch))
    }

    /// Mutating variant of [`visit`](Self::visit).
    pub fn visit_mut<V: EntityVisitorMut>(
        &mut self,
        name: &str,
        visitor: &mut V,
    ) -> Result<V::Output, RegistryError> {
        let (kind, handle) = self
            .find(name)
            .ok_or_else(|| RegistryError::UnknownName(name.to_string()))?;
        macro_rules! dispatch {
            ($(($variant:ident, $field:ident, $ty:ty)),* $(,)?) => {
                match kind {
                    $( Kind::$variant => {
                        let entity = self.stores.$field.get_mut(handle).expect(COHERENCE);
                        visitor.visit(entity)
                    } )*
                }
            };
        }
        Ok(for_each_kind!(dispatch))
    }

    /// Enumerate `(name, kind)` pairs.
    ///
    /// Insertion order is not preserved, but repeated enumeration of an
    /// unmodified registry yields the same order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Kind)> + '_ {
        self.directory
            .iter()
            .map(|(name, &(kind, _))| (name.as_str(), kind))
    }

    /// Number of live entities across all kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.directory.len()
    }

    /// True when no entities are defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.directory.is_empty()
    }

    /// Sum of live entries across every typed store. Always equals
    /// [`len`](Self::len); exposed for coherence assertions in tests.
    #[must_use]
    pub fn store_len(&self) -> usize {
        self.stores.total_len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_find_round_trip() {
        let mut registry = EntityRegistry::default();
        let handle = registry
            .define_scalar("count", 42_u32)
            .expect("define must succeed");
        assert_eq!(registry.find("count"), Some((Kind::UInt32, handle)));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.store_len(), 1);
    }

    #[test]
    fn test_duplicate_name_leaves_state_untouched() {
        let mut registry = EntityRegistry::default();
        registry.define_scalar("x", 1.0_f64).expect("first define");
        let err = registry.define_scalar("x", 2_i32).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateName("x".to_string()));

        // The original entity is intact, and no store gained an entry.
        let entity = registry.find_typed::<f64>("x").expect("original survives");
        assert_eq!(entity.data(), &EntityData::Scalar(1.0));
        assert_eq!(registry.store_len(), 1);
    }

    #[test]
    fn test_find_typed_kind_mismatch_is_none() {
        let mut registry = EntityRegistry::default();
        registry.define_scalar("t", 36.6_f64).expect("define");
        assert!(registry.find_typed::<f64>("t").is_some());
        assert!(registry.find_typed::<f32>("t").is_none());
        assert!(registry.find_typed::<String>("t").is_none());
    }

    #[test]
    fn test_empty_name_rejected_when_strict() {
        let mut registry = EntityRegistry::new(RuntimeConfig::strict());
        let err = registry.define_scalar("", 0_i8).unwrap_err();
        assert_eq!(err, RegistryError::InvalidName);
    }

    #[test]
    fn test_remove_all_clears_every_store() {
        let mut registry = EntityRegistry::default();
        registry.define_scalar("a", 1_i8).expect("define");
        registry.define_scalar("b", "hi".to_string()).expect("define");
        registry
            .define_array("c", vec![1.0_f32, 2.0])
            .expect("define");
        registry.remove_all();
        assert!(registry.is_empty());
        assert_eq!(registry.store_len(), 0);
        assert_eq!(registry.iter().count(), 0);
    }

    #[test]
    fn test_variable_carries_dims() {
        let mut registry = EntityRegistry::default();
        registry
            .define_variable::<f64>("field", Dims::new(vec![100, 100], vec![0, 50], vec![100, 50]))
            .expect("define");
        let entity = registry.find_typed::<f64>("field").expect("present");
        assert_eq!(entity.dims().map(|d| d.count.clone()), Some(vec![100, 50]));
    }
}
