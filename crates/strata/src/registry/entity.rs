// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 strata contributors

//! Named, typed values held by the registry.

use crate::types::{Kind, Payload};

/// Dimension metadata carried by variables (as opposed to attributes).
///
/// The registry stores these untouched; shape semantics (global vs. local
/// arrays, selections) belong to the owning engine.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dims {
    /// Global extent per dimension.
    pub shape: Vec<u64>,
    /// Offset of this writer's block per dimension.
    pub start: Vec<u64>,
    /// Extent of this writer's block per dimension.
    pub count: Vec<u64>,
}

impl Dims {
    /// Build from shape/start/count triples.
    #[must_use]
    pub fn new(shape: Vec<u64>, start: Vec<u64>, count: Vec<u64>) -> Self {
        Self { shape, start, count }
    }
}

/// Payload of an entity: one scalar or an array of elements.
#[derive(Clone, Debug, PartialEq)]
pub enum EntityData<T> {
    /// A single value.
    Scalar(T),
    /// A fixed set of values.
    Array(Vec<T>),
}

/// A named value (or set of values) of one catalog type.
///
/// The kind tag is `T::KIND` and never changes after creation; the name is
/// fixed at definition time.
#[derive(Clone, Debug)]
pub struct Entity<T: Payload> {
    name: String,
    data: EntityData<T>,
    dims: Option<Dims>,
}

impl<T: Payload> Entity<T> {
    pub(crate) fn new(name: String, data: EntityData<T>, dims: Option<Dims>) -> Self {
        Self { name, data, dims }
    }

    /// Entity name, unique across the owning registry.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kind tag of the stored payload.
    #[must_use]
    pub fn kind(&self) -> Kind {
        T::KIND
    }

    /// Stored value(s).
    #[must_use]
    pub fn data(&self) -> &EntityData<T> {
        &self.data
    }

    /// Mutable access to the stored value(s). The kind cannot change.
    pub fn data_mut(&mut self) -> &mut EntityData<T> {
        &mut self.data
    }

    /// Dimension metadata, present for variables, absent for attributes.
    #[must_use]
    pub fn dims(&self) -> Option<&Dims> {
        self.dims.as_ref()
    }

    /// Number of stored elements (1 for a scalar).
    #[must_use]
    pub fn element_count(&self) -> usize {
        match &self.data {
            EntityData::Scalar(_) => 1,
            EntityData::Array(values) => values.len(),
        }
    }
}
