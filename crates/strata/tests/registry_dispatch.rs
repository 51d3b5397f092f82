// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 strata contributors

//! Registry lifecycle and closed-set kind dispatch.

use strata::{
    Complex32, Complex64, Entity, EntityData, EntityRegistry, EntityVisitor, EntityVisitorMut,
    Kind, LongDouble, Payload, RegistryError,
};

/// Renders the visited entity's value(s) as a string.
struct Render;

impl EntityVisitor for Render {
    type Output = String;

    fn visit<T: Payload>(&mut self, entity: &Entity<T>) -> String {
        match entity.data() {
            EntityData::Scalar(value) => value.to_string(),
            EntityData::Array(values) => {
                let parts: Vec<String> = values.iter().map(ToString::to_string).collect();
                format!("[{}]", parts.join(", "))
            }
        }
    }
}

/// Records how often it was invoked and with which concrete kind.
#[derive(Default)]
struct Probe {
    calls: usize,
    kind: Option<Kind>,
}

impl EntityVisitor for Probe {
    type Output = ();

    fn visit<T: Payload>(&mut self, _entity: &Entity<T>) {
        self.calls += 1;
        self.kind = Some(T::KIND);
    }
}

/// Resets the visited entity to a default scalar.
struct ResetValue;

impl EntityVisitorMut for ResetValue {
    type Output = ();

    fn visit<T: Payload>(&mut self, entity: &mut Entity<T>) {
        *entity.data_mut() = EntityData::Scalar(T::default());
    }
}

#[test]
fn test_temperature_scenario() {
    let mut registry = EntityRegistry::default();
    registry
        .define_scalar("temperature", 36.6_f64)
        .expect("define must succeed");

    let rendered = registry
        .visit("temperature", &mut Render)
        .expect("visit must dispatch");
    assert_eq!(rendered, "36.6");

    let err = registry.define_scalar("temperature", 0.0_f64).unwrap_err();
    assert_eq!(
        err,
        RegistryError::DuplicateName("temperature".to_string())
    );

    assert!(registry.remove("temperature"));
    assert!(registry.find("temperature").is_none());
    assert!(!registry.remove("temperature"));
}

#[test]
fn test_define_find_every_kind() {
    let mut registry = EntityRegistry::default();
    registry.define_scalar("s", "text".to_string()).expect("define");
    registry.define_scalar("i8", -1_i8).expect("define");
    registry.define_scalar("i16", -2_i16).expect("define");
    registry.define_scalar("i32", -3_i32).expect("define");
    registry.define_scalar("i64", -4_i64).expect("define");
    registry.define_scalar("u8", 1_u8).expect("define");
    registry.define_scalar("u16", 2_u16).expect("define");
    registry.define_scalar("u32", 3_u32).expect("define");
    registry.define_scalar("u64", 4_u64).expect("define");
    registry.define_scalar("f32", 0.5_f32).expect("define");
    registry.define_scalar("f64", 0.25_f64).expect("define");
    registry
        .define_scalar("ld", LongDouble([0x11; 16]))
        .expect("define");
    registry
        .define_scalar("c32", Complex32::new(1.0, -1.0))
        .expect("define");
    registry
        .define_scalar("c64", Complex64::new(2.0, -2.0))
        .expect("define");

    let expected = [
        ("s", Kind::String),
        ("i8", Kind::Int8),
        ("i16", Kind::Int16),
        ("i32", Kind::Int32),
        ("i64", Kind::Int64),
        ("u8", Kind::UInt8),
        ("u16", Kind::UInt16),
        ("u32", Kind::UInt32),
        ("u64", Kind::UInt64),
        ("f32", Kind::Float),
        ("f64", Kind::Double),
        ("ld", Kind::LongDouble),
        ("c32", Kind::ComplexFloat),
        ("c64", Kind::ComplexDouble),
    ];
    for (name, kind) in expected {
        let (found_kind, _handle) = registry.find(name).expect("defined above");
        assert_eq!(found_kind, kind, "kind tag for '{name}'");

        let mut probe = Probe::default();
        registry.visit(name, &mut probe).expect("dispatch");
        assert_eq!(probe.calls, 1, "visitor must run exactly once for '{name}'");
        assert_eq!(probe.kind, Some(kind), "concrete type for '{name}'");
    }
    assert_eq!(registry.len(), expected.len());
}

#[test]
fn test_visit_unknown_name() {
    let registry = EntityRegistry::default();
    let err = registry.visit("ghost", &mut Probe::default()).unwrap_err();
    assert_eq!(err, RegistryError::UnknownName("ghost".to_string()));
}

#[test]
fn test_visit_mut_updates_in_place() {
    let mut registry = EntityRegistry::default();
    registry
        .define_array("samples", vec![9_i64, 8, 7])
        .expect("define");

    registry
        .visit_mut("samples", &mut ResetValue)
        .expect("dispatch");
    let entity = registry.find_typed::<i64>("samples").expect("present");
    assert_eq!(entity.data(), &EntityData::Scalar(0));
}

#[test]
fn test_array_rendering() {
    let mut registry = EntityRegistry::default();
    registry
        .define_array("dims", vec![10_u32, 20, 30])
        .expect("define");
    let rendered = registry.visit("dims", &mut Render).expect("dispatch");
    assert_eq!(rendered, "[10, 20, 30]");
}

#[test]
fn test_enumeration_is_repeatable() {
    let mut registry = EntityRegistry::default();
    for i in 0..32 {
        registry
            .define_scalar(&format!("entity_{i}"), i as u64)
            .expect("define");
    }
    let first: Vec<(String, Kind)> = registry
        .iter()
        .map(|(name, kind)| (name.to_string(), kind))
        .collect();
    let second: Vec<(String, Kind)> = registry
        .iter()
        .map(|(name, kind)| (name.to_string(), kind))
        .collect();
    assert_eq!(first, second, "unmodified registry enumerates identically");
    assert_eq!(first.len(), 32);
}

#[test]
fn test_remove_all() {
    let mut registry = EntityRegistry::default();
    registry.define_scalar("a", 1_u8).expect("define");
    registry.define_scalar("b", 2.0_f32).expect("define");
    registry
        .define_scalar("c", "gone".to_string())
        .expect("define");
    registry.remove_all();
    assert!(registry.is_empty());
    assert_eq!(registry.store_len(), 0);
    assert!(registry.find("a").is_none());

    // The registry stays usable after a bulk clear.
    registry.define_scalar("a", 9_u8).expect("redefine");
    assert_eq!(registry.len(), 1);
}
