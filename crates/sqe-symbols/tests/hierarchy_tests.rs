//! Tests for type hierarchy queries and accessibility.

use sqe_symbols::hierarchy::{
    all_interfaces, has_identity_or_reference_conversion, is_derived_from, lookup_members,
    satisfies_constraints,
};
use sqe_symbols::{
    AccessContext, Accessibility, SpecialType, Symbol, SymbolArena, SymbolFlags, SymbolId,
    SymbolKind, TypeKind,
};

fn class(arena: &mut SymbolArena, name: &str, base: SymbolId) -> SymbolId {
    let global = arena.global_namespace();
    let id = arena.add_member(global, Symbol::new(SymbolKind::NamedType, name));
    if let Some(s) = arena.get_mut(id) {
        s.base_type = base;
    }
    id
}

fn interface(arena: &mut SymbolArena, name: &str, bases: &[SymbolId]) -> SymbolId {
    let global = arena.global_namespace();
    let id = arena.add_member(
        global,
        Symbol::new(SymbolKind::NamedType, name).with_type_kind(TypeKind::Interface),
    );
    if let Some(s) = arena.get_mut(id) {
        s.interfaces.extend(bases.iter().copied());
    }
    id
}

#[test]
fn test_diamond_interfaces_collapse() {
    let mut arena = SymbolArena::new();
    let i0 = interface(&mut arena, "I0", &[]);
    let i1 = interface(&mut arena, "I1", &[i0]);
    let i2 = interface(&mut arena, "I2", &[i0]);
    let i3 = interface(&mut arena, "I3", &[i1, i2]);
    let all: Vec<_> = all_interfaces(&arena, i3).into_iter().collect();
    assert_eq!(all, vec![i1, i2, i0], "I0 is reached twice but listed once");
    assert!(is_derived_from(&arena, i3, i0));
    assert!(!is_derived_from(&arena, i0, i3));
}

#[test]
fn test_field_hides_base_methods() {
    let mut arena = SymbolArena::new();
    let object = arena.special_type(SpecialType::Object);
    let a = class(&mut arena, "A", object);
    let b = class(&mut arena, "B", a);
    let a_m = arena.add_member(a, Symbol::new(SymbolKind::Method, "M"));
    let b_m = arena.add_member(b, Symbol::new(SymbolKind::Method, "M"));
    let found: Vec<_> = lookup_members(&arena, b, "M").into_iter().collect();
    assert_eq!(found, vec![b_m, a_m], "methods accumulate across levels");

    let c = class(&mut arena, "C", b);
    let c_m = arena.add_member(c, Symbol::new(SymbolKind::Field, "M"));
    let found: Vec<_> = lookup_members(&arena, c, "M").into_iter().collect();
    assert_eq!(found, vec![c_m], "a field hides every base level");
}

#[test]
fn test_reference_conversion_and_constraints() {
    let mut arena = SymbolArena::new();
    let object = arena.special_type(SpecialType::Object);
    let int = arena.special_type(SpecialType::Int32);
    let animal = class(&mut arena, "Animal", object);
    let dog = class(&mut arena, "Dog", animal);
    assert!(has_identity_or_reference_conversion(&arena, dog, animal));
    assert!(has_identity_or_reference_conversion(&arena, dog, object));
    assert!(!has_identity_or_reference_conversion(&arena, animal, dog));
    assert!(!has_identity_or_reference_conversion(&arena, int, dog));

    let mut tp = Symbol::new(SymbolKind::TypeParameter, "T");
    tp.constraints.push(animal);
    let tp = arena.alloc(tp);
    assert!(satisfies_constraints(&arena, tp, dog));
    assert!(!satisfies_constraints(&arena, tp, int));
}

#[test]
fn test_private_and_protected_access() {
    let mut arena = SymbolArena::new();
    let object = arena.special_type(SpecialType::Object);
    let base = class(&mut arena, "Base", object);
    let derived = class(&mut arena, "Derived", base);
    let other = class(&mut arena, "Other", object);
    let secret = arena.add_member(
        base,
        Symbol::new(SymbolKind::Field, "secret").with_accessibility(Accessibility::Private),
    );
    let guarded = arena.add_member(
        base,
        Symbol::new(SymbolKind::Method, "Guarded").with_accessibility(Accessibility::Protected),
    );

    let in_base = AccessContext::new(base);
    let in_derived = AccessContext::new(derived);
    let in_other = AccessContext::new(other);

    assert!(in_base.is_accessible(&arena, secret, SymbolId::NONE));
    assert!(!in_derived.is_accessible(&arena, secret, SymbolId::NONE));
    assert!(in_derived.is_accessible(&arena, guarded, SymbolId::NONE));
    assert!(!in_other.is_accessible(&arena, guarded, SymbolId::NONE));

    // Protected instance access through a `Base` receiver from `Derived`
    // is only allowed via `base.`.
    assert!(!in_derived.is_accessible(&arena, guarded, base));
    assert!(in_derived.with_base_access(true).is_accessible(&arena, guarded, base));
    assert!(in_derived.is_accessible(&arena, guarded, derived));
}

#[test]
fn test_internal_metadata_type_is_inaccessible() {
    let mut arena = SymbolArena::new();
    let global = arena.global_namespace();
    let hidden = arena.add_member(
        global,
        Symbol::new(SymbolKind::NamedType, "Hidden")
            .with_accessibility(Accessibility::Internal)
            .with_flags(SymbolFlags::FROM_METADATA),
    );
    let local = arena.add_member(
        global,
        Symbol::new(SymbolKind::NamedType, "Local").with_accessibility(Accessibility::Internal),
    );
    let cx = AccessContext::new(SymbolId::NONE);
    assert!(!cx.is_accessible(&arena, hidden, SymbolId::NONE));
    assert!(cx.is_accessible(&arena, local, SymbolId::NONE));
}
