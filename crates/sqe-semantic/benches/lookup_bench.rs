//! Lookup and symbol-info benchmarks.
//!
//! Measures name lookup against a type with many members, at growing
//! member counts, and symbol info on a bound name.

#[path = "../tests/support/mod.rs"]
mod support;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sqe_bound::{BoundKind, BoundNode};
use sqe_semantic::LookupOptions;
use sqe_symbols::SymbolRef;
use sqe_syntax::SyntaxKind;
use support::{Fixture, Layout, cancel, name, statement};

const MEMBER_COUNTS: &[usize] = &[16, 256, 2048];

/// `class C { void Run() { f0; } }` where `C` has `members` fields.
fn fixture(members: usize) -> (Fixture, Layout, u32) {
    let mut f = Fixture::new();
    let c = f.class("C");
    let run = f.method(c, "Run", f.int);
    for i in 0..members {
        let int = f.int;
        f.field(c, &format!("f{i}"), int);
    }
    let layout = f.program(c, run, |b| {
        statement(b, |b| {
            name(b, "f0");
        });
    });
    let position = f.position_of(layout.tree, SyntaxKind::IdentifierName, "f0");
    (f, layout, position)
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");
    for &members in MEMBER_COUNTS {
        let (f, layout, position) = fixture(members);
        let model = f.model(layout.tree);
        group.bench_with_input(BenchmarkId::new("by_name", members), &position, |b, &position| {
            b.iter(|| {
                model
                    .lookup_symbols(position, None, Some(black_box("f0")), LookupOptions::ALL_MEMBERS, &cancel())
                    .map(|found| found.len())
            });
        });
        group.bench_with_input(BenchmarkId::new("all_names", members), &position, |b, &position| {
            b.iter(|| {
                model
                    .lookup_symbols(position, None, None, LookupOptions::ALL_MEMBERS, &cancel())
                    .map(|found| found.len())
            });
        });
    }
    group.finish();
}

fn bench_symbol_info(c: &mut Criterion) {
    let (mut f, layout, _) = fixture(MEMBER_COUNTS[0]);
    let node = f.find(layout.tree, SyntaxKind::IdentifierName, "f0");
    let field = f.compilation.symbols.members_named(layout.class, "f0")[0];
    let int = f.int;
    f.bind(
        layout.tree,
        BoundNode::new(
            node,
            BoundKind::FieldAccess {
                receiver: None,
                field: SymbolRef::Declared(field),
            },
        )
        .with_type(int),
    );
    let model = f.model(layout.tree);
    c.bench_function("symbol_info/field", |b| {
        b.iter(|| model.symbol_info(black_box(node), &cancel()).map(|info| info.symbol()));
    });
}

criterion_group!(benches, bench_lookup, bench_symbol_info);
criterion_main!(benches);
