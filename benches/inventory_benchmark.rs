//! Inventory Benchmarks for Testbed
//!
//! Measures resolution and edit costs over generated inventories of
//! increasing size.
//!
//! ## Benchmarks Included:
//!
//! 1. **Traversal**: default group and target walks
//! 2. **Resolution**: `find_selector` by group, target and role
//! 3. **Lookups**: first-match `config_of` at the end of the forest
//! 4. **Edits**: `add_feature` on the last target, `remove_target`
//! 5. **Persistence**: YAML render and parse

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use testbed::inventory::{FeatureScope, Group, GroupBuilder, Inventory, Target};

// ============================================================================
// Fixtures
// ============================================================================

/// `groups` top-level groups, each with one nested subgroup, each holding
/// `per_group` targets. Every third target declares the `web` role.
fn generate_inventory(groups: usize, per_group: usize) -> Inventory {
    let make_targets = |prefix: &str| -> Vec<Target> {
        (0..per_group)
            .map(|i| {
                let target = Target::new(format!("{}-{}.example.com", prefix, i))
                    .with_config("transport", "ssh");
                if i % 3 == 0 {
                    target.with_var("role", "web")
                } else {
                    target
                }
            })
            .collect()
    };

    let roots: Vec<Group> = (0..groups)
        .map(|g| {
            let name = format!("group{}", g);
            let mut nested = Group::new(format!("{}-nested", name));
            nested.targets = make_targets(&format!("{}n", name));

            let mut builder = GroupBuilder::new(&name).group(nested);
            for target in make_targets(&name) {
                builder = builder.target(target);
            }
            builder.build()
        })
        .collect();

    Inventory::with_groups(roots)
}

const SIZES: &[(usize, usize)] = &[(10, 10), (50, 20), (200, 25)];

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_traversal(c: &mut Criterion) {
    let mut group = c.benchmark_group("traversal");

    for &(groups, per_group) in SIZES {
        let inv = generate_inventory(groups, per_group);
        group.throughput(Throughput::Elements(inv.target_count() as u64));

        group.bench_with_input(BenchmarkId::new("group_names", groups), &inv, |b, inv| {
            b.iter(|| black_box(inv.group_names()))
        });
        group.bench_with_input(BenchmarkId::new("target_uris", groups), &inv, |b, inv| {
            b.iter(|| black_box(inv.target_uris()))
        });
    }

    group.finish();
}

fn bench_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolution");

    for &(groups, per_group) in SIZES {
        let inv = generate_inventory(groups, per_group);
        let last_group = format!("group{}-nested", groups - 1);
        let last_target = format!("group{}n-{}.example.com", groups - 1, per_group - 1);

        group.bench_with_input(BenchmarkId::new("by_group", groups), &inv, |b, inv| {
            b.iter(|| black_box(inv.find_selector([last_group.as_str()])))
        });
        group.bench_with_input(BenchmarkId::new("by_target", groups), &inv, |b, inv| {
            b.iter(|| black_box(inv.find_selector([last_target.as_str()])))
        });
        group.bench_with_input(BenchmarkId::new("by_role", groups), &inv, |b, inv| {
            b.iter(|| black_box(inv.targets_with_role("web")))
        });
        group.bench_with_input(BenchmarkId::new("config_of_last", groups), &inv, |b, inv| {
            b.iter(|| black_box(inv.config_of(&last_target).is_ok()))
        });
    }

    group.finish();
}

fn bench_edits(c: &mut Criterion) {
    let mut group = c.benchmark_group("edits");

    for &(groups, per_group) in SIZES {
        let inv = generate_inventory(groups, per_group);
        let last_target = format!("group{}n-{}.example.com", groups - 1, per_group - 1);

        group.bench_with_input(BenchmarkId::new("add_feature", groups), &inv, |b, inv| {
            b.iter_batched(
                || inv.clone(),
                |mut inv| black_box(inv.add_feature(FeatureScope::Target, "docker", &last_target)),
                criterion::BatchSize::LargeInput,
            )
        });
        group.bench_with_input(BenchmarkId::new("remove_target", groups), &inv, |b, inv| {
            b.iter_batched(
                || inv.clone(),
                |mut inv| black_box(inv.remove_target(&last_target)),
                criterion::BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

fn bench_persistence(c: &mut Criterion) {
    let mut group = c.benchmark_group("persistence");

    for &(groups, per_group) in SIZES {
        let inv = generate_inventory(groups, per_group);
        let rendered = inv.to_yaml().unwrap();
        group.throughput(Throughput::Bytes(rendered.len() as u64));

        group.bench_with_input(BenchmarkId::new("to_yaml", groups), &inv, |b, inv| {
            b.iter(|| black_box(inv.to_yaml().unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("from_yaml", groups), &rendered, |b, rendered| {
            b.iter(|| black_box(Inventory::from_yaml(rendered).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_traversal,
    bench_resolution,
    bench_edits,
    bench_persistence
);
criterion_main!(benches);
