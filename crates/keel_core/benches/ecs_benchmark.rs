//! # ECS Performance Benchmark
//!
//! - Entity creation with component bundles
//! - Add/remove churn (notification cost through filters)
//! - One dispatcher frame over 100,000 moving entities
//!
//! Run with: `cargo bench --package keel_core`

// Benchmarks don't need docs and may have intentionally unused code
#![allow(missing_docs)]
#![allow(dead_code)]

use bytemuck::{Pod, Zeroable};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use keel_core::{
    component_schema, Aspect, Component, ComponentOf, EntityManager, FilterSet, GrowthPolicy,
    PackedStore, RecordLayout, System, SystemContext, SystemDispatcher,
};

/// Entities in the frame benchmark.
const ENTITY_COUNT: usize = 100_000;

#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
#[repr(C)]
struct Position {
    x: f32,
    y: f32,
    z: f32,
}

impl Component for Position {
    const NAME: &'static str = "Position";
}

#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
#[repr(C)]
struct Velocity {
    x: f32,
    y: f32,
    z: f32,
}

impl Component for Velocity {
    const NAME: &'static str = "Velocity";
}

#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
#[repr(C)]
struct Sleeping {
    ticks: u32,
}

impl Component for Sleeping {
    const NAME: &'static str = "Sleeping";
}

component_schema! {
    struct BenchSchema { Position, Velocity, Sleeping }
}

const MOVING: Aspect = keel_core::aspect_of!(BenchSchema; Position, Velocity);
const SLEEPING: Aspect = <Sleeping as ComponentOf<BenchSchema>>::ASPECT;

struct Movement {
    filters: FilterSet,
}

impl Movement {
    fn new() -> Self {
        Self {
            filters: FilterSet::single(MOVING, SLEEPING),
        }
    }
}

impl System<BenchSchema> for Movement {
    fn name(&self) -> &'static str {
        "Movement"
    }

    fn filters(&self) -> &FilterSet {
        &self.filters
    }

    fn filters_mut(&mut self) -> &mut FilterSet {
        &mut self.filters
    }

    fn update(&mut self, delta: f32, ctx: &mut SystemContext<'_, BenchSchema>) {
        for &entity in self.filters.entities(0) {
            let Some(velocity) = ctx.get::<Velocity>(entity).copied() else {
                continue;
            };
            if let Some(position) = ctx.get_mut::<Position>(entity) {
                position.x += velocity.x * delta;
                position.y += velocity.y * delta;
                position.z += velocity.z * delta;
            }
        }
    }
}

fn populated_manager(count: usize) -> EntityManager<BenchSchema> {
    let mut manager = EntityManager::new(SystemDispatcher::new().with_system(Movement::new()));
    for i in 0..count {
        #[allow(clippy::cast_precision_loss)]
        let f = i as f32;
        manager.create_entity((
            Position { x: f, y: f, z: f },
            Velocity { x: 0.1, y: 0.2, z: 0.3 },
        ));
    }
    manager
}

/// Benchmark: create entities with a two-component bundle.
fn bench_create_entities(c: &mut Criterion) {
    let mut group = c.benchmark_group("create_entities");

    for count in [1_000, 10_000, ENTITY_COUNT] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| black_box(populated_manager(count)).entity_count());
        });
    }

    group.finish();
}

/// Benchmark: one frame of the movement system.
fn bench_frame_update(c: &mut Criterion) {
    let mut manager = populated_manager(ENTITY_COUNT);

    c.bench_function("frame_update_100K", |b| {
        b.iter(|| manager.update(black_box(1.0 / 60.0)));
    });
}

/// Benchmark: add then remove a component (two notifications per entity).
fn bench_add_remove_churn(c: &mut Criterion) {
    let mut manager = populated_manager(10_000);
    let entities: Vec<_> = manager
        .system::<Movement>()
        .map(|movement| movement.filters().entities(0).to_vec())
        .unwrap_or_default();

    c.bench_function("sleep_wake_churn_1K", |b| {
        b.iter(|| {
            for &entity in entities.iter().take(1_000) {
                manager.add_components(entity, (Sleeping { ticks: 1 },));
                manager.remove_components::<(Sleeping,)>(entity);
            }
        });
    });
}

/// Benchmark: raw store alloc/release with slot reuse.
fn bench_store_reuse(c: &mut Criterion) {
    c.bench_function("packed_store_alloc_release_10K", |b| {
        let mut store = PackedStore::new(RecordLayout::of::<Position>(), GrowthPolicy::default());
        b.iter(|| {
            let slots: Vec<_> = (0..10_000).map(|_| store.alloc_default()).collect();
            for slot in slots {
                store.release(slot);
            }
            black_box(store.len())
        });
    });
}

criterion_group!(
    benches,
    bench_create_entities,
    bench_frame_update,
    bench_add_remove_churn,
    bench_store_reuse,
);

criterion_main!(benches);
