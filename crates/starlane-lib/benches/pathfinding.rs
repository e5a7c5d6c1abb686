use criterion::{criterion_group, criterion_main, Criterion};
use once_cell::sync::Lazy;
use starlane_lib::{
    find_path_with_resupply, AdvisorConfig, FleetState, MissionIntent, PathRequest, RouteAdvisor,
    RouteRequest, SearchConfig, StarlaneMap, SupplySnapshot, SystemId, SystemPosition,
    TravelPolicy,
};
use std::hint::black_box;

const WIDTH: i64 = 30;

fn grid_id(x: i64, y: i64) -> SystemId {
    y * WIDTH + x + 1
}

static GRID: Lazy<StarlaneMap> = Lazy::new(|| {
    let mut systems = Vec::new();
    let mut lanes = Vec::new();
    for y in 0..WIDTH {
        for x in 0..WIDTH {
            // Slight jitter keeps distances from tying everywhere.
            let jitter = ((x * 7 + y * 13) % 5) as f64 * 0.05;
            systems.push((
                grid_id(x, y),
                SystemPosition::new(x as f64 + jitter, y as f64 - jitter, 0.0),
            ));
            if x + 1 < WIDTH {
                lanes.push((grid_id(x, y), grid_id(x + 1, y)));
            }
            if y + 1 < WIDTH {
                lanes.push((grid_id(x, y), grid_id(x, y + 1)));
            }
        }
    }
    StarlaneMap::from_parts(systems, lanes).expect("grid builds")
});

static SUPPLY: Lazy<SupplySnapshot> = Lazy::new(|| {
    let depots = (0..WIDTH)
        .step_by(6)
        .flat_map(|x| (0..WIDTH).step_by(6).map(move |y| grid_id(x, y)));
    SupplySnapshot::new(1)
        .with_supplied(depots)
        .with_ranges_from(&*GRID)
});

fn benchmark_pathfinding(c: &mut Criterion) {
    let map = &*GRID;
    let supply = &*SUPPLY;
    let config = SearchConfig::default();

    c.bench_function("resupply_corner_to_corner_unlimited_fuel", |b| {
        let request = PathRequest::new(grid_id(0, 0), grid_id(WIDTH - 1, WIDTH - 1), 1e6, 1e6)
            .with_policy(TravelPolicy::Unrestricted);
        b.iter(|| {
            let path = find_path_with_resupply(map, supply, &request, &config).expect("valid");
            black_box(path.map(|p| p.hop_count()))
        });
    });

    c.bench_function("resupply_corner_to_corner_tight_fuel", |b| {
        let request = PathRequest::new(grid_id(0, 0), grid_id(WIDTH - 1, WIDTH - 1), 4.0, 4.0)
            .with_policy(TravelPolicy::Unrestricted);
        b.iter(|| {
            let path = find_path_with_resupply(map, supply, &request, &config).expect("valid");
            black_box(path.map(|p| p.total_distance))
        });
    });

    c.bench_function("advisor_batch_64_fleets", |b| {
        let advisor = RouteAdvisor::new(map, supply, AdvisorConfig::default()).expect("advisor");
        let requests: Vec<RouteRequest> = (0..64)
            .map(|i| {
                let fleet = FleetState::new(i, grid_id(0, 0), 4.0, 4.0, MissionIntent::Military);
                RouteRequest::new(fleet, grid_id(i % WIDTH, (i * 7) % WIDTH))
            })
            .collect();
        b.iter(|| black_box(advisor.plan_routes(&requests).len()));
    });
}

criterion_group!(benches, benchmark_pathfinding);
criterion_main!(benches);
