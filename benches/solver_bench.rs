//! Benchmarks for the frame solver and the full analysis pipeline

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use frame_check::prelude::*;
use serde_json::json;

fn multi_story_frame(stories: usize, bays: usize) -> EntitySet {
    let story_height = 3.5;
    let bay_width = 6.0;

    let mut nodes = serde_json::Map::new();
    for story in 0..=stories {
        for bay in 0..=bays {
            nodes.insert(
                format!("n{story}_{bay}"),
                json!({"x": bay as f64 * bay_width, "y": story as f64 * story_height}),
            );
        }
    }

    let mut members = serde_json::Map::new();
    let mut supports = serde_json::Map::new();
    let mut point_loads = serde_json::Map::new();

    for bay in 0..=bays {
        supports.insert(
            format!("s{bay}"),
            json!({"resolved": {"x": bay as f64 * bay_width, "y": 0.0}, "type": "Fixed"}),
        );
    }

    for story in 1..=stories {
        for bay in 0..=bays {
            point_loads.insert(
                format!("pl{story}_{bay}"),
                json!({
                    "resolved": {"x": bay as f64 * bay_width, "y": story as f64 * story_height},
                    "magnitude": 50.0,
                    "type": "Dead"
                }),
            );
        }
    }

    let prop = json!({
        "type": "Steel",
        "steelProfile": "HE200B",
        "steelStrength": "S355",
        "deflectionRequirement": 400,
        "selfWeightEnabled": false
    });

    for story in 0..stories {
        for bay in 0..=bays {
            let mut deps = vec![format!("pl{}_{}", story + 1, bay)];
            if story == 0 {
                deps.push(format!("s{bay}"));
            } else {
                deps.push(format!("pl{story}_{bay}"));
            }
            members.insert(
                format!("col{story}_{bay}"),
                json!({
                    "node1": format!("n{story}_{bay}"),
                    "node2": format!("n{}_{}", story + 1, bay),
                    "dependants": deps,
                    "memberprop": prop.clone()
                }),
            );
        }
    }
    for story in 1..=stories {
        for bay in 0..bays {
            members.insert(
                format!("beam{story}_{bay}"),
                json!({
                    "node1": format!("n{story}_{bay}"),
                    "node2": format!("n{story}_{}", bay + 1),
                    "dependants": [format!("pl{story}_{bay}"), format!("pl{story}_{}", bay + 1)],
                    "memberprop": prop.clone()
                }),
            );
        }
    }

    serde_json::from_value(json!({
        "nodes": nodes,
        "members": members,
        "supports": supports,
        "pointLoads": point_loads
    }))
    .unwrap()
}

fn settings() -> ProjectSettings {
    ProjectSettings {
        selfweight_on_off: false,
        ..Default::default()
    }
}

fn benchmark_solve(c: &mut Criterion) {
    let set = multi_story_frame(3, 2);
    c.bench_function("frame_3story_2bay_solve", |b| {
        b.iter(|| {
            let mut model = FrameModel::from_entities(&set).unwrap();
            let loads = frame_check::loads::collect_single_loads(&set, &settings());
            for load in &loads {
                model.clear_loads();
                model.apply_load(load).unwrap();
                black_box(model.solve().unwrap());
            }
        })
    });
}

fn benchmark_full_analysis(c: &mut Criterion) {
    let set = multi_story_frame(3, 2);
    c.bench_function("frame_3story_2bay_full_analysis", |b| {
        b.iter(|| {
            let analysis = Analysis::run(&set, settings()).unwrap();
            black_box(&analysis.results);
        })
    });
}

criterion_group!(benches, benchmark_solve, benchmark_full_analysis);

criterion_main!(benches);
