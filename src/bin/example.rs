//! frame-check example - portal frame with steel columns and a timber beam

use anyhow::Result;
use frame_check::prelude::*;

fn main() -> Result<()> {
    env_logger::init();

    println!("=== frame-check example: portal frame ===\n");

    // A 4 m wide, 3 m tall portal:
    //
    //     N3 ---------- N4
    //     |            |
    //     |            |
    //     N1          N2
    //     ^            ^
    //   Fixed       Pinned
    //
    // Wind pushes on the left column, a live point load sits at mid-beam
    // and snow covers the beam.
    let entities: EntitySet = serde_json::from_str(
        r#"{
        "nodes": {
            "n1": {"x": 0.0, "y": 0.0},
            "n2": {"x": 4.0, "y": 0.0},
            "n3": {"x": 0.0, "y": 3.0},
            "n4": {"x": 4.0, "y": 3.0}
        },
        "members": {
            "m1": {
                "node1": "n1", "node2": "n3",
                "dependants": ["s1", "dl1"],
                "memberprop": {
                    "type": "Steel",
                    "steelProfile": "HE140B",
                    "steelStrength": "S235",
                    "deflectionRequirement": 400,
                    "name": "venstre søjle"
                }
            },
            "m2": {
                "node1": "n2", "node2": "n4",
                "dependants": ["s2"],
                "memberprop": {
                    "type": "Steel",
                    "steelProfile": "HE140B",
                    "steelStrength": "S235",
                    "deflectionRequirement": 400,
                    "name": "højre søjle"
                }
            },
            "m3": {
                "node1": "n3", "node2": "n4",
                "dependants": ["pl1", "dl2"],
                "memberprop": {
                    "type": "Wood",
                    "woodType": "GL28h",
                    "woodSize": {"width": 115.0, "height": 270.0},
                    "name": "limtræsbjælke"
                }
            }
        },
        "supports": {
            "s1": {"resolved": {"x": 0.0, "y": 0.0}, "type": "Fixed"},
            "s2": {"resolved": {"x": 4.0, "y": 0.0}, "type": "Pinned"}
        },
        "pointLoads": {
            "pl1": {"resolved": {"x": 2.0, "y": 3.0}, "magnitude": 5.0, "type": "Live"}
        },
        "distributedLoads": {
            "dl1": {
                "resolved": {"point1": {"x": 0.0, "y": 0.0}, "point2": {"x": 0.0, "y": 3.0}},
                "magnitude1": 1.0, "magnitude2": 1.0, "type": "Wind"
            },
            "dl2": {
                "resolved": {"point1": {"x": 0.0, "y": 3.0}, "point2": {"x": 4.0, "y": 3.0}},
                "magnitude1": 0.8, "magnitude2": 0.8, "type": "Snow"
            }
        }
    }"#,
    )?;

    let settings = ProjectSettings {
        project_number: "P-001".to_string(),
        ..Default::default()
    };

    let analysis = Analysis::run(&entities, settings)?;

    println!(
        "model: {} nodes, {} elements, {} samples",
        analysis.model.n_nodes(),
        analysis.model.n_elements(),
        analysis.discretization.n_samples
    );
    println!(
        "combinations: {} ULS, {} SLS, {} ALS\n",
        analysis.combinations.uls.len(),
        analysis.combinations.sls.len(),
        analysis.combinations.als.len()
    );

    for member in &analysis.results.ur {
        println!("--- {} ---", member.member_name);
        for (rule, comb) in &member.uls.ur_critical_load_comb {
            let row = member
                .uls
                .ur_names
                .iter()
                .position(|r| r == rule)
                .expect("rule present");
            let col = member
                .uls
                .load_comb_names
                .iter()
                .position(|c| c == comb)
                .expect("combination present");
            let ur = member.uls.ur_loadcomb_mat[row][col];
            println!("  UR {ur:.3}  {rule}");
            println!("           governing: {comb}");
        }
        if let Some(t) = member.critical_steel_temperature {
            println!("  critical steel temperature: {t:.0} C");
        }
        println!();
    }

    println!("=== analysis complete ===");
    Ok(())
}
