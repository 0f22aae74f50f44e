//! End-to-end generation runs over small layouts

use geogen_core::*;
use rustc_hash::FxHashSet;
use std::sync::Arc;

fn settings(iterations: usize) -> GenerationSettings {
    GenerationSettings {
        iterations,
        seed: 11,
        ..GenerationSettings::default()
    }
}

fn generator(layout: LooseObjectLayout, constructions: &[PredefinedConstruction], settings: GenerationSettings) -> Generator {
    let registry = ObjectRegistry::new();
    let initial = Configuration::initial(layout, vec![], &registry).unwrap();
    let constructions = constructions.iter().map(|&c| Construction::from(c)).collect();
    Generator::new(registry, initial, constructions, settings).unwrap()
}

fn midpoint(registry: &ObjectRegistry, a: ObjectId, b: ObjectId) -> ObjectId {
    registry
        .intern_id(ConfigurationObject::constructed(
            PredefinedConstruction::Midpoint.into(),
            vec![Argument::set(vec![Argument::Object(a), Argument::Object(b)])],
            0,
        ))
        .unwrap()
}

#[test]
fn test_triangle_midpoints_collapse_to_one() {
    let generator = generator(LooseObjectLayout::Triangle, &[PredefinedConstruction::Midpoint], settings(1));
    let output = generator.collect_output().unwrap();

    assert_eq!(output.configurations.len(), 1);
    assert_eq!(output.configurations[0].objects, vec!["Midpoint({0,1})"]);
    assert_eq!(output.statistics.argument_lists, 3);
    assert_eq!(output.statistics.non_canonical, 2);
}

#[test]
fn test_free_points_keep_every_midpoint() {
    let generator = generator(LooseObjectLayout::FreePoints(3), &[PredefinedConstruction::Midpoint], settings(1));
    let output = generator.collect_output().unwrap();

    assert_eq!(output.configurations.len(), 3);
    assert_eq!(output.statistics.argument_lists, 3);
    assert_eq!(output.statistics.non_canonical, 0);
}

#[test]
fn test_second_layer_of_midpoints() {
    let generator = generator(LooseObjectLayout::Triangle, &[PredefinedConstruction::Midpoint], settings(2));
    let output = generator.collect_output().unwrap();

    assert_eq!(output.statistics.frontier_sizes, vec![1, 3]);
    let second: FxHashSet<Vec<String>> = output
        .configurations
        .iter()
        .filter(|c| c.iteration == 2)
        .map(|c| c.objects.clone())
        .collect();
    let expected: FxHashSet<Vec<String>> = [
        vec!["Midpoint({0,1})", "Midpoint({0,2})"],
        vec!["Midpoint({0,1})", "Midpoint({0,Midpoint({0,1})})"],
        vec!["Midpoint({0,1})", "Midpoint({2,Midpoint({0,1})})"],
    ]
    .into_iter()
    .map(|objects| objects.into_iter().map(String::from).collect())
    .collect();
    assert_eq!(second, expected);
}

#[test]
fn test_circumcenter_with_collinear_midpoint() {
    let registry = ObjectRegistry::new();
    let base = Configuration::initial(LooseObjectLayout::Triangle, vec![], &registry).unwrap();
    let [a, b, _c] = [base.loose_objects()[0], base.loose_objects()[1], base.loose_objects()[2]];
    let m = midpoint(&registry, a, b);
    let initial = Configuration::initial(LooseObjectLayout::Triangle, vec![m], &registry).unwrap();

    let generator = Generator::new(
        registry,
        initial,
        vec![PredefinedConstruction::Circumcenter.into()],
        settings(1),
    )
    .unwrap();
    let output = generator.collect_output().unwrap();

    let objects: Vec<&str> = output
        .configurations
        .iter()
        .map(|c| c.newest[0].as_str())
        .collect();
    assert_eq!(objects.len(), 2);
    assert!(objects.contains(&"Circumcenter({0,1,2})"));
    assert!(objects.contains(&"Circumcenter({0,2,Midpoint({0,1})})"));
    assert!(!objects.contains(&"Circumcenter({0,1,Midpoint({0,1})})"));

    assert_eq!(output.statistics.unconstructible, 1);
    assert_eq!(output.statistics.non_canonical, 1);
}

#[test]
fn test_two_layers_with_circumcenters() {
    let generator = generator(
        LooseObjectLayout::Triangle,
        &[PredefinedConstruction::Midpoint, PredefinedConstruction::Circumcenter],
        settings(2),
    );
    let output = generator.collect_output().unwrap();

    assert_eq!(output.count_in_iteration(1), 2);
    assert!(output.statistics.unconstructible > 0);
    assert!(output
        .configurations
        .iter()
        .any(|c| c.objects == ["Midpoint({0,1})", "Circumcenter({0,2,Midpoint({0,1})})"]));
    assert!(output
        .configurations
        .iter()
        .all(|c| !c.objects.iter().any(|o| o == "Circumcenter({0,1,Midpoint({0,1})})")));
}

#[test]
fn test_no_equivalent_configurations_in_a_frontier() {
    let generator = generator(
        LooseObjectLayout::Triangle,
        &[PredefinedConstruction::Midpoint, PredefinedConstruction::Centroid],
        settings(2),
    );
    let canonicalizer = RegistryCanonicalizer::new(generator.registry().clone());

    let mut seen: FxHashSet<(usize, Vec<String>)> = FxHashSet::default();
    let mut count = 0;
    for generated in generator.run() {
        let generated = generated.unwrap();
        let form = canonicalizer.normal_form(&generated.configuration).unwrap();
        assert!(seen.insert((generated.iteration, form)), "equivalent configurations emitted twice");
        count += 1;
    }
    assert!(count > 2);
}

#[test]
fn test_emitted_configurations_are_geometrically_distinct() {
    let generator = generator(
        LooseObjectLayout::Triangle,
        &[PredefinedConstruction::Midpoint, PredefinedConstruction::Centroid],
        settings(2),
    );

    for generated in generator.run() {
        let generated = generated.unwrap();
        for picture in generated.registrar.pictures().iter() {
            let values: Vec<AnalyticObject> = generated
                .configuration
                .objects()
                .map(|id| *picture.get(id).unwrap())
                .collect();
            for (i, x) in values.iter().enumerate() {
                for y in &values[i + 1..] {
                    assert!(!x.approx_eq(y));
                }
            }
        }
    }
}

#[test]
fn test_canonicalizers_agree() {
    let run = |kind: CanonicalizerKind| {
        let settings = GenerationSettings {
            canonicalizer: kind,
            ..settings(2)
        };
        generator(
            LooseObjectLayout::Quadrilateral,
            &[PredefinedConstruction::Midpoint],
            settings,
        )
        .collect_output()
        .unwrap()
    };

    let registry = run(CanonicalizerKind::Registry);
    let recomputing = run(CanonicalizerKind::Recomputing);
    assert_eq!(registry.configurations, recomputing.configurations);
    assert_eq!(registry.statistics, recomputing.statistics);
}

/// Midpoints of `0 1` and `0 2` from one call
fn two_midpoints() -> Construction {
    let composed = ComposedConstruction::new(
        "TwoMidpoints",
        vec![
            ConstructionParameter::Object(ObjectKind::Point),
            ConstructionParameter::set_of(ObjectKind::Point, 2),
        ],
        vec![
            TemplateStep {
                construction: PredefinedConstruction::Midpoint,
                arguments: vec![0, 1],
            },
            TemplateStep {
                construction: PredefinedConstruction::Midpoint,
                arguments: vec![0, 2],
            },
        ],
        vec![3, 4],
    )
    .unwrap();
    Construction::Composed(Arc::new(composed))
}

#[test]
fn test_two_output_construction_keeps_its_outputs_together() {
    let registry = ObjectRegistry::new();
    let initial = Configuration::initial(LooseObjectLayout::FreePoints(3), vec![], &registry).unwrap();
    let generator = Generator::new(
        registry,
        initial,
        vec![two_midpoints(), PredefinedConstruction::Midpoint.into()],
        settings(2),
    )
    .unwrap();
    let output = generator.collect_output().unwrap();

    let emitted = |objects: &[&str]| output.configurations.iter().any(|c| c.objects == objects);
    assert!(emitted(&["TwoMidpoints(0,{1,2})", "TwoMidpoints(0,{1,2})[1]"]));
    assert!(emitted(&[
        "TwoMidpoints(0,{1,2})",
        "TwoMidpoints(0,{1,2})[1]",
        "Midpoint({0,TwoMidpoints(0,{1,2})})",
    ]));
    assert!(emitted(&[
        "TwoMidpoints(0,{1,2})",
        "TwoMidpoints(0,{1,2})[1]",
        "Midpoint({0,TwoMidpoints(0,{1,2})[1]})",
    ]));

    let canonicalizer = RegistryCanonicalizer::new(generator.registry().clone());
    for generated in generator.run() {
        let generated = generated.unwrap();
        assert!(canonicalizer.is_canonical(&generated.configuration).unwrap());
    }
}

#[test]
fn test_output_json() {
    let generator = generator(LooseObjectLayout::Triangle, &[PredefinedConstruction::Midpoint], settings(1));
    let output = generator.collect_output().unwrap();

    let json = output.to_json().unwrap();
    let parsed: GenerationOutput = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.layout, LooseObjectLayout::Triangle);
    assert_eq!(parsed.configurations[0].newest, vec!["Midpoint({0,1})"]);
    assert_eq!(parsed.configurations[0].points.len(), 4);
}
