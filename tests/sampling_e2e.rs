use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;

use worldsample::{
    apply_factor_multipliers, sample_distribution_fields_with_overrides, sample_finite_fields, EntityGenerator,
    FieldValue, SampledFields, SamplingConfig,
};

fn fixture(name: &str) -> SamplingConfig {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    SamplingConfig::load(path).unwrap()
}

fn share(draws: &[SampledFields], field: &str, label: &str) -> f64 {
    let hits = draws.iter().filter(|d| d[field].is_label(label)).count();
    hits as f64 / draws.len() as f64
}

fn draw_finite(config: &SamplingConfig, n: usize, seed: u64) -> Vec<SampledFields> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let mut sampled = SampledFields::new();
            sample_finite_fields(config, &mut sampled, &mut rng).unwrap();
            sampled
        })
        .collect()
}

#[test]
fn unperturbed_sampling_matches_base_probabilities() {
    let config = SamplingConfig::from_value(json!({
        "base_probabilities_finite": {
            "color": {"red": 0.5, "green": 0.3, "blue": 0.2}
        }
    }))
    .unwrap();

    let draws = draw_finite(&config, 2000, 11);
    assert!((share(&draws, "color", "red") - 0.5).abs() < 0.04);
    assert!((share(&draws, "color", "green") - 0.3).abs() < 0.04);
    assert!((share(&draws, "color", "blue") - 0.2).abs() < 0.04);
}

#[test]
fn large_multiplier_dominates() {
    let config = SamplingConfig::from_value(json!({
        "base_probabilities_finite": {
            "season": {"winter": 1.0},
            "weather": {"sun": 0.4, "rain": 0.4, "snow": 0.2}
        },
        "factors": {
            "season": {"weather": {"winter": {"snow": 1000.0, "sun": 1.0, "rain": 1.0}}}
        }
    }))
    .unwrap();

    let draws = draw_finite(&config, 1000, 12);
    assert!(share(&draws, "weather", "snow") > 0.8);
}

#[test]
fn two_multipliers_compose_after_renormalization() {
    let config = SamplingConfig::from_value(json!({
        "base_probabilities_finite": {
            "a": {"on": 1.0},
            "b": {"on": 1.0},
            "target": {"x": 0.2, "y": 0.8}
        },
        "factors": {
            "a": {"target": {"on": {"x": 2.0}}},
            "b": {"target": {"on": {"x": 3.0}}}
        }
    }))
    .unwrap();

    let mut sampled = SampledFields::new();
    sampled.insert("a".to_string(), FieldValue::from("on"));
    sampled.insert("b".to_string(), FieldValue::from("on"));
    let adjusted = apply_factor_multipliers(
        config.probabilities("target").unwrap(),
        "target",
        &sampled,
        config.factors(),
    );
    // 0.2 * 2 * 3 = 1.2 against 0.8.
    assert!((adjusted["x"] - 0.6).abs() < 1e-12);
    assert!((adjusted["y"] - 0.4).abs() < 1e-12);

    let draws = draw_finite(&config, 2000, 13);
    assert!((share(&draws, "target", "x") - 0.6).abs() < 0.04);
}

#[test]
fn matching_override_replaces_distribution() {
    let config = fixture("override_special.json");
    let mut rng = StdRng::seed_from_u64(14);

    let mut ordinary = Vec::new();
    for _ in 0..1000 {
        let mut sampled = SampledFields::new();
        sample_finite_fields(&config, &mut sampled, &mut rng).unwrap();
        sample_distribution_fields_with_overrides(&config, &mut sampled, &mut rng).unwrap();
        let power = sampled["power"].as_number().unwrap();
        if sampled["type"].is_label("special") {
            assert!((power - 250.0).abs() < 1.0, "special power {power}");
        } else {
            ordinary.push(power);
        }
    }
    assert!(ordinary.len() > 300);
    let mean = ordinary.iter().sum::<f64>() / ordinary.len() as f64;
    assert!((mean - 30.0).abs() < 2.0);
}

#[test]
fn ecosystem_entities_respect_dependencies() {
    let config = fixture("ecosystem.json");
    let generator = EntityGenerator::new(&config);
    let mut rng = StdRng::seed_from_u64(15);

    let mut herons = 0;
    for _ in 0..600 {
        let entity = generator.generate_one(&mut rng).unwrap();
        assert_eq!(entity.len(), config.entity_width());

        let habitat = entity.get("habitat").unwrap();
        let species = entity.get("species").unwrap();
        let diet = entity.get("diet").unwrap();
        if habitat.is_label("desert") {
            assert!(!species.is_label("heron"));
        }
        if species.is_label("heron") {
            herons += 1;
            assert!(!diet.is_label("herbivore"));
        }

        let fox_in_forest = species.is_label("fox") && habitat.is_label("forest");
        let age = entity.get("age").and_then(FieldValue::as_number).unwrap();
        if !fox_in_forest {
            assert!((0.0..=16.0).contains(&age), "age {age}");
        }

        assert!(entity.get("weight").and_then(FieldValue::as_number).unwrap() > 0.0);
        assert!(entity.get("nocturnal").unwrap().is_bool());
        assert_eq!(entity.get("biome_set"), Some(&FieldValue::from("temperate")));
        assert_eq!(entity.get("schema_version"), Some(&FieldValue::Number(2.0)));
    }
    assert!(herons > 0);
}

#[test]
fn preseeded_fields_condition_the_rest() {
    let config = fixture("ecosystem.json");
    let generator = EntityGenerator::new(&config);
    let mut rng = StdRng::seed_from_u64(16);

    for _ in 0..300 {
        let mut seed = SampledFields::new();
        seed.insert("habitat".to_string(), FieldValue::from("desert"));
        let entity = generator.generate_seeded(seed, &mut rng).unwrap();
        assert_eq!(entity.get("habitat"), Some(&FieldValue::from("desert")));
        assert!(!entity.get("species").unwrap().is_label("heron"));
    }
}

#[test]
fn entity_order_follows_resolution() {
    let config = fixture("ecosystem.json");
    let entity = EntityGenerator::new(&config)
        .generate_one(&mut StdRng::seed_from_u64(17))
        .unwrap();
    let keys: Vec<&str> = entity.iter().map(|(k, _)| k).collect();
    assert_eq!(
        keys,
        vec![
            "habitat",
            "species",
            "diet",
            "temperament",
            "age",
            "weight",
            "speed",
            "territory",
            "nocturnal",
            "biome_set",
            "schema_version",
        ]
    );
}
