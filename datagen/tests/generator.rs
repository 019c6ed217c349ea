use datagen::{GeneratorConfig, envelope_signal, generate_training_data, generator::FEATURES};
use machine_learning::inference::Normalization;

#[test]
fn default_grid_has_every_pair_but_the_origin() {
    let config = GeneratorConfig::default();
    let dataset = generate_training_data(&config).unwrap();

    assert_eq!(dataset.len(), 120 * 252);
    assert_eq!(dataset.x_size(), FEATURES);

    let origin = dataset
        .x()
        .rows()
        .into_iter()
        .any(|row| row[0] == 0. && row[2] == 0.);
    assert!(!origin);
}

#[test]
fn samples_of_a_pair_share_their_target() {
    let config = GeneratorConfig::default();
    let dataset = generate_training_data(&config).unwrap();
    let per_pair = config.samples_per_pair();

    // first pair is A = -5, B = -5
    let (x, y) = dataset.slice(0..per_pair);
    assert!(x.column(0).iter().all(|&a| a == -1.));
    assert!(x.column(2).iter().all(|&b| b == -1.));
    assert!(y.iter().all(|&t| t == y[0]));

    let expected = config
        .horizon_scale()
        .normalize(4. * 50f32.sqrt().ln());
    assert!((y[0] - expected).abs() < 1e-5);
}

#[test]
fn oscillations_start_undamped_and_decay() {
    let config = GeneratorConfig::default();
    let dataset = generate_training_data(&config).unwrap();
    let per_pair = config.samples_per_pair();

    let (first, _) = dataset.sample(0);
    assert_eq!(first[1], 0.);
    assert_eq!(first[3], 1.);
    assert_eq!(envelope_signal(first), -1.);

    let (last, _) = dataset.sample(per_pair - 1);
    let envelope = (last[1].powi(2) + last[3].powi(2)).sqrt();
    assert!(envelope < 0.01);
}

#[test]
fn horizon_targets_stay_within_the_unit_interval() {
    let config = GeneratorConfig::default();
    let dataset = generate_training_data(&config).unwrap();

    assert!(dataset.y().iter().all(|&t| (0.0..1.0).contains(&t)));
}
