use fuzzy_mamdani::{Crisp, InferenceEngine, Inputs, Outputs, SystemConfig};

const AIR_QUALITY: &str = include_str!("fixtures/air_quality.json");

fn config() -> SystemConfig {
    SystemConfig::from_json(AIR_QUALITY).unwrap()
}

fn engine() -> InferenceEngine {
    config().build().unwrap()
}

fn conditions(pollutant: f64, temperature: f64, humidity: f64) -> Inputs {
    Inputs::new()
        .with("pollutant", pollutant)
        .with("temperature", temperature)
        .with("humidity", humidity)
}

fn dominant<'e>(engine: &'e InferenceEngine, outputs: &Outputs, variable: &str) -> &'e str {
    let value = outputs.value(variable).unwrap();

    engine.variable(variable).unwrap().dominant_term(value).unwrap().0
}

fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-6, "{actual} != {expected}");
}

#[test]
fn test_near_perfect_day() {
    let engine = engine();
    let outputs = engine.evaluate(&conditions(5., 23., 50.)).unwrap();
    let score = outputs.value("air_quality").unwrap();

    assert_eq!(outputs.activated_rules(), vec![1]);
    assert_close(outputs.firing_strength(1).unwrap(), 0.6);
    assert!(score < 25., "air quality = {score}");
    assert_eq!(dominant(&engine, &outputs, "air_quality"), "good");
    assert_eq!(dominant(&engine, &outputs, "recommendation"), "safe outdoor activities");

    let pollutant = outputs.fuzzified("pollutant").unwrap();

    assert_eq!(pollutant.len(), 4);
    assert_eq!(pollutant[0].0, "low");
    assert_close(pollutant[0].1, 5. / 6.);
    assert!(pollutant[1..].iter().all(|(_, d)| *d == 0.));
}

#[test]
fn test_hazardous_day() {
    let engine = engine();
    let outputs = engine.evaluate(&conditions(170., 25., 55.)).unwrap();
    let score = outputs.value("air_quality").unwrap();
    let recommendation = outputs.value("recommendation").unwrap();

    assert_eq!(outputs.activated_rules(), vec![10]);
    assert_eq!(outputs.firing_strength(10), Some(1.));
    assert!(score > 85. && score <= 100., "air quality = {score}");
    assert!(recommendation > 70., "recommendation = {recommendation}");
    assert_eq!(dominant(&engine, &outputs, "air_quality"), "hazardous");
    assert_eq!(dominant(&engine, &outputs, "recommendation"), "stay indoors");
    assert_eq!(
        engine.rules().get(10).unwrap().to_string(),
        "IF pollutant[very high] THEN air_quality[hazardous], recommendation[stay indoors]"
    );
}

#[test]
fn test_moderate_slightly_hot_day() {
    let engine = engine();
    let outputs = engine.evaluate(&conditions(38., 29., 57.)).unwrap();
    let score = outputs.value("air_quality").unwrap();

    assert_eq!(outputs.activated_rules(), vec![2, 6]);
    assert_close(outputs.firing_strength(2).unwrap(), 0.2);
    assert_close(outputs.firing_strength(6).unwrap(), 1. / 7.);
    // somewhere between fair and unhealthy
    assert!(score > 30. && score < 90., "air quality = {score}");
    assert_eq!(dominant(&engine, &outputs, "recommendation"), "limit outdoor activities");
}

#[test]
fn test_slightly_high_and_dry_day() {
    let outputs = engine().evaluate(&conditions(63., 27., 38.)).unwrap();

    assert_eq!(outputs.activated_rules(), vec![2, 3, 7, 9]);
    assert_close(outputs.firing_strength(2).unwrap(), 0.15);
    assert_close(outputs.firing_strength(3).unwrap(), 0.1);
    assert_close(outputs.firing_strength(7).unwrap(), 7. / 15.);
    assert_close(outputs.firing_strength(9).unwrap(), 0.1);
    assert!(outputs.value("air_quality").is_some());
    assert!(outputs.value("recommendation").is_some());
}

#[test]
fn test_slightly_moderate_bad_weather_day() {
    let outputs = engine().evaluate(&conditions(23., 30., 67.)).unwrap();

    assert_eq!(outputs.activated_rules(), vec![4, 5, 6, 7]);
    assert_close(outputs.firing_strength(4).unwrap(), 7. / 30.);
    assert_close(outputs.firing_strength(6).unwrap(), 0.15);
}

#[test]
fn test_batch_matches_sequential() {
    let engine = engine();
    let cases = [
        conditions(5., 23., 50.),
        conditions(170., 25., 55.),
        conditions(38., 29., 57.),
        conditions(63., 27., 38.),
        conditions(23., 30., 67.),
    ];

    for (case, parallel) in cases.iter().zip(engine.evaluate_batch(&cases)) {
        let parallel = parallel.unwrap();
        let sequential = engine.evaluate(case).unwrap();

        assert_eq!(parallel.trace(), sequential.trace());
        assert_eq!(parallel.crisp("air_quality"), sequential.crisp("air_quality"));
        assert_eq!(parallel.crisp("recommendation"), sequential.crisp("recommendation"));
    }
}

#[test]
fn test_rule_order_does_not_change_aggregation() {
    let mut reversed = config();

    reversed.rules.reverse();

    let forward = engine().evaluate(&conditions(63., 27., 38.)).unwrap();
    let backward = reversed.build().unwrap().evaluate(&conditions(63., 27., 38.)).unwrap();

    assert_eq!(forward.aggregated("air_quality"), backward.aggregated("air_quality"));
    assert_eq!(forward.aggregated("recommendation"), backward.aggregated("recommendation"));
}

#[test]
fn test_out_of_range_sensor_reading() {
    let outputs = engine().evaluate(&conditions(250., 25., 55.)).unwrap();

    // past the end of "very high", so nothing fires
    assert_eq!(outputs.warnings().len(), 1);
    assert_eq!(outputs.warnings()[0].variable, "pollutant");
    assert_eq!(outputs.crisp("air_quality"), Some(Crisp::Undefined));
    assert_eq!(outputs.crisp("recommendation"), Some(Crisp::Undefined));
    assert_eq!(outputs.crisp("air_quality").unwrap().unwrap_or(50.), 50.);

    let mut clipped = config();

    clipped.options.clip_inputs = true;

    let outputs = clipped.build().unwrap().evaluate(&conditions(250., 25., 55.)).unwrap();

    assert_eq!(outputs.warnings().len(), 1);
    assert_eq!(outputs.activated_rules(), vec![10]);
    assert!(outputs.value("air_quality").unwrap() > 85.);
}
