use super::*;
use crate::hypergeom;
use crate::testing::{assert_estimate, assert_probability};
use assert_float_eq::*;
use tinyrand::{Seeded, StdRand};

const TOLERANCE: f64 = 0.02;

fn blue_red_green() -> Composition {
    Composition::default()
        .with("blue", 3)
        .with("red", 2)
        .with("green", 6)
}

fn blue_and_green() -> Composition {
    Composition::default().with("blue", 2).with("green", 1)
}

#[test]
fn no_experiments() {
    let hat = Hat::new(&blue_red_green());
    let err = experiment(&hat, &blue_and_green(), 4, 0, &mut StdRand::default()).unwrap_err();
    assert_eq!(ExperimentError::NoExperiments, err);
    assert_eq!("no experiments requested", err.to_string());

    let engine = Experiment::default().with_expected(blue_and_green()).with_draws(4);
    assert_eq!(
        Err(ExperimentError::NoExperiments),
        engine.simulate(&hat, &mut StdRand::default())
    );
    assert_eq!(Err(ExperimentError::NoExperiments), engine.simulate_par(&hat, 0));
}

#[test]
fn red_and_blue() {
    let composition = Composition::default().with("red", 5).with("blue", 2);
    let expected = Composition::default().with("red", 2);
    let hat = Hat::new(&composition);
    let exact = hypergeom::probability(&composition, &expected, 4);

    let probability = experiment(&hat, &expected, 4, 2_000, &mut StdRand::seed(1)).unwrap();
    assert_float_absolute_eq!(exact, probability, 0.03);

    // at most two of the four balls can be blue
    assert_f64_near!(1.0, probability);
}

#[test]
fn red_and_blue_against_exact() {
    let composition = Composition::default().with("red", 5).with("blue", 2);
    let expected = Composition::default().with("red", 3);
    let hat = Hat::new(&composition);
    let exact = hypergeom::probability(&composition, &expected, 4);
    // (C(5,3)·C(2,1) + C(5,4)) / C(7,4)
    assert_float_absolute_eq!(25.0 / 35.0, exact, 1e-12);

    let frac = Experiment::default()
        .with_expected(&expected)
        .with_draws(4)
        .with_trials(20_000)
        .simulate(&hat, &mut StdRand::seed(1))
        .unwrap();
    assert_estimate(exact, &frac, TOLERANCE);
}

#[test]
fn blue_red_green_against_exact() {
    let hat = Hat::new(&blue_red_green());
    let frac = Experiment::default()
        .with_expected(blue_and_green())
        .with_draws(4)
        .with_trials(20_000)
        .simulate(&hat, &mut StdRand::seed(95))
        .unwrap();
    assert_eq!(20_000, frac.denominator);
    assert_estimate(87.0 / 330.0, &frac, TOLERANCE);
}

#[test]
fn borrowed_expectation() {
    let hat = Hat::new(&blue_red_green());
    let expected = blue_and_green();
    let engine = Experiment::default()
        .with_expected(&expected)
        .with_draws(4)
        .with_trials(100);
    assert_eq!(&expected, engine.expected());
    assert_eq!(4, engine.draws());
    assert_eq!(100, engine.trials());
    assert_probability(engine.simulate(&hat, &mut StdRand::default()).unwrap().quotient());
}

#[test]
fn zero_draws() {
    let hat = Hat::new(&blue_red_green());
    let probability = experiment(&hat, &blue_and_green(), 0, 1_000, &mut StdRand::default()).unwrap();
    assert_f64_near!(0.0, probability);
}

#[test]
fn empty_expectation() {
    let hat = Hat::new(&blue_red_green());
    for draws in [0, 1, 4, 11, 20] {
        let probability = experiment(&hat, &Composition::default(), draws, 500, &mut StdRand::default()).unwrap();
        assert_f64_near!(1.0, probability);
    }
}

#[test]
fn unknown_label() {
    let hat = Hat::new(&blue_red_green());
    let expected = Composition::default().with("yellow", 1);
    let probability = experiment(&hat, &expected, 11, 500, &mut StdRand::default()).unwrap();
    assert_f64_near!(0.0, probability);

    let expected = Composition::default().with("yellow", 0).with("red", 1);
    let probability = experiment(&hat, &expected, 11, 500, &mut StdRand::default()).unwrap();
    assert_f64_near!(1.0, probability);
}

#[test]
fn draw_exceeding_contents() {
    let composition = Composition::default().with("red", 2);
    let hat = Hat::new(&composition);
    let probability = experiment(&hat, &composition, 5, 100, &mut StdRand::default()).unwrap();
    assert_f64_near!(1.0, probability);
}

#[test]
fn probability_bounds() {
    let hat = Hat::new(&blue_red_green());
    let mut rand = StdRand::seed(11);
    for draws in 0..=12 {
        for expected in [
            blue_and_green(),
            Composition::default().with("red", 2),
            Composition::default().with("green", 6).with("red", 1),
        ] {
            let probability = experiment(&hat, &expected, draws, 200, &mut rand).unwrap();
            assert_probability(probability);
        }
    }
}

#[test]
fn deterministic_under_seed() {
    let hat = Hat::new(&blue_red_green());
    let engine = Experiment::default()
        .with_expected(blue_and_green())
        .with_draws(5)
        .with_trials(5_000);
    let first = engine.simulate(&hat, &mut StdRand::seed(42)).unwrap();
    let second = engine.simulate(&hat, &mut StdRand::seed(42)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn hat_is_not_mutated() {
    let hat = Hat::new(&blue_red_green());
    let before = hat.clone();
    experiment(&hat, &blue_and_green(), 4, 1_000, &mut StdRand::default()).unwrap();
    assert_eq!(before, hat);

    Experiment::default()
        .with_expected(blue_and_green())
        .with_draws(4)
        .with_trials(1_000)
        .simulate_par(&hat, 7)
        .unwrap();
    assert_eq!(before, hat);
}

#[test]
fn repeated_experiments_sample_same_distribution() {
    let hat = Hat::new(&blue_red_green());
    let mut rand = StdRand::seed(5);
    let first = experiment(&hat, &blue_and_green(), 4, 20_000, &mut rand).unwrap();
    let second = experiment(&hat, &blue_and_green(), 4, 20_000, &mut rand).unwrap();
    assert_float_absolute_eq!(87.0 / 330.0, first, TOLERANCE);
    assert_float_absolute_eq!(87.0 / 330.0, second, TOLERANCE);
}

#[test]
fn starts_from_current_contents() {
    let mut hat = Hat::new(&Composition::default().with("red", 1).with("blue", 1));
    let drawn = hat.draw(1, &mut StdRand::seed(3));
    let remaining: Vec<_> = hat.contents().map(str::to_string).collect();
    assert_eq!(1, remaining.len());
    assert_ne!(drawn, remaining);

    let expected = Composition::default().with(remaining[0].clone(), 1);
    let probability = experiment(&hat, &expected, 1, 100, &mut StdRand::default()).unwrap();
    assert_f64_near!(1.0, probability);

    let expected = Composition::default().with(drawn[0].clone(), 1);
    let probability = experiment(&hat, &expected, 1, 100, &mut StdRand::default()).unwrap();
    assert_f64_near!(0.0, probability);
}

#[test]
fn monotonic_in_draws() {
    let composition = blue_red_green();
    let hat = Hat::new(&composition);
    let expected = blue_and_green();
    let mut previous = 0.0;
    for draws in 0..=11 {
        let exact = hypergeom::probability(&composition, &expected, draws);
        let frac = Experiment::default()
            .with_expected(&expected)
            .with_draws(draws)
            .with_trials(20_000)
            .simulate(&hat, &mut StdRand::seed(draws as u64))
            .unwrap();
        assert_estimate(exact, &frac, TOLERANCE);
        assert!(
            frac.quotient() >= previous - TOLERANCE,
            "{draws} draws: {} < {previous}",
            frac.quotient()
        );
        previous = frac.quotient();
    }
    assert_f64_near!(1.0, previous);
}

#[test]
fn simulate_par_against_exact() {
    let hat = Hat::new(&blue_red_green());
    let frac = Experiment::default()
        .with_expected(blue_and_green())
        .with_draws(4)
        .with_trials(3 * PAR_CHUNK_TRIALS + 1)
        .simulate_par(&hat, 42)
        .unwrap();
    assert_eq!(3 * PAR_CHUNK_TRIALS + 1, frac.denominator);
    assert_estimate(87.0 / 330.0, &frac, TOLERANCE);
}

#[test]
fn simulate_par_deterministic_under_seed() {
    let hat = Hat::new(&blue_red_green());
    let engine = Experiment::default()
        .with_expected(blue_and_green())
        .with_draws(3)
        .with_trials(25_000);
    assert_eq!(engine.simulate_par(&hat, 9).unwrap(), engine.simulate_par(&hat, 9).unwrap());
}

#[test]
fn simulate_par_independent_of_thread_count() {
    let hat = Hat::new(&blue_red_green());
    let engine = Experiment::default()
        .with_expected(blue_and_green())
        .with_draws(4)
        .with_trials(55_555);
    let run_on = |threads| {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .unwrap()
            .install(|| engine.simulate_par(&hat, 3))
            .unwrap()
    };
    let single = run_on(1);
    let multi = run_on(4);
    assert_eq!(single, multi);
    assert_estimate(87.0 / 330.0, &single, TOLERANCE);
}

#[test]
fn simulate_par_edge_cases() {
    let hat = Hat::new(&blue_red_green());
    let frac = Experiment::default()
        .with_draws(4)
        .with_trials(12_345)
        .simulate_par(&hat, 0)
        .unwrap();
    assert_eq!(Fraction { numerator: 12_345, denominator: 12_345 }, frac);

    let frac = Experiment::default()
        .with_expected(Composition::default().with("yellow", 1))
        .with_draws(4)
        .with_trials(10)
        .simulate_par(&hat, 0)
        .unwrap();
    assert_eq!(Fraction { numerator: 0, denominator: 10 }, frac);

    let frac = Experiment::default()
        .with_expected(blue_and_green())
        .with_draws(0)
        .with_trials(1)
        .simulate_par(&hat, 0)
        .unwrap();
    assert_eq!(Fraction { numerator: 0, denominator: 1 }, frac);
}

#[test]
fn criteria_resolution() {
    let hat = Hat::new(&blue_red_green());
    let criteria = Criteria::resolve(
        &hat,
        &Composition::default().with("green", 1).with("red", 0).with("blue", 2),
    );
    assert_eq!(
        Criteria {
            minimums: vec![
                Minimum { ordinal: 2, count: 1 },
                Minimum { ordinal: 0, count: 2 }
            ],
            satisfiable: true
        },
        criteria
    );

    let criteria = Criteria::resolve(&hat, &Composition::default().with("yellow", 1));
    assert!(!criteria.satisfiable);
}

#[test]
fn chunk_seeds_differ() {
    let seeds: Vec<_> = (0..100).map(|chunk| chunk_seed(42, chunk)).collect();
    for (index, seed) in seeds.iter().enumerate() {
        assert!(!seeds[index + 1..].contains(seed));
    }
}
