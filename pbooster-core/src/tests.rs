//! Testes integrados para pbooster-core

use crate::*;
use crate::constants::DEFAULT_MAX_ITERATIONS;

fn sports_news() -> UserProfile {
    UserProfile::new("User50", TopicFrequency::from([("sports", 40), ("news", 10)]))
}

#[test]
fn test_reference_scenario_is_deterministic() {
    let user = sports_news();
    let config = OptimizerConfig::new(0.5, 0.1).unwrap();

    let first = select_topics(&user, &config).unwrap();
    let second = select_topics(&user, &config).unwrap();

    assert_eq!(first.perturbation, second.perturbation);
    assert_eq!(first.moves, second.moves);
    assert_eq!(first.privacy, second.privacy);
    assert!(first.privacy >= privacy(user.history()).unwrap());
    assert!(!first.perturbation.is_zero());
}

#[test]
fn test_reference_scenario_exact_result() {
    let user = sports_news();
    let config = OptimizerConfig::new(0.5, 0.1).unwrap();

    let outcome = select_topics(&user, &config).unwrap();
    assert_eq!(outcome.perturbation.get("news"), Some(3));
    assert_eq!(outcome.perturbation.get("sports"), Some(0));
    assert_eq!(outcome.perturbation.to_string(), "news +3, sports +0");
    assert_eq!(outcome.moves.len(), 3);
    assert!(outcome.moves.iter().all(|m| m.topic == "news" && m.direction == MoveDirection::Add));
    assert!((outcome.objective - 0.11977277697901875).abs() < 1e-12);
}

#[test]
fn test_zero_count_topic_exact_results() {
    let user = UserProfile::new("u", TopicFrequency::from([("a", 0), ("b", 5)]));

    let low = select_topics(&user, &OptimizerConfig::new(0.1, 0.1).unwrap()).unwrap();
    assert_eq!(low.perturbation.to_string(), "a +1, b +2");

    let high = select_topics(&user, &OptimizerConfig::new(10.0, 0.1).unwrap()).unwrap();
    assert_eq!(high.perturbation.to_string(), "a +4, b +0");
}

#[test]
fn test_overflowing_dataset_counts_are_rejected() {
    let dataset = Dataset::parse("Lambda: 1\nEpsilon: 0.1\nUser1: a 18446744073709551615, b 1\n").unwrap();
    let user = dataset.target("User1").unwrap();

    assert!(matches!(privacy(user.history()), Err(BoostError::InvalidInput(_))));
    let config = OptimizerConfig::new(1.0, 0.1).unwrap();
    assert!(matches!(select_topics(user, &config), Err(BoostError::InvalidInput(_))));
}

#[test]
fn test_outcome_never_worse_than_zero_vector() {
    let profiles = [
        TopicFrequency::from([("sports", 40), ("news", 10)]),
        TopicFrequency::from([("a", 1), ("b", 1), ("c", 30)]),
        TopicFrequency::from([("a", 0), ("b", 5)]),
        TopicFrequency::from([("x", 7), ("y", 7)]),
    ];

    for history in profiles {
        let user = UserProfile::new("u", history.clone());
        for lambda in [0.0, 0.1, 1.0, 5.0] {
            let config = OptimizerConfig::new(lambda, 0.1).unwrap();
            let outcome = select_topics(&user, &config).unwrap();

            let zero = objective(&history, &Perturbation::zeros(&history), &config).unwrap();
            let reached = objective(&history, &outcome.perturbation, &config).unwrap();
            assert!(reached >= zero, "λ={} {}: {} < {}", lambda, history, reached, zero);
            assert!((reached - outcome.objective).abs() < 1e-12);
        }
    }
}

#[test]
fn test_zero_count_topic_never_goes_negative() {
    let user = UserProfile::new("u", TopicFrequency::from([("a", 0), ("b", 5)]));

    for lambda in [0.0, 0.1, 0.5, 1.0, 10.0, 100.0] {
        let config = OptimizerConfig::new(lambda, 0.1).unwrap();
        let outcome = select_topics(&user, &config).unwrap();

        assert!(
            outcome
                .moves
                .iter()
                .all(|m| !(m.topic == "a" && m.direction == MoveDirection::Subtract)),
            "subtração escolhida para 'a' (λ={})",
            lambda
        );

        // Cada subtração em "a" precisa de uma adição anterior
        let mut delta_a = 0i64;
        for mv in outcome.moves.iter().filter(|m| m.topic == "a") {
            delta_a += mv.direction.delta();
            assert!(delta_a >= 0, "subtração levou 'a' abaixo de zero (λ={})", lambda);
        }

        assert!(outcome.perturbation.get("a").unwrap() >= 0);
        let perturbed = outcome.perturbed_history(user.history()).unwrap();
        assert_eq!(perturbed.get("a").unwrap() as i64, outcome.perturbation.get("a").unwrap());
    }
}

#[test]
fn test_zero_count_topic_gains_visits() {
    let user = UserProfile::new("u", TopicFrequency::from([("a", 0), ("b", 5)]));
    let config = OptimizerConfig::new(1.0, 0.1).unwrap();

    let outcome = select_topics(&user, &config).unwrap();
    assert!(outcome.perturbation.get("a").unwrap() > 0);
    assert!(outcome.privacy > 0.0);
}

#[test]
fn test_lambda_sweep_tradeoff() {
    let lambdas = [0.0, 0.1, 0.25, 0.5, 1.0, 2.0, 5.0, 10.0];
    let report = lambda_sweep(&sports_news(), &lambdas, 0.1, DEFAULT_MAX_ITERATIONS).unwrap();

    let privacy = report.privacy_series();
    let first = privacy[0];
    let last = privacy[privacy.len() - 1];
    assert!(last > first);

    // Propriedade estatística: a maioria dos passos respeita o trade-off
    assert!(report.tradeoff_violations() <= lambdas.len() / 4);
}

#[test]
fn test_dataset_to_sweeps() {
    let content = "\
Lambda: 0, 1, 10
Epsilon: 0.1
User50: sports 40, news 10, art 0
User25: sports 15, news 10
User25: sports 5, news 5, art 15
";
    let dataset = Dataset::parse(content).unwrap();
    let target = dataset.target("User50").unwrap();

    let lambda_report = lambda_sweep(target, &dataset.lambdas, dataset.epsilon, DEFAULT_MAX_ITERATIONS).unwrap();
    assert_eq!(lambda_report.len(), 3);

    assert!(dataset.contains_lambda(10.0));
    let population = population_sweep(dataset.users_named("User25"), 10.0, dataset.epsilon, DEFAULT_MAX_ITERATIONS).unwrap();
    assert_eq!(population.len(), 2);
    assert!(population.points.iter().all(|p| p.utility <= 1.0 && p.utility >= 0.0));
}

#[test]
fn test_outcome_serializes() {
    let config = OptimizerConfig::new(0.5, 0.1).unwrap();
    let outcome = select_topics(&sports_news(), &config).unwrap();

    let json = serde_json::to_string(&outcome).unwrap();
    let back: SelectionOutcome = serde_json::from_str(&json).unwrap();
    assert_eq!(back.perturbation, outcome.perturbation);
    assert!(json.contains("\"news\""));
}

#[test]
fn test_types_are_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<UserProfile>();
    assert_send_sync::<OptimizerConfig>();
    assert_send_sync::<BoostError>();
    assert_send_sync::<SelectionOutcome>();
}
