//! Busca local para maximização de G
//!
//! Hill-climbing guloso de coordenada única sobre vetores inteiros de
//! perturbação, com aceitação do primeiro movimento que melhora e limite de
//! aceitação multiplicativo:
//!
//! ```text
//! bound = 1 + ε / n²
//! aceita candidato se G(candidato) > bound · melhor
//! ```
//!
//! Cada passada tenta primeiro `+1` em cada tópico (ordem canônica); se nada
//! for aceito, tenta `-1` nos tópicos cuja perturbação ainda é positiva.
//! Qualquer movimento aceito reinicia a passada pela fase de adição. A busca
//! termina quando uma passada completa (adição + subtração) não aceita nada.
//!
//! Quando `melhor <= 0` o limite deixa de ser "apertado": qualquer
//! candidato estritamente positivo é aceito.

use crate::error::{BoostError, BoostResult};
use crate::model::{OptimizerConfig, Perturbation, TopicFrequency, UserProfile};
use crate::objective::{evaluate, objective};
use serde::{Deserialize, Serialize};

/// Direção de um movimento
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveDirection {
    /// Adiciona uma visita sintética
    Add,
    /// Remove uma visita sintética
    Subtract,
}

impl MoveDirection {
    /// Delta aplicado ao tópico
    pub fn delta(&self) -> i64 {
        match self {
            MoveDirection::Add => 1,
            MoveDirection::Subtract => -1,
        }
    }
}

/// Movimento aceito pela busca
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Move {
    /// Tópico alterado
    pub topic: String,
    /// Direção
    pub direction: MoveDirection,
    /// Valor de G após o movimento
    pub value: f64,
}

/// Resultado de uma execução da busca local
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionOutcome {
    /// Perturbação final
    pub perturbation: Perturbation,
    /// Privacidade do histórico perturbado
    pub privacy: f64,
    /// Perda de utilidade do histórico perturbado
    pub utility_loss: f64,
    /// G no vetor nulo
    pub initial_objective: f64,
    /// G final
    pub objective: f64,
    /// Passadas executadas
    pub iterations: usize,
    /// Avaliações de G
    pub evaluations: usize,
    /// Movimentos aceitos, em ordem
    pub moves: Vec<Move>,
}

impl SelectionOutcome {
    /// Utilidade (`1 − utility_loss`)
    pub fn utility(&self) -> f64 {
        1.0 - self.utility_loss
    }

    /// Histórico perturbado
    pub fn perturbed_history(&self, original: &TopicFrequency) -> BoostResult<TopicFrequency> {
        self.perturbation.apply(original)
    }
}

/// Estado mutável de uma execução
struct SearchState {
    perturbation: Perturbation,
    best_value: f64,
    evaluations: usize,
    moves: Vec<Move>,
}

/// Otimizador de seleção de tópicos
#[derive(Debug, Clone)]
pub struct TopicSelector {
    config: OptimizerConfig,
}

impl TopicSelector {
    /// Cria otimizador
    pub fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }

    /// Configuração em uso
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Executa a busca local sobre o histórico do perfil
    pub fn select(&self, profile: &UserProfile) -> BoostResult<SelectionOutcome> {
        self.config.validate()?;

        let history = profile.history();
        let zero = Perturbation::zeros(history);
        // Falha aqui (InvalidInput / DivisionByZero) se o histórico for inválido
        let initial_objective = objective(history, &zero, &self.config)?;

        let topics: Vec<String> = history.topics().map(str::to_string).collect();
        let bound = self.config.bound_factor(topics.len());

        let mut state = SearchState {
            perturbation: zero,
            best_value: initial_objective,
            evaluations: 1,
            moves: Vec::new(),
        };

        let mut iterations = 0;
        loop {
            if iterations >= self.config.max_iterations {
                tracing::warn!(
                    "Busca para '{}' excedeu {} iterações (λ={}, ε={})",
                    profile.name(),
                    iterations,
                    self.config.lambda_param,
                    self.config.epsilon
                );
                return Err(BoostError::NonTerminating { iterations });
            }
            iterations += 1;

            if self.scan(history, &topics, MoveDirection::Add, bound, &mut state)? {
                continue;
            }
            if self.scan(history, &topics, MoveDirection::Subtract, bound, &mut state)? {
                continue;
            }
            break;
        }

        let final_value = evaluate(history, &state.perturbation, &self.config)?;

        tracing::info!(
            "Usuário '{}' convergiu: λ={} G={:.6} privacidade={:.6} utilidade={:.6} ({} movimentos, {} avaliações)",
            profile.name(),
            self.config.lambda_param,
            state.best_value,
            final_value.privacy,
            final_value.utility(),
            state.moves.len(),
            state.evaluations
        );

        Ok(SelectionOutcome {
            perturbation: state.perturbation,
            privacy: final_value.privacy,
            utility_loss: final_value.utility_loss,
            initial_objective,
            objective: state.best_value,
            iterations,
            evaluations: state.evaluations,
            moves: state.moves,
        })
    }

    /// Varre os tópicos numa direção; aplica o primeiro candidato aceito
    fn scan(
        &self,
        history: &TopicFrequency,
        topics: &[String],
        direction: MoveDirection,
        bound: f64,
        state: &mut SearchState,
    ) -> BoostResult<bool> {
        for topic in topics {
            let current = state.perturbation.get(topic).unwrap_or(0);
            if direction == MoveDirection::Subtract && current - 1 < 0 {
                continue;
            }

            let candidate = state.perturbation.adjusted(topic, direction.delta());
            let value = objective(history, &candidate, &self.config)?;
            state.evaluations += 1;

            if value > bound * state.best_value {
                tracing::debug!(
                    "{:?} '{}': G {:.6} -> {:.6}",
                    direction,
                    topic,
                    state.best_value,
                    value
                );
                state.perturbation = candidate;
                state.best_value = value;
                state.moves.push(Move {
                    topic: topic.clone(),
                    direction,
                    value,
                });
                return Ok(true);
            }
        }

        Ok(false)
    }
}

/// Atalho: executa a busca local com a configuração dada
pub fn select_topics(profile: &UserProfile, config: &OptimizerConfig) -> BoostResult<SelectionOutcome> {
    TopicSelector::new(*config).select(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::privacy;

    fn profile(pairs: &[(&str, u64)]) -> UserProfile {
        UserProfile::new("test", pairs.iter().map(|(t, c)| (*t, *c)).collect())
    }

    #[test]
    fn test_lambda_zero_keeps_history() {
        let user = profile(&[("sports", 40), ("news", 10)]);
        let config = OptimizerConfig::new(0.0, 0.1).unwrap();

        let outcome = select_topics(&user, &config).unwrap();
        assert!(outcome.perturbation.is_zero());
        assert!(outcome.moves.is_empty());
        assert_eq!(outcome.iterations, 1);
        assert!(outcome.utility_loss.abs() < 1e-12);
    }

    #[test]
    fn test_single_topic_has_nothing_to_gain() {
        let user = profile(&[("only", 7)]);
        let config = OptimizerConfig::new(5.0, 0.1).unwrap();

        let outcome = select_topics(&user, &config).unwrap();
        assert!(outcome.perturbation.is_zero());
        assert_eq!(outcome.privacy, 0.0);
    }

    #[test]
    fn test_first_move_flattens_minority_topic() {
        let user = profile(&[("sports", 40), ("news", 10)]);
        let config = OptimizerConfig::new(0.5, 0.1).unwrap();

        let outcome = select_topics(&user, &config).unwrap();
        let first = &outcome.moves[0];
        assert_eq!(first.topic, "news");
        assert_eq!(first.direction, MoveDirection::Add);
        assert!(outcome.perturbation.get("news").unwrap() > 0);
    }

    #[test]
    fn test_accepted_values_increase() {
        let user = profile(&[("a", 20), ("b", 5), ("c", 1)]);
        let config = OptimizerConfig::new(1.0, 0.1).unwrap();

        let outcome = select_topics(&user, &config).unwrap();
        let mut previous = outcome.initial_objective;
        for mv in &outcome.moves {
            assert!(mv.value > previous);
            previous = mv.value;
        }
        assert_eq!(outcome.objective, previous);
        assert_eq!(outcome.iterations, outcome.moves.len() + 1);
    }

    #[test]
    fn test_iteration_cap() {
        let user = profile(&[("sports", 40), ("news", 10)]);
        let config = OptimizerConfig::new(0.5, 0.1).unwrap().with_max_iterations(1);

        let result = select_topics(&user, &config);
        assert!(matches!(result, Err(BoostError::NonTerminating { iterations: 1 })));
    }

    #[test]
    fn test_privacy_not_below_original() {
        let user = profile(&[("sports", 40), ("news", 10)]);
        let config = OptimizerConfig::new(0.5, 0.1).unwrap();

        let outcome = select_topics(&user, &config).unwrap();
        assert!(outcome.privacy >= privacy(user.history()).unwrap());
    }

    #[test]
    fn test_empty_history_rejected() {
        let user = UserProfile::new("empty", TopicFrequency::new());
        let config = OptimizerConfig::new(1.0, 0.1).unwrap();
        assert!(matches!(select_topics(&user, &config), Err(BoostError::InvalidInput(_))));
    }

    #[test]
    fn test_zero_history_rejected() {
        let user = profile(&[("a", 0), ("b", 0)]);
        let config = OptimizerConfig::new(1.0, 0.1).unwrap();
        assert!(matches!(select_topics(&user, &config), Err(BoostError::DivisionByZero(_))));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let user = profile(&[("a", 1), ("b", 2)]);
        let config = OptimizerConfig {
            lambda_param: 1.0,
            epsilon: -0.5,
            max_iterations: 10,
        };
        assert!(matches!(
            TopicSelector::new(config).select(&user),
            Err(BoostError::InvalidInput(_))
        ));
    }
}
