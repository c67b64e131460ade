//! # 🛡️ PBooster — Anonimização de Históricos de Navegação
//!
//! Adiciona e remove visitas sintéticas ao histórico de tópicos de um
//! usuário de forma que a distribuição resultante seja menos identificável
//! (maior entropia) sem se afastar demais da original (utilidade).
//!
//! ## Arquitetura
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        PBOOSTER CORE                            │
//! │  ┌─────────────────────────────────────────────────────────────┐│
//! │  │  TopicSelector (busca local, limite 1 + ε/n²)               ││
//! │  └──────────────────────────────┬──────────────────────────────┘│
//! │                                 ▼                               │
//! │  ┌─────────────────────────────────────────────────────────────┐│
//! │  │  objective: G = λ · privacy − utility_loss                  ││
//! │  └──────────────────────────────┬──────────────────────────────┘│
//! │                                 ▼                               │
//! │  ┌──────────────┐  ┌───────────────────┐  ┌──────────────────┐  │
//! │  │ history_size │  │ topic_probability │  │ privacy / loss   │  │
//! │  └──────────────┘  └───────────────────┘  └──────────────────┘  │
//! │                                 │                               │
//! │                                 ▼                               │
//! │  TopicFrequency | Perturbation | UserProfile | OptimizerConfig  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Uso
//!
//! ```
//! use pbooster_core::{OptimizerConfig, TopicFrequency, UserProfile, select_topics};
//!
//! let user = UserProfile::new("User50", TopicFrequency::from([("sports", 40), ("news", 10)]));
//! let config = OptimizerConfig::new(0.5, 0.1)?;
//!
//! let outcome = select_topics(&user, &config)?;
//! println!("Perturbação: {}", outcome.perturbation);
//! println!("Privacidade: {:.4}  Utilidade: {:.4}", outcome.privacy, outcome.utility());
//! # Ok::<(), pbooster_core::BoostError>(())
//! ```

pub mod error;
pub mod model;
pub mod metrics;
pub mod objective;
pub mod optimizer;
pub mod dataset;
pub mod sweep;

// Re-exports
pub use error::{BoostError, BoostResult};
pub use model::{OptimizerConfig, Perturbation, TopicFrequency, TopicProbability, UserProfile};
pub use metrics::{history_size, privacy, topic_probability, utility_loss};
pub use objective::{evaluate, objective, ObjectiveValue};
pub use optimizer::{select_topics, Move, MoveDirection, SelectionOutcome, TopicSelector};
pub use dataset::Dataset;
pub use sweep::{lambda_sweep, population_sweep, SweepPoint, SweepReport};

/// Valores padrão
pub mod constants {
    /// Máximo de passadas da busca local antes de `NonTerminating`
    pub const DEFAULT_MAX_ITERATIONS: usize = 100_000;

    /// Tolerância de convergência padrão
    pub const DEFAULT_EPSILON: f64 = 0.1;

    /// Lambda do experimento de população
    pub const DEFAULT_POPULATION_LAMBDA: f64 = 10.0;

    /// Usuário-alvo da varredura de lambda
    pub const DEFAULT_TARGET_USER: &str = "User50";

    /// Grupo de usuários da varredura de população
    pub const DEFAULT_POPULATION_USER: &str = "User25";
}

#[cfg(test)]
mod tests;
