//! Varreduras de parâmetros
//!
//! - **Varredura de lambda**: um perfil, uma execução por valor de lambda.
//! - **Varredura de população**: vários perfis, um único lambda.
//!
//! As execuções são independentes: cada uma recebe sua própria
//! `OptimizerConfig` e sua própria perturbação.

use crate::error::BoostResult;
use crate::model::{OptimizerConfig, Perturbation, UserProfile};
use crate::optimizer::TopicSelector;
use serde::{Deserialize, Serialize};

/// Um ponto da varredura
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    /// Nome do usuário
    pub user: String,
    /// Lambda usado
    pub lambda: f64,
    /// Privacidade alcançada
    pub privacy: f64,
    /// Utilidade (`1 − utility_loss`)
    pub utility: f64,
    /// Perda de utilidade
    pub utility_loss: f64,
    /// Perturbação encontrada
    pub perturbation: Perturbation,
    /// Passadas da busca local
    pub iterations: usize,
}

/// Resultado de uma varredura
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    /// Pontos, na ordem de execução
    pub points: Vec<SweepPoint>,
}

impl SweepReport {
    /// Série de privacidade
    pub fn privacy_series(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.privacy).collect()
    }

    /// Série de utilidade
    pub fn utility_series(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.utility).collect()
    }

    /// Série de lambdas
    pub fn lambda_series(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.lambda).collect()
    }

    /// Passos consecutivos (em lambda crescente) onde privacidade ou perda
    /// de utilidade diminuem
    pub fn tradeoff_violations(&self) -> usize {
        let mut ordered: Vec<&SweepPoint> = self.points.iter().collect();
        ordered.sort_by(|a, b| a.lambda.total_cmp(&b.lambda));

        ordered
            .windows(2)
            .filter(|w| {
                w[1].privacy + f64::EPSILON < w[0].privacy
                    || w[1].utility_loss + f64::EPSILON < w[0].utility_loss
            })
            .count()
    }

    /// Serializa o relatório em JSON
    pub fn to_json(&self) -> BoostResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

fn run_point(profile: &UserProfile, config: OptimizerConfig) -> BoostResult<SweepPoint> {
    let outcome = TopicSelector::new(config).select(profile)?;
    Ok(SweepPoint {
        user: profile.name().to_string(),
        lambda: config.lambda_param,
        privacy: outcome.privacy,
        utility: outcome.utility(),
        utility_loss: outcome.utility_loss,
        perturbation: outcome.perturbation,
        iterations: outcome.iterations,
    })
}

/// Varre valores de lambda para um perfil
pub fn lambda_sweep(
    profile: &UserProfile,
    lambdas: &[f64],
    epsilon: f64,
    max_iterations: usize,
) -> BoostResult<SweepReport> {
    let points = lambdas
        .iter()
        .map(|&lambda| {
            let config = OptimizerConfig::new(lambda, epsilon)?.with_max_iterations(max_iterations);
            run_point(profile, config)
        })
        .collect::<BoostResult<Vec<_>>>()?;

    Ok(SweepReport { points })
}

/// Executa todos os perfis com um único lambda
pub fn population_sweep<'a>(
    profiles: impl IntoIterator<Item = &'a UserProfile>,
    lambda: f64,
    epsilon: f64,
    max_iterations: usize,
) -> BoostResult<SweepReport> {
    let config = OptimizerConfig::new(lambda, epsilon)?.with_max_iterations(max_iterations);
    let points = profiles
        .into_iter()
        .map(|profile| run_point(profile, config))
        .collect::<BoostResult<Vec<_>>>()?;

    Ok(SweepReport { points })
}
