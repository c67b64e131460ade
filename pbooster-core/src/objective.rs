//! Função objetivo G
//!
//! `G(c, a) = λ · privacy(c + a) − utility_loss(c, c + a)`
//!
//! Não é monótona nem côncava; só precisa ser avaliável em vetores que
//! mantêm todas as contagens não-negativas.

use crate::error::BoostResult;
use crate::metrics::{privacy, utility_loss};
use crate::model::{OptimizerConfig, Perturbation, TopicFrequency};
use serde::{Deserialize, Serialize};

/// Valor de G com seus componentes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveValue {
    /// `λ · privacy − utility_loss`
    pub value: f64,
    /// Privacidade do histórico perturbado
    pub privacy: f64,
    /// Perda de utilidade em relação ao original
    pub utility_loss: f64,
}

impl ObjectiveValue {
    /// Utilidade (`1 − utility_loss`)
    pub fn utility(&self) -> f64 {
        1.0 - self.utility_loss
    }
}

/// Avalia G com decomposição em privacidade e perda de utilidade
pub fn evaluate(
    original: &TopicFrequency,
    perturbation: &Perturbation,
    config: &OptimizerConfig,
) -> BoostResult<ObjectiveValue> {
    let perturbed = perturbation.apply(original)?;

    let privacy_score = privacy(&perturbed)?;
    let loss_score = utility_loss(original, &perturbed)?;

    Ok(ObjectiveValue {
        value: config.lambda_param * privacy_score - loss_score,
        privacy: privacy_score,
        utility_loss: loss_score,
    })
}

/// Avalia G (apenas o escalar)
pub fn objective(
    original: &TopicFrequency,
    perturbation: &Perturbation,
    config: &OptimizerConfig,
) -> BoostResult<f64> {
    evaluate(original, perturbation, config).map(|v| v.value)
}
