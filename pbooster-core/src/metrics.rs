//! Métricas de privacidade e perda de utilidade
//!
//! Funções puras sobre `TopicFrequency`:
//!
//! | Função              | Resultado                                  | Faixa            |
//! |---------------------|--------------------------------------------|------------------|
//! | `history_size`      | soma das contagens                         | `>= 0`           |
//! | `topic_probability` | `count / history_size` por tópico          | `[0, 1]`         |
//! | `privacy`           | entropia de Shannon (base 10)              | `[0, log10(n)]`  |
//! | `utility_loss`      | `0.5 * (1 - cos)` entre distribuições      | `[0, 1]`         |

use crate::error::{BoostError, BoostResult};
use crate::model::{TopicFrequency, TopicProbability};

/// Tamanho do histórico (soma das contagens)
pub fn history_size(freq: &TopicFrequency) -> BoostResult<u64> {
    if freq.is_empty() {
        return Err(BoostError::invalid("histórico sem tópicos"));
    }
    freq.iter()
        .try_fold(0u64, |total, (_, count)| total.checked_add(count))
        .ok_or_else(|| BoostError::invalid("tamanho do histórico excede u64"))
}

/// Probabilidade de cada tópico no histórico
pub fn topic_probability(freq: &TopicFrequency) -> BoostResult<TopicProbability> {
    let size = history_size(freq)?;
    if size == 0 {
        return Err(BoostError::DivisionByZero("histórico de tamanho zero".to_string()));
    }

    let total = size as f64;
    let probabilities = freq
        .iter()
        .map(|(topic, count)| (topic.to_string(), count as f64 / total))
        .collect();

    Ok(TopicProbability::from_map(probabilities))
}

/// Privacidade: entropia de Shannon em base 10
///
/// Tópicos com probabilidade zero contribuem 0.
pub fn privacy(freq: &TopicFrequency) -> BoostResult<f64> {
    let probability = topic_probability(freq)?;
    Ok(entropy_base10(probability.values()))
}

/// Perda de utilidade: distância cosseno (escalada para `[0, 1]`)
///
/// Ambos os históricos precisam ter o mesmo conjunto de tópicos; os vetores
/// são comparados na ordem canônica das chaves.
pub fn utility_loss(freq_old: &TopicFrequency, freq_new: &TopicFrequency) -> BoostResult<f64> {
    if !freq_old.same_topics(freq_new) {
        return Err(BoostError::invalid(
            "históricos com conjuntos de tópicos diferentes",
        ));
    }

    let p_old: Vec<f64> = topic_probability(freq_old)?.values().collect();
    let p_new: Vec<f64> = topic_probability(freq_new)?.values().collect();

    let cos = cosine_similarity(&p_old, &p_new)?;
    Ok(0.5 * (1.0 - cos))
}

fn entropy_base10(probabilities: impl Iterator<Item = f64>) -> f64 {
    let h: f64 = probabilities
        .filter(|p| *p > 0.0)
        .map(|p| -p * p.log10())
        .sum();
    // -0.0 quando há um único tópico
    h.max(0.0)
}

fn cosine_similarity(a: &[f64], b: &[f64]) -> BoostResult<f64> {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Err(BoostError::DivisionByZero(
            "vetor de probabilidades com norma zero".to_string(),
        ));
    }

    Ok((dot / (norm_a * norm_b)).clamp(-1.0, 1.0))
}
