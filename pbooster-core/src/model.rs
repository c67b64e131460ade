//! Tipos de dados: histórico de tópicos, perfil, perturbação e configuração
//!
//! Todos os mapas usam `BTreeMap`, de modo que a ordem de enumeração dos
//! tópicos é sempre a ordem lexicográfica das chaves. Métricas que comparam
//! vetores posicionalmente dependem disso.

use crate::constants::DEFAULT_MAX_ITERATIONS;
use crate::error::{BoostError, BoostResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Frequência de visitas por tópico (histórico de navegação)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicFrequency {
    counts: BTreeMap<String, u64>,
}

impl TopicFrequency {
    /// Cria histórico vazio
    pub fn new() -> Self {
        Self::default()
    }

    /// Adiciona tópico (builder)
    pub fn with_topic(mut self, topic: impl Into<String>, count: u64) -> Self {
        self.counts.insert(topic.into(), count);
        self
    }

    /// Define contagem de um tópico, retornando a anterior
    pub fn insert(&mut self, topic: impl Into<String>, count: u64) -> Option<u64> {
        self.counts.insert(topic.into(), count)
    }

    /// Contagem de um tópico
    pub fn get(&self, topic: &str) -> Option<u64> {
        self.counts.get(topic).copied()
    }

    /// Número de tópicos
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Verifica se não há tópicos
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Tópicos em ordem canônica
    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    /// Pares (tópico, contagem) em ordem canônica
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(t, c)| (t.as_str(), *c))
    }

    /// Verifica se ambos os históricos têm exatamente o mesmo conjunto de tópicos
    pub fn same_topics(&self, other: &TopicFrequency) -> bool {
        self.counts.len() == other.counts.len()
            && self.counts.keys().zip(other.counts.keys()).all(|(a, b)| a == b)
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for TopicFrequency {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().map(|(t, c)| (t.into(), c)).collect(),
        }
    }
}

impl<const N: usize> From<[(&str, u64); N]> for TopicFrequency {
    fn from(pairs: [(&str, u64); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl fmt::Display for TopicFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(t, c)| format!("{} {}", t, c)).collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// Distribuição de probabilidade por tópico (transiente, nunca persistida)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TopicProbability {
    probabilities: BTreeMap<String, f64>,
}

impl TopicProbability {
    pub(crate) fn from_map(probabilities: BTreeMap<String, f64>) -> Self {
        Self { probabilities }
    }

    /// Probabilidade de um tópico
    pub fn get(&self, topic: &str) -> Option<f64> {
        self.probabilities.get(topic).copied()
    }

    /// Probabilidades em ordem canônica
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.probabilities.values().copied()
    }

    /// Pares (tópico, probabilidade) em ordem canônica
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.probabilities.iter().map(|(t, p)| (t.as_str(), *p))
    }

    /// Número de tópicos
    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// Soma das probabilidades (1.0 a menos de arredondamento)
    pub fn total(&self) -> f64 {
        self.values().sum()
    }
}

/// Perfil de usuário: nome + histórico observado
///
/// Imutável após construção. Nomes não são únicos: o dataset usa o nome
/// como rótulo de grupo (ex.: todos os usuários com 25 visitas são `User25`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    name: String,
    history: TopicFrequency,
}

impl UserProfile {
    /// Cria perfil
    pub fn new(name: impl Into<String>, history: TopicFrequency) -> Self {
        Self {
            name: name.into(),
            history,
        }
    }

    /// Nome do usuário
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Histórico de navegação
    pub fn history(&self) -> &TopicFrequency {
        &self.history
    }
}

/// Vetor de perturbação: quantidade a adicionar em cada tópico
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Perturbation {
    deltas: BTreeMap<String, i64>,
}

impl Perturbation {
    /// Vetor nulo com as mesmas chaves do histórico
    pub fn zeros(freq: &TopicFrequency) -> Self {
        Self {
            deltas: freq.topics().map(|t| (t.to_string(), 0)).collect(),
        }
    }

    /// Delta de um tópico
    pub fn get(&self, topic: &str) -> Option<i64> {
        self.deltas.get(topic).copied()
    }

    /// Pares (tópico, delta) em ordem canônica
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.deltas.iter().map(|(t, d)| (t.as_str(), *d))
    }

    /// Tópicos em ordem canônica
    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.deltas.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.deltas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    /// Verifica se todos os deltas são zero
    pub fn is_zero(&self) -> bool {
        self.deltas.values().all(|d| *d == 0)
    }

    /// Soma dos deltas (visitas sintéticas líquidas)
    pub fn net_visits(&self) -> i64 {
        self.deltas.values().sum()
    }

    /// Cópia com `delta` somado ao tópico
    pub fn adjusted(&self, topic: &str, delta: i64) -> Self {
        let mut next = self.clone();
        if let Some(value) = next.deltas.get_mut(topic) {
            *value += delta;
        }
        next
    }

    /// Aplica a perturbação ao histórico: `freq[t] + self[t]`
    ///
    /// Falha com `InvalidInput` se as chaves divergem, se alguma contagem
    /// resultante ficaria negativa ou se sai da faixa de `i64`.
    pub fn apply(&self, freq: &TopicFrequency) -> BoostResult<TopicFrequency> {
        if freq.len() != self.deltas.len() {
            return Err(BoostError::invalid(format!(
                "perturbação com {} tópicos para histórico com {}",
                self.deltas.len(),
                freq.len()
            )));
        }

        let mut perturbed = TopicFrequency::new();
        for (topic, count) in freq.iter() {
            let delta = self.get(topic).ok_or_else(|| {
                BoostError::invalid(format!("tópico '{}' ausente na perturbação", topic))
            })?;
            let adjusted = i64::try_from(count)
                .ok()
                .and_then(|c| c.checked_add(delta))
                .ok_or_else(|| {
                    BoostError::invalid(format!(
                        "contagem de '{}' fora da faixa de i64 ({} + {})",
                        topic, count, delta
                    ))
                })?;
            let adjusted = u64::try_from(adjusted).map_err(|_| {
                BoostError::invalid(format!(
                    "contagem de '{}' ficaria negativa ({} + {})",
                    topic, count, delta
                ))
            })?;
            perturbed.insert(topic, adjusted);
        }

        Ok(perturbed)
    }
}

impl fmt::Display for Perturbation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(t, d)| format!("{} {:+}", t, d)).collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// Configuração de uma execução do otimizador
///
/// Criada uma vez por valor de lambda e passada explicitamente a toda
/// função que precisa dela.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Peso da privacidade no objetivo (>= 0)
    pub lambda_param: f64,
    /// Tolerância de convergência (> 0)
    pub epsilon: f64,
    /// Máximo de passadas da busca local
    pub max_iterations: usize,
}

impl OptimizerConfig {
    /// Cria configuração validada
    pub fn new(lambda_param: f64, epsilon: f64) -> BoostResult<Self> {
        let config = Self {
            lambda_param,
            epsilon,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        };
        config.validate()?;
        Ok(config)
    }

    /// Define limite de passadas
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Valida parâmetros
    pub fn validate(&self) -> BoostResult<()> {
        if !self.lambda_param.is_finite() || self.lambda_param < 0.0 {
            return Err(BoostError::invalid(format!(
                "lambda deve ser finito e >= 0, recebido {}",
                self.lambda_param
            )));
        }
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(BoostError::invalid(format!(
                "epsilon deve ser finito e > 0, recebido {}",
                self.epsilon
            )));
        }
        if self.max_iterations == 0 {
            return Err(BoostError::invalid("max_iterations deve ser > 0"));
        }
        Ok(())
    }

    /// Fator de aceitação `1 + epsilon / n²`
    pub fn bound_factor(&self, topics: usize) -> f64 {
        let n = topics as f64;
        1.0 + self.epsilon / (n * n)
    }
}
