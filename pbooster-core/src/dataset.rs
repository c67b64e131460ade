//! Leitura do dataset de históricos
//!
//! Formato de texto orientado a linhas:
//!
//! ```text
//! # comentário
//! Lambda: 0, 0.5, 1, 10
//! Epsilon: 0.1
//! User50: sports 40, news 10
//! ```
//!
//! Linhas em branco e linhas não reconhecidas são ignoradas.

use crate::error::{BoostError, BoostResult};
use crate::model::{TopicFrequency, UserProfile};
use serde::{Deserialize, Serialize};
use std::path::Path;

const LAMBDA_PREFIX: &str = "Lambda";
const EPSILON_PREFIX: &str = "Epsilon";
const USER_PREFIX: &str = "User";

/// Conteúdo de um arquivo de dados
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Valores de lambda a varrer, na ordem do arquivo
    pub lambdas: Vec<f64>,
    /// Tolerância de convergência
    pub epsilon: f64,
    /// Perfis, na ordem do arquivo
    pub users: Vec<UserProfile>,
}

impl Dataset {
    /// Lê dataset de um arquivo
    pub fn from_path(path: impl AsRef<Path>) -> BoostResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Interpreta o conteúdo textual do dataset
    pub fn parse(content: &str) -> BoostResult<Self> {
        let mut lambdas = None;
        let mut epsilon = None;
        let mut users = Vec::new();

        for (index, raw) in content.lines().enumerate() {
            let line_no = index + 1;
            let line = raw.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if line.starts_with(LAMBDA_PREFIX) {
                let value = field_value(line, line_no)?;
                lambdas = Some(parse_lambdas(value, line_no)?);
            } else if line.starts_with(EPSILON_PREFIX) {
                let value = field_value(line, line_no)?;
                epsilon = Some(parse_float(value, line_no, "epsilon")?);
            } else if line.starts_with(USER_PREFIX) {
                users.push(parse_user(line, line_no)?);
            }
        }

        let lambdas = lambdas.ok_or_else(|| BoostError::dataset(0, "linha 'Lambda' ausente"))?;
        let epsilon = epsilon.ok_or_else(|| BoostError::dataset(0, "linha 'Epsilon' ausente"))?;

        tracing::debug!(
            "Dataset lido: {} usuários, {} valores de lambda, ε={}",
            users.len(),
            lambdas.len(),
            epsilon
        );

        Ok(Self { lambdas, epsilon, users })
    }

    /// Todos os perfis com o nome dado
    pub fn users_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a UserProfile> + 'a {
        self.users.iter().filter(move |u| u.name() == name)
    }

    /// Perfil-alvo: o último com o nome dado
    pub fn target(&self, name: &str) -> Option<&UserProfile> {
        self.users.iter().rev().find(|u| u.name() == name)
    }

    /// Verifica se o lambda está entre os valores do arquivo
    pub fn contains_lambda(&self, lambda: f64) -> bool {
        self.lambdas.iter().any(|l| (l - lambda).abs() < f64::EPSILON)
    }

    /// Nomes distintos, na ordem da primeira ocorrência
    pub fn user_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for user in &self.users {
            if !names.contains(&user.name()) {
                names.push(user.name());
            }
        }
        names
    }
}

fn field_value(line: &str, line_no: usize) -> BoostResult<&str> {
    line.split_once(':')
        .map(|(_, value)| value.trim())
        .ok_or_else(|| BoostError::dataset(line_no, "separador ':' ausente"))
}

fn parse_float(value: &str, line_no: usize, what: &str) -> BoostResult<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|e| BoostError::dataset(line_no, format!("{} inválido '{}': {}", what, value, e)))
}

fn parse_lambdas(value: &str, line_no: usize) -> BoostResult<Vec<f64>> {
    let lambdas = value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| parse_float(s, line_no, "lambda"))
        .collect::<BoostResult<Vec<f64>>>()?;

    if lambdas.is_empty() {
        return Err(BoostError::dataset(line_no, "nenhum valor de lambda"));
    }
    Ok(lambdas)
}

fn parse_user(line: &str, line_no: usize) -> BoostResult<UserProfile> {
    let (name, topics) = line
        .split_once(':')
        .ok_or_else(|| BoostError::dataset(line_no, "separador ':' ausente"))?;

    let mut history = TopicFrequency::new();
    for entry in topics.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (topic, count) = entry
            .rsplit_once(char::is_whitespace)
            .ok_or_else(|| BoostError::dataset(line_no, format!("entrada sem contagem: '{}'", entry)))?;
        let count = count.trim().parse::<u64>().map_err(|e| {
            BoostError::dataset(line_no, format!("contagem inválida para '{}': {}", topic.trim(), e))
        })?;
        if history.insert(topic.trim(), count).is_some() {
            return Err(BoostError::dataset(line_no, format!("tópico repetido: '{}'", topic.trim())));
        }
    }

    if history.is_empty() {
        return Err(BoostError::dataset(line_no, format!("usuário '{}' sem tópicos", name.trim())));
    }

    Ok(UserProfile::new(name.trim(), history))
}
