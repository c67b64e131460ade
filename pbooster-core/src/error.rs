//! Erros do núcleo de anonimização

use thiserror::Error;

/// Resultado de operações do PBooster
pub type BoostResult<T> = Result<T, BoostError>;

/// Erros de métricas, objetivo, busca local e leitura de dados
#[derive(Debug, Error)]
pub enum BoostError {
    /// Mapa de frequências vazio, chaves divergentes ou parâmetro inválido
    #[error("Entrada inválida: {0}")]
    InvalidInput(String),

    /// Histórico de tamanho zero ou vetor de probabilidades com norma zero
    #[error("Divisão por zero: {0}")]
    DivisionByZero(String),

    /// Limite de iterações da busca local excedido
    #[error("Busca local não convergiu após {iterations} iterações")]
    NonTerminating { iterations: usize },

    /// Linha malformada no arquivo de dados
    #[error("Erro no dataset (linha {line}): {reason}")]
    Dataset { line: usize, reason: String },

    /// Erro de I/O
    #[error("Erro de I/O: {0}")]
    IoError(#[from] std::io::Error),

    /// Erro de serialização de relatórios
    #[error("Erro de serialização: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BoostError {
    /// Atalho para `InvalidInput`
    pub fn invalid(message: impl Into<String>) -> Self {
        BoostError::InvalidInput(message.into())
    }

    /// Atalho para `Dataset`
    pub fn dataset(line: usize, reason: impl Into<String>) -> Self {
        BoostError::Dataset { line, reason: reason.into() }
    }

    /// Indica se o erro vem de dados malformados (e não de I/O)
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            BoostError::InvalidInput(_) | BoostError::DivisionByZero(_) | BoostError::Dataset { .. }
        )
    }
}
