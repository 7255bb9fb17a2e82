//! Tipos de erro do metalca.
//!
//! O calculador de scores e o cache nunca falham; erros existem apenas
//! nas bordas (configuração, IO, JSON, preditor, servidor).

use thiserror::Error;

/// Tipo de resultado padrão do metalca.
pub type MetalcaResult<T> = Result<T, MetalcaError>;

/// Erros possíveis no metalca.
#[derive(Error, Debug)]
pub enum MetalcaError {
    #[error("Erro de configuração: {0}")]
    Config(String),

    #[error("Erro de IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("Erro ao parsear TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Erro ao serializar TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Erro de JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Entrada inválida: {0}")]
    InvalidInput(String),

    #[error("Preditor '{0}' falhou: {1}")]
    PredictorFailed(String, String),

    #[error("Timeout ao executar preditor '{0}'")]
    PredictorTimeout(String),

    #[error("Erro de runtime: {0}")]
    Runtime(String),

    #[error("Erro no servidor MCP: {0}")]
    McpServer(String),

    #[error("Não autorizado: {0}")]
    Unauthorized(String),

    #[error("{0}")]
    Other(String),
}

impl MetalcaError {
    /// Cria um erro genérico.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Self::Other(msg.into())
    }

    /// Cria um erro de configuração.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Cria um erro de entrada inválida.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }
}
