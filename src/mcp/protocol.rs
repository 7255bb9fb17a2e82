//! Tipos do protocolo de ferramentas (JSON-RPC 2.0).
//!
//! Cobre apenas o que o servidor do metalca usa: requests, responses,
//! erros padrão e os tipos de initialize/tools.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ═══════════════════════════════════════════════════════════════════════════
// Códigos de erro JSON-RPC padrão
// ═══════════════════════════════════════════════════════════════════════════

/// Erro de parse - JSON inválido.
pub const PARSE_ERROR: i32 = -32700;

/// Request inválida - JSON-RPC malformado.
pub const INVALID_REQUEST: i32 = -32600;

/// Método não encontrado.
pub const METHOD_NOT_FOUND: i32 = -32601;

/// Parâmetros inválidos.
pub const INVALID_PARAMS: i32 = -32602;

/// Erro interno do servidor.
pub const INTERNAL_ERROR: i32 = -32603;

/// Versão do protocolo anunciada no initialize.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

// ═══════════════════════════════════════════════════════════════════════════
// Tipos básicos JSON-RPC
// ═══════════════════════════════════════════════════════════════════════════

/// ID de uma request JSON-RPC (número ou string).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum JsonRpcId {
    Number(i64),
    String(String),
}

impl From<i64> for JsonRpcId {
    fn from(n: i64) -> Self {
        JsonRpcId::Number(n)
    }
}

impl From<&str> for JsonRpcId {
    fn from(s: &str) -> Self {
        JsonRpcId::String(s.to_string())
    }
}

/// Request JSON-RPC 2.0. Sem `id` é uma notificação.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// Versão do protocolo ("2.0").
    pub jsonrpc: String,

    /// ID da request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<JsonRpcId>,

    /// Método chamado.
    pub method: String,

    /// Parâmetros.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Cria uma request.
    pub fn new(method: impl Into<String>, id: Option<JsonRpcId>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            method: method.into(),
            params: None,
        }
    }

    /// Adiciona parâmetros.
    #[must_use]
    pub fn with_params(mut self, params: Value) -> Self {
        self.params = Some(params);
        self
    }

    /// Verifica se é uma notificação (sem ID).
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// Response JSON-RPC 2.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// Versão do protocolo ("2.0").
    pub jsonrpc: String,

    /// ID da request original (`null` quando a request não pôde ser lida).
    pub id: Option<JsonRpcId>,

    /// Resultado em caso de sucesso.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    /// Erro em caso de falha.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Response de sucesso.
    pub fn success(id: Option<JsonRpcId>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Response de erro.
    pub fn error(id: Option<JsonRpcId>, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }

    /// Verifica se a response é um erro.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Erro JSON-RPC.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Código do erro.
    pub code: i32,

    /// Mensagem.
    pub message: String,
}

impl JsonRpcError {
    /// Cria um erro.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Erro de parse.
    pub fn parse_error(detail: impl std::fmt::Display) -> Self {
        Self::new(PARSE_ERROR, format!("Parse error: {}", detail))
    }

    /// Request inválida.
    pub fn invalid_request(detail: impl std::fmt::Display) -> Self {
        Self::new(INVALID_REQUEST, format!("Invalid Request: {}", detail))
    }

    /// Método não encontrado.
    pub fn method_not_found(method: &str) -> Self {
        Self::new(METHOD_NOT_FOUND, format!("Method not found: {}", method))
    }

    /// Parâmetros inválidos.
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(INVALID_PARAMS, message)
    }

    /// Erro interno.
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(INTERNAL_ERROR, message)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Initialize e tools
// ═══════════════════════════════════════════════════════════════════════════

/// Informações do servidor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Nome do servidor.
    pub name: String,

    /// Versão do servidor.
    pub version: String,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            name: "metalca".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Capacidades do servidor.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServerCapabilities {
    /// Capacidades de ferramentas.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolsCapability>,
}

/// Capacidade de ferramentas.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ToolsCapability {
    /// A lista de ferramentas pode mudar em tempo de execução.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_changed: Option<bool>,
}

/// Resultado do initialize.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    /// Versão do protocolo suportada.
    pub protocol_version: String,

    /// Capacidades do servidor.
    pub capabilities: ServerCapabilities,

    /// Informações do servidor.
    pub server_info: ServerInfo,
}

impl Default for InitializeResult {
    fn default() -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
            },
            server_info: ServerInfo::default(),
        }
    }
}

/// Descrição de uma ferramenta.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescription {
    /// Nome da ferramenta.
    pub name: String,

    /// Descrição.
    pub description: String,

    /// Schema de entrada (JSON Schema).
    pub input_schema: Value,
}

impl ToolDescription {
    /// Cria uma descrição de ferramenta.
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

/// Resultado de tools/list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListToolsResult {
    /// Ferramentas disponíveis.
    pub tools: Vec<ToolDescription>,
}

/// Parâmetros de tools/call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallToolParams {
    /// Nome da ferramenta.
    pub name: String,

    /// Argumentos da ferramenta.
    #[serde(default)]
    pub arguments: Value,
}

/// Conteúdo retornado por uma ferramenta.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    /// Texto (JSON formatado, no caso das ferramentas LCA).
    Text { text: String },
}

impl ToolContent {
    /// Cria conteúdo de texto.
    pub fn text(text: impl Into<String>) -> Self {
        ToolContent::Text { text: text.into() }
    }

    /// Texto do conteúdo.
    pub fn as_text(&self) -> &str {
        match self {
            ToolContent::Text { text } => text,
        }
    }
}

/// Resultado de uma chamada de ferramenta.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    /// Conteúdo retornado.
    pub content: Vec<ToolContent>,

    /// Se a chamada resultou em erro.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ToolResult {
    /// Sucesso com um valor serializável, como JSON formatado.
    pub fn success_json<T: Serialize>(value: &T) -> Self {
        match serde_json::to_string_pretty(value) {
            Ok(text) => Self {
                content: vec![ToolContent::text(text)],
                is_error: false,
            },
            Err(e) => Self::error(format!("Failed to serialize result: {}", e)),
        }
    }

    /// Resultado de erro.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::text(message)],
            is_error: true,
        }
    }

    /// Texto do primeiro bloco de conteúdo.
    pub fn text(&self) -> &str {
        self.content.first().map(ToolContent::as_text).unwrap_or_default()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Testes
// ═══════════════════════════════════════════════════════════════════════════
