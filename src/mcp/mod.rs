//! Servidor de ferramentas LCA sobre JSON-RPC 2.0 (stdio).
//!
//! ## Ferramentas Expostas
//!
//! - `lca_calculate_scores` - scores de sustentabilidade, circular e linear
//! - `lca_process_stages` - análise por estágio
//! - `lca_analyze_project` - registro completo de análise
//! - `lca_predict` - predição de scores
//! - `lca_simulate_scenario` - comparação base × cenário
//! - `lca_cache_stats`, `lca_cache_clear`, `lca_cache_sweep` - administração
//!   do cache, protegidas pelo token de `[admin]` quando configurado
//!
//! ## Exemplo de Uso
//!
//! ```ignore
//! use metalca::mcp::McpServer;
//! use metalca::types::config::Config;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut server = McpServer::new(Config::load_or_default());
//!     server.run().await.unwrap();
//! }
//! ```

mod protocol;
mod server;
mod tools;
mod transport;

pub use protocol::{
    CallToolParams, InitializeResult, JsonRpcError, JsonRpcId, JsonRpcRequest, JsonRpcResponse,
    ListToolsResult, ServerCapabilities, ServerInfo, ToolContent, ToolDescription, ToolResult,
    ToolsCapability, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND,
    PARSE_ERROR, PROTOCOL_VERSION,
};

pub use server::McpServer;
pub use tools::{AdminParams, ScoreParams, StagesParams, ToolHandler};
pub use transport::{Incoming, LineTransport, StdioTransport};
