//! Servidor de ferramentas do metalca.
//!
//! Lê requests JSON-RPC linha a linha, despacha para o [`ToolHandler`] e
//! mantém o sweeper do cache ativo enquanto o servidor roda.

use serde_json::json;
use tokio::io::{AsyncBufRead, AsyncWrite};

use crate::cache::CacheSweeper;
use crate::types::config::Config;
use crate::MetalcaResult;

use super::protocol::{
    CallToolParams, InitializeResult, JsonRpcError, JsonRpcRequest, JsonRpcResponse,
    ListToolsResult,
};
use super::tools::ToolHandler;
use super::transport::{Incoming, LineTransport, StdioTransport};

/// Servidor de ferramentas.
pub struct McpServer {
    config: Config,
    tools: ToolHandler,
    sweeper: Option<CacheSweeper>,
    initialized: bool,
}

impl McpServer {
    /// Cria o servidor. O cache é criado aqui e fica vazio até a primeira chamada.
    pub fn new(config: Config) -> Self {
        let tools = ToolHandler::new(&config);

        Self {
            config,
            tools,
            sweeper: None,
            initialized: false,
        }
    }

    /// Handler de ferramentas.
    pub fn tools(&self) -> &ToolHandler {
        &self.tools
    }

    /// Roda sobre stdin/stdout até o cliente fechar a entrada.
    pub async fn run(&mut self) -> MetalcaResult<()> {
        let mut transport = StdioTransport::stdio();
        self.serve(&mut transport).await
    }

    /// Roda sobre um transporte qualquer até EOF.
    pub async fn serve<R, W>(&mut self, transport: &mut LineTransport<R, W>) -> MetalcaResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        tracing::info!(version = env!("CARGO_PKG_VERSION"), "metalca server starting");
        self.start_sweeper();

        let outcome = self.message_loop(transport).await;

        self.stop_sweeper();
        tracing::info!("metalca server stopped");
        outcome
    }

    async fn message_loop<R, W>(&mut self, transport: &mut LineTransport<R, W>) -> MetalcaResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        while let Some(incoming) = transport.read_message().await? {
            let response = match incoming {
                Incoming::Request(request) => {
                    // Notificações não recebem resposta
                    let is_notification = request.is_notification();
                    let response = self.handle_request(request).await;
                    if is_notification {
                        continue;
                    }
                    response
                }
                Incoming::Invalid { id, error } => {
                    tracing::warn!(code = error.code, message = %error.message, "Malformed message");
                    JsonRpcResponse::error(id, error)
                }
            };

            transport.write_response(&response).await?;
        }

        tracing::info!("Client disconnected");
        Ok(())
    }

    fn start_sweeper(&mut self) {
        if !self.config.cache.enabled {
            return;
        }

        let mut sweeper = CacheSweeper::new(
            self.tools.optimizer().shared_cache(),
            self.config.cache.sweep_interval(),
        );

        match sweeper.start() {
            Ok(()) => {
                tracing::debug!(
                    interval_secs = self.config.cache.sweep_interval_secs,
                    "Cache sweeper started"
                );
                self.sweeper = Some(sweeper);
            }
            Err(e) => tracing::warn!(error = %e, "Cache sweeper not started"),
        }
    }

    fn stop_sweeper(&mut self) {
        if let Some(mut sweeper) = self.sweeper.take() {
            sweeper.stop();
        }
    }

    /// Se o sweeper está ativo.
    pub fn sweeper_running(&self) -> bool {
        self.sweeper.as_ref().is_some_and(|s| s.is_running())
    }

    /// Processa uma request JSON-RPC.
    pub async fn handle_request(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        tracing::debug!(method = %request.method, "Handling request");

        match request.method.as_str() {
            // Lifecycle
            "initialize" => self.handle_initialize(request),
            "initialized" | "notifications/initialized" => {
                tracing::info!("Client initialization complete");
                JsonRpcResponse::success(request.id, json!({}))
            }
            "shutdown" => self.handle_shutdown(request),

            // Tools
            "tools/list" => self.handle_tools_list(request),
            "tools/call" => self.handle_tools_call(request).await,

            _ => JsonRpcResponse::error(request.id, JsonRpcError::method_not_found(&request.method)),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Handlers de lifecycle
    // ═══════════════════════════════════════════════════════════════════════

    fn handle_initialize(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        tracing::info!("Client initializing connection");
        self.initialized = true;

        match serde_json::to_value(InitializeResult::default()) {
            Ok(result) => JsonRpcResponse::success(request.id, result),
            Err(e) => JsonRpcResponse::error(request.id, JsonRpcError::internal_error(e.to_string())),
        }
    }

    fn handle_shutdown(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        tracing::info!("Client requested shutdown");
        self.initialized = false;
        self.stop_sweeper();

        JsonRpcResponse::success(request.id, json!(null))
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Handlers de tools
    // ═══════════════════════════════════════════════════════════════════════

    fn handle_tools_list(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let result = ListToolsResult {
            tools: ToolHandler::list_tools(),
        };

        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(request.id, value),
            Err(e) => JsonRpcResponse::error(request.id, JsonRpcError::internal_error(e.to_string())),
        }
    }

    async fn handle_tools_call(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let params: CallToolParams = match request.params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(
                        request.id,
                        JsonRpcError::invalid_params(format!("Invalid params: {}", e)),
                    );
                }
            },
            None => {
                return JsonRpcResponse::error(
                    request.id,
                    JsonRpcError::invalid_params("Missing params"),
                );
            }
        };

        tracing::info!(tool = %params.name, "Calling tool");

        let result = self
            .tools
            .handle_tool_call(&params.name, params.arguments)
            .await;

        match serde_json::to_value(&result) {
            Ok(value) => JsonRpcResponse::success(request.id, value),
            Err(e) => JsonRpcResponse::error(request.id, JsonRpcError::internal_error(e.to_string())),
        }
    }
}
