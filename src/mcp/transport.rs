//! Transporte newline-delimited JSON.
//!
//! Cada mensagem é um objeto JSON-RPC 2.0 completo em uma única linha:
//!
//! ```text
//! {"jsonrpc":"2.0","id":1,"method":"tools/list"}\n
//! {"jsonrpc":"2.0","id":1,"result":{"tools":[...]}}\n
//! ```
//!
//! O transporte é genérico sobre leitor e escritor assíncronos; o servidor
//! usa stdin/stdout e os testes usam buffers em memória.

use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout,
};

use crate::MetalcaResult;

use super::protocol::{JsonRpcError, JsonRpcId, JsonRpcRequest, JsonRpcResponse};

/// Mensagem recebida.
#[derive(Debug)]
pub enum Incoming {
    /// Request (ou notificação) bem formada.
    Request(JsonRpcRequest),

    /// Linha que não é JSON-RPC válido; deve ser respondida com o erro.
    Invalid {
        id: Option<JsonRpcId>,
        error: JsonRpcError,
    },
}

/// Transporte sobre linhas.
pub struct LineTransport<R, W> {
    reader: R,
    writer: W,
}

/// Transporte sobre stdin/stdout.
pub type StdioTransport = LineTransport<BufReader<Stdin>, Stdout>;

impl StdioTransport {
    /// Cria o transporte do processo.
    pub fn stdio() -> Self {
        LineTransport::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> LineTransport<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Cria um transporte.
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Lê a próxima mensagem. Retorna `None` em EOF; linhas vazias são ignoradas.
    pub async fn read_message(&mut self) -> MetalcaResult<Option<Incoming>> {
        let mut line = String::new();

        loop {
            line.clear();
            if self.reader.read_line(&mut line).await? == 0 {
                return Ok(None);
            }

            let trimmed = line.trim();
            if !trimmed.is_empty() {
                return Ok(Some(Self::decode(trimmed)));
            }
        }
    }

    fn decode(line: &str) -> Incoming {
        let value: serde_json::Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                return Incoming::Invalid {
                    id: None,
                    error: JsonRpcError::parse_error(e),
                }
            }
        };

        let id = value
            .get("id")
            .and_then(|id| serde_json::from_value::<JsonRpcId>(id.clone()).ok());

        match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(request) => {
                tracing::debug!(method = %request.method, id = ?request.id, "Received request");
                Incoming::Request(request)
            }
            Err(e) => Incoming::Invalid {
                id,
                error: JsonRpcError::invalid_request(e),
            },
        }
    }

    /// Escreve uma response como JSON compacto seguido de `\n`.
    pub async fn write_response(&mut self, response: &JsonRpcResponse) -> MetalcaResult<()> {
        let mut body = serde_json::to_vec(response)?;
        body.push(b'\n');

        self.writer.write_all(&body).await?;
        self.writer.flush().await?;

        tracing::debug!(id = ?response.id, is_error = response.is_error(), "Sent response");
        Ok(())
    }

    /// Devolve o escritor (usado nos testes para inspecionar a saída).
    pub fn into_writer(self) -> W {
        self.writer
    }
}
