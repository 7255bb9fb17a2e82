//! Interface de linha de comando do metalca.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::types::config::CONFIG_FILE_NAME;

/// metalca - avaliação de ciclo de vida (LCA) para produção de metais.
#[derive(Parser, Debug)]
#[command(name = "metalca")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Arquivo de configuração.
    #[arg(short, long, default_value = CONFIG_FILE_NAME)]
    pub config: PathBuf,

    /// Modo verbose.
    #[arg(short, long)]
    pub verbose: bool,

    /// Modo silencioso.
    #[arg(short, long)]
    pub quiet: bool,

    /// Comando a executar.
    #[command(subcommand)]
    pub command: Commands,
}

/// Comandos disponíveis.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Cria um metalca.toml padrão.
    Init {
        /// Diretório de destino (padrão: diretório atual).
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Inicia o servidor de ferramentas (JSON-RPC sobre stdio).
    Serve,

    /// Calcula os scores de um projeto.
    Score {
        /// Submissão do projeto em JSON ("-" para stdin).
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Analisa cada estágio de um projeto.
    Stages {
        /// Submissão do projeto em JSON ("-" para stdin).
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Gera o registro completo de análise de um projeto.
    Analyze {
        /// Submissão do projeto em JSON ("-" para stdin).
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Prevê scores a partir de atributos agregados.
    Predict {
        /// Entrada de predição em JSON ("-" para stdin).
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Compara o projeto com um cenário de ajustes.
    Simulate {
        /// Submissão com `adjustments` em JSON ("-" para stdin).
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Mostra versão.
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_score() {
        let cli = Cli::parse_from(["metalca", "-v", "score", "--input", "project.json"]);

        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("metalca.toml"));
        match cli.command {
            Commands::Score { input } => assert_eq!(input, PathBuf::from("project.json")),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_custom_config() {
        let cli = Cli::parse_from(["metalca", "-c", "/tmp/lca.toml", "serve"]);
        assert_eq!(cli.config, PathBuf::from("/tmp/lca.toml"));
        assert!(matches!(cli.command, Commands::Serve));
    }
}
