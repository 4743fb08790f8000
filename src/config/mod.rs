//! Configuration management for the Agent Hub MCP server.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Command-line arguments for the Agent Hub MCP server.
#[derive(Parser, Debug, Clone)]
#[command(name = "agent-hub-mcp")]
#[command(author = "Agent Hub Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "MCP server exposing the Agent Hub document store and AI tools")]
pub struct Args {
    /// Host to bind the MCP server to
    #[arg(long, default_value = "localhost", env = "AGENT_HUB_MCP_HOST")]
    pub host: String,

    /// Port to bind the MCP server to
    #[arg(short, long, default_value = "3001", env = "AGENT_HUB_MCP_PORT")]
    pub port: u16,

    /// Base URL of the Ollama text-generation service
    #[arg(long, default_value = "http://localhost:11434", env = "OLLAMA_URL")]
    pub ollama_url: String,

    /// Model used for summaries, answers and completions
    #[arg(short, long, default_value = "deepseek-coder:6.7b", env = "OLLAMA_MODEL")]
    pub model: String,

    /// Timeout for a single completion call (seconds)
    #[arg(long, default_value = "60", env = "OLLAMA_TIMEOUT_SECS")]
    pub provider_timeout: u64,

    /// JSON or YAML file holding the document list (sample corpus if omitted)
    #[arg(long, env = "AGENT_HUB_DOCUMENTS")]
    pub documents: Option<PathBuf>,

    /// JSON-lines file the activity log is loaded from and appended to
    #[arg(long, env = "AGENT_HUB_ACTIVITY_LOG")]
    pub activity_log: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, env = "AGENT_HUB_MCP_DEBUG")]
    pub debug: bool,

    /// Emit logs as JSON
    #[arg(long, env = "AGENT_HUB_MCP_JSON_LOGS")]
    pub json_logs: bool,
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Ollama base URL
    pub ollama_url: String,
    /// Ollama model name
    pub model: String,
    /// Completion timeout in seconds
    pub provider_timeout: u64,
    /// Document list file
    pub documents: Option<PathBuf>,
    /// Activity log file
    pub activity_log: Option<PathBuf>,
    /// Debug mode
    pub debug: bool,
    /// JSON log output
    pub json_logs: bool,
}

impl Config {
    /// Address the listener binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            ollama_url: args.ollama_url,
            model: args.model,
            provider_timeout: args.provider_timeout,
            documents: args.documents,
            activity_log: args.activity_log,
            debug: args.debug,
            json_logs: args.json_logs,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3001,
            ollama_url: "http://localhost:11434".to_string(),
            model: "deepseek-coder:6.7b".to_string(),
            provider_timeout: 60,
            documents: None,
            activity_log: None,
            debug: false,
            json_logs: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_values() {
        let config = Config::default();

        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 3001);
        assert_eq!(config.ollama_url, "http://localhost:11434");
        assert_eq!(config.model, "deepseek-coder:6.7b");
        assert_eq!(config.provider_timeout, 60);
        assert!(config.documents.is_none());
        assert!(config.activity_log.is_none());
        assert!(!config.debug);
        assert!(!config.json_logs);
    }

    #[test]
    fn test_bind_address() {
        let config = Config {
            host: "0.0.0.0".to_string(),
            port: 8080,
            ..Config::default()
        };
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_args_defaults_match_config_default() {
        let args = Args::parse_from(["agent-hub-mcp"]);
        let config: Config = args.into();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_args_to_config() {
        let args = Args::parse_from([
            "agent-hub-mcp",
            "--host",
            "127.0.0.1",
            "--port",
            "4000",
            "--model",
            "llama3",
            "--provider-timeout",
            "5",
            "--documents",
            "/data/docs.yaml",
            "--debug",
        ]);

        let config: Config = args.into();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 4000);
        assert_eq!(config.model, "llama3");
        assert_eq!(config.provider_timeout, 5);
        assert_eq!(config.documents, Some(PathBuf::from("/data/docs.yaml")));
        assert!(config.debug);
    }

    #[test]
    fn test_config_deserialization() {
        let json = r#"{
            "host": "0.0.0.0",
            "port": 9000,
            "ollama_url": "http://ollama:11434",
            "model": "mistral",
            "provider_timeout": 30,
            "documents": null,
            "activity_log": "/var/log/activity.jsonl",
            "debug": true,
            "json_logs": true
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.model, "mistral");
        assert_eq!(
            config.activity_log,
            Some(PathBuf::from("/var/log/activity.jsonl"))
        );
        assert!(config.json_logs);
    }
}
