use clap::{ArgAction, Parser, builder::BoolishValueParser};
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

#[derive(Parser, Debug)]
#[command(name = "swagger-mcpd", version, about = "Swagger/OpenAPI MCP daemon.")]
struct CliArgs {
    /// URL or file path of the Swagger/OpenAPI document.
    #[arg(env = "SWAGGER_MCP_SOURCE")]
    source: Option<String>,

    #[arg(long, env = "SWAGGER_MCP_FALLBACK_SOURCE")]
    fallback_source: Option<String>,

    #[arg(long, env = "SWAGGER_MCP_HTTP_ADDR")]
    http_addr: Option<SocketAddr>,

    /// Serve HTTP without sessions. Accepts `--stateless`, `--stateless=false`, etc.
    #[arg(
        long,
        env = "SWAGGER_MCP_STATELESS",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = false,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    stateless: bool,

    /// Load the document at startup instead of on the first tool call.
    #[arg(
        long,
        env = "SWAGGER_MCP_EAGER",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = false,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    eager: bool,

    /// SSE keep-alive interval for HTTP sessions; 0 disables it.
    #[arg(long, env = "SWAGGER_MCP_SSE_KEEP_ALIVE_SECS", default_value_t = 15)]
    sse_keep_alive_secs: u64,
}

/// Runtime configuration loaded from CLI arguments and environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub source: String,
    pub http_addr: Option<SocketAddr>,
    pub stateless: bool,
    pub eager: bool,
    pub sse_keep_alive: Option<Duration>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting: {0} (pass the document URL or path as the first argument)")]
    MissingSetting(&'static str),
}

impl ServerConfig {
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::try_from(args)
    }
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = ConfigError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let source = [args.source, args.fallback_source]
            .into_iter()
            .flatten()
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
            .ok_or(ConfigError::MissingSetting("SWAGGER_MCP_SOURCE"))?;

        Ok(Self {
            source,
            http_addr: args.http_addr,
            stateless: args.stateless,
            eager: args.eager,
            sse_keep_alive: (args.sse_keep_alive_secs > 0)
                .then(|| Duration::from_secs(args.sse_keep_alive_secs)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> CliArgs {
        CliArgs {
            source: Some("https://petstore3.swagger.io/api/v3/openapi.json".to_string()),
            fallback_source: None,
            http_addr: None,
            stateless: false,
            eager: false,
            sse_keep_alive_secs: 15,
        }
    }

    #[test]
    fn primary_source_wins() {
        let mut args = base_args();
        args.fallback_source = Some("./openapi.yaml".to_string());

        let config = ServerConfig::try_from(args).expect("config should parse");

        assert_eq!(config.source, "https://petstore3.swagger.io/api/v3/openapi.json");
        assert!(config.http_addr.is_none());
    }

    #[test]
    fn blank_source_falls_back() {
        let mut args = base_args();
        args.source = Some("  ".to_string());
        args.fallback_source = Some("./openapi.yaml".to_string());

        let config = ServerConfig::try_from(args).expect("config should parse");

        assert_eq!(config.source, "./openapi.yaml");
    }

    #[test]
    fn missing_source_is_rejected() {
        let mut args = base_args();
        args.source = None;

        let err = ServerConfig::try_from(args).expect_err("source is required");

        assert!(matches!(err, ConfigError::MissingSetting("SWAGGER_MCP_SOURCE")));
    }

    #[test]
    fn parses_flags() {
        let args = CliArgs::try_parse_from([
            "swagger-mcpd",
            "./openapi.yaml",
            "--http-addr",
            "127.0.0.1:4020",
            "--stateless",
            "true",
        ])
        .expect("args should parse");

        let config = ServerConfig::try_from(args).expect("config should parse");

        assert_eq!(config.source, "./openapi.yaml");
        assert_eq!(config.http_addr, Some(SocketAddr::from(([127, 0, 0, 1], 4020))));
        assert!(config.stateless);
        assert!(!config.eager);
        assert_eq!(config.sse_keep_alive, Some(Duration::from_secs(15)));
    }

    #[test]
    fn boolish_flags_accept_bare_and_valued_forms() {
        let parse = |extra: &[&str]| {
            let argv = ["swagger-mcpd", "./openapi.yaml"].iter().chain(extra).copied();
            CliArgs::try_parse_from(argv).expect("args should parse")
        };

        let args = parse(&["--stateless", "--eager=yes"]);
        assert!(args.stateless);
        assert!(args.eager);

        let args = parse(&["--stateless=off", "--eager", "0"]);
        assert!(!args.stateless);
        assert!(!args.eager);

        assert!(CliArgs::try_parse_from(["swagger-mcpd", "--stateless=maybe"]).is_err());
    }

    #[test]
    fn zero_keep_alive_disables_pings() {
        let mut args = base_args();
        args.sse_keep_alive_secs = 0;

        let config = ServerConfig::try_from(args).expect("config should parse");

        assert!(config.sse_keep_alive.is_none());
    }
}
