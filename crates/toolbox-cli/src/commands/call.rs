//! `toolbox call` command implementation.

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result, bail};
use clap::Args;
use console::style;
use toolbox::{TracingSink, invoke};
use toolbox_core::ToolRegistry;

/// Arguments for the `call` command.
#[derive(Debug, Args)]
pub struct CallArgs {
    /// Tool ID to call (e.g., "dropbox.list_folder").
    pub tool_id: String,

    /// Input JSON (inline or @file.json).
    pub input: String,
}

/// Reads the tool input, either inline or from `@path`.
fn read_input(input: &str) -> Result<serde_json::Value> {
    let input_json = match input.strip_prefix('@') {
        Some(path) => {
            let path = PathBuf::from(path);
            std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read input file: {}", path.display()))?
        }
        None => input.to_string(),
    };

    serde_json::from_str(&input_json).context("invalid input JSON")
}

/// Invokes a registered tool directly and prints its JSON output.
///
/// # Errors
///
/// Returns an error if the input cannot be read, the tool does not exist, or
/// the tool call fails.
pub async fn run(registry: &ToolRegistry, args: &CallArgs) -> Result<()> {
    let input = read_input(&args.input)?;

    let Some(handle) = registry.get(&args.tool_id) else {
        bail!("tool not found: {}", args.tool_id);
    };

    eprintln!(
        "{} Calling tool: {}",
        style("→").cyan(),
        style(&args.tool_id).bold()
    );

    let output = invoke(
        Arc::new(TracingSink),
        &args.tool_id,
        input,
        |ctx, input| handle.call(ctx, input),
    )
    .await
    .context("failed to call tool")?;

    eprintln!("{} Result:", style("✓").green().bold());
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use dropbox::{Credential, CredentialSource, DropboxClient, DropboxConfig, DropboxError};
    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    use super::*;

    fn registry_for(server: &MockServer, staging: &std::path::Path) -> ToolRegistry {
        let config = DropboxConfig::new(staging)
            .with_credentials(CredentialSource::Static(Credential::new("test-token")))
            .with_base_urls(server.uri(), server.uri());
        let mut registry = ToolRegistry::new();
        dropbox::register(&mut registry, &DropboxClient::new(&config).unwrap()).unwrap();
        registry
    }

    #[test]
    fn test_read_input_inline_json() {
        let value = read_input(r#"{"path": "/Docs"}"#).unwrap();
        assert_eq!(value, json!({ "path": "/Docs" }));
    }

    #[test]
    fn test_read_input_from_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("input.json");
        fs::write(&file, r#"{"path": "/from-file.txt"}"#).unwrap();

        let value = read_input(&format!("@{}", file.display())).unwrap();

        assert_eq!(value["path"], "/from-file.txt");
    }

    #[test]
    fn test_read_input_missing_file_names_path() {
        let err = read_input("@/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }

    #[test]
    fn test_read_input_rejects_invalid_json() {
        let err = read_input("{not json").unwrap_err();
        assert_eq!(err.to_string(), "invalid input JSON");
    }

    #[tokio::test]
    async fn test_run_calls_tool_through_registry() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/2/files/list_folder"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(r#"{"entries":[],"has_more":false}"#, "application/json"),
            )
            .expect(1)
            .mount(&server)
            .await;
        let staging = TempDir::new().unwrap();
        let registry = registry_for(&server, staging.path());

        let args = CallArgs {
            tool_id: "dropbox.list_folder".to_string(),
            input: r#"{"path": "/"}"#.to_string(),
        };

        run(&registry, &args).await.unwrap();
    }

    #[tokio::test]
    async fn test_run_surfaces_tool_error_with_label() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/2/files/download"))
            .respond_with(ResponseTemplate::new(409).set_body_raw(
                r#"{"error_summary":"path/not_found/"}"#,
                "application/json",
            ))
            .mount(&server)
            .await;
        let staging = TempDir::new().unwrap();
        let registry = registry_for(&server, staging.path());

        let args = CallArgs {
            tool_id: "dropbox.download".to_string(),
            input: r#"{"path": "/missing.txt"}"#.to_string(),
        };

        let err = run(&registry, &args).await.unwrap_err();

        let message = format!("{err:#}");
        assert!(message.contains("failed to call dropbox.download"));
        assert_eq!(message.matches("path/not_found/").count(), 1);
        assert!(err.chain().any(|cause| cause.downcast_ref::<DropboxError>().is_some()));
    }

    #[tokio::test]
    async fn test_run_unknown_tool_fails_before_invoking() {
        let server = MockServer::start().await;
        let staging = TempDir::new().unwrap();
        let registry = registry_for(&server, staging.path());

        let args = CallArgs {
            tool_id: "dropbox.search".to_string(),
            input: "{}".to_string(),
        };

        let err = run(&registry, &args).await.unwrap_err();

        assert_eq!(err.to_string(), "tool not found: dropbox.search");
    }
}
