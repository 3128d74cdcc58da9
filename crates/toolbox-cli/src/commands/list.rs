//! List the tools registered with the CLI.

use std::fmt::Write as _;

use anyhow::Result;
use clap::{Args, ValueEnum};
use console::style;
use toolbox_core::{ToolInfo, ToolRegistry};

/// Output format for `toolbox list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table.
    Table,
    /// Machine-readable JSON including schemas.
    Json,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

/// Truncates a description to 40 characters, ending in "..." when cut.
fn truncate_description(description: &str) -> String {
    const MAX_DESCRIPTION_CHARS: usize = 40;
    const ELLIPSIS: &str = "...";
    const TRUNCATED_CHARS: usize = MAX_DESCRIPTION_CHARS - ELLIPSIS.len();

    let mut chars = description.chars();
    let head: String = chars.by_ref().take(MAX_DESCRIPTION_CHARS).collect();

    if chars.next().is_none() {
        return head;
    }

    let prefix: String = head.chars().take(TRUNCATED_CHARS).collect();
    format!("{prefix}{ELLIPSIS}")
}

fn tool_to_json(tool: &ToolInfo) -> serde_json::Value {
    serde_json::json!({
        "id": tool.id,
        "displayName": tool.display_name,
        "description": tool.description,
        "inputSchema": serde_json::from_str::<serde_json::Value>(&tool.input_schema).ok(),
        "outputSchema": serde_json::from_str::<serde_json::Value>(&tool.output_schema).ok(),
    })
}

fn render_table(registry: &ToolRegistry) -> String {
    let mut out = String::new();
    if registry.is_empty() {
        out.push_str("No tools found\n");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<40} {:<24} {}",
        style("TOOL ID").bold(),
        style("NAME").bold(),
        style("DESCRIPTION").bold()
    );
    let _ = writeln!(out, "{}", "-".repeat(88));
    for tool in registry.list() {
        let description = truncate_description(&tool.description);
        let _ = writeln!(out, "{:<40} {:<24} {description}", tool.id, tool.display_name);
    }
    let _ = writeln!(
        out,
        "\n{} {} tool(s) available",
        style("✓").green(),
        registry.len()
    );
    out
}

/// Prints the registered tools in the requested format.
///
/// # Errors
///
/// Returns an error if JSON output cannot be serialized.
pub fn run(registry: &ToolRegistry, args: &ListArgs) -> Result<()> {
    match args.format {
        OutputFormat::Json => {
            let tools: Vec<serde_json::Value> = registry.list().map(tool_to_json).collect();
            println!("{}", serde_json::to_string_pretty(&tools)?);
        }
        OutputFormat::Table => print!("{}", render_table(registry)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use dropbox::{Credential, CredentialSource, DropboxClient, DropboxConfig};

    use super::*;

    fn dropbox_registry() -> ToolRegistry {
        let config = DropboxConfig::new("/tmp/unused-staging")
            .with_credentials(CredentialSource::Static(Credential::new("test-token")));
        let mut registry = ToolRegistry::new();
        dropbox::register(&mut registry, &DropboxClient::new(&config).unwrap()).unwrap();
        registry
    }

    #[test]
    fn test_truncate_description() {
        assert_eq!(truncate_description("short"), "short");
        assert_eq!(
            truncate_description("this is a very long description that should be truncated"),
            "this is a very long description that ..."
        );
    }

    #[test]
    fn test_render_table_lists_every_tool() {
        console::set_colors_enabled(false);

        let table = render_table(&dropbox_registry());

        assert!(table.contains("dropbox.download"));
        assert!(table.contains("dropbox.list_folder"));
        assert!(table.contains("2 tool(s) available"));
    }

    #[test]
    fn test_render_table_for_empty_registry() {
        assert_eq!(render_table(&ToolRegistry::new()), "No tools found\n");
    }

    #[test]
    fn test_tool_to_json_embeds_parsed_schemas() {
        let registry = dropbox_registry();
        let handle = registry.get("dropbox.download").unwrap();

        let value = tool_to_json(handle.info());

        assert_eq!(value["id"], "dropbox.download");
        assert_eq!(value["displayName"], "Download Dropbox File");
        assert!(value["inputSchema"]["properties"]["path"].is_object());
        assert!(value["outputSchema"]["properties"]["local_path"].is_object());
    }
}
