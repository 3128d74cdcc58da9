//! Displays detailed information about a registered tool.

use anyhow::{Context, Result, bail};
use clap::Args;
use console::style;
use toolbox_core::{ToolInfo, ToolRegistry};

#[derive(Debug, Args)]
pub struct DescribeArgs {
    /// Tool ID to describe (e.g., "dropbox.download").
    pub tool_id: String,
}

fn pretty_schema(schema: &str) -> Result<String> {
    let value: serde_json::Value = serde_json::from_str(schema).context("invalid tool schema")?;
    Ok(serde_json::to_string_pretty(&value)?)
}

fn render(tool: &ToolInfo) -> Result<String> {
    Ok(format!(
        "{title}\n\n{id_label}: {id}\n{name_label}: {name}\n{desc_label}: {description}\n\n\
         {input_title}\n{input}\n\n{output_title}\n{output}\n",
        title = style("Tool Details").bold().underlined(),
        id_label = style("ID").cyan(),
        id = tool.id,
        name_label = style("Name").cyan(),
        name = tool.display_name,
        desc_label = style("Description").cyan(),
        description = tool.description,
        input_title = style("Input Schema").bold().underlined(),
        input = pretty_schema(&tool.input_schema)?,
        output_title = style("Output Schema").bold().underlined(),
        output = pretty_schema(&tool.output_schema)?,
    ))
}

/// Prints a tool's metadata and schemas.
///
/// # Errors
///
/// Returns an error if no tool is registered under the given ID.
pub fn run(registry: &ToolRegistry, args: &DescribeArgs) -> Result<()> {
    let Some(handle) = registry.get(&args.tool_id) else {
        bail!("tool not found: {}", args.tool_id);
    };
    print!("{}", render(handle.info())?);
    Ok(())
}
