//! Tree command implementation.

use crate::cli::TreeArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use crate::session::Session;
use kinship_domain::FamilyRecords;
use kinship_graph::{render, GraphBuilder, LabelStyle, RenderedGraph};
use std::fs;

/// Title of the generated page.
const PAGE_TITLE: &str = "Family Tree";

/// Execute the tree command.
pub fn execute_tree(
    args: TreeArgs,
    session: &Session,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    let strict = config.strict_references && !args.lenient;

    if args.json {
        let rendered = render_tree(session.records(), strict, LabelStyle::Plain)?;
        println!("{}", rendered.to_json()?);
        return Ok(());
    }

    let rendered = render_tree(session.records(), strict, LabelStyle::Html)?;
    fs::write(&args.output, rendered.to_html(PAGE_TITLE)?)?;

    println!(
        "{}",
        formatter.success(&format!(
            "Wrote {} node(s) and {} edge(s) to {}",
            rendered.nodes.len(),
            rendered.edges.len(),
            args.output.display()
        ))
    );
    Ok(())
}

/// Build and render the graph for `records`.
pub fn render_tree(
    records: &FamilyRecords,
    strict: bool,
    style: LabelStyle,
) -> Result<RenderedGraph> {
    let graph = GraphBuilder::new().strict(strict).build(records)?;
    Ok(render(&graph, style))
}
