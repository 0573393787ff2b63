use anyhow::{Context, Result};
use clap::Parser;

use sevenmark_highlight::cli::{CliArgs, OutputFormat};
use sevenmark_highlight::config::HighlightConfig;
use sevenmark_highlight::provider::DecorationProvider;
use sevenmark_highlight::syntax::{
    folding_ranges, map_decorations, Decoration, InlineDecoration, Node, StyleTable,
};
use sevenmark_highlight::worker::{CommandBackend, ParseClient};

fn main() -> Result<()> {
    let args = CliArgs::parse();
    sevenmark_highlight::tracing::init();

    let mut config = HighlightConfig::load();
    args.apply_to(&mut config);

    if args.write_config {
        config.save().context("Failed to write config")?;
    }

    let Some(text) = args.read_input().context("Failed to read input")? else {
        return Ok(());
    };

    let styles = config.style_table();
    let output = if args.tree {
        let root = Node::from_json(&text).context("Input is not a serialized parse tree")?;
        render_tree(&root, &styles, args.format)?
    } else {
        let parser = config
            .parser
            .clone()
            .context("No parser configured; pass --parser or set `parser` in config.yaml")?;
        let client = ParseClient::spawn(CommandBackend::new(), parser, config.init_timeout());
        let mut provider = DecorationProvider::new(client, styles);

        let output = match args.format {
            OutputFormat::Folds => {
                let root = provider.request_tree(&text).context("Parsing failed")?;
                serde_json::to_string_pretty(&folding_ranges(&root, provider.styles()))?
            }
            format => render_decorations(&provider.request_decorations(&text), format)?,
        };
        provider.shutdown();
        output
    };

    println!("{}", output);
    Ok(())
}

fn render_tree(root: &Node, styles: &StyleTable, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Folds => Ok(serde_json::to_string_pretty(&folding_ranges(
            root, styles,
        ))?),
        format => render_decorations(&map_decorations(root, styles), format),
    }
}

fn render_decorations(decorations: &[Decoration], format: OutputFormat) -> Result<String> {
    let json = if format == OutputFormat::Inline {
        let inline: Vec<InlineDecoration> = decorations.iter().map(Decoration::to_inline).collect();
        serde_json::to_string_pretty(&inline)?
    } else {
        serde_json::to_string_pretty(decorations)?
    };
    Ok(json)
}
