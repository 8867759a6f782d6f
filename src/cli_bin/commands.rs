//! CLI command handlers that bridge CLI arguments to library operations

use crate::cli_bin::args::*;
use candidate_yaml::core::{CandidateTree, Decoder, DecoderConfig, Encoder, EncoderConfig};
use candidate_yaml::error::Result;
use candidate_yaml::io::{FileResolver, ResolverConfig, YamlReader, YamlWriter};
use log::{debug, info, warn};
use serde::Serialize;
use std::path::PathBuf;

/// One decoded node as shown by `inspect`
#[derive(Debug, Serialize)]
pub struct NodeSummary {
    pub id: usize,
    pub path: String,
    pub kind: String,
    pub tag: String,
    pub style: String,
    pub value: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub anchor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<usize>,
    pub is_map_key: bool,
}

/// Every node of one document
#[derive(Debug, Serialize)]
pub struct DocumentReport {
    pub index: usize,
    pub nodes: Vec<NodeSummary>,
}

/// Inspect results for one file
#[derive(Debug, Serialize)]
pub struct FileReport {
    pub file: PathBuf,
    pub documents: Vec<DocumentReport>,
}

/// Execute the inspect command
pub fn inspect_command(args: InspectArgs) -> Result<()> {
    debug!("Executing inspect command");

    let files = resolve_files(&args.files)?;
    if files.is_empty() {
        warn!("No files found to process");
        return Ok(());
    }

    let reader = YamlReader::new();
    let decoder = create_decoder(&args.decode);
    let mut reports = Vec::new();

    for file in files {
        debug!("Inspecting file: {}", file.display());
        let trees = reader.read_candidates(&file, &decoder)?;
        reports.push(FileReport {
            documents: trees
                .iter()
                .enumerate()
                .map(|(index, tree)| DocumentReport {
                    index,
                    nodes: summarize(tree),
                })
                .collect(),
            file,
        });
    }

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
        OutputFormat::Text => {
            for line in render_text(&reports) {
                println!("{}", line);
            }
        }
    }

    info!("Inspected {} files", reports.len());
    Ok(())
}

/// Execute the roundtrip command
pub fn roundtrip_command(args: RoundtripArgs) -> Result<()> {
    debug!("Executing roundtrip command");

    let files = resolve_files(&args.files)?;
    if files.is_empty() {
        warn!("No files found to process");
        return Ok(());
    }

    let reader = YamlReader::new();
    let writer = YamlWriter::new();
    let decoder = create_decoder(&args.decode);
    let encoder = Encoder::with_config(EncoderConfig {
        relink_aliases: !args.no_relink,
        max_depth: Some(args.decode.depth_limit),
    });

    let mut collected = Vec::new();
    let mut modified_count = 0;

    for file in &files {
        debug!("Round-tripping file: {}", file.display());
        let candidates = reader.read_candidates(file, &decoder)?;
        let encoded = candidates
            .iter()
            .map(|tree| encoder.encode_tree(tree))
            .collect::<Result<Vec<_>>>()?;

        if args.in_place {
            let result = writer.write_file(&encoded, file)?;
            if result.modified {
                modified_count += 1;
                info!("Rewrote {}", result.output_path.display());
            } else {
                debug!("{} already round-trips unchanged", file.display());
            }
        } else {
            collected.extend(encoded);
        }
    }

    if args.in_place {
        info!("{} of {} files changed", modified_count, files.len());
        return Ok(());
    }

    match &args.output {
        Some(path) => {
            let result = writer.write_file(&collected, path)?;
            info!(
                "Wrote {} documents to {}",
                collected.len(),
                result.output_path.display()
            );
        }
        None => print!("{}", writer.format_documents(&collected)?),
    }

    Ok(())
}

fn resolve_files(file_options: &CommonFileOptions) -> Result<Vec<PathBuf>> {
    let resolver = FileResolver::with_config(ResolverConfig {
        follow_links: file_options.follow_links,
        max_depth: file_options.max_depth,
        include_hidden: file_options.include_hidden,
        exclude_patterns: file_options.exclude_patterns.clone(),
        ..Default::default()
    });

    resolver.resolve_paths(&file_options.files)
}

fn create_decoder(options: &DecodeOptions) -> Decoder {
    Decoder::with_config(DecoderConfig {
        strict_aliases: !options.lenient_aliases,
        max_depth: Some(options.depth_limit),
    })
}

/// Summaries of every node in arena order
fn summarize(tree: &CandidateTree) -> Vec<NodeSummary> {
    tree.iter()
        .map(|(id, node)| NodeSummary {
            id: id.0,
            path: tree.path_string(id),
            kind: node.kind.to_string(),
            tag: node.tag.clone(),
            style: node.style.to_string(),
            value: node.value.clone(),
            anchor: node.anchor.clone(),
            alias: node.alias.map(|target| target.0),
            is_map_key: node.is_map_key,
        })
        .collect()
}

fn render_text(reports: &[FileReport]) -> Vec<String> {
    let mut lines = Vec::new();
    for report in reports {
        for document in &report.documents {
            lines.push(format!("# {} (document {})", report.file.display(), document.index));
            for node in &document.nodes {
                lines.push(render_node(node));
            }
        }
    }
    lines
}

fn render_node(node: &NodeSummary) -> String {
    let path = if node.path.is_empty() { "$" } else { node.path.as_str() };
    let mut line = format!(
        "@{} {} {} {} {}",
        node.id, path, node.kind, display_or_dash(&node.tag), node.style
    );
    if !node.value.is_empty() {
        line.push_str(&format!(" {:?}", node.value));
    }
    if !node.anchor.is_empty() {
        line.push_str(&format!(" &{}", node.anchor));
    }
    if let Some(target) = node.alias {
        line.push_str(&format!(" -> @{}", target));
    }
    if node.is_map_key {
        line.push_str(" (key)");
    }
    line
}

fn display_or_dash(text: &str) -> &str {
    if text.is_empty() {
        "-"
    } else {
        text
    }
}
