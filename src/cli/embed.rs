//! Embed command - fetch embeddings through the tiered cache

use clap::Args;
use serde::Serialize;

use crate::domain::cache::embedding_cache_key;

use super::bootstrap;

#[derive(Args, Debug)]
pub struct EmbedArgs {
    /// Texts to embed
    #[arg(required = true)]
    pub texts: Vec<String>,

    /// Include the full vectors in the output
    #[arg(long)]
    pub vectors: bool,
}

#[derive(Debug, Serialize)]
struct EmbeddedText<'a> {
    text: &'a str,
    cache_key: String,
    dimensions: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    vector: Option<&'a [f32]>,
}

pub async fn run(args: EmbedArgs) -> anyhow::Result<()> {
    let engine = bootstrap::start().await?;

    let vectors = engine.fetcher.fetch_embeddings(&args.texts).await?;

    let output: Vec<EmbeddedText<'_>> = args
        .texts
        .iter()
        .zip(&vectors)
        .map(|(text, vector)| EmbeddedText {
            text,
            cache_key: embedding_cache_key(text),
            dimensions: vector.len(),
            vector: args.vectors.then_some(vector.as_slice()),
        })
        .collect();

    bootstrap::print_json(&output)
}
