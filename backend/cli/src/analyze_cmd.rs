//! `liftlens analyze`: run the pipeline over two local screenshots.

use std::path::Path;

use anyhow::{Context, Result};
use tokio::fs;

use liftlens_config::LiftLensConfig;
use liftlens_core::SubmittedImage;
use liftlens_media::{detect_media_type, AnalysisPipeline};

use crate::provider::build_model;

/// Prints the aggregated response. Returns whether the pair was analyzed.
pub async fn run(config: &LiftLensConfig, first: &Path, second: &Path) -> Result<bool> {
    let images = vec![read_image(first).await?, read_image(second).await?];

    let pipeline = AnalysisPipeline::new(build_model(&config.model)?)
        .with_classification_max_tokens(config.model.classification_max_tokens);

    let response = match pipeline.process(images).await {
        Ok(response) => response,
        Err(e) => {
            eprintln!("{e}");
            return Ok(false);
        }
    };

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(response.success)
}

async fn read_image(path: &Path) -> Result<SubmittedImage> {
    let data = fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let media_type = detect_media_type(&filename);

    Ok(SubmittedImage::new(filename, media_type, data))
}
