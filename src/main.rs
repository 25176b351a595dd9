// Still-image driver for the `chroma_swap` library: loads the color table
// sources, runs exactly one frame pass over a decoded image, and writes the
// result back out as a PNG. Video integrations should use
// `pipeline::StreamPipeline` with their own `VideoSource` instead.

use anyhow::{bail, Context, Result};
use chroma_swap::core_modules::frame::{FrameProcessor, ProgressCounter};
use chroma_swap::core_modules::table_loader;
use chroma_swap::core_modules::utils::image_helper;
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() < 3 {
        bail!("usage: chroma_swap <table_part.json>... <input_image> <output.png>");
    }

    let (table_paths, io_paths) = args.split_at(args.len() - 2);
    let input_path = &io_paths[0];
    let output_path = &io_paths[1];

    // The table must be fully merged before any transform runs; a source
    // failure aborts here instead of producing a partial remap.
    let table = table_loader::load_color_table(table_paths)
        .await
        .context("color table construction failed")?;

    let mut frame = image_helper::load_rgba(input_path)
        .with_context(|| format!("failed to decode {input_path}"))?;
    log::info!(
        "processing {}x{} frame against {} table entries",
        frame.width(),
        frame.height(),
        table.len()
    );

    let progress = ProgressCounter::new();
    let processor = FrameProcessor::new(Arc::new(table), 0);
    processor.process(&mut frame, &progress);

    image_helper::save(output_path, &frame)
        .with_context(|| format!("failed to encode {output_path}"))?;
    log::info!("wrote {output_path} (progress {}%)", progress.get());

    Ok(())
}
