use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use crate::codec::decode_gray;
use crate::core::wire;
use crate::fifo;

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Named pipe to stream over (created if missing)
    #[arg(long, default_value = "/tmp/imgpipe")]
    pub fifo: PathBuf,

    /// Input image, decoded as 8-bit grayscale
    #[arg(long)]
    pub input: PathBuf,
}

/// Producer side: decode the input image and stream it over the pipe.
/// Exactly one transfer per pipe session.
pub fn run(args: SendArgs) -> Result<()> {
    let image = decode_gray(&args.input)?;
    info!(
        "loaded {}: {}x{} grayscale",
        args.input.display(),
        image.width(),
        image.height()
    );

    fifo::ensure_fifo(&args.fifo)?;
    // blocks here until the consumer opens its end
    let mut writer = fifo::open_writer(&args.fifo)?;
    wire::write_image(&mut writer, &image)
        .with_context(|| format!("streaming over {}", args.fifo.display()))?;
    info!("sent {} payload bytes", image.len());
    Ok(())
}
