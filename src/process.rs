use std::path::PathBuf;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use clap::Args;
use tracing::info;

use crate::codec::encode_gray;
use crate::core::{engine, wire, FilterMode};
use crate::fifo;

#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Named pipe to receive the image from
    #[arg(long, default_value = "/tmp/imgpipe")]
    pub fifo: PathBuf,

    /// Output image path; the format follows the extension
    #[arg(long)]
    pub out: PathBuf,

    /// Filter to apply: negative or slice
    #[arg(long, default_value = "negative")]
    pub mode: String,

    /// Lower slice threshold (slice mode only)
    #[arg(long)]
    pub t1: Option<u8>,

    /// Upper slice threshold (slice mode only)
    #[arg(long)]
    pub t2: Option<u8>,

    /// Worker thread count
    #[arg(long, default_value_t = 4)]
    pub threads: usize,
}

/// Consumer side: receive one image over the pipe, filter it across the
/// worker pool, and save the result.
pub fn run(args: ProcessArgs) -> Result<()> {
    let mode = parse_mode(&args)?;

    // blocks here until the producer opens its end
    let mut reader = fifo::open_reader(&args.fifo)?;
    let source = wire::read_image(&mut reader)
        .with_context(|| format!("receiving image over {}", args.fifo.display()))?;
    drop(reader);
    info!(
        "received {}x{} image over {}",
        source.width(),
        source.height(),
        args.fifo.display()
    );

    let start = Instant::now();
    let result = engine::run(&source, mode, args.threads)?;
    info!(
        "filtered {} rows with {} in {} ms using {} threads",
        result.height(),
        mode,
        start.elapsed().as_millis(),
        args.threads
    );

    encode_gray(&result, &args.out)?;
    info!("saved {}", args.out.display());
    Ok(())
}

fn parse_mode(args: &ProcessArgs) -> Result<FilterMode> {
    match args.mode.as_str() {
        "negative" => Ok(FilterMode::Negative),
        "slice" => {
            let t1 = args.t1.ok_or_else(|| anyhow!("slice mode requires --t1"))?;
            let t2 = args.t2.ok_or_else(|| anyhow!("slice mode requires --t2"))?;
            Ok(FilterMode::Slice { t1, t2 })
        }
        other => Err(anyhow!("unknown mode '{}'. Available: negative, slice", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> ProcessArgs {
        ProcessArgs {
            fifo: PathBuf::from("/tmp/imgpipe"),
            out: PathBuf::from("out.png"),
            mode: "negative".into(),
            t1: None,
            t2: None,
            threads: 4,
        }
    }

    #[test]
    fn test_parse_negative() {
        assert_eq!(parse_mode(&base_args()).unwrap(), FilterMode::Negative);
    }

    #[test]
    fn test_parse_slice_requires_thresholds() {
        let mut args = base_args();
        args.mode = "slice".into();
        assert!(parse_mode(&args).is_err());
        args.t1 = Some(60);
        args.t2 = Some(180);
        assert_eq!(
            parse_mode(&args).unwrap(),
            FilterMode::Slice { t1: 60, t2: 180 }
        );
    }

    #[test]
    fn test_parse_unknown_mode() {
        let mut args = base_args();
        args.mode = "sepia".into();
        assert!(parse_mode(&args).is_err());
    }
}
