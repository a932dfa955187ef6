//! One-shot alignment from four eye corners.

use eyeline_alignment_core::geometry::{eye_center, EyeCenters};
use eyeline_alignment_core::{AlignmentCalculator, ReferenceConfig};
use eyeline_common::config::AppConfig;
use eyeline_overlay_model::{EyeCorners, Point};

pub fn run(
    config: &AppConfig,
    left_outer: Point,
    left_inner: Point,
    right_outer: Point,
    right_inner: Point,
) -> anyhow::Result<()> {
    let reference = ReferenceConfig::new(&config.reference)
        .map_err(|e| anyhow::anyhow!("Invalid reference asset: {e}"))?;

    let eyes = EyeCenters {
        left: eye_center(EyeCorners {
            outer: left_outer,
            inner: left_inner,
        }),
        right: eye_center(EyeCorners {
            outer: right_outer,
            inner: right_inner,
        }),
    };

    let mut calculator = AlignmentCalculator::new(reference, config.tracking.smoothing_window);
    let raw = calculator.measure(&eyes)?;
    let transform = calculator.smooth(&raw);

    let output = serde_json::json!({
        "eyes": eyes,
        "raw": raw,
        "rotation_degrees": transform.rotation_degrees(),
        "style": transform.css_style(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
