//! Check the reference asset and tracking settings.

use eyeline_alignment_core::ReferenceConfig;
use eyeline_common::config::AppConfig;

pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    println!("Eyeline Configuration Check");
    println!("{}", "=".repeat(50));

    let mut all_ok = true;

    // Reference asset
    let asset = &config.reference;
    match ReferenceConfig::new(asset) {
        Ok(reference) => {
            println!(
                "[OK] Reference asset: {}x{}",
                asset.size.width, asset.size.height
            );
            println!(
                "     eyes ({:.1}, {:.1}) / ({:.1}, {:.1}), distance {:.1}px",
                asset.left_eye_center.x,
                asset.left_eye_center.y,
                asset.right_eye_center.x,
                asset.right_eye_center.y,
                reference.inter_eye_distance()
            );
            if asset.size.is_empty() {
                println!("[WARN] Reference asset size is zero");
            }
        }
        Err(e) => {
            all_ok = false;
            println!("[FAIL] Reference asset: {e}");
        }
    }

    // Tracking settings
    let tracking = &config.tracking;
    match config.validate() {
        Ok(()) => println!("[OK] Tracking settings"),
        Err(e) => {
            all_ok = false;
            println!("[FAIL] Tracking settings: {e}");
        }
    }
    println!("     smoothing window: {}", tracking.smoothing_window);
    println!(
        "     detector: input {} / score >= {}",
        tracking.detector_input_size, tracking.detector_score_threshold
    );
    println!(
        "     display: {}x{}",
        tracking.display_size.width, tracking.display_size.height
    );
    if !tracking.show_overlay && !tracking.show_landmarks {
        println!("[WARN] Overlay and landmarks are both hidden; nothing will be drawn");
    }

    println!();
    if all_ok {
        println!("Configuration is valid. Eyeline is ready.");
        Ok(())
    } else {
        anyhow::bail!("Configuration has errors. See above for details.")
    }
}
