//! Example showing the tracing output of one classification and one
//! feedback write, using the deterministic mock classifier.
//!
//! Run with: cargo run -p archai-core --example classify_tracing

use archai_core::{ClassifierGateway, FeedbackRecorder, PredictionService, StyleCatalog, Verdict};
use image::{Rgb, RgbImage};
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    // Initialize tracing subscriber with debug level
    fmt()
        .with_env_filter(EnvFilter::new("archai_core=debug,info"))
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    println!("=== ArchAI Tracing Demo ===\n");

    let catalog = StyleCatalog::builtin();
    let service = PredictionService::new(ClassifierGateway::mock(&catalog), catalog);
    println!("Classifier: {}\n", service.gateway().describe());

    // A striped facade, large enough to exercise the downscale path
    let mut facade = RgbImage::new(640, 480);
    for (x, y, px) in facade.enumerate_pixels_mut() {
        let column = if (x / 40) % 2 == 0 { 210 } else { 90 };
        *px = Rgb([column, (y / 2) as u8, 150]);
    }

    println!("{}\n", service.classify_to_text(Some(&facade)));
    println!("{}\n", service.classify_to_text(None));

    let log = std::env::temp_dir().join("archai_tracing_demo.txt");
    let recorder = FeedbackRecorder::new(&log);
    println!("{}", recorder.record_verdict(Verdict::Correct));
    println!("   Log: {}", log.display());
}
