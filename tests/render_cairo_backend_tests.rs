#![cfg(feature = "cairo-backend")]

use card_compare::core::{ComparisonRecord, MatrixBuildOptions, build_comparison_matrix};
use card_compare::export::{ExportConfig, ExportRequest, render_export};
use card_compare::render::{
    CairoRenderer, Color, RectPrimitive, RenderFrame, Renderer, TextHAlign, TextPrimitive, Viewport,
};
use chrono::{TimeZone, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn cairo_renderer_requires_a_rendered_frame_before_encoding() {
    let renderer = CairoRenderer::new();
    assert!(renderer.encode_png().is_err());
}

#[test]
fn cairo_renderer_draws_rects_and_texts() {
    let mut renderer = CairoRenderer::new();
    let frame = RenderFrame::new(Viewport::new(320, 120))
        .with_rect(RectPrimitive::filled(0.0, 0.0, 320.0, 40.0, Color::rgb(0.2, 0.2, 0.6)))
        .with_text(
            TextPrimitive::new(
                "Dining",
                10.0,
                50.0,
                14.0,
                Color::rgb(0.0, 0.0, 0.0),
                TextHAlign::Left,
            )
            .bold(),
        );

    renderer.render(&frame).expect("render");
    let stats = renderer.last_stats();
    assert_eq!(stats.rects_drawn, 1);
    assert_eq!(stats.texts_drawn, 1);

    let image = renderer.encode_png().expect("png");
    assert!(image.has_png_signature());
    assert_eq!((image.width, image.height), (320, 120));
}

#[test]
fn cairo_export_matches_canvas_width() {
    let records = vec![
        ComparisonRecord::new("a", "HDFC", "Regalia").with_category("dining", "5%"),
        ComparisonRecord::new("b", "SBI", "Cashback").with_category("dining", "3%"),
    ];
    let matrix = build_comparison_matrix(&records, &MatrixBuildOptions::default());
    let config = ExportConfig::default();
    let request = ExportRequest::new("Asha", Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap());
    let mut renderer = CairoRenderer::new();

    let artifact = render_export(
        &mut renderer,
        &matrix,
        &config,
        &request,
        &mut StdRng::seed_from_u64(1),
    )
    .expect("export");

    assert!(artifact.image.has_png_signature());
    assert_eq!(f64::from(artifact.image.width), config.canvas_width_px);
    let surface = renderer.surface().expect("surface");
    assert_eq!(surface.width(), 1200);
}
