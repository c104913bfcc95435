use cropmap::models::{CropRecord, CropTable};
use cropmap::scale::ColorScale;
use cropmap::stats::{self, ChartData};
use cropmap::viz::{self, ChartOptions};
use std::fs;
use tempfile::tempdir;

fn sample_chart() -> (ChartData, ColorScale) {
    let mut t = CropTable::default();
    for (i, area) in [400_000.0, 120_000.0, 15_000.5, 800.0, 12.0].into_iter().enumerate() {
        t.insert(
            "Soja",
            &format!("51000{i:02}"),
            CropRecord::new(area, &format!("Município {i}"), "MT"),
        );
    }
    let chart = stats::top_municipalities(&t, "Soja", stats::TOP_N).unwrap();
    let scale = ColorScale::new(stats::crop_range(t.get("Soja").unwrap()), "#4CAF50");
    (chart, scale)
}

#[test]
fn svg_string_contains_labels_and_scale_colors() {
    let (chart, scale) = sample_chart();
    let svg = viz::render_chart_svg(&chart, &scale, &ChartOptions::default()).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains("Município 0 (MT)"));
    assert!(svg.contains("Top 5 Municípios - Soja"));
    let darkest = scale.color_for_value(Some(400_000.0));
    assert!(
        svg.to_ascii_lowercase().contains(&darkest),
        "bar fill {darkest} missing"
    );
}

#[test]
fn writes_svg_and_png_files() {
    let (chart, scale) = sample_chart();
    let dir = tempdir().unwrap();
    for name in ["chart.svg", "chart.png"] {
        let path = dir.path().join(name);
        viz::plot_chart(&chart, &scale, &path, &ChartOptions::default()).unwrap();
        let meta = fs::metadata(&path).expect("file created");
        assert!(meta.len() > 0, "{name} has content");
    }
}

#[test]
fn custom_title_and_no_legend() {
    let (chart, scale) = sample_chart();
    let opts = ChartOptions {
        title: "Soja em Mato Grosso".into(),
        legend_steps: 0,
        ..ChartOptions::default()
    };
    let svg = viz::render_chart_svg(&chart, &scale, &opts).unwrap();
    assert!(svg.contains("Soja em Mato Grosso"));
    assert!(!svg.contains("Sem dados"));
}

#[test]
fn empty_chart_is_an_error() {
    let chart = ChartData {
        labels: vec![],
        data: vec![],
        crop_name: "Trigo".into(),
    };
    let scale = ColorScale::new(Default::default(), "#4CAF50");
    assert!(viz::render_chart_svg(&chart, &scale, &ChartOptions::default()).is_err());
}
