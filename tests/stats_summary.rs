use cropmap::models::{CropRecord, CropTable, DataError};
use cropmap::stats;

fn sample_table() -> CropTable {
    let mut t = CropTable::default();
    t.insert("Soja", "5103403", CropRecord::new(120_000.0, "Cuiabá", "MT"));
    t.insert("Soja", "5107925", CropRecord::new(400_000.0, "Sorriso", "MT"));
    t.insert("Soja", "4106902", CropRecord::new(15_000.5, "Curitiba", "PR"));
    t.insert(
        "Soja",
        "3550308",
        CropRecord {
            harvested_area: None,
            ..CropRecord::new(0.0, "São Paulo", "SP")
        },
    );
    t.insert("Milho", "5107925", CropRecord::new(90_000.0, "Sorriso", "MT"));
    t.insert("Milho", "3304557", CropRecord::new(0.0, "Rio de Janeiro", "RJ"));
    t
}

#[test]
fn dataset_counts() {
    let s = stats::statistics(&sample_table());
    assert_eq!(s.total_crops, 2);
    // Sorriso appears under both crops but counts once.
    assert_eq!(s.total_municipalities, 5);
    assert_eq!(s.total_records, 6);
}

#[test]
fn ranking_is_descending_and_labelled() {
    let chart = stats::top_municipalities(&sample_table(), "Soja", 20).unwrap();
    assert_eq!(chart.crop_name, "Soja");
    assert_eq!(
        chart.labels,
        vec!["Sorriso (MT)", "Cuiabá (MT)", "Curitiba (PR)"]
    );
    assert_eq!(chart.data, vec![400_000.0, 120_000.0, 15_000.5]);
}

#[test]
fn ranking_truncates_to_n() {
    let chart = stats::top_municipalities(&sample_table(), "Soja", 2).unwrap();
    assert_eq!(chart.data.len(), 2);
    assert_eq!(chart.labels.len(), 2);
}

#[test]
fn ranking_skips_non_positive_areas() {
    let chart = stats::top_municipalities(&sample_table(), "Milho", 20).unwrap();
    assert_eq!(chart.labels, vec!["Sorriso (MT)"]);
}

#[test]
fn ranking_ties_keep_code_order() {
    let mut t = CropTable::default();
    t.insert("Café", "3100104", CropRecord::new(10.0, "B", "MG"));
    t.insert("Café", "3100005", CropRecord::new(10.0, "A", "MG"));
    let chart = stats::top_municipalities(&t, "Café", 20).unwrap();
    assert_eq!(chart.labels, vec!["A (MG)", "B (MG)"]);
}

#[test]
fn unknown_crop_is_an_error() {
    let err = stats::top_municipalities(&sample_table(), "Trigo", 20).unwrap_err();
    assert_eq!(err, DataError::UnknownCrop("Trigo".into()));
    assert_eq!(err.to_string(), "Crop \"Trigo\" not found");
}

#[test]
fn summary_counts_missing() {
    let t = sample_table();
    let s = stats::crop_summary("Soja", t.get("Soja").unwrap());
    assert_eq!(s.count, 3);
    assert_eq!(s.missing, 1);
    assert_eq!(s.min, Some(15_000.5));
    assert_eq!(s.max, Some(400_000.0));
    assert_eq!(s.median, Some(120_000.0));
    assert_eq!(s.total, 535_000.5);
}

#[test]
fn summaries_cover_every_crop() {
    let all = stats::crop_summaries(&sample_table());
    let names: Vec<_> = all.iter().map(|s| s.crop.as_str()).collect();
    assert_eq!(names, vec!["Milho", "Soja"]);
    let milho = &all[0];
    assert_eq!(milho.count, 1);
    assert_eq!(milho.missing, 1);
}

#[test]
fn crop_range_ignores_missing() {
    let t = sample_table();
    let r = stats::crop_range(t.get("Soja").unwrap());
    assert_eq!((r.min, r.max), (15_000.5, 400_000.0));
}
