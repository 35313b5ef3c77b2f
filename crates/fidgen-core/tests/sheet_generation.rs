#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use fidgen_core::config::SheetConfig;
use fidgen_core::error::{ConfigError, Error};
use fidgen_core::test_utils::{FailingSink, decode_sheet_png, decode_sheets, decode_slot_ids};
use fidgen_core::{GrayCanvas, MarkerId, MemorySink, N_FIDUCIALS, PngDirectorySink, SheetGenerator};

fn config(unit: u32, columns: u32, rows: u32) -> SheetConfig {
    SheetConfig::builder()
        .unit_size(unit)
        .columns(columns)
        .rows(rows)
        .build()
}

fn all_ids() -> Vec<MarkerId> {
    MarkerId::all().collect()
}

#[test]
fn test_full_run_places_every_marker_once_in_order() {
    let generator = SheetGenerator::new(SheetConfig::default()).unwrap();
    let mut sink = MemorySink::new();
    let report = generator.generate_pages(&mut sink);

    assert!(report.is_success());
    assert_eq!(sink.sheets().len(), 3);
    assert_eq!(decode_sheets(sink.sheets(), generator.geometry()), all_ids());
}

#[test]
fn test_page_counts() {
    for (columns, rows, pages) in [(8, 5, 3), (5, 8, 3), (1, 1, 120), (10, 12, 1), (7, 3, 6)] {
        let generator = SheetGenerator::new(config(1, columns, rows)).unwrap();
        let mut sink = MemorySink::new();
        let report = generator.generate_pages(&mut sink);
        assert!(report.is_success());
        assert_eq!(report.pages.len(), pages, "{columns}x{rows}");
        assert_eq!(sink.sheets().len(), pages, "{columns}x{rows}");
    }
}

#[test]
fn test_single_slot_pages_hold_one_marker_each() {
    let generator = SheetGenerator::new(config(1, 1, 1)).unwrap();
    let mut sink = MemorySink::new();
    generator.generate_pages(&mut sink);

    assert_eq!(sink.sheets().len(), N_FIDUCIALS);
    for (p, sheet) in sink.sheets().iter().enumerate() {
        assert_eq!(sheet.name, format!("Sheet_{p:02}"));
        let ids = decode_sheet_png(&sheet.png, generator.geometry()).unwrap();
        assert_eq!(ids, vec![MarkerId::new(p).unwrap()]);
    }
    assert_eq!(sink.sheets()[119].name, "Sheet_119");
}

#[test]
fn test_trailing_slots_are_empty() {
    // 9x4 = 36 slots: the last page holds 12 markers and 24 empty slots.
    let generator = SheetGenerator::new(config(2, 9, 4)).unwrap();
    let page = generator.render_page(3).unwrap();
    let slots = decode_slot_ids(&page.canvas, generator.geometry());

    assert_eq!(slots.len(), 36);
    let expected: Vec<_> = (108..120).map(|i| Some(MarkerId::new(i).unwrap())).collect();
    assert_eq!(&slots[..12], &expected[..]);
    assert!(slots[12..].iter().all(Option::is_none));
}

#[test]
fn test_degenerate_config_is_rejected_before_drawing() {
    let mut sink = MemorySink::new();
    let err = fidgen_core::generate_pages(config(5, 0, 5), &mut sink).unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::ZeroColumns)));
    assert!(sink.sheets().is_empty());

    assert!(matches!(
        SheetGenerator::new(config(0, 8, 5)),
        Err(Error::Config(ConfigError::ZeroUnitSize))
    ));
    assert!(matches!(
        SheetGenerator::new(config(5, 8, 0)),
        Err(Error::Config(ConfigError::ZeroRows))
    ));
}

#[test]
fn test_export_failure_does_not_stop_later_pages() {
    let generator = SheetGenerator::new(config(2, 8, 5)).unwrap();
    let mut sink = FailingSink::new(["Sheet_01"]);
    let report = generator.generate_pages(&mut sink);

    assert!(!report.is_success());
    assert_eq!(sink.attempts(), ["Sheet_00", "Sheet_01", "Sheet_02"]);
    assert_eq!(report.pages.len(), 3);
    assert!(matches!(
        &report.pages[1].result,
        Err(Error::Export { name, .. }) if name == "Sheet_01"
    ));
    assert_eq!(report.failures().count(), 1);
    assert_eq!(report.artifacts().count(), 2);

    let names: Vec<_> = sink.sheets().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Sheet_00", "Sheet_02"]);
    let last = decode_sheet_png(&sink.sheets()[1].png, generator.geometry()).unwrap();
    assert_eq!(last.first().map(|id| id.index()), Some(80));
    assert_eq!(last.len(), 40);

    assert!(report.into_result().is_err());
}

#[test]
fn test_parallel_matches_sequential() {
    let generator = SheetGenerator::new(config(2, 7, 3)).unwrap();
    let mut sequential = MemorySink::new();
    let mut parallel = MemorySink::new();
    assert!(generator.generate_pages(&mut sequential).is_success());
    assert!(generator.generate_pages_parallel(&mut parallel).is_success());

    assert_eq!(sequential.sheets().len(), 6);
    assert_eq!(sequential.sheets(), parallel.sheets());
}

#[test]
fn test_render_page_matches_exported_page() {
    let generator = SheetGenerator::new(config(3, 6, 4)).unwrap();
    let mut sink = MemorySink::new();
    generator.generate_pages(&mut sink);

    for (index, sheet) in sink.sheets().iter().enumerate() {
        let page = generator.render_page(index).unwrap();
        assert_eq!(page.name(), sheet.name);
        assert_eq!(GrayCanvas::decode_png(&sheet.png).unwrap(), page.canvas);
    }
    assert!(generator.render_page(sink.sheets().len()).is_none());
}

#[test]
fn test_png_directory_output() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("sheets");
    let generator = SheetGenerator::new(config(2, 8, 5)).unwrap();
    let mut sink = PngDirectorySink::create(&out).unwrap();
    let artifacts = generator.generate_pages(&mut sink).into_result().unwrap();

    assert_eq!(artifacts.len(), 3);
    let mut ids = Vec::new();
    for (index, artifact) in artifacts.iter().enumerate() {
        let path = out.join(format!("Sheet_{index:02}.png"));
        assert_eq!(artifact.path.as_deref(), Some(path.as_path()));
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len(), artifact.bytes);
        ids.extend(decode_sheet_png(&bytes, generator.geometry()).unwrap());
    }
    assert_eq!(ids, all_ids());
}
