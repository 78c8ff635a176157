use std::io::Read as _;

use super::*;
use crate::foundation::core::Rgba8;
use crate::pack::spec::default_specs;
use crate::session::observer::{EventLog, NullObserver};

fn opts(policy: FixedNamePolicy) -> PackOptions {
    PackOptions {
        specs: default_specs(),
        padding: 10,
        filter: ResampleFilter::default(),
        fixed_name_policy: policy,
        archive_name: DEFAULT_ARCHIVE_NAME.to_string(),
    }
}

fn master(seq: usize, color: Rgba8) -> MasterImage {
    MasterImage {
        bitmap: Bitmap::filled(40, 30, color).unwrap(),
        original_name: format!("img{seq}.png"),
        sequence_index: seq,
    }
}

fn entry(path: &str, seq: usize) -> ArchiveEntry {
    ArchiveEntry {
        path: path.to_string(),
        png: vec![seq as u8],
        sequence_index: seq,
        spec_name: "x".to_string(),
    }
}

fn zip_names(bytes: &[u8]) -> Vec<String> {
    let mut z = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..z.len())
        .map(|i| z.by_index(i).unwrap().name().to_string())
        .collect()
}

#[test]
fn resolve_paths_last_and_first_wins() {
    let entries = vec![
        entry("main/main.png", 0),
        entry("stickers/01.png", 0),
        entry("main/main.png", 1),
        entry("stickers/02.png", 1),
    ];

    let last = resolve_paths(&entries, FixedNamePolicy::LastWins);
    let got: Vec<_> = last.iter().map(|e| (e.path.as_str(), e.sequence_index)).collect();
    assert_eq!(
        got,
        vec![("main/main.png", 1), ("stickers/01.png", 0), ("stickers/02.png", 1)]
    );

    let first = resolve_paths(&entries, FixedNamePolicy::FirstWins);
    assert_eq!(first[0].sequence_index, 0);
    assert_eq!(first.len(), 3);
}

#[test]
fn write_zip_is_deterministic_and_readable() {
    let entries = vec![entry("tab/tab.png", 0), entry("stickers/01.png", 0)];
    let (a, paths) = write_zip(&entries, FixedNamePolicy::LastWins).unwrap();
    let (b, _) = write_zip(&entries, FixedNamePolicy::LastWins).unwrap();
    assert_eq!(a, b);
    assert_eq!(paths, vec!["tab/tab.png", "stickers/01.png"]);
    assert_eq!(zip_names(&a), paths);

    let mut z = zip::ZipArchive::new(Cursor::new(a.as_slice())).unwrap();
    let mut buf = Vec::new();
    z.by_name("stickers/01.png")
        .unwrap()
        .read_to_end(&mut buf)
        .unwrap();
    assert_eq!(buf, vec![0u8]);
}

#[test]
fn build_renders_three_entries_per_master() {
    let o = opts(FixedNamePolicy::LastWins);
    let masters: Vec<_> = (0..12).map(|i| master(i, Rgba8::rgb(10, 20, 30))).collect();

    let mut log = EventLog::new();
    let mut builder = PackageBuilder::new(&o);
    let archive = builder.build(&masters, &mut log).unwrap();

    assert_eq!(archive.rendered_entries, 36);
    assert_eq!(archive.file_name, "Sticker_Pack_Premium.zip");
    assert_eq!(archive.paths.len(), 12 + 2);
    assert!(archive.paths.contains(&"stickers/12.png".to_string()));
    assert!(!archive.paths.iter().any(|p| p.ends_with("012.png")));
    assert_eq!(zip_names(&archive.bytes), archive.paths);

    let rendered = log
        .events
        .iter()
        .filter(|e| matches!(e, PipelineEvent::EntryRendered { .. }))
        .count();
    assert_eq!(rendered, 36);
    assert!(matches!(
        log.events.last(),
        Some(PipelineEvent::ArchiveBuilt { files: 14, .. })
    ));

    // One surface serves every rendition.
    let st = builder.surface_stats();
    assert_eq!(st.resets, 36);
    assert_eq!(st.peak_bytes, 370 * 320 * 4);
}

#[test]
fn render_entries_orders_masters_then_specs() {
    let o = opts(FixedNamePolicy::LastWins);
    let masters = vec![master(0, Rgba8::WHITE), master(1, Rgba8::WHITE)];
    let entries = PackageBuilder::new(&o)
        .render_entries(&masters, &mut NullObserver)
        .unwrap();
    let paths: Vec<_> = entries.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "main/main.png",
            "tab/tab.png",
            "stickers/01.png",
            "main/main.png",
            "tab/tab.png",
            "stickers/02.png",
        ]
    );
}

#[test]
fn build_without_masters_is_rejected() {
    let o = opts(FixedNamePolicy::LastWins);
    let err = PackageBuilder::new(&o)
        .build(&[], &mut NullObserver)
        .unwrap_err();
    assert!(matches!(err, StickerError::Export(_)));
}

#[test]
fn build_aborts_on_unrenderable_master() {
    let o = opts(FixedNamePolicy::LastWins);
    let mut bad = master(1, Rgba8::WHITE);
    bad.bitmap = Bitmap::new(0, 0).unwrap();
    let masters = vec![master(0, Rgba8::WHITE), bad];
    let err = PackageBuilder::new(&o)
        .build(&masters, &mut NullObserver)
        .unwrap_err();
    assert!(matches!(err, StickerError::Export(_)));
}

#[test]
fn write_to_path_replaces_atomically() {
    let dir = PathBuf::from("target").join("unit_pack_archive");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("pack.zip");
    let _ = std::fs::remove_file(&path);

    let (bytes, paths) = write_zip(&[entry("tab/tab.png", 0)], FixedNamePolicy::LastWins).unwrap();
    let archive = PackArchive {
        file_name: "pack.zip".to_string(),
        bytes,
        paths,
        rendered_entries: 1,
    };
    archive.write_to_path(&path).unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), archive.bytes);

    let leftovers = std::fs::read_dir(&dir)
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().ends_with(".partial"))
        .count();
    assert_eq!(leftovers, 0);

    let written = archive.write_to_dir(&dir).unwrap();
    assert_eq!(written, path);
}

#[test]
fn render_single_names_outputs_by_spec() {
    let o = opts(FixedNamePolicy::LastWins);
    let src = Bitmap::filled(500, 500, Rgba8::rgb(200, 0, 0)).unwrap();
    let outputs = PackageBuilder::new(&o).render_single(&src).unwrap();

    let names: Vec<_> = outputs.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["main.png", "tab.png", "sticker.png"]);

    let sticker = crate::raster::codec::decode_bitmap(&outputs[2].1).unwrap();
    assert_eq!((sticker.width, sticker.height), (370, 320));
    assert_eq!(sticker.opaque_bounds(), Some((35, 10, 300, 300)));
}
