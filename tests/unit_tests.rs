use std::fs;
use std::path::Path;

use voc2yolo::labels::label_path;
use voc2yolo::regroup::class_folder_destination;
use voc2yolo::{
    copy_image, copy_into_class_folders, write_label, AnnotationRecord, CopyOutcome, Error,
    NormalizedBox, Split,
};

fn record(id: &str, img_uri: &str) -> AnnotationRecord {
    AnnotationRecord {
        id: id.to_string(),
        class_label: "Chihuahua".to_string(),
        width: 100,
        height: 200,
        depth: 3,
        bb_xmin: 10,
        bb_ymin: 20,
        bb_xmax: 50,
        bb_ymax: 80,
        img_uri: img_uri.to_string(),
    }
}

#[test]
fn test_normalized_box() {
    let normalized = NormalizedBox::from_record(&record("a", "")).unwrap();

    assert_eq!(normalized.x_center, 0.3);
    assert_eq!(normalized.y_center, 0.25);
    assert_eq!(normalized.width, 0.4);
    assert_eq!(normalized.height, 0.3);
}

#[test]
fn test_label_line_uses_shortest_decimal_form() {
    let normalized = NormalizedBox {
        x_center: 0.5,
        y_center: 1.0,
        width: 0.125,
        height: 0.3,
    };
    assert_eq!(normalized.to_label_line(7), "7 0.5 1.0 0.125 0.3");
}

#[test]
fn test_extreme_coordinates_do_not_overflow() {
    let mut wide = record("a", "");
    wide.bb_xmin = -1;
    wide.bb_xmax = i64::MAX;
    wide.bb_ymin = i64::MIN;
    wide.bb_ymax = 1;

    let normalized = NormalizedBox::from_record(&wide).unwrap();

    assert!(normalized.width.is_finite() && normalized.width > 0.0);
    assert!(normalized.height.is_finite() && normalized.height > 0.0);
}

#[test]
fn test_zero_image_size_fails() {
    let mut zero = record("a", "");
    zero.width = 0;
    let err = NormalizedBox::from_record(&zero).unwrap_err();
    assert!(matches!(err, Error::ZeroImageSize { .. }));
}

#[test]
fn test_write_label() {
    let temp_dir = tempfile::tempdir().unwrap();
    let dest = temp_dir.path();

    let path = write_label(&record("n02085620_7", ""), 2, dest, Split::Val, "txt").unwrap();

    assert_eq!(path, dest.join("labels/val/n02085620_7.txt"));
    assert_eq!(fs::read_to_string(&path).unwrap(), "2 0.3 0.25 0.4 0.3");
}

#[test]
fn test_write_label_rejects_unsafe_id() {
    let temp_dir = tempfile::tempdir().unwrap();
    let dest = temp_dir.path();

    for id in ["img:01", "../a", ""] {
        let err = write_label(&record(id, ""), 0, dest, Split::Train, "txt").unwrap_err();
        assert!(matches!(err, Error::InvalidPath(_)), "id {:?}", id);
    }
    assert!(!dest.join("labels/train/img01.txt").exists());
}

#[test]
fn test_write_label_overwrites() {
    let temp_dir = tempfile::tempdir().unwrap();
    let dest = temp_dir.path();
    let path = label_path(dest, Split::Train, "a", "txt").unwrap();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "stale content").unwrap();

    write_label(&record("a", ""), 0, dest, Split::Train, "txt").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "0 0.3 0.25 0.4 0.3");
}

#[test]
fn test_copy_image_is_idempotent() {
    let temp_dir = tempfile::tempdir().unwrap();
    let source = temp_dir.path().join("source.jpg");
    fs::write(&source, b"\xFF\xD8\xFFjpeg").unwrap();
    let dest = temp_dir.path().join("yolo");
    let rec = record("n02085620_7", source.to_str().unwrap());

    let first = copy_image(&rec, &dest, Split::Train).unwrap();
    let copied = dest.join("images/train/n02085620_7.jpg");
    let first_content = fs::read(&copied).unwrap();

    let second = copy_image(&rec, &dest, Split::Train).unwrap();

    assert_eq!(first, CopyOutcome::Copied);
    assert_eq!(second, CopyOutcome::Skipped);
    assert_eq!(fs::read(&copied).unwrap(), first_content);
}

#[test]
fn test_copy_image_does_not_overwrite() {
    let temp_dir = tempfile::tempdir().unwrap();
    let source = temp_dir.path().join("source.jpg");
    fs::write(&source, b"new").unwrap();
    let dest = temp_dir.path().join("yolo");
    let existing = dest.join("images/test/a.jpg");
    fs::create_dir_all(existing.parent().unwrap()).unwrap();
    fs::write(&existing, b"old").unwrap();

    let outcome = copy_image(&record("a", source.to_str().unwrap()), &dest, Split::Test).unwrap();

    assert_eq!(outcome, CopyOutcome::Skipped);
    assert_eq!(fs::read(&existing).unwrap(), b"old");
}

#[test]
fn test_copy_image_preserves_modification_time() {
    let temp_dir = tempfile::tempdir().unwrap();
    let source = temp_dir.path().join("source.jpg");
    fs::write(&source, b"jpeg").unwrap();
    let dest = temp_dir.path().join("yolo");

    copy_image(&record("a", source.to_str().unwrap()), &dest, Split::Train).unwrap();

    let source_mtime = fs::metadata(&source).unwrap().modified().unwrap();
    let dest_mtime = fs::metadata(dest.join("images/train/a.jpg"))
        .unwrap()
        .modified()
        .unwrap();
    assert_eq!(source_mtime, dest_mtime);
}

#[cfg(unix)]
#[test]
fn test_copy_image_from_read_only_source() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = tempfile::tempdir().unwrap();
    let source = temp_dir.path().join("source.jpg");
    fs::write(&source, b"jpeg").unwrap();
    fs::set_permissions(&source, fs::Permissions::from_mode(0o444)).unwrap();
    let dest = temp_dir.path().join("yolo");
    let rec = record("a", source.to_str().unwrap());

    let outcome = copy_image(&rec, &dest, Split::Train).unwrap();

    let copied = dest.join("images/train/a.jpg");
    assert_eq!(outcome, CopyOutcome::Copied);
    assert_eq!(fs::read(&copied).unwrap(), b"jpeg");
    assert_eq!(
        fs::metadata(&copied).unwrap().permissions().mode() & 0o777,
        0o444
    );
    assert_eq!(
        fs::metadata(&source).unwrap().modified().unwrap(),
        fs::metadata(&copied).unwrap().modified().unwrap()
    );
}

#[test]
fn test_copy_image_rejects_unsafe_id() {
    let temp_dir = tempfile::tempdir().unwrap();
    let source = temp_dir.path().join("source.jpg");
    fs::write(&source, b"jpeg").unwrap();
    let dest = temp_dir.path().join("yolo");

    let err = copy_image(&record("img:01", source.to_str().unwrap()), &dest, Split::Train)
        .unwrap_err();

    assert!(matches!(err, Error::InvalidPath(_)));
    assert!(!dest.join("images/train/img01.jpg").exists());
}

#[test]
fn test_copy_image_without_location_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    let err = copy_image(&record("a", ""), temp_dir.path(), Split::Train).unwrap_err();
    assert!(matches!(err, Error::MissingImage { .. }));
}

#[test]
fn test_copy_image_with_missing_source_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    let missing = temp_dir.path().join("missing.jpg");
    let err = copy_image(
        &record("a", missing.to_str().unwrap()),
        temp_dir.path(),
        Split::Train,
    )
    .unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
}

#[test]
fn test_class_folder_destination() {
    let dest = class_folder_destination(
        Path::new("Images/n02085620-Chihuahua/n02085620_7.jpg"),
        Path::new("out"),
    );
    assert_eq!(
        dest,
        Some(Path::new("out/Chihuahua/n02085620_7.jpg").to_path_buf())
    );
}

#[test]
fn test_copy_into_class_folders_counts_all_sources() {
    let temp_dir = tempfile::tempdir().unwrap();
    let breed_dir = temp_dir.path().join("Images/n02085936-Maltese_dog");
    fs::create_dir_all(&breed_dir).unwrap();
    let sources: Vec<_> = (0..3)
        .map(|i| {
            let path = breed_dir.join(format!("n02085936_{}.jpg", i));
            fs::write(&path, b"jpeg").unwrap();
            path
        })
        .collect();
    let out = temp_dir.path().join("by_class");

    // Pre-existing destination is skipped but still counted
    fs::create_dir_all(out.join("Maltese_dog")).unwrap();
    fs::write(out.join("Maltese_dog/n02085936_0.jpg"), b"old").unwrap();

    let processed = copy_into_class_folders(&sources, &out).unwrap();

    assert_eq!(processed, 3);
    assert_eq!(fs::read(out.join("Maltese_dog/n02085936_0.jpg")).unwrap(), b"old");
    assert!(out.join("Maltese_dog/n02085936_2.jpg").exists());
}
