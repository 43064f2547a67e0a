use std::fs;
use std::path::PathBuf;

fn data_files(kind: &str) -> Vec<PathBuf> {
    let dir = PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/data")).join(kind);
    let mut files: Vec<PathBuf> = fs::read_dir(&dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.extension().is_some_and(|e| e == "fld"))
        .collect();
    files.sort();
    assert!(!files.is_empty(), "no data files in {}", dir.display());
    files
}

#[test]
fn valid_files_parse() {
    for path in data_files("valid") {
        let src = fs::read_to_string(&path).unwrap();
        let name = path.display().to_string();
        integ_tests::with_document("valid", &src, |doc| {
            assert!(doc.bytes_used() <= doc.capacity(), "{name}");
            // Every field is reachable again through its own path.
            for field in doc.iter_recursive() {
                let found = doc.get_path(&field.path());
                assert!(found.is_some(), "{name}: {}", field.path());
            }
        });
    }
}

#[test]
fn invalid_files_fail_with_positions_inside_the_source() {
    for path in data_files("invalid") {
        let src = fs::read_to_string(&path).unwrap();
        let (err, rendered) = integ_tests::parse_err("invalid", &src);
        let lines = src.lines().count() as u32;
        assert!(err.line >= 1 && err.line <= lines + 1, "{}: {err:?}", path.display());
        assert!(err.column >= 1, "{}: {err:?}", path.display());
        assert!(
            rendered.contains(err.kind.code()),
            "{}: {rendered}",
            path.display()
        );
    }
}
