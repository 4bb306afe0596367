//! Integration tests for safpack.

use std::fs;
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;
use tempfile::TempDir;

use safpack::{ArchiveOutcome, Packager, PackagerError, generate_manifest};

const REQUIRED: &str = "dc.title,dc.date.issued,dc.type,dc.subject";

/// A metadata table, a source directory and an output directory.
struct Workspace {
    root: TempDir,
}

impl Workspace {
    fn new(csv: &str, files: &[(&str, &str)]) -> Self {
        let root = tempfile::tempdir().expect("Failed to create temp dir");
        fs::create_dir(root.path().join("content")).unwrap();
        fs::write(root.path().join("metadata.csv"), csv).unwrap();
        let ws = Self { root };
        for (name, body) in files {
            fs::write(ws.source().join(name), body).unwrap();
        }
        ws
    }

    fn table(&self) -> PathBuf {
        self.root.path().join("metadata.csv")
    }

    fn source(&self) -> PathBuf {
        self.root.path().join("content")
    }

    fn output(&self) -> PathBuf {
        self.root.path().join("package")
    }

    fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.output().join(rel)).expect("Failed to read output file")
    }

    fn item_dirs(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(self.output()) else {
            return Vec::new();
        };
        let mut dirs: Vec<String> = entries
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_dir())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        dirs.sort();
        dirs
    }
}

/// Write a `.tar.gz` holding `files` at the given archive paths.
fn write_filegroup(path: &Path, files: &[(&str, &str)]) {
    let file = fs::File::create(path).unwrap();
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
    for (name, body) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(body.len() as u64);
        header.set_mode(0o644);
        builder.append_data(&mut header, name, body.as_bytes()).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap();
}

// =============================================================================
// Example Scenarios
// =============================================================================

#[test]
fn test_single_item_package() {
    let ws = Workspace::new(
        "filename,dc.title,dc.date.issued,dc.type,dc.subject\n\
         paper.pdf,A Study,2020,Article,Science\n",
        &[("paper.pdf", "%PDF-1.4")],
    );

    let report = Packager::new()
        .process(ws.table(), ws.source(), ws.output(), false)
        .expect("Processing failed");

    assert!(!report.has_critical_errors());
    assert!(!report.materialization_skipped);
    assert!(report.unused_files.is_empty());
    assert!(!report.lines().iter().any(|l| l.contains("[CRITICAL ERROR]")));

    assert_eq!(ws.item_dirs(), vec!["item_1"]);
    assert_eq!(ws.read("item_1/contents"), "paper.pdf\nlicense.txt\tBUNDLE:LICENSE\n");
    assert_eq!(ws.read("item_1/paper.pdf"), "%PDF-1.4");
    assert_eq!(ws.read("item_1/license.txt"), safpack::DEFAULT_LICENSE);

    let dc = ws.read("item_1/dublin_core.xml");
    assert!(dc.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(dc.contains("<dublin_core schema=\"dc\">"));
    assert_eq!(dc.matches("<dcvalue").count(), 4);
    assert!(dc.contains(r#"<dcvalue element="subject" qualifier="none">Science</dcvalue>"#));
    assert!(!ws.output().join("item_1/collections").exists());
}

#[test]
fn test_unused_file_is_informational() {
    let ws = Workspace::new(
        "filename,dc.title,dc.date.issued,dc.type,dc.subject\n\
         paper.pdf,A Study,2020,Article,Science\n",
        &[("paper.pdf", "%PDF"), ("extra.txt", "x")],
    );

    let report = Packager::new()
        .process(ws.table(), ws.source(), ws.output(), false)
        .expect("Processing failed");

    assert!(!report.has_critical_errors());
    assert_eq!(report.unused_files, vec!["extra.txt"]);

    let lines = report.lines();
    assert!(lines.iter().any(|l| l.starts_with("[INFO]")));
    assert!(lines.contains(&"\textra.txt".to_string()));
    assert_eq!(ws.item_dirs(), vec!["item_1"]);
}

#[test]
fn test_unresolved_reference_blocks_package() {
    let csv = format!("filename,{}\na.pdf,A,2020,Article,X\nlost.pdf,B,2021,Article,Y\n", REQUIRED);
    let ws = Workspace::new(&csv, &[("a.pdf", "a")]);
    let packager = Packager::new();

    let verified = packager.verify(ws.table(), ws.source()).unwrap();
    assert!(verified.has_critical_errors());
    assert_eq!(verified.findings.unresolved_files.len(), 1);
    assert_eq!(verified.findings.unresolved_files[0].filename, "lost.pdf");
    assert_eq!(verified.findings.unresolved_files[0].row, 2);
    assert_eq!(
        verified.lines()[0],
        "At least one critical error -- BATCH WOULD NOT BE CREATED"
    );

    let processed = packager
        .process(ws.table(), ws.source(), ws.output(), false)
        .unwrap();
    assert!(processed.materialization_skipped);
    assert_eq!(processed.lines()[0], "At least one critical error -- BATCH NOT CREATED");
    assert!(ws.item_dirs().is_empty());
}

#[test]
fn test_one_item_per_row() {
    let csv = format!(
        "filename,{}\na.pdf,A,2020,Article,X\nb.pdf||c.pdf||,B,2021,Article,Y||Z\n,C,2022,Book,W\n",
        REQUIRED
    );
    let ws = Workspace::new(&csv, &[("a.pdf", "a"), ("b.pdf", "b"), ("c.pdf", "c")]);

    let report = Packager::new()
        .process(ws.table(), ws.source(), ws.output(), false)
        .unwrap();

    assert_eq!(report.items.len(), 3);
    assert!(report.items.iter().all(|o| o.is_ok()));
    assert_eq!(ws.item_dirs(), vec!["item_1", "item_2", "item_3"]);

    // One license marker per placed file.
    assert_eq!(
        ws.read("item_2/contents"),
        "b.pdf\nlicense.txt\tBUNDLE:LICENSE\nc.pdf\nlicense.txt\tBUNDLE:LICENSE\n"
    );
    assert_eq!(ws.read("item_3/contents"), "");
    assert_eq!(report.items[1].fields_written, 5);
}

#[test]
fn test_verify_is_idempotent() {
    let csv = format!("filename,dc.bogus,{}\nmissing.pdf,?,A,2020,Article,X\n", REQUIRED);
    let ws = Workspace::new(&csv, &[("b.txt", "b"), ("a.txt", "a")]);
    let packager = Packager::new();

    let first = packager.verify(ws.table(), ws.source()).unwrap();
    let second = packager.verify(ws.table(), ws.source()).unwrap();

    assert_eq!(first.to_string(), second.to_string());
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
    assert_eq!(first.unused_files, vec!["a.txt", "b.txt"]);
}

// =============================================================================
// Headers
// =============================================================================

#[test]
fn test_invalid_and_missing_headers() {
    let ws = Workspace::new(
        "filename,dc.title,dc.nonsense,notes\npaper.pdf,T,x,y\n",
        &[("paper.pdf", "p")],
    );

    let report = Packager::new().verify(ws.table(), ws.source()).unwrap();

    assert_eq!(report.findings.invalid_headers, vec!["dc.nonsense", "notes"]);
    assert_eq!(
        report.findings.missing_required_headers,
        vec!["dc.date.issued", "dc.type", "dc.subject"]
    );
    let lines = report.lines();
    assert!(lines.contains(&"[CRITICAL ERROR] The following 2 invalid header(s) found:".to_string()));
    assert!(lines.contains(&"\tdc.nonsense".to_string()));
}

#[test]
fn test_structural_headers_are_valid() {
    let csv = format!(
        "filename__BUNDLE:TEXT,bitstream,filegroup__PRIMARY:true,collection,{}\n,,,,A,2020,Article,X\n",
        REQUIRED
    );
    let ws = Workspace::new(&csv, &[]);

    let report = Packager::new().verify(ws.table(), ws.source()).unwrap();
    assert!(report.findings.invalid_headers.is_empty());
    assert!(!report.has_critical_errors());
}

// =============================================================================
// Materialization
// =============================================================================

#[test]
fn test_extension_schema_documents() {
    let csv = format!("{},dcterms.modified,thesis.degree.name\nA,2020,Article,X,2021-01-01,PhD\n", REQUIRED);
    let ws = Workspace::new(&csv, &[]);

    let report = Packager::new()
        .process(ws.table(), ws.source(), ws.output(), false)
        .unwrap();
    assert!(!report.has_critical_errors());

    let dcterms = ws.read("item_1/metadata_dcterms.xml");
    assert!(dcterms.contains("<dublin_core schema=\"dcterms\">"));
    assert!(dcterms.contains(r#"<dcvalue element="modified" qualifier="none">2021-01-01</dcvalue>"#));

    let thesis = ws.read("item_1/metadata_thesis.xml");
    assert!(thesis.contains(r#"<dcvalue element="degree" qualifier="name">PhD</dcvalue>"#));
    assert_eq!(ws.read("item_1/dublin_core.xml").matches("<dcvalue").count(), 4);
}

#[test]
fn test_file_parameters() {
    let csv = format!(
        "filename,filename__BUNDLE:TEXT__PRIMARY:true,{}\nscan.tif__BUNDLE:THUMBNAIL,ocr.txt,A,2020,Article,X\n",
        REQUIRED
    );
    let ws = Workspace::new(&csv, &[("scan.tif", "s"), ("ocr.txt", "o")]);

    Packager::new()
        .process(ws.table(), ws.source(), ws.output(), false)
        .unwrap();

    assert_eq!(
        ws.read("item_1/contents"),
        "scan.tif\tBUNDLE:THUMBNAIL\nlicense.txt\tBUNDLE:LICENSE\n\
         ocr.txt\tBUNDLE:TEXT\tPRIMARY:true\nlicense.txt\tBUNDLE:LICENSE\n"
    );
}

#[test]
fn test_filegroup_placement_order() {
    let csv = format!("filegroup__BUNDLE:ORIGINAL,{}\npages.tar.gz,A,2020,Article,X\n", REQUIRED);
    let ws = Workspace::new(&csv, &[]);
    write_filegroup(
        &ws.source().join("pages.tar.gz"),
        &[
            ("img10.jpg", "10"),
            ("img2.jpg", "2"),
            ("img1.jpg", "1"),
            (".htaccess", "deny"),
            ("sub/img3.jpg", "3"),
            ("a/b/too-deep.jpg", "x"),
        ],
    );

    let report = Packager::new()
        .process(ws.table(), ws.source(), ws.output(), false)
        .unwrap();

    assert!(!report.has_critical_errors());
    assert!(report.items[0].is_ok(), "{:?}", report.items[0].error);
    assert_eq!(report.items[0].files_placed, 4);
    assert_eq!(
        ws.read("item_1/contents"),
        "img10.jpg\tBUNDLE:ORIGINAL\nimg3.jpg\tBUNDLE:ORIGINAL\n\
         img2.jpg\tBUNDLE:ORIGINAL\nimg1.jpg\tBUNDLE:ORIGINAL\n"
    );
    assert_eq!(ws.read("item_1/img3.jpg"), "3");

    let item = ws.output().join("item_1");
    assert!(!item.join(".htaccess").exists());
    assert!(!item.join("too-deep.jpg").exists());
    let leftovers = fs::read_dir(&item)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with('.'))
        .count();
    assert_eq!(leftovers, 0);
}

#[test]
fn test_corrupt_filegroup_fails_only_its_row() {
    let csv = format!("filegroup,{}\nbad.tar.gz,A,2020,Article,X\n,B,2021,Article,Y\n", REQUIRED);
    let ws = Workspace::new(&csv, &[("bad.tar.gz", "not a gzip stream")]);

    let report = Packager::new()
        .process(ws.table(), ws.source(), ws.output(), false)
        .unwrap();

    assert!(!report.items[0].is_ok());
    assert!(report.items[1].is_ok());
    assert!(
        report
            .lines()
            .iter()
            .any(|l| l.starts_with("[ERROR] Row 1 (item_1):"))
    );
}

#[test]
fn test_collections_file() {
    let csv = format!("collection,{}\n2142/1||2142/2||,A,2020,Article,X\n", REQUIRED);
    let ws = Workspace::new(&csv, &[]);

    let report = Packager::new()
        .process(ws.table(), ws.source(), ws.output(), false)
        .unwrap();

    assert_eq!(report.items[0].collections, 2);
    assert_eq!(ws.read("item_1/collections"), "2142/1\n2142/2\n");
}

#[test]
fn test_filegroup_cannot_replace_item_files() {
    let csv = format!("filegroup,{}
pages.tar.gz,A,2020,Article,X
", REQUIRED);
    let ws = Workspace::new(&csv, &[]);
    write_filegroup(
        &ws.source().join("pages.tar.gz"),
        &[
            ("pages/img1.jpg", "1"),
            ("pages/contents", "NOT A MANIFEST"),
            ("a/x.jpg", "first"),
            ("b/x.jpg", "second"),
        ],
    );

    let report = Packager::new()
        .process(ws.table(), ws.source(), ws.output(), false)
        .unwrap();

    assert!(report.items[0].is_ok(), "{:?}", report.items[0].error);
    assert_eq!(report.items[0].files_placed, 2);
    assert_eq!(report.items[0].notes.len(), 2);
    assert_eq!(ws.read("item_1/contents"), "x.jpg\nimg1.jpg\n");
    assert_eq!(ws.read("item_1/x.jpg"), "first");
}

// =============================================================================
// Re-running
// =============================================================================

#[test]
fn test_process_again_into_same_output() {
    let long = format!(
        "collection,{}
2142/1||2142/2,A,2020,Article,X
,B,2021,Article,Y
",
        REQUIRED
    );
    let ws = Workspace::new(&long, &[]);
    let packager = Packager::new();

    packager.process(ws.table(), ws.source(), ws.output(), false).unwrap();
    assert_eq!(ws.item_dirs(), vec!["item_1", "item_2"]);

    fs::write(ws.table(), format!("collection,{}
2142/1||2142/2,A,2020,Article,X
", REQUIRED)).unwrap();
    let report = packager.process(ws.table(), ws.source(), ws.output(), false).unwrap();

    assert_eq!(ws.item_dirs(), vec!["item_1"]);
    assert_eq!(report.stale_removed, vec!["item_2"]);
    assert_eq!(ws.read("item_1/collections"), "2142/1\n2142/2\n");
    assert!(report.lines().contains(&"\titem_2".to_string()));
}

#[test]
fn test_custom_license() {
    let csv = format!("{}\nA,2020,Article,X\n", REQUIRED);
    let ws = Workspace::new(&csv, &[]);

    Packager::new()
        .with_license_text("All rights reserved.")
        .process(ws.table(), ws.source(), ws.output(), false)
        .unwrap();

    assert_eq!(ws.read("item_1/license.txt"), "All rights reserved.");
}

#[test]
fn test_compressed_package() {
    let csv = format!("filename,{}\npaper.pdf,A,2020,Article,X\n", REQUIRED);
    let ws = Workspace::new(&csv, &[("paper.pdf", "p")]);

    let report = Packager::new()
        .process(ws.table(), ws.source(), ws.output(), true)
        .unwrap();

    let Some(ArchiveOutcome::Written { path, .. }) = &report.archive else {
        panic!("expected an archive, got {:?}", report.archive);
    };
    assert_eq!(path, &ws.output().join("SimpleArchiveFormat.zip"));

    let zip = zip::ZipArchive::new(fs::File::open(path).unwrap()).unwrap();
    let names: Vec<&str> = zip.file_names().collect();
    assert!(names.contains(&"item_1/contents"));
    assert!(names.contains(&"item_1/paper.pdf"));
    assert!(!names.iter().any(|n| n.ends_with(".zip")));
}

// =============================================================================
// Input Handling
// =============================================================================

#[test]
fn test_latin1_table() {
    let ws = Workspace::new("", &[]);
    let mut bytes = format!("{}\n", REQUIRED).into_bytes();
    bytes.extend_from_slice(b"Caf\xe9,2020,Article,X\n");
    fs::write(ws.table(), bytes).unwrap();

    Packager::new()
        .process(ws.table(), ws.source(), ws.output(), false)
        .unwrap();

    assert!(ws.read("item_1/dublin_core.xml").contains(">Café</dcvalue>"));
}

#[test]
fn test_empty_table_is_malformed() {
    let ws = Workspace::new("", &[]);
    let err = Packager::new().verify(ws.table(), ws.source()).unwrap_err();
    assert!(matches!(err, PackagerError::MalformedTable(_)));
}

#[test]
fn test_generated_manifest_verifies_files() {
    let ws = Workspace::new("", &[("a.pdf", "a"), ("b.pdf", "b")]);
    let table = ws.source().join("metadata.csv");

    assert_eq!(generate_manifest(ws.source(), &table).unwrap(), 2);

    let report = Packager::new().verify(&table, ws.source()).unwrap();
    assert!(report.findings.unresolved_files.is_empty());
    // The table itself sits in the source directory.
    assert_eq!(report.unused_files, vec!["metadata.csv"]);
    assert_eq!(report.findings.missing_required_headers, vec!["dc.type"]);
}
