use std::path::PathBuf;

use tlpdb_core::{
    Database, InstallOption, ParseError, ParseOptions, Parser, INSTALLATION_PACKAGE,
    OPTION_PREFIX,
};

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("texlive.tlpdb")
}

fn load() -> Database {
    Database::from_path(fixture(), ParseOptions::default()).unwrap()
}

#[test]
fn test_fixture_records_and_index() {
    let db = load();
    let names: Vec<_> = db.iter().map(|p| p.name()).collect();
    assert_eq!(
        names,
        [
            "00texlive.config",
            "00texlive.installation",
            "a2ping",
            "a2ping.x86_64-linux",
            "amsfonts",
        ]
    );
    for (idx, pkg) in db.iter().enumerate() {
        assert_eq!(db.position(pkg.name()), Some(idx));
    }
    assert_eq!(db.categories(), ["TLCore", "Package"]);
}

#[test]
fn test_fixture_a2ping() {
    let db = load();
    let pkg = db.get("a2ping").unwrap();

    assert_eq!(pkg.revision(), Some(52964));
    assert!(pkg.is_relocated());
    assert_eq!(
        pkg.long_description(),
        Some(
            "a2ping is a Perl script command line utility written for Unix \
             that converts many raster image and vector graphics formats to \
             EPS or PDF and other page description formats."
        )
    );
    assert_eq!(pkg.run_size(), Some(10));
    assert_eq!(pkg.run_files(), ["texmf-dist/scripts/a2ping/a2ping.pl"]);
    assert_eq!(pkg.doc_size(), Some(6));
    assert_eq!(
        pkg.doc_files(),
        [
            "texmf-dist/doc/man/man1/a2ping.1",
            "texmf-dist/doc/support/a2ping/README",
        ]
    );
    let readme = pkg
        .doc_file_attributes("texmf-dist/doc/support/a2ping/README")
        .unwrap();
    assert_eq!(readme.get("details"), Some("Readme"));
    assert_eq!(readme.get("language"), Some("en"));
    assert!(pkg
        .doc_file_attributes("texmf-dist/doc/man/man1/a2ping.1")
        .is_none());

    assert_eq!(pkg.catalogue_id(), None);
    assert_eq!(pkg.catalogue_data().len(), 4);
    assert_eq!(
        pkg.catalogue_data().get("version").map(String::as_str),
        Some("2.83p")
    );
    assert_eq!(pkg.extra_attribute("containersize"), Some("13376"));
    assert_eq!(pkg.extra_attribute("doccontainersize"), Some("4884"));
    assert_eq!(pkg.dependencies(), ["a2ping.ARCH"]);
}

#[test]
fn test_fixture_amsfonts() {
    let db = load();
    let pkg = db.get("amsfonts").unwrap();

    assert_eq!(pkg.catalogue_id(), Some("amsfonts"));
    assert_eq!(pkg.executes(), ["addMap cmextra.map", "addMixedMap cm.map"]);
    assert_eq!(
        pkg.post_actions(),
        ["shortcut type=menu name=\"AMS fonts\" cmd=amsfonts"]
    );
    assert_eq!(pkg.source_size(), Some(40));
    assert_eq!(pkg.source_files().len(), 2);
    assert_eq!(
        pkg.bin_files_for("universal-darwin"),
        [
            "bin/universal-darwin/amsfonts-a",
            "bin/universal-darwin/amsfonts-b",
        ]
    );
    assert_eq!(pkg.bin_files_for("x86_64-linux"), ["bin/x86_64-linux/amsfonts-a"]);
    assert_eq!(pkg.bin_size().get("universal-darwin"), Some(&2));
    assert_eq!(pkg.bin_size().get("x86_64-linux"), Some(&1));
}

#[test]
fn test_fixture_installation_options() {
    let db = load();
    let opts = db
        .installation_options(INSTALLATION_PACKAGE, OPTION_PREFIX)
        .unwrap();
    let keys: Vec<_> = opts.iter().map(|o| o.key.as_str()).collect();
    assert_eq!(
        keys,
        ["autobackup", "create_formats", "desktop_integration", "location", "paper"]
    );
    assert_eq!(
        opts[3],
        InstallOption {
            key: "location".into(),
            value: "https://mirror.ctan.org/systems/texlive/tlnet".into(),
        }
    );
}

#[test]
fn test_abort_keeps_sealed_records() {
    let text = std::fs::read_to_string(fixture()).unwrap();
    let mut parser = Parser::new(ParseOptions::default());
    let mut failure = None;

    let broken = text.replace("revision 61937", "revision sixty");
    for line in broken.lines() {
        if let Err(err) = parser.feed(line.as_bytes()) {
            failure = Some(err);
            break;
        }
    }

    let err = failure.expect("the broken revision must abort the parse");
    assert!(matches!(
        err.parse_error(),
        Some(ParseError::IntegerParse { keyword, .. }) if keyword == "revision"
    ));
    assert_eq!(parser.sealed().len(), 4);
    assert_eq!(parser.open_record(), None);
}

#[test]
fn test_json_export() {
    let db = load();
    let mut out = Vec::new();
    db.write_json(&mut out, true).unwrap();

    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(value["packages"].as_array().unwrap().len(), 5);
    assert_eq!(value["index"]["amsfonts"], 4);
    assert_eq!(
        value["packages"][2]["docFileMetadata"]["texmf-dist/doc/support/a2ping/README"]["language"],
        "en"
    );
}
