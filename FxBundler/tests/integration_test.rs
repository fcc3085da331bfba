use fxbundler::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const LECTERN: &str = r#"{
    "embedded_textures": [{"name": "lectern_diff"}],
    "shader_textures": [{"name": "lectern_spec"}]
}"#;

/// A small corpus around a church lectern prop
fn church_corpus() -> MemoryArchive {
    MemoryArchive::new()
        .with_file("x64c.rpf/props/lectern.ydr", LECTERN)
        .with_file("x64c.rpf/props/lectern.ytd", r#"{"textures": [{"name": "lectern_diff"}]}"#)
        .with_file(
            "x64t.rpf/textures/lectern_spec.ytd",
            r#"{"textures": [{"name": "lectern_spec"}]}"#,
        )
        .with_file("x64t.rpf/textures/unrelated.ytd", r#"{"textures": [{"name": "streetlight"}]}"#)
        .with_file("x64v.rpf/vehicles/adder.yft", r#"{"shader_textures": []}"#)
}

fn roots(index: &MemoryArchive, paths: &[&str]) -> Vec<ArchiveEntry> {
    select_roots(index, paths).unwrap()
}

fn stream_files(package_root: &Path) -> HashSet<String> {
    fs::read_dir(package_root.join("stream"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn test_lectern_end_to_end() {
    let temp = tempdir().unwrap();
    let index = church_corpus();
    let options = PackageOptions::new("church_lectern", temp.path());

    let report = bundle(
        &index,
        &JsonResourceAdapter::new(),
        &roots(&index, &["lectern.ydr"]),
        &options,
        &ResolverTables::default(),
    )
    .unwrap();

    let files = stream_files(&options.package_root());
    assert!(files.contains("lectern.ydr"));
    assert!(files.contains("lectern.ytd"));
    assert!(files.contains("lectern_spec.ytd"));
    assert!(!files.contains("unrelated.ytd"));
    assert!(!files.contains("adder.yft"));
    assert!(report.is_clean(), "{:?}", report.warnings);

    let manifest = fs::read_to_string(&report.package.manifest_path).unwrap();
    assert!(manifest.contains("files {\n    'stream/*.ydr',"));
    assert!(manifest.contains("data_file 'DLC_ITYP_REQUEST' 'stream/*.ytyp'"));
    assert!(!manifest.contains("VEHICLE_FILE"));
    assert!(!manifest.contains("client_script"));
    assert!(report.package.loader_script.is_none());
}

#[test]
fn test_exact_reference_beats_naming() {
    let temp = tempdir().unwrap();
    // The only dictionary holding the texture has a name unrelated to the model
    let index = MemoryArchive::new()
        .with_file("a.rpf/lectern.ydr", r#"{"shader_textures": [{"name": "wood_grain_07"}]}"#)
        .with_file("b.rpf/zz_misc_17.ytd", r#"{"textures": [{"name": "wood_grain_07"}]}"#);
    let options = PackageOptions::new("lectern", temp.path());

    bundle(
        &index,
        &JsonResourceAdapter::new(),
        &roots(&index, &["lectern.ydr"]),
        &options,
        &ResolverTables::default(),
    )
    .unwrap();

    assert!(stream_files(&options.package_root()).contains("zz_misc_17.ytd"));
}

#[test]
fn test_texture_shipped_in_one_dictionary() {
    let temp = tempdir().unwrap();
    let index = MemoryArchive::new()
        .with_file("p.rpf/lectern.ydr", r#"{"embedded_textures": [{"name": "lectern_diff"}]}"#)
        .with_file("x.rpf/lectern.ytd", r#"{"textures": [{"name": "lectern_diff"}]}"#)
        .with_file("y.rpf/zz_misc_old.ytd", r#"{"textures": [{"name": "lectern_diff"}]}"#);
    let options = PackageOptions::new("church_lectern", temp.path());

    let report = bundle(
        &index,
        &JsonResourceAdapter::new(),
        &roots(&index, &["lectern.ydr"]),
        &options,
        &ResolverTables::default(),
    )
    .unwrap();

    let holders: Vec<&str> = report
        .resolved
        .iter()
        .filter(|e| e.kind() == AssetKind::TextureDictionary)
        .map(ArchiveEntry::path)
        .collect();
    assert_eq!(holders, vec!["x.rpf/lectern.ytd"]);
    assert!(!stream_files(&options.package_root()).contains("zz_misc_old.ytd"));
    assert!(report.is_clean(), "{:?}", report.warnings);
}

#[test]
fn test_unreadable_dictionary_is_reported() {
    let temp = tempdir().unwrap();
    let index = MemoryArchive::new()
        .with_file("a.rpf/lectern.ydr", r#"{"shader_textures": [{"name": "wood_grain_07"}]}"#)
        .with_file("b.rpf/zz_misc_17.ytd", b"RSC7\x00\x01".to_vec());
    let options = PackageOptions::new("lectern", temp.path());

    let report = bundle(
        &index,
        &JsonResourceAdapter::new(),
        &roots(&index, &["lectern.ydr"]),
        &options,
        &ResolverTables::default(),
    )
    .unwrap();

    assert!(!report.is_clean());
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].entry, "b.rpf/zz_misc_17.ytd");
    assert_eq!(report.warnings[0].step, ResolveStep::Textures);
    assert!(!report.roots[0].complete);
}

#[test]
fn test_rerun_never_overwrites() {
    let temp = tempdir().unwrap();
    let index = church_corpus();
    let options = PackageOptions::new("church_lectern", temp.path());
    let selection = roots(&index, &["lectern.ydr"]);
    let adapter = JsonResourceAdapter::new();
    let tables = ResolverTables::default();

    let first = bundle(&index, &adapter, &selection, &options, &tables).unwrap();
    assert_eq!(first.package.written.len(), 3);

    let edited = options.asset_root().join("lectern.ytd");
    fs::write(&edited, "edited by hand").unwrap();

    let second = bundle(&index, &adapter, &selection, &options, &tables).unwrap();
    assert!(second.package.written.is_empty());
    assert_eq!(second.package.skipped_existing.len(), 3);
    assert_eq!(fs::read_to_string(&edited).unwrap(), "edited by hand");
    // The manifest is regenerated
    assert!(second.package.manifest_path.exists());
}

#[test]
fn test_failure_isolation() {
    let temp = tempdir().unwrap();
    let index = MemoryArchive::new()
        .with_file("a.rpf/bench.ydr", r#"{"shader_textures": [{"name": "bench_wood"}]}"#)
        .with_file("a.rpf/bench_wood.ytd", r#"{"textures": [{"name": "bench_wood"}]}"#)
        .with_file("a.rpf/broken.ydr", b"RSC7\x00\x01\x02".to_vec())
        .with_file("a.rpf/pew.ydr", r#"{"shader_textures": [{"name": "pew_cloth"}]}"#)
        .with_file("a.rpf/pew_cloth.ytd", r#"{"textures": [{"name": "pew_cloth"}]}"#);
    let options = PackageOptions::new("church", temp.path());

    let report = bundle(
        &index,
        &JsonResourceAdapter::new(),
        &roots(&index, &["bench.ydr", "broken.ydr", "pew.ydr"]),
        &options,
        &ResolverTables::default(),
    )
    .unwrap();

    let files = stream_files(&options.package_root());
    for name in ["bench.ydr", "bench_wood.ytd", "pew.ydr", "pew_cloth.ytd"] {
        assert!(files.contains(name), "{name} missing");
    }

    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].entry, "a.rpf/broken.ydr");
    assert_eq!(report.warnings[0].step, ResolveStep::Root);
    assert!(report.roots[0].complete);
    assert!(!report.roots[1].complete);
    assert!(report.roots[2].complete);
}

#[test]
fn test_fragment_only_manifest() {
    let temp = tempdir().unwrap();
    let index = MemoryArchive::new()
        .with_file("v.rpf/adder.yft", r#"{"shader_textures": [{"name": "adder_sign_1"}]}"#)
        .with_file("v.rpf/adder.ytd", r#"{"textures": [{"name": "adder_sign_1"}]}"#);
    let options = PackageOptions::new("adder", temp.path());

    let report = bundle(
        &index,
        &JsonResourceAdapter::new(),
        &roots(&index, &["adder.yft"]),
        &options,
        &ResolverTables::default(),
    )
    .unwrap();

    let manifest = fs::read_to_string(&report.package.manifest_path).unwrap();
    assert!(manifest.contains("data_file 'VEHICLE_FILE' 'stream/*.yft'"));
    assert!(!manifest.contains("DLC_MAP_DATA"));
    assert!(manifest.contains("client_script 'client.lua'"));
    assert!(options.package_root().join("client.lua").exists());
}

#[test]
fn test_placement_map_brings_loader_script() {
    let temp = tempdir().unwrap();
    let index = MemoryArchive::new()
        .with_file("p.rpf/lectern.ydr", r#"{}"#)
        .with_file("m.rpf/church_interior.ymap", r#"{"archetypes": ["lectern", "pew"]}"#)
        .with_file("m.rpf/town_square.ymap", r#"{"archetypes": ["fountain"]}"#);
    let options = PackageOptions::new("church", temp.path());

    let report = bundle(
        &index,
        &JsonResourceAdapter::new(),
        &roots(&index, &["lectern.ydr"]),
        &options,
        &ResolverTables::default(),
    )
    .unwrap();

    let files = stream_files(&options.package_root());
    assert!(files.contains("church_interior.ymap"));
    assert!(!files.contains("town_square.ymap"));

    let manifest = fs::read_to_string(&report.package.manifest_path).unwrap();
    assert!(manifest.contains("data_file 'DLC_MAP_DATA' 'stream/*.ymap'"));
    assert!(!manifest.contains("VEHICLE_FILE"));
    assert_eq!(
        report.package.loader_script,
        Some(options.package_root().join("client.lua"))
    );
}

#[test]
fn test_shared_texture_written_once() {
    let temp = tempdir().unwrap();
    let index = MemoryArchive::new()
        .with_file("a.rpf/chair.ydr", r#"{"shader_textures": [{"name": "oak_planks"}]}"#)
        .with_file("b.rpf/table.ydr", r#"{"shader_textures": [{"name": "oak_planks"}]}"#)
        .with_file("c.rpf/oak.ytd", r#"{"textures": [{"name": "oak_planks"}]}"#)
        .with_file("d.rpf/oak.ytd", r#"{"textures": [{"name": "oak_planks"}]}"#);
    let options = PackageOptions::new("furniture", temp.path());

    let report = bundle(
        &index,
        &JsonResourceAdapter::new(),
        &roots(&index, &["chair.ydr", "table.ydr"]),
        &options,
        &ResolverTables::default(),
    )
    .unwrap();

    let dictionaries: Vec<&ArchiveEntry> = report
        .resolved
        .iter()
        .filter(|e| e.kind() == AssetKind::TextureDictionary)
        .collect();
    assert_eq!(dictionaries.len(), 1);
    assert_eq!(dictionaries[0].path(), "c.rpf/oak.ytd");

    let written: Vec<String> = report
        .package
        .written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(written.iter().filter(|n| *n == "oak.ytd").count(), 1);
}

#[test]
fn test_table_overrides() {
    let temp = tempdir().unwrap();
    let index = MemoryArchive::new()
        .with_file("a.rpf/lectern.ydr", r#"{}"#)
        .with_file("s.rpf/vehshare.ytd", r#"{"textures": []}"#)
        .with_file("s.rpf/church_share.ytd", r#"{"textures": []}"#);
    let selection = roots(&index, &["lectern.ydr"]);
    let adapter = JsonResourceAdapter::new();

    let defaults = bundle(
        &index,
        &adapter,
        &selection,
        &PackageOptions::new("defaults", temp.path()),
        &ResolverTables::default(),
    )
    .unwrap();
    let names: Vec<&str> = defaults.resolved.iter().map(ArchiveEntry::name).collect();
    assert_eq!(names, vec!["lectern.ydr", "vehshare.ytd"]);

    let tables = ResolverTables::from_toml_str(r#"shared_dictionaries = ["church_share.ytd"]"#).unwrap();
    let custom = bundle(
        &index,
        &adapter,
        &selection,
        &PackageOptions::new("custom", temp.path()),
        &tables,
    )
    .unwrap();
    let names: Vec<&str> = custom.resolved.iter().map(ArchiveEntry::name).collect();
    assert_eq!(names, vec!["lectern.ydr", "church_share.ytd"]);
}

#[test]
fn test_directory_corpus() {
    let corpus = tempdir().unwrap();
    let props = corpus.path().join("x64c.rpf").join("props");
    fs::create_dir_all(&props).unwrap();
    fs::write(props.join("lectern.ydr"), LECTERN).unwrap();
    fs::write(props.join("lectern.ytd"), r#"{"textures": [{"name": "lectern_diff"}]}"#).unwrap();
    fs::write(props.join("lectern.ybn"), "bounds").unwrap();

    let index = DirectoryArchive::open(corpus.path()).unwrap();
    let selection = select_roots(&index, &["lectern.ydr"]).unwrap();
    assert_eq!(selection[0].archive(), "x64c.rpf");

    let out = tempdir().unwrap();
    let options = PackageOptions::new("church_lectern", out.path());
    let report = bundle(
        &index,
        &JsonResourceAdapter::new(),
        &selection,
        &options,
        &ResolverTables::default(),
    )
    .unwrap();

    assert!(report.is_clean(), "{:?}", report.warnings);
    assert_eq!(
        stream_files(&options.package_root()),
        HashSet::from([
            "lectern.ydr".to_string(),
            "lectern.ytd".to_string(),
            "lectern.ybn".to_string(),
        ])
    );
    assert_eq!(
        fs::read_to_string(options.asset_root().join("lectern.ybn")).unwrap(),
        "bounds"
    );
}
