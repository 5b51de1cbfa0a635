//! End-to-end scene workflows against a temporary project.

use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use scenekeep_ledger::naming::is_valid_name;
use scenekeep_ledger::{
    ContentHost, Ledger, LedgerConfig, LedgerError, NewScene, ReferenceStatus, SceneId,
    SceneRecord, SubProjectIndex, WorkingFileHost,
};
use tempfile::TempDir;

struct Project {
    _dir: TempDir,
    work: PathBuf,
    ledger: Ledger<WorkingFileHost>,
}

impl Project {
    fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let work = dir.path().join("work.mb");
        std::fs::write(&work, b"initial").expect("write working file");
        let ledger = Ledger::open(
            dir.path().join("proj"),
            LedgerConfig::default(),
            WorkingFileHost::new(&work),
        )
        .expect("open ledger");
        ledger.init_project().expect("init project");
        Self {
            _dir: dir,
            work,
            ledger,
        }
    }

    fn edit(&self, content: &[u8]) {
        std::fs::write(&self.work, content).expect("edit working file");
    }

    fn create(&self, shot: &str, sub_project: Option<&str>, make_reference: bool) -> SceneId {
        self.ledger
            .save_new_scene(NewScene {
                category: "Animation",
                user: "gn",
                shot_name: shot,
                sub_project,
                make_reference,
                notes: "",
            })
            .expect("save new scene")
            .id
    }
}

fn raw_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).expect("read metadata"))
        .expect("metadata is json")
}

#[test]
fn shot_a_walkthrough() {
    let project = Project::new();
    let saved = project
        .ledger
        .save_new_scene(NewScene {
            category: "Animation",
            user: "gn",
            shot_name: "ShotA",
            sub_project: None,
            make_reference: false,
            notes: "",
        })
        .expect("create ShotA");

    assert_eq!(
        saved.scene_file.file_name().and_then(|n| n.to_str()),
        Some("ShotA_Animation_gn_v001.mb")
    );
    assert_eq!(
        saved.metadata_file,
        project
            .ledger
            .layout()
            .root()
            .join("data/json/Animation/ShotA.json")
    );
    let json = raw_json(&saved.metadata_file);
    assert_eq!(json["ReferenceFile"], serde_json::Value::Null);
    assert_eq!(json["Versions"].as_array().map(Vec::len), Some(1));
    assert_eq!(json["Versions"][0].as_array().map(Vec::len), Some(3));

    project.edit(b"fixed animation");
    let v2 = project
        .ledger
        .save_version(&saved.id, "gn", true, "fix")
        .expect("save v2");
    assert_eq!(v2.version, 2);

    let host = project.ledger.host().host_identity();
    let json = raw_json(&saved.metadata_file);
    assert_eq!(
        json["Versions"][1],
        serde_json::json!([v2.scene_file.to_string_lossy(), "fix", "gn", host])
    );
    assert_eq!(json["ReferencedVersion"], 2);

    let reference = v2.reference_file.expect("reference promoted");
    assert_eq!(
        reference.file_name().and_then(|n| n.to_str()),
        Some("ShotA_Animation_forReference.mb")
    );
    assert_eq!(
        std::fs::read(&reference).expect("read reference"),
        std::fs::read(&v2.scene_file).expect("read v2")
    );
    assert_eq!(
        project.ledger.check_reference(&saved.id, true).expect("check"),
        ReferenceStatus::Ok
    );
}

#[test]
fn make_reference_flag_decides_referenced_version() {
    let project = Project::new();
    for (shot, make_reference) in [("WithRef", true), ("WithoutRef", false)] {
        let id = project.create(shot, None, make_reference);
        let record = project.ledger.load_record(&id).expect("load");
        assert_eq!(record.versions.len(), 1);
        assert_eq!(record.referenced_version, make_reference.then_some(1));
        assert_eq!(record.reference_file.is_some(), make_reference);
    }
}

#[test]
fn sequential_saves_number_versions_in_order() {
    let project = Project::new();
    let id = project.create("ShotA", None, false);

    let numbers: Vec<usize> = (0..5)
        .map(|i| {
            project.edit(format!("pass {i}").as_bytes());
            project
                .ledger
                .save_version(&id, "Generic", false, "")
                .expect("save version")
                .version
        })
        .collect();
    assert_eq!(numbers, vec![2, 3, 4, 5, 6]);

    let record = project.ledger.load_record(&id).expect("load");
    assert_eq!(record.versions.len(), 6);
    let mut names: Vec<_> = std::fs::read_dir(&record.path)
        .expect("list shot dir")
        .map(|e| e.expect("entry").file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    assert_eq!(names.first().map(String::as_str), Some("ShotA_Animation_gn_v001.mb"));
    assert_eq!(names.last().map(String::as_str), Some("ShotA_Animation_gn_v006.mb"));
}

#[test]
fn promoting_any_version_is_immediately_consistent() {
    let project = Project::new();
    let id = project.create("ShotA", None, false);
    for i in 0..3 {
        project.edit(format!("content {i}").as_bytes());
        project
            .ledger
            .save_version(&id, "gn", false, "")
            .expect("save version");
    }

    for version in [3, 1, 4, 2] {
        project
            .ledger
            .make_reference(&id, version)
            .expect("make reference");
        let record = project.ledger.load_record(&id).expect("load");
        assert_eq!(record.referenced_version, Some(version));
        assert_eq!(
            project.ledger.check_reference(&id, true).expect("deep check"),
            ReferenceStatus::Ok
        );
    }
}

#[test]
fn drift_is_detected_after_out_of_band_edit() {
    let project = Project::new();
    let id = project.create("ShotA", None, true);
    let record = project.ledger.load_record(&id).expect("load");
    std::fs::write(&record.versions[0].file, b"edited elsewhere").expect("edit v1");

    assert_eq!(
        project.ledger.check_reference(&id, false).expect("shallow"),
        ReferenceStatus::Ok
    );
    assert_eq!(
        project.ledger.check_reference(&id, true).expect("deep"),
        ReferenceStatus::Drifted
    );
}

#[test]
fn save_version_at_recovers_identity_from_location() {
    let project = Project::new();
    let mut index = SubProjectIndex::load(project.ledger.layout()).expect("index");
    index.create("Seq01").expect("sub-project");

    let nested = project.create("ShotB", Some("Seq01"), false);
    let plain = project.create("ShotB", None, false);
    let nested_v1 = project.ledger.load_record(&nested).expect("load").versions[0]
        .file
        .clone();

    let saved = project
        .ledger
        .save_version_at(&nested_v1, "gn", false, "from disk")
        .expect("save at path");
    assert_eq!(saved.id, nested);
    assert_eq!(saved.version, 2);
    assert_eq!(
        project.ledger.load_record(&plain).expect("load").versions.len(),
        1
    );
}

#[test]
fn sub_project_named_after_a_category_keeps_plain_scenes_tracked() {
    let project = Project::new();
    let plain = project.create("ShotA", None, false);
    let v1 = project.ledger.load_record(&plain).expect("load").versions[0]
        .file
        .clone();

    let mut index = SubProjectIndex::load(project.ledger.layout()).expect("index");
    index.create("Animation").expect("sub-project");

    let saved = project
        .ledger
        .save_version_at(&v1, "gn", false, "")
        .expect("save at path");
    assert_eq!(saved.id, plain);
    assert_eq!(saved.version, 2);
}

#[test]
fn save_version_at_untracked_location_is_reported() {
    let project = Project::new();
    let stray = project
        .ledger
        .layout()
        .scenes_root()
        .join("Animation/Ghost/Ghost_v001.mb");

    let err = project
        .ledger
        .save_version_at(&stray, "gn", false, "")
        .unwrap_err();
    assert!(matches!(err, LedgerError::NotTracked { .. }), "{err}");
    assert!(err.is_user_facing_notice());
}

#[test]
fn missing_and_corrupted_metadata_are_distinct() {
    let project = Project::new();
    let ghost = SceneId::new("Animation", None, "Ghost");
    assert!(matches!(
        project.ledger.load_record(&ghost),
        Err(LedgerError::NotFound { .. })
    ));
    assert!(matches!(
        project.ledger.save_version(&ghost, "gn", false, ""),
        Err(LedgerError::NotFound { .. })
    ));

    let id = project.create("ShotA", None, true);
    let metadata = project.ledger.metadata_file(&id);
    std::fs::write(&metadata, "{\"Name\": \"ShotA\", ").expect("truncate");

    assert!(matches!(
        project.ledger.load_record(&id),
        Err(LedgerError::Corrupted { .. })
    ));
    assert_eq!(
        project.ledger.check_reference(&id, true).expect("check"),
        ReferenceStatus::Corrupted
    );
    let err = project
        .ledger
        .save_version(&id, "gn", false, "")
        .unwrap_err();
    assert!(matches!(err, LedgerError::Corrupted { .. }));
    assert_eq!(
        std::fs::read_to_string(&metadata).expect("untouched"),
        "{\"Name\": \"ShotA\", "
    );
}

#[test]
fn legacy_metadata_round_trips_unchanged() {
    let project = Project::new();
    let id = SceneId::new("Rig", None, "Chair");
    project
        .ledger
        .layout()
        .ensure_scene_dirs(&id)
        .expect("dirs");
    let metadata = project.ledger.metadata_file(&id);
    let text = r#"{
    "Name": "Chair",
    "Path": "/old/scenes/Rig/Chair",
    "Category": "Rig",
    "Creator": "ab",
    "CreatorHost": "ws-07",
    "ReferenceFile": null,
    "ReferencedVersion": null,
    "Versions": [
        [
            "/old/scenes/Rig/Chair/Chair_Rig_ab_v001.mb",
            "",
            "ab"
        ],
        [
            "/old/scenes/Rig/Chair/Chair_Rig_ab_v002.mb",
            "legs",
            "ab",
            "ws-07"
        ]
    ]
}
"#;
    std::fs::write(&metadata, text).expect("write legacy");

    let record = SceneRecord::load(&metadata).expect("load legacy");
    assert_eq!(record.versions[0].host, None);
    assert_eq!(record.versions[1].host.as_deref(), Some("ws-07"));

    record.save(&metadata).expect("save");
    assert_eq!(std::fs::read_to_string(&metadata).expect("reread"), text);
}

#[test]
fn survey_lists_each_scene_once_with_status() {
    let project = Project::new();
    project.create("ShotB", None, true);
    project.create("ShotA", None, false);
    let orphan = project.create("ShotC", None, true);
    let reference = project
        .ledger
        .load_record(&orphan)
        .expect("load")
        .reference_file
        .expect("reference");
    std::fs::remove_file(reference).expect("remove reference");

    let rows = project
        .ledger
        .survey("Animation", None, false)
        .expect("survey");
    let summary: Vec<_> = rows.iter().map(|r| (r.name.as_str(), r.status)).collect();
    assert_eq!(
        summary,
        vec![
            ("ShotA", ReferenceStatus::NoReference),
            ("ShotB", ReferenceStatus::Ok),
            ("ShotC", ReferenceStatus::Missing),
        ]
    );
}

#[test]
fn name_rule_accepts_only_the_safe_alphabet() {
    for good in ["ShotA", "shot_01", "a-b", "Shot A", "X"] {
        assert!(is_valid_name(good), "{good}");
    }
    for bad in ["", "a/b", "a@b", "café", "shot.01", "a\\b", "片"] {
        assert!(!is_valid_name(bad), "{bad}");
    }
}

#[test]
fn saves_leave_no_temp_files_behind() {
    let project = Project::new();
    let id = project.create("ShotA", None, false);
    for _ in 0..3 {
        project
            .ledger
            .save_version(&id, "gn", true, "")
            .expect("save");
    }
    let meta_dir = project.ledger.layout().metadata_dir("Animation", None);
    let leftovers: Vec<_> = std::fs::read_dir(meta_dir)
        .expect("list")
        .map(|e| e.expect("entry").file_name().to_string_lossy().to_string())
        .filter(|n| n.ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty(), "{leftovers:?}");
}
