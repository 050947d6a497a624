use std::fs;
use std::path::Path;

use disease_prediction_support::{
    i18n::Language,
    loader::{self, LoadError},
    profile::ProfileTable,
    session::{Phase, Session, SessionError},
};

const PROFILES: &str = r#"
[english]
model = "en/model.json"
training = "en/train.csv"
descriptions = "en/desc.csv"
precautions = "en/prec.csv"
symptom_columns = ["Symptom_1", "Symptom_2", "Symptom_3", "Symptom_4"]
disease_column = "Disease"

[vietnamese]
model = "vi/model.json"
training = "vi/train.csv"
descriptions = "vi/desc.csv"
precautions = "vi/prec.csv"
symptom_columns = ["Triệu chứng 1", "Triệu chứng 2", "Triệu chứng 3", "Triệu chứng 4"]
disease_column = "Bệnh"
"#;

/// 항상 첫 클래스를 예측하는 모델(트리 없음).
fn constant_model(label: &str) -> String {
    format!(r#"{{"classes": ["{label}"], "trees": []}}"#)
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(path, content).expect("write");
}

fn english_fixture(root: &Path, predicted: &str) {
    write(root, "en/model.json", &constant_model(predicted));
    write(
        root,
        "en/train.csv",
        "Disease;Symptom_1;Symptom_2;Symptom_3;Symptom_4\n\
         Malaria;fever;chills;;\n\
         Malaria;fever;sweating;;\n\
         Flu;cough;fever;headache;\n",
    );
    write(
        root,
        "en/desc.csv",
        "Disease,Description\nmalaria,Parasitic infection spread by mosquitoes.\nFlu,Viral infection.\n",
    );
    write(
        root,
        "en/prec.csv",
        "Disease,Precaution_1,Precaution_2,Precaution_3\n\
         Malaria,rest,,hydrate\n\
         Flu,sleep,,\n\
         MALARIA ,,see doctor,\n",
    );
}

fn vietnamese_fixture(root: &Path) {
    write(root, "vi/model.json", &constant_model("Sốt rét"));
    write(
        root,
        "vi/train.csv",
        "Bệnh;Triệu chứng 1;Triệu chứng 2;Triệu chứng 3;Triệu chứng 4\n\
         Sốt rét;ớn lạnh;sốt cao;;\n",
    );
    write(root, "vi/desc.csv", "Bệnh,Description\nsốt rét,Bệnh do ký sinh trùng.\n");
    write(root, "vi/prec.csv", "Bệnh,Biện pháp 1\nSốt rét,ngăn muỗi\n");
}

fn session_for(root: &Path, language: Language) -> Session {
    let profiles = ProfileTable::from_toml(PROFILES, root).expect("profiles");
    Session::new(profiles, language)
}

#[test]
fn load_succeeds_with_every_resource_present() {
    let dir = tempfile::tempdir().expect("tmpdir");
    english_fixture(dir.path(), "Malaria");
    let profiles = ProfileTable::from_toml(PROFILES, dir.path()).expect("profiles");
    let profile = profiles.profile(Language::English).expect("profile");
    let res = loader::load_resources(&profile).expect("load");
    assert_eq!(res.training.len(), 3);
    assert!(!res.descriptions.is_empty());
    assert!(!res.precautions.is_empty());
    assert_eq!(res.classifier.classes(), ["Malaria".to_string()]);
}

#[test]
fn missing_table_fails_whole_load() {
    let dir = tempfile::tempdir().expect("tmpdir");
    english_fixture(dir.path(), "Malaria");
    fs::remove_file(dir.path().join("en/prec.csv")).expect("rm");

    let session = session_for(dir.path(), Language::English);
    assert_eq!(session.phase(), Phase::ResourcesUnavailable);
    match session.load_error() {
        Some(LoadError::NotFound { path }) => assert!(path.ends_with("en/prec.csv")),
        other => panic!("unexpected load result: {other:?}"),
    }
    for slot in 0..4 {
        assert!(session.symptom_options(slot).is_empty());
    }
}

#[test]
fn malformed_model_is_parse_error_and_disables_submit() {
    let dir = tempfile::tempdir().expect("tmpdir");
    english_fixture(dir.path(), "Malaria");
    write(dir.path(), "en/model.json", "{ not json");

    let mut session = session_for(dir.path(), Language::English);
    assert!(matches!(session.load_error(), Some(LoadError::Parse { .. })));
    assert!(matches!(session.submit(), Err(SessionError::Unavailable)));
}

#[test]
fn missing_column_is_parse_error() {
    let dir = tempfile::tempdir().expect("tmpdir");
    english_fixture(dir.path(), "Malaria");
    write(dir.path(), "en/desc.csv", "Disease,Text\nmalaria,x\n");

    let session = session_for(dir.path(), Language::English);
    assert!(matches!(session.load_error(), Some(LoadError::Parse { .. })));
}

#[test]
fn dropdowns_offer_distinct_values_and_default_to_first() {
    let dir = tempfile::tempdir().expect("tmpdir");
    english_fixture(dir.path(), "Malaria");
    let session = session_for(dir.path(), Language::English);

    assert_eq!(session.phase(), Phase::FormReady);
    assert_eq!(session.symptom_options(0), ["fever", "cough"]);
    assert_eq!(session.symptom_options(3), ["none"]);
    assert_eq!(session.selection(0), Some("fever"));
}

#[test]
fn prediction_matches_description_case_insensitively() {
    let dir = tempfile::tempdir().expect("tmpdir");
    english_fixture(dir.path(), "Malaria");
    let mut session = session_for(dir.path(), Language::English);

    let result = session.submit().expect("submit").clone();
    assert_eq!(result.label, "Malaria");
    assert_eq!(result.normalized, "malaria");
    let info = result.info.as_ref().expect("description match");
    assert_eq!(info.description, "Parasitic infection spread by mosquitoes.");

    let tr = session.labels().clone();
    assert_eq!(
        result.precaution_lines(&tr),
        vec![
            "Precaution 1: rest",
            "Precaution 2: hydrate",
            "Precaution 3: see doctor",
        ]
    );
    assert_eq!(session.phase(), Phase::ResultDisplayed);
}

#[test]
fn unmatched_prediction_shows_only_the_label() {
    let dir = tempfile::tempdir().expect("tmpdir");
    english_fixture(dir.path(), "Dengue");
    let mut session = session_for(dir.path(), Language::English);

    let tr = session.labels().clone();
    let result = session.submit().expect("submit");
    assert!(result.info.is_none());
    assert_eq!(result.render_lines(&tr), vec!["Prediction: Dengue"]);
}

#[test]
fn resubmitting_replaces_previous_result() {
    let dir = tempfile::tempdir().expect("tmpdir");
    english_fixture(dir.path(), "Malaria");
    let mut session = session_for(dir.path(), Language::English);

    session.submit().expect("first");
    session.set_selection(0, "cough").expect("select");
    session.submit().expect("second");
    assert_eq!(session.phase(), Phase::ResultDisplayed);
    assert_eq!(session.selection(0), Some("cough"));
    assert!(session.last_prediction().is_some());
}

#[test]
fn switching_language_discards_state_and_repopulates_dropdowns() {
    let dir = tempfile::tempdir().expect("tmpdir");
    english_fixture(dir.path(), "Malaria");
    vietnamese_fixture(dir.path());
    let mut session = session_for(dir.path(), Language::English);

    session.set_selection(1, "sweating").expect("select");
    session.submit().expect("submit");

    session.select_language(Language::Vietnamese);
    assert_eq!(session.phase(), Phase::FormReady);
    assert!(session.last_prediction().is_none());
    assert_eq!(session.symptom_options(0), ["ớn lạnh"]);
    assert_eq!(session.symptom_options(1), ["sốt cao"]);
    assert_eq!(session.selection(1), Some("sốt cao"));

    let tr = session.labels().clone();
    let lines = session.submit().expect("submit").render_lines(&tr);
    assert_eq!(lines[0], "Dự đoán bệnh: Sốt rét");
    assert_eq!(lines.last().map(String::as_str), Some("Biện pháp phòng ngừa 1: ngăn muỗi"));
}

#[test]
fn switching_to_broken_language_leaves_nothing_from_previous_one() {
    let dir = tempfile::tempdir().expect("tmpdir");
    english_fixture(dir.path(), "Malaria");
    let mut session = session_for(dir.path(), Language::English);
    session.submit().expect("submit");

    // vi 파일이 없으므로 로드 실패
    session.select_language(Language::Vietnamese);
    assert_eq!(session.phase(), Phase::ResourcesUnavailable);
    assert!(session.last_prediction().is_none());
    assert!(session.symptom_options(0).is_empty());

    // 다시 영어를 고르면 처음부터 로드
    session.select_language(Language::English);
    assert_eq!(session.phase(), Phase::FormReady);
}

#[test]
fn lookup_tables_without_disease_labels_disable_the_form() {
    let dir = tempfile::tempdir().expect("tmpdir");
    english_fixture(dir.path(), "Malaria");
    write(dir.path(), "en/desc.csv", "Disease,Description\n,orphan text\n");
    write(dir.path(), "en/prec.csv", "Disease,P1\n,rest\n");

    let session = session_for(dir.path(), Language::English);
    assert_eq!(session.phase(), Phase::ResourcesUnavailable);
    match session.load_error() {
        Some(LoadError::Parse { path, .. }) => assert!(path.ends_with("en/desc.csv")),
        other => panic!("unexpected load result: {other:?}"),
    }
}

#[test]
fn undecodable_header_is_parse_error() {
    let dir = tempfile::tempdir().expect("tmpdir");
    english_fixture(dir.path(), "Malaria");
    let mut bytes = b"Disease,Descr".to_vec();
    bytes.extend_from_slice(&[0xff, 0xfe]);
    bytes.extend_from_slice(b"\nmalaria,x\n");
    fs::write(dir.path().join("en/desc.csv"), bytes).expect("write");

    let session = session_for(dir.path(), Language::English);
    assert!(matches!(session.load_error(), Some(LoadError::Parse { .. })));
}
