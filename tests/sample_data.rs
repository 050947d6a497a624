use std::path::PathBuf;

use disease_prediction_support::{
    app,
    i18n::Language,
    profile::ProfileTable,
    session::{Phase, Session},
};

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

fn symptoms(values: [&str; 4]) -> [String; 4] {
    values.map(String::from)
}

#[test]
fn shipped_profiles_load_for_both_languages() {
    for lang in Language::ALL {
        let profiles = ProfileTable::built_in(data_dir()).expect("profiles");
        let session = Session::new(profiles, lang);
        assert_eq!(session.phase(), Phase::FormReady, "{lang}: {:?}", session.load_error());
    }
}

#[test]
fn english_sample_predicts_malaria_with_precautions() {
    let profiles = ProfileTable::built_in(data_dir()).expect("profiles");
    let mut session = Session::new(profiles, Language::English);
    let lines = app::predict_once(
        &mut session,
        symptoms(["chills", "vomiting", "high_fever", "sweating"]),
    )
    .expect("predict");
    assert_eq!(lines[0], "Prediction: Malaria");
    assert_eq!(lines[1], "Predicted disease: malaria");
    assert!(lines.contains(&"Precaution 4: keep mosquitos out".to_string()));
}

#[test]
fn empty_precaution_cell_is_not_numbered() {
    let profiles = ProfileTable::built_in(data_dir()).expect("profiles");
    let mut session = Session::new(profiles, Language::English);
    let lines = app::predict_once(
        &mut session,
        symptoms(["continuous_sneezing", "shivering", "chills", "watering_from_eyes"]),
    )
    .expect("predict");
    assert_eq!(lines[0], "Prediction: Allergy");
    let numbered: Vec<_> = lines.iter().filter(|l| l.starts_with("Precaution ")).collect();
    assert_eq!(numbered.len(), 3);
    assert_eq!(numbered[2], "Precaution 3: use ice to compress itching");
}

#[test]
fn vietnamese_sample_keeps_diacritics_in_lookup() {
    let profiles = ProfileTable::built_in(data_dir()).expect("profiles");
    let mut session = Session::new(profiles, Language::Vietnamese);
    assert_eq!(session.symptom_options(0)[0], "ngứa");
    let lines = app::predict_once(&mut session, symptoms(["ngứa", "phát ban da", "none", "none"]))
        .expect("predict");
    assert_eq!(lines[0], "Dự đoán bệnh: Nhiễm nấm");
    assert_eq!(lines[1], "Bệnh dự đoán: nhiễm nấm");
}

#[test]
fn missing_data_dir_is_reported_not_fatal() {
    let dir = tempfile::tempdir().expect("tmpdir");
    let profiles = ProfileTable::built_in(dir.path()).expect("profiles");
    let mut session = Session::new(profiles, Language::English);
    assert_eq!(session.phase(), Phase::ResourcesUnavailable);
    assert!(app::predict_once(&mut session, symptoms(["a", "b", "c", "d"])).is_err());
}
