//! Loading catalogs from JSON.

use dexchat_data::{Catalog, DataError};
use std::io::Write;

const SAMPLE: &str = r#"{
    "types": ["Fire", "Flying", "Water"],
    "abilities": ["Blaze", "Torrent"],
    "moves": [
        {"name": "Ember", "type": "Fire"},
        {"name": "Water Gun", "type": "Water"}
    ],
    "species": [
        {"name": "Charmander", "types": ["Fire"], "tier": "LC", "abilities": ["Blaze"],
         "color": "Red", "gen": 1, "evos": ["Charmeleon"]},
        {"name": "Charmeleon", "types": ["Fire"], "tier": "NFE", "abilities": ["Blaze"],
         "color": "Red", "gen": 1, "prevo": "Charmander"}
    ],
    "learnsets": {"Charmander": ["Ember"]},
    "formats": {"LC": {"banlist": ["Charmeleon"]}}
}"#;

#[test]
fn parses_and_normalizes_ids() {
    let catalog = Catalog::from_json(SAMPLE).expect("valid catalog");
    assert_eq!(catalog.species_count(), 2);

    let charmeleon = catalog.species("charmeleon").expect("charmeleon");
    assert_eq!(charmeleon.prevo.as_deref(), Some("charmander"));
    assert_eq!(charmeleon.generation, 1);
    assert!(catalog.is_banned("lc", "charmeleon"));
    assert!(!catalog.is_banned("lc", "charmander"));

    let ember = catalog.get_move("ember").expect("ember");
    assert_eq!(catalog.can_learn(charmeleon, ember), Some(true));
    assert_eq!(catalog.type_name("water"), Some("Water"));
}

#[test]
fn dangling_evolution_is_rejected() {
    let json = r#"{
        "species": [
            {"name": "Eevee", "types": ["Normal"], "tier": "LC", "color": "Brown",
             "gen": 1, "evos": ["Vaporeon"]}
        ]
    }"#;
    let err = Catalog::from_json(json).unwrap_err();
    assert!(matches!(err, DataError::DanglingReference { field: "evo", .. }));
}

#[test]
fn three_types_are_rejected() {
    let json = r#"{
        "species": [
            {"name": "Oddity", "types": ["Fire", "Water", "Grass"], "tier": "OU",
             "color": "Green", "gen": 6}
        ]
    }"#;
    let err = Catalog::from_json(json).unwrap_err();
    assert!(matches!(err, DataError::BadTypeCount { count: 3, .. }));
}

#[test]
fn load_reads_from_disk() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(SAMPLE.as_bytes()).expect("write");
    let catalog = Catalog::load(file.path()).expect("load");
    assert!(catalog.ability("blaze").is_some());
}

#[test]
fn missing_file_is_io_error() {
    let err = Catalog::load("/nonexistent/catalog.json").unwrap_err();
    assert!(matches!(err, DataError::Io(_)));
}
