mod common;

use common::*;
use visage::prelude::*;
use visage::{verify_file, verify_save};

#[test]
fn test_verify_synthetic_saves() {
    for flavor in Flavor::all() {
        let who = identity("NordRace", Sex::Male);
        let bytes = SaveSpec::new(flavor, who.clone(), &source_actor(flavor, &who)).build();

        let report = verify_save(&bytes).unwrap();
        assert_eq!(report.game, flavor);
        assert_eq!(report.changeforms, 3);
        assert_eq!(report.player_groups, 3);
        assert!(report.has_face);
    }
}

#[test]
fn test_verify_file_reports_format_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "junk.ess", b"TESV_SAVEGAME\x05\x00");
    assert_eq!(verify_file(&path).unwrap_err().kind(), ErrorKind::Format);
}

#[test]
fn test_summary() {
    let who = identity("DarkElfRace", Sex::Female);
    let flavor = Flavor::SkyrimSe;
    let bytes = SaveSpec::new(flavor, who.clone(), &target_actor(flavor, &who)).build();
    let save = SaveFile::decode(&bytes).unwrap();

    let summary = SaveSummary::from_save(&save);
    assert_eq!(summary.name, "Ysolda");
    assert_eq!(summary.race, "DarkElfRace");
    assert_eq!(summary.sex, Sex::Female);
    assert_eq!(summary.level, 14);
    assert_eq!(summary.save_number, 7);
    assert_eq!(summary.playing_time, "1h 22min 9s");
    assert_eq!((summary.screenshot_width, summary.screenshot_height), (2, 2));
}

#[test]
fn test_preview_strips_alpha() {
    let who = identity("NordRace", Sex::Male);
    let flavor = Flavor::Fallout4;
    let bytes = SaveSpec::new(flavor, who.clone(), &target_actor(flavor, &who)).build();
    let save = SaveFile::decode(&bytes).unwrap();

    let image = preview_image(&save);
    assert_eq!(image.dimensions(), (2, 2));
    assert_eq!(image.as_raw()[..6], [0, 1, 2, 4, 5, 6]);
}
