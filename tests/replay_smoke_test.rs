//! Smoke test of a full replay: import, playback and the command line front end

mod common;

use acmiview_acmi::ReplaySession;
use acmiview_core::config::AppConfig;
use acmiview_track::{seconds_between, Classification};
use chrono::{TimeZone, Utc};
use std::process::Command;

#[test]
fn test_short_engagement_import() {
    let text = common::load_short_engagement();
    let mut session = ReplaySession::default();
    let report = session.import(&text).expect("fixture should import").clone();

    assert_eq!(report.frames, 7);
    assert_eq!(report.samples, 15);
    assert_eq!(report.skipped_lines(), 1);
    assert_eq!(report.warnings[0].line_number, 15);

    let registry = session.registry();
    assert_eq!(registry.len(), 4);

    let (start, end) = registry.time_range().unwrap();
    assert_eq!(start, Utc.with_ymd_and_hms(2020, 1, 1, 10, 0, 0).unwrap());
    assert_eq!(seconds_between(start, end), 12.0);

    assert_eq!(
        registry.get("A0101").unwrap().classification(),
        Classification::Missile
    );
    assert_eq!(
        registry.get("301").unwrap().classification(),
        Classification::Explosion { radius: 300.0 }
    );
    assert_eq!(registry.get("101").unwrap().coalition(), Some("Allies"));
}

#[test]
fn test_playback_over_fixture() {
    let text = common::load_short_engagement();
    let mut session = ReplaySession::default();
    session.import(&text).unwrap();

    // the missile has not been launched yet
    session.seek(3.0);
    assert_eq!(session.registry().entities_now().len(), 2);

    session.seek(5.0);
    assert_eq!(session.registry().entities_now().len(), 3);

    // every entity is clamped to its last position once it has appeared
    session.seek(11.0);
    assert_eq!(session.registry().entities_now().len(), 4);

    session.registry_mut().set_visibility("201", false);
    assert_eq!(session.registry().entities_now().len(), 3);

    // ten ticks at 2x speed cover two seconds
    session.seek(0.0);
    session.clock_mut().set_speed(2.0).unwrap();
    session.clock_mut().play();
    for _ in 0..10 {
        session.tick();
    }
    let (start, _) = session.registry().time_range().unwrap();
    let now = session.registry().current_time().unwrap();
    assert!((seconds_between(start, now) - 2.0).abs() < 1e-6);

    // stepping past the end loops back to the start
    session.seek(10.0);
    assert_eq!(session.step_forward(), Some(start));
}

#[test]
fn test_missile_trail() {
    let text = common::load_short_engagement();
    let mut session = ReplaySession::default();
    session.import(&text).unwrap();
    session.seek(9.0);

    let trail = session.registry().trail("A0101", 30.0).unwrap();
    // launch point, samples at 6 s and 8 s, interpolated head at 9 s
    assert_eq!(trail.len(), 4);
    let east: Vec<f64> = trail.iter().map(|p| p.east()).collect();
    assert!(east.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_custom_reference_point_from_config() {
    let config = AppConfig::from_yaml("reference:\n  longitude_deg: 120.0\n  latitude_deg: 60.0\n  altitude_m: 8000.0\n").unwrap();
    let mut session = ReplaySession::from_config(&config);
    session.import(&common::load_short_engagement()).unwrap();

    session.seek(0.0);
    let now = session.registry().entities_now();
    let (_, f16) = now.iter().find(|(e, _)| e.id().as_str() == "101").unwrap();
    assert!(f16.distance_to(&acmiview_core::LocalPosition::ORIGIN) < 1e-6);
}

#[test]
fn test_cli_prints_summary() {
    let output = Command::new(env!("CARGO_BIN_EXE_acmiview"))
        .arg(common::short_engagement_path())
        .args(["--at", "5", "--trail"])
        .output()
        .expect("Failed to run acmiview");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Time range"));
    assert!(stdout.contains("A0101"));
    assert!(stdout.contains("missile"));
    assert!(stdout.contains("Trails (30 s window)"));
}

#[test]
fn test_cli_rejects_bad_header() {
    let path = common::write_temp_recording("bad-header", "FileType=text/csv\n#0\n");
    let output = Command::new(env!("CARGO_BIN_EXE_acmiview"))
        .arg(&path)
        .output()
        .expect("Failed to run acmiview");
    common::cleanup_temp_file(&path);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unsupported file type"));
}
