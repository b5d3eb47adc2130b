use std::time::Duration;

use road_shooter::config::{GameConfig, OffscreenRemoval};
use road_shooter::GameError;

#[test]
fn defaults_match_the_classic_tuning() {
    let c = GameConfig::default();
    assert_eq!((c.canvas.width, c.canvas.height), (800.0, 600.0));
    assert_eq!(c.obstacles.emojis, vec!["🚜", "🐃", "🚗", "🚜"]);
    assert_eq!(c.timers.spawn(), Duration::from_millis(2000));
    assert_eq!(c.timers.speed_ramp(), Duration::from_millis(5000));
    assert_eq!(c.timers.resume_speed_ramp(), Duration::from_millis(10000));
    assert_eq!(c.scoring.kill_points, 20);
    assert_eq!(c.offscreen_removal, OffscreenRemoval::Oldest);
    assert!(c.seed.is_none());
    assert!(c.validate().is_ok());
}

#[test]
fn empty_file_gives_defaults() {
    let c = GameConfig::from_toml_str("").unwrap();
    assert_eq!(c.player.speed, 5.0);
    assert_eq!(c.frame.hz, 60);
}

#[test]
fn partial_sections_keep_other_defaults() {
    let c = GameConfig::from_toml_str(
        r#"
        seed = 99
        offscreen_removal = "exact"

        [timers]
        spawn_ms = 1500

        [audio]
        track = "tracks/highway.ogg"
        "#,
    )
    .unwrap();
    assert_eq!(c.seed, Some(99));
    assert_eq!(c.offscreen_removal, OffscreenRemoval::Exact);
    assert_eq!(c.timers.spawn_ms, 1500);
    assert_eq!(c.timers.score_ms, 1000);
    assert_eq!(c.audio.track.as_deref(), Some("tracks/highway.ogg"));
    assert!(c.audio.bell);
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let err = GameConfig::from_toml_str("[timers\nspawn_ms = 5").unwrap_err();
    assert!(matches!(err, GameError::ConfigParse(_)));
}

#[test]
fn wrong_type_is_a_parse_error() {
    let err = GameConfig::from_toml_str("[timers]\nspawn_ms = \"soon\"").unwrap_err();
    assert!(matches!(err, GameError::ConfigParse(_)));
}

#[test]
fn zero_period_is_invalid() {
    let err = GameConfig::from_toml_str("[timers]\nscore_ms = 0").unwrap_err();
    assert!(matches!(err, GameError::InvalidConfig(_)));
}

#[test]
fn empty_emoji_set_is_invalid() {
    let err = GameConfig::from_toml_str("[obstacles]\nemojis = []").unwrap_err();
    assert!(matches!(err, GameError::InvalidConfig(_)));
}

#[test]
fn oversized_player_is_invalid() {
    let err = GameConfig::from_toml_str("[player]\nwidth = 900.0").unwrap_err();
    assert!(matches!(err, GameError::InvalidConfig(_)));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = GameConfig::load(std::path::Path::new("/definitely/not/here.toml")).unwrap_err();
    assert!(matches!(err, GameError::Io(_)));
}

#[test]
fn no_path_means_defaults() {
    let c = GameConfig::load_or_default(None).unwrap();
    assert_eq!(c.canvas.width, 800.0);
}

#[test]
fn frame_period_follows_hz() {
    let c = GameConfig::from_toml_str("[frame]\nhz = 50").unwrap();
    assert_eq!(c.frame.period(), Duration::from_millis(20));
}
