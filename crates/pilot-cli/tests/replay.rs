//! End-to-end tests for script replay and the walkthrough.

use std::io::Write;

use pilot_cli::commands::{EventCounts, demo, replay, run_replay, summary_table};
use pilot_cli::config::CliConfig;
use pilot_cli::script::parse_script;
use tempfile::NamedTempFile;

const SCRIPT: &str = "\
# sign in, swipe back, start over
push Start
push Home
push SignIn
back
pop-to Start
push Profile
pop
";

fn write_script(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

#[test]
fn test_replay_transcript() {
    let commands = parse_script(SCRIPT).unwrap();
    let session = replay(&commands, &CliConfig::default());

    insta::assert_snapshot!(session.transcript(), @r"
    $ start
    (empty)
    $ push Start
    Start [#1]
    $ push Home
    Start [#1]
      Home [#2]
    $ push SignIn
    Start [#1]
      Home [#2]
        SignIn [#3]
    $ back
    Start [#1]
      Home [#2]
    $ pop-to Start
    Start [#1]
    $ push Profile
    Start [#1]
      Profile [#4]
    $ pop
    Start [#1]
    ");
}

#[test]
fn test_replay_counters() {
    let commands = parse_script(SCRIPT).unwrap();
    let session = replay(&commands, &CliConfig::default());

    assert_eq!(
        session.events,
        EventCounts {
            pushes: 4,
            pops: 2,
            pop_tos: 1,
            changes: 7,
        }
    );
    assert_eq!(session.builds, 4);
    assert_eq!(session.cache.hits, 8);
    assert_eq!(session.cache.misses, 4);
    assert_eq!(session.cache.evictions, 3);
}

#[test]
fn test_back_on_root_is_ignored() {
    let commands = parse_script("push Start\nback\nback\n").unwrap();
    let session = replay(&commands, &CliConfig::default());
    assert_eq!(session.steps.last().unwrap().view, "Start [#1]");
    assert_eq!(session.events.pops, 0);
}

#[test]
fn test_render_settings_apply() {
    let config = CliConfig::from_toml("[render]\nindent = 4\nshow_builds = false\n").unwrap();
    let commands = parse_script("push Start\npush Home\n").unwrap();
    let session = replay(&commands, &config);
    assert_eq!(session.steps.last().unwrap().view, "Start\n    Home");
}

#[test]
fn test_demo_walkthrough() {
    let session = demo(&CliConfig::default());

    insta::assert_snapshot!(session.transcript(), @r"
    $ start
    Start [#1]
    $ let's start
    Start [#1]
      Home [#2]
    $ sign in
    Start [#1]
      Home [#2]
        SignIn [#3]
    $ see your profile
    Start [#1]
      Home [#2]
        SignIn [#3]
          Profile [#4]
    $ profile again
    Start [#1]
      Home [#2]
        SignIn [#3]
          Profile [#4]
            Profile [#5]
    $ sign out
    Start [#1]
    ");
    assert_eq!(session.events.pop_tos, 1);
    assert_eq!(session.cache.evictions, 4);
}

#[test]
fn test_summary_table_lists_counters() {
    let commands = parse_script(SCRIPT).unwrap();
    let session = replay(&commands, &CliConfig::default());
    let table = summary_table(&session).to_string();
    assert!(table.contains("route change"));
    assert!(table.contains("cache evictions"));
    assert!(table.contains("67%"));
}

#[test]
fn test_run_replay_from_file() {
    let file = write_script(SCRIPT);
    run_replay(file.path(), &CliConfig::default()).unwrap();
}

#[test]
fn test_run_replay_reports_bad_line() {
    let file = write_script("push Start\njump Home\n");
    let err = run_replay(file.path(), &CliConfig::default()).unwrap_err();
    assert!(format!("{err:#}").contains("line 2: unknown command 'jump'"));
}

#[test]
fn test_run_replay_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = run_replay(&dir.path().join("missing.txt"), &CliConfig::default()).unwrap_err();
    assert!(err.to_string().starts_with("read script"));
}

#[test]
fn test_config_file_loading() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pilot.toml");
    std::fs::write(&path, "[pilot]\ndebug = false\n\n[render]\nindent = 3\n").unwrap();

    let config = CliConfig::load(Some(&path)).unwrap();
    assert!(!config.pilot.debug);
    assert_eq!(config.render.indent, 3);
    assert!(config.render.show_builds);
}
