//! End-to-end session tests driven through the public API.

use std::fs;
use std::time::Duration;

use crossterm::event::KeyCode;
use folio::cli::{CliConfig, LineKind, SessionMode, SessionTask, TaskOutcome, TerminalSession};
use folio::clock::ManualClock;
use folio::portfolio::{DataStore, DocumentSource};

const PORTFOLIO: &str = r#"{
    "data": {
        "personalInfo": {"name": "Grace Hopper", "title": "Rear Admiral", "summary": "Wrote the first compiler."},
        "projects": [{"title": "A-0", "description": "Compiler", "demo": "https://example.com/src/a0"}],
        "skills": {"Languages": ["COBOL", "FLOW-MATIC"]},
        "resumeUrl": "https://example.com/grace.pdf"
    }
}"#;

fn config_in(dir: &tempfile::TempDir) -> CliConfig {
    CliConfig {
        animate_output: false,
        quote_endpoint: None,
        data_file: dir.path().join("portfolio.json"),
        cache_file: dir.path().join(".cache.json"),
        download_dir: dir.path().join("downloads"),
        template_dir: "terminal".to_string(),
        ..CliConfig::default()
    }
}

fn start(config: CliConfig) -> TerminalSession {
    let mut store = DataStore::from_config(&config);
    store.load();
    TerminalSession::with_seed(config, store, ManualClock::shared(), 5)
}

fn submit(session: &mut TerminalSession, line: &str) -> Option<SessionTask> {
    for c in line.chars() {
        session.handle_key(KeyCode::Char(c));
    }
    session.handle_key(KeyCode::Enter)
}

fn last_text(session: &TerminalSession) -> String {
    session
        .lines()
        .last()
        .map(|l| l.full_text().to_string())
        .unwrap_or_default()
}

#[test]
fn browses_a_loaded_portfolio() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);
    fs::write(&config.data_file, PORTFOLIO).unwrap();

    let mut store = DataStore::from_config(&config);
    assert_eq!(store.load(), DocumentSource::DataFile);
    let mut session = TerminalSession::with_seed(config, store, ManualClock::shared(), 5);

    submit(&mut session, "me");
    assert_eq!(
        last_text(&session),
        "Name: Grace Hopper\nTitle: Rear Admiral\n\nWrote the first compiler."
    );

    submit(&mut session, "tech");
    assert_eq!(
        last_text(&session),
        "== Languages ==\nCOBOL\nFLOW-MATIC"
    );

    submit(&mut session, "proj");
    let projects = session.lines().last().unwrap();
    let links: Vec<_> = projects
        .segments(session.rewriter())
        .into_iter()
        .filter_map(|s| match s {
            folio::cli::Segment::Link { url, .. } => Some(url),
            _ => None,
        })
        .collect();
    assert_eq!(links, vec!["https://example.com/terminal/a0".to_string()]);
}

#[test]
fn welcome_then_commands_animate_until_fast_forward() {
    let dir = tempfile::tempdir().unwrap();
    let config = CliConfig {
        animate_output: true,
        ..config_in(&dir)
    };
    let mut session = start(config);
    session.welcome();
    assert_eq!(session.mode(), SessionMode::Animating);

    // Enter only fast-forwards while output is still being revealed.
    session.handle_key(KeyCode::Enter);
    assert_eq!(session.mode(), SessionMode::Normal);
    assert!(session
        .lines()
        .iter()
        .any(|l| l.full_text().starts_with("Welcome to Portfolio Owner's terminal portfolio.")));

    submit(&mut session, "contact");
    assert_eq!(session.mode(), SessionMode::Animating);
    let mut ticks = 0;
    while session.tick() {
        ticks += 1;
    }
    assert!(ticks > 10);
    assert_eq!(session.mode(), SessionMode::Normal);
}

#[test]
fn download_and_reimport_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);
    fs::write(&config.data_file, PORTFOLIO).unwrap();
    let mut session = start(config.clone());

    submit(&mut session, "dlp");
    let exported = config.download_dir.join("portfolio.json");
    assert!(exported.exists());

    let task = submit(&mut session, "download -r");
    assert_eq!(
        task,
        Some(SessionTask::DownloadResume {
            url: "https://example.com/grace.pdf".to_string()
        })
    );
    assert_eq!(
        last_text(&session),
        "Downloading resume from https://example.com/grace.pdf..."
    );

    let edited = fs::read_to_string(&exported)
        .unwrap()
        .replace("Rear Admiral", "Computer Scientist");
    fs::write(&exported, edited).unwrap();

    let mut store = DataStore::from_config(&config);
    store.load();
    store.import_from(&exported).unwrap();
    let mut session = TerminalSession::with_seed(config, store, ManualClock::shared(), 5);
    submit(&mut session, "about");
    assert!(last_text(&session).contains("Title: Computer Scientist"));
}

#[test]
fn typing_test_ignores_commands_until_scored() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);
    let clock = ManualClock::shared();
    let mut store = DataStore::from_config(&config);
    store.load();
    let mut session = TerminalSession::with_seed(config, store, clock.clone(), 9);

    submit(&mut session, "typingtest");
    assert_eq!(session.mode(), SessionMode::TypingTest);
    assert!(last_text(&session).starts_with("Type the following text:"));

    clock.advance(Duration::from_secs(30));
    // Whatever is typed next is the transcription, even a command name.
    submit(&mut session, "help");
    assert_eq!(session.mode(), SessionMode::Normal);
    let report = session.lines().last().unwrap();
    assert_eq!(report.kind(), LineKind::Success);
    assert!(report.full_text().starts_with("Typing test results:\nWPM: "));
    assert!(report.full_text().ends_with("Time: 30.00 seconds"));
}

#[test]
fn failed_reload_keeps_session_usable() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(&dir);
    config.api.url = "http://127.0.0.1:1/api".to_string();
    let mut session = start(config);

    assert_eq!(submit(&mut session, "refresh"), Some(SessionTask::Refresh));
    session.complete_task(TaskOutcome::Refreshed(Err(folio::FolioError::Api {
        status: 502,
    })));
    assert_eq!(session.lines().last().unwrap().kind(), LineKind::Error);

    submit(&mut session, "about");
    assert!(last_text(&session).starts_with("Name: Portfolio Owner"));
}
