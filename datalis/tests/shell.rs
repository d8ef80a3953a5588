mod support;

use datalis::commands::{parse_input, ShellCommand};
use datalis::shell::{Flow, Shell};
use datalis_auth::{HostedAuthProvider, SessionManager, Settings};
use std::sync::Arc;
use support::{spawn_platform, PASSWORD};

struct TestShell {
    shell: Shell<Vec<u8>>,
    seen: usize,
}

impl TestShell {
    fn new(settings: &Settings) -> Self {
        let provider = HostedAuthProvider::new(settings).unwrap();
        let session = SessionManager::start(Arc::new(provider));
        Self {
            shell: Shell::new(settings, session, Vec::new()),
            seen: 0,
        }
    }

    /// Run one input line and return what it printed.
    async fn input(&mut self, line: &str) -> (Flow, String) {
        let command = parse_input(line).expect("non-empty line");
        let flow = self.shell.handle(command).await.unwrap();
        (flow, self.take_output())
    }

    fn take_output(&mut self) -> String {
        let out = self.shell.output();
        let new = String::from_utf8_lossy(&out[self.seen..]).into_owned();
        self.seen = out.len();
        new
    }
}

#[tokio::test]
async fn wrong_password_is_reported() {
    let (settings, _) = spawn_platform(Some(50)).await;
    let mut app = TestShell::new(&settings);

    assert!(!app.shell.login("ana@example.com", "nope").await.unwrap());
    assert_eq!(app.take_output(), "Login failed: Invalid email or password.\n");
    assert!(!app.shell.is_authenticated());
}

#[tokio::test]
async fn login_greets_user_with_balance() {
    let (settings, _) = spawn_platform(Some(50)).await;
    let mut app = TestShell::new(&settings);

    assert!(app.shell.login("ana@example.com", PASSWORD).await.unwrap());

    let out = app.take_output();
    assert!(out.contains("Signed in as ana."));
    assert!(out.contains("You have 50 credits."));
    assert!(app.shell.is_authenticated());
}

#[tokio::test]
async fn chat_flow_from_listing_to_reply() {
    let (settings, platform) = spawn_platform(Some(50)).await;
    let mut app = TestShell::new(&settings);
    app.shell.login("ana@example.com", PASSWORD).await.unwrap();
    app.take_output();

    let (_, out) = app.input("hello?").await;
    assert_eq!(out, "Open a workbench first with /open <n>.\n");

    let (_, out) = app.input("/workbenches").await;
    assert_eq!(out, "  1. Revenue\n  2. Churn\n");

    let (_, out) = app.input("/open 3").await;
    assert_eq!(out, "No workbench 3. Run /workbenches first.\n");

    let (_, out) = app.input("/open 1").await;
    assert_eq!(out, "Chatting about Revenue (New Chat).\n");
    assert_eq!(app.shell.active_session().unwrap().workbench_id, "wb-1");

    let (_, out) = app.input("what drove Q3?").await;
    assert_eq!(out, "You asked: what drove Q3?\n");
    assert_eq!(platform.sent_messages.lock().unwrap().len(), 1);

    let (_, out) = app.input("/status").await;
    assert_eq!(out, "Indexing: Processing (1/3 files indexed, 0 failed)\n");

    let (_, out) = app.input("/history").await;
    assert_eq!(out, "[user] hello\n");
}

#[tokio::test]
async fn credits_and_logout() {
    let (settings, _) = spawn_platform(Some(12)).await;
    let mut app = TestShell::new(&settings);
    app.shell.login("ana@example.com", PASSWORD).await.unwrap();
    app.take_output();

    let (_, out) = app.input("/credits").await;
    assert_eq!(out, "Credits: 12\n");

    let (flow, out) = app.input("/logout").await;
    assert_eq!(flow, Flow::Continue);
    assert_eq!(out, "Signed out.\n");
    assert!(!app.shell.is_authenticated());
    assert!(app.shell.active_session().is_none());

    let (_, out) = app.input("/credits").await;
    assert_eq!(out, "Failed to fetch credit balance\n");
}

#[tokio::test]
async fn quit_and_unknown_commands() {
    let (settings, _) = spawn_platform(None).await;
    let mut app = TestShell::new(&settings);

    let (_, out) = app.input("/dance").await;
    assert_eq!(out, "Unknown command: /dance. Type /help.\n");

    let (flow, _) = app.input("/quit").await;
    assert_eq!(flow, Flow::Quit);
    assert_eq!(parse_input("/help"), Some(ShellCommand::Help));
}
