use anyhow::Result;
use datalis_api::endpoints::chat::ChatSession;
use datalis_api::endpoints::workbenches::Workbench;
use datalis_api::{Client, DatalisApiError};
use datalis_auth::{AuthStateReader, SessionManager, Settings};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use crate::api_state::error_message;
use crate::commands::{ShellCommand, HELP};
use crate::credits::CreditsWallet;
use crate::hooks::{ChatHook, WorkbenchesHook};

/// How long a successful login may take to show up on the event stream.
const SIGN_IN_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Terminal-independent core of the chat shell.
///
/// Generic over the output so tests can capture what the user would see.
pub struct Shell<W: Write> {
    session: SessionManager,
    auth: AuthStateReader,
    workbenches: WorkbenchesHook,
    chat: ChatHook,
    wallet: CreditsWallet,
    listed: Vec<Workbench>,
    active: Option<ChatSession>,
    out: W,
}

impl<W: Write> Shell<W> {
    pub fn new(settings: &Settings, session: SessionManager, out: W) -> Self {
        let auth = session.reader();
        let tokens = auth.clone();
        let client = Arc::new(Client::new(&settings.backend_url, move || {
            tokens.access_token()
        }));

        Self {
            workbenches: WorkbenchesHook::new(client.clone()),
            chat: ChatHook::new(client),
            wallet: CreditsWallet::new(settings, auth.clone()),
            auth,
            session,
            listed: Vec::new(),
            active: None,
            out,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated()
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn active_session(&self) -> Option<&ChatSession> {
        self.active.as_ref()
    }

    /// Sign in and wait for the session to arrive. Returns whether the user
    /// ended up signed in.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<bool> {
        let result = self.session.login(email, password).await;
        if let Some(error) = result.error() {
            writeln!(self.out, "Login failed: {}", error)?;
            return Ok(false);
        }

        let mut auth = self.auth.clone();
        let signed_in = tokio::time::timeout(SIGN_IN_TIMEOUT, auth.wait_for(|s| s.is_authenticated()))
            .await
            .ok()
            .flatten();
        let Some(state) = signed_in else {
            tracing::warn!("Login succeeded but no session arrived");
            writeln!(self.out, "Login failed: no session received")?;
            return Ok(false);
        };

        let name = state
            .user
            .as_ref()
            .and_then(|u| u.username().map(str::to_string).or_else(|| u.email.clone()))
            .unwrap_or_default();
        writeln!(self.out, "Signed in as {}.", name)?;

        if let Ok(credits) = self.wallet.refetch().await {
            writeln!(self.out, "You have {} credits.", credits)?;
        }
        Ok(true)
    }

    pub async fn signup(&mut self, email: &str, password: &str, display_name: &str) -> Result<()> {
        let result = self.session.signup(email, password, display_name).await;
        match (result.error(), result.message()) {
            (Some(error), _) => writeln!(self.out, "Signup failed: {}", error)?,
            (None, Some(message)) => writeln!(self.out, "{}", message)?,
            (None, None) => writeln!(self.out, "Account created.")?,
        }
        Ok(())
    }

    pub async fn handle(&mut self, command: ShellCommand) -> Result<Flow> {
        tracing::debug!(?command, "Handling shell command");

        match command {
            ShellCommand::Help => writeln!(self.out, "{}", HELP)?,
            ShellCommand::Quit => return Ok(Flow::Quit),
            ShellCommand::Logout => {
                self.session.sign_out().await;
                self.listed.clear();
                self.active = None;
                writeln!(self.out, "Signed out.")?;
            }
            ShellCommand::Credits => match self.wallet.refetch().await {
                Ok(credits) => writeln!(self.out, "Credits: {}", credits)?,
                Err(_) => writeln!(self.out, "Failed to fetch credit balance")?,
            },
            ShellCommand::Workbenches => self.list_workbenches().await?,
            ShellCommand::Open(n) => self.open(n).await?,
            ShellCommand::Sessions => match self.chat.get_sessions().await {
                Ok(sessions) if sessions.is_empty() => writeln!(self.out, "No chat sessions yet.")?,
                Ok(sessions) => {
                    for session in sessions {
                        writeln!(
                            self.out,
                            "  {}  {}",
                            session.created_at,
                            session.title.as_deref().unwrap_or("(untitled)")
                        )?;
                    }
                }
                Err(e) => self.report(&e)?,
            },
            ShellCommand::History => {
                let Some(session_id) = self.active.as_ref().map(|s| s.session_id.clone()) else {
                    return self.no_chat();
                };
                match self.chat.get_messages(&session_id).await {
                    Ok(messages) => {
                        for message in messages {
                            writeln!(self.out, "[{}] {}", message.message_type, message.content)?;
                        }
                    }
                    Err(e) => self.report(&e)?,
                }
            }
            ShellCommand::Status => {
                let Some(workbench_id) = self.active.as_ref().map(|s| s.workbench_id.clone())
                else {
                    return self.no_chat();
                };
                match self.workbenches.get_status(&workbench_id).await {
                    Ok(status) => writeln!(
                        self.out,
                        "Indexing: {:?} ({}/{} files indexed, {} failed)",
                        status.status, status.indexed_files, status.total_files, status.failed_files
                    )?,
                    Err(e) => self.report(&e)?,
                }
            }
            ShellCommand::Send(content) => {
                let Some(session_id) = self.active.as_ref().map(|s| s.session_id.clone()) else {
                    return self.no_chat();
                };
                match self.chat.send_message(&session_id, &content).await {
                    Ok(reply) => writeln!(self.out, "{}", reply.message)?,
                    Err(e) => self.report(&e)?,
                }
            }
            ShellCommand::Unknown(input) => {
                writeln!(self.out, "Unknown command: {}. Type /help.", input)?
            }
        }

        Ok(Flow::Continue)
    }

    async fn list_workbenches(&mut self) -> Result<()> {
        match self.workbenches.get_workbenches(None).await {
            Ok(workbenches) if workbenches.is_empty() => {
                writeln!(self.out, "No workbenches yet.")?;
                self.listed.clear();
            }
            Ok(workbenches) => {
                for (i, workbench) in workbenches.iter().enumerate() {
                    writeln!(self.out, "{:>3}. {}", i + 1, workbench.name)?;
                }
                self.listed = workbenches;
            }
            Err(e) => self.report(&e)?,
        }
        Ok(())
    }

    async fn open(&mut self, n: usize) -> Result<()> {
        let picked = n.checked_sub(1).and_then(|i| self.listed.get(i)).cloned();
        let Some(workbench) = picked else {
            writeln!(self.out, "No workbench {}. Run /workbenches first.", n)?;
            return Ok(());
        };

        match self.chat.create_session(&workbench.id, None).await {
            Ok(session) => {
                writeln!(self.out, "Chatting about {} ({}).", workbench.name, session.title)?;
                self.active = Some(session);
            }
            Err(e) => self.report(&e)?,
        }
        Ok(())
    }

    fn no_chat(&mut self) -> Result<Flow> {
        writeln!(self.out, "Open a workbench first with /open <n>.")?;
        Ok(Flow::Continue)
    }

    fn report(&mut self, err: &DatalisApiError) -> Result<()> {
        writeln!(self.out, "Error: {}", error_message(err))?;
        Ok(())
    }
}
