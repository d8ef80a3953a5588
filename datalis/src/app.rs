use anyhow::Result;
use datalis_auth::{AuthPhase, HostedAuthProvider, SessionManager, SessionStore, Settings};
use dialoguer::{Input, Password};
use std::io::Stdout;
use std::sync::Arc;

use crate::commands::parse_input;
use crate::logging::init_logging;
use crate::shell::{Flow, Shell};

pub struct App {
    settings: Settings,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub async fn run(&self) -> Result<()> {
        let log_path = init_logging()?;
        tracing::info!(log = %log_path.display(), "datalis starting");

        let provider =
            HostedAuthProvider::new(&self.settings)?.with_session_store(SessionStore::new()?);
        let session = SessionManager::start(Arc::new(provider));
        session
            .reader()
            .wait_for(|s| s.phase() != AuthPhase::Initializing)
            .await;

        let mut shell = Shell::new(&self.settings, session, std::io::stdout());
        if shell.is_authenticated() {
            println!("Welcome back. Type /help for commands.");
        }

        loop {
            if !shell.is_authenticated() {
                match self.authenticate(&mut shell).await {
                    Ok(true) => continue,
                    Ok(false) => break,
                    Err(e) => {
                        tracing::error!("Sign-in prompt failed: {}", e);
                        break;
                    }
                }
            }

            let line = match prompt("you").await {
                Ok(line) => line,
                Err(e) => {
                    tracing::info!("Input closed: {}", e);
                    break;
                }
            };

            if let Some(command) = parse_input(&line) {
                if shell.handle(command).await? == Flow::Quit {
                    tracing::info!("Quit requested");
                    break;
                }
            }
        }

        tracing::info!("datalis exiting");
        Ok(())
    }

    /// Ask for credentials until the user signs in or gives up. Returns
    /// `false` when the user wants to leave.
    async fn authenticate(&self, shell: &mut Shell<Stdout>) -> Result<bool> {
        println!("Sign in, or type 'signup' to create an account ('quit' to leave).");
        let email = prompt("Email").await?;

        match email.trim() {
            "quit" | "/quit" => Ok(false),
            "signup" => {
                let email = prompt("Email").await?;
                let name = prompt("Display name").await?;
                let password = prompt_password("Password", true).await?;
                shell.signup(email.trim(), &password, name.trim()).await?;
                Ok(true)
            }
            email => {
                let password = prompt_password("Password", false).await?;
                if shell.login(email, &password).await? {
                    println!("Type /help for commands.");
                }
                Ok(true)
            }
        }
    }
}

async fn prompt(label: &'static str) -> Result<String> {
    let line = tokio::task::spawn_blocking(move || {
        Input::<String>::new()
            .with_prompt(label)
            .allow_empty(true)
            .interact_text()
    })
    .await??;
    Ok(line)
}

async fn prompt_password(label: &'static str, confirm: bool) -> Result<String> {
    let password = tokio::task::spawn_blocking(move || {
        let mut prompt = Password::new().with_prompt(label);
        if confirm {
            prompt = prompt.with_confirmation("Repeat password", "Passwords don't match");
        }
        prompt.interact()
    })
    .await??;
    Ok(password)
}
