//! REPL (Read-Eval-Print Loop) for an interactive assessment

use crate::ConsoleFormatter;
use crate::ProgressReporter;
use crate::ReplConfig;
use crate::StructuredResults;
use crate::cli::session::generate_session_id;
use assess_application::{AssessmentError, ConductAssessmentUseCase, ErrorKind, GetResultsUseCase};
use colored::Colorize;
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use std::path::PathBuf;
use thiserror::Error;

const HISTORY_CAPACITY: usize = 500;

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("line editor error: {0}")]
    Editor(#[from] std::io::Error),

    #[error(transparent)]
    Assessment(#[from] AssessmentError),
}

/// What a slash command asks the loop to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplAction {
    Continue,
    Exit,
}

/// Interactive assessment REPL
pub struct ChatRepl {
    conduct: ConductAssessmentUseCase,
    results: GetResultsUseCase,
    owner_id: String,
    session_id: Option<String>,
    progress: ProgressReporter,
    history_file: Option<PathBuf>,
}

impl ChatRepl {
    pub fn new(
        conduct: ConductAssessmentUseCase,
        results: GetResultsUseCase,
        owner_id: impl Into<String>,
    ) -> Self {
        Self {
            conduct,
            results,
            owner_id: owner_id.into(),
            session_id: None,
            progress: ProgressReporter::new(),
            history_file: ReplConfig::default().history_file,
        }
    }

    /// Apply progress and history settings
    pub fn with_config(self, config: &ReplConfig) -> Self {
        self.with_progress(config.show_progress)
            .with_history_file(config.history_file.clone())
    }

    /// Continue this session instead of the latest unfinished one
    pub fn with_session(mut self, session_id: Option<String>) -> Self {
        self.session_id = session_id;
        self
    }

    /// Set whether to show progress
    pub fn with_progress(mut self, show: bool) -> Self {
        self.progress = if show {
            ProgressReporter::new()
        } else {
            ProgressReporter::hidden()
        };
        self
    }

    pub fn with_history_file(mut self, path: Option<PathBuf>) -> Self {
        self.history_file = path;
        self
    }

    /// Run the interactive REPL until the assessment finishes or the user quits
    pub async fn run(&mut self) -> Result<(), ChatError> {
        let mut line_editor = self.line_editor();
        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("digi-assess".to_string()),
            DefaultPromptSegment::Empty,
        );

        self.print_welcome();
        let Some(session_id) = self.open_session().await? else {
            return Ok(());
        };

        loop {
            match line_editor.read_line(&prompt)? {
                Signal::Success(line) => {
                    let line = line.trim();

                    if line.is_empty() {
                        continue;
                    }

                    if line.starts_with('/') {
                        if self.handle_command(line, &session_id).await == ReplAction::Exit {
                            break;
                        }
                        continue;
                    }

                    if self.process_answer(&session_id, line).await == ReplAction::Exit {
                        break;
                    }
                }
                Signal::CtrlC => {
                    println!("^C");
                    continue;
                }
                Signal::CtrlD => {
                    println!("À bientôt ! Reprenez avec: digi-assess chat --session {}", session_id);
                    break;
                }
            }
        }

        Ok(())
    }

    fn line_editor(&self) -> Reedline {
        let editor = Reedline::create();
        let Some(path) = &self.history_file else {
            return editor;
        };
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match FileBackedHistory::with_file(HISTORY_CAPACITY, path.clone()) {
            Ok(history) => editor.with_history(Box::new(history)),
            Err(_) => editor,
        }
    }

    /// Resume the requested or latest session, or open a new one.
    ///
    /// Returns `None` when the session is already finished; its results are
    /// printed instead.
    async fn open_session(&mut self) -> Result<Option<String>, ChatError> {
        let existing = match &self.session_id {
            Some(id) => Some(id.clone()),
            None => self.conduct.latest_session_id(&self.owner_id).await?,
        };

        if let Some(id) = existing {
            let resumed = self
                .progress
                .run("Reprise de la session...", self.conduct.resume(&id, &self.owner_id))
                .await;
            match resumed {
                Ok(state) => {
                    println!(
                        "{}",
                        ConsoleFormatter::format_resume(&state, self.conduct.catalog().len())
                    );
                    self.session_id = Some(id.clone());
                    if state.is_finished() {
                        self.print_results(&id).await;
                        return Ok(None);
                    }
                    return Ok(Some(id));
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }

        let id = self
            .session_id
            .clone()
            .unwrap_or_else(|| generate_session_id(&self.owner_id));
        let turn = self
            .progress
            .run(
                "Préparation de la première question...",
                self.conduct.start(&id, &self.owner_id),
            )
            .await?;
        println!("{} {}\n", "Session:".dimmed(), id);
        println!("{}", ConsoleFormatter::format_turn(&turn));
        self.session_id = Some(id.clone());
        Ok(Some(id))
    }

    async fn process_answer(&self, session_id: &str, answer: &str) -> ReplAction {
        let result = self
            .progress
            .run(
                "Analyse de votre réponse...",
                self.conduct.submit_answer(session_id, &self.owner_id, answer),
            )
            .await;

        match result {
            Ok(turn) => {
                println!("{}", ConsoleFormatter::format_turn(&turn));
                if turn.is_finished() {
                    self.print_results(session_id).await;
                    return ReplAction::Exit;
                }
            }
            Err(e) if e.kind() == ErrorKind::UpstreamFailure => {
                eprintln!(
                    "{} {}",
                    "Le service d'évaluation ne répond pas, votre réponse n'a pas été enregistrée. Réessayez.".yellow(),
                    format!("({})", e).dimmed()
                );
            }
            Err(e) if e.kind() == ErrorKind::ValidationError => {
                eprintln!("{} {}", "!".yellow().bold(), e);
            }
            Err(e) => {
                eprintln!("{} {}", "Error:".red().bold(), e);
            }
        }
        ReplAction::Continue
    }

    async fn print_results(&self, session_id: &str) {
        match self.results.execute(session_id, &self.owner_id).await {
            Ok(results) => {
                let doc = StructuredResults::new(&results, self.results.catalog());
                println!("{}", ConsoleFormatter::format_results(&doc));
            }
            Err(e) => eprintln!("{} {}", "Error:".red().bold(), e),
        }
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│      digi-assess - Diagnostic digital       │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Répondez librement à chaque question.");
        println!();
        println!("Commands:");
        println!("  /help     - Show this help");
        println!("  /status   - Show the current question");
        println!("  /results  - Show the results so far");
        println!("  /quit     - Exit chat");
        println!();
    }

    /// Handle slash commands.
    async fn handle_command(&self, cmd: &str, session_id: &str) -> ReplAction {
        match cmd {
            "/quit" | "/exit" | "/q" => {
                println!("À bientôt ! Reprenez avec: digi-assess chat --session {}", session_id);
                ReplAction::Exit
            }
            "/help" | "/h" | "/?" => {
                println!();
                println!("Commands:");
                println!("  /help, /h, /?    - Show this help");
                println!("  /status          - Show the current question");
                println!("  /results         - Show the results so far");
                println!("  /quit, /exit, /q - Exit chat");
                println!();
                ReplAction::Continue
            }
            "/status" => {
                match self.conduct.resume(session_id, &self.owner_id).await {
                    Ok(state) => println!(
                        "{}",
                        ConsoleFormatter::format_resume(&state, self.conduct.catalog().len())
                    ),
                    Err(e) => eprintln!("{} {}", "Error:".red().bold(), e),
                }
                ReplAction::Continue
            }
            "/results" => {
                self.print_results(session_id).await;
                ReplAction::Continue
            }
            _ => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
                ReplAction::Continue
            }
        }
    }
}
