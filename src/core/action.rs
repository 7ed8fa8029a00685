//! # Actions
//!
//! Everything that can happen in Lucky becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! API responds? That's `Action::ResponseReceived { .. }`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns an [`Effect`] describing any I/O the caller should
//! start. No side effects here. I/O happens elsewhere.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! ## Request cycle
//!
//! ```text
//!            Submit                 ResponseReceived
//!   Idle ─────────────▶ AwaitingResponse ─────────────▶ Idle
//!                              │
//!                              │ RequestFailed
//!                              ├─ no fallback ─▶ Idle (error reply)
//!                              ▼
//!                       AwaitingFallback ─ ResponseReceived ─▶ Idle
//!                              │
//!                              └─ RequestFailed ─▶ Idle (error reply)
//! ```

use log::{debug, info, warn};

use crate::core::message::{Author, Message};
use crate::core::state::{App, Phase, Toast, ToastLevel};
use crate::inference::Target;
use crate::relay::Attachment;

/// Reply shown when no provider could answer.
pub const ERROR_REPLY: &str =
    "I apologize, but I encountered an error processing your request. Please try again later.";

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The user sent the input box contents.
    Submit(String),
    ResponseReceived {
        session: u64,
        text: String,
    },
    RequestFailed {
        session: u64,
        target: Target,
        error: String,
    },
    AttachmentReady(Attachment),
    AttachmentFailed(String),
    TranscriptReady(String),
    TranscriptFailed(String),
    NewChat,
    DismissToast,
    Quit,
}

/// One completion request for the I/O layer to run.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnRequest {
    pub session: u64,
    pub target: Target,
    /// Conversation before the new user turn.
    pub history: Vec<Message>,
    /// Text sent as the new user turn.
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    SpawnRequest(TurnRequest),
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Submit(text) => submit(app, text),

        Action::ResponseReceived { session, text } => {
            if !accepts_reply(app, session) {
                return Effect::None;
            }
            let via_fallback = app.phase == Phase::AwaitingFallback;
            push_assistant(app, text);
            app.phase = Phase::Idle;
            app.in_flight = None;

            if via_fallback {
                let name = app
                    .providers
                    .fallback
                    .as_ref()
                    .map(|f| f.name().to_string())
                    .unwrap_or_default();
                app.show_toast(Toast::new(
                    ToastLevel::Success,
                    "Switched to fallback provider",
                    format!("Response provided by {name}"),
                ));
                app.status_message = format!("Answered by fallback ({name})");
            } else {
                app.status_message = String::from("Ready");
            }
            Effect::None
        }

        Action::RequestFailed {
            session,
            target,
            error,
        } => {
            if !accepts_reply(app, session) {
                return Effect::None;
            }
            let expected = match app.phase {
                Phase::AwaitingFallback => Target::Fallback,
                _ => Target::Primary,
            };
            if target != expected {
                debug!("Ignoring failure from {target} while waiting on {expected}");
                return Effect::None;
            }

            if target == Target::Primary
                && app.providers.has_fallback()
                && let Some(request) = app.in_flight.take()
            {
                info!("Primary failed ({error}), trying fallback");
                let retry = TurnRequest {
                    target: Target::Fallback,
                    ..request
                };
                app.in_flight = Some(retry.clone());
                app.phase = Phase::AwaitingFallback;
                app.show_toast(Toast::new(
                    ToastLevel::Info,
                    "Primary provider failed",
                    "Trying fallback provider...",
                ));
                app.status_message = String::from("Trying fallback...");
                return Effect::SpawnRequest(retry);
            }

            warn!("Giving up on turn after {target} failure: {error}");
            push_assistant(app, ERROR_REPLY.to_string());
            app.phase = Phase::Idle;
            app.in_flight = None;
            app.show_toast(Toast::new(ToastLevel::Error, "Error", error.clone()));
            app.status_message = format!("Request failed: {error}");
            Effect::None
        }

        Action::AttachmentReady(attachment) => {
            info!("Attachment staged: {}", attachment.name);
            app.show_toast(Toast::new(
                ToastLevel::Success,
                "File attached",
                attachment.name.clone(),
            ));
            app.status_message = format!("Attached {}", attachment.name);
            app.staged_attachment = Some(attachment);
            Effect::None
        }

        Action::AttachmentFailed(error) => {
            app.show_toast(Toast::new(ToastLevel::Error, "Upload failed", error));
            Effect::None
        }

        Action::TranscriptReady(text) => {
            if text.trim().is_empty() {
                app.show_toast(Toast::new(
                    ToastLevel::Info,
                    "Transcription",
                    "No speech detected",
                ));
            } else {
                app.show_toast(Toast::new(
                    ToastLevel::Success,
                    "Transcription ready",
                    "Text added to the input box",
                ));
                app.pending_transcript = Some(text);
            }
            Effect::None
        }

        Action::TranscriptFailed(error) => {
            app.show_toast(Toast::new(ToastLevel::Error, "Transcription failed", error));
            Effect::None
        }

        Action::NewChat => {
            app.session += 1;
            let seed = app.greeting_seed();
            app.store.reset(seed);
            app.phase = Phase::Idle;
            app.in_flight = None;
            app.staged_attachment = None;
            app.pending_transcript = None;
            app.toast = None;
            app.status_message = String::from("New chat");
            info!("Started new chat (session {})", app.session);
            Effect::None
        }

        Action::DismissToast => {
            app.toast = None;
            Effect::None
        }

        Action::Quit => Effect::Quit,
    }
}

fn submit(app: &mut App, text: String) -> Effect {
    if app.pending() {
        debug!("Submit ignored: request already in flight");
        return Effect::None;
    }
    let attachment = app.staged_attachment.take();
    if text.trim().is_empty() && attachment.is_none() {
        return Effect::None;
    }

    let content = match attachment {
        Some(a) if text.trim().is_empty() => a.message_line(),
        Some(a) => format!("{}\n\n{}", text, a.message_line()),
        None => text,
    };

    let history = app.store.all().to_vec();
    let id = app.store.next_id();
    app.store
        .append(Message::new(id, Author::User, content.clone()));

    let request = TurnRequest {
        session: app.session,
        target: Target::Primary,
        history,
        text: content,
    };
    app.in_flight = Some(request.clone());
    app.phase = Phase::AwaitingResponse;
    app.status_message = String::from("Thinking...");
    Effect::SpawnRequest(request)
}

/// Replies are only accepted for the current session while a request is out.
fn accepts_reply(app: &App, session: u64) -> bool {
    if session != app.session {
        debug!("Discarding reply for stale session {session} (current {})", app.session);
        return false;
    }
    if !app.pending() {
        debug!("Discarding reply while idle");
        return false;
    }
    true
}

fn push_assistant(app: &mut App, text: String) {
    let id = app.store.next_id();
    app.store.append(Message::new(id, Author::Assistant, text));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{test_app, test_app_with_fallback};

    fn spawned(effect: Effect) -> TurnRequest {
        match effect {
            Effect::SpawnRequest(request) => request,
            other => panic!("expected SpawnRequest, got {other:?}"),
        }
    }

    fn contents(app: &App) -> Vec<(Author, String)> {
        app.store
            .all()
            .iter()
            .map(|m| (m.author, m.content.clone()))
            .collect()
    }

    fn greeting() -> (Author, String) {
        (Author::Assistant, "Hello! test greeting".to_string())
    }

    #[test]
    fn test_submit_appends_user_turn_before_any_reply() {
        let mut app = test_app();
        let request = spawned(update(&mut app, Action::Submit("hi".into())));

        assert_eq!(
            contents(&app),
            vec![greeting(), (Author::User, "hi".to_string())]
        );
        assert_eq!(app.phase, Phase::AwaitingResponse);
        assert!(app.pending());
        assert_eq!(request.target, Target::Primary);
        assert_eq!(request.text, "hi");
        assert_eq!(request.history.len(), 1);
        assert_eq!(request.history[0].content, "Hello! test greeting");
    }

    #[test]
    fn test_primary_success() {
        let mut app = test_app();
        let request = spawned(update(&mut app, Action::Submit("hi".into())));
        let effect = update(
            &mut app,
            Action::ResponseReceived {
                session: request.session,
                text: "Hello!".into(),
            },
        );

        assert_eq!(effect, Effect::None);
        assert_eq!(app.phase, Phase::Idle);
        assert_eq!(
            contents(&app),
            vec![
                greeting(),
                (Author::User, "hi".to_string()),
                (Author::Assistant, "Hello!".to_string()),
            ]
        );
        assert!(app.toast.is_none());
    }

    #[test]
    fn test_primary_fails_fallback_succeeds() {
        let mut app = test_app_with_fallback();
        let first = spawned(update(&mut app, Action::Submit("hi".into())));

        let retry = spawned(update(
            &mut app,
            Action::RequestFailed {
                session: first.session,
                target: Target::Primary,
                error: "boom".into(),
            },
        ));
        assert_eq!(app.phase, Phase::AwaitingFallback);
        assert_eq!(retry.target, Target::Fallback);
        assert_eq!(retry.text, first.text);
        assert_eq!(retry.history, first.history);
        // Still only the greeting and the one user turn.
        assert_eq!(app.store.len(), 2);

        update(
            &mut app,
            Action::ResponseReceived {
                session: retry.session,
                text: "Fallback hello".into(),
            },
        );
        assert_eq!(app.phase, Phase::Idle);
        assert_eq!(
            app.store.last().map(|m| m.content.as_str()),
            Some("Fallback hello")
        );
        let toast = app.toast.as_ref().unwrap();
        assert_eq!(toast.title, "Switched to fallback provider");
        assert_eq!(toast.level, ToastLevel::Success);
    }

    #[test]
    fn test_both_fail_appends_error_reply() {
        let mut app = test_app_with_fallback();
        let first = spawned(update(&mut app, Action::Submit("hi".into())));
        let retry = spawned(update(
            &mut app,
            Action::RequestFailed {
                session: first.session,
                target: Target::Primary,
                error: "primary down".into(),
            },
        ));
        let effect = update(
            &mut app,
            Action::RequestFailed {
                session: retry.session,
                target: Target::Fallback,
                error: "fallback down".into(),
            },
        );

        assert_eq!(effect, Effect::None);
        assert_eq!(app.phase, Phase::Idle);
        assert_eq!(
            contents(&app),
            vec![
                greeting(),
                (Author::User, "hi".to_string()),
                (Author::Assistant, ERROR_REPLY.to_string()),
            ]
        );
    }

    #[test]
    fn test_primary_fails_without_fallback() {
        let mut app = test_app();
        let first = spawned(update(&mut app, Action::Submit("hi".into())));
        let effect = update(
            &mut app,
            Action::RequestFailed {
                session: first.session,
                target: Target::Primary,
                error: "API error (HTTP 401): Invalid API key".into(),
            },
        );

        assert_eq!(effect, Effect::None);
        assert_eq!(app.phase, Phase::Idle);
        assert_eq!(
            app.store.last().map(|m| m.content.as_str()),
            Some(ERROR_REPLY)
        );
        let toast = app.toast.as_ref().unwrap();
        assert_eq!(toast.level, ToastLevel::Error);
        assert!(toast.body.contains("Invalid API key"));
    }

    #[test]
    fn test_blank_submission_is_ignored() {
        let mut app = test_app();
        for text in ["", "   ", "\n\t"] {
            assert_eq!(update(&mut app, Action::Submit(text.into())), Effect::None);
        }
        assert_eq!(app.store.len(), 1);
        assert_eq!(app.phase, Phase::Idle);
    }

    #[test]
    fn test_submit_while_pending_is_ignored() {
        let mut app = test_app();
        spawned(update(&mut app, Action::Submit("first".into())));
        assert_eq!(
            update(&mut app, Action::Submit("second".into())),
            Effect::None
        );
        assert_eq!(app.store.len(), 2);
    }

    #[test]
    fn test_reply_ids_increase() {
        let mut app = test_app();
        let request = spawned(update(&mut app, Action::Submit("hi".into())));
        update(
            &mut app,
            Action::ResponseReceived {
                session: request.session,
                text: "yo".into(),
            },
        );
        let ids: Vec<u64> = app.store.all().iter().map(|m| m.id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_new_chat_discards_late_reply() {
        let mut app = test_app();
        let request = spawned(update(&mut app, Action::Submit("hi".into())));

        update(&mut app, Action::NewChat);
        assert_eq!(contents(&app), vec![greeting()]);
        assert!(!app.pending());

        update(
            &mut app,
            Action::ResponseReceived {
                session: request.session,
                text: "too late".into(),
            },
        );
        assert_eq!(contents(&app), vec![greeting()]);
    }

    #[test]
    fn test_reply_while_idle_is_discarded() {
        let mut app = test_app();
        update(
            &mut app,
            Action::ResponseReceived {
                session: 0,
                text: "unsolicited".into(),
            },
        );
        assert_eq!(app.store.len(), 1);
    }

    #[test]
    fn test_stale_primary_failure_during_fallback_is_ignored() {
        let mut app = test_app_with_fallback();
        let first = spawned(update(&mut app, Action::Submit("hi".into())));
        let failure = Action::RequestFailed {
            session: first.session,
            target: Target::Primary,
            error: "x".into(),
        };
        spawned(update(&mut app, failure.clone()));
        assert_eq!(update(&mut app, failure), Effect::None);
        assert_eq!(app.phase, Phase::AwaitingFallback);
        assert_eq!(app.store.len(), 2);
    }

    fn attachment() -> Attachment {
        Attachment {
            name: "photo.png".into(),
            url: "https://cdn.test/a.png".into(),
            mime: "image/png".into(),
            size: 10,
        }
    }

    #[test]
    fn test_staged_attachment_rides_with_next_submit() {
        let mut app = test_app();
        update(&mut app, Action::AttachmentReady(attachment()));
        assert!(app.staged_attachment.is_some());

        let request = spawned(update(&mut app, Action::Submit("look".into())));
        assert!(request.text.starts_with("look\n\n📎 photo.png"));
        assert!(request.text.ends_with("https://cdn.test/a.png"));
        assert!(app.staged_attachment.is_none());
    }

    #[test]
    fn test_attachment_alone_can_be_submitted() {
        let mut app = test_app();
        update(&mut app, Action::AttachmentReady(attachment()));
        let request = spawned(update(&mut app, Action::Submit(String::new())));
        assert!(request.text.starts_with("📎 photo.png"));
    }

    #[test]
    fn test_relay_failures_only_toast() {
        let mut app = test_app();
        update(&mut app, Action::AttachmentFailed("disk full".into()));
        assert_eq!(app.toast.as_ref().unwrap().level, ToastLevel::Error);
        update(&mut app, Action::TranscriptFailed("relay down".into()));
        assert_eq!(app.toast.as_ref().unwrap().title, "Transcription failed");
        assert_eq!(app.store.len(), 1);
        assert!(!app.pending());
    }

    #[test]
    fn test_transcript_is_held_for_the_input_box() {
        let mut app = test_app();
        update(&mut app, Action::TranscriptReady("hello world".into()));
        assert_eq!(app.pending_transcript.as_deref(), Some("hello world"));

        update(&mut app, Action::TranscriptReady("  ".into()));
        assert_eq!(app.toast.as_ref().unwrap().body, "No speech detected");
    }

    #[test]
    fn test_dismiss_toast_and_quit() {
        let mut app = test_app();
        update(&mut app, Action::AttachmentFailed("x".into()));
        update(&mut app, Action::DismissToast);
        assert!(app.toast.is_none());
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
    }
}
