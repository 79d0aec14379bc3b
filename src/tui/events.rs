//! Keyboard handling. Keys either mutate display state directly (quit,
//! prompts) or come back as a `Command` for the event loop to dispatch.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::app::{App, PromptMode};

/// Work the event loop has to carry out outside the app state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Pull every source now instead of waiting out the intervals.
    Refresh,
    AddMiner { name: String, ip: String },
    DeleteMiner { name: String },
    Assist { question: String },
}

pub fn handle_key(app: &mut App, key: KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return None;
    }
    if app.prompt.is_open() {
        return handle_prompt_key(app, key);
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
            app.should_quit = true;
            None
        }
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::Refresh),
        KeyCode::Char('a') | KeyCode::Char('A') => {
            app.prompt.open(PromptMode::AddName);
            None
        }
        KeyCode::Char('d') | KeyCode::Char('D') => {
            app.prompt.open(PromptMode::DeleteName);
            None
        }
        KeyCode::Char('i') | KeyCode::Char('I') => {
            app.prompt.open(PromptMode::AiQuestion);
            None
        }
        _ => None,
    }
}

fn handle_prompt_key(app: &mut App, key: KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Esc => {
            app.prompt.cancel();
            None
        }
        KeyCode::Backspace => {
            app.prompt.backspace();
            None
        }
        KeyCode::Enter => submit_prompt(app),
        KeyCode::Char(c) => {
            app.prompt.push(c);
            None
        }
        _ => None,
    }
}

/// Closes the prompt stage. Add collects the name first and reopens for the
/// ip; validation of the collected values happens in the control actions.
fn submit_prompt(app: &mut App) -> Option<Command> {
    let mode = app.prompt.mode.take()?;
    let input = std::mem::take(&mut app.prompt.buffer);
    match mode {
        PromptMode::AddName => {
            app.prompt.mode = Some(PromptMode::AddIp { name: input });
            None
        }
        PromptMode::AddIp { name } => Some(Command::AddMiner { name, ip: input }),
        PromptMode::DeleteName => Some(Command::DeleteMiner { name: input }),
        PromptMode::AiQuestion => Some(Command::Assist { question: input }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::TuiConfig;

    fn app() -> App {
        App::new(&TuiConfig {
            grid_slots: 9,
            gauge_max_hashrate: 10.0,
            power_cost_per_kwh: 0.13,
            assist_provider: "smart".to_string(),
            feed_enabled: true,
        })
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn q_quits() {
        let mut app = app();
        assert_eq!(handle_key(&mut app, press(KeyCode::Char('q'))), None);
        assert!(app.should_quit);
    }

    #[test]
    fn esc_quits_outside_a_prompt() {
        let mut app = app();
        handle_key(&mut app, press(KeyCode::Esc));
        assert!(app.should_quit);
    }

    #[test]
    fn ctrl_c_quits_even_inside_a_prompt() {
        let mut app = app();
        app.prompt.open(PromptMode::AiQuestion);
        handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.should_quit);
    }

    #[test]
    fn r_requests_refresh() {
        let mut app = app();
        assert_eq!(
            handle_key(&mut app, press(KeyCode::Char('r'))),
            Some(Command::Refresh)
        );
    }

    #[test]
    fn release_events_are_ignored() {
        let mut app = app();
        let mut key = press(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;
        assert_eq!(handle_key(&mut app, key), None);
        assert!(!app.should_quit);
    }

    #[test]
    fn add_flow_collects_name_then_ip() {
        let mut app = app();
        handle_key(&mut app, press(KeyCode::Char('a')));
        assert_eq!(app.prompt.mode, Some(PromptMode::AddName));

        for c in "gamma".chars() {
            handle_key(&mut app, press(KeyCode::Char(c)));
        }
        assert_eq!(handle_key(&mut app, press(KeyCode::Enter)), None);
        assert_eq!(
            app.prompt.mode,
            Some(PromptMode::AddIp {
                name: "gamma".to_string()
            })
        );

        for c in "10.0.0.7".chars() {
            handle_key(&mut app, press(KeyCode::Char(c)));
        }
        assert_eq!(
            handle_key(&mut app, press(KeyCode::Enter)),
            Some(Command::AddMiner {
                name: "gamma".to_string(),
                ip: "10.0.0.7".to_string()
            })
        );
        assert!(!app.prompt.is_open());
    }

    #[test]
    fn delete_flow_collects_name() {
        let mut app = app();
        handle_key(&mut app, press(KeyCode::Char('d')));
        handle_key(&mut app, press(KeyCode::Char('x')));
        assert_eq!(
            handle_key(&mut app, press(KeyCode::Enter)),
            Some(Command::DeleteMiner {
                name: "x".to_string()
            })
        );
    }

    #[test]
    fn assist_flow_collects_question() {
        let mut app = app();
        handle_key(&mut app, press(KeyCode::Char('i')));
        handle_key(&mut app, press(KeyCode::Char('?')));
        assert_eq!(
            handle_key(&mut app, press(KeyCode::Enter)),
            Some(Command::Assist {
                question: "?".to_string()
            })
        );
    }

    #[test]
    fn esc_cancels_a_prompt_without_quitting() {
        let mut app = app();
        handle_key(&mut app, press(KeyCode::Char('a')));
        handle_key(&mut app, press(KeyCode::Char('g')));
        handle_key(&mut app, press(KeyCode::Esc));
        assert!(!app.should_quit);
        assert!(!app.prompt.is_open());
        assert!(app.prompt.buffer.is_empty());
    }

    #[test]
    fn prompt_captures_q_as_text() {
        let mut app = app();
        handle_key(&mut app, press(KeyCode::Char('i')));
        handle_key(&mut app, press(KeyCode::Char('q')));
        assert!(!app.should_quit);
        assert_eq!(app.prompt.buffer, "q");
    }

    #[test]
    fn backspace_edits_the_prompt() {
        let mut app = app();
        handle_key(&mut app, press(KeyCode::Char('d')));
        handle_key(&mut app, press(KeyCode::Char('a')));
        handle_key(&mut app, press(KeyCode::Char('b')));
        handle_key(&mut app, press(KeyCode::Backspace));
        assert_eq!(app.prompt.buffer, "a");
    }
}
