//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, AppState, LoginFocus, Tab};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Handle login overlay
    if matches!(app.state, AppState::LoggingIn) {
        handle_login_input(app, key);
        return Ok(false);
    }

    // Handle enrollment-name overlay
    if matches!(app.state, AppState::EnteringName) {
        handle_name_input(app, key);
        return Ok(false);
    }

    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    // Handle clear-all confirmation
    if matches!(app.state, AppState::ConfirmingClear) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                app.state = AppState::Normal;
                app.clear_visible_enrollments();
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    // Normal mode
    match key.code {
        KeyCode::Char('q') => app.state = AppState::ConfirmingQuit,
        KeyCode::Char('?') => app.state = AppState::ShowingHelp,

        // Tab switching
        KeyCode::Char('1') => app.current_tab = Tab::Enrollments,
        KeyCode::Char('2') => app.current_tab = Tab::Activity,
        KeyCode::Char('3') => app.current_tab = Tab::Settings,
        KeyCode::Char('4') => app.current_tab = Tab::System,
        KeyCode::Right => app.current_tab = app.current_tab.next(),
        KeyCode::Left => app.current_tab = app.current_tab.prev(),

        // List navigation
        KeyCode::Down | KeyCode::Char('j') => move_selection(app, 1),
        KeyCode::Up | KeyCode::Char('k') => move_selection(app, -1),

        // Refresh
        KeyCode::Char('r') | KeyCode::Char('u') => app.refresh_all(),

        // Session
        KeyCode::Char('L') => app.start_login(),
        KeyCode::Char('O') => app.logout(),

        // Enrollments tab actions
        KeyCode::Char('t') if app.current_tab == Tab::Enrollments => {
            app.enroll_kind = app.enroll_kind.other();
            app.enroll_selection = 0;
        }
        KeyCode::Char('n') if app.current_tab == Tab::Enrollments => {
            app.enroll_name_input.clear();
            app.state = AppState::EnteringName;
        }
        KeyCode::Char(' ') if app.current_tab == Tab::Enrollments => {
            app.toggle_selected_enrollment();
        }
        KeyCode::Char('d') | KeyCode::Delete if app.current_tab == Tab::Enrollments => {
            app.delete_selected_enrollment();
        }
        KeyCode::Char('D') if app.current_tab == Tab::Enrollments => {
            app.state = AppState::ConfirmingClear;
        }
        KeyCode::Char('x') if app.current_tab == Tab::Enrollments => {
            app.cancel_enrollment();
        }

        // Settings tab actions
        KeyCode::Char(' ') | KeyCode::Enter if app.current_tab == Tab::Settings => {
            app.toggle_selected_setting();
        }

        // System tab actions
        KeyCode::Char('B') if app.current_tab == Tab::System => {
            app.reboot_device();
        }
        KeyCode::Char('P') if app.current_tab == Tab::System => {
            app.capture_photo();
        }

        _ => {}
    }

    Ok(false)
}

fn move_selection(app: &mut App, delta: isize) {
    let len = match app.current_tab {
        Tab::Enrollments => app.visible_enrollments().len(),
        Tab::Activity => app.log_entries.len(),
        Tab::Settings => app.settings.display_rows().len(),
        Tab::System => return,
    };
    if len == 0 {
        return;
    }

    let selection = match app.current_tab {
        Tab::Enrollments => &mut app.enroll_selection,
        Tab::Activity => &mut app.log_selection,
        Tab::Settings => &mut app.settings_selection,
        Tab::System => return,
    };
    let moved = (*selection as isize + delta).clamp(0, len as isize - 1);
    *selection = moved as usize;
}

fn handle_login_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            // Anonymous operation stays available unless config forbids it
            if app.config.allow_anonymous {
                app.state = AppState::Normal;
            }
        }
        KeyCode::Tab | KeyCode::Down => {
            app.login_focus = match app.login_focus {
                LoginFocus::Username => LoginFocus::Password,
                LoginFocus::Password => LoginFocus::Button,
                LoginFocus::Button => LoginFocus::Username,
            };
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.login_focus = match app.login_focus {
                LoginFocus::Username => LoginFocus::Button,
                LoginFocus::Password => LoginFocus::Username,
                LoginFocus::Button => LoginFocus::Password,
            };
        }
        KeyCode::Enter => match app.login_focus {
            LoginFocus::Username => app.login_focus = LoginFocus::Password,
            LoginFocus::Password | LoginFocus::Button => app.submit_login(),
        },
        KeyCode::Backspace => match app.login_focus {
            LoginFocus::Username => {
                app.login_username.pop();
            }
            LoginFocus::Password => {
                app.login_password.pop();
            }
            LoginFocus::Button => {}
        },
        KeyCode::Char(c) => match app.login_focus {
            LoginFocus::Username if app.can_add_username_char() => {
                app.login_username.push(c);
            }
            LoginFocus::Password if app.can_add_password_char() => {
                app.login_password.push(c);
            }
            _ => {}
        },
        _ => {}
    }
}

fn handle_name_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.enroll_name_input.clear();
            app.state = AppState::Normal;
        }
        KeyCode::Enter => {
            app.state = AppState::Normal;
            app.start_enrollment();
        }
        KeyCode::Backspace => {
            app.enroll_name_input.pop();
        }
        KeyCode::Char(c) if app.can_add_enroll_name_char() => {
            app.enroll_name_input.push(c);
        }
        _ => {}
    }
}
