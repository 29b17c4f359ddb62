//! Event handling for the TUI

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{App, Screen};

/// Result of handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Continue,
    Quit,
    NeedsRedraw,
}

/// Handle a terminal event
pub fn handle_event(app: &mut App, event: Event) -> EventResult {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key_event(app, key),
        Event::Resize(_, _) => EventResult::NeedsRedraw,
        _ => EventResult::Continue,
    }
}

/// Digit keys 1-9 as a zero-based option index
fn digit_index(code: KeyCode) -> Option<usize> {
    match code {
        KeyCode::Char(c @ '1'..='9') => c.to_digit(10).map(|d| d as usize - 1),
        _ => None,
    }
}

/// Handle a key event
fn handle_key_event(app: &mut App, key: KeyEvent) -> EventResult {
    // Global shortcuts (always work)
    if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
        return EventResult::Quit;
    }

    if app.show_help {
        // Any key closes help
        app.toggle_help();
        return EventResult::NeedsRedraw;
    }

    if let KeyCode::Char('?') | KeyCode::F(1) = key.code {
        app.toggle_help();
        return EventResult::NeedsRedraw;
    }

    if app.screen != Screen::Menu && key.code == KeyCode::Esc {
        app.back_to_menu();
        return EventResult::NeedsRedraw;
    }

    match app.screen {
        Screen::Menu => handle_menu(app, key),
        Screen::Math => handle_math(app, key),
        Screen::Adventure => handle_adventure(app, key),
        Screen::Drawing => handle_drawing(app, key),
        Screen::Imagination => handle_imagination(app, key),
        Screen::Builder => handle_builder(app, key),
        Screen::Report => handle_report(app, key),
    }
}

fn handle_menu(app: &mut App, key: KeyEvent) -> EventResult {
    if let Some(index) = digit_index(key.code) {
        if index < Screen::MENU.len() {
            app.menu_index = index;
            app.open_selected();
        }
        return EventResult::NeedsRedraw;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => EventResult::Quit,
        KeyCode::Char('j') | KeyCode::Down => {
            app.menu_down();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.menu_up();
            EventResult::NeedsRedraw
        }
        KeyCode::Enter => {
            app.open_selected();
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

fn handle_math(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Char(c @ ('0'..='9' | '-')) => app.math_type(c),
        KeyCode::Backspace => app.math_backspace(),
        KeyCode::Enter => app.submit_math(),
        KeyCode::Char('d') => app.cycle_difficulty(),
        KeyCode::Char('q') => app.back_to_menu(),
        _ => return EventResult::Continue,
    }
    EventResult::NeedsRedraw
}

fn handle_drawing(app: &mut App, key: KeyEvent) -> EventResult {
    if let Some(index) = digit_index(key.code) {
        app.canvas.set_colour(index);
        return EventResult::NeedsRedraw;
    }

    match key.code {
        KeyCode::Left | KeyCode::Char('h') => app.move_brush(-1, 0),
        KeyCode::Right | KeyCode::Char('l') => app.move_brush(1, 0),
        KeyCode::Up | KeyCode::Char('k') => app.move_brush(0, -1),
        KeyCode::Down | KeyCode::Char('j') => app.move_brush(0, 1),
        KeyCode::Char(' ') => app.toggle_pen(),
        KeyCode::Char('c') => app.clear_canvas(),
        KeyCode::Char('q') => app.back_to_menu(),
        _ => return EventResult::Continue,
    }
    EventResult::NeedsRedraw
}

fn handle_adventure(app: &mut App, key: KeyEvent) -> EventResult {
    if let Some(index) = digit_index(key.code) {
        app.choose_story(index);
        return EventResult::NeedsRedraw;
    }

    match key.code {
        KeyCode::Char('r') => {
            app.restart_story();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('q') => {
            app.back_to_menu();
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

fn handle_imagination(app: &mut App, key: KeyEvent) -> EventResult {
    if let Some(index) = digit_index(key.code) {
        app.pick_idea(index);
        return EventResult::NeedsRedraw;
    }

    match key.code {
        KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => {
            app.next_category();
            EventResult::NeedsRedraw
        }
        KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => {
            app.previous_category();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('t') => {
            app.request_story();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('q') => {
            app.back_to_menu();
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

fn handle_builder(app: &mut App, key: KeyEvent) -> EventResult {
    if let Some(index) = digit_index(key.code) {
        app.choose_builder(index);
        return EventResult::NeedsRedraw;
    }

    match key.code {
        KeyCode::Char('n') => {
            app.new_builder_story();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('t') => {
            app.request_story();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('q') => {
            app.back_to_menu();
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

fn handle_report(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Char('r') => {
            app.open(Screen::Report);
            EventResult::NeedsRedraw
        }
        KeyCode::Char('i') => {
            app.request_insights();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('q') => {
            app.back_to_menu();
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}
