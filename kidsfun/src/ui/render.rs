//! Render orchestration for the kidsfun TUI

use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

use kidsfun_core::activities::{Category, Difficulty, BUILDER_STEPS};
use kidsfun_core::report::Unit;
use kidsfun_core::Report;

use crate::app::{App, Screen};
use crate::canvas::{CANVAS_HEIGHT, CANVAS_WIDTH, PALETTE_SIZE};

/// Height of the storyteller panel when a generated story is showing
const GENERATED_HEIGHT: u16 = 8;

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let generated_height = if app.generated.is_some() {
        GENERATED_HEIGHT
    } else {
        0
    };
    let [title_area, body_area, generated_area, status_area, hotkey_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(5),
        Constraint::Length(generated_height),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    render_title_bar(frame, app, title_area);

    match app.screen {
        Screen::Menu => render_menu(frame, app, body_area),
        Screen::Math => render_math(frame, app, body_area),
        Screen::Adventure => render_adventure(frame, app, body_area),
        Screen::Drawing => render_drawing(frame, app, body_area),
        Screen::Imagination => render_imagination(frame, app, body_area),
        Screen::Builder => render_builder(frame, app, body_area),
        Screen::Report => render_report(frame, app, body_area),
    }

    if let Some(story) = &app.generated {
        render_generated(frame, app, story, generated_area);
    }

    render_status_bar(frame, app, status_area);
    render_hotkey_bar(frame, app, hotkey_area);

    if app.show_help {
        render_help_overlay(frame, app, area);
    }
}

/// Render the title bar
fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = match app.screen {
        Screen::Menu => format!(" {} ", app.screen.title()),
        screen => format!(" {} | {} ", Screen::Menu.title(), screen.title()),
    };
    let line = Line::from(Span::styled(title, app.theme.title_style()));
    frame.render_widget(Paragraph::new(line), area);
}

fn bordered<'a>(app: &App, title: &'a str) -> Block<'a> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(true))
}

/// Numbered option lines, with the picked one marked
fn option_lines<'a>(app: &App, options: &[&'a str], picked: Option<&str>) -> Vec<Line<'a>> {
    options
        .iter()
        .enumerate()
        .map(|(i, &option)| {
            let is_picked = picked == Some(option);
            let style = if is_picked {
                app.theme.picked_style()
            } else {
                app.theme.choice_style()
            };
            let marker = if is_picked { " *" } else { "" };
            Line::from(Span::styled(format!("  {}. {option}{marker}", i + 1), style))
        })
        .collect()
}

fn render_menu(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![
        Line::from(Span::styled(
            "What would you like to do today?",
            app.theme.text_style(),
        )),
        Line::from(""),
    ];

    for (i, screen) in Screen::MENU.iter().enumerate() {
        let style = if i == app.menu_index {
            app.theme.highlight_style()
        } else {
            app.theme.choice_style()
        };
        lines.push(Line::from(Span::styled(
            format!("  {}. {}  ", i + 1, screen.title()),
            style,
        )));
    }

    let paragraph = Paragraph::new(lines).block(bordered(app, "Menu"));
    frame.render_widget(paragraph, area);
}

fn render_math(frame: &mut Frame, app: &App, area: Rect) {
    let levels: Vec<Span> = Difficulty::ALL
        .iter()
        .flat_map(|&level| {
            let style = if level == app.difficulty {
                app.theme.highlight_style()
            } else {
                app.theme.system_style()
            };
            [Span::styled(format!(" {} ", level.label()), style), Span::raw(" ")]
        })
        .collect();

    let mut lines = vec![
        Line::from(levels),
        Line::from(""),
        Line::from(Span::styled(
            app.problem.to_string(),
            app.theme.story_style().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Your answer: ", app.theme.text_style()),
            Span::styled(format!("{}_", app.math_input), app.theme.choice_style()),
        ]),
        Line::from(""),
    ];

    if let Some(outcome) = &app.math_outcome {
        lines.push(Line::from(Span::styled(
            outcome.feedback.clone(),
            app.theme.feedback_style(outcome.correct),
        )));
        lines.push(Line::from(Span::styled(
            format!(
                "Score: {} correct out of {}",
                outcome.score.correct, outcome.score.attempts
            ),
            app.theme.system_style(),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(bordered(app, "Math Adventure"))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_drawing(frame: &mut Frame, app: &App, area: Rect) {
    let [canvas_area, info_area] = Layout::vertical([
        Constraint::Length(CANVAS_HEIGHT + 2),
        Constraint::Min(1),
    ])
    .areas(area);
    let canvas_area = centered_rect_fixed(CANVAS_WIDTH + 2, CANVAS_HEIGHT + 2, canvas_area);

    let canvas = &app.canvas;
    let cursor = canvas.cursor();
    let rows: Vec<Line> = (0..CANVAS_HEIGHT)
        .map(|y| {
            let cells: Vec<Span> = (0..CANVAS_WIDTH)
                .map(|x| {
                    let painted = canvas.cell(x, y);
                    if (x, y) == cursor {
                        let symbol = if canvas.pen_down() { "o" } else { "+" };
                        Span::styled(symbol, app.theme.highlight_style())
                    } else {
                        match painted {
                            Some(colour) => Span::styled("█", app.theme.paint_style(colour)),
                            None => Span::styled(" ", app.theme.canvas_style()),
                        }
                    }
                })
                .collect();
            Line::from(cells)
        })
        .collect();
    frame.render_widget(
        Paragraph::new(rows).block(bordered(app, "Drawing Studio")),
        canvas_area,
    );

    let mut palette: Vec<Span> = vec![Span::styled("Colours: ", app.theme.text_style())];
    for colour in 0..PALETTE_SIZE {
        let marker = if colour == canvas.colour() { "[█]" } else { " █ " };
        palette.push(Span::styled(format!("{}", colour + 1), app.theme.system_style()));
        palette.push(Span::styled(marker, app.theme.paint_style(colour)));
        palette.push(Span::raw(" "));
    }

    let (strokes, seconds) = app
        .drawing_timer()
        .map(|t| (t.strokes(), t.elapsed().as_secs()))
        .unwrap_or_default();
    let pen = if canvas.pen_down() { "down" } else { "up" };
    let info = vec![
        Line::from(palette),
        Line::from(Span::styled(
            format!("Pen {pen}  |  {strokes} strokes  |  {seconds}s this visit"),
            app.theme.system_style(),
        )),
    ];
    frame.render_widget(Paragraph::new(info), info_area);
}

fn render_adventure(frame: &mut Frame, app: &App, area: Rect) {
    let view = &app.adventure;
    let mut lines = vec![
        Line::from(Span::styled(view.text.clone(), app.theme.story_style())),
        Line::from(""),
    ];

    if view.is_ending() {
        lines.push(Line::from(Span::styled("The End!", app.theme.ending_style())));
        lines.push(Line::from(Span::styled(
            "Press r to start a new adventure.",
            app.theme.system_style(),
        )));
    } else {
        for (i, label) in view.choices.iter().enumerate() {
            lines.push(Line::from(Span::styled(
                format!("  {}. {label}", i + 1),
                app.theme.choice_style(),
            )));
        }
    }

    let paragraph = Paragraph::new(lines)
        .block(bordered(app, "Story Adventure"))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_imagination(frame: &mut Frame, app: &App, area: Rect) {
    let picker = app.session.imagination();
    let current = app.category();

    let tabs: Vec<Span> = Category::ALL
        .iter()
        .flat_map(|&category| {
            let style = if category == current {
                app.theme.highlight_style()
            } else if picker.selection(category).is_some() {
                app.theme.picked_style()
            } else {
                app.theme.system_style()
            };
            [Span::styled(format!(" {} ", category.title()), style), Span::raw(" ")]
        })
        .collect();

    let mut lines = vec![Line::from(tabs), Line::from("")];
    lines.extend(option_lines(app, current.options(), picker.selection(current)));
    lines.push(Line::from(""));

    match &app.idea {
        Some(idea) => {
            lines.push(Line::from(Span::styled(idea.clone(), app.theme.ending_style())));
            lines.push(Line::from(Span::styled(
                "Press t to hear a story about it!",
                app.theme.system_style(),
            )));
        }
        None => lines.push(Line::from(Span::styled(
            "Pick one from each group to make an idea.",
            app.theme.system_style(),
        ))),
    }

    let paragraph = Paragraph::new(lines)
        .block(bordered(app, "Imagination Explorer"))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_builder(frame: &mut Frame, app: &App, area: Rect) {
    let builder = app.session.builder();
    let mut lines = Vec::new();

    match (app.builder_heading(), builder.current_step()) {
        (Some(heading), Some(step)) => {
            lines.push(Line::from(Span::styled(
                heading,
                app.theme.text_style().add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(""));
            lines.extend(option_lines(app, &step.options, None));
        }
        _ => {
            let text = app
                .built_story
                .clone()
                .unwrap_or_else(|| "Your story is ready!".to_string());
            lines.push(Line::from(Span::styled(text, app.theme.ending_style())));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Press t to hear it told, or n to build a new one.",
                app.theme.system_style(),
            )));
        }
    }

    let progress = builder.step_index().min(BUILDER_STEPS.len());
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("{progress} of {} steps done", BUILDER_STEPS.len()),
        app.theme.system_style(),
    )));

    let paragraph = Paragraph::new(lines)
        .block(bordered(app, "Story Builder"))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_report(frame: &mut Frame, app: &App, area: Rect) {
    let Some(report) = &app.report else {
        let paragraph = Paragraph::new("Press r to build the report.")
            .block(bordered(app, "Parent Report"));
        frame.render_widget(paragraph, area);
        return;
    };

    let suggestion_height = report.suggestions.len() as u16 + 2;
    let [top_area, suggestions_area] = Layout::vertical([
        Constraint::Min(6),
        Constraint::Length(suggestion_height),
    ])
    .areas(area);
    let [table_area, chart_area] =
        Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
            .areas(top_area);

    render_report_table(frame, app, report, table_area);
    render_report_chart(frame, app, report, chart_area);

    let lines: Vec<Line> = report
        .suggestions
        .iter()
        .map(|s| Line::from(Span::styled(format!("* {s}"), app.theme.suggestion_style())))
        .collect();
    let paragraph = Paragraph::new(lines)
        .block(bordered(app, "Suggestions"))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, suggestions_area);
}

fn render_report_table(frame: &mut Frame, app: &App, report: &Report, area: Rect) {
    let header = Row::new(vec!["Activity", "Metric", "Value"])
        .style(app.theme.text_style().add_modifier(Modifier::BOLD));

    let mut rows: Vec<Row> = report
        .rows
        .iter()
        .map(|r| {
            Row::new(vec![
                Cell::from(r.activity),
                Cell::from(r.metric),
                Cell::from(r.formatted_value()),
            ])
            .style(app.theme.text_style())
        })
        .collect();

    rows.extend(report.extras.iter().map(|(key, value)| {
        Row::new(vec![
            Cell::from("Other"),
            Cell::from(key.clone()),
            Cell::from(value.to_string()),
        ])
        .style(app.theme.system_style())
    }));

    let table = Table::new(
        rows,
        [
            Constraint::Length(20),
            Constraint::Min(14),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .block(bordered(app, "Summary"));
    frame.render_widget(table, area);
}

/// Count metrics as bars; durations are on a different scale
fn render_report_chart(frame: &mut Frame, app: &App, report: &Report, area: Rect) {
    let bars: Vec<Bar> = report
        .rows
        .iter()
        .filter(|r| r.unit == Unit::Count)
        .map(|r| {
            Bar::default()
                .label(Line::from(short_label(r.metric)))
                .value(r.value)
                .style(app.theme.bar_style())
        })
        .collect();

    let chart = BarChart::default()
        .block(bordered(app, "Activity"))
        .data(BarGroup::default().bars(&bars))
        .bar_width(4)
        .bar_gap(1)
        .value_style(app.theme.highlight_style());
    frame.render_widget(chart, area);
}

/// First four characters of a label so bars line up
fn short_label(label: &str) -> String {
    label.chars().take(4).collect()
}

fn render_generated(frame: &mut Frame, app: &App, story: &str, area: Rect) {
    let title = if app.screen == Screen::Report {
        " AI Insights "
    } else {
        " Storyteller "
    };
    let paragraph = Paragraph::new(Span::styled(story.to_string(), app.theme.generated_style()))
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(app.theme.border_style(false)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

/// Render the status bar
fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let line = match app.status() {
        Some(message) => Line::from(Span::styled(format!(" {message}"), app.theme.ending_style())),
        None => Line::from(Span::styled(
            format!(" Steps this adventure: {}", app.session.story().steps()),
            app.theme.system_style(),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// Render the hotkey bar
fn render_hotkey_bar(frame: &mut Frame, app: &App, area: Rect) {
    let keys = match app.screen {
        Screen::Menu => " ↑/↓ move  Enter open  1-6 jump  ? help  q quit",
        Screen::Math => " 0-9 type  Enter check  d level  Esc menu  ? help",
        Screen::Drawing => " arrows move  Space pen  1-6 colour  c clear  Esc menu  ? help",
        Screen::Adventure => " 1-9 choose  r restart  Esc menu  ? help",
        Screen::Imagination => " Tab/←/→ group  1-4 pick  t tell  Esc menu  ? help",
        Screen::Builder => " 1-4 choose  n new  t tell  Esc menu  ? help",
        Screen::Report => " r refresh  i insights  Esc menu  ? help",
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(keys, app.theme.system_style()))),
        area,
    );
}

/// A fixed-size rectangle centered in `area`, clamped to fit
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    rect
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let popup_area = centered_rect_fixed(52, 25, area);

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let heading = Style::default().add_modifier(Modifier::UNDERLINED);
    let help_text = vec![
        Line::from(Span::styled(
            " Kids Fun Learning Adventures - Help ",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("Everywhere:", heading)),
        Line::from("  Esc        Back to the menu"),
        Line::from("  ?          Show or hide this help"),
        Line::from("  Ctrl+c     Quit"),
        Line::from(""),
        Line::from(Span::styled("Activities:", heading)),
        Line::from("  1-9        Pick a numbered option"),
        Line::from("  r          Restart story / refresh report"),
        Line::from("  Tab        Next group (Imagination)"),
        Line::from("  n          New story (Builder)"),
        Line::from("  t          Ask the storyteller"),
        Line::from("  Enter      Check answer (Math)"),
        Line::from("  d          Change level (Math)"),
        Line::from("  Space      Pen up or down (Drawing)"),
        Line::from("  c          Clear the canvas (Drawing)"),
        Line::from("  i          AI insights (Report)"),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(true));

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, popup_area);
}
