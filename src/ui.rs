//! Layout and drawing: start screen, playfield, sidebar, pause and game over.

use crate::app::Screen;
use crate::game::{GameState, LINE_BONUS};
use crate::theme::Theme;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};
use std::time::Instant;
use tachyonfx::{Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx};

/// Each cell is two terminal columns wide so blocks look square.
const CELL_WIDTH: u16 = 2;
const SIDEBAR_WIDTH: u16 = 22;
/// Fade-in of the game-over panel.
const GAME_OVER_FADE_MS: u32 = 600;

const CONTROLS: [(&str, &str); 7] = [
    ("←  a", "left"),
    ("→  d", "right"),
    ("↓  s", "drop"),
    ("↑  w", "rotate cw"),
    ("q", "rotate ccw"),
    ("p", "pause"),
    ("esc", "quit"),
];

/// Board size in terminal cells, border included.
fn board_size(state: &GameState) -> (u16, u16) {
    let field = state.playfield();
    (
        field.width() as u16 * CELL_WIDTH + 2,
        field.height() as u16 + 2,
    )
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Draw current screen, with pause overlay and game-over fade where they apply.
pub fn draw(
    frame: &mut Frame,
    screen: Screen,
    state: &GameState,
    theme: &Theme,
    paused: bool,
    score_flash: bool,
    game_over_effect: &mut Option<Effect>,
    game_over_effect_time: &mut Option<Instant>,
    now: Instant,
) {
    let area = frame.area();
    frame.buffer_mut().set_style(area, Style::default().bg(theme.bg));
    match screen {
        Screen::Start => draw_start(frame, theme, area),
        Screen::Playing => {
            draw_game(frame, state, theme, area, score_flash);
            if paused {
                draw_pause_overlay(frame, theme, area);
            }
        }
        Screen::GameOver => {
            draw_game(frame, state, theme, area, false);
            let panel = draw_game_over(frame, state, theme, area);
            apply_game_over_effect(
                frame,
                theme,
                panel,
                game_over_effect,
                game_over_effect_time,
                now,
            );
        }
    }
}

fn draw_start(frame: &mut Frame, theme: &Theme, area: Rect) {
    let popup = centered(area, 40, 16);
    let title_style = Style::default().fg(theme.title).bold();
    let fg = Style::default().fg(theme.main_fg);
    let hint = Style::default().fg(theme.inactive_fg);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(" B L O C K T U I ", title_style)),
        Line::from(""),
        Line::from(Span::styled(
            format!("Fill a row to clear it: +{LINE_BONUS}"),
            fg,
        )),
        Line::from(""),
    ];
    for (keys, what) in CONTROLS {
        lines.push(Line::from(vec![
            Span::styled(format!("{keys:>5}  "), fg),
            Span::styled(format!("{what:<10}"), hint),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " Enter — Start ",
        Style::default().fg(Color::Black).bg(theme.title).bold(),
    )));

    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.div_line).bg(theme.bg)),
    );
    p.render(popup, frame.buffer_mut());
}

/// Draw game: playfield + sidebar, centred as one unit.
fn draw_game(
    frame: &mut Frame,
    state: &GameState,
    theme: &Theme,
    area: Rect,
    score_flash: bool,
) {
    let (pw, ph) = board_size(state);
    let total_w = pw + SIDEBAR_WIDTH;

    let horiz_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(total_w),
            Constraint::Fill(1),
        ])
        .split(area);

    let vert_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(ph),
            Constraint::Fill(1),
        ])
        .split(horiz_chunks[1]);

    let inner = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(pw), Constraint::Length(SIDEBAR_WIDTH)])
        .split(vert_chunks[1]);

    draw_playfield(frame, state, theme, inner[0]);
    draw_sidebar(frame, state, theme, inner[1], score_flash);
}

/// Active-piece cell covering (x, y), if any.
fn overlay_cell(state: &GameState, x: usize, y: usize) -> Option<u8> {
    state.piece().and_then(|piece| {
        piece
            .cells()
            .find(|&(px, py, _)| px == x as i32 && py == y as i32)
            .map(|(_, _, id)| id)
    })
}

fn draw_playfield(frame: &mut Frame, state: &GameState, theme: &Theme, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
        .title(Span::styled(" Blocktui ", Style::default().fg(theme.title)));
    let inner = block.inner(area);
    block.render(area, frame.buffer_mut());

    let buf = frame.buffer_mut();
    for (y, row) in state.playfield().rows().enumerate() {
        for (x, &locked) in row.iter().enumerate() {
            let id = overlay_cell(state, x, y).unwrap_or(locked);
            let (symbol, style) = if id == 0 {
                (" ", Style::default().bg(theme.bg))
            } else {
                let c = theme.cell_color(id);
                ("█", Style::default().fg(c).bg(c))
            };
            let rx = inner.x + x as u16 * CELL_WIDTH;
            let ry = inner.y + y as u16;
            for dx in 0..CELL_WIDTH {
                if rx + dx < inner.x + inner.width && ry < inner.y + inner.height {
                    buf[(rx + dx, ry)].set_symbol(symbol).set_style(style);
                }
            }
        }
    }
}

fn draw_sidebar(
    frame: &mut Frame,
    state: &GameState,
    theme: &Theme,
    area: Rect,
    score_flash: bool,
) {
    let title_style = Style::default().fg(theme.title);
    let fg_style = Style::default().fg(theme.main_fg);
    let hint_style = Style::default().fg(theme.inactive_fg);
    let border_style = Style::default().fg(theme.div_line).bg(theme.bg);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Stats (border + score, lines)
            Constraint::Length(1), // gap
            Constraint::Length(CONTROLS.len() as u16 + 2),
        ])
        .split(area);

    let stats_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);
    let stats_inner = stats_block.inner(chunks[0]);
    stats_block.render(chunks[0], frame.buffer_mut());
    let score_style = if score_flash {
        Style::default().fg(Color::Black).bg(theme.title).bold()
    } else {
        fg_style
    };
    let stats_lines = vec![
        Line::from(vec![
            Span::styled("Score: ", title_style),
            Span::styled(state.score().to_string(), score_style),
        ]),
        Line::from(vec![
            Span::styled("Lines: ", title_style),
            Span::styled(state.lines_cleared().to_string(), fg_style),
        ]),
    ];
    Paragraph::new(ratatui::text::Text::from(stats_lines))
        .render(stats_inner, frame.buffer_mut());

    let keys_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(" Keys ", title_style));
    let keys_inner = keys_block.inner(chunks[2]);
    keys_block.render(chunks[2], frame.buffer_mut());
    let key_lines: Vec<Line> = CONTROLS
        .iter()
        .map(|(keys, what)| {
            Line::from(vec![
                Span::styled(format!("{keys:<5} "), fg_style),
                Span::styled(*what, hint_style),
            ])
        })
        .collect();
    Paragraph::new(ratatui::text::Text::from(key_lines))
        .render(keys_inner, frame.buffer_mut());
}

fn draw_pause_overlay(frame: &mut Frame, theme: &Theme, area: Rect) {
    let popup = centered(area, 28, 5);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Paused ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(Span::styled(
            " P — Resume    Esc — Quit ",
            Style::default().fg(theme.main_fg),
        )),
    ];
    Clear.render(popup, frame.buffer_mut());
    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.div_line).bg(theme.bg)),
    );
    p.render(popup, frame.buffer_mut());
}

/// Final score panel over the frozen board. Returns the panel rect for the fade effect.
fn draw_game_over(frame: &mut Frame, state: &GameState, theme: &Theme, area: Rect) -> Rect {
    let popup = centered(area, 30, 9);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Game Over ",
            Style::default().fg(Color::White).bg(Color::Red),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(" Score: {} ", state.score()),
            Style::default().fg(theme.main_fg),
        )),
        Line::from(Span::styled(
            format!(" Lines: {} ", state.lines_cleared()),
            Style::default().fg(theme.main_fg),
        )),
        Line::from(""),
        Line::from(Span::styled(
            " Enter — Back    Esc — Quit ",
            Style::default().fg(theme.inactive_fg),
        )),
    ];
    Clear.render(popup, frame.buffer_mut());
    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
            .title(Span::styled(" Blocktui ", Style::default().fg(theme.title))),
    );
    p.render(popup, frame.buffer_mut());
    popup
}

/// Create or update the game-over fade and process it (TachyonFX: fade the panel in from bg).
fn apply_game_over_effect(
    frame: &mut Frame,
    theme: &Theme,
    panel: Rect,
    effect: &mut Option<Effect>,
    process_time: &mut Option<Instant>,
    now: Instant,
) {
    let delta = process_time
        .map(|t| now.saturating_duration_since(t))
        .unwrap_or(std::time::Duration::ZERO);
    let delta_ms = delta.as_millis().min(u32::MAX as u128) as u32;
    *process_time = Some(now);

    let effect = effect.get_or_insert_with(|| {
        fx::fade_from(theme.bg, theme.bg, (GAME_OVER_FADE_MS, Interpolation::QuadOut))
            .with_area(panel)
    });
    frame.render_effect(effect, panel, TfxDuration::from_millis(delta_ms));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::DropOutcome;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render(screen: Screen, state: &GameState) -> ratatui::buffer::Buffer {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        let theme = Theme::classic();
        let mut effect = None;
        let mut effect_time = None;
        terminal
            .draw(|f| {
                draw(
                    f,
                    screen,
                    state,
                    &theme,
                    false,
                    false,
                    &mut effect,
                    &mut effect_time,
                    Instant::now(),
                )
            })
            .unwrap();
        terminal.backend().buffer().clone()
    }

    fn contains(buf: &ratatui::buffer::Buffer, needle: &str) -> bool {
        let area = buf.area;
        (area.y..area.y + area.height).any(|y| {
            let row: String = (area.x..area.x + area.width)
                .map(|x| buf[(x, y)].symbol().to_string())
                .collect();
            row.contains(needle)
        })
    }

    #[test]
    fn test_overlay_cell_covers_active_piece_only() {
        let mut state = GameState::new(12, 20, 3);
        state.reset();
        let (px, py, id) = state
            .piece()
            .and_then(|p| p.cells().next())
            .expect("spawned piece has cells");
        assert_eq!(overlay_cell(&state, px as usize, py as usize), Some(id));
        assert_eq!(overlay_cell(&state, 0, 19), None);
    }

    #[test]
    fn test_locked_cells_are_drawn_on_bottom_row() {
        let mut state = GameState::new(12, 20, 5);
        state.reset();
        while !matches!(state.soft_drop(), DropOutcome::Locked { .. }) {}
        let buf = render(Screen::Playing, &state);
        // 80x30 area: board is 26x22 inside a 48-wide unit, so its inner rect starts at (17, 5).
        let bottom = 5 + 19;
        let drawn = (17..17 + 24).filter(|&x| buf[(x, bottom)].symbol() == "█").count();
        let locked = state.playfield().rows().last().map_or(0, |r| {
            r.iter().filter(|&&c| c != 0).count()
        });
        assert!(locked > 0);
        assert_eq!(drawn, locked * CELL_WIDTH as usize);
    }

    #[test]
    fn test_start_screen_shows_prompt() {
        let state = GameState::new(12, 20, 1);
        let buf = render(Screen::Start, &state);
        assert!(contains(&buf, "Start"));
    }

    #[test]
    fn test_playing_screen_shows_score_and_piece() {
        let mut state = GameState::new(12, 20, 1);
        state.reset();
        let buf = render(Screen::Playing, &state);
        assert!(contains(&buf, "Score: 0"));
        assert!(contains(&buf, "██"));
    }

    #[test]
    fn test_game_over_panel_shows_final_score() {
        let mut state = GameState::new(12, 20, 1);
        state.reset();
        while !state.is_game_over() {
            state.tick();
        }
        let buf = render(Screen::GameOver, &state);
        assert!(contains(&buf, "Game Over"));
        assert!(contains(&buf, "Score: 0"));
    }
}
