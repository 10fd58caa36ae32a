//! Stateless rendering of one game frame.

use crate::controller::{AiRequest, TurnController, TurnPhase};
use crate::render::{Color, DisplayList, DrawCommand, Point, Stroke};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::Line,
    widgets::{
        Block, List, ListItem, ListState, Paragraph,
        canvas::{Canvas, Circle, Context, Line as CanvasLine},
    },
};
use std::f64::consts::TAU;
use std::time::Instant;
use ttt_core::Side;

/// Straight segments used to approximate a partial arc.
const ARC_SEGMENTS: usize = 48;

/// Strokes at least this wide are painted as three parallel lines.
const THICK_STROKE: f64 = 4.0;

/// Draws the board and side panel. Returns the board's drawing area so
/// mouse clicks can be mapped back onto the surface.
pub fn draw(
    frame: &mut Frame,
    controller: &TurnController,
    notice: Option<&str>,
    now: Instant,
) -> Rect {
    let [board_area, panel_area] =
        Layout::horizontal([Constraint::Min(30), Constraint::Length(34)]).areas(frame.area());

    let mut list = DisplayList::new();
    controller.render(&mut list, now);
    let extent = controller.renderer().geometry().extent();

    let block = Block::bordered().title(" Tic-Tac-Toe ");
    let inner = block.inner(board_area);
    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([0.0, extent])
        .y_bounds([0.0, extent])
        .paint(|ctx| paint(ctx, &list, extent));
    frame.render_widget(canvas, board_area);

    draw_panel(frame, panel_area, controller, notice, now);
    inner
}

/// Maps a terminal cell inside `area` onto surface coordinates.
pub fn surface_point(area: Rect, column: u16, row: u16, extent: f64) -> Option<Point> {
    if area.width == 0 || area.height == 0 {
        return None;
    }
    let inside_x = column >= area.x && column < area.x + area.width;
    let inside_y = row >= area.y && row < area.y + area.height;
    if !inside_x || !inside_y {
        return None;
    }
    let x = (f64::from(column - area.x) + 0.5) * extent / f64::from(area.width);
    let y = (f64::from(row - area.y) + 0.5) * extent / f64::from(area.height);
    Some(Point::new(x, y))
}

fn paint(ctx: &mut Context, list: &DisplayList, extent: f64) {
    for command in list.commands() {
        match *command {
            DrawCommand::Clear(_) => {}
            DrawCommand::Line { from, to, stroke } => stroke_line(ctx, from, to, stroke, extent),
            DrawCommand::Arc {
                center,
                radius,
                start_angle,
                end_angle,
                stroke,
            } => {
                if (end_angle - start_angle).abs() >= TAU - f64::EPSILON {
                    ctx.draw(&Circle {
                        x: center.x,
                        y: extent - center.y,
                        radius,
                        color: tui_color(stroke.color),
                    });
                } else {
                    let step = (end_angle - start_angle) / ARC_SEGMENTS as f64;
                    let at = |a: f64| {
                        Point::new(center.x + radius * a.cos(), center.y + radius * a.sin())
                    };
                    for k in 0..ARC_SEGMENTS {
                        let a = start_angle + step * k as f64;
                        stroke_line(ctx, at(a), at(a + step), stroke, extent);
                    }
                }
            }
        }
    }
}

/// Surface y grows downward, canvas y grows upward.
fn stroke_line(ctx: &mut Context, from: Point, to: Point, stroke: Stroke, extent: f64) {
    let color = tui_color(stroke.color);
    let offsets: &[f64] = if stroke.width >= THICK_STROKE {
        &[-1.5, 0.0, 1.5]
    } else {
        &[0.0]
    };

    let (dx, dy) = (to.x - from.x, to.y - from.y);
    let len = dx.hypot(dy);
    let (nx, ny) = if len > 0.0 { (-dy / len, dx / len) } else { (0.0, 0.0) };

    for offset in offsets {
        ctx.draw(&CanvasLine {
            x1: from.x + nx * offset,
            y1: extent - (from.y + ny * offset),
            x2: to.x + nx * offset,
            y2: extent - (to.y + ny * offset),
            color,
        });
    }
}

fn tui_color(color: Color) -> ratatui::style::Color {
    let (r, g, b) = color.rgb();
    ratatui::style::Color::Rgb(r, g, b)
}

fn status_line(controller: &TurnController) -> String {
    match controller.phase() {
        TurnPhase::AwaitingPlayerInput => format!("Your turn ({})", controller.player_mark()),
        TurnPhase::AnimatingPlayerMove { .. } => {
            format!("Your move ({})", controller.player_mark())
        }
        TurnPhase::RequestingAiMove(AiRequest::InFlight { .. }) => "AI thinking...".to_string(),
        TurnPhase::RequestingAiMove(_) | TurnPhase::AnimatingAiMove { .. } => {
            format!("AI's turn ({})", controller.ai_mark())
        }
        TurnPhase::GameOver { .. } => "Game over".to_string(),
    }
}

fn draw_panel(
    frame: &mut Frame,
    area: Rect,
    controller: &TurnController,
    notice: Option<&str>,
    now: Instant,
) {
    let [status_area, history_area, help_area] = Layout::vertical([
        Constraint::Length(8),
        Constraint::Min(3),
        Constraint::Length(4),
    ])
    .areas(area);

    let turn_style = Style::default()
        .fg(tui_color(Color::for_turn(controller.turn())))
        .add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::styled(status_line(controller), turn_style),
        Line::from(format!(
            "You: {}   AI: {}",
            controller.player_mark(),
            controller.ai_mark()
        )),
        Line::from(controller.timer().label(now)),
    ];
    if let Some(message) = controller.service_message() {
        lines.push(Line::from(format!("Service: {}", message)));
    }
    if let Some(notice) = notice {
        lines.push(Line::styled(
            notice.to_string(),
            Style::default().fg(tui_color(Color::Gold)).add_modifier(Modifier::BOLD),
        ));
        lines.push(Line::from("Press r to play again"));
    }
    frame.render_widget(
        Paragraph::new(lines).block(Block::bordered().title(" Status ")),
        status_area,
    );

    let items: Vec<ListItem> = controller
        .history()
        .records()
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let color = match record.side() {
                Side::Player => Color::for_mark(controller.player_mark()),
                Side::Ai => Color::for_mark(controller.ai_mark()),
            };
            ListItem::new(format!("#{}: {}  {}", i + 1, record.notation(), record.time_label()))
                .style(Style::default().fg(tui_color(color)))
        })
        .collect();
    let mut state = ListState::default().with_selected(items.len().checked_sub(1));
    frame.render_stateful_widget(
        List::new(items).block(Block::bordered().title(" Moves ")),
        history_area,
        &mut state,
    );

    let help = format!(
        "1-9/click: move  r: new game  q: quit\nx/o: mark ({})  p/a: first ({})",
        controller.next_player_mark(),
        controller.next_starting_side()
    );
    frame.render_widget(Paragraph::new(help).block(Block::bordered()), help_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_point_maps_corners() {
        let area = Rect::new(1, 1, 30, 15);
        let top_left = surface_point(area, 1, 1, 300.0).unwrap();
        assert_eq!(top_left, Point::new(5.0, 10.0));
        let bottom_right = surface_point(area, 30, 15, 300.0).unwrap();
        assert_eq!(bottom_right, Point::new(295.0, 290.0));
    }

    #[test]
    fn test_surface_point_outside_area() {
        let area = Rect::new(1, 1, 30, 15);
        assert_eq!(surface_point(area, 0, 5, 300.0), None);
        assert_eq!(surface_point(area, 31, 5, 300.0), None);
        assert_eq!(surface_point(area, 5, 16, 300.0), None);
        assert_eq!(surface_point(Rect::new(0, 0, 0, 0), 0, 0, 300.0), None);
    }
}
