use std::time::Duration;

use egui::{
    self, Align, Align2, Color32, FontId, Layout, Pos2, Rect, Sense, Stroke, Vec2,
};

use crate::dispatch::Dispatcher;
use crate::session::{ClickButton, Session, Square};

const SQUARE_SIZE: f32 = 80.0;
const BOARD_SIZE: f32 = SQUARE_SIZE * 8.0;
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

const LIGHT: Color32 = Color32::from_rgb(240, 217, 181);
const DARK: Color32 = Color32::from_rgb(181, 136, 99);
const LAST_MOVE: Color32 = Color32::from_rgb(246, 246, 105);
const SELECTED: Color32 = Color32::from_rgb(106, 170, 100);
const COORD: Color32 = Color32::BLACK;

const FILES: &str = "abcdefgh";
const RANKS: &str = "87654321";

pub struct ChessApp {
    session: Session,
    dispatcher: Dispatcher,
}

impl ChessApp {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            session: Session::default(),
            dispatcher,
        }
    }

    fn draw_board(&mut self, ui: &mut egui::Ui) {
        let (response, painter) =
            ui.allocate_painter(Vec2::splat(BOARD_SIZE), Sense::click());
        let origin = response.rect.min;

        let button = if response.clicked() {
            Some(ClickButton::Primary)
        } else if response.secondary_clicked() {
            Some(ClickButton::Secondary)
        } else {
            None
        };
        if let (Some(button), Some(pos)) = (button, response.interact_pointer_pos()) {
            if let Some((row, col)) = square_at(origin, pos) {
                let dispatcher = &self.dispatcher;
                self.session
                    .click(row, col, button, |req| dispatcher.submit_move(req));
            }
        }

        let last_move = self.session.last_move();
        let selected = self.session.selected();
        for row in 0..8 {
            for col in 0..8 {
                let rect = square_rect(origin, (row, col));
                let mut color = if (row + col) % 2 == 0 { LIGHT } else { DARK };
                if last_move.is_some_and(|(from, to)| from == (row, col) || to == (row, col)) {
                    color = LAST_MOVE;
                }
                if selected == Some((row, col)) {
                    color = SELECTED;
                }
                painter.rect_filled(rect, 0.0, color);

                if let Some(piece) = self.session.position().piece_at(row, col) {
                    draw_piece(&painter, rect, piece);
                }
            }
        }
        draw_coordinates(&painter, origin);
    }
}

impl eframe::App for ChessApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.session.poll();

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let new_game = ui.add_enabled(
                    !self.session.is_waiting(),
                    egui::Button::new("New game"),
                );
                if new_game.clicked() {
                    let dispatcher = &self.dispatcher;
                    self.session.start_new_game(|| dispatcher.new_game());
                }
                ui.label(format!("{} to move", side_name(&self.session)));
            });
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.colored_label(Color32::RED, self.session.message());
                if self.session.is_waiting() {
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.colored_label(Color32::BLUE, "Waiting...");
                    });
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_board(ui);
        });

        ctx.request_repaint_after(FRAME_INTERVAL);
    }
}

fn side_name(session: &Session) -> &'static str {
    match session.position().side_to_move() {
        chess_core::Side::White => "White",
        chess_core::Side::Black => "Black",
    }
}

fn square_rect(origin: Pos2, (row, col): Square) -> Rect {
    Rect::from_min_size(
        origin + Vec2::new(col as f32 * SQUARE_SIZE, row as f32 * SQUARE_SIZE),
        Vec2::splat(SQUARE_SIZE),
    )
}

fn square_at(origin: Pos2, pos: Pos2) -> Option<Square> {
    let offset = pos - origin;
    if offset.x < 0.0 || offset.y < 0.0 {
        return None;
    }
    let col = (offset.x / SQUARE_SIZE) as usize;
    let row = (offset.y / SQUARE_SIZE) as usize;
    (row < 8 && col < 8).then_some((row, col))
}

/// Disc in the piece's colour with its letter on top.
fn draw_piece(painter: &egui::Painter, rect: Rect, piece: char) {
    let (fill, text) = if piece.is_ascii_uppercase() {
        (Color32::WHITE, Color32::BLACK)
    } else {
        (Color32::BLACK, Color32::WHITE)
    };
    let center = rect.center();
    painter.circle(
        center,
        SQUARE_SIZE * 0.36,
        fill,
        Stroke::new(1.5, Color32::DARK_GRAY),
    );
    painter.text(
        center,
        Align2::CENTER_CENTER,
        piece.to_ascii_uppercase(),
        FontId::proportional(SQUARE_SIZE * 0.4),
        text,
    );
}

/// File letters on the top and bottom rows, rank digits on the outer files.
fn draw_coordinates(painter: &egui::Painter, origin: Pos2) {
    let font = FontId::proportional(14.0);
    let pad = 4.0;

    for (col, file) in FILES.chars().enumerate() {
        let top = square_rect(origin, (0, col));
        painter.text(
            top.right_top() + Vec2::new(-pad, pad),
            Align2::RIGHT_TOP,
            file,
            font.clone(),
            COORD,
        );
        let bottom = square_rect(origin, (7, col));
        painter.text(
            bottom.left_bottom() + Vec2::new(pad, -pad),
            Align2::LEFT_BOTTOM,
            file,
            font.clone(),
            COORD,
        );
    }

    for (row, rank) in RANKS.chars().enumerate() {
        let left = square_rect(origin, (row, 0));
        painter.text(
            left.left_top() + Vec2::new(pad, pad),
            Align2::LEFT_TOP,
            rank,
            font.clone(),
            COORD,
        );
        let right = square_rect(origin, (row, 7));
        painter.text(
            right.right_bottom() + Vec2::new(-pad, -pad),
            Align2::RIGHT_BOTTOM,
            rank,
            font.clone(),
            COORD,
        );
    }
}
