use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::Style;
use ratatui::symbols::border;
use ratatui::widgets::Block;

use crate::config::{BACKGROUND_COLOR, GRAY};
use crate::draw::{Drawable, HalfBlockCanvas, terminal_size_for};
use crate::game::{GameState, GameStatus};
use crate::ui::hud::HudInfo;
use crate::ui::menu::render_game_over_menu;

/// Half-block border set: solid side faces the play area.
pub const BORDER_HALF_BLOCK: border::Set = border::Set {
    top_left: "▄",
    top_right: "▄",
    bottom_left: "▀",
    bottom_right: "▀",
    vertical_left: "█",
    vertical_right: "█",
    horizontal_top: "▄",
    horizontal_bottom: "▀",
};

/// Renders the full game frame from immutable state.
pub fn render(frame: &mut Frame<'_>, state: &GameState) {
    let play_area = play_area(frame.area(), state);

    let block = Block::bordered()
        .border_set(BORDER_HALF_BLOCK)
        .border_style(Style::new().fg(GRAY).bg(BACKGROUND_COLOR));
    let inner = block.inner(play_area);
    frame.render_widget(block, play_area);

    let mut canvas = HalfBlockCanvas::new(frame.buffer_mut(), inner, BACKGROUND_COLOR);
    canvas.clear();
    state.walls.draw(&mut canvas);
    state.foods.draw(&mut canvas);
    state.snake.draw(&mut canvas);
    HudInfo::new(state.score, state.elapsed, state.grid()).draw(&mut canvas);

    if let GameStatus::GameOver(reason) = state.status {
        let area = frame.area();
        render_game_over_menu(frame, area, state.score, reason);
    }
}

/// Bordered field area, centered in `area` and shrunk to fit it.
fn play_area(area: Rect, state: &GameState) -> Rect {
    let (columns, rows) = terminal_size_for(state.grid());
    let [row] = Layout::vertical([Constraint::Length(rows.saturating_add(2))])
        .flex(Flex::Center)
        .areas(area);
    let [field] = Layout::horizontal([Constraint::Length(columns.saturating_add(2))])
        .flex(Flex::Center)
        .areas(row);
    field
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::render;
    use crate::config::{GameConfig, SNAKE_COLOR};
    use crate::draw::GLYPH_HALF_UPPER;
    use crate::food::FoodController;
    use crate::game::GameState;
    use crate::grid::Position;
    use crate::input::Direction;
    use crate::snake::Snake;
    use crate::wall::WallController;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn small_state() -> GameState {
        let config = GameConfig {
            width: 200,
            height: 100,
            max_food: 1,
            ..GameConfig::default()
        };
        let mut state = GameState::new_with_seed(config, 3).expect("valid config");
        state.snake = Snake::starting(Position::new(100, 40), Direction::Right);
        state.foods = FoodController::new(state.grid(), 0, 10);
        state.walls = WallController::new(state.grid(), 10);
        state
    }

    #[test]
    fn field_is_centered_with_snake_and_hud() {
        let state = small_state();
        let mut terminal = Terminal::new(TestBackend::new(30, 11)).expect("test backend");

        terminal
            .draw(|frame| render(frame, &state))
            .expect("drawing to a test backend succeeds");

        // 20x5 field plus border, centered in 30x11: inner starts at (5, 3)
        let buffer = terminal.backend().buffer();
        let head = &buffer[(5 + 10, 3 + 2)];
        assert_eq!(head.symbol(), GLYPH_HALF_UPPER);
        assert_eq!(head.fg, SNAKE_COLOR);

        assert!(screen_text(&terminal).contains("Score: 0"));
    }

    #[test]
    fn game_over_popup_is_drawn() {
        let mut state = small_state();
        state.snake = Snake::starting(Position::new(190, 40), Direction::Right);
        state.step(Duration::ZERO);

        let mut terminal = Terminal::new(TestBackend::new(40, 20)).expect("test backend");
        terminal
            .draw(|frame| render(frame, &state))
            .expect("drawing to a test backend succeeds");

        assert!(screen_text(&terminal).contains("Your Score is : 0"));
    }
}
