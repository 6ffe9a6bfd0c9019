//! Terminal rendering of card view models.

use cityweather_core::CardView;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// One-line summary, used as a menu entry.
pub fn card_summary(card: &CardView) -> String {
    if card.available {
        format!(
            "{} {}  {}  {}  {}  {}",
            card.emoji, card.title, card.temperature, card.condition, card.wind, card.humidity
        )
    } else {
        format!("{} {}  {}  {}", card.emoji, card.title, card.temperature, card.condition)
    }
}

/// Full board: one boxed card per city followed by the status line.
pub fn draw_board(cards: &[CardView], status: &str) -> String {
    let mut out = String::new();

    for card in cards {
        out.push_str(&format!("┌ {} {}\n", card.emoji, card.title));
        out.push_str(&format!("│ {}  {}\n", card.temperature, card.condition));
        if card.available {
            out.push_str(&format!("│ {}  {}\n", card.wind, card.humidity));
        }
        out.push_str("└\n");
    }

    out.push('\n');
    out.push_str(status);
    out.push('\n');
    out
}

pub fn redraw(cards: &[CardView], status: &str) {
    print!("{CLEAR_SCREEN}{}", draw_board(cards, status));
}
