use crate::app::App;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

/// Draw the joke list: setup on one line, dimmed punchline under it
pub fn draw_joke_list(frame: &mut Frame, area: Rect, app: &App) {
  let snapshot = app.snapshot();

  let title = if snapshot.is_loading {
    " Jokes (loading...) ".to_string()
  } else {
    format!(" Jokes ({}) ", snapshot.jokes.len())
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  if snapshot.jokes.is_empty() && !snapshot.is_loading {
    let content = if snapshot.is_online {
      "No jokes yet. Press f to fetch one."
    } else {
      "Offline with an empty cache. Press r to re-check the connection."
    };
    let paragraph = Paragraph::new(content)
      .block(block)
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
    return;
  }

  let width = area.width.saturating_sub(4) as usize;
  let items: Vec<ListItem> = snapshot
    .jokes
    .iter()
    .map(|joke| {
      let lines = vec![
        Line::from(Span::raw(truncate(&joke.setup, width))),
        Line::from(Span::styled(
          truncate(&joke.punchline, width),
          Style::default().fg(Color::DarkGray),
        )),
      ];
      ListItem::new(lines)
    })
    .collect();

  let list = List::new(items)
    .block(block)
    .highlight_style(
      Style::default()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("> ");

  let mut state = ListState::default();
  state.select(Some(app.selected()));

  frame.render_stateful_widget(list, area, &mut state);
}

/// Truncate to a maximum number of characters, adding "..." if truncated.
/// Counts chars, not bytes; jokes are not always ASCII.
fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
  }

  #[test]
  fn test_truncate_exact_length() {
    assert_eq!(truncate("hello", 5), "hello");
  }

  #[test]
  fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 8), "hello...");
  }

  #[test]
  fn test_truncate_multibyte() {
    assert_eq!(truncate("héhéhéhé", 7), "héhé...");
  }
}
