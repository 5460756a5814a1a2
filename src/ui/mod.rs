mod jokes;
mod status;

use crate::app::App;
use chrono::{DateTime, Utc};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Header
      Constraint::Min(1),    // Joke list
      Constraint::Length(1), // Status bar
    ])
    .split(frame.area());

  draw_header(frame, chunks[0], app);
  jokes::draw_joke_list(frame, chunks[1], app);
  status::draw_status_bar(frame, chunks[2], app);
}

/// Draw the header bar with logo, endpoint, connectivity and list fill
fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
  let snapshot = app.snapshot();
  let domain = extract_domain(app.api_url());

  let badge = if snapshot.is_online {
    Span::styled(" ONLINE ", Style::default().fg(Color::Green).bold())
  } else {
    Span::styled(" OFFLINE ", Style::default().fg(Color::Red).bold())
  };

  let mut spans = vec![
    Span::styled(" jokebox ", Style::default().fg(Color::Cyan).bold()),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(format!(" {} ", domain), Style::default().fg(Color::White)),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    badge,
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(
      format!(" {}/{} ", snapshot.jokes.len(), app.max_jokes()),
      Style::default().fg(Color::Yellow),
    ),
  ];

  // Offline, the list is only as fresh as the last cache write
  if !snapshot.is_online {
    if let Some(saved_at) = snapshot.cache_saved_at {
      spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));
      spans.push(Span::styled(
        format!(" cached {} ", format_age(saved_at)),
        Style::default().fg(Color::DarkGray),
      ));
    }
  }

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));

  frame.render_widget(paragraph, area);
}

/// Extract domain from the endpoint URL
fn extract_domain(url: &str) -> &str {
  url
    .strip_prefix("https://")
    .or_else(|| url.strip_prefix("http://"))
    .unwrap_or(url)
    .split('/')
    .next()
    .unwrap_or(url)
}

/// Coarse age for the offline header ("just now", "5m ago", "2d ago")
fn format_age(saved_at: DateTime<Utc>) -> String {
  let elapsed = Utc::now() - saved_at;
  if elapsed.num_minutes() < 1 {
    "just now".to_string()
  } else if elapsed.num_hours() < 1 {
    format!("{}m ago", elapsed.num_minutes())
  } else if elapsed.num_days() < 1 {
    format!("{}h ago", elapsed.num_hours())
  } else {
    format!("{}d ago", elapsed.num_days())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_extract_domain() {
    assert_eq!(
      extract_domain("https://official-joke-api.appspot.com/random_joke"),
      "official-joke-api.appspot.com"
    );
    assert_eq!(extract_domain("http://localhost:8080/joke"), "localhost:8080");
    assert_eq!(extract_domain("localhost"), "localhost");
  }

  #[test]
  fn test_format_age_just_now() {
    assert_eq!(format_age(Utc::now()), "just now");
  }

  #[test]
  fn test_format_age_minutes() {
    assert_eq!(format_age(Utc::now() - chrono::Duration::minutes(5)), "5m ago");
  }

  #[test]
  fn test_format_age_hours() {
    assert_eq!(format_age(Utc::now() - chrono::Duration::minutes(90)), "1h ago");
  }

  #[test]
  fn test_format_age_days() {
    assert_eq!(format_age(Utc::now() - chrono::Duration::hours(49)), "2d ago");
  }
}
