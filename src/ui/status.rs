use crate::app::App;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Bottom bar: a transient notice while one is active, key hints otherwise
pub fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
  let (content, style) = match app.notice() {
    Some(notice) => (
      format!(" {}", notice),
      Style::default().fg(Color::Yellow),
    ),
    None => {
      let hint = " f/Space:fetch  d:delete  r:recheck connection  j/k:nav  q:quit";
      (hint.to_string(), Style::default().fg(Color::DarkGray))
    }
  };

  let paragraph = Paragraph::new(content).style(style);
  frame.render_widget(paragraph, area);
}
