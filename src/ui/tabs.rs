//! Tab bar rendering and hit testing

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::App;
use crate::domain::DashboardTab;

const DIVIDER: &str = "│";

fn tab_label(tab: DashboardTab) -> String {
    format!(" {}:{} ", tab.shortcut(), tab.title())
}

/// Column span of every tab label, in render order
fn tab_spans(area: Rect) -> Vec<(DashboardTab, u16, u16)> {
    let mut spans = Vec::with_capacity(DashboardTab::ALL.len());
    let mut x = area.x;
    for tab in DashboardTab::ALL {
        let width = tab_label(tab).chars().count() as u16;
        spans.push((tab, x, width));
        x = x.saturating_add(width).saturating_add(DIVIDER.chars().count() as u16);
    }
    spans
}

pub fn draw_tab_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = Vec::new();
    for (idx, tab) in DashboardTab::ALL.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::styled(DIVIDER, Style::default().fg(Color::DarkGray)));
        }
        let style = if *tab == app.current_tab {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else if app.state(*tab).is_some_and(|state| state.loading) {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(tab_label(*tab), style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Tab under the given column, if any
pub fn tab_at(area: Rect, col: u16) -> Option<DashboardTab> {
    tab_spans(area)
        .into_iter()
        .find(|(_, start, width)| col >= *start && col < start.saturating_add(*width))
        .map(|(tab, _, _)| tab)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_at_matches_labels() {
        let area = Rect::new(2, 3, 80, 1);
        // " 1:Candidates " is 14 columns wide
        assert_eq!(tab_at(area, 2), Some(DashboardTab::Candidates));
        assert_eq!(tab_at(area, 15), Some(DashboardTab::Candidates));
        assert_eq!(tab_at(area, 16), None);
        assert_eq!(tab_at(area, 17), Some(DashboardTab::Assessments));
        assert_eq!(tab_at(area, 0), None);
        assert_eq!(tab_at(area, 79), None);
    }
}
