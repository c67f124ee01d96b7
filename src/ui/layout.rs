use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::{Block, Borders};

#[derive(Debug, Clone, Copy)]
pub struct UiAreas {
    pub size: Rect,
    pub header: Rect,
    pub tabs: Rect,
    pub list: Rect,
    pub status_line: Rect,
    pub hints: Rect,
}

/// Regions inside the bordered list panel
#[derive(Debug, Clone, Copy)]
pub struct ListAreas {
    pub inner: Rect,
    pub banner: Option<Rect>,
    pub columns: Rect,
    pub rows: Rect,
}

pub fn areas(size: Rect) -> UiAreas {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(size);

    UiAreas {
        size,
        header: vertical[0],
        tabs: vertical[1],
        list: vertical[2],
        status_line: vertical[3],
        hints: vertical[4],
    }
}

pub fn list_block() -> Block<'static> {
    Block::default().borders(Borders::ALL)
}

pub fn list_areas(list: Rect, banner: bool) -> ListAreas {
    let inner = list_block().inner(list);
    let banner_height = u16::from(banner);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(banner_height),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    ListAreas {
        inner,
        banner: banner.then_some(chunks[0]),
        columns: chunks[1],
        rows: chunks[2],
    }
}
