use crate::ui::style::{Color, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    pub title: Style,
    pub header: Style,
    pub hint: Style,
    pub error: Style,
    pub focused: Style,
    pub label: Style,
    pub trigger: Style,
    pub pending: Style,
    pub notice_border: Style,
    pub notice_text: Style,
}

impl Theme {
    pub fn default_theme() -> Self {
        Self {
            title: Style::new().color(Color::Cyan).bold(),
            header: Style::new().bold(),
            hint: Style::new().color(Color::DarkGrey),
            error: Style::new().color(Color::Red).bold(),
            focused: Style::new().color(Color::Cyan).bold(),
            label: Style::new().bold(),
            trigger: Style::new().color(Color::Blue),
            pending: Style::new().color(Color::Yellow).dim(),
            notice_border: Style::new().color(Color::Red),
            notice_text: Style::new().color(Color::White).bold(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_theme()
    }
}
