use crate::models::disk::DiskState;
use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThemeVariant {
    Default,
    /// No colours, for serial consoles and screen captures
    Mono,
}

impl ThemeVariant {
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "mono" | "none" => Self::Mono,
            _               => Self::Default,
        }
    }
}

#[derive(Clone)]
pub struct Theme {
    pub border:      Style,
    pub title:       Style,
    pub text:        Style,
    pub text_dim:    Style,
    pub header:      Style,
    pub ok:          Style,
    pub warn:        Style,
    pub crit:        Style,
    pub footer_bg:   Style,
    pub footer_key:  Style,
    pub footer_text: Style,
}

impl Theme {
    pub fn for_variant(v: ThemeVariant) -> Self {
        match v {
            ThemeVariant::Default => Self::default(),
            ThemeVariant::Mono    => Self::mono(),
        }
    }

    pub fn default() -> Self {
        Self {
            border:      Style::default().fg(Color::DarkGray),
            title:       Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            text:        Style::default().fg(Color::White),
            text_dim:    Style::default().fg(Color::DarkGray),
            header:      Style::default().fg(Color::Black).bg(Color::Blue).add_modifier(Modifier::BOLD),
            ok:          Style::default().fg(Color::Green),
            warn:        Style::default().fg(Color::Yellow),
            crit:        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            footer_bg:   Style::default().bg(Color::DarkGray).fg(Color::White),
            footer_key:  Style::default().bg(Color::DarkGray).fg(Color::Cyan).add_modifier(Modifier::BOLD),
            footer_text: Style::default().bg(Color::DarkGray).fg(Color::Gray),
        }
    }

    fn mono() -> Self {
        let plain = Style::default();
        let bold  = plain.add_modifier(Modifier::BOLD);
        Self {
            border:      plain,
            title:       bold,
            text:        plain,
            text_dim:    plain.add_modifier(Modifier::DIM),
            header:      plain.add_modifier(Modifier::REVERSED | Modifier::BOLD),
            ok:          plain,
            warn:        bold,
            crit:        bold.add_modifier(Modifier::UNDERLINED),
            footer_bg:   plain.add_modifier(Modifier::REVERSED),
            footer_key:  bold.add_modifier(Modifier::REVERSED),
            footer_text: plain.add_modifier(Modifier::REVERSED),
        }
    }

    /// Colour for a controller disk state.
    pub fn state_style(&self, state: &DiskState) -> Style {
        match state {
            DiskState::Online     => self.ok,
            DiskState::Ready      => self.text_dim,
            DiskState::Rebuilding => self.warn,
            DiskState::Other(_)   => self.crit,
        }
    }
}
