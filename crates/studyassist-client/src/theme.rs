use std::fmt;

/// Presentation-only colour scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Evening,
}

impl Theme {
    pub fn label(self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
            Theme::Evening => "Evening",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Theme::Light => "☀️",
            Theme::Dark => "🌙",
            Theme::Evening => "🌇",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.icon(), self.label())
    }
}
