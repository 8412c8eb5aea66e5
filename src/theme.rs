use ratatui::style::{Color, Style};

/// Color preset for the whole application. The terminal stand-in for the
/// original font-family/size customization: authors pick a preset and the
/// preset name is persisted with the manuscript.
#[derive(Clone, Debug)]
pub struct Theme {
    /// Preset name as persisted in the manuscript file
    pub name: &'static str,

    /// Default text color
    pub foreground: Color,

    /// Color for chapter and section headings in the editor pane
    pub heading: Color,

    /// Color for secondary annotations (word counts, block markers)
    pub annotation: Color,

    /// Foreground color for the selected block / outline row
    pub selection_fg: Color,

    /// Background color for the selected block / outline row
    pub selection_bg: Color,

    /// Foreground color for the status bar
    pub status_bar_fg: Color,

    /// Color for pane borders
    pub border: Color,

    /// Foreground color for popups (kind menu, notes)
    pub popup_fg: Color,

    /// Background color for popups (kind menu, notes)
    pub popup_bg: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark",
            foreground: Color::White,
            heading: Color::Cyan,
            annotation: Color::DarkGray,
            selection_fg: Color::Black,
            selection_bg: Color::White,
            status_bar_fg: Color::Gray,
            border: Color::DarkGray,
            popup_fg: Color::White,
            popup_bg: Color::Black,
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light",
            foreground: Color::Black,
            heading: Color::Blue,
            annotation: Color::Gray,
            selection_fg: Color::White,
            selection_bg: Color::Black,
            status_bar_fg: Color::DarkGray,
            border: Color::Gray,
            popup_fg: Color::Black,
            popup_bg: Color::White,
        }
    }

    pub fn sepia() -> Self {
        Self {
            name: "sepia",
            foreground: Color::Rgb(92, 75, 55),
            heading: Color::Rgb(130, 80, 30),
            annotation: Color::Rgb(160, 140, 110),
            selection_fg: Color::Rgb(244, 236, 216),
            selection_bg: Color::Rgb(92, 75, 55),
            status_bar_fg: Color::Rgb(130, 110, 85),
            border: Color::Rgb(160, 140, 110),
            popup_fg: Color::Rgb(92, 75, 55),
            popup_bg: Color::Rgb(244, 236, 216),
        }
    }

    /// Look up a preset by its persisted name, falling back to dark for
    /// anything unknown.
    pub fn by_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "sepia" => Self::sepia(),
            _ => Self::dark(),
        }
    }

    /// The next preset in the cycle order, for the runtime theme toggle.
    pub fn next(&self) -> Self {
        match self.name {
            "dark" => Self::light(),
            "light" => Self::sepia(),
            _ => Self::dark(),
        }
    }

    /// Get the style for the selected block or row
    pub fn selection_style(&self) -> Style {
        Style::default().fg(self.selection_fg).bg(self.selection_bg)
    }

    /// Get the style for popups
    pub fn popup_style(&self) -> Style {
        Style::default().fg(self.popup_fg).bg(self.popup_bg)
    }

    /// Get the style for the status bar
    pub fn status_bar_style(&self) -> Style {
        Style::default().fg(self.status_bar_fg)
    }

    /// Get the style for word counts and other annotations
    pub fn annotation_style(&self) -> Style {
        Style::default().fg(self.annotation)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
