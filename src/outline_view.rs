use std::collections::HashSet;

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use crate::outline::{OutlineKind, OutlineNode};
use crate::theme::Theme;

/// Maximum number of characters of a label shown in a row. Longer labels are
/// cut and get an ellipsis; the full label stays on the row for the status
/// line.
pub const LABEL_BUDGET: usize = 30;

const COLLAPSED_MARKER: &str = "▸ ";
const EXPANDED_MARKER: &str = "▾ ";
const LEAF_MARKER: &str = "· ";
const INDENT_WIDTH: usize = 2;

/// Events the outline view hands back to the host. The view itself never
/// mutates anything; the host updates its block selection or collapse set and
/// re-renders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutlineEvent {
    Navigate(String),
    ToggleCollapse(String),
}

/// One visible row of the outline, in display order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutlineRow {
    pub id: String,
    pub kind: OutlineKind,
    /// Full display label, after trimming and the "Untitled" fallback but
    /// before truncation.
    pub label: String,
    pub depth: usize,
    pub has_children: bool,
    pub collapsed: bool,
    pub word_count: usize,
}

/// Flattens the outline forest into the rows that are currently visible,
/// honoring the host-owned collapse set. Children of a collapsed node are
/// hidden, not removed from the forest. Depth is passed down during the walk.
pub fn visible_rows(forest: &[OutlineNode], collapsed: &HashSet<String>) -> Vec<OutlineRow> {
    let mut rows = Vec::new();
    for node in forest {
        push_rows(node, 0, collapsed, &mut rows);
    }
    rows
}

fn push_rows(
    node: &OutlineNode,
    depth: usize,
    collapsed: &HashSet<String>,
    rows: &mut Vec<OutlineRow>,
) {
    let has_children = node.has_children();
    let is_collapsed = collapsed.contains(&node.id);
    rows.push(OutlineRow {
        id: node.id.clone(),
        kind: node.kind,
        label: display_label(&node.title, node.kind),
        depth,
        has_children,
        collapsed: is_collapsed,
        word_count: node.word_count,
    });
    if has_children && !is_collapsed {
        for section in &node.sections {
            push_rows(section, depth + 1, collapsed, rows);
        }
        for text in &node.direct_text {
            push_rows(text, depth + 1, collapsed, rows);
        }
    }
}

/// Trimmed title, or an "Untitled <kind>" fallback when nothing remains.
pub fn display_label(title: &str, kind: OutlineKind) -> String {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        format!("Untitled {}", kind.label())
    } else {
        trimmed.to_string()
    }
}

/// Cuts a label down to the display budget, appending an ellipsis.
pub fn truncate_label(label: &str) -> String {
    if label.chars().count() <= LABEL_BUDGET {
        return label.to_string();
    }
    let mut cut: String = label.chars().take(LABEL_BUDGET - 1).collect();
    cut.push('…');
    cut
}

/// Renders the visible rows as styled lines, one per row. Selection
/// highlighting is left to the hosting `List` widget.
pub fn render_rows(rows: &[OutlineRow], theme: &Theme) -> Vec<Line<'static>> {
    rows.iter().map(|row| render_row(row, theme)).collect()
}

fn render_row(row: &OutlineRow, theme: &Theme) -> Line<'static> {
    let marker = if !row.has_children {
        LEAF_MARKER
    } else if row.collapsed {
        COLLAPSED_MARKER
    } else {
        EXPANDED_MARKER
    };

    let label_style = match row.kind {
        OutlineKind::Chapter => Style::default()
            .fg(theme.heading)
            .add_modifier(Modifier::BOLD),
        OutlineKind::Section => Style::default().fg(theme.heading),
        OutlineKind::Text => Style::default().fg(theme.foreground),
    };

    let mut spans = vec![
        Span::styled(" ".repeat(row.depth * INDENT_WIDTH), Style::default()),
        Span::styled(marker.to_string(), theme.annotation_style()),
        Span::styled(truncate_label(&row.label), label_style),
    ];
    if row.word_count > 0 {
        spans.push(Span::styled(
            format!(" {}", row.word_count),
            theme.annotation_style(),
        ));
    }
    Line::from(spans)
}

/// Activating a row (Enter, or a click outside the toggle control) always
/// navigates, collapsed or not.
pub fn activate(row: &OutlineRow) -> OutlineEvent {
    OutlineEvent::Navigate(row.id.clone())
}

/// The dedicated toggle gesture (Space). Rows without children have nothing
/// to toggle.
pub fn toggle(row: &OutlineRow) -> Option<OutlineEvent> {
    if row.has_children {
        Some(OutlineEvent::ToggleCollapse(row.id.clone()))
    } else {
        None
    }
}

/// Two-tier click dispatch: the toggle control consumes the click first, so
/// collapsing never also navigates; everything else on the row navigates.
pub fn dispatch_click(row: &OutlineRow, column: usize) -> OutlineEvent {
    if let Some(event) = toggle_hit(row, column) {
        return event;
    }
    activate(row)
}

fn toggle_hit(row: &OutlineRow, column: usize) -> Option<OutlineEvent> {
    if !row.has_children {
        return None;
    }
    let start = row.depth * INDENT_WIDTH;
    if column >= start && column < start + INDENT_WIDTH {
        Some(OutlineEvent::ToggleCollapse(row.id.clone()))
    } else {
        None
    }
}

#[cfg(test)]
#[path = "outline_view_tests.rs"]
mod outline_view_tests;
