use std::collections::HashSet;

use super::*;
use crate::book::{BlockKind, ContentBlock};
use crate::outline::build_outline;

fn sample_blocks() -> Vec<ContentBlock> {
    vec![
        ContentBlock::new("1", BlockKind::Chapter, "Ch1"),
        ContentBlock::new("2", BlockKind::Text, "one two three"),
        ContentBlock::new("3", BlockKind::Section, "Sec1"),
        ContentBlock::new("4", BlockKind::Text, "four five"),
        ContentBlock::new("5", BlockKind::Chapter, "Ch2"),
    ]
}

fn ids(rows: &[OutlineRow]) -> Vec<&str> {
    rows.iter().map(|row| row.id.as_str()).collect()
}

#[test]
fn expanded_forest_lists_every_node_in_order() {
    let forest = build_outline(&sample_blocks());
    let rows = visible_rows(&forest, &HashSet::new());
    assert_eq!(ids(&rows), ["1", "3", "4", "2", "5"]);

    let depths: Vec<usize> = rows.iter().map(|row| row.depth).collect();
    assert_eq!(depths, [0, 1, 2, 1, 0]);
}

#[test]
fn collapsing_a_chapter_hides_its_children_but_not_the_node() {
    let forest = build_outline(&sample_blocks());
    let mut collapsed = HashSet::new();
    collapsed.insert("1".to_string());

    let rows = visible_rows(&forest, &collapsed);
    assert_eq!(ids(&rows), ["1", "5"]);
    assert!(rows[0].collapsed);
    assert!(rows[0].has_children);

    // The forest itself is untouched; expanding again restores everything.
    collapsed.clear();
    let rows = visible_rows(&forest, &collapsed);
    assert_eq!(rows.len(), 5);
}

#[test]
fn collapsing_a_section_hides_only_its_text() {
    let forest = build_outline(&sample_blocks());
    let mut collapsed = HashSet::new();
    collapsed.insert("3".to_string());

    let rows = visible_rows(&forest, &collapsed);
    assert_eq!(ids(&rows), ["1", "3", "2", "5"]);
}

#[test]
fn empty_collapse_set_means_nothing_collapsed() {
    let forest = build_outline(&sample_blocks());
    let rows = visible_rows(&forest, &HashSet::new());
    assert!(rows.iter().all(|row| !row.collapsed));
}

#[test]
fn empty_titles_fall_back_to_untitled() {
    assert_eq!(display_label("", OutlineKind::Chapter), "Untitled chapter");
    assert_eq!(display_label("   ", OutlineKind::Section), "Untitled section");
    assert_eq!(display_label("\t", OutlineKind::Text), "Untitled text");
    assert_eq!(display_label("  Real  ", OutlineKind::Chapter), "Real");
}

#[test]
fn long_labels_are_truncated_with_ellipsis() {
    let long = "a".repeat(50);
    let cut = truncate_label(&long);
    assert_eq!(cut.chars().count(), LABEL_BUDGET);
    assert!(cut.ends_with('…'));

    let short = "short label";
    assert_eq!(truncate_label(short), short);

    let exact = "x".repeat(LABEL_BUDGET);
    assert_eq!(truncate_label(&exact), exact);
}

#[test]
fn word_counts_annotate_rows() {
    let forest = build_outline(&sample_blocks());
    let rows = visible_rows(&forest, &HashSet::new());
    assert_eq!(rows[0].word_count, 5); // chapter aggregate
    assert_eq!(rows[1].word_count, 2); // section aggregate
    assert_eq!(rows[2].word_count, 2); // text's own count
    assert_eq!(rows[4].word_count, 0); // empty chapter
}

#[test]
fn activation_navigates_even_when_collapsed() {
    let forest = build_outline(&sample_blocks());
    let mut collapsed = HashSet::new();
    collapsed.insert("1".to_string());
    let rows = visible_rows(&forest, &collapsed);

    assert_eq!(activate(&rows[0]), OutlineEvent::Navigate("1".to_string()));
}

#[test]
fn toggle_gesture_only_applies_to_rows_with_children() {
    let forest = build_outline(&sample_blocks());
    let rows = visible_rows(&forest, &HashSet::new());

    assert_eq!(
        toggle(&rows[0]),
        Some(OutlineEvent::ToggleCollapse("1".to_string()))
    );
    // "four five" text row has no children
    assert_eq!(toggle(&rows[2]), None);
}

#[test]
fn click_on_toggle_control_collapses_without_navigating() {
    let forest = build_outline(&sample_blocks());
    let rows = visible_rows(&forest, &HashSet::new());

    // Chapter row at depth 0: toggle control occupies columns 0..2.
    assert_eq!(
        dispatch_click(&rows[0], 0),
        OutlineEvent::ToggleCollapse("1".to_string())
    );
    assert_eq!(
        dispatch_click(&rows[0], 5),
        OutlineEvent::Navigate("1".to_string())
    );

    // Section row at depth 1: control sits after the indent.
    assert_eq!(
        dispatch_click(&rows[1], 2),
        OutlineEvent::ToggleCollapse("3".to_string())
    );
    assert_eq!(
        dispatch_click(&rows[1], 0),
        OutlineEvent::Navigate("3".to_string())
    );

    // Leaf rows navigate no matter where they are clicked.
    assert_eq!(
        dispatch_click(&rows[2], 4),
        OutlineEvent::Navigate("4".to_string())
    );
}

#[test]
fn rendered_rows_match_visible_rows() {
    let theme = Theme::default();
    let forest = build_outline(&sample_blocks());
    let rows = visible_rows(&forest, &HashSet::new());
    let lines = render_rows(&rows, &theme);
    assert_eq!(lines.len(), rows.len());

    let first: String = lines[0]
        .spans
        .iter()
        .map(|span| span.content.as_ref())
        .collect();
    assert!(first.contains("Ch1"));
    assert!(first.contains('5'));
}
