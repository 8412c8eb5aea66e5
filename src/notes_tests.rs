use super::*;

#[test]
fn committing_input_appends_and_selects_the_new_note() {
    let mut state = NotesState::default();
    state.start_input();
    for ch in "buy more coffee".chars() {
        state.push_input_char(ch);
    }
    assert!(state.commit_input());
    assert_eq!(state.notes().len(), 1);
    assert_eq!(state.notes()[0].text, "buy more coffee");
    assert!(!state.notes()[0].done);
    assert_eq!(state.selected_index(), 0);
    assert!(!state.is_editing());
}

#[test]
fn whitespace_only_input_is_discarded() {
    let mut state = NotesState::default();
    state.start_input();
    state.push_input_char(' ');
    state.push_input_char('\t');
    assert!(!state.commit_input());
    assert!(state.is_empty());
}

#[test]
fn cancel_drops_the_pending_input() {
    let mut state = NotesState::default();
    state.start_input();
    state.push_input_char('x');
    state.cancel_input();
    assert!(!state.is_editing());
    assert!(!state.commit_input());
}

#[test]
fn toggle_flips_the_done_flag() {
    let mut state = NotesState::new(vec![Note::new("check chapter two")]);
    assert!(state.toggle_selected());
    assert!(state.notes()[0].done);
    assert!(state.toggle_selected());
    assert!(!state.notes()[0].done);
}

#[test]
fn selection_wraps_in_both_directions() {
    let mut state = NotesState::new(vec![Note::new("a"), Note::new("b"), Note::new("c")]);
    state.move_selection(-1);
    assert_eq!(state.selected_index(), 2);
    state.move_selection(1);
    assert_eq!(state.selected_index(), 0);
}

#[test]
fn removing_the_last_note_moves_the_selection_back() {
    let mut state = NotesState::new(vec![Note::new("a"), Note::new("b")]);
    state.move_selection(1);
    assert!(state.remove_selected());
    assert_eq!(state.selected_index(), 0);
    assert!(state.remove_selected());
    assert!(state.is_empty());
    assert!(!state.remove_selected());
}

#[test]
fn backspace_edits_the_input_line() {
    let mut state = NotesState::default();
    state.backspace_input(); // no input open, no-op
    state.start_input();
    state.push_input_char('a');
    state.push_input_char('b');
    state.backspace_input();
    assert_eq!(state.input(), Some("a"));
}
