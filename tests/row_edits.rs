use listfeed::ingestion::{IngestionOptions, IngestionSession};
use listfeed::types::{Cell, ColumnKind, ColumnSchema, ColumnSpec};

fn checklist_schema() -> ColumnSchema {
    ColumnSchema::new(vec![
        ColumnSpec::new("done", ColumnKind::Checkable),
        ColumnSpec::new("task", ColumnKind::Text),
        ColumnSpec::new("eta", ColumnKind::Float),
    ])
    .unwrap()
}

fn loaded_session() -> IngestionSession {
    let mut session = IngestionSession::new(checklist_schema(), IngestionOptions::default());
    session.load_tokens([
        "true", "write", "1.5", //
        "false", "review", "0.5",
    ]);
    session
}

#[test]
fn add_row_appends_zero_values() {
    let mut session = loaded_session();
    let idx = session.add_row();
    assert_eq!(idx, 2);
    assert_eq!(
        session.store().row(2).unwrap(),
        &[Cell::Bool(false), Cell::Text(String::new()), Cell::Float(0.0)]
    );
}

#[test]
fn remove_row_shifts_later_rows_up() {
    let mut session = loaded_session();
    let removed = session.remove_row(0).unwrap();
    assert_eq!(removed[1], Cell::Text("write".to_string()));
    assert_eq!(session.store().len(), 1);
    assert_eq!(
        session.store().cell(0, 1),
        Some(&Cell::Text("review".to_string()))
    );
}

#[test]
fn remove_row_out_of_range_is_none() {
    let mut session = loaded_session();
    assert!(session.remove_row(9).is_none());
    assert_eq!(session.store().len(), 2);
}

#[test]
fn duplicate_row_copies_every_cell() {
    let mut session = loaded_session();
    assert_eq!(session.duplicate_row(1), Some(2));
    assert_eq!(session.store().len(), 3);
    assert_eq!(session.store().row(2).unwrap(), session.store().row(1).unwrap());
}

#[test]
fn toggle_cell_flips_check_state() {
    let mut session = loaded_session();
    session.toggle_cell(1, 0);
    assert_eq!(session.store().cell(1, 0), Some(&Cell::Bool(true)));
    session.toggle_cell(1, 0);
    assert_eq!(session.store().cell(1, 0), Some(&Cell::Bool(false)));
}

#[test]
fn toggle_cell_ignores_non_boolean_columns() {
    let mut session = loaded_session();
    session.toggle_cell(0, 1);
    assert_eq!(session.store().cell(0, 1), Some(&Cell::Text("write".to_string())));
}

#[test]
fn edit_cell_applies_the_lenient_coercion_table() {
    let mut session = loaded_session();
    session.edit_cell(0, 2, "2.25 days");
    assert_eq!(session.store().cell(0, 2), Some(&Cell::Float(2.25)));
    session.edit_cell(0, 2, "soon");
    assert_eq!(session.store().cell(0, 2), Some(&Cell::Float(0.0)));
}

#[test]
fn deleting_the_in_progress_row_reopens_on_the_next_field() {
    let mut session = IngestionSession::new(checklist_schema(), IngestionOptions::default());
    session.feed("true");
    session.remove_row(0);
    session.feed("false");
    assert_eq!(session.store().len(), 1);
    assert_eq!(session.store().cell(0, 0), Some(&Cell::Bool(false)));
}

#[test]
fn edits_do_not_disturb_the_streaming_cursor() {
    let mut session = IngestionSession::new(checklist_schema(), IngestionOptions::default());
    session.feed("true");
    session.feed("half done");
    // A user edit lands between two stream wakeups.
    session.edit_cell(0, 1, "renamed");
    session.feed("3.5");
    assert_eq!(
        session.store().row(0).unwrap(),
        &[
            Cell::Bool(true),
            Cell::Text("renamed".to_string()),
            Cell::Float(3.5),
        ]
    );
}
