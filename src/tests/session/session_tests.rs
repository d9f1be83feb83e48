use super::*;
use crate::remote::TaskStatus;

fn task(id: &str) -> Task {
    Task {
        id: id.to_string(),
        title: format!("task {}", id),
        status: TaskStatus::Pending,
        claimed_by: String::new(),
    }
}

fn tasks(n: usize) -> Vec<Task> {
    (0..n).map(|i| task(&format!("t{}", i))).collect()
}

#[test]
fn first_refresh_selects_first_row() {
    let mut s = Session::new("tui@host");
    assert_eq!(s.selected_index(), None);
    s.replace_tasks(tasks(3));
    assert_eq!(s.selected_index(), Some(0));
    assert_eq!(s.selected_task().map(|t| t.id.as_str()), Some("t0"));
}

#[test]
fn shrinking_refresh_clamps_selection() {
    let mut s = Session::new("tui@host");
    s.replace_tasks(tasks(5));
    s.select(4);
    s.replace_tasks(tasks(2));
    assert_eq!(s.selected_index(), Some(1));
}

#[test]
fn empty_refresh_clears_selection() {
    let mut s = Session::new("tui@host");
    s.replace_tasks(tasks(2));
    s.replace_tasks(Vec::new());
    assert_eq!(s.selected_index(), None);
    assert!(s.selected_task().is_none());
}

#[test]
fn select_ignores_out_of_range_and_moves_within_bounds() {
    let mut s = Session::new("tui@host");
    s.select(0);
    assert_eq!(s.selected_index(), None);

    s.replace_tasks(tasks(3));
    s.select(7);
    assert_eq!(s.selected_index(), Some(0));

    s.select_next();
    s.select_next();
    s.select_next();
    assert_eq!(s.selected_index(), Some(2));
    s.select_prev();
    assert_eq!(s.selected_index(), Some(1));
}

#[test]
fn set_health_keeps_task_list() {
    let mut s = Session::new("tui@host");
    s.replace_tasks(tasks(2));
    s.set_health(HealthStatus::unreachable());
    assert_eq!(s.tasks().len(), 2);
    assert_eq!(s.health().db, "unreachable");
}

#[test]
fn holder_id_is_tui_at_hostname() {
    let expected = format!(
        "tui@{}",
        hostname::get()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|_| "localhost".to_string())
    );
    assert_eq!(local_holder_id(), expected);
    assert_eq!(local_holder_id(), local_holder_id());
}
