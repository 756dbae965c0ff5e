use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;
use treepanel::tui::{parse_key, visible_width, TreeSelectorComponent};
use treepanel::TreePanel;

fn component() -> TreeSelectorComponent {
    let mut panel = TreePanel::default();
    panel
        .set_rows(vec![
            "a:Alpha:company,x1:X1:country".to_string(),
            "a:Alpha:company,x2:X2:country".to_string(),
            "b:Beta:company".to_string(),
        ])
        .unwrap();
    TreeSelectorComponent::new(panel, 24)
}

#[test]
fn footer_shows_published_expression() {
    let mut selector = component();
    let updates = Rc::new(RefCell::new(Vec::new()));
    let sink = updates.clone();
    selector.on_filter(move |update| sink.borrow_mut().push(update.expression.clone()));

    let now = Instant::now();
    selector.handle_input_at("\x1b[B", now);
    selector.handle_input_at("\t", now);

    assert_eq!(updates.borrow().as_slice(), &["company in (b)".to_string()]);
    let lines = selector.render(80);
    assert_eq!(lines.last().unwrap(), "  var-filter = company in (b)");
    assert!(lines
        .iter()
        .any(|line| line.contains("id: b, name: Beta, type: company")));
}

#[test]
fn ctrl_s_toggles_show_selected() {
    let mut selector = component();
    let now = Instant::now();
    selector.handle_input_at("\x1b[C", now);
    selector.handle_input_at("\x1b[B", now);
    selector.handle_input_at(" ", now);
    selector.handle_input_at("\x13", now);

    assert!(selector.panel().show_selected_only());
    assert_eq!(selector.panel().tree().len(), 2);
    assert!(selector
        .render(80)
        .iter()
        .any(|line| line == "  [x] Show Selected"));
    assert_eq!(selector.tree_list().row_count(), 2);

    selector.handle_input_at("\x13", now);
    assert!(!selector.panel().show_selected_only());
    assert_eq!(selector.tree_list().row_count(), 4);
}

#[test]
fn space_types_into_active_search() {
    let mut selector = component();
    let now = Instant::now();
    selector.handle_input_at("x", now);
    selector.handle_input_at(" ", now);
    assert_eq!(selector.panel().search_text(), "x ");
    assert_eq!(selector.panel().expression(), "");
}

#[test]
fn rendered_lines_fit_width() {
    let selector = component();
    for line in selector.render(20) {
        assert!(visible_width(&line) <= 20, "{line:?}");
    }
}

#[test]
fn parses_named_keys() {
    assert_eq!(parse_key("\x1b[A").as_deref(), Some("up"));
    assert_eq!(parse_key("\t").as_deref(), Some("tab"));
    assert_eq!(parse_key("\x05").as_deref(), Some("ctrl+e"));
}
