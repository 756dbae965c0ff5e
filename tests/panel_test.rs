use serde_json::json;
use std::time::{Duration, Instant};
use treepanel::config::PanelOptions;
use treepanel::core::dataset::series_from_value;
use treepanel::core::selection::InMemoryVariables;
use treepanel::core::tree::SearchMatch;
use treepanel::TreePanel;

fn rows(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn sample_panel() -> TreePanel {
    let mut panel = TreePanel::default();
    panel
        .set_rows(rows(&[
            "a:Alpha:company,x1:X1:country",
            "a:Alpha:company,x2:X2:country",
            "b:Beta:company",
        ]))
        .unwrap();
    panel
}

fn visible_names(panel: &TreePanel) -> Vec<String> {
    panel
        .visible_rows()
        .iter()
        .map(|row| panel.tree().node(row.node).name.clone())
        .collect()
}

#[test]
fn toggle_select_publishes_expression() {
    let mut panel = sample_panel();
    let mut host = InMemoryVariables::new();

    let x1 = panel.find_path(&["a", "x1"]).unwrap();
    let update = panel.toggle_select(x1, &mut host);
    assert_eq!(update.expression, "country in (x1)");
    assert_eq!(update.selected_ids, vec!["x1".to_string()]);
    assert!(update.published);

    let x2 = panel.find_path(&["a", "x2"]).unwrap();
    let update = panel.toggle_select(x2, &mut host);
    assert_eq!(update.expression, "country in (x1,x2)");

    assert_eq!(host.get("filter"), Some("country in (x1,x2)"));
    assert_eq!(host.updates().len(), 2);
    assert_eq!(host.updates()[0].0, "var-filter");
}

#[test]
fn toggle_select_skips_publish_when_host_agrees() {
    let mut panel = sample_panel();
    let mut host = InMemoryVariables::new();
    host.set("filter", "company in (b)");

    let b = panel.find_node("b").unwrap();
    let update = panel.toggle_select(b, &mut host);
    assert_eq!(update.expression, "company in (b)");
    assert!(!update.published);
    assert!(host.updates().is_empty());
}

#[test]
fn selection_survives_rebuild_and_expands_ancestors() {
    let mut panel = sample_panel();
    let mut host = InMemoryVariables::new();
    let x2 = panel.find_path(&["a", "x2"]).unwrap();
    panel.toggle_select(x2, &mut host);

    panel
        .set_rows(rows(&[
            "a:Alpha:company,x2:X2:country",
            "a:Alpha:company,x3:X3:country",
        ]))
        .unwrap();

    let x2 = panel.find_path(&["a", "x2"]).unwrap();
    assert!(panel.tree().node(x2).selected);
    let a = panel.find_node("a").unwrap();
    assert!(panel.tree().node(a).expanded);
    assert_eq!(panel.expression(), "country in (x2)");
    assert_eq!(visible_names(&panel), vec!["Alpha", "X2", "X3"]);
}

#[test]
fn unchanged_rows_keep_the_current_tree() {
    let mut panel = sample_panel();
    let a = panel.find_node("a").unwrap();
    panel.toggle_expand(a);
    panel
        .set_rows(rows(&[
            "a:Alpha:company,x1:X1:country",
            "a:Alpha:company,x2:X2:country",
            "b:Beta:company",
        ]))
        .unwrap();
    assert!(panel.tree().node(a).expanded);
}

#[test]
fn search_applies_after_debounce() {
    let mut panel = sample_panel();
    let start = Instant::now();
    panel.set_search_text("x", start);
    assert_eq!(panel.search_text(), "x");
    assert_eq!(panel.applied_search(), "");

    panel.set_search_text("x2", start + Duration::from_millis(100));
    assert!(!panel.tick(start + Duration::from_millis(300)));
    assert!(panel.tick(start + Duration::from_millis(350)));
    assert_eq!(panel.applied_search(), "x2");
    assert!(panel.search_deadline().is_none());

    let x2 = panel.find_path(&["a", "x2"]).unwrap();
    assert_eq!(panel.tree().node(x2).search_match, SearchMatch::DirectMatch);
    assert_eq!(visible_names(&panel), vec!["Alpha", "X2", "Beta"]);
}

#[test]
fn flush_search_applies_immediately() {
    let mut panel = sample_panel();
    panel.set_search_text("beta", Instant::now());
    assert!(panel.flush_search());
    assert_eq!(visible_names(&panel), vec!["Alpha", "Beta"]);
    let a = panel.find_node("a").unwrap();
    assert_eq!(panel.tree().node(a).search_match, SearchMatch::NoMatch);

    panel.set_search_text("", Instant::now());
    assert!(panel.flush_search());
    assert_eq!(visible_names(&panel), vec!["Alpha", "Beta"]);
}

#[test]
fn search_survives_rebuild() {
    let mut panel = sample_panel();
    panel.set_search_text("x1", Instant::now());
    panel.flush_search();
    panel
        .set_rows(rows(&["a:Alpha:company,x1:X1:country", "c:Gamma"]))
        .unwrap();
    assert_eq!(visible_names(&panel), vec!["Alpha", "X1", "Gamma"]);
}

#[test]
fn show_selected_only_prunes_and_restores() {
    let mut panel = sample_panel();
    let mut host = InMemoryVariables::new();
    let x1 = panel.find_path(&["a", "x1"]).unwrap();
    panel.toggle_select(x1, &mut host);

    panel.set_show_selected_only(true).unwrap();
    assert!(panel.show_selected_only());
    assert_eq!(panel.tree().len(), 2);
    assert_eq!(visible_names(&panel), vec!["Alpha", "X1"]);

    panel.set_show_selected_only(false).unwrap();
    assert_eq!(panel.tree().len(), 4);
    assert_eq!(visible_names(&panel), vec!["Alpha", "X1", "X2", "Beta"]);
}

#[test]
fn series_rows_come_from_configured_field() {
    let mut panel = TreePanel::new(PanelOptions::new("hierarchy", "scope"));
    let series = series_from_value(json!([
        {"fields": [{"name": "hierarchy", "values": ["old"]}]},
        {"fields": [
            {"name": "hierarchy", "values": ["a:Alpha,b:Beta", null, "c"]},
            {"name": "other", "values": ["z"]}
        ]}
    ]))
    .unwrap();
    panel.set_series(series).unwrap();
    assert_eq!(panel.rows(), vec!["a:Alpha,b:Beta", "c"]);
    assert_eq!(visible_names(&panel), vec!["Alpha", "c"]);

    let mut host = InMemoryVariables::new();
    let c = panel.find_node("c").unwrap();
    panel.toggle_select(c, &mut host);
    assert_eq!(host.updates()[0], ("var-scope".to_string(), " in (c)".to_string()));
}

#[test]
fn changing_field_rebuilds_from_new_rows() {
    let mut panel = TreePanel::default();
    let series = series_from_value(json!({
        "fields": [
            {"name": "path", "values": ["a"]},
            {"name": "alt", "values": ["b", "c"]}
        ]
    }))
    .unwrap();
    panel.set_series(series).unwrap();
    assert_eq!(panel.tree().len(), 1);

    panel
        .set_options(PanelOptions::new("alt", "filter"))
        .unwrap();
    assert_eq!(panel.tree().len(), 2);
    assert!(panel.find_node("c").is_some());
}

#[test]
fn repeated_id_selection_survives_show_selected() {
    let mut panel = TreePanel::default();
    panel
        .set_rows(rows(&["a:A:company,a:Inner:site"]))
        .unwrap();
    let mut host = InMemoryVariables::new();
    let outer = panel.find_node("a").unwrap();
    panel.toggle_expand(outer);
    let inner = panel.find_path(&["a", "a"]).unwrap();
    let update = panel.toggle_select(inner, &mut host);
    assert_eq!(update.expression, "site in (a)");
    assert_eq!(
        update.selected_paths,
        vec![vec!["a".to_string(), "a".to_string()]]
    );

    panel.set_show_selected_only(true).unwrap();
    assert_eq!(panel.expression(), "site in (a)");
    let outer = panel.find_path(&["a"]).unwrap();
    assert!(!panel.tree().node(outer).selected);
}

#[test]
fn collapse_and_expand_all() {
    let mut panel = sample_panel();
    panel.expand_all();
    assert_eq!(panel.visible_rows().len(), 4);
    panel.collapse_all();
    assert_eq!(visible_names(&panel), vec!["Alpha", "Beta"]);
}
