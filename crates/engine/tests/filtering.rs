use std::{collections::BTreeSet, sync::Arc};

use engine::{
    Category, CompareOp, EditorControls, EditorEvent, Entry, EntryContext, EntryId, Field,
    FilterEditor, FilterStore, FilterUpdate, FilteredView, Lenient, PaymentMethod, Source,
    Statistic, compute_view, parse_bound, parse_threshold,
};

fn entries() -> Vec<Entry> {
    vec![
        Entry::builder("1")
            .cents(1000)
            .category(Lenient::Valid(Category::Gas))
            .payment_method(Lenient::Valid(PaymentMethod::Nu))
            .fixed(true)
            .created_at("2024-01-01T09:00:00Z")
            .build(),
        Entry::builder("2")
            .cents(2000)
            .category(Lenient::Valid(Category::Supermarket))
            .source(Lenient::Valid(Source::Marilia))
            .created_at("2024-01-15T12:30:00Z")
            .build(),
        Entry::builder("3")
            .cents(3000)
            .category(Lenient::Valid(Category::Gas))
            .payment_method(Lenient::Valid(PaymentMethod::Pix))
            .fixed(true)
            .created_at("2024-02-01T08:00:00Z")
            .build(),
    ]
}

fn ids<'a>(view: impl IntoIterator<Item = &'a Entry>) -> Vec<&'a str> {
    view.into_iter().map(|entry| entry.id.as_str()).collect()
}

fn values(items: &[&str]) -> FilterUpdate {
    FilterUpdate::Values(items.iter().map(|s| s.to_string()).collect())
}

fn amount_gt(store: &mut FilterStore, threshold: f64) {
    store
        .set_filter(Field::Amount, FilterUpdate::CompareOp(CompareOp::Gt))
        .unwrap();
    store
        .set_filter(Field::Amount, FilterUpdate::Threshold(threshold))
        .unwrap();
}

#[test]
fn compute_view_is_idempotent() {
    let source = entries();
    let mut store = FilterStore::new();
    store.set_filter(Field::Category, values(&["Gas"])).unwrap();

    let first = compute_view(&source, &store);
    let second = compute_view(&source, &store);
    assert_eq!(first, second);
}

#[test]
fn empty_store_is_identity() {
    let source = entries();
    let view = compute_view(&source, &FilterStore::new());
    assert_eq!(ids(view), ["1", "2", "3"]);
}

#[test]
fn filters_compose_as_intersection() {
    let source = entries();

    let mut by_category = FilterStore::new();
    by_category.set_filter(Field::Category, values(&["Gas"])).unwrap();
    let mut by_amount = FilterStore::new();
    amount_gt(&mut by_amount, 15.0);

    let mut both = by_category.clone();
    amount_gt(&mut both, 15.0);

    let left: BTreeSet<&EntryId> = compute_view(&source, &by_category)
        .into_iter()
        .map(|entry| &entry.id)
        .collect();
    let right: BTreeSet<&EntryId> = compute_view(&source, &by_amount)
        .into_iter()
        .map(|entry| &entry.id)
        .collect();
    let combined: BTreeSet<&EntryId> = compute_view(&source, &both)
        .into_iter()
        .map(|entry| &entry.id)
        .collect();

    assert_eq!(combined, left.intersection(&right).copied().collect());
    assert_eq!(combined.len(), 1);
}

#[test]
fn amount_greater_than_keeps_order() {
    let source = entries();
    let mut store = FilterStore::new();
    amount_gt(&mut store, 15.0);
    assert_eq!(ids(compute_view(&source, &store)), ["2", "3"]);
}

#[test]
fn date_range_is_inclusive() {
    let source = entries();
    let mut store = FilterStore::new();
    store
        .set_filter(Field::CreatedAt, FilterUpdate::RangeStart(parse_bound("2024-01-01")))
        .unwrap();
    store
        .set_filter(Field::CreatedAt, FilterUpdate::RangeEnd(parse_bound("2024-01-31")))
        .unwrap();
    assert_eq!(ids(compute_view(&source, &store)), ["1", "2"]);
}

#[test]
fn end_bound_includes_the_whole_day() {
    let source = vec![
        Entry::builder("late")
            .created_at("2024-01-31T23:59:59Z")
            .build(),
    ];
    let mut store = FilterStore::new();
    store
        .set_filter(Field::CreatedAt, FilterUpdate::RangeEnd(parse_bound("2024-01-31")))
        .unwrap();
    assert_eq!(compute_view(&source, &store).len(), 1);
}

#[test]
fn booleans_match_yes_and_no() {
    let source = entries();
    let mut store = FilterStore::new();

    store.set_filter(Field::Fixed, values(&["yes"])).unwrap();
    assert_eq!(ids(compute_view(&source, &store)), ["1", "3"]);

    store.set_filter(Field::Fixed, values(&["no"])).unwrap();
    assert_eq!(ids(compute_view(&source, &store)), ["2"]);

    store.set_filter(Field::Fixed, values(&["maybe"])).unwrap();
    assert!(compute_view(&source, &store).is_empty());
}

#[test]
fn appended_records_respect_active_filters() {
    let mut ctx = EntryContext::new();
    ctx.update_filters(|store| store.set_filter(Field::Category, values(&["Gas"])))
        .unwrap();

    let mut source = entries();
    ctx.set_source(source.clone());
    assert_eq!(ids(ctx.snapshot().iter()), ["1", "3"]);

    source.push(
        Entry::builder("4")
            .category(Lenient::Valid(Category::Car))
            .build(),
    );
    ctx.set_source(source.clone());
    assert_eq!(ids(ctx.snapshot().iter()), ["1", "3"]);

    source.push(
        Entry::builder("5")
            .category(Lenient::Valid(Category::Gas))
            .build(),
    );
    ctx.set_source(source);
    assert_eq!(ids(ctx.snapshot().iter()), ["1", "3", "5"]);
}

#[test]
fn malformed_fields_only_matter_when_filtered() {
    let mut source = entries();
    source.push(
        Entry::builder("bad")
            .amount(Lenient::Malformed("twelve".to_string()))
            .installments(Lenient::Malformed("-".to_string()))
            .created_at("not a date")
            .build(),
    );

    let mut store = FilterStore::new();
    assert_eq!(compute_view(&source, &store).len(), 4);

    store.set_filter(Field::Category, values(&["Supermarket"])).unwrap();
    assert_eq!(ids(compute_view(&source, &store)), ["2", "bad"]);

    store
        .set_filter(Field::Amount, FilterUpdate::Threshold(parse_threshold("oops")))
        .unwrap();
    store
        .set_filter(Field::Amount, FilterUpdate::CompareOp(CompareOp::Gt))
        .unwrap();
    assert_eq!(ids(compute_view(&source, &store)), ["2"]);

    store.clear(Field::Amount);
    store
        .set_filter(Field::CreatedAt, FilterUpdate::RangeStart(parse_bound("2000-01-01")))
        .unwrap();
    assert_eq!(ids(compute_view(&source, &store)), ["2"]);
}

#[test]
fn closing_the_editor_keeps_filtering() {
    let mut ctx = EntryContext::new();
    ctx.set_source(entries());
    let mut editor = FilterEditor::new();

    ctx.update_filters(|store| {
        editor.handle(EditorEvent::OpenRequest(Field::PaymentMethod), store);
        store.toggle_value(Field::PaymentMethod, "Pix")
    })
    .unwrap();
    assert_eq!(ids(ctx.snapshot().iter()), ["3"]);

    ctx.update_filters(|store| editor.handle(EditorEvent::PointerDown { x: 0, y: 0 }, store));
    assert_eq!(editor.open_field(), None);
    assert!(!ctx.filters().is_visible(Field::PaymentMethod));
    assert_eq!(ids(ctx.snapshot().iter()), ["3"]);

    ctx.clear_filters();
    assert_eq!(ctx.snapshot().len(), 3);
}

#[test]
fn checklist_is_rebuilt_from_current_source() {
    let mut ctx = EntryContext::new();
    ctx.set_source(entries());
    let controls = EditorControls::for_field(Field::PaymentMethod, ctx.source(), ctx.filters());
    let EditorControls::Checklist { options } = controls else {
        panic!("payment method should use a checklist");
    };
    let labels: Vec<&str> = options.iter().map(|o| o.value.as_str()).collect();
    assert_eq!(labels, ["NU", "Pix", "Santander"]);

    let mut source = entries();
    source.push(
        Entry::builder("4")
            .payment_method(Lenient::Valid(PaymentMethod::Porto))
            .build(),
    );
    ctx.set_source(source);
    let EditorControls::Checklist { options } =
        EditorControls::for_field(Field::PaymentMethod, ctx.source(), ctx.filters())
    else {
        panic!("payment method should use a checklist");
    };
    assert_eq!(options.len(), 4);
}

#[test]
fn statistics_follow_the_visible_rows() {
    let source: Arc<[Entry]> = entries().into();
    let mut store = FilterStore::new();
    store.set_filter(Field::Fixed, values(&["yes"])).unwrap();

    let view = FilteredView::compute(source, &store);
    assert_eq!(view.ids(), [&EntryId::new("1"), &EntryId::new("3")]);

    let stat = Statistic::from_view(&view);
    assert_eq!(stat.count, 2);
    assert_eq!(stat.total.cents(), 4000);
    assert_eq!(stat.fixed_total.cents(), 4000);
}
