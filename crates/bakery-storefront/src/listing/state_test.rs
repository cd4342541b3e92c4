use std::str::FromStr;

use bakery_core::{Discount, Page, Pagination, Product};
use rust_decimal::Decimal;

use super::*;

fn product(name: &str) -> Product {
    Product {
        id: format!("id-{name}"),
        product_id: None,
        name: name.to_string(),
        description: String::new(),
        price: Decimal::from_str("100").unwrap(),
        discount: Discount::NONE,
        category: "Cake".to_string(),
        tags: vec![],
        theme: String::new(),
        flavour: String::new(),
        images: vec![],
        available: true,
        created_at: None,
        updated_at: None,
    }
}

fn page_of(names: &[&str], page: u32, total_items: u64) -> Page<Product> {
    Page {
        items: names.iter().map(|n| product(n)).collect(),
        pagination: Pagination::new(page, 2, total_items),
    }
}

fn server_error() -> ClientError {
    ClientError::Api {
        status: 500,
        message: None,
    }
}

fn state() -> ListingState<&'static str> {
    ListingState::new("All", 2, Mode::Infinite)
}

#[test]
fn initial_load_then_load_more_appends() {
    let mut s = state();
    let first = s.initial_load();
    assert!(s.is_initial_loading());
    assert_eq!(first.page, 1);
    assert_eq!(s.complete(first.ticket, Ok(page_of(&["A", "B"], 1, 3))), Completion::Applied);
    assert_eq!(s.page(), 2);
    assert!(s.has_more());

    let second = s.load_more().expect("has more");
    assert!(s.is_loading_more());
    assert_eq!(second.page, 2);
    s.complete(second.ticket, Ok(page_of(&["C"], 2, 3)));

    let names: Vec<&str> = s.items().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B", "C"]);
    assert!(!s.has_more());
    assert!(s.load_more().is_none());
}

#[test]
fn only_one_fetch_in_flight() {
    let mut s = state();
    let first = s.initial_load();
    assert!(s.load_more().is_none(), "initial load is still in flight");
    s.complete(first.ticket, Ok(page_of(&["A", "B"], 1, 10)));

    assert!(s.load_more().is_some());
    assert!(s.load_more().is_none());
    assert!(s.load_more().is_none());
}

#[test]
fn filter_change_discards_late_response() {
    let mut s = state();
    let cake = s.set_filter("Cake").expect("filter changed");
    let bread = s.set_filter("Bread").expect("filter changed");
    assert!(s.items().is_empty());

    assert_eq!(s.complete(bread.ticket, Ok(page_of(&["Baguette"], 1, 1))), Completion::Applied);
    assert_eq!(s.complete(cake.ticket, Ok(page_of(&["Sponge"], 1, 1))), Completion::Stale);

    assert_eq!(s.items().len(), 1);
    assert_eq!(s.items()[0].name, "Baguette");
    assert_eq!(*s.filter(), "Bread");
}

#[test]
fn setting_same_filter_is_noop() {
    let mut s = state();
    assert!(s.set_filter("All").is_none());
}

#[test]
fn set_filter_resets_before_response() {
    let mut s = state();
    let first = s.initial_load();
    s.complete(first.ticket, Ok(page_of(&["A", "B"], 1, 4)));
    let _ = s.load_more();

    s.set_filter("Bread");
    assert!(s.items().is_empty());
    assert_eq!(s.page(), 1);
    assert!(s.has_more());
    assert!(s.error().is_none());
    assert!(s.is_initial_loading());
}

#[test]
fn initial_failure_leaves_empty_items_and_error() {
    let mut s = state();
    let first = s.initial_load();
    s.complete(first.ticket, Err(server_error()));
    assert!(s.items().is_empty());
    assert!(s.error().is_some());
    assert!(!s.has_more());
    assert!(!s.is_initial_loading());
}

#[test]
fn load_more_failure_keeps_items() {
    let mut s = state();
    let first = s.initial_load();
    s.complete(first.ticket, Ok(page_of(&["A", "B"], 1, 4)));
    let more = s.load_more().unwrap();
    s.complete(more.ticket, Err(server_error()));

    assert_eq!(s.items().len(), 2);
    assert!(!s.has_more());
    assert_eq!(
        s.error().map(|e| e.category),
        Some(ErrorCategory::Server)
    );
    assert!(s.load_more().is_none());

    let again = s.retry().expect("retry after failure");
    assert_eq!(again.page, 2);
    assert!(s.error().is_none());
}

#[test]
fn not_found_is_an_empty_state() {
    let mut s = state();
    let first = s.initial_load();
    s.complete(
        first.ticket,
        Err(ClientError::NotFound {
            path: "/api/products".to_string(),
            message: None,
        }),
    );
    assert!(s.error().is_none());
    assert!(s.is_empty());
    assert!(!s.has_more());
}

#[test]
fn search_filters_without_touching_paging() {
    let mut s = state();
    let first = s.initial_load();
    s.complete(
        first.ticket,
        Ok(Page {
            items: vec![
                product("Chocolate Cake"),
                product("Vanilla Bread"),
                product("Choco Chip Cookie"),
            ],
            pagination: Pagination::new(1, 3, 9),
        }),
    );
    let page_before = s.page();

    let names: Vec<&str> = s
        .visible_items("choc")
        .into_iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(names, vec!["Chocolate Cake", "Choco Chip Cookie"]);
    assert_eq!(s.page(), page_before);
    assert!(s.has_more());
}

#[test]
fn sentinel_is_edge_triggered() {
    let mut s = state();
    let first = s.initial_load();
    s.complete(first.ticket, Ok(page_of(&["A", "B"], 1, 6)));

    let more = s.sentinel_visible(true).expect("edge fires");
    assert!(s.sentinel_visible(true).is_none());
    assert!(s.sentinel_visible(true).is_none());
    s.complete(more.ticket, Ok(page_of(&["C", "D"], 2, 6)));
    let last = s.sentinel_visible(true).expect("re-armed after the page landed");
    assert!(s.sentinel_visible(true).is_none());
    s.complete(last.ticket, Ok(page_of(&["E", "F"], 3, 6)));
    assert!(s.sentinel_visible(false).is_none());
    assert!(s.sentinel_visible(true).is_none(), "nothing left to load");
}

#[test]
fn sentinel_seen_during_initial_load_does_not_stall() {
    let mut s = state();
    let first = s.initial_load();
    assert!(s.sentinel_visible(true).is_none(), "initial load in flight");
    s.complete(first.ticket, Ok(page_of(&["A", "B"], 1, 6)));

    assert!(s.has_more());
    let next = s.sentinel_visible(true).expect("short page leaves sentinel on screen");
    assert_eq!(next.page, 2);
}

#[test]
fn paged_mode_replaces_items_and_ignores_sentinel() {
    let mut s = ListingState::new("All", 2, Mode::Paged);
    let first = s.initial_load();
    s.complete(first.ticket, Ok(page_of(&["A", "B"], 1, 5)));
    assert!(s.sentinel_visible(true).is_none());
    assert!(s.load_more().is_none());

    let third = s.go_to_page(3).expect("paged jump");
    s.complete(third.ticket, Ok(page_of(&["E"], 3, 5)));
    assert_eq!(s.items().len(), 1);
    assert_eq!(s.items()[0].name, "E");
    assert_eq!(s.current_page(), 3);
    assert!(!s.has_more());
}

#[test]
fn paged_jump_supersedes_outstanding_page() {
    let mut s = ListingState::new("All", 2, Mode::Paged);
    let first = s.initial_load();
    let second = s.go_to_page(2).unwrap();
    assert_eq!(s.complete(first.ticket, Ok(page_of(&["A"], 1, 4))), Completion::Stale);
    assert_eq!(s.complete(second.ticket, Ok(page_of(&["C", "D"], 2, 4))), Completion::Applied);
    assert_eq!(s.current_page(), 2);
}

#[test]
fn jump_to_last_representable_page_does_not_overflow() {
    let mut s = ListingState::new("All", 2, Mode::Paged);
    let far = s.go_to_page(u32::MAX).expect("nothing known yet");
    assert_eq!(
        s.complete(far.ticket, Ok(Page::empty(u32::MAX, 2))),
        Completion::Applied
    );
    assert!(s.items().is_empty());
    assert!(!s.has_more());
}

#[test]
fn jump_past_reported_last_page_is_refused() {
    let mut s = ListingState::new("All", 2, Mode::Paged);
    let first = s.initial_load();
    s.complete(first.ticket, Ok(page_of(&["A", "B"], 1, 5)));
    assert!(s.go_to_page(4).is_none());
    assert_eq!(s.items().len(), 2);
    assert!(s.go_to_page(3).is_some());
}

#[test]
fn page_size_is_clamped() {
    assert_eq!(ListingState::new((), 500, Mode::Infinite).page_size(), 50);
    assert_eq!(ListingState::new((), 0, Mode::Infinite).page_size(), 1);
}
