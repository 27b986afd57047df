//! 控制器端到端测试：加载数据、筛选、分页、收藏与对比

use std::collections::BTreeMap;

use gallery_common::{Category, GalleryItem};
use gallery_core::controller::EmptyNotice;
use gallery_core::{
    Command, Effect, EmptyReason, GalleryConfig, GalleryController, ItemStore, MemoryStore,
    Overlay, PagerState, SortMode,
};

fn item(id: &str, number: u32, total: u32) -> GalleryItem {
    let per = total / 5;
    let scores: BTreeMap<String, u32> = Category::ALL
        .iter()
        .map(|c| (c.name().to_string(), per))
        .collect();
    GalleryItem {
        id: id.to_string(),
        number,
        name: format!("Prompt {}", id),
        image_ref: format!("img/{}.png", id),
        scores,
        total,
        payload: Some(format!("prompt: {}", id)),
    }
}

fn loaded(items: Vec<GalleryItem>) -> (GalleryController, Vec<Effect>) {
    let mut gallery = GalleryController::new(GalleryConfig::default(), Box::new(MemoryStore::new()));
    gallery.begin_load();
    let effects = gallery.finish_load(Ok(ItemStore::from_items(items)));
    (gallery, effects)
}

fn abc() -> Vec<GalleryItem> {
    vec![item("A", 1, 45), item("B", 2, 20), item("C", 3, 45)]
}

fn card_ids(effects: &[Effect]) -> Vec<String> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::AppendBatch { cards, .. } => Some(cards.iter().map(|c| c.id.clone())),
            _ => None,
        })
        .flatten()
        .collect()
}

fn many(n: usize) -> Vec<GalleryItem> {
    (0..n).map(|i| item(&format!("p{:03}", i), i as u32, 30)).collect()
}

#[test]
fn test_initial_load_renders_score_desc() {
    let (gallery, effects) = loaded(abc());

    assert_eq!(
        effects[0],
        Effect::ResetGrid { count: 3, favorites_active: false, empty: None }
    );
    assert_eq!(card_ids(&effects), vec!["A", "C", "B"]);
    assert_eq!(gallery.filtered_ids(), &["A", "C", "B"]);
}

#[test]
fn test_sort_by_number() {
    let (mut gallery, _) = loaded(abc());
    let effects = gallery.dispatch(Command::SetSort { mode: SortMode::NumberAsc });
    assert_eq!(card_ids(&effects), vec!["A", "B", "C"]);
}

#[test]
fn test_favorites_mode_shows_only_favorites() {
    let (mut gallery, _) = loaded(abc());
    gallery.dispatch(Command::ToggleFavorite { id: "B".to_string() });

    let effects = gallery.dispatch(Command::SetSort { mode: SortMode::Favorites });
    assert_eq!(
        effects[0],
        Effect::ResetGrid { count: 1, favorites_active: true, empty: None }
    );
    assert_eq!(card_ids(&effects), vec!["B"]);

    let effects = gallery.dispatch(Command::ToggleFavorite { id: "B".to_string() });
    assert_eq!(
        effects[0],
        Effect::UpdateCard { id: "B".to_string(), favorited: false, compared: false }
    );
    assert_eq!(
        effects[1],
        Effect::ResetGrid {
            count: 0,
            favorites_active: true,
            empty: Some(EmptyNotice {
                reason: EmptyReason::NoFavorites,
                message: "No favorites yet.".to_string(),
            }),
        }
    );
    assert_eq!(effects[2], Effect::Exhausted);
}

#[test]
fn test_search_without_matches_reports_no_matches() {
    let (mut gallery, _) = loaded(abc());
    let effects = gallery.dispatch(Command::SetSearch { text: "xyz".to_string() });

    match &effects[0] {
        Effect::ResetGrid { count: 0, empty: Some(notice), .. } => {
            assert_eq!(notice.reason, EmptyReason::NoMatches);
            assert_eq!(notice.message, "No prompts found.");
        }
        other => panic!("unexpected effect {:?}", other),
    }
    assert_eq!(gallery.pager().state(), PagerState::Exhausted);
}

#[test]
fn test_category_filter_command() {
    let mut items = abc();
    items[2].scores.insert("Hierarchy".to_string(), 3);
    let (mut gallery, _) = loaded(items);

    let effects = gallery.dispatch(Command::SetMinCategory { category: Category::Hierarchy, min: 5 });
    assert_eq!(card_ids(&effects), vec!["A"]);

    let effects = gallery.dispatch(Command::SetMinCategory { category: Category::Hierarchy, min: 0 });
    assert_eq!(card_ids(&effects).len(), 3);

    let effects = gallery.dispatch(Command::SetMinTotal { min: 40 });
    assert_eq!(card_ids(&effects), vec!["A", "C"]);
}

#[test]
fn test_scrolling_loads_remaining_batches() {
    let (mut gallery, effects) = loaded(many(75));
    assert_eq!(card_ids(&effects).len(), 30);

    let second = gallery.dispatch(Command::SentinelVisible);
    assert_eq!(card_ids(&second).len(), 30);

    let third = gallery.dispatch(Command::ShowMore);
    match &third[0] {
        Effect::AppendBatch { cards, loaded, total, has_more, page_index, .. } => {
            assert_eq!(cards.len(), 15);
            assert_eq!((*loaded, *total, *has_more, *page_index), (75, 75, false, 2));
            assert_eq!(cards[0].stagger_ms, 0);
            assert_eq!(cards[14].stagger_ms, 420);
        }
        other => panic!("unexpected effect {:?}", other),
    }

    assert_eq!(gallery.dispatch(Command::SentinelVisible), vec![Effect::Exhausted]);
}

#[test]
fn test_query_change_restarts_pagination() {
    let (mut gallery, _) = loaded(many(75));
    gallery.dispatch(Command::ShowMore);
    assert_eq!(gallery.pager().page_index(), 2);

    let effects = gallery.dispatch(Command::SetSort { mode: SortMode::ScoreAsc });
    assert_eq!(card_ids(&effects).len(), 30);
    assert_eq!(gallery.pager().page_index(), 1);
}

#[test]
fn test_compare_selection_is_bounded() {
    let (mut gallery, _) = loaded(many(5));
    for id in ["p000", "p001", "p002"] {
        gallery.dispatch(Command::ToggleCompare { id: id.to_string() });
    }

    let effects = gallery.dispatch(Command::ToggleCompare { id: "p003".to_string() });
    assert_eq!(
        effects,
        vec![Effect::Toast { message: "Max 3 items for comparison".to_string() }]
    );
    assert_eq!(gallery.selection().members(), &["p000", "p001", "p002"]);
}

#[test]
fn test_compare_bar_and_overlay() {
    let (mut gallery, _) = loaded(abc());

    let effects = gallery.dispatch(Command::ToggleCompare { id: "A".to_string() });
    assert_eq!(effects[1], Effect::CompareBar { visible: false, count: 1 });
    assert!(gallery.dispatch(Command::OpenCompare).is_empty());

    let effects = gallery.dispatch(Command::ToggleCompare { id: "C".to_string() });
    assert_eq!(
        effects[0],
        Effect::UpdateCard { id: "C".to_string(), favorited: false, compared: true }
    );
    assert_eq!(effects[1], Effect::CompareBar { visible: true, count: 2 });

    match &gallery.dispatch(Command::OpenCompare)[..] {
        [Effect::ShowCompare { view }] => {
            assert_eq!(view.columns, 2);
            assert_eq!(view.items[0].id, "A");
            assert_eq!(view.items[1].id, "C");
        }
        other => panic!("unexpected effects {:?}", other),
    }
    assert_eq!(gallery.overlay(), Overlay::Compare);

    assert_eq!(
        gallery.dispatch(Command::CloseOverlay),
        vec![Effect::CloseOverlay { overlay: Overlay::Compare }]
    );
    assert_eq!(
        gallery.dispatch(Command::ClearCompare),
        vec![Effect::CompareCleared, Effect::CompareBar { visible: false, count: 0 }]
    );
}

#[test]
fn test_close_overlay_closes_compare_before_detail() {
    let (mut gallery, _) = loaded(abc());
    gallery.dispatch(Command::ToggleCompare { id: "A".to_string() });
    gallery.dispatch(Command::ToggleCompare { id: "B".to_string() });

    gallery.dispatch(Command::OpenCompare);
    gallery.dispatch(Command::OpenDetail { id: "C".to_string() });
    assert!(gallery.compare_open());
    assert_eq!(gallery.detail_open(), Some("C"));

    assert_eq!(
        gallery.dispatch(Command::CloseOverlay),
        vec![Effect::CloseOverlay { overlay: Overlay::Compare }]
    );
    assert_eq!(gallery.overlay(), Overlay::Detail { id: "C".to_string() });
    assert_eq!(
        gallery.dispatch(Command::CloseOverlay),
        vec![Effect::CloseOverlay { overlay: Overlay::Detail { id: "C".to_string() } }]
    );
    assert_eq!(gallery.overlay(), Overlay::None);
    assert!(gallery.dispatch(Command::CloseOverlay).is_empty());
}

#[test]
fn test_cards_reflect_favorite_and_compare_flags() {
    let mut gallery = GalleryController::new(
        GalleryConfig::default(),
        Box::new(MemoryStore::with_entry("promptzoo_favs", r#"["C"]"#)),
    );
    gallery.begin_load();
    gallery.finish_load(Ok(ItemStore::from_items(abc())));
    gallery.dispatch(Command::ToggleCompare { id: "B".to_string() });

    let effects = gallery.dispatch(Command::SetSort { mode: SortMode::NumberAsc });
    let cards = match &effects[1] {
        Effect::AppendBatch { cards, .. } => cards.clone(),
        other => panic!("unexpected effect {:?}", other),
    };
    let flags: Vec<(bool, bool)> = cards.iter().map(|c| (c.favorited, c.compared)).collect();
    assert_eq!(flags, vec![(false, false), (false, true), (true, false)]);
}

#[test]
fn test_detail_copy_and_random() {
    let mut items = abc();
    items[1].payload = None;
    let (mut gallery, _) = loaded(items);

    match &gallery.dispatch(Command::OpenDetail { id: "B".to_string() })[..] {
        [Effect::ShowDetail { view }] => {
            assert_eq!(view.payload_text, "No prompt available");
            assert_eq!(view.scores.len(), 5);
        }
        other => panic!("unexpected effects {:?}", other),
    }
    assert_eq!(gallery.overlay(), Overlay::Detail { id: "B".to_string() });

    assert_eq!(
        gallery.dispatch(Command::CopyPayload { id: "A".to_string() }),
        vec![
            Effect::CopyToClipboard { text: "prompt: A".to_string() },
            Effect::Toast { message: "Prompt copied!".to_string() },
        ]
    );
    assert!(gallery.dispatch(Command::OpenDetail { id: "missing".to_string() }).is_empty());

    match &gallery.dispatch(Command::PickRandom { roll: 0.99 })[..] {
        [Effect::ShowDetail { view }] => assert_eq!(view.id, "B"),
        other => panic!("unexpected effects {:?}", other),
    }
    match &gallery.dispatch(Command::PickRandom { roll: 0.0 })[..] {
        [Effect::ShowDetail { view }] => assert_eq!(view.id, "A"),
        other => panic!("unexpected effects {:?}", other),
    }
}

#[test]
fn test_json_load_and_commands() {
    let mut gallery = GalleryController::new(GalleryConfig::default(), Box::new(MemoryStore::new()));
    assert_eq!(gallery.dispatch(Command::RetryLoad), vec![Effect::LoadStarted]);

    let json = r#"[
        {"id": "k1", "number": 4, "name": "Kite", "img": "k1.png",
         "scores": {"Legibility": 9, "Hierarchy": 9, "Consistency": 9, "Atmosphere": 9, "Theme Fit": 9}, "total": 45},
        {"id": "k2", "number": 2, "name": "Koi", "img": "k2.png", "scores": {}, "total": 0}
    ]"#;
    let effects = gallery.finish_load(ItemStore::from_json(json));
    assert_eq!(card_ids(&effects), vec!["k1", "k2"]);

    let effects = gallery
        .dispatch_json(r#"{"type": "set_sort", "mode": "number-asc"}"#)
        .unwrap();
    assert_eq!(card_ids(&effects), vec!["k2", "k1"]);

    let effects = gallery.dispatch_json(r#"{"type": "scroll_to_top"}"#).unwrap();
    assert_eq!(effects, vec![Effect::ScrollToTop]);
}
