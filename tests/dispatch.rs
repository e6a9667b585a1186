use glam::Vec2;
use where_is_everybody::scene::*;

fn library_room(id: &str) -> Room {
    SceneGraph::library().unwrap().room(&RoomId::from(id)).unwrap().clone()
}

fn overlapping() -> SceneGraph {
    SceneGraph::from_json(
        r#"{
            "start": "Study",
            "rooms": [{
                "id": "Study",
                "background": "study",
                "exits": { "north": "Study" },
                "hotspots": [
                    { "name": "first",  "region": { "rect": { "x": 100, "y": 100, "w": 200, "h": 200 } }, "action": { "inspect_shelf": 1 } },
                    { "name": "second", "region": { "rect": { "x": 150, "y": 150, "w": 200, "h": 200 } }, "action": { "inspect_shelf": 2 } },
                    { "name": "under the arrow", "region": { "rect": { "x": 0, "y": 0, "w": 800, "h": 80 } }, "action": "trigger_scare" },
                    { "name": "wedge", "region": { "polygon": [[500, 400], [700, 400], [600, 550]] }, "action": { "inspect_shelf": 3 } }
                ]
            }]
        }"#,
    )
    .unwrap()
}

fn study(graph: &SceneGraph) -> &Room {
    graph.room(&RoomId::from("Study")).unwrap()
}

// ── Library scenarios ────────────────────────────────────────────────────────

#[test]
fn entrance_north_arrow_leads_to_main_hall() {
    let room = library_room("Entrance");
    assert_eq!(dispatch(&room, Vec2::new(400.0, 35.0)), Action::Navigate(RoomId::from("MainHall")));
}

#[test]
fn main_hall_bookcase_inspects_its_shelf() {
    let room = library_room("MainHall");
    assert_eq!(dispatch(&room, Vec2::new(100.0, 200.0)), Action::InspectShelf(0));
    assert_eq!(dispatch(&room, Vec2::new(700.0, 200.0)), Action::InspectShelf(1));
}

#[test]
fn archive_corner_triggers_the_scare() {
    let room = library_room("Archive");
    assert_eq!(dispatch(&room, Vec2::new(600.0, 300.0)), Action::TriggerScare);
}

#[test]
fn click_on_bare_wall_is_a_no_op() {
    let room = library_room("Entrance");
    assert_eq!(dispatch(&room, Vec2::new(20.0, 580.0)), Action::NoOp);
    assert!(hit_test(&room, Vec2::new(20.0, 580.0)).is_none());
}

#[test]
fn clicks_outside_the_scene_hit_nothing() {
    let room = library_room("MainHall");
    assert_eq!(dispatch(&room, Vec2::new(-5.0, 300.0)), Action::NoOp);
    assert_eq!(dispatch(&room, Vec2::new(400.0, 900.0)), Action::NoOp);
}

// ── Ordering ─────────────────────────────────────────────────────────────────

#[test]
fn first_declared_hotspot_wins_an_overlap() {
    let graph = overlapping();
    let room = study(&graph);
    let p = Vec2::new(200.0, 200.0);
    assert_eq!(dispatch(room, p), Action::InspectShelf(1));
    assert_eq!(hit_test(room, p).unwrap().name, "first");
    // Only the second region covers this point.
    assert_eq!(dispatch(room, Vec2::new(320.0, 320.0)), Action::InspectShelf(2));
}

#[test]
fn exit_arrow_wins_over_a_declared_hotspot() {
    let graph = overlapping();
    let room = study(&graph);
    assert_eq!(dispatch(room, Vec2::new(400.0, 30.0)), Action::Navigate(RoomId::from("Study")));
    assert_eq!(dispatch(room, Vec2::new(100.0, 30.0)), Action::TriggerScare);
}

#[test]
fn dispatch_is_deterministic() {
    let graph = overlapping();
    let room = study(&graph);
    for p in [Vec2::new(200.0, 200.0), Vec2::new(600.0, 450.0), Vec2::new(5.0, 590.0)] {
        let first = dispatch(room, p);
        for _ in 0..10 {
            assert_eq!(dispatch(room, p), first);
        }
    }
}

// ── Containment ──────────────────────────────────────────────────────────────

#[test]
fn rect_edges_are_half_open() {
    let graph = overlapping();
    let room = study(&graph);
    // (100,100) is the first rect's top-left corner, (300,y) its right edge.
    assert_eq!(dispatch(room, Vec2::new(100.0, 100.0)), Action::InspectShelf(1));
    assert_eq!(dispatch(room, Vec2::new(99.9, 120.0)), Action::NoOp);
    assert_eq!(dispatch(room, Vec2::new(300.0, 120.0)), Action::NoOp);
}

#[test]
fn polygon_uses_its_outline_not_its_bounds() {
    let graph = overlapping();
    let room = study(&graph);
    assert_eq!(dispatch(room, Vec2::new(600.0, 450.0)), Action::InspectShelf(3));
    // Inside the bounding box, outside the triangle.
    assert_eq!(dispatch(room, Vec2::new(510.0, 540.0)), Action::NoOp);
}

#[test]
fn polygon_handles_concave_outlines() {
    // A "C" opening to the right.
    let region = Region::Polygon(vec![
        [0.0, 0.0], [30.0, 0.0], [30.0, 10.0], [10.0, 10.0],
        [10.0, 20.0], [30.0, 20.0], [30.0, 30.0], [0.0, 30.0],
    ]);
    assert!(region.contains(Vec2::new(5.0, 15.0)));
    assert!(!region.contains(Vec2::new(20.0, 15.0)));
    assert!(region.contains(Vec2::new(20.0, 5.0)));
}
