use realm_engine::world::catalog::{entity_types, object_types};
use realm_engine::{
    render_frame, EngineConfig, GridEngine, GridPos, Lighting, RoomEntity, RoomObject,
    RoomSnapshot, TileId, WorldEvent,
};
use sha2::{Digest, Sha256};

const WIDTH: u32 = 320;
const HEIGHT: u32 = 240;

fn tavern_snapshot() -> RoomSnapshot {
    let mut snapshot = RoomSnapshot::filled(12, 9, TileId::FLOOR_WOOD);
    for x in 0..12 {
        snapshot.tiles[0][x] = TileId::WALL_WOOD;
        snapshot.tiles[8][x] = TileId::WALL_WOOD;
    }
    snapshot.tiles[4][6] = TileId::WATER_SHALLOW;
    snapshot.tiles[5][2] = TileId::STAIRS_DOWN;
    snapshot.tiles[2][9] = TileId::DOOR_CLOSED;
    snapshot.lighting = Lighting::Dim;
    snapshot.ambience = "tavern".to_string();
    snapshot.player_spawn = Some(GridPos::new(3, 3));

    let mut keeper = RoomEntity::new("keeper", entity_types::MERCHANT, GridPos::new(5, 2));
    keeper.name = "Keeper".to_string();
    snapshot.entities.push(keeper);
    let mut rat = RoomEntity::new("rat", entity_types::GIANT_RAT, GridPos::new(7, 5));
    rat.hostile = true;
    rat.hp = Some(6);
    rat.max_hp = Some(6);
    snapshot.entities.push(rat);

    snapshot.objects.push(RoomObject::new(
        "hearth",
        object_types::CAMPFIRE,
        GridPos::new(1, 6),
    ));
    let mut chest = RoomObject::new("chest", object_types::CHEST_CLOSED, GridPos::new(10, 6));
    chest.interactable = true;
    snapshot.objects.push(chest);
    snapshot
}

fn engine_after_script() -> GridEngine {
    let mut engine = GridEngine::new(EngineConfig {
        viewport_width: WIDTH,
        viewport_height: HEIGHT,
        ..EngineConfig::default()
    });
    engine.load_room(tavern_snapshot());
    let script = [
        r#"{"type":"combat_effect","payload":{"attackerId":"player","targetId":"rat","effectType":"stab","damage":2,"isCritical":true}}"#,
        r#"{"type":"update_tile","payload":{"x":9,"y":2,"newTile":31}}"#,
        r##"{"type":"camera_effect","payload":{"effectType":"flash","color":"#ffeeaa"}}"##,
    ];
    for line in script {
        engine.process_event(WorldEvent::from_json(line).expect("script event"));
    }
    for _ in 0..6 {
        engine.tick(1.0 / 60.0);
    }
    engine
}

fn digest(frame: &[u8]) -> Vec<u8> {
    Sha256::digest(frame).to_vec()
}

#[test]
fn same_state_paints_identical_bytes() {
    let engine = engine_after_script();
    let first = render_frame(&engine, WIDTH, HEIGHT);
    let second = render_frame(&engine, WIDTH, HEIGHT);
    assert_eq!(digest(&first), digest(&second));
}

#[test]
fn independent_engines_with_same_inputs_agree() {
    let a = render_frame(&engine_after_script(), WIDTH, HEIGHT);
    let b = render_frame(&engine_after_script(), WIDTH, HEIGHT);
    assert_eq!(a.len(), (WIDTH * HEIGHT * 4) as usize);
    assert_eq!(digest(&a), digest(&b));
}

#[test]
fn frame_is_not_a_flat_fill() {
    let frame = render_frame(&engine_after_script(), WIDTH, HEIGHT);
    let first = &frame[..4];
    assert!(frame.chunks_exact(4).any(|px| px != first));
    assert!(frame.chunks_exact(4).all(|px| px[3] == 0xff));
}

#[test]
fn tile_edit_changes_the_frame() {
    let engine = engine_after_script();
    let before = digest(&render_frame(&engine, WIDTH, HEIGHT));

    let mut edited = engine_after_script();
    edited.process_event(
        WorldEvent::from_json(r#"{"type":"update_tile","payload":{"x":3,"y":4,"newTile":22}}"#)
            .expect("update event"),
    );
    let after = digest(&render_frame(&edited, WIDTH, HEIGHT));
    assert_ne!(before, after);
}
