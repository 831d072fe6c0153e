//! Fixed type tables for tiles, entities and objects: base colors, object
//! categories and light emitters.

use super::grid::TileId;

pub mod entity_types {
    pub const PLAYER_WARRIOR: u16 = 100;
    pub const PLAYER_MAGE: u16 = 101;
    pub const PLAYER_ROGUE: u16 = 102;
    pub const PLAYER_RANGER: u16 = 103;
    pub const PLAYER_CLERIC: u16 = 104;
    pub const GOBLIN: u16 = 110;
    pub const GOBLIN_ARCHER: u16 = 111;
    pub const GOBLIN_SHAMAN: u16 = 112;
    pub const ORC: u16 = 115;
    pub const ORC_BERSERKER: u16 = 116;
    pub const ORC_CHIEF: u16 = 117;
    pub const SKELETON: u16 = 120;
    pub const SKELETON_WARRIOR: u16 = 121;
    pub const SKELETON_MAGE: u16 = 122;
    pub const ZOMBIE: u16 = 125;
    pub const ZOMBIE_HULK: u16 = 126;
    pub const GHOST: u16 = 127;
    pub const RAT: u16 = 130;
    pub const GIANT_RAT: u16 = 131;
    pub const SPIDER: u16 = 132;
    pub const GIANT_SPIDER: u16 = 133;
    pub const BAT: u16 = 134;
    pub const WOLF: u16 = 135;
    pub const VILLAGER: u16 = 140;
    pub const MERCHANT: u16 = 141;
    pub const GUARD: u16 = 142;
    pub const PRIEST: u16 = 143;
    pub const NOBLE: u16 = 144;
    pub const BOSS_DEMON: u16 = 150;
    pub const BOSS_DRAGON: u16 = 151;
    pub const BOSS_LICH: u16 = 152;
    pub const BOSS_TROLL: u16 = 153;
}

pub mod object_types {
    pub const CHEST_CLOSED: u16 = 200;
    pub const CHEST_OPEN: u16 = 201;
    pub const CHEST_LOCKED: u16 = 202;
    pub const BARREL: u16 = 203;
    pub const CRATE: u16 = 204;
    pub const URN: u16 = 205;
    pub const SACK: u16 = 206;
    pub const TABLE: u16 = 210;
    pub const CHAIR: u16 = 211;
    pub const BED: u16 = 212;
    pub const BOOKSHELF: u16 = 213;
    pub const THRONE: u16 = 214;
    pub const TORCH_WALL: u16 = 220;
    pub const TORCH_GROUND: u16 = 221;
    pub const CAMPFIRE: u16 = 222;
    pub const BRAZIER: u16 = 223;
    pub const LANTERN: u16 = 224;
    pub const CRYSTAL_GLOW: u16 = 225;
    pub const ALTAR: u16 = 230;
    pub const FOUNTAIN: u16 = 231;
    pub const LEVER: u16 = 232;
    pub const PRESSURE_PLATE: u16 = 233;
    pub const STATUE: u16 = 234;
    pub const GOLD_PILE: u16 = 240;
    pub const GEM: u16 = 241;
    pub const POTION: u16 = 242;
    pub const SCROLL: u16 = 243;
    pub const WEAPON_RACK: u16 = 244;
    pub const ARMOR_STAND: u16 = 245;
    pub const TRAP_SPIKE: u16 = 250;
    pub const TRAP_ARROW: u16 = 251;
    pub const TRAP_FIRE: u16 = 252;
    pub const TRAP_PIT: u16 = 253;
}

const UNKNOWN_ENTITY_COLOR: u32 = 0xff00ff;
const UNKNOWN_OBJECT_COLOR: u32 = 0x888888;
const UNKNOWN_TILE_COLOR: u32 = 0x000000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectCategory {
    Container,
    Furniture,
    Light,
    Feature,
    Loot,
    Trap,
    Other,
}

pub fn object_category(type_id: u16) -> ObjectCategory {
    match type_id {
        200..=206 => ObjectCategory::Container,
        210..=214 => ObjectCategory::Furniture,
        220..=225 => ObjectCategory::Light,
        230..=234 => ObjectCategory::Feature,
        240..=245 => ObjectCategory::Loot,
        250..=253 => ObjectCategory::Trap,
        _ => ObjectCategory::Other,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightProfile {
    pub radius: f32,
    pub color: u32,
}

pub fn light_profile(object_type: u16) -> Option<LightProfile> {
    use object_types::*;

    let (radius, color) = match object_type {
        TORCH_WALL | TORCH_GROUND => (4.0, 0xff9933),
        CAMPFIRE | BRAZIER => (5.0, 0xff9933),
        LANTERN => (3.0, 0xffcc66),
        CRYSTAL_GLOW => (6.0, 0x66ccff),
        _ => return None,
    };
    Some(LightProfile { radius, color })
}

pub fn tile_color(tile: TileId) -> u32 {
    match tile.0 {
        0 => 0x000000,
        1 => 0x4a4a5a,
        2 => 0x8b5a2b,
        3 => 0x5c4033,
        4 => 0x3d6b3d,
        5 => 0xc2b280,
        6 => 0x606060,
        10 => 0x2d2d3a,
        11 => 0x6b4423,
        12 => 0x3d3d4a,
        13 => 0x654321,
        20 => 0x4a90d9,
        21 => 0x1e4d7b,
        22 => 0xff4500,
        23 => 0xadd8e6,
        30 => 0x8b4513,
        31 => 0x654321,
        32 => 0x5c3a21,
        33 => 0x4a4a4a,
        34 => 0x3a3a3a,
        40 => 0x3a3a4a,
        41 => 0x5a5a6a,
        42 => 0x1a1a1a,
        43 => 0x8b5a2b,
        44 => 0x7a6a4a,
        _ => UNKNOWN_TILE_COLOR,
    }
}

pub fn entity_color(type_id: u16) -> u32 {
    use entity_types::*;

    match type_id {
        PLAYER_WARRIOR => 0x55ffff,
        PLAYER_MAGE => 0x9955ff,
        PLAYER_ROGUE => 0x55ff55,
        PLAYER_RANGER => 0x55aa55,
        PLAYER_CLERIC => 0xffff55,
        GOBLIN => 0x55aa55,
        GOBLIN_ARCHER => 0x44aa44,
        GOBLIN_SHAMAN => 0x66bb66,
        ORC => 0x886644,
        ORC_BERSERKER => 0xaa5544,
        ORC_CHIEF => 0xbb6655,
        SKELETON => 0xcccccc,
        SKELETON_WARRIOR => 0xaaaaaa,
        SKELETON_MAGE => 0xddddff,
        ZOMBIE => 0x668866,
        ZOMBIE_HULK => 0x557755,
        GHOST => 0xaaccff,
        RAT => 0x886666,
        GIANT_RAT => 0x775555,
        SPIDER => 0x333333,
        GIANT_SPIDER => 0x222222,
        BAT => 0x554444,
        WOLF => 0x777777,
        VILLAGER => 0xffaa77,
        MERCHANT => 0xffdd55,
        GUARD => 0x5577ff,
        PRIEST => 0xffffaa,
        NOBLE => 0xaa55aa,
        BOSS_DEMON => 0xff3333,
        BOSS_DRAGON => 0xff5500,
        BOSS_LICH => 0x9933ff,
        BOSS_TROLL => 0x557755,
        _ => UNKNOWN_ENTITY_COLOR,
    }
}

pub fn object_color(type_id: u16) -> u32 {
    use object_types::*;

    match type_id {
        CHEST_CLOSED => 0xc9a227,
        CHEST_OPEN => 0xa08020,
        CHEST_LOCKED => 0x8b7020,
        BARREL => 0x8b4513,
        CRATE => 0x9b5523,
        URN => 0xaaaaaa,
        SACK => 0xb8860b,
        TABLE => 0x8b5a2b,
        CHAIR => 0x7b4a1b,
        BED => 0x8b0000,
        BOOKSHELF => 0x654321,
        THRONE => 0xffd700,
        TORCH_WALL => 0xff9933,
        TORCH_GROUND => 0xff8822,
        CAMPFIRE => 0xff6600,
        BRAZIER => 0xff7744,
        LANTERN => 0xffcc00,
        CRYSTAL_GLOW => 0x66ccff,
        ALTAR => 0x888899,
        FOUNTAIN => 0x5599ff,
        LEVER => 0x666666,
        PRESSURE_PLATE => 0x555555,
        STATUE => 0x999999,
        GOLD_PILE => 0xffd700,
        GEM => 0xff55ff,
        POTION => 0xff5555,
        SCROLL => 0xffffcc,
        WEAPON_RACK => 0x666677,
        ARMOR_STAND => 0x777788,
        TRAP_SPIKE => 0x444444,
        TRAP_ARROW => 0x555555,
        TRAP_FIRE => 0xff4400,
        TRAP_PIT => 0x222222,
        _ => UNKNOWN_OBJECT_COLOR,
    }
}

/// Parses `#rrggbb` or `rrggbb`.
pub fn parse_hex_color(raw: &str) -> Option<u32> {
    let digits = raw.trim().trim_start_matches('#');
    if digits.len() != 6 {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_profiles_cover_every_light_object() {
        for type_id in 220..=225 {
            assert_eq!(object_category(type_id), ObjectCategory::Light);
            assert!(light_profile(type_id).is_some());
        }
        assert_eq!(light_profile(object_types::BARREL), None);
        let crystal = light_profile(object_types::CRYSTAL_GLOW).expect("crystal light");
        assert_eq!(crystal.radius, 6.0);
    }

    #[test]
    fn parse_hex_color_accepts_hash_prefix() {
        assert_eq!(parse_hex_color("#ff8800"), Some(0xff8800));
        assert_eq!(parse_hex_color("00ff00"), Some(0x00ff00));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
    }

    #[test]
    fn unknown_types_fall_back_to_placeholder_colors() {
        assert_eq!(entity_color(999), UNKNOWN_ENTITY_COLOR);
        assert_eq!(object_color(999), UNKNOWN_OBJECT_COLOR);
        assert_eq!(tile_color(TileId(999)), UNKNOWN_TILE_COLOR);
    }
}
