//! A level's worth of assets driven through `Context`, the way a game uses it.

use nflib::background::BgType;
use nflib::sound::SampleFormat;
use nflib::{Config, Context, Layer, MemorySource, SamplePlayer, Screen, VideoHardware};

#[derive(Default)]
struct Video {
    copies: Vec<(u32, Vec<u8>)>,
    scroll: Vec<(u16, u16)>,
    dispcnt: [u32; 2],
    affine: Vec<(u8, i32, u16, u16)>,
}

impl VideoHardware for Video {
    fn set_bg_scroll(&mut self, _screen: Screen, _layer: Layer, hofs: u16, vofs: u16) {
        self.scroll.push((hofs, vofs));
    }

    fn set_display_control(&mut self, screen: Screen, bits: u32) {
        self.dispcnt[screen.index()] = bits;
    }

    fn copy_to_vram(&mut self, dest: u32, src: &[u8]) {
        self.copies.push((dest, src.to_vec()));
    }

    fn set_sprite_affine(&mut self, _screen: Screen, group: u8, angle: i32, sx: u16, sy: u16) {
        self.affine.push((group, angle, sx, sy));
    }
}

#[derive(Default)]
struct Mixer {
    played: Vec<(usize, u16, bool)>,
}

impl SamplePlayer for Mixer {
    fn play(
        &mut self,
        sample: &[u8],
        _format: SampleFormat,
        freq: u16,
        _volume: u8,
        _pan: u8,
        looping: bool,
        _loop_from: u16,
    ) -> u8 {
        self.played.push((sample.len(), freq, looping));
        7
    }
}

/// 1024x512 map: 4x2 blocks, every byte of a block holds the block number.
fn level_map() -> Vec<u8> {
    (0..8u8).flat_map(|block| std::iter::repeat(block).take(2048)).collect()
}

fn assets() -> MemorySource {
    let mut src = MemorySource::new();

    // 16x8 collision background: tile 0 empty, tile 1 solid
    src.insert("nitrofiles/level/ground.cmp", vec![0, 0, 0, 0, 0, 0, 1, 0]);
    let mut masks = vec![0u8; 64];
    masks.extend(std::iter::repeat(1u8).take(64));
    src.insert("nitrofiles/level/ground.dat", masks);

    src.insert("nitrofiles/level/sky.map", level_map());
    src.insert("nitrofiles/sfx/coin.raw", vec![0x80u8; 4000]);

    // 32x32 sprite, 3 frames
    let frames: Vec<u8> = (0..3u8).flat_map(|f| std::iter::repeat(f).take(1024)).collect();
    src.insert("nitrofiles/sprite/coin.img", frames);
    src
}

#[test]
fn play_through_a_level() {
    let mut src = assets();
    let mut video = Video::default();
    let mut mixer = Mixer::default();
    let mut nf = Context::new(Config::default());
    nf.init();

    nf.display.set_2d(&mut video, Screen::Top, 0);
    nf.display.show_bg(&mut video, Screen::Top, Layer::new(3).unwrap());
    assert_eq!(video.dispcnt[0], 0x1_0000 | 1 << 11);

    // collision
    nf.collision
        .load_collision_bg(&mut src, &nf.config, 0, "level/ground", 16, 8)
        .unwrap();
    assert_eq!(nf.collision.get_point(0, 12, 3), Ok(1));
    assert_eq!(nf.collision.get_point(0, 3, 3), Ok(0));
    assert_eq!(nf.collision.get_point(0, -1, 3), Ok(0));
    assert_eq!(nf.collision.get_tile(0, 8, 0), Ok(1));

    // background
    let bg = Layer::new(3).unwrap();
    nf.backgrounds
        .load_tiled_bg_map(&mut src, &nf.config, 2, "level/sky", 1024, 512)
        .unwrap();
    nf.backgrounds.create_tiled_bg(&mut video, Screen::Top, bg, 2, 8).unwrap();
    assert_eq!(nf.backgrounds.layer(Screen::Top, bg).bg_type, BgType::Both);
    video.copies.clear();

    let scroll = nf.backgrounds.scroll_bg(&mut video, Screen::Top, bg, 300, 0).unwrap();
    assert!(scroll.swapped);
    assert_eq!((scroll.hofs, scroll.vofs), (44, 0));
    assert_eq!(video.copies.len(), 2);
    assert_eq!(video.copies[0].0, 0x0600_0000 + (8 << 11));
    assert_eq!(video.copies[0].1[0], 1);
    assert_eq!(video.copies[0].1[2048], 2);
    assert_eq!(video.copies[1].1[0], 5);

    let scroll = nf.backgrounds.scroll_bg(&mut video, Screen::Top, bg, 310, 0).unwrap();
    assert!(!scroll.swapped);
    assert_eq!(video.copies.len(), 2);
    assert_eq!(video.scroll.last(), Some(&(54, 0)));

    // sound
    nf.sound
        .load_raw_sound(&mut src, &nf.config, 1, "sfx/coin", 11025, SampleFormat::Pcm8)
        .unwrap();
    assert_eq!(nf.sound.play_raw_sound(&mut mixer, 1, 127, 64, false, 0), Ok(7));
    assert_eq!(mixer.played, vec![(4000, 11025, false)]);

    // sprite
    nf.sprites
        .load_sprite_gfx(&mut src, &nf.config, 0, "sprite/coin", 32, 32)
        .unwrap();
    nf.sprites.vram_sprite_gfx(&mut video, Screen::Top, 0, 0, true).unwrap();
    nf.sprites.create_sprite(Screen::Top, 0, 0, 100, 80).unwrap();
    video.copies.clear();

    nf.sprites.set_frame(&mut video, Screen::Top, 0, 2).unwrap();
    assert_eq!(video.copies.len(), 1);
    assert!(video.copies[0].1.iter().all(|&b| b == 2));
    assert_eq!(nf.sprites.set_frame(&mut video, Screen::Top, 0, 3).unwrap_err().code(), 106);

    nf.sprites.enable_rotation(Screen::Top, 0, 4, false).unwrap();
    nf.sprites
        .set_rotation_scale(&mut video, Screen::Top, 4, 600, 256, 256)
        .unwrap();
    assert_eq!(video.affine, vec![(4, -88 * 64, 256, 256)]);

    // everything goes away on reset
    nf.reset();
    assert!(!nf.collision.is_in_use(0));
    assert!(!nf.sound.is_in_use(1));
    assert_eq!(nf.backgrounds.map(2).unwrap_err().code(), 110);
    assert_eq!(nf.sprites.vram_free(Screen::Top), 128 * 1024);
}

#[test]
fn missing_assets_leave_slots_free() {
    let mut src = assets();
    let mut nf = Context::default();

    // .dat present but .cmp missing
    src.remove("nitrofiles/level/ground.cmp");
    let err = nf
        .collision
        .load_collision_bg(&mut src, &nf.config, 0, "level/ground", 16, 8)
        .unwrap_err();
    assert_eq!(err.code(), 101);
    assert!(!nf.collision.is_in_use(0));

    let mut nf2 = Context::new(Config::with_root_folder("assets").unwrap());
    let err = nf2
        .sound
        .load_raw_sound(&mut src, &nf2.config, 0, "sfx/coin", 8000, SampleFormat::Pcm8)
        .unwrap_err();
    assert_eq!(err.to_string(), "file assets/sfx/coin.raw not found");
}
