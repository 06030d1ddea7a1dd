use crate::background::TiledBackgrounds;
use crate::collision::CollisionMaps;
use crate::config::Config;
use crate::display::Display;
use crate::sound::SoundBank;
use crate::sprite::Sprites;

/// All library state in one place.
///
/// Subsystems are plain fields so they can be borrowed independently, e.g.
/// reading `config` while loading into `collision`.
pub struct Context {
    pub config: Config,
    pub collision: CollisionMaps,
    pub sound: SoundBank,
    pub backgrounds: TiledBackgrounds,
    pub sprites: Sprites,
    pub display: Display,
}

impl Default for Context {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Context {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            collision: CollisionMaps::new(),
            sound: SoundBank::new(),
            backgrounds: TiledBackgrounds::new(),
            sprites: Sprites::new(),
            display: Display::new(),
        }
    }

    /// Mark every slot free without dropping anything. Call once at startup.
    pub fn init(&mut self) {
        self.collision.init();
        self.sound.init();
        self.backgrounds.init();
        self.sprites.init();
    }

    /// Free everything that was loaded and start over.
    pub fn reset(&mut self) {
        self.collision.reset();
        self.sound.reset();
        self.backgrounds.reset();
        self.sprites.reset();
    }
}
