// Shared tuning constants for scene progression and the procedural scenes.

// Frame timing
pub const REFERENCE_FRAME_RATE: f32 = 60.0; // per-frame tuning values were authored at this rate
pub const MAX_FRAME_DT_SEC: f32 = 0.1; // longer gaps (tab switch, debugger) are clamped

// Scene cross-fades
pub const DEFAULT_FADE_MARGIN: f32 = 0.1; // half-width of a cross-fade window in scroll units
pub const OPACITY_LERP_SPEED: f32 = 0.04; // fraction of the gap closed per reference frame
pub const OPACITY_SNAP: f32 = 1e-4; // close enough: snap to target
pub const VISIBILITY_EPSILON: f32 = 0.01; // below this a scene is skipped for update()
pub const INPUT_OPACITY_THRESHOLD: f32 = 0.5; // pointer input only reaches a mostly visible scene

// Camera
pub const DEFAULT_FOV_DEG: f32 = 75.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 500.0;

// Procedural noise
pub const FBM_OCTAVES: usize = 6;
pub const FBM_LACUNARITY: f32 = 2.1;
pub const FBM_GAIN: f32 = 0.5;
pub const WARP_STRENGTH: f32 = 1.6;

// Terrain
pub const TERRAIN_MIN_VISIBLE_FRACTION: f32 = 0.5; // terrain never flattens below half height
pub const TERRAIN_GROWTH_EPSILON: f32 = 0.005; // smaller growth changes do not regenerate
pub const TERRAIN_RESOLUTION: u32 = 96;
pub const TERRAIN_SIZE: f32 = 60.0;

// Particle network
pub const PARTICLE_COUNT: usize = 120;
pub const PARTICLE_HALF_EXTENT: f32 = 8.0;
pub const PARTICLE_MIN_DISTANCE: f32 = 2.6;
pub const PARTICLE_MAX_CONNECTIONS: u32 = 6;
pub const PARTICLE_MAX_SPEED: f32 = 0.02; // world units per reference frame

// Cell colony
pub const CELL_DIVISION_COOLDOWN_SEC: f32 = 3.0;
pub const CELL_DIVISION_DURATION_SEC: f32 = 2.5;
pub const CELL_MAX_GENERATIONS: u32 = 5;
pub const CELL_MAX_ACTIVE: usize = 32;
pub const CELL_SOFT_CEILING: usize = 48; // record count before the sweep prunes inactive cells
pub const CELL_CLEANUP_INTERVAL_SEC: f32 = 5.0;
pub const CELL_RADIUS: f32 = 0.5;

// Ambient audio
pub const AMBIENT_BPM: f32 = 72.0;
pub const AMBIENT_ROOT_MIDI: i32 = 57; // A3
