// Front-end tuning constants. Engine behaviour (fades, camera, scene
// parameters) lives in `scrollscape_core::constants`.

// DOM
pub const CANVAS_ID: &str = "app-canvas";
pub const START_OVERLAY_ID: &str = "start-overlay";
pub const START_BUTTON_ID: &str = "overlay-ok";
pub const ERROR_OVERLAY_ID: &str = "error-overlay";
pub const ERROR_MESSAGE_ID: &str = "error-message";
pub const ERROR_RETRY_ID: &str = "error-retry";

// Assets
pub const TERRAIN_SCENE: &str = "terrain";
pub const TERRAIN_MESH_ATTR: &str = "data-terrain-mesh"; // optional OBJ replacing the procedural surface

// Renderer
pub const CLEAR_COLOR: [f64; 3] = [0.012, 0.016, 0.035];
pub const LIGHT_DIR: [f32; 3] = [0.35, 0.85, 0.4]; // towards the light, normalised at use
pub const AMBIENT_LIGHT: f32 = 0.28; // lambert floor so unlit faces stay readable
pub const DIFFUSE_LIGHT: f32 = 0.72;
pub const INITIAL_VERTEX_CAPACITY: usize = 16 * 1024;

// Audio
pub const MASTER_GAIN: f32 = 0.3;
pub const REVERB_SECONDS: f32 = 4.0;
pub const REVERB_DECAY_SEC: f32 = 2.5;
pub const REVERB_WET: f32 = 0.55;
pub const DELAY_TIME_SEC: f32 = 0.42;
pub const DELAY_FEEDBACK: f32 = 0.45;
pub const DELAY_WET: f32 = 0.35;
pub const DELAY_TONE_HZ: f32 = 1600.0;
pub const VOICE_LEVEL: f32 = 0.7;
pub const REVERB_SEND: f32 = 0.6;
pub const DELAY_SEND: f32 = 0.3;
pub const TONE_LEAD_SEC: f64 = 0.01; // schedule slightly ahead of currentTime
pub const TONE_ATTACK_SEC: f64 = 0.04;
pub const TONE_STOP_PAD_SEC: f64 = 0.05;
