use json::JsonValue;

use crate::figure::FigureConfig;

use super::json::{JsonObject, JsonResult};
use super::scene::{SceneParseError, SceneParseResult};

/// Reads a [`FigureConfig`] from JSON. Every key is optional and falls back to the default.
///
/// ```json
/// { "rotationStep": 1.0, "swingAmplitude": 90, "shoulderOffset": [0, -4.25, 0],
///   "shoulderAnchor": [6, 30, 0], "armScale": [1, 8.5, 1], "armDrop": -4.25,
///   "teapotOrbit": [30, 25, 0] }
/// ```
pub fn parse_figure_config(text: &str) -> SceneParseResult<FigureConfig> {
	let value = json::parse(text).map_err(|e| SceneParseError::InvalidJson(e.to_string()))?;
	Ok(deserialize_figure_config(&value)?)
}

fn deserialize_figure_config(value: &JsonValue) -> JsonResult<FigureConfig> {
	let obj = JsonObject::from_value(value, "root")?;
	let default = FigureConfig::default();

	Ok(FigureConfig {
		rotation_step: obj.get_opt("rotationStep", JsonObject::get_f32)?.unwrap_or(default.rotation_step),
		swing_amplitude: obj.get_opt("swingAmplitude", JsonObject::get_f32)?.unwrap_or(default.swing_amplitude),
		shoulder_offset: obj.get_opt("shoulderOffset", JsonObject::get_vec3)?.unwrap_or(default.shoulder_offset),
		shoulder_anchor: obj.get_opt("shoulderAnchor", JsonObject::get_vec3)?.unwrap_or(default.shoulder_anchor),
		arm_scale: obj.get_opt("armScale", JsonObject::get_vec3)?.unwrap_or(default.arm_scale),
		arm_drop: obj.get_opt("armDrop", JsonObject::get_f32)?.unwrap_or(default.arm_drop),
		teapot_orbit: obj.get_opt("teapotOrbit", JsonObject::get_vec3)?.unwrap_or(default.teapot_orbit),
	})
}
