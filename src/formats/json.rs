//! Thin typed accessors over `json::JsonValue`, with key paths in errors.

use glam::{Vec3, Vec4};
use json::JsonValue;

pub type JsonResult<T> = Result<T, JsonError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum JsonError {
	#[error("Key {0:?} does not exist")]
	KeyDoesNotExist(String),
	#[error("Value at {0:?} is not an object")]
	ValueIsNotObject(String),
	#[error("Value at {0:?} is not a list")]
	ValueIsNotList(String),
	#[error("Value at {0:?} is not a string")]
	ValueIsNotString(String),
	#[error("Value at {0:?} is not a number")]
	ValueIsNotNumber(String),
	#[error("Error while parsing int at {0:?}\n  - number out of scope")]
	ParseIntError(String),
	#[error("Error while parsing vector at {key:?}\n  - {msg}")]
	ParseVecError { key: String, msg: String },
	#[error("Error in list at index {index}\n  - {inner}")]
	ErrorInList { index: usize, inner: Box<JsonError> },
	#[error("Error in object at {key:?}\n  - {inner}")]
	ErrorInObject { key: String, inner: Box<JsonError> },
}

impl JsonError {
	pub fn nested(self, key: &str) -> Self {
		Self::ErrorInObject {
			key: key.to_owned(),
			inner: Box::new(self),
		}
	}

	pub fn in_list(self, index: usize) -> Self {
		Self::ErrorInList {
			index,
			inner: Box::new(self),
		}
	}
}

pub struct JsonObject<'a>(pub &'a json::object::Object);

impl<'a> JsonObject<'a> {
	pub fn from_value(value: &'a JsonValue, key: &str) -> JsonResult<Self> {
		match value {
			JsonValue::Object(obj) => Ok(JsonObject(obj)),
			_ => Err(JsonError::ValueIsNotObject(key.to_owned())),
		}
	}

	fn get(&self, key: &str) -> JsonResult<&'a JsonValue> {
		match self.0.get(key) {
			Some(value) => Ok(value),
			None => Err(JsonError::KeyDoesNotExist(key.to_owned())),
		}
	}

	pub fn has(&self, key: &str) -> bool {
		self.0.get(key).is_some_and(|val| !val.is_null())
	}

	/// `None` when the key is absent or null, otherwise whatever `getter` makes of it.
	pub fn get_opt<T>(&self, key: &str, getter: impl FnOnce(&Self, &str) -> JsonResult<T>) -> JsonResult<Option<T>> {
		if self.has(key) {
			getter(self, key).map(Some)
		} else {
			Ok(None)
		}
	}

	pub fn get_object(&self, key: &str) -> JsonResult<JsonObject<'a>> {
		Self::from_value(self.get(key)?, key)
	}

	pub fn get_list(&self, key: &str) -> JsonResult<&'a [JsonValue]> {
		match self.get(key)? {
			JsonValue::Array(arr) => Ok(arr),
			_ => Err(JsonError::ValueIsNotList(key.to_owned())),
		}
	}

	pub fn get_str(&self, key: &str) -> JsonResult<&'a str> {
		match self.get(key)?.as_str() {
			Some(val) => Ok(val),
			None => Err(JsonError::ValueIsNotString(key.to_owned())),
		}
	}

	fn get_number(&self, key: &str) -> JsonResult<json::number::Number> {
		match self.get(key)?.as_number() {
			Some(val) => Ok(val),
			None => Err(JsonError::ValueIsNotNumber(key.to_owned())),
		}
	}

	pub fn get_f32(&self, key: &str) -> JsonResult<f32> {
		Ok(self.get_number(key)?.into())
	}

	pub fn get_u32(&self, key: &str) -> JsonResult<u32> {
		self.get_number(key)?
			.try_into()
			.map_err(|_| JsonError::ParseIntError(key.to_owned()))
	}

	fn get_floats<const N: usize>(&self, key: &str) -> JsonResult<[f32; N]> {
		let list = self.get_list(key)?;
		if list.len() != N {
			return Err(JsonError::ParseVecError {
				key: key.to_owned(),
				msg: format!("expected list of length {N}, but has length {}", list.len()),
			});
		}

		let mut floats = [0.0; N];
		for (float, val) in floats.iter_mut().zip(list) {
			*float = match val.as_number() {
				Some(val) => val.into(),
				None => {
					return Err(JsonError::ParseVecError {
						key: key.to_owned(),
						msg: "expected float, but did not get a number".to_owned(),
					})
				}
			};
		}
		Ok(floats)
	}

	pub fn get_vec3(&self, key: &str) -> JsonResult<Vec3> {
		self.get_floats::<3>(key).map(Vec3::from_array)
	}

	pub fn get_vec4(&self, key: &str) -> JsonResult<Vec4> {
		self.get_floats::<4>(key).map(Vec4::from_array)
	}
}
