//! Shared models for the integration tests.

#![allow(dead_code)]

use muffin_seeding::prelude::*;
use serde_json::Value as JsonValue;

/// A model with a name and a list attribute.
#[derive(Debug, Default)]
pub struct Widget {
	pub name: String,
	pub count: JsonValue,
	pub saves: usize,
	pub deleted: bool,
}

impl Model for Widget {
	fn set_attribute(&mut self, name: &str, value: Value) -> SeedingResult<()> {
		match name {
			"name" => {
				self.name = value
					.as_str()
					.ok_or_else(|| SeedingError::rejected("Widget", name, "expected a string"))?
					.to_string();
			}
			"count" => {
				self.count = value
					.into_data()
					.ok_or_else(|| SeedingError::rejected("Widget", name, "expected data"))?;
			}
			other => return Err(SeedingError::rejected("Widget", other, "unknown attribute")),
		}
		Ok(())
	}

	fn get_attribute(&self, name: &str) -> Option<Value> {
		match name {
			"name" => Some(Value::from(self.name.as_str())),
			"count" => Some(Value::from(self.count.clone())),
			_ => None,
		}
	}
}

impl Persistable for Widget {
	fn save(&mut self) -> anyhow::Result<bool> {
		self.saves += 1;
		Ok(true)
	}

	fn delete(&mut self) -> anyhow::Result<bool> {
		self.deleted = true;
		Ok(true)
	}
}

/// A user whose save and delete outcomes are controlled by attributes.
#[derive(Debug, Default)]
pub struct User {
	pub name: String,
	pub email: String,
	pub reject_save: bool,
	pub reject_delete: bool,
	pub saved: bool,
	pub deleted: bool,
}

impl Model for User {
	fn set_attribute(&mut self, name: &str, value: Value) -> SeedingResult<()> {
		let flag = |value: &Value| value.as_data().and_then(JsonValue::as_bool).unwrap_or(false);
		match name {
			"name" => self.name = value.as_str().unwrap_or_default().to_string(),
			"email" => self.email = value.as_str().unwrap_or_default().to_string(),
			"reject_save" => self.reject_save = flag(&value),
			"reject_delete" => self.reject_delete = flag(&value),
			other => return Err(SeedingError::rejected("User", other, "unknown attribute")),
		}
		Ok(())
	}

	fn get_attribute(&self, name: &str) -> Option<Value> {
		match name {
			"name" => Some(Value::from(self.name.as_str())),
			"email" => Some(Value::from(self.email.as_str())),
			_ => None,
		}
	}

	fn validation_errors(&self) -> Vec<String> {
		if self.reject_save {
			vec!["email has already been taken".to_string()]
		} else {
			Vec::new()
		}
	}
}

impl Persistable for User {
	fn save(&mut self) -> anyhow::Result<bool> {
		self.saved = !self.reject_save;
		Ok(self.saved)
	}

	fn delete(&mut self) -> anyhow::Result<bool> {
		if self.reject_delete {
			anyhow::bail!("user {} is protected", self.name);
		}
		self.deleted = true;
		Ok(true)
	}
}

/// A post that belongs to a user.
#[derive(Debug, Default)]
pub struct Post {
	pub title: String,
	pub author: Option<Instance>,
	pub saved: bool,
}

impl Model for Post {
	fn set_attribute(&mut self, name: &str, value: Value) -> SeedingResult<()> {
		match (name, value) {
			("title", value) => self.title = value.as_str().unwrap_or_default().to_string(),
			("author", Value::Instance(author)) => self.author = Some(author),
			(other, _) => return Err(SeedingError::rejected("Post", other, "unexpected value")),
		}
		Ok(())
	}
}

impl Persistable for Post {
	fn save(&mut self) -> anyhow::Result<bool> {
		self.saved = true;
		Ok(true)
	}

	fn delete(&mut self) -> anyhow::Result<bool> {
		Ok(true)
	}
}

/// A seeded engine with `Widget`, `User` and `Post` registered.
pub fn engine() -> Muffin {
	let muffin = Muffin::with_config(MuffinConfig::new().with_faker_seed(2024))
		.expect("default locale is supported");
	muffin
		.register_model(ModelType::persistable::<Widget>("Widget"))
		.register_model(ModelType::persistable::<User>("User"))
		.register_model(ModelType::persistable::<Post>("Post"));
	muffin
}
