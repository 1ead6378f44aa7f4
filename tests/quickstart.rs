//! Smoke tests through the facade crate.

use muffin::prelude::*;
use rstest::rstest;

#[derive(Debug, Default)]
struct Account {
	owner: String,
	balance: i64,
	persisted: bool,
}

impl Model for Account {
	fn set_attribute(&mut self, name: &str, value: Value) -> SeedingResult<()> {
		match name {
			"owner" => self.owner = value.as_str().unwrap_or_default().to_string(),
			"balance" => {
				self.balance = value
					.as_data()
					.and_then(|data| data.as_i64())
					.ok_or_else(|| SeedingError::rejected("Account", name, "expected an integer"))?;
			}
			other => return Err(SeedingError::rejected("Account", other, "unknown attribute")),
		}
		Ok(())
	}
}

impl Persistable for Account {
	fn save(&mut self) -> anyhow::Result<bool> {
		self.persisted = true;
		Ok(true)
	}

	fn delete(&mut self) -> anyhow::Result<bool> {
		self.persisted = false;
		Ok(true)
	}
}

fn engine() -> Muffin {
	let muffin = Muffin::with_config(MuffinConfig::new().with_faker_seed(7)).unwrap();
	muffin.register_model(ModelType::persistable::<Account>("Account"));
	muffin
		.define(
			"Account",
			Attributes::new()
				.kind("owner", "name")
				.kind("balance", "numberBetween|0|500"),
		)
		.unwrap();
	muffin
}

#[rstest]
fn test_create_and_delete_through_facade_crate() {
	let muffin = engine();

	let account = muffin.create("Account", Attributes::new()).unwrap();
	let (owner, balance, persisted) = account
		.with(|a: &Account| (a.owner.clone(), a.balance, a.persisted))
		.unwrap();
	assert!(!owner.is_empty());
	assert!((0..=500).contains(&balance));
	assert!(persisted);

	muffin.delete_saved().unwrap();
	assert_eq!(account.with(|a: &Account| a.persisted), Some(false));
}

#[rstest]
fn test_override_with_literal() {
	let muffin = engine();
	let account = muffin
		.instance("Account", Attributes::new().set("balance", serde_json::json!(-20)))
		.unwrap();
	assert_eq!(account.with(|a: &Account| a.balance), Some(-20));
}
