//! Locale-aware fake data provider.
//!
//! [`Faker`] wraps the `fake` crate behind a seeded RNG. Provider methods are
//! looked up by name in a [`ProviderTable`], so kind descriptors such as
//! `"email"` or `"numberBetween|1|10"` resolve to plain function pointers once,
//! at definition time.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use fake::Fake;
use fake::faker::address::raw::{CityName, CountryName, PostCode, StreetName};
use fake::faker::company::raw::CompanyName;
use fake::faker::internet::raw::{FreeEmail, IPv4, Password, SafeEmail, Username};
use fake::faker::lorem::raw::{Paragraph, Sentence, Word, Words};
use fake::faker::name::raw::{FirstName, LastName, Name};
use fake::faker::phone_number::raw::PhoneNumber;
use fake::locales::{DE_DE, EN, FR_FR, JA_JP, PT_BR, ZH_CN, ZH_TW};
use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use serde_json::{Value as JsonValue, json};

use crate::error::{SeedingError, SeedingResult};

/// Largest count accepted by the counted text methods (`words`, `sentence`,
/// `paragraph`) and by the `password` length.
pub const MAX_COUNT: usize = 1024;

/// Locales with a data set in the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum FakerLocale {
	/// English (default).
	#[default]
	En,
	/// French (France).
	FrFr,
	/// German (Germany).
	DeDe,
	/// Japanese (Japan).
	JaJp,
	/// Portuguese (Brazil).
	PtBr,
	/// Chinese (Simplified).
	ZhCn,
	/// Chinese (Traditional).
	ZhTw,
}

impl FakerLocale {
	/// Parses a locale string such as `"en_US"`, `"fr-FR"` or `"de"`.
	///
	/// Any English region maps to [`FakerLocale::En`].
	///
	/// # Errors
	///
	/// Returns [`SeedingError::UnsupportedLocale`] for unknown locales.
	pub fn parse(locale: &str) -> SeedingResult<Self> {
		let normalized = locale.trim().replace('-', "_").to_lowercase();
		let (language, region) = normalized
			.split_once('_')
			.unwrap_or((normalized.as_str(), ""));

		match (language, region) {
			("en", _) => Ok(Self::En),
			("fr", "" | "fr") => Ok(Self::FrFr),
			("de", "" | "de") => Ok(Self::DeDe),
			("ja", "" | "jp") => Ok(Self::JaJp),
			("pt", "" | "br") => Ok(Self::PtBr),
			("zh", "" | "cn") => Ok(Self::ZhCn),
			("zh", "tw") => Ok(Self::ZhTw),
			_ => Err(SeedingError::UnsupportedLocale(locale.to_string())),
		}
	}

	/// Canonical `language_REGION` code.
	pub fn code(&self) -> &'static str {
		match self {
			Self::En => "en_US",
			Self::FrFr => "fr_FR",
			Self::DeDe => "de_DE",
			Self::JaJp => "ja_JP",
			Self::PtBr => "pt_BR",
			Self::ZhCn => "zh_CN",
			Self::ZhTw => "zh_TW",
		}
	}
}

impl fmt::Display for FakerLocale {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.code())
	}
}

/// Random-data source for one locale.
pub struct Faker {
	locale: FakerLocale,
	rng: StdRng,
}

/// Runs a raw `fake` faker with the locale data set of `$faker`.
macro_rules! localized {
	($faker:expr, $fake:ident $(, $arg:expr)* => $out:ty) => {{
		let faker: &mut Faker = $faker;
		let rng = &mut faker.rng;
		match faker.locale {
			FakerLocale::En => $fake(EN $(, $arg)*).fake_with_rng::<$out, _>(rng),
			FakerLocale::FrFr => $fake(FR_FR $(, $arg)*).fake_with_rng::<$out, _>(rng),
			FakerLocale::DeDe => $fake(DE_DE $(, $arg)*).fake_with_rng::<$out, _>(rng),
			FakerLocale::JaJp => $fake(JA_JP $(, $arg)*).fake_with_rng::<$out, _>(rng),
			FakerLocale::PtBr => $fake(PT_BR $(, $arg)*).fake_with_rng::<$out, _>(rng),
			FakerLocale::ZhCn => $fake(ZH_CN $(, $arg)*).fake_with_rng::<$out, _>(rng),
			FakerLocale::ZhTw => $fake(ZH_TW $(, $arg)*).fake_with_rng::<$out, _>(rng),
		}
	}};
	($faker:expr, $fake:ident $(, $arg:expr)*) => {
		localized!($faker, $fake $(, $arg)* => String)
	};
}

impl Faker {
	/// Creates a provider for `locale`, seeded from entropy unless `seed` is set.
	pub fn new(locale: FakerLocale, seed: Option<u64>) -> Self {
		let rng = match seed {
			Some(seed) => StdRng::seed_from_u64(seed),
			None => StdRng::from_entropy(),
		};
		Self { locale, rng }
	}

	/// The provider's locale.
	pub fn locale(&self) -> FakerLocale {
		self.locale
	}

	/// The provider's random number generator, for custom provider methods.
	pub fn rng(&mut self) -> &mut StdRng {
		&mut self.rng
	}

	/// A full name.
	pub fn name(&mut self) -> String {
		localized!(self, Name)
	}

	/// A single lorem word.
	pub fn word(&mut self) -> String {
		localized!(self, Word)
	}

	/// A safe email address.
	pub fn email(&mut self) -> String {
		localized!(self, SafeEmail)
	}
}

impl fmt::Debug for Faker {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Faker")
			.field("locale", &self.locale)
			.finish_non_exhaustive()
	}
}

/// A provider method: positional string arguments in, JSON value out.
pub type ProviderFn = Arc<dyn Fn(&mut Faker, &[String]) -> SeedingResult<JsonValue> + Send + Sync>;

/// Name to provider-method table.
#[derive(Clone)]
pub struct ProviderTable {
	methods: IndexMap<String, ProviderFn>,
}

impl ProviderTable {
	/// Creates an empty table.
	pub fn empty() -> Self {
		Self {
			methods: IndexMap::new(),
		}
	}

	/// Creates a table with the built-in methods.
	pub fn builtin() -> Self {
		let mut table = Self::empty();
		table
			.insert("name", |f, args| no_args("name", args, || localized!(f, Name)))
			.insert("firstName", |f, args| {
				no_args("firstName", args, || localized!(f, FirstName))
			})
			.insert("lastName", |f, args| {
				no_args("lastName", args, || localized!(f, LastName))
			})
			.insert("userName", |f, args| {
				no_args("userName", args, || localized!(f, Username))
			})
			.insert("email", |f, args| no_args("email", args, || localized!(f, SafeEmail)))
			.insert("safeEmail", |f, args| {
				no_args("safeEmail", args, || localized!(f, SafeEmail))
			})
			.insert("freeEmail", |f, args| {
				no_args("freeEmail", args, || localized!(f, FreeEmail))
			})
			.insert("word", |f, args| no_args("word", args, || localized!(f, Word)))
			.insert("words", |f, args| {
				let count = count_arg("words", args, 3)?;
				Ok(json!(localized!(f, Words, count..count + 1 => Vec<String>)))
			})
			.insert("sentence", |f, args| {
				let count = count_arg("sentence", args, 6)?;
				Ok(json!(localized!(f, Sentence, count..count + 1)))
			})
			.insert("paragraph", |f, args| {
				let count = count_arg("paragraph", args, 3)?;
				Ok(json!(localized!(f, Paragraph, count..count + 1)))
			})
			.insert("city", |f, args| no_args("city", args, || localized!(f, CityName)))
			.insert("streetName", |f, args| {
				no_args("streetName", args, || localized!(f, StreetName))
			})
			.insert("country", |f, args| {
				no_args("country", args, || localized!(f, CountryName))
			})
			.insert("postcode", |f, args| {
				no_args("postcode", args, || localized!(f, PostCode))
			})
			.insert("company", |f, args| {
				no_args("company", args, || localized!(f, CompanyName))
			})
			.insert("phoneNumber", |f, args| {
				no_args("phoneNumber", args, || localized!(f, PhoneNumber))
			})
			.insert("ipv4", |f, args| no_args("ipv4", args, || localized!(f, IPv4)))
			.insert("password", |f, args| {
				let (min, max) = match args {
					[] => (8, 16),
					[min, max] => (
						parse_arg::<usize>("password", min)?,
						bounded("password", parse_arg::<usize>("password", max)?)?,
					),
					_ => return Err(arity("password", "0 or 2", args.len())),
				};
				if min > max {
					return Err(bad_range("password", min, max));
				}
				Ok(json!(localized!(f, Password, min..max + 1)))
			})
			.insert("numberBetween", |f, args| {
				let (min, max) = match args {
					[] => (0, 2_147_483_647),
					[min, max] => (
						parse_arg::<i64>("numberBetween", min)?,
						parse_arg::<i64>("numberBetween", max)?,
					),
					_ => return Err(arity("numberBetween", "0 or 2", args.len())),
				};
				if min > max {
					return Err(bad_range("numberBetween", min, max));
				}
				Ok(json!(f.rng.gen_range(min..=max)))
			})
			.insert("randomDigit", |f, args| {
				ensure_no_args("randomDigit", args)?;
				Ok(json!(f.rng.gen_range(0..=9u8)))
			})
			.insert("randomNumber", |f, args| {
				let digits = count_arg("randomNumber", args, 9)?;
				if digits == 0 || digits > 18 {
					return Err(SeedingError::malformed(
						"randomNumber",
						format!("digits must be between 1 and 18, got {}", digits),
					));
				}
				let upper = 10u64.pow(digits as u32) - 1;
				Ok(json!(f.rng.gen_range(0..=upper)))
			})
			.insert("boolean", |f, args| {
				let chance = match args {
					[] => 50,
					[chance] => parse_arg::<u8>("boolean", chance)?.min(100),
					_ => return Err(arity("boolean", "0 or 1", args.len())),
				};
				Ok(json!(f.rng.gen_range(0..100u8) < chance))
			})
			.insert("randomElement", |f, args| {
				if args.is_empty() {
					return Err(arity("randomElement", "at least 1", 0));
				}
				let index = f.rng.gen_range(0..args.len());
				Ok(json!(args[index]))
			})
			.insert("uuid", |f, args| {
				ensure_no_args("uuid", args)?;
				let mut bytes = [0u8; 16];
				f.rng.fill_bytes(&mut bytes);
				Ok(json!(uuid::Builder::from_random_bytes(bytes).into_uuid().to_string()))
			})
			.insert("dateTime", |f, args| {
				ensure_no_args("dateTime", args)?;
				let seconds = f.rng.gen_range(0..=Utc::now().timestamp());
				let moment = DateTime::<Utc>::from_timestamp(seconds, 0).unwrap_or_default();
				Ok(json!(moment.to_rfc3339()))
			});
		table
	}

	/// Registers or replaces a method.
	pub fn insert<F>(&mut self, name: impl Into<String>, method: F) -> &mut Self
	where
		F: Fn(&mut Faker, &[String]) -> SeedingResult<JsonValue> + Send + Sync + 'static,
	{
		self.methods.insert(name.into(), Arc::new(method));
		self
	}

	/// Returns true if a method of that name exists.
	pub fn contains(&self, name: &str) -> bool {
		self.methods.contains_key(name)
	}

	/// Looks up a method by name.
	pub fn get(&self, name: &str) -> Option<ProviderFn> {
		self.methods.get(name).cloned()
	}

	/// Registered method names, in registration order.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.methods.keys().map(String::as_str)
	}

	/// Calls a method by name.
	///
	/// # Errors
	///
	/// Returns [`SeedingError::UnknownGenerator`] if the method is not
	/// registered, or whatever the method itself reports.
	pub fn call(&self, faker: &mut Faker, name: &str, args: &[String]) -> SeedingResult<JsonValue> {
		let method = self
			.get(name)
			.ok_or_else(|| SeedingError::UnknownGenerator(name.to_string()))?;
		method(faker, args)
	}
}

impl Default for ProviderTable {
	fn default() -> Self {
		Self::builtin()
	}
}

impl fmt::Debug for ProviderTable {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(self.methods.keys()).finish()
	}
}

fn no_args(
	method: &str,
	args: &[String],
	generate: impl FnOnce() -> String,
) -> SeedingResult<JsonValue> {
	ensure_no_args(method, args)?;
	Ok(JsonValue::String(generate()))
}

fn ensure_no_args(method: &str, args: &[String]) -> SeedingResult<()> {
	if args.is_empty() {
		Ok(())
	} else {
		Err(arity(method, "0", args.len()))
	}
}

fn count_arg(method: &str, args: &[String], default: usize) -> SeedingResult<usize> {
	match args {
		[] => Ok(default),
		[count] => bounded(method, parse_arg(method, count)?),
		_ => Err(arity(method, "0 or 1", args.len())),
	}
}

fn bounded(method: &str, count: usize) -> SeedingResult<usize> {
	if count > MAX_COUNT {
		return Err(SeedingError::malformed(
			method,
			format!("count must be at most {}, got {}", MAX_COUNT, count),
		));
	}
	Ok(count)
}

fn parse_arg<T: std::str::FromStr>(method: &str, arg: &str) -> SeedingResult<T> {
	arg.trim().parse().map_err(|_| {
		SeedingError::malformed(method, format!("invalid argument '{}'", arg))
	})
}

fn arity(method: &str, expected: &str, got: usize) -> SeedingError {
	SeedingError::malformed(
		method,
		format!("expected {} argument(s), got {}", expected, got),
	)
}

fn bad_range<T: fmt::Display>(method: &str, min: T, max: T) -> SeedingError {
	SeedingError::malformed(method, format!("empty range {}..={}", min, max))
}
