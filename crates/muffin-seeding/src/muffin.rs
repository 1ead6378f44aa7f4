//! The factory engine.
//!
//! A [`Muffin`] owns every piece of state: factory definitions, registered
//! model types, the provider, the saved-object tracker and the set of loaded
//! definition files. Tests that run in parallel should each use their own
//! engine.

use std::path::Path;

use indexmap::IndexMap;
use parking_lot::{Mutex, RwLock};

use crate::attributes;
use crate::config::MuffinConfig;
use crate::definition::{FactoryDefinition, FactoryRegistry, ModelId, ModelTypeRegistry};
use crate::error::{SeedingError, SeedingResult};
use crate::generator::{Attributes, Faker, FakerLocale, GeneratorSpec, ProviderTable};
use crate::lifecycle::Tracker;
use crate::loader::{DefinitionLoader, LoadSummary};
use crate::model::{Instance, Model, ModelType, Record, Value};

#[derive(Debug, Clone, Copy)]
struct Context {
	depth: usize,
	persist: bool,
}

impl Context {
	const BUILD: Self = Self {
		depth: 0,
		persist: false,
	};

	const CREATE: Self = Self {
		depth: 0,
		persist: true,
	};
}

#[derive(Debug)]
struct FakerSlot {
	locale: FakerLocale,
	seed: Option<u64>,
	faker: Option<Faker>,
}

/// Factory engine: defines, builds, saves and tears down model objects.
///
/// # Example
///
/// ```
/// use muffin_seeding::{Attributes, ModelType, Muffin, Record};
///
/// let muffin = Muffin::new();
/// muffin.register_model(ModelType::new::<Record>("Post"));
/// muffin
///     .define("Post", Attributes::new().kind("title", "sentence|3"))
///     .unwrap();
///
/// let post = muffin.instance("Post", Attributes::new()).unwrap();
/// assert!(post.attribute("title").is_some());
/// assert!(!muffin.is_saved(&post));
/// ```
#[derive(Debug)]
pub struct Muffin {
	registry: FactoryRegistry,
	types: ModelTypeRegistry,
	provider: RwLock<ProviderTable>,
	faker: Mutex<FakerSlot>,
	tracker: Tracker,
	loader: DefinitionLoader,
	max_depth: usize,
}

impl Default for Muffin {
	fn default() -> Self {
		let config = MuffinConfig::default();
		Self::build(&config, FakerLocale::default())
	}
}

impl Muffin {
	/// Creates an engine with the default configuration.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates an engine from `config`.
	///
	/// # Errors
	///
	/// Returns [`SeedingError::UnsupportedLocale`] if the configured locale
	/// has no data set.
	pub fn with_config(config: MuffinConfig) -> SeedingResult<Self> {
		let locale = FakerLocale::parse(&config.faker_locale)?;
		Ok(Self::build(&config, locale))
	}

	fn build(config: &MuffinConfig, locale: FakerLocale) -> Self {
		Self {
			registry: FactoryRegistry::new(),
			types: ModelTypeRegistry::new(),
			provider: RwLock::new(ProviderTable::builtin()),
			faker: Mutex::new(FakerSlot {
				locale,
				seed: config.faker_seed,
				faker: None,
			}),
			tracker: Tracker::new(&config.save_method, &config.delete_method),
			loader: DefinitionLoader::new(),
			max_depth: config.max_depth,
		}
	}

	/// Registers an instantiable model type under its bare name.
	pub fn register_model(&self, model_type: ModelType) -> &Self {
		self.types.register(model_type);
		self
	}

	/// Registers the factory definition for `model_id`, replacing any previous
	/// one.
	///
	/// # Errors
	///
	/// Fails with [`SeedingError::UnknownGenerator`] or
	/// [`SeedingError::MalformedDescriptor`] if a kind descriptor does not
	/// parse. Nothing is registered in that case.
	pub fn define(&self, model_id: &str, definition: Attributes) -> SeedingResult<&Self> {
		let definition = {
			let provider = self.provider.read();
			FactoryDefinition::parse(ModelId::parse(model_id), &definition, &provider)?
		};
		self.registry.define(definition);
		Ok(self)
	}

	/// Adds or replaces a provider method usable in kind descriptors.
	///
	/// Definitions registered earlier keep the methods they were parsed with
	/// by name, so replacing a method affects them too.
	pub fn provider_method<F>(&self, name: impl Into<String>, method: F) -> &Self
	where
		F: Fn(&mut Faker, &[String]) -> SeedingResult<serde_json::Value> + Send + Sync + 'static,
	{
		self.provider.write().insert(name, method);
		self
	}

	/// Builds an unsaved object. Nested `factory|` references are built
	/// unsaved as well.
	///
	/// # Errors
	///
	/// - [`SeedingError::ClassNotFound`] if the bare model name is not a
	///   registered type.
	/// - [`SeedingError::NoDefinedFactory`] if nothing is defined under
	///   exactly `model_id`.
	/// - Any generator or assignment error.
	pub fn instance(&self, model_id: &str, overrides: Attributes) -> SeedingResult<Instance> {
		let overrides = self.parse_overrides(&overrides)?;
		let (_, instance) = self.make(&ModelId::parse(model_id), &overrides, Context::BUILD)?;
		Ok(instance)
	}

	/// Builds, tracks and saves an object. Nested `factory|` references are
	/// created and tracked as well.
	///
	/// The object is tracked before its save method runs and stays tracked
	/// whether or not saving succeeds.
	///
	/// # Errors
	///
	/// Everything [`instance`](Self::instance) reports, plus
	/// [`SeedingError::SaveMethodNotFound`], [`SeedingError::SaveFailed`]
	/// and [`SeedingError::ConventionFailed`].
	pub fn create(&self, model_id: &str, overrides: Attributes) -> SeedingResult<Instance> {
		let overrides = self.parse_overrides(&overrides)?;
		self.create_with(&ModelId::parse(model_id), &overrides, Context::CREATE)
	}

	/// Creates `count` objects in order, stopping at the first error.
	///
	/// A count of zero returns an empty list without looking anything up.
	pub fn seed(
		&self,
		count: usize,
		model_id: &str,
		overrides: Attributes,
	) -> SeedingResult<Vec<Instance>> {
		if count == 0 {
			return Ok(Vec::new());
		}

		let model_id = ModelId::parse(model_id);
		let overrides = self.parse_overrides(&overrides)?;
		(0..count)
			.map(|_| self.create_with(&model_id, &overrides, Context::CREATE))
			.collect()
	}

	/// Resolves the attributes `model_id` would receive, without assigning
	/// or saving anything.
	pub fn attributes_for(
		&self,
		model_id: &str,
		overrides: Attributes,
	) -> SeedingResult<IndexMap<String, Value>> {
		let model_id = ModelId::parse(model_id);
		let model_type = self.types.get(model_id.name())?;
		let definition = self.registry.get(model_id.as_str())?;
		let overrides = self.parse_overrides(&overrides)?;
		let specs = attributes::merge(definition.specs(), overrides);

		let object = model_type.construct();
		let target = object.lock();
		attributes::resolve_attributes(&*target, &specs, |spec, target| {
			self.generate(spec, target, Context::BUILD)
		})
	}

	/// Generates one value from a kind descriptor.
	///
	/// `factory|` references are built unsaved.
	pub fn generate_attr(&self, kind: &str) -> SeedingResult<Value> {
		let spec = GeneratorSpec::parse(kind, &self.provider.read())?;
		self.generate(&spec, &Record::default(), Context::BUILD)
	}

	/// Snapshot of every tracked object, in tracking order.
	pub fn saved(&self) -> Vec<Instance> {
		self.tracker.saved()
	}

	/// Checks whether this exact object is tracked.
	pub fn is_saved(&self, instance: &Instance) -> bool {
		self.tracker.is_saved(instance)
	}

	/// Deletes every tracked object. The tracked set is empty afterwards,
	/// even on failure.
	///
	/// # Errors
	///
	/// Returns one [`SeedingError::DeletingFailed`] wrapping every per-object
	/// failure.
	pub fn delete_saved(&self) -> SeedingResult<()> {
		self.tracker.delete_saved(&self.types)
	}

	/// Switches the provider locale. The provider is rebuilt on next use.
	///
	/// # Errors
	///
	/// Returns [`SeedingError::UnsupportedLocale`] and keeps the current
	/// locale if `locale` has no data set.
	pub fn set_faker_locale(&self, locale: &str) -> SeedingResult<()> {
		let locale = FakerLocale::parse(locale)?;
		let mut slot = self.faker.lock();
		slot.locale = locale;
		slot.faker = None;
		tracing::debug!(locale = %locale, "faker locale changed");
		Ok(())
	}

	/// The current provider locale.
	pub fn faker_locale(&self) -> FakerLocale {
		self.faker.lock().locale
	}

	/// Sets the lifecycle method name used to save objects.
	pub fn set_save_method(&self, method: impl Into<String>) {
		self.tracker.set_save_method(method);
	}

	/// Sets the lifecycle method name used to delete objects.
	pub fn set_delete_method(&self, method: impl Into<String>) {
		self.tracker.set_delete_method(method);
	}

	/// Loads definition files from directories and registers every record.
	///
	/// Files already loaded by this engine are skipped. A file counts as
	/// loaded once every record in it is defined; when a record fails, that
	/// file and the files after it are read again by the next call.
	///
	/// # Errors
	///
	/// - [`SeedingError::DirectoryNotFound`] if a path is not a directory.
	/// - The first parse or definition error.
	pub fn load_factories<P: AsRef<Path>>(&self, paths: &[P]) -> SeedingResult<LoadSummary> {
		let mut summary = LoadSummary::default();
		for file in self.loader.load(paths)? {
			for record in file.records {
				let model_id = record.model.trim().to_string();
				self.define(&model_id, record.into_attributes())?;
				summary.definitions += 1;
			}
			self.loader.mark_loaded(file.path);
			summary.files += 1;
		}

		tracing::info!(
			files = summary.files,
			definitions = summary.definitions,
			"loaded factory definitions"
		);
		Ok(summary)
	}

	/// Returns true if a definition is registered under `model_id`.
	pub fn is_defined(&self, model_id: &str) -> bool {
		self.registry.has(model_id)
	}

	/// Registered definition ids, sorted.
	pub fn defined(&self) -> Vec<String> {
		self.registry.model_ids()
	}

	/// Forgets definitions, model types, tracked objects and loaded files,
	/// and drops the provider. Tracked objects are not deleted.
	pub fn reset(&self) {
		self.registry.clear();
		self.types.clear();
		self.loader.reset();
		self.tracker.clear();
		self.faker.lock().faker = None;
	}

	fn parse_overrides(&self, overrides: &Attributes) -> SeedingResult<IndexMap<String, GeneratorSpec>> {
		overrides.parse(&self.provider.read())
	}

	fn create_with(
		&self,
		model_id: &ModelId,
		overrides: &IndexMap<String, GeneratorSpec>,
		ctx: Context,
	) -> SeedingResult<Instance> {
		let (model_type, instance) = self.make(model_id, overrides, ctx)?;
		self.tracker.track(&instance);
		self.tracker.persist(&model_type, &instance)?;
		Ok(instance)
	}

	fn make(
		&self,
		model_id: &ModelId,
		overrides: &IndexMap<String, GeneratorSpec>,
		ctx: Context,
	) -> SeedingResult<(std::sync::Arc<ModelType>, Instance)> {
		let model_type = self.types.get(model_id.name())?;
		let definition = self.registry.get(model_id.as_str())?;
		let specs = attributes::merge(definition.specs(), overrides.clone());

		let object = model_type.construct();
		let values = {
			let target = object.lock();
			attributes::resolve_attributes(&*target, &specs, |spec, target| {
				self.generate(spec, target, ctx)
			})?
		};
		attributes::assign(&mut *object.lock(), values)?;

		tracing::debug!(model_id = %model_id, depth = ctx.depth, "instantiated model");
		let instance = Instance::new(model_id.as_str(), model_type.name(), object);
		Ok((model_type, instance))
	}

	fn generate(&self, spec: &GeneratorSpec, target: &dyn Model, ctx: Context) -> SeedingResult<Value> {
		match spec {
			GeneratorSpec::Literal(value) => Ok(value.clone()),
			GeneratorSpec::ArrayParam(param) => Ok(Value::Data(param.to_value())),
			GeneratorSpec::Provider { method, args } => {
				let method_fn = self
					.provider
					.read()
					.get(method)
					.ok_or_else(|| SeedingError::UnknownGenerator(method.clone()))?;
				self.with_faker(|faker| method_fn(faker, args))
					.map(Value::Data)
			}
			GeneratorSpec::Callback(callback) => self.with_faker(|faker| callback(target, faker)),
			GeneratorSpec::ModelRef(model_id) => {
				let depth = ctx.depth + 1;
				if depth > self.max_depth {
					return Err(SeedingError::RecursionLimit {
						model: model_id.to_string(),
						depth: self.max_depth,
					});
				}

				let ctx = Context { depth, ..ctx };
				let overrides = IndexMap::new();
				let instance = if ctx.persist {
					self.create_with(model_id, &overrides, ctx)?
				} else {
					self.make(model_id, &overrides, ctx)?.1
				};
				Ok(Value::Instance(instance))
			}
		}
	}

	fn with_faker<R>(&self, f: impl FnOnce(&mut Faker) -> R) -> R {
		let mut slot = self.faker.lock();
		let FakerSlot {
			locale,
			seed,
			faker,
		} = &mut *slot;
		let faker = faker.get_or_insert_with(|| Faker::new(*locale, *seed));
		f(faker)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};
	use serde_json::json;

	#[fixture]
	fn muffin() -> Muffin {
		let muffin = Muffin::with_config(MuffinConfig::new().with_faker_seed(1)).unwrap();
		muffin.register_model(ModelType::new::<Record>("Record"));
		muffin
	}

	fn record<R>(instance: &Instance, f: impl FnOnce(&Record) -> R) -> R {
		instance.with(f).unwrap()
	}

	#[rstest]
	fn test_define_rejects_unknown_kind(muffin: Muffin) {
		let result = muffin.define("Record", Attributes::new().kind("x", "noSuchMethod"));
		assert!(matches!(result, Err(SeedingError::UnknownGenerator(_))));
		assert!(!muffin.is_defined("Record"));
	}

	#[rstest]
	fn test_instance_applies_definition_and_overrides(muffin: Muffin) {
		muffin
			.define(
				"Record",
				Attributes::new()
					.set("a", "1")
					.kind("b", "word")
					.kind("c", "arrayparam|,|x,y;z"),
			)
			.unwrap();

		let instance = muffin
			.instance("Record", Attributes::new().set("b", "fixed").set("d", "extra"))
			.unwrap();

		record(&instance, |record| {
			let names: Vec<&str> = record.attributes.keys().map(String::as_str).collect();
			assert_eq!(names, vec!["a", "b", "c", "d"]);
			assert_eq!(record.get("b"), Some(&Value::from("fixed")));
			assert_eq!(record.get("c"), Some(&Value::from(json!([["x", "y"], "z"]))));
		});
		assert!(muffin.saved().is_empty());
	}

	#[rstest]
	fn test_grouped_definition_uses_bare_type(muffin: Muffin) {
		muffin
			.define("admin:Record", Attributes::new().set("role", "admin"))
			.unwrap();

		let instance = muffin.instance("admin:Record", Attributes::new()).unwrap();
		assert_eq!(instance.model_id(), "admin:Record");
		assert_eq!(instance.type_name(), "Record");

		let result = muffin.instance("Record", Attributes::new());
		assert!(matches!(result, Err(SeedingError::NoDefinedFactory(id)) if id == "Record"));
	}

	#[rstest]
	fn test_unregistered_type(muffin: Muffin) {
		muffin.define("Ghost", Attributes::new()).unwrap();
		let result = muffin.instance("Ghost", Attributes::new());
		assert!(matches!(result, Err(SeedingError::ClassNotFound(name)) if name == "Ghost"));
	}

	#[rstest]
	fn test_callback_sees_bare_object(muffin: Muffin) {
		muffin
			.define(
				"Record",
				Attributes::new()
					.set("first", "a")
					.callback("second", |target, _faker| {
						Ok(Value::from(json!(target.get_attribute("first").is_some())))
					}),
			)
			.unwrap();

		let instance = muffin.instance("Record", Attributes::new()).unwrap();
		assert_eq!(instance.attribute("second"), Some(Value::from(json!(false))));
	}

	#[rstest]
	fn test_seeded_engines_agree() {
		let build = || {
			let muffin = Muffin::with_config(MuffinConfig::new().with_faker_seed(99)).unwrap();
			muffin.register_model(ModelType::new::<Record>("Record"));
			muffin
				.define("Record", Attributes::new().kind("name", "name").kind("n", "randomNumber|6"))
				.unwrap();
			muffin.attributes_for("Record", Attributes::new()).unwrap()
		};
		assert_eq!(build(), build());
	}

	#[rstest]
	fn test_set_faker_locale(muffin: Muffin) {
		assert_eq!(muffin.faker_locale(), FakerLocale::En);
		muffin.set_faker_locale("fr_FR").unwrap();
		assert_eq!(muffin.faker_locale(), FakerLocale::FrFr);

		assert!(matches!(
			muffin.set_faker_locale("xx_XX"),
			Err(SeedingError::UnsupportedLocale(_))
		));
		assert_eq!(muffin.faker_locale(), FakerLocale::FrFr);
	}

	#[rstest]
	fn test_locale_change_rebuilds_provider(muffin: Muffin) {
		let draw = |muffin: &Muffin| {
			(0..4)
				.map(|_| muffin.generate_attr("numberBetween|0|1000000").unwrap())
				.collect::<Vec<_>>()
		};
		let first = draw(&muffin);
		assert_ne!(draw(&muffin), first);

		// A fresh provider starts over from the configured seed.
		muffin.set_faker_locale("en_EN").unwrap();
		assert_eq!(draw(&muffin), first);

		muffin.set_faker_locale("de_DE").unwrap();
		let name = muffin.generate_attr("lastName").unwrap();
		let mut faker = Faker::new(FakerLocale::DeDe, Some(1));
		let expected = ProviderTable::builtin().call(&mut faker, "lastName", &[]).unwrap();
		assert_eq!(name, Value::from(expected));
	}

	#[rstest]
	fn test_with_config_rejects_locale() {
		let result = Muffin::with_config(MuffinConfig::new().with_faker_locale("tlh"));
		assert!(matches!(result, Err(SeedingError::UnsupportedLocale(_))));
	}

	#[rstest]
	fn test_provider_method(muffin: Muffin) {
		muffin.provider_method("constant", |_faker, args| Ok(json!(args.join("+"))));
		assert_eq!(
			muffin.generate_attr("constant|a|b").unwrap(),
			Value::from("a+b")
		);
	}

	#[rstest]
	#[case("numberBetween|5|5", json!(5))]
	#[case("arrayparam|;|", json!([]))]
	fn test_generate_attr(muffin: Muffin, #[case] kind: &str, #[case] expected: serde_json::Value) {
		assert_eq!(muffin.generate_attr(kind).unwrap(), Value::from(expected));
	}

	#[rstest]
	#[case("numberBetween|x|1")]
	#[case("words|18446744073709551615")]
	#[case("sentence|10000000000")]
	fn test_provider_argument_errors_surface_at_generation(muffin: Muffin, #[case] kind: &str) {
		muffin
			.define("Record", Attributes::new().kind("n", kind))
			.unwrap();
		let result = muffin.instance("Record", Attributes::new());
		assert!(matches!(result, Err(SeedingError::MalformedDescriptor { .. })));
		assert!(matches!(
			muffin.generate_attr(kind),
			Err(SeedingError::MalformedDescriptor { .. })
		));
	}

	#[rstest]
	fn test_recursion_limit() {
		let muffin = Muffin::with_config(MuffinConfig::new().with_max_depth(3)).unwrap();
		muffin.register_model(ModelType::new::<Record>("Node"));
		muffin
			.define("Node", Attributes::new().kind("next", "factory|Node"))
			.unwrap();

		let result = muffin.instance("Node", Attributes::new());
		assert!(matches!(
			result,
			Err(SeedingError::RecursionLimit { model, depth }) if model == "Node" && depth == 3
		));
	}

	#[rstest]
	fn test_seed_zero_skips_lookup(muffin: Muffin) {
		assert!(muffin.seed(0, "Undefined", Attributes::new()).unwrap().is_empty());
	}

	#[rstest]
	fn test_reset(muffin: Muffin) {
		muffin.define("Record", Attributes::new()).unwrap();
		muffin.reset();
		assert!(muffin.defined().is_empty());
		assert!(matches!(
			muffin.instance("Record", Attributes::new()),
			Err(SeedingError::ClassNotFound(_))
		));
	}
}
