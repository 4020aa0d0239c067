use formrelay_models::contact::Language;
use tracing::debug;

/// Persistent storage the embedder provides (browser local storage, a config
/// file, ...). Implementations may fail; callers of this module never do.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
}

const LANGUAGE_KEY: &str = "preferred-language";

/// Remembers the visitor's en/no choice across sessions, best-effort: storage
/// errors are swallowed and only logged.
#[derive(Debug, Clone)]
pub struct LanguagePreference<Store> {
    store: Store,
}

impl<Store> LanguagePreference<Store>
where
    Store: PreferenceStore,
{
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn load(&self) -> Option<Language> {
        let value = self
            .store
            .get(LANGUAGE_KEY)
            .inspect_err(|err| debug!("failed to read language preference: {err}"))
            .ok()
            .flatten()?;

        match value.as_str() {
            "en" => Some(Language::En),
            "no" => Some(Language::No),
            _ => None,
        }
    }

    pub fn save(&self, language: Language) {
        let value = match language {
            Language::En => "en",
            Language::No => "no",
        };

        if let Err(err) = self.store.set(LANGUAGE_KEY, value) {
            debug!("failed to persist language preference: {err}");
        }
    }
}
