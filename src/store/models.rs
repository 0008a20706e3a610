use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

use crate::config::StoreConfig;
use crate::error::ModelStoreError;
use crate::model::example::TrainingExample;
use crate::model::preset::TrainingPreset;
use crate::store::kv::KeyValueStore;

/// A trained network saved together with the examples it was trained on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedModel {
    pub id: String,
    pub name: String,
    /// Epoch milliseconds at save time.
    pub timestamp: u64,
    pub preset: TrainingPreset,
    pub example_count: usize,
    /// Serialized network, as produced by the trainer's export.
    pub model_json: String,
    pub training_data: Vec<TrainingExample>,
}

/// Bounded, newest-first collection of saved models kept in one storage slot.
pub struct ModelStore<S: KeyValueStore> {
    store: S,
    key: String,
    capacity: usize,
}

impl<S: KeyValueStore> ModelStore<S> {
    pub fn new(store: S, config: &StoreConfig) -> Self {
        ModelStore {
            store,
            key: config.key.clone(),
            capacity: config.capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// All saved models, newest first. Unreadable or malformed storage reads as empty.
    pub fn get_all(&self) -> Vec<SavedModel> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!("could not read saved models: {e}");
                return Vec::new();
            }
        };
        match serde_json::from_str::<Vec<SavedModel>>(&raw) {
            Ok(mut models) => {
                models.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
                models
            }
            Err(e) => {
                tracing::warn!("ignoring malformed saved models: {e}");
                Vec::new()
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<SavedModel> {
        self.get_all().into_iter().find(|m| m.id == id)
    }

    /// Whether any model is stored, without decoding the models themselves.
    pub fn has_any(&self) -> bool {
        match self.store.get(&self.key) {
            Ok(Some(raw)) => serde_json::from_str::<Vec<IgnoredAny>>(&raw)
                .map(|entries| !entries.is_empty())
                .unwrap_or(false),
            _ => false,
        }
    }

    /// Saves a model at the front of the collection, evicting the oldest beyond capacity.
    ///
    /// `name` defaults to `Model {n}` where n is one more than the number of
    /// models currently stored. If the write is refused, one more of the oldest
    /// models is evicted and the write is retried once.
    pub fn save(
        &mut self,
        model_json: impl Into<String>,
        training_data: Vec<TrainingExample>,
        preset: TrainingPreset,
        name: Option<&str>,
    ) -> Result<SavedModel, ModelStoreError> {
        let mut models = self.get_all();
        let name = match name {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Model {}", models.len() + 1),
        };

        let saved = SavedModel {
            id: unique_id(&models),
            name,
            timestamp: now_millis(),
            preset,
            example_count: training_data.len(),
            model_json: model_json.into(),
            training_data,
        };

        models.insert(0, saved.clone());
        models.truncate(self.capacity);

        if let Err(first) = self.write(&models)? {
            tracing::warn!("saving models failed ({first}); evicting the oldest and retrying");
            if models.len() > 1 {
                models.pop();
            }
            if let Err(second) = self.write(&models)? {
                return Err(ModelStoreError::PersistenceFailed(second));
            }
        }

        tracing::info!(id = %saved.id, name = %saved.name, "saved model");
        Ok(saved)
    }

    /// Removes the model with `id`; absent ids are ignored.
    pub fn delete(&mut self, id: &str) -> Result<(), ModelStoreError> {
        let mut models = self.get_all();
        let before = models.len();
        models.retain(|m| m.id != id);
        if models.len() == before {
            return Ok(());
        }
        self.write(&models)?.map_err(ModelStoreError::PersistenceFailed)
    }

    /// Changes only the name of the model with `id`; absent ids are ignored.
    pub fn rename(&mut self, id: &str, name: &str) -> Result<(), ModelStoreError> {
        let mut models = self.get_all();
        let Some(model) = models.iter_mut().find(|m| m.id == id) else {
            return Ok(());
        };
        model.name = name.to_string();
        self.write(&models)?.map_err(ModelStoreError::PersistenceFailed)
    }

    /// Removes every saved model.
    pub fn clear(&mut self) -> Result<(), ModelStoreError> {
        self.store.remove(&self.key).map_err(ModelStoreError::PersistenceFailed)
    }

    /// Serialization errors are fatal; storage errors are handed back for retry.
    fn write(&mut self, models: &[SavedModel]) -> Result<Result<(), crate::error::StoreError>, ModelStoreError> {
        let json = serde_json::to_string(models)?;
        Ok(self.store.set(&self.key, &json))
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// `model-{millis}-{7 base-36 chars}`, redrawn on the off chance it collides.
fn unique_id(existing: &[SavedModel]) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    loop {
        let suffix: String = (0..7)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect();
        let id = format!("model-{}-{}", now_millis(), suffix);
        if existing.iter().all(|m| m.id != id) {
            return id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::convert::NormalizedRgb;
    use crate::error::StoreError;
    use crate::model::example::Label;
    use crate::store::kv::MemoryStore;

    const KEY: &str = "text-contrast-ml-models";

    fn store() -> ModelStore<MemoryStore> {
        ModelStore::new(MemoryStore::new(), &StoreConfig::default())
    }

    fn data(n: usize) -> Vec<TrainingExample> {
        (0..n)
            .map(|i| TrainingExample::new(NormalizedRgb::new(i as f64 / 10.0, 0.5, 0.5), Label::Dark))
            .collect()
    }

    /// Refuses the first `failures` writes.
    struct Flaky {
        inner: MemoryStore,
        failures: usize,
        attempts: Vec<usize>,
    }

    impl KeyValueStore for Flaky {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.inner.get(key)
        }
        fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
            let count = serde_json::from_str::<Vec<IgnoredAny>>(value).map(|v| v.len()).unwrap_or(0);
            self.attempts.push(count);
            if self.failures > 0 {
                self.failures -= 1;
                return Err(StoreError::QuotaExceeded { needed: value.len(), capacity: 0 });
            }
            self.inner.set(key, value)
        }
        fn remove(&mut self, key: &str) -> Result<(), StoreError> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn empty_storage_reads_as_no_models() {
        let s = store();
        assert!(s.get_all().is_empty());
        assert!(!s.has_any());
    }

    #[test]
    fn corrupt_storage_reads_as_no_models() {
        let mut kv = MemoryStore::new();
        kv.set(KEY, "{ not an array").unwrap();
        let s = ModelStore::new(kv, &StoreConfig::default());
        assert!(s.get_all().is_empty());
        assert!(!s.has_any());
    }

    #[test]
    fn save_fills_in_defaults() {
        let mut s = store();
        let first = s.save("{}", data(3), TrainingPreset::Quick, None).unwrap();
        let second = s.save("{}", data(4), TrainingPreset::Thorough, Some("")).unwrap();
        let third = s.save("{}", data(1), TrainingPreset::Balanced, Some("Sunset")).unwrap();

        assert_eq!(first.name, "Model 1");
        assert_eq!(second.name, "Model 2");
        assert_eq!(third.name, "Sunset");
        assert_eq!(first.example_count, 3);
        assert!(first.id.starts_with("model-"));
        assert_ne!(first.id, second.id);
        assert!(s.has_any());
    }

    #[test]
    fn sixth_save_evicts_the_oldest() {
        let mut s = store();
        for _ in 0..6 {
            s.save("{}", data(2), TrainingPreset::Balanced, None).unwrap();
        }
        let names: Vec<String> = s.get_all().into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["Model 6", "Model 5", "Model 4", "Model 3", "Model 2"]);
    }

    #[test]
    fn get_all_sorts_newest_first() {
        let mut kv = MemoryStore::new();
        let older = SavedModel {
            id: "a".into(),
            name: "old".into(),
            timestamp: 1,
            preset: TrainingPreset::Quick,
            example_count: 0,
            model_json: "{}".into(),
            training_data: vec![],
        };
        let newer = SavedModel { id: "b".into(), name: "new".into(), timestamp: 2, ..older.clone() };
        kv.set(KEY, &serde_json::to_string(&vec![older, newer]).unwrap()).unwrap();
        let s = ModelStore::new(kv, &StoreConfig::default());
        let ids: Vec<String> = s.get_all().into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn wire_format_uses_camel_case() {
        let mut s = store();
        s.save("{\"w\":1}", data(1), TrainingPreset::Thorough, Some("x")).unwrap();
        let raw = s.inner().get(KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let entry = &value[0];
        assert_eq!(entry["preset"], "thorough");
        assert_eq!(entry["exampleCount"], 1);
        assert_eq!(entry["modelJson"], "{\"w\":1}");
        assert_eq!(entry["trainingData"][0]["output"], serde_json::json!({"dark": 1}));
        assert!(entry["timestamp"].is_u64());
        assert!(entry["id"].is_string());
    }

    #[test]
    fn delete_and_rename() {
        let mut s = store();
        let a = s.save("{}", data(1), TrainingPreset::Quick, None).unwrap();
        let b = s.save("{}", data(1), TrainingPreset::Quick, None).unwrap();

        s.rename(&a.id, "Renamed").unwrap();
        s.rename("missing", "Nope").unwrap();
        let got = s.get(&a.id).unwrap();
        assert_eq!(got.name, "Renamed");
        assert_eq!(got.model_json, a.model_json);
        assert_eq!(got.timestamp, a.timestamp);

        s.delete(&b.id).unwrap();
        s.delete("missing").unwrap();
        let ids: Vec<String> = s.get_all().into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![a.id]);
    }

    #[test]
    fn clear_removes_everything() {
        let mut s = store();
        s.save("{}", data(1), TrainingPreset::Quick, None).unwrap();
        s.clear().unwrap();
        assert!(!s.has_any());
        assert!(s.get_all().is_empty());
    }

    #[test]
    fn refused_write_evicts_one_more_and_retries() {
        let mut s = ModelStore::new(
            Flaky { inner: MemoryStore::new(), failures: 0, attempts: vec![] },
            &StoreConfig::default(),
        );
        for _ in 0..5 {
            s.save("{}", data(1), TrainingPreset::Quick, None).unwrap();
        }
        let mut kv = s.into_inner();
        kv.failures = 1;
        kv.attempts.clear();
        let mut s = ModelStore::new(kv, &StoreConfig::default());

        let saved = s.save("{}", data(1), TrainingPreset::Quick, None).unwrap();
        assert_eq!(s.inner().attempts, vec![5, 4]);
        let models = s.get_all();
        assert_eq!(models.len(), 4);
        assert_eq!(models[0].id, saved.id);
    }

    #[test]
    fn second_refusal_is_fatal() {
        let kv = Flaky { inner: MemoryStore::new(), failures: 2, attempts: vec![] };
        let mut s = ModelStore::new(kv, &StoreConfig::default());
        let err = s.save("{}", data(1), TrainingPreset::Quick, None).unwrap_err();
        assert!(matches!(err, ModelStoreError::PersistenceFailed(StoreError::QuotaExceeded { .. })));
        assert!(s.get_all().is_empty());
    }

    #[test]
    fn quota_limited_memory_store_surfaces_failure() {
        let mut s = ModelStore::new(MemoryStore::with_quota(64), &StoreConfig::default());
        let err = s.save("{}", data(20), TrainingPreset::Quick, None).unwrap_err();
        assert!(matches!(err, ModelStoreError::PersistenceFailed(_)));
    }
}
