mod cloud;

pub use cloud::{CloudConfig, OpacityBounds};

use serde_json::{Map, Value};

/// JSON overrides supplied by the embedding site.
///
/// Overrides are deep-merged onto [`SiteConfig::defaults`] before typed sections are read out of
/// them, so a site only needs to name the keys it changes.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteConfig(Value);

impl Default for SiteConfig {
    fn default() -> Self {
        Self::empty_object()
    }
}

impl SiteConfig {
    pub const WORD_CLOUD_KEY: &'static str = "wordCloud";

    pub fn empty_object() -> Self {
        Self(Value::Object(Map::new()))
    }

    /// Built-in defaults for every typed section.
    pub fn defaults() -> Self {
        let mut root = Map::new();
        root.insert(
            Self::WORD_CLOUD_KEY.to_string(),
            serde_json::to_value(CloudConfig::default()).unwrap_or(Value::Null),
        );
        Self(Value::Object(root))
    }

    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn from_json_str(text: &str) -> crate::Result<Self> {
        Ok(Self(serde_json::from_str(text)?))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn get(&self, dotted_path: &str) -> Option<&Value> {
        let mut cur = &self.0;
        for segment in dotted_path.split('.') {
            cur = cur.as_object()?.get(segment)?;
        }
        Some(cur)
    }

    pub fn get_str(&self, dotted_path: &str) -> Option<&str> {
        self.get(dotted_path)?.as_str()
    }

    pub fn get_bool(&self, dotted_path: &str) -> Option<bool> {
        self.get(dotted_path)?.as_bool()
    }

    pub fn set_value(&mut self, dotted_path: &str, value: Value) {
        // Site configs can be built from any JSON value; coerce a non-object root so this never
        // panics on user input.
        if !self.0.is_object() {
            self.0 = Value::Object(Map::new());
        }

        let Value::Object(ref mut root) = self.0 else {
            return;
        };
        let mut cur: &mut Map<String, Value> = root;
        let mut segments = dotted_path.split('.').peekable();
        while let Some(seg) = segments.next() {
            if segments.peek().is_none() {
                cur.insert(seg.to_string(), value);
                return;
            }
            let slot = cur.entry(seg).or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            let Some(next) = slot.as_object_mut() else {
                return;
            };
            cur = next;
        }
    }

    pub fn deep_merge(&mut self, other: &Value) {
        deep_merge_value(&mut self.0, other);
    }

    /// Defaults with `self` merged on top.
    pub fn effective(&self) -> SiteConfig {
        let mut out = Self::defaults();
        out.deep_merge(&self.0);
        out
    }

    /// Reads and validates the word cloud section of the effective config.
    pub fn cloud(&self) -> crate::Result<CloudConfig> {
        let effective = self.effective();
        let section = effective
            .get(Self::WORD_CLOUD_KEY)
            .cloned()
            .unwrap_or(Value::Null);
        let config: CloudConfig = serde_json::from_value(section)?;
        config.validate()?;
        Ok(config)
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}
