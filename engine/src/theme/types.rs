use serde_json::{Map, Value};

/// Ordered mapping of SharePoint colour slots to hex colour values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    name: String,
    slots: Vec<(String, String)>,
    inverted: bool,
}

impl Palette {
    pub(crate) fn new(name: impl Into<String>, slots: Vec<(String, String)>, inverted: bool) -> Self {
        Self {
            name: name.into(),
            slots,
            inverted,
        }
    }

    /// Reads a palette out of a theme definition of the form
    /// `{"palette": {slot: colour, ...}, "isInverted": bool}`.
    ///
    /// Returns `None` when the definition carries no colour slots.
    pub fn from_json(name: impl Into<String>, definition: &Value) -> Option<Self> {
        let slots: Vec<(String, String)> = definition
            .get("palette")?
            .as_object()?
            .iter()
            .filter_map(|(slot, color)| color.as_str().map(|c| (slot.clone(), c.to_string())))
            .collect();
        if slots.is_empty() {
            return None;
        }
        let inverted = definition
            .get("isInverted")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        Some(Self::new(name, slots, inverted))
    }

    /// Name this palette was registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dark palettes render light text on a dark background.
    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    pub fn get(&self, slot: &str) -> Option<&str> {
        self.slots
            .iter()
            .find(|(name, _)| name == slot)
            .map(|(_, color)| color.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.slots
            .iter()
            .map(|(slot, color)| (slot.as_str(), color.as_str()))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slots in palette order; relies on `serde_json`'s `preserve_order`.
    pub fn to_json(&self) -> Value {
        let palette: Map<String, Value> = self
            .slots
            .iter()
            .map(|(slot, color)| (slot.clone(), Value::String(color.clone())))
            .collect();
        Value::Object(palette)
    }
}

/// A tenant theme ready to be created and applied: the configured theme name
/// plus its palette, either resolved from the catalog or read back from the
/// tenant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTheme {
    pub name: String,
    pub palette: Palette,
}

impl ResolvedTheme {
    pub fn new(name: impl Into<String>, palette: Palette) -> Self {
        Self {
            name: name.into(),
            palette,
        }
    }

    /// Theme definition in the shape SharePoint's theme manager expects.
    pub fn theme_json(&self) -> Value {
        serde_json::json!({
            "palette": self.palette.to_json(),
            "isInverted": self.palette.is_inverted(),
        })
    }

    /// [`theme_json`](Self::theme_json) serialized to a string, which is how
    /// the REST endpoints take it.
    pub fn theme_json_string(&self) -> String {
        self.theme_json().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::resolve_palette;
    use serde_json::json;

    #[test]
    fn test_json_keeps_slot_order() {
        let palette = resolve_palette("Blue");
        let json = palette.to_json();
        let keys: Vec<&str> = json
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        let slots: Vec<&str> = palette.iter().map(|(slot, _)| slot).collect();

        assert_eq!(keys, slots);
        assert_eq!(keys.first(), Some(&"themePrimary"));
        assert!(
            ResolvedTheme::new("Brand", palette)
                .theme_json_string()
                .starts_with(r##"{"palette":{"themePrimary":"#0078d4""##)
        );
    }

    #[test]
    fn test_palette_from_tenant_definition() {
        let definition = json!({
            "palette": { "themePrimary": "#6b2c91", "white": "#ffffff", "bad": 3 },
            "isInverted": true,
        });
        let palette = Palette::from_json("Existing Corp", &definition).unwrap();

        assert_eq!(palette.name(), "Existing Corp");
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.get("themePrimary"), Some("#6b2c91"));
        assert!(palette.is_inverted());
    }

    #[test]
    fn test_definition_without_slots_is_rejected() {
        assert_eq!(Palette::from_json("x", &json!({ "isInverted": false })), None);
        assert_eq!(Palette::from_json("x", &json!({ "palette": {} })), None);
    }
}
