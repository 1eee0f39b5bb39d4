//! Builders for Game Master template entries.

use serde_json::{json, Map, Value};

/// Wrap entries in a document.
pub fn document(items: Vec<Value>) -> Value {
    json!({ "itemTemplates": items, "timestampMs": "1600000000000" })
}

pub fn fast_move(
    number: u16,
    name: &str,
    ptype: &str,
    power: f64,
    energy: i64,
    duration: u32,
) -> Value {
    json!({
        "templateId": format!("COMBAT_V{number:04}_MOVE_{name}"),
        "combatMove": {
            "uniqueId": name,
            "type": format!("POKEMON_TYPE_{ptype}"),
            "power": power,
            "energyDelta": energy,
            "durationTurns": duration,
        }
    })
}

pub fn charged_move(number: u16, name: &str, ptype: &str, power: f64, energy: i64) -> Value {
    json!({
        "templateId": format!("COMBAT_V{number:04}_MOVE_{name}"),
        "combatMove": {
            "uniqueId": name,
            "type": format!("POKEMON_TYPE_{ptype}"),
            "power": power,
            "energyDelta": energy,
        }
    })
}

/// An entry no builder is interested in.
pub fn unrelated(template_id: &str) -> Value {
    json!({ "templateId": template_id, "data": { "value": 1 } })
}

/// Creature entry builder. Defaults to a single Normal type, stats of 100
/// and no moves; `pokemonId` defaults to the name.
#[derive(Debug, Clone)]
pub struct Mon {
    template_id: String,
    settings: Map<String, Value>,
}

impl Mon {
    pub fn new(dex: u16, name: &str) -> Self {
        let mut settings = Map::new();
        settings.insert("pokemonId".into(), json!(name));
        settings.insert("type".into(), json!("POKEMON_TYPE_NORMAL"));
        settings.insert(
            "stats".into(),
            json!({ "baseAttack": 100, "baseStamina": 100, "baseDefense": 100 }),
        );
        Self {
            template_id: format!("V{dex:04}_POKEMON_{name}"),
            settings,
        }
    }

    fn set(mut self, key: &str, value: Value) -> Self {
        self.settings.insert(key.to_string(), value);
        self
    }

    pub fn pokemon_id(self, id: &str) -> Self {
        self.set("pokemonId", json!(id))
    }

    pub fn types(self, first: &str, second: Option<&str>) -> Self {
        let this = self.set("type", json!(format!("POKEMON_TYPE_{first}")));
        match second {
            Some(t) => this.set("type2", json!(format!("POKEMON_TYPE_{t}"))),
            None => this,
        }
    }

    pub fn stats(self, attack: u32, stamina: u32, defense: u32) -> Self {
        self.set(
            "stats",
            json!({ "baseAttack": attack, "baseStamina": stamina, "baseDefense": defense }),
        )
    }

    pub fn quick(self, moves: &[&str]) -> Self {
        self.set("quickMoves", json!(moves))
    }

    pub fn charged(self, moves: &[&str]) -> Self {
        self.set("cinematicMoves", json!(moves))
    }

    pub fn elite_quick(self, moves: &[&str]) -> Self {
        self.set("eliteQuickMove", json!(moves))
    }

    pub fn elite_charged(self, moves: &[&str]) -> Self {
        self.set("eliteCinematicMove", json!(moves))
    }

    pub fn form(self, form: &str) -> Self {
        self.set("form", json!(form))
    }

    pub fn parent(self, parent: &str) -> Self {
        self.set("parentPokemonId", json!(parent))
    }

    pub fn shadow(self) -> Self {
        self.set(
            "shadow",
            json!({ "purificationStardustNeeded": 3000, "purificationCandyNeeded": 3 }),
        )
    }

    pub fn class(self, class: &str) -> Self {
        self.set("pokemonClass", json!(format!("POKEMON_CLASS_{class}")))
    }

    /// Drop a field, for structural error cases.
    pub fn without(mut self, key: &str) -> Self {
        self.settings.remove(key);
        self
    }

    pub fn build(self) -> Value {
        json!({
            "templateId": self.template_id,
            "pokemonSettings": Value::Object(self.settings),
        })
    }
}
