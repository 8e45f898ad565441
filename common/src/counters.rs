use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Counter {
    pub name: String,
    pub display_name: String,
    pub value: i64,
}

/// Grupo de contadores. Los nombres de contador son únicos dentro del grupo
/// y se conservan en orden de inserción.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterGroup {
    pub name: String,
    pub display_name: String,
    counters: Vec<Counter>,
}

impl CounterGroup {
    pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            counters: Vec::new(),
        }
    }

    pub fn find_counter(&self, name: &str) -> Option<&Counter> {
        self.counters.iter().find(|c| c.name == name)
    }

    /// Suma `value` al contador `name`, creándolo si no existe.
    pub fn increment(&mut self, name: &str, display_name: &str, value: i64) {
        match self.counters.iter_mut().find(|c| c.name == name) {
            Some(counter) => counter.value = counter.value.saturating_add(value),
            None => self.counters.push(Counter {
                name: name.to_string(),
                display_name: display_name.to_string(),
                value,
            }),
        }
    }

    pub fn counters(&self) -> impl Iterator<Item = &Counter> {
        self.counters.iter()
    }

    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }
}

/// Registro de contadores: grupo -> contador -> valor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterRegistry {
    groups: Vec<CounterGroup>,
}

impl CounterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn group(&self, name: &str) -> Option<&CounterGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Devuelve el grupo `name`, creándolo al final si todavía no existe.
    pub fn group_or_insert(&mut self, name: &str, display_name: &str) -> &mut CounterGroup {
        let idx = match self.groups.iter().position(|g| g.name == name) {
            Some(idx) => idx,
            None => {
                self.groups.push(CounterGroup::new(name, display_name));
                self.groups.len() - 1
            }
        };
        &mut self.groups[idx]
    }

    pub fn find_counter(&self, group: &str, name: &str) -> Option<&Counter> {
        self.group(group).and_then(|g| g.find_counter(name))
    }

    /// Total de contadores sumando todos los grupos.
    pub fn count_counters(&self) -> usize {
        self.groups.iter().map(CounterGroup::len).sum()
    }

    pub fn groups(&self) -> impl Iterator<Item = &CounterGroup> {
        self.groups.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Acumula `other` sobre este registro sumando valor a valor.
    pub fn merge(&mut self, other: &CounterRegistry) {
        for group in &other.groups {
            let target = self.group_or_insert(&group.name, &group.display_name);
            for counter in &group.counters {
                target.increment(&counter.name, &counter.display_name, counter.value);
            }
        }
    }
}
