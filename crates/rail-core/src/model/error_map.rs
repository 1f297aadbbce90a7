//! `ErrorMap`: campo -> mensajes, acumulativo.
//!
//! Los mensajes de un mismo campo se agregan en orden (nunca se
//! sobrescriben). Los campos conservan el orden de inserción para que la
//! salida serializada sea estable entre ejecuciones idénticas.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::constants::BASE_KEY;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorMap(IndexMap<String, Vec<String>>);

impl ErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Agrega un mensaje al final de la lista del campo.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Agrega un mensaje bajo la clave reservada `base`.
    pub fn add_base(&mut self, message: impl Into<String>) {
        self.add(BASE_KEY, message);
    }

    /// Fusiona `other` sobre `self` concatenando mensajes por campo.
    pub fn merge(&mut self, other: ErrorMap) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn base(&self) -> Option<&[String]> {
        self.get(BASE_KEY)
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Número de campos con errores (no de mensajes).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn message_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// Mensajes aplanados como `campo: mensaje`, útil para logs.
    pub fn full_messages(&self) -> Vec<String> {
        self.iter()
            .flat_map(|(field, msgs)| msgs.iter().map(move |m| format!("{field}: {m}")))
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for ErrorMap
    where K: Into<String>,
          V: Into<String>
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ErrorMap::new();
        for (field, message) in iter {
            map.add(field, message);
        }
        map
    }
}

impl IntoIterator for ErrorMap {
    type Item = (String, Vec<String>);
    type IntoIter = indexmap::map::IntoIter<String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
