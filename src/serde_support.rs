//! Serde support for every container, behind the `serde` feature.
//!
//! Sequences (list, sets) serialize as sequences; maps serialize as maps.
//! Deserialization goes through the lenient constructors, so a duplicated
//! key in the input keeps its first occurrence instead of failing the
//! whole document.

use std::hash::{BuildHasher, Hash};
use std::marker::PhantomData;

use crate::{
    FlatKey, FrozenIntMap, FrozenList, FrozenMap, FrozenSet, FrozenSortedMap, FrozenSortedSet,
};

// =============================================================================
// FrozenList
// =============================================================================

impl<T: serde::Serialize> serde::Serialize for FrozenList<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for element in self.iter() {
            seq.serialize_element(element)?;
        }
        seq.end()
    }
}

struct FrozenListVisitor<T> {
    marker: PhantomData<T>,
}

impl<'de, T: serde::Deserialize<'de>> serde::de::Visitor<'de> for FrozenListVisitor<T> {
    type Value = FrozenList<T>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut elements = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(element) = seq.next_element()? {
            elements.push(element);
        }
        Ok(FrozenList::from(elements))
    }
}

impl<'de, T: serde::Deserialize<'de>> serde::Deserialize<'de> for FrozenList<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(FrozenListVisitor {
            marker: PhantomData,
        })
    }
}

// =============================================================================
// FrozenSet
// =============================================================================

impl<T: serde::Serialize, S> serde::Serialize for FrozenSet<T, S> {
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for element in self.iter() {
            seq.serialize_element(element)?;
        }
        seq.end()
    }
}

struct FrozenSetVisitor<T, S> {
    marker: PhantomData<(T, S)>,
}

impl<'de, T, S> serde::de::Visitor<'de> for FrozenSetVisitor<T, S>
where
    T: serde::Deserialize<'de> + Eq + Hash,
    S: BuildHasher + Default,
{
    type Value = FrozenSet<T, S>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut elements = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(element) = seq.next_element()? {
            elements.push(element);
        }
        Ok(FrozenSet::from_elements(elements))
    }
}

impl<'de, T, S> serde::Deserialize<'de> for FrozenSet<T, S>
where
    T: serde::Deserialize<'de> + Eq + Hash,
    S: BuildHasher + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(FrozenSetVisitor {
            marker: PhantomData,
        })
    }
}

// =============================================================================
// FrozenSortedSet
// =============================================================================

impl<T: serde::Serialize> serde::Serialize for FrozenSortedSet<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for element in self.iter() {
            seq.serialize_element(element)?;
        }
        seq.end()
    }
}

struct FrozenSortedSetVisitor<T> {
    marker: PhantomData<T>,
}

impl<'de, T> serde::de::Visitor<'de> for FrozenSortedSetVisitor<T>
where
    T: serde::Deserialize<'de> + Ord,
{
    type Value = FrozenSortedSet<T>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut elements = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(element) = seq.next_element()? {
            elements.push(element);
        }
        Ok(FrozenSortedSet::from_elements(elements))
    }
}

impl<'de, T> serde::Deserialize<'de> for FrozenSortedSet<T>
where
    T: serde::Deserialize<'de> + Ord,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(FrozenSortedSetVisitor {
            marker: PhantomData,
        })
    }
}

// =============================================================================
// FrozenMap
// =============================================================================

impl<K, V, S> serde::Serialize for FrozenMap<K, V, S>
where
    K: serde::Serialize + Eq + Hash,
    V: serde::Serialize,
    S: BuildHasher,
{
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct FrozenMapVisitor<K, V, S> {
    marker: PhantomData<(K, V, S)>,
}

impl<'de, K, V, S> serde::de::Visitor<'de> for FrozenMapVisitor<K, V, S>
where
    K: serde::Deserialize<'de> + Eq + Hash,
    V: serde::Deserialize<'de>,
    S: BuildHasher + Default,
{
    type Value = FrozenMap<K, V, S>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut pairs = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(pair) = access.next_entry()? {
            pairs.push(pair);
        }
        Ok(FrozenMap::from_pairs(pairs))
    }
}

impl<'de, K, V, S> serde::Deserialize<'de> for FrozenMap<K, V, S>
where
    K: serde::Deserialize<'de> + Eq + Hash,
    V: serde::Deserialize<'de>,
    S: BuildHasher + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(FrozenMapVisitor {
            marker: PhantomData,
        })
    }
}

// =============================================================================
// FrozenSortedMap
// =============================================================================

impl<K: serde::Serialize, V: serde::Serialize> serde::Serialize for FrozenSortedMap<K, V> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct FrozenSortedMapVisitor<K, V> {
    marker: PhantomData<(K, V)>,
}

impl<'de, K, V> serde::de::Visitor<'de> for FrozenSortedMapVisitor<K, V>
where
    K: serde::Deserialize<'de> + Ord,
    V: serde::Deserialize<'de>,
{
    type Value = FrozenSortedMap<K, V>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut pairs = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(pair) = access.next_entry()? {
            pairs.push(pair);
        }
        Ok(FrozenSortedMap::from_pairs(pairs))
    }
}

impl<'de, K, V> serde::Deserialize<'de> for FrozenSortedMap<K, V>
where
    K: serde::Deserialize<'de> + Ord,
    V: serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(FrozenSortedMapVisitor {
            marker: PhantomData,
        })
    }
}

// =============================================================================
// FrozenIntMap
// =============================================================================

impl<K: serde::Serialize, V: serde::Serialize> serde::Serialize for FrozenIntMap<K, V> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct FrozenIntMapVisitor<K, V> {
    marker: PhantomData<(K, V)>,
}

impl<'de, K, V> serde::de::Visitor<'de> for FrozenIntMapVisitor<K, V>
where
    K: serde::Deserialize<'de> + FlatKey,
    V: serde::Deserialize<'de>,
{
    type Value = FrozenIntMap<K, V>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a map with integer keys")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut pairs = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(pair) = access.next_entry()? {
            pairs.push(pair);
        }
        Ok(FrozenIntMap::from_pairs(pairs))
    }
}

impl<'de, K, V> serde::Deserialize<'de> for FrozenIntMap<K, V>
where
    K: serde::Deserialize<'de> + FlatKey,
    V: serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(FrozenIntMapVisitor {
            marker: PhantomData,
        })
    }
}
