//! JSON test vector loader shared by badge tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::fs;

use serde::de::DeserializeOwned;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ColorVector {
    pub description: String,
    pub input: String,
    pub fallback: String,
    pub expect: String,
}

#[derive(Debug, Deserialize)]
pub struct GeometryVector {
    pub description: String,
    pub style: String,
    pub label: String,
    pub value: u64,
    pub expect: ExpectGeometry,
}

#[derive(Debug, Deserialize)]
pub struct ExpectGeometry {
    pub label_width: usize,
    pub value_width: usize,
    pub total: usize,
}

pub fn load<T: DeserializeOwned>(name: &str) -> Vec<T> {
    let path = format!("{}/tests/vectors/{name}", env!("CARGO_MANIFEST_DIR"));
    let s = fs::read_to_string(&path).unwrap_or_else(|e| panic!("read {path}: {e}"));
    serde_json::from_str(&s).unwrap_or_else(|e| panic!("parse {path}: {e}"))
}
