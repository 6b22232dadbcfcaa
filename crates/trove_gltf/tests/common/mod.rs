//! Helpers for building glTF documents in memory.

#![allow(dead_code)]

use base64::prelude::{Engine, BASE64_STANDARD};
use serde_json::{json, Value};
use trove_gltf::{GltfImporter, ImporterConfig};

pub const BYTE: u32 = 5120;
pub const UNSIGNED_BYTE: u32 = 5121;
pub const SHORT: u32 = 5122;
pub const UNSIGNED_SHORT: u32 = 5123;
pub const UNSIGNED_INT: u32 = 5125;
pub const FLOAT: u32 = 5126;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn f32_bytes(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

pub fn u16_bytes(values: &[u16]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

pub fn i16_bytes(values: &[i16]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

pub fn u32_bytes(values: &[u32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn components(element_type: &str) -> usize {
    match element_type {
        "SCALAR" => 1,
        "VEC2" => 2,
        "VEC3" => 3,
        "VEC4" => 4,
        "MAT4" => 16,
        other => panic!("unexpected element type {other}"),
    }
}

/// Collects accessor data into a single embedded buffer.
#[derive(Default)]
pub struct Builder {
    data: Vec<u8>,
    views: Vec<Value>,
    accessors: Vec<Value>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an accessor over `bytes`, returning its index.
    pub fn accessor(
        &mut self,
        bytes: &[u8],
        component_type: u32,
        element_type: &str,
        count: usize,
        normalized: bool,
    ) -> usize {
        while self.data.len() % 4 != 0 {
            self.data.push(0);
        }
        let offset = self.data.len();
        self.data.extend_from_slice(bytes);

        self.views.push(json!({
            "buffer": 0,
            "byteOffset": offset,
            "byteLength": bytes.len()
        }));
        self.accessors.push(json!({
            "bufferView": self.views.len() - 1,
            "componentType": component_type,
            "count": count,
            "type": element_type,
            "normalized": normalized
        }));
        self.accessors.len() - 1
    }

    pub fn floats(&mut self, values: &[f32], element_type: &str) -> usize {
        let count = values.len() / components(element_type);
        self.accessor(&f32_bytes(values), FLOAT, element_type, count, false)
    }

    /// Fill in buffers, views and accessors of `document`.
    pub fn finish(self, mut document: Value) -> Value {
        let uri = format!(
            "data:application/octet-stream;base64,{}",
            BASE64_STANDARD.encode(&self.data)
        );
        document["asset"] = json!({"version": "2.0"});
        document["buffers"] = json!([{"uri": uri, "byteLength": self.data.len()}]);
        document["bufferViews"] = Value::Array(self.views);
        document["accessors"] = Value::Array(self.accessors);
        document
    }
}

pub fn open_with(config: ImporterConfig, document: &Value) -> GltfImporter {
    init_logger();
    let mut importer = GltfImporter::with_config(config);
    importer
        .open_data(document.to_string().as_bytes())
        .expect("document should open");
    importer
}

pub fn open(document: &Value) -> GltfImporter {
    open_with(ImporterConfig::default(), document)
}
