pub mod flow;
pub mod layout;
pub mod measure;
pub mod schema;
pub mod serializer;
pub mod share;
pub mod sql;

use wasm_bindgen::prelude::*;

use layout::Direction;

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Parse DDL text into a schema graph, as JSON.
#[wasm_bindgen(js_name = "parseSchema")]
pub fn parse_schema(ddl: &str) -> Result<String, String> {
    serde_json::to_string(&sql::parse(ddl)).map_err(|e| e.to_string())
}

/// Parse DDL text and lay out the table graph, as a JSON diagram document.
/// `direction` is one of LR, TB, RL, BT; anything else falls back to LR.
#[wasm_bindgen(js_name = "layoutSchema")]
pub fn layout_schema(ddl: &str, direction: Option<String>) -> Result<String, String> {
    let direction = direction
        .as_deref()
        .and_then(Direction::from_str)
        .unwrap_or_default();
    serializer::to_json(&sql::parse(ddl), direction).map_err(|e| e.to_string())
}

/// Table and foreign-key counts for a DDL text, as JSON.
#[wasm_bindgen(js_name = "schemaStats")]
pub fn schema_stats(ddl: &str) -> Result<String, String> {
    serde_json::to_string(&sql::parse(ddl).stats()).map_err(|e| e.to_string())
}

/// Encode DDL text as a shareable payload.
#[wasm_bindgen(js_name = "encodeSharedSchema")]
pub fn encode_shared_schema(ddl: &str) -> String {
    share::encode(ddl)
}

/// Decode a shared payload back into DDL text.
#[wasm_bindgen(js_name = "decodeSharedSchema")]
pub fn decode_shared_schema(payload: &str) -> Result<String, String> {
    share::decode(payload).map_err(|e| e.to_string())
}
