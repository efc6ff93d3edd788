use schemars::schema_for;

use crate::selector::StrikeSelection;

/// JSON Schema for `StrikeSelection`, pretty-printed.
pub fn get_schema_json() -> String {
    let schema = schema_for!(StrikeSelection);
    serde_json::to_string_pretty(&schema).unwrap_or_else(|e| {
        serde_json::json!({ "error": format!("Serialization error: {}", e) }).to_string()
    })
}

/// Generate and print the JSON Schema for strike selections.
pub fn run() -> anyhow::Result<()> {
    println!("{}", get_schema_json());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_names_selection_fields() {
        let json: serde_json::Value = serde_json::from_str(&get_schema_json()).unwrap();
        let props = &json["properties"];
        for field in ["asset", "side", "strike", "delta", "price_usd", "iv", "source"] {
            assert!(props.get(field).is_some(), "missing {field}");
        }
    }
}
