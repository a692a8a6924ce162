use serde_json::{Value, json};

/// A compile response whose conjunctions are `eq(data.users[_].<field>, "<value>")` lists.
pub fn residual_json(conjunctions: &[&[(&str, &str)]]) -> String {
    let queries: Vec<Vec<Value>> = conjunctions
        .iter()
        .map(|pairs| {
            pairs
                .iter()
                .enumerate()
                .map(|(index, (field, value))| {
                    json!({
                        "index": index,
                        "terms": [
                            {"type": "ref", "value": [{"type": "var", "value": "eq"}]},
                            {"type": "ref", "value": [
                                {"type": "var", "value": "data"},
                                {"type": "string", "value": "users"},
                                {"type": "var", "value": "$01"},
                                {"type": "string", "value": field},
                            ]},
                            {"type": "string", "value": value},
                        ]
                    })
                })
                .collect()
        })
        .collect();
    json!({"result": {"queries": queries}}).to_string()
}
