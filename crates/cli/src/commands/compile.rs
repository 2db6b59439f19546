use boutique_core::{compile, normalize_filters, CompileOptions};

use super::CommandResult;

pub fn run(filters_json: &str, fields: &[String]) -> CommandResult {
    let value = match serde_json::from_str::<serde_json::Value>(filters_json) {
        Ok(value) => value,
        Err(error) => {
            return CommandResult::failure(
                "compile",
                "invalid_filters",
                format!("could not parse --filters JSON: {error}"),
            );
        }
    };

    let filters = normalize_filters(&value);
    let project_fields = (!fields.is_empty()).then(|| fields.to_vec());
    let plan = compile(&filters, &CompileOptions { project_fields });
    CommandResult::payload("compile", &plan)
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn compiles_the_stage_list_in_order() {
        let result = run(r#"{"q":"dress","colors":"black","price_max":100,"sort":"price_asc"}"#, &[]);
        assert_eq!(result.exit_code, 0);

        let value: serde_json::Value = serde_json::from_str(&result.output).expect("json output");
        let stages: Vec<&str> = value["stages"]
            .as_array()
            .expect("stages")
            .iter()
            .map(|stage| stage["stage"].as_str().expect("tag"))
            .collect();
        assert_eq!(
            stages,
            vec![
                "text_search",
                "variant_match",
                "derived_min_price",
                "price_range",
                "sort",
                "skip",
                "limit",
            ]
        );
    }

    #[test]
    fn projection_fields_append_a_final_stage() {
        let result = run("{}", &["title".to_string(), "base_price".to_string()]);
        let value: serde_json::Value = serde_json::from_str(&result.output).expect("json output");
        let last = value["stages"].as_array().expect("stages").last().cloned().expect("stage");
        assert_eq!(last["stage"], serde_json::json!("project"));
        assert_eq!(last["fields"], serde_json::json!(["title", "base_price"]));
    }

    #[test]
    fn malformed_filters_fail_with_envelope() {
        let result = run("[", &[]);
        assert_eq!(result.exit_code, 1);
        assert!(result.output.contains("invalid_filters"));
    }
}
