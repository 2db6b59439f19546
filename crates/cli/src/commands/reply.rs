use boutique_core::{normalize_filters, plan_reply, FilterPayload};

use super::CommandResult;

pub fn run(text: &str, filters_json: Option<&str>, brands: &[String]) -> CommandResult {
    let prior = match filters_json {
        None => FilterPayload::default(),
        Some(raw) => match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(value) => normalize_filters(&value),
            Err(error) => {
                return CommandResult::failure(
                    "reply",
                    "invalid_filters",
                    format!("could not parse --filters JSON: {error}"),
                );
            }
        },
    };

    let plan = plan_reply(text, &prior, brands);
    CommandResult::payload("reply", &plan)
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn plans_a_turn_with_prior_filters() {
        let result =
            run("pastel-pink in summer under $150", Some(r#"{"occasion":["wedding"]}"#), &[]);
        assert_eq!(result.exit_code, 0);

        let value: serde_json::Value = serde_json::from_str(&result.output).expect("json output");
        assert_eq!(value["apply_filters"], serde_json::json!(true));
        assert_eq!(value["filters"]["occasion"], serde_json::json!(["wedding"]));
    }

    #[test]
    fn malformed_filters_fail_with_envelope() {
        let result = run("anything", Some("{not json"), &[]);
        assert_eq!(result.exit_code, 1);
        assert!(result.output.contains("invalid_filters"));
    }
}
